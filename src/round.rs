//! A single prompt-and-three-flags cycle
//!
//! Each round shuffles the whole pool and shows its first three entries,
//! so the displayed countries are always distinct.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{constants::round::ROUND_SIZE, pool::CountryPool};

/// Errors for rounds read back from serialized form
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Fewer countries than a round displays
    #[error("a round needs at least {min} countries, got {0}", min = ROUND_SIZE)]
    TooFewCountries(usize),
    /// The correct answer does not point at a displayed flag
    #[error("correct answer {0} is not one of the {len} displayed flags", len = ROUND_SIZE)]
    AnswerOutOfRange(usize),
}

/// Serialization helper for Round struct
#[derive(Deserialize)]
struct RoundSerde {
    order: Vec<String>,
    correct_answer: usize,
}

impl TryFrom<RoundSerde> for Round {
    type Error = Error;

    fn try_from(serde: RoundSerde) -> Result<Self, Self::Error> {
        if serde.order.len() < ROUND_SIZE {
            return Err(Error::TooFewCountries(serde.order.len()));
        }
        if serde.correct_answer >= ROUND_SIZE {
            return Err(Error::AnswerOutOfRange(serde.correct_answer));
        }

        Ok(Self {
            order: serde.order,
            correct_answer: serde.correct_answer,
        })
    }
}

/// The countries on screen and which of them is being asked for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RoundSerde")]
pub struct Round {
    /// The whole pool in this round's shuffled order; the first
    /// `ROUND_SIZE` entries are the displayed flags
    order: Vec<String>,
    /// Position of the correct flag among the displayed ones
    correct_answer: usize,
}

impl Round {
    /// Draws a new round from the pool
    ///
    /// The pool is shuffled in full and `correct_answer` is drawn uniformly
    /// from `0..ROUND_SIZE`, independently of any previous round.
    pub fn draw(pool: &CountryPool, rng: &mut fastrand::Rng) -> Self {
        let mut order = pool.countries().to_vec();
        rng.shuffle(&mut order);

        Self {
            order,
            correct_answer: rng.usize(0..ROUND_SIZE),
        }
    }

    /// Returns the displayed countries, in flag order
    pub fn countries(&self) -> &[String] {
        &self.order[..ROUND_SIZE]
    }

    /// Returns the whole shuffled pool for this round
    pub fn order(&self) -> &[String] {
        &self.order
    }

    /// Returns the position of the correct flag
    pub fn correct_answer(&self) -> usize {
        self.correct_answer
    }

    /// Returns the country the player is asked to find
    pub fn prompt(&self) -> &str {
        &self.order[self.correct_answer]
    }

    /// Returns the country shown on the flag at `index`, if there is one
    pub fn country(&self, index: usize) -> Option<&str> {
        self.countries().get(index).map(String::as_str)
    }

    /// Whether the flag at `index` is the one asked for
    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct_answer
    }

    /// Comma separated list of the displayed countries
    pub fn describe(&self) -> String {
        self.countries().iter().join(", ")
    }
}
