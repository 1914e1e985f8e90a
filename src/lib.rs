//! # Guess the Flag
//!
//! This library provides the game logic of a single-screen flag quiz: the
//! player is shown a country name and three flags, taps the flag they believe
//! matches, and receives score feedback through a result notice.
//!
//! Rendering is left to a presentation layer, which drives a
//! [`game::QuizState`] with taps and dismissals and re-renders from its
//! [`game::SyncMessage`] snapshot.

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::ref_option)]
use serde::{Deserialize, Serialize};

pub mod config;
pub mod constants;
pub mod game;
pub mod notice;
pub mod pool;
pub mod round;

/// Alarm messages for timed events
///
/// The game hands these to a caller-supplied scheduler together with a
/// delay; the presentation layer delivers them back through
/// [`game::QuizState::receive_alarm`] once the delay has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlarmMessage {
    /// Start a new round if the named round is still showing its result
    AdvanceRound {
        /// Number of the round the alarm was scheduled in
        round: u64,
    },
}
