//! The master list of countries rounds are drawn from
//!
//! A pool is validated on construction: it must hold enough distinct,
//! non-empty names to fill a round.

use std::collections::HashSet;

use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::constants::pool::{
    DEFAULT_COUNTRIES, MAX_COUNTRY_NAME_LENGTH, MAX_POOL_SIZE, MIN_COUNTRY_NAME_LENGTH,
    MIN_POOL_SIZE,
};

/// Rejects pools that list the same country more than once.
#[allow(clippy::ptr_arg)]
fn validate_distinct(val: &Vec<String>, _ctx: &()) -> garde::Result {
    let mut seen = HashSet::with_capacity(val.len());
    match val.iter().find(|name| !seen.insert(name.as_str())) {
        Some(name) => Err(garde::Error::new(format!("{name} is listed twice"))),
        None => Ok(()),
    }
}

/// Fixed ordered sequence of distinct country names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct CountryPool {
    /// Country names, in their canonical order
    #[garde(
        length(min = MIN_POOL_SIZE, max = MAX_POOL_SIZE),
        inner(length(chars, min = MIN_COUNTRY_NAME_LENGTH, max = MAX_COUNTRY_NAME_LENGTH)),
        custom(validate_distinct)
    )]
    countries: Vec<String>,
}

impl Default for CountryPool {
    /// The eleven countries the game ships flags for
    fn default() -> Self {
        Self {
            countries: DEFAULT_COUNTRIES.iter().map(ToString::to_string).collect(),
        }
    }
}

impl TryFrom<Vec<String>> for CountryPool {
    type Error = garde::Report;

    fn try_from(countries: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(countries)
    }
}

impl From<CountryPool> for Vec<String> {
    fn from(pool: CountryPool) -> Self {
        pool.countries
    }
}

impl CountryPool {
    /// Builds a pool from a list of names
    ///
    /// # Errors
    ///
    /// Returns the validation report if the list is too short, too long,
    /// contains an empty or overlong name, or repeats a name.
    pub fn new<I, S>(countries: I) -> Result<Self, garde::Report>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let pool = Self {
            countries: countries.into_iter().map(Into::into).collect(),
        };
        pool.validate()?;
        Ok(pool)
    }

    /// Returns the countries in their canonical order
    pub fn countries(&self) -> &[String] {
        &self.countries
    }

    /// Returns the number of countries in the pool
    pub fn len(&self) -> usize {
        self.countries.len()
    }

    /// Whether the pool holds no countries (never true once validated)
    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}
