//! Configuration constants for the flag quiz
//!
//! This module contains the limits and fixed values used throughout the
//! game to keep rounds, pools, and timings within consistent bounds.

/// Round layout constants
pub mod round {
    /// Number of flags displayed in every round
    pub const ROUND_SIZE: usize = 3;
}

/// Country pool constants
pub mod pool {
    /// Minimum number of countries in a pool (enough to fill one round)
    pub const MIN_POOL_SIZE: usize = super::round::ROUND_SIZE;
    /// Maximum number of countries in a pool
    pub const MAX_POOL_SIZE: usize = 256;
    /// Minimum length of a country name
    pub const MIN_COUNTRY_NAME_LENGTH: usize = 1;
    /// Maximum length of a country name
    pub const MAX_COUNTRY_NAME_LENGTH: usize = 64;
    /// Countries the game ships flags for
    pub const DEFAULT_COUNTRIES: [&str; 11] = [
        "Estonia", "France", "Germany", "Ireland", "Italy", "Nigeria", "Poland", "Russia", "Spain",
        "UK", "US",
    ];
}

/// Timing constants
pub mod timing {
    use std::time::Duration;

    /// Delay before the animated variant moves on after a correct tap
    pub const AUTO_ADVANCE_DELAY: Duration = Duration::from_secs(2);
    /// Maximum configurable auto-advance delay in seconds
    pub const MAX_AUTO_ADVANCE_SECONDS: u64 = 10;
}

/// Result notice text
pub mod notice {
    /// Title shown after a correct tap
    pub const CORRECT_TITLE: &str = "Correct";
    /// Label of the button that dismisses the notice
    pub const DISMISS_LABEL: &str = "Continue";
}
