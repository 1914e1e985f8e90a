//! Game configuration: variants, rules and loadable options
//!
//! The game shipped in two versions that disagree on what a wrong tap costs,
//! when the result notice appears, and whether a correct tap moves on by
//! itself. Each version is a named [`Variant`]; the behaviour it implies is
//! spelled out in [`Rules`], which can also be configured directly.

use std::time::Duration;

use garde::Validate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    constants::timing::{AUTO_ADVANCE_DELAY, MAX_AUTO_ADVANCE_SECONDS},
    pool::CountryPool,
};

/// Errors that can occur while loading game options
#[derive(Error, Debug)]
pub enum Error {
    /// The options could not be parsed
    #[error("malformed options: {0}")]
    Json(#[from] serde_json::Error),
    /// The options parsed but break a constraint
    #[error("invalid options: {0}")]
    Invalid(#[from] garde::Report),
}

/// Named configuration modes, one per shipped version of the game
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Variant {
    /// Version with tap animations: a wrong tap keeps the score until the
    /// notice is dismissed, and a correct tap moves on after a short delay
    Animated,
    /// Version without animations: a wrong tap resets the score and every
    /// tap raises the notice
    #[default]
    Plain,
}

impl Variant {
    /// Returns the rules this variant plays by
    pub fn rules(self) -> Rules {
        match self {
            Self::Animated => Rules {
                wrong_resets_score: false,
                notice: NoticePolicy::WrongOnly,
                dismiss_resets_score: true,
                auto_advance: Some(AUTO_ADVANCE_DELAY),
            },
            Self::Plain => Rules {
                wrong_resets_score: true,
                notice: NoticePolicy::Always,
                dismiss_resets_score: false,
                auto_advance: None,
            },
        }
    }
}

/// When the result notice is raised
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticePolicy {
    /// After every tap
    #[default]
    Always,
    /// Only after a wrong tap
    WrongOnly,
}

/// Validates the delay before a correct round moves on by itself
fn validate_auto_advance(val: &Option<Duration>, _ctx: &()) -> garde::Result {
    match val {
        Some(delay) if delay.as_secs() > MAX_AUTO_ADVANCE_SECONDS => Err(garde::Error::new(
            format!("auto_advance is outside of the bounds [0,{MAX_AUTO_ADVANCE_SECONDS}]"),
        )),
        _ => Ok(()),
    }
}

/// Rejects rules that raise no notice after a correct tap and never move on
/// by themselves, which would leave the game stuck on that result
fn validate_flow(val: &Rules, _ctx: &()) -> garde::Result {
    if val.notice == NoticePolicy::WrongOnly && val.auto_advance.is_none() {
        Err(garde::Error::new("notice WrongOnly requires auto_advance to be set"))
    } else {
        Ok(())
    }
}

/// Scoring and flow rules applied by the game
#[serde_with::serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Rules {
    /// Whether a wrong tap sets the score back to zero
    #[garde(skip)]
    pub wrong_resets_score: bool,
    /// When the result notice is raised
    #[garde(skip)]
    pub notice: NoticePolicy,
    /// Whether dismissing the notice sets the score back to zero
    #[garde(skip)]
    pub dismiss_resets_score: bool,
    /// Delay after a correct tap before the next round starts on its own
    #[garde(custom(validate_auto_advance))]
    #[serde_as(as = "Option<serde_with::DurationMilliSeconds<u64>>")]
    pub auto_advance: Option<Duration>,
}

impl Default for Rules {
    fn default() -> Self {
        Variant::default().rules()
    }
}

/// Either a named variant or a hand-picked rule set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub enum RulesChoice {
    /// Play by the rules of a shipped version
    Variant(#[garde(skip)] Variant),
    /// Play by custom rules
    Custom(#[garde(dive, custom(validate_flow))] Rules),
}

impl Default for RulesChoice {
    fn default() -> Self {
        Self::Variant(Variant::default())
    }
}

impl RulesChoice {
    /// Resolves the choice to concrete rules
    pub fn rules(self) -> Rules {
        match self {
            Self::Variant(variant) => variant.rules(),
            Self::Custom(rules) => rules,
        }
    }
}

impl From<Variant> for RulesChoice {
    fn from(variant: Variant) -> Self {
        Self::Variant(variant)
    }
}

/// Options a game is started with
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Options {
    /// Rules the game plays by
    #[garde(dive)]
    pub rules: RulesChoice,
    /// Countries rounds are drawn from
    #[garde(dive)]
    pub pool: CountryPool,
    /// Seed for the random number generator (None seeds from the system)
    #[garde(skip)]
    pub seed: Option<u64>,
}

impl Options {
    /// Builds options for a named variant with the default pool
    pub fn with_variant(variant: Variant) -> Self {
        Self {
            rules: variant.into(),
            ..Self::default()
        }
    }

    /// Parses and validates options from JSON
    ///
    /// Missing fields take their default values.
    ///
    /// # Errors
    ///
    /// * `Error::Json` - The text is not valid JSON for `Options`
    /// * `Error::Invalid` - A field breaks its constraints
    pub fn from_json(text: &str) -> Result<Self, Error> {
        let options: Self = serde_json::from_str(text)?;
        options.validate()?;
        Ok(options)
    }
}
