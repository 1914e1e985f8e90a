//! Text of the result notice shown after a tap

use serde::{Deserialize, Serialize};

use crate::{
    constants::notice::{CORRECT_TITLE, DISMISS_LABEL},
    game::TapResult,
};

/// The feedback raised after a tap, reporting correctness and current score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultNotice {
    /// Headline stating whether the tap was correct
    pub title: String,
    /// Body reporting the current score
    pub message: String,
    /// Label of the button that dismisses the notice
    pub dismiss_label: String,
}

impl ResultNotice {
    /// Builds the notice for a tap result and the score after it
    pub fn new(result: &TapResult, score: u64) -> Self {
        let title = match result {
            TapResult::Correct => CORRECT_TITLE.to_owned(),
            TapResult::Wrong { missed_country } => {
                format!("Wrong! That's the flag of {missed_country}")
            }
        };

        Self {
            title,
            message: format!("Your score is {score}"),
            dismiss_label: DISMISS_LABEL.to_owned(),
        }
    }
}
