use serde::{Deserialize, Serialize};

use crate::model::game::{Move, Outcome};

// Scoring service messages
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PlayRequest {
    pub choice: Move,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PlayResponse {
    pub computer_choice: Move,
    pub result: String,
}

impl PlayResponse {
    pub fn new(computer_choice: Move, outcome: Outcome) -> Self {
        PlayResponse {
            computer_choice,
            result: outcome.phrase().to_owned(),
        }
    }

    // `None` for a phrase outside the known set.
    pub fn outcome(&self) -> Option<Outcome> {
        Outcome::from_phrase(&self.result)
    }
}
