use std::{fmt, str::FromStr};

use common::model::game::{Move, Outcome};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Random,
    Remote,
}

impl Mode {
    pub fn is_random(self) -> bool {
        matches!(self, Mode::Random)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Random => f.write_str("random"),
            Mode::Remote => f.write_str("remote"),
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" | "local" => Ok(Mode::Random),
            "remote" => Ok(Mode::Remote),
            other => Err(format!("unknown mode {:?}", other)),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameRecord {
    pub player_move: Move,
    pub opponent_move: Move,
    pub outcome: Outcome,
    pub was_random: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tally {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
}

impl Tally {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Win => self.wins = self.wins.saturating_add(1),
            Outcome::Loss => self.losses = self.losses.saturating_add(1),
            Outcome::Tie => self.ties = self.ties.saturating_add(1),
        }
    }

    pub fn total(&self) -> u32 {
        self.wins
            .saturating_add(self.losses)
            .saturating_add(self.ties)
    }

    // All zero before the first game.
    pub fn percentages(&self) -> Percentages {
        let total = self.total();
        if total == 0 {
            return Percentages::default();
        }
        let share = |count: u32| f64::from(count) / f64::from(total) * 100.0;
        Percentages {
            win: share(self.wins),
            loss: share(self.losses),
            tie: share(self.ties),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Percentages {
    pub win: f64,
    pub loss: f64,
    pub tie: f64,
}

impl fmt::Display for Percentages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Win {:.1}% | Loss {:.1}% | Tie {:.1}%",
            self.win, self.loss, self.tie
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Idle,
    Played(GameRecord),
    Failed(String),
}
