use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
    Tie,
}

impl Outcome {
    pub fn opposite(self) -> Outcome {
        match self {
            Outcome::Win => Outcome::Loss,
            Outcome::Loss => Outcome::Win,
            Outcome::Tie => Outcome::Tie,
        }
    }

    pub fn phrase(self) -> &'static str {
        match self {
            Outcome::Win => "You win!",
            Outcome::Loss => "Computer wins!",
            Outcome::Tie => "It's a tie!",
        }
    }

    pub fn from_phrase(phrase: &str) -> Option<Outcome> {
        [Outcome::Win, Outcome::Loss, Outcome::Tie]
            .into_iter()
            .find(|outcome| outcome.phrase() == phrase)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Win => "win",
            Outcome::Loss => "loss",
            Outcome::Tie => "tie",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    Rock,
    Paper,
    Scissors,
}

impl Move {
    pub const ALL: [Move; 3] = [Move::Rock, Move::Paper, Move::Scissors];

    pub fn beats(&self, other: &Move) -> Option<bool> {
        if self == other {
            None
        } else {
            Some(matches!(
                (self, other),
                (Move::Rock, Move::Scissors)
                    | (Move::Scissors, Move::Paper)
                    | (Move::Paper, Move::Rock)
            ))
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Move::Rock => "rock",
            Move::Paper => "paper",
            Move::Scissors => "scissors",
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMove(pub String);

impl fmt::Display for UnknownMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown move {:?}", self.0)
    }
}

impl std::error::Error for UnknownMove {}

impl FromStr for Move {
    type Err = UnknownMove;

    // Accepts the full token or its first letter, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rock" | "r" => Ok(Move::Rock),
            "paper" | "p" => Ok(Move::Paper),
            "scissors" | "s" => Ok(Move::Scissors),
            _ => Err(UnknownMove(s.to_owned())),
        }
    }
}

pub fn resolve(player: Move, opponent: Move) -> Outcome {
    match player.beats(&opponent) {
        Some(true) => Outcome::Win,
        Some(false) => Outcome::Loss,
        None => Outcome::Tie,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cyclic_dominance() {
        assert_eq!(resolve(Move::Rock, Move::Scissors), Outcome::Win);
        assert_eq!(resolve(Move::Scissors, Move::Paper), Outcome::Win);
        assert_eq!(resolve(Move::Paper, Move::Rock), Outcome::Win);
        assert_eq!(resolve(Move::Paper, Move::Scissors), Outcome::Loss);
    }

    #[test]
    fn test_resolve_is_total_and_complementary() {
        let mut wins = 0;
        let mut ties = 0;
        for a in Move::ALL {
            for b in Move::ALL {
                let forward = resolve(a, b);
                assert_eq!(resolve(b, a), forward.opposite());
                if a == b {
                    assert_eq!(forward, Outcome::Tie);
                    ties += 1;
                } else {
                    assert_ne!(forward, Outcome::Tie);
                }
                if forward == Outcome::Win {
                    wins += 1;
                }
            }
        }
        assert_eq!(wins, 3);
        assert_eq!(ties, 3);
    }

    #[test]
    fn test_phrase_mapping() {
        assert_eq!(Outcome::from_phrase("You win!"), Some(Outcome::Win));
        assert_eq!(Outcome::from_phrase("Computer wins!"), Some(Outcome::Loss));
        assert_eq!(Outcome::from_phrase("It's a tie!"), Some(Outcome::Tie));
        assert_eq!(Outcome::from_phrase("you win"), None);
    }

    #[test]
    fn test_move_tokens() {
        assert_eq!("Rock".parse::<Move>(), Ok(Move::Rock));
        assert_eq!(" s ".parse::<Move>(), Ok(Move::Scissors));
        assert!("lizard".parse::<Move>().is_err());
        assert_eq!(
            serde_json::to_string(&Move::Paper).expect("serialize"),
            "\"paper\""
        );
    }
}
