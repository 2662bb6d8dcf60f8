use common::model::game::Move;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::model::GameRecord;

pub trait Strategy: Send {
    fn make_move(&mut self, history: &[GameRecord]) -> Move;
}

// Trivial strategies
pub struct OnlyMove(pub Move);
impl Strategy for OnlyMove {
    fn make_move(&mut self, _: &[GameRecord]) -> Move {
        self.0
    }
}

// Uniform over the three moves
pub struct RandomMove<R = StdRng> {
    rng: R,
}

impl RandomMove<StdRng> {
    pub fn from_entropy() -> Self {
        RandomMove {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        RandomMove {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng + Send> Strategy for RandomMove<R> {
    fn make_move(&mut self, _: &[GameRecord]) -> Move {
        Move::ALL[self.rng.gen_range(0..Move::ALL.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_move_covers_all_moves() {
        let mut strategy = RandomMove::seeded(7);
        let mut counts = [0u32; 3];
        for _ in 0..3000 {
            let index = match strategy.make_move(&[]) {
                Move::Rock => 0,
                Move::Paper => 1,
                Move::Scissors => 2,
            };
            counts[index] += 1;
        }
        for count in counts {
            assert!((800..=1200).contains(&count), "skewed counts {:?}", counts);
        }
    }

    #[test]
    fn test_seeded_strategies_repeat() {
        let mut a = RandomMove::seeded(42);
        let mut b = RandomMove::seeded(42);
        let first: Vec<Move> = (0..20).map(|_| a.make_move(&[])).collect();
        let second: Vec<Move> = (0..20).map(|_| b.make_move(&[])).collect();
        assert_eq!(first, second);
    }
}
