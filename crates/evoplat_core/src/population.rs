//! Random candidate generation for offline runs and benchmarks.

use evoplat_data::{ActionKind, Candidate, Move, Population};
use rand::Rng;

/// Shortest generated move, in seconds.
pub const MIN_DURATION: f64 = 0.25;
/// Upper bound (exclusive) of generated move durations.
pub const MAX_DURATION: f64 = 2.0;

const ACTIONS: [ActionKind; 3] = [ActionKind::Left, ActionKind::Right, ActionKind::Jump];

/// One candidate of `length` moves drawn uniformly from left/right/jump.
pub fn random_candidate<R: Rng>(rng: &mut R, length: usize) -> Candidate {
    (0..length)
        .map(|_| {
            let action = ACTIONS[rng.gen_range(0..ACTIONS.len())].clone();
            Move {
                action,
                duration: rng.gen_range(MIN_DURATION..MAX_DURATION),
            }
        })
        .collect()
}

pub fn random_population<R: Rng>(rng: &mut R, size: usize, length: usize) -> Population {
    (0..size).map(|_| random_candidate(rng, length)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_population_shape() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let population = random_population(&mut rng, 12, 5);
        assert_eq!(population.len(), 12);
        assert!(population.iter().all(|c| c.len() == 5));
    }

    #[test]
    fn test_moves_are_valid_and_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for m in random_population(&mut rng, 20, 10).iter().flatten() {
            assert!(m.action.is_recognized());
            assert_ne!(m.action, ActionKind::Pause);
            assert!((MIN_DURATION..MAX_DURATION).contains(&m.duration));
        }
    }

    #[test]
    fn test_same_seed_same_population() {
        let a = random_population(&mut ChaCha8Rng::seed_from_u64(99), 4, 3);
        let b = random_population(&mut ChaCha8Rng::seed_from_u64(99), 4, 3);
        assert_eq!(a, b);
    }
}
