pub mod fixtures;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Provider of placeholder statistics for the long-form generators.
///
/// Bounds are inclusive. Implementations must tolerate `low > high` by
/// swapping the bounds.
pub trait StatSource: Send {
    fn int(&mut self, low: i64, high: i64) -> i64;

    fn float(&mut self, low: f64, high: f64) -> f64;

    /// Index in `0..len`. `len` is never zero.
    fn index(&mut self, len: usize) -> usize;

    /// Choose one phrase. Empty slices yield an empty string.
    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        if items.is_empty() {
            return "";
        }
        items[self.index(items.len()).min(items.len() - 1)]
    }

    /// Float rounded to one decimal place.
    fn float1(&mut self, low: f64, high: f64) -> f64 {
        round_to(self.float(low, high), 1)
    }

    /// Float rounded to two decimal places.
    fn float2(&mut self, low: f64, high: f64) -> f64 {
        round_to(self.float(low, high), 2)
    }

    /// Weighted choice returning the index of the selected weight.
    fn weighted(&mut self, weights: &[u32]) -> usize {
        let total: u32 = weights.iter().sum();
        if total == 0 {
            return 0;
        }
        let mut roll = self.int(0, i64::from(total) - 1);
        for (i, w) in weights.iter().enumerate() {
            roll -= i64::from(*w);
            if roll < 0 {
                return i;
            }
        }
        weights.len() - 1
    }
}

pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Seedable RNG-backed statistics.
pub struct RandomStats {
    rng: StdRng,
}

impl RandomStats {
    /// A fixed seed yields reproducible articles; `None` draws from OS entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl StatSource for RandomStats {
    fn int(&mut self, low: i64, high: i64) -> i64 {
        let (low, high) = ordered(low, high);
        self.rng.gen_range(low..=high)
    }

    fn float(&mut self, low: f64, high: f64) -> f64 {
        let (low, high) = if low <= high { (low, high) } else { (high, low) };
        self.rng.gen_range(low..=high)
    }

    fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len.max(1))
    }
}

/// Deterministic statistics: midpoint of every range, first item of every choice.
#[derive(Debug, Default, Clone, Copy)]
pub struct MidpointStats;

impl StatSource for MidpointStats {
    fn int(&mut self, low: i64, high: i64) -> i64 {
        let (low, high) = ordered(low, high);
        low + (high - low) / 2
    }

    fn float(&mut self, low: f64, high: f64) -> f64 {
        (low + high) / 2.0
    }

    fn index(&mut self, _len: usize) -> usize {
        0
    }
}

fn ordered(low: i64, high: i64) -> (i64, i64) {
    if low <= high {
        (low, high)
    } else {
        (high, low)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midpoint_is_deterministic() {
        let mut stats = MidpointStats;
        assert_eq!(stats.int(2, 8), 5);
        assert_eq!(stats.int(8, 2), 5);
        assert_eq!(stats.float1(1.5, 2.5), 2.0);
        assert_eq!(stats.pick(&["a", "b"]), "a");
        assert_eq!(stats.pick(&[]), "");
    }

    #[test]
    fn test_seeded_random_is_reproducible() {
        let mut a = RandomStats::new(Some(7));
        let mut b = RandomStats::new(Some(7));
        let xs: Vec<i64> = (0..20).map(|_| a.int(0, 1000)).collect();
        let ys: Vec<i64> = (0..20).map(|_| b.int(0, 1000)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_random_stays_in_bounds() {
        let mut stats = RandomStats::new(Some(1));
        for _ in 0..200 {
            let n = stats.int(3, 6);
            assert!((3..=6).contains(&n));
            let f = stats.float(0.8, 1.8);
            assert!((0.8..=1.8).contains(&f));
            assert!(stats.index(3) < 3);
            assert!(stats.weighted(&[5, 2, 3]) < 3);
        }
    }

    #[test]
    fn test_weighted_with_midpoint() {
        let mut stats = MidpointStats;
        // roll = 4 of 0..=9 lands in the first bucket (weight 5)
        assert_eq!(stats.weighted(&[5, 2, 3]), 0);
        assert_eq!(stats.weighted(&[]), 0);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.26, 1), 1.3);
        assert_eq!(round_to(0.954, 2), 0.95);
    }
}
