//! Confidence offset for neutral keyword ties

use std::ops::RangeInclusive;
use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::model::NeutralTieConfig;

/// Offsets added to the 0.6 neutral baseline stay within this range
pub const TIE_OFFSET_RANGE: RangeInclusive<f64> = 0.05..=0.15;

/// Source of the offset applied when positive and negative counts are equal
#[derive(Debug)]
pub enum TieBreaker {
    Fixed(f64),
    Seeded(Mutex<StdRng>),
}

impl TieBreaker {
    /// Constant offset, clamped into [`TIE_OFFSET_RANGE`]
    pub fn fixed(offset: f64) -> Self {
        TieBreaker::Fixed(offset.clamp(*TIE_OFFSET_RANGE.start(), *TIE_OFFSET_RANGE.end()))
    }

    /// Uniform offsets from a generator seeded with `seed`
    pub fn seeded(seed: u64) -> Self {
        TieBreaker::Seeded(Mutex::new(StdRng::seed_from_u64(seed)))
    }

    pub fn offset(&self) -> f64 {
        match self {
            TieBreaker::Fixed(offset) => *offset,
            TieBreaker::Seeded(rng) => {
                let mut rng = rng.lock().unwrap_or_else(PoisonError::into_inner);
                rng.gen_range(TIE_OFFSET_RANGE)
            }
        }
    }
}

impl Default for TieBreaker {
    fn default() -> Self {
        Self::from(&NeutralTieConfig::default())
    }
}

impl From<&NeutralTieConfig> for TieBreaker {
    fn from(config: &NeutralTieConfig) -> Self {
        match config {
            NeutralTieConfig::Fixed { offset } => TieBreaker::fixed(*offset),
            NeutralTieConfig::Seeded { seed } => TieBreaker::seeded(*seed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_constant() {
        let tie = TieBreaker::default();
        assert_eq!(tie.offset(), 0.10);
        assert_eq!(tie.offset(), 0.10);
    }

    #[test]
    fn test_fixed_is_clamped() {
        assert_eq!(TieBreaker::fixed(0.5).offset(), 0.15);
        assert_eq!(TieBreaker::fixed(-1.0).offset(), 0.05);
    }

    #[test]
    fn test_seeded_is_reproducible_and_bounded() {
        let a = TieBreaker::seeded(7);
        let b = TieBreaker::seeded(7);

        for _ in 0..50 {
            let offset = a.offset();
            assert_eq!(offset, b.offset());
            assert!(TIE_OFFSET_RANGE.contains(&offset));
        }
    }
}
