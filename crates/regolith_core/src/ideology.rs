//! Ideology score tracking and rank decomposition.

use serde::{Deserialize, Serialize};

use crate::math::Fixed;

/// A score split into a rank and the remainder within the current band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RankBand {
    /// Signed rank; negative when the total score is negative.
    pub rank: i32,
    /// Score left over after paying every completed band.
    pub local_score: Fixed,
    /// Threshold of the next, unmet band.
    pub local_threshold: Fixed,
}

/// Decompose a total score into rank bands.
///
/// Band `n` costs `base * scale^n`. Bands are paid from `|total|` until the
/// next one is unaffordable; the rank is negated for negative totals.
/// A non-growing `scale` or non-positive `base` would never terminate, so
/// such parameters yield rank zero.
///
/// # Example
///
/// ```
/// use regolith_core::ideology::rank_band;
/// use regolith_core::math::Fixed;
///
/// let band = rank_band(Fixed::from_num(350), Fixed::from_num(100), Fixed::from_num(2));
/// assert_eq!(band.rank, 2);
/// assert_eq!(band.local_score, Fixed::from_num(50));
/// assert_eq!(band.local_threshold, Fixed::from_num(400));
/// ```
#[must_use]
pub fn rank_band(total: Fixed, base: Fixed, scale: Fixed) -> RankBand {
    let mut score = total.saturating_abs();
    let mut threshold = base;

    if base <= Fixed::ZERO || scale <= Fixed::ONE {
        return RankBand {
            rank: 0,
            local_score: score,
            local_threshold: threshold,
        };
    }

    let mut rank: i32 = 0;
    while score >= threshold {
        score -= threshold;
        rank = rank.saturating_add(1);
        threshold = threshold.saturating_mul(scale);
    }

    RankBand {
        rank: if total < Fixed::ZERO { -rank } else { rank },
        local_score: score,
        local_threshold: threshold,
    }
}

/// Accumulated score for one ideology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdeologyTrack {
    /// Signed running total.
    pub total_score: Fixed,
    /// Current rank and band remainder.
    pub band: RankBand,
}

impl IdeologyTrack {
    /// Create a track at zero score.
    #[must_use]
    pub fn new(base: Fixed, scale: Fixed) -> Self {
        Self {
            total_score: Fixed::ZERO,
            band: rank_band(Fixed::ZERO, base, scale),
        }
    }

    /// Signed rank.
    #[must_use]
    pub const fn rank(&self) -> i32 {
        self.band.rank
    }

    /// Add a signed delta to the total.
    pub fn add(&mut self, delta: Fixed) {
        self.total_score = self.total_score.saturating_add(delta);
    }

    /// Recompute the rank band from the total.
    pub fn refresh(&mut self, base: Fixed, scale: Fixed) {
        self.band = rank_band(self.total_score, base, scale);
    }
}
