//! Miner's rule damage summation and life estimation.

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::error::{FatigueError, Result};
use crate::material::SnCurve;
use crate::rainflow::{extract_cycles, Cycle};

/// Linear damage of `cycles` on `curve`: the sum of `weight / N(amplitude)`.
///
/// Cycles with zero amplitude do no damage and are never handed to the curve.
pub fn damage_for_cycles(cycles: &[Cycle], curve: &SnCurve) -> f64 {
    cycles
        .iter()
        .filter(|c| c.amplitude > 0.0)
        .map(|c| c.weight / curve.cycles_to_failure(c.amplitude))
        .sum()
}

/// Adds one segment's damage to a running total.
pub fn accumulate(prior: f64, segment: f64) -> f64 {
    debug_assert!(segment >= 0.0, "segment damage must be non-negative, got {}", segment);
    prior + segment
}

/// Cycle counts and damage of one signal segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SegmentScore {
    pub samples: usize,
    pub full_cycles: usize,
    pub half_cycles: usize,
    pub damage: f64,
}

/// Counts the cycles of `signal` and sums their damage on `curve`.
pub fn score_segment(signal: &[f64], curve: &SnCurve) -> Result<SegmentScore> {
    let cycles = extract_cycles(signal)?;
    let full_cycles = cycles.iter().filter(|c| c.is_full()).count();
    let score = SegmentScore {
        samples: signal.len(),
        full_cycles,
        half_cycles: cycles.len() - full_cycles,
        damage: damage_for_cycles(&cycles, curve),
    };
    debug!(
        samples = score.samples,
        full_cycles = score.full_cycles,
        half_cycles = score.half_cycles,
        damage = score.damage,
        "segment scored"
    );
    Ok(score)
}

/// Damage fraction of one signal segment.
pub fn compute_segment_damage(signal: &[f64], curve: &SnCurve) -> Result<f64> {
    score_segment(signal, curve).map(|score| score.damage)
}

/// Scores every segment in parallel; results come back in segment order.
///
/// Segments are independent and the curve is only read, so no coordination
/// is needed beyond collecting.
pub fn score_segments<S>(segments: &[S], curve: &SnCurve) -> Result<Vec<SegmentScore>>
where
    S: AsRef<[f64]> + Sync,
{
    segments
        .par_iter()
        .map(|segment| score_segment(segment.as_ref(), curve))
        .collect()
}

/// Number of units until failure for a per-unit damage `d`.
///
/// `1 / d` when `d > 0`, otherwise `f64::INFINITY`.
pub fn life_in_units(damage_per_unit: f64) -> f64 {
    if damage_per_unit > 0.0 {
        1.0 / damage_per_unit
    } else {
        f64::INFINITY
    }
}

/// Life in years when `units_per_year` units with `damage_per_unit` each pass
/// per year. Zero damage gives an infinite life.
///
/// ```
/// use blade_fatigue::damage::estimate_life;
///
/// assert_eq!(estimate_life(0.0, 365.25), f64::INFINITY);
/// assert_eq!(estimate_life(1e-4, 365.25), 1e4 / 365.25);
/// ```
pub fn estimate_life(damage_per_unit: f64, units_per_year: f64) -> f64 {
    debug_assert!(units_per_year > 0.0, "units per year must be positive, got {}", units_per_year);
    life_in_units(damage_per_unit) / units_per_year
}

/// [`estimate_life`] with the rate checked up front.
pub fn try_estimate_life(damage_per_unit: f64, units_per_year: f64) -> Result<f64> {
    if !(units_per_year.is_finite() && units_per_year > 0.0) {
        return Err(FatigueError::InvalidLifeRate(units_per_year));
    }
    Ok(estimate_life(damage_per_unit, units_per_year))
}

/// Running damage total across sequential segments.
///
/// The trace holds the total after each pushed segment, in push order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CumulativeDamage {
    total: f64,
    trace: Vec<f64>,
}

impl CumulativeDamage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, segment: f64) {
        self.total = accumulate(self.total, segment);
        self.trace.push(self.total);
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn trace(&self) -> &[f64] {
        &self.trace
    }

    pub fn life_in_units(&self) -> f64 {
        life_in_units(self.total)
    }

    pub fn life_in_years(&self, units_per_year: f64) -> f64 {
        estimate_life(self.total, units_per_year)
    }
}

impl FromIterator<f64> for CumulativeDamage {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut cumulative = CumulativeDamage::new();
        for segment in iter {
            cumulative.push(segment);
        }
        cumulative
    }
}
