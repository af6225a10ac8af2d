//! Rainflow cycle extraction over a turning-point sequence.

use serde::Serialize;
use tracing::debug;

use crate::error::{FatigueError, Result};
use crate::turning_points::reduce;

/// Weight of a closed hysteresis loop.
pub const FULL_CYCLE: f64 = 1.0;
/// Weight of an unresolved residual reversal.
pub const HALF_CYCLE: f64 = 0.5;

/// A counted load cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Cycle {
    /// Half the absolute range between the matched turning points.
    pub amplitude: f64,
    /// Midpoint of the matched turning points.
    pub mean: f64,
    /// `FULL_CYCLE` or `HALF_CYCLE`.
    pub weight: f64,
}

impl Cycle {
    fn between(from: f64, to: f64, weight: f64) -> Self {
        Cycle {
            amplitude: half_range(from, to),
            mean: from / 2.0 + to / 2.0,
            weight,
        }
    }

    pub fn range(&self) -> f64 {
        2.0 * self.amplitude
    }

    pub fn is_full(&self) -> bool {
        self.weight == FULL_CYCLE
    }
}

/// Half of `|to - from|`, halved first so that the full range cannot overflow.
fn half_range(from: f64, to: f64) -> f64 {
    (to / 2.0 - from / 2.0).abs()
}

/// Counts cycles in an already reduced turning-point sequence.
///
/// The window `S0, S1, S2` starts at the cursor. When `|S1 - S0| <= |S2 - S1|`
/// a full cycle of amplitude `|S1 - S0| / 2` is emitted and `S1` is removed, so
/// the window is tested again at the same cursor position. Otherwise the cursor
/// advances by one. Equal ranges close a cycle.
///
/// Points behind the cursor are never read again, so only `S0` and `S1` are
/// kept and the remaining points are streamed in as `S2`. When the input runs
/// out, the two points left at the cursor form the residual half cycle.
///
/// Zero-amplitude cycles are emitted like any other; damage summation is
/// responsible for skipping them.
pub fn extract(turning_points: &[f64]) -> Vec<Cycle> {
    let mut cycles = Vec::new();
    let (mut s0, mut s1) = match turning_points {
        [s0, s1, ..] => (*s0, *s1),
        _ => return cycles,
    };

    for &s2 in &turning_points[2..] {
        // Comparing half ranges orders the same as comparing ranges
        if half_range(s0, s1) <= half_range(s1, s2) {
            cycles.push(Cycle::between(s0, s1, FULL_CYCLE));
            s1 = s2;
        } else {
            s0 = s1;
            s1 = s2;
        }
    }

    cycles.push(Cycle::between(s0, s1, HALF_CYCLE));
    cycles
}

/// Rejects signals containing NaN or infinite samples.
pub fn validate_signal(signal: &[f64]) -> Result<()> {
    match signal.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(FatigueError::InvalidSignal {
            index,
            value: signal[index],
        }),
        None => Ok(()),
    }
}

/// Reduces `signal` to turning points and counts its rainflow cycles.
///
/// ```
/// use blade_fatigue::rainflow::extract_cycles;
///
/// let cycles = extract_cycles(&[0.0, 1.0, 0.0, 2.0, 0.0]).unwrap();
/// let amplitudes: Vec<f64> = cycles.iter().map(|c| c.amplitude).collect();
/// assert_eq!(amplitudes, vec![0.5, 0.0, 1.0, 0.0]);
/// ```
pub fn extract_cycles(signal: &[f64]) -> Result<Vec<Cycle>> {
    validate_signal(signal)?;
    let turning_points = reduce(signal);
    let cycles = extract(&turning_points);
    debug!(
        samples = signal.len(),
        turning_points = turning_points.len(),
        cycles = cycles.len(),
        "rainflow counted"
    );
    Ok(cycles)
}
