//! Reduction of a raw signal to its alternating sequence of local extrema.

/// Collapses `signal` to its turning points.
///
/// A single left-to-right pass keeps a stack of accepted points. Before an
/// incoming sample is pushed, the top of the stack is popped for as long as it
/// is not a strict extremum between its predecessor and the incoming sample,
/// which removes both monotonic runs and flat plateaus.
///
/// Signals shorter than two samples are returned unchanged and a strictly
/// monotonic signal collapses to its two endpoints.
///
/// ```
/// use blade_fatigue::turning_points::reduce;
///
/// assert_eq!(reduce(&[0.0, 1.0, 2.0, 1.0, 1.0, 3.0]), vec![0.0, 2.0, 1.0, 3.0]);
/// ```
pub fn reduce(signal: &[f64]) -> Vec<f64> {
    let mut points: Vec<f64> = Vec::with_capacity(signal.len());

    for &value in signal {
        while let [.., a, b] = points[..] {
            if is_reversal(a, b, value) {
                break;
            }
            points.pop();
        }
        points.push(value);
    }

    points
}

/// True when `b` is a strict extremum between `a` and `c`.
///
/// Compares the samples directly rather than multiplying differences, which
/// overflow near the ends of the `f64` range.
fn is_reversal(a: f64, b: f64, c: f64) -> bool {
    use std::cmp::Ordering::{Greater, Less};

    matches!(
        (b.partial_cmp(&a), c.partial_cmp(&b)),
        (Some(Greater), Some(Less)) | (Some(Less), Some(Greater))
    )
}
