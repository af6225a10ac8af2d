//! Rainflow cycle counting and Miner's rule fatigue damage for wind-turbine blades.
//!
//! The core is a pure transform: a stress signal is reduced to its turning
//! points, counted into full and half cycles, and each cycle is scored
//! against a Basquin S-N curve.
//!
//! ```
//! use blade_fatigue::{compute_segment_damage, estimate_life, SnCurve};
//!
//! let curve = SnCurve::new(10.0, 50e6, 1e6).unwrap();
//! let damage = compute_segment_damage(&[0.0, 100e6, 0.0], &curve).unwrap();
//! assert!((damage - 1e-6).abs() < 1e-18);
//! assert!((estimate_life(damage, 1e6) - 1.0).abs() < 1e-9);
//! ```

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

pub mod app_logic;
pub mod config;
pub mod damage;
pub mod error;
pub mod material;
pub mod parser;
pub mod rainflow;
pub mod timeseries;
pub mod turning_points;

pub use damage::{accumulate, compute_segment_damage, damage_for_cycles, estimate_life, CumulativeDamage};
pub use error::FatigueError;
pub use material::SnCurve;
pub use rainflow::{extract_cycles, Cycle};

// When the "wasm" feature is enabled, use wasm_bindgen to expose functions to the host environment.
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub fn run_rainflow(stress: &[f64]) -> Result<Vec<f64>, JsValue> {
    let cycles = rainflow::extract_cycles(stress).map_err(|e| JsValue::from_str(&e.to_string()))?;
    // Amplitudes first, then the matching weights.
    Ok(cycles
        .iter()
        .map(|c| c.amplitude)
        .chain(cycles.iter().map(|c| c.weight))
        .collect())
}

#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub fn segment_damage(stress: &[f64], m: f64, s_ref: f64, n_ref: f64) -> Result<f64, JsValue> {
    let to_js = |e: FatigueError| JsValue::from_str(&e.to_string());
    let curve = SnCurve::new(m, s_ref, n_ref).map_err(to_js)?;
    damage::compute_segment_damage(stress, &curve).map_err(to_js)
}
