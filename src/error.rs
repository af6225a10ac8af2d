//! Error types for the cycle-counting and damage core.

use thiserror::Error;

/// Errors raised by the core transforms.
///
/// Zero-amplitude cycles and zero damage are not errors: the former are
/// skipped during summation, the latter maps to an infinite life.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FatigueError {
    #[error("signal sample {index} is not finite: {value}")]
    InvalidSignal { index: usize, value: f64 },

    #[error("S-N parameter `{name}` must be positive and finite, got {value}")]
    InvalidMaterialParameters { name: &'static str, value: f64 },

    #[error("units per year must be positive and finite, got {0}")]
    InvalidLifeRate(f64),
}

pub type Result<T> = std::result::Result<T, FatigueError>;
