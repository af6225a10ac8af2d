//! A module for material properties for a blade fatigue analysis application.

use serde::{Deserialize, Serialize};

use crate::config::ValidationError;
use crate::error::{FatigueError, Result};

/// Represents a material used in the fatigue assessment.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Material {
    /// Name of the material.
    pub name: String,
    /// Stress-life curve of the material.
    pub sn_curve: SnCurve,
}

impl Material {
    /// Validates the `Material` struct.
    ///
    /// The S-N curve is checked while it is deserialized, so only the name is
    /// left to check here.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::new("material name must not be empty"));
        }
        Ok(())
    }
}

/// Raw S-N parameters as they appear in a configuration file.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SnCurveParams {
    /// Slope of the curve in log-log space.
    pub m: f64,
    /// Reference stress amplitude.
    pub s_ref: f64,
    /// Cycles to failure at `s_ref`.
    pub n_ref: f64,
}

/// Basquin power-law S-N curve, `N(S) = C / S^m` with `C = N_ref * S_ref^m`.
///
/// Only constructible through [`SnCurve::new`], so every instance holds
/// positive, finite parameters.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "SnCurveParams", into = "SnCurveParams")]
pub struct SnCurve {
    m: f64,
    s_ref: f64,
    n_ref: f64,
    c: f64,
}

impl SnCurve {
    /// Builds a curve, rejecting any parameter that is not positive and finite.
    pub fn new(m: f64, s_ref: f64, n_ref: f64) -> Result<Self> {
        for (name, value) in [("m", m), ("s_ref", s_ref), ("n_ref", n_ref)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(FatigueError::InvalidMaterialParameters { name, value });
            }
        }
        Ok(SnCurve {
            m,
            s_ref,
            n_ref,
            c: n_ref * s_ref.powf(m),
        })
    }

    /// Simplified curve for a glass-fibre blade laminate: `m = 10`,
    /// one million cycles at 50 MPa (stress in Pa).
    pub fn blade_composite() -> Self {
        SnCurve {
            m: 10.0,
            s_ref: 50e6,
            n_ref: 1e6,
            c: 1e6 * 50e6_f64.powf(10.0),
        }
    }

    pub fn slope(&self) -> f64 {
        self.m
    }

    pub fn reference_stress(&self) -> f64 {
        self.s_ref
    }

    pub fn reference_cycles(&self) -> f64 {
        self.n_ref
    }

    /// The constant `C = N_ref * S_ref^m`.
    ///
    /// May overflow to infinity for steep curves with large reference
    /// stresses; [`SnCurve::cycles_to_failure`] does not go through it.
    pub fn constant(&self) -> f64 {
        self.c
    }

    /// Cycles to failure at a stress `amplitude`.
    ///
    /// Evaluated as `N_ref * (S_ref / S)^m`, which equals `C / S^m` without
    /// forming the large intermediate powers. `amplitude` must be strictly
    /// positive; callers skip zero-amplitude cycles before getting here.
    pub fn cycles_to_failure(&self, amplitude: f64) -> f64 {
        debug_assert!(amplitude > 0.0, "amplitude must be positive, got {}", amplitude);
        self.n_ref * (self.s_ref / amplitude).powf(self.m)
    }
}

impl TryFrom<SnCurveParams> for SnCurve {
    type Error = FatigueError;

    fn try_from(params: SnCurveParams) -> Result<Self> {
        SnCurve::new(params.m, params.s_ref, params.n_ref)
    }
}

impl From<SnCurve> for SnCurveParams {
    fn from(curve: SnCurve) -> Self {
        SnCurveParams {
            m: curve.m,
            s_ref: curve.s_ref,
            n_ref: curve.n_ref,
        }
    }
}
