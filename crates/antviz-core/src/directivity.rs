//! Directivity Integrator
//!
//! For a pattern `F(θ)` with unit peak and rotational symmetry about the
//! polar axis,
//!
//! ```text
//!                 2
//! D = ---------------------------
//!      ∫ F(θ)² · sin θ  dθ
//! ```
//!
//! with the integral taken over the polar range. The integral is evaluated
//! with a cumulative trapezoid rule restricted to `[cutoff, π − cutoff]`,
//! which keeps the ill-conditioned samples next to the poles out of the sum.
//! On a full `[-π, π]` sweep that restriction selects the upper half.
//!
//! | Pattern                     | D      |
//! |-----------------------------|--------|
//! | isotropic                   | 1.00   |
//! | short dipole (`l → 0`)      | 1.50   |
//! | half-wave dipole (`l = ½`)  | 1.64   |
//! | N isotropic, `d = λ/2`      | ≈ N    |

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::composite::e_plane;
use crate::grid::AngularGrid;
use crate::types::{AntennaConfig, PatternError, PatternResult};

/// Default number of samples on the integration grid.
pub const DEFAULT_INTEGRATION_SAMPLES: usize = 10_000;

/// Default number of decimals kept for display.
pub const DEFAULT_DISPLAY_PRECISION: u32 = 2;

/// Integration range settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationRange {
    /// Samples closer than this to θ = 0 or θ = π are excluded (radians)
    pub pole_cutoff: f64,
    /// Number of samples on the dedicated integration grid
    pub samples: usize,
    /// Decimal places kept in [`Directivity::display`]
    pub precision: u32,
}

impl Default for IntegrationRange {
    fn default() -> Self {
        Self {
            pole_cutoff: crate::grid::DEFAULT_POLE_EPSILON,
            samples: DEFAULT_INTEGRATION_SAMPLES,
            precision: DEFAULT_DISPLAY_PRECISION,
        }
    }
}

impl IntegrationRange {
    /// Whether `theta` lies inside `[cutoff, π − cutoff]`.
    ///
    /// Allows a few ulps of slack so grid endpoints placed exactly at the
    /// cutoff are kept.
    pub fn contains(&self, theta: f64) -> bool {
        let slack = 1e-12;
        theta >= self.pole_cutoff - slack && theta <= PI - self.pole_cutoff + slack
    }
}

/// Directivity scalar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Directivity {
    /// Unrounded `2 / I_total`
    pub value: f64,
    /// `value` rounded to the display precision
    pub display: f64,
}

impl Directivity {
    pub fn from_integral(total: f64, precision: u32) -> Self {
        let value = 2.0 / total;
        Self {
            value,
            display: round_to(value, precision),
        }
    }

    /// Directivity in dBi.
    pub fn dbi(&self) -> f64 {
        10.0 * self.value.log10()
    }
}

/// Round to `precision` decimal places.
pub fn round_to(value: f64, precision: u32) -> f64 {
    let scale = 10f64.powi(precision as i32);
    (value * scale).round() / scale
}

/// Cumulative trapezoidal integral of `y` over `x`, starting at 0.
///
/// `out[i]` is the integral from `x[0]` to `x[i]`. Only the first
/// `min(x.len(), y.len())` samples take part.
pub fn cumulative_trapezoid(y: &[f64], x: &[f64]) -> Vec<f64> {
    let n = x.len().min(y.len());
    let mut out = Vec::with_capacity(n);
    if n == 0 {
        return out;
    }
    out.push(0.0);
    let mut acc = 0.0;
    for (xs, ys) in x[..n].windows(2).zip(y[..n].windows(2)) {
        acc += 0.5 * (ys[0] + ys[1]) * (xs[1] - xs[0]);
        out.push(acc);
    }
    out
}

/// `∫ F(θ)²·sin θ dθ` over the samples inside `range`.
pub fn radiated_power(theta: &[f64], pattern: &[f64], range: &IntegrationRange) -> PatternResult<f64> {
    let (x, y): (Vec<f64>, Vec<f64>) = theta
        .iter()
        .zip(pattern)
        .filter(|(t, _)| range.contains(**t))
        .map(|(&t, &f)| (t, f * f * t.sin()))
        .unzip();
    if x.len() < 2 {
        return Err(PatternError::IntegrationRangeInstability {
            cutoff: range.pole_cutoff,
            samples: x.len(),
        });
    }
    let total = cumulative_trapezoid(&y, &x).last().copied().unwrap_or(0.0);
    if !(total.is_finite() && total > 0.0) {
        return Err(PatternError::IntegrationRangeInstability {
            cutoff: range.pole_cutoff,
            samples: x.len(),
        });
    }
    Ok(total)
}

/// Directivity of an already sampled pattern.
pub fn directivity_from_samples(
    theta: &[f64],
    pattern: &[f64],
    range: &IntegrationRange,
) -> PatternResult<Directivity> {
    let total = radiated_power(theta, pattern, range)?;
    Ok(Directivity::from_integral(total, range.precision))
}

/// Directivity of `config`, sampling its E-plane on `grid`.
pub fn directivity(
    config: &AntennaConfig,
    grid: &AngularGrid,
    range: &IntegrationRange,
) -> PatternResult<Directivity> {
    let pattern = e_plane(config, grid.as_slice());
    directivity_from_samples(grid.as_slice(), &pattern, range)
}

/// Directivity-weighted pattern `D · F²`.
pub fn directivity_pattern(pattern: &[f64], directivity: &Directivity) -> Vec<f64> {
    pattern.iter().map(|f| directivity.value * f * f).collect()
}
