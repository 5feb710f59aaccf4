//! Angular Grids
//!
//! Every angle the engine evaluates comes from a grid built here. The
//! evaluators assume, without checking, that no sample sits on a pattern
//! pole; [`GridPolicy`] is the one place that guarantees it.
//!
//! ## Singular angles
//!
//! ```text
//!   k·π        sin θ = 0        element pattern pole
//!   k·π + π/2  sin(θ - π/2) = 0 pole of the rotated (perpendicular) element
//! ```
//!
//! Both families are the integer multiples of π/2. The policy keeps every
//! sample at least `pole_epsilon` away from them by nudging offending samples
//! to exactly `pole_epsilon` on their own side.

use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};

use crate::types::{PatternError, PatternResult};

/// Default distance kept between any sample and a singular angle (radians).
pub const DEFAULT_POLE_EPSILON: f64 = 1e-6;

/// Largest pole epsilon accepted; beyond this the grids lose visible lobes.
pub const MAX_POLE_EPSILON: f64 = 0.1;

/// Minimum sample count for any grid.
pub const MIN_GRID_SAMPLES: usize = 3;

/// Grid construction policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridPolicy {
    /// Minimum angular distance from a singular angle (radians)
    pub pole_epsilon: f64,
}

impl Default for GridPolicy {
    fn default() -> Self {
        Self {
            pole_epsilon: DEFAULT_POLE_EPSILON,
        }
    }
}

impl GridPolicy {
    /// Create a policy. The epsilon is clamped to `(0, MAX_POLE_EPSILON]`.
    pub fn new(pole_epsilon: f64) -> Self {
        let pole_epsilon = if pole_epsilon.is_finite() {
            pole_epsilon.clamp(f64::EPSILON, MAX_POLE_EPSILON)
        } else {
            DEFAULT_POLE_EPSILON
        };
        Self { pole_epsilon }
    }

    /// `n` samples over `[-π + ε, π − ε]` for planar (2D) patterns.
    pub fn sweep(&self, n: usize) -> PatternResult<AngularGrid> {
        let eps = self.pole_epsilon;
        self.build(-PI + eps, PI - eps, n)
    }

    /// `n` samples over `[ε, π − ε]`, the polar range used for integration.
    pub fn polar(&self, n: usize) -> PatternResult<AngularGrid> {
        let eps = self.pole_epsilon;
        self.build(eps, PI - eps, n)
    }

    /// Polar × azimuth mesh for surface patterns.
    pub fn mesh(&self, n_theta: usize, n_phi: usize) -> PatternResult<AngularMesh> {
        let theta = self.polar(n_theta)?;
        let phi = self.sweep(n_phi)?;
        Ok(AngularMesh { theta, phi })
    }

    /// Move `angle` off the nearest singular angle if it is closer than ε.
    pub fn guard(&self, angle: f64) -> f64 {
        let (pole, offset) = nearest_pole(angle);
        if offset.abs() >= self.pole_epsilon {
            return angle;
        }
        let nudged = if offset >= 0.0 {
            pole + self.pole_epsilon
        } else {
            pole - self.pole_epsilon
        };
        tracing::trace!(angle, nudged, "grid sample moved off pole");
        nudged
    }

    fn build(&self, start: f64, end: f64, n: usize) -> PatternResult<AngularGrid> {
        if n < MIN_GRID_SAMPLES {
            return Err(PatternError::GridTooSmall {
                required: MIN_GRID_SAMPLES,
                actual: n,
            });
        }
        let step = (end - start) / (n - 1) as f64;
        let samples = (0..n)
            .map(|i| self.guard(start + step * i as f64))
            .collect();
        AngularGrid::from_samples(samples, self)
    }
}

/// Nearest multiple of π/2 and the signed distance to it.
fn nearest_pole(angle: f64) -> (f64, f64) {
    let pole = (angle / FRAC_PI_2).round() * FRAC_PI_2;
    (pole, angle - pole)
}

/// Immutable, ordered 1D sequence of angle samples (radians).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AngularGrid {
    samples: Vec<f64>,
}

impl AngularGrid {
    /// Wrap caller-supplied samples, rejecting any that sit on a pole.
    ///
    /// The rejection threshold is half the policy epsilon so that samples
    /// produced by [`GridPolicy::guard`] always pass despite rounding.
    pub fn from_samples(samples: Vec<f64>, policy: &GridPolicy) -> PatternResult<Self> {
        if samples.len() < MIN_GRID_SAMPLES {
            return Err(PatternError::GridTooSmall {
                required: MIN_GRID_SAMPLES,
                actual: samples.len(),
            });
        }
        let limit = policy.pole_epsilon * 0.5;
        for (index, &angle) in samples.iter().enumerate() {
            if !angle.is_finite() || nearest_pole(angle).1.abs() < limit {
                return Err(PatternError::SingularGridSample { index, angle });
            }
        }
        Ok(Self { samples })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.samples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.samples.iter()
    }

    /// First and last sample.
    pub fn span(&self) -> (f64, f64) {
        (self.samples[0], self.samples[self.samples.len() - 1])
    }
}

impl AsRef<[f64]> for AngularGrid {
    fn as_ref(&self) -> &[f64] {
        &self.samples
    }
}

/// Polar (θ, rows) × azimuthal (φ, columns) mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AngularMesh {
    theta: AngularGrid,
    phi: AngularGrid,
}

impl AngularMesh {
    pub fn new(theta: AngularGrid, phi: AngularGrid) -> Self {
        Self { theta, phi }
    }

    pub fn theta(&self) -> &AngularGrid {
        &self.theta
    }

    pub fn phi(&self) -> &AngularGrid {
        &self.phi
    }

    /// `(rows, cols)` = `(θ samples, φ samples)`.
    pub fn dims(&self) -> (usize, usize) {
        (self.theta.len(), self.phi.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn min_pole_distance(grid: &AngularGrid) -> f64 {
        grid.iter()
            .map(|&a| nearest_pole(a).1.abs())
            .fold(f64::INFINITY, f64::min)
    }

    #[test]
    fn test_sweep_excludes_poles() {
        let policy = GridPolicy::default();
        for n in [3, 4, 5, 9, 1000, 1001] {
            let grid = policy.sweep(n).unwrap();
            assert_eq!(grid.len(), n);
            let d = min_pole_distance(&grid);
            assert!(
                d >= policy.pole_epsilon * 0.5,
                "n={n}: sample within {d} of a pole"
            );
        }
    }

    #[test]
    fn test_odd_sweep_nudges_zero() {
        // Odd counts land a sample on θ = 0 before guarding
        let policy = GridPolicy::new(1e-4);
        let grid = policy.sweep(5).unwrap();
        let mid = grid.as_slice()[2];
        assert!((mid.abs() - 1e-4).abs() < 1e-12, "mid sample {mid}");
    }

    #[test]
    fn test_sweep_span_and_order() {
        let grid = GridPolicy::default().sweep(1000).unwrap();
        let (first, last) = grid.span();
        assert!((first + PI - DEFAULT_POLE_EPSILON).abs() < 1e-12);
        assert!((last - PI + DEFAULT_POLE_EPSILON).abs() < 1e-12);
        assert!(grid.as_slice().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_polar_range() {
        let grid = GridPolicy::default().polar(10_000).unwrap();
        assert!(grid.iter().all(|&t| t > 0.0 && t < PI));
        assert!(grid.as_slice().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_from_samples_rejects_pole() {
        let policy = GridPolicy::default();
        let err = AngularGrid::from_samples(vec![-1.0, 0.0, 1.0], &policy).unwrap_err();
        assert_eq!(err, PatternError::SingularGridSample { index: 1, angle: 0.0 });

        let err = AngularGrid::from_samples(vec![0.1, FRAC_PI_2, 2.0], &policy).unwrap_err();
        assert!(matches!(err, PatternError::SingularGridSample { index: 1, .. }));

        let err = AngularGrid::from_samples(vec![0.1, f64::NAN, 2.0], &policy).unwrap_err();
        assert!(matches!(err, PatternError::SingularGridSample { index: 1, .. }));
    }

    #[test]
    fn test_too_small() {
        let policy = GridPolicy::default();
        assert_eq!(
            policy.sweep(2),
            Err(PatternError::GridTooSmall { required: 3, actual: 2 })
        );
    }

    #[test]
    fn test_policy_epsilon_clamped() {
        assert_eq!(GridPolicy::new(5.0).pole_epsilon, MAX_POLE_EPSILON);
        assert_eq!(GridPolicy::new(0.0).pole_epsilon, f64::EPSILON);
        assert_eq!(GridPolicy::new(f64::NAN).pole_epsilon, DEFAULT_POLE_EPSILON);
    }

    #[test]
    fn test_mesh_dims() {
        let mesh = GridPolicy::default().mesh(20, 40).unwrap();
        assert_eq!(mesh.dims(), (20, 40));
        assert!(mesh.theta().iter().all(|&t| t > 0.0 && t < PI));
        assert!(min_pole_distance(mesh.phi()) >= DEFAULT_POLE_EPSILON * 0.5);
    }
}
