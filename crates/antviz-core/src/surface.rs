//! Surface (3D) Patterns
//!
//! Evaluates the composite pattern over a polar × azimuth mesh and converts
//! each magnitude sample to a Cartesian point for surface rendering.
//!
//! ## Geometry
//!
//! ```text
//!            z (array axis, upright dipoles)
//!            │
//!            │  θ
//!            │ /
//!            │/______ y
//!           /  φ
//!          x (perpendicular dipoles)
//! ```
//!
//! Upright dipoles see the angle θ. A dipole along x sees the angle ψ with
//! `cos ψ = sin θ · cos φ`, which in the φ = 0 cut is the `θ − π/2` shift of
//! the planar evaluator. The array factor always depends on `cos θ`.

use serde::{Deserialize, Serialize};

use crate::array_factor::{array_factor_at, progressive_phase};
use crate::element::dipole_field;
use crate::grid::AngularMesh;
use crate::pattern::normalize_peak;
use crate::types::{AntennaConfig, Topology};

/// Row-major 2D field over an [`AngularMesh`] (θ rows, φ columns).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshField {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl MeshField {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] = value;
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }
}

/// Surface magnitude and its Cartesian embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceResult {
    pub theta: Vec<f64>,
    pub phi: Vec<f64>,
    /// Composite magnitude, unit peak
    pub magnitude: MeshField,
    pub x: MeshField,
    pub y: MeshField,
    pub z: MeshField,
}

/// Unnormalised composite magnitude in direction (θ, φ).
fn composite_at(config: &AntennaConfig, theta: f64, phi: f64) -> f64 {
    let (sin_t, cos_t) = theta.sin_cos();
    let element = match config.topology {
        Topology::ArrayNoElementPattern => 1.0,
        Topology::SingleDipole | Topology::CollinearArray => {
            dipole_field(config.length, cos_t, sin_t)
        }
        Topology::PerpendicularArray => {
            let (sin_p, cos_p) = phi.sin_cos();
            let cos_psi = sin_t * cos_p;
            // 1 − cos²ψ = cos²θ + sin²θ·sin²φ, summed without cancellation
            let sin_psi = (cos_t * cos_t + sin_t * sin_t * sin_p * sin_p).sqrt();
            dipole_field(config.length, cos_psi, sin_psi)
        }
    };
    let array = if config.topology.is_array() {
        array_factor_at(
            config.elements,
            progressive_phase(config.spacing, config.phase_offset, cos_t),
        )
    } else {
        1.0
    };
    element * array
}

/// Composite magnitude over `mesh`, renormalised to a unit peak.
pub fn surface_magnitude(config: &AntennaConfig, mesh: &AngularMesh) -> MeshField {
    let (rows, cols) = mesh.dims();
    let mut field = MeshField::zeros(rows, cols);
    for (i, &theta) in mesh.theta().iter().enumerate() {
        for (j, &phi) in mesh.phi().iter().enumerate() {
            field.set(i, j, composite_at(config, theta, phi));
        }
    }
    normalize_peak(field.as_mut_slice());
    field
}

/// Spherical to Cartesian: `x = r·sinθ·cosφ`, `y = r·sinθ·sinφ`, `z = r·cosθ`.
pub fn to_cartesian(magnitude: &MeshField, mesh: &AngularMesh) -> (MeshField, MeshField, MeshField) {
    let (rows, cols) = magnitude.dims();
    let mut x = MeshField::zeros(rows, cols);
    let mut y = MeshField::zeros(rows, cols);
    let mut z = MeshField::zeros(rows, cols);
    for (i, &theta) in mesh.theta().iter().enumerate() {
        let (sin_t, cos_t) = theta.sin_cos();
        for (j, &phi) in mesh.phi().iter().enumerate() {
            let (sin_p, cos_p) = phi.sin_cos();
            let r = magnitude.get(i, j);
            x.set(i, j, r * sin_t * cos_p);
            y.set(i, j, r * sin_t * sin_p);
            z.set(i, j, r * cos_t);
        }
    }
    (x, y, z)
}

/// Full surface evaluation.
pub fn surface(config: &AntennaConfig, mesh: &AngularMesh) -> SurfaceResult {
    let magnitude = surface_magnitude(config, mesh);
    let (x, y, z) = to_cartesian(&magnitude, mesh);
    SurfaceResult {
        theta: mesh.theta().as_slice().to_vec(),
        phi: mesh.phi().as_slice().to_vec(),
        magnitude,
        x,
        y,
        z,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array_factor::array_factor;
    use crate::element::element_pattern;
    use crate::grid::{AngularGrid, GridPolicy};
    use crate::pattern::peak;

    const TOL: f64 = 1e-9;

    fn mesh() -> AngularMesh {
        GridPolicy::default().mesh(60, 80).unwrap()
    }

    #[test]
    fn test_unit_peak_all_topologies() {
        let mesh = mesh();
        for topology in Topology::ALL {
            let cfg = AntennaConfig::builder()
                .topology(topology)
                .length(0.75)
                .spacing(0.4)
                .elements(3)
                .build();
            let s = surface(&cfg, &mesh);
            assert_eq!(s.magnitude.dims(), (60, 80));
            assert!((peak(s.magnitude.as_slice()) - 1.0).abs() < TOL, "{topology}");
            assert!(s.magnitude.as_slice().iter().all(|v| v.is_finite() && *v >= 0.0));
        }
    }

    #[test]
    fn test_single_dipole_is_axisymmetric() {
        let mesh = mesh();
        let s = surface(&AntennaConfig::default(), &mesh);
        for i in 0..60 {
            let row = s.magnitude.row(i);
            assert!(row.iter().all(|v| (v - row[0]).abs() < TOL), "row {i} varies with φ");
        }
        // Each row follows the planar element pattern
        let e = element_pattern(0.5, mesh.theta().as_slice());
        for i in 0..60 {
            assert!((s.magnitude.get(i, 0) - e[i]).abs() < 1e-6);
        }
    }

    #[test]
    fn test_collinear_rows_follow_planar_product() {
        let mesh = mesh();
        let cfg = AntennaConfig::builder()
            .topology(Topology::CollinearArray)
            .elements(4)
            .build();
        let s = surface(&cfg, &mesh);
        let theta = mesh.theta().as_slice();
        let e = element_pattern(0.5, theta);
        let af = array_factor(0.5, 0.0, 4, theta);
        let mut planar: Vec<f64> = e.iter().zip(&af).map(|(a, b)| a * b).collect();
        crate::pattern::normalize_peak(&mut planar);
        for i in 0..theta.len() {
            assert!((s.magnitude.get(i, 7) - planar[i]).abs() < 1e-9);
        }
    }

    #[test]
    fn test_perpendicular_element_orientation() {
        // φ columns at 0.3 and π/2 - 0.01: near φ = π/2 the x-directed
        // dipole is seen broadside from every θ
        let policy = GridPolicy::default();
        let theta = policy.polar(91).unwrap();
        let phi = AngularGrid::from_samples(
            vec![0.3, std::f64::consts::FRAC_PI_2 - 0.01, 2.0],
            &policy,
        )
        .unwrap();
        let mesh = AngularMesh::new(theta, phi);
        let cfg = AntennaConfig::builder()
            .topology(Topology::PerpendicularArray)
            .elements(1)
            .build();
        let s = surface(&cfg, &mesh);
        let col: Vec<f64> = (0..91).map(|i| s.magnitude.get(i, 1)).collect();
        let spread = peak(&col) - col.iter().copied().fold(f64::INFINITY, f64::min);
        assert!(spread < 1e-3, "broadside column spread {spread}");
        // In the φ = 0.3 cut the pattern nulls toward the x axis (θ ≈ π/2)
        let mid = s.magnitude.get(45, 0);
        assert!(mid < col[45], "{mid} should fall below broadside {}", col[45]);
    }

    #[test]
    fn test_cartesian_radius_matches_magnitude() {
        let mesh = mesh();
        let cfg = AntennaConfig::builder()
            .topology(Topology::PerpendicularArray)
            .length(1.1)
            .elements(2)
            .build();
        let s = surface(&cfg, &mesh);
        for i in (0..60).step_by(7) {
            for j in (0..80).step_by(9) {
                let r = (s.x.get(i, j).powi(2) + s.y.get(i, j).powi(2) + s.z.get(i, j).powi(2)).sqrt();
                assert!((r - s.magnitude.get(i, j)).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_perpendicular_finite_near_element_axis() {
        // Odd counts put samples ε from θ = π/2 and φ = 0, the x axis
        let mesh = GridPolicy::new(1e-8).mesh(201, 201).unwrap();
        let cfg = AntennaConfig::builder()
            .topology(Topology::PerpendicularArray)
            .elements(2)
            .build();
        let s = surface(&cfg, &mesh);
        for (name, field) in [("magnitude", &s.magnitude), ("x", &s.x), ("y", &s.y), ("z", &s.z)] {
            let bad = field.as_slice().iter().filter(|v| !v.is_finite()).count();
            assert_eq!(bad, 0, "{name}: {bad} non-finite samples");
        }
        assert!((peak(s.magnitude.as_slice()) - 1.0).abs() < TOL);
        // The element nulls along its own axis
        assert!(s.magnitude.get(100, 100) < 1e-6, "{}", s.magnitude.get(100, 100));
    }

    #[test]
    fn test_mesh_field_rows() {
        let mut f = MeshField::zeros(2, 3);
        f.set(1, 2, 4.0);
        assert_eq!(f.row(1), &[0.0, 0.0, 4.0]);
        assert_eq!(f.get(1, 2), 4.0);
        assert_eq!(f.as_slice().len(), 6);
    }
}
