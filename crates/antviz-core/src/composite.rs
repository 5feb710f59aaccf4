//! Composite Pattern Assembler
//!
//! Combines the element pattern and the array factor into the two principal
//! plane cuts according to the array topology:
//!
//! | Topology                | E-plane                 | H-plane      |
//! |-------------------------|-------------------------|--------------|
//! | `SingleDipole`          | element                 | uniform      |
//! | `ArrayNoElementPattern` | array factor            | array factor |
//! | `CollinearArray`        | element × array factor  | uniform      |
//! | `PerpendicularArray`    | element(θ − π/2) × AF   | array factor |
//!
//! Both planes are renormalised to a unit peak after combination.

use serde::{Deserialize, Serialize};

use crate::array_factor::array_factor;
use crate::element::{element_pattern, element_pattern_rotated};
use crate::pattern::{normalize_peak, product};
use crate::types::{AntennaConfig, Topology};

/// E-plane and H-plane cuts of the full array pattern, each with unit peak.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositePattern {
    pub e_plane: Vec<f64>,
    pub h_plane: Vec<f64>,
}

/// Element pattern in the orientation `topology` places it.
///
/// The perpendicular array evaluates the dipole on `θ − π/2`; every other
/// topology, including the isotropic array that ignores it, uses the
/// upright dipole.
pub fn oriented_element(config: &AntennaConfig, theta: &[f64]) -> Vec<f64> {
    match config.topology {
        Topology::PerpendicularArray => element_pattern_rotated(config.length, theta),
        Topology::SingleDipole | Topology::ArrayNoElementPattern | Topology::CollinearArray => {
            element_pattern(config.length, theta)
        }
    }
}

/// Combine already evaluated, equally sampled patterns.
pub fn assemble(topology: Topology, element: &[f64], array: &[f64]) -> CompositePattern {
    let uniform = || vec![1.0; element.len()];
    let (mut e_plane, mut h_plane) = match topology {
        Topology::SingleDipole => (element.to_vec(), uniform()),
        Topology::ArrayNoElementPattern => (array.to_vec(), array.to_vec()),
        Topology::CollinearArray => (product(element, array), uniform()),
        Topology::PerpendicularArray => (product(element, array), array.to_vec()),
    };
    normalize_peak(&mut e_plane);
    normalize_peak(&mut h_plane);
    CompositePattern { e_plane, h_plane }
}

/// E-plane cut only, evaluated from scratch.
///
/// Used to sample the pattern on grids other than the display sweep, such
/// as the directivity integration grid.
pub fn e_plane(config: &AntennaConfig, theta: &[f64]) -> Vec<f64> {
    let mut out = match config.topology {
        Topology::SingleDipole => element_pattern(config.length, theta),
        Topology::ArrayNoElementPattern => {
            array_factor(config.spacing, config.phase_offset, config.elements, theta)
        }
        Topology::CollinearArray | Topology::PerpendicularArray => {
            let element = oriented_element(config, theta);
            let array = array_factor(config.spacing, config.phase_offset, config.elements, theta);
            product(&element, &array)
        }
    };
    normalize_peak(&mut out);
    out
}
