//! Antenna Parameters and Error Types
//!
//! This module defines the parameter set that drives every pattern
//! computation, the array topologies the engine understands, and the error
//! taxonomy for configurations the engine refuses to evaluate.
//!
//! ## Parameters
//!
//! | Symbol | Field          | Unit              | Valid range |
//! |--------|----------------|-------------------|-------------|
//! | `l`    | `length`       | wavelengths       | `(0, 1e6]`  |
//! | `d`    | `spacing`      | wavelengths       | `(0, 1e6]`  |
//! | `Δφ`   | `phase_offset` | radians           | `[-1e6, 1e6]` |
//! | `N`    | `elements`     | count             | `≥ 1`       |
//!
//! Invalid configurations are never evaluated. Callers either check them
//! with [`AntennaConfig::validate`] or move them to the nearest valid value
//! with [`AntennaConfig::clamped`] before invoking the engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Smallest element length the engine accepts (wavelengths).
pub const MIN_LENGTH: f64 = 1e-7;

/// Smallest element spacing the engine accepts (wavelengths).
pub const MIN_SPACING: f64 = 1e-7;

/// Largest element length the engine accepts (wavelengths).
///
/// Keeps `l·π` and the phase arguments derived from it far from overflow.
pub const MAX_LENGTH: f64 = 1e6;

/// Largest element spacing the engine accepts (wavelengths).
pub const MAX_SPACING: f64 = 1e6;

/// Largest excitation phase step magnitude the engine accepts (radians).
pub const MAX_PHASE_OFFSET: f64 = 1e6;

/// Result type for pattern engine operations
pub type PatternResult<T> = Result<T, PatternError>;

/// Configuration-validity errors.
///
/// None of these is a runtime condition: each one marks a configuration the
/// caller should have clamped or a grid that should have been built through
/// [`GridPolicy`](crate::grid::GridPolicy).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PatternError {
    #[error("Degenerate element length: {0}. Must be strictly positive")]
    DegenerateLength(f64),

    #[error("Degenerate element spacing: {0}. Must be strictly positive")]
    DegenerateSpacing(f64),

    #[error("Array must contain at least one element")]
    NoElements,

    #[error("Parameter '{name}' is not a finite number")]
    NonFiniteParameter { name: &'static str },

    #[error("Parameter '{name}' = {value} exceeds its bound {max}")]
    ParameterTooLarge {
        name: &'static str,
        value: f64,
        max: f64,
    },

    #[error("Singular grid sample at index {index}: {angle} rad lies on a pattern pole")]
    SingularGridSample { index: usize, angle: f64 },

    #[error("Grid too small: need at least {required} samples, got {actual}")]
    GridTooSmall { required: usize, actual: usize },

    #[error("Unstable integration range: cutoff {cutoff} rad leaves {samples} usable samples")]
    IntegrationRangeInstability { cutoff: f64, samples: usize },
}

/// Array arrangement selecting how element pattern and array factor combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    /// One center-fed dipole, no array.
    SingleDipole,
    /// Array of isotropic radiators (array factor only).
    ArrayNoElementPattern,
    /// Dipoles lying along the array axis.
    CollinearArray,
    /// Dipoles standing perpendicular to the array axis.
    PerpendicularArray,
}

impl Topology {
    pub const ALL: [Topology; 4] = [
        Topology::SingleDipole,
        Topology::ArrayNoElementPattern,
        Topology::CollinearArray,
        Topology::PerpendicularArray,
    ];

    /// Whether the array factor contributes to this topology.
    pub fn is_array(&self) -> bool {
        !matches!(self, Topology::SingleDipole)
    }

    /// Whether the dipole element pattern contributes to this topology.
    pub fn uses_element(&self) -> bool {
        !matches!(self, Topology::ArrayNoElementPattern)
    }
}

impl Default for Topology {
    fn default() -> Self {
        Topology::SingleDipole
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Topology::SingleDipole => "single",
            Topology::ArrayNoElementPattern => "array",
            Topology::CollinearArray => "collinear",
            Topology::PerpendicularArray => "perpendicular",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Topology {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "single" | "single_dipole" | "dipole" => Ok(Topology::SingleDipole),
            "array" | "array_no_element_pattern" | "isotropic" => {
                Ok(Topology::ArrayNoElementPattern)
            }
            "collinear" | "collinear_array" => Ok(Topology::CollinearArray),
            "perpendicular" | "perpendicular_array" => Ok(Topology::PerpendicularArray),
            other => Err(format!(
                "unknown topology '{}' (expected single, array, collinear or perpendicular)",
                other
            )),
        }
    }
}

/// Complete antenna parameter set.
///
/// Owned by whoever holds the parameter state; the engine only reads it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AntennaConfig {
    /// Array arrangement
    pub topology: Topology,
    /// Element length in wavelengths (`l`)
    pub length: f64,
    /// Inter-element spacing in wavelengths (`d`)
    pub spacing: f64,
    /// Excitation phase step between neighbouring elements (`Δφ`)
    pub phase_offset: f64,
    /// Number of elements (`N`)
    pub elements: usize,
}

impl Default for AntennaConfig {
    fn default() -> Self {
        Self {
            topology: Topology::SingleDipole,
            length: 0.5,
            spacing: 0.5,
            phase_offset: 0.0,
            elements: 1,
        }
    }
}

impl AntennaConfig {
    /// Create a new builder starting from the defaults
    pub fn builder() -> AntennaConfigBuilder {
        AntennaConfigBuilder::default()
    }

    /// Check every constraint, returning the first violation.
    pub fn validate(&self) -> PatternResult<()> {
        if !self.length.is_finite() {
            return Err(PatternError::NonFiniteParameter { name: "length" });
        }
        if !self.spacing.is_finite() {
            return Err(PatternError::NonFiniteParameter { name: "spacing" });
        }
        if !self.phase_offset.is_finite() {
            return Err(PatternError::NonFiniteParameter { name: "phase_offset" });
        }
        if self.length <= 0.0 {
            return Err(PatternError::DegenerateLength(self.length));
        }
        if self.spacing <= 0.0 {
            return Err(PatternError::DegenerateSpacing(self.spacing));
        }
        if self.elements == 0 {
            return Err(PatternError::NoElements);
        }
        let bounds = [
            ("length", self.length.abs(), MAX_LENGTH),
            ("spacing", self.spacing.abs(), MAX_SPACING),
            ("phase_offset", self.phase_offset.abs(), MAX_PHASE_OFFSET),
        ];
        for (name, value, max) in bounds {
            if value > max {
                return Err(PatternError::ParameterTooLarge { name, value, max });
            }
        }
        Ok(())
    }

    /// Nearest valid configuration.
    ///
    /// Length and spacing are held in `[MIN, MAX]`, the phase in
    /// `±MAX_PHASE_OFFSET`, the element count raised to 1. A NaN length or
    /// spacing falls back to its lower bound, a non-finite phase to zero.
    pub fn clamped(&self) -> Self {
        let bound = |v: f64, min: f64, max: f64| if v.is_nan() { min } else { v.clamp(min, max) };
        Self {
            topology: self.topology,
            length: bound(self.length, MIN_LENGTH, MAX_LENGTH),
            spacing: bound(self.spacing, MIN_SPACING, MAX_SPACING),
            phase_offset: if !self.phase_offset.is_finite() {
                0.0
            } else {
                self.phase_offset.clamp(-MAX_PHASE_OFFSET, MAX_PHASE_OFFSET)
            },
            elements: self.elements.max(1),
        }
    }

    /// True when [`clamped`](Self::clamped) would change nothing.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Builder for AntennaConfig
#[derive(Default)]
pub struct AntennaConfigBuilder {
    config: AntennaConfig,
}

impl AntennaConfigBuilder {
    pub fn topology(mut self, topology: Topology) -> Self {
        self.config.topology = topology;
        self
    }

    pub fn length(mut self, length: f64) -> Self {
        self.config.length = length;
        self
    }

    pub fn spacing(mut self, spacing: f64) -> Self {
        self.config.spacing = spacing;
        self
    }

    pub fn phase_offset(mut self, phase_offset: f64) -> Self {
        self.config.phase_offset = phase_offset;
        self
    }

    pub fn elements(mut self, elements: usize) -> Self {
        self.config.elements = elements;
        self
    }

    pub fn build(self) -> AntennaConfig {
        self.config
    }
}
