//! # Antenna Far-Field Pattern Engine
//!
//! This crate computes far-field radiation patterns of center-fed dipoles and
//! uniform linear arrays of dipoles.
//!
//! ## Overview
//!
//! Given an element length `l`, element spacing `d`, progressive phase shift
//! `Δφ` and element count `N` (lengths in wavelengths, phase in radians), the
//! engine produces:
//!
//! - **Element pattern**: normalised dipole field `E(θ)`
//! - **Array factor**: normalised uniform-array factor `AF(θ)`
//! - **Composite cuts**: E-plane and H-plane patterns per array topology
//! - **Directivity**: numerically integrated peak directivity `D`
//! - **Surface**: 3D magnitude and its Cartesian embedding
//!
//! ## Evaluation Flow
//!
//! ```text
//! AntennaConfig → GridPolicy grid → Element × AF → Composite (E, H) → D → D·E²
//!                                └─→ Surface mesh → magnitude → (x, y, z)
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use antviz_core::prelude::*;
//!
//! let config = AntennaConfig::builder()
//!     .topology(Topology::CollinearArray)
//!     .length(0.5)
//!     .spacing(0.5)
//!     .elements(4)
//!     .build();
//!
//! let grid = GridPolicy::default().sweep(1000)?;
//! let result = PatternEngine::new(EngineSettings::default())?.compute(&config, &grid)?;
//! println!("D = {} ({:.2} dBi)", result.directivity.display, result.directivity.dbi());
//! # Ok::<(), PatternError>(())
//! ```

pub mod array_factor;
pub mod composite;
pub mod config;
pub mod directivity;
pub mod element;
pub mod engine;
pub mod grid;
pub mod observe;
pub mod pattern;
pub mod surface;
pub mod types;

pub use composite::CompositePattern;
pub use config::{AntvizConfig, ConfigError, GridConfig};
pub use directivity::{Directivity, IntegrationRange};
pub use engine::{compute, compute_3d, EngineSettings, PatternEngine, PlanarResult};
pub use grid::{AngularGrid, AngularMesh, GridPolicy};
pub use surface::{MeshField, SurfaceResult};
pub use types::{AntennaConfig, AntennaConfigBuilder, PatternError, PatternResult, Topology};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::AntvizConfig;
    pub use crate::directivity::{Directivity, IntegrationRange};
    pub use crate::engine::{EngineSettings, PatternEngine, PlanarResult};
    pub use crate::grid::{AngularGrid, AngularMesh, GridPolicy};
    pub use crate::surface::SurfaceResult;
    pub use crate::types::{AntennaConfig, PatternError, PatternResult, Topology};
}
