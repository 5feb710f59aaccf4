//! Pattern Engine
//!
//! Pure evaluation of an [`AntennaConfig`] over a grid. Every call recomputes
//! every derived quantity from scratch; the engine keeps no state besides its
//! settings and the integration grid built from them.
//!
//! ## Evaluation order
//!
//! ```text
//!  AntennaConfig ──┬──► element pattern ──┐
//!                  │                      ├──► composite (E, H) ──► directivity ──► D·E²
//!                  └──► array factor ─────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::array_factor::array_factor;
use crate::composite::{assemble, oriented_element};
use crate::directivity::{directivity, directivity_pattern, Directivity, IntegrationRange};
use crate::grid::{AngularGrid, AngularMesh, GridPolicy};
use crate::surface::{surface, SurfaceResult};
use crate::types::{AntennaConfig, PatternResult, Topology};

/// Everything derived from one planar (2D) evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanarResult {
    pub topology: Topology,
    /// Sweep angles (radians)
    pub theta: Vec<f64>,
    /// Element pattern in the topology's orientation, unit peak
    pub element_pattern: Vec<f64>,
    /// Array factor, unit peak (all ones for a single element)
    pub array_factor: Vec<f64>,
    /// E-plane composite, unit peak
    pub composite_e: Vec<f64>,
    /// H-plane composite, unit peak
    pub composite_h: Vec<f64>,
    pub directivity: Directivity,
    /// `D · composite_e²`
    pub directivity_pattern: Vec<f64>,
}

/// Settings shared by every evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub grid: GridPolicy,
    pub integration: IntegrationRange,
}

/// Stateless pattern evaluator.
#[derive(Debug, Clone)]
pub struct PatternEngine {
    settings: EngineSettings,
    integration_grid: AngularGrid,
}

impl PatternEngine {
    /// Build an engine, constructing the integration grid once.
    pub fn new(settings: EngineSettings) -> PatternResult<Self> {
        let range = settings.integration;
        let policy = GridPolicy::new(settings.grid.pole_epsilon.max(range.pole_cutoff));
        let integration_grid = policy.polar(range.samples)?;
        Ok(Self {
            settings,
            integration_grid,
        })
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn integration_grid(&self) -> &AngularGrid {
        &self.integration_grid
    }

    /// Planar evaluation of `config` over `grid`.
    pub fn compute(&self, config: &AntennaConfig, grid: &AngularGrid) -> PatternResult<PlanarResult> {
        config.validate()?;
        let theta = grid.as_slice();

        let element_pattern = oriented_element(config, theta);
        let array_factor = array_factor(config.spacing, config.phase_offset, config.elements, theta);
        let composite = assemble(config.topology, &element_pattern, &array_factor);

        let directivity = directivity(config, &self.integration_grid, &self.settings.integration)?;
        let directivity_pattern = directivity_pattern(&composite.e_plane, &directivity);

        debug_assert!(
            directivity_pattern.iter().all(|v| v.is_finite()),
            "non-finite directivity pattern for {:?}",
            config
        );
        tracing::debug!(
            topology = %config.topology,
            length = config.length,
            spacing = config.spacing,
            phase_offset = config.phase_offset,
            elements = config.elements,
            directivity = directivity.display,
            samples = theta.len(),
            "planar pattern computed"
        );

        Ok(PlanarResult {
            topology: config.topology,
            theta: theta.to_vec(),
            element_pattern,
            array_factor,
            composite_e: composite.e_plane,
            composite_h: composite.h_plane,
            directivity,
            directivity_pattern,
        })
    }

    /// Surface evaluation of `config` over `mesh`.
    pub fn compute_3d(&self, config: &AntennaConfig, mesh: &AngularMesh) -> PatternResult<SurfaceResult> {
        config.validate()?;
        let result = surface(config, mesh);
        let (rows, cols) = mesh.dims();
        tracing::debug!(
            topology = %config.topology,
            elements = config.elements,
            rows,
            cols,
            "surface pattern computed"
        );
        Ok(result)
    }
}

/// Planar evaluation with default engine settings.
pub fn compute(config: &AntennaConfig, grid: &AngularGrid) -> PatternResult<PlanarResult> {
    PatternEngine::new(EngineSettings::default())?.compute(config, grid)
}

/// Surface evaluation with default engine settings.
pub fn compute_3d(config: &AntennaConfig, mesh: &AngularMesh) -> PatternResult<SurfaceResult> {
    PatternEngine::new(EngineSettings::default())?.compute_3d(config, mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{argmax, peak};
    use crate::types::{PatternError, MIN_SPACING};
    use std::f64::consts::FRAC_PI_2;

    const TOL: f64 = 1e-9;

    fn engine() -> PatternEngine {
        PatternEngine::new(EngineSettings::default()).unwrap()
    }

    fn sweep() -> AngularGrid {
        GridPolicy::default().sweep(1000).unwrap()
    }

    #[test]
    fn test_half_wave_dipole_scenario() {
        let cfg = AntennaConfig::builder()
            .topology(Topology::SingleDipole)
            .length(0.5)
            .elements(1)
            .build();
        let grid = sweep();
        let r = engine().compute(&cfg, &grid).unwrap();

        assert_eq!(r.theta.len(), 1000);
        let i = argmax(&r.element_pattern).unwrap();
        assert!((r.theta[i].abs() - FRAC_PI_2).abs() < 0.01);
        assert!(r.element_pattern[0] < 1e-5);
        assert!(r.element_pattern[999] < 1e-5);
        assert_eq!(r.directivity.display, 1.64);
        assert!(r.array_factor.iter().all(|&v| v == 1.0));
        assert!(r.composite_h.iter().all(|&v| v == 1.0));
        assert!((peak(&r.directivity_pattern) - r.directivity.value).abs() < TOL);
    }

    #[test]
    fn test_results_bounded() {
        let grid = sweep();
        let e = engine();
        for topology in Topology::ALL {
            for n in [1, 2, 5] {
                let cfg = AntennaConfig::builder()
                    .topology(topology)
                    .length(1.2)
                    .spacing(0.6)
                    .phase_offset(1.0)
                    .elements(n)
                    .build();
                let r = e.compute(&cfg, &grid).unwrap();
                for v in [&r.element_pattern, &r.array_factor, &r.composite_e, &r.composite_h] {
                    assert!(v.iter().all(|&x| (0.0..=1.0 + TOL).contains(&x)));
                    assert!((peak(v) - 1.0).abs() < TOL, "{topology} N={n}");
                }
                assert!(r.directivity.value > 0.0);
            }
        }
    }

    #[test]
    fn test_compute_is_repeatable() {
        let cfg = AntennaConfig::builder()
            .topology(Topology::PerpendicularArray)
            .length(0.8)
            .spacing(0.3)
            .phase_offset(-0.5)
            .elements(7)
            .build();
        let grid = sweep();
        let e = engine();
        let a = e.compute(&cfg, &grid).unwrap();
        let b = e.compute(&cfg, &grid).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let grid = sweep();
        let cfg = AntennaConfig::builder().length(0.0).build();
        assert_eq!(
            engine().compute(&cfg, &grid),
            Err(PatternError::DegenerateLength(0.0))
        );
        let cfg = AntennaConfig::builder().spacing(0.0).build();
        assert!(engine().compute_3d(&cfg, &GridPolicy::default().mesh(10, 10).unwrap()).is_err());
    }

    #[test]
    fn test_vanishing_spacing_approaches_single_element() {
        let grid = sweep();
        let cfg = AntennaConfig::builder()
            .topology(Topology::CollinearArray)
            .spacing(MIN_SPACING)
            .elements(8)
            .build();
        let r = engine().compute(&cfg, &grid).unwrap();
        assert!(r.array_factor.iter().all(|&v| v > 0.999));
        assert_eq!(r.directivity.display, 1.64);
    }

    #[test]
    fn test_free_functions() {
        let grid = sweep();
        let r = compute(&AntennaConfig::default(), &grid).unwrap();
        assert_eq!(r.directivity.display, 1.64);

        let mesh = GridPolicy::default().mesh(20, 30).unwrap();
        let s = compute_3d(&AntennaConfig::default(), &mesh).unwrap();
        assert_eq!(s.magnitude.dims(), (20, 30));
    }

    #[test]
    fn test_bad_integration_settings() {
        let settings = EngineSettings {
            integration: IntegrationRange {
                samples: 1,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            PatternEngine::new(settings),
            Err(PatternError::GridTooSmall { .. })
        ));
    }
}
