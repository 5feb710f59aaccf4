//! Parameter Session
//!
//! Headless owner of the antenna parameter state. Every mutation clamps the
//! new value into the valid range, recomputes all derived quantities
//! synchronously and only then returns, so readers never observe a pattern
//! that disagrees with the current parameters.
//!
//! ```text
//! ┌────────────────────────────────────────────────────┐
//! │                     Session                        │
//! │                                                    │
//! │  set_length()  ──┐                                 │
//! │  set_spacing() ──┤                                 │
//! │  set_phase_…() ──┼─► clamp ─► PatternEngine ─► cache
//! │  set_element_…()─┤            (sweep, mesh)       │
//! │  toggle_…()    ──┘                                 │
//! │                                                    │
//! │  pattern() / surface() / frame() / snapshot()      │
//! └────────────────────────────────────────────────────┘
//! ```

use antviz_core::prelude::*;
use antviz_core::pattern::peak;
use serde::Serialize;

/// Which view the session keeps up to date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// Planar cuts and directivity
    #[default]
    Planar,
    /// 3D surface in addition to the planar cuts
    Surface,
}

/// Plot-ready data for the planar views.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotFrame {
    pub theta: Vec<f64>,
    /// E-plane radiation pattern, unit peak
    pub radiation: Vec<f64>,
    pub directivity_pattern: Vec<f64>,
    /// Rounded directivity shown next to the plots
    pub directivity: f64,
    /// Upper axis bound of the radiation plots
    pub radiation_bound: f64,
    /// Upper axis bound of the directivity plots, `floor(max) + 1`
    pub directivity_bound: f64,
}

/// Everything one evaluation produced, ready to serialise.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum Snapshot {
    Planar {
        antenna: AntennaConfig,
        pattern: PlanarResult,
        frame: PlotFrame,
    },
    Surface {
        antenna: AntennaConfig,
        directivity: Directivity,
        surface: SurfaceResult,
    },
}

/// Parameter state plus the outputs derived from it.
#[derive(Debug, Clone)]
pub struct Session {
    config: AntennaConfig,
    view: ViewMode,
    engine: PatternEngine,
    sweep: AngularGrid,
    mesh: AngularMesh,
    pattern: PlanarResult,
    surface: Option<SurfaceResult>,
}

impl Session {
    /// Build the grids once and run the initial evaluation.
    pub fn new(settings: &AntvizConfig) -> PatternResult<Self> {
        let policy = settings.grid.policy();
        let sweep = policy.sweep(settings.grid.sweep_samples)?;
        let mesh = policy.mesh(settings.grid.mesh_theta_samples, settings.grid.mesh_phi_samples)?;
        let engine = PatternEngine::new(settings.engine_settings())?;

        let config = settings.antenna.clamped();
        if config != settings.antenna {
            tracing::warn!(requested = ?settings.antenna, applied = ?config, "initial antenna clamped");
        }
        let pattern = engine.compute(&config, &sweep)?;

        Ok(Self {
            config,
            view: ViewMode::Planar,
            engine,
            sweep,
            mesh,
            pattern,
            surface: None,
        })
    }

    pub fn config(&self) -> &AntennaConfig {
        &self.config
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view
    }

    /// Latest planar evaluation.
    pub fn pattern(&self) -> &PlanarResult {
        &self.pattern
    }

    /// Latest surface evaluation, present in [`ViewMode::Surface`] only.
    pub fn surface(&self) -> Option<&SurfaceResult> {
        self.surface.as_ref()
    }

    pub fn set_length(&mut self, length: f64) -> PatternResult<()> {
        let next = AntennaConfig { length, ..self.config };
        self.apply("length", next)
    }

    pub fn set_spacing(&mut self, spacing: f64) -> PatternResult<()> {
        let next = AntennaConfig { spacing, ..self.config };
        self.apply("spacing", next)
    }

    pub fn set_phase_offset(&mut self, phase_offset: f64) -> PatternResult<()> {
        let next = AntennaConfig {
            phase_offset,
            ..self.config
        };
        self.apply("phase_offset", next)
    }

    pub fn set_element_count(&mut self, elements: usize) -> PatternResult<()> {
        let next = AntennaConfig {
            elements,
            ..self.config
        };
        self.apply("elements", next)
    }

    pub fn set_topology(&mut self, topology: Topology) -> PatternResult<()> {
        let next = AntennaConfig {
            topology,
            ..self.config
        };
        self.apply("topology", next)
    }

    /// Switch an array between isotropic and dipole elements.
    ///
    /// `ArrayNoElementPattern` becomes `CollinearArray` and both dipole
    /// arrays become `ArrayNoElementPattern`. A single dipole is left alone.
    pub fn toggle_element_pattern(&mut self) -> PatternResult<()> {
        let topology = match self.config.topology {
            Topology::SingleDipole => return Ok(()),
            Topology::ArrayNoElementPattern => Topology::CollinearArray,
            Topology::CollinearArray | Topology::PerpendicularArray => {
                Topology::ArrayNoElementPattern
            }
        };
        self.set_topology(topology)
    }

    /// Switch between the planar and the surface view.
    pub fn toggle_3d(&mut self) -> PatternResult<()> {
        let view = match self.view {
            ViewMode::Planar => ViewMode::Surface,
            ViewMode::Surface => ViewMode::Planar,
        };
        self.commit(self.config, view)?;
        tracing::debug!(view = ?self.view, "view toggled");
        Ok(())
    }

    /// Planar plot data with the axis bounds the views use.
    pub fn frame(&self) -> PlotFrame {
        let max = peak(&self.pattern.directivity_pattern);
        PlotFrame {
            theta: self.pattern.theta.clone(),
            radiation: self.pattern.composite_e.clone(),
            directivity_pattern: self.pattern.directivity_pattern.clone(),
            directivity: self.pattern.directivity.display,
            radiation_bound: 1.0,
            directivity_bound: max.floor() + 1.0,
        }
    }

    /// Outputs of the current view.
    pub fn snapshot(&self) -> Snapshot {
        match (self.view, &self.surface) {
            (ViewMode::Surface, Some(surface)) => Snapshot::Surface {
                antenna: self.config,
                directivity: self.pattern.directivity,
                surface: surface.clone(),
            },
            _ => Snapshot::Planar {
                antenna: self.config,
                pattern: self.pattern.clone(),
                frame: self.frame(),
            },
        }
    }

    fn apply(&mut self, parameter: &'static str, requested: AntennaConfig) -> PatternResult<()> {
        let applied = requested.clamped();
        if applied != requested {
            tracing::warn!(
                parameter,
                requested = ?requested,
                applied = ?applied,
                "parameter out of range, clamped"
            );
        }
        self.commit(applied, self.view)
    }

    /// Evaluate `config` for `view` and replace the state only on success.
    ///
    /// On error the session keeps its previous parameters and outputs.
    fn commit(&mut self, config: AntennaConfig, view: ViewMode) -> PatternResult<()> {
        let pattern = self.engine.compute(&config, &self.sweep)?;
        let surface = match view {
            ViewMode::Surface => Some(self.engine.compute_3d(&config, &self.mesh)?),
            ViewMode::Planar => None,
        };
        self.config = config;
        self.view = view;
        self.pattern = pattern;
        self.surface = surface;
        Ok(())
    }
}
