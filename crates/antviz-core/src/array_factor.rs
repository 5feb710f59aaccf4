//! Array Factor Evaluator
//!
//! Interference pattern of `N` equally spaced isotropic radiators with a
//! uniform excitation phase step:
//!
//! ```text
//! σ(θ)  = 2π·d·cos θ + Δφ
//!
//!          1 | sin(N·σ/2) |
//! AF(θ) =  - | ---------- |
//!          N |  sin(σ/2)  |
//! ```
//!
//! normalised to a unit peak.
//!
//! ## Grating points
//!
//! Whenever `σ` is a multiple of 2π the closed form is `0/0`. Close to those
//! points the evaluator switches to the direct phasor sum
//! `|Σ e^{jnσ}| / N`, which is finite everywhere and equals 1 exactly at
//! them.

use num_complex::Complex64;
use std::f64::consts::PI;

use crate::pattern::normalize_peak;

/// Below this `|sin(σ/2)|` the phasor sum replaces the closed form.
pub const ARRAY_SINGULARITY_TOL: f64 = 1e-6;

/// Progressive phase `σ` between neighbouring elements for direction θ.
#[inline]
pub fn progressive_phase(spacing: f64, phase_offset: f64, cos_theta: f64) -> f64 {
    2.0 * PI * spacing * cos_theta + phase_offset
}

/// Unnormalised array factor magnitude for a given progressive phase.
pub fn array_factor_at(elements: usize, sigma: f64) -> f64 {
    if elements <= 1 {
        return 1.0;
    }
    let n = elements as f64;
    let denom = (sigma * 0.5).sin();
    if denom.abs() < ARRAY_SINGULARITY_TOL {
        return phasor_sum(elements, sigma);
    }
    ((n * sigma * 0.5).sin() / denom).abs() / n
}

/// `|Σ_{k<N} e^{jkσ}| / N` by direct summation.
pub fn phasor_sum(elements: usize, sigma: f64) -> f64 {
    let step = Complex64::from_polar(1.0, sigma);
    let mut phasor = Complex64::new(1.0, 0.0);
    let mut acc = Complex64::new(0.0, 0.0);
    for _ in 0..elements {
        acc += phasor;
        phasor *= step;
    }
    acc.norm() / elements as f64
}

/// Normalised array factor over `theta` for an array along θ = 0.
pub fn array_factor(spacing: f64, phase_offset: f64, elements: usize, theta: &[f64]) -> Vec<f64> {
    let mut out: Vec<f64> = theta
        .iter()
        .map(|&t| array_factor_at(elements, progressive_phase(spacing, phase_offset, t.cos())))
        .collect();
    normalize_peak(&mut out);
    out
}

/// Half-power beamwidth (radians) of the lobe containing the pattern peak.
///
/// Walks outward from the peak to the first samples below `1/√2` on each
/// side. Returns `None` when the lobe never drops that low inside the grid,
/// or when `theta` and `pattern` differ in length.
pub fn half_power_beamwidth(theta: &[f64], pattern: &[f64]) -> Option<f64> {
    if theta.len() != pattern.len() {
        return None;
    }
    let peak_idx = crate::pattern::argmax(pattern)?;
    let threshold = std::f64::consts::FRAC_1_SQRT_2 * pattern[peak_idx];
    let left = (0..peak_idx).rev().find(|&i| pattern[i] < threshold)?;
    let right = (peak_idx + 1..pattern.len()).find(|&i| pattern[i] < threshold)?;
    Some(theta[right] - theta[left])
}
