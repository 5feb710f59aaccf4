//! Element Pattern Evaluator
//!
//! Far-field magnitude of a single center-fed thin-wire dipole of
//! electrical length `l` (wavelengths):
//!
//! ```text
//!         | cos(l·π·cos θ) − cos(l·π) |
//! E(θ) =  | ------------------------- |
//!         |          sin θ            |
//! ```
//!
//! normalised to a unit peak. The numerator is evaluated as
//! `2·sin(l·π·(1 + cos θ)/2)·sin(l·π·(1 − cos θ)/2)`, which is the same
//! quantity without the cancellation that destroys short dipoles.
//!
//! Samples should come from a [`GridPolicy`](crate::grid::GridPolicy) grid.
//! A sample exactly on the axis yields the limiting value 0.

use std::f64::consts::{FRAC_PI_2, PI};

use crate::pattern::normalize_peak;

/// Unnormalised field of a dipole along an axis at angle ψ from it.
///
/// Takes `cos ψ` and `sin ψ` directly so callers that already hold them
/// (the surface evaluator) avoid an `acos`.
#[inline]
pub fn dipole_field(length: f64, cos_psi: f64, sin_psi: f64) -> f64 {
    // On the axis the field vanishes for every length
    if sin_psi == 0.0 {
        return 0.0;
    }
    let half = length * PI * 0.5;
    let numerator = 2.0 * (half * (1.0 + cos_psi)).sin() * (half * (1.0 - cos_psi)).sin();
    (numerator / sin_psi).abs()
}

/// Normalised element pattern over `theta`, dipole along θ = 0.
pub fn element_pattern(length: f64, theta: &[f64]) -> Vec<f64> {
    let mut out: Vec<f64> = theta
        .iter()
        .map(|&t| dipole_field(length, t.cos(), t.sin()))
        .collect();
    normalize_peak(&mut out);
    out
}

/// Normalised element pattern of a dipole rotated by π/2, i.e. evaluated
/// on the shifted coordinate `θ − π/2`.
pub fn element_pattern_rotated(length: f64, theta: &[f64]) -> Vec<f64> {
    let mut out: Vec<f64> = theta
        .iter()
        .map(|&t| {
            let psi = t - FRAC_PI_2;
            dipole_field(length, psi.cos(), psi.sin())
        })
        .collect();
    normalize_peak(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridPolicy;
    use crate::pattern::{argmax, peak};

    const TOL: f64 = 1e-9;

    fn sweep() -> Vec<f64> {
        GridPolicy::default().sweep(1000).unwrap().as_slice().to_vec()
    }

    /// Angles of the local maxima in (0, π).
    fn lobes(theta: &[f64], pattern: &[f64]) -> Vec<(f64, f64)> {
        let pts: Vec<(f64, f64)> = theta
            .iter()
            .zip(pattern)
            .filter(|(t, _)| **t > 0.0)
            .map(|(t, p)| (*t, *p))
            .collect();
        pts.windows(3)
            .filter(|w| w[1].1 > w[0].1 && w[1].1 > w[2].1)
            .map(|w| w[1])
            .collect()
    }

    #[test]
    fn test_unit_peak_for_all_lengths() {
        let theta = sweep();
        for l in [1e-7, 0.01, 0.25, 0.5, 1.0, 1.25, 1.5, 1.75] {
            let e = element_pattern(l, &theta);
            assert!((peak(&e) - 1.0).abs() < TOL, "l={l}: peak {}", peak(&e));
            assert!(e.iter().all(|&v| (0.0..=1.0 + TOL).contains(&v)));
        }
    }

    #[test]
    fn test_half_wave_shape() {
        let theta = sweep();
        let e = element_pattern(0.5, &theta);
        let i = argmax(&e).unwrap();
        assert!(
            (theta[i].abs() - FRAC_PI_2).abs() < 0.01,
            "peak at {} rad",
            theta[i]
        );
        // Nulls at the poles
        assert!(e[0] < 1e-5, "near θ=-π: {}", e[0]);
        assert!(e[e.len() - 1] < 1e-5, "near θ=π: {}", e[e.len() - 1]);
        assert!(e[499] < 1e-2 && e[500] < 1e-2, "near θ=0");
    }

    #[test]
    fn test_short_dipole_tends_to_sin() {
        let theta = sweep();
        let e = element_pattern(1e-7, &theta);
        for (t, v) in theta.iter().zip(&e) {
            assert!(
                (v - t.sin().abs()).abs() < 1e-5,
                "θ={t}: {v} vs {}",
                t.sin().abs()
            );
        }
    }

    #[test]
    fn test_full_wave_nulls_at_poles() {
        let theta = sweep();
        let e = element_pattern(1.0, &theta);
        assert!(e[0] < 1e-5 && e[e.len() - 1] < 1e-5);
        let i = argmax(&e).unwrap();
        assert!((theta[i].abs() - FRAC_PI_2).abs() < 0.01);
    }

    #[test]
    fn test_full_wave_shape() {
        let theta = sweep();
        let e = element_pattern(1.0, &theta);
        // 1 + cos(π·cos θ) = 2·cos²(π/2·cos θ), peak 2 at broadside
        for (t, v) in theta.iter().zip(&e) {
            let expected = (FRAC_PI_2 * t.cos()).cos().powi(2) / t.sin().abs();
            assert!((v - expected).abs() < 1e-4, "θ={t}: {v} vs {expected}");
        }
        // One lobe per half plane, narrower than the half-wave lobe
        let found = lobes(&theta, &e);
        assert_eq!(found.len(), 1, "lobes: {:?}", found);
        assert!((found[0].0 - FRAC_PI_2).abs() < 0.01);

        let (t, full): (Vec<f64>, Vec<f64>) = theta
            .iter()
            .zip(&e)
            .filter(|(t, _)| **t > 0.0)
            .map(|(t, v)| (*t, *v))
            .unzip();
        let half: Vec<f64> = element_pattern(0.5, &theta)
            .into_iter()
            .zip(&theta)
            .filter(|(_, t)| **t > 0.0)
            .map(|(v, _)| v)
            .collect();
        let bw_full = crate::array_factor::half_power_beamwidth(&t, &full).unwrap();
        let bw_half = crate::array_factor::half_power_beamwidth(&t, &half).unwrap();
        assert!((bw_full - 0.834).abs() < 0.02, "full-wave HPBW {bw_full}");
        assert!((bw_half - 1.364).abs() < 0.02, "half-wave HPBW {bw_half}");
    }

    #[test]
    fn test_three_half_wave_four_main_lobes() {
        let theta = sweep();
        let e = element_pattern(1.5, &theta);
        let found = lobes(&theta, &e);
        // Two main lobes per half plane plus the minor lobe at broadside
        let main: Vec<_> = found.iter().filter(|(_, v)| *v > 0.99).collect();
        assert_eq!(main.len(), 2, "lobes: {:?}", found);
        assert!((main[0].0 - 0.745).abs() < 0.02, "lobe at {}", main[0].0);
        assert!((main[1].0 - 2.397).abs() < 0.02, "lobe at {}", main[1].0);
        let minor = found.iter().find(|(t, _)| (t - FRAC_PI_2).abs() < 0.01).unwrap();
        assert!((minor.1 - 0.715).abs() < 0.01, "broadside lobe {}", minor.1);
    }

    #[test]
    fn test_rotated_element_peaks_on_axis() {
        let theta = sweep();
        let e = element_pattern_rotated(0.5, &theta);
        assert!((peak(&e) - 1.0).abs() < TOL);
        // Broadside of the rotated element lies at θ = 0 and θ = ±π
        assert!(e[499] > 0.999 && e[0] > 0.999);
        let near_half_pi = theta
            .iter()
            .position(|&t| t > FRAC_PI_2)
            .unwrap();
        assert!(e[near_half_pi] < 1e-2, "rotated null {}", e[near_half_pi]);
    }

    #[test]
    fn test_dipole_field_symmetry() {
        // E(θ) = E(π − θ)
        for t in [0.1, 0.7, 1.3] {
            let a = dipole_field(0.8, f64::cos(t), f64::sin(t));
            let b = dipole_field(0.8, f64::cos(PI - t), f64::sin(PI - t));
            assert!((a - b).abs() < TOL);
        }
    }
}
