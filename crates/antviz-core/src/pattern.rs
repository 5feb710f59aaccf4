//! Shared helpers for sampled magnitude patterns.

/// Largest value in a pattern, or 0 for an empty one.
pub fn peak(values: &[f64]) -> f64 {
    values.iter().copied().fold(0.0, f64::max)
}

/// Divide every sample by the pattern peak so the maximum becomes 1.
///
/// An all-zero pattern is left untouched.
pub fn normalize_peak(values: &mut [f64]) {
    let max = peak(values);
    if max > 0.0 {
        for v in values.iter_mut() {
            *v /= max;
        }
    }
}

/// Elementwise product of two equally sampled patterns.
pub fn product(a: &[f64], b: &[f64]) -> Vec<f64> {
    debug_assert_eq!(a.len(), b.len(), "pattern length mismatch");
    a.iter().zip(b).map(|(x, y)| x * y).collect()
}

/// Index of the largest sample.
pub fn argmax(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}
