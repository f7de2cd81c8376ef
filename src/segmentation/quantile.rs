/// Quantile of an ascending slice using linear interpolation between order
/// statistics: `rank = q * (n - 1)`, interpolated between the values at
/// `floor(rank)` and `ceil(rank)`.
///
/// Returns `None` for an empty slice or a `q` outside `[0, 1]`.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }

    let rank = q * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;

    Some(lerp(sorted[lower], sorted[upper], rank - lower as f64))
}

/// Quantile of unsorted values, see [`quantile_sorted`]
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    quantile_sorted(&sorted, q)
}

// Interpolates from the nearer endpoint so that t = 0 and t = 1 are exact.
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    let diff = b - a;
    if t >= 0.5 {
        b - diff * (1.0 - t)
    } else {
        a + diff * t
    }
}
