//! Scalar statistics used by the filter and correlation stages

/// Linear-interpolation quantile (Hyndman-Fan type 7).
///
/// For sorted data `x[0..n]`, `h = (n - 1) * q` and the result is
/// `x[floor(h)] + (h - floor(h)) * (x[floor(h) + 1] - x[floor(h)])`.
/// NaN values are ignored. Returns `None` for empty input or `q` outside `[0, 1]`.
pub fn quantile_linear(values: &[f64], q: f64) -> Option<f64> {
    if !(0.0..=1.0).contains(&q) {
        return None;
    }

    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(|a, b| a.total_cmp(b));

    let h = (sorted.len() - 1) as f64 * q;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    let frac = h - lo as f64;

    Some(sorted[lo] + frac * (sorted[hi] - sorted[lo]))
}

/// Pearson correlation over pairs where both values are present.
///
/// Single-pass Welford update for numerical stability. Returns `None` when
/// there are no complete pairs or either side has zero variance.
pub fn pearson<X, Y>(x: X, y: Y) -> Option<f64>
where
    X: IntoIterator<Item = Option<f64>>,
    Y: IntoIterator<Item = Option<f64>>,
{
    let mut n = 0.0;
    let mut mean_x = 0.0;
    let mut mean_y = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    let mut cov_xy = 0.0;

    for (x, y) in x.into_iter().zip(y) {
        let (Some(x), Some(y)) = (x, y) else {
            continue;
        };
        if x.is_nan() || y.is_nan() {
            continue;
        }
        n += 1.0;
        let dx = x - mean_x;
        let dy = y - mean_y;
        mean_x += dx / n;
        mean_y += dy / n;
        var_x += dx * (x - mean_x);
        var_y += dy * (y - mean_y);
        cov_xy += dx * (y - mean_y);
    }

    if n == 0.0 || var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    Some((cov_xy / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}
