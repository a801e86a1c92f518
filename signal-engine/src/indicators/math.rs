/// First difference, `out[0]` is NaN since it has no prior value
pub fn price_diff(values: &[f64]) -> Vec<f64> {
    let mut diff = Vec::with_capacity(values.len());
    if values.is_empty() {
        return diff;
    }

    diff.push(f64::NAN);
    diff.extend(values.windows(2).map(|w| w[1] - w[0]));
    diff
}

/// Round to `decimals` digits, ties to even
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round_ties_even() / scale
}
