/// Exponentially weighted moving average with span-based smoothing
///
/// # Arguments
/// * `values` - Input series, NaN marks a missing observation
/// * `span` - Smoothing span, `alpha = 2 / (span + 1)`
/// * `min_periods` - Valid observations required before a value is reported
///
/// # Returns
/// Vector of `Option<f64>`, `None` until `min_periods` valid values were seen
///
/// Uses the recursive form `avg = alpha * x + (1 - alpha) * avg`, seeded by
/// the first valid value. Missing observations still age the running
/// average: after a gap of `k` positions its weight is `(1 - alpha)^(k + 1)`
/// against `alpha` for the new value, renormalized to one.
pub fn calculate_ewm(values: &[f64], span: usize, min_periods: usize) -> Vec<Option<f64>> {
    let n = values.len();
    let mut ewm = vec![None; n];

    if n == 0 || span == 0 {
        return ewm;
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let decay = 1.0 - alpha;
    let min_periods = min_periods.max(1);

    let mut avg: Option<f64> = None;
    let mut old_weight = 1.0;
    let mut observed = 0usize;

    for (i, &x) in values.iter().enumerate() {
        match avg {
            None => {
                if !x.is_nan() {
                    avg = Some(x);
                    observed = 1;
                }
            }
            Some(prev) => {
                old_weight *= decay;
                if !x.is_nan() {
                    observed += 1;
                    // keeps constant input exact
                    if prev != x {
                        avg = Some((old_weight * prev + alpha * x) / (old_weight + alpha));
                    }
                    old_weight = 1.0;
                }
            }
        }

        if observed >= min_periods {
            ewm[i] = avg;
        }
    }

    ewm
}
