/// Calculate Simple Moving Average over a trailing window
///
/// # Arguments
/// * `prices` - Slice of prices, NaN marks a missing observation
/// * `period` - Window length
///
/// # Returns
/// Vector of Option<f64>, None for the first `period - 1` values and for
/// any window that contains a NaN
pub fn calculate_sma(prices: &[f64], period: usize) -> Vec<Option<f64>> {
    let n = prices.len();
    let mut sma = vec![None; n];

    if n < period || period == 0 {
        return sma;
    }

    // Compensated running sum of the valid values in the window
    let mut sum = WindowSum::default();
    let mut missing = 0usize;

    for i in 0..n {
        let entering = prices[i];
        if entering.is_nan() {
            missing += 1;
        } else {
            sum.add(entering);
        }

        if i >= period {
            let leaving = prices[i - period];
            if leaving.is_nan() {
                missing -= 1;
            } else {
                sum.add(-leaving);
            }
        }

        if i + 1 >= period && missing == 0 {
            sma[i] = Some(sum.value() / period as f64);
        }
    }

    sma
}

/// Neumaier-compensated sum, so a large value leaving the window does not
/// take the low-order bits of the remaining values with it
#[derive(Debug, Default)]
struct WindowSum {
    sum: f64,
    compensation: f64,
}

impl WindowSum {
    fn add(&mut self, value: f64) {
        let total = self.sum + value;
        if self.sum.abs() >= value.abs() {
            self.compensation += (self.sum - total) + value;
        } else {
            self.compensation += (value - total) + self.sum;
        }
        self.sum = total;
    }

    fn value(&self) -> f64 {
        self.sum + self.compensation
    }
}
