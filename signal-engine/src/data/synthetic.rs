use chrono::{Datelike, Duration, NaiveDate, Weekday};
use common::{PricePoint, PriceSeries};
use rand::Rng;

fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).expect("valid calendar date")
}

/// Next weekday strictly after `date`
fn next_business_day(date: NaiveDate) -> NaiveDate {
    let mut next = date + Duration::days(1);
    while matches!(next.weekday(), Weekday::Sat | Weekday::Sun) {
        next += Duration::days(1);
    }
    next
}

/// Business days starting at the first weekday on or after 2020-01-01
fn business_days(count: usize) -> Vec<NaiveDate> {
    let mut dates = Vec::with_capacity(count);
    let mut date = start_date();
    while matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
        date += Duration::days(1);
    }

    for _ in 0..count {
        dates.push(date);
        date = next_business_day(date);
    }
    dates
}

fn build_series(dates: Vec<NaiveDate>, closes: Vec<f64>) -> PriceSeries {
    let points = dates
        .into_iter()
        .zip(closes)
        .map(|(date, close)| PricePoint { date, close })
        .collect();

    // Callers request at least one day and business days only move forward
    PriceSeries::new(points).expect("non-empty series with increasing dates")
}

/// Generate a random-walk daily close series for demos and testing
pub fn generate_synthetic_series(days: usize, initial_price: f64) -> PriceSeries {
    let mut rng = rand::thread_rng();
    let days = days.max(1);

    let daily_volatility = 0.015;
    let drift = 0.0003;

    let mut price = initial_price;
    let mut closes = Vec::with_capacity(days);
    for _ in 0..days {
        closes.push(price);
        let random_return: f64 = rng.gen_range(-1.0..1.0);
        price = (price * (1.0 + drift + daily_volatility * random_return)).max(0.01);
    }

    build_series(business_days(days), closes)
}

/// Deterministic linear series `start + step * i` on business days
pub fn trending_series(days: usize, start: f64, step: f64) -> PriceSeries {
    let days = days.max(1);
    let closes = (0..days).map(|i| start + step * i as f64).collect();
    build_series(business_days(days), closes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_synthetic_series() {
        let series = generate_synthetic_series(300, 50.0);

        assert_eq!(series.len(), 300);
        assert_eq!(series.closes()[0], 50.0);
        for point in series.iter() {
            assert!(point.close > 0.0);
            assert!(!matches!(point.date.weekday(), Weekday::Sat | Weekday::Sun));
        }
    }

    #[test]
    fn test_trending_series() {
        let series = trending_series(10, 100.0, 2.0);

        assert_eq!(series.len(), 10);
        assert_eq!(series.closes()[9], 118.0);
        // 2020-01-01 is a Wednesday
        assert_eq!(series.first_date(), NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(series.dates()[3], NaiveDate::from_ymd_opt(2020, 1, 6).unwrap());
    }

    #[test]
    fn test_zero_days_yields_one_point() {
        assert_eq!(trending_series(0, 1.0, 1.0).len(), 1);
    }
}
