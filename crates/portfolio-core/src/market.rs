//! Simulated DEX Market Data
//!
//! Stand-in for the Uniswap V3 vs V2 daily volume that
//! [`DOMINANCE_QUERY`] would return: V3 climbs from $50M to $95M while V2
//! shrinks from $40M to $5M over 30 days, each day jittered ±10%.

use chrono::{Duration, NaiveDate, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Days in a simulated series
pub const SERIES_DAYS: u32 = 30;

/// Query the simulated series stands in for. Shown for reference only,
/// never executed.
pub const DOMINANCE_QUERY: &str = r"SELECT date_trunc('day', block_time) as date,
       version,
       sum(amount_usd) as volume
FROM dex.trades
WHERE project = 'uniswap'
AND token_bought_address = from_hex('a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48')
GROUP BY 1, 2";

const MILLION: Decimal = dec!(1_000_000);

/// One day of V3 and V2 volume in USD
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DominancePoint {
    pub date: NaiveDate,
    pub v3_volume: Decimal,
    pub v2_volume: Decimal,
}

/// Daily V3/V2 volume, oldest first
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DominanceSeries {
    pub points: Vec<DominancePoint>,
}

impl DominanceSeries {
    /// Simulate [`SERIES_DAYS`] days ending at `end` (inclusive)
    pub fn simulate<R: Rng>(end: NaiveDate, rng: &mut R) -> Self {
        let last = SERIES_DAYS - 1;
        let points = (0..SERIES_DAYS)
            .map(|day| {
                let date = end - Duration::days(i64::from(last - day));
                let v3 = linspace(dec!(50), dec!(95), day, last) * MILLION;
                let v2 = linspace(dec!(40), dec!(5), day, last) * MILLION;

                DominancePoint {
                    date,
                    v3_volume: (v3 * jitter(rng)).round_dp(2),
                    v2_volume: (v2 * jitter(rng)).round_dp(2),
                }
            })
            .collect();

        Self { points }
    }

    /// Simulate the 30 days ending today (UTC)
    pub fn simulate_today() -> Self {
        Self::simulate(Utc::now().date_naive(), &mut rand::rng())
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn latest(&self) -> Option<&DominancePoint> {
        self.points.last()
    }

    /// V3 share of combined volume on the latest day, in percent
    pub fn v3_share(&self) -> Option<Decimal> {
        let point = self.latest()?;
        let total = point.v3_volume + point.v2_volume;
        if total == Decimal::ZERO {
            return None;
        }
        Some((point.v3_volume / total * dec!(100)).round_dp(1))
    }
}

fn linspace(start: Decimal, stop: Decimal, step: u32, last: u32) -> Decimal {
    if last == 0 {
        return start;
    }
    start + (stop - start) * Decimal::from(step) / Decimal::from(last)
}

/// Uniform factor in [0.9, 1.1)
fn jitter<R: Rng>(rng: &mut R) -> Decimal {
    let factor: f64 = rng.random_range(0.9..1.1);
    Decimal::from_f64_retain(factor).unwrap_or(Decimal::ONE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn end() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn test_series_dates() {
        let series = DominanceSeries::simulate(end(), &mut StdRng::seed_from_u64(7));

        assert_eq!(series.len(), 30);
        assert_eq!(series.points[0].date, NaiveDate::from_ymd_opt(2024, 2, 15).unwrap());
        assert_eq!(series.latest().unwrap().date, end());
        assert!(series.points.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn test_series_within_jitter_band() {
        let series = DominanceSeries::simulate(end(), &mut StdRng::seed_from_u64(42));

        let first = &series.points[0];
        assert!(first.v3_volume >= dec!(45_000_000) && first.v3_volume <= dec!(55_000_000));
        assert!(first.v2_volume >= dec!(36_000_000) && first.v2_volume <= dec!(44_000_000));

        let last = series.latest().unwrap();
        assert!(last.v3_volume >= dec!(85_500_000) && last.v3_volume <= dec!(104_500_000));
        assert!(last.v2_volume >= dec!(4_500_000) && last.v2_volume <= dec!(5_500_000));
        assert!(series.v3_share().unwrap() > dec!(90));
    }

    #[test]
    fn test_seeded_series_reproducible() {
        let a = DominanceSeries::simulate(end(), &mut StdRng::seed_from_u64(1));
        let b = DominanceSeries::simulate(end(), &mut StdRng::seed_from_u64(1));
        assert_eq!(a, b);
    }

    #[test]
    fn test_linspace_endpoints() {
        assert_eq!(linspace(dec!(40), dec!(5), 0, 29), dec!(40));
        assert_eq!(linspace(dec!(40), dec!(5), 29, 29), dec!(5));
    }

    #[test]
    fn test_query_targets_usdc() {
        assert!(DOMINANCE_QUERY.contains("dex.trades"));
        assert!(DOMINANCE_QUERY.contains("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"));
    }
}
