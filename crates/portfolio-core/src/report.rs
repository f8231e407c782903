//! Dashboard Report
//!
//! Bundles holdings, market trend and recommendations for one address,
//! serializable for the JSON API and renderable as a plain-text dashboard.

use std::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::market::{DOMINANCE_QUERY, DominanceSeries};
use crate::model::{FetchOutcome, FetchResult, OutcomeKind};
use crate::strategy::{Recommendation, recommendations};

/// Rows shown in the holdings table
pub const HOLDINGS_ROWS: usize = 5;

/// Days between rows of the trend table
const TREND_STEP: usize = 5;

const WIDTH: usize = 64;

/// Everything a dashboard shows for one address
#[derive(Clone, Debug, Serialize)]
pub struct DashboardReport {
    pub address: String,
    pub outcome: OutcomeKind,
    pub balances: FetchResult,
    pub market: DominanceSeries,
    pub recommendations: Vec<Recommendation>,
    pub query: &'static str,
}

impl DashboardReport {
    pub fn new(address: impl Into<String>, outcome: FetchOutcome, market: DominanceSeries) -> Self {
        Self {
            address: address.into(),
            outcome: outcome.kind(),
            balances: outcome.into_result(),
            market,
            recommendations: recommendations(),
            query: DOMINANCE_QUERY,
        }
    }

    /// Render as a fixed-width text dashboard
    pub fn render_text(&self) -> String {
        self.to_string()
    }

    fn write_holdings(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Live Wallet Holdings")?;
        writeln!(f, "{}", "─".repeat(WIDTH))?;

        if self.balances.is_empty() {
            return writeln!(f, "⚠ No balance data found for this address.\n");
        }

        writeln!(f, "{:<8} {:>32} {:>20}", "Asset", "Balance", "Est. Value (USD)")?;
        for record in self.balances.head(HOLDINGS_ROWS) {
            let amount = record
                .decimals
                .map_or_else(|| record.amount.clone(), |d| record.display_amount(d));
            let value = record
                .value_usd
                .map_or_else(|| "-".to_string(), format_usd);
            writeln!(f, "{:<8} {:>32} {:>20}", record.symbol, amount, value)?;
        }

        let hidden = self.balances.len().saturating_sub(HOLDINGS_ROWS);
        if hidden > 0 {
            writeln!(f, "  … {hidden} more")?;
        }

        let total = self.balances.total_value_usd();
        if total > Decimal::ZERO {
            writeln!(f, "{:<8} {:>32} {:>20}", "Total", "", format_usd(total))?;
        }
        writeln!(f)
    }

    fn write_recommendations(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Strategic Recommendations")?;
        writeln!(f, "{}", "─".repeat(WIDTH))?;

        for (i, rec) in self.recommendations.iter().enumerate() {
            writeln!(f, "{}. {}:", i + 1, rec.title)?;
            writeln!(f, "   Observation: {}", rec.observation)?;
            writeln!(f, "   Rec: {}", rec.recommendation)?;
        }
        writeln!(f)
    }

    fn write_trend(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Market Efficiency Trend: The Case for V3 Migration")?;
        writeln!(f, "{}", "─".repeat(WIDTH))?;

        if self.market.is_empty() {
            return writeln!(f, "No market data.\n");
        }

        writeln!(f, "{:<6} {:>8} {:>8}  V3 volume", "Date", "V3", "V2")?;
        let last = self.market.len() - 1;
        for (i, point) in self.market.points.iter().enumerate() {
            if i % TREND_STEP != 0 && i != last {
                continue;
            }
            let bar_len = (point.v3_volume / dec!(5_000_000))
                .to_usize()
                .unwrap_or(0)
                .min(20);
            writeln!(
                f,
                "{:<6} {:>8} {:>8}  {}",
                point.date.format("%m-%d").to_string(),
                format_millions(point.v3_volume),
                format_millions(point.v2_volume),
                "█".repeat(bar_len)
            )?;
        }

        if let Some(share) = self.market.v3_share() {
            writeln!(f, "V3 share of latest volume: {share}%")?;
        }
        writeln!(f)
    }
}

impl fmt::Display for DashboardReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Strategic Liquidity & Portfolio Analysis")?;
        writeln!(f, "{}", "═".repeat(WIDTH))?;
        writeln!(f, "Wallet: {}", self.address)?;
        writeln!(f, "Source: {}\n", self.outcome.label())?;

        self.write_holdings(f)?;
        self.write_recommendations(f)?;
        self.write_trend(f)?;

        writeln!(f, "Underlying SQL Strategy Query")?;
        writeln!(f, "{}", "─".repeat(WIDTH))?;
        writeln!(f, "{}", self.query)
    }
}

/// `$1,250,000`
fn format_usd(value: Decimal) -> String {
    let rounded = value.round_dp(0).to_string();
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rounded.as_str()),
    };
    format!("{sign}${}", group_thousands(digits))
}

/// `$95M`
fn format_millions(value: Decimal) -> String {
    format!("${}M", (value / dec!(1_000_000)).round_dp(0))
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BalanceRecord, fallback_balances};
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn market() -> DominanceSeries {
        let end = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        DominanceSeries::simulate(end, &mut StdRng::seed_from_u64(3))
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(dec!(1250000)), "$1,250,000");
        assert_eq!(format_usd(dec!(42000)), "$42,000");
        assert_eq!(format_usd(dec!(999)), "$999");
        assert_eq!(format_usd(dec!(-1500.4)), "-$1,500");
    }

    #[test]
    fn test_format_millions() {
        assert_eq!(format_millions(dec!(95000000)), "$95M");
        assert_eq!(format_millions(dec!(4600000)), "$5M");
    }

    #[test]
    fn test_fallback_report() {
        let outcome = FetchOutcome::FallbackRemoteError { status: 500, body: String::new() };
        let report = DashboardReport::new("0xabc", outcome, market());
        let text = report.render_text();

        assert_eq!(report.outcome, OutcomeKind::FallbackRemoteError);
        assert_eq!(report.balances, fallback_balances());
        assert!(text.contains("demo data"));
        assert!(text.contains("450000000000000000000"));
        assert!(text.contains("$1,250,000"));
        assert!(text.contains("$1,342,000"));
        assert!(text.contains("LIQUIDITY MIGRATION"));
        assert!(text.contains("dex.trades"));
    }

    #[test]
    fn test_empty_report_warns() {
        let outcome = FetchOutcome::EmptyTransportError { reason: "refused".into() };
        let text = DashboardReport::new("0xabc", outcome, market()).render_text();

        assert!(text.contains("No balance data found"));
        assert!(text.contains("unreachable"));
    }

    #[test]
    fn test_holdings_table_truncates() {
        let records = (0..7)
            .map(|i| BalanceRecord::new(format!("T{i}"), "1"))
            .collect();
        let outcome = FetchOutcome::Records(FetchResult::new(records));
        let text = DashboardReport::new("0xabc", outcome, market()).render_text();

        assert!(text.contains("T4"));
        assert!(!text.contains("T5"));
        assert!(text.contains("2 more"));
    }

    #[test]
    fn test_holdings_scaled_by_decimals() {
        let mut usdc = BalanceRecord::new("USDC", "2500000").with_value_usd(dec!(2.5));
        usdc.decimals = Some(6);
        let raw = BalanceRecord::new("ETH", "450000000000000000000");

        let outcome = FetchOutcome::Records(FetchResult::new(vec![usdc, raw]));
        let text = DashboardReport::new("0xabc", outcome, market()).render_text();

        let usdc_row = text.lines().find(|l| l.starts_with("USDC")).unwrap();
        assert!(usdc_row.contains(" 2.5 "), "{usdc_row}");
        assert!(!usdc_row.contains("2500000"));

        let eth_row = text.lines().find(|l| l.starts_with("ETH")).unwrap();
        assert!(eth_row.contains("450000000000000000000"));
    }

    #[test]
    fn test_render_text_matches_display() {
        let report = DashboardReport::new("0xabc", FetchOutcome::EmptyNoSchema, market());
        assert_eq!(report.render_text(), format!("{report}"));
        assert!(report.render_text().ends_with('\n'));
    }

    #[test]
    fn test_trend_rows() {
        let text = DashboardReport::new("0xabc", FetchOutcome::EmptyNoSchema, market()).render_text();
        for date in ["02-15", "02-20", "03-11", "03-15"] {
            assert!(text.contains(date), "missing {date}");
        }
        assert!(!text.contains("02-16"));
    }
}
