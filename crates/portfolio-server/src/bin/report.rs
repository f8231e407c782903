//! portfolio-report
//!
//! One-shot dashboard: fetch holdings for `TARGET_WALLET`, print the text
//! report and write it to `REPORT_PATH`. A failed fetch still produces a
//! report; only configuration and file errors end the process with an error.

use anyhow::Context;

use portfolio_core::{DashboardReport, DominanceSeries, ServiceConfig};
use portfolio_server::{init_tracing, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServiceConfig::from_env()?;
    let state = AppState::from_config(&config);

    let outcome = state.fetcher.fetch_outcome(&config.target_wallet, None).await;

    tracing::info!("[STRATEGY] Generating market efficiency models...");
    let market = DominanceSeries::simulate_today();

    tracing::info!("[VIZ] Rendering dashboard...");
    let report = DashboardReport::new(config.target_wallet.as_str(), outcome, market);
    let text = report.render_text();

    println!("{text}");

    tokio::fs::write(&config.report_path, &text)
        .await
        .with_context(|| format!("writing report to {}", config.report_path))?;

    tracing::info!("[SUCCESS] Dashboard generated: {}", config.report_path);

    Ok(())
}
