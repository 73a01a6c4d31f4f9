mod analysis;
mod comfy_table;
mod errors;
mod indicators;
mod market_chart;
mod recommendation;
mod report;
mod storage_utils;

use errors::AnalysisError;
use market_chart::CoinGeckoClient;
use std::process::ExitCode;
use storage_utils::{AppConfig, AsyncStorageManager};
use tracing::debug;
use tracing_subscriber::EnvFilter;

async fn run() -> anyhow::Result<()> {
    // Config lives in storage/ next to the binary; defaults cover a missing file.
    let settings = AsyncStorageManager::new_relative("storage")?;
    let config: AppConfig = settings.load_or_default("config").await?;
    debug!(?config, "loaded configuration");

    let source = CoinGeckoClient::new(config.market.clone());
    let output = AsyncStorageManager::at(&config.output_dir);

    let outcome = analysis::run_analysis_pipeline(
        &source,
        &output,
        config.rsi_period,
        analysis::random_token,
    )
    .await?;

    debug!(path = ?outcome.path, "report location");
    println!("{}", comfy_table::summary_table(&outcome));
    println!("Analysis complete. Data saved to {}.", outcome.filename);
    println!("Recommendation: {}", outcome.analysis.recommendation);
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("dogecoin_analysis=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(status) = e.downcast_ref::<AnalysisError>().and_then(AnalysisError::status) {
                debug!(%status, "market data request rejected");
            }
            println!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
