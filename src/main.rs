use clap::Parser;
use garden_stock::core::{ConfigProvider, SystemClock};
use garden_stock::utils::logger;
use garden_stock::{AppState, CliConfig, HttpStockFetcher, ServiceConfig, StockError, StockService};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // Initialise logging
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting garden-stock");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(&cli).await {
        tracing::error!("❌ garden-stock failed: {} (Category: {:?})", e, e.category());
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: &CliConfig) -> Result<(), StockError> {
    // Resolve and validate configuration
    let app_config = cli.resolve()?;
    let service_config = ServiceConfig::from_app_config(&app_config)?;

    tracing::info!("Stock endpoint: {}", service_config.stock_endpoint());
    tracing::info!("Restock timezone: {}", service_config.timezone());

    // One client shared by the fetcher and the image proxy
    let http = reqwest::Client::new();
    let fetcher = HttpStockFetcher::with_extra_headers(
        http.clone(),
        service_config.stock_endpoint(),
        &app_config.referer,
        &app_config.extra_headers,
    )?;

    // Wire the service and start serving
    let service = StockService::new(
        Arc::new(fetcher),
        Arc::new(SystemClock),
        Arc::new(service_config),
    );

    garden_stock::server::serve(&app_config.bind, AppState::new(service, http)).await
}
