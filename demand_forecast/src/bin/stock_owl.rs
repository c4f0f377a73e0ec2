//! # stock-owl
//!
//! Command-line front end for demand forecasts and inventory reports over
//! CSV exports of products and daily sales.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use demand_forecast::logging::init_tracing;
use demand_forecast::{
    CsvSource, ForecastConfig, ForecastMethod, ForecastRequest, InventoryInsights,
};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

#[derive(Parser)]
#[command(name = "stock-owl")]
#[command(about = "Inventory demand forecasting CLI", long_about = None)]
struct Cli {
    /// Product catalogue CSV
    #[arg(long, global = true, default_value = "products.csv")]
    products: PathBuf,

    /// Daily sales CSV
    #[arg(long, global = true, default_value = "sales.csv")]
    sales: PathBuf,

    /// Last day of the history window (default: latest sale)
    #[arg(long, global = true)]
    as_of: Option<NaiveDate>,

    /// Configuration file (default: config/stock_owl.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Forecast horizon in days
    #[arg(long, global = true)]
    days_ahead: Option<usize>,

    /// Forecasting method (auto, moving_average, exponential_smoothing, arima, linear_regression)
    #[arg(long, global = true, default_value = "auto")]
    method: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Forecast demand for one product
    Forecast { product_id: u64 },

    /// Forecast demand for every product
    ForecastAll,

    /// List products at medium or higher stockout risk
    Risks,

    /// Trend analysis for one product, or all products when omitted
    Trends { product_id: Option<u64> },

    /// Restock recommendations for products at or below their reorder point
    Restock,

    /// Stock value and recent sales summary
    Summary,

    /// Best sellers over the last 30 days
    TopProducts,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match ForecastConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config.log_level, config.log_json);

    match run(cli, config) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(message) => {
            error!("{}", message);
            eprintln!("Error: {}", message);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, config: ForecastConfig) -> Result<String, String> {
    let method: ForecastMethod = cli.method.parse().map_err(|e| format!("{}", e))?;
    let request = ForecastRequest {
        days_ahead: cli.days_ahead,
        method,
    };

    let source =
        CsvSource::open(&cli.products, &cli.sales, cli.as_of).map_err(|e| e.to_string())?;
    let insights = InventoryInsights::new(source, config);

    match cli.command {
        Commands::Forecast { product_id } => {
            to_json(insights.forecast_product(product_id, &request))
        }
        Commands::ForecastAll => to_json(insights.forecast_all(&request)),
        Commands::Risks => to_json(insights.stockout_risks()),
        Commands::Trends {
            product_id: Some(id),
        } => to_json(insights.product_trends(id)),
        Commands::Trends { product_id: None } => to_json(insights.all_trends()),
        Commands::Restock => to_json(insights.restock_recommendations()),
        Commands::Summary => to_json(insights.analytics_summary()),
        Commands::TopProducts => to_json(insights.top_products()),
    }
}

fn to_json<T: Serialize>(result: demand_forecast::Result<T>) -> Result<String, String> {
    let value = result.map_err(|e| e.to_string())?;
    serde_json::to_string_pretty(&value)
        .map_err(|e| format!("Failed to serialize output: {}", e))
}
