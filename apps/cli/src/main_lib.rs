use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use alfred_market_data::{MarketConfig, MarketKind, MarketService, QuoteRequest, QuoteResult};

use crate::output::CliError;

pub const LOG_FORMAT_ENV: &str = "MARKET_DATA_LOG_FORMAT";

/// Fiat exchange rates and crypto spot prices for Alfred workflows
#[derive(Debug, Parser)]
#[command(name = "market-cli")]
#[command(version, long_about = None)]
pub struct Cli {
    /// Market kind
    #[arg(value_enum)]
    pub kind: KindArg,

    /// Base symbol (e.g. USD, BTC)
    pub base: String,

    /// Quote symbol (e.g. TWD, USD)
    pub quote: String,

    /// Amount of base to convert
    #[arg(default_value = "1", allow_negative_numbers = true)]
    pub amount: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Fiat,
    Crypto,
}

impl From<KindArg> for MarketKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Fiat => MarketKind::Fiat,
            KindArg::Crypto => MarketKind::Crypto,
        }
    }
}

/// Logs go to stderr so stdout carries only the JSON document.
pub fn init_tracing() {
    let log_format = std::env::var(LOG_FORMAT_ENV).unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

pub async fn run(cli: Cli) -> Result<QuoteResult, CliError> {
    let request = QuoteRequest::parse(cli.kind.into(), &cli.base, &cli.quote, &cli.amount)?;

    let config = MarketConfig::from_env();
    tracing::debug!(
        "Cache directory in use: {} ({:?})",
        config.cache_dir.display(),
        config.cache_dir_source
    );

    let service =
        MarketService::from_config(&config).context("Failed to build the HTTP client")?;

    Ok(service.quote(&request).await?)
}
