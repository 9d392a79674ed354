//! Market data CLI.
//!
//! ```bash
//! market-cli fiat USD TWD 100
//! market-cli crypto BTC USD 0.5
//! ```

mod main_lib;
mod output;

use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;

use main_lib::{init_tracing, run, Cli};
use output::{emit_failure, emit_success, CliError};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => return emit_failure(&CliError::Usage(e.to_string().trim().to_string())),
        },
    };

    match run(cli).await {
        Ok(result) => emit_success(&result),
        Err(e) => emit_failure(&e),
    }
}
