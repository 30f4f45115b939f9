//! `braintree`: run single gateway operations from the shell.
//!
//! ```text
//! braintree [--config FILE] <command>
//!
//!   find <id>                 fetch a transaction
//!   submit <id> [amount]      submit for settlement, optionally partial
//!   void <id>                 void a transaction
//!   settle <id>               force settlement (sandbox only)
//!   refund <id> [amount]      refund, optionally partial
//!   search <first-name>       transactions by customer first name
//! ```
//!
//! Without `--config` the configuration comes from the `BRAINTREE_*`
//! environment variables. Results are printed to stdout as JSON; errors go to
//! stderr and the process exits non-zero.

#![allow(
    clippy::multiple_crate_versions,
    reason = "transitive dependencies from reqwest"
)]

mod observability;

use std::{error::Error, path::PathBuf, process::ExitCode};

use braintree_gateway::{Amount, Braintree, GatewayConfig, SearchQuery};
use clap::{Parser, Subcommand};
use observability::{LogFormat, init_observability};
use tracing::debug;

/// Exit status for malformed command lines.
const EXIT_USAGE: u8 = 2;

type CliResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

/// `braintree` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(name = "braintree", about = "Run single Braintree gateway operations", version)]
struct Cli {
    /// Gateway configuration file. Falls back to `BRAINTREE_*` variables.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
enum Command {
    /// Fetch a transaction.
    Find { id: String },
    /// Submit an authorized transaction for settlement.
    Submit {
        id: String,
        /// Partial amount; the authorized amount when omitted.
        #[arg(value_parser = parse_amount)]
        amount: Option<Amount>,
    },
    /// Void an unsettled transaction.
    Void { id: String },
    /// Force settlement (sandbox only).
    Settle { id: String },
    /// Refund a settled transaction.
    Refund {
        id: String,
        /// Partial amount; the full amount when omitted.
        #[arg(value_parser = parse_amount)]
        amount: Option<Amount>,
    },
    /// Search transactions by customer first name.
    Search {
        #[arg(value_name = "FIRST_NAME")]
        first_name: String,
    },
}

fn parse_amount(raw: &str) -> Result<Amount, String> {
    raw.parse::<Amount>().map_err(|error| error.to_string())
}

async fn run(cli: Cli) -> CliResult<serde_json::Value> {
    let config = match &cli.config {
        Some(path) => GatewayConfig::from_file(path)?,
        None => GatewayConfig::from_env()?,
    };
    debug!(
        environment = %config.environment,
        merchant_id = %config.merchant_id,
        "configuration loaded"
    );

    let transactions = Braintree::from_config(&config)?.transaction();

    let value = match cli.command {
        Command::Find { id } => serde_json::to_value(transactions.find(&id).await?)?,
        Command::Submit { id, amount } => {
            serde_json::to_value(transactions.submit_for_settlement(&id, amount).await?)?
        }
        Command::Void { id } => serde_json::to_value(transactions.void(&id).await?)?,
        Command::Settle { id } => serde_json::to_value(transactions.settle(&id).await?)?,
        Command::Refund { id, amount } => {
            serde_json::to_value(transactions.refund(&id, amount).await?)?
        }
        Command::Search { first_name } => {
            let mut query = SearchQuery::new();
            query.add_text_field("customer-first-name").is(first_name);
            serde_json::to_value(transactions.search(&query).await?)?
        }
    };
    Ok(value)
}

#[tokio::main]
async fn main() -> ExitCode {
    init_observability(LogFormat::from_env());

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => {
            // --help and --version also arrive here and print to stdout.
            let code = if error.use_stderr() { EXIT_USAGE } else { 0 };
            if error.print().is_err() {
                return ExitCode::FAILURE;
            }
            return ExitCode::from(code);
        }
    };

    match run(cli).await {
        Ok(value) => {
            println!("{value:#}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
