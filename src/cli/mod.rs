//! Diagnostic command-line interface.
//!
//! ```ignore
//! use adaptive_delivery::cli::{parse_args, run_cli_command};
//!
//! let command = parse_args(std::env::args())?;
//! runtime.block_on(run_cli_command(command, &config))?;
//! ```

pub mod args;
pub mod commands;
pub mod version;

pub use args::{parse_args, ArgsError, CliCommand, StrategyArgs};
pub use commands::{strategy_report, StrategyReport};
pub use version::{handle_version_command, VERSION};

use color_eyre::Result;

use crate::config::DeliveryConfig;

pub const USAGE: &str = "\
Usage: adaptive-delivery <command> [options]

Commands:
  strategy [--connection T] [--save-data] [--tier T] [--width PX]
           [--page-size N] [--reduced-motion]
                      Print the loading strategy as JSON
  news [category] [--connection T]
                      Progressively load market news
  search <query>      Search companies and remember the query
  recent [--clear]    List recent searches
  --version           Print the version
  --help              Show this message

Connection types: offline, slow-2g, 2g, 3g, 4g, wifi, unknown
Device tiers: low, mid, high";

pub fn print_usage() {
    println!("{}", USAGE);
}

/// Run a parsed command to completion.
pub async fn run_cli_command(command: CliCommand, config: &DeliveryConfig) -> Result<()> {
    match command {
        CliCommand::Version => {
            handle_version_command();
            Ok(())
        }
        CliCommand::Help => {
            print_usage();
            Ok(())
        }
        CliCommand::Strategy(args) => commands::handle_strategy_command(&args, config),
        CliCommand::News {
            category,
            connection,
        } => commands::handle_news_command(&category, connection, config).await,
        CliCommand::Search { query } => commands::handle_search_command(&query, config).await,
        CliCommand::Recent { clear } => commands::handle_recent_command(clear, config),
    }
}
