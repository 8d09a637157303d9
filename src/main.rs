use adaptive_delivery::cli::{parse_args, print_usage, run_cli_command, CliCommand};
use adaptive_delivery::config::DeliveryConfig;

use color_eyre::Result;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "adaptive_delivery=info";

/// Logs go to stderr so command output on stdout stays machine-readable.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let command = match parse_args(std::env::args()) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {}\n", e);
            print_usage();
            std::process::exit(2);
        }
    };

    // Nothing to configure for these
    if matches!(command, CliCommand::Version | CliCommand::Help) {
        let runtime = tokio::runtime::Builder::new_current_thread().build()?;
        return runtime.block_on(run_cli_command(command, &DeliveryConfig::default()));
    }

    init_tracing();

    let config = DeliveryConfig::from_env();
    config.validate()?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run_cli_command(command, &config))
}
