//! Command handlers.

use std::sync::Arc;

use color_eyre::eyre::{eyre, Report};
use color_eyre::Result;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::args::StrategyArgs;
use crate::adapters::{NativeDeviceProbe, ReqwestHttpClient, StaticNetwork};
use crate::api::MarketClient;
use crate::config::DeliveryConfig;
use crate::domain::{ConnectionSnapshot, ConnectionType, DeviceCapability};
use crate::error::DeliveryError;
use crate::policy::{strategy_for, LoadingStrategy};
use crate::progressive::{LoadState, ProgressiveLoader};
use crate::recent_searches::RecentSearches;
use crate::sensor::Sensor;

/// Output of the `strategy` command.
#[derive(Debug, Clone, Serialize)]
pub struct StrategyReport {
    pub connection: ConnectionSnapshot,
    pub device: DeviceCapability,
    pub strategy: LoadingStrategy,
}

/// Compute the strategy the client would use for `args`.
pub fn strategy_report(args: &StrategyArgs, config: &DeliveryConfig) -> StrategyReport {
    let mut probe = NativeDeviceProbe::new().with_reduced_motion(args.reduced_motion);
    if let Some(width) = args.width {
        probe = probe.with_viewport_width(width);
    }

    let sensor = native_sensor(args.connection, args.save_data, probe);
    let mut reading = sensor.reading();
    if let Some(tier) = args.tier {
        reading.device.tier = tier;
    }

    let requested = args.page_size.unwrap_or(config.page_size);
    StrategyReport {
        connection: reading.connection,
        device: reading.device,
        strategy: strategy_for(&reading, requested),
    }
}

pub fn handle_strategy_command(args: &StrategyArgs, config: &DeliveryConfig) -> Result<()> {
    let report = strategy_report(args, config);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Load one news category page by page, printing progress to stderr and
/// the articles to stdout. Ctrl-C stops the load.
pub async fn handle_news_command(
    category: &str,
    connection: Option<ConnectionType>,
    config: &DeliveryConfig,
) -> Result<()> {
    let sensor = native_sensor(connection, false, NativeDeviceProbe::new());
    let strategy = strategy_for(&sensor.reading(), config.page_size);
    let cancel = CancellationToken::new();

    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    let market = MarketClient::new(
        Arc::new(ReqwestHttpClient::with_timeout(config.request_timeout)),
        config.api_url.clone(),
    )
    .with_retry_policy(config.retry)
    .with_connection(sensor.watch())
    .with_cancellation(cancel.clone());

    let loader = ProgressiveLoader::new(config.retry)
        .with_connection(sensor.watch())
        .with_cancellation(cancel.clone());

    debug!(chunk_size = strategy.chunk_size, "loading news");
    let pages = market.news_pages(category);
    let state = loader
        .load(&pages, Some(config.page_size), &strategy, |state| {
            if let LoadState::Loading { partial } = state {
                if !partial.is_empty() {
                    eprintln!("  {} articles loaded", partial.len());
                }
            }
        })
        .await;
    interrupt.abort();

    for item in state.items() {
        match &item.source {
            Some(source) => println!("{}  ({})", item.headline, source),
            None => println!("{}", item.headline),
        }
    }

    match state.error() {
        Some(error) => Err(failure_report(error)),
        None => Ok(()),
    }
}

/// Search companies and remember the query on success.
pub async fn handle_search_command(query: &str, config: &DeliveryConfig) -> Result<()> {
    let market = MarketClient::new(
        Arc::new(ReqwestHttpClient::with_timeout(config.request_timeout)),
        config.api_url.clone(),
    )
    .with_retry_policy(config.retry);

    let matches = market
        .search_companies(query)
        .await
        .map_err(|e| failure_report(&e))?;

    if matches.is_empty() {
        println!("No companies match '{}'", query.trim());
    }
    for company in &matches {
        println!(
            "{:<8} {}{}",
            company.symbol,
            company.name,
            company
                .exchange
                .as_deref()
                .map(|e| format!("  [{}]", e))
                .unwrap_or_default()
        );
    }

    let mut recent = RecentSearches::load(config.recent_searches_path()?);
    recent.record(query)?;
    info!(count = matches.len(), "search recorded");
    Ok(())
}

pub fn handle_recent_command(clear: bool, config: &DeliveryConfig) -> Result<()> {
    let mut recent = RecentSearches::load(config.recent_searches_path()?);

    if clear {
        recent.clear()?;
        println!("Recent searches cleared");
        return Ok(());
    }

    if recent.is_empty() {
        println!("No recent searches");
    }
    for (i, query) in recent.entries().iter().enumerate() {
        println!("{}. {}", i + 1, query);
    }
    Ok(())
}

/// Log the error's context and turn it into the message shown to the user.
fn failure_report(error: &DeliveryError) -> Report {
    match error.context() {
        Some(context) => warn!(
            code = error.error_code(),
            category = %error.category(),
            "{}",
            context.to_log_string()
        ),
        None => warn!(code = error.error_code(), category = %error.category(), "{}", error),
    }
    eyre!("{} {}.", error.user_message(), error.recovery_hint())
}

fn native_sensor(
    connection: Option<ConnectionType>,
    save_data: bool,
    probe: NativeDeviceProbe,
) -> Sensor {
    let network = StaticNetwork::new(connection.map(|c| c.as_str().to_string()), save_data);
    Sensor::new(Some(Arc::new(network)), Some(Arc::new(probe)))
}
