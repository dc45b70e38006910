use anyhow::Context;
use tracing::{info, warn};
use trade_board::aggregator::TransactionAggregator;
use trade_board::config::AppConfig;
use trade_board::feed::connectors::WebSocketFeedConnector;
use trade_board::observability::{logging, metrics};
use trade_board::simulator;

const LEADERBOARD_ROWS: usize = 5;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = std::env::var("TRADEBOARD_ENV").unwrap_or_else(|_| "development".to_string());
    let mut config = AppConfig::load(&env).context("loading configuration")?;

    logging::init_logging(&config.logging).context("initialising logging")?;
    metrics::register_metrics().context("registering metrics")?;

    let simulator = if config.simulator.enabled {
        let (addr, handle) = simulator::serve(config.simulator.clone())
            .await
            .context("starting feed simulator")?;
        config.feed.url = format!("ws://{}", addr);
        Some(handle)
    } else {
        None
    };

    let connector = WebSocketFeedConnector::new(config.feed.clone());
    let mut aggregator = TransactionAggregator::new(connector, config.aggregator.clone());
    let mut status = aggregator.subscribe();

    aggregator.start_watching();
    info!(env = %env, endpoint = %config.feed.endpoint(), "Trade board running");

    loop {
        tokio::select! {
            changed = status.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = status.borrow_and_update().clone();
                if let Some(error) = &current.error {
                    warn!(error = %error, state = %current.connection, "Feed degraded");
                }
                for (rank, entry) in aggregator.leaderboard().iter().take(LEADERBOARD_ROWS).enumerate() {
                    info!(
                        rank = rank + 1,
                        planet = %entry.planet_id,
                        volume = entry.sum_transaction_value,
                        trades = entry.number_of_transactions,
                        window = current.window_len,
                        "Leaderboard"
                    );
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown requested");
                break;
            }
        }
    }

    aggregator.stop_watching();
    if let Some(handle) = simulator {
        handle.abort();
    }

    info!(metrics = %metrics::gather_text().unwrap_or_default(), "Final metrics");
    Ok(())
}
