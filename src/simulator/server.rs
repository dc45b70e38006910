use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    extract::State,
    response::Response,
    routing::get,
    Router,
};
use futures::{sink::SinkExt, stream::StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};
use crate::config::SimulatorConfig;
use crate::error::{Error, Result};
use crate::simulator::generator::TradeGenerator;

pub struct SimulatorState {
    pub config: SimulatorConfig,
}

pub fn router(config: SimulatorConfig) -> Router {
    Router::new()
        .route(crate::TRANSACTIONS_PATH, get(transactions_handler))
        .with_state(Arc::new(SimulatorState { config }))
}

/// Binds the simulator and serves it in the background.
pub async fn serve(config: SimulatorConfig) -> Result<(SocketAddr, JoinHandle<()>)> {
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let addr = listener.local_addr()?;
    let app = router(config);

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!(error = %Error::SimulatorError(e.to_string()), "Feed simulator stopped");
        }
    });

    info!(addr = %addr, "Feed simulator listening");
    Ok((addr, handle))
}

/// Tick period and trades per tick for a target message rate.
pub fn pacing(messages_per_second: u32) -> (Duration, usize) {
    let rate = messages_per_second.max(1);
    if rate <= 100 {
        (Duration::from_millis(1_000 / rate as u64), 1)
    } else {
        (Duration::from_millis(10), (rate as usize).div_ceil(100))
    }
}

async fn transactions_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<SimulatorState>>,
) -> Response {
    ws.on_upgrade(|socket| stream_trades(socket, state))
}

async fn stream_trades(socket: WebSocket, state: Arc<SimulatorState>) {
    let (mut sender, mut receiver) = socket.split();
    let mut generator = TradeGenerator::new(&state.config.planets, state.config.seed);
    let (period, per_tick) = pacing(state.config.messages_per_second);
    info!(
        rate = state.config.messages_per_second,
        "Feed simulator client connected"
    );

    let mut send_task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            for trade in generator.next_batch(per_tick) {
                let msg = match trade.to_json() {
                    Ok(msg) => msg,
                    Err(e) => {
                        error!(error = %e, "Failed to encode simulated trade");
                        continue;
                    }
                };
                if sender.send(Message::Text(msg)).await.is_err() {
                    return;
                }
            }
        }
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => debug!("Ignoring client message: {}", text),
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    }

    info!("Feed simulator client disconnected");
}
