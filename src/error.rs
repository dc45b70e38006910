use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Feed Errors
    #[error("WebSocket error: {0}")]
    WebSocketError(String),

    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Max reconnect attempts exceeded: {0}")]
    MaxReconnectAttemptsExceeded(u32),

    #[error("Event deserialization failed: {0}")]
    DeserializationError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    // Trade Validation Errors
    #[error("Invalid trade event {id:?}: {reason}")]
    InvalidTradeEvent {
        id: String,
        reason: InvalidTradeReason,
    },

    // System Errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Metrics error: {0}")]
    MetricsError(#[from] prometheus::Error),

    #[error("Simulator error: {0}")]
    SimulatorError(String),

    // IO Errors
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidTradeReason {
    EmptyId,
    EmptyPlanetId,
    InvalidVolume,
    InvalidPrice,
}

impl std::fmt::Display for InvalidTradeReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            InvalidTradeReason::EmptyId => "empty id",
            InvalidTradeReason::EmptyPlanetId => "empty planet id",
            InvalidTradeReason::InvalidVolume => "volume must be finite and non-negative",
            InvalidTradeReason::InvalidPrice => "price per unit must be finite and non-negative",
        };
        f.write_str(text)
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for Error {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        match e {
            tokio_tungstenite::tungstenite::Error::ConnectionClosed
            | tokio_tungstenite::tungstenite::Error::AlreadyClosed => Error::ConnectionClosed,
            other => Error::WebSocketError(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::DeserializationError(e.to_string())
    }
}

impl From<config::ConfigError> for Error {
    fn from(e: config::ConfigError) -> Self {
        Error::ConfigError(e.to_string())
    }
}
