use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::config::Panel;

/// Why a metric family could not be read during a tick.
///
/// Never fatal: the panel renders a placeholder and the next tick tries again.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum MetricUnavailable {
    #[error("not supported on this platform")]
    Unsupported,

    #[error("nothing reported")]
    Empty,

    #[error("query exceeded {0:?}")]
    TimedOut(Duration),

    #[error("previous query still running")]
    Busy,

    #[error("{0}")]
    Failed(String),
}

/// The metric source can no longer be used.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{0} query panicked")]
    Panicked(Panel),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("interval must be between 0 and 86400 seconds, got {0}")]
    InvalidInterval(f64),

    #[error("query timeout must be greater than 0 ms")]
    InvalidQueryTimeout,

    #[error("unknown panel `{0}` (expected cpu, memory, network, load, system, disk or users)")]
    UnknownPanel(String),

    #[error("unknown theme `{0}` (expected dark, light or mono)")]
    UnknownTheme(String),

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Error)]
pub enum TerminalError {
    #[error("failed to initialize terminal: {0}")]
    Init(#[source] std::io::Error),

    #[error("failed to draw frame: {0}")]
    Draw(String),

    #[error("failed to restore terminal: {0}")]
    Restore(#[source] std::io::Error),
}

/// Anything that ends the refresh loop with a non-zero exit.
#[derive(Debug, Error)]
pub enum LoopError {
    #[error(transparent)]
    Terminal(#[from] TerminalError),

    #[error(transparent)]
    Source(#[from] SourceError),
}
