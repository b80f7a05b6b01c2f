use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

use crate::{bus::BusError, domain::call::Method, usecases::correlator::CorrelatorError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to read config file at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to open log file at {path}: {source}")]
    LogFileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to initialize logging: {0}")]
    LoggingInit(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
    #[error("unknown operation `{name}`")]
    UnknownOperation { name: String },
    #[error("operation `{operation}` requires --{argument}")]
    MissingArgument {
        operation: &'static str,
        argument: &'static str,
    },
    #[error("failed to read password: {0}")]
    PasswordPrompt(#[source] std::io::Error),
    #[error(transparent)]
    Bus(#[from] BusError),
    #[error(transparent)]
    Correlator(#[from] CorrelatorError),
    #[error("no reply to {method} within {waited_ms} ms")]
    ReplyTimeout { method: Method, waited_ms: u64 },
    #[error("{method} failed remotely: {payload}")]
    RemoteFailure { method: Method, payload: Value },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
