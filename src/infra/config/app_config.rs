use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{bus::DEFAULT_CHANNEL, usecases::ids::IdSourceKind};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AppConfig {
    pub logging: LogConfig,
    pub bus: BusConfig,
    pub client: ClientConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BusConfig {
    pub channel: String,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            channel: DEFAULT_CHANNEL.to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    pub reply_timeout_ms: u64,
    pub pending_warn_threshold: usize,
    pub id_source: IdSourceKind,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            reply_timeout_ms: 30_000,
            pending_warn_threshold: 64,
            id_source: IdSourceKind::Uuid,
        }
    }
}
