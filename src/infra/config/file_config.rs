use std::path::PathBuf;

use serde::Deserialize;

use crate::{
    infra::config::{AppConfig, BusConfig, ClientConfig, LogConfig},
    usecases::ids::IdSourceKind,
};

#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    pub logging: Option<FileLogConfig>,
    pub bus: Option<FileBusConfig>,
    pub client: Option<FileClientConfig>,
}

impl FileConfig {
    pub fn merge_into(self, config: &mut AppConfig) {
        if let Some(logging) = self.logging {
            logging.merge_into(&mut config.logging);
        }

        if let Some(bus) = self.bus {
            bus.merge_into(&mut config.bus);
        }

        if let Some(client) = self.client {
            client.merge_into(&mut config.client);
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileLogConfig {
    pub level: Option<String>,
    pub file: Option<PathBuf>,
}

impl FileLogConfig {
    fn merge_into(self, config: &mut LogConfig) {
        if let Some(level) = self.level {
            config.level = level;
        }

        if let Some(file) = self.file {
            config.file = Some(file);
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileBusConfig {
    pub channel: Option<String>,
}

impl FileBusConfig {
    fn merge_into(self, config: &mut BusConfig) {
        if let Some(channel) = self.channel {
            config.channel = channel;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileClientConfig {
    pub reply_timeout_ms: Option<u64>,
    pub pending_warn_threshold: Option<usize>,
    pub id_source: Option<IdSourceKind>,
}

impl FileClientConfig {
    fn merge_into(self, config: &mut ClientConfig) {
        if let Some(timeout_ms) = self.reply_timeout_ms {
            config.reply_timeout_ms = timeout_ms;
        }

        if let Some(threshold) = self.pending_warn_threshold {
            config.pending_warn_threshold = threshold;
        }

        if let Some(id_source) = self.id_source {
            config.id_source = id_source;
        }
    }
}
