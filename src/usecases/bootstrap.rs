use std::{path::Path, sync::Arc};

use crate::{
    bus::MessageBus,
    infra::{
        self,
        config::{AppConfig, FileConfigAdapter},
        contracts::ConfigAdapter,
        error::AppError,
    },
    usecases::{
        accounts::AccountsClient,
        context::AppContext,
        correlator::{Correlator, CorrelatorSettings},
    },
};

pub fn bootstrap(config_path: Option<&Path>) -> Result<AppContext, AppError> {
    let config = load_config(&FileConfigAdapter::new(config_path))?;
    let log_guard = infra::logging::init(&config.logging)?;

    Ok(AppContext::new(config, log_guard))
}

/// Wires a correlator for `bus` according to the client and bus settings.
pub fn compose_client(config: &AppConfig, bus: Arc<dyn MessageBus>) -> AccountsClient {
    let correlator = Correlator::new(
        bus,
        config.client.id_source.build(),
        config.bus.channel.clone(),
        CorrelatorSettings {
            pending_warn_threshold: config.client.pending_warn_threshold,
        },
    );

    AccountsClient::new(correlator)
}

fn load_config(adapter: &dyn ConfigAdapter) -> Result<AppConfig, AppError> {
    adapter.load().map_err(AppError::Other)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        bus::loopback::LoopbackBus,
        domain::call::{CallId, InboundReply},
        infra::stubs::StubConfigAdapter,
        usecases::ids::IdSourceKind,
    };

    #[test]
    fn loads_defaults_when_file_is_missing() {
        let config = load_config(&FileConfigAdapter::new(Some(Path::new(
            "./missing-config.toml",
        ))))
        .expect("config should load from defaults");

        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn composed_client_follows_configured_channel_and_ids() {
        let mut config = load_config(&StubConfigAdapter).expect("stub config must load");
        config.bus.channel = "custom".to_owned();
        config.client.id_source = IdSourceKind::Sequential;

        let bus = Arc::new(LoopbackBus::new());
        let shared: Arc<dyn MessageBus> = bus.clone();
        let client = compose_client(&config, shared);

        let id = client
            .get_keys(|_| {}, |_| {})
            .expect("call should dispatch");

        assert_eq!(client.correlator().channel(), "custom");
        assert_eq!(id, CallId::new("call-1"));
        assert_eq!(bus.dispatched_on("custom").len(), 1);
        assert_eq!(bus.listener_count("custom"), 1);
        assert_eq!(
            bus.deliver("custom", InboundReply::success(id, json!(null))),
            1
        );
    }
}
