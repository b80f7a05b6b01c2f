//! Message bus layer: the shared channel between the client and its remote
//! account service.

pub mod loopback;
pub mod stdio;
mod wire;

use std::sync::Arc;

use thiserror::Error;

use crate::domain::call::{InboundReply, OutboundMessage};

/// Channel the remote account service listens and replies on.
pub const DEFAULT_CHANNEL: &str = "mozFxAccountsChromeEvent";

pub type ReplyListener = Arc<dyn Fn(InboundReply) + Send + Sync>;

pub trait MessageBus: Send + Sync {
    fn dispatch(&self, channel: &str, message: &OutboundMessage) -> Result<(), BusError>;
    fn add_listener(&self, channel: &str, listener: ReplyListener);
}

#[derive(Debug, Error)]
pub enum BusError {
    #[error("failed to write outbound message: {0}")]
    Write(#[source] std::io::Error),
    #[error("failed to encode outbound message: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to start reply reader: {0}")]
    ReaderSpawn(#[source] std::io::Error),
    #[error("bus is closed")]
    Closed,
}

/// Returns the bus module name for smoke checks.
pub fn module_name() -> &'static str {
    "bus"
}

#[derive(Default)]
pub(crate) struct ListenerRegistry {
    listeners: std::sync::Mutex<Vec<(String, ReplyListener)>>,
}

impl ListenerRegistry {
    pub fn add(&self, channel: &str, listener: ReplyListener) {
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.push((channel.to_owned(), listener));
        }
    }

    pub fn count(&self, channel: &str) -> usize {
        self.listeners
            .lock()
            .map(|listeners| listeners.iter().filter(|(ch, _)| ch == channel).count())
            .unwrap_or_default()
    }

    /// Hands the reply to every listener of `channel`. Listeners run without
    /// the registry lock held so they may dispatch or register in turn.
    pub fn deliver(&self, channel: &str, reply: &InboundReply) -> usize {
        let matching: Vec<ReplyListener> = self
            .listeners
            .lock()
            .map(|listeners| {
                listeners
                    .iter()
                    .filter(|(ch, _)| ch == channel)
                    .map(|(_, listener)| Arc::clone(listener))
                    .collect()
            })
            .unwrap_or_default();

        for listener in &matching {
            listener(reply.clone());
        }

        matching.len()
    }
}
