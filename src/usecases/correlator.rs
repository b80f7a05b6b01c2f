use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, Once},
};

use serde_json::Value;
use thiserror::Error;

use crate::{
    bus::{BusError, MessageBus},
    domain::call::{CallId, InboundReply, Method, OutboundMessage, Params},
    infra::secrets::redact_params,
    usecases::ids::IdSource,
};

const PENDING_BACKLOG: &str = "CORRELATOR_PENDING_BACKLOG";
const MAX_ID_ATTEMPTS: usize = 8;

pub type SuccessCallback = Box<dyn FnOnce(Value) + Send>;
pub type ErrorCallback = Box<dyn FnOnce(Value) + Send>;

#[derive(Debug, Error)]
pub enum CorrelatorError {
    #[error("id source returned only pending ids after {attempts} attempts")]
    IdCollision { attempts: usize },
    #[error("failed to dispatch {method} call {id}: {source}")]
    Dispatch {
        method: Method,
        id: CallId,
        #[source]
        source: BusError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrelatorSettings {
    /// Warn each time the pending table grows to a multiple of this. `0` disables.
    pub pending_warn_threshold: usize,
}

impl Default for CorrelatorSettings {
    fn default() -> Self {
        Self {
            pending_warn_threshold: 64,
        }
    }
}

struct PendingCall {
    method: Method,
    on_success: SuccessCallback,
    on_error: ErrorCallback,
}

#[derive(Default)]
struct PendingTable {
    calls: HashMap<CallId, PendingCall>,
}

/// Matches replies on a shared channel to the calls that caused them.
///
/// Calls stay pending until their reply arrives; there is no timeout and no
/// cancellation. Each call resolves at most once.
pub struct Correlator {
    bus: Arc<dyn MessageBus>,
    ids: Box<dyn IdSource>,
    channel: String,
    settings: CorrelatorSettings,
    table: Arc<Mutex<PendingTable>>,
    listener: Once,
}

impl Correlator {
    pub fn new(
        bus: Arc<dyn MessageBus>,
        ids: Box<dyn IdSource>,
        channel: impl Into<String>,
        settings: CorrelatorSettings,
    ) -> Self {
        Self {
            bus,
            ids,
            channel: channel.into(),
            settings,
            table: Arc::new(Mutex::new(PendingTable::default())),
            listener: Once::new(),
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Registers the call, emits it once and returns without waiting.
    pub fn call<S, E>(
        &self,
        method: Method,
        params: Params,
        on_success: S,
        on_error: E,
    ) -> Result<CallId, CorrelatorError>
    where
        S: FnOnce(Value) + Send + 'static,
        E: FnOnce(Value) + Send + 'static,
    {
        self.ensure_listening();

        let id = {
            let mut table = lock(&self.table);
            let id = self.fresh_id(&table)?;
            table.calls.insert(
                id.clone(),
                PendingCall {
                    method,
                    on_success: Box::new(on_success),
                    on_error: Box::new(on_error),
                },
            );
            self.warn_on_backlog(table.calls.len());
            id
        };

        tracing::debug!(
            call_id = %id,
            method = method.wire_name(),
            params = ?redact_params(&params),
            "dispatching call"
        );

        let message = OutboundMessage::new(id.clone(), method, params);
        if let Err(source) = self.bus.dispatch(&self.channel, &message) {
            lock(&self.table).calls.remove(&id);
            return Err(CorrelatorError::Dispatch { method, id, source });
        }

        Ok(id)
    }

    pub fn pending_count(&self) -> usize {
        lock(&self.table).calls.len()
    }

    pub fn pending_ids(&self) -> Vec<CallId> {
        let mut ids: Vec<CallId> = lock(&self.table).calls.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn is_pending(&self, id: &CallId) -> bool {
        lock(&self.table).calls.contains_key(id)
    }

    /// Callers racing the first registration block until it has finished,
    /// so no call is dispatched before its reply can be routed.
    fn ensure_listening(&self) {
        self.listener.call_once(|| {
            let table = Arc::clone(&self.table);
            self.bus
                .add_listener(&self.channel, Arc::new(move |reply| resolve(&table, reply)));
            tracing::debug!(channel = self.channel.as_str(), "reply listener registered");
        });
    }

    fn fresh_id(&self, table: &PendingTable) -> Result<CallId, CorrelatorError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.ids.next_id();
            if !table.calls.contains_key(&id) {
                return Ok(id);
            }
            tracing::debug!(call_id = %id, "id source returned a pending id, drawing again");
        }

        Err(CorrelatorError::IdCollision {
            attempts: MAX_ID_ATTEMPTS,
        })
    }

    fn warn_on_backlog(&self, pending: usize) {
        let threshold = self.settings.pending_warn_threshold;
        if threshold > 0 && pending % threshold == 0 {
            tracing::warn!(
                code = PENDING_BACKLOG,
                pending,
                "calls are waiting on replies that may never arrive"
            );
        }
    }
}

fn resolve(table: &Mutex<PendingTable>, reply: InboundReply) {
    let Some(call) = lock(table).calls.remove(&reply.id) else {
        tracing::debug!(call_id = %reply.id, "ignoring reply for unknown call");
        return;
    };

    let id = reply.id.clone();
    match reply.into_outcome() {
        Ok(data) => {
            tracing::debug!(call_id = %id, method = call.method.wire_name(), "call succeeded");
            (call.on_success)(data);
        }
        Err(error) => {
            tracing::debug!(call_id = %id, method = call.method.wire_name(), "call failed remotely");
            (call.on_error)(error);
        }
    }
}

fn lock(table: &Mutex<PendingTable>) -> MutexGuard<'_, PendingTable> {
    table
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
