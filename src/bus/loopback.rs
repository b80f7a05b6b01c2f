use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

use crate::{
    bus::{BusError, ListenerRegistry, MessageBus, ReplyListener},
    domain::call::{InboundReply, OutboundMessage},
};

/// In-process bus: keeps every dispatched message and lets the host side
/// push replies back to registered listeners.
#[derive(Default)]
pub struct LoopbackBus {
    dispatched: Mutex<Vec<(String, OutboundMessage)>>,
    listeners: ListenerRegistry,
    closed: AtomicBool,
}

impl LoopbackBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatched(&self) -> Vec<OutboundMessage> {
        self.dispatched
            .lock()
            .map(|sent| sent.iter().map(|(_, message)| message.clone()).collect())
            .unwrap_or_default()
    }

    pub fn dispatched_on(&self, channel: &str) -> Vec<OutboundMessage> {
        self.dispatched
            .lock()
            .map(|sent| {
                sent.iter()
                    .filter(|(ch, _)| ch == channel)
                    .map(|(_, message)| message.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn listener_count(&self, channel: &str) -> usize {
        self.listeners.count(channel)
    }

    /// Delivers a reply on `channel`, returning how many listeners saw it.
    pub fn deliver(&self, channel: &str, reply: InboundReply) -> usize {
        self.listeners.deliver(channel, &reply)
    }

    /// Makes every later dispatch fail with [`BusError::Closed`].
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

impl MessageBus for LoopbackBus {
    fn dispatch(&self, channel: &str, message: &OutboundMessage) -> Result<(), BusError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(BusError::Closed);
        }

        let mut sent = self.dispatched.lock().map_err(|_| BusError::Closed)?;
        sent.push((channel.to_owned(), message.clone()));
        Ok(())
    }

    fn add_listener(&self, channel: &str, listener: ReplyListener) {
        self.listeners.add(channel, listener);
    }
}
