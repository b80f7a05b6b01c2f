use std::{
    io::{self, BufRead, BufReader, Write},
    sync::{
        mpsc::{self, Receiver, RecvTimeoutError, Sender},
        Mutex,
    },
    thread,
    time::Duration,
};

use crate::{
    bus::{
        wire::{InboundEnvelope, OutboundEnvelope},
        BusError, ListenerRegistry, MessageBus, ReplyListener,
    },
    domain::call::OutboundMessage,
};

const STDIO_REPLY_MALFORMED: &str = "BUS_STDIO_REPLY_MALFORMED";
const STDIO_READ_FAILED: &str = "BUS_STDIO_READ_FAILED";

/// JSON-lines bus: one envelope per line out on the writer, replies read
/// from the reader on a worker thread and delivered by [`StdioBus::pump`].
pub struct StdioBus<W: Write + Send> {
    writer: Mutex<W>,
    inbound: Mutex<Receiver<InboundEnvelope>>,
    listeners: ListenerRegistry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpOutcome {
    Delivered { listeners: usize },
    Idle,
}

impl StdioBus<io::Stdout> {
    pub fn stdio() -> Result<Self, BusError> {
        Self::new(io::stdout(), BufReader::new(io::stdin()))
    }
}

impl<W: Write + Send> StdioBus<W> {
    pub fn new<R>(writer: W, reader: R) -> Result<Self, BusError>
    where
        R: BufRead + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("fxa-bridge-stdio-reader".to_owned())
            .spawn(move || read_replies(reader, tx))
            .map_err(BusError::ReaderSpawn)?;

        Ok(Self {
            writer: Mutex::new(writer),
            inbound: Mutex::new(rx),
            listeners: ListenerRegistry::default(),
        })
    }

    /// Waits up to `timeout` for one inbound envelope and delivers it on the
    /// calling thread. Fails with [`BusError::Closed`] once the reader has hit
    /// end of input and every queued envelope is drained.
    pub fn pump(&self, timeout: Duration) -> Result<PumpOutcome, BusError> {
        let envelope = {
            let inbound = self.inbound.lock().map_err(|_| BusError::Closed)?;
            match inbound.recv_timeout(timeout) {
                Ok(envelope) => envelope,
                Err(RecvTimeoutError::Timeout) => return Ok(PumpOutcome::Idle),
                Err(RecvTimeoutError::Disconnected) => return Err(BusError::Closed),
            }
        };

        let listeners = self.listeners.deliver(&envelope.channel, &envelope.detail);
        if listeners == 0 {
            tracing::debug!(
                channel = envelope.channel.as_str(),
                call_id = %envelope.detail.id,
                "inbound reply had no listener on its channel"
            );
        }

        Ok(PumpOutcome::Delivered { listeners })
    }

    #[cfg(test)]
    fn into_writer(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<W: Write + Send> MessageBus for StdioBus<W> {
    fn dispatch(&self, channel: &str, message: &OutboundMessage) -> Result<(), BusError> {
        let envelope = OutboundEnvelope::new(channel, message);
        let mut line = serde_json::to_vec(&envelope).map_err(BusError::Encode)?;
        line.push(b'\n');

        let mut writer = self.writer.lock().map_err(|_| BusError::Closed)?;
        writer.write_all(&line).map_err(BusError::Write)?;
        writer.flush().map_err(BusError::Write)
    }

    fn add_listener(&self, channel: &str, listener: ReplyListener) {
        self.listeners.add(channel, listener);
    }
}

fn read_replies<R: BufRead>(mut reader: R, tx: Sender<InboundEnvelope>) {
    let mut line = Vec::new();
    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line) {
            Ok(0) => return,
            Ok(_) => {}
            Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
            Err(error) => {
                tracing::warn!(code = STDIO_READ_FAILED, error = %error, "stopped reading replies");
                return;
            }
        }

        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        match serde_json::from_slice::<InboundEnvelope>(&line) {
            Ok(envelope) => {
                if tx.send(envelope).is_err() {
                    return;
                }
            }
            Err(error) => {
                tracing::warn!(
                    code = STDIO_REPLY_MALFORMED,
                    error = %error,
                    "skipping malformed reply line"
                );
            }
        }
    }
}
