use std::{
    io::{self, Write},
    time::Duration,
};

use crate::bus::{
    stdio::{PumpOutcome, StdioBus},
    BusError,
};

/// Something that can move pending replies from the transport to listeners.
pub trait ReplyPump {
    fn pump(&self, timeout: Duration) -> Result<PumpOutcome, BusError>;
}

impl<W: Write + Send> ReplyPump for StdioBus<W> {
    fn pump(&self, timeout: Duration) -> Result<PumpOutcome, BusError> {
        StdioBus::pump(self, timeout)
    }
}

pub trait SecretPrompt {
    fn prompt_secret(&mut self, prompt: &str) -> io::Result<Option<String>>;
}
