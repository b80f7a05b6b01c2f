//! Account client that issues named operations over a shared event channel
//! and routes each asynchronous reply back to the call that caused it.

pub mod app;
pub mod bus;
pub mod cli;
pub mod domain;
pub mod infra;
#[cfg(test)]
mod test_support;
pub mod usecases;

pub use bus::{loopback::LoopbackBus, stdio::StdioBus, MessageBus};
pub use domain::call::{AssertionOptions, CallId, InboundReply, Method, OutboundMessage};
pub use usecases::{
    accounts::AccountsClient,
    correlator::{Correlator, CorrelatorError, CorrelatorSettings},
    ids::{IdSource, SequentialIds, UuidIds},
};
