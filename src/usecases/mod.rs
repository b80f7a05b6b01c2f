//! Use case layer: the account client, reply correlation, and the
//! request/wait workflow used by the CLI.

pub mod accounts;
pub mod bootstrap;
pub mod context;
pub mod contracts;
pub mod correlator;
pub mod ids;
pub mod invoke;
pub mod operation;

/// Returns the usecases module name for smoke checks.
pub fn module_name() -> &'static str {
    "usecases"
}
