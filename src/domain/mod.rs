//! Domain layer: calls, replies, and account requests.

pub mod call;
pub mod request;

/// Returns the domain module name for smoke checks.
pub fn module_name() -> &'static str {
    "domain"
}
