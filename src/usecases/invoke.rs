use std::{
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use serde_json::Value;

use crate::{
    domain::request::AccountRequest,
    infra::error::AppError,
    usecases::{accounts::AccountsClient, contracts::ReplyPump},
};

const PUMP_SLICE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq)]
pub enum CallOutcome {
    Success(Value),
    Failure(Value),
}

/// Issues one request and pumps the transport until its reply lands or
/// `wait` elapses. The wait bounds this process only; the call itself stays
/// pending in the correlator if no reply comes.
pub fn invoke_and_wait(
    client: &AccountsClient,
    pump: &dyn ReplyPump,
    request: AccountRequest,
    wait: Duration,
) -> Result<CallOutcome, AppError> {
    let method = request.method();
    let slot: Arc<Mutex<Option<CallOutcome>>> = Arc::new(Mutex::new(None));

    let on_success = {
        let slot = Arc::clone(&slot);
        move |data| store(&slot, CallOutcome::Success(data))
    };
    let on_error = {
        let slot = Arc::clone(&slot);
        move |error| store(&slot, CallOutcome::Failure(error))
    };

    let id = client.request(request, on_success, on_error)?;
    tracing::info!(call_id = %id, method = method.wire_name(), "request sent");

    let deadline = Instant::now() + wait;
    loop {
        if let Some(outcome) = take(&slot) {
            return Ok(outcome);
        }

        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(AppError::ReplyTimeout {
                method,
                waited_ms: u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
            });
        }

        pump.pump(remaining.min(PUMP_SLICE))?;
    }
}

fn store(slot: &Mutex<Option<CallOutcome>>, outcome: CallOutcome) {
    if let Ok(mut slot) = slot.lock() {
        *slot = Some(outcome);
    }
}

fn take(slot: &Mutex<Option<CallOutcome>>) -> Option<CallOutcome> {
    slot.lock().ok().and_then(|mut slot| slot.take())
}
