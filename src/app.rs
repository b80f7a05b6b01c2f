use std::{sync::Arc, time::Duration};

use anyhow::Result;
use serde_json::json;

use crate::{
    bus::{self, stdio::StdioBus, MessageBus},
    cli::{CallArgs, Cli, Command},
    domain::{self, call::Method},
    infra::{self, error::AppError},
    usecases::{
        self, bootstrap,
        invoke::{invoke_and_wait, CallOutcome},
        operation::{build_request, RpasswordPrompt},
    },
};

const CALL_REMOTE_FAILURE: &str = "CALL_REMOTE_FAILURE";

pub fn run(cli: Cli) -> Result<()> {
    tracing::debug!(
        bus = bus::module_name(),
        domain = domain::module_name(),
        usecases = usecases::module_name(),
        infra = infra::module_name(),
        "module boundaries loaded"
    );

    match cli.command {
        Command::Methods => {
            for line in method_lines() {
                println!("{line}");
            }
        }
        Command::Call(args) => run_call(cli.config.as_deref(), &args)?,
    }

    Ok(())
}

fn run_call(config_path: Option<&std::path::Path>, args: &CallArgs) -> Result<(), AppError> {
    let context = bootstrap::bootstrap(config_path)?;
    let request = build_request(&args.operation, args.operation_args(), &mut RpasswordPrompt)?;
    let method = request.method();

    let bus = Arc::new(StdioBus::stdio()?);
    let shared: Arc<dyn MessageBus> = bus.clone();
    let client = bootstrap::compose_client(&context.config, shared);

    let wait = Duration::from_millis(context.config.client.reply_timeout_ms);
    let outcome = invoke_and_wait(&client, bus.as_ref(), request, wait)?;
    println!("{}", outcome_line(&outcome));

    if let CallOutcome::Failure(payload) = outcome {
        tracing::warn!(
            code = CALL_REMOTE_FAILURE,
            method = method.wire_name(),
            "remote side reported a failure"
        );
        return Err(AppError::RemoteFailure { method, payload });
    }

    Ok(())
}

fn method_lines() -> Vec<String> {
    Method::ALL
        .iter()
        .map(|method| format!("{:<27} {}", method.operation_name(), method.wire_name()))
        .collect()
}

fn outcome_line(outcome: &CallOutcome) -> String {
    let line = match outcome {
        CallOutcome::Success(payload) => json!({"outcome": "success", "payload": payload}),
        CallOutcome::Failure(payload) => json!({"outcome": "error", "payload": payload}),
    };
    line.to_string()
}
