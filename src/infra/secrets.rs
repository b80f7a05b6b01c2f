use std::panic;

use serde_json::Value;

use crate::domain::call::Params;

const REDACTED: &str = "[REDACTED]";

const SENSITIVE_MARKERS: [&str; 5] = ["password", "passcode", "secret", "token", "otp"];

const SENSITIVE_PARAMS: [&str; 9] = [
    "password",
    "passcode",
    "secret",
    "token",
    "sessionToken",
    "keyFetchToken",
    "unwrapBKey",
    "kA",
    "kB",
];

pub fn redact_text(input: &str) -> String {
    input
        .split_whitespace()
        .map(redact_chunk)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Copy of `params` safe to log: values under sensitive names are replaced.
pub fn redact_params(params: &Params) -> Params {
    params
        .iter()
        .map(|(name, value)| {
            let value = if is_sensitive_param(name) && !value.is_null() {
                Value::String(REDACTED.to_owned())
            } else {
                value.clone()
            };
            (name.clone(), value)
        })
        .collect()
}

pub fn install_panic_redaction_hook() {
    panic::set_hook(Box::new(|panic_info| {
        let payload = panic_info
            .payload()
            .downcast_ref::<&str>()
            .map(ToString::to_string)
            .or_else(|| panic_info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "panic payload omitted".to_owned());

        let scrubbed = redact_text(&payload);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "fxa-bridge panic: {} at {}:{}:{}",
                scrubbed,
                location.file(),
                location.line(),
                location.column()
            );
        } else {
            eprintln!("fxa-bridge panic: {}", scrubbed);
        }
    }));
}

fn is_sensitive_param(name: &str) -> bool {
    SENSITIVE_PARAMS
        .iter()
        .any(|sensitive| sensitive.eq_ignore_ascii_case(name))
}

fn has_sensitive_marker(name: &str) -> bool {
    let lowered = name.to_ascii_lowercase();
    SENSITIVE_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

fn redact_chunk(chunk: &str) -> String {
    if has_sensitive_marker(chunk) || looks_like_secret_value(chunk) {
        REDACTED.to_owned()
    } else {
        chunk.to_owned()
    }
}

fn looks_like_secret_value(value: &str) -> bool {
    let cleaned = value.trim_matches(|ch: char| !ch.is_ascii_alphanumeric());

    let has_mixed = cleaned.chars().any(|ch| ch.is_ascii_alphabetic())
        && cleaned.chars().any(|ch| ch.is_ascii_digit());

    cleaned.len() >= 6 && (cleaned.chars().all(|ch| ch.is_ascii_digit()) || has_mixed)
}
