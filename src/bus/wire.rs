use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::call::{CallId, InboundReply, OutboundMessage};

#[derive(Debug, Serialize)]
pub(super) struct OutboundEnvelope<'a> {
    pub channel: &'a str,
    pub detail: OutboundDetail<'a>,
}

#[derive(Debug, Serialize)]
pub(super) struct OutboundDetail<'a> {
    pub id: &'a CallId,
    pub data: Value,
}

impl<'a> OutboundEnvelope<'a> {
    pub fn new(channel: &'a str, message: &'a OutboundMessage) -> Self {
        Self {
            channel,
            detail: OutboundDetail {
                id: message.id(),
                data: message.payload(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct InboundEnvelope {
    pub channel: String,
    pub detail: InboundReply,
}
