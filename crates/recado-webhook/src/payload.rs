//! WhatsApp Cloud-API webhook payload shapes.
//!
//! Every level is optional: notification payloads (delivery receipts, status
//! updates) share the same envelope but carry no messages, and those must
//! deserialize cleanly into "nothing to do".

use serde::Deserialize;

use recado_core::domain::{InboundMessage, MessageKind, PhoneNumber};

#[derive(Debug, Default, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub entry: Vec<Entry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub changes: Vec<Change>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Change {
    pub value: Option<ChangeValue>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChangeValue {
    #[serde(default)]
    pub messages: Vec<RawMessage>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawMessage {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub from: String,
    pub text: Option<TextBody>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TextBody {
    #[serde(default)]
    pub body: String,
}

impl WebhookPayload {
    /// Pull the ordered message list out of the envelope.
    ///
    /// Only the first entry's first change is inspected; that is where the
    /// Cloud API puts inbound messages.
    pub fn messages(&self) -> Vec<InboundMessage> {
        let Some(value) = self
            .entry
            .first()
            .and_then(|e| e.changes.first())
            .and_then(|c| c.value.as_ref())
        else {
            return Vec::new();
        };

        value
            .messages
            .iter()
            .map(|m| InboundMessage {
                from: PhoneNumber(m.from.clone()),
                text: m
                    .text
                    .as_ref()
                    .map(|t| t.body.trim().to_string())
                    .unwrap_or_default(),
                kind: if m.kind == "text" {
                    MessageKind::Text
                } else {
                    MessageKind::Other
                },
            })
            .collect()
    }
}
