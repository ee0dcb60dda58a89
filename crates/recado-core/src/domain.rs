use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Application user id (Supabase `profiles.user_id`, a UUID string).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Sender address on the inbound messaging transport (a phone number).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PhoneNumber(pub String);

/// One text message pulled out of a transport payload.
#[derive(Clone, Debug)]
pub struct InboundMessage {
    pub from: PhoneNumber,
    pub text: String,
    pub kind: MessageKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Text,
    /// Media, reactions, stickers, anything else. Skipped, never an error.
    Other,
}

/// Task priority. Unknown tokens normalize to `Medium`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Case-insensitive parse with the historical fallback to `Medium`.
    pub fn parse_or_default(token: &str) -> Self {
        match token.trim().to_lowercase().as_str() {
            "low" => Priority::Low,
            "medium" => Priority::Medium,
            "high" => Priority::High,
            _ => Priority::Medium,
        }
    }
}

/// Tasks created through the chat path always start out pending.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TaskRecord {
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: TaskStatus,
    pub due_date: Option<DateTime<Local>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventRecord {
    pub user_id: UserId,
    pub title: String,
    pub start_time: DateTime<Local>,
    pub end_time: DateTime<Local>,
    pub location: String,
    pub description: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContactRecord {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub position: String,
}

/// Which record type a message produced (or tried to).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    Task,
    Event,
    Contact,
    None,
}

/// A stored record, echoed back from the storage layer.
#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum Record {
    Task(TaskRecord),
    Event(EventRecord),
    Contact(ContactRecord),
}

/// Uniform per-message result returned by the dispatcher.
#[derive(Clone, Debug, Serialize)]
pub struct CommandOutcome {
    pub success: bool,
    pub record_type: RecordType,
    pub record: Option<Record>,
    pub error: Option<String>,
}

impl CommandOutcome {
    pub fn stored(record_type: RecordType, record: Record) -> Self {
        Self {
            success: true,
            record_type,
            record: Some(record),
            error: None,
        }
    }

    pub fn failed(record_type: RecordType, error: impl ToString) -> Self {
        Self {
            success: false,
            record_type,
            record: None,
            error: Some(error.to_string()),
        }
    }
}
