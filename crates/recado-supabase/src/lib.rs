//! Supabase storage adapter.
//!
//! Talks to the project's PostgREST endpoint (`/rest/v1/...`) with the anon
//! key, the same way the dashboard frontend does. Inserts ask for
//! `return=representation` so the stored row comes back and can be echoed in
//! the command outcome.

use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use recado_core::{
    domain::{ContactRecord, EventRecord, TaskRecord, UserId},
    errors::Error,
    ports::Store,
    Result,
};

#[derive(Clone, Debug)]
pub struct SupabaseStore {
    base_url: String,
    anon_key: String,
    http: reqwest::Client,
}

impl SupabaseStore {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("reqwest client build");
        Self {
            base_url: base_url.into(),
            anon_key: anon_key.into(),
            http,
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    async fn insert_row<T>(&self, table: &str, row: &T) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
    {
        let resp = self
            .http
            .post(self.table_url(table))
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await
            .map_err(|e| Error::Storage(format!("{table} insert request error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Storage(format!(
                "{table} insert failed: {status} {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| Error::Storage(format!("{table} insert read error: {e}")))?;
        first_row(table, &body)
    }
}

#[async_trait]
impl Store for SupabaseStore {
    async fn find_user_by_phone(&self, phone: &str) -> Result<Option<UserId>> {
        let phone_filter = format!("eq.{phone}");
        let resp = self
            .http
            .get(self.table_url("profiles"))
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .query(&[("select", "user_id"), ("phone", phone_filter.as_str())])
            .send()
            .await
            .map_err(|e| Error::Storage(format!("profiles lookup request error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            return Err(Error::Storage(format!("profiles lookup failed: {status}")));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| Error::Storage(format!("profiles lookup read error: {e}")))?;
        parse_user_id(&body)
    }

    async fn insert_task(&self, task: TaskRecord) -> Result<TaskRecord> {
        self.insert_row("tasks", &task).await
    }

    async fn insert_event(&self, event: EventRecord) -> Result<EventRecord> {
        self.insert_row("calendar_events", &event).await
    }

    async fn insert_contact(&self, contact: ContactRecord) -> Result<ContactRecord> {
        self.insert_row("contacts", &contact).await
    }
}

#[derive(Deserialize)]
struct ProfileRow {
    user_id: String,
}

/// PostgREST answers a filtered select with a JSON array; zero rows means no
/// profile carries that phone number.
fn parse_user_id(body: &str) -> Result<Option<UserId>> {
    let rows: Vec<ProfileRow> = serde_json::from_str(body)
        .map_err(|e| Error::Storage(format!("profiles lookup parse error: {e}")))?;
    Ok(rows.into_iter().next().map(|r| UserId(r.user_id)))
}

/// `return=representation` answers inserts with a one-element JSON array.
fn first_row<T: DeserializeOwned>(table: &str, body: &str) -> Result<T> {
    let rows: Vec<T> = serde_json::from_str(body)
        .map_err(|e| Error::Storage(format!("{table} insert parse error: {e}")))?;
    rows.into_iter()
        .next()
        .ok_or_else(|| Error::Storage(format!("{table} insert returned no rows")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Local};
    use recado_core::domain::{Priority, TaskStatus};

    #[test]
    fn user_id_parses_from_profile_rows() {
        let id = parse_user_id(r#"[{"user_id":"5e9b1c2d"}]"#).unwrap();
        assert_eq!(id, Some(UserId("5e9b1c2d".to_string())));

        assert_eq!(parse_user_id("[]").unwrap(), None);
        assert!(parse_user_id("not json").is_err());
    }

    #[test]
    fn stored_task_row_round_trips_with_extra_columns() {
        // PostgREST echoes server-assigned columns (id, created_at) alongside
        // what we sent; those must not break deserialization.
        let body = r#"[{
            "id": "d1a2",
            "created_at": "2025-06-27T12:00:00+00:00",
            "user_id": "u-1",
            "title": "Revisar contrato",
            "description": "",
            "priority": "medium",
            "status": "pending",
            "due_date": "2025-06-28T00:00:00-03:00"
        }]"#;

        let task: TaskRecord = first_row("tasks", body).unwrap();
        assert_eq!(task.title, "Revisar contrato");
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.status, TaskStatus::Pending);
        let due: DateTime<Local> = task.due_date.unwrap();
        let expected = DateTime::parse_from_rfc3339("2025-06-28T00:00:00-03:00").unwrap();
        assert_eq!(due, expected);
    }

    #[test]
    fn empty_insert_response_is_a_storage_error() {
        let err = first_row::<TaskRecord>("tasks", "[]").unwrap_err();
        assert!(err.to_string().contains("no rows"));
    }

    #[test]
    fn table_urls_are_rooted_at_rest_v1() {
        let store = SupabaseStore::new(
            "https://abc123.supabase.co",
            "anon",
            Duration::from_secs(10),
        );
        assert_eq!(
            store.table_url("calendar_events"),
            "https://abc123.supabase.co/rest/v1/calendar_events"
        );
    }
}
