use async_trait::async_trait;

use crate::{
    domain::{ContactRecord, EventRecord, TaskRecord, UserId},
    Result,
};

/// Hexagonal port for the persistence layer.
///
/// Supabase is the first implementation; tests use an in-memory double. Each
/// insert echoes the stored row back (with server-assigned columns filled in)
/// so the dispatcher can surface exactly what was persisted.
#[async_trait]
pub trait Store: Send + Sync {
    /// Identity resolution: map a sender phone number to the owning user.
    async fn find_user_by_phone(&self, phone: &str) -> Result<Option<UserId>>;

    async fn insert_task(&self, task: TaskRecord) -> Result<TaskRecord>;
    async fn insert_event(&self, event: EventRecord) -> Result<EventRecord>;
    async fn insert_contact(&self, contact: ContactRecord) -> Result<ContactRecord>;
}
