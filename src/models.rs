use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeMap;

/// One archived message from a list table.
///
/// Rows are written by the ingestion pipeline; this crate only reads them.
/// `references` is NULL for thread-starting messages.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Email {
    pub message_id: String,
    pub date: DateTime<Utc>,
    pub subject: String,
    /// Display name of the sender.
    pub sender: String,
    /// Address of the sender.
    pub email: String,
    pub content: String,
    pub thread_id: String,
    pub references: Option<String>,
}

/// Years mapped to the months that may hold archives, oldest year first.
pub type ArchiveMonths = BTreeMap<i32, Vec<u32>>;
