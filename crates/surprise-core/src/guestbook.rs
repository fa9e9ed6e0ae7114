//! Append-only guestbook persisted in the kv store.
//!
//! The whole log lives under one key as a JSON array, newest entry first,
//! mirroring how the browser page keeps it in local storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, ValidationError};
use crate::events::Event;
use crate::storage::Database;

/// Storage key of the message log.
pub const GUESTBOOK_KEY: &str = "guestbook-messages";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestbookEntry {
    pub id: String,
    pub name: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

pub struct Guestbook<'a> {
    db: &'a Database,
}

impl<'a> Guestbook<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// All entries, newest first.
    ///
    /// A stored log that no longer parses is treated as empty; the next
    /// `sign` overwrites it.
    pub fn entries(&self) -> Result<Vec<GuestbookEntry>, CoreError> {
        let Some(raw) = self.db.kv_get(GUESTBOOK_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                tracing::warn!(error = %e, "guestbook log unreadable, starting fresh");
                Ok(Vec::new())
            }
        }
    }

    /// Add a message. Name and message are trimmed and must not be blank.
    ///
    /// # Errors
    /// Returns a validation error for blank input, or a storage error if the
    /// log cannot be written.
    pub fn sign(&self, name: &str, message: &str) -> Result<(GuestbookEntry, Event), CoreError> {
        let name = non_blank("name", name)?;
        let message = non_blank("message", message)?;

        let entry = GuestbookEntry {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            message: message.to_string(),
            timestamp: Utc::now(),
        };

        let mut entries = self.entries()?;
        entries.insert(0, entry.clone());
        self.db
            .kv_set(GUESTBOOK_KEY, &serde_json::to_string(&entries)?)?;
        tracing::debug!(id = %entry.id, total = entries.len(), "guestbook signed");

        let event = Event::GuestbookSigned {
            id: entry.id.clone(),
            name: entry.name.clone(),
            at: entry.timestamp,
        };
        Ok((entry, event))
    }
}

fn non_blank<'s>(field: &str, value: &'s str) -> Result<&'s str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: "must not be empty".to_string(),
        });
    }
    Ok(trimmed)
}
