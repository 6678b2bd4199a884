//! Parse-and-validate step between the raw slot and typed records.
//!
//! Older blobs may lack fields added later. `completed` defaults to `false`
//! and `updatedAt` to `createdAt`; unknown fields are ignored. Anything that
//! would let an invalid record into memory is reported as
//! [`StoreError::StorageRead`].

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::task::{normalize_text, TaskRecord};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredTask {
    id: Uuid,
    heading: String,
    description: String,
    #[serde(default)]
    completed: bool,
    created_at: DateTime<Utc>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

pub fn decode(raw: &str) -> Result<Vec<TaskRecord>> {
    let stored: Vec<StoredTask> =
        serde_json::from_str(raw).map_err(|e| StoreError::StorageRead(e.to_string()))?;

    let mut seen = HashSet::with_capacity(stored.len());
    let mut tasks = Vec::with_capacity(stored.len());
    for (index, entry) in stored.into_iter().enumerate() {
        if !seen.insert(entry.id) {
            return Err(StoreError::StorageRead(format!(
                "duplicate id {} at index {index}",
                entry.id
            )));
        }

        let heading = normalize_text("heading", &entry.heading).map_err(|e| invalid(index, e))?;
        let description =
            normalize_text("description", &entry.description).map_err(|e| invalid(index, e))?;

        let updated_at = entry.updated_at.unwrap_or(entry.created_at);
        if updated_at < entry.created_at {
            return Err(StoreError::StorageRead(format!(
                "record at index {index} was updated before it was created"
            )));
        }

        tasks.push(TaskRecord {
            id: entry.id,
            heading,
            description,
            completed: entry.completed,
            created_at: entry.created_at,
            updated_at,
        });
    }
    Ok(tasks)
}

pub fn encode(tasks: &[TaskRecord]) -> Result<String> {
    serde_json::to_string(tasks).map_err(|e| StoreError::StorageWrite(e.to_string()))
}

fn invalid(index: usize, err: StoreError) -> StoreError {
    StoreError::StorageRead(format!("record at index {index}: {err}"))
}
