//! The record store: validated CRUD over the persisted task collection.
//!
//! Every mutation loads the whole collection, changes it in memory and writes
//! the whole collection back as one blob. Nothing is written when validation
//! fails or an update targets an unknown id.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::codec;
use crate::error::{Result, StoreError};
use crate::storage::StoragePort;
use crate::task::{normalize_text, TaskPatch, TaskRecord};

/// Source of "now" for timestamping.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

pub struct RecordStore<S, C = SystemClock> {
    storage: S,
    clock: C,
}

impl<S: StoragePort> RecordStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_clock(storage, SystemClock)
    }
}

impl<S: StoragePort, C: Clock> RecordStore<S, C> {
    pub fn with_clock(storage: S, clock: C) -> Self {
        info!(slot = storage.slot(), "opened record store");
        Self { storage, clock }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// All records in insertion order.
    ///
    /// Never fails: an unreadable or corrupt slot is logged and treated as
    /// empty.
    pub async fn list(&self) -> Vec<TaskRecord> {
        match self.read_collection().await {
            Ok(tasks) => tasks,
            Err(err) => {
                warn!(slot = self.storage.slot(), error = %err, "failed to load tasks, using empty list");
                Vec::new()
            }
        }
    }

    /// Strict read: like [`list`](Self::list) but reports corruption.
    pub async fn read_collection(&self) -> Result<Vec<TaskRecord>> {
        let raw = self
            .storage
            .load()
            .await
            .map_err(|e| StoreError::StorageRead(e.to_string()))?;
        match raw {
            Some(raw) if !raw.trim().is_empty() => codec::decode(&raw),
            _ => Ok(Vec::new()),
        }
    }

    pub async fn get(&self, id: Uuid) -> Option<TaskRecord> {
        self.list().await.into_iter().find(|task| task.id == id)
    }

    /// Records with `completed == false`, in insertion order.
    pub async fn active(&self) -> Vec<TaskRecord> {
        self.list().await.into_iter().filter(TaskRecord::is_active).collect()
    }

    /// Records with `completed == true`, in insertion order.
    pub async fn completed(&self) -> Vec<TaskRecord> {
        self.list().await.into_iter().filter(|task| task.completed).collect()
    }

    pub async fn create(&self, heading: &str, description: &str) -> Result<TaskRecord> {
        let heading = normalize_text("heading", heading)?;
        let description = normalize_text("description", description)?;

        let task = TaskRecord::new(heading, description, self.clock.now());
        let mut tasks = self.list().await;
        tasks.push(task.clone());
        self.persist(&tasks).await?;

        debug!(id = %task.id, "created task");
        Ok(task)
    }

    pub async fn update(&self, id: Uuid, patch: TaskPatch) -> Result<TaskRecord> {
        let mut tasks = self.list().await;
        let index = tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or(StoreError::NotFound { id })?;

        let heading = patch
            .heading
            .as_deref()
            .map(|h| normalize_text("heading", h))
            .transpose()?;
        let description = patch
            .description
            .as_deref()
            .map(|d| normalize_text("description", d))
            .transpose()?;

        let now = self.clock.now();
        let task = &mut tasks[index];
        if let Some(heading) = heading {
            task.heading = heading;
        }
        if let Some(description) = description {
            task.description = description;
        }
        if let Some(completed) = patch.completed {
            task.completed = completed;
        }
        // strictly after the previous stamp, even if the clock stepped back
        task.updated_at = now.max(task.updated_at + Duration::nanoseconds(1));
        let updated = task.clone();

        self.persist(&tasks).await?;
        debug!(id = %id, completed = updated.completed, "updated task");
        Ok(updated)
    }

    /// Marks a record completed or active again.
    pub async fn set_completed(&self, id: Uuid, completed: bool) -> Result<TaskRecord> {
        self.update(id, TaskPatch::new().completed(completed)).await
    }

    /// Removes `id` if present. A missing id is not an error.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let mut tasks = self.list().await;
        let before = tasks.len();
        tasks.retain(|task| task.id != id);
        self.persist(&tasks).await?;

        debug!(id = %id, removed = before != tasks.len(), "deleted task");
        Ok(())
    }

    async fn persist(&self, tasks: &[TaskRecord]) -> Result<()> {
        let blob = codec::encode(tasks)?;
        self.storage
            .save(blob)
            .await
            .map_err(|e| StoreError::StorageWrite(e.to_string()))
    }
}
