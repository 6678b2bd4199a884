use crate::record_store::{Clock, RecordStore};
use crate::storage::StoragePort;
use crate::task::{TaskPatch, TaskRecord, TaskStatus};

pub const COLUMNS: [TaskStatus; 2] = [TaskStatus::Active, TaskStatus::Completed];

/// Cached Active / Completed columns plus cursor state for the terminal view.
#[derive(Debug, Default)]
pub struct Board {
    pub active: Vec<TaskRecord>,
    pub completed: Vec<TaskRecord>,
    pub selected_column: usize,
    pub selected_task: usize,
    pub error: Option<String>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn refresh<S: StoragePort, C: Clock>(&mut self, store: &RecordStore<S, C>) {
        let tasks = store.list().await;
        let (completed, active): (Vec<_>, Vec<_>) = tasks.into_iter().partition(|t| t.completed);
        self.active = active;
        self.completed = completed;
        self.clamp_selection();
    }

    pub fn column(&self, status: TaskStatus) -> &[TaskRecord] {
        match status {
            TaskStatus::Active => &self.active,
            TaskStatus::Completed => &self.completed,
        }
    }

    pub fn selected_status(&self) -> TaskStatus {
        COLUMNS[self.selected_column]
    }

    pub fn selected(&self) -> Option<&TaskRecord> {
        self.column(self.selected_status()).get(self.selected_task)
    }

    pub fn move_column(&mut self, direction: isize) {
        self.selected_column =
            (self.selected_column as isize + direction).clamp(0, COLUMNS.len() as isize - 1) as usize;
        self.clamp_selection();
    }

    pub fn move_task(&mut self, direction: isize) {
        let len = self.column(self.selected_status()).len() as isize;
        if len == 0 {
            self.selected_task = 0;
            return;
        }
        self.selected_task = (self.selected_task as isize + direction).clamp(0, len - 1) as usize;
    }

    pub async fn add<S: StoragePort, C: Clock>(
        &mut self,
        store: &RecordStore<S, C>,
        heading: &str,
        description: &str,
    ) {
        match store.create(heading, description).await {
            Ok(_) => self.error = None,
            Err(err) => self.error = Some(format!("Failed to add task: {err}")),
        }
        self.refresh(store).await;
    }

    /// Completes an active task or restores a completed one.
    pub async fn toggle_selected<S: StoragePort, C: Clock>(&mut self, store: &RecordStore<S, C>) {
        let Some(task) = self.selected() else {
            return;
        };
        let (id, completed) = (task.id, task.completed);
        match store.set_completed(id, !completed).await {
            Ok(_) => self.error = None,
            Err(err) => self.error = Some(format!("Failed to update task: {err}")),
        }
        self.refresh(store).await;
    }

    /// Unchanged text (after trimming) skips the store call.
    pub async fn edit_selected<S: StoragePort, C: Clock>(
        &mut self,
        store: &RecordStore<S, C>,
        heading: &str,
        description: &str,
    ) {
        let Some(task) = self.selected() else {
            return;
        };
        if task.heading == heading.trim() && task.description == description.trim() {
            self.error = None;
            return;
        }
        let id = task.id;
        let patch = TaskPatch::new()
            .with_heading(heading)
            .with_description(description);
        match store.update(id, patch).await {
            Ok(_) => self.error = None,
            Err(err) => self.error = Some(format!("Failed to update task: {err}")),
        }
        self.refresh(store).await;
    }

    pub async fn delete_selected<S: StoragePort, C: Clock>(&mut self, store: &RecordStore<S, C>) {
        let Some(id) = self.selected().map(|t| t.id) else {
            return;
        };
        match store.delete(id).await {
            Ok(()) => self.error = None,
            Err(err) => self.error = Some(format!("Failed to delete task: {err}")),
        }
        self.refresh(store).await;
    }

    fn clamp_selection(&mut self) {
        let len = self.column(self.selected_status()).len();
        if self.selected_task >= len {
            self.selected_task = len.saturating_sub(1);
        }
    }
}
