//! Local task/shipment tracker.
//!
//! [`RecordStore`] owns validated CRUD over a task collection persisted in a
//! single storage slot. The board and terminal UI are thin views over it.

pub mod board;
pub mod codec;
pub mod config;
pub mod error;
pub mod record_store;
pub mod storage;
pub mod task;
pub mod ui;

pub use error::{Result, StoreError};
pub use record_store::{Clock, RecordStore, SystemClock};
pub use storage::{FileStorage, MemoryStorage, StoragePort};
pub use task::{TaskPatch, TaskRecord, TaskStatus};
