//! Data access layer.
//!
//! Handlers talk to a [`Store`] trait object so the Postgres backend can be
//! swapped for [`MemoryStore`] in tests. Every call is a single round-trip;
//! nothing is cached between requests.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{CatalogTable, NamedRow, NewSchedule, Schedule, ScheduleView};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("foreign key violation: {0}")]
    ForeignKey(String),
}

/// Update and delete return the number of affected rows. A zero count is
/// not an error: touching an id that does not exist still succeeds.
#[async_trait]
pub trait Store: Send + Sync {
    /// Liveness probe.
    async fn ping(&self) -> Result<(), StoreError>;

    async fn list_named(&self, table: CatalogTable) -> Result<Vec<NamedRow>, StoreError>;
    async fn insert_named(&self, table: CatalogTable, name: &str) -> Result<i32, StoreError>;
    async fn update_named(
        &self,
        table: CatalogTable,
        id: i32,
        name: &str,
    ) -> Result<u64, StoreError>;
    async fn delete_named(&self, table: CatalogTable, id: i32) -> Result<u64, StoreError>;

    /// Schedules joined with their teacher, group, subject and classroom,
    /// ordered by id. Rows whose references do not resolve are left out.
    async fn list_schedules(&self) -> Result<Vec<ScheduleView>, StoreError>;
    async fn insert_schedule(&self, schedule: &NewSchedule) -> Result<i32, StoreError>;
    async fn update_schedule(&self, schedule: &Schedule) -> Result<u64, StoreError>;
    async fn delete_schedule(&self, id: i32) -> Result<u64, StoreError>;
}
