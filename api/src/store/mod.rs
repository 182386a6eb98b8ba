//! Record store for employees
//!
//! One table keyed by `id`; every operation is a single parameter-bound
//! statement. `PgEmployeeStore` is the production backend, `MemoryEmployeeStore`
//! backs tests and `EMPLOYEE_STORE=memory`.

mod memory;
mod postgres;

use async_trait::async_trait;
use shared::{Employee, EmployeeChanges, NewEmployee};

pub use memory::MemoryEmployeeStore;
pub use postgres::PgEmployeeStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The unique index on `employee_id` rejected the write
    #[error("employee ID '{0}' is already in use")]
    DuplicateEmployeeId(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// Insert a validated record and return the assigned id
    async fn insert(&self, employee: &NewEmployee) -> StoreResult<i64>;

    /// Apply `changes` to the row with `id`; returns the affected-row count
    /// (zero when no such row exists)
    async fn update_by_id(&self, id: i64, changes: &EmployeeChanges) -> StoreResult<u64>;

    /// Delete the row with `id`. Deleting an absent id is not an error.
    async fn delete_by_id(&self, id: i64) -> StoreResult<u64>;

    /// Every record, ordered by id
    async fn list_all(&self) -> StoreResult<Vec<Employee>>;

    /// Records where any of name, employee ID, email, phone, department or
    /// role contains `needle`. Case-sensitive; wildcards in `needle` match
    /// literally.
    async fn search(&self, needle: &str) -> StoreResult<Vec<Employee>>;

    /// Round trip to the backend for health checks
    async fn ping(&self) -> StoreResult<()>;
}
