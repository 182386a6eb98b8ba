use prometheus::Registry;
use std::sync::Arc;
use std::time::Instant;

use crate::metrics;
use crate::store::{EmployeeStore, MemoryEmployeeStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EmployeeStore>,
    pub started_at: Instant,
    pub registry: Registry,
}

impl AppState {
    pub fn new(store: Arc<dyn EmployeeStore>, registry: Registry) -> Self {
        Self {
            store,
            started_at: Instant::now(),
            registry,
        }
    }

    /// State backed by an empty in-memory store and a fresh metrics registry
    pub fn in_memory() -> prometheus::Result<Self> {
        Ok(Self::new(
            Arc::new(MemoryEmployeeStore::new()),
            metrics::new_registry()?,
        ))
    }
}
