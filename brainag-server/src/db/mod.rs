//! Persistence layer
//!
//! - Store traits are the seam between services and storage
//! - `PgStore` delegates to one borrowed-pool repository per table
//! - `MemoryStore` keeps the same tables in process for tests
//! - Guarded deletes are single statements; foreign keys are the backstop

pub mod criteria;
pub mod memory;
pub mod pool;
pub mod repos;
pub mod store;

pub use memory::MemoryStore;
pub use pool::{create_pool, create_pool_with_options, DEFAULT_MAX_CONNECTIONS, MIGRATOR};
pub use repos::{DbError, DeleteOutcome};
pub use store::{
    CropStore, DashboardStore, FarmStore, HarvestStore, PgStore, ProducerStore, Store,
};
