//! brainag-server: agricultural records API
//!
//! CRUD over producers, farms, harvests and crops plus a read-only
//! dashboard, backed by PostgreSQL.
//!
//! # Architecture
//!
//! - `models` - domain types, validation and filter criteria
//! - `db` - store traits, PostgreSQL repositories and the in-memory store
//! - `services` - business rules shared by every store
//! - `http` - Axum routes, extractors and error mapping
//! - `seed` - demo data

pub mod db;
pub mod http;
pub mod models;
pub mod seed;
pub mod services;

pub use db::{create_pool, MemoryStore, PgStore, Store, MIGRATOR};
pub use http::{run_server, AppState, ServerConfig};
