//! Catalog service for a dataset vault: tracks datasets, their version
//! exports, archived OCFL object versions, and the tar containers they are
//! sealed into.
//!
//! Layers, outermost first:
//! - `http_server` — axum API plus a few HTML views;
//! - `catalog` — the consistency engine; every cross-entity write goes
//!   through it inside one transaction;
//! - `database` — SQLite storage, models, and query functions;
//! - `search_index` — optional notification of an external search service.

pub mod catalog;
pub mod config;
pub mod database;
pub mod http_server;
pub mod process;
pub mod search_index;
pub mod state;

pub use catalog::{Catalog, CatalogError};
pub use config::{Config, ConfigError};
pub use database::{Database, DatabaseSetupError};
pub use state::{State, StateSetupError};
