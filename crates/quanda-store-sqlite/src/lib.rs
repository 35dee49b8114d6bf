//! SQLite backend for the quanda question store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! pool without blocking the async runtime.

mod schema;
mod store;

pub use store::SqliteStore;

#[cfg(test)]
mod tests;
