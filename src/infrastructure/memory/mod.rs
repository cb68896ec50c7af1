//! In-memory repository implementations.
//!
//! [`InMemoryStore`] implements every repository trait over plain vectors
//! behind one `RwLock`. It backs handler tests and local experiments without a
//! database; alias replacement holds the write lock for the whole
//! delete-then-insert, which gives the same per-pair atomicity as the
//! PostgreSQL implementation.

mod store;

pub use store::InMemoryStore;
