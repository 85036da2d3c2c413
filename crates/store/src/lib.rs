//! Order document store.
//!
//! The orchestration core only needs point lookups, inserts, a per-user
//! query, and whole-document updates; this crate defines that contract
//! and an in-memory implementation backing the tests and the default
//! server wiring.

pub mod error;
pub mod memory;
pub mod store;

pub use error::StoreError;
pub use memory::InMemoryOrderStore;
pub use store::OrderStore;

/// Convenience type alias for store results.
pub type Result<T> = std::result::Result<T, StoreError>;
