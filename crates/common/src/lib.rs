//! Shared types for the order service workspace.

pub mod types;

pub use types::OrderId;
