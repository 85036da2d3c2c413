//! Order orchestration core.
//!
//! Coordinates the identity directory, the item stock ledger, and the
//! order store to implement order creation (with per-item stock
//! reservation and compensation on partial failure) and cancellation
//! (with stock restoration). The orchestrator is stateless between
//! calls and issues its downstream calls sequentially.

pub mod error;
pub mod orchestrator;
pub mod services;

pub use error::OrchestratorError;
pub use orchestrator::{NewOrder, NewOrderItem, OrderOrchestrator};
pub use services::catalog::{CatalogItem, InMemoryStockLedger, LedgerError, StockLedger};
pub use services::identity::{DirectoryError, IdentityDirectory, InMemoryIdentityDirectory};

/// Convenience type alias for orchestrator results.
pub type Result<T> = std::result::Result<T, OrchestratorError>;
