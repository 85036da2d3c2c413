//! Identity directory contract and in-memory double.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use domain::UserId;
use thiserror::Error;

/// Errors returned by the identity directory.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DirectoryError {
    /// The directory could not be reached.
    #[error("Directory unavailable: {0}")]
    Unavailable(String),
}

/// Remote identity directory; the core only asks whether a user exists.
#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    /// Returns true if a record exists for the given user ID.
    async fn exists(&self, user_id: &UserId) -> Result<bool, DirectoryError>;
}

#[derive(Debug, Default)]
struct DirectoryState {
    users: HashSet<UserId>,
    unavailable: bool,
}

/// In-memory identity directory for tests and the default server wiring.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIdentityDirectory {
    state: Arc<RwLock<DirectoryState>>,
}

impl InMemoryIdentityDirectory {
    /// Creates a new empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user.
    pub fn add_user(&self, user_id: impl Into<UserId>) {
        self.state.write().unwrap().users.insert(user_id.into());
    }

    /// Makes all subsequent calls fail as transport errors.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.write().unwrap().unavailable = unavailable;
    }
}

#[async_trait]
impl IdentityDirectory for InMemoryIdentityDirectory {
    async fn exists(&self, user_id: &UserId) -> Result<bool, DirectoryError> {
        let state = self.state.read().unwrap();
        if state.unavailable {
            return Err(DirectoryError::Unavailable(
                "connection refused".to_string(),
            ));
        }
        Ok(state.users.contains(user_id))
    }
}
