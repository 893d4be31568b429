//! Session repository trait.

use async_trait::async_trait;

use crate::AuthError;

use super::{Session, SessionData};

/// Mutation applied to a session under the store's write lock.
///
/// Transition checks live inside the closure so that the check and the
/// write are one critical section; two concurrent transitions on the same
/// session cannot interleave.
pub type SessionUpdate = Box<dyn FnOnce(&mut SessionData) -> Result<(), AuthError> + Send>;

#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Creates a new session and returns its opaque identifier.
    async fn create(&self, data: SessionData) -> Result<String, AuthError>;

    /// Finds a live session. Expired sessions are reported as absent.
    async fn find(&self, session_id: &str) -> Result<Option<Session>, AuthError>;

    /// Applies `f` to the session, serialized per store.
    ///
    /// Returns `Ok(false)` when the session does not exist; a closure
    /// error aborts the update and is propagated.
    async fn update(&self, session_id: &str, f: SessionUpdate) -> Result<bool, AuthError>;

    /// Destroys a session. Destroying an unknown session is not an error.
    async fn destroy(&self, session_id: &str) -> Result<(), AuthError>;

    /// Removes expired sessions, returning how many were pruned.
    async fn prune_expired(&self) -> Result<u64, AuthError>;
}
