//! Error taxonomy for portal operations.
//!
//! Normalization and topology building never fail — malformed input
//! degrades to empty or partial views. Only four conditions surface to
//! callers, and only [`PortalError::WriteFailed`] is expected to reach a
//! user as a retriable warning.

use thiserror::Error;

/// Failures surfaced by [`Portal`](crate::ops::Portal) operations.
#[derive(Debug, Error)]
pub enum PortalError {
    /// A mutating operation was invoked without an admin session.
    /// Checked before any store access.
    #[error("not signed in as an administrator")]
    Unauthenticated,

    /// The backing read failed (network, permission). Distinct from an
    /// absent path, which fetches map to an empty view.
    #[error("store read failed")]
    ReadFailed(#[source] anyhow::Error),

    /// The store rejected a write. No local state has changed and no
    /// refetch has happened; the operation is safe to retry.
    #[error("write failed")]
    WriteFailed(#[source] anyhow::Error),

    /// A mutation addressed a path that does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Hostel creation was asked for a degenerate lattice.
    #[error("invalid topology: {0}")]
    InvalidTopology(String),
}
