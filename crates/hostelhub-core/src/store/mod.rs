//! Storage abstraction for HostelHub.
//!
//! The [`TreeStore`] trait models the hosted realtime database as an
//! abstract key-path tree: partial-path reads and writes, a best-effort
//! batch write, and server-side child key allocation. There is no
//! multi-key atomicity and only best-effort read-after-write visibility;
//! everything above this seam is written to produce correct in-memory
//! views despite that.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::models::StudentId;

/// Abstract tree-structured store.
///
/// All operations are async (via `async-trait`) so the production REST
/// adapter and the in-memory test store share one seam. In-memory
/// implementations return immediately-ready futures.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`read`](TreeStore::read) | Fetch the subtree at a path, `None` if absent |
/// | [`write`](TreeStore::write) | Replace the value at a single path |
/// | [`write_many`](TreeStore::write_many) | Best-effort batch of path writes |
/// | [`push`](TreeStore::push) | Allocate a fresh child key under a path |
#[async_trait]
pub trait TreeStore: Send + Sync {
    /// Single best-effort read of the subtree rooted at `path`.
    ///
    /// An absent path (or an explicit null) is `Ok(None)`, never an
    /// error; errors mean the read itself failed.
    async fn read(&self, path: &str) -> Result<Option<Value>>;

    /// Replace the value at `path`, creating intermediate nodes.
    async fn write(&self, path: &str, value: Value) -> Result<()>;

    /// Apply a batch of path writes. Best-effort: no atomicity across
    /// paths is guaranteed by the store.
    async fn write_many(&self, updates: &[(String, Value)]) -> Result<()>;

    /// Allocate a fresh, unique child key under `parent`. The child is
    /// not materialized until something is written beneath it.
    async fn push(&self, parent: &str) -> Result<String>;
}

/// Canonical path builders for the tree shapes this crate consumes.
///
/// Paths are `/`-joined segments relative to the store root, matching the
/// layout the web clients write: `Student/`, `Complain/`, `Hostel/`,
/// `Notification/`.
pub mod paths {
    use super::StudentId;

    pub const STUDENTS: &str = "Student";
    pub const COMPLAINTS: &str = "Complain";
    pub const HOSTELS: &str = "Hostel";
    pub const NOTIFICATIONS: &str = "Notification";

    /// `Complain/{owner}/{group}` or `Complain/{owner}/{group}/{sub}`,
    /// addressing one exact complaint record.
    pub fn complaint(owner: &StudentId, group_id: &str, sub_id: Option<&str>) -> String {
        match sub_id {
            Some(sub) => format!("{COMPLAINTS}/{owner}/{group_id}/{sub}"),
            None => format!("{COMPLAINTS}/{owner}/{group_id}"),
        }
    }

    /// The `resolved` flag within one complaint record.
    pub fn complaint_resolved(owner: &StudentId, group_id: &str, sub_id: Option<&str>) -> String {
        format!("{}/resolved", complaint(owner, group_id, sub_id))
    }

    pub fn hostel(id: &str) -> String {
        format!("{HOSTELS}/{id}")
    }

    pub fn notification(id: &str) -> String {
        format!("{NOTIFICATIONS}/{id}")
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_complaint_paths_pick_nesting_depth() {
            let owner = StudentId::from("u1");
            assert_eq!(complaint(&owner, "c1", None), "Complain/u1/c1");
            assert_eq!(complaint(&owner, "c1", Some("n2")), "Complain/u1/c1/n2");
            assert_eq!(
                complaint_resolved(&owner, "c1", Some("n2")),
                "Complain/u1/c1/n2/resolved"
            );
        }
    }
}
