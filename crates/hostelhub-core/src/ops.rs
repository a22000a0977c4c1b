//! Portal operations: discrete fetches and mutate-then-refetch writes.
//!
//! Each fetch is a full read of one top-level subtree followed by a
//! from-scratch derivation; nothing is merged incrementally into a
//! cached view. Mutations issue one best-effort write and, on success,
//! synchronously refetch the affected view — the displayed state is
//! always the result of the most recent successful derivation, trading
//! latency for consistency against concurrent external writers. If the
//! write fails, no refetch happens and the caller sees a retriable
//! [`PortalError::WriteFailed`].
//!
//! Sessions are produced by the authentication layer outside this crate;
//! the portal only checks the admin flag, before any store access.

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::complaints::{normalize, ComplaintView};
use crate::directory::Directory;
use crate::error::PortalError;
use crate::models::{Hostel, Notification, StudentId};
use crate::store::{paths, TreeStore};
use crate::topology;

/// An authenticated caller, as reported by the (external) auth layer.
#[derive(Debug, Clone)]
pub struct Session {
    pub uid: String,
    admin: bool,
}

impl Session {
    pub fn admin(uid: impl Into<String>) -> Session {
        Session {
            uid: uid.into(),
            admin: true,
        }
    }

    pub fn student(uid: impl Into<String>) -> Session {
        Session {
            uid: uid.into(),
            admin: false,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.admin
    }
}

/// The portal facade: every admin-console operation, expressed over an
/// abstract [`TreeStore`].
pub struct Portal {
    store: Arc<dyn TreeStore>,
}

impl Portal {
    pub fn new(store: Arc<dyn TreeStore>) -> Portal {
        Portal { store }
    }

    async fn read(&self, path: &str) -> Result<Option<Value>, PortalError> {
        self.store.read(path).await.map_err(PortalError::ReadFailed)
    }

    fn ensure_admin(session: &Session) -> Result<(), PortalError> {
        if session.is_admin() {
            Ok(())
        } else {
            Err(PortalError::Unauthenticated)
        }
    }

    /// Fresh snapshot of the student directory. An absent subtree is an
    /// empty directory, not an error.
    pub async fn fetch_students(&self) -> Result<Directory, PortalError> {
        let tree = self.read(paths::STUDENTS).await?;
        Ok(Directory::from_tree(tree.as_ref()))
    }

    /// Fetch and normalize the whole `Complain/` subtree.
    pub async fn fetch_complaints(&self) -> Result<ComplaintView, PortalError> {
        let tree = self.read(paths::COMPLAINTS).await?;
        Ok(normalize(tree.as_ref()))
    }

    /// Fetch every hostel, reconciling stored occupancy facts onto a
    /// regenerated lattice. Entries that do not parse as hostels are
    /// dropped.
    pub async fn fetch_hostels(&self) -> Result<Vec<Hostel>, PortalError> {
        let tree = self.read(paths::HOSTELS).await?;
        let Some(entries) = tree.as_ref().and_then(Value::as_object) else {
            return Ok(Vec::new());
        };
        let mut hostels = Vec::new();
        for (key, value) in entries {
            let Ok(mut hostel) = serde_json::from_value::<Hostel>(value.clone()) else {
                continue;
            };
            hostel.id = key.clone();
            hostels.push(topology::reconcile(&hostel));
        }
        Ok(hostels)
    }

    /// Fetch all notifications, newest first. Records with unparseable
    /// dates sort last.
    pub async fn fetch_notifications(&self) -> Result<Vec<Notification>, PortalError> {
        let tree = self.read(paths::NOTIFICATIONS).await?;
        let Some(entries) = tree.as_ref().and_then(Value::as_object) else {
            return Ok(Vec::new());
        };
        let mut notices = Vec::new();
        for (key, value) in entries {
            let Ok(mut notice) = serde_json::from_value::<Notification>(value.clone()) else {
                continue;
            };
            if notice.id.is_empty() {
                notice.id = key.clone();
            }
            notices.push(notice);
        }
        notices.sort_by(|a, b| b.date().cmp(&a.date()));
        Ok(notices)
    }

    /// Flip one complaint's `resolved` flag and refetch the normalized
    /// view.
    ///
    /// The current value is read from the exact record path (two levels
    /// for a direct complaint, three when `sub_id` is present), its
    /// negation written back to that record's `resolved` field, and the
    /// whole subtree re-normalized. On write failure nothing is
    /// refetched, so the displayed state is untouched and the toggle is
    /// safe to retry.
    pub async fn toggle_resolution(
        &self,
        session: &Session,
        owner: &StudentId,
        group_id: &str,
        sub_id: Option<&str>,
    ) -> Result<ComplaintView, PortalError> {
        Self::ensure_admin(session)?;

        let record_path = paths::complaint(owner, group_id, sub_id);
        let record = self
            .read(&record_path)
            .await?
            .ok_or_else(|| PortalError::NotFound(record_path.clone()))?;
        let current = record
            .get("resolved")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let updates = [(
            paths::complaint_resolved(owner, group_id, sub_id),
            json!(!current),
        )];
        self.store
            .write_many(&updates)
            .await
            .map_err(PortalError::WriteFailed)?;

        self.fetch_complaints().await
    }

    /// Generate a hostel lattice, persist it under a fresh key, and
    /// refetch the hostel list.
    pub async fn create_hostel(
        &self,
        session: &Session,
        name: &str,
        floor_count: u32,
        rooms_per_floor: u32,
    ) -> Result<Vec<Hostel>, PortalError> {
        Self::ensure_admin(session)?;
        if floor_count == 0 || rooms_per_floor == 0 {
            return Err(PortalError::InvalidTopology(format!(
                "{floor_count} floors x {rooms_per_floor} rooms"
            )));
        }

        let hostel = Hostel {
            id: String::new(),
            name: name.to_string(),
            floors: topology::build(floor_count, rooms_per_floor),
        };
        let value =
            serde_json::to_value(&hostel).map_err(|e| PortalError::WriteFailed(e.into()))?;

        let key = self
            .store
            .push(paths::HOSTELS)
            .await
            .map_err(PortalError::WriteFailed)?;
        self.store
            .write(&paths::hostel(&key), value)
            .await
            .map_err(PortalError::WriteFailed)?;

        self.fetch_hostels().await
    }

    /// Publish a notification and refetch the sorted list.
    pub async fn create_notification(
        &self,
        session: &Session,
        message: &str,
        date: NaiveDate,
        audience: &str,
    ) -> Result<Vec<Notification>, PortalError> {
        Self::ensure_admin(session)?;

        let key = self
            .store
            .push(paths::NOTIFICATIONS)
            .await
            .map_err(PortalError::WriteFailed)?;
        let notice = Notification {
            id: key.clone(),
            message: message.to_string(),
            date_raw: date.format("%Y-%m-%d").to_string(),
            hostels: audience.to_string(),
        };
        let value =
            serde_json::to_value(&notice).map_err(|e| PortalError::WriteFailed(e.into()))?;
        self.store
            .write(&paths::notification(&key), value)
            .await
            .map_err(PortalError::WriteFailed)?;

        self.fetch_notifications().await
    }
}
