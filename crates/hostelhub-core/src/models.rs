//! Core data models used throughout HostelHub.
//!
//! These types represent the students, complaints, hostels, and
//! notifications that flow through the fetch/normalize/render pipeline.
//! Wire field names follow the store schema (`desc`, `roomNo`, `sid`, …)
//! via serde renames, so a typed record round-trips against trees written
//! by the original web clients.

use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A real, store-assigned student key (the key under `Student/`).
///
/// Deliberately a distinct type from [`SeatId`]: both are plain strings on
/// the wire and conflating them produces joins between a generated seat
/// label and an actual enrolled student.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(String);

impl StudentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StudentId {
    fn from(s: &str) -> Self {
        StudentId(s.to_string())
    }
}

impl From<String> for StudentId {
    fn from(s: String) -> Self {
        StudentId(s)
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A synthetic per-room seat label generated by topology construction.
///
/// Derived purely from the room number (`S001` for room 1, `S101` for
/// room 101). A placeholder, not a live occupancy fact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeatId(String);

impl SeatId {
    /// Canonical seat label for a room: `S` + room number, zero-padded
    /// to width 3.
    pub fn for_room(room_no: u32) -> Self {
        SeatId(format!("S{room_no:03}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One student's profile as stored under `Student/{id}`.
///
/// Every field except the id is optional — registration leaves holes and
/// the presentation layer chooses the filler text. An immutable snapshot
/// per fetch, replaced wholesale on refresh.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentRecord {
    #[serde(skip)]
    pub id: StudentId,
    pub name: Option<String>,
    pub email: Option<String>,
    pub number: Option<String>,
    pub department: Option<String>,
    pub degree: Option<String>,
    pub year: Option<String>,
    pub gender: Option<String>,
    pub hostel_name: Option<String>,
    pub room_no: Option<String>,
    pub parent_name: Option<String>,
    pub parent_number: Option<String>,
}

impl StudentRecord {
    /// Sentinel record returned when an id has no directory entry.
    /// Lookups must never block rendering of otherwise-valid data.
    pub fn unknown(id: StudentId) -> Self {
        StudentRecord {
            id,
            name: Some("Unknown Student".to_string()),
            email: Some("N/A".to_string()),
            number: Some("N/A".to_string()),
            ..StudentRecord::default()
        }
    }
}

/// A flattened, typed complaint derived from the irregular `Complain/`
/// subtree. Never stored back in this shape.
#[derive(Debug, Clone, Serialize)]
pub struct ComplaintRecord {
    /// Student who filed the complaint (top-level key).
    pub owner: StudentId,
    /// First-level key under which the raw data was nested.
    pub group_id: String,
    /// Second-level key, present only when the raw data had a second
    /// nesting level.
    pub sub_id: Option<String>,
    pub topic: Option<String>,
    #[serde(rename = "desc")]
    pub description: Option<String>,
    pub resolved: bool,
    /// Fields the raw object carried beyond topic/desc/resolved,
    /// preserved verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ComplaintRecord {
    /// Identity for deduplication and UI keys.
    pub fn key(&self) -> (&StudentId, &str, Option<&str>) {
        (&self.owner, &self.group_id, self.sub_id.as_deref())
    }
}

/// Sparse mapping from student id to complaint count. Students with no
/// surviving complaints are omitted entirely.
pub type ComplaintAggregate = HashMap<StudentId, usize>;

/// A hostel: store key, display name, and an ordered floor lattice.
///
/// Wire shape under `Hostel/{id}`:
/// `{name, floors: [{room: [{roomNo, occupied, sid}]}]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Hostel {
    #[serde(skip)]
    pub id: String,
    pub name: String,
    pub floors: Vec<Floor>,
}

/// One floor, indexed by position (floor 0 is the ground floor).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Floor {
    #[serde(rename = "room")]
    pub rooms: Vec<Room>,
}

/// A single room. `seat` is the generated placeholder label; `occupied`
/// is a live fact recorded by allocation flows outside this crate and
/// merged in during reconciliation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Room {
    #[serde(rename = "roomNo")]
    pub room_no: u32,
    pub occupied: bool,
    #[serde(rename = "sid")]
    pub seat: SeatId,
}

/// A broadcast notice stored flat under `Notification/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Notification {
    /// Store-generated key, also written into the record itself so the
    /// web clients can read it back without the surrounding key.
    pub id: String,
    pub message: String,
    /// ISO date string (`YYYY-MM-DD`). Kept raw; see [`Notification::date`].
    #[serde(rename = "date")]
    pub date_raw: String,
    /// Audience label ("All Hostels" or a hostel name).
    pub hostels: String,
}

impl Notification {
    /// Parsed date, `None` when the raw string is not `YYYY-MM-DD`.
    /// Unparseable dates sort after all dated notices.
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date_raw, "%Y-%m-%d").ok()
    }
}
