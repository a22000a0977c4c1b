//! Portal operations driven end-to-end against the in-memory tree store:
//! fetch/normalize, the mutate-then-refetch protocol, session gating,
//! and the write-failure path.

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;

use hostelhub_core::error::PortalError;
use hostelhub_core::models::StudentId;
use hostelhub_core::ops::{Portal, Session};
use hostelhub_core::store::memory::MemoryTreeStore;

fn seeded_store() -> Arc<MemoryTreeStore> {
    Arc::new(MemoryTreeStore::with_tree(json!({
        "Student": {
            "u1": {"name": "Asha", "email": "asha@example.edu", "number": "111"},
            "u2": {"name": "Bilal", "hostelName": "North Wing", "roomNo": "101"}
        },
        "Complain": {
            "u1": {
                "c1": {"topic": "Noise", "desc": "loud hallway", "resolved": false},
                "c2": {
                    "n1": {"topic": "Water", "desc": "no hot water"},
                    "n2": {"desc": "flickering light"}
                },
                "junk": "not an object"
            },
            "u2": {
                "c3": {"topic": "Mess", "desc": "cold food", "resolved": true}
            }
        },
        "Hostel": {
            "h1": {
                "name": "North Wing",
                "floors": [
                    {"room": [
                        {"roomNo": 1, "occupied": true, "sid": "S001"},
                        {"roomNo": 2, "occupied": false, "sid": "S002"}
                    ]},
                    {"room": [
                        {"roomNo": 101, "occupied": false, "sid": "S101"},
                        {"roomNo": 102, "occupied": true, "sid": "S102"}
                    ]}
                ]
            }
        }
    })))
}

fn admin() -> Session {
    Session::admin("warden-1")
}

#[tokio::test]
async fn test_fetch_students() {
    let portal = Portal::new(seeded_store());
    let dir = portal.fetch_students().await.unwrap();
    assert_eq!(dir.len(), 2);
    let rec = dir.resolve(&StudentId::from("u2"));
    assert_eq!(rec.hostel_name.as_deref(), Some("North Wing"));
}

#[tokio::test]
async fn test_fetch_complaints_counts_and_noise() {
    let portal = Portal::new(seeded_store());
    let view = portal.fetch_complaints().await.unwrap();
    assert_eq!(view.records.len(), 4);
    assert_eq!(view.per_student[&StudentId::from("u1")], 3);
    assert_eq!(view.per_student[&StudentId::from("u2")], 1);
    assert_eq!(view.skipped, 1);
}

#[tokio::test]
async fn test_fetch_on_empty_store_yields_empty_views() {
    let portal = Portal::new(Arc::new(MemoryTreeStore::new()));
    assert!(portal.fetch_students().await.unwrap().is_empty());
    assert!(portal.fetch_complaints().await.unwrap().is_empty());
    assert!(portal.fetch_hostels().await.unwrap().is_empty());
    assert!(portal.fetch_notifications().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_toggle_direct_complaint() {
    let portal = Portal::new(seeded_store());
    let owner = StudentId::from("u1");

    let view = portal
        .toggle_resolution(&admin(), &owner, "c1", None)
        .await
        .unwrap();
    let rec = view
        .records
        .iter()
        .find(|r| r.key() == (&owner, "c1", None))
        .unwrap();
    assert!(rec.resolved);
}

#[tokio::test]
async fn test_toggle_nested_complaint() {
    let portal = Portal::new(seeded_store());
    let owner = StudentId::from("u1");

    let view = portal
        .toggle_resolution(&admin(), &owner, "c2", Some("n1"))
        .await
        .unwrap();
    let rec = view
        .records
        .iter()
        .find(|r| r.key() == (&owner, "c2", Some("n1")))
        .unwrap();
    assert!(rec.resolved);
    // Sibling untouched.
    let sibling = view
        .records
        .iter()
        .find(|r| r.key() == (&owner, "c2", Some("n2")))
        .unwrap();
    assert!(!sibling.resolved);
}

#[tokio::test]
async fn test_toggle_twice_is_involution() {
    let portal = Portal::new(seeded_store());
    let owner = StudentId::from("u2");

    let original = portal.fetch_complaints().await.unwrap().records[3].resolved;
    portal
        .toggle_resolution(&admin(), &owner, "c3", None)
        .await
        .unwrap();
    let view = portal
        .toggle_resolution(&admin(), &owner, "c3", None)
        .await
        .unwrap();
    let rec = view
        .records
        .iter()
        .find(|r| r.key() == (&owner, "c3", None))
        .unwrap();
    assert_eq!(rec.resolved, original);
}

#[tokio::test]
async fn test_toggle_requires_admin() {
    let portal = Portal::new(seeded_store());
    let err = portal
        .toggle_resolution(&Session::student("u1"), &StudentId::from("u1"), "c1", None)
        .await
        .unwrap_err();
    assert!(matches!(err, PortalError::Unauthenticated));
}

#[tokio::test]
async fn test_toggle_missing_record() {
    let portal = Portal::new(seeded_store());
    let err = portal
        .toggle_resolution(&admin(), &StudentId::from("u1"), "nope", None)
        .await
        .unwrap_err();
    assert!(matches!(err, PortalError::NotFound(_)));
}

#[tokio::test]
async fn test_failed_write_leaves_state_untouched() {
    let store = seeded_store();
    let portal = Portal::new(store.clone());
    let owner = StudentId::from("u1");

    store.set_fail_writes(true);
    let err = portal
        .toggle_resolution(&admin(), &owner, "c1", None)
        .await
        .unwrap_err();
    assert!(matches!(err, PortalError::WriteFailed(_)));

    store.set_fail_writes(false);
    let view = portal.fetch_complaints().await.unwrap();
    let rec = view
        .records
        .iter()
        .find(|r| r.key() == (&owner, "c1", None))
        .unwrap();
    assert!(!rec.resolved, "failed toggle must not change stored state");
}

#[tokio::test]
async fn test_create_hostel_round_trip() {
    let portal = Portal::new(Arc::new(MemoryTreeStore::new()));
    let hostels = portal
        .create_hostel(&admin(), "South Wing", 2, 3)
        .await
        .unwrap();

    assert_eq!(hostels.len(), 1);
    let hostel = &hostels[0];
    assert_eq!(hostel.name, "South Wing");
    assert_eq!(hostel.floors.len(), 2);
    let nos: Vec<u32> = hostel.floors[1].rooms.iter().map(|r| r.room_no).collect();
    assert_eq!(nos, vec![101, 102, 103]);
    assert!(hostel.floors.iter().flat_map(|f| &f.rooms).all(|r| !r.occupied));
}

#[tokio::test]
async fn test_create_hostel_rejects_degenerate_lattice() {
    let portal = Portal::new(Arc::new(MemoryTreeStore::new()));
    let err = portal
        .create_hostel(&admin(), "Ghost Wing", 0, 10)
        .await
        .unwrap_err();
    assert!(matches!(err, PortalError::InvalidTopology(_)));
}

#[tokio::test]
async fn test_create_hostel_requires_admin() {
    let portal = Portal::new(Arc::new(MemoryTreeStore::new()));
    let err = portal
        .create_hostel(&Session::student("u1"), "X", 1, 1)
        .await
        .unwrap_err();
    assert!(matches!(err, PortalError::Unauthenticated));
}

#[tokio::test]
async fn test_fetch_hostels_reconciles_occupancy() {
    let store = Arc::new(MemoryTreeStore::with_tree(json!({
        "Hostel": {
            "h1": {
                "name": "Sparse",
                // Only one of three rooms recorded; the rest of the
                // lattice must come back vacant, not vanish.
                "floors": [
                    {"room": [
                        {"roomNo": 2, "occupied": true, "sid": "S002"},
                        {"roomNo": 1},
                        {"roomNo": 3}
                    ]}
                ]
            }
        }
    })));
    let portal = Portal::new(store);
    let hostels = portal.fetch_hostels().await.unwrap();
    let rooms = &hostels[0].floors[0].rooms;
    assert_eq!(rooms.len(), 3);
    assert!(!rooms[0].occupied);
    assert!(rooms[1].occupied);
    assert_eq!(rooms[0].seat.as_str(), "S001");
}

#[tokio::test]
async fn test_notifications_sorted_newest_first() {
    let portal = Portal::new(Arc::new(MemoryTreeStore::new()));
    let session = admin();

    portal
        .create_notification(
            &session,
            "Water maintenance",
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            "All Hostels",
        )
        .await
        .unwrap();
    let notices = portal
        .create_notification(
            &session,
            "Fire drill",
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            "North Wing",
        )
        .await
        .unwrap();

    assert_eq!(notices.len(), 2);
    assert_eq!(notices[0].message, "Fire drill");
    assert_eq!(notices[1].message, "Water maintenance");
    assert!(!notices[0].id.is_empty());
}

#[tokio::test]
async fn test_create_notification_requires_admin() {
    let portal = Portal::new(Arc::new(MemoryTreeStore::new()));
    let err = portal
        .create_notification(
            &Session::student("u1"),
            "hi",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            "All Hostels",
        )
        .await
        .unwrap_err();
    assert!(matches!(err, PortalError::Unauthenticated));
}
