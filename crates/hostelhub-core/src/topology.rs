//! Hostel topology generation and reconciliation.
//!
//! [`build`] deterministically generates a floor/room lattice from
//! `{floor_count, rooms_per_floor}`; same inputs always produce an
//! identical topology, enabling idempotent regeneration and
//! straightforward testing. [`reconcile`] merges a stored, possibly
//! sparse hostel tree back onto a freshly generated lattice so missing
//! rooms reappear as vacant instead of disappearing from the view.
//!
//! Numbering: floor 0 starts at room 1, floor *f* ≥ 1 starts at
//! `f × 100 + 1`, rooms within a floor are numbered consecutively. Seat
//! labels derive purely from the room number ([`SeatId::for_room`]); the
//! builder alone never marks a room occupied.

use std::collections::HashMap;

use crate::models::{Floor, Hostel, Room, SeatId};

/// Room number of the first room on a floor.
fn floor_start(floor_index: u32) -> u32 {
    if floor_index == 0 {
        1
    } else {
        floor_index * 100 + 1
    }
}

/// Generate the full lattice: exactly `floor_count` floors of exactly
/// `rooms_per_floor` rooms, all vacant, all carrying placeholder seats.
///
/// Pure and deterministic; does not talk to the store. Degenerate inputs
/// (zero floors or rooms) produce an empty or room-less lattice — the
/// portal layer rejects those before persisting.
pub fn build(floor_count: u32, rooms_per_floor: u32) -> Vec<Floor> {
    (0..floor_count)
        .map(|f| {
            let start = floor_start(f);
            let rooms = (0..rooms_per_floor)
                .map(|i| {
                    let room_no = start + i;
                    Room {
                        room_no,
                        occupied: false,
                        seat: SeatId::for_room(room_no),
                    }
                })
                .collect();
            Floor { rooms }
        })
        .collect()
}

/// Merge a stored hostel's occupancy facts onto a regenerated lattice.
///
/// The lattice dimensions are recovered from the stored tree itself
/// (floor count, widest floor); each stored room is matched by room
/// number and contributes its `occupied` flag and seat label. Rooms the
/// stored tree does not mention come back vacant with their placeholder
/// seat. A hostel with no usable floors is returned unchanged.
pub fn reconcile(stored: &Hostel) -> Hostel {
    let floor_count = stored.floors.len() as u32;
    let rooms_per_floor = stored
        .floors
        .iter()
        .map(|f| f.rooms.len())
        .max()
        .unwrap_or(0) as u32;

    if floor_count == 0 || rooms_per_floor == 0 {
        return stored.clone();
    }

    let facts: HashMap<u32, &Room> = stored
        .floors
        .iter()
        .flat_map(|f| &f.rooms)
        .map(|r| (r.room_no, r))
        .collect();

    let mut floors = build(floor_count, rooms_per_floor);
    for floor in &mut floors {
        for room in &mut floor.rooms {
            if let Some(fact) = facts.get(&room.room_no) {
                room.occupied = fact.occupied;
                if !fact.seat.is_empty() {
                    room.seat = fact.seat.clone();
                }
            }
        }
    }

    Hostel {
        id: stored.id.clone(),
        name: stored.name.clone(),
        floors,
    }
}
