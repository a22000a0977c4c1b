//! Plain-text rendering for the admin console views.
//!
//! Pure formatting over the core's derived data; absent student fields
//! render as "Not provided", matching what the store actually holds.

use hostelhub_core::complaints::ComplaintView;
use hostelhub_core::directory::{group_by_student, Directory};
use hostelhub_core::models::{Hostel, Notification};

fn field(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("Not provided")
}

pub fn render_students(dir: &Directory) {
    if dir.is_empty() {
        println!("No student records found.");
        return;
    }
    println!(
        "{:<20} {:<28} {:<14} {:<14} {:<8} {:<10} {:<16} {:<8}",
        "Name", "Email", "Phone", "Department", "Year", "Gender", "Hostel", "Room"
    );
    for student in dir.students() {
        println!(
            "{:<20} {:<28} {:<14} {:<14} {:<8} {:<10} {:<16} {:<8}",
            field(&student.name),
            field(&student.email),
            field(&student.number),
            field(&student.department),
            field(&student.year),
            field(&student.gender),
            field(&student.hostel_name),
            field(&student.room_no),
        );
    }
    println!("\n{} student(s)", dir.len());
}

pub fn render_complaints(view: &ComplaintView, dir: &Directory) {
    if view.is_empty() {
        println!("No complaints found.");
        return;
    }
    for group in group_by_student(view, dir) {
        println!(
            "{} <{}> — {} complaint(s)",
            field(&group.student.name),
            field(&group.student.email),
            group.count
        );
        for complaint in &group.complaints {
            let status = if complaint.resolved { "Resolved" } else { "Pending" };
            println!(
                "  [{:<8}] {} — {}  (group {}{})",
                status,
                complaint.topic.as_deref().unwrap_or("No topic"),
                complaint.description.as_deref().unwrap_or("No description"),
                complaint.group_id,
                complaint
                    .sub_id
                    .as_deref()
                    .map(|s| format!(", sub {s}"))
                    .unwrap_or_default(),
            );
        }
    }
    println!("\n{} complaint(s) across {} student(s)", view.records.len(), view.per_student.len());
}

pub fn render_hostels(hostels: &[Hostel], hostel_filter: Option<&str>, floor_filter: Option<usize>) {
    if hostels.is_empty() {
        println!("No hostel information found.");
        return;
    }
    for hostel in hostels {
        if let Some(wanted) = hostel_filter {
            if hostel.name != wanted {
                continue;
            }
        }
        println!("Hostel: {}", hostel.name);
        for (index, floor) in hostel.floors.iter().enumerate() {
            if let Some(wanted) = floor_filter {
                if index != wanted {
                    continue;
                }
            }
            println!("  Floor {index}");
            println!("    {:<8} {:<10} {:<8}", "Room", "Status", "Seat");
            for room in &floor.rooms {
                let status = if room.occupied { "Occupied" } else { "Vacant" };
                let seat = if room.occupied { room.seat.as_str() } else { "-" };
                println!("    {:<8} {:<10} {:<8}", room.room_no, status, seat);
            }
        }
    }
}

pub fn render_notifications(notices: &[Notification]) {
    if notices.is_empty() {
        println!("No notifications found.");
        return;
    }
    println!("{:<12} {:<16} Message", "Date", "Hostel");
    for notice in notices {
        println!("{:<12} {:<16} {}", notice.date_raw, notice.hostels, notice.message);
    }
}
