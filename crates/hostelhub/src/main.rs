//! # HostelHub CLI (`hh`)
//!
//! Admin console for a hostel-management portal backed by a Firebase
//! Realtime Database. Each subcommand maps onto one portal operation:
//! fetch a subtree, derive an in-memory view, render it — or issue a
//! single best-effort write followed by a full refetch.
//!
//! ## Usage
//!
//! ```bash
//! hh --config ./hh.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `hh students` | List every registered student |
//! | `hh complaints` | Normalized complaints, grouped per student |
//! | `hh resolve <student> <group>` | Toggle one complaint's resolution |
//! | `hh hostels` | Hostel topology with reconciled occupancy |
//! | `hh create-hostel <name>` | Generate and persist a new hostel lattice |
//! | `hh notifications` | List notices, newest first |
//! | `hh notify <message>` | Publish a notice |

mod config;
mod firebase;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

use hostelhub_core::error::PortalError;
use hostelhub_core::models::StudentId;
use hostelhub_core::ops::{Portal, Session};

use crate::config::load_config;
use crate::firebase::FirebaseStore;

/// HostelHub admin console.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file holding the database URL, optional auth token, and the admin uid.
#[derive(Parser)]
#[command(
    name = "hh",
    about = "HostelHub — hostel-management admin console over a realtime tree store",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./hh.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every registered student.
    Students,

    /// Fetch and normalize all complaints, grouped per student with
    /// per-student counts. Malformed entries are dropped silently.
    Complaints,

    /// Toggle one complaint between Pending and Resolved.
    ///
    /// Reads the record's current state, writes the negation, then
    /// refetches the whole complaint view. Requires an admin uid in the
    /// config.
    Resolve {
        /// Student key owning the complaint.
        student: String,
        /// First-level complaint key.
        group: String,
        /// Second-level key, for complaints nested one level deeper.
        #[arg(long)]
        sub: Option<String>,
    },

    /// Show hostel topology with occupancy reconciled onto the full
    /// room lattice.
    Hostels {
        /// Only this hostel.
        #[arg(long)]
        hostel: Option<String>,
        /// Only this floor (0-based).
        #[arg(long)]
        floor: Option<usize>,
    },

    /// Create a hostel: a fixed lattice of floors and rooms with
    /// deterministic room numbers and placeholder seat labels.
    CreateHostel {
        /// Hostel display name.
        name: String,
        /// Number of floors (defaults from config).
        #[arg(long)]
        floors: Option<u32>,
        /// Rooms on each floor (defaults from config).
        #[arg(long)]
        rooms_per_floor: Option<u32>,
    },

    /// List notifications, newest first.
    Notifications,

    /// Publish a notification.
    Notify {
        /// Notice text.
        message: String,
        /// Notice date (YYYY-MM-DD); defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Audience: "All Hostels" or a hostel name.
        #[arg(long, default_value = "All Hostels")]
        hostel: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Write failures are non-fatal and retriable: nothing was
            // refetched, so the store view is simply unchanged.
            if let Some(PortalError::WriteFailed(_)) = err.downcast_ref::<PortalError>() {
                eprintln!("warning: {err:#} — no changes applied, try again");
            } else {
                eprintln!("error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli.config)?;
    let store = Arc::new(FirebaseStore::new(&config.store)?);
    let portal = Portal::new(store);
    let session = config
        .admin
        .uid
        .as_deref()
        .map(Session::admin)
        .unwrap_or_else(|| Session::student("anonymous"));

    match cli.command {
        Commands::Students => {
            let dir = portal.fetch_students().await?;
            render::render_students(&dir);
        }
        Commands::Complaints => {
            let dir = portal.fetch_students().await?;
            let view = portal.fetch_complaints().await?;
            render::render_complaints(&view, &dir);
        }
        Commands::Resolve { student, group, sub } => {
            let owner = StudentId::from(student.as_str());
            let view = portal
                .toggle_resolution(&session, &owner, &group, sub.as_deref())
                .await?;
            let dir = portal.fetch_students().await?;
            println!("Updated. Current complaints:");
            render::render_complaints(&view, &dir);
        }
        Commands::Hostels { hostel, floor } => {
            let hostels = portal.fetch_hostels().await?;
            render::render_hostels(&hostels, hostel.as_deref(), floor);
        }
        Commands::CreateHostel {
            name,
            floors,
            rooms_per_floor,
        } => {
            let floors = floors.unwrap_or(config.hostel.floors);
            let rooms = rooms_per_floor.unwrap_or(config.hostel.rooms_per_floor);
            let hostels = portal.create_hostel(&session, &name, floors, rooms).await?;
            println!("Created \"{name}\" with {floors} floor(s) x {rooms} room(s).");
            render::render_hostels(&hostels, None, None);
        }
        Commands::Notifications => {
            let notices = portal.fetch_notifications().await?;
            render::render_notifications(&notices);
        }
        Commands::Notify { message, date, hostel } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let notices = portal
                .create_notification(&session, &message, date, &hostel)
                .await?;
            render::render_notifications(&notices);
        }
    }
    Ok(())
}
