//! # HostelHub Core
//!
//! Shared, runtime-free logic for the HostelHub portal: data models, the
//! tree-store abstraction, complaint normalization, hostel topology
//! generation, the student directory join, and the admin portal operations.
//!
//! This crate contains no tokio, network, or filesystem dependencies.
//! All store access goes through the async [`store::TreeStore`] trait, so
//! any executor (or the in-memory store's ready futures) can drive it.

pub mod complaints;
pub mod directory;
pub mod error;
pub mod models;
pub mod ops;
pub mod store;
pub mod topology;
