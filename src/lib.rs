//! # smart-inventory
//!
//! Inventories physical drives and decodes their S.M.A.R.T. telemetry from
//! the vendor-specific blobs the platform hands back, producing one attribute
//! row (current, worst, threshold, vendor data, OK flag) per known id.
//!
//! ```text
//! provider ──► data blob ──────┐
//!          ──► threshold blob ─┼─► decoder ─► assembler ─► Drive ─► DriveCollection
//!          ──► predict flag ───┘                 ▲
//!                                  catalog ──────┘
//! ```

pub mod alerts;
pub mod collectors;
pub mod config;
pub mod error;
pub mod models;
pub mod util;

pub use collectors::assembler::{collect_drives, DriveHealthAssembler, FailurePolicy};
pub use collectors::catalog::AttributeCatalog;
pub use collectors::provider::{DriveProvider, SmartReadings, SnapshotProvider};
pub use error::{Error, Result};
pub use models::drive::{Drive, DriveCollection, DriveIdentity};
pub use models::smart::{AttributeDefinition, AttributeSet, DriveStatus, SmartAttribute};
