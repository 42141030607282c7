//! Error types for drive inventory and SMART decoding.
//!
//! Only failures that abort an operation live here. A malformed slot inside a
//! vendor blob is an ordinary value (`collectors::smart::SlotError`) and an id
//! missing from the catalog is not an error at all.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The attribute catalog could not be loaded. Nothing can be decoded without it.
    #[error("Attribute catalog error: {0}")]
    Catalog(String),

    /// The provider snapshot is unreadable or structurally invalid.
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    /// The provider failed to answer a query.
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Failed retrieving health data for drive {device}: {source}")]
    DriveHealth {
        device: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wrap a failure with the drive it happened on.
    pub fn for_drive(device: impl Into<String>, source: Error) -> Self {
        Error::DriveHealth { device: device.into(), source: Box::new(source) }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drive_health_message_names_the_drive() {
        let err = Error::for_drive(r"\\.\PHYSICALDRIVE1", Error::Provider("query timed out".into()));
        let msg = err.to_string();
        assert!(msg.contains(r"\\.\PHYSICALDRIVE1"));
        assert!(msg.contains("query timed out"));
    }
}
