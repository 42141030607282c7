use crate::error::{Error, Result};
pub use crate::models::drive::DriveIdentity;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Raw SMART inputs for one drive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SmartReadings {
    /// Firmware failure prediction; `None` when no status row exists.
    pub predict_failure: Option<bool>,
    /// VendorSpecific buffers in the current/worst/data layout.
    pub data:            Vec<Vec<u8>>,
    /// VendorSpecific buffers in the threshold layout.
    pub thresholds:      Vec<Vec<u8>>,
}

/// Source of drives and their raw SMART buffers.
pub trait DriveProvider {
    /// Physical drives in discovery order.
    fn drives(&self) -> Result<Vec<DriveIdentity>>;

    fn readings(&self, drive: &DriveIdentity) -> Result<SmartReadings>;
}

// ── JSON snapshot ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct Snapshot {
    drives: Vec<SnapshotDrive>,
}

#[derive(Debug, Deserialize)]
struct SnapshotDrive {
    #[serde(flatten)]
    identity:        DriveIdentity,
    #[serde(default)]
    predict_failure: Option<bool>,
    /// Hex strings; whitespace inside is ignored.
    #[serde(default)]
    data:            Vec<String>,
    #[serde(default)]
    thresholds:      Vec<String>,
}

/// Provider backed by a captured JSON snapshot of the platform's rows.
///
/// ```json
/// { "drives": [ {
///     "device_id": "\\\\.\\PHYSICALDRIVE0",
///     "pnp_device_id": "SCSI\\DISK&VEN_&PROD_SAMSUNG\\4&1",
///     "model": "Samsung SSD 860 EVO", "type": "IDE", "serial": "S3Z9NB0K",
///     "drive_letters": ["C:"],
///     "predict_failure": false,
///     "data": ["0a00 0105 ..."], "thresholds": ["0100 0106 ..."]
/// } ] }
/// ```
#[derive(Debug)]
pub struct SnapshotProvider {
    rows: Vec<SnapshotDrive>,
}

impl SnapshotProvider {
    pub fn from_json(text: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(text)
            .map_err(|e| Error::Snapshot(format!("invalid snapshot: {}", e)))?;

        // Readings are looked up by device id, so two rows may not share one.
        let mut seen = HashSet::new();
        for row in &snapshot.drives {
            if !seen.insert(row.identity.device_id.as_str()) {
                return Err(Error::Snapshot(format!(
                    "duplicate device_id {}", row.identity.device_id
                )));
            }
        }
        Ok(Self { rows: snapshot.drives })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Snapshot(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&text)
    }

    fn row(&self, device_id: &str) -> Option<&SnapshotDrive> {
        self.rows.iter().find(|r| r.identity.device_id == device_id)
    }
}

impl DriveProvider for SnapshotProvider {
    fn drives(&self) -> Result<Vec<DriveIdentity>> {
        Ok(self.rows.iter().map(|r| r.identity.clone().normalized()).collect())
    }

    fn readings(&self, drive: &DriveIdentity) -> Result<SmartReadings> {
        let row = self.row(&drive.device_id)
            .ok_or_else(|| Error::Provider(format!("no snapshot row for {}", drive.device_id)))?;

        Ok(SmartReadings {
            predict_failure: row.predict_failure,
            data:            decode_buffers(&row.data, "data")?,
            thresholds:      decode_buffers(&row.thresholds, "threshold")?,
        })
    }
}

fn decode_buffers(hex_bufs: &[String], kind: &str) -> Result<Vec<Vec<u8>>> {
    hex_bufs.iter().enumerate().map(|(i, text)| {
        let compact: String = text.split_whitespace().collect();
        hex::decode(&compact)
            .map_err(|e| Error::Snapshot(format!("{} buffer #{}: {}", kind, i, e)))
    }).collect()
}
