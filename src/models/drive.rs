use crate::models::smart::{AttributeSet, DriveStatus, SmartAttribute};
use serde::{Deserialize, Serialize};

/// Identity of one physical drive as the provider reports it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveIdentity {
    pub device_id:      String,
    pub pnp_device_id:  String,
    pub model:          Option<String>,
    #[serde(rename = "type")]
    pub interface_type: Option<String>,
    pub serial:         Option<String>,
    #[serde(default)]
    pub drive_letters:  Vec<String>,
}

impl DriveIdentity {
    /// Trim the descriptive strings and drop optional ones that end up empty.
    /// Both ids are kept exactly as reported.
    pub fn normalized(mut self) -> Self {
        self.model = trim_opt(self.model);
        self.interface_type = trim_opt(self.interface_type);
        self.serial = trim_opt(self.serial);
        self.drive_letters = self.drive_letters
            .into_iter()
            .filter_map(|l| trim_opt(Some(l)))
            .collect();
        self
    }
}

fn trim_opt(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// One physical drive with its assembled SMART attributes.
#[derive(Debug, Clone, Serialize)]
pub struct Drive {
    pub device_id:      String,
    pub pnp_device_id:  String,
    pub model:          Option<String>,
    #[serde(rename = "type")]
    pub interface_type: Option<String>,
    pub serial:         Option<String>,
    pub drive_letters:  Vec<String>,
    pub status:         DriveStatus,
    pub is_ok:          bool,
    pub attributes:     AttributeSet,
    /// Slots the decoder had to drop across all of this drive's buffers.
    pub dropped_slots:  usize,
}

impl Drive {
    pub fn new(identity: DriveIdentity, status: DriveStatus, attributes: AttributeSet) -> Self {
        Self {
            device_id:      identity.device_id,
            pnp_device_id:  identity.pnp_device_id,
            model:          identity.model,
            interface_type: identity.interface_type,
            serial:         identity.serial,
            drive_letters:  identity.drive_letters,
            is_ok:          status.is_ok(),
            status,
            attributes,
            dropped_slots:  0,
        }
    }

    /// Attributes the drive itself flags as failure imminent.
    pub fn failing_attributes(&self) -> impl Iterator<Item = &SmartAttribute> {
        self.attributes.iter().filter(|a| !a.is_ok)
    }

    /// "C:, D:" style label, or "—" when no letters are mapped.
    pub fn letters_label(&self) -> String {
        if self.drive_letters.is_empty() {
            "—".to_string()
        } else {
            self.drive_letters.join(", ")
        }
    }
}

/// A drive that could not be assembled; collection continued without it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriveFailure {
    pub device:  String,
    pub message: String,
}

/// Assembled drives in discovery order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DriveCollection {
    pub drives:   Vec<Drive>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<DriveFailure>,
}

impl DriveCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, drive: Drive) {
        self.drives.push(drive);
    }

    pub fn record_failure(&mut self, device: impl Into<String>, message: impl Into<String>) {
        self.failures.push(DriveFailure { device: device.into(), message: message.into() });
    }

    pub fn get(&self, device_id: &str) -> Option<&Drive> {
        self.drives.iter().find(|d| d.device_id == device_id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Drive> {
        self.drives.iter()
    }

    pub fn len(&self) -> usize { self.drives.len() }
    pub fn is_empty(&self) -> bool { self.drives.is_empty() }
}

impl<'a> IntoIterator for &'a DriveCollection {
    type Item = &'a Drive;
    type IntoIter = std::slice::Iter<'a, Drive>;

    fn into_iter(self) -> Self::IntoIter {
        self.drives.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_trims_and_drops_blanks() {
        let id = DriveIdentity {
            device_id:      r" \\.\PHYSICALDRIVE0 ".into(),
            pnp_device_id:  r"SCSI\DISK&VEN_&PROD_SSD\4&1 ".into(),
            model:          Some("  Samsung SSD 860  ".into()),
            interface_type: Some("   ".into()),
            serial:         None,
            drive_letters:  vec!["C:".into(), " ".into(), "D: ".into()],
        }.normalized();

        assert_eq!(id.device_id, r" \\.\PHYSICALDRIVE0 ");
        assert_eq!(id.pnp_device_id, r"SCSI\DISK&VEN_&PROD_SSD\4&1 ");
        assert_eq!(id.model.as_deref(), Some("Samsung SSD 860"));
        assert_eq!(id.interface_type, None);
        assert_eq!(id.drive_letters, vec!["C:", "D:"]);
    }

    #[test]
    fn drive_serializes_type_and_nested_attributes() {
        let identity = DriveIdentity {
            device_id:      "disk0".into(),
            pnp_device_id:  "pnp0".into(),
            interface_type: Some("IDE".into()),
            ..Default::default()
        };
        let attrs = AttributeSet::seeded(&[crate::models::smart::AttributeDefinition {
            id:   9,
            name: "Power-On Hours".into(),
        }]);
        let drive = Drive::new(identity, DriveStatus::Unknown, attrs);
        let v = serde_json::to_value(&drive).unwrap();

        assert_eq!(v["type"], "IDE");
        assert_eq!(v["status"], "unknown");
        assert_eq!(v["is_ok"], true);
        assert_eq!(v["attributes"][0]["name"], "Power-On Hours");
        assert_eq!(v["dropped_slots"], 0);
        assert_eq!(drive.letters_label(), "—");
    }

    #[test]
    fn collection_keeps_discovery_order() {
        let mut drives = DriveCollection::new();
        for name in ["disk2", "disk0", "disk1"] {
            let identity = DriveIdentity { device_id: name.into(), ..Default::default() };
            drives.push(Drive::new(identity, DriveStatus::Passed, AttributeSet::default()));
        }
        let order: Vec<&str> = drives.iter().map(|d| d.device_id.as_str()).collect();
        assert_eq!(order, vec!["disk2", "disk0", "disk1"]);
        assert!(drives.get("disk0").is_some());
        assert!(drives.get("disk9").is_none());
    }

    #[test]
    fn failing_attributes_are_the_ones_flagged_not_ok() {
        let defs = [
            crate::models::smart::AttributeDefinition { id: 5,   name: "Reallocated Sectors Count".into() },
            crate::models::smart::AttributeDefinition { id: 194, name: "Temperature".into() },
        ];
        let mut attrs = AttributeSet::seeded(&defs);
        attrs.get_mut(5).unwrap().is_ok = false;
        let drive = Drive::new(DriveIdentity::default(), DriveStatus::Passed, attrs);

        let ids: Vec<u8> = drive.failing_attributes().map(|a| a.id).collect();
        assert_eq!(ids, vec![5]);
    }
}
