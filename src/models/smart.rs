use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

/// Drive-level verdict from the firmware's own failure prediction.
///
/// `Unknown` means the provider returned no prediction row for the drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriveStatus {
    #[default]
    Unknown,
    Passed,
    Failed,
}

impl DriveStatus {
    pub fn from_predict_failure(predict_failure: Option<bool>) -> Self {
        match predict_failure {
            Some(true)  => DriveStatus::Failed,
            Some(false) => DriveStatus::Passed,
            None        => DriveStatus::Unknown,
        }
    }

    /// Anything short of a reported failure counts as OK.
    pub fn is_ok(&self) -> bool {
        *self != DriveStatus::Failed
    }

    pub fn label(&self) -> &'static str {
        match self {
            DriveStatus::Unknown => "    ?",
            DriveStatus::Passed  => " PASS",
            DriveStatus::Failed  => " FAIL",
        }
    }
}

/// One known attribute id from the reference catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDefinition {
    pub id:   u8,
    pub name: String,
}

/// One SMART attribute row for a drive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SmartAttribute {
    pub id:          u8,
    pub name:        String,
    pub current:     u8,
    pub worst:       u8,
    pub threshold:   u8,
    /// Vendor-specific raw value, opaque to us.
    pub vendor_data: i32,
    /// False once the drive flags this attribute as failure imminent.
    pub is_ok:       bool,
    /// Set when a data blob carried this id.
    pub reported:    bool,
}

impl SmartAttribute {
    pub fn new(def: &AttributeDefinition) -> Self {
        Self {
            id:          def.id,
            name:        def.name.clone(),
            current:     0,
            worst:       0,
            threshold:   0,
            vendor_data: 0,
            is_ok:       true,
            reported:    false,
        }
    }

    /// True if the normalized value has reached its (non-zero) threshold.
    pub fn is_below_threshold(&self) -> bool {
        self.reported && self.threshold > 0 && self.current <= self.threshold
    }

    /// True if the value sits within `margin` points above its threshold.
    pub fn is_near_threshold(&self, margin: u8) -> bool {
        margin > 0
            && self.reported
            && self.threshold > 0
            && self.current > self.threshold
            && self.current <= self.threshold.saturating_add(margin)
    }
}

/// Id-keyed attribute rows of one drive, iterated in id order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeSet {
    by_id: BTreeMap<u8, SmartAttribute>,
}

impl AttributeSet {
    /// One row per definition; later duplicates of an id are ignored.
    pub fn seeded<'a>(defs: impl IntoIterator<Item = &'a AttributeDefinition>) -> Self {
        let mut by_id = BTreeMap::new();
        for def in defs {
            by_id.entry(def.id).or_insert_with(|| SmartAttribute::new(def));
        }
        Self { by_id }
    }

    pub fn get(&self, id: u8) -> Option<&SmartAttribute> {
        self.by_id.get(&id)
    }

    pub fn get_mut(&mut self, id: u8) -> Option<&mut SmartAttribute> {
        self.by_id.get_mut(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SmartAttribute> {
        self.by_id.values()
    }

    /// Rows a data blob actually carried.
    pub fn reported(&self) -> impl Iterator<Item = &SmartAttribute> {
        self.iter().filter(|a| a.reported)
    }

    pub fn len(&self) -> usize { self.by_id.len() }
    pub fn is_empty(&self) -> bool { self.by_id.is_empty() }
}

impl Serialize for AttributeSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.by_id.values())
    }
}
