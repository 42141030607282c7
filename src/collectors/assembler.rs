use crate::collectors::catalog::AttributeCatalog;
use crate::collectors::provider::{DriveIdentity, DriveProvider, SmartReadings};
use crate::collectors::smart::{self, AttributeUpdate, RecordKind, SlotError, UpdateFields};
use crate::error::{Error, Result};
use crate::models::drive::{Drive, DriveCollection};
use crate::models::smart::{AttributeSet, DriveStatus};
use tracing::{debug, info, trace, warn};

/// What happened when an update met a drive's attribute set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// Id not in the catalog; nothing was created.
    UnknownId,
}

/// Write the fields `update` owns into the matching row and leave every other field alone.
pub fn apply_update(attributes: &mut AttributeSet, update: &AttributeUpdate) -> ApplyOutcome {
    let attr = match attributes.get_mut(update.id) {
        Some(a) => a,
        None    => return ApplyOutcome::UnknownId,
    };

    match update.fields {
        UpdateFields::Data { status_flags, current, worst, vendor_data } => {
            attr.current     = current;
            attr.worst       = worst;
            attr.vendor_data = vendor_data;
            attr.is_ok       = !status_flags.failure_imminent();
            attr.reported    = true;
        }
        UpdateFields::Threshold { threshold } => {
            attr.threshold = threshold;
        }
    }
    ApplyOutcome::Applied
}

/// One drive after assembly, with whatever the decoder had to drop.
#[derive(Debug, Clone)]
pub struct AssembledDrive {
    pub drive:       Drive,
    pub diagnostics: Vec<SlotError>,
    /// Ids seen in the blobs but absent from the catalog, in encounter order.
    pub unknown_ids: Vec<u8>,
}

/// Builds a drive's attribute set from the catalog and its raw buffers.
#[derive(Debug, Clone, Copy)]
pub struct DriveHealthAssembler<'c> {
    catalog: &'c AttributeCatalog,
}

impl<'c> DriveHealthAssembler<'c> {
    pub fn new(catalog: &'c AttributeCatalog) -> Self {
        Self { catalog }
    }

    pub fn assemble(&self, identity: DriveIdentity, readings: &SmartReadings) -> AssembledDrive {
        let mut attributes = AttributeSet::seeded(self.catalog);
        let mut diagnostics = Vec::new();
        let mut unknown_ids = Vec::new();

        let blobs = readings.data.iter().map(|b| (b, RecordKind::Data))
            .chain(readings.thresholds.iter().map(|b| (b, RecordKind::Threshold)));

        for (blob, kind) in blobs {
            let decoded = smart::decode(blob, kind);
            for update in &decoded.updates {
                if apply_update(&mut attributes, update) == ApplyOutcome::UnknownId {
                    trace!(device = %identity.device_id, id = update.id, "skipping id not in catalog");
                    unknown_ids.push(update.id);
                }
            }
            diagnostics.extend(decoded.diagnostics);
        }

        if !diagnostics.is_empty() {
            debug!(
                device  = %identity.device_id,
                dropped = diagnostics.len(),
                "some SMART slots could not be decoded"
            );
        }

        let status = DriveStatus::from_predict_failure(readings.predict_failure);
        let mut drive = Drive::new(identity, status, attributes);
        drive.dropped_slots = diagnostics.len();
        AssembledDrive {
            drive,
            diagnostics,
            unknown_ids,
        }
    }
}

/// What to do when one drive's readings cannot be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Record the failure and keep collecting the remaining drives.
    #[default]
    Isolate,
    /// Return the first failure.
    Strict,
}

/// Enumerate the provider's drives and assemble each one.
///
/// Failing to enumerate is fatal. A failure on one drive is wrapped with the
/// drive's id and either recorded or returned, depending on `policy`.
pub fn collect_drives<P>(
    provider: &P,
    catalog:  &AttributeCatalog,
    policy:   FailurePolicy,
) -> Result<DriveCollection>
where
    P: DriveProvider + ?Sized,
{
    let assembler = DriveHealthAssembler::new(catalog);
    let mut collection = DriveCollection::new();

    for identity in provider.drives()? {
        let readings = match provider.readings(&identity) {
            Ok(r) => r,
            Err(e) => {
                let err = Error::for_drive(identity.device_id.clone(), e);
                if policy == FailurePolicy::Strict {
                    return Err(err);
                }
                warn!(device = %identity.device_id, error = %err, "skipping drive");
                collection.record_failure(identity.device_id, err.to_string());
                continue;
            }
        };
        collection.push(assembler.assemble(identity, &readings).drive);
    }

    info!(
        drives   = collection.len(),
        failures = collection.failures.len(),
        "drive health collected"
    );
    Ok(collection)
}
