//! Decoder for the vendor-specific SMART blobs.
//!
//! A blob holds 42 slots of 12 bytes behind a 2-byte header. Offsets below are
//! relative to `slot * 12`, so the header is already folded in.
//!
//! | blob      | id | threshold | status | current | worst | vendor data (LE i32) |
//! |-----------|----|-----------|--------|---------|-------|----------------------|
//! | data      | +2 |           | +4     | +5      | +6    | +7 ..= +10           |
//! | threshold | +2 | +3        |        |         |       |                      |
//!
//! Each slot decodes on its own; a short buffer only loses the slots it cuts.

use thiserror::Error;
use tracing::debug;

pub const SLOT_COUNT: usize = 42;
pub const SLOT_SIZE:  usize = 12;

const ID_OFFSET:        usize = 2;
const THRESHOLD_OFFSET: usize = 3;
const STATUS_OFFSET:    usize = 4;
const CURRENT_OFFSET:   usize = 5;
const WORST_OFFSET:     usize = 6;
const VENDOR_OFFSET:    usize = 7;

/// Which of the two blob layouts a buffer uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Data,
    Threshold,
}

impl RecordKind {
    /// Bytes past the slot start that must exist to decode a slot.
    fn span(self) -> usize {
        match self {
            RecordKind::Data      => VENDOR_OFFSET + 4,
            RecordKind::Threshold => THRESHOLD_OFFSET + 1,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RecordKind::Data      => "data",
            RecordKind::Threshold => "threshold",
        }
    }
}

/// Least-significant status byte of a data slot. The most-significant byte
/// carries nothing we use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusFlags(pub u8);

impl StatusFlags {
    pub fn failure_imminent(&self) -> bool {
        self.0 & 0x01 != 0
    }

    pub fn online_collection(&self) -> bool {
        self.0 & 0x02 != 0
    }
}

/// Fields one slot supplies. Each layout owns a disjoint set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateFields {
    Data {
        status_flags: StatusFlags,
        current:      u8,
        worst:        u8,
        vendor_data:  i32,
    },
    Threshold {
        threshold: u8,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeUpdate {
    pub slot:   usize,
    pub id:     u8,
    pub fields: UpdateFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotError {
    #[error("{kind} slot {slot} truncated: needs {needed} bytes, buffer has {len}")]
    Truncated {
        kind:   &'static str,
        slot:   usize,
        needed: usize,
        len:    usize,
    },
    #[error("{kind} slot {slot} out of range: a blob has {SLOT_COUNT} slots")]
    OutOfRange {
        kind: &'static str,
        slot: usize,
    },
}

/// Result of decoding a single slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotOutcome {
    Update(AttributeUpdate),
    /// Id 0: the slot is not in use.
    Unused,
    Malformed(SlotError),
}

/// Successful updates of one blob plus what was dropped along the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decoded {
    pub updates:     Vec<AttributeUpdate>,
    pub diagnostics: Vec<SlotError>,
}

/// Decode slot `slot` of `buf`.
pub fn decode_slot(buf: &[u8], slot: usize, kind: RecordKind) -> SlotOutcome {
    if slot >= SLOT_COUNT {
        return SlotOutcome::Malformed(SlotError::OutOfRange { kind: kind.label(), slot });
    }
    let base = slot * SLOT_SIZE;
    let truncated = |needed: usize| SlotOutcome::Malformed(SlotError::Truncated {
        kind: kind.label(),
        slot,
        needed,
        len: buf.len(),
    });

    let id = match buf.get(base + ID_OFFSET) {
        Some(&id) => id,
        None      => return truncated(base + ID_OFFSET + 1),
    };
    if id == 0 {
        return SlotOutcome::Unused;
    }

    let needed = base + kind.span();
    let b = match buf.get(base..needed) {
        Some(b) => b,
        None    => return truncated(needed),
    };

    let fields = match kind {
        RecordKind::Data => UpdateFields::Data {
            status_flags: StatusFlags(b[STATUS_OFFSET]),
            current:      b[CURRENT_OFFSET],
            worst:        b[WORST_OFFSET],
            vendor_data:  i32::from_le_bytes([
                b[VENDOR_OFFSET],
                b[VENDOR_OFFSET + 1],
                b[VENDOR_OFFSET + 2],
                b[VENDOR_OFFSET + 3],
            ]),
        },
        RecordKind::Threshold => UpdateFields::Threshold {
            threshold: b[THRESHOLD_OFFSET],
        },
    };

    SlotOutcome::Update(AttributeUpdate { slot, id, fields })
}

/// Lazily decode every slot of `buf` in slot order.
pub fn slots(buf: &[u8], kind: RecordKind) -> impl Iterator<Item = SlotOutcome> + '_ {
    (0..SLOT_COUNT).map(move |slot| decode_slot(buf, slot, kind))
}

/// Fold all slots of `buf` into updates and diagnostics.
pub fn decode(buf: &[u8], kind: RecordKind) -> Decoded {
    slots(buf, kind).fold(Decoded::default(), |mut acc, outcome| {
        match outcome {
            SlotOutcome::Update(update) => acc.updates.push(update),
            SlotOutcome::Unused         => {}
            SlotOutcome::Malformed(err) => {
                debug!(%err, "dropping SMART slot");
                acc.diagnostics.push(err);
            }
        }
        acc
    })
}

pub fn decode_data(buf: &[u8]) -> Decoded {
    decode(buf, RecordKind::Data)
}

pub fn decode_thresholds(buf: &[u8]) -> Decoded {
    decode(buf, RecordKind::Threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collectors::testutil::{blank_blob, write_data_slot, write_threshold_slot};

    #[test]
    fn data_slot_fields_come_from_fixed_offsets() {
        let mut blob = blank_blob();
        write_data_slot(&mut blob, 3, 194, 0x02, 117, 98, 0x0012_0021);

        match decode_slot(&blob, 3, RecordKind::Data) {
            SlotOutcome::Update(u) => {
                assert_eq!(u.slot, 3);
                assert_eq!(u.id, 194);
                let UpdateFields::Data { status_flags, current, worst, vendor_data } = u.fields else {
                    panic!("expected data fields, got {:?}", u.fields);
                };
                assert!(!status_flags.failure_imminent());
                assert!(status_flags.online_collection());
                assert_eq!((current, worst), (117, 98));
                assert_eq!(vendor_data, 0x0012_0021);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        // id byte sits at slot*12 + 2
        assert_eq!(blob[3 * 12 + 2], 194);
    }

    #[test]
    fn vendor_data_is_little_endian() {
        let mut blob = blank_blob();
        blob[2] = 9;
        blob[7..11].copy_from_slice(&[0x78, 0x56, 0x34, 0x12]);

        let decoded = decode_data(&blob);
        assert_eq!(decoded.updates.len(), 1);
        match decoded.updates[0].fields {
            UpdateFields::Data { vendor_data, .. } => assert_eq!(vendor_data, 0x1234_5678),
            other => panic!("unexpected fields {:?}", other),
        }
    }

    #[test]
    fn vendor_data_keeps_sign_bit() {
        let mut blob = blank_blob();
        write_data_slot(&mut blob, 0, 1, 0, 100, 100, -1);
        match decode_data(&blob).updates[0].fields {
            UpdateFields::Data { vendor_data, .. } => assert_eq!(vendor_data, -1),
            other => panic!("unexpected fields {:?}", other),
        }
    }

    #[test]
    fn zero_id_is_unused_whatever_else_the_slot_holds() {
        let mut blob = vec![0xFF; 2 + SLOT_COUNT * SLOT_SIZE];
        for slot in 0..SLOT_COUNT {
            blob[slot * SLOT_SIZE + 2] = 0;
        }
        for kind in [RecordKind::Data, RecordKind::Threshold] {
            assert!(slots(&blob, kind).all(|o| o == SlotOutcome::Unused));
            assert_eq!(decode(&blob, kind), Decoded::default());
        }
    }

    #[test]
    fn threshold_slot_reads_only_id_and_threshold() {
        let mut blob = blank_blob();
        write_threshold_slot(&mut blob, 0, 1, 10);
        write_threshold_slot(&mut blob, 41, 5, 36);

        let decoded = decode_thresholds(&blob);
        assert!(decoded.diagnostics.is_empty());
        assert_eq!(decoded.updates, vec![
            AttributeUpdate { slot: 0,  id: 1, fields: UpdateFields::Threshold { threshold: 10 } },
            AttributeUpdate { slot: 41, id: 5, fields: UpdateFields::Threshold { threshold: 36 } },
        ]);
    }

    #[test]
    fn updates_follow_slot_order() {
        let mut blob = blank_blob();
        write_data_slot(&mut blob, 7, 12, 0, 100, 100, 40);
        write_data_slot(&mut blob, 2, 9, 0, 99, 99, 5000);
        write_data_slot(&mut blob, 30, 194, 0, 60, 40, 35);

        let ids: Vec<u8> = decode_data(&blob).updates.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![9, 12, 194]);
    }

    #[test]
    fn truncation_mid_slot_drops_only_that_slot_and_beyond() {
        let mut blob = blank_blob();
        for slot in 0..5 {
            write_data_slot(&mut blob, slot, slot as u8 + 1, 0, 100, 90, slot as i32);
        }
        // Slot 3 ends at byte 3*12+11; cut inside its vendor data.
        blob.truncate(3 * SLOT_SIZE + 9);

        let decoded = decode_data(&blob);
        let ids: Vec<u8> = decoded.updates.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(decoded.diagnostics.len(), SLOT_COUNT - 3);
        assert_eq!(decoded.diagnostics[0], SlotError::Truncated {
            kind:   "data",
            slot:   3,
            needed: 3 * SLOT_SIZE + 11,
            len:    3 * SLOT_SIZE + 9,
        });
    }

    #[test]
    fn threshold_layout_needs_fewer_bytes_than_data() {
        let mut blob = blank_blob();
        write_data_slot(&mut blob, 0, 5, 0, 50, 40, 3);
        write_threshold_slot(&mut blob, 0, 5, 36);
        blob.truncate(6);

        assert!(decode_data(&blob).updates.is_empty());
        assert_eq!(decode_thresholds(&blob).updates.len(), 1);
    }

    #[test]
    fn empty_buffer_yields_diagnostics_not_panics() {
        let decoded = decode_data(&[]);
        assert!(decoded.updates.is_empty());
        assert_eq!(decoded.diagnostics.len(), SLOT_COUNT);
    }

    #[test]
    fn bytes_beyond_last_slot_are_ignored() {
        let mut blob = blank_blob();
        blob.extend_from_slice(&[0xAB; 64]);
        write_data_slot(&mut blob, 41, 231, 0, 80, 80, 20);

        let decoded = decode_data(&blob);
        assert_eq!(decoded.updates.len(), 1);
        assert_eq!(decoded.updates[0].slot, 41);
    }

    #[test]
    fn slot_index_past_the_geometry_is_malformed() {
        let mut blob = blank_blob();
        blob.extend_from_slice(&[0x05; SLOT_SIZE * 2]);

        for slot in [SLOT_COUNT, SLOT_COUNT + 1, usize::MAX / 4, usize::MAX] {
            assert_eq!(
                decode_slot(&blob, slot, RecordKind::Data),
                SlotOutcome::Malformed(SlotError::OutOfRange { kind: "data", slot }),
            );
        }
    }
}
