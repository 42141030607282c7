pub mod assembler;
pub mod catalog;
pub mod provider;
pub mod smart;

#[cfg(test)]
pub(crate) mod testutil {
    //! Blob builders shared by the decoder and assembler tests.

    use super::smart::SLOT_SIZE;

    /// Size of the VendorSpecific buffer drives hand back.
    pub const BLOB_LEN: usize = 512;

    pub fn blank_blob() -> Vec<u8> {
        vec![0; BLOB_LEN]
    }

    pub fn write_data_slot(
        blob:    &mut [u8],
        slot:    usize,
        id:      u8,
        flags:   u8,
        current: u8,
        worst:   u8,
        vendor:  i32,
    ) {
        let base = slot * SLOT_SIZE;
        blob[base + 2] = id;
        blob[base + 4] = flags;
        blob[base + 5] = current;
        blob[base + 6] = worst;
        blob[base + 7..base + 11].copy_from_slice(&vendor.to_le_bytes());
    }

    pub fn write_threshold_slot(blob: &mut [u8], slot: usize, id: u8, threshold: u8) {
        let base = slot * SLOT_SIZE;
        blob[base + 2] = id;
        blob[base + 3] = threshold;
    }
}
