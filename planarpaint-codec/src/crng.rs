use planarpaint_core::CycleRange;

/// Size of one `CRNG` record.
pub const CRNG_RECORD_LEN: usize = 8;

/// Parse a `CRNG` payload into cycle ranges.
///
/// Each 8-byte record holds the rate at byte 1, low and high at bytes 2
/// and 3, and an active flag at byte 4. A trailing partial record is
/// dropped.
pub fn parse_crng(data: &[u8]) -> Vec<CycleRange> {
    data.chunks_exact(CRNG_RECORD_LEN)
        .map(|rec| CycleRange::new(u16::from(rec[1]), rec[2], rec[3], rec[4] != 0))
        .collect()
}
