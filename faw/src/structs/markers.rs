//! Frame markers
//!
//! A wrapped frame is laid out as
//!
//! ```text
//! START_MARKER | ADTS frame (aac_frame_length bytes) | checksum (4, LE) | END_MARKER
//! ```
//!
//! The markers are fixed detection anchors and are not configurable.

/// Marks the beginning of a wrapped frame; the ADTS header follows directly.
pub const START_MARKER: [u8; 8] = [0x72, 0xF8, 0x1F, 0x4E, 0x07, 0x01, 0x00, 0x00];

/// [`START_MARKER`] as it appears in a Half-packed 16-bit stream, seen from the
/// zero high byte of the sample before it. Only used to recognise Half packing.
pub const HALF_PROBE_MARKER: [u8; 16] = [
    0x00, 0xF2, 0x00, 0x78, 0x00, 0x9F, 0x00, 0xCE, 0x00, 0x87, 0x00, 0x81, 0x00, 0x80, 0x00, 0x80,
];

/// Marks the end of a wrapped frame's payload and checksum.
pub const END_MARKER: [u8; 12] = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x45, 0x4E, 0x44, 0x00,
];

/// Bytes a wrapped frame adds around its payload.
pub const WRAP_OVERHEAD: usize =
    START_MARKER.len() + crate::utils::checksum::CHECKSUM_LEN + END_MARKER.len();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_probe_is_biased_start_marker() {
        let odd: Vec<u8> = HALF_PROBE_MARKER.iter().skip(1).step_by(2).copied().collect();
        let biased: Vec<u8> = START_MARKER.iter().map(|b| b.wrapping_add(0x80)).collect();
        assert_eq!(odd, biased);
        assert!(HALF_PROBE_MARKER.iter().step_by(2).all(|&b| b == 0));
    }

    #[test]
    fn overhead() {
        assert_eq!(WRAP_OVERHEAD, 24);
    }
}
