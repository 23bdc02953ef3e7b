//! Packing variant detection.

use std::fmt::{Display, Formatter};

use log::{debug, info};

use crate::structs::markers::{HALF_PROBE_MARKER, START_MARKER};
use crate::utils::bitstream::{Bitstream, HalfByte};
use crate::utils::search::find;

/// Packing variant of a FAW stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FawMode {
    Unknown,
    /// Frames embedded byte-for-byte in the sample data.
    Full,
    /// One frame byte in the low byte of each 16-bit sample.
    Half,
    /// Two independent streams in the low and high bytes of each 16-bit sample.
    Mix,
}

impl Display for FawMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FawMode::Unknown => write!(f, "unknown"),
            FawMode::Full => write!(f, "full"),
            FawMode::Half => write!(f, "half"),
            FawMode::Mix => write!(f, "mix"),
        }
    }
}

/// Working buffers of a stream. Leaving `Unknown` is a one-way transition.
#[derive(Debug)]
pub enum Tracks {
    Unknown { raw: Bitstream },
    Full { raw: Bitstream },
    Half { low: Bitstream },
    Mix { low: Bitstream, high: Bitstream },
}

impl Tracks {
    pub fn mode(&self) -> FawMode {
        match self {
            Tracks::Unknown { .. } => FawMode::Unknown,
            Tracks::Full { .. } => FawMode::Full,
            Tracks::Half { .. } => FawMode::Half,
            Tracks::Mix { .. } => FawMode::Mix,
        }
    }
}

/// Classifies everything buffered in `raw` so far.
///
/// Priority: start marker in the raw bytes, then the Half probe, then a start
/// marker in both derived byte lanes. When none match, `raw` is handed back
/// unchanged as [`Tracks::Unknown`] so the next chunk can retry.
pub fn detect(raw: Bitstream, half_bytes_per_sample: usize) -> Tracks {
    if find(raw.data(), &START_MARKER).is_some() {
        info!("Detected FAW packing: {}", FawMode::Full);
        return Tracks::Full { raw };
    }

    // 8-bit containers can only carry full packing
    if half_bytes_per_sample == 0 {
        return Tracks::Unknown { raw };
    }

    if find(raw.data(), &HALF_PROBE_MARKER).is_some() {
        let mut low = Bitstream::new(half_bytes_per_sample);
        low.append_packed(HalfByte::Low, raw.data());
        info!("Detected FAW packing: {}", FawMode::Half);
        return Tracks::Half { low };
    }

    let mut low = Bitstream::new(half_bytes_per_sample);
    let mut high = Bitstream::new(half_bytes_per_sample);
    low.append_packed(HalfByte::Low, raw.data());
    high.append_packed(HalfByte::High, raw.data());
    if find(low.data(), &START_MARKER).is_some() && find(high.data(), &START_MARKER).is_some() {
        info!("Detected FAW packing: {}", FawMode::Mix);
        return Tracks::Mix { low, high };
    }

    debug!(
        "FAW packing undecided after {} bytes, waiting for more input",
        raw.len()
    );
    Tracks::Unknown { raw }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(bytes: &[u8]) -> Bitstream {
        let mut bs = Bitstream::new(4);
        bs.append(bytes);
        bs
    }

    fn half_encode(bytes: &[u8]) -> Vec<u8> {
        bytes.iter().flat_map(|b| [b.wrapping_add(0x80), 0x00]).collect()
    }

    #[test]
    fn full_wins() {
        let mut bytes = vec![0u8; 100];
        bytes.extend_from_slice(&START_MARKER);
        bytes.extend_from_slice(&HALF_PROBE_MARKER);
        assert_eq!(detect(raw(&bytes), 2).mode(), FawMode::Full);
    }

    #[test]
    fn half_probe() {
        let mut bytes = vec![0u8; 4];
        bytes.extend(half_encode(&START_MARKER));
        let Tracks::Half { low } = detect(raw(&bytes), 2) else {
            panic!("expected half packing");
        };
        assert_eq!(low.len(), bytes.len() / 2);
        assert!(find(low.data(), &START_MARKER).is_some());
        assert_eq!(low.bytes_per_sample(), 2);
    }

    #[test]
    fn mix_needs_both_lanes() {
        let lane = half_encode(&START_MARKER);
        let mut both: Vec<u8> = lane.chunks_exact(2).flat_map(|w| [w[0], w[0]]).collect();
        // Break the probe by leading with a non-zero high byte
        both.insert(0, 0x11);
        both.insert(0, 0x11);
        assert_eq!(detect(raw(&both), 2).mode(), FawMode::Mix);

        // Start marker in only one lane
        let mut one = vec![0x11u8, 0x11];
        one.extend(START_MARKER.iter().flat_map(|b| [0x11, b.wrapping_add(0x80)]));
        let tracks = detect(raw(&one), 2);
        let Tracks::Unknown { raw } = tracks else {
            panic!("expected undecided");
        };
        assert_eq!(raw.len(), one.len());
    }

    #[test]
    fn undecided_keeps_raw() {
        let bytes = vec![0x55u8; 256];
        let Tracks::Unknown { raw } = detect(raw(&bytes), 2) else {
            panic!("expected undecided");
        };
        assert_eq!(raw.data(), &bytes[..]);
    }

    #[test]
    fn eight_bit_containers_only_full() {
        let mut bytes = vec![0u8; 4];
        bytes.extend(half_encode(&START_MARKER));
        assert_eq!(detect(raw(&bytes), 0).mode(), FawMode::Unknown);
    }
}
