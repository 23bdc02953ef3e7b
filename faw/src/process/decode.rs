use anyhow::Result;
use log::{Level, debug};

use crate::process::detect::{FawMode, Tracks, detect};
use crate::process::extract::{ExtractStats, Extractor};
use crate::structs::adts::AdtsHeader;
use crate::structs::wav::WavHeader;
use crate::utils::bitstream::{Bitstream, HalfByte};
use crate::utils::errors::{ConfigError, DecodeError, DetectError};

/// Elementary-stream bytes produced for the (up to) two tracks of a stream.
/// The second track is only used in [`FawMode::Mix`].
pub type DecoderOutput = [Vec<u8>; 2];

/// Recovers elementary streams from FAW-carrying PCM sample data.
///
/// # Example
///
/// ```rust,no_run
/// use faw::process::decode::Decoder;
///
/// let capture = std::fs::read("capture.wav")?;
/// let (mut decoder, data_offset) = Decoder::init(&capture)?;
///
/// let [track, _] = decoder.decode(&capture[data_offset..])?;
/// let [tail, _] = decoder.finish()?;
/// println!("{} packing, {} bytes", decoder.mode(), track.len() + tail.len());
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug)]
pub struct Decoder {
    header: WavHeader,
    tracks: Tracks,
    carry: Option<u8>,
    extractors: [Extractor; 2],
    probe_limit: Option<usize>,
}

impl Decoder {
    /// Parses the container header at the start of `data`.
    ///
    /// Returns the decoder and the offset at which sample data begins.
    pub fn init(data: &[u8]) -> Result<(Self, usize)> {
        let (header, offset) = WavHeader::parse(data)?;
        Ok((Self::with_header(header)?, offset))
    }

    pub fn with_header(header: WavHeader) -> Result<Self, ConfigError> {
        header.validate()?;
        debug!("Decoder container: {header}");

        Ok(Self {
            header,
            tracks: Tracks::Unknown {
                raw: Bitstream::new(header.bytes_per_sample()),
            },
            carry: None,
            extractors: Default::default(),
            probe_limit: None,
        })
    }

    /// Conditions reported at or above `level` fail the decode instead of
    /// being logged and recovered.
    pub fn set_fail_level(&mut self, level: Level) {
        self.extractors
            .iter_mut()
            .for_each(|e| e.set_fail_level(level));
    }

    /// Gives up on detection once this many bytes are buffered without a
    /// recognised packing.
    pub fn set_probe_limit(&mut self, limit: Option<usize>) {
        self.probe_limit = limit;
    }

    pub fn mode(&self) -> FawMode {
        self.tracks.mode()
    }

    pub fn header(&self) -> &WavHeader {
        &self.header
    }

    pub fn stats(&self) -> [ExtractStats; 2] {
        self.extractors.each_ref().map(|e| *e.stats())
    }

    pub fn first_headers(&self) -> [Option<AdtsHeader>; 2] {
        self.extractors.each_ref().map(|e| e.first_header().copied())
    }

    /// Feeds one chunk of sample data and returns whatever frames it completed.
    pub fn decode(&mut self, input: &[u8]) -> Result<DecoderOutput, DecodeError> {
        let mut output = DecoderOutput::default();

        if let Tracks::Unknown { raw } = &mut self.tracks {
            raw.append(input);
            let raw = std::mem::take(raw);
            let odd_tail = (raw.len() % 2 == 1).then(|| raw.data()[raw.len() - 1]);

            self.tracks = detect(raw, self.header.half_bytes_per_sample());
            match &self.tracks {
                Tracks::Unknown { raw } => {
                    if let Some(limit) = self.probe_limit {
                        if raw.len() > limit {
                            return Err(DetectError::Undetermined {
                                bytes: raw.len() as u64,
                            }
                            .into());
                        }
                    }
                    return Ok(output);
                }
                Tracks::Half { .. } | Tracks::Mix { .. } => self.carry = odd_tail,
                Tracks::Full { .. } => {}
            }
        } else {
            self.append(input);
        }

        match &mut self.tracks {
            Tracks::Unknown { .. } => {}
            Tracks::Full { raw } => self.extractors[0].extract_all(raw, &mut output[0])?,
            Tracks::Half { low } => self.extractors[0].extract_all(low, &mut output[0])?,
            Tracks::Mix { low, high } => {
                let [first, second] = &mut self.extractors;
                let [out_low, out_high] = &mut output;
                first.extract_all(low, out_low)?;
                second.extract_all(high, out_high)?;
            }
        }

        Ok(output)
    }

    /// Flushes the residual drift of every active track as silence.
    pub fn finish(&mut self) -> Result<DecoderOutput, DecodeError> {
        let mut output = DecoderOutput::default();

        match &mut self.tracks {
            Tracks::Unknown { raw } => {
                return Err(DetectError::Undetermined {
                    bytes: raw.len() as u64,
                }
                .into());
            }
            Tracks::Full { raw } => self.extractors[0].finish(raw, &mut output[0]),
            Tracks::Half { low } => self.extractors[0].finish(low, &mut output[0]),
            Tracks::Mix { low, high } => {
                let [first, second] = &mut self.extractors;
                let [out_low, out_high] = &mut output;
                first.finish(low, out_low);
                second.finish(high, out_high);
            }
        }

        Ok(output)
    }

    fn append(&mut self, input: &[u8]) {
        match &mut self.tracks {
            Tracks::Unknown { raw } | Tracks::Full { raw } => raw.append(input),
            Tracks::Half { low } => {
                let (head, body) = split_words(&mut self.carry, input);
                if let Some(word) = head {
                    low.append_packed(HalfByte::Low, &word);
                }
                low.append_packed(HalfByte::Low, body);
            }
            Tracks::Mix { low, high } => {
                let (head, body) = split_words(&mut self.carry, input);
                if let Some(word) = head {
                    low.append_packed(HalfByte::Low, &word);
                    high.append_packed(HalfByte::High, &word);
                }
                low.append_packed(HalfByte::Low, body);
                high.append_packed(HalfByte::High, body);
            }
        }
    }
}

/// Splits `input` into whole 16-bit words, completing the odd byte left over
/// from the previous chunk and holding back a new one.
fn split_words<'a>(carry: &mut Option<u8>, input: &'a [u8]) -> (Option<[u8; 2]>, &'a [u8]) {
    let (head, rest) = match (carry.take(), input.split_first()) {
        (Some(lo), Some((&hi, rest))) => (Some([lo, hi]), rest),
        (pending, _) => {
            *carry = pending;
            (None, input)
        }
    };

    let even = rest.len() & !1;
    if even < rest.len() {
        *carry = Some(rest[even]);
    }
    (head, &rest[..even])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_words_carries_odd_bytes() {
        let mut carry = None;

        let (head, body) = split_words(&mut carry, &[1, 2, 3]);
        assert_eq!(head, None);
        assert_eq!(body, &[1, 2]);
        assert_eq!(carry, Some(3));

        let (head, body) = split_words(&mut carry, &[4, 5, 6, 7]);
        assert_eq!(head, Some([3, 4]));
        assert_eq!(body, &[5, 6]);
        assert_eq!(carry, Some(7));

        let (head, body) = split_words(&mut carry, &[]);
        assert_eq!(head, None);
        assert!(body.is_empty());
        assert_eq!(carry, Some(7));
    }

    #[test]
    fn rejects_empty_layout() {
        assert!(Decoder::with_header(WavHeader::new(48000, 0, 16)).is_err());
    }

    #[test]
    fn undetermined_at_finish() {
        let mut decoder = Decoder::with_header(WavHeader::new(48000, 2, 16)).unwrap();
        let out = decoder.decode(&[0x33; 1000]).unwrap();
        assert!(out[0].is_empty() && out[1].is_empty());
        assert_eq!(decoder.mode(), FawMode::Unknown);

        let err = decoder.finish().unwrap_err();
        assert!(matches!(
            err,
            DecodeError::Detect(DetectError::Undetermined { bytes: 1000 })
        ));
    }

    #[test]
    fn probe_limit() {
        let mut decoder = Decoder::with_header(WavHeader::new(48000, 2, 16)).unwrap();
        decoder.set_probe_limit(Some(1500));
        assert!(decoder.decode(&[0x33; 1000]).is_ok());
        assert!(matches!(
            decoder.decode(&[0x33; 1000]),
            Err(DecodeError::Detect(DetectError::Undetermined { bytes: 2000 }))
        ));
    }
}
