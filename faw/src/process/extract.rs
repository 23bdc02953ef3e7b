use crate::log_or_err;
use crate::structs::adts::{AAC_BLOCK_SAMPLES, ADTS_HEADER_LEN, AdtsHeader};
use crate::structs::markers::{END_MARKER, START_MARKER};
use crate::structs::silence::silence_template;
use crate::utils::bitstream::Bitstream;
use crate::utils::checksum::{CHECKSUM_LEN, checksum, read_checksum};
use crate::utils::errors::ExtractError;
use crate::utils::search::find;
use log::{Level, debug, trace};

/// Samples a frame may sit away from the emitted position before it is
/// treated as late or a gap is filled with silence.
pub const DRIFT_TOLERANCE: u64 = AAC_BLOCK_SAMPLES / 2;

/// Outcome of a single extraction attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extracted {
    /// A frame was handled (emitted or dropped); try again.
    Produced,
    /// No complete frame in the window; wait for more input.
    NoFrame,
}

/// Per-track extraction counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractStats {
    pub frames: u64,
    pub silence: u64,
    pub corrupt: u64,
    pub stale: u64,
}

/// Pulls checksummed frames out of a [`Bitstream`] and keeps the emitted
/// duration in step with the input by synthesizing silence.
///
/// # Example
///
/// ```rust
/// use faw::process::extract::{Extracted, Extractor};
/// use faw::utils::bitstream::Bitstream;
///
/// let mut extractor = Extractor::default();
/// let mut input = Bitstream::new(4);
/// let mut output = Vec::new();
///
/// input.append(&[0u8; 64]);
/// assert_eq!(extractor.extract_one(&mut input, &mut output)?, Extracted::NoFrame);
/// # Ok::<(), faw::utils::errors::ExtractError>(())
/// ```
#[derive(Debug)]
pub struct Extractor {
    fail_level: Level,
    stats: ExtractStats,
    first_header: Option<AdtsHeader>,
}

impl Default for Extractor {
    fn default() -> Self {
        Self {
            fail_level: Level::Error,
            stats: ExtractStats::default(),
            first_header: None,
        }
    }
}

impl Extractor {
    /// Conditions reported at or above `level` are returned as errors
    /// instead of being logged.
    pub fn set_fail_level(&mut self, level: Level) {
        self.fail_level = level;
    }

    pub fn stats(&self) -> &ExtractStats {
        &self.stats
    }

    /// Header of the first frame emitted on this track.
    pub fn first_header(&self) -> Option<&AdtsHeader> {
        self.first_header.as_ref()
    }

    /// Extracts frames until the window holds no complete frame.
    pub fn extract_all(
        &mut self,
        input: &mut Bitstream,
        output: &mut Vec<u8>,
    ) -> Result<(), ExtractError> {
        while !input.is_empty() {
            if self.extract_one(input, output)? == Extracted::NoFrame {
                break;
            }
        }
        Ok(())
    }

    /// Handles the next frame in the window.
    pub fn extract_one(
        &mut self,
        input: &mut Bitstream,
        output: &mut Vec<u8>,
    ) -> Result<Extracted, ExtractError> {
        let data = input.data();

        let Some(first_start) = find(data, &START_MARKER) else {
            // A marker may straddle the next chunk
            let drop_len = data.len().saturating_sub(START_MARKER.len() - 1);
            input.consume(drop_len);
            return Ok(Extracted::NoFrame);
        };

        let after_start = first_start + START_MARKER.len();
        let Some(fin) = find(&data[after_start..], &END_MARKER) else {
            // A partial header would read as a zero-channel layout
            if data.len() - after_start >= ADTS_HEADER_LEN {
                let header = AdtsHeader::parse(&data[after_start..]);
                input.record_header(header);
            }
            return Ok(Extracted::NoFrame);
        };
        let pos_fin = after_start + fin;

        // Prefer the latest start marker before the end marker
        let mut pos_start = first_start;
        while let Some(next) = find(&data[pos_start + START_MARKER.len()..pos_fin], &START_MARKER)
        {
            pos_start += next + START_MARKER.len();
        }

        let block_start = pos_start + START_MARKER.len();
        let consumed = pos_fin + END_MARKER.len();
        let frame_start_sample =
            input.input_sample_start() + (pos_start / input.bytes_per_sample().max(1)) as u64;
        let header = AdtsHeader::parse(&data[block_start..]);

        let verdict = match (pos_fin - block_start).checked_sub(CHECKSUM_LEN) {
            None => Err(ExtractError::LengthMismatch {
                sample: frame_start_sample,
                header: header.frame_length,
                block: 0,
            }),
            Some(block_size) => {
                let field = &data[pos_fin - CHECKSUM_LEN..pos_fin];
                let calculated = checksum(&data[block_start..block_start + block_size], field[0]);
                let read = read_checksum(&[field[0], field[1], field[2], field[3]]);

                if calculated != read {
                    Err(ExtractError::ChecksumMismatch {
                        sample: frame_start_sample,
                        calculated,
                        read,
                    })
                } else if block_size != header.frame_length {
                    Err(ExtractError::LengthMismatch {
                        sample: frame_start_sample,
                        header: header.frame_length,
                        block: block_size,
                    })
                } else {
                    Ok(block_size)
                }
            }
        };
        if pos_fin - block_start >= ADTS_HEADER_LEN {
            input.record_header(header);
        }

        let block_size = match verdict {
            Ok(block_size) => block_size,
            Err(err) => {
                input.consume(consumed);
                self.stats.corrupt += 1;
                log_or_err!(&self, Level::Warn, err);
                return Ok(Extracted::Produced);
            }
        };

        let output_samples = input.output_samples();
        if frame_start_sample + DRIFT_TOLERANCE < output_samples {
            input.consume(consumed);
            self.stats.stale += 1;
            log_or_err!(
                &self,
                Level::Debug,
                ExtractError::StaleFrame {
                    sample: frame_start_sample,
                    output: output_samples,
                }
            );
            return Ok(Extracted::Produced);
        }

        while input.output_samples() + DRIFT_TOLERANCE < frame_start_sample {
            debug!(
                "Insert silence: frame at {frame_start_sample}, output {} -> {}",
                input.output_samples(),
                input.output_samples() + AAC_BLOCK_SAMPLES
            );
            self.insert_silence(input, output);
        }

        output.extend_from_slice(&input.data()[block_start..block_start + block_size]);
        trace!(
            "Frame at sample {frame_start_sample}: {block_size} bytes, output {}",
            input.output_samples()
        );

        if self.first_header.is_none() {
            self.first_header = Some(header);
        }
        self.stats.frames += 1;
        input.add_output_samples(AAC_BLOCK_SAMPLES);
        input.consume(consumed);
        Ok(Extracted::Produced)
    }

    /// Fills the remaining input duration with silence at end of stream.
    pub fn finish(&mut self, input: &mut Bitstream, output: &mut Vec<u8>) {
        debug!(
            "Track end: input {} samples, output {} samples",
            input.input_sample_fin(),
            input.output_samples()
        );
        while input.output_samples() + DRIFT_TOLERANCE < input.input_sample_fin() {
            self.insert_silence(input, output);
        }
    }

    /// Appends one silent frame matching the last seen channel layout and
    /// advances the output position by one frame. Channel count 0 advances
    /// the position without emitting bytes.
    pub fn insert_silence(&mut self, input: &mut Bitstream, output: &mut Vec<u8>) {
        let channels = input.header().channel_count;
        if channels != 0 {
            output.extend_from_slice(silence_template(channels));
        }
        self.stats.silence += 1;
        input.add_output_samples(AAC_BLOCK_SAMPLES);
    }
}
