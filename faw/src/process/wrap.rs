use log::{debug, info, trace, warn};

use crate::structs::adts::{AAC_BLOCK_SAMPLES, ADTS_HEADER_LEN, AdtsHeader, is_sync};
use crate::structs::markers::{END_MARKER, START_MARKER, WRAP_OVERHEAD};
use crate::structs::silence::silence_template;
use crate::structs::wav::WavHeader;
use crate::utils::bitstream::Bitstream;
use crate::utils::checksum::checksum_for_block;
use crate::utils::errors::ConfigError;

/// How wrapped frames are laid into container samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Packing {
    /// Wrapped bytes are the sample bytes.
    #[default]
    Full,
    /// One wrapped byte per 16-bit sample, in the low byte.
    Half,
}

/// Wraps an ADTS elementary stream into FAW-carrying PCM sample data.
///
/// Every frame occupies one slot of [`AAC_BLOCK_SAMPLES`] container samples,
/// so a decoder sees frames at the position their duration implies.
///
/// # Example
///
/// ```rust,no_run
/// use faw::process::wrap::{Encoder, Packing};
/// use faw::structs::wav::WavHeader;
///
/// let es = std::fs::read("track.aac")?;
/// let mut encoder = Encoder::new(WavHeader::new(48000, 2, 16), Packing::Full, 0)?;
///
/// let mut samples = encoder.encode(&es);
/// samples.extend(encoder.finish());
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug)]
pub struct Encoder {
    header: WavHeader,
    packing: Packing,
    pending: Bitstream,
    slot_bytes: usize,
    delay_frames: i64,
    started: bool,
    frames_written: u64,
    skipped_bytes: u64,
}

impl Encoder {
    /// `delay_ms` shifts the stream against the container's time zero:
    /// positive values prepend silent frames, negative values drop leading
    /// frames.
    pub fn new(header: WavHeader, packing: Packing, delay_ms: i32) -> Result<Self, ConfigError> {
        header.validate()?;

        let slot_bytes = match packing {
            Packing::Full => header.bytes_per_sample(),
            Packing::Half => {
                if header.bits_per_sample < 16 {
                    return Err(ConfigError::HalfNeedsWideSamples(header.bits_per_sample));
                }
                header.half_bytes_per_sample()
            }
        } * AAC_BLOCK_SAMPLES as usize;

        let delay_frames = delay_to_frames(delay_ms, header.sample_rate);
        debug!(
            "Encoder: {header}, {packing:?} packing, {slot_bytes}-byte slots, delay {delay_ms} ms ({delay_frames} frames)"
        );

        Ok(Self {
            header,
            packing,
            pending: Bitstream::new(1),
            slot_bytes,
            delay_frames,
            started: false,
            frames_written: 0,
            skipped_bytes: 0,
        })
    }

    pub fn header(&self) -> &WavHeader {
        &self.header
    }

    pub fn packing(&self) -> Packing {
        self.packing
    }

    /// Returns the leading zero sample of a Half stream if it has not been
    /// written yet, so it can precede the first frame.
    pub fn start(&mut self) -> Vec<u8> {
        if self.packing != Packing::Half || self.started {
            return Vec::new();
        }
        self.started = true;
        vec![0; self.header.bytes_per_sample()]
    }

    /// Frames written so far, inserted silence included.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Feeds elementary-stream bytes and returns the sample data of every
    /// frame they completed.
    pub fn encode(&mut self, es: &[u8]) -> Vec<u8> {
        self.pending.append(es);

        let mut wrapped = Vec::new();
        while let Some(frame_length) = self.next_frame() {
            let header = AdtsHeader::parse(self.pending.data());

            if self.frames_written == 0 && self.delay_frames != 0 {
                if self.delay_frames < 0 {
                    debug!("Dropping leading frame for negative delay");
                    self.delay_frames += 1;
                    self.pending.consume(frame_length);
                    continue;
                }
                info!(
                    "Prepending {} silent frames for delay ({} ch)",
                    self.delay_frames, header.channel_count
                );
                let silence = silence_template(header.channel_count);
                for _ in 0..self.delay_frames {
                    self.frames_written += wrap_frame(silence, self.slot_bytes, &mut wrapped);
                }
                self.delay_frames = 0;
            }

            trace!("Wrapping frame {}: {header}", self.frames_written);
            self.frames_written += wrap_frame(
                &self.pending.data()[..frame_length],
                self.slot_bytes,
                &mut wrapped,
            );
            self.pending.consume(frame_length);
        }

        self.pack(wrapped)
    }

    /// Wraps whatever partial frame is still buffered.
    pub fn finish(&mut self) -> Vec<u8> {
        let mut wrapped = Vec::new();
        if !self.pending.is_empty() {
            let header = AdtsHeader::parse(self.pending.data());
            warn!(
                "Incomplete trailing frame: {} of {} bytes",
                self.pending.len(),
                header.frame_length
            );
            self.frames_written += wrap_frame(self.pending.data(), self.slot_bytes, &mut wrapped);
            self.pending.clear();
        }
        if self.skipped_bytes > 0 {
            debug!("Skipped {} bytes of non-ADTS input", self.skipped_bytes);
        }
        self.pack(wrapped)
    }

    /// Aligns the buffer to the next ADTS sync word and returns the length of
    /// the frame there once it is complete.
    fn next_frame(&mut self) -> Option<usize> {
        loop {
            let data = self.pending.data();
            let skip = match (0..data.len()).find(|&i| is_sync(&data[i..])) {
                Some(skip) => skip,
                // A trailing 0xFF may start the next sync word
                None => data.len().saturating_sub(1),
            };
            if skip > 0 {
                warn!("Skipping {skip} bytes before ADTS sync word");
                self.skipped_bytes += skip as u64;
                self.pending.consume(skip);
            }

            let data = self.pending.data();
            if data.len() < ADTS_HEADER_LEN {
                return None;
            }
            let frame_length = AdtsHeader::parse(data).frame_length;
            if frame_length < ADTS_HEADER_LEN {
                warn!("Invalid aac_frame_length {frame_length}, resynchronizing");
                self.skipped_bytes += 1;
                self.pending.consume(1);
                continue;
            }
            return (data.len() >= frame_length).then_some(frame_length);
        }
    }

    fn pack(&mut self, wrapped: Vec<u8>) -> Vec<u8> {
        match self.packing {
            Packing::Full => wrapped,
            Packing::Half => {
                let mut out = Vec::with_capacity(wrapped.len() * 2 + self.header.bytes_per_sample());
                if !wrapped.is_empty() {
                    // Leading zero sample lets the half probe match the first frame
                    out.extend(self.start());
                }
                out.extend(wrapped.iter().flat_map(|b| [b.wrapping_add(0x80), 0x00]));
                out
            }
        }
    }
}

/// Writes `frame` in its wrapped form and pads it with zeros to whole slots of
/// `slot_bytes`. Returns the number of slots used.
pub fn wrap_frame(frame: &[u8], slot_bytes: usize, out: &mut Vec<u8>) -> u64 {
    let wrapped_len = frame.len() + WRAP_OVERHEAD;
    let slots = wrapped_len.div_ceil(slot_bytes.max(1)).max(1);
    if slots > 1 {
        warn!(
            "Wrapped frame of {wrapped_len} bytes exceeds the {slot_bytes}-byte slot, using {slots} slots"
        );
    }

    let start = out.len();
    out.extend_from_slice(&START_MARKER);
    out.extend_from_slice(frame);
    out.extend_from_slice(&checksum_for_block(frame).to_le_bytes());
    out.extend_from_slice(&END_MARKER);
    out.resize(start + slots * slot_bytes.max(1), 0);

    slots as u64
}

/// Converts a delay to a whole number of frames at `sample_rate`, rounding to
/// the nearest frame.
pub fn delay_to_frames(delay_ms: i32, sample_rate: u32) -> i64 {
    let samples = delay_ms as f64 * sample_rate as f64 / 1000.0;
    (samples / AAC_BLOCK_SAMPLES as f64).round() as i64
}
