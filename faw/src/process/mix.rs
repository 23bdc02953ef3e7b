use std::collections::VecDeque;

use log::debug;

use crate::process::wrap::{Encoder, Packing};
use crate::structs::wav::WavHeader;
use crate::utils::errors::ConfigError;

/// Interleaves two Half-packed tracks into one stream of 16-bit samples,
/// track A in the high byte and track B in the low byte.
///
/// Queued bytes are the unsigned 8-bit view of each Half-packed sample.
#[derive(Debug, Default)]
pub struct DualTrackMixer {
    a: VecDeque<u8>,
    b: VecDeque<u8>,
}

impl DualTrackMixer {
    /// Queues one step of both tracks and mixes the part they have in common.
    pub fn push(&mut self, a: &[u8], b: &[u8], out: &mut Vec<u8>) {
        self.a.extend(a);
        self.b.extend(b);

        let n = self.a.len().min(self.b.len());
        out.reserve(n * 2);
        for (qa, qb) in self.a.drain(..n).zip(self.b.drain(..n)) {
            out.extend_from_slice(&mix_sample(qa, qb));
        }
    }

    /// Pads the shorter queue with zeros and mixes the rest.
    pub fn finish(&mut self, out: &mut Vec<u8>) {
        let n = self.a.len().max(self.b.len());
        if n > 0 {
            debug!(
                "Mixer end: padding track {} with {} bytes",
                if self.a.len() < n { "A" } else { "B" },
                n - self.a.len().min(self.b.len())
            );
        }
        self.a.resize(n, 0);
        self.b.resize(n, 0);
        self.push(&[], &[], out);
    }
}

/// Little-endian bytes of `((qa - 128) << 8) | (qb - 128)`.
#[inline]
fn mix_sample(qa: u8, qb: u8) -> [u8; 2] {
    [qb.wrapping_sub(0x80), qa.wrapping_sub(0x80)]
}

/// Reduces Half-packed sample data to its unsigned 8-bit view: the low byte of
/// each 16-bit sample, unbiased.
pub fn narrow(half_packed: &[u8]) -> Vec<u8> {
    half_packed
        .chunks_exact(2)
        .map(|w| w[0].wrapping_add(0x80))
        .collect()
}

/// Encodes two elementary streams into one Mix-packed sample stream.
///
/// Feed both inputs in lockstep; the output holds as many samples as the
/// longer track.
#[derive(Debug)]
pub struct MixEncoder {
    encoders: [Encoder; 2],
    mixer: DualTrackMixer,
    bytes_written: u64,
}

impl MixEncoder {
    /// `delays_ms` applies to track A and track B respectively.
    pub fn new(header: WavHeader, delays_ms: [i32; 2]) -> Result<Self, ConfigError> {
        let [delay_a, delay_b] = delays_ms;
        Ok(Self {
            encoders: [
                Encoder::new(header, Packing::Half, delay_a)?,
                Encoder::new(header, Packing::Half, delay_b)?,
            ],
            mixer: DualTrackMixer::default(),
            bytes_written: 0,
        })
    }

    /// Total sample bytes returned so far.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn frames_written(&self) -> [u64; 2] {
        self.encoders.each_ref().map(|e| e.frames_written())
    }

    pub fn push(&mut self, a: &[u8], b: &[u8]) -> Vec<u8> {
        let [enc_a, enc_b] = &mut self.encoders;
        // Both lanes open with the leading sample, whichever completes a frame first
        let mut sa = enc_a.start();
        sa.extend(enc_a.encode(a));
        let mut sb = enc_b.start();
        sb.extend(enc_b.encode(b));
        let qa = narrow(&sa);
        let qb = narrow(&sb);

        let mut out = Vec::new();
        self.mixer.push(&qa, &qb, &mut out);
        self.bytes_written += out.len() as u64;
        out
    }

    pub fn finish(&mut self) -> Vec<u8> {
        let [enc_a, enc_b] = &mut self.encoders;
        let qa = narrow(&enc_a.finish());
        let qb = narrow(&enc_b.finish());

        let mut out = Vec::new();
        self.mixer.push(&qa, &qb, &mut out);
        self.mixer.finish(&mut out);
        self.bytes_written += out.len() as u64;
        out
    }
}
