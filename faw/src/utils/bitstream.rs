//! Sliding-window byte buffer with sample accounting.
//!
//! Bytes are appended at the back of a live window `[offset, offset + length)`
//! and consumed from the front. The backing arena grows by at least doubling
//! and is compacted back to offset 0 only when the tail runs out of room, so
//! appends stay amortized O(1) while the window is trimmed continuously.

use crate::structs::adts::AdtsHeader;

/// Which byte of a little-endian 16-bit sample carries the packed data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalfByte {
    Low,
    High,
}

#[derive(Debug, Default)]
pub struct Bitstream {
    buffer: Vec<u8>,
    offset: usize,
    length: usize,
    bytes_per_sample: usize,
    appended: u64,
    output_samples: u64,
    header: AdtsHeader,
}

impl Bitstream {
    pub fn new(bytes_per_sample: usize) -> Self {
        Self {
            bytes_per_sample,
            ..Default::default()
        }
    }

    /// Live window.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.buffer[self.offset..self.offset + self.length]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.length
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    #[inline]
    pub fn bytes_per_sample(&self) -> usize {
        self.bytes_per_sample
    }

    /// Total whole samples ever appended.
    #[inline]
    pub fn input_sample_fin(&self) -> u64 {
        self.appended / self.bytes_per_sample.max(1) as u64
    }

    /// Index of the first whole sample still resident in the window.
    #[inline]
    pub fn input_sample_start(&self) -> u64 {
        self.input_sample_fin()
            .saturating_sub((self.length / self.bytes_per_sample.max(1)) as u64)
    }

    /// Total samples emitted downstream.
    #[inline]
    pub fn output_samples(&self) -> u64 {
        self.output_samples
    }

    #[inline]
    pub fn add_output_samples(&mut self, samples: u64) {
        self.output_samples += samples;
    }

    /// Most recently recorded frame header.
    #[inline]
    pub fn header(&self) -> &AdtsHeader {
        &self.header
    }

    /// Stores the most recently parsed frame header.
    #[inline]
    pub fn record_header(&mut self, header: AdtsHeader) {
        self.header = header;
    }

    /// Copies `input` to the back of the window.
    pub fn append(&mut self, input: &[u8]) {
        self.reserve_tail(input.len()).copy_from_slice(input);
    }

    /// Appends one byte per little-endian 16-bit sample of `input`, taking the
    /// designated byte and removing the unsigned bias.
    pub fn append_packed(&mut self, half: HalfByte, input: &[u8]) {
        let idx = match half {
            HalfByte::Low => 0,
            HalfByte::High => 1,
        };
        let tail = self.reserve_tail(input.len() / 2);
        for (dst, sample) in tail.iter_mut().zip(input.chunks_exact(2)) {
            *dst = sample[idx].wrapping_sub(0x80);
        }
    }

    /// Drops `n` bytes from the front of the window.
    pub fn consume(&mut self, n: usize) {
        let n = n.min(self.length);
        self.length -= n;
        if self.length == 0 {
            self.offset = 0;
        } else {
            self.offset += n;
        }
    }

    /// Empties the window and resets all counters.
    pub fn clear(&mut self) {
        self.offset = 0;
        self.length = 0;
        self.appended = 0;
        self.output_samples = 0;
    }

    /// Extends the window by `additional` bytes and returns the new tail.
    fn reserve_tail(&mut self, additional: usize) -> &mut [u8] {
        let needed = self.length + additional;
        if self.buffer.len() < needed {
            let grown = needed.max(self.buffer.len() * 2);
            self.compact();
            self.buffer.resize(grown, 0);
        } else if self.buffer.len() < self.offset + needed {
            self.compact();
        }

        let start = self.offset + self.length;
        self.length += additional;
        self.appended += additional as u64;
        &mut self.buffer[start..start + additional]
    }

    fn compact(&mut self) {
        if self.offset > 0 {
            self.buffer
                .copy_within(self.offset..self.offset + self.length, 0);
            self.offset = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_and_consume() {
        let mut bs = Bitstream::new(4);
        bs.append(&[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(bs.data(), &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(bs.input_sample_fin(), 2);
        assert_eq!(bs.input_sample_start(), 0);

        bs.consume(4);
        assert_eq!(bs.data(), &[5, 6, 7, 8]);
        assert_eq!(bs.input_sample_start(), 1);

        bs.consume(4);
        assert!(bs.is_empty());
        assert_eq!(bs.input_sample_start(), 2);
        assert_eq!(bs.offset, 0);
    }

    #[test]
    fn compacts_instead_of_growing() {
        let mut bs = Bitstream::new(1);
        bs.append(&[0u8; 64]);
        let capacity = bs.buffer.len();

        for round in 0..100u8 {
            bs.consume(32);
            bs.append(&[round; 32]);
            assert_eq!(bs.len(), 64);
        }
        assert_eq!(bs.buffer.len(), capacity);
        assert_eq!(&bs.data()[32..], &[99u8; 32]);
        assert_eq!(&bs.data()[..32], &[98u8; 32]);
    }

    #[test]
    fn grows_by_doubling() {
        let mut bs = Bitstream::new(1);
        bs.append(&[1u8; 100]);
        bs.consume(10);
        bs.append(&[2u8; 20]);
        assert_eq!(bs.buffer.len(), 200);
        assert_eq!(bs.offset, 0);
        assert_eq!(bs.len(), 110);
        assert_eq!(bs.data()[89], 1);
        assert_eq!(bs.data()[90], 2);
    }

    #[test]
    fn fractional_samples_carry_across_appends() {
        let mut bs = Bitstream::new(4);
        for _ in 0..4 {
            bs.append(&[0u8; 3]);
        }
        assert_eq!(bs.input_sample_fin(), 3);
    }

    #[test]
    fn packed_extraction() {
        // Samples 0x0012 and 0x8090 little-endian
        let input = [0x12, 0x00, 0x90, 0x80];

        let mut low = Bitstream::new(1);
        low.append_packed(HalfByte::Low, &input);
        assert_eq!(low.data(), &[0x92, 0x10]);

        let mut high = Bitstream::new(1);
        high.append_packed(HalfByte::High, &input);
        assert_eq!(high.data(), &[0x80, 0x00]);
        assert_eq!(high.input_sample_fin(), 2);
    }

    #[test]
    fn records_header() {
        let mut bs = Bitstream::new(2);
        assert_eq!(bs.header().channel_count, 0);
        bs.record_header(AdtsHeader::parse(&[0xFF, 0xF9, 0x4C, 0x80, 0x02, 0x1F, 0xFC]));
        assert_eq!(bs.header().channel_count, 2);
        assert_eq!(bs.header().frame_length, 16);
    }

    #[test]
    fn output_counter_is_independent() {
        let mut bs = Bitstream::new(2);
        bs.append(&[0u8; 8]);
        bs.add_output_samples(1024);
        bs.consume(8);
        assert_eq!(bs.output_samples(), 1024);
        bs.clear();
        assert_eq!(bs.output_samples(), 0);
        assert_eq!(bs.input_sample_fin(), 0);
    }
}
