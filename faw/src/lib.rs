//! Detection, extraction and wrapping of FAW audio frames.
//!
//! ## Technical Overview
//!
//! FAW embeds an ADTS (AAC) elementary stream in the sample data of a PCM
//! container so it survives tools that only pass PCM through.
//!
//! ### Frame Layout
//!
//! Each ADTS frame is surrounded by a fixed start marker, a 4-byte
//! sum/XOR checksum and a fixed end marker, then padded to the duration of one
//! AAC frame (1024 samples).
//!
//! ### Packing Variants
//!
//! - **Full**: wrapped bytes are the sample bytes
//! - **Half**: one wrapped byte in the low byte of each 16-bit sample
//! - **Mix**: two independent streams in the low and high bytes
//!
//! ### Drift Correction
//!
//! Frames carry no timestamps of their own. The decoder derives them from the
//! position of each frame in the sample data and inserts silent frames
//! whenever a gap of more than half a frame opens between the input and the
//! emitted stream.
//!
//! ## Quick Start
//!
//! ```rust
//! use faw::process::decode::Decoder;
//! use faw::process::wrap::{Encoder, Packing};
//! use faw::structs::wav::WavHeader;
//!
//! let header = WavHeader::new(48000, 2, 16);
//!
//! // A single silent stereo frame
//! let es = [
//!     0xFF, 0xF9, 0x4C, 0x80, 0x02, 0x1F, 0xFC, 0x21,
//!     0x00, 0x49, 0x90, 0x02, 0x19, 0x00, 0x23, 0x80,
//! ];
//!
//! let mut encoder = Encoder::new(header, Packing::Full, 0)?;
//! let mut samples = encoder.encode(&es);
//! samples.extend(encoder.finish());
//!
//! let mut decoder = Decoder::with_header(header)?;
//! let [mut track, _] = decoder.decode(&samples)?;
//! track.extend(decoder.finish()?[0].iter());
//!
//! assert_eq!(track, es);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

/// Little-endian/big-endian byte serialization used by fixed-layout headers.
pub mod byteorder;

/// Processing stages.
///
/// 1. **Detection** ([`process::detect`]): Picks the packing variant.
///
/// 2. **Extraction** ([`process::extract`]): Validates and unwraps frames.
///
/// 3. **Decoding** ([`process::decode`]): Drives detection and extraction.
///
/// 4. **Wrapping** ([`process::wrap`]) and **Mixing** ([`process::mix`]): The
///    encode direction.
pub mod process;

/// Data structures representing FAW format components.
///
/// - **ADTS Headers** ([`structs::adts`])
/// - **Markers** ([`structs::markers`])
/// - **Silence** ([`structs::silence`])
/// - **Container Header** ([`structs::wav`])
pub mod structs;

/// Utility functions and supporting infrastructure.
///
/// - **Bitstream Buffer** ([`utils::bitstream`]): Sliding window with sample accounting
/// - **Checksum** ([`utils::checksum`]): Frame validation
/// - **Search** ([`utils::search`]): Marker search
/// - **Error Handling** ([`utils::errors`]): Error types
pub mod utils;
