/// Packing variant detection.
///
/// Provides [`FawMode`](detect::FawMode) and the one-way transition from
/// buffered raw samples into per-mode working [`Tracks`](detect::Tracks).
pub mod detect;

/// Frame extraction with drift correction.
///
/// Provides the [`Extractor`](extract::Extractor) that validates wrapped frames
/// and keeps the emitted duration aligned with the input by inserting silence.
pub mod extract;

/// Decoding of FAW-carrying PCM streams.
///
/// Provides the [`Decoder`](decode::Decoder) combining detection and
/// extraction for one or two tracks.
pub mod decode;

/// Frame wrapping into PCM sample data.
///
/// Provides the [`Encoder`](wrap::Encoder) for Full and Half packing.
pub mod wrap;

/// Two-track interleaving.
///
/// Provides the [`MixEncoder`](mix::MixEncoder) built on two Half-packing
/// encoders and the [`DualTrackMixer`](mix::DualTrackMixer).
pub mod mix;
