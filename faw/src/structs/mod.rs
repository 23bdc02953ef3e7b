//! Data structures for the FAW container.
//!
//! This module contains the fixed-layout pieces the processing stages work
//! with: ADTS frame headers, frame markers, silence templates and the PCM
//! container header.

pub mod adts;
pub mod markers;
pub mod silence;
pub mod wav;
