//! Utility functions and supporting infrastructure.
//!
//! Provides the sliding-window bitstream buffer, the FAW checksum, byte
//! pattern search and the error types shared by the processing stages.

pub mod bitstream;
pub mod checksum;
pub mod errors;
pub mod search;
