//! Utility functions and supporting infrastructure.
//!
//! Provides bit-level reading of packed fields and the error types used
//! when populating documents.

pub mod bitstream_io;
pub mod errors;
