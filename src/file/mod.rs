//! Byte-level output support for symbol file generation.
//!
//! - [`crate::file::io`] - Little-endian and variable-length integer encoding into byte buffers
//! - [`crate::file::output`] - Memory-mapped output file with drop-time cleanup
//!
//! Everything the encoder produces is accumulated in memory and only handed to
//! [`crate::file::output::Output`] once, when the artifact is finalized.

pub mod io;
pub mod output;
