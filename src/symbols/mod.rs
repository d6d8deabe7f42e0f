//! Symbol emission pipeline
//!
//! This module turns per-method debug information into calls on a [`encoder::SymbolEncoder`]:
//!
//! - [`registry`] - one source file and compilation unit per distinct document URL
//! - [`batch`] - sequence points split into parallel arrays, bound to one source file
//! - [`scope`] - scope trees flattened into bracketed open/close markers
//! - [`writer`] - the per-artifact [`writer::MdbWriter`] driving all of the above
//! - [`provider`] - the factory assembly writers obtain symbol writers from
//! - [`debugdir`] - the debug directory entry a writer reports for the image
//!
//! A writer serves exactly one artifact and is used from one thread; independent artifacts can
//! be written concurrently by independent writers.

pub mod batch;
pub mod debugdir;
pub mod encoder;
pub mod provider;
pub mod registry;
pub mod scope;
pub mod writer;
