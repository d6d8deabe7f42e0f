// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(clippy::too_many_arguments)]
//#![deny(unsafe_code)]
// - 'file/output.rs' uses mmap to map the output file into memory

//! # dotsym
//!
//! Debug symbol emission for .NET modules in the Mono `.mdb` format, in pure Rust.
//!
//! A compiler or assembly rewriter hands `dotsym` the debug information of every method it
//! emits: sequence points tying IL offsets to source ranges, and lexical scopes with their
//! local variable names. `dotsym` aggregates them per source document and writes one symbol
//! file per module, keyed by the module version id (MVID).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dotsym::prelude::*;
//!
//! let mvid = uguid::guid!("01234567-89ab-cdef-0123-456789abcdef");
//! let mut writer = MdbWriter::create(mvid, "Program.exe.mdb");
//!
//! let doc = Document::new_rc("Program.cs");
//! let mut main = MethodDebugInformation::new(MethodDef::new("Main", Token::method_def(1)));
//! main.sequence_points.push(SequencePoint::new(0, 5, 9, 5, 30, doc.clone()));
//! main.sequence_points.push(SequencePoint::new(6, 6, 9, 6, 22, doc));
//! main.scope = Some(
//!     ScopeDebugInformation::new(0, 12).with_variable(VariableDebugInformation::new(0, "args")),
//! );
//!
//! writer.write(&main)?;
//! writer.finalize()?;
//! # Ok::<(), dotsym::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`metadata`] - the input model: documents, sequence points, scopes, method identities
//! - [`symbols`] - the emission pipeline and the [`MdbWriter`] driving it
//! - [`mdb`] - the `.mdb` encoder the pipeline feeds
//! - [`config`] - policies for ambiguous input
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result`]. Any error raised while an artifact is assembled
//! makes that artifact unusable: the writer is poisoned, and nothing is written on finalize.
//!
//! ## Logging
//!
//! `dotsym` logs through the [`log`] facade and never installs a logger itself.

#[macro_use]
pub(crate) mod error;
pub(crate) mod file;

/// Shared functionality which is used in unit- and integration-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust,no_run
/// use dotsym::prelude::*;
///
/// let writer = MdbWriter::create(uguid::Guid::ZERO, "Program.exe.mdb");
/// writer.finalize()?;
/// # Ok::<(), dotsym::Error>(())
/// ```
pub mod prelude;

/// Writer configuration
pub mod config;

/// The Mono `.mdb` symbol file encoder
pub mod mdb;

/// Debug information of compiled methods, as handed to the symbol writer
pub mod metadata;

/// The symbol emission pipeline
pub mod symbols;

/// `dotsym` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `dotsym` Error type
///
/// # Examples
///
/// ```rust,no_run
/// use dotsym::{Error, MdbWriterProvider, ModuleInfo, SymbolWriterProvider};
///
/// let module = ModuleInfo::new("Program.exe", uguid::Guid::ZERO);
/// let mut sink: Vec<u8> = Vec::new();
/// match MdbWriterProvider::new().symbol_writer_for_stream(&module, &mut sink) {
///     Ok(_) => println!("Writer created"),
///     Err(Error::UnsupportedTarget) => println!("Only file targets are supported"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
pub use error::Error;

pub use config::{DocumentPolicy, WriterConfig};
pub use mdb::MonoSymbolWriter;
pub use symbols::{
    debugdir::DebugHeader,
    provider::{MdbWriterProvider, ModuleInfo, SymbolWriterProvider},
    writer::{MdbWriter, SymbolWriter},
};
