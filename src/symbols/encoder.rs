//! The encoder interface the symbol writer drives.
//!
//! [`SymbolEncoder`] is the seam between the aggregation pipeline in [`crate::symbols`] and the
//! code that lays out the actual symbol file. The pipeline decides *what* is recorded and in
//! which order; an encoder decides *how* it is stored. [`crate::mdb::MonoSymbolWriter`] is the
//! encoder producing MDB files.
//!
//! # Call Protocol
//!
//! ```text
//! define_document ─► define_compilation_unit          (once per distinct source file)
//!
//! open_method
//!   mark_sequence_point*
//!   ( open_scope  define_local_variable*  ...nested...  close_scope )*
//! close_method                                         (once per method with sequence points)
//!
//! write_symbol_file                                    (exactly once, at the end)
//! ```
//!
//! Encoders are expected to reject calls that break this protocol with
//! [`crate::Error::InconsistentState`].

use std::fmt;

use crate::{metadata::debuginfo::MethodDef, Result};

/// Handle of a source file entry defined by an encoder.
///
/// Handles are 1-based and only meaningful for the encoder that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceFileEntry(pub u32);

impl SourceFileEntry {
    /// Returns the 1-based index of the entry
    #[must_use]
    pub fn index(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for SourceFileEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "source#{}", self.0)
    }
}

/// Handle of a compilation unit defined by an encoder.
///
/// Handles are 1-based and only meaningful for the encoder that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CompileUnitEntry(pub u32);

impl CompileUnitEntry {
    /// Returns the 1-based index of the entry
    #[must_use]
    pub fn index(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for CompileUnitEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit#{}", self.0)
    }
}

/// A symbol file encoder.
///
/// All methods take `&mut self`: an encoder is driven by exactly one writer and performs no
/// internal synchronization.
pub trait SymbolEncoder {
    /// Defines a new source file entry for `url`.
    ///
    /// Every call defines a new entry; deduplication is the caller's job.
    ///
    /// # Errors
    /// Returns an error if the encoder can no longer accept entries.
    fn define_document(&mut self, url: &str) -> Result<SourceFileEntry>;

    /// Defines a new compilation unit bound to `source`.
    ///
    /// # Errors
    /// Returns [`crate::Error::InconsistentState`] if `source` was not issued by this encoder.
    fn define_compilation_unit(&mut self, source: SourceFileEntry) -> Result<CompileUnitEntry>;

    /// Opens a method record in `unit`.
    ///
    /// # Errors
    /// Returns [`crate::Error::InconsistentState`] if another method is still open.
    fn open_method(
        &mut self,
        unit: CompileUnitEntry,
        namespace_id: u32,
        method: &MethodDef,
    ) -> Result<()>;

    /// Records a sequence point in the open method.
    ///
    /// # Errors
    /// Returns [`crate::Error::InconsistentState`] if no method is open.
    fn mark_sequence_point(
        &mut self,
        offset: u32,
        file: SourceFileEntry,
        start_line: u32,
        start_col: u16,
        end_line: u32,
        end_col: u16,
        is_statement: bool,
    ) -> Result<()>;

    /// Opens a lexical scope starting at `start_offset`, nested in the innermost open scope.
    ///
    /// # Errors
    /// Returns [`crate::Error::InconsistentState`] if no method is open.
    fn open_scope(&mut self, start_offset: u32) -> Result<()>;

    /// Declares a local variable in the innermost open scope.
    ///
    /// # Errors
    /// Returns [`crate::Error::InconsistentState`] if no method is open.
    fn define_local_variable(&mut self, index: u16, name: &str) -> Result<()>;

    /// Closes the innermost open scope at `end_offset`.
    ///
    /// # Errors
    /// Returns [`crate::Error::InconsistentState`] if no scope is open.
    fn close_scope(&mut self, end_offset: u32) -> Result<()>;

    /// Closes the open method record.
    ///
    /// # Errors
    /// Returns [`crate::Error::InconsistentState`] if no method is open or scopes are left open.
    fn close_method(&mut self) -> Result<()>;

    /// Writes the accumulated symbol file, keyed by the module version id.
    ///
    /// # Errors
    /// Returns [`crate::Error::InconsistentState`] if a method is still open or the file was
    /// already written, and I/O errors from the output.
    fn write_symbol_file(&mut self, mvid: &uguid::Guid) -> Result<()>;
}
