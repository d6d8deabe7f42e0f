//! # dotsym Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the dotsym library. Import this module to get quick access to everything needed to
//! describe methods and write their symbols.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all dotsym operations
pub use crate::Error;

/// The result type used throughout dotsym
pub use crate::Result;

/// Writer configuration and its policies
pub use crate::{DocumentPolicy, WriterConfig};

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// The MDB symbol writer and the trait it implements
pub use crate::{MdbWriter, SymbolWriter};

/// Symbol writer factories
pub use crate::{MdbWriterProvider, ModuleInfo, SymbolWriterProvider};

/// Debug directory entry reported by symbol writers
pub use crate::DebugHeader;

// ================================================================================================
// Method Debug Information
// ================================================================================================

/// Metadata token type identifying methods
pub use crate::metadata::token::Token;

/// Source documents
pub use crate::metadata::document::{Document, DocumentRc};

/// Sequence points
pub use crate::metadata::sequencepoints::{SequencePoint, SequencePoints, HIDDEN_LINE};

/// Lexical scopes and their variables
pub use crate::metadata::scope::{ScopeDebugInformation, VariableDebugInformation};

/// Per-method debug information
pub use crate::metadata::debuginfo::{MethodDebugInformation, MethodDef};

// ================================================================================================
// Encoders
// ================================================================================================

/// The encoder interface and its handles
pub use crate::symbols::encoder::{CompileUnitEntry, SourceFileEntry, SymbolEncoder};

/// The MDB encoder
pub use crate::MonoSymbolWriter;
