//! Input model of the symbol writer.
//!
//! These types describe what the calling toolchain knows about each compiled method. They are
//! plain data: the writer borrows them for one emission call and keeps nothing but the
//! document URLs it has already turned into compilation units.
//!
//! # Key Components
//!
//! - [`token`] - Metadata tokens labelling method records
//! - [`document`] - Source documents referenced by sequence points
//! - [`sequencepoints`] - IL offset to source range mappings
//! - [`scope`] - Lexical scopes and local variables
//! - [`debuginfo`] - Method identity and the per-method bundle of the above
//!
//! # Examples
//!
//! ```rust
//! use dotsym::metadata::{
//!     debuginfo::{MethodDebugInformation, MethodDef},
//!     document::Document,
//!     scope::{ScopeDebugInformation, VariableDebugInformation},
//!     sequencepoints::SequencePoint,
//!     token::Token,
//! };
//!
//! let doc = Document::new_rc("Program.cs");
//! let mut info = MethodDebugInformation::new(MethodDef::new("Main", Token::method_def(1)));
//! info.sequence_points.push(SequencePoint::new(0, 3, 5, 3, 30, doc));
//! info.scope = Some(
//!     ScopeDebugInformation::new(0, 12).with_variable(VariableDebugInformation::new(0, "args")),
//! );
//! assert!(info.has_sequence_points());
//! ```

/// Method identity and per-method debug information
pub mod debuginfo;
/// Source documents
pub mod document;
/// Lexical scopes and local variables
pub mod scope;
/// Sequence points
pub mod sequencepoints;
/// Commonly used metadata token type
pub mod token;
