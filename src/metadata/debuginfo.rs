//! Per-method debug information handed to the symbol writer.
//!
//! [`MethodDebugInformation`] bundles everything the writer needs for one compiled method: its
//! identity ([`MethodDef`]), the ordered sequence points and an optional root scope. It is
//! borrowed for a single [`crate::MdbWriter::write`] call and not retained.

use crate::metadata::{scope::ScopeDebugInformation, sequencepoints::SequencePoints, token::Token};

/// Identity of a compiled method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDef {
    /// Display name of the method
    pub name: String,
    /// Metadata token of the method
    pub token: Token,
}

impl MethodDef {
    /// Creates a new method identity
    pub fn new(name: impl Into<String>, token: Token) -> Self {
        MethodDef {
            name: name.into(),
            token,
        }
    }
}

/// Debug information of one compiled method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDebugInformation {
    /// The method these records belong to
    pub method: MethodDef,
    /// Sequence points in IL offset order; an empty list means no record is written
    pub sequence_points: SequencePoints,
    /// Root lexical scope, if the compiler produced one
    pub scope: Option<ScopeDebugInformation>,
}

impl MethodDebugInformation {
    /// Creates debug information without sequence points or scopes
    #[must_use]
    pub fn new(method: MethodDef) -> Self {
        MethodDebugInformation {
            method,
            sequence_points: SequencePoints::default(),
            scope: None,
        }
    }

    /// True if the method has sequence points
    #[must_use]
    pub fn has_sequence_points(&self) -> bool {
        !self.sequence_points.is_empty()
    }
}
