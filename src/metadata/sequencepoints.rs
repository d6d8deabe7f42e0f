//!
//! Sequence points supplied by the compiler for one method.
//!
//! A sequence point maps an IL offset inside a method body to a range in a source document.
//! The symbol writer receives them already ordered by IL offset and writes them in exactly that
//! order; nothing in this crate sorts or deduplicates them.
//!
//! # Key Components
//!
//! - [`crate::metadata::sequencepoints::SequencePoint`] - A single IL offset to source range mapping.
//! - [`crate::metadata::sequencepoints::SequencePoints`] - The ordered sequence points of one method.
//!
//! # Usage Examples
//!
//! ```rust
//! use dotsym::metadata::document::Document;
//! use dotsym::metadata::sequencepoints::{SequencePoint, SequencePoints};
//!
//! let doc = Document::new_rc("Program.cs");
//! let points: SequencePoints = vec![
//!     SequencePoint::new(0, 10, 5, 10, 20, doc.clone()),
//!     SequencePoint::new(6, 11, 5, 11, 18, doc),
//! ]
//! .into_iter()
//! .collect();
//!
//! assert_eq!(points.len(), 2);
//! assert_eq!(points.find_by_il_offset(6).map(|sp| sp.start_line), Some(11));
//! ```
//!
//! ## Hidden Sequence Points
//!
//! A sequence point is considered hidden if its start line is 0xFEEFEE. Compilers use this to
//! mark code that has no sensible source location. Hidden points are written like any other.

use crate::metadata::document::DocumentRc;

/// Start line value that marks a hidden sequence point.
pub const HIDDEN_LINE: u32 = 0x00FE_EFEE;

/// Represents a single sequence point mapping IL offset to source code location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencePoint {
    /// Offset in the method's IL stream.
    pub il_offset: u32,
    /// Starting line in the source file.
    pub start_line: u32,
    /// Starting column in the source file.
    pub start_col: u16,
    /// Ending line in the source file.
    pub end_line: u32,
    /// Ending column in the source file.
    pub end_col: u16,
    /// The document this sequence point refers to.
    pub document: DocumentRc,
}

impl SequencePoint {
    /// Creates a new sequence point.
    #[must_use]
    pub fn new(
        il_offset: u32,
        start_line: u32,
        start_col: u16,
        end_line: u32,
        end_col: u16,
        document: DocumentRc,
    ) -> Self {
        SequencePoint {
            il_offset,
            start_line,
            start_col,
            end_line,
            end_col,
            document,
        }
    }

    /// True if this is a hidden sequence point (start_line == 0xFEEFEE).
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.start_line == HIDDEN_LINE
    }
}

/// Collection of sequence points for a method, in emission order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SequencePoints(pub Vec<SequencePoint>);

impl SequencePoints {
    /// Returns the sequence point for a given IL offset, if any.
    pub fn find_by_il_offset(&self, il_offset: u32) -> Option<&SequencePoint> {
        self.0.iter().find(|sp| sp.il_offset == il_offset)
    }

    /// Number of sequence points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the method has no sequence points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the sequence points in order.
    pub fn iter(&self) -> std::slice::Iter<'_, SequencePoint> {
        self.0.iter()
    }

    /// Appends a sequence point.
    pub fn push(&mut self, point: SequencePoint) {
        self.0.push(point);
    }
}

impl FromIterator<SequencePoint> for SequencePoints {
    fn from_iter<I: IntoIterator<Item = SequencePoint>>(iter: I) -> Self {
        SequencePoints(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a SequencePoints {
    type Item = &'a SequencePoint;
    type IntoIter = std::slice::Iter<'a, SequencePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
