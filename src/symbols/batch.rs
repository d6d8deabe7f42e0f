//! Sequence point batching
//!
//! Turns the sequence points of one method into parallel offset/line/column arrays and resolves
//! the source file the method record is bound to. The input order is kept exactly: IL offsets
//! are trusted to increase, as the symbol format expects, and are neither sorted nor
//! deduplicated here.
//!
//! # Document Resolution
//!
//! A method record belongs to one compilation unit. The file is resolved from the document of
//! the *first* sequence point. What happens with sequence points referencing other documents is
//! governed by [`crate::DocumentPolicy`]:
//!
//! - [`crate::DocumentPolicy::FirstWins`] never looks at the later documents,
//! - [`crate::DocumentPolicy::Reject`] fails with [`crate::Error::MixedDocuments`].

use crate::{
    config::DocumentPolicy,
    metadata::{debuginfo::MethodDef, sequencepoints::SequencePoints},
    symbols::{
        encoder::SymbolEncoder,
        registry::{SourceFileRc, SourceFileRegistry},
    },
    Error, Result,
};

/// The sequence points of one method, split into parallel arrays.
///
/// All arrays have the same length and index `i` of each refers to the `i`-th input point.
#[derive(Debug)]
pub struct SequencePointBatch {
    /// IL offsets
    pub offsets: Vec<u32>,
    /// Start lines
    pub start_rows: Vec<u32>,
    /// End lines
    pub end_rows: Vec<u32>,
    /// Start columns
    pub start_cols: Vec<u16>,
    /// End columns
    pub end_cols: Vec<u16>,
    /// The source file the points are recorded against
    pub file: SourceFileRc,
}

impl SequencePointBatch {
    /// Batches `points` of `method`, resolving the source file through `registry`.
    ///
    /// Returns `Ok(None)` for an empty list: such a method gets no record at all.
    ///
    /// # Errors
    /// Returns [`crate::Error::MixedDocuments`] under [`DocumentPolicy::Reject`] and propagates
    /// encoder errors raised while resolving the source file.
    pub fn populate<E: SymbolEncoder + ?Sized>(
        method: &MethodDef,
        points: &SequencePoints,
        registry: &mut SourceFileRegistry,
        encoder: &mut E,
        policy: DocumentPolicy,
    ) -> Result<Option<Self>> {
        let Some(first) = points.iter().next() else {
            return Ok(None);
        };

        if policy == DocumentPolicy::Reject {
            if let Some(other) = points
                .iter()
                .find(|sp| sp.document.url != first.document.url)
            {
                return Err(Error::MixedDocuments {
                    method: method.name.clone(),
                    expected: first.document.url.clone(),
                    found: other.document.url.clone(),
                });
            }
        }

        let count = points.len();
        let mut offsets = Vec::with_capacity(count);
        let mut start_rows = Vec::with_capacity(count);
        let mut end_rows = Vec::with_capacity(count);
        let mut start_cols = Vec::with_capacity(count);
        let mut end_cols = Vec::with_capacity(count);
        let mut file = None;

        for point in points {
            offsets.push(point.il_offset);

            if file.is_none() {
                file = Some(registry.resolve(encoder, &point.document)?);
            }

            start_rows.push(point.start_line);
            end_rows.push(point.end_line);
            start_cols.push(point.start_col);
            end_cols.push(point.end_col);
        }

        let Some(file) = file else {
            return Ok(None);
        };

        Ok(Some(SequencePointBatch {
            offsets,
            start_rows,
            end_rows,
            start_cols,
            end_cols,
            file,
        }))
    }

    /// Number of batched sequence points
    #[must_use]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// True if the batch holds no sequence points
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::document::Document,
        test::{method_def, point, RecordingEncoder},
    };
    use std::sync::Arc;

    #[test]
    fn empty_input_yields_none() {
        let mut encoder = RecordingEncoder::new();
        let mut registry = SourceFileRegistry::new();

        let batch = SequencePointBatch::populate(
            &method_def("Empty"),
            &SequencePoints::default(),
            &mut registry,
            &mut encoder,
            DocumentPolicy::FirstWins,
        )
        .unwrap();

        assert!(batch.is_none());
        assert!(encoder.events.is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn builds_parallel_arrays_in_input_order() {
        let doc = Document::new_rc("a.src");
        let points: SequencePoints = vec![
            point(0, 1, 2, 1, 9, &doc),
            point(8, 3, 4, 5, 6, &doc),
            point(4, 7, 8, 7, 12, &doc),
        ]
        .into_iter()
        .collect();
        let mut encoder = RecordingEncoder::new();
        let mut registry = SourceFileRegistry::new();

        let batch = SequencePointBatch::populate(
            &method_def("M"),
            &points,
            &mut registry,
            &mut encoder,
            DocumentPolicy::FirstWins,
        )
        .unwrap()
        .unwrap();

        assert_eq!(batch.len(), 3);
        assert_eq!(batch.offsets, [0, 8, 4]);
        assert_eq!(batch.start_rows, [1, 3, 7]);
        assert_eq!(batch.end_rows, [1, 5, 7]);
        assert_eq!(batch.start_cols, [2, 4, 8]);
        assert_eq!(batch.end_cols, [9, 6, 12]);
        assert!(Arc::ptr_eq(&batch.file, registry.get("a.src").unwrap()));
    }

    #[test]
    fn duplicate_offsets_are_kept() {
        let doc = Document::new_rc("a.src");
        let points: SequencePoints = vec![point(2, 1, 1, 1, 2, &doc), point(2, 2, 1, 2, 2, &doc)]
            .into_iter()
            .collect();
        let mut encoder = RecordingEncoder::new();
        let mut registry = SourceFileRegistry::new();

        let batch = SequencePointBatch::populate(
            &method_def("M"),
            &points,
            &mut registry,
            &mut encoder,
            DocumentPolicy::FirstWins,
        )
        .unwrap()
        .unwrap();

        assert_eq!(batch.offsets, [2, 2]);
    }

    #[test]
    fn first_document_wins() {
        let a = Document::new_rc("a.src");
        let b = Document::new_rc("b.src");
        let points: SequencePoints = vec![point(0, 1, 1, 1, 2, &a), point(4, 2, 1, 2, 2, &b)]
            .into_iter()
            .collect();
        let mut encoder = RecordingEncoder::new();
        let mut registry = SourceFileRegistry::new();

        let batch = SequencePointBatch::populate(
            &method_def("M"),
            &points,
            &mut registry,
            &mut encoder,
            DocumentPolicy::FirstWins,
        )
        .unwrap()
        .unwrap();

        assert!(Arc::ptr_eq(&batch.file, registry.get("a.src").unwrap()));
        assert!(registry.get("b.src").is_none());
        assert_eq!(encoder.document_definitions("b.src"), 0);
    }

    #[test]
    fn reject_policy_reports_mixed_documents() {
        let a = Document::new_rc("a.src");
        let b = Document::new_rc("b.src");
        let points: SequencePoints = vec![
            point(0, 1, 1, 1, 2, &a),
            point(2, 2, 1, 2, 2, &a),
            point(4, 3, 1, 3, 2, &b),
        ]
        .into_iter()
        .collect();
        let mut encoder = RecordingEncoder::new();
        let mut registry = SourceFileRegistry::new();

        let result = SequencePointBatch::populate(
            &method_def("Mixed"),
            &points,
            &mut registry,
            &mut encoder,
            DocumentPolicy::Reject,
        );

        match result {
            Err(Error::MixedDocuments {
                method,
                expected,
                found,
            }) => {
                assert_eq!(method, "Mixed");
                assert_eq!(expected, "a.src");
                assert_eq!(found, "b.src");
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(registry.is_empty());
        assert!(encoder.events.is_empty());
    }

    #[test]
    fn reject_policy_accepts_same_url_from_distinct_documents() {
        let a1 = Document::new_rc("a.src");
        let a2 = Document::new_rc("a.src");
        let points: SequencePoints = vec![point(0, 1, 1, 1, 2, &a1), point(4, 2, 1, 2, 2, &a2)]
            .into_iter()
            .collect();
        let mut encoder = RecordingEncoder::new();
        let mut registry = SourceFileRegistry::new();

        let batch = SequencePointBatch::populate(
            &method_def("M"),
            &points,
            &mut registry,
            &mut encoder,
            DocumentPolicy::Reject,
        )
        .unwrap();

        assert_eq!(batch.map(|b| b.len()), Some(2));
    }
}
