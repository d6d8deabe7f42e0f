//! Source file registry
//!
//! Maps document URLs to the compilation units created for them. Every distinct URL is turned
//! into exactly one source file entry and one compilation unit over the whole lifetime of an
//! artifact; later lookups return the cached [`SourceFile`] instance itself.

use std::collections::{hash_map::Entry, HashMap};
use std::sync::Arc;

use crate::{
    metadata::document::Document,
    symbols::encoder::{CompileUnitEntry, SourceFileEntry, SymbolEncoder},
    Result,
};

/// A reference-counted pointer to a [`SourceFile`]
pub type SourceFileRc = Arc<SourceFile>;

/// The encoder handles created for one source document.
#[derive(Debug, PartialEq, Eq)]
pub struct SourceFile {
    compilation_unit: CompileUnitEntry,
    entry: SourceFileEntry,
}

impl SourceFile {
    /// The compilation unit method records of this document are opened in
    #[must_use]
    pub fn compilation_unit(&self) -> CompileUnitEntry {
        self.compilation_unit
    }

    /// The source file entry sequence points refer to
    #[must_use]
    pub fn entry(&self) -> SourceFileEntry {
        self.entry
    }
}

/// Registry of all source files of an artifact, keyed by document URL.
///
/// Entries are created lazily on first reference and never evicted or updated.
#[derive(Debug, Default)]
pub struct SourceFileRegistry {
    source_files: HashMap<String, SourceFileRc>,
}

impl SourceFileRegistry {
    /// Creates an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the source file for `document`, defining it through `encoder` on first use.
    ///
    /// On a miss the encoder is asked for a new document entry and a compilation unit bound to
    /// it; both are cached under the document URL.
    ///
    /// # Errors
    /// Propagates any error of the encoder unchanged; nothing is cached in that case.
    pub fn resolve<E: SymbolEncoder + ?Sized>(
        &mut self,
        encoder: &mut E,
        document: &Document,
    ) -> Result<SourceFileRc> {
        match self.source_files.entry(document.url.clone()) {
            Entry::Occupied(cached) => Ok(Arc::clone(cached.get())),
            Entry::Vacant(slot) => {
                let entry = encoder.define_document(&document.url)?;
                let compilation_unit = encoder.define_compilation_unit(entry)?;
                log::debug!(
                    "Defined {} / {} for document '{}'",
                    entry,
                    compilation_unit,
                    document.url
                );

                let source_file = Arc::new(SourceFile {
                    compilation_unit,
                    entry,
                });
                Ok(Arc::clone(slot.insert(source_file)))
            }
        }
    }

    /// Returns the cached source file for `url`, if it was resolved before
    #[must_use]
    pub fn get(&self, url: &str) -> Option<&SourceFileRc> {
        self.source_files.get(url)
    }

    /// Number of distinct documents resolved so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.source_files.len()
    }

    /// True if no document was resolved yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.source_files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{EncoderEvent, RecordingEncoder};

    #[test]
    fn caches_by_url() {
        let mut encoder = RecordingEncoder::new();
        let mut registry = SourceFileRegistry::new();

        let first = registry
            .resolve(&mut encoder, &Document::new("a.src"))
            .unwrap();
        let second = registry
            .resolve(&mut encoder, &Document::new("a.src"))
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(encoder.document_definitions("a.src"), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn defines_document_then_unit() {
        let mut encoder = RecordingEncoder::new();
        let mut registry = SourceFileRegistry::new();

        let file = registry
            .resolve(&mut encoder, &Document::new("a.src"))
            .unwrap();

        assert_eq!(
            encoder.events,
            [
                EncoderEvent::DefineDocument("a.src".to_string()),
                EncoderEvent::DefineCompilationUnit(file.entry()),
            ]
        );
        assert_eq!(file.entry(), SourceFileEntry(1));
        assert_eq!(file.compilation_unit(), CompileUnitEntry(1));
    }

    #[test]
    fn distinct_urls_get_distinct_units() {
        let mut encoder = RecordingEncoder::new();
        let mut registry = SourceFileRegistry::new();

        let a = registry
            .resolve(&mut encoder, &Document::new("a.src"))
            .unwrap();
        let b = registry
            .resolve(&mut encoder, &Document::new("b.src"))
            .unwrap();

        assert_ne!(a.compilation_unit(), b.compilation_unit());
        assert_ne!(a.entry(), b.entry());
        assert_eq!(registry.len(), 2);
        assert!(registry.get("b.src").is_some());
        assert!(registry.get("c.src").is_none());
    }

    #[test]
    fn failure_is_not_cached() {
        let mut encoder = RecordingEncoder::new();
        encoder.fail_define_document = true;
        let mut registry = SourceFileRegistry::new();

        assert!(registry
            .resolve(&mut encoder, &Document::new("a.src"))
            .is_err());
        assert!(registry.is_empty());
    }
}
