//! Source documents referenced by sequence points.
//!
//! A [`Document`] identifies one source file by its URL or path. Documents are shared between
//! all sequence points that refer to the same file, so they are handed around as
//! [`DocumentRc`]. The symbol writer keys its compilation units on [`Document::url`]: two
//! distinct `Document` instances with the same URL describe the same source file.

use std::fmt;
use std::sync::Arc;

/// A reference-counted pointer to a [`Document`]
pub type DocumentRc = Arc<Document>;

/// A source document, identified by its URL or file path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Document {
    /// URL or path of the source file, used verbatim as the document identity
    pub url: String,
}

impl Document {
    /// Creates a new document for `url`
    pub fn new(url: impl Into<String>) -> Self {
        Document { url: url.into() }
    }

    /// Creates a new shared document for `url`
    pub fn new_rc(url: impl Into<String>) -> DocumentRc {
        Arc::new(Document::new(url))
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}
