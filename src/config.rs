//! Symbol writer configuration
//!
//! This module provides the options that control how strictly the writer treats its input.
//! The defaults reproduce the behavior symbol consumers expect from MDB files produced by the
//! Mono toolchain; the stricter presets reject input that would otherwise be accepted silently.

/// How a method whose sequence points reference more than one document is handled.
///
/// Each method record is bound to a single compilation unit. When the sequence points of one
/// method reference several documents only one of them can be recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display)]
pub enum DocumentPolicy {
    /// Bind the method to the document of its first sequence point and ignore the documents of
    /// all later points. Later documents are not looked at and never become compilation units.
    #[default]
    #[strum(serialize = "first-wins")]
    FirstWins,
    /// Fail with [`crate::Error::MixedDocuments`] if any sequence point of a method references
    /// a document URL different from the first one.
    #[strum(serialize = "reject")]
    Reject,
}

/// Configuration of an [`crate::MdbWriter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriterConfig {
    /// Handling of methods whose sequence points span multiple documents
    pub document_policy: DocumentPolicy,

    /// Optional limit on the nesting depth of scope trees (default: none)
    /// Deeper trees fail with [`crate::Error::RecursionLimit`]
    pub max_scope_depth: Option<usize>,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            document_policy: DocumentPolicy::FirstWins,
            max_scope_depth: None,
        }
    }
}

impl WriterConfig {
    /// Creates a configuration that rejects methods spanning multiple documents and scope
    /// trees nested deeper than 256 levels
    #[must_use]
    pub fn strict() -> Self {
        Self {
            document_policy: DocumentPolicy::Reject,
            max_scope_depth: Some(256),
        }
    }

    /// Creates a configuration that accepts any input the default does, without limits
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            document_policy: DocumentPolicy::FirstWins,
            max_scope_depth: None,
        }
    }

    /// Replaces the document policy
    #[must_use]
    pub fn with_document_policy(mut self, policy: DocumentPolicy) -> Self {
        self.document_policy = policy;
        self
    }

    /// Limits the scope nesting depth to `depth`
    #[must_use]
    pub fn with_max_scope_depth(mut self, depth: usize) -> Self {
        self.max_scope_depth = Some(depth);
        self
    }

    /// Removes the scope nesting depth limit
    #[must_use]
    pub fn without_max_scope_depth(mut self) -> Self {
        self.max_scope_depth = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_config_presets() {
        let default = WriterConfig::default();
        assert_eq!(default.document_policy, DocumentPolicy::FirstWins);
        assert_eq!(default.max_scope_depth, None);

        let strict = WriterConfig::strict();
        assert_eq!(strict.document_policy, DocumentPolicy::Reject);
        assert_eq!(strict.max_scope_depth, Some(256));

        let lenient = WriterConfig::lenient();
        assert_eq!(lenient.document_policy, DocumentPolicy::FirstWins);
        assert_eq!(lenient.max_scope_depth, None);
    }

    #[test]
    fn test_writer_config_overrides() {
        let config = WriterConfig::default()
            .with_document_policy(DocumentPolicy::Reject)
            .with_max_scope_depth(8);
        assert_eq!(config.document_policy, DocumentPolicy::Reject);
        assert_eq!(config.max_scope_depth, Some(8));

        let config = WriterConfig::strict().without_max_scope_depth();
        assert_eq!(config.document_policy, DocumentPolicy::Reject);
        assert_eq!(config.max_scope_depth, None);
    }

    #[test]
    fn test_document_policy_display() {
        assert_eq!(DocumentPolicy::FirstWins.to_string(), "first-wins");
        assert_eq!(DocumentPolicy::Reject.to_string(), "reject");
    }
}
