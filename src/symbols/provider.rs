//! Symbol writer factory
//!
//! A [`SymbolWriterProvider`] is what an assembly writer holds on to: it is asked for one
//! [`SymbolWriter`] per module being written. [`MdbWriterProvider`] hands out [`MdbWriter`]s
//! writing to a file next to the image. Symbol output to an arbitrary byte sink is not
//! supported and fails at construction time.

use std::{io::Write, path::Path};

use crate::{
    config::WriterConfig,
    mdb::MonoSymbolWriter,
    symbols::writer::{MdbWriter, SymbolWriter},
    Error, Result,
};

/// Identity of the module symbols are written for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    /// Module name, e.g. `Program.exe`
    pub name: String,
    /// Module version id
    pub mvid: uguid::Guid,
}

impl ModuleInfo {
    /// Creates a module identity
    pub fn new(name: impl Into<String>, mvid: uguid::Guid) -> Self {
        ModuleInfo {
            name: name.into(),
            mvid,
        }
    }
}

/// Factory of symbol writers.
pub trait SymbolWriterProvider {
    /// The writer type handed out
    type Writer: SymbolWriter;

    /// Creates a writer for `module` that emits to the file at `path`.
    ///
    /// # Errors
    /// Returns an error if no writer can be created for the target.
    fn symbol_writer(&self, module: &ModuleInfo, path: &Path) -> Result<Self::Writer>;

    /// Creates a writer for `module` that emits to `stream`.
    ///
    /// # Errors
    /// Returns an error if no writer can be created for the target.
    fn symbol_writer_for_stream(
        &self,
        module: &ModuleInfo,
        stream: &mut dyn Write,
    ) -> Result<Self::Writer>;
}

/// Provider of [`MdbWriter`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct MdbWriterProvider {
    config: WriterConfig,
}

impl MdbWriterProvider {
    /// Creates a provider with the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a provider handing out writers with `config`
    #[must_use]
    pub fn with_config(config: WriterConfig) -> Self {
        MdbWriterProvider { config }
    }

    /// The configuration handed to new writers
    #[must_use]
    pub fn config(&self) -> &WriterConfig {
        &self.config
    }
}

impl SymbolWriterProvider for MdbWriterProvider {
    type Writer = MdbWriter<MonoSymbolWriter>;

    fn symbol_writer(&self, module: &ModuleInfo, path: &Path) -> Result<Self::Writer> {
        log::debug!(
            "Creating MDB writer for '{}' ({}) at '{}'",
            module.name,
            module.mvid,
            path.display()
        );
        Ok(MdbWriter::create_with_config(
            module.mvid,
            path,
            self.config,
        ))
    }

    fn symbol_writer_for_stream(
        &self,
        _module: &ModuleInfo,
        _stream: &mut dyn Write,
    ) -> Result<Self::Writer> {
        Err(Error::UnsupportedTarget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DocumentPolicy;

    fn module() -> ModuleInfo {
        ModuleInfo::new(
            "Program.exe",
            uguid::guid!("01234567-89ab-cdef-0123-456789abcdef"),
        )
    }

    #[test]
    fn path_target_creates_writer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Program.exe.mdb");
        let provider = MdbWriterProvider::with_config(WriterConfig::strict());

        let writer = provider.symbol_writer(&module(), &path).unwrap();
        assert_eq!(writer.mvid(), &module().mvid);
        assert_eq!(writer.config().document_policy, DocumentPolicy::Reject);
        assert_eq!(writer.encoder().target_path(), path.as_path());
        assert!(!path.exists());

        writer.finalize().unwrap();
        assert!(path.exists());
    }

    #[test]
    fn stream_target_is_unsupported() {
        let mut sink: Vec<u8> = Vec::new();
        let result = MdbWriterProvider::new().symbol_writer_for_stream(&module(), &mut sink);
        assert!(matches!(result, Err(Error::UnsupportedTarget)));
        assert!(sink.is_empty());
    }
}
