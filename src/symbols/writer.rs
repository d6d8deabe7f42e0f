//! The MDB symbol writer
//!
//! [`MdbWriter`] is the per-artifact entry point: it receives the debug information of every
//! compiled method of one module and drives a [`SymbolEncoder`] with it. For each method with
//! sequence points it
//!
//! 1. batches the sequence points and resolves the method's source file,
//! 2. opens a method record in that file's compilation unit,
//! 3. marks every sequence point in input order,
//! 4. flattens the root scope, if there is one,
//! 5. closes the method record.
//!
//! [`MdbWriter::finalize`] writes the symbol file keyed by the module version id. It consumes
//! the writer, so an artifact is emitted at most once; a writer that is dropped instead writes
//! nothing.
//!
//! # Failures
//!
//! Any error leaves the artifact inconsistent. The writer remembers the failure and answers all
//! later [`MdbWriter::write`] and [`MdbWriter::finalize`] calls with [`Error::Poisoned`].

use std::path::Path;

use crate::{
    config::WriterConfig,
    mdb::MonoSymbolWriter,
    metadata::{debuginfo::MethodDebugInformation, scope::ScopeDebugInformation},
    symbols::{
        batch::SequencePointBatch, debugdir::DebugHeader, encoder::SymbolEncoder,
        registry::SourceFileRegistry, scope::ScopeWriter,
    },
    Error, Result,
};

/// Namespace id every method record is opened with
pub const GLOBAL_NAMESPACE: u32 = 0;

/// The common interface of symbol writers.
pub trait SymbolWriter {
    /// Records the debug information of one method.
    ///
    /// # Errors
    /// Returns an error if the method cannot be recorded; the artifact is unusable afterwards.
    fn write(&mut self, info: &MethodDebugInformation) -> Result<()>;

    /// Returns the debug directory entry the image should carry for this artifact.
    fn debug_header(&self) -> DebugHeader;

    /// Writes the artifact and releases the writer.
    ///
    /// # Errors
    /// Returns an error if the artifact cannot be written.
    fn finalize(self) -> Result<()>
    where
        Self: Sized;
}

/// Writes the debug information of one module into an MDB symbol file.
///
/// # Examples
///
/// ```rust,no_run
/// use dotsym::prelude::*;
///
/// let mvid = uguid::guid!("01234567-89ab-cdef-0123-456789abcdef");
/// let mut writer = MdbWriter::create(mvid, "Program.exe.mdb");
///
/// let doc = Document::new_rc("Program.cs");
/// let mut info = MethodDebugInformation::new(MethodDef::new("Main", Token::method_def(1)));
/// info.sequence_points.push(SequencePoint::new(0, 5, 9, 5, 30, doc));
///
/// writer.write(&info)?;
/// writer.finalize()?;
/// # Ok::<(), dotsym::Error>(())
/// ```
pub struct MdbWriter<E: SymbolEncoder = MonoSymbolWriter> {
    mvid: uguid::Guid,
    encoder: E,
    source_files: SourceFileRegistry,
    config: WriterConfig,
    methods_written: usize,
    poisoned: bool,
    finalized: bool,
}

impl MdbWriter<MonoSymbolWriter> {
    /// Creates a writer producing an MDB file at `path` with the default configuration.
    ///
    /// Nothing is written to `path` before [`MdbWriter::finalize`].
    pub fn create<P: AsRef<Path>>(mvid: uguid::Guid, path: P) -> Self {
        Self::create_with_config(mvid, path, WriterConfig::default())
    }

    /// Creates a writer producing an MDB file at `path`.
    pub fn create_with_config<P: AsRef<Path>>(
        mvid: uguid::Guid,
        path: P,
        config: WriterConfig,
    ) -> Self {
        Self::with_config(mvid, MonoSymbolWriter::new(path), config)
    }
}

impl<E: SymbolEncoder> MdbWriter<E> {
    /// Creates a writer driving `encoder` with the default configuration
    pub fn new(mvid: uguid::Guid, encoder: E) -> Self {
        Self::with_config(mvid, encoder, WriterConfig::default())
    }

    /// Creates a writer driving `encoder`
    pub fn with_config(mvid: uguid::Guid, encoder: E, config: WriterConfig) -> Self {
        MdbWriter {
            mvid,
            encoder,
            source_files: SourceFileRegistry::new(),
            config,
            methods_written: 0,
            poisoned: false,
            finalized: false,
        }
    }

    /// Records the debug information of one method.
    ///
    /// Methods without sequence points are skipped and leave no trace in the artifact.
    ///
    /// # Errors
    /// Returns [`Error::Poisoned`] if an earlier call failed, otherwise the first error raised
    /// while emitting the method. A method record that was opened is always closed again.
    pub fn write(&mut self, info: &MethodDebugInformation) -> Result<()> {
        if self.poisoned {
            return Err(Error::Poisoned);
        }

        let result = self.write_method(info);
        if let Err(error) = &result {
            log::warn!(
                "Writing symbols of '{}' failed, discarding artifact: {}",
                info.method.name,
                error
            );
            self.poisoned = true;
        }
        result
    }

    fn write_method(&mut self, info: &MethodDebugInformation) -> Result<()> {
        let Some(batch) = SequencePointBatch::populate(
            &info.method,
            &info.sequence_points,
            &mut self.source_files,
            &mut self.encoder,
            self.config.document_policy,
        )?
        else {
            log::trace!("Skipping '{}' without sequence points", info.method.name);
            return Ok(());
        };

        self.encoder.open_method(
            batch.file.compilation_unit(),
            GLOBAL_NAMESPACE,
            &info.method,
        )?;

        let body = self.write_method_body(&batch, info.scope.as_ref());
        let close = self.encoder.close_method();
        body.and(close)?;

        self.methods_written += 1;
        Ok(())
    }

    fn write_method_body(
        &mut self,
        batch: &SequencePointBatch,
        scope: Option<&ScopeDebugInformation>,
    ) -> Result<()> {
        let file = batch.file.entry();
        for i in 0..batch.len() {
            self.encoder.mark_sequence_point(
                batch.offsets[i],
                file,
                batch.start_rows[i],
                batch.start_cols[i],
                batch.end_rows[i],
                batch.end_cols[i],
                false,
            )?;
        }

        if let Some(scope) = scope {
            ScopeWriter::new(&mut self.encoder)
                .with_max_depth(self.config.max_scope_depth)
                .write_scope(scope)?;
        }

        Ok(())
    }

    /// Returns the debug directory entry for the image.
    ///
    /// MDB files are found next to the image by name, so this is always [`DebugHeader::none`].
    #[must_use]
    pub fn debug_header(&self) -> DebugHeader {
        DebugHeader::none()
    }

    /// Writes the symbol file and consumes the writer.
    ///
    /// # Errors
    /// Returns [`Error::Poisoned`] if an earlier [`MdbWriter::write`] failed, otherwise any
    /// error of the encoder.
    pub fn finalize(mut self) -> Result<()> {
        // Dropped right after this returns; a failed attempt must not warn again.
        self.finalized = true;

        if self.poisoned {
            return Err(Error::Poisoned);
        }

        log::info!(
            "Finalizing symbols of module {} ({} methods, {} source files)",
            self.mvid,
            self.methods_written,
            self.source_files.len()
        );
        self.encoder.write_symbol_file(&self.mvid)
    }

    /// The module version id the artifact is keyed by
    #[must_use]
    pub fn mvid(&self) -> &uguid::Guid {
        &self.mvid
    }

    /// The active configuration
    #[must_use]
    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// The encoder being driven
    #[must_use]
    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    /// The source files resolved so far
    #[must_use]
    pub fn source_files(&self) -> &SourceFileRegistry {
        &self.source_files
    }

    /// Number of method records written so far
    #[must_use]
    pub fn methods_written(&self) -> usize {
        self.methods_written
    }

    /// True if an earlier call failed
    #[must_use]
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }
}

impl<E: SymbolEncoder> SymbolWriter for MdbWriter<E> {
    fn write(&mut self, info: &MethodDebugInformation) -> Result<()> {
        MdbWriter::write(self, info)
    }

    fn debug_header(&self) -> DebugHeader {
        MdbWriter::debug_header(self)
    }

    fn finalize(self) -> Result<()> {
        MdbWriter::finalize(self)
    }
}

impl<E: SymbolEncoder> Drop for MdbWriter<E> {
    fn drop(&mut self) {
        if !self.finalized {
            log::warn!(
                "Symbol writer for module {} dropped without finalize, no symbol file written",
                self.mvid
            );
        }
    }
}
