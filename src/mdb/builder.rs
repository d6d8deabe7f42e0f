//! In-memory MDB encoder
//!
//! [`MonoSymbolWriter`] collects documents, compilation units and method records as the
//! pipeline defines them, and checks the call protocol on the way: methods do not nest, scopes
//! only open inside a method and close in order, and nothing is accepted once the file is
//! written. The whole artifact is serialized by [`crate::mdb::format`] and written in one go.

use std::path::{Path, PathBuf};

use crate::{
    file::output::Output,
    mdb::{
        format,
        method::{LineNumberEntry, MethodEntry, SourceMethodBuilder},
    },
    metadata::debuginfo::MethodDef,
    symbols::encoder::{CompileUnitEntry, SourceFileEntry, SymbolEncoder},
    Result,
};

/// A source file entry of the symbol file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFileData {
    /// 1-based index
    pub index: u32,
    /// Document URL
    pub url: String,
}

/// A compilation unit of the symbol file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileUnitData {
    /// 1-based index
    pub index: u32,
    /// The source file the unit is bound to
    pub source: SourceFileEntry,
}

/// Encoder producing Mono `.mdb` symbol files.
///
/// All records are kept in memory until [`SymbolEncoder::write_symbol_file`] serializes them to
/// the target path in one go. The target is not touched before that.
#[derive(Debug)]
pub struct MonoSymbolWriter {
    target_path: PathBuf,
    sources: Vec<SourceFileData>,
    compile_units: Vec<CompileUnitData>,
    methods: Vec<MethodEntry>,
    current_method: Option<SourceMethodBuilder>,
    written: bool,
}

impl MonoSymbolWriter {
    /// Creates an encoder that will write its symbol file to `target_path`
    pub fn new<P: AsRef<Path>>(target_path: P) -> Self {
        MonoSymbolWriter {
            target_path: target_path.as_ref().to_path_buf(),
            sources: Vec::new(),
            compile_units: Vec::new(),
            methods: Vec::new(),
            current_method: None,
            written: false,
        }
    }

    /// The path the symbol file is written to
    #[must_use]
    pub fn target_path(&self) -> &Path {
        &self.target_path
    }

    /// Source file entries in definition order
    #[must_use]
    pub fn sources(&self) -> &[SourceFileData] {
        &self.sources
    }

    /// Compilation units in definition order
    #[must_use]
    pub fn compile_units(&self) -> &[CompileUnitData] {
        &self.compile_units
    }

    /// Closed method records in closing order
    #[must_use]
    pub fn methods(&self) -> &[MethodEntry] {
        &self.methods
    }

    /// True while a method record is open
    #[must_use]
    pub fn has_open_method(&self) -> bool {
        self.current_method.is_some()
    }

    /// True once the symbol file has been written
    #[must_use]
    pub fn is_written(&self) -> bool {
        self.written
    }

    /// Serializes the accumulated records without writing them anywhere.
    ///
    /// # Errors
    /// Returns [`crate::Error::InconsistentState`] while a method is open and
    /// [`crate::Error::Malformed`] if a record cannot be encoded.
    pub fn encode(&self, mvid: &uguid::Guid) -> Result<Vec<u8>> {
        if let Some(method) = &self.current_method {
            return Err(state_error!(
                "Method '{}' is still open while encoding the symbol file",
                method.name()
            ));
        }

        format::encode(mvid, &self.sources, &self.compile_units, &self.methods)
    }

    fn ensure_writable(&self) -> Result<()> {
        if self.written {
            return Err(state_error!(
                "Symbol file '{}' has already been written",
                self.target_path.display()
            ));
        }
        Ok(())
    }

    fn method_mut(&mut self, operation: &str) -> Result<&mut SourceMethodBuilder> {
        self.current_method
            .as_mut()
            .ok_or_else(|| state_error!("{} without an open method", operation))
    }
}

impl SymbolEncoder for MonoSymbolWriter {
    fn define_document(&mut self, url: &str) -> Result<SourceFileEntry> {
        self.ensure_writable()?;

        let index = self.sources.len() as u32 + 1;
        self.sources.push(SourceFileData {
            index,
            url: url.to_string(),
        });
        Ok(SourceFileEntry(index))
    }

    fn define_compilation_unit(&mut self, source: SourceFileEntry) -> Result<CompileUnitEntry> {
        self.ensure_writable()?;

        if source.index() == 0 || source.index() as usize > self.sources.len() {
            return Err(state_error!(
                "Compilation unit refers to unknown {}",
                source
            ));
        }

        let index = self.compile_units.len() as u32 + 1;
        self.compile_units.push(CompileUnitData { index, source });
        Ok(CompileUnitEntry(index))
    }

    fn open_method(
        &mut self,
        unit: CompileUnitEntry,
        namespace_id: u32,
        method: &MethodDef,
    ) -> Result<()> {
        self.ensure_writable()?;

        if let Some(open) = &self.current_method {
            return Err(state_error!(
                "Opening method '{}' while '{}' is still open",
                method.name,
                open.name()
            ));
        }

        if unit.index() == 0 || unit.index() as usize > self.compile_units.len() {
            return Err(state_error!(
                "Method '{}' refers to unknown {}",
                method.name,
                unit
            ));
        }

        log::debug!("Opening method '{}' ({}) in {}", method.name, method.token, unit);
        self.current_method = Some(SourceMethodBuilder::new(unit, namespace_id, method));
        Ok(())
    }

    fn mark_sequence_point(
        &mut self,
        offset: u32,
        file: SourceFileEntry,
        start_line: u32,
        start_col: u16,
        end_line: u32,
        end_col: u16,
        is_statement: bool,
    ) -> Result<()> {
        log::trace!(
            "IL_{:04x} -> {} {}:{}-{}:{}",
            offset,
            file,
            start_line,
            start_col,
            end_line,
            end_col
        );

        self.method_mut("Marking a sequence point")?
            .mark_sequence_point(LineNumberEntry {
                offset,
                file,
                start_line,
                start_col,
                end_line,
                end_col,
                is_statement,
            });
        Ok(())
    }

    fn open_scope(&mut self, start_offset: u32) -> Result<()> {
        let block = self
            .method_mut("Opening a scope")?
            .start_block(start_offset);
        log::trace!("Opened scope {} at IL_{:04x}", block, start_offset);
        Ok(())
    }

    fn define_local_variable(&mut self, index: u16, name: &str) -> Result<()> {
        self.method_mut("Defining a local variable")?
            .add_local(index, name);
        Ok(())
    }

    fn close_scope(&mut self, end_offset: u32) -> Result<()> {
        let block = self.method_mut("Closing a scope")?.end_block(end_offset)?;
        log::trace!("Closed scope {} at IL_{:04x}", block, end_offset);
        Ok(())
    }

    fn close_method(&mut self) -> Result<()> {
        let Some(builder) = self.current_method.take() else {
            return Err(state_error!("Closing a method without an open method"));
        };

        self.methods.push(builder.finish()?);
        Ok(())
    }

    fn write_symbol_file(&mut self, mvid: &uguid::Guid) -> Result<()> {
        self.ensure_writable()?;

        let data = self.encode(mvid)?;

        let mut output = Output::create(&self.target_path, data.len() as u64)?;
        output.write_at(0, &data)?;
        let size = output.size();
        log::debug!("Flushing '{}'", output.target_path().display());
        output.finalize()?;
        self.written = true;

        log::info!(
            "Wrote {} bytes of symbols to '{}' ({} sources, {} methods)",
            size,
            self.target_path.display(),
            self.sources.len(),
            self.methods.len()
        );
        Ok(())
    }
}
