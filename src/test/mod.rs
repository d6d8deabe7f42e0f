//! Shared helpers for unit tests.
//!
//! [`RecordingEncoder`] implements [`SymbolEncoder`] by recording every call as an
//! [`EncoderEvent`], so tests can assert on the exact call sequence a writer produces.

use std::{cell::RefCell, rc::Rc};

use crate::{
    metadata::{
        debuginfo::{MethodDebugInformation, MethodDef},
        document::DocumentRc,
        scope::ScopeDebugInformation,
        sequencepoints::SequencePoint,
        token::Token,
    },
    symbols::encoder::{CompileUnitEntry, SourceFileEntry, SymbolEncoder},
    Error, Result,
};

/// One recorded encoder call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncoderEvent {
    DefineDocument(String),
    DefineCompilationUnit(SourceFileEntry),
    OpenMethod(CompileUnitEntry, u32, MethodDef),
    MarkSequencePoint(u32, SourceFileEntry, u32, u16, u32, u16, bool),
    OpenScope(u32),
    DefineLocalVariable(u16, String),
    CloseScope(u32),
    CloseMethod,
    WriteSymbolFile(uguid::Guid),
}

/// Encoder that records calls instead of producing a file.
///
/// Events are also mirrored into a shared journal, see [`RecordingEncoder::log`], so they stay
/// observable after the writer owning the encoder was consumed.
#[derive(Debug, Default)]
pub struct RecordingEncoder {
    pub events: Vec<EncoderEvent>,
    pub fail_define_document: bool,
    journal: Rc<RefCell<Vec<EncoderEvent>>>,
    documents: u32,
    units: u32,
}

impl RecordingEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to every event recorded so far and later
    pub fn log(&self) -> Rc<RefCell<Vec<EncoderEvent>>> {
        Rc::clone(&self.journal)
    }

    /// Number of times `url` was defined as a document
    pub fn document_definitions(&self, url: &str) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, EncoderEvent::DefineDocument(u) if u == url))
            .count()
    }

    fn record(&mut self, event: EncoderEvent) {
        self.journal.borrow_mut().push(event.clone());
        self.events.push(event);
    }
}

impl SymbolEncoder for RecordingEncoder {
    fn define_document(&mut self, url: &str) -> Result<SourceFileEntry> {
        if self.fail_define_document {
            return Err(Error::FileError(std::io::Error::other(
                "document definition failed",
            )));
        }

        self.record(EncoderEvent::DefineDocument(url.to_string()));
        self.documents += 1;
        Ok(SourceFileEntry(self.documents))
    }

    fn define_compilation_unit(&mut self, source: SourceFileEntry) -> Result<CompileUnitEntry> {
        self.record(EncoderEvent::DefineCompilationUnit(source));
        self.units += 1;
        Ok(CompileUnitEntry(self.units))
    }

    fn open_method(
        &mut self,
        unit: CompileUnitEntry,
        namespace_id: u32,
        method: &MethodDef,
    ) -> Result<()> {
        self.record(EncoderEvent::OpenMethod(unit, namespace_id, method.clone()));
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
        self.record(EncoderEvent::MarkSequencePoint(
            offset,
            file,
            start_line,
            start_col,
            end_line,
            end_col,
            is_statement,
        ));
        Ok(())
    }

    fn open_scope(&mut self, start_offset: u32) -> Result<()> {
        self.record(EncoderEvent::OpenScope(start_offset));
        Ok(())
    }

    fn define_local_variable(&mut self, index: u16, name: &str) -> Result<()> {
        self.record(EncoderEvent::DefineLocalVariable(index, name.to_string()));
        Ok(())
    }

    fn close_scope(&mut self, end_offset: u32) -> Result<()> {
        self.record(EncoderEvent::CloseScope(end_offset));
        Ok(())
    }

    fn close_method(&mut self) -> Result<()> {
        self.record(EncoderEvent::CloseMethod);
        Ok(())
    }

    fn write_symbol_file(&mut self, mvid: &uguid::Guid) -> Result<()> {
        self.record(EncoderEvent::WriteSymbolFile(*mvid));
        Ok(())
    }
}

// Helper function to create a MethodDef with row 1
pub fn method_def(name: &str) -> MethodDef {
    MethodDef::new(name, Token::method_def(1))
}

// Helper function to create a SequencePoint
pub fn point(
    il_offset: u32,
    start_line: u32,
    start_col: u16,
    end_line: u32,
    end_col: u16,
    document: &DocumentRc,
) -> SequencePoint {
    SequencePoint::new(
        il_offset,
        start_line,
        start_col,
        end_line,
        end_col,
        DocumentRc::clone(document),
    )
}

// Helper function to create the debug information of one method
pub fn method_info(
    name: &str,
    row: u32,
    points: Vec<SequencePoint>,
    scope: Option<ScopeDebugInformation>,
) -> MethodDebugInformation {
    let mut info = MethodDebugInformation::new(MethodDef::new(name, Token::method_def(row)));
    info.sequence_points = points.into_iter().collect();
    info.scope = scope;
    info
}
