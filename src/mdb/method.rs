//! Method records of an MDB symbol file.
//!
//! A [`SourceMethodBuilder`] collects the line table, code blocks and locals of the method that
//! is currently open in a [`crate::mdb::MonoSymbolWriter`]. Closing the method turns it into an
//! immutable [`MethodEntry`].
//!
//! Code blocks are numbered from 1 in the order they are opened; block 0 stands for the method
//! body itself. Every block records the block that was innermost when it was opened as its
//! parent, and every local records the block that was innermost when it was declared.

use crate::{
    metadata::{debuginfo::MethodDef, token::Token},
    symbols::encoder::{CompileUnitEntry, SourceFileEntry},
    Result,
};

/// One row of a method's line table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineNumberEntry {
    /// IL offset
    pub offset: u32,
    /// Source file of this row
    pub file: SourceFileEntry,
    /// Start line
    pub start_line: u32,
    /// Start column
    pub start_col: u16,
    /// End line
    pub end_line: u32,
    /// End column
    pub end_col: u16,
    /// Statement flag as passed by the writer
    pub is_statement: bool,
}

/// A local variable, bound to the code block it was declared in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalVariableEntry {
    /// Slot index
    pub index: u16,
    /// Source name
    pub name: String,
    /// Declaring code block, 0 for the method body
    pub block: u32,
}

/// A lexical code block of a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeBlockEntry {
    /// 1-based block number
    pub index: u32,
    /// Enclosing block, 0 for the method body
    pub parent: u32,
    /// IL offset where the block starts
    pub start_offset: u32,
    /// IL offset where the block ends, `None` while the block is open
    pub end_offset: Option<u32>,
}

/// A closed method record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodEntry {
    /// Metadata token of the method
    pub token: Token,
    /// Display name of the method
    pub name: String,
    /// Compilation unit the method belongs to
    pub compile_unit: CompileUnitEntry,
    /// Namespace scope the method was opened in
    pub namespace_id: u32,
    /// Line table in emission order
    pub lines: Vec<LineNumberEntry>,
    /// Local variables in declaration order
    pub locals: Vec<LocalVariableEntry>,
    /// Code blocks in opening order
    pub blocks: Vec<CodeBlockEntry>,
}

impl MethodEntry {
    /// True if two locals of this method share a name
    #[must_use]
    pub fn has_ambiguous_local_names(&self) -> bool {
        self.locals
            .iter()
            .enumerate()
            .any(|(i, local)| self.locals[..i].iter().any(|prev| prev.name == local.name))
    }
}

/// Accumulates the records of the currently open method.
#[derive(Debug)]
pub struct SourceMethodBuilder {
    entry: MethodEntry,
    open_blocks: Vec<u32>,
}

impl SourceMethodBuilder {
    /// Starts a method record for `method` in `unit`
    #[must_use]
    pub fn new(unit: CompileUnitEntry, namespace_id: u32, method: &MethodDef) -> Self {
        SourceMethodBuilder {
            entry: MethodEntry {
                token: method.token,
                name: method.name.clone(),
                compile_unit: unit,
                namespace_id,
                lines: Vec::new(),
                locals: Vec::new(),
                blocks: Vec::new(),
            },
            open_blocks: Vec::new(),
        }
    }

    /// Name of the method being built
    #[must_use]
    pub fn name(&self) -> &str {
        &self.entry.name
    }

    /// Appends a row to the line table
    pub fn mark_sequence_point(&mut self, line: LineNumberEntry) {
        self.entry.lines.push(line);
    }

    /// Opens a code block nested in the innermost open block and returns its number
    pub fn start_block(&mut self, start_offset: u32) -> u32 {
        let index = self.entry.blocks.len() as u32 + 1;
        self.entry.blocks.push(CodeBlockEntry {
            index,
            parent: self.current_block(),
            start_offset,
            end_offset: None,
        });
        self.open_blocks.push(index);
        index
    }

    /// Closes the innermost open code block at `end_offset`
    ///
    /// # Errors
    /// Returns [`crate::Error::InconsistentState`] if no block is open.
    pub fn end_block(&mut self, end_offset: u32) -> Result<u32> {
        let Some(index) = self.open_blocks.pop() else {
            return Err(state_error!(
                "Closing a scope at IL_{:04x} in '{}' without an open scope",
                end_offset,
                self.entry.name
            ));
        };

        if let Some(block) = self.entry.blocks.get_mut(index as usize - 1) {
            block.end_offset = Some(end_offset);
        }
        Ok(index)
    }

    /// Declares a local in the innermost open block
    pub fn add_local(&mut self, index: u16, name: &str) {
        let block = self.current_block();
        self.entry.locals.push(LocalVariableEntry {
            index,
            name: name.to_string(),
            block,
        });
    }

    /// Number of the innermost open block, 0 if none is open
    #[must_use]
    pub fn current_block(&self) -> u32 {
        self.open_blocks.last().copied().unwrap_or(0)
    }

    /// Completes the method record
    ///
    /// # Errors
    /// Returns [`crate::Error::InconsistentState`] if code blocks are still open.
    pub fn finish(self) -> Result<MethodEntry> {
        if !self.open_blocks.is_empty() {
            return Err(state_error!(
                "Closing method '{}' with {} open scope(s)",
                self.entry.name,
                self.open_blocks.len()
            ));
        }

        Ok(self.entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> SourceMethodBuilder {
        SourceMethodBuilder::new(
            CompileUnitEntry(1),
            0,
            &MethodDef::new("Main", Token::method_def(1)),
        )
    }

    #[test]
    fn blocks_track_parents() {
        let mut builder = builder();
        assert_eq!(builder.start_block(0), 1);
        assert_eq!(builder.start_block(10), 2);
        assert_eq!(builder.end_block(20).unwrap(), 2);
        assert_eq!(builder.start_block(30), 3);
        assert_eq!(builder.end_block(40).unwrap(), 3);
        assert_eq!(builder.end_block(100).unwrap(), 1);

        let entry = builder.finish().unwrap();
        let parents: Vec<u32> = entry.blocks.iter().map(|b| b.parent).collect();
        let ends: Vec<Option<u32>> = entry.blocks.iter().map(|b| b.end_offset).collect();
        assert_eq!(parents, [0, 1, 1]);
        assert_eq!(ends, [Some(100), Some(20), Some(40)]);
    }

    #[test]
    fn locals_bind_to_innermost_block() {
        let mut builder = builder();
        builder.add_local(0, "outside");
        builder.start_block(0);
        builder.add_local(1, "a");
        builder.start_block(4);
        builder.add_local(2, "b");
        builder.end_block(8).unwrap();
        builder.add_local(3, "c");
        builder.end_block(12).unwrap();

        let entry = builder.finish().unwrap();
        let blocks: Vec<(u16, u32)> = entry.locals.iter().map(|l| (l.index, l.block)).collect();
        assert_eq!(blocks, [(0, 0), (1, 1), (2, 2), (3, 1)]);
    }

    #[test]
    fn end_without_open_block_fails() {
        let mut builder = builder();
        assert!(matches!(
            builder.end_block(4),
            Err(crate::Error::InconsistentState(_))
        ));
    }

    #[test]
    fn finish_with_open_block_fails() {
        let mut builder = builder();
        builder.start_block(0);
        assert!(matches!(
            builder.finish(),
            Err(crate::Error::InconsistentState(_))
        ));
    }

    #[test]
    fn ambiguous_local_names() {
        let mut builder = builder();
        builder.start_block(0);
        builder.add_local(0, "i");
        builder.end_block(4).unwrap();
        builder.start_block(4);
        builder.add_local(1, "j");
        builder.end_block(8).unwrap();
        assert!(!builder.finish().unwrap().has_ambiguous_local_names());

        let mut builder = self::builder();
        builder.start_block(0);
        builder.add_local(0, "i");
        builder.end_block(4).unwrap();
        builder.start_block(4);
        builder.add_local(1, "i");
        builder.end_block(8).unwrap();
        assert!(builder.finish().unwrap().has_ambiguous_local_names());
    }
}
