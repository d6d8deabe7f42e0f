//! MDB symbol file layout and serialization.
//!
//! The file starts with a fixed 48 byte header, followed by an offset table with one
//! `(offset, size)` pair per [`TableKind`] and the tables themselves, in table kind order:
//!
//! ```text
//! +--------------------+ 0
//! | header             |
//! +--------------------+ 48
//! | offset table       |  3 x (u32 offset, u32 size)
//! +--------------------+ 72
//! | sources            |
//! | compile units      |
//! | methods            |
//! +--------------------+ total size
//! ```
//!
//! Method records are stored ordered by metadata token. Line offsets are delta encoded against
//! the previous row of the same method.

use bitflags::bitflags;
use strum::{EnumCount, EnumIter, IntoEnumIterator};

use crate::{
    file::io::{
        write_compressed_int, write_compressed_uint, write_le, write_le_at, write_prefixed_string,
    },
    mdb::{
        method::{CodeBlockEntry, LineNumberEntry, LocalVariableEntry, MethodEntry},
        CompileUnitData, SourceFileData,
    },
    metadata::sequencepoints::HIDDEN_LINE,
    Result,
};

/// Magic number at the start of every MDB file
pub const MAGIC: u64 = 0x45e8_2623_fd7f_a614;

/// Major format version
pub const MAJOR_VERSION: u32 = 50;

/// Minor format version
pub const MINOR_VERSION: u32 = 0;

/// Size of the fixed header in bytes
pub const HEADER_SIZE: usize = 48;

/// Size of the offset table in bytes
pub const OFFSET_TABLE_SIZE: usize = TableKind::COUNT * 8;

/// The tables of an MDB file, in file order
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumCount)]
pub enum TableKind {
    /// Source file entries
    Sources,
    /// Compilation units
    CompileUnits,
    /// Method records
    Methods,
}

bitflags! {
    /// Per-method record flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MethodFlags: u8 {
        /// Two or more locals share a name
        const LOCAL_NAMES_AMBIGUOUS = 0x01;
        /// Line rows carry start and end columns
        const COLUMNS_INCLUDED = 0x02;
        /// Line rows carry end lines
        const END_INFO_INCLUDED = 0x04;
    }
}

bitflags! {
    /// Per-line row flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LineFlags: u8 {
        /// Row marks a statement boundary
        const STATEMENT = 0x01;
        /// Row is hidden from the debugger
        const HIDDEN = 0x02;
    }
}

/// Serializes a complete symbol file.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if a count, index or offset does not fit the format.
pub(crate) fn encode(
    mvid: &uguid::Guid,
    sources: &[SourceFileData],
    compile_units: &[CompileUnitData],
    methods: &[MethodEntry],
) -> Result<Vec<u8>> {
    let mut tables: Vec<Vec<u8>> = Vec::with_capacity(TableKind::COUNT);
    for kind in TableKind::iter() {
        let mut table = Vec::new();
        match kind {
            TableKind::Sources => encode_sources(&mut table, sources)?,
            TableKind::CompileUnits => encode_compile_units(&mut table, compile_units)?,
            TableKind::Methods => encode_methods(&mut table, methods)?,
        }
        tables.push(table);
    }

    let total_size = HEADER_SIZE + OFFSET_TABLE_SIZE + tables.iter().map(Vec::len).sum::<usize>();
    let mut data = vec![0u8; total_size];
    let mut offset = 0;

    write_le_at(&mut data, &mut offset, MAGIC)?;
    write_le_at(&mut data, &mut offset, MAJOR_VERSION)?;
    write_le_at(&mut data, &mut offset, MINOR_VERSION)?;
    for byte in mvid.to_bytes() {
        write_le_at(&mut data, &mut offset, byte)?;
    }
    write_le_at(&mut data, &mut offset, to_u32(sources.len(), "source count")?)?;
    write_le_at(&mut data, &mut offset, to_u32(compile_units.len(), "compile unit count")?)?;
    write_le_at(&mut data, &mut offset, to_u32(methods.len(), "method count")?)?;
    write_le_at(&mut data, &mut offset, to_u32(total_size, "file size")?)?;

    let mut table_offset = HEADER_SIZE + OFFSET_TABLE_SIZE;
    for table in &tables {
        write_le_at(&mut data, &mut offset, to_u32(table_offset, "table offset")?)?;
        write_le_at(&mut data, &mut offset, to_u32(table.len(), "table size")?)?;
        table_offset += table.len();
    }

    for table in &tables {
        let end = offset + table.len();
        data[offset..end].copy_from_slice(table);
        offset = end;
    }

    Ok(data)
}

fn to_u32(value: usize, what: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| malformed_error!("{} {} does not fit into u32", what, value))
}

fn encode_sources(buffer: &mut Vec<u8>, sources: &[SourceFileData]) -> Result<()> {
    for source in sources {
        write_compressed_uint(buffer, source.index)?;
        write_prefixed_string(buffer, &source.url)?;
    }
    Ok(())
}

fn encode_compile_units(buffer: &mut Vec<u8>, compile_units: &[CompileUnitData]) -> Result<()> {
    for unit in compile_units {
        write_compressed_uint(buffer, unit.index)?;
        write_compressed_uint(buffer, unit.source.index())?;
    }
    Ok(())
}

fn encode_methods(buffer: &mut Vec<u8>, methods: &[MethodEntry]) -> Result<()> {
    let mut ordered: Vec<&MethodEntry> = methods.iter().collect();
    ordered.sort_by_key(|method| method.token.value());

    for method in ordered {
        encode_method(buffer, method)?;
    }
    Ok(())
}

fn encode_method(buffer: &mut Vec<u8>, method: &MethodEntry) -> Result<()> {
    let mut flags = MethodFlags::COLUMNS_INCLUDED | MethodFlags::END_INFO_INCLUDED;
    if method.has_ambiguous_local_names() {
        flags |= MethodFlags::LOCAL_NAMES_AMBIGUOUS;
    }

    write_le(buffer, method.token.value());
    write_compressed_uint(buffer, method.compile_unit.index())?;
    write_compressed_uint(buffer, method.namespace_id)?;
    write_le(buffer, flags.bits());
    write_prefixed_string(buffer, &method.name)?;

    write_compressed_uint(buffer, to_u32(method.lines.len(), "line count")?)?;
    let mut previous_offset = 0u32;
    for line in &method.lines {
        encode_line(buffer, line, previous_offset)?;
        previous_offset = line.offset;
    }

    write_compressed_uint(buffer, to_u32(method.locals.len(), "local count")?)?;
    for local in &method.locals {
        encode_local(buffer, local)?;
    }

    write_compressed_uint(buffer, to_u32(method.blocks.len(), "block count")?)?;
    for block in &method.blocks {
        encode_block(buffer, block, &method.name)?;
    }

    Ok(())
}

fn encode_line(buffer: &mut Vec<u8>, line: &LineNumberEntry, previous_offset: u32) -> Result<()> {
    let delta = i64::from(line.offset) - i64::from(previous_offset);
    let delta = i32::try_from(delta)
        .map_err(|_| malformed_error!("IL offset delta {} does not fit into i32", delta))?;

    let mut flags = LineFlags::empty();
    if line.is_statement {
        flags |= LineFlags::STATEMENT;
    }
    if line.start_line == HIDDEN_LINE {
        flags |= LineFlags::HIDDEN;
    }

    write_compressed_int(buffer, delta)?;
    write_compressed_uint(buffer, line.file.index())?;
    write_compressed_uint(buffer, line.start_line)?;
    write_compressed_uint(buffer, u32::from(line.start_col))?;
    write_compressed_uint(buffer, line.end_line)?;
    write_compressed_uint(buffer, u32::from(line.end_col))?;
    write_le(buffer, flags.bits());
    Ok(())
}

fn encode_local(buffer: &mut Vec<u8>, local: &LocalVariableEntry) -> Result<()> {
    write_compressed_uint(buffer, u32::from(local.index))?;
    write_prefixed_string(buffer, &local.name)?;
    write_compressed_uint(buffer, local.block)
}

fn encode_block(buffer: &mut Vec<u8>, block: &CodeBlockEntry, method: &str) -> Result<()> {
    let Some(end_offset) = block.end_offset else {
        return Err(malformed_error!(
            "Scope {} of '{}' was never closed",
            block.index,
            method
        ));
    };

    write_compressed_uint(buffer, block.parent)?;
    write_compressed_uint(buffer, block.start_offset)?;
    write_compressed_uint(buffer, end_offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::token::Token,
        symbols::encoder::{CompileUnitEntry, SourceFileEntry},
    };

    const MVID: uguid::Guid = uguid::guid!("01234567-89ab-cdef-0123-456789abcdef");

    fn read_u32(data: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(data[offset..offset + 4].try_into().unwrap())
    }

    fn method(token: u32, name: &str) -> MethodEntry {
        MethodEntry {
            token: Token::new(token),
            name: name.to_string(),
            compile_unit: CompileUnitEntry(1),
            namespace_id: 0,
            lines: Vec::new(),
            locals: Vec::new(),
            blocks: Vec::new(),
        }
    }

    #[test]
    fn empty_file_layout() {
        let data = encode(&MVID, &[], &[], &[]).unwrap();

        assert_eq!(data.len(), HEADER_SIZE + OFFSET_TABLE_SIZE);
        assert_eq!(u64::from_le_bytes(data[0..8].try_into().unwrap()), MAGIC);
        assert_eq!(read_u32(&data, 8), MAJOR_VERSION);
        assert_eq!(read_u32(&data, 12), MINOR_VERSION);
        assert_eq!(&data[16..32], &MVID.to_bytes());
        assert_eq!(read_u32(&data, 32), 0);
        assert_eq!(read_u32(&data, 36), 0);
        assert_eq!(read_u32(&data, 40), 0);
        assert_eq!(read_u32(&data, 44), data.len() as u32);

        for (i, _) in TableKind::iter().enumerate() {
            let entry = HEADER_SIZE + i * 8;
            assert_eq!(read_u32(&data, entry), 72);
            assert_eq!(read_u32(&data, entry + 4), 0);
        }
    }

    #[test]
    fn tables_follow_offset_table() {
        let sources = [SourceFileData {
            index: 1,
            url: "a.cs".to_string(),
        }];
        let units = [CompileUnitData {
            index: 1,
            source: SourceFileEntry(1),
        }];

        let data = encode(&MVID, &sources, &units, &[]).unwrap();

        assert_eq!(read_u32(&data, 32), 1);
        assert_eq!(read_u32(&data, 36), 1);

        let sources_offset = read_u32(&data, HEADER_SIZE) as usize;
        let sources_size = read_u32(&data, HEADER_SIZE + 4) as usize;
        assert_eq!(
            &data[sources_offset..sources_offset + sources_size],
            &[1, 4, b'a', b'.', b'c', b's']
        );

        let units_offset = read_u32(&data, HEADER_SIZE + 8) as usize;
        let units_size = read_u32(&data, HEADER_SIZE + 12) as usize;
        assert_eq!(units_offset, sources_offset + sources_size);
        assert_eq!(&data[units_offset..units_offset + units_size], &[1, 1]);
    }

    #[test]
    fn method_record_encoding() {
        let mut entry = method(0x0600_0001, "M");
        entry.lines.push(LineNumberEntry {
            offset: 4,
            file: SourceFileEntry(1),
            start_line: 10,
            start_col: 5,
            end_line: 10,
            end_col: 20,
            is_statement: false,
        });
        entry.lines.push(LineNumberEntry {
            offset: 2,
            file: SourceFileEntry(1),
            start_line: HIDDEN_LINE,
            start_col: 0,
            end_line: HIDDEN_LINE,
            end_col: 0,
            is_statement: true,
        });
        entry.locals.push(LocalVariableEntry {
            index: 0,
            name: "x".to_string(),
            block: 1,
        });
        entry.blocks.push(CodeBlockEntry {
            index: 1,
            parent: 0,
            start_offset: 0,
            end_offset: Some(8),
        });

        let mut buffer = Vec::new();
        encode_method(&mut buffer, &entry).unwrap();

        assert_eq!(
            buffer,
            [
                0x01, 0x00, 0x00, 0x06, // token
                1,    // compile unit
                0,    // namespace
                0x06, // COLUMNS_INCLUDED | END_INFO_INCLUDED
                1, b'M', // name
                2,    // line count
                8, 1, 10, 5, 10, 20, 0x00, // +4
                3, 1, 0xC0, 0xFE, 0xEF, 0xEE, 0, 0xC0, 0xFE, 0xEF, 0xEE, 0, 0x03, // -2, hidden
                1, 0, 1, b'x', 1, // local
                1, 0, 0, 8, // block
            ]
        );
    }

    #[test]
    fn methods_are_ordered_by_token() {
        let methods = [method(0x0600_0003, "C"), method(0x0600_0001, "A")];
        let mut buffer = Vec::new();
        encode_methods(&mut buffer, &methods).unwrap();

        assert_eq!(&buffer[0..4], &[0x01, 0x00, 0x00, 0x06]);
    }

    #[test]
    fn ambiguous_locals_are_flagged() {
        let mut entry = method(0x0600_0001, "M");
        for index in 0..2 {
            entry.locals.push(LocalVariableEntry {
                index,
                name: "i".to_string(),
                block: 0,
            });
        }

        let mut buffer = Vec::new();
        encode_method(&mut buffer, &entry).unwrap();
        assert_eq!(
            MethodFlags::from_bits_truncate(buffer[6]),
            MethodFlags::all()
        );
    }

    #[test]
    fn open_block_is_rejected() {
        let mut entry = method(0x0600_0001, "M");
        entry.blocks.push(CodeBlockEntry {
            index: 1,
            parent: 0,
            start_offset: 0,
            end_offset: None,
        });

        let mut buffer = Vec::new();
        assert!(matches!(
            encode_method(&mut buffer, &entry),
            Err(crate::Error::Malformed { .. })
        ));
    }
}
