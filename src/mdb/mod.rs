//! Mono `.mdb` symbol file encoder.
//!
//! [`MonoSymbolWriter`] implements [`crate::symbols::encoder::SymbolEncoder`] and lays out the
//! records it receives in the MDB format described in [`format`]. Method records are assembled
//! by a [`method::SourceMethodBuilder`] while they are open.
//!
//! # Usage Examples
//!
//! ```rust,no_run
//! use dotsym::mdb::MonoSymbolWriter;
//! use dotsym::metadata::{debuginfo::MethodDef, token::Token};
//! use dotsym::symbols::encoder::SymbolEncoder;
//!
//! let mut encoder = MonoSymbolWriter::new("Program.exe.mdb");
//! let source = encoder.define_document("Program.cs")?;
//! let unit = encoder.define_compilation_unit(source)?;
//!
//! encoder.open_method(unit, 0, &MethodDef::new("Main", Token::method_def(1)))?;
//! encoder.mark_sequence_point(0, source, 5, 9, 5, 30, false)?;
//! encoder.close_method()?;
//!
//! encoder.write_symbol_file(&uguid::guid!("01234567-89ab-cdef-0123-456789abcdef"))?;
//! # Ok::<(), dotsym::Error>(())
//! ```

mod builder;
pub mod format;
pub mod method;

pub use builder::{CompileUnitData, MonoSymbolWriter, SourceFileData};
