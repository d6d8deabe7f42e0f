//! Memory-mapped output file for symbol artifacts.
//!
//! This module provides the [`crate::file::output::Output`] type that backs the final write of a
//! symbol file. The encoder serializes the whole artifact in memory first, so the exact size is
//! known before the file is created: the target is created at full size, mapped, filled and
//! flushed in a single finalization step.
//!
//! # Resource Management
//!
//! An [`Output`] that is dropped without [`Output::finalize`] having succeeded removes its target
//! file again. A failed write therefore never leaves a truncated artifact behind.
//!
//! # Usage Examples
//!
//! ```rust,ignore
//! use dotsym::file::output::Output;
//!
//! let data = b"symbol data";
//! let mut output = Output::create("Program.exe.mdb", data.len() as u64)?;
//! output.write_at(0, data)?;
//! output.finalize()?;
//! # Ok::<(), dotsym::Error>(())
//! ```
//!
//! # Thread Safety
//!
//! [`Output`] owns a mutable memory mapping and is meant to be used by the single writer that
//! created it.

use std::path::{Path, PathBuf};

use memmap2::{MmapMut, MmapOptions};

use crate::{Error, Result};

/// A memory-mapped output file that is removed again unless it is finalized.
pub struct Output {
    /// The memory mapping of the target file
    mmap: MmapMut,

    /// The target path
    target_path: PathBuf,

    /// Whether the file has been finalized
    finalized: bool,
}

impl Output {
    /// Creates the target file with the given size and maps it into memory.
    ///
    /// An existing file at `target_path` is truncated and overwritten. If the truncated file
    /// cannot be resized or mapped it is removed again.
    ///
    /// # Arguments
    ///
    /// * `target_path` - The path where the file should be created
    /// * `size` - The total size of the file to create
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::FileError`] if the file cannot be opened for writing and
    /// [`crate::Error::WriteMmapFailed`] if it cannot be resized or mapped.
    pub fn create<P: AsRef<Path>>(target_path: P, size: u64) -> Result<Self> {
        let target_path = target_path.as_ref().to_path_buf();

        let file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&target_path)?;

        let mapped = file
            .set_len(size)
            .map_err(|e| Error::WriteMmapFailed {
                message: format!("Failed to set file size: {e}"),
            })
            .and_then(|()| {
                // The mapping is exclusive to this Output, which owns the freshly truncated file.
                let mmap = unsafe { MmapOptions::new().map_mut(&file) };
                mmap.map_err(|e| Error::WriteMmapFailed {
                    message: format!("Failed to create memory mapping: {e}"),
                })
            });

        let mmap = match mapped {
            Ok(mmap) => mmap,
            Err(error) => {
                let _ = std::fs::remove_file(&target_path);
                return Err(error);
            }
        };

        Ok(Self {
            mmap,
            target_path,
            finalized: false,
        })
    }

    /// Writes `data` at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::WriteMmapFailed`] if the write would exceed the file size.
    pub fn write_at(&mut self, offset: u64, data: &[u8]) -> Result<()> {
        let start = usize::try_from(offset).map_err(|_| Error::WriteMmapFailed {
            message: format!("Offset {offset} is not addressable"),
        })?;
        let end = start + data.len();

        if end > self.mmap.len() {
            return Err(Error::WriteMmapFailed {
                message: format!(
                    "Write would exceed file size: offset={}, len={}, file_size={}",
                    offset,
                    data.len(),
                    self.mmap.len()
                ),
            });
        }

        self.mmap[start..end].copy_from_slice(data);
        Ok(())
    }

    /// Returns the size in bytes of the mapped file.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.mmap.len() as u64
    }

    /// Flushes the mapping and marks the file as complete.
    ///
    /// After this call the file remains at its target path.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::WriteFinalizationFailed`] if the flush fails, in which case the
    /// file is removed when the [`Output`] is dropped.
    pub fn finalize(mut self) -> Result<()> {
        self.mmap
            .flush()
            .map_err(|e| Error::WriteFinalizationFailed {
                message: format!("Failed to flush memory mapping: {e}"),
            })?;

        self.finalized = true;
        Ok(())
    }

    /// Returns the path the file is written to.
    #[must_use]
    pub fn target_path(&self) -> &Path {
        &self.target_path
    }
}

impl Drop for Output {
    fn drop(&mut self) {
        if !self.finalized {
            log::warn!(
                "Discarding unfinalized symbol output {}",
                self.target_path.display()
            );
            let _ = std::fs::remove_file(&self.target_path);
        }
    }
}
