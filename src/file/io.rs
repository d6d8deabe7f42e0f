//! Low-level byte order and encoding utilities for symbol file generation.
//!
//! This module provides the primitive writing layer used by the MDB encoder. Values are either
//! appended to a growable `Vec<u8>` buffer (the common case while tables are being serialized)
//! or patched into an already sized slice at a given offset (used for headers whose content is
//! only known after the tables behind them have been laid out).
//!
//! # Key Components
//!
//! ## Core Trait
//! - [`crate::file::io::CilIO`] - Trait providing little-endian byte conversion for primitive types
//!
//! ## Fixed-Width Writing
//! - [`crate::file::io::write_le`] - Append a value in little-endian format
//! - [`crate::file::io::write_le_at`] - Patch a value at an offset with auto-advance
//!
//! ## Variable-Length Writing
//! - [`crate::file::io::write_compressed_uint`] - ECMA-335 II.23.2 compressed unsigned integer
//! - [`crate::file::io::write_compressed_int`] - Compressed signed integer (sign in the low bit)
//! - [`crate::file::io::write_7bit_encoded_int`] - .NET `BinaryWriter` 7-bit encoded integer
//! - [`crate::file::io::write_prefixed_string`] - UTF-8 string with a 7-bit encoded byte length
//!
//! # Usage Examples
//!
//! ```rust,ignore
//! use dotsym::file::io::{write_le, write_compressed_uint};
//!
//! let mut buffer = Vec::new();
//! write_le(&mut buffer, 1u32);
//! write_compressed_uint(&mut buffer, 0x80)?;
//! assert_eq!(buffer, [0x01, 0x00, 0x00, 0x00, 0x80, 0x80]);
//! # Ok::<(), dotsym::Error>(())
//! ```
//!
//! # Error Handling
//!
//! Appending never fails for fixed-width values. Variable-length encoders return
//! [`crate::Error::Malformed`] for values outside the representable range, and patching returns
//! [`crate::Error::OutOfBounds`] when the slice is too small.

use crate::{Error::OutOfBounds, Result};

/// Largest value representable as an ECMA-335 compressed unsigned integer.
pub const MAX_COMPRESSED_UINT: u32 = 0x1FFF_FFFF;

/// Trait for endian-aware conversion of primitive types into their byte representation.
///
/// Each implementation defines a `Bytes` associated type that represents the fixed-size
/// byte array for that particular type (e.g., `[u8; 4]` for `u32`).
pub trait CilIO: Sized + Copy {
    /// Associated type representing the byte array type for this numeric type.
    type Bytes: AsRef<[u8]>;

    /// Write T to a byte buffer in little-endian
    fn to_le_bytes(self) -> Self::Bytes;
}

macro_rules! impl_cil_io {
    ($($ty:ty => $len:expr),* $(,)?) => {
        $(
            impl CilIO for $ty {
                type Bytes = [u8; $len];

                fn to_le_bytes(self) -> Self::Bytes {
                    <$ty>::to_le_bytes(self)
                }
            }
        )*
    };
}

impl_cil_io! {
    u8 => 1,
    u16 => 2,
    u32 => 4,
    u64 => 8,
    i32 => 4,
}

/// Appends a value of type `T` in little-endian byte order to `buffer`.
///
/// # Examples
///
/// ```rust,ignore
/// use dotsym::file::io::write_le;
///
/// let mut buffer = Vec::new();
/// write_le(&mut buffer, 0x1234u16);
/// assert_eq!(buffer, [0x34, 0x12]);
/// ```
pub fn write_le<T: CilIO>(buffer: &mut Vec<u8>, value: T) {
    buffer.extend_from_slice(value.to_le_bytes().as_ref());
}

/// Writes a value of type `T` in little-endian byte order into `data` at `offset`.
///
/// The offset is advanced by the number of bytes written.
///
/// # Errors
///
/// Returns [`crate::Error::OutOfBounds`] if the value does not fit at the given offset.
pub fn write_le_at<T: CilIO>(data: &mut [u8], offset: &mut usize, value: T) -> Result<()> {
    let bytes = value.to_le_bytes();
    let bytes = bytes.as_ref();

    let end = offset.checked_add(bytes.len()).ok_or(OutOfBounds)?;
    if end > data.len() {
        return Err(OutOfBounds);
    }

    data[*offset..end].copy_from_slice(bytes);
    *offset = end;

    Ok(())
}

/// Returns the number of bytes (1, 2 or 4) needed to encode `value` as a compressed uint.
///
/// - Values < 0x80 use 1 byte
/// - Values < 0x4000 use 2 bytes
/// - Larger values use 4 bytes
#[must_use]
pub fn compressed_uint_size(value: u32) -> usize {
    if value < 0x80 {
        1
    } else if value < 0x4000 {
        2
    } else {
        4
    }
}

/// Appends an ECMA-335 II.23.2 compressed unsigned integer.
///
/// # Errors
///
/// Returns [`crate::Error::Malformed`] if `value` exceeds [`MAX_COMPRESSED_UINT`].
pub fn write_compressed_uint(buffer: &mut Vec<u8>, value: u32) -> Result<()> {
    match compressed_uint_size(value) {
        1 => buffer.push(value as u8),
        2 => {
            buffer.push(0x80 | (value >> 8) as u8);
            buffer.push(value as u8);
        }
        _ => {
            if value > MAX_COMPRESSED_UINT {
                return Err(malformed_error!(
                    "Value {:#x} exceeds compressed uint range",
                    value
                ));
            }

            buffer.push(0xC0 | (value >> 24) as u8);
            buffer.push((value >> 16) as u8);
            buffer.push((value >> 8) as u8);
            buffer.push(value as u8);
        }
    }

    Ok(())
}

/// Appends a compressed signed integer.
///
/// The sign is carried in the least significant bit: non-negative values are encoded as
/// `value << 1`, negative values as `((-value - 1) << 1) | 1`. The result is written as a
/// compressed unsigned integer, mirroring [`write_compressed_uint`].
///
/// # Errors
///
/// Returns [`crate::Error::Malformed`] if the encoded magnitude exceeds the compressed range.
pub fn write_compressed_int(buffer: &mut Vec<u8>, value: i32) -> Result<()> {
    #[allow(clippy::cast_sign_loss)]
    let encoded = if value >= 0 {
        (value as u32) << 1
    } else {
        (((!value) as u32) << 1) | 1
    };

    if encoded > MAX_COMPRESSED_UINT {
        return Err(malformed_error!(
            "Value {} exceeds compressed int range",
            value
        ));
    }

    write_compressed_uint(buffer, encoded)
}

/// Appends a 7-bit encoded integer as produced by .NET's `BinaryWriter`.
///
/// Each byte carries 7 bits of payload, least significant group first, with the high bit
/// set on every byte except the last.
pub fn write_7bit_encoded_int(buffer: &mut Vec<u8>, value: u32) {
    let mut remaining = value;
    while remaining >= 0x80 {
        buffer.push((remaining as u8) | 0x80);
        remaining >>= 7;
    }
    buffer.push(remaining as u8);
}

/// Appends a UTF-8 string prefixed with its 7-bit encoded byte length.
///
/// # Errors
///
/// Returns [`crate::Error::Malformed`] if the string is longer than `u32::MAX` bytes.
pub fn write_prefixed_string(buffer: &mut Vec<u8>, value: &str) -> Result<()> {
    let length = u32::try_from(value.len())
        .map_err(|_| malformed_error!("String of {} bytes is too long", value.len()))?;

    write_7bit_encoded_int(buffer, length);
    buffer.extend_from_slice(value.as_bytes());
    Ok(())
}
