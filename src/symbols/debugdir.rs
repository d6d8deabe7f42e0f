//! Debug directory record
//!
//! PE images can carry an `IMAGE_DEBUG_DIRECTORY` entry pointing debuggers at external debug
//! data. MDB symbol files are located by naming convention instead, so the MDB writer never
//! registers one: [`DebugHeader::none`] is the only header it reports.

/// The `IMAGE_DEBUG_DIRECTORY` structure of a PE image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImageDebugDirectory {
    /// Reserved, must be zero
    pub characteristics: u32,
    /// Time and date the debug data was created
    pub time_date_stamp: u32,
    /// Major version of the debug data format
    pub major_version: u16,
    /// Minor version of the debug data format
    pub minor_version: u16,
    /// Format of the debug information
    pub debug_type: u32,
    /// Size of the debug data, excluding the directory itself
    pub size_of_data: u32,
    /// RVA of the debug data when loaded
    pub address_of_raw_data: u32,
    /// File offset of the debug data
    pub pointer_to_raw_data: u32,
}

/// Answer of a symbol writer to "does this artifact need a debug directory entry?"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugHeader {
    /// True if the image should carry the directory and payload below
    pub present: bool,
    /// The directory entry to register
    pub directory: ImageDebugDirectory,
    /// The payload the directory entry points at
    pub data: &'static [u8],
}

impl DebugHeader {
    /// The header of writers that never register a debug directory
    #[must_use]
    pub const fn none() -> Self {
        DebugHeader {
            present: false,
            directory: ImageDebugDirectory {
                characteristics: 0,
                time_date_stamp: 0,
                major_version: 0,
                minor_version: 0,
                debug_type: 0,
                size_of_data: 0,
                address_of_raw_data: 0,
                pointer_to_raw_data: 0,
            },
            data: &[],
        }
    }
}
