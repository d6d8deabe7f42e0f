use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

macro_rules! state_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::InconsistentState($msg.to_string())
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::InconsistentState(format!($fmt, $($arg)*))
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Every failure is surfaced to the immediate caller. Nothing in this crate retries or
/// recovers locally: an error raised while a symbol file is being assembled leaves that
/// artifact unusable, and the caller is expected to discard it.
///
/// # Error Categories
///
/// ## Construction Errors
/// - [`Error::UnsupportedTarget`] - Emission to a raw byte sink was requested
///
/// ## Emission Errors
/// - [`Error::InconsistentState`] - Method or scope records opened/closed out of order
/// - [`Error::MixedDocuments`] - A method references more than one document under a strict policy
/// - [`Error::RecursionLimit`] - Scope tree nests deeper than a configured limit
/// - [`Error::Poisoned`] - The writer already failed and refuses further work
///
/// ## Encoding and I/O Errors
/// - [`Error::Malformed`] - A value cannot be represented in the symbol file format
/// - [`Error::OutOfBounds`] - A buffer write would exceed the buffer
/// - [`Error::FileError`] - Filesystem I/O errors
/// - [`Error::WriteMmapFailed`] - The memory-mapped output could not be created or written
/// - [`Error::WriteFinalizationFailed`] - The output could not be flushed
///
/// # Examples
///
/// ```rust,no_run
/// use dotsym::{Error, MdbWriter};
/// use uguid::guid;
///
/// let mvid = guid!("01234567-89ab-cdef-0123-456789abcdef");
/// let writer = MdbWriter::create(mvid, "Program.exe.mdb");
/// match writer.finalize() {
///     Ok(()) => println!("Symbols written"),
///     Err(Error::Poisoned) => eprintln!("An earlier method failed, symbols discarded"),
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// Symbol output was requested against a raw byte sink instead of a file path.
    ///
    /// The MDB writer only supports named file targets. This is reported at construction
    /// time, before any writer state exists.
    #[error("Writing symbols to a stream is not supported, a file path is required")]
    UnsupportedTarget,

    /// The encoder was driven through an invalid sequence of calls.
    ///
    /// Raised when a method is opened while another one is still open, when a method or
    /// scope is closed without having been opened, or when the symbol file is used after
    /// it has been written. The in-progress artifact must be discarded.
    #[error("Inconsistent symbol writer state - {0}")]
    InconsistentState(String),

    /// The sequence points of a single method reference more than one document.
    ///
    /// Only reported when [`crate::DocumentPolicy::Reject`] is configured.
    ///
    /// # Fields
    ///
    /// * `method` - Name of the offending method
    /// * `expected` - URL of the document referenced by the first sequence point
    /// * `found` - URL of the first document that differs from `expected`
    #[error("Method '{method}' references multiple documents: '{expected}' and '{found}'")]
    MixedDocuments {
        /// Name of the method whose sequence points span multiple documents
        method: String,
        /// The document referenced by the first sequence point
        expected: String,
        /// The conflicting document
        found: String,
    },

    /// Recursion limit reached.
    ///
    /// Only reported when a maximum scope depth is configured, as [`crate::WriterConfig::strict`]
    /// does. The associated value is that limit.
    #[error("Reach the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),

    /// The writer failed earlier and can no longer produce a consistent artifact.
    #[error("Symbol writer is poisoned by a previous failure")]
    Poisoned,

    /// A value could not be encoded into the symbol file.
    ///
    /// The error includes the source location where the problem was detected.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what could not be encoded
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound write was attempted while patching an encoded buffer.
    #[error("Out of Bound write would have occurred!")]
    OutOfBounds,

    /// File I/O error.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// Failed to create or write the memory-mapped output file.
    #[error("Memory-mapped output failed - {message}")]
    WriteMmapFailed {
        /// Description of the failing operation
        message: String,
    },

    /// Failed to finalize the output file.
    #[error("Output finalization failed - {message}")]
    WriteFinalizationFailed {
        /// Description of the failing operation
        message: String,
    },
}
