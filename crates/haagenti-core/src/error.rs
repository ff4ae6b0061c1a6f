//! Error types for compression operations.

use thiserror::Error;

/// Result type alias for compression operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Compression error types.
#[derive(Debug, Error)]
pub enum Error {
    /// Compressed input is structurally impossible.
    #[error("corrupted data: {message}")]
    CorruptedData { message: String },

    /// The stream ended before the container's own claims were satisfied.
    #[error("truncated stream: {section} ended after {bytes_read} bytes")]
    TruncatedStream {
        section: &'static str,
        bytes_read: u64,
    },

    /// The encode pass produced a token the Huffman tree does not know.
    #[error("no codeword for symbol 0x{symbol:02x} with run length {run_length}")]
    CodewordNotFound { symbol: u8, run_length: u32 },

    /// Input cannot be described by the fixed-width container fields.
    #[error("{what} is {value}, container limit is {max}")]
    LimitExceeded {
        what: &'static str,
        value: u64,
        max: u64,
    },

    /// Buffer too small for output.
    #[error("buffer too small: need {required} bytes, got {provided}")]
    BufferTooSmall { required: usize, provided: usize },

    /// I/O error from underlying stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a corrupted data error.
    pub fn corrupted(message: impl Into<String>) -> Self {
        Error::CorruptedData {
            message: message.into(),
        }
    }

    /// Create a truncated stream error for the named section.
    pub fn truncated(section: &'static str, bytes_read: u64) -> Self {
        Error::TruncatedStream {
            section,
            bytes_read,
        }
    }

    /// Create a missing codeword error.
    pub fn codeword_not_found(symbol: u8, run_length: u32) -> Self {
        Error::CodewordNotFound { symbol, run_length }
    }

    /// Create a container limit error.
    pub fn limit_exceeded(what: &'static str, value: u64, max: u64) -> Self {
        Error::LimitExceeded { what, value, max }
    }

    /// Create a buffer too small error.
    pub fn buffer_too_small(required: usize, provided: usize) -> Self {
        Error::BufferTooSmall { required, provided }
    }

    /// Classify an I/O error raised while reading `section`.
    ///
    /// An early end of file becomes [`Error::TruncatedStream`]; anything else
    /// stays an I/O failure.
    pub fn from_read(err: std::io::Error, section: &'static str, bytes_read: u64) -> Self {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            Error::truncated(section, bytes_read)
        } else {
            Error::Io(err)
        }
    }

    /// Get error category for log fields.
    pub fn category(&self) -> &'static str {
        match self {
            Error::CorruptedData { .. } => "corrupted_data",
            Error::TruncatedStream { .. } => "truncated_stream",
            Error::CodewordNotFound { .. } => "codeword_not_found",
            Error::LimitExceeded { .. } => "limit_exceeded",
            Error::BufferTooSmall { .. } => "buffer_too_small",
            Error::Io(_) => "io_error",
        }
    }
}
