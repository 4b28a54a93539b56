use std::fmt;
use thiserror::Error;

/// Error type for Standard MIDI File decoding and track swapping
///
/// Every variant carries enough context (byte offset, track index or path) to
/// locate the problem in the input. Decoding never skips over a bad chunk, so
/// any of these aborts the current operation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SmfError {
    // ========== I/O ERRORS (1000-1099) ==========
    /// File not found at the specified path
    #[error("File not found: {path}")]
    FileNotFound {
        path: String,
        io_kind: Option<std::io::ErrorKind>,
    },

    /// Error reading file contents
    #[error("Failed to read file {path}: {reason}")]
    FileReadError { path: String, reason: String },

    /// Permission denied when accessing file
    #[error("Permission denied accessing file: {path}")]
    PermissionDenied { path: String },

    /// Error writing or finalizing an output file
    #[error("Failed to write file {path}: {reason}")]
    FileWriteError { path: String, reason: String },

    // ========== FORMAT ERRORS (2000-2099) ==========
    /// Missing or short header chunk, or wrong `MThd` magic
    #[error("Malformed header: {reason} at offset {offset}")]
    MalformedHeader { reason: String, offset: usize },

    /// Division field has the SMPTE bit set
    #[error("Unsupported SMPTE timing (division 0x{division:04X})")]
    UnsupportedTiming { division: u16 },

    /// Track chunk does not start with `MTrk`
    #[error("Malformed track header for track {track_index}: expected 'MTrk', found '{found}' at offset {offset}")]
    MalformedTrackHeader {
        track_index: usize,
        found: String,
        offset: usize,
    },

    /// Fewer bytes available than the track chunk declares
    #[error("Truncated track {track_index}: declared {declared} bytes, only {available} available")]
    TruncatedTrack {
        track_index: usize,
        declared: u32,
        available: usize,
    },

    // ========== DATA PARSING ERRORS (3000-3099) ==========
    /// Variable-length quantity not terminated within 4 bytes
    #[error("Invalid variable-length quantity at offset {offset}")]
    InvalidVariableLength { offset: usize },

    /// Status byte omitted without a preceding channel event
    #[error("Invalid running status at offset {offset}")]
    InvalidRunningStatus { offset: usize },

    /// Event data runs past the end of the available buffer
    #[error("Unexpected end of data at offset {offset}: needed {needed} bytes, only {available} available")]
    UnexpectedEndOfData {
        offset: usize,
        needed: usize,
        available: usize,
    },

    // ========== TRACK STRUCTURE ERRORS (4000-4099) ==========
    /// Events overrun the declared chunk length, or end-of-track is misplaced
    #[error("Track boundary violation in track {track_index} at offset {offset}: {reason}")]
    TrackBoundaryViolation {
        track_index: usize,
        offset: usize,
        reason: String,
    },

    // ========== SWAP ERRORS (5000-5099) ==========
    /// Swap index outside of the decoded track list
    #[error("Invalid track index {index}: file has {track_count} tracks")]
    InvalidTrackIndex { index: usize, track_count: usize },

    // ========== RESOURCE ERRORS (6000-6099) ==========
    /// Data size exceeds configured limits
    #[error("Data size exceeds limit for {field}: {size} (limit: {limit})")]
    DataSizeExceedsLimit {
        field: String,
        size: usize,
        limit: usize,
    },

    /// Integer overflow in offset or length calculations
    #[error("Integer overflow in {operation}: {details}")]
    IntegerOverflow { operation: String, details: String },
}

impl SmfError {
    /// Get the error code for machine-readable processing
    pub fn code(&self) -> u16 {
        match self {
            Self::FileNotFound { .. } => 1001,
            Self::FileReadError { .. } => 1002,
            Self::PermissionDenied { .. } => 1003,
            Self::FileWriteError { .. } => 1004,

            Self::MalformedHeader { .. } => 2001,
            Self::UnsupportedTiming { .. } => 2002,
            Self::MalformedTrackHeader { .. } => 2003,
            Self::TruncatedTrack { .. } => 2004,

            Self::InvalidVariableLength { .. } => 3001,
            Self::InvalidRunningStatus { .. } => 3002,
            Self::UnexpectedEndOfData { .. } => 3003,

            Self::TrackBoundaryViolation { .. } => 4001,

            Self::InvalidTrackIndex { .. } => 5001,

            Self::DataSizeExceedsLimit { .. } => 6001,
            Self::IntegerOverflow { .. } => 6002,
        }
    }

    /// Get the error category for grouping related errors
    pub fn category(&self) -> ErrorCategory {
        match self.code() {
            1000..=1099 => ErrorCategory::IO,
            2000..=2099 => ErrorCategory::Format,
            3000..=3099 => ErrorCategory::DataParsing,
            4000..=4099 => ErrorCategory::TrackStructure,
            5000..=5099 => ErrorCategory::Swap,
            6000..=6099 => ErrorCategory::Resource,
            _ => ErrorCategory::Unknown,
        }
    }

    /// Whether decoding could continue past this error.
    ///
    /// Always false: a malformed chunk poisons every offset after it.
    pub fn is_recoverable(&self) -> bool {
        false
    }

    /// Get suggested action for handling this error
    pub fn suggested_action(&self) -> &'static str {
        match self {
            Self::FileNotFound { .. } => "Check file path and ensure file exists",
            Self::PermissionDenied { .. } => "Check file permissions and user access rights",
            Self::MalformedHeader { .. } => "Verify this is a valid Standard MIDI File",
            Self::UnsupportedTiming { .. } => "Convert the file to ticks-per-quarter-note timing",
            Self::TruncatedTrack { .. } | Self::UnexpectedEndOfData { .. } => {
                "File appears to be corrupted or truncated"
            },
            Self::InvalidTrackIndex { .. } => "List the tracks and pick indices within range",
            _ => "Check file integrity and Standard MIDI File compliance",
        }
    }

    /// Attach a track index to errors raised while reading that track's events.
    ///
    /// Running out of data inside a chunk means the events overran the
    /// declared length, which is reported as a boundary violation.
    pub fn in_track(self, track_index: usize) -> Self {
        match self {
            Self::UnexpectedEndOfData { offset, needed, available } => {
                Self::TrackBoundaryViolation {
                    track_index,
                    offset,
                    reason: format!(
                        "event overruns chunk (needed {} bytes, {} left)",
                        needed, available
                    ),
                }
            },
            other => other,
        }
    }
}

/// Error categories for grouping related error types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    IO,
    Format,
    DataParsing,
    TrackStructure,
    Swap,
    Resource,
    Unknown,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IO => write!(f, "I/O"),
            Self::Format => write!(f, "Format"),
            Self::DataParsing => write!(f, "Data Parsing"),
            Self::TrackStructure => write!(f, "Track Structure"),
            Self::Swap => write!(f, "Swap"),
            Self::Resource => write!(f, "Resource"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Result type alias for SMF operations
pub type SmfResult<T> = Result<T, SmfError>;

impl From<std::io::Error> for SmfError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => SmfError::FileNotFound {
                path: "unknown".to_string(),
                io_kind: Some(err.kind()),
            },
            std::io::ErrorKind::PermissionDenied => SmfError::PermissionDenied {
                path: "unknown".to_string(),
            },
            _ => SmfError::FileReadError {
                path: "unknown".to_string(),
                reason: err.to_string(),
            },
        }
    }
}

/// Map an I/O error on `path` to the matching error variant
pub(crate) fn io_error_at(path: &str, err: std::io::Error) -> SmfError {
    match err.kind() {
        std::io::ErrorKind::NotFound => SmfError::FileNotFound {
            path: path.to_string(),
            io_kind: Some(err.kind()),
        },
        std::io::ErrorKind::PermissionDenied => SmfError::PermissionDenied {
            path: path.to_string(),
        },
        _ => SmfError::FileReadError {
            path: path.to_string(),
            reason: err.to_string(),
        },
    }
}
