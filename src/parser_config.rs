use crate::errors::{SmfError, SmfResult};

/// Limits and strictness settings applied while decoding a Standard MIDI File
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Maximum size of the whole input (bytes)
    pub max_file_size: usize,

    /// Maximum number of tracks the header may announce
    pub max_tracks: u16,

    /// Maximum number of events decoded per track
    pub max_events_per_track: usize,

    /// Reject tracks whose last event is not end-of-track
    pub require_end_of_track: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_file_size: 64 * 1024 * 1024,
            max_tracks: u16::MAX,
            max_events_per_track: 1_000_000,
            require_end_of_track: false,
        }
    }
}

impl ParserConfig {
    /// Small limits, and every track must close with end-of-track
    pub fn strict() -> Self {
        Self {
            max_file_size: 8 * 1024 * 1024,
            max_tracks: 256,
            max_events_per_track: 200_000,
            require_end_of_track: true,
        }
    }

    /// Large limits for huge arrangements
    pub fn permissive() -> Self {
        Self {
            max_file_size: 1024 * 1024 * 1024,
            max_tracks: u16::MAX,
            max_events_per_track: usize::MAX,
            require_end_of_track: false,
        }
    }

    /// Check if the input size is acceptable before decoding
    pub fn check_file_size(&self, size: usize) -> SmfResult<()> {
        if size > self.max_file_size {
            return Err(SmfError::DataSizeExceedsLimit {
                field: "file_size".to_string(),
                size,
                limit: self.max_file_size,
            });
        }
        Ok(())
    }

    /// Check the track count announced by the header
    pub fn check_track_count(&self, count: u16) -> SmfResult<()> {
        if count > self.max_tracks {
            return Err(SmfError::DataSizeExceedsLimit {
                field: "track_count".to_string(),
                size: count as usize,
                limit: self.max_tracks as usize,
            });
        }
        Ok(())
    }

    /// Check the number of events decoded so far in one track
    pub fn check_event_count(&self, count: usize) -> SmfResult<()> {
        if count > self.max_events_per_track {
            return Err(SmfError::DataSizeExceedsLimit {
                field: "events_per_track".to_string(),
                size: count,
                limit: self.max_events_per_track,
            });
        }
        Ok(())
    }
}
