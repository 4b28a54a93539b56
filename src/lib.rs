pub mod errors;
pub mod events;
pub mod header;
pub mod parser_config;
pub mod swap;
pub mod track;
pub mod traits;
pub mod utils;

pub use errors::*;
pub use events::*;
pub use header::*;
pub use parser_config::*;
pub use swap::*;
pub use track::*;
pub use traits::*;

use std::io::Read;

use bytes::Bytes;
use serde::Serialize;
use tracing::debug;

use crate::utils::HEADER_LENGTH;

/// A decoded Standard MIDI File.
///
/// Only obtainable by decoding, since the swap needs the original bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SmfFile {
    pub header: HeaderChunk,
    /// Track order is the identity used by [`swap_tracks`]
    pub tracks: Vec<TrackChunk>,
    /// The buffer the model was decoded from
    #[serde(skip)]
    raw: Bytes,
}

impl SmfFile {
    /// Parse SMF file from path with default configuration
    pub fn from_path(path: &str) -> SmfResult<Self> {
        Self::from_path_with_config(path, ParserConfig::default())
    }

    /// Parse SMF file from path with custom parser configuration
    pub fn from_path_with_config(path: &str, config: ParserConfig) -> SmfResult<Self> {
        let file_data = std::fs::read(path).map_err(|e| errors::io_error_at(path, e))?;
        Self::decode_with_config(Bytes::from(file_data), &config)
    }

    /// Read the whole stream into memory, then decode it
    pub fn from_reader<R: Read>(reader: R) -> SmfResult<Self> {
        Self::from_reader_with_config(reader, &ParserConfig::default())
    }

    pub fn from_reader_with_config<R: Read>(mut reader: R, config: &ParserConfig) -> SmfResult<Self> {
        let mut file_data = Vec::new();
        reader.read_to_end(&mut file_data)?;
        Self::decode_with_config(Bytes::from(file_data), config)
    }

    pub fn decode(data: Bytes) -> SmfResult<Self> {
        Self::decode_with_config(data, &ParserConfig::default())
    }

    /// Decode the header, then exactly `track_count` tracks back to back.
    ///
    /// The first error aborts decoding; there is no partial document.
    pub fn decode_with_config(data: Bytes, config: &ParserConfig) -> SmfResult<Self> {
        config.check_file_size(data.len())?;

        let header = HeaderChunk::parse_at(&data, 0)?;
        config.check_track_count(header.track_count)?;

        let mut tracks = Vec::with_capacity(header.track_count as usize);
        let mut offset = HEADER_LENGTH;
        for track_index in 0..header.track_count as usize {
            let track = read_track(&data, offset, track_index, config)?;
            offset += track.total_len();
            tracks.push(track);
        }

        if offset < data.len() {
            debug!(
                trailing = data.len() - offset,
                "ignoring bytes after the last announced track"
            );
        }

        Ok(SmfFile {
            header,
            tracks,
            raw: data,
        })
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// The original file bytes
    pub fn raw(&self) -> &Bytes {
        &self.raw
    }
}

impl SmfParser for SmfFile {
    fn parse_at(data: &Bytes, offset: usize) -> SmfResult<Self> {
        if offset > data.len() {
            return Err(SmfError::MalformedHeader {
                reason: format!("offset past the end of {} bytes", data.len()),
                offset,
            });
        }
        Self::decode(data.slice(offset..))
    }
}
