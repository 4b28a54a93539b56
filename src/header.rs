use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    errors::{SmfError, SmfResult},
    traits::SmfParser,
    utils::{read_u16_be, read_u32_be, HEADER_LENGTH, HEADER_MAGIC},
};

/// SMF format word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SmfFormat {
    /// Format 0, one multi-channel track
    SingleTrack,
    /// Format 1, simultaneous tracks
    MultiTrack,
    /// Format 2, independent sequences
    MultiSong,
    Unknown(u16),
}

impl From<u16> for SmfFormat {
    fn from(value: u16) -> Self {
        match value {
            0 => SmfFormat::SingleTrack,
            1 => SmfFormat::MultiTrack,
            2 => SmfFormat::MultiSong,
            other => SmfFormat::Unknown(other),
        }
    }
}

/// Timing resolution. SMPTE timing is rejected while decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Division {
    TicksPerQuarter(u16),
}

/// The 14 byte `MThd` chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderChunk {
    pub magic: [u8; 4],
    /// Always 6 in SMF 1.0 files
    pub size: u32,
    pub format: u16,
    pub track_count: u16,
    pub division: u16,
}

impl HeaderChunk {
    pub fn format_kind(&self) -> SmfFormat {
        SmfFormat::from(self.format)
    }

    pub fn timing(&self) -> Division {
        Division::TicksPerQuarter(self.division)
    }
}

impl SmfParser for HeaderChunk {
    /// Read exactly 14 bytes of header starting at `offset`
    fn parse_at(data: &Bytes, offset: usize) -> SmfResult<Self> {
        let available = data.len().saturating_sub(offset);
        if available < HEADER_LENGTH {
            return Err(SmfError::MalformedHeader {
                reason: format!("need {} bytes, only {} available", HEADER_LENGTH, available),
                offset,
            });
        }

        let mut magic = [0u8; 4];
        magic.copy_from_slice(&data[offset..offset + 4]);
        if magic != HEADER_MAGIC {
            return Err(SmfError::MalformedHeader {
                reason: format!(
                    "expected 'MThd', found '{}'",
                    String::from_utf8_lossy(&magic)
                ),
                offset,
            });
        }

        let header = HeaderChunk {
            magic,
            size: read_u32_be(data, offset + 4)?,
            format: read_u16_be(data, offset + 8)?,
            track_count: read_u16_be(data, offset + 10)?,
            division: read_u16_be(data, offset + 12)?,
        };

        if header.division & 0x8000 != 0 {
            return Err(SmfError::UnsupportedTiming {
                division: header.division,
            });
        }

        debug!(
            format = header.format,
            tracks = header.track_count,
            division = header.division,
            "decoded MThd"
        );

        Ok(header)
    }
}
