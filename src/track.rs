use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{SmfError, SmfResult};
use crate::events::{parse_event, Event};
use crate::parser_config::ParserConfig;
use crate::traits::SmfParser;
use crate::utils::{read_u32_be, MAX_VLQ_BYTES, TRACK_HEADER_LENGTH, TRACK_MAGIC};

/// The 8 byte header in front of every track chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackHeader {
    pub magic: [u8; 4],
    /// Declared number of event bytes following the header
    pub length: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackChunk {
    pub header: TrackHeader,
    pub events: Vec<Event>,
}

impl TrackChunk {
    /// Bytes the chunk occupies in the file, header included
    pub fn total_len(&self) -> usize {
        TRACK_HEADER_LENGTH + self.header.length as usize
    }

    /// Sum of the decoded event lengths; equals the declared length
    pub fn events_len(&self) -> usize {
        self.events.iter().map(|e| e.length).sum()
    }

    pub fn end_of_track_present(&self) -> bool {
        self.events.last().is_some_and(Event::is_end_of_track)
    }

    /// Payload of the second event, conventionally the track name.
    ///
    /// Nothing checks that the event really is a name meta event.
    pub fn label(&self) -> Option<&Bytes> {
        self.events.get(1).map(|e| &e.payload)
    }
}

impl SmfParser for TrackChunk {
    fn parse_at(data: &Bytes, offset: usize) -> SmfResult<Self> {
        read_track(data, offset, 0, &ParserConfig::default())
    }
}

/// Read the track chunk starting at `offset`.
///
/// `track_index` is only used to label errors.
pub fn read_track(
    data: &Bytes,
    offset: usize,
    track_index: usize,
    config: &ParserConfig,
) -> SmfResult<TrackChunk> {
    let header = read_track_header(data, offset, track_index)?;

    let body_start = offset + TRACK_HEADER_LENGTH;
    let available = data.len().saturating_sub(body_start);
    if available < header.length as usize {
        return Err(SmfError::TruncatedTrack {
            track_index,
            declared: header.length,
            available,
        });
    }
    let body_end = body_start + header.length as usize;

    // Events may not read past the declared chunk end
    let chunk = data.slice(..body_end);

    let mut events: Vec<Event> = Vec::new();
    let mut pos = body_start;
    while pos < body_end {
        let event = parse_event(&chunk, pos, events.last())
            .map_err(|e| overrun_error(&chunk, body_end, e).in_track(track_index))?;
        pos += event.length;

        if pos > body_end {
            return Err(SmfError::TrackBoundaryViolation {
                track_index,
                offset: event.offset,
                reason: "unexpected end of track".to_string(),
            });
        }
        if event.is_end_of_track() && pos != body_end {
            return Err(SmfError::TrackBoundaryViolation {
                track_index,
                offset: event.offset,
                reason: format!(
                    "end-of-track before chunk boundary ({} bytes left)",
                    body_end - pos
                ),
            });
        }

        events.push(event);
        config.check_event_count(events.len())?;
    }

    let track = TrackChunk { header, events };

    if config.require_end_of_track && !track.end_of_track_present() {
        return Err(SmfError::TrackBoundaryViolation {
            track_index,
            offset: body_end,
            reason: "track does not end with end-of-track".to_string(),
        });
    }

    debug!(
        track = track_index,
        length = header.length,
        events = track.events.len(),
        "decoded MTrk"
    );

    Ok(track)
}

/// A VLQ still asking for more bytes when the chunk ends is an overrun of the
/// declared length, not a malformed quantity.
fn overrun_error(chunk: &[u8], body_end: usize, err: SmfError) -> SmfError {
    let SmfError::InvalidVariableLength { offset } = err else {
        return err;
    };
    match chunk.get(offset..body_end) {
        Some(tail) if tail.len() < MAX_VLQ_BYTES && tail.iter().all(|b| b & 0x80 != 0) => {
            SmfError::UnexpectedEndOfData {
                offset,
                needed: tail.len() + 1,
                available: tail.len(),
            }
        },
        _ => err,
    }
}

fn read_track_header(data: &Bytes, offset: usize, track_index: usize) -> SmfResult<TrackHeader> {
    let available = data.len().saturating_sub(offset);
    if available < TRACK_HEADER_LENGTH {
        return Err(SmfError::MalformedTrackHeader {
            track_index,
            found: format!("{} byte chunk header", available),
            offset,
        });
    }

    let mut magic = [0u8; 4];
    magic.copy_from_slice(&data[offset..offset + 4]);
    if magic != TRACK_MAGIC {
        return Err(SmfError::MalformedTrackHeader {
            track_index,
            found: String::from_utf8_lossy(&magic).to_string(),
            offset,
        });
    }

    Ok(TrackHeader {
        magic,
        length: read_u32_be(data, offset + 4)?,
    })
}
