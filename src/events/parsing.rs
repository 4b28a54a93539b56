//! SMF Event Parsing Module
//!
//! Decodes a single event at an offset. Running status comes in through the
//! `prev` argument, so the parser itself holds no state between calls.

use bytes::Bytes;
use tracing::trace;

use super::event::{ChannelMessage, Event, EventKind, MetaKind, SysExKind};
use super::{META_STATUS, SYSEX_ESCAPE, SYSEX_START};
use crate::errors::{SmfError, SmfResult};
use crate::utils::{read_vlq, take};

/// Decode the event starting at `offset`.
///
/// `data` should end at the enclosing chunk boundary: any read past its end
/// fails with [`SmfError::UnexpectedEndOfData`], which the track reader turns
/// into a boundary violation. `prev` is the previous event of the same track,
/// `None` for the first one.
pub fn parse_event(data: &Bytes, offset: usize, prev: Option<&Event>) -> SmfResult<Event> {
    let mut pos = offset;

    let (delta, delta_len) = read_vlq(data, pos)?;
    pos += delta_len;

    let first = read_byte(data, pos)?;
    let status = if first & 0x80 == 0 {
        // Running status, `first` is already the first data byte
        prev.and_then(Event::status_byte)
            .ok_or(SmfError::InvalidRunningStatus { offset: pos })?
    } else {
        pos += 1;
        first
    };

    let (kind, payload) = match status {
        META_STATUS => {
            let meta_type = read_byte(data, pos)?;
            pos += 1;
            let payload = read_sized_payload(data, &mut pos)?;
            (EventKind::Meta(MetaKind::from(meta_type)), payload)
        },
        SYSEX_START | SYSEX_ESCAPE => {
            let sysex = if status == SYSEX_START {
                SysExKind::Start
            } else {
                SysExKind::Escape
            };
            let payload = read_sized_payload(data, &mut pos)?;
            (EventKind::SysEx(sysex), payload)
        },
        _ => match ChannelMessage::from_status_nibble(status >> 4) {
            Some(message) => {
                let payload = read_payload(data, &mut pos, message.data_len())?;
                let channel = status & 0x0F;
                (EventKind::Channel { message, channel }, payload)
            },
            None => {
                let payload = read_payload(data, &mut pos, 1)?;
                (EventKind::Unrecognized { status }, payload)
            },
        },
    };

    let event = Event {
        delta,
        offset,
        length: pos - offset,
        kind,
        payload,
    };
    trace!(offset, length = event.length, kind = ?event.kind, "event");

    Ok(event)
}

fn read_byte(data: &[u8], pos: usize) -> SmfResult<u8> {
    Ok(take(data, pos, 1)?[0])
}

/// Read a VLQ length followed by that many bytes
fn read_sized_payload(data: &Bytes, pos: &mut usize) -> SmfResult<Bytes> {
    let (size, size_len) = read_vlq(data, *pos)?;
    *pos += size_len;
    read_payload(data, pos, size as usize)
}

fn read_payload(data: &Bytes, pos: &mut usize, len: usize) -> SmfResult<Bytes> {
    take(data, *pos, len)?;
    let payload = data.slice(*pos..*pos + len);
    *pos += len;
    Ok(payload)
}
