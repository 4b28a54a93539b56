//! SMF Event Definitions
//!
//! Closed set of event kinds found inside an `MTrk` chunk. Payloads are
//! zero-copy slices of the decoded file buffer.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::{SYSEX_ESCAPE, SYSEX_START};

/// Meta event sub-type (the byte following 0xFF)
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Hash)]
pub enum MetaKind {
    SequenceNumber,
    Text,
    CopyrightNotice,
    SequenceTrackName,
    InstrumentName,
    Lyric,
    Marker,
    CuePoint,
    ChannelPrefix,
    EndOfTrack,
    SetTempo,
    SmpteOffset,
    TimeSignature,
    KeySignature,
    SequencerSpecific,
    Other(u8),
}

impl From<u8> for MetaKind {
    fn from(value: u8) -> Self {
        match value {
            0x00 => MetaKind::SequenceNumber,
            0x01 => MetaKind::Text,
            0x02 => MetaKind::CopyrightNotice,
            0x03 => MetaKind::SequenceTrackName,
            0x04 => MetaKind::InstrumentName,
            0x05 => MetaKind::Lyric,
            0x06 => MetaKind::Marker,
            0x07 => MetaKind::CuePoint,
            0x20 => MetaKind::ChannelPrefix,
            0x2F => MetaKind::EndOfTrack,
            0x51 => MetaKind::SetTempo,
            0x54 => MetaKind::SmpteOffset,
            0x58 => MetaKind::TimeSignature,
            0x59 => MetaKind::KeySignature,
            0x7F => MetaKind::SequencerSpecific,
            other => MetaKind::Other(other),
        }
    }
}

impl MetaKind {
    pub fn to_byte(self) -> u8 {
        match self {
            MetaKind::SequenceNumber => 0x00,
            MetaKind::Text => 0x01,
            MetaKind::CopyrightNotice => 0x02,
            MetaKind::SequenceTrackName => 0x03,
            MetaKind::InstrumentName => 0x04,
            MetaKind::Lyric => 0x05,
            MetaKind::Marker => 0x06,
            MetaKind::CuePoint => 0x07,
            MetaKind::ChannelPrefix => 0x20,
            MetaKind::EndOfTrack => 0x2F,
            MetaKind::SetTempo => 0x51,
            MetaKind::SmpteOffset => 0x54,
            MetaKind::TimeSignature => 0x58,
            MetaKind::KeySignature => 0x59,
            MetaKind::SequencerSpecific => 0x7F,
            MetaKind::Other(value) => value,
        }
    }
}

/// System exclusive flavour, by its status byte
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Hash)]
pub enum SysExKind {
    /// 0xF0
    Start,
    /// 0xF7, continuation packet or escaped bytes
    Escape,
}

impl SysExKind {
    pub fn status(self) -> u8 {
        match self {
            SysExKind::Start => SYSEX_START,
            SysExKind::Escape => SYSEX_ESCAPE,
        }
    }
}

/// Channel voice message, selected by the high nibble of the status byte
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Hash)]
pub enum ChannelMessage {
    NoteOff,
    NoteOn,
    KeyPressure,
    Controller,
    ProgramChange,
    ChannelPressure,
    PitchBend,
}

impl ChannelMessage {
    /// Map a status high nibble (0x8..=0xE) to its message kind
    pub fn from_status_nibble(nibble: u8) -> Option<Self> {
        match nibble {
            0x8 => Some(ChannelMessage::NoteOff),
            0x9 => Some(ChannelMessage::NoteOn),
            0xA => Some(ChannelMessage::KeyPressure),
            0xB => Some(ChannelMessage::Controller),
            0xC => Some(ChannelMessage::ProgramChange),
            0xD => Some(ChannelMessage::ChannelPressure),
            0xE => Some(ChannelMessage::PitchBend),
            _ => None,
        }
    }

    pub fn status_nibble(self) -> u8 {
        match self {
            ChannelMessage::NoteOff => 0x8,
            ChannelMessage::NoteOn => 0x9,
            ChannelMessage::KeyPressure => 0xA,
            ChannelMessage::Controller => 0xB,
            ChannelMessage::ProgramChange => 0xC,
            ChannelMessage::ChannelPressure => 0xD,
            ChannelMessage::PitchBend => 0xE,
        }
    }

    /// Number of data bytes following the status byte
    pub fn data_len(self) -> usize {
        match self {
            ChannelMessage::NoteOff
            | ChannelMessage::NoteOn
            | ChannelMessage::KeyPressure
            | ChannelMessage::Controller
            | ChannelMessage::PitchBend => 2,
            ChannelMessage::ProgramChange | ChannelMessage::ChannelPressure => 1,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Hash)]
pub enum EventKind {
    Meta(MetaKind),
    SysEx(SysExKind),
    Channel { message: ChannelMessage, channel: u8 },
    /// System common/realtime status bytes have no place in a file; kept with
    /// a single data byte so the rest of the track still lines up.
    Unrecognized { status: u8 },
}

/// One decoded track event
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Event {
    /// Ticks since the previous event in the track
    pub delta: u32,
    /// Absolute position of the first delta-time byte in the file
    pub offset: usize,
    /// Raw bytes consumed, delta-time and status byte included
    pub length: usize,
    pub kind: EventKind,
    /// Data bytes for channel events, the declared body for meta and sysex
    pub payload: Bytes,
}

impl Event {
    /// Status byte a following event may reuse through running status.
    ///
    /// Only channel messages establish running status.
    pub fn status_byte(&self) -> Option<u8> {
        match self.kind {
            EventKind::Channel { message, channel } => {
                Some((message.status_nibble() << 4) | (channel & 0x0F))
            },
            _ => None,
        }
    }

    pub fn is_end_of_track(&self) -> bool {
        self.kind == EventKind::Meta(MetaKind::EndOfTrack)
    }

    pub fn channel(&self) -> Option<u8> {
        match self.kind {
            EventKind::Channel { channel, .. } => Some(channel),
            _ => None,
        }
    }

    /// Payload as text, for listing names and markers
    pub fn payload_text(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }

    /// Offset of the byte right after this event
    pub fn end(&self) -> usize {
        self.offset + self.length
    }
}
