//! SMF Test Data Generators and Builders
//!
//! Builder pattern implementations for generating Standard MIDI File bytes,
//! including deliberately broken files for error-path testing.

#![allow(dead_code)]

use bytes::{BufMut, BytesMut};
use smf_tool::utils::write_vlq;

/// Main builder for creating SMF test files with fluent API
#[derive(Debug, Clone)]
pub struct SmfBuilder {
    format: u16,
    division: u16,
    /// Overrides the announced track count when set
    track_count: Option<u16>,
    tracks: Vec<TrackBuilder>,
}

impl Default for SmfBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SmfBuilder {
    /// Format 1 at 480 ticks per quarter, no tracks
    pub fn new() -> Self {
        Self {
            format: 1,
            division: 480,
            track_count: None,
            tracks: Vec::new(),
        }
    }

    pub fn format(mut self, format: u16) -> Self {
        self.format = format;
        self
    }

    pub fn division(mut self, division: u16) -> Self {
        self.division = division;
        self
    }

    /// Announce a track count that differs from the tracks actually added
    pub fn announced_tracks(mut self, count: u16) -> Self {
        self.track_count = Some(count);
        self
    }

    /// Configure and append a track
    pub fn track<F>(mut self, f: F) -> Self
    where
        F: FnOnce(TrackBuilder) -> TrackBuilder,
    {
        self.tracks.push(f(TrackBuilder::new()));
        self
    }

    /// Build the header and every track chunk
    pub fn build_bytes(self) -> Vec<u8> {
        let mut buffer = BytesMut::new();
        buffer.put_slice(b"MThd");
        buffer.put_u32(6);
        buffer.put_u16(self.format);
        buffer.put_u16(self.track_count.unwrap_or(self.tracks.len() as u16));
        buffer.put_u16(self.division);

        for track in self.tracks {
            buffer.put_slice(&track.build_bytes());
        }
        buffer.to_vec()
    }
}

/// Builder for one `MTrk` chunk
#[derive(Debug, Clone, Default)]
pub struct TrackBuilder {
    body: BytesMut,
    /// Overrides the declared chunk length when set
    declared_length: Option<u32>,
}

impl TrackBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn delta(mut self, delta: u32) -> Self {
        write_vlq(&mut self.body, delta).unwrap();
        self
    }

    /// Meta event with an arbitrary type byte
    pub fn meta(mut self, delta: u32, meta_type: u8, payload: &[u8]) -> Self {
        self = self.delta(delta);
        self.body.put_u8(0xFF);
        self.body.put_u8(meta_type);
        write_vlq(&mut self.body, payload.len() as u32).unwrap();
        self.body.put_slice(payload);
        self
    }

    pub fn track_name(self, name: &str) -> Self {
        self.meta(0, 0x03, name.as_bytes())
    }

    /// Set tempo in microseconds per quarter note
    pub fn tempo(self, micros: u32) -> Self {
        self.meta(0, 0x51, &micros.to_be_bytes()[1..])
    }

    pub fn time_signature(self, numerator: u8, denominator_pow: u8) -> Self {
        self.meta(0, 0x58, &[numerator, denominator_pow, 24, 8])
    }

    pub fn end_of_track(self, delta: u32) -> Self {
        self.meta(delta, 0x2F, &[])
    }

    /// Channel message with its status byte
    pub fn channel(mut self, delta: u32, status: u8, data: &[u8]) -> Self {
        self = self.delta(delta);
        self.body.put_u8(status);
        self.body.put_slice(data);
        self
    }

    pub fn note_on(self, delta: u32, channel: u8, key: u8, velocity: u8) -> Self {
        self.channel(delta, 0x90 | channel, &[key, velocity])
    }

    pub fn note_off(self, delta: u32, channel: u8, key: u8, velocity: u8) -> Self {
        self.channel(delta, 0x80 | channel, &[key, velocity])
    }

    pub fn program_change(self, delta: u32, channel: u8, program: u8) -> Self {
        self.channel(delta, 0xC0 | channel, &[program])
    }

    pub fn pitch_bend(self, delta: u32, channel: u8, lsb: u8, msb: u8) -> Self {
        self.channel(delta, 0xE0 | channel, &[lsb, msb])
    }

    /// Data bytes only, relying on running status
    pub fn running(mut self, delta: u32, data: &[u8]) -> Self {
        self = self.delta(delta);
        self.body.put_slice(data);
        self
    }

    /// System exclusive message (0xF0) with a VLQ length
    pub fn sysex(mut self, delta: u32, payload: &[u8]) -> Self {
        self = self.delta(delta);
        self.body.put_u8(0xF0);
        write_vlq(&mut self.body, payload.len() as u32).unwrap();
        self.body.put_slice(payload);
        self
    }

    /// Raw bytes appended to the event stream as-is
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.body.put_slice(bytes);
        self
    }

    pub fn declared_length(mut self, length: u32) -> Self {
        self.declared_length = Some(length);
        self
    }

    /// Name, one note, end-of-track
    pub fn simple_melody(self, name: &str, channel: u8) -> Self {
        self.track_name(name)
            .program_change(0, channel, 0)
            .note_on(0, channel, 60, 100)
            .running(240, &[64, 100])
            .note_off(240, channel, 60, 0)
            .running(0, &[64, 0])
            .end_of_track(0)
    }

    pub fn body_len(&self) -> usize {
        self.body.len()
    }

    pub fn build_bytes(self) -> Vec<u8> {
        let mut buffer = BytesMut::new();
        buffer.put_slice(b"MTrk");
        buffer.put_u32(self.declared_length.unwrap_or(self.body.len() as u32));
        buffer.put_slice(&self.body);
        buffer.to_vec()
    }
}

/// Generators for common valid layouts
pub struct SmfGenerators;

impl SmfGenerators {
    /// Format 1, 480 ticks, three tracks holding only end-of-track
    pub fn three_empty_tracks() -> SmfBuilder {
        SmfBuilder::new()
            .track(|t| t.end_of_track(0))
            .track(|t| t.end_of_track(0))
            .track(|t| t.end_of_track(0))
    }

    /// Conductor track plus named instrument tracks of different sizes
    pub fn ensemble() -> SmfBuilder {
        SmfBuilder::new()
            .track(|t| {
                t.track_name("Conductor")
                    .tempo(500_000)
                    .time_signature(4, 2)
                    .end_of_track(0)
            })
            .track(|t| t.simple_melody("Piano", 0))
            .track(|t| {
                t.track_name("Strings")
                    .program_change(0, 1, 48)
                    .note_on(0, 1, 67, 90)
                    .pitch_bend(120, 1, 0x00, 0x40)
                    .running(120, &[0x10, 0x40])
                    .note_off(240, 1, 67, 0)
                    .end_of_track(0)
            })
            .track(|t| {
                t.track_name("Drums")
                    .note_on(0, 9, 36, 127)
                    .sysex(0, &[0x7E, 0x7F, 0x09, 0x01, 0xF7])
                    .end_of_track(0)
            })
    }
}

/// Generators for broken files
pub struct InvalidSmfGenerators;

impl InvalidSmfGenerators {
    pub fn invalid_signature() -> Vec<u8> {
        let mut bytes = SmfGenerators::three_empty_tracks().build_bytes();
        bytes[0..4].copy_from_slice(b"RIFF");
        bytes
    }

    pub fn truncated_header() -> Vec<u8> {
        b"MThd\x00\x00\x00\x06\x00".to_vec()
    }

    pub fn smpte_division() -> Vec<u8> {
        SmfGenerators::three_empty_tracks()
            .division(0x8000)
            .build_bytes()
    }

    pub fn invalid_track_signature() -> Vec<u8> {
        let mut bytes = SmfGenerators::three_empty_tracks().build_bytes();
        // Second chunk starts after the 14 byte header and a 12 byte track
        bytes[26..30].copy_from_slice(b"XTrk");
        bytes
    }

    pub fn truncated_track() -> Vec<u8> {
        let mut bytes = SmfGenerators::three_empty_tracks().build_bytes();
        bytes.truncate(bytes.len() - 2);
        bytes
    }

    /// Declared length one byte longer than the events inside
    pub fn length_mismatch() -> Vec<u8> {
        SmfBuilder::new()
            .track(|t| {
                t.program_change(0, 0, 1)
                    .end_of_track(0)
                    .raw(&[0x00])
            })
            .build_bytes()
    }

    /// Declared length shorter than the events inside
    pub fn overrunning_event() -> Vec<u8> {
        SmfBuilder::new()
            .track(|t| t.note_on(0, 0, 60, 100).end_of_track(0).declared_length(6))
            .build_bytes()
    }

    /// Declared length ends inside a two byte delta time
    pub fn length_cuts_delta() -> Vec<u8> {
        SmfBuilder::new()
            .track(|t| t.note_on(0, 0, 60, 100).end_of_track(480).declared_length(5))
            .build_bytes()
    }

    /// Declared length ends inside the length field of a text meta event
    pub fn length_cuts_meta_size() -> Vec<u8> {
        SmfBuilder::new()
            .track(|t| t.meta(0, 0x01, &[b'x'; 128]).end_of_track(0).declared_length(4))
            .build_bytes()
    }

    pub fn running_status_first() -> Vec<u8> {
        SmfBuilder::new()
            .track(|t| t.running(0, &[60, 100]).end_of_track(0))
            .build_bytes()
    }

    pub fn unterminated_delta() -> Vec<u8> {
        SmfBuilder::new()
            .track(|t| t.raw(&[0x80, 0x80, 0x80, 0x80, 0x00]).end_of_track(0))
            .build_bytes()
    }
}
