//! SMF Events Module
//!
//! Event model for the contents of a track chunk and the single-event decoder
//! that walks a chunk with running-status resolution.

pub mod event;
pub mod parsing;

pub use event::{ChannelMessage, Event, EventKind, MetaKind, SysExKind};
pub use parsing::parse_event;

/// Status byte introducing a meta event
pub const META_STATUS: u8 = 0xFF;

/// Status byte opening a system exclusive message
pub const SYSEX_START: u8 = 0xF0;

/// Status byte for a sysex continuation or escaped message
pub const SYSEX_ESCAPE: u8 = 0xF7;
