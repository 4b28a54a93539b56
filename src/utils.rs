use byteorder::{BigEndian, ByteOrder};
use bytes::{BufMut, BytesMut};

use crate::errors::{SmfError, SmfResult};

/// Header chunk magic bytes
pub const HEADER_MAGIC: [u8; 4] = *b"MThd";

/// Track chunk magic bytes
pub const TRACK_MAGIC: [u8; 4] = *b"MTrk";

/// Size of the whole header chunk, magic and size field included
pub const HEADER_LENGTH: usize = 14;

/// Size of a track chunk header (magic + length)
pub const TRACK_HEADER_LENGTH: usize = 8;

/// A variable-length quantity never spans more than 4 bytes
pub const MAX_VLQ_BYTES: usize = 4;

/// Largest value a 4 byte VLQ can hold
pub const MAX_VLQ_VALUE: u32 = 0x0FFF_FFFF;

/// Decode a variable-length quantity starting at `offset`.
///
/// Returns the value and the number of bytes consumed.
/// For example [0x81, 0x00] returns (128, 2)
pub fn read_vlq(data: &[u8], offset: usize) -> SmfResult<(u32, usize)> {
    let mut value: u32 = 0;
    for i in 0..MAX_VLQ_BYTES {
        let Some(&byte) = data.get(offset + i) else {
            break;
        };

        value = (value << 7) | u32::from(byte & 0x7F);
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }

    Err(SmfError::InvalidVariableLength { offset })
}

/// Number of bytes `value` takes once encoded
pub fn vlq_len(value: u32) -> usize {
    match value {
        0..=0x7F => 1,
        0x80..=0x3FFF => 2,
        0x4000..=0x1F_FFFF => 3,
        _ => 4,
    }
}

/// Encode `value` as a variable-length quantity
pub fn write_vlq(buffer: &mut BytesMut, value: u32) -> SmfResult<()> {
    if value > MAX_VLQ_VALUE {
        return Err(SmfError::DataSizeExceedsLimit {
            field: "variable_length_quantity".to_string(),
            size: value as usize,
            limit: MAX_VLQ_VALUE as usize,
        });
    }

    let len = vlq_len(value);
    for i in (0..len).rev() {
        let septet = ((value >> (7 * i)) & 0x7F) as u8;
        if i == 0 {
            buffer.put_u8(septet);
        } else {
            buffer.put_u8(septet | 0x80);
        }
    }
    Ok(())
}

/// Read a big-endian u16 at `offset`
pub fn read_u16_be(data: &[u8], offset: usize) -> SmfResult<u16> {
    Ok(BigEndian::read_u16(take(data, offset, 2)?))
}

/// Read a big-endian u32 at `offset`
pub fn read_u32_be(data: &[u8], offset: usize) -> SmfResult<u32> {
    Ok(BigEndian::read_u32(take(data, offset, 4)?))
}

/// Borrow `len` bytes at `offset`, failing instead of panicking when short
pub fn take(data: &[u8], offset: usize, len: usize) -> SmfResult<&[u8]> {
    let end = offset.checked_add(len).ok_or(SmfError::IntegerOverflow {
        operation: "byte range calculation".to_string(),
        details: format!("offset {} + length {}", offset, len),
    })?;

    data.get(offset..end).ok_or(SmfError::UnexpectedEndOfData {
        offset,
        needed: len,
        available: data.len().saturating_sub(offset),
    })
}

/// Detect if data is a Standard MIDI File by checking magic bytes
pub fn is_smf(data: &[u8]) -> bool {
    data.len() >= 4 && data[0..4] == HEADER_MAGIC
}
