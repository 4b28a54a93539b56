//! Track reordering by byte-range transplant.
//!
//! Track chunks are copied verbatim from the original buffer, so anything the
//! decoder does not model survives the swap untouched.

use std::io::{Read, Write};
use std::ops::Range;
use std::path::{Path, PathBuf};

use bytes::{BufMut, Bytes, BytesMut};
use tracing::{debug, info};

use crate::errors::{io_error_at, SmfError, SmfResult};
use crate::utils::{take, HEADER_LENGTH};
use crate::parser_config::ParserConfig;
use crate::SmfFile;

/// Byte range of every track chunk (header included) in the original buffer
pub fn track_ranges(smf: &SmfFile) -> Vec<Range<usize>> {
    let mut start = HEADER_LENGTH;
    smf.tracks
        .iter()
        .map(|track| {
            let range = start..start + track.total_len();
            start = range.end;
            range
        })
        .collect()
}

fn check_index(index: usize, track_count: usize) -> SmfResult<()> {
    if index >= track_count {
        return Err(SmfError::InvalidTrackIndex { index, track_count });
    }
    Ok(())
}

/// Rebuild `buf` with the chunks of tracks `a` and `b` exchanged.
///
/// `smf` must be the decoding of `buf`. Header, other tracks and any bytes
/// after the last track are copied unchanged; `a == b` reproduces `buf`.
pub fn swap_track_bytes(buf: &[u8], smf: &SmfFile, a: usize, b: usize) -> SmfResult<BytesMut> {
    let track_count = smf.track_count();
    check_index(a, track_count)?;
    check_index(b, track_count)?;

    let mut ranges = track_ranges(smf);
    debug!(a, b, a_range = ?ranges[a], b_range = ?ranges[b], "swapping track chunks");
    ranges.swap(a, b);

    let mut out = BytesMut::with_capacity(buf.len());
    out.put_slice(take(buf, 0, HEADER_LENGTH)?);
    let mut tracks_end = HEADER_LENGTH;
    for range in &ranges {
        out.put_slice(take(buf, range.start, range.len())?);
        tracks_end = tracks_end.max(range.end);
    }
    out.put_slice(&buf[tracks_end..]);

    Ok(out)
}

/// Swap two tracks of an already decoded file
pub fn swap_tracks(smf: &SmfFile, a: usize, b: usize) -> SmfResult<Bytes> {
    Ok(swap_track_bytes(smf.raw(), smf, a, b)?.freeze())
}

/// Read a whole file from `src`, swap tracks `a` and `b`, write it to `dst`.
///
/// Nothing is written unless decoding and the swap succeed.
pub fn swap_track<W: Write, R: Read>(dst: W, src: R, a: usize, b: usize) -> SmfResult<()> {
    swap_track_with_config(dst, src, a, b, &ParserConfig::default())
}

/// [`swap_track`] with custom decoding limits
pub fn swap_track_with_config<W: Write, R: Read>(
    mut dst: W,
    src: R,
    a: usize,
    b: usize,
    config: &ParserConfig,
) -> SmfResult<()> {
    let smf = SmfFile::from_reader_with_config(src, config)?;
    let out = swap_tracks(&smf, a, b)?;

    dst.write_all(&out)
        .and_then(|_| dst.flush())
        .map_err(|e| SmfError::FileWriteError {
            path: "<stream>".to_string(),
            reason: e.to_string(),
        })
}

/// Swap tracks of the file at `input` into `output`.
///
/// Output goes to a temporary file next to `output` that is only renamed into
/// place once fully written.
pub fn swap_track_file(input: &Path, output: &Path, a: usize, b: usize) -> SmfResult<()> {
    swap_track_file_with_config(input, output, a, b, &ParserConfig::default())
}

/// [`swap_track_file`] with custom decoding limits
pub fn swap_track_file_with_config(
    input: &Path,
    output: &Path,
    a: usize,
    b: usize,
    config: &ParserConfig,
) -> SmfResult<()> {
    let input_name = input.display().to_string();
    let output_name = output.display().to_string();

    let file_data = std::fs::read(input).map_err(|e| io_error_at(&input_name, e))?;
    let smf = SmfFile::decode_with_config(Bytes::from(file_data), config)?;
    let out = swap_tracks(&smf, a, b)?;

    let write_error = |e: std::io::Error| SmfError::FileWriteError {
        path: output_name.clone(),
        reason: e.to_string(),
    };

    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = tempfile::NamedTempFile::new_in(dir).map_err(write_error)?;
    staged.write_all(&out).map_err(write_error)?;
    staged.flush().map_err(write_error)?;
    staged.persist(output).map_err(|e| write_error(e.error))?;

    info!(input = %input_name, output = %output_name, a, b, "wrote swapped file");
    Ok(())
}

/// `<dir>/<stem>_swap_<a>_<b><.ext>` next to `input`
pub fn default_output_path(input: &Path, a: usize, b: usize) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut name = format!("{}_swap_{}_{}", stem, a, b);
    if let Some(ext) = input.extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }
    input.with_file_name(name)
}
