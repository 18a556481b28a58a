//! Chunk encodings used by object files.

use locobj_common::Span;

use crate::{Error, Result};

/// How an object payload is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u8)]
pub enum ChunkEncoding {
    /// Stored as is.
    Uncompressed = 0,
    /// Run-length encoded.
    RunLengthSingle = 1,
    /// Run-length encoded, then back-reference compressed.
    RunLengthMulti = 2,
    /// Each byte rotated by a cycling amount.
    Rotate = 3,
}

impl TryFrom<u8> for ChunkEncoding {
    type Error = u8;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Uncompressed),
            1 => Ok(Self::RunLengthSingle),
            2 => Ok(Self::RunLengthMulti),
            3 => Ok(Self::Rotate),
            other => Err(other),
        }
    }
}

/// Decode a payload stored with `encoding`.
pub fn decode_chunk(encoding: ChunkEncoding, data: &[u8]) -> Result<Vec<u8>> {
    match encoding {
        ChunkEncoding::Uncompressed => Ok(data.to_vec()),
        ChunkEncoding::RunLengthSingle => decode_run_length_single(data),
        ChunkEncoding::RunLengthMulti => decode_run_length_multi(data),
        ChunkEncoding::Rotate => Ok(decode_rotate(data)),
    }
}

/// Expand run-length encoding.
///
/// A control byte with the high bit set repeats the following byte
/// `257 - control` times; otherwise the next `control + 1` bytes are
/// copied literally.
pub fn decode_run_length_single(data: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::with_capacity(data.len() * 2);
    let mut span = Span::new(data);

    while !span.is_empty() {
        let control = span.read_u8()?;
        if control & 0x80 != 0 {
            let value = span.read_u8()?;
            let count = 257 - control as usize;
            output.resize(output.len() + count, value);
        } else {
            output.extend_from_slice(span.read_bytes(control as usize + 1)?);
        }
    }

    Ok(output)
}

/// Expand run-length encoding followed by back-reference compression.
///
/// In the second stage `0xFF` escapes one literal byte; any other code
/// copies `(code & 7) + 1` bytes starting `32 - (code >> 3)` bytes back.
pub fn decode_run_length_multi(data: &[u8]) -> Result<Vec<u8>> {
    let expanded = decode_run_length_single(data)?;
    let mut output = Vec::with_capacity(expanded.len() * 2);
    let mut span = Span::new(&expanded);

    while !span.is_empty() {
        let code = span.read_u8()?;
        if code == 0xFF {
            output.push(span.read_u8()?);
            continue;
        }

        let count = (code & 7) as usize + 1;
        let distance = 32 - (code >> 3) as usize;
        if distance > output.len() {
            return Err(Error::BackReference {
                distance,
                position: output.len(),
            });
        }

        // Byte at a time: the source may overlap what is being written.
        let start = output.len() - distance;
        for i in 0..count {
            let byte = output[start + i];
            output.push(byte);
        }
    }

    Ok(output)
}

/// Undo the rotate encoding: byte `i` is rotated right by 1, 3, 5, 7, 1, ...
pub fn decode_rotate(data: &[u8]) -> Vec<u8> {
    let mut code = 1u32;
    data.iter()
        .map(|&byte| {
            let decoded = byte.rotate_right(code);
            code = (code + 2) & 7;
            decoded
        })
        .collect()
}
