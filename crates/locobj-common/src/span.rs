//! Span cursor for zero-copy decoding of object data.
//!
//! This module provides [`Span`], a forward-only view over a byte slice that
//! hands out borrowed sub-slices instead of copying, and the sentinel scan
//! used by the many `0xFF`-terminated lists in object files.

use zerocopy::{FromBytes, Immutable, KnownLayout, Unaligned};

use crate::{Error, Result};

/// Byte value used throughout object files for "no value" and list ends.
pub const SENTINEL: u8 = 0xFF;

/// Result of a sentinel scan.
///
/// `len` counts the bytes before the sentinel, `resume_at` is the absolute
/// position immediately after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentinelScan {
    pub len: usize,
    pub resume_at: usize,
}

/// A forward-only cursor over a borrowed byte buffer.
///
/// Every slice returned by a `Span` borrows from the original buffer, so
/// views decoded through it stay valid for exactly as long as the buffer.
///
/// # Example
///
/// ```
/// use locobj_common::Span;
///
/// let data = [0x02, 0x01, 0x02, 0x03, 0xFF, 0x09];
/// let mut span = Span::new(&data);
///
/// assert_eq!(span.read_u8().unwrap(), 0x02);
/// assert_eq!(span.read_terminated(0xFF).unwrap(), &[0x01, 0x02, 0x03, 0xFF]);
/// assert_eq!(span.remaining(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Span<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Span<'a> {
    /// Create a new span over a byte slice.
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Get the current position in the buffer.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Get the total length of the underlying buffer.
    #[inline]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Get the number of bytes remaining to read.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Check if there are no more bytes to read.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Shrink the remaining region from the front.
    ///
    /// Fails without moving if `count` exceeds what remains.
    #[inline]
    pub fn advance(&mut self, count: usize) -> Result<()> {
        if count > self.remaining() {
            return Err(Error::UnexpectedEof {
                needed: count,
                available: self.remaining(),
            });
        }
        self.position += count;
        Ok(())
    }

    /// Get the remaining bytes as a slice.
    #[inline]
    pub fn remaining_bytes(&self) -> &'a [u8] {
        &self.data[self.position..]
    }

    /// Peek at the next byte without advancing.
    #[inline]
    pub fn peek(&self) -> Result<u8> {
        self.peek_bytes(1).map(|b| b[0])
    }

    /// Peek at bytes without advancing the position.
    #[inline]
    pub fn peek_bytes(&self, count: usize) -> Result<&'a [u8]> {
        if self.remaining() < count {
            return Err(Error::UnexpectedEof {
                needed: count,
                available: self.remaining(),
            });
        }
        Ok(&self.data[self.position..self.position + count])
    }

    /// Read bytes and advance the position.
    #[inline]
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let bytes = self.peek_bytes(count)?;
        self.position += count;
        Ok(bytes)
    }

    /// Read a single byte.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        self.read_bytes(1).map(|b| b[0])
    }

    /// Read a little-endian u16.
    #[inline]
    pub fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// Read a little-endian u32.
    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read a struct by value using zerocopy.
    #[inline]
    pub fn read_struct<T: FromBytes>(&mut self) -> Result<T> {
        let size = std::mem::size_of::<T>();
        let bytes = self.read_bytes(size)?;
        T::read_from_bytes(bytes).map_err(|_| Error::UnexpectedEof {
            needed: size,
            available: bytes.len(),
        })
    }

    /// Borrow `count` consecutive records without copying.
    pub fn read_slice<T>(&mut self, count: usize) -> Result<&'a [T]>
    where
        T: FromBytes + Immutable + KnownLayout + Unaligned,
    {
        let size = count.saturating_mul(std::mem::size_of::<T>());
        let bytes = self.read_bytes(size)?;
        <[T]>::ref_from_bytes(bytes).map_err(|_| Error::UnexpectedEof {
            needed: size,
            available: bytes.len(),
        })
    }

    /// Look ahead for `sentinel` without advancing.
    ///
    /// A sentinel at the current position is an empty run. Reaching the end
    /// of the buffer first is an error.
    pub fn scan_to_sentinel(&self, sentinel: u8) -> Result<SentinelScan> {
        let rest = self.remaining_bytes();
        let len = memchr::memchr(sentinel, rest).ok_or(Error::MissingSentinel {
            sentinel,
            scanned: rest.len(),
        })?;
        Ok(SentinelScan {
            len,
            resume_at: self.position + len + 1,
        })
    }

    /// Read a sentinel-terminated run, sentinel included, and move past it.
    pub fn read_terminated(&mut self, sentinel: u8) -> Result<&'a [u8]> {
        let scan = self.scan_to_sentinel(sentinel)?;
        let run = &self.data[self.position..scan.resume_at];
        self.position = scan.resume_at;
        Ok(run)
    }

    /// Read fixed-size records until one whose first byte is `sentinel`.
    ///
    /// Only the sentinel byte of the terminating record is consumed. The
    /// returned view covers the records plus that byte.
    pub fn read_terminated_records(&mut self, record_size: usize, sentinel: u8) -> Result<&'a [u8]> {
        let mut lookahead = self.clone();
        loop {
            let tag = lookahead.peek().map_err(|_| Error::MissingSentinel {
                sentinel,
                scanned: lookahead.position - self.position,
            })?;
            if tag == sentinel {
                break;
            }
            lookahead.advance(record_size)?;
        }
        lookahead.advance(1)?;

        let run = &self.data[self.position..lookahead.position];
        self.position = lookahead.position;
        Ok(run)
    }

    /// Read a null-terminated byte string, returning it without the null.
    pub fn read_cstring(&mut self) -> Result<&'a [u8]> {
        let rest = self.remaining_bytes();
        let null_pos = memchr::memchr(0, rest).ok_or(Error::MissingNullTerminator)?;
        self.position += null_pos + 1;
        Ok(&rest[..null_pos])
    }
}

/// Cut a sentinel-terminated view at its first sentinel.
///
/// Views produced by [`Span::read_terminated`] always contain the sentinel;
/// a view without one is returned whole.
#[inline]
pub fn strip_sentinel(view: &[u8], sentinel: u8) -> &[u8] {
    match memchr::memchr(sentinel, view) {
        Some(end) => &view[..end],
        None => view,
    }
}
