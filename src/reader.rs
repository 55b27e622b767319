use nom::number::{complete, Endianness};

#[cfg(feature = "json_dump")]
use serde::{Deserialize, Serialize};

use crate::Error;

/// Byte order of the multi-byte values inside a TIFF structure.
///
/// JPEG markers and segment lengths are always big-endian, regardless of
/// the byte order declared by an embedded TIFF header.
#[cfg_attr(feature = "json_dump", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    /// "II", least significant byte first.
    Little,
    /// "MM", most significant byte first.
    Big,
}

impl From<ByteOrder> for Endianness {
    fn from(value: ByteOrder) -> Self {
        match value {
            ByteOrder::Little => Endianness::Little,
            ByteOrder::Big => Endianness::Big,
        }
    }
}

/// Reads an `u16` starting at `offset`.
pub fn read_u16(buf: &[u8], offset: usize, order: ByteOrder) -> crate::Result<u16> {
    let input = checked_slice(buf, offset, 2)?;
    let (_, v) = complete::u16::<_, nom::error::Error<_>>(order.into())(input)?;
    Ok(v)
}

/// Reads an `u32` starting at `offset`.
pub fn read_u32(buf: &[u8], offset: usize, order: ByteOrder) -> crate::Result<u32> {
    let input = checked_slice(buf, offset, 4)?;
    let (_, v) = complete::u32::<_, nom::error::Error<_>>(order.into())(input)?;
    Ok(v)
}

/// Returns `buf[offset..offset + len]`, or [`Error::OutOfRange`].
pub(crate) fn checked_slice(buf: &[u8], offset: usize, len: usize) -> crate::Result<&[u8]> {
    offset
        .checked_add(len)
        .and_then(|end| buf.get(offset..end))
        .ok_or_else(|| out_of_range(buf, offset, len))
}

fn out_of_range(buf: &[u8], offset: usize, len: usize) -> Error {
    Error::OutOfRange {
        offset,
        len,
        buf_len: buf.len(),
    }
}

/// A read position over an immutable buffer.
///
/// Every read is bounds-checked against the whole buffer, so a cursor can
/// be cloned and moved around freely without invalidating anything.
///
/// ```rust
/// use jpeg_exif_date::*;
/// use std::io::*;
///
/// let data = [0x00, 0x2a, 0xff];
/// let mut bytes = ByteCursor::new(&data);
/// assert_eq!(bytes.read_u16(ByteOrder::Big).unwrap(), 0x2a);
/// assert!(bytes.read_u16(ByteOrder::Big).is_err());
///
/// let mut io = Cursor::new(&data[..]);
/// let mut first = [0u8; 1];
/// io.read_exact(&mut first).unwrap();
/// assert_eq!(first, [0x00]);
/// ```
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(buf: &'a [u8]) -> ByteCursor<'a> {
        ByteCursor::at(buf, 0)
    }

    /// Create a cursor positioned at `pos`. `pos` may lie beyond the end of
    /// `buf`, in which case the next read fails with `OutOfRange`.
    pub fn at(buf: &'a [u8], pos: usize) -> ByteCursor<'a> {
        ByteCursor { buf, pos }
    }

    /// Absolute position within the underlying buffer.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// The whole underlying buffer, not just the unread part.
    pub fn buf(&self) -> &'a [u8] {
        self.buf
    }

    pub fn advance(&mut self, n: usize) {
        self.pos = self.pos.saturating_add(n);
    }

    /// Returns the next `n` bytes without consuming them.
    pub fn peek(&self, n: usize) -> crate::Result<&'a [u8]> {
        checked_slice(self.buf, self.pos, n)
    }

    pub fn take(&mut self, n: usize) -> crate::Result<&'a [u8]> {
        let data = self.peek(n)?;
        self.pos += n;
        Ok(data)
    }

    pub fn read_u16(&mut self, order: ByteOrder) -> crate::Result<u16> {
        let v = read_u16(self.buf, self.pos, order)?;
        self.pos += 2;
        Ok(v)
    }

    pub fn read_u32(&mut self, order: ByteOrder) -> crate::Result<u32> {
        let v = read_u32(self.buf, self.pos, order)?;
        self.pos += 4;
        Ok(v)
    }
}
