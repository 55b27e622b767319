use nom::bytes::complete::tag;

#[cfg(feature = "json_dump")]
use serde::{Deserialize, Serialize};

use crate::{
    error::{Mismatch, ParsingError},
    reader::{ByteOrder, ByteCursor},
};

/// "Exif" followed by two NUL bytes, as written by virtually every camera.
pub const EXIF_SIGNATURE: &[u8; 6] = b"Exif\0\0";

pub const LITTLE_ENDIAN_TAG: u16 = 0x4949;
pub const BIG_ENDIAN_TAG: u16 = 0x4d4d;
pub const TIFF_MAGIC: u16 = 0x002a;

/// Size of byte order marker + magic + 0th IFD offset.
pub const TIFF_HEADER_SIZE: usize = 8;

/// Checks the 6 byte EXIF signature at the start of `data`.
///
/// The comparison is case sensitive, only the leading "E" is upper case.
/// "Exif\0" followed by anything other than a second NUL is rejected.
pub fn check_exif_signature(data: &[u8]) -> bool {
    tag::<_, _, nom::error::Error<_>>(&EXIF_SIGNATURE[..])(data).is_ok()
}

/// TIFF Header
#[cfg_attr(feature = "json_dump", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TiffHeader {
    pub byte_order: ByteOrder,
    /// Offset of the 0th IFD, relative to the start of the header.
    pub ifd0_offset: u32,
}

impl TiffHeader {
    /// Parses a header at the cursor position, leaving the cursor right
    /// after it.
    pub(crate) fn parse(cursor: &mut ByteCursor<'_>) -> Result<TiffHeader, ParsingError> {
        let byte_order = Self::parse_byte_order(cursor)?;

        let magic = cursor.read_u16(byte_order)?;
        if magic != TIFF_MAGIC {
            return Err(Mismatch::TiffMagic(magic).into());
        }

        let ifd0_offset = cursor.read_u32(byte_order)?;

        Ok(TiffHeader {
            byte_order,
            ifd0_offset,
        })
    }

    fn parse_byte_order(cursor: &mut ByteCursor<'_>) -> Result<ByteOrder, ParsingError> {
        // Either byte order reads a palindrome the same way.
        match cursor.read_u16(ByteOrder::Big)? {
            LITTLE_ENDIAN_TAG => Ok(ByteOrder::Little),
            BIG_ENDIAN_TAG => Ok(ByteOrder::Big),
            other => Err(Mismatch::ByteOrder(other).into()),
        }
    }
}
