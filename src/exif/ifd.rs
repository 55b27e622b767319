#[cfg(feature = "json_dump")]
use serde::{Deserialize, Serialize};

use crate::reader::{ByteOrder, ByteCursor};

use super::ExifTag;

pub const IFD_ENTRY_SIZE: usize = 12;

/// One raw 12-byte record of an Image File Directory.
///
/// See https://www.media.mit.edu/pia/Research/deepview/exif.html
#[cfg_attr(feature = "json_dump", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IfdEntry {
    pub tag: u16,
    /// TIFF data type, see [`DataFormat`].
    pub data_type: u16,
    /// Number of components (not bytes).
    pub count: u32,
    /// The value itself if it fits in 4 bytes, otherwise the offset of the
    /// value relative to the start of the TIFF header.
    pub value_or_offset: u32,
}

impl IfdEntry {
    pub(crate) fn parse(cursor: &mut ByteCursor<'_>, order: ByteOrder) -> crate::Result<IfdEntry> {
        Ok(IfdEntry {
            tag: cursor.read_u16(order)?,
            data_type: cursor.read_u16(order)?,
            count: cursor.read_u32(order)?,
            value_or_offset: cursor.read_u32(order)?,
        })
    }

    /// `None` if the tag is not one of [`ExifTag`].
    pub fn exif_tag(&self) -> Option<ExifTag> {
        ExifTag::try_from(self.tag).ok()
    }

    pub fn data_format(&self) -> Option<DataFormat> {
        DataFormat::try_from(self.data_type).ok()
    }

    /// Size of the value in bytes, `None` for unknown data types.
    pub fn data_size(&self) -> Option<u64> {
        self.data_format()
            .map(|f| f.component_size() as u64 * u64::from(self.count))
    }

    /// Whether the value is stored in `value_or_offset` itself.
    pub fn is_inline(&self) -> bool {
        self.data_size().is_some_and(|size| size <= 4)
    }

    /// Absolute position of an offset-stored value, given the absolute
    /// position of the TIFF header it is relative to.
    pub fn value_position(&self, tiff_base: usize) -> Option<usize> {
        tiff_base.checked_add(self.value_or_offset as usize)
    }
}

/// TIFF field types.
#[cfg_attr(feature = "json_dump", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataFormat {
    U8 = 1,
    Text = 2,
    U16 = 3,
    U32 = 4,
    URational = 5,
    I8 = 6,
    Undefined = 7,
    I16 = 8,
    I32 = 9,
    IRational = 10,
    F32 = 11,
    F64 = 12,
}

impl DataFormat {
    pub fn component_size(&self) -> usize {
        match self {
            Self::U8 | Self::I8 | Self::Text | Self::Undefined => 1,
            Self::U16 | Self::I16 => 2,
            Self::U32 | Self::I32 | Self::F32 => 4,
            Self::URational | Self::IRational | Self::F64 => 8,
        }
    }
}

impl TryFrom<u16> for DataFormat {
    type Error = u16;

    fn try_from(v: u16) -> Result<Self, Self::Error> {
        let f = match v {
            1 => Self::U8,
            2 => Self::Text,
            3 => Self::U16,
            4 => Self::U32,
            5 => Self::URational,
            6 => Self::I8,
            7 => Self::Undefined,
            8 => Self::I16,
            9 => Self::I32,
            10 => Self::IRational,
            11 => Self::F32,
            12 => Self::F64,
            o => return Err(o),
        };
        Ok(f)
    }
}

/// Reads the entry count and the entries of an IFD at the cursor position.
///
/// The whole entry array is bounds checked before anything is read.
#[tracing::instrument(skip(cursor))]
pub(crate) fn parse_ifd_entries(
    cursor: &mut ByteCursor<'_>,
    order: ByteOrder,
) -> crate::Result<Vec<IfdEntry>> {
    let num = cursor.read_u16(order)?;
    let size = num as usize * IFD_ENTRY_SIZE;
    cursor.peek(size)?;

    tracing::debug!(num, "IFD entries");
    (0..num).map(|_| IfdEntry::parse(cursor, order)).collect()
}
