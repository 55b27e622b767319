//! Tags recognized in the 0th IFD, see
//! https://exiftool.org/TagNames/EXIF.html

use std::fmt::Display;

#[cfg(feature = "json_dump")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tags of the 0th IFD (the main image) this crate knows by name.
///
/// Only [`ExifTag::DateTime`] is decoded; the others are recognized so
/// they can be named in diagnostics, and are otherwise skipped.
#[cfg_attr(feature = "json_dump", derive(Serialize, Deserialize))]
#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy)]
pub enum ExifTag {
    ImageWidth = 0x0000_0100,
    ImageHeight = 0x0000_0101,
    BitsPerSample = 0x0000_0102,
    Compression = 0x0000_0103,
    PhotometricInterpretation = 0x0000_0106,
    ImageDescription = 0x0000_010e,
    Make = 0x0000_010f,
    Model = 0x0000_0110,
    Orientation = 0x0000_0112,
    XResolution = 0x0000_011a,
    YResolution = 0x0000_011b,
    ResolutionUnit = 0x0000_0128,
    Software = 0x0000_0131,
    DateTime = 0x0000_0132,
    Artist = 0x0000_013b,
    HostComputer = 0x0000_013c,
    YCbCrPositioning = 0x0000_0213,
    Copyright = 0x0000_8298,

    // pointers to sub IFDs, which are not followed
    ExifOffset = 0x0000_8769,
    GPSInfo = 0x0000_8825,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unrecognized tag 0x{0:04x}")]
pub struct UnrecognizedTag(pub u16);

impl ExifTag {
    pub const fn code(self) -> u16 {
        self as u16
    }
}

impl Display for ExifTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s: &str = (*self).into();
        s.fmt(f)
    }
}

impl From<ExifTag> for &str {
    fn from(value: ExifTag) -> Self {
        match value {
            ExifTag::ImageWidth => "ImageWidth",
            ExifTag::ImageHeight => "ImageHeight",
            ExifTag::BitsPerSample => "BitsPerSample",
            ExifTag::Compression => "Compression",
            ExifTag::PhotometricInterpretation => "PhotometricInterpretation",
            ExifTag::ImageDescription => "ImageDescription",
            ExifTag::Make => "Make",
            ExifTag::Model => "Model",
            ExifTag::Orientation => "Orientation",
            ExifTag::XResolution => "XResolution",
            ExifTag::YResolution => "YResolution",
            ExifTag::ResolutionUnit => "ResolutionUnit",
            ExifTag::Software => "Software",
            ExifTag::DateTime => "DateTime",
            ExifTag::Artist => "Artist",
            ExifTag::HostComputer => "HostComputer",
            ExifTag::YCbCrPositioning => "YCbCrPositioning",
            ExifTag::Copyright => "Copyright",
            ExifTag::ExifOffset => "ExifOffset",
            ExifTag::GPSInfo => "GPSInfo",
        }
    }
}

impl TryFrom<u16> for ExifTag {
    type Error = UnrecognizedTag;

    fn try_from(v: u16) -> Result<Self, Self::Error> {
        use ExifTag::*;
        let tag = match v {
            x if x == ImageWidth.code() => ImageWidth,
            x if x == ImageHeight.code() => ImageHeight,
            x if x == BitsPerSample.code() => BitsPerSample,
            x if x == Compression.code() => Compression,
            x if x == PhotometricInterpretation.code() => PhotometricInterpretation,
            x if x == ImageDescription.code() => ImageDescription,
            x if x == Make.code() => Make,
            x if x == Model.code() => Model,
            x if x == Orientation.code() => Orientation,
            x if x == XResolution.code() => XResolution,
            x if x == YResolution.code() => YResolution,
            x if x == ResolutionUnit.code() => ResolutionUnit,
            x if x == Software.code() => Software,
            x if x == DateTime.code() => DateTime,
            x if x == Artist.code() => Artist,
            x if x == HostComputer.code() => HostComputer,
            x if x == YCbCrPositioning.code() => YCbCrPositioning,
            x if x == Copyright.code() => Copyright,
            x if x == ExifOffset.code() => ExifOffset,
            x if x == GPSInfo.code() => GPSInfo,
            o => return Err(UnrecognizedTag(o)),
        };

        Ok(tag)
    }
}
