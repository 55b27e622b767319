//! jpeg-exif-date recovers the capture date/time of a JPEG photo from the
//! EXIF data stored in its APP1 segment, written in pure Rust with
//! [nom](https://github.com/rust-bakery/nom).
//!
//! Only the leading part of a file is looked at: the SOI marker, an
//! optional APP0 (JFIF) segment and an optional APP1 (EXIF) segment right
//! after it. Inside APP1 the TIFF header is decoded (both byte orders are
//! supported), the 0th IFD is walked, and its DateTime (`0x0132`) entry is
//! decoded.
//!
//! ## Key Features
//!
//! - Never panics and never aborts on malformed EXIF data. Decoding of a
//!   segment stops at the first [`Mismatch`] and whatever was extracted so
//!   far is kept, so callers can tell "no DateTime tag" apart from "broken
//!   DateTime field" without scraping log output.
//!
//! - Every read is bounds checked. Running past the end of the supplied
//!   buffer is the only hard error ([`Error::OutOfRange`]).
//!
//! - No hidden state: parsing the same bytes twice gives the same result,
//!   and independent files can be parsed concurrently.
//!
//! ## Usage
//!
//! ```rust
//! use jpeg_exif_date::*;
//! use std::io::Cursor;
//!
//! fn main() -> Result<()> {
//!     let mut jpeg = vec![0xff, 0xd8, 0xff, 0xe1, 0x00, 0x36];
//!     jpeg.extend_from_slice(b"Exif\0\0MM\0\x2a\0\0\0\x08");
//!     jpeg.extend_from_slice(&[0x00, 0x01, 0x01, 0x32, 0x00, 0x02]);
//!     jpeg.extend_from_slice(&[0x00, 0x00, 0x00, 0x14, 0x00, 0x00, 0x00, 0x1a]);
//!     jpeg.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);
//!     jpeg.extend_from_slice(b"2023:07:09 20:36:33\0");
//!
//!     let exif = parse_jpeg(Cursor::new(jpeg))?;
//!     assert!(exif.has_date_time());
//!
//!     // Absolute year, 1-based month.
//!     let t = exif.date_time();
//!     assert_eq!((t.year, t.month, t.day), (2023, 7, 9));
//!     assert_eq!((t.hour, t.minute, t.second), (20, 36, 33));
//!
//!     // `struct tm` style, if that's what you need.
//!     assert_eq!((t.tm_year(), t.tm_mon()), (123, 6));
//!
//!     let naive = t.to_naive().unwrap();
//!     assert_eq!(naive.to_string(), "2023-07-09 20:36:33");
//!     Ok(())
//! }
//! ```
//!
//! A malformed segment still parses, with a zero date/time and a reason:
//!
//! ```rust
//! use jpeg_exif_date::*;
//!
//! fn main() -> Result<()> {
//!     let mut jpeg = vec![0xff, 0xd8, 0xff, 0xe1, 0x00, 0x36];
//!     jpeg.extend_from_slice(b"Exif\0\0XX\0\x2a\0\0\0\x08");
//!     jpeg.resize(READ_WINDOW_LEN, 0);
//!
//!     let exif = parse_jpeg_bytes(&jpeg)?;
//!     assert!(exif.date_time().is_zero());
//!     assert_eq!(exif.mismatch(), Some(&Mismatch::ByteOrder(0x5858)));
//!     Ok(())
//! }
//! ```
//!
//! ## Async API Usage
//!
//! Enable the `async` feature flag to load files through tokio, see
//! `parse_jpeg_async` and `parse_jpeg_file_async`.

pub use datetime::{parse_date_time, ParsedDateTime, DATE_TIME_LEN};
pub use error::{Error, Mismatch, MismatchKind};
pub use exif::{
    check_exif_signature, parse_app1, DataFormat, ExifTag, IfdEntry, JpegExif, TiffHeader,
    UnrecognizedTag, BIG_ENDIAN_TAG, EXIF_SIGNATURE, IFD_ENTRY_SIZE, LITTLE_ENDIAN_TAG,
    TIFF_HEADER_SIZE, TIFF_MAGIC,
};
pub use jpeg::{
    has_app_marker, has_soi, parse_app0, parse_jpeg_bytes, Segment, APP0, APP1, MARKER_LEN,
    MAX_SEGMENT_LEN, READ_WINDOW_LEN, SOI,
};
#[cfg(feature = "async")]
pub use loader::{parse_jpeg_async, parse_jpeg_file_async};
pub use loader::{parse_jpeg, parse_jpeg_file};
pub use reader::{read_u16, read_u32, ByteCursor, ByteOrder};

pub type Result<T> = std::result::Result<T, Error>;

mod datetime;
mod error;
mod exif;
mod jpeg;
mod loader;
mod reader;

#[cfg(test)]
mod testkit;
