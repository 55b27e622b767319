use nom::{bytes::complete::tag, combinator::verify, number, sequence::tuple};

use crate::{
    error::Mismatch,
    exif::{parse_app1, JpegExif},
    reader::{ByteOrder, ByteCursor},
};

/// Size of a JPEG marker, e.g. `[0xFF, 0xD8]`.
pub const MARKER_LEN: usize = 2;
/// Largest length an APPn segment can declare.
pub const MAX_SEGMENT_LEN: usize = 0xffff;

/// How many leading bytes of a file are needed to decode the SOI marker,
/// both APP markers and two maximal APP0/APP1 segments.
pub const READ_WINDOW_LEN: usize = MARKER_LEN * 3 + MAX_SEGMENT_LEN * 2;

pub const SOI: u16 = 0xffd8;
pub const APP0: u16 = 0xffe0;
pub const APP1: u16 = 0xffe1;

/// Decodes the APP0/APP1 segments at the start of a JPEG file and recovers
/// the DateTime of its 0th IFD.
///
/// `buf` should hold the first [`READ_WINDOW_LEN`] bytes of the file (see
/// [`parse_jpeg`](crate::parse_jpeg) which takes care of that).
///
/// Malformed data is not an error: the returned [`JpegExif`] then carries a
/// zero-valued date/time and the [`Mismatch`] which stopped decoding. An
/// `Err` is only returned when a read would go past the end of `buf`.
///
/// # Usage
///
/// ```rust
/// use jpeg_exif_date::*;
///
/// fn main() -> Result<()> {
///     // SOI, then an APP1 segment with a little-endian TIFF structure
///     // holding a single DateTime entry.
///     let mut buf = vec![0xff, 0xd8, 0xff, 0xe1, 0x00, 0x36];
///     buf.extend_from_slice(b"Exif\0\0II\x2a\0\x08\0\0\0");
///     buf.extend_from_slice(&[0x01, 0x00, 0x32, 0x01, 0x02, 0x00]);
///     buf.extend_from_slice(&[0x14, 0x00, 0x00, 0x00, 0x1a, 0x00, 0x00, 0x00]);
///     buf.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);
///     buf.extend_from_slice(b"2023:04:29 19:38:33\0");
///
///     let exif = parse_jpeg_bytes(&buf)?;
///     let t = exif.date_time();
///     assert_eq!((t.year, t.month, t.day), (2023, 4, 29));
///     assert_eq!(t.to_string(), "2023-04-29 19:38:33");
///     Ok(())
/// }
/// ```
#[tracing::instrument(skip_all)]
pub fn parse_jpeg_bytes(buf: &[u8]) -> crate::Result<JpegExif> {
    let mut exif = JpegExif::default();
    let mut cursor = ByteCursor::new(buf);

    cursor.peek(MARKER_LEN)?;
    if !has_soi(buf) {
        let found = cursor.read_u16(ByteOrder::Big)?;
        exif.record(Mismatch::StartOfImage(found));
        return Ok(exif);
    }
    tracing::debug!("Got SOI marker.");
    cursor.advance(MARKER_LEN);

    for segment in Segment::SCAN_ORDER {
        cursor.peek(MARKER_LEN)?;
        if !has_app_marker(buf, cursor.pos(), segment.marker_number()) {
            tracing::debug!(?segment, pos = cursor.pos(), "segment not present");
            continue;
        }
        cursor.advance(MARKER_LEN);

        // Decoders get their own cursor, the scanner only trusts the
        // declared length to skip the segment.
        let len = segment.decode(&mut cursor.clone(), &mut exif)?;
        tracing::debug!(?segment, len, "Got segment.");
        cursor.advance(len as usize);
    }

    Ok(exif)
}

/// The application segments this crate decodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    /// JFIF, only its length is read.
    App0,
    /// EXIF.
    App1,
}

impl Segment {
    /// Both segments are optional, but when present APP0 comes first.
    pub const SCAN_ORDER: [Segment; 2] = [Segment::App0, Segment::App1];

    /// The byte following 0xFF in the segment's marker.
    pub fn marker_number(self) -> u8 {
        match self {
            Segment::App0 => MarkerCode::App0.code(),
            Segment::App1 => MarkerCode::App1.code(),
        }
    }

    pub fn from_marker_number(code: u8) -> Option<Segment> {
        Self::SCAN_ORDER
            .into_iter()
            .find(|s| s.marker_number() == code)
    }

    /// Decodes the segment whose length field is at the cursor position and
    /// returns its declared length.
    fn decode(self, cursor: &mut ByteCursor<'_>, exif: &mut JpegExif) -> crate::Result<u16> {
        match self {
            Segment::App0 => {
                let len = parse_app0(cursor)?;
                exif.app0_len = Some(len);
                Ok(len)
            }
            Segment::App1 => parse_app1(cursor, exif),
        }
    }
}

/// Reads the length of an APP0 (JFIF) segment. Nothing else of the JFIF
/// payload is interpreted.
pub fn parse_app0(cursor: &mut ByteCursor<'_>) -> crate::Result<u16> {
    cursor.read_u16(ByteOrder::Big)
}

/// Whether `buf` starts with the SOI marker `[0xFF, 0xD8]`.
pub fn has_soi(buf: &[u8]) -> bool {
    has_marker(buf, 0, MarkerCode::Soi.code())
}

/// Whether the marker `[0xFF, number]` sits at `offset`.
pub fn has_app_marker(buf: &[u8], offset: usize, number: u8) -> bool {
    has_marker(buf, offset, number)
}

fn has_marker(buf: &[u8], offset: usize, code: u8) -> bool {
    let Some(input) = buf.get(offset..) else {
        return false;
    };
    tuple((
        tag::<_, _, nom::error::Error<_>>(&[0xFF_u8][..]),
        verify(number::complete::u8, |c: &u8| *c == code),
    ))(input)
    .is_ok()
}

/// A marker code is a byte following 0xFF that indicates the kind of marker.
enum MarkerCode {
    // Start of Image
    Soi = 0xD8,

    // JFIF
    App0 = 0xE0,

    // EXIF
    App1 = 0xE1,
}

impl MarkerCode {
    fn code(self) -> u8 {
        self as u8
    }
}
