use crate::{
    datetime::{parse_date_time, ParsedDateTime, DATE_TIME_LEN},
    error::{Mismatch, ParsingError},
    reader::{ByteOrder, ByteCursor},
};

pub use header::{
    check_exif_signature, TiffHeader, BIG_ENDIAN_TAG, EXIF_SIGNATURE, LITTLE_ENDIAN_TAG,
    TIFF_HEADER_SIZE, TIFF_MAGIC,
};
pub use ifd::{DataFormat, IfdEntry, IFD_ENTRY_SIZE};
pub use tags::{ExifTag, UnrecognizedTag};

use ifd::parse_ifd_entries;

mod header;
mod ifd;
mod tags;

/// What has been recovered from the APP0/APP1 segments of a JPEG file.
///
/// Decoding never rolls back: if the APP1 segment turns out to be malformed
/// half way through, everything extracted up to that point is kept and the
/// reason is available from [`Self::mismatch`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct JpegExif {
    pub(crate) app0_len: Option<u16>,
    pub(crate) app1_len: Option<u16>,
    pub(crate) tiff_header: Option<TiffHeader>,
    pub(crate) entries: Vec<IfdEntry>,
    pub(crate) date_time: Option<ParsedDateTime>,
    pub(crate) mismatches: Vec<Mismatch>,
}

impl JpegExif {
    /// The capture date/time, or the zero value if the 0th IFD has no
    /// valid DateTime entry.
    ///
    /// `year` is absolute and `month` is 1-based, see [`ParsedDateTime`].
    pub fn date_time(&self) -> ParsedDateTime {
        self.date_time.unwrap_or_default()
    }

    pub fn has_date_time(&self) -> bool {
        self.date_time.is_some()
    }

    /// Declared length of the APP0 (JFIF) segment, if present.
    pub fn app0_len(&self) -> Option<u16> {
        self.app0_len
    }

    /// Declared length of the APP1 (EXIF) segment, if present.
    pub fn app1_len(&self) -> Option<u16> {
        self.app1_len
    }

    pub fn tiff_header(&self) -> Option<&TiffHeader> {
        self.tiff_header.as_ref()
    }

    /// Raw entries of the 0th IFD, in file order.
    pub fn entries(&self) -> &[IfdEntry] {
        &self.entries
    }

    /// The first reason decoding stopped or a field was rejected.
    ///
    /// `None` together with `!has_date_time()` means the file was well
    /// formed but simply carries no DateTime entry.
    pub fn mismatch(&self) -> Option<&Mismatch> {
        self.mismatches.first()
    }

    pub fn mismatches(&self) -> &[Mismatch] {
        &self.mismatches
    }

    pub(crate) fn record(&mut self, mismatch: Mismatch) {
        tracing::warn!(%mismatch, "EXIF data rejected");
        self.mismatches.push(mismatch);
    }
}

/// Decodes an APP1 segment.
///
/// `cursor` must sit on the segment's length field, i.e. right after the
/// 0xFFE1 marker, and must be backed by the whole file buffer since
/// DateTime values are looked up relative to the TIFF header.
///
/// Returns the declared segment length, which is consumed whatever
/// happens afterwards. Format mismatches are recorded on `exif`; only a
/// read beyond the end of the buffer is an error.
#[tracing::instrument(skip_all)]
pub fn parse_app1(cursor: &mut ByteCursor<'_>, exif: &mut JpegExif) -> crate::Result<u16> {
    let len = cursor.read_u16(ByteOrder::Big)?;
    exif.app1_len = Some(len);
    tracing::debug!(len, "APP1 segment");

    match decode_tiff(cursor, exif) {
        Ok(()) => Ok(len),
        Err(ParsingError::Mismatch(m)) => {
            exif.record(m);
            Ok(len)
        }
        Err(ParsingError::Fatal(e)) => Err(e),
    }
}

fn decode_tiff(cursor: &mut ByteCursor<'_>, exif: &mut JpegExif) -> Result<(), ParsingError> {
    let signature = cursor.take(EXIF_SIGNATURE.len())?;
    if !check_exif_signature(signature) {
        return Err(Mismatch::ExifSignature.into());
    }

    // All offsets inside the TIFF structure are relative to the byte order
    // marker.
    let tiff_base = cursor.pos();
    let header = TiffHeader::parse(cursor)?;
    tracing::debug!(?header, tiff_base, "TIFF header");
    let order = header.byte_order;
    exif.tiff_header = Some(header);

    // The 0th IFD is expected right after the header; the declared offset
    // is informational only.
    let entries = parse_ifd_entries(cursor, order)?;
    exif.entries = entries.clone();

    for entry in entries {
        match entry.exif_tag() {
            Some(ExifTag::DateTime) => {
                decode_date_time(cursor.buf(), tiff_base, &entry, exif)?;
            }
            Some(tag) => tracing::trace!(%tag, "skip entry"),
            None => tracing::trace!(tag = entry.tag, "skip unrecognized entry"),
        }
    }

    Ok(())
}

/// A rejected DateTime field doesn't halt the IFD walk, so a later valid
/// entry can still be found. An earlier success is never overwritten by a
/// later failure.
fn decode_date_time(
    buf: &[u8],
    tiff_base: usize,
    entry: &IfdEntry,
    exif: &mut JpegExif,
) -> crate::Result<()> {
    let field: &[u8] = if entry.count as usize == DATE_TIME_LEN {
        let pos = entry.value_position(tiff_base).unwrap_or(usize::MAX);
        ByteCursor::at(buf, pos).peek(DATE_TIME_LEN)?
    } else {
        &[]
    };

    match parse_date_time(field, entry.count) {
        Ok(t) => exif.date_time = Some(t),
        Err(m) => exif.record(m),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::*;
    use crate::Error;

    fn parse(segment: &[u8]) -> (crate::Result<u16>, JpegExif) {
        let mut exif = JpegExif::default();
        let res = parse_app1(&mut ByteCursor::new(segment), &mut exif);
        (res, exif)
    }

    #[test]
    fn date_time_little_endian() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let tiff = TiffBuilder::new(ByteOrder::Little)
            .date_time(b"2023:04:29 19:38:33\0")
            .build();
        let segment = app1_segment(EXIF_SIGNATURE, &tiff);
        let (res, exif) = parse(&segment);

        assert_eq!(res.unwrap() as usize, segment.len());
        assert_eq!(exif.app1_len(), Some(segment.len() as u16));
        assert!(exif.has_date_time());
        assert_eq!(
            exif.date_time(),
            ParsedDateTime {
                year: 2023,
                month: 4,
                day: 29,
                hour: 19,
                minute: 38,
                second: 33,
            }
        );
        assert_eq!(
            exif.tiff_header(),
            Some(&TiffHeader {
                byte_order: ByteOrder::Little,
                ifd0_offset: 8
            })
        );
        assert_eq!(exif.entries().len(), 1);
        assert!(exif.mismatch().is_none());
    }

    #[test]
    fn date_time_big_endian_among_other_entries() {
        let tiff = TiffBuilder::new(ByteOrder::Big)
            .inline_entry(ExifTag::Orientation.code(), 3, 1, 0x0001_0000)
            .text_entry(ExifTag::Make.code(), b"vivo\0")
            .date_time(b"2023:07:09 20:36:33\0")
            .inline_entry(0xc4a5, 7, 4, 0)
            .build();
        let (res, exif) = parse(&app1_segment(EXIF_SIGNATURE, &tiff));

        res.unwrap();
        assert_eq!(exif.date_time().to_string(), "2023-07-09 20:36:33");
        assert_eq!(
            exif.entries()
                .iter()
                .map(|e| e.exif_tag())
                .collect::<Vec<_>>(),
            [
                Some(ExifTag::Orientation),
                Some(ExifTag::Make),
                Some(ExifTag::DateTime),
                None
            ]
        );
    }

    #[test]
    fn upper_case_signature() {
        let tiff = TiffBuilder::new(ByteOrder::Little)
            .date_time(b"2021:06:05 10:00:00\0")
            .build();
        let segment = app1_segment(b"EXIF\0\0", &tiff);
        let (res, exif) = parse(&segment);

        assert_eq!(res.unwrap() as usize, segment.len());
        assert!(!exif.has_date_time());
        assert!(exif.tiff_header().is_none());
        assert_eq!(exif.mismatch(), Some(&Mismatch::ExifSignature));
    }

    #[test]
    fn bad_signature() {
        let tiff = TiffBuilder::new(ByteOrder::Little)
            .date_time(b"2023:04:29 19:38:33\0")
            .build();
        let segment = app1_segment(b"Exif\0M", &tiff);
        let (res, exif) = parse(&segment);

        assert_eq!(res.unwrap() as usize, segment.len());
        assert!(exif.date_time().is_zero());
        assert!(exif.tiff_header().is_none());
        assert_eq!(exif.mismatch(), Some(&Mismatch::ExifSignature));
    }

    #[test]
    fn bad_byte_order() {
        let mut tiff = TiffBuilder::new(ByteOrder::Little)
            .date_time(b"2023:04:29 19:38:33\0")
            .build();
        tiff[0] = 0x4f;
        let (res, exif) = parse(&app1_segment(EXIF_SIGNATURE, &tiff));

        res.unwrap();
        assert!(!exif.has_date_time());
        assert_eq!(exif.mismatch(), Some(&Mismatch::ByteOrder(0x4f49)));
    }

    #[test]
    fn bad_magic() {
        let mut tiff = TiffBuilder::new(ByteOrder::Big)
            .date_time(b"2023:04:29 19:38:33\0")
            .build();
        tiff[3] = 0x2b;
        let (_, exif) = parse(&app1_segment(EXIF_SIGNATURE, &tiff));

        assert!(exif.date_time().is_zero());
        assert_eq!(exif.mismatch(), Some(&Mismatch::TiffMagic(0x2b)));
    }

    #[test]
    fn ifd0_offset_is_informational() {
        let mut tiff = TiffBuilder::new(ByteOrder::Big)
            .date_time(b"2023:04:29 19:38:33\0")
            .build();
        tiff[4..8].copy_from_slice(&[0, 0, 0, 0]);
        let (_, exif) = parse(&app1_segment(EXIF_SIGNATURE, &tiff));

        assert_eq!(exif.tiff_header().unwrap().ifd0_offset, 0);
        assert_eq!(exif.date_time().day, 29);
    }

    #[test]
    fn date_time_wrong_length() {
        let tiff = TiffBuilder::new(ByteOrder::Little)
            .text_entry(ExifTag::DateTime.code(), b"2023:04:29 19:38:33")
            .build();
        let (res, exif) = parse(&app1_segment(EXIF_SIGNATURE, &tiff));

        res.unwrap();
        assert!(exif.date_time().is_zero());
        assert_eq!(exif.mismatch(), Some(&Mismatch::DateTimeLength(19)));
        // the header and entries read before the failure are kept
        assert!(exif.tiff_header().is_some());
        assert_eq!(exif.entries().len(), 1);
    }

    #[test]
    fn later_failure_keeps_earlier_date_time() {
        let tiff = TiffBuilder::new(ByteOrder::Little)
            .date_time(b"2023:04:29 19:38:33\0")
            .date_time(b"2023:04:29 19:38:33X")
            .build();
        let (_, exif) = parse(&app1_segment(EXIF_SIGNATURE, &tiff));

        assert_eq!(exif.date_time().second, 33);
        assert_eq!(exif.mismatches(), [Mismatch::DateTimeTerminator]);
    }

    #[test]
    fn no_date_time() {
        let tiff = TiffBuilder::new(ByteOrder::Little)
            .text_entry(ExifTag::Make.code(), b"Apple\0")
            .build();
        let (_, exif) = parse(&app1_segment(EXIF_SIGNATURE, &tiff));

        assert!(!exif.has_date_time());
        assert!(exif.mismatch().is_none());
    }

    #[test]
    fn date_time_offset_out_of_range() {
        let tiff = TiffBuilder::new(ByteOrder::Little)
            .inline_entry(ExifTag::DateTime.code(), 2, 20, 0x00ff_0000)
            .build();
        let (res, exif) = parse(&app1_segment(EXIF_SIGNATURE, &tiff));

        assert!(matches!(res, Err(Error::OutOfRange { len: 20, .. })));
        assert!(exif.tiff_header().is_some());
    }

    #[test]
    fn truncated_segment() {
        let (res, exif) = parse(&[0x00, 0x08, b'E', b'x', b'i', b'f']);
        assert!(matches!(res, Err(Error::OutOfRange { .. })));
        assert_eq!(exif.app1_len(), Some(8));
    }
}
