//! Builders for synthetic JPEG/EXIF buffers.

use crate::{exif::ExifTag, reader::ByteOrder, READ_WINDOW_LEN};

enum Value {
    Inline(u32),
    Data(Vec<u8>),
}

/// Builds a TIFF structure: header, a single IFD right after it, then the
/// data area holding the values which don't fit inline.
pub struct TiffBuilder {
    order: ByteOrder,
    entries: Vec<(u16, u16, u32, Value)>,
}

impl TiffBuilder {
    pub fn new(order: ByteOrder) -> Self {
        Self {
            order,
            entries: Vec::new(),
        }
    }

    pub fn inline_entry(mut self, tag: u16, data_type: u16, count: u32, value: u32) -> Self {
        self.entries
            .push((tag, data_type, count, Value::Inline(value)));
        self
    }

    /// An ASCII entry whose count is `text.len()`, stored in the data area.
    pub fn text_entry(mut self, tag: u16, text: &[u8]) -> Self {
        self.entries
            .push((tag, 2, text.len() as u32, Value::Data(text.to_vec())));
        self
    }

    pub fn date_time(self, field: &[u8]) -> Self {
        self.text_entry(ExifTag::DateTime.code(), field)
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(match self.order {
            ByteOrder::Little => b"II",
            ByteOrder::Big => b"MM",
        });
        self.put_u16(&mut out, 0x2a);
        self.put_u32(&mut out, 8);

        self.put_u16(&mut out, self.entries.len() as u16);
        let data_start = 8 + 2 + self.entries.len() * 12 + 4;
        let mut data = Vec::new();
        for (tag, data_type, count, value) in self.entries.iter() {
            self.put_u16(&mut out, *tag);
            self.put_u16(&mut out, *data_type);
            self.put_u32(&mut out, *count);
            match value {
                Value::Inline(v) => self.put_u32(&mut out, *v),
                Value::Data(d) => {
                    self.put_u32(&mut out, (data_start + data.len()) as u32);
                    data.extend_from_slice(d);
                }
            }
        }
        // no next IFD
        self.put_u32(&mut out, 0);

        out.extend_from_slice(&data);
        out
    }

    fn put_u16(&self, out: &mut Vec<u8>, v: u16) {
        out.extend_from_slice(&match self.order {
            ByteOrder::Little => v.to_le_bytes(),
            ByteOrder::Big => v.to_be_bytes(),
        });
    }

    fn put_u32(&self, out: &mut Vec<u8>, v: u32) {
        out.extend_from_slice(&match self.order {
            ByteOrder::Little => v.to_le_bytes(),
            ByteOrder::Big => v.to_be_bytes(),
        });
    }
}

/// An APP1 segment without its marker: length, signature, TIFF data.
pub fn app1_segment(signature: &[u8], tiff: &[u8]) -> Vec<u8> {
    segment(&[signature, tiff].concat())
}

/// A typical 16 byte JFIF APP0 segment without its marker.
pub fn app0_segment() -> Vec<u8> {
    segment(b"JFIF\0\x01\x01\x00\x00\x01\x00\x01\x00\x00")
}

fn segment(payload: &[u8]) -> Vec<u8> {
    let len = (payload.len() + 2) as u16;
    [&len.to_be_bytes()[..], payload].concat()
}

/// SOI followed by `(marker number, segment)` pairs.
pub fn jpeg(segments: &[(u8, &[u8])]) -> Vec<u8> {
    let mut out = vec![0xff, 0xd8];
    for (code, segment) in segments {
        out.extend_from_slice(&[0xff, *code]);
        out.extend_from_slice(segment);
    }
    out
}

/// Zero-pads `buf` to the read window size, like the loader does.
pub fn padded(mut buf: Vec<u8>) -> Vec<u8> {
    if buf.len() < READ_WINDOW_LEN {
        buf.resize(READ_WINDOW_LEN, 0);
    }
    buf
}

/// A complete little-endian JPEG carrying `date_time` in its ifd0.
pub fn sample_jpeg(date_time: &[u8]) -> Vec<u8> {
    let tiff = TiffBuilder::new(ByteOrder::Little)
        .inline_entry(ExifTag::Orientation.code(), 3, 1, 1)
        .date_time(date_time)
        .build();
    let app0 = app0_segment();
    let app1 = app1_segment(crate::exif::EXIF_SIGNATURE, &tiff);
    // DQT, never looked at
    let dqt: &[u8] = &[0x00, 0x04, 0x00, 0x01];
    jpeg(&[(0xe0, &app0[..]), (0xe1, &app1[..]), (0xdb, dqt)])
}
