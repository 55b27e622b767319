use std::io::Cursor;

fn main() {
    afl::fuzz!(|data: &[u8]| {
        let _ = jpeg_exif_date::parse_jpeg_bytes(data);
        let _ = jpeg_exif_date::parse_jpeg(Cursor::new(data));
    });
}
