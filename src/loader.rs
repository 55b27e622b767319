use std::{fs::File, io::Read, path::Path};

use crate::{exif::JpegExif, jpeg::parse_jpeg_bytes, READ_WINDOW_LEN};

#[cfg(feature = "async")]
mod r#async;
#[cfg(feature = "async")]
pub use r#async::{parse_jpeg_async, parse_jpeg_file_async};

/// Reads the leading [`READ_WINDOW_LEN`] bytes from `reader` and decodes
/// them with [`parse_jpeg_bytes`].
///
/// Input shorter than the window is zero-padded, so a truncated file is
/// reported as a [`Mismatch`](crate::Mismatch) or a missing date/time
/// rather than an out of range error.
///
/// Please note that exactly one bounded read is done, so the `reader` does
/// not need to be wrapped with `BufRead`.
pub fn parse_jpeg<R: Read>(reader: R) -> crate::Result<JpegExif> {
    let buf = load_window(reader)?;
    parse_jpeg_bytes(&buf)
}

/// Opens the file at `path` and decodes it with [`parse_jpeg`]. The file is
/// closed before decoding starts.
///
/// # Usage
///
/// ```rust,no_run
/// use jpeg_exif_date::*;
///
/// fn main() -> Result<()> {
///     let exif = parse_jpeg_file("./testdata/exif.jpg")?;
///     if exif.has_date_time() {
///         println!("taken at {}", exif.date_time());
///     } else if let Some(reason) = exif.mismatch() {
///         println!("malformed EXIF: {reason}");
///     }
///     Ok(())
/// }
/// ```
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn parse_jpeg_file(path: impl AsRef<Path>) -> crate::Result<JpegExif> {
    let buf = {
        let f = File::open(path.as_ref())?;
        load_window(f)?
    };
    parse_jpeg_bytes(&buf)
}

fn load_window<R: Read>(reader: R) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(READ_WINDOW_LEN);
    reader
        .take(READ_WINDOW_LEN as u64)
        .read_to_end(&mut buf)?;
    tracing::debug!(read = buf.len(), "loaded read window");

    pad_window(&mut buf);
    Ok(buf)
}

pub(crate) fn pad_window(buf: &mut Vec<u8>) {
    buf.resize(READ_WINDOW_LEN, 0);
}
