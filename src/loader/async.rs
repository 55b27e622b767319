use std::path::Path;

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::{exif::JpegExif, jpeg::parse_jpeg_bytes, READ_WINDOW_LEN};

use super::pad_window;

/// Async version of [`parse_jpeg`](crate::parse_jpeg).
///
/// Only loading the read window is async; decoding is a short CPU-bound
/// step done inline once all bytes are in memory.
///
/// ```rust
/// use jpeg_exif_date::*;
///
/// #[tokio::main]
/// async fn main() -> Result<()> {
///     let exif = parse_jpeg_async(&[0xff_u8, 0xd8][..]).await?;
///     assert!(!exif.has_date_time());
///     assert!(exif.mismatch().is_none());
///     Ok(())
/// }
/// ```
pub async fn parse_jpeg_async<R: AsyncRead + Unpin>(reader: R) -> crate::Result<JpegExif> {
    let mut buf = Vec::with_capacity(READ_WINDOW_LEN);
    reader
        .take(READ_WINDOW_LEN as u64)
        .read_to_end(&mut buf)
        .await?;
    tracing::debug!(read = buf.len(), "loaded read window");

    pad_window(&mut buf);
    parse_jpeg_bytes(&buf)
}

/// Async version of [`parse_jpeg_file`](crate::parse_jpeg_file).
pub async fn parse_jpeg_file_async(path: impl AsRef<Path>) -> crate::Result<JpegExif> {
    let f = tokio::fs::File::open(path.as_ref()).await?;
    parse_jpeg_async(f).await
}
