use std::io;
use thiserror::Error;

type FallbackError = Box<dyn std::error::Error + Send + Sync>;

/// Hard failures which abort a whole parse.
///
/// A malformed EXIF segment is *not* an error: it is reported as a
/// [`Mismatch`] on the parsed result instead, and the parse still succeeds
/// with a zero-valued date/time.
#[derive(Debug, Error)]
pub enum Error {
    /// A read would run past the end of the supplied buffer.
    #[error("out of range; {len} bytes at offset {offset}, buffer has {buf_len} bytes")]
    OutOfRange {
        offset: usize,
        len: usize,
        buf_len: usize,
    },

    #[error("parse failed; {0}")]
    ParseFailed(FallbackError),

    #[error("io error; {0}")]
    Io(#[from] io::Error),
}

impl From<nom::Err<nom::error::Error<&[u8]>>> for Error {
    fn from(e: nom::Err<nom::error::Error<&[u8]>>) -> Self {
        let s = match e {
            nom::Err::Incomplete(_) => e.to_string(),
            nom::Err::Error(e) | nom::Err::Failure(e) => e.code.description().to_owned(),
        };
        Error::ParseFailed(s.into())
    }
}

/// Why a segment (or a field inside it) was rejected.
///
/// Decoding of the segment stops at the first mismatch; values already
/// extracted before it are kept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Mismatch {
    #[error("SOI marker not found; got 0x{0:04x}")]
    StartOfImage(u16),

    #[error("invalid EXIF signature")]
    ExifSignature,

    #[error("unrecognized byte order marker 0x{0:04x}")]
    ByteOrder(u16),

    #[error("invalid TIFF magic 0x{0:04x}")]
    TiffMagic(u16),

    #[error("DateTime field should be 20 bytes, got {0}")]
    DateTimeLength(u32),

    #[error("DateTime field is not NUL terminated")]
    DateTimeTerminator,

    #[error("malformed DateTime field: {0:?}")]
    DateTimeFormat(String),
}

/// Coarse classification of a [`Mismatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MismatchKind {
    /// A fixed marker, signature or magic value differs.
    Structural,
    /// A field's byte count differs from what the format requires.
    FieldLength,
    /// The field has the right size but doesn't follow the digit layout.
    Value,
}

impl Mismatch {
    pub fn kind(&self) -> MismatchKind {
        match self {
            Mismatch::StartOfImage(_)
            | Mismatch::ExifSignature
            | Mismatch::ByteOrder(_)
            | Mismatch::TiffMagic(_) => MismatchKind::Structural,
            Mismatch::DateTimeLength(_) | Mismatch::DateTimeTerminator => {
                MismatchKind::FieldLength
            }
            Mismatch::DateTimeFormat(_) => MismatchKind::Value,
        }
    }
}

/// Internal error type for decoder stages: a `Mismatch` halts the current
/// segment only, a `Fatal` error aborts the whole parse.
#[derive(Debug)]
pub(crate) enum ParsingError {
    Mismatch(Mismatch),
    Fatal(Error),
}

impl From<Mismatch> for ParsingError {
    fn from(value: Mismatch) -> Self {
        ParsingError::Mismatch(value)
    }
}

impl From<Error> for ParsingError {
    fn from(value: Error) -> Self {
        ParsingError::Fatal(value)
    }
}
