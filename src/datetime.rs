//! Decoding of the ASCII date/time field stored by the DateTime IFD entry.

use std::{fmt::Display, num::TryFromIntError};

use chrono::{NaiveDate, NaiveDateTime};
use nom::{
    bytes::complete::{tag, take_while_m_n},
    character::is_digit,
    combinator::{all_consuming, map},
    sequence::tuple,
    IResult,
};

#[cfg(feature = "json_dump")]
use serde::{Deserialize, Serialize};

use crate::error::Mismatch;

/// Size of a DateTime field: `"YYYY:MM:DD HH:MM:SS"` plus a NUL byte.
pub const DATE_TIME_LEN: usize = 20;

/// A date/time decoded from an EXIF DateTime field.
///
/// Fields keep the values as written in the file: `year` is the absolute
/// year (e.g. 2023) and `month` is 1-based (1 = January). Use
/// [`Self::tm_year`] and [`Self::tm_mon`] if you need the C `struct tm`
/// convention instead.
///
/// The default value (all zeros) means "no valid date/time".
#[cfg_attr(feature = "json_dump", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParsedDateTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl ParsedDateTime {
    pub fn is_zero(&self) -> bool {
        *self == ParsedDateTime::default()
    }

    /// Years since 1900.
    pub fn tm_year(&self) -> i32 {
        i32::from(self.year) - 1900
    }

    /// 0-based month.
    pub fn tm_mon(&self) -> i32 {
        i32::from(self.month) - 1
    }

    /// Convert to a [`chrono::NaiveDateTime`].
    ///
    /// Returns `None` for the zero value or if the fields don't form a valid
    /// calendar date/time.
    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(
            i32::from(self.year),
            u32::from(self.month),
            u32::from(self.day),
        )?
        .and_hms_opt(
            u32::from(self.hour),
            u32::from(self.minute),
            u32::from(self.second),
        )
    }
}

impl Display for ParsedDateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// Fails with [`TryFromIntError`] if the year doesn't fit in an `u16`, e.g.
/// for years before 0.
impl TryFrom<NaiveDateTime> for ParsedDateTime {
    type Error = TryFromIntError;

    fn try_from(value: NaiveDateTime) -> Result<Self, Self::Error> {
        use chrono::{Datelike, Timelike};

        Ok(ParsedDateTime {
            year: u16::try_from(value.year())?,
            month: u8::try_from(value.month())?,
            day: u8::try_from(value.day())?,
            hour: u8::try_from(value.hour())?,
            minute: u8::try_from(value.minute())?,
            second: u8::try_from(value.second())?,
        })
    }
}

/// Decodes a DateTime field.
///
/// `count` is the component count declared by the IFD entry and must be
/// exactly [`DATE_TIME_LEN`]; shorter and longer fields are both rejected
/// rather than trimmed. `bytes` must then hold at least `count` bytes, the
/// last of which must be NUL.
///
/// Only the layout is checked. Fields such as `"2023:02:30"` or a leap
/// second of 60 are returned as written, and [`ParsedDateTime::to_naive`]
/// returns `None` for them.
#[tracing::instrument(skip(bytes))]
pub fn parse_date_time(bytes: &[u8], count: u32) -> Result<ParsedDateTime, Mismatch> {
    if count as usize != DATE_TIME_LEN {
        return Err(Mismatch::DateTimeLength(count));
    }
    let Some(field) = bytes.get(..DATE_TIME_LEN) else {
        return Err(Mismatch::DateTimeLength(bytes.len() as u32));
    };

    let (text, terminator) = field.split_at(DATE_TIME_LEN - 1);
    if terminator != [0] {
        return Err(Mismatch::DateTimeTerminator);
    }

    // Digits are taken as written; calendar validity is left to `to_naive`.
    let (_, t) = all_consuming(date_time_layout)(text)
        .map_err(|_| Mismatch::DateTimeFormat(String::from_utf8_lossy(text).into_owned()))?;

    tracing::debug!(%t, "parsed DateTime");
    Ok(t)
}

fn date_time_layout(input: &[u8]) -> IResult<&[u8], ParsedDateTime> {
    map(
        tuple((
            digits4,
            tag(":"),
            digits2,
            tag(":"),
            digits2,
            tag(" "),
            digits2,
            tag(":"),
            digits2,
            tag(":"),
            digits2,
        )),
        |(year, _, month, _, day, _, hour, _, minute, _, second)| ParsedDateTime {
            year,
            month,
            day,
            hour,
            minute,
            second,
        },
    )(input)
}

fn digits4(input: &[u8]) -> IResult<&[u8], u16> {
    map(take_while_m_n(4, 4, is_digit), |ds: &[u8]| {
        ds.iter().fold(0u16, |acc, d| acc * 10 + u16::from(d - b'0'))
    })(input)
}

fn digits2(input: &[u8]) -> IResult<&[u8], u8> {
    map(take_while_m_n(2, 2, is_digit), |ds: &[u8]| {
        ds.iter().fold(0u8, |acc, d| acc * 10 + (d - b'0'))
    })(input)
}
