//! Purpose: Instant-plus-offset timestamps and their fixed RFC 3339 wire pattern.
//! Exports: `Timestamp`, `OffsetPolicy`.
//! Role: Backing type for the built-in timestamp hook and `FromValue` re-decoding.
//! Invariants: Equality and ordering compare instants; the offset is display-only.
//! Invariants: Parsing accepts any fractional precision (truncated to nanoseconds),
//! `Z` or a numeric offset, and an optional trailing `[ZoneId]` that is validated then ignored.
use std::fmt;

use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};
use tracing::warn;

use crate::core::error::{Error, ErrorKind};

const FORMAT_HINT: &str = "Use RFC 3339 with an explicit offset, e.g. 2019-04-17T15:53:22.369+09:00.";

/// Which offset a timestamp is written with.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum OffsetPolicy {
    /// Keep the offset the value was decoded or constructed with.
    #[default]
    Preserve,
    /// Shift to UTC and write `Z`.
    Utc,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(OffsetDateTime);

impl Timestamp {
    pub fn now_utc() -> Self {
        Self(OffsetDateTime::now_utc())
    }

    pub fn from_unix_timestamp_nanos(nanos: i128) -> Result<Self, Error> {
        OffsetDateTime::from_unix_timestamp_nanos(nanos)
            .map(Self)
            .map_err(|err| {
                Error::new(ErrorKind::Usage)
                    .with_message("unix timestamp out of range")
                    .with_source(err)
            })
    }

    pub fn parse(input: &str) -> Result<Self, Error> {
        let (body, zone) = split_zone_annotation(input)?;
        let parsed = OffsetDateTime::parse(body, &Rfc3339).map_err(|err| {
            Error::new(ErrorKind::TimestampFormat)
                .with_message(format!("invalid timestamp {input:?}"))
                .with_hint(FORMAT_HINT)
                .with_source(err)
        })?;
        if let Some(zone) = zone {
            warn!(zone, offset = %parsed.offset(), "dropping zone annotation; offset is authoritative");
        }
        Ok(Self(parsed))
    }

    pub fn format(&self, policy: OffsetPolicy) -> Result<String, Error> {
        let ts = match policy {
            OffsetPolicy::Preserve => *self,
            OffsetPolicy::Utc => self.to_utc()?,
        };
        ts.0.format(&Rfc3339).map_err(|err| {
            Error::new(ErrorKind::Encode)
                .with_message("timestamp is not representable in RFC 3339")
                .with_source(err)
        })
    }

    /// Same instant, re-expressed at UTC.
    pub fn to_utc(&self) -> Result<Self, Error> {
        Self::from_unix_timestamp_nanos(self.unix_timestamp_nanos())
    }

    pub fn offset(&self) -> UtcOffset {
        self.0.offset()
    }

    pub fn unix_timestamp_nanos(&self) -> i128 {
        self.0.unix_timestamp_nanos()
    }

    pub fn as_offset_date_time(&self) -> OffsetDateTime {
        self.0
    }
}

impl From<OffsetDateTime> for Timestamp {
    fn from(value: OffsetDateTime) -> Self {
        Self(value)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.format(OffsetPolicy::Preserve) {
            Ok(text) => f.write_str(&text),
            Err(_) => write!(f, "{:?}", self.0),
        }
    }
}

fn split_zone_annotation(input: &str) -> Result<(&str, Option<&str>), Error> {
    let Some(open) = input.find('[') else {
        return Ok((input, None));
    };
    let malformed = || {
        Error::new(ErrorKind::TimestampFormat)
            .with_message(format!("malformed zone annotation in {input:?}"))
            .with_hint("Zone annotations look like [UTC] or [Asia/Tokyo] and must end the value.")
    };
    let Some(zone) = input[open + 1..].strip_suffix(']') else {
        return Err(malformed());
    };
    let valid = !zone.is_empty()
        && zone
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '/' | '_' | '+' | '-'));
    if !valid {
        return Err(malformed());
    }
    Ok((&input[..open], Some(zone)))
}
