//! Source timestamp layouts.
//!
//! Each [`TimestampLayout`] is one parser strategy, chosen where a field is
//! decoded. The layout only matters during decoding: the resulting
//! [`Timestamp`] does not remember it, and all layouts encode identically.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc, Weekday};
use lazy_static::lazy_static;
use regex::Regex;

use crate::codec::token::Token;
use crate::codec::visitor::TokenDecoder;
use crate::error::{DecodeError, DecodeResult, ParseFailure};
use crate::timestamp::instant::Timestamp;

const CANONICAL_PARSE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
const ANSIC_DATE_FORMAT: &str = "%b %d %H:%M:%S %Y";
const FLUENTD_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";
const SURICATA_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

lazy_static! {
    /// `2006-01-02T15:04:05.999999999Z0700`: optional fraction, then `Z` or a
    /// numeric offset without colon.
    static ref SURICATA_PATTERN: Regex =
        Regex::new(r"^(\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(?:\.\d{1,9})?)(Z|[+-]\d{4})$").unwrap();
}

/// Closed set of accepted source layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimestampLayout {
    /// `YYYY-MM-DD HH:MM:SS.nnnnnnnnn` in UTC, the output layout.
    Canonical,
    /// RFC 3339, with optional fractional seconds.
    Rfc3339,
    /// `Mon Jan 2 15:04:05 2006 MST`. The clock time is read as UTC.
    AnsicWithTz,
    /// Integer milliseconds since the Unix epoch, bare or quoted.
    UnixMillis,
    /// Fractional seconds since the Unix epoch, bare or quoted.
    UnixFloat,
    /// `2006-01-02 15:04:05 -0700`.
    Fluentd,
    /// `2006-01-02T15:04:05.999999999Z0700`.
    Suricata,
}

impl TimestampLayout {
    pub const ALL: [TimestampLayout; 7] = [
        TimestampLayout::Canonical,
        TimestampLayout::Rfc3339,
        TimestampLayout::AnsicWithTz,
        TimestampLayout::UnixMillis,
        TimestampLayout::UnixFloat,
        TimestampLayout::Fluentd,
        TimestampLayout::Suricata,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TimestampLayout::Canonical => "canonical",
            TimestampLayout::Rfc3339 => "rfc3339",
            TimestampLayout::AnsicWithTz => "ansic_with_tz",
            TimestampLayout::UnixMillis => "unix_millis",
            TimestampLayout::UnixFloat => "unix_float",
            TimestampLayout::Fluentd => "fluentd",
            TimestampLayout::Suricata => "suricata",
        }
    }

    /// Operation label attached to decode errors.
    pub fn op_name(self) -> &'static str {
        match self {
            TimestampLayout::Canonical => "ReadTimestamp",
            TimestampLayout::Rfc3339 => "ReadTimestampRFC3339",
            TimestampLayout::AnsicWithTz => "ReadTimestampANSICwithTZ",
            TimestampLayout::UnixMillis => "ReadTimestampUnixMillisecond",
            TimestampLayout::UnixFloat => "ReadTimestampUnixFloat",
            TimestampLayout::Fluentd => "ReadTimestampFluentd",
            TimestampLayout::Suricata => "ReadTimestampSuricata",
        }
    }

    /// Human-readable description of the expected input.
    pub fn expected(self) -> &'static str {
        match self {
            TimestampLayout::Canonical => "2006-01-02 15:04:05.000000000",
            TimestampLayout::Rfc3339 => "2006-01-02T15:04:05Z07:00",
            TimestampLayout::AnsicWithTz => "Mon Jan 2 15:04:05 2006 MST",
            TimestampLayout::UnixMillis => "unix milliseconds",
            TimestampLayout::UnixFloat => "unix seconds",
            TimestampLayout::Fluentd => "2006-01-02 15:04:05 -0700",
            TimestampLayout::Suricata => "2006-01-02T15:04:05.999999999Z0700",
        }
    }

    /// Layouts that read an empty payload as the zero instant.
    pub fn accepts_empty(self) -> bool {
        matches!(self, TimestampLayout::UnixMillis | TimestampLayout::UnixFloat)
    }

    /// Parse unquoted text.
    pub fn parse(self, text: &str) -> DecodeResult<Timestamp> {
        if text.is_empty() && self.accepts_empty() {
            return Ok(Timestamp::zero());
        }
        self.parse_text(text)
            .map_err(|cause| self.invalid(text, cause))
    }

    fn invalid(self, input: impl Into<String>, cause: impl Into<ParseFailure>) -> DecodeError {
        DecodeError::invalid_format(self.op_name(), input, self.expected(), cause)
    }

    fn parse_text(self, text: &str) -> Result<Timestamp, ParseFailure> {
        match self {
            TimestampLayout::Canonical => {
                let naive = NaiveDateTime::parse_from_str(text, CANONICAL_PARSE_FORMAT)?;
                Ok(Timestamp::from(Utc.from_utc_datetime(&naive)))
            }
            TimestampLayout::Rfc3339 => Ok(DateTime::parse_from_rfc3339(text)?.into()),
            TimestampLayout::AnsicWithTz => parse_ansic_with_tz(text),
            TimestampLayout::UnixMillis => Timestamp::from_unix_milliseconds(text.parse::<i64>()?)
                .ok_or(ParseFailure::OutOfRange),
            TimestampLayout::UnixFloat => Timestamp::from_unix_seconds(text.parse::<f64>()?)
                .ok_or(ParseFailure::OutOfRange),
            TimestampLayout::Fluentd => Ok(DateTime::parse_from_str(text, FLUENTD_FORMAT)?.into()),
            TimestampLayout::Suricata => parse_suricata(text),
        }
    }
}

/// Weekday and zone are checked for shape only.
fn parse_ansic_with_tz(text: &str) -> Result<Timestamp, ParseFailure> {
    let fields: Vec<&str> = text.split_whitespace().collect();
    let [weekday, month, day, clock, year, zone] = fields.as_slice() else {
        return Err(ParseFailure::LayoutMismatch);
    };
    if weekday.parse::<Weekday>().is_err() || !zone.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ParseFailure::LayoutMismatch);
    }
    let naive = NaiveDateTime::parse_from_str(
        &format!("{} {} {} {}", month, day, clock, year),
        ANSIC_DATE_FORMAT,
    )?;
    Ok(Timestamp::from(Utc.from_utc_datetime(&naive)))
}

fn parse_suricata(text: &str) -> Result<Timestamp, ParseFailure> {
    let caps = SURICATA_PATTERN
        .captures(text)
        .ok_or(ParseFailure::LayoutMismatch)?;
    let offset = match &caps[2] {
        "Z" => "+0000",
        numeric => numeric,
    };
    let normalized = format!("{}{}", &caps[1], offset);
    Ok(DateTime::parse_from_str(&normalized, SURICATA_FORMAT)?.into())
}

impl TokenDecoder for TimestampLayout {
    type Output = Timestamp;

    fn expecting(&self) -> &'static str {
        self.expected()
    }

    /// Strings are parsed as their unquoted content and numbers as their
    /// text, so a number only succeeds for the unix layouts. Millisecond
    /// counts must be integers in either form.
    fn decode(&self, token: Token<'_>) -> DecodeResult<Timestamp> {
        match token {
            Token::Str(text) => self.parse(&text),
            Token::F64(_) if *self == TimestampLayout::UnixMillis => {
                Err(self.invalid(token.text(), ParseFailure::NotAnInteger))
            }
            Token::I64(_) | Token::U64(_) | Token::F64(_) => self.parse(&token.text()),
            other => Err(DecodeError::unexpected_token(self.op_name(), other.kind())),
        }
    }
}

impl fmt::Display for TimestampLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TimestampLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimestampLayout::ALL
            .into_iter()
            .find(|layout| layout.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown timestamp layout: {}", s))
    }
}
