//! Canonical UTC instant.
//!
//! Every timestamp layout decodes into the same [`Timestamp`], and every
//! `Timestamp` encodes through one canonical layout:
//! `YYYY-MM-DD HH:MM:SS.nnnnnnnnn`, UTC, nine fractional digits.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::codec::encode::FieldEncoder;
use crate::codec::token::lex;
use crate::codec::visitor::{TokenDecoder, TokenVisitor};
use crate::error::{DecodeError, DecodeResult};
use crate::timestamp::layout::TimestampLayout;

/// Canonical output layout (chrono format string).
pub const CANONICAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.9f";

pub const NANOS_PER_SECOND: i64 = 1_000_000_000;
pub const NANOS_PER_MILLI: i64 = 1_000_000;
const MILLIS_PER_SECOND: i64 = 1_000;

/// Unix seconds of `0001-01-01 00:00:00 UTC`, the zero instant.
const ZERO_UNIX_SECONDS: i64 = -62_135_596_800;

/// A point in time, always held in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Seconds plus nanoseconds since the Unix epoch. Nanoseconds may be
    /// negative or exceed one second; they are carried into the seconds.
    pub fn from_unix(secs: i64, nanos: i64) -> Option<Self> {
        let secs = secs.checked_add(nanos.div_euclid(NANOS_PER_SECOND))?;
        let nanos = nanos.rem_euclid(NANOS_PER_SECOND) as u32;
        DateTime::from_timestamp(secs, nanos).map(Self)
    }

    /// Fractional seconds since the Unix epoch. The fractional part becomes
    /// sub-second nanoseconds.
    pub fn from_unix_seconds(secs: f64) -> Option<Self> {
        if !secs.is_finite() {
            return None;
        }
        let whole = secs.trunc();
        if whole < i64::MIN as f64 || whole > i64::MAX as f64 {
            return None;
        }
        let frac = secs - whole;
        Self::from_unix(whole as i64, (frac * NANOS_PER_SECOND as f64) as i64)
    }

    pub fn from_unix_milliseconds(millis: i64) -> Option<Self> {
        Self::from_unix(
            millis.div_euclid(MILLIS_PER_SECOND),
            millis.rem_euclid(MILLIS_PER_SECOND) * NANOS_PER_MILLI,
        )
    }

    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// `0001-01-01 00:00:00 UTC`.
    pub fn zero() -> Self {
        DateTime::from_timestamp(ZERO_UNIX_SECONDS, 0)
            .map(Self)
            .unwrap_or(Self(DateTime::<Utc>::MIN_UTC))
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::zero()
    }

    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    pub fn into_inner(self) -> DateTime<Utc> {
        self.0
    }

    pub fn unix_seconds(&self) -> i64 {
        self.0.timestamp()
    }

    pub fn subsec_nanos(&self) -> u32 {
        self.0.timestamp_subsec_nanos()
    }

    /// The canonical text, unquoted.
    pub fn canonical(&self) -> String {
        self.0.format(CANONICAL_FORMAT).to_string()
    }

    /// Parse already-unquoted text with `layout`.
    pub fn parse(layout: TimestampLayout, text: &str) -> DecodeResult<Self> {
        layout.parse(text)
    }

    /// Direct single-value decode of a raw JSON value with `layout`.
    pub fn from_json(layout: TimestampLayout, raw: &str) -> DecodeResult<Self> {
        layout.decode(lex(raw)?)
    }

    /// Direct single-value encode: the canonical text, quoted.
    pub fn to_json(&self) -> String {
        self.encode().to_string()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::zero()
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Timestamp {
    fn from(dt: DateTime<Tz>) -> Self {
        Self(dt.with_timezone(&Utc))
    }
}

impl From<Timestamp> for DateTime<Utc> {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(CANONICAL_FORMAT))
    }
}

impl FromStr for Timestamp {
    type Err = DecodeError;

    /// Parses the canonical layout.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimestampLayout::Canonical.parse(s)
    }
}

impl FieldEncoder for Timestamp {
    fn encode(&self) -> Value {
        Value::String(self.canonical())
    }

    /// Instants are never omitted; absence belongs to the enclosing `Option`.
    fn is_empty(&self) -> bool {
        false
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    /// Reads the canonical layout. Source-specific layouts are selected per
    /// field through [`crate::timestamp::format`].
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(TokenVisitor(TimestampLayout::Canonical))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fractional_seconds() {
        let ts = Timestamp::from_unix_seconds(1577934245.5).unwrap();
        assert_eq!(ts.unix_seconds(), 1577934245);
        assert_eq!(ts.subsec_nanos(), 500_000_000);
    }

    #[test]
    fn test_negative_fraction_is_normalized() {
        let ts = Timestamp::from_unix_seconds(-1.25).unwrap();
        assert_eq!(ts.unix_seconds(), -2);
        assert_eq!(ts.subsec_nanos(), 750_000_000);
        assert!(Timestamp::from_unix_seconds(f64::NAN).is_none());
        assert!(Timestamp::from_unix_seconds(f64::INFINITY).is_none());
        assert!(Timestamp::from_unix_seconds(1e300).is_none());
    }

    #[test]
    fn test_milliseconds() {
        let ts = Timestamp::from_unix_milliseconds(1577934245123).unwrap();
        assert_eq!(ts.canonical(), "2020-01-02 03:04:05.123000000");

        let before_epoch = Timestamp::from_unix_milliseconds(-1).unwrap();
        assert_eq!(before_epoch.canonical(), "1969-12-31 23:59:59.999000000");
    }

    #[test]
    fn test_zero_instant() {
        let zero = Timestamp::zero();
        assert!(zero.is_zero());
        assert_eq!(zero, Timestamp::default());
        assert_eq!(zero.canonical(), "0001-01-01 00:00:00.000000000");
    }

    #[test]
    fn test_canonical_encoding() {
        let ts = Timestamp::from_unix(1577934245, 7).unwrap();
        assert_eq!(ts.to_string(), "2020-01-02 03:04:05.000000007");
        assert_eq!(ts.to_json(), r#""2020-01-02 03:04:05.000000007""#);
        assert_eq!(serde_json::to_string(&ts).unwrap(), ts.to_json());
    }

    #[test]
    fn test_from_offset_datetime_converts_to_utc() {
        let dt = DateTime::parse_from_rfc3339("2020-01-02T03:04:05-07:00").unwrap();
        let ts = Timestamp::from(dt);
        assert_eq!(ts.canonical(), "2020-01-02 10:04:05.000000000");
    }

    #[test]
    fn test_canonical_round_trip() {
        let ts = Timestamp::from_unix(1577934245, 123_456_789).unwrap();
        let decoded: Timestamp = serde_json::from_str(&ts.to_json()).unwrap();
        assert_eq!(decoded, ts);
        assert_eq!(ts.canonical().parse::<Timestamp>().unwrap(), ts);
    }

    #[test]
    fn test_now_is_utc_and_recent() {
        let before = Utc::now();
        let ts = Timestamp::now();
        assert!(*ts.as_datetime() >= before);
    }
}
