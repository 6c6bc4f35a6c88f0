//! Per-layout serde adapters.
//!
//! Select the source layout at the field:
//!
//! ```ignore
//! #[derive(Serialize, Deserialize)]
//! struct Event {
//!     #[serde(with = "logwire_core::timestamp::format::fluentd")]
//!     time: Timestamp,
//!     #[serde(default, with = "logwire_core::timestamp::format::unix_millis::option")]
//!     received: Option<Timestamp>,
//! }
//! ```
//!
//! Serialization is canonical for every layout. `option` adapters need
//! `#[serde(default)]` for the field to be optional in the input.

use serde::{Deserializer, Serialize, Serializer};

use crate::codec::token::Token;
use crate::codec::visitor::{TokenDecoder, TokenVisitor};
use crate::error::DecodeResult;
use crate::timestamp::instant::Timestamp;
use crate::timestamp::layout::TimestampLayout;

/// Null decodes to `None`, anything else through the wrapped layout.
struct OptionalLayout(TimestampLayout);

impl TokenDecoder for OptionalLayout {
    type Output = Option<Timestamp>;

    fn expecting(&self) -> &'static str {
        self.0.expected()
    }

    fn decode(&self, token: Token<'_>) -> DecodeResult<Option<Timestamp>> {
        match token {
            Token::Null => Ok(None),
            other => self.0.decode(other).map(Some),
        }
    }
}

pub fn serialize<S: Serializer>(ts: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
    ts.serialize(serializer)
}

pub fn deserialize<'de, D: Deserializer<'de>>(
    layout: TimestampLayout,
    deserializer: D,
) -> Result<Timestamp, D::Error> {
    deserializer.deserialize_any(TokenVisitor(layout))
}

pub fn serialize_option<S: Serializer>(
    ts: &Option<Timestamp>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match ts {
        Some(ts) => serializer.serialize_some(ts),
        None => serializer.serialize_none(),
    }
}

pub fn deserialize_option<'de, D: Deserializer<'de>>(
    layout: TimestampLayout,
    deserializer: D,
) -> Result<Option<Timestamp>, D::Error> {
    deserializer.deserialize_option(TokenVisitor(OptionalLayout(layout)))
}

macro_rules! layout_format {
    ($(#[$meta:meta])* $name:ident => $layout:ident) => {
        $(#[$meta])*
        pub mod $name {
            use serde::{Deserializer, Serializer};

            use crate::timestamp::instant::Timestamp;
            use crate::timestamp::layout::TimestampLayout;

            pub fn serialize<S>(ts: &Timestamp, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                super::serialize(ts, serializer)
            }

            pub fn deserialize<'de, D>(deserializer: D) -> Result<Timestamp, D::Error>
            where
                D: Deserializer<'de>,
            {
                super::deserialize(TimestampLayout::$layout, deserializer)
            }

            /// Adapter for `Option<Timestamp>` fields.
            pub mod option {
                use serde::{Deserializer, Serializer};

                use crate::timestamp::instant::Timestamp;
                use crate::timestamp::layout::TimestampLayout;

                pub fn serialize<S: Serializer>(
                    ts: &Option<Timestamp>,
                    serializer: S,
                ) -> Result<S::Ok, S::Error> {
                    super::super::serialize_option(ts, serializer)
                }

                pub fn deserialize<'de, D: Deserializer<'de>>(
                    deserializer: D,
                ) -> Result<Option<Timestamp>, D::Error> {
                    super::super::deserialize_option(TimestampLayout::$layout, deserializer)
                }
            }
        }
    };
}

layout_format!(
    /// `YYYY-MM-DD HH:MM:SS.nnnnnnnnn`
    canonical => Canonical
);
layout_format!(
    /// RFC 3339
    rfc3339 => Rfc3339
);
layout_format!(
    /// `Mon Jan 2 15:04:05 2006 MST`
    ansic_with_tz => AnsicWithTz
);
layout_format!(
    /// Unix epoch milliseconds
    unix_millis => UnixMillis
);
layout_format!(
    /// Unix epoch seconds with fraction
    unix_float => UnixFloat
);
layout_format!(
    /// `2006-01-02 15:04:05 -0700`
    fluentd => Fluentd
);
layout_format!(
    /// `2006-01-02T15:04:05.999999999Z0700`
    suricata => Suricata
);

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    struct FluentdEvent {
        #[serde(with = "fluentd")]
        time: Timestamp,
        #[serde(default, with = "unix_millis::option")]
        received: Option<Timestamp>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    struct ZeekEvent {
        #[serde(with = "unix_float")]
        ts: Timestamp,
    }

    #[test]
    fn test_field_level_layout() {
        let event: FluentdEvent =
            serde_json::from_str(r#"{"time":"2020-01-02 03:04:05 -0700","received":1577934245000}"#)
                .unwrap();
        assert_eq!(event.time.canonical(), "2020-01-02 10:04:05.000000000");
        assert_eq!(
            event.received.map(|ts| ts.canonical()).as_deref(),
            Some("2020-01-02 03:04:05.000000000")
        );
        assert_eq!(
            serde_json::to_string(&event).unwrap(),
            r#"{"time":"2020-01-02 10:04:05.000000000","received":"2020-01-02 03:04:05.000000000"}"#
        );
    }

    #[test]
    fn test_optional_layout_null_and_absent() {
        let absent: FluentdEvent =
            serde_json::from_str(r#"{"time":"2020-01-02 03:04:05 +0000"}"#).unwrap();
        assert!(absent.received.is_none());

        let raw = r#"{"time":"2020-01-02 03:04:05 +0000","received":null}"#;
        let null: FluentdEvent = serde_json::from_str(raw).unwrap();
        assert!(null.received.is_none());
        assert!(serde_json::to_string(&null).unwrap().ends_with(r#""received":null}"#));
    }

    #[test]
    fn test_layout_error_is_reported() {
        let err = serde_json::from_str::<FluentdEvent>(r#"{"time":"2020-01-02T03:04:05Z"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("ReadTimestampFluentd"));

        let err = serde_json::from_str::<ZeekEvent>(r#"{"ts":{"sec":1}}"#).unwrap_err();
        assert!(err.to_string().contains("unexpected object token"));
    }

    #[test]
    fn test_engine_and_direct_paths_agree() {
        for raw in ["1577934245.5", r#""1577934245.25""#, r#""""#] {
            let event: ZeekEvent = serde_json::from_str(&format!(r#"{{"ts":{}}}"#, raw)).unwrap();
            let direct = Timestamp::from_json(TimestampLayout::UnixFloat, raw).unwrap();
            assert_eq!(event.ts, direct);
            assert_eq!(serde_json::to_string(&event.ts).unwrap(), direct.to_json());
        }
    }
}
