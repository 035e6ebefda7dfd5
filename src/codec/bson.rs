// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! BSON codec.
//!
//! BSON has a native UTC datetime element (milliseconds since the epoch), so
//! values are written in that form and read back without any textual step.
//! Strings and numbers written by other producers are still accepted.

use crate::clock::{Clock, SystemClock};
use crate::error::{IsoDateError, Result};
use crate::instant::IsoDate;
use crate::parse::Parser;
use ::bson::{Bson, DateTime as BsonDateTime};
use tracing::debug;

const ENCODING: &str = "BSON";

/// Reads timestamps from decoded BSON elements and writes native datetimes.
#[derive(Debug, Copy, Clone, Default)]
pub struct BsonCodec<C = SystemClock> {
    parser: Parser<C>,
}

impl BsonCodec<SystemClock> {
    /// A codec backed by a system-clock parser.
    #[inline]
    pub const fn new() -> Self {
        Self {
            parser: Parser::new(),
        }
    }
}

impl<C: Clock> BsonCodec<C> {
    /// A codec backed by `parser`.
    #[inline]
    pub const fn with_parser(parser: Parser<C>) -> Self {
        Self { parser }
    }

    /// Decode one BSON element.
    ///
    /// | Element | Reading |
    /// |---------|---------|
    /// | `DateTime` | taken as is |
    /// | `String` | full fallback chain |
    /// | `Int64`, `Double` | epoch milliseconds (finite doubles, truncated) |
    ///
    /// # Errors
    ///
    /// Parser errors for strings, and
    /// [`UnsupportedType`](IsoDateError::UnsupportedType) naming the
    /// element type for anything else, `Int32` and non-finite doubles
    /// included.
    pub fn decode(&self, value: &Bson) -> Result<IsoDate> {
        debug!(element = ?value.element_type(), "decoding BSON timestamp");
        match value {
            Bson::DateTime(native) => Ok(IsoDate::from(*native)),
            Bson::String(text) => self.parser.parse_str(text),
            Bson::Int64(millis) => Ok(self.parser.parse_millis(*millis)),
            Bson::Double(millis) if millis.is_finite() => {
                Ok(self.parser.parse_millis(*millis as i64))
            }
            Bson::Double(millis) => Err(IsoDateError::unsupported(
                ENCODING,
                format!("Double({millis})"),
            )),
            other => Err(IsoDateError::unsupported(
                ENCODING,
                format!("{:?}", other.element_type()),
            )),
        }
    }

    /// Replace `target` with the decoded value; on error it is left as is.
    pub fn decode_into(&self, target: &mut IsoDate, value: &Bson) -> Result<()> {
        *target = self.decode(value)?;
        Ok(())
    }

    /// The instant as a native BSON datetime.
    ///
    /// BSON keeps milliseconds, so anything finer is dropped.  No year check
    /// applies: the native form has no four-digit constraint.
    #[inline]
    pub fn encode(&self, date: &IsoDate) -> Bson {
        Bson::from(*date)
    }
}

// ── native conversions ────────────────────────────────────────────────────

impl From<BsonDateTime> for IsoDate {
    #[inline]
    fn from(native: BsonDateTime) -> Self {
        IsoDate::from_unix_millis(native.timestamp_millis())
    }
}

impl From<IsoDate> for BsonDateTime {
    #[inline]
    fn from(date: IsoDate) -> Self {
        BsonDateTime::from_millis(date.timestamp_millis())
    }
}

impl From<IsoDate> for Bson {
    #[inline]
    fn from(date: IsoDate) -> Self {
        Bson::DateTime(date.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::DateTime;
    use rstest::rstest;

    fn sept_20() -> IsoDate {
        IsoDate::from_unix(1_505_907_473, 0)
    }

    #[test]
    fn test_encode_writes_native_datetime() {
        let encoded = BsonCodec::new().encode(&IsoDate::from_unix(1_505_907_473, 123_456_789));
        assert_eq!(
            encoded,
            Bson::DateTime(BsonDateTime::from_millis(1_505_907_473_123))
        );
    }

    #[test]
    fn test_encode_ignores_canonical_year_limit() {
        let far = IsoDate::from_unix(253_402_300_800, 0);
        let encoded = BsonCodec::new().encode(&far);
        assert_eq!(BsonCodec::new().decode(&encoded).unwrap(), far);
    }

    #[rstest]
    #[case(Bson::DateTime(BsonDateTime::from_millis(1_505_907_473_000)))]
    #[case(Bson::String("2017-09-20T14:37:53.000+0300".to_string()))]
    #[case(Bson::String("1505907473000".to_string()))]
    #[case(Bson::Int64(1_505_907_473_000))]
    #[case(Bson::Double(1_505_907_473_000.5))]
    fn test_decode_supported_elements(#[case] value: Bson) {
        assert_eq!(BsonCodec::new().decode(&value).unwrap(), sept_20());
    }

    #[test]
    fn test_decode_empty_string_is_the_epoch() {
        let date = BsonCodec::new().decode(&Bson::String(String::new())).unwrap();
        assert_eq!(date, IsoDate::from_unix(0, 0));
    }

    #[test]
    fn test_decode_now_uses_the_parser_clock() {
        let pinned = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let codec = BsonCodec::with_parser(Parser::with_clock(FixedClock::new(pinned)));
        let date = codec.decode(&Bson::String("now".to_string())).unwrap();
        assert_eq!(date.datetime(), pinned);
    }

    #[rstest]
    #[case(Bson::Int32(7), "Int32")]
    #[case(Bson::Boolean(true), "Boolean")]
    #[case(Bson::Null, "Null")]
    #[case(Bson::Array(vec![]), "Array")]
    #[case(Bson::Double(f64::NAN), "Double(NaN)")]
    #[case(Bson::Double(f64::INFINITY), "Double(inf)")]
    #[case(Bson::Double(f64::NEG_INFINITY), "Double(-inf)")]
    fn test_decode_rejects_other_elements(#[case] value: Bson, #[case] expected: &str) {
        match BsonCodec::new().decode(&value) {
            Err(IsoDateError::UnsupportedType { encoding, found }) => {
                assert_eq!(encoding, "BSON");
                assert_eq!(found, expected);
            }
            other => panic!("expected unsupported type, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_into_replaces_on_success_only() {
        let codec = BsonCodec::new();
        let mut target = sept_20();

        codec.decode_into(&mut target, &Bson::Int64(0)).unwrap();
        assert_eq!(target, IsoDate::from_unix(0, 0));

        assert!(codec.decode_into(&mut target, &Bson::Boolean(false)).is_err());
        assert_eq!(target, IsoDate::from_unix(0, 0));
    }
}
