// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! The interchange timestamp value.
//!
//! [`IsoDate`] wraps a single `chrono::DateTime<Utc>`.  Whatever offset a
//! source instant carried, it is normalised to UTC on construction, so two
//! values compare equal exactly when they name the same point on the
//! timeline.  The type is `Copy`; nothing ever mutates a value in place.

use crate::clock::{Clock, SystemClock};
use crate::error::{IsoDateError, Result};
use crate::parse::Parser;
use chrono::{DateTime, Datelike, SubsecRound, TimeZone, Utc};
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

const NANOS_PER_SECOND: i64 = 1_000_000_000;

// ═══════════════════════════════════════════════════════════════════════════
// IsoDate
// ═══════════════════════════════════════════════════════════════════════════

/// An absolute instant that reads leniently and writes canonically.
///
/// Reading goes through [`Parser`], which accepts the canonical layout,
/// RFC 3339, epoch milliseconds and the `"now"` sentinel.  Writing always
/// produces [`CANONICAL_LAYOUT`](crate::CANONICAL_LAYOUT) in UTC, e.g.
/// `2017-09-20T11:37:53.000+0000`.
///
/// ```
/// use isodate::IsoDate;
///
/// let date: IsoDate = "2017-09-20T14:37:53.000+0300".parse().unwrap();
/// assert_eq!(date, IsoDate::from_unix(1_505_907_473, 0));
/// assert_eq!(date.to_canonical().unwrap(), "2017-09-20T11:37:53.000+0000");
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IsoDate {
    instant: DateTime<Utc>,
}

impl IsoDate {
    // ── constructors ──────────────────────────────────────────────────

    /// The current instant according to the system clock.
    #[inline]
    pub fn now() -> Self {
        Self::now_with(&SystemClock)
    }

    /// The current instant according to `clock`.
    #[inline]
    pub fn now_with<C: Clock + ?Sized>(clock: &C) -> Self {
        Self::from_datetime(clock.now())
    }

    /// `seconds` since the Unix epoch plus `nanoseconds`.
    ///
    /// `nanoseconds` may be negative or larger than one second; the excess
    /// is carried into the seconds.  Instants beyond what `chrono` can
    /// represent saturate to [`DateTime::<Utc>::MIN_UTC`] or
    /// [`DateTime::<Utc>::MAX_UTC`].
    pub fn from_unix(seconds: i64, nanoseconds: i64) -> Self {
        let carry = nanoseconds.div_euclid(NANOS_PER_SECOND);
        let subsec = nanoseconds.rem_euclid(NANOS_PER_SECOND) as u32;
        let instant = seconds
            .checked_add(carry)
            .and_then(|secs| DateTime::from_timestamp(secs, subsec))
            .unwrap_or_else(|| saturate(seconds.saturating_add(carry)));
        Self { instant }
    }

    /// Milliseconds since the Unix epoch, saturating like [`Self::from_unix`].
    pub fn from_unix_millis(millis: i64) -> Self {
        let instant = DateTime::from_timestamp_millis(millis).unwrap_or_else(|| saturate(millis));
        Self { instant }
    }

    /// Any `chrono` datetime, normalised to UTC.
    #[inline]
    pub fn from_datetime<Tz: TimeZone>(datetime: DateTime<Tz>) -> Self {
        Self {
            instant: datetime.with_timezone(&Utc),
        }
    }

    /// Resolve `token` with a system-clock [`Parser`].
    #[inline]
    pub fn parse(token: &str) -> Result<Self> {
        Parser::new().parse_str(token)
    }

    // ── accessors ─────────────────────────────────────────────────────

    /// The instant as a UTC `DateTime`.
    #[inline]
    pub const fn datetime(&self) -> DateTime<Utc> {
        self.instant
    }

    /// Whole seconds since the Unix epoch.
    #[inline]
    pub fn timestamp(&self) -> i64 {
        self.instant.timestamp()
    }

    /// Milliseconds since the Unix epoch.
    #[inline]
    pub fn timestamp_millis(&self) -> i64 {
        self.instant.timestamp_millis()
    }

    /// Nanoseconds past the last whole second.
    #[inline]
    pub fn timestamp_subsec_nanos(&self) -> u32 {
        self.instant.timestamp_subsec_nanos()
    }

    /// Calendar year in UTC.
    #[inline]
    pub fn year(&self) -> i32 {
        self.instant.year()
    }

    /// The same instant with everything below the millisecond dropped.
    ///
    /// This is the precision the canonical layout keeps, so
    /// `parse(format(v)) == v.truncate_millis()` for every representable `v`.
    #[inline]
    pub fn truncate_millis(&self) -> Self {
        Self {
            instant: self.instant.trunc_subsecs(3),
        }
    }

    /// Whether the canonical layout can express this instant (year 0–9999).
    #[inline]
    pub fn is_representable(&self) -> bool {
        (0..=9999).contains(&self.year())
    }

    pub(crate) fn check_representable(&self) -> Result<()> {
        if self.is_representable() {
            Ok(())
        } else {
            Err(IsoDateError::YearOutOfRange { year: self.year() })
        }
    }
}

fn saturate(direction: i64) -> DateTime<Utc> {
    let bound = if direction < 0 {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    };
    tracing::warn!(%bound, "timestamp outside the representable range, saturating");
    bound
}

// ═══════════════════════════════════════════════════════════════════════════
// Trait implementations
// ═══════════════════════════════════════════════════════════════════════════

// ── Display / FromStr ─────────────────────────────────────────────────────

/// Renders the canonical layout without the year check.
///
/// Meant for logs; encoders go through [`IsoDate::to_canonical`], which
/// refuses years outside `[0, 9999]` instead of writing them.
impl std::fmt::Display for IsoDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.instant.format(crate::CANONICAL_LAYOUT))
    }
}

impl FromStr for IsoDate {
    type Err = IsoDateError;

    #[inline]
    fn from_str(token: &str) -> Result<Self> {
        Self::parse(token)
    }
}

// ── chrono conversions ────────────────────────────────────────────────────

impl<Tz: TimeZone> From<DateTime<Tz>> for IsoDate {
    #[inline]
    fn from(datetime: DateTime<Tz>) -> Self {
        Self::from_datetime(datetime)
    }
}

impl From<IsoDate> for DateTime<Utc> {
    #[inline]
    fn from(date: IsoDate) -> Self {
        date.instant
    }
}

// ── Serde ─────────────────────────────────────────────────────────────────

#[cfg(feature = "serde")]
impl Serialize for IsoDate {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let canonical = self.to_canonical().map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&canonical)
    }
}

/// Reads strings and numbers; an empty string means "no value".
#[cfg(feature = "serde")]
pub(crate) struct IsoDateVisitor;

#[cfg(feature = "serde")]
impl de::Visitor<'_> for IsoDateVisitor {
    type Value = Option<IsoDate>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a timestamp string or a number of epoch milliseconds")
    }

    fn visit_str<E>(self, value: &str) -> std::result::Result<Self::Value, E>
    where
        E: de::Error,
    {
        if value.is_empty() {
            return Ok(None);
        }
        Parser::new().parse_str(value).map(Some).map_err(E::custom)
    }

    fn visit_i64<E>(self, value: i64) -> std::result::Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Some(IsoDate::from_unix_millis(value)))
    }

    fn visit_u64<E>(self, value: u64) -> std::result::Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Some(IsoDate::from_unix_millis(
            i64::try_from(value).unwrap_or(i64::MAX),
        )))
    }

    fn visit_f64<E>(self, value: f64) -> std::result::Result<Self::Value, E>
    where
        E: de::Error,
    {
        if !value.is_finite() {
            return Err(E::invalid_value(de::Unexpected::Float(value), &self));
        }
        Ok(Some(IsoDate::from_unix_millis(value as i64)))
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for IsoDate {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(IsoDateVisitor)?.ok_or_else(|| {
            de::Error::invalid_value(
                de::Unexpected::Str(""),
                &"a non-empty timestamp (use `isodate::optional` for fields that may be unset)",
            )
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::FixedOffset;

    #[test]
    fn test_now_matches_wall_clock() {
        let date = IsoDate::now();
        assert!((date.timestamp() - Utc::now().timestamp()).abs() <= 1);
    }

    #[test]
    fn test_now_with_fixed_clock() {
        let pinned = DateTime::from_timestamp(1_505_907_473, 0).unwrap();
        let date = IsoDate::now_with(&FixedClock::new(pinned));
        assert_eq!(date.datetime(), pinned);
    }

    #[test]
    fn test_from_unix() {
        let date = IsoDate::from_unix(1_505_907_473, 0);
        assert_eq!(date.timestamp(), 1_505_907_473);
        assert_eq!(date.timestamp_subsec_nanos(), 0);
    }

    #[test]
    fn test_from_unix_carries_nanoseconds() {
        let date = IsoDate::from_unix(10, 2_500_000_000);
        assert_eq!(date.timestamp(), 12);
        assert_eq!(date.timestamp_subsec_nanos(), 500_000_000);

        let before_epoch = IsoDate::from_unix(0, -1);
        assert_eq!(before_epoch.timestamp(), -1);
        assert_eq!(before_epoch.timestamp_subsec_nanos(), 999_999_999);
    }

    #[test]
    fn test_from_unix_saturates() {
        assert_eq!(
            IsoDate::from_unix(i64::MAX, i64::MAX).datetime(),
            DateTime::<Utc>::MAX_UTC
        );
        assert_eq!(
            IsoDate::from_unix(i64::MIN, 0).datetime(),
            DateTime::<Utc>::MIN_UTC
        );
        assert_eq!(
            IsoDate::from_unix_millis(i64::MIN).datetime(),
            DateTime::<Utc>::MIN_UTC
        );
    }

    #[test]
    fn test_from_unix_millis() {
        let date = IsoDate::from_unix_millis(1_505_907_473_123);
        assert_eq!(date.timestamp(), 1_505_907_473);
        assert_eq!(date.timestamp_millis(), 1_505_907_473_123);
        assert_eq!(IsoDate::from_unix_millis(-1).timestamp_millis(), -1);
    }

    #[test]
    fn test_from_datetime_normalises_offset() {
        let plus_three = FixedOffset::east_opt(3 * 3600).unwrap();
        let local = plus_three
            .with_ymd_and_hms(2017, 9, 20, 14, 37, 53)
            .unwrap();
        let date = IsoDate::from(local);
        assert_eq!(date, IsoDate::from_unix(1_505_907_473, 0));
        assert_eq!(date.datetime().offset(), &Utc);
    }

    #[test]
    fn test_truncate_millis() {
        let date = IsoDate::from_unix(1, 123_456_789);
        let truncated = date.truncate_millis();
        assert_eq!(truncated.timestamp_subsec_nanos(), 123_000_000);
        assert_eq!(truncated.truncate_millis(), truncated);
    }

    #[test]
    fn test_is_representable() {
        assert!(IsoDate::from_unix(0, 0).is_representable());
        assert!(IsoDate::from_unix(-62_167_219_200, 0).is_representable()); // 0000-01-01
        assert!(!IsoDate::from_unix(-62_167_219_201, 0).is_representable());
        assert!(IsoDate::from_unix(253_402_300_799, 0).is_representable()); // 9999-12-31T23:59:59
        assert!(!IsoDate::from_unix(253_402_300_800, 0).is_representable());
    }

    #[test]
    fn test_display_uses_canonical_layout() {
        let date = IsoDate::from_unix(1_505_907_473, 0);
        assert_eq!(date.to_string(), "2017-09-20T11:37:53.000+0000");
    }

    #[test]
    fn test_from_str() {
        let date: IsoDate = "1505907473000".parse().unwrap();
        assert_eq!(date, IsoDate::from_unix(1_505_907_473, 0));
        assert!("not a date".parse::<IsoDate>().is_err());
    }

    #[test]
    fn test_ordering_follows_timeline() {
        let earlier = IsoDate::from_unix(0, 0);
        let later = IsoDate::from_unix(0, 1);
        assert!(earlier < later);
        assert_eq!(DateTime::<Utc>::from(later), later.datetime());
    }

    #[test]
    fn test_value_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync + Copy>() {}
        assert_send_sync::<IsoDate>();
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_roundtrip_through_json() {
        let date = IsoDate::from_unix(1_505_907_473, 0);
        let json = serde_json::to_string(&date).unwrap();
        assert_eq!(json, "\"2017-09-20T11:37:53.000+0000\"");
        let back: IsoDate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, date);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_reads_numbers_as_epoch_millis() {
        let from_int: IsoDate = serde_json::from_str("1505907473000").unwrap();
        let from_float: IsoDate = serde_json::from_str("1505907473000.9").unwrap();
        assert_eq!(from_int, IsoDate::from_unix(1_505_907_473, 0));
        assert_eq!(from_float, from_int);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_rejects_empty_string_and_other_types() {
        assert!(serde_json::from_str::<IsoDate>("\"\"").is_err());
        assert!(serde_json::from_str::<IsoDate>("true").is_err());
        assert!(serde_json::from_str::<IsoDate>("null").is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_rejects_non_finite_numbers() {
        use serde::de::{value::Error as ValueError, IntoDeserializer};

        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let read: std::result::Result<IsoDate, ValueError> =
                IsoDate::deserialize(value.into_deserializer());
            assert!(read.is_err(), "{value} was accepted");
        }
        let finite: std::result::Result<IsoDate, ValueError> =
            IsoDate::deserialize(1_500.9_f64.into_deserializer());
        assert_eq!(finite.unwrap(), IsoDate::from_unix_millis(1_500));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serialize_out_of_range_fails() {
        let far = IsoDate::from_unix(253_402_300_800, 0);
        let err = serde_json::to_string(&far).unwrap_err();
        assert!(err.to_string().contains("outside of range"));
    }
}
