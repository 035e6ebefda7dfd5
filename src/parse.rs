// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! The fallback chain.
//!
//! Producers disagree on how to write a timestamp: full ISO forms, RFC 3339
//! with or without a fraction, raw epoch milliseconds as a string or a
//! number, or `"now"` to ask for a server-assigned time.  [`Parser`] resolves
//! any of them by trying a fixed sequence of interpretations and stopping at
//! the first that fits:
//!
//! | # | [`Interpretation`] | Accepts |
//! |---|--------------------|---------|
//! | 1 | [`Now`](Interpretation::Now) | the literal `"now"` |
//! | 2 | [`Canonical`](Interpretation::Canonical) | `2017-09-20T14:37:53.000+0300`, `…53.000Z` |
//! | 3 | [`Rfc3339`](Interpretation::Rfc3339) | `2017-09-20T11:37:53Z`, `…53.5+03:00` |
//! | 4 | [`Rfc3339Nano`](Interpretation::Rfc3339Nano) | any fraction length, `±hh`/`±hhmm`/`±hh:mm` |
//! | 5 | [`EpochMillis`](Interpretation::EpochMillis) | `1505907473000`, `-5`, and `""` as `0` |
//!
//! Explicitly zoned layouts come before the bare-integer reading, so nothing
//! that looks like a date is ever taken for a millisecond count.  Each
//! layout miss is local; only the integer stage's error reaches the caller.
//! The date and time are always joined by an uppercase `T`, and `Z` is only
//! accepted in uppercase.

use crate::clock::{Clock, SystemClock};
use crate::error::{IsoDateError, Result};
use crate::format::CANONICAL_LAYOUT;
use crate::instant::IsoDate;
use chrono::{DateTime, FixedOffset, NaiveDateTime};
use tracing::{debug, trace};

/// The token that resolves to the parser clock's current instant.
pub const NOW_SENTINEL: &str = "now";

// ═══════════════════════════════════════════════════════════════════════════
// Inputs and outcomes
// ═══════════════════════════════════════════════════════════════════════════

/// A raw timestamp token, before interpretation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// Text, resolved through the whole fallback chain.
    Str(&'a str),
    /// A number, read directly as epoch milliseconds.
    Millis(i64),
    /// No token at all; resolves like the empty string, to the epoch.
    Absent,
}

impl<'a> From<&'a str> for Token<'a> {
    #[inline]
    fn from(token: &'a str) -> Self {
        Token::Str(token)
    }
}

impl From<i64> for Token<'_> {
    #[inline]
    fn from(millis: i64) -> Self {
        Token::Millis(millis)
    }
}

impl<'a> From<Option<&'a str>> for Token<'a> {
    #[inline]
    fn from(token: Option<&'a str>) -> Self {
        token.map_or(Token::Absent, Token::Str)
    }
}

/// Which stage of the chain accepted a token.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Interpretation {
    /// The `"now"` sentinel.
    Now,
    /// The canonical layout, exactly three fraction digits, `±hhmm` or `Z`.
    Canonical,
    /// RFC 3339: uppercase `T`, optional fraction, `±hh:mm` or `Z`.
    Rfc3339,
    /// Arbitrary fraction precision with a `±hh`, `±hhmm` or `±hh:mm` offset.
    Rfc3339Nano,
    /// A decimal count of milliseconds since the Unix epoch.
    EpochMillis,
}

impl Interpretation {
    /// Short label used in log events.
    pub const fn as_str(self) -> &'static str {
        match self {
            Interpretation::Now => "now",
            Interpretation::Canonical => "canonical",
            Interpretation::Rfc3339 => "rfc3339",
            Interpretation::Rfc3339Nano => "rfc3339-nano",
            Interpretation::EpochMillis => "epoch-millis",
        }
    }
}

impl std::fmt::Display for Interpretation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── layout stages ─────────────────────────────────────────────────────────
//
// chrono skips whitespace before numeric items, and its offset items take
// `z`, `±hh:mm` and `±hhmm` interchangeably.  Tokens containing whitespace
// never reach a layout, and each stage checks the zone's shape before
// handing the token to chrono.

type LayoutAttempt = fn(&str) -> Option<DateTime<FixedOffset>>;

/// Canonical layout with a literal `Z` in place of the offset.
const CANONICAL_UTC_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S.%3fZ";

/// RFC 3339 with a `±hh:mm` offset.
const RFC3339_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S%.f%:z";
/// RFC 3339 with `Z`.
const RFC3339_UTC_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Any fraction length, numeric offset in any of chrono's forms.
const RFC3339_NANO_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S%.f%#z";

/// The trailing numeric offset of `token`, sign included, when it directly
/// follows a digit.
fn numeric_offset(token: &str) -> Option<&str> {
    let sign = token.rfind(|c: char| c == '+' || c == '-')?;
    let follows_digit = token[..sign].bytes().last()?.is_ascii_digit();
    let offset = &token[sign..];
    let zone_chars = offset[1..].bytes().all(|b| b.is_ascii_digit() || b == b':');
    (follows_digit && offset.len() > 1 && zone_chars).then_some(offset)
}

fn with_offset(token: &str, layout: &'static str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_str(token, layout)
        .inspect_err(|err| trace!(token, layout, %err, "layout did not match"))
        .ok()
}

fn at_utc(token: &str, layout: &'static str) -> Option<DateTime<FixedOffset>> {
    NaiveDateTime::parse_from_str(token, layout)
        .map(|naive| naive.and_utc().fixed_offset())
        .inspect_err(|err| trace!(token, layout, %err, "layout did not match"))
        .ok()
}

/// Exactly three fraction digits, then `Z` or `±hhmm`.
fn parse_canonical(token: &str) -> Option<DateTime<FixedOffset>> {
    if token.ends_with('Z') {
        return at_utc(token, CANONICAL_UTC_LAYOUT);
    }
    match numeric_offset(token) {
        Some(offset) if offset.len() == 5 && !offset.contains(':') => {
            with_offset(token, CANONICAL_LAYOUT)
        }
        _ => None,
    }
}

/// Uppercase `T` separator, optional fraction, then `Z` or `±hh:mm`.
fn parse_rfc3339(token: &str) -> Option<DateTime<FixedOffset>> {
    if token.ends_with('Z') {
        return at_utc(token, RFC3339_UTC_LAYOUT);
    }
    match numeric_offset(token) {
        Some(offset) if offset.len() == 6 && offset.as_bytes()[3] == b':' => {
            with_offset(token, RFC3339_LAYOUT)
        }
        _ => None,
    }
}

/// Any fraction, then `±hh`, `±hhmm` or `±hh:mm`.  Tokens ending in `Z`
/// were already settled by stage 3.
fn parse_rfc3339_nano(token: &str) -> Option<DateTime<FixedOffset>> {
    numeric_offset(token).and_then(|_| with_offset(token, RFC3339_NANO_LAYOUT))
}

/// Stages 2–4, in order.
const LAYOUT_STAGES: [(Interpretation, LayoutAttempt); 3] = [
    (Interpretation::Canonical, parse_canonical),
    (Interpretation::Rfc3339, parse_rfc3339),
    (Interpretation::Rfc3339Nano, parse_rfc3339_nano),
];

// ═══════════════════════════════════════════════════════════════════════════
// Parser
// ═══════════════════════════════════════════════════════════════════════════

/// Resolves tokens to [`IsoDate`] values.
///
/// The parser owns the [`Clock`] consulted for the `"now"` sentinel; every
/// other stage is a pure function of the token.
///
/// ```
/// use chrono::DateTime;
/// use isodate::{FixedClock, Interpretation, IsoDate, Parser};
///
/// let pinned = DateTime::from_timestamp(1_505_907_473, 0).unwrap();
/// let parser = Parser::with_clock(FixedClock::new(pinned));
///
/// let (date, how) = parser.resolve("now").unwrap();
/// assert_eq!(how, Interpretation::Now);
/// assert_eq!(date, IsoDate::from_unix(1_505_907_473, 0));
///
/// assert_eq!(parser.parse("1505907473000").unwrap(), date);
/// assert_eq!(parser.parse("").unwrap(), IsoDate::from_unix(0, 0));
/// ```
#[derive(Debug, Copy, Clone, Default)]
pub struct Parser<C = SystemClock> {
    clock: C,
}

impl Parser<SystemClock> {
    /// A parser reading the system clock.
    #[inline]
    pub const fn new() -> Self {
        Self { clock: SystemClock }
    }
}

impl<C: Clock> Parser<C> {
    /// A parser that resolves `"now"` against `clock`.
    #[inline]
    pub const fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    /// The clock behind the `"now"` sentinel.
    #[inline]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Resolve `token`, discarding which stage matched.
    #[inline]
    pub fn parse<'a>(&self, token: impl Into<Token<'a>>) -> Result<IsoDate> {
        self.resolve(token).map(|(date, _)| date)
    }

    /// Resolve a textual token through the full chain.
    #[inline]
    pub fn parse_str(&self, token: &str) -> Result<IsoDate> {
        self.parse(Token::Str(token))
    }

    /// Read a number as epoch milliseconds, skipping the textual stages.
    #[inline]
    pub fn parse_millis(&self, millis: i64) -> IsoDate {
        IsoDate::from_unix_millis(millis)
    }

    /// Resolve `token` and report which [`Interpretation`] accepted it.
    ///
    /// # Errors
    ///
    /// [`IsoDateError::Malformed`] when no layout matches and the token is
    /// not a decimal integer either.
    pub fn resolve<'a>(&self, token: impl Into<Token<'a>>) -> Result<(IsoDate, Interpretation)> {
        match token.into() {
            Token::Str(text) => self.resolve_str(text),
            Token::Millis(millis) => Ok((self.parse_millis(millis), Interpretation::EpochMillis)),
            Token::Absent => self.resolve_str(""),
        }
    }

    fn resolve_str(&self, token: &str) -> Result<(IsoDate, Interpretation)> {
        if token == NOW_SENTINEL {
            let now = IsoDate::now_with(&self.clock);
            debug!(token, interpretation = %Interpretation::Now, "resolved timestamp");
            return Ok((now, Interpretation::Now));
        }

        let layout_match = if token.contains(char::is_whitespace) {
            None
        } else {
            LAYOUT_STAGES.iter().find_map(|&(how, attempt)| match attempt(token) {
                Some(datetime) => Some((IsoDate::from_datetime(datetime), how)),
                None => {
                    trace!(token, stage = %how, "stage did not match");
                    None
                }
            })
        };

        let resolved = match layout_match {
            Some(found) => found,
            None => (parse_epoch_millis(token)?, Interpretation::EpochMillis),
        };
        debug!(token, interpretation = %resolved.1, "resolved timestamp");
        Ok(resolved)
    }
}

/// Final stage: a decimal integer of epoch milliseconds, `""` read as `"0"`.
fn parse_epoch_millis(token: &str) -> Result<IsoDate> {
    let digits = if token.is_empty() { "0" } else { token };
    digits
        .parse::<i64>()
        .map(IsoDate::from_unix_millis)
        .map_err(|source| {
            debug!(token, %source, "timestamp matched no interpretation");
            IsoDateError::Malformed {
                token: token.to_owned(),
                source,
            }
        })
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════
