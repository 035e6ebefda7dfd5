// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Interchange timestamps
//!
//! This crate provides [`IsoDate`], a timestamp value for documents that
//! cross several encodings whose producers disagree on how time is written.
//! Reading is lenient and deterministic; writing always yields one layout.
//!
//! # Core types
//!
//! - [`IsoDate`] — immutable UTC instant with canonical rendering.
//! - [`Parser`] — the ordered fallback chain, with an injectable [`Clock`].
//! - [`Interpretation`] — which stage of the chain accepted a token.
//! - [`IsoDateError`] — malformed token, unsupported type, year out of range.
//!
//! # Reading
//!
//! Tokens are tried against these interpretations, first match wins:
//!
//! | Stage | Example |
//! |-------|---------|
//! | `"now"` sentinel | `now` |
//! | Canonical layout | `2017-09-20T14:37:53.000+0300` |
//! | RFC 3339 | `2017-09-20T11:37:53Z` |
//! | RFC 3339, any fraction | `2017-09-20T14:37:53.123456789+0300` |
//! | Epoch milliseconds | `1505907473000`, `""` (the epoch) |
//!
//! # Writing
//!
//! [`CANONICAL_LAYOUT`]: `YYYY-MM-DDThh:mm:ss.sss+0000`, UTC, millisecond
//! precision, years 0–9999 only.
//!
//! # Codecs
//!
//! | Codec | Feature |
//! |-------|---------|
//! | [`TextCodec`] | always |
//! | `JsonCodec` | `json` (default) |
//! | `BsonCodec` | `bson` (default) |
//!
//! With the `serde` feature `IsoDate` also implements `Serialize` and
//! `Deserialize`, and `optional` adapts `Option<IsoDate>` fields.

mod clock;
pub mod codec;
mod error;
mod format;
pub(crate) mod instant;
#[cfg(feature = "serde")]
pub mod optional;
pub(crate) mod parse;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use clock::{Clock, FixedClock, SystemClock};
#[cfg(feature = "bson")]
pub use codec::BsonCodec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use codec::TextCodec;
pub use error::{IsoDateError, Result};
pub use format::CANONICAL_LAYOUT;
pub use instant::IsoDate;
pub use parse::{Interpretation, Parser, Token, NOW_SENTINEL};
