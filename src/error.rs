// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Error types shared by the parser, the canonical formatter and every codec.

use std::num::ParseIntError;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = IsoDateError> = std::result::Result<T, E>;

/// Errors raised while resolving or encoding an [`IsoDate`](crate::IsoDate).
///
/// Codecs never recover locally: whatever the parser or formatter reports is
/// handed back to the caller unchanged.
#[derive(Debug, Error)]
pub enum IsoDateError {
    /// No recognised layout matched and the epoch-millisecond fallback
    /// could not read the token as a decimal integer either.
    #[error("malformed timestamp '{token}': {source}")]
    Malformed {
        /// The token exactly as it was received.
        token: String,
        /// Why the final integer interpretation failed.
        #[source]
        source: ParseIntError,
    },

    /// A decoded scalar had a type the encoding's decode hook cannot read.
    #[error("cannot read a timestamp from {encoding} value of type {found}")]
    UnsupportedType {
        /// Encoding whose decode hook rejected the value (`"JSON"`, `"BSON"`).
        encoding: &'static str,
        /// The dynamic type actually encountered.
        found: String,
    },

    /// Canonical formatting is only defined for four-digit years.
    #[error("year {year} outside of range [0,9999]")]
    YearOutOfRange {
        /// The year of the offending instant (UTC).
        year: i32,
    },

    /// Raw JSON input could not be decoded into a value at all.
    #[cfg(feature = "json")]
    #[error("invalid JSON timestamp input: {0}")]
    Json(#[from] serde_json::Error),
}

impl IsoDateError {
    #[cfg_attr(not(any(feature = "json", feature = "bson")), allow(dead_code))]
    pub(crate) fn unsupported(encoding: &'static str, found: impl Into<String>) -> Self {
        Self::UnsupportedType {
            encoding,
            found: found.into(),
        }
    }
}
