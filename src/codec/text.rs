// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Plain-text codec: the token is the whole input, unquoted.

use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use crate::instant::IsoDate;
use crate::parse::Parser;
use tracing::debug;

/// Reads and writes timestamps as bare text.
///
/// Decoding runs the full fallback chain, so an empty input resolves to the
/// epoch rather than leaving anything unset (unlike [`JsonCodec`]).
///
/// [`JsonCodec`]: crate::codec::JsonCodec
#[derive(Debug, Copy, Clone, Default)]
pub struct TextCodec<C = SystemClock> {
    parser: Parser<C>,
}

impl TextCodec<SystemClock> {
    /// A codec backed by a system-clock parser.
    #[inline]
    pub const fn new() -> Self {
        Self {
            parser: Parser::new(),
        }
    }
}

impl<C: Clock> TextCodec<C> {
    /// A codec backed by `parser`.
    #[inline]
    pub const fn with_parser(parser: Parser<C>) -> Self {
        Self { parser }
    }

    /// Resolve `bytes` as a textual token.
    ///
    /// Invalid UTF-8 sequences are replaced before parsing, so they end up
    /// in the [`Malformed`](crate::IsoDateError::Malformed) error's token.
    pub fn decode(&self, bytes: &[u8]) -> Result<IsoDate> {
        let token = String::from_utf8_lossy(bytes);
        debug!(token = %token, "decoding text timestamp");
        self.parser.parse_str(&token)
    }

    /// Replace `target` with the value decoded from `bytes`.
    ///
    /// On error `target` is left untouched.
    pub fn decode_into(&self, target: &mut IsoDate, bytes: &[u8]) -> Result<()> {
        *target = self.decode(bytes)?;
        Ok(())
    }

    /// The canonical form as raw bytes, without quotes.
    pub fn encode(&self, date: &IsoDate) -> Result<Vec<u8>> {
        date.to_canonical().map(String::into_bytes)
    }
}
