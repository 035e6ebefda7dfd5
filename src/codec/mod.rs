// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Encoding adapters.
//!
//! Each codec is a thin decode/encode pair over the shared [`Parser`] and
//! the canonical formatter; none of them parses or formats on its own.
//!
//! | Codec | Decodes | Encodes to | Empty string |
//! |-------|---------|------------|--------------|
//! | [`JsonCodec`] | string, number | quoted canonical string | left unset |
//! | [`TextCodec`] | raw bytes | raw canonical bytes | the epoch |
//! | [`BsonCodec`] | datetime, string, int64, double | native datetime | the epoch |
//!
//! The empty-string column is a known asymmetry carried over from existing
//! producers: JSON treats `""` as "no value", while plain text runs it
//! through the parser, whose integer stage reads it as `0`.  Both readings
//! are kept as they are; callers that depend on either must not be switched
//! silently.
//!
//! [`Parser`]: crate::Parser

#[cfg(feature = "bson")]
mod bson;
#[cfg(feature = "json")]
mod json;
mod text;

#[cfg(feature = "bson")]
pub use self::bson::BsonCodec;
#[cfg(feature = "json")]
pub use self::json::JsonCodec;
pub use self::text::TextCodec;
