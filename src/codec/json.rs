// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! JSON codec.

use crate::clock::{Clock, SystemClock};
use crate::error::{IsoDateError, Result};
use crate::instant::IsoDate;
use crate::parse::Parser;
use serde_json::{Number, Value};
use tracing::debug;

const ENCODING: &str = "JSON";

/// Reads timestamps from decoded JSON values and writes them as strings.
///
/// Strings go through the [`Parser`]; numbers are epoch milliseconds
/// (fractions are truncated toward zero).  An empty string decodes to
/// `None`: the field is left unset instead of becoming the epoch, which is
/// what [`TextCodec`](crate::codec::TextCodec) would produce for the same
/// input.
///
/// ```
/// use isodate::JsonCodec;
/// use serde_json::json;
///
/// let codec = JsonCodec::new();
/// let date = codec.decode(&json!(1_505_907_473_000_i64)).unwrap().unwrap();
/// assert_eq!(codec.encode(&date).unwrap(), r#""2017-09-20T11:37:53.000+0000""#);
/// assert_eq!(codec.decode(&json!("")).unwrap(), None);
/// ```
#[derive(Debug, Copy, Clone, Default)]
pub struct JsonCodec<C = SystemClock> {
    parser: Parser<C>,
}

impl JsonCodec<SystemClock> {
    /// A codec backed by a system-clock parser.
    #[inline]
    pub const fn new() -> Self {
        Self {
            parser: Parser::new(),
        }
    }
}

impl<C: Clock> JsonCodec<C> {
    /// A codec backed by `parser`.
    #[inline]
    pub const fn with_parser(parser: Parser<C>) -> Self {
        Self { parser }
    }

    /// Decode an already-parsed JSON value.
    ///
    /// Returns `Ok(None)` for the empty string.
    ///
    /// # Errors
    ///
    /// Parser errors for strings, and
    /// [`UnsupportedType`](IsoDateError::UnsupportedType) for `null`,
    /// booleans, arrays and objects.
    pub fn decode(&self, value: &Value) -> Result<Option<IsoDate>> {
        debug!(%value, "decoding JSON timestamp");
        match value {
            Value::String(text) if text.is_empty() => Ok(None),
            Value::String(text) => self.parser.parse_str(text).map(Some),
            Value::Number(number) => Ok(Some(self.parser.parse_millis(millis_of(number)))),
            other => Err(IsoDateError::unsupported(ENCODING, type_name(other))),
        }
    }

    /// Decode raw JSON bytes (e.g. `"2017-09-20T11:37:53Z"` with its quotes).
    pub fn decode_slice(&self, bytes: &[u8]) -> Result<Option<IsoDate>> {
        let value: Value = serde_json::from_slice(bytes)?;
        self.decode(&value)
    }

    /// Replace `target` with the decoded value.
    ///
    /// An empty string leaves `target` as it was; so does any error.
    pub fn decode_into(&self, target: &mut IsoDate, value: &Value) -> Result<()> {
        if let Some(date) = self.decode(value)? {
            *target = date;
        }
        Ok(())
    }

    /// The canonical form as a JSON string value.
    pub fn encode_value(&self, date: &IsoDate) -> Result<Value> {
        date.to_canonical().map(Value::String)
    }

    /// The canonical form as serialized JSON, quotes included.
    ///
    /// # Errors
    ///
    /// [`YearOutOfRange`](IsoDateError::YearOutOfRange), unchanged from the
    /// formatter.
    pub fn encode(&self, date: &IsoDate) -> Result<String> {
        Ok(self.encode_value(date)?.to_string())
    }
}

fn millis_of(number: &Number) -> i64 {
    number
        .as_i64()
        .or_else(|| number.as_f64().map(|millis| millis as i64))
        .unwrap_or_default()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
