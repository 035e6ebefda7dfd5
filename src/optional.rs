// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Serde adapter for `Option<IsoDate>` fields.
//!
//! A bare [`IsoDate`] field has no way to stay unset, so its `Deserialize`
//! impl refuses the empty string.  Fields that may legitimately be blank
//! use this module instead: `null`, a missing value (with
//! `#[serde(default)]`) and `""` all become `None`.
//!
//! ```
//! use isodate::IsoDate;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Record {
//!     #[serde(default, with = "isodate::optional")]
//!     updated_at: Option<IsoDate>,
//! }
//!
//! let record: Record = serde_json::from_str(r#"{"updated_at": ""}"#).unwrap();
//! assert!(record.updated_at.is_none());
//! ```

use crate::instant::{IsoDate, IsoDateVisitor};
use serde::{de, Deserializer, Serialize, Serializer};

/// Write `Some` as the canonical string and `None` as null.
pub fn serialize<S>(value: &Option<IsoDate>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    value.serialize(serializer)
}

/// Read `null` and `""` as `None`, anything else as an [`IsoDate`].
pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<IsoDate>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_option(OptionalVisitor)
}

struct OptionalVisitor;

impl<'de> de::Visitor<'de> for OptionalVisitor {
    type Value = Option<IsoDate>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("null or a timestamp")
    }

    fn visit_none<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(None)
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(None)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(IsoDateVisitor)
    }
}
