// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Canonical rendering.
//!
//! Every outbound encoding writes exactly one layout:
//!
//! ```text
//! YYYY-MM-DDThh:mm:ss.sss+0000
//! ```
//!
//! Four-digit year, millisecond precision (truncated, never rounded) and a
//! numeric offset.  Values are UTC internally, so the offset is always
//! `+0000`.  Years outside `[0, 9999]` have no four-digit form and are
//! refused rather than written in some other shape.

use crate::error::Result;
use crate::instant::IsoDate;

/// `strftime` layout of the canonical form.
///
/// Stage two of the fallback chain parses with the same string, where `%3f`
/// demands exactly three fraction digits; it also takes a literal `Z` in
/// place of the offset.
pub const CANONICAL_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S.%3f%z";

impl IsoDate {
    /// Render the canonical form, e.g. `2017-09-20T11:37:53.000+0000`.
    ///
    /// # Errors
    ///
    /// [`IsoDateError::YearOutOfRange`](crate::IsoDateError::YearOutOfRange)
    /// when the UTC year is below 0 or above 9999.
    pub fn to_canonical(&self) -> Result<String> {
        self.check_representable()?;
        Ok(self.datetime().format(CANONICAL_LAYOUT).to_string())
    }
}
