//! Value rendering shared by both processors.

use chrono::{DateTime, FixedOffset, Utc};

use crate::filter::{Restriction, RestrictionValue};
use crate::{Error, Result};

/// Placeholder the V2 API uses for "no value".
pub const NULL_VALUE: &str = "\u{0000}";

/// Placeholder the V2 API uses for "no value" on timestamp attributes.
pub const NULL_DATE: &str = "1970-01-01T00:00:00.000+0000";

/// Wire format for dates: `YYYY-MM-DDTHH:mm:ss.SSS+0000`.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// Characters `encodeURIComponent` leaves alone besides the unreserved set.
const COMPONENT_SAFE: &[char] = &['!', '\'', '(', ')', '*'];

/// Format a date in UTC using [`DATE_FORMAT`].
pub fn format_date(date: &DateTime<FixedOffset>) -> String {
    date.with_timezone(&Utc).format(DATE_FORMAT).to_string()
}

/// Percent-encode a URI component.
///
/// Alphanumerics, `-_.~` and `!'()*` are kept; every other character is
/// written as its UTF-8 bytes in `%XX` form.
pub fn encode_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut buf = [0u8; 4];
    for c in input.chars() {
        if COMPONENT_SAFE.contains(&c) {
            out.push(c);
        } else {
            out.push_str(&urlencoding::encode(c.encode_utf8(&mut buf)));
        }
    }
    out
}

/// Plain string form: enums by label, dates in [`DATE_FORMAT`].
pub fn label_form(value: &RestrictionValue) -> String {
    match value {
        RestrictionValue::Str(s) => s.clone(),
        RestrictionValue::Int(i) => i.to_string(),
        RestrictionValue::Float(f) => f.to_string(),
        RestrictionValue::Bool(b) => b.to_string(),
        RestrictionValue::Enum(e) => e.label.to_string(),
        RestrictionValue::Date(d) => format_date(d),
    }
}

/// Plain string form with enums by numeric id.
pub fn id_form(value: &RestrictionValue) -> String {
    match value {
        RestrictionValue::Enum(e) => e.id.to_string(),
        other => label_form(other),
    }
}

pub(crate) fn check_attribute(restriction: &Restriction) -> Result<()> {
    if restriction.attribute.trim().is_empty() {
        return Err(Error::InvalidRestriction(format!(
            "{} restriction has an empty attribute name",
            restriction.comparator
        )));
    }
    Ok(())
}
