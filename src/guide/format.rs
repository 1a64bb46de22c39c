//! XMLTV text and timestamp formatting

use chrono::{DateTime, Datelike};
use quick_xml::escape::escape;
use std::borrow::Cow;

/// XMLTV timestamp profile, always rendered with an explicit UTC offset
pub const XMLTV_TIME_FORMAT: &str = "%Y%m%d%H%M%S %z";

/// Whether `c` may appear in an XML 1.0 document in any form
pub fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && c != '\u{FFFE}' && c != '\u{FFFF}')
}

/// Drop characters XML 1.0 does not allow, even as character references
fn strip_invalid_chars(input: &str) -> Cow<'_, str> {
    if input.chars().all(is_xml_char) {
        Cow::Borrowed(input)
    } else {
        Cow::Owned(input.chars().filter(|&c| is_xml_char(c)).collect())
    }
}

/// Escape upstream text for element content and attribute values.
///
/// Applied exactly once, at serialization time, to raw upstream text.
/// Characters that cannot appear in XML at all are removed first.
pub fn escape_xml(input: &str) -> Cow<'_, str> {
    match strip_invalid_chars(input) {
        Cow::Borrowed(clean) => escape(clean),
        Cow::Owned(clean) => Cow::Owned(escape(clean.as_str()).into_owned()),
    }
}

/// Render a Unix epoch timestamp as `YYYYMMDDHHMMSS +0000`.
///
/// Returns `None` for timestamps chrono cannot represent and for years that
/// do not fit in four digits.
pub fn format_xmltv_time(epoch_seconds: i64) -> Option<String> {
    DateTime::from_timestamp(epoch_seconds, 0)
        .filter(|dt| (0..=9999).contains(&dt.year()))
        .map(|dt| dt.format(XMLTV_TIME_FORMAT).to_string())
}
