//! Fixed-layout local time formatting and parsing.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// `2006/01/02`
    DateSlash,
    /// `2006-01-02 15:04:05`
    FullTime,
    /// `2006-01-02 15:04`
    FullTimeNoSecond,
    /// `2006-01-02`, the layout used in query strings
    Query,
    /// `2006/01/02 15:04:05`, full time with slash-separated date
    FullTimeSlash,
    /// `20060102150405`, digits only with no separators
    Compact,
}

impl Layout {
    pub fn pattern(&self) -> &'static str {
        match self {
            Layout::DateSlash => "%Y/%m/%d",
            Layout::FullTime => "%Y-%m-%d %H:%M:%S",
            Layout::FullTimeNoSecond => "%Y-%m-%d %H:%M",
            Layout::Query => "%Y-%m-%d",
            Layout::FullTimeSlash => "%Y/%m/%d %H:%M:%S",
            Layout::Compact => "%Y%m%d%H%M%S",
        }
    }

    fn is_date_only(&self) -> bool {
        matches!(self, Layout::DateSlash | Layout::Query)
    }
}

/// Formats `t` in local time.
pub fn format<Tz: TimeZone>(layout: Layout, t: &DateTime<Tz>) -> String {
    t.with_timezone(&Local).format(layout.pattern()).to_string()
}

/// Empty string for `None`.
pub fn format_opt<Tz: TimeZone>(layout: Layout, t: Option<&DateTime<Tz>>) -> String {
    t.map(|t| format(layout, t)).unwrap_or_default()
}

/// Parses `s` as local time. Empty or malformed input yields `None`.
pub fn parse(layout: Layout, s: &str) -> Option<DateTime<Local>> {
    if s.is_empty() {
        return None;
    }

    let naive = if layout.is_date_only() {
        NaiveDate::parse_from_str(s, layout.pattern())
            .ok()?
            .and_hms_opt(0, 0, 0)?
    } else {
        NaiveDateTime::parse_from_str(s, layout.pattern()).ok()?
    };

    Local.from_local_datetime(&naive).earliest()
}
