//! Token-substituted timestamps.
//!
//! Recognized tokens:
//!
//! | Token | Value |
//! |---|---|
//! | `yyyy` / `yy` | full / two-digit year |
//! | `mm`, `dd`, `hh`, `min`, `ss` | zero-padded month, day, 24h hour, minute, second |
//! | `ms` | two-digit truncated centisecond |
//! | `unix`, `epoch` | whole seconds since the Unix epoch |
//! | `military` | `HHMMSS` |
//! | `iso` | ISO-8601 UTC instant with milliseconds |
//! | `utc` | ISO-8601 UTC instant without sub-second precision |
//! | `rfc`, `rfc3339` | local date-time with numeric offset |
//! | `filetime`, `winft` | Windows FILETIME (100ns ticks since 1601-01-01) |
//!
//! Anything else passes through unchanged.

use chrono::{DateTime, Datelike, FixedOffset, Local, SecondsFormat, Timelike, Utc};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;

/// Format used when none is configured.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "yyyymmdd";

/// Offset between 1601-01-01 and 1970-01-01 in 100ns ticks.
const FILETIME_UNIX_OFFSET: i64 = 116_444_736_000_000_000;

// Longer tokens first where one is a prefix of another.
static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"rfc3339|rfc|filetime|winft|military|epoch|unix|yyyy|yy|min|mm|ms|dd|hh|ss|iso|utc",
    )
    .unwrap()
});

/// Where a timestamp goes relative to the segment block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampPlacement {
    #[default]
    None,
    Prefix,
    Suffix,
}

impl TimestampPlacement {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Prefix => "prefix",
            Self::Suffix => "suffix",
        }
    }

    /// Parse a placement, accepting the short synonyms `p`, `pre`, `pref`,
    /// `s`, `suf` and `suff`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "" | "none" => Some(Self::None),
            "prefix" | "p" | "pre" | "pref" => Some(Self::Prefix),
            "suffix" | "s" | "suf" | "suff" => Some(Self::Suffix),
            _ => None,
        }
    }
}

fn render_token(token: &str, now: &DateTime<FixedOffset>) -> String {
    match token {
        "yyyy" => format!("{:04}", now.year()),
        "yy" => format!("{:02}", now.year().rem_euclid(100)),
        "mm" => format!("{:02}", now.month()),
        "dd" => format!("{:02}", now.day()),
        "hh" => format!("{:02}", now.hour()),
        "min" => format!("{:02}", now.minute()),
        "ss" => format!("{:02}", now.second()),
        "ms" => format!("{:02}", now.timestamp_subsec_millis().min(999) / 10),
        "unix" | "epoch" => now.timestamp().to_string(),
        "military" => now.format("%H%M%S").to_string(),
        "iso" => now
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Millis, true),
        "utc" => now
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Secs, true),
        "rfc" | "rfc3339" => now.to_rfc3339_opts(SecondsFormat::Secs, false),
        "filetime" | "winft" => (now.timestamp_millis() * 10_000 + FILETIME_UNIX_OFFSET).to_string(),
        other => other.to_string(),
    }
}

/// Render `format` for a given instant.
pub fn format_timestamp_at(format: &str, now: &DateTime<FixedOffset>) -> String {
    TOKEN_PATTERN
        .replace_all(format, |caps: &Captures<'_>| render_token(&caps[0], now))
        .into_owned()
}

/// Render `format` (or [`DEFAULT_TIMESTAMP_FORMAT`]) for the current local time.
pub fn format_timestamp(format: Option<&str>) -> String {
    let now = Local::now().fixed_offset();
    format_timestamp_at(format.unwrap_or(DEFAULT_TIMESTAMP_FORMAT), &now)
}
