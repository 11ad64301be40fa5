//! Named presets.
//!
//! A preset is a bundle of option overrides that mimics the shape of a
//! well-known identifier (`uuid`, `nanoid`, `cuid`, ...). It copies the
//! shape only; no preset reproduces the real scheme's algorithm.
//!
//! Names are case-insensitive. Aliases point at another name and are
//! followed transitively. Unknown names resolve to nothing.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use tracing::{debug, warn};

use crate::format::SegmentFormat;
use crate::options::UcidOptions;
use crate::timestamp::TimestampPlacement;

const HEX: &str = "1234567890abcdef";
const DECIMAL: &str = "1234567890";
const URL_SAFE: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789-_";
const BCRYPT: &str = "./ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const BASE64: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/=";

/// Static option overrides for one preset.
#[derive(Debug, Clone, Copy)]
struct Bundle {
    segment_count: Option<usize>,
    segment_length: Option<usize>,
    segment_format: Option<&'static [usize]>,
    uppercase: Option<bool>,
    lowercase: Option<bool>,
    digits: Option<bool>,
    custom_charset: Option<&'static str>,
    separator: Option<&'static str>,
    timestamp: Option<TimestampPlacement>,
    timestamp_format: Option<&'static str>,
    prefix: Option<&'static str>,
}

const NONE: Bundle = Bundle {
    segment_count: None,
    segment_length: None,
    segment_format: None,
    uppercase: None,
    lowercase: None,
    digits: None,
    custom_charset: None,
    separator: None,
    timestamp: None,
    timestamp_format: None,
    prefix: None,
};

impl Bundle {
    fn apply_to(&self, options: &mut UcidOptions) {
        if let Some(v) = self.segment_count {
            options.segment_count = Some(v);
        }
        if let Some(v) = self.segment_length {
            options.segment_length = Some(v);
        }
        if let Some(v) = self.segment_format {
            options.segment_format = Some(SegmentFormat::from(v));
        }
        if let Some(v) = self.uppercase {
            options.uppercase = Some(v);
        }
        if let Some(v) = self.lowercase {
            options.lowercase = Some(v);
        }
        if let Some(v) = self.digits {
            options.digits = Some(v);
        }
        if let Some(v) = self.custom_charset {
            options.custom_charset = Some(v.to_string());
        }
        if let Some(v) = self.separator {
            options.separator = Some(v.to_string());
        }
        if let Some(v) = self.timestamp {
            options.timestamp = Some(v);
        }
        if let Some(v) = self.timestamp_format {
            options.timestamp_format = Some(v.to_string());
        }
        if let Some(v) = self.prefix {
            options.prefix = Some(v.to_string());
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Preset {
    Bundle(Bundle),
    Alias(&'static str),
}

const fn hex_block(segment_count: usize, segment_length: usize) -> Preset {
    Preset::Bundle(Bundle {
        segment_count: Some(segment_count),
        segment_length: Some(segment_length),
        custom_charset: Some(HEX),
        separator: Some(""),
        ..NONE
    })
}

const fn single(segment_length: usize) -> Preset {
    Preset::Bundle(Bundle {
        segment_count: Some(1),
        segment_length: Some(segment_length),
        separator: Some(""),
        ..NONE
    })
}

static PRESETS: Lazy<HashMap<&'static str, Preset>> = Lazy::new(|| {
    HashMap::from([
        // uuid-like
        (
            "uuid",
            Preset::Bundle(Bundle {
                segment_count: Some(5),
                segment_format: Some(&[8, 4, 4, 4, 12]),
                custom_charset: Some(HEX),
                ..NONE
            }),
        ),
        ("uuidv4", Preset::Alias("uuid")),
        ("universal", Preset::Alias("uuid")),
        ("universal-id", Preset::Alias("universal")),
        (
            "shortuuid",
            Preset::Bundle(Bundle {
                segment_count: Some(4),
                segment_format: Some(&[8, 4, 4, 8]),
                custom_charset: Some(HEX),
                ..NONE
            }),
        ),
        ("short-uuid", Preset::Alias("shortuuid")),
        ("short-uuidv4", Preset::Alias("short-uuid")),
        // compact random ids
        (
            "nanoid",
            Preset::Bundle(Bundle {
                segment_count: Some(1),
                segment_length: Some(21),
                uppercase: Some(true),
                separator: Some(""),
                ..NONE
            }),
        ),
        ("nano-id", Preset::Alias("nanoid")),
        ("nano", Preset::Alias("nanoid")),
        (
            "ksuid",
            Preset::Bundle(Bundle {
                segment_count: Some(1),
                segment_length: Some(27),
                uppercase: Some(true),
                separator: Some(""),
                ..NONE
            }),
        ),
        (
            "ulid",
            Preset::Bundle(Bundle {
                segment_count: Some(2),
                segment_length: Some(13),
                uppercase: Some(true),
                lowercase: Some(false),
                separator: Some(""),
                ..NONE
            }),
        ),
        (
            "cuid",
            Preset::Bundle(Bundle {
                segment_count: Some(3),
                separator: Some(""),
                prefix: Some("c"),
                ..NONE
            }),
        ),
        (
            "snowflake",
            Preset::Bundle(Bundle {
                segment_count: Some(3),
                segment_length: Some(6),
                custom_charset: Some(DECIMAL),
                separator: Some(""),
                ..NONE
            }),
        ),
        ("snowflake-id", Preset::Alias("snowflake")),
        // digests
        ("sha", hex_block(5, 8)),
        ("sha1", Preset::Alias("sha")),
        ("sha256", hex_block(8, 8)),
        ("sha512", hex_block(16, 8)),
        ("md5", hex_block(1, 32)),
        // object ids
        (
            "object",
            Preset::Bundle(Bundle {
                segment_count: Some(3),
                segment_format: Some(&[8, 4, 8]),
                custom_charset: Some(HEX),
                separator: Some(""),
                ..NONE
            }),
        ),
        ("objectid", Preset::Alias("object")),
        ("object-id", Preset::Alias("object")),
        ("mongo", hex_block(1, 24)),
        ("objectid24", Preset::Alias("mongo")),
        ("objectid32", hex_block(1, 32)),
        // charset families
        (
            "digits",
            Preset::Bundle(Bundle {
                segment_count: Some(1),
                segment_length: Some(16),
                custom_charset: Some("0123456789"),
                separator: Some(""),
                ..NONE
            }),
        ),
        ("numeric", Preset::Alias("digits")),
        (
            "alphanumeric",
            Preset::Bundle(Bundle {
                segment_count: Some(1),
                segment_length: Some(16),
                uppercase: Some(true),
                lowercase: Some(true),
                digits: Some(true),
                separator: Some(""),
                ..NONE
            }),
        ),
        (
            "alpha",
            Preset::Bundle(Bundle {
                segment_count: Some(1),
                segment_length: Some(16),
                uppercase: Some(true),
                lowercase: Some(true),
                digits: Some(false),
                separator: Some(""),
                ..NONE
            }),
        ),
        (
            "hex",
            Preset::Bundle(Bundle {
                custom_charset: Some(HEX),
                ..NONE
            }),
        ),
        ("hexadecimal", Preset::Alias("hex")),
        // timestamped
        (
            "ts-id",
            Preset::Bundle(Bundle {
                segment_count: Some(2),
                segment_length: Some(6),
                timestamp: Some(TimestampPlacement::Prefix),
                ..NONE
            }),
        ),
        ("timestamp-id", Preset::Alias("ts-id")),
        (
            "epoch-id",
            Preset::Bundle(Bundle {
                segment_count: Some(1),
                segment_length: Some(8),
                timestamp: Some(TimestampPlacement::Prefix),
                timestamp_format: Some("unix"),
                ..NONE
            }),
        ),
        (
            "session-id",
            Preset::Bundle(Bundle {
                segment_count: Some(2),
                segment_length: Some(12),
                uppercase: Some(true),
                timestamp: Some(TimestampPlacement::Prefix),
                ..NONE
            }),
        ),
        (
            "zulu",
            Preset::Bundle(Bundle {
                segment_count: Some(2),
                segment_length: Some(6),
                uppercase: Some(true),
                lowercase: Some(false),
                timestamp: Some(TimestampPlacement::Prefix),
                timestamp_format: Some("utc"),
                ..NONE
            }),
        ),
        // token-like
        (
            "jwt-id",
            Preset::Bundle(Bundle {
                segment_count: Some(3),
                segment_length: Some(16),
                custom_charset: Some(URL_SAFE),
                separator: Some("."),
                ..NONE
            }),
        ),
        (
            "bcrypt-id",
            Preset::Bundle(Bundle {
                segment_count: Some(1),
                segment_length: Some(60),
                custom_charset: Some(BCRYPT),
                separator: Some(""),
                ..NONE
            }),
        ),
        (
            "argon-id",
            Preset::Bundle(Bundle {
                segment_count: Some(1),
                segment_length: Some(64),
                custom_charset: Some(BASE64),
                separator: Some(""),
                ..NONE
            }),
        ),
        (
            "host-id",
            Preset::Bundle(Bundle {
                segment_count: Some(4),
                segment_length: Some(6),
                custom_charset: Some(HEX),
                ..NONE
            }),
        ),
        ("machine-id", Preset::Alias("host-id")),
        // decorative
        ("short", single(8)),
        ("mini", single(6)),
        (
            "ghost",
            Preset::Bundle(Bundle {
                segment_count: Some(2),
                segment_length: Some(9),
                separator: Some("_"),
                ..NONE
            }),
        ),
        (
            "phantom",
            Preset::Bundle(Bundle {
                segment_count: Some(3),
                segment_length: Some(10),
                separator: Some("_"),
                ..NONE
            }),
        ),
        (
            "ninja",
            Preset::Bundle(Bundle {
                segment_count: Some(3),
                segment_length: Some(7),
                separator: Some("-"),
                prefix: Some("n"),
                ..NONE
            }),
        ),
        (
            "slug",
            Preset::Bundle(Bundle {
                segment_count: Some(3),
                segment_length: Some(5),
                digits: Some(false),
                separator: Some("-"),
                ..NONE
            }),
        ),
    ])
});

fn lookup(name: &str) -> Option<&'static Bundle> {
    let mut key = name.to_lowercase();
    // Any chain longer than the table must revisit a name.
    for _ in 0..=PRESETS.len() {
        match PRESETS.get(key.as_str())? {
            Preset::Bundle(bundle) => return Some(bundle),
            Preset::Alias(target) => key = (*target).to_string(),
        }
    }
    warn!(preset = name, "preset alias cycle");
    None
}

/// Whether `name` resolves to a preset.
pub fn is_preset(name: &str) -> bool {
    lookup(name).is_some()
}

/// Overrides for `name` as a fresh options value, or `None` when unknown.
pub fn preset_overrides(name: &str) -> Option<UcidOptions> {
    let bundle = lookup(name)?;
    debug!(preset = name, "resolved preset");
    let mut options = UcidOptions::default();
    bundle.apply_to(&mut options);
    Some(options)
}

/// Overwrite the fields `name` sets on `options`. Returns `false` and
/// leaves `options` untouched when `name` is unknown.
pub fn apply_preset(name: &str, options: &mut UcidOptions) -> bool {
    match lookup(name) {
        Some(bundle) => {
            bundle.apply_to(options);
            true
        }
        None => false,
    }
}

/// All preset names, aliases included, sorted.
pub fn preset_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = PRESETS.keys().copied().collect();
    names.sort_unstable();
    names
}
