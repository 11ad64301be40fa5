//! Generation options.
//!
//! [`UcidOptions`] is what callers build: every field is optional. It is
//! resolved into a [`ResolvedOptions`] by layering, field by field,
//! explicit caller values over preset values over defaults.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::format::SegmentFormat;
use crate::guard::{GenerationGuard, SharedGuard};
use crate::preset::preset_overrides;
use crate::random::RandomSource;
use crate::timestamp::TimestampPlacement;

/// Post-processing hook applied to each segment, given its text and index.
pub type SegmentTransform = Arc<dyn Fn(&str, usize) -> String + Send + Sync>;

pub const DEFAULT_SEGMENT_COUNT: usize = 4;
pub const DEFAULT_SEGMENT_LENGTH: usize = 8;
pub const DEFAULT_SEPARATOR: &str = "-";

/// Caller-supplied options. Unset fields fall back to the preset (if one is
/// named) and then to [`ResolvedOptions::default`].
#[derive(Clone, Default)]
pub struct UcidOptions {
    pub segment_count: Option<usize>,
    pub segment_length: Option<usize>,
    pub segment_format: Option<SegmentFormat>,
    pub uppercase: Option<bool>,
    pub lowercase: Option<bool>,
    pub digits: Option<bool>,
    pub symbols: Option<bool>,
    pub custom_charset: Option<String>,
    pub separator: Option<String>,
    pub timestamp: Option<TimestampPlacement>,
    pub timestamp_format: Option<String>,
    pub template: Option<String>,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    pub instances: Option<usize>,
    pub verbose: Option<bool>,
    pub random: Option<RandomSource>,
    pub preset: Option<String>,
    pub segment_transform: Option<SegmentTransform>,
    pub guard: Option<SharedGuard>,
}

impl UcidOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn segment_count(mut self, count: usize) -> Self {
        self.segment_count = Some(count);
        self
    }

    pub fn segment_length(mut self, len: usize) -> Self {
        self.segment_length = Some(len);
        self
    }

    /// Per-segment lengths, as a list (`vec![8, 4, 4]`) or a string (`"8-4-4"`).
    pub fn segment_format(mut self, format: impl Into<SegmentFormat>) -> Self {
        self.segment_format = Some(format.into());
        self
    }

    pub fn uppercase(mut self, enabled: bool) -> Self {
        self.uppercase = Some(enabled);
        self
    }

    pub fn lowercase(mut self, enabled: bool) -> Self {
        self.lowercase = Some(enabled);
        self
    }

    pub fn digits(mut self, enabled: bool) -> Self {
        self.digits = Some(enabled);
        self
    }

    pub fn symbols(mut self, enabled: bool) -> Self {
        self.symbols = Some(enabled);
        self
    }

    /// Replace the flag-derived charset entirely. Ignored when empty.
    pub fn custom_charset(mut self, charset: impl Into<String>) -> Self {
        self.custom_charset = Some(charset.into());
        self
    }

    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    pub fn timestamp(mut self, placement: TimestampPlacement) -> Self {
        self.timestamp = Some(placement);
        self
    }

    pub fn timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = Some(format.into());
        self
    }

    /// Template with `%id` and `%ts` placeholders.
    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn instances(mut self, count: usize) -> Self {
        self.instances = Some(count);
        self
    }

    pub fn verbose(mut self, enabled: bool) -> Self {
        self.verbose = Some(enabled);
        self
    }

    pub fn random(mut self, source: RandomSource) -> Self {
        self.random = Some(source);
        self
    }

    /// Name of a preset from the preset table (case-insensitive).
    pub fn preset(mut self, name: impl Into<String>) -> Self {
        self.preset = Some(name.into());
        self
    }

    pub fn segment_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(&str, usize) -> String + Send + Sync + 'static,
    {
        self.segment_transform = Some(Arc::new(transform));
        self
    }

    pub fn guard<G>(mut self, guard: G) -> Self
    where
        G: GenerationGuard + 'static,
    {
        self.guard = Some(Arc::new(guard));
        self
    }

    /// Resolve against the named preset (if any) and the defaults.
    pub fn resolve(&self) -> ResolvedOptions {
        let preset = self
            .preset
            .as_deref()
            .and_then(preset_overrides)
            .unwrap_or_default();
        ResolvedOptions::merge(self, &preset, ResolvedOptions::default())
    }
}

impl fmt::Debug for UcidOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UcidOptions")
            .field("segment_count", &self.segment_count)
            .field("segment_length", &self.segment_length)
            .field("segment_format", &self.segment_format)
            .field("uppercase", &self.uppercase)
            .field("lowercase", &self.lowercase)
            .field("digits", &self.digits)
            .field("symbols", &self.symbols)
            .field("custom_charset", &self.custom_charset)
            .field("separator", &self.separator)
            .field("timestamp", &self.timestamp)
            .field("timestamp_format", &self.timestamp_format)
            .field("template", &self.template)
            .field("prefix", &self.prefix)
            .field("suffix", &self.suffix)
            .field("instances", &self.instances)
            .field("verbose", &self.verbose)
            .field("random", &self.random)
            .field("preset", &self.preset)
            .field("segment_transform", &self.segment_transform.is_some())
            .field("guard", &self.guard.is_some())
            .finish()
    }
}

/// Fully resolved options for one generation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedOptions {
    pub segment_count: usize,
    pub segment_length: usize,
    pub segment_format: SegmentFormat,
    pub uppercase: bool,
    pub lowercase: bool,
    pub digits: bool,
    pub symbols: bool,
    pub custom_charset: Option<String>,
    pub separator: String,
    pub timestamp: TimestampPlacement,
    pub timestamp_format: Option<String>,
    pub template: Option<String>,
    pub prefix: String,
    pub suffix: String,
    pub instances: usize,
    pub verbose: bool,
    pub random: RandomSource,
    pub preset: Option<String>,
}

impl Default for ResolvedOptions {
    fn default() -> Self {
        Self {
            segment_count: DEFAULT_SEGMENT_COUNT,
            segment_length: DEFAULT_SEGMENT_LENGTH,
            segment_format: SegmentFormat::Unset,
            uppercase: false,
            lowercase: true,
            digits: true,
            symbols: false,
            custom_charset: None,
            separator: DEFAULT_SEPARATOR.to_string(),
            timestamp: TimestampPlacement::None,
            timestamp_format: None,
            template: None,
            prefix: String::new(),
            suffix: String::new(),
            instances: 1,
            verbose: false,
            random: RandomSource::Secure,
            preset: None,
        }
    }
}

fn layer<T: Clone>(explicit: &Option<T>, preset: &Option<T>, default: T) -> T {
    explicit.clone().or_else(|| preset.clone()).unwrap_or(default)
}

fn layer_opt<T: Clone>(explicit: &Option<T>, preset: &Option<T>, default: Option<T>) -> Option<T> {
    explicit.clone().or_else(|| preset.clone()).or(default)
}

impl ResolvedOptions {
    /// Three-way merge: explicit caller values win over preset values,
    /// which win over `defaults`.
    pub fn merge(explicit: &UcidOptions, preset: &UcidOptions, defaults: Self) -> Self {
        Self {
            segment_count: layer(&explicit.segment_count, &preset.segment_count, defaults.segment_count),
            segment_length: layer(
                &explicit.segment_length,
                &preset.segment_length,
                defaults.segment_length,
            ),
            segment_format: layer(
                &explicit.segment_format,
                &preset.segment_format,
                defaults.segment_format,
            ),
            uppercase: layer(&explicit.uppercase, &preset.uppercase, defaults.uppercase),
            lowercase: layer(&explicit.lowercase, &preset.lowercase, defaults.lowercase),
            digits: layer(&explicit.digits, &preset.digits, defaults.digits),
            symbols: layer(&explicit.symbols, &preset.symbols, defaults.symbols),
            custom_charset: layer_opt(
                &explicit.custom_charset,
                &preset.custom_charset,
                defaults.custom_charset,
            ),
            separator: layer(&explicit.separator, &preset.separator, defaults.separator),
            timestamp: layer(&explicit.timestamp, &preset.timestamp, defaults.timestamp),
            timestamp_format: layer_opt(
                &explicit.timestamp_format,
                &preset.timestamp_format,
                defaults.timestamp_format,
            ),
            template: layer_opt(&explicit.template, &preset.template, defaults.template),
            prefix: layer(&explicit.prefix, &preset.prefix, defaults.prefix),
            suffix: layer(&explicit.suffix, &preset.suffix, defaults.suffix),
            instances: layer(&explicit.instances, &preset.instances, defaults.instances),
            verbose: layer(&explicit.verbose, &preset.verbose, defaults.verbose),
            random: layer(&explicit.random, &preset.random, defaults.random),
            preset: layer_opt(&explicit.preset, &preset.preset, defaults.preset),
        }
    }
}
