//! UCID assembly.
//!
//! An ID is `prefix [timestamp sep] seg (sep seg)* [sep timestamp] suffix`,
//! where each segment is drawn from the resolved charset at the length the
//! format resolver gives for its index. A template replaces that shape:
//! every `%id` becomes a freshly assembled ID and every `%ts` a fresh
//! timestamp.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::format::resolve_length;
use crate::guard::{DEFAULT_REJECTION_MESSAGE, GuardDecision, Rejection};
use crate::options::{ResolvedOptions, SegmentTransform, UcidOptions};
use crate::timestamp::{TimestampPlacement, format_timestamp};

pub const UPPERCASE_CHARS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const LOWERCASE_CHARS: &str = "abcdefghijklmnopqrstuvwxyz";
pub const DIGIT_CHARS: &str = "0123456789";
pub const SYMBOL_CHARS: &str = "!$%&";

static TEMPLATE_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"%id|%ts").unwrap());

/// Errors that can occur during UCID generation.
#[derive(Error, Debug)]
pub enum UcidError {
    #[error("Segment count must be greater than 0")]
    InvalidSegmentCount,
    #[error("Segment length must be greater than 0")]
    InvalidSegmentLength,
    #[error("Character set is empty. Adjust your options.")]
    EmptyCharset,
    #[error("{0}")]
    GuardRejected(Box<dyn std::error::Error + Send + Sync>),
    #[error("Secure random source failed: {0}")]
    Entropy(String),
}

/// A generated ID together with the options that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerboseUcid {
    pub id: String,
    #[serde(flatten)]
    pub options: ResolvedOptions,
}

/// One generated result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Ucid {
    Plain(String),
    Verbose(VerboseUcid),
}

impl Ucid {
    pub fn id(&self) -> &str {
        match self {
            Self::Plain(id) => id,
            Self::Verbose(v) => &v.id,
        }
    }
}

/// Result of a generation call: a single value when one instance was
/// requested, a list otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum UcidOutput {
    Single(Ucid),
    Batch(Vec<Ucid>),
}

impl UcidOutput {
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Batch(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_vec(self) -> Vec<Ucid> {
        match self {
            Self::Single(item) => vec![item],
            Self::Batch(items) => items,
        }
    }
}

/// Charset for `options`: the custom charset when non-empty, otherwise the
/// enabled classes in the order uppercase, lowercase, digits, symbols.
pub fn build_charset(options: &ResolvedOptions) -> Vec<char> {
    if let Some(custom) = options.custom_charset.as_deref().filter(|c| !c.is_empty()) {
        return custom.chars().collect();
    }

    [
        (options.uppercase, UPPERCASE_CHARS),
        (options.lowercase, LOWERCASE_CHARS),
        (options.digits, DIGIT_CHARS),
        (options.symbols, SYMBOL_CHARS),
    ]
    .into_iter()
    .filter(|(enabled, _)| *enabled)
    .flat_map(|(_, chars)| chars.chars())
    .collect()
}

/// Validated generator for one set of resolved options.
pub struct UcidGen {
    options: ResolvedOptions,
    charset: Vec<char>,
    transform: Option<SegmentTransform>,
}

impl UcidGen {
    /// Resolve `options` and build a generator. Guards are not consulted here.
    pub fn new(options: &UcidOptions) -> Result<Self, UcidError> {
        Self::from_resolved(options.resolve(), options.segment_transform.clone())
    }

    pub fn from_resolved(
        options: ResolvedOptions,
        transform: Option<SegmentTransform>,
    ) -> Result<Self, UcidError> {
        if options.segment_count == 0 {
            return Err(UcidError::InvalidSegmentCount);
        }
        if options.segment_length == 0 {
            return Err(UcidError::InvalidSegmentLength);
        }

        let charset = build_charset(&options);
        if charset.is_empty() {
            return Err(UcidError::EmptyCharset);
        }

        debug!(
            segments = options.segment_count,
            segment_length = options.segment_length,
            charset_len = charset.len(),
            preset = options.preset.as_deref().unwrap_or(""),
            random = options.random.as_str(),
            "ucid generator ready"
        );

        Ok(Self {
            options,
            charset,
            transform,
        })
    }

    pub fn options(&self) -> &ResolvedOptions {
        &self.options
    }

    pub fn charset(&self) -> &[char] {
        &self.charset
    }

    fn segment(&self, index: usize) -> Result<String, UcidError> {
        let o = &self.options;
        let len = resolve_length(&o.segment_format, index, o.segment_length, &o.separator);
        let raw = o.random.sample(&self.charset, len)?;
        Ok(match &self.transform {
            Some(transform) => transform(&raw, index),
            None => raw,
        })
    }

    fn assemble(&self) -> Result<String, UcidError> {
        let o = &self.options;
        let segments = (0..o.segment_count)
            .map(|i| self.segment(i))
            .collect::<Result<Vec<_>, _>>()?;
        let block = segments.join(&o.separator);

        let ts_format = o.timestamp_format.as_deref();
        let body = match o.timestamp {
            TimestampPlacement::None => block,
            TimestampPlacement::Prefix => {
                format!("{}{}{}", format_timestamp(ts_format), o.separator, block)
            }
            TimestampPlacement::Suffix => {
                format!("{}{}{}", block, o.separator, format_timestamp(ts_format))
            }
        };

        Ok(format!("{}{}{}", o.prefix, body, o.suffix))
    }

    fn render_template(&self, template: &str) -> Result<String, UcidError> {
        let mut out = String::with_capacity(template.len() * 2);
        let mut last = 0;
        for m in TEMPLATE_TOKEN.find_iter(template) {
            out.push_str(&template[last..m.start()]);
            if m.as_str() == "%id" {
                out.push_str(&self.assemble()?);
            } else {
                out.push_str(&format_timestamp(self.options.timestamp_format.as_deref()));
            }
            last = m.end();
        }
        out.push_str(&template[last..]);
        Ok(out)
    }

    /// Generate the next ID string, through the template when one is set.
    pub fn next_ucid(&mut self) -> Result<String, UcidError> {
        match &self.options.template {
            Some(template) => self.render_template(template),
            None => self.assemble(),
        }
    }

    /// Generate n ID strings.
    pub fn next_n(&mut self, n: usize) -> Result<Vec<String>, UcidError> {
        self.take(n).collect()
    }

    fn next_record(&mut self) -> Result<Ucid, UcidError> {
        if self.options.template.is_some() || !self.options.verbose {
            return self.next_ucid().map(Ucid::Plain);
        }
        Ok(Ucid::Verbose(VerboseUcid {
            id: self.assemble()?,
            options: self.options.clone(),
        }))
    }

    /// Produce the configured number of instances in the configured shape.
    pub fn generate(&mut self) -> Result<UcidOutput, UcidError> {
        if self.options.instances > 1 {
            let items = (0..self.options.instances)
                .map(|_| self.next_record())
                .collect::<Result<Vec<_>, _>>()?;
            Ok(UcidOutput::Batch(items))
        } else {
            self.next_record().map(UcidOutput::Single)
        }
    }
}

impl Iterator for UcidGen {
    type Item = Result<String, UcidError>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_ucid())
    }
}

/// Generate UCIDs for `options`.
///
/// Returns `Ok(None)` when the guard declines with a plain message; the
/// decline is logged. A guard rejecting with an error fails the call.
pub fn generate(options: &UcidOptions) -> Result<Option<UcidOutput>, UcidError> {
    let resolved = options.resolve();

    if let Some(guard) = &options.guard {
        match guard.check() {
            GuardDecision::Accepted => {}
            GuardDecision::Rejected(Rejection::Error(err)) => {
                return Err(UcidError::GuardRejected(err));
            }
            GuardDecision::Rejected(Rejection::Message(msg)) => {
                let reason = msg.as_deref().unwrap_or(DEFAULT_REJECTION_MESSAGE);
                warn!(reason, "ucid generation declined by guard");
                return Ok(None);
            }
        }
    }

    let mut generator = UcidGen::from_resolved(resolved, options.segment_transform.clone())?;
    generator.generate().map(Some)
}

/// Generate with a named preset over the defaults. Unknown names fall back
/// to the default shape.
pub fn generate_from_preset(name: &str) -> Result<UcidOutput, UcidError> {
    UcidGen::new(&UcidOptions::new().preset(name))?.generate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::SegmentFormat;
    use crate::random::RandomSource;

    fn single_id(output: Option<UcidOutput>) -> String {
        match output {
            Some(UcidOutput::Single(Ucid::Plain(id))) => id,
            other => panic!("expected a single plain id, got {other:?}"),
        }
    }

    fn is_lower_alnum(c: char) -> bool {
        c.is_ascii_lowercase() || c.is_ascii_digit()
    }

    #[test]
    fn test_default_shape() {
        let id = single_id(generate(&UcidOptions::new()).unwrap());
        let parts: Vec<&str> = id.split('-').collect();
        assert_eq!(parts.len(), 4);
        assert!(parts.iter().all(|p| p.len() == 8));
        assert!(parts.iter().all(|p| p.chars().all(is_lower_alnum)));
        assert_eq!(id.len(), 4 * 8 + 3);
    }

    #[test]
    fn test_segment_format_list_and_string() {
        let opts = UcidOptions::new()
            .segment_count(3)
            .segment_format(vec![4usize, 6, 8]);
        let id = single_id(generate(&opts).unwrap());
        let lens: Vec<usize> = id.split('-').map(str::len).collect();
        assert_eq!(lens, vec![4, 6, 8]);

        let id = single_id(
            generate(
                &UcidOptions::new()
                    .segment_count(4)
                    .separator(":")
                    .segment_format("2:3"),
            )
            .unwrap(),
        );
        let lens: Vec<usize> = id.split(':').map(str::len).collect();
        assert_eq!(lens, vec![2, 3, 8, 8]);
    }

    #[test]
    fn test_block_length_with_multichar_separator() {
        let id = single_id(
            generate(
                &UcidOptions::new()
                    .segment_count(3)
                    .segment_format("357")
                    .separator("::"),
            )
            .unwrap(),
        );
        assert_eq!(id.len(), 3 + 5 + 7 + 2 * 2);
    }

    #[test]
    fn test_zero_count_or_length_fails() {
        assert!(matches!(
            generate(&UcidOptions::new().segment_count(0)),
            Err(UcidError::InvalidSegmentCount)
        ));
        assert!(matches!(
            generate(&UcidOptions::new().segment_length(0)),
            Err(UcidError::InvalidSegmentLength)
        ));
    }

    #[test]
    fn test_empty_charset_fails() {
        let opts = UcidOptions::new()
            .uppercase(false)
            .lowercase(false)
            .digits(false)
            .symbols(false);
        let err = generate(&opts).unwrap_err();
        assert!(matches!(err, UcidError::EmptyCharset));
        assert_eq!(err.to_string(), "Character set is empty. Adjust your options.");
    }

    #[test]
    fn test_custom_charset_overrides_flags() {
        let opts = UcidOptions::new()
            .custom_charset("XY")
            .uppercase(true)
            .symbols(true)
            .random(RandomSource::Fast);
        let id = single_id(generate(&opts).unwrap());
        assert!(id.split('-').flat_map(str::chars).all(|c| c == 'X' || c == 'Y'));
    }

    #[test]
    fn test_empty_custom_charset_uses_flags() {
        let r = UcidOptions::new().custom_charset("").symbols(true).resolve();
        let charset: String = build_charset(&r).into_iter().collect();
        assert_eq!(charset, format!("{LOWERCASE_CHARS}{DIGIT_CHARS}{SYMBOL_CHARS}"));
    }

    #[test]
    fn test_charset_order() {
        let r = UcidOptions::new().uppercase(true).symbols(true).resolve();
        let charset: String = build_charset(&r).into_iter().collect();
        assert_eq!(
            charset,
            format!("{UPPERCASE_CHARS}{LOWERCASE_CHARS}{DIGIT_CHARS}{SYMBOL_CHARS}")
        );
    }

    #[test]
    fn test_template() {
        let opts = UcidOptions::new()
            .template("user-%id-%ts")
            .timestamp_format("yyyy");
        let id = single_id(generate(&opts).unwrap());
        let rest = id.strip_prefix("user-").unwrap();
        let (block, year) = rest.rsplit_once('-').unwrap();
        assert_eq!(year.len(), 4);
        assert!(year.chars().all(|c| c.is_ascii_digit()));
        let parts: Vec<&str> = block.split('-').collect();
        assert_eq!(parts.len(), 4);
        assert!(parts.iter().all(|p| p.len() == 8));
    }

    #[test]
    fn test_template_ids_are_independent() {
        let opts = UcidOptions::new()
            .segment_count(1)
            .segment_length(16)
            .prefix("<")
            .suffix(">")
            .template("%id|%id");
        let id = single_id(generate(&opts).unwrap());
        let (a, b) = id.split_once('|').unwrap();
        assert!(a.starts_with('<') && a.ends_with('>'));
        assert_eq!(a.len(), 18);
        assert_ne!(a, b);
    }

    #[test]
    fn test_template_wins_over_verbose() {
        let opts = UcidOptions::new().template("x-%id").verbose(true).instances(2);
        match generate(&opts).unwrap() {
            Some(UcidOutput::Batch(items)) => {
                assert_eq!(items.len(), 2);
                assert!(items
                    .iter()
                    .all(|u| matches!(u, Ucid::Plain(s) if s.starts_with("x-"))));
            }
            other => panic!("unexpected output {other:?}"),
        }
    }

    #[test]
    fn test_instances_batch() {
        let output = generate(&UcidOptions::new().instances(3)).unwrap().unwrap();
        assert_eq!(output.len(), 3);
        let items = output.into_vec();
        for item in &items {
            assert_eq!(item.id().split('-').count(), 4);
        }
        assert_ne!(items[0], items[1]);
    }

    #[test]
    fn test_single_instance_is_not_a_list() {
        let output = generate(&UcidOptions::new().instances(1)).unwrap().unwrap();
        assert!(matches!(output, UcidOutput::Single(_)));
        let zero = generate(&UcidOptions::new().instances(0)).unwrap().unwrap();
        assert!(matches!(zero, UcidOutput::Single(_)));
    }

    #[test]
    fn test_uuid_preset() {
        let output = generate_from_preset("uuid").unwrap();
        let id = match output {
            UcidOutput::Single(u) => u.id().to_string(),
            other => panic!("unexpected output {other:?}"),
        };
        let lens: Vec<usize> = id.split('-').map(str::len).collect();
        assert_eq!(lens, vec![8, 4, 4, 4, 12]);
        assert!(id
            .chars()
            .all(|c| c == '-' || c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_presets_shape() {
        let nano = generate_from_preset("NANOID").unwrap().into_vec();
        assert_eq!(nano[0].id().len(), 21);

        let cuid = generate_from_preset("cuid").unwrap().into_vec();
        assert!(cuid[0].id().starts_with('c'));
        assert_eq!(cuid[0].id().len(), 1 + 3 * 8);

        let ninja = generate_from_preset("ninja").unwrap().into_vec();
        assert!(ninja[0].id().starts_with('n'));
        assert_eq!(ninja[0].id().split('-').count(), 3);

        let unknown = generate_from_preset("definitely-not-a-preset").unwrap().into_vec();
        assert_eq!(unknown[0].id().len(), 35);
    }

    #[test]
    fn test_epoch_preset_prefix() {
        let id = generate_from_preset("epoch-id").unwrap().into_vec()[0].id().to_string();
        let (ts, block) = id.split_once('-').unwrap();
        assert!(ts.parse::<i64>().unwrap() > 1_700_000_000);
        assert_eq!(block.len(), 8);
    }

    #[test]
    fn test_explicit_options_override_preset() {
        let opts = UcidOptions::new().preset("uuid").separator("_").custom_charset("01");
        let id = single_id(generate(&opts).unwrap());
        let lens: Vec<usize> = id.split('_').map(str::len).collect();
        assert_eq!(lens, vec![8, 4, 4, 4, 12]);
        assert!(id.chars().all(|c| matches!(c, '0' | '1' | '_')));
    }

    #[test]
    fn test_verbose_single_record() {
        let output = generate(&UcidOptions::new().verbose(true)).unwrap().unwrap();
        let record = match output {
            UcidOutput::Single(Ucid::Verbose(v)) => v,
            other => panic!("unexpected output {other:?}"),
        };
        assert_eq!(record.id.len(), 35);
        assert_eq!(record.options, UcidOptions::new().verbose(true).resolve());

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], record.id.as_str());
        assert_eq!(json["segment_count"], 4);
        assert_eq!(json["verbose"], true);
        assert_eq!(json["separator"], "-");
    }

    #[test]
    fn test_timestamp_placement() {
        let pre = single_id(
            generate(&UcidOptions::new().timestamp(TimestampPlacement::Prefix)).unwrap(),
        );
        let parts: Vec<&str> = pre.split('-').collect();
        assert_eq!(parts.len(), 5);
        assert_eq!(parts[0].len(), 8);
        assert!(parts[0].chars().all(|c| c.is_ascii_digit()));

        let suf = single_id(
            generate(
                &UcidOptions::new()
                    .timestamp(TimestampPlacement::Suffix)
                    .timestamp_format("unix")
                    .prefix("[")
                    .suffix("]"),
            )
            .unwrap(),
        );
        assert!(suf.starts_with('[') && suf.ends_with(']'));
        let inner = &suf[1..suf.len() - 1];
        let (_, ts) = inner.rsplit_once('-').unwrap();
        assert!(ts.parse::<i64>().is_ok());
    }

    #[test]
    fn test_segment_transform_gets_index() {
        let opts = UcidOptions::new()
            .segment_count(3)
            .segment_transform(|seg, i| format!("{i}{}", seg.to_uppercase()));
        let id = single_id(generate(&opts).unwrap());
        for (i, part) in id.split('-').enumerate() {
            assert!(part.starts_with(&i.to_string()));
            assert_eq!(part.len(), 9);
            assert!(!part.chars().any(|c| c.is_ascii_lowercase()));
        }
    }

    #[test]
    fn test_guard_accept() {
        let opts = UcidOptions::new().guard(|| GuardDecision::Accepted);
        assert!(generate(&opts).unwrap().is_some());
    }

    #[test]
    fn test_guard_soft_decline_returns_nothing() {
        let opts = UcidOptions::new().guard(|| GuardDecision::Rejected(Rejection::message("closed")));
        assert!(generate(&opts).unwrap().is_none());

        let silent = UcidOptions::new().guard(|| GuardDecision::from(false));
        assert!(generate(&silent).unwrap().is_none());
    }

    #[test]
    fn test_guard_error_propagates() {
        let opts = UcidOptions::new()
            .guard(|| GuardDecision::Rejected(Rejection::error("quota exhausted")));
        let err = generate(&opts).unwrap_err();
        assert!(matches!(err, UcidError::GuardRejected(_)));
        assert_eq!(err.to_string(), "quota exhausted");
    }

    #[test]
    fn test_guard_runs_before_validation() {
        let opts = UcidOptions::new()
            .segment_count(0)
            .guard(|| GuardDecision::Rejected(Rejection::Message(None)));
        assert!(generate(&opts).unwrap().is_none());
    }

    #[test]
    fn test_generator_iterator() {
        let mut generator = UcidGen::new(&UcidOptions::new().preset("short")).unwrap();
        assert_eq!(generator.charset().len(), 36);
        let ids = generator.next_n(5).unwrap();
        assert_eq!(ids.len(), 5);
        assert!(ids.iter().all(|id| id.len() == 8));

        let more: Vec<String> = generator.take(2).collect::<Result<_, _>>().unwrap();
        assert_eq!(more.len(), 2);
    }

    #[test]
    fn test_generator_rejects_invalid() {
        let r = ResolvedOptions {
            segment_format: SegmentFormat::from("44"),
            segment_length: 0,
            ..ResolvedOptions::default()
        };
        assert!(matches!(
            UcidGen::from_resolved(r, None),
            Err(UcidError::InvalidSegmentLength)
        ));
    }
}
