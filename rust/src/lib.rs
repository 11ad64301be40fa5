//! ucid: customizable random identifier generation.
//!
//! A UCID is a block of random segments ("octets") drawn from a configurable
//! charset and joined by a separator, optionally wrapped with a timestamp,
//! a prefix and a suffix, or substituted into a template.
//!
//! # Format
//!
//! ```text
//! UCID     ::= PREFIX [ TS SEP ] SEGMENT { SEP SEGMENT } [ SEP TS ] SUFFIX
//! TEMPLATE ::= any text with "%id" and "%ts" placeholders
//! ```
//!
//! # Example
//!
//! ```
//! use ucid::{UcidOptions, UcidOutput, generate, generate_from_preset};
//!
//! let out = generate(&UcidOptions::new().segment_count(3).prefix("user-"))
//!     .expect("valid options")
//!     .expect("no guard configured");
//! if let UcidOutput::Single(id) = out {
//!     println!("{}", id.id()); // e.g. "user-k3f9a0qd-1xv0b7mz-9c2dw8le"
//! }
//!
//! let uuid_like = generate_from_preset("uuid").expect("preset is valid");
//! assert_eq!(uuid_like.len(), 1);
//! ```

mod format;
mod guard;
mod options;
mod preset;
mod random;
mod timestamp;
mod ucid;

pub use format::{SegmentFormat, resolve_length};
pub use guard::{DEFAULT_REJECTION_MESSAGE, GenerationGuard, GuardDecision, Rejection, SharedGuard};
pub use options::{
    DEFAULT_SEGMENT_COUNT, DEFAULT_SEGMENT_LENGTH, DEFAULT_SEPARATOR, ResolvedOptions,
    SegmentTransform, UcidOptions,
};
pub use preset::{apply_preset, is_preset, preset_names, preset_overrides};
pub use random::RandomSource;
pub use timestamp::{
    DEFAULT_TIMESTAMP_FORMAT, TimestampPlacement, format_timestamp, format_timestamp_at,
};
pub use ucid::{
    DIGIT_CHARS, LOWERCASE_CHARS, SYMBOL_CHARS, UPPERCASE_CHARS, Ucid, UcidError, UcidGen,
    UcidOutput, VerboseUcid, build_charset, generate, generate_from_preset,
};
