//! Per-segment length resolution.
//!
//! A segment format is either an explicit list of lengths (`[8, 4, 4]`) or a
//! string. A string containing the separator is split on it (`"4-6-8"`);
//! otherwise every character is read as a single-digit length (`"468"`).
//!
//! A length of `0`, a missing position or a non-numeric entry all fall back
//! to the default segment length, so zero-length segments cannot be
//! requested through a format.

use serde::Serialize;

/// Per-segment length specification.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(untagged)]
pub enum SegmentFormat {
    #[default]
    Unset,
    ByList(Vec<usize>),
    ByDelimitedString(String),
}

impl SegmentFormat {
    pub fn is_unset(&self) -> bool {
        match self {
            Self::Unset => true,
            Self::ByList(lengths) => lengths.is_empty(),
            Self::ByDelimitedString(s) => s.is_empty(),
        }
    }
}

impl From<Vec<usize>> for SegmentFormat {
    fn from(lengths: Vec<usize>) -> Self {
        Self::ByList(lengths)
    }
}

impl From<&[usize]> for SegmentFormat {
    fn from(lengths: &[usize]) -> Self {
        Self::ByList(lengths.to_vec())
    }
}

impl From<&str> for SegmentFormat {
    fn from(s: &str) -> Self {
        Self::ByDelimitedString(s.to_string())
    }
}

impl From<String> for SegmentFormat {
    fn from(s: String) -> Self {
        Self::ByDelimitedString(s)
    }
}

fn non_zero_or(value: Option<usize>, default_len: usize) -> usize {
    match value {
        Some(n) if n > 0 => n,
        _ => default_len,
    }
}

/// Length of the segment at `index`.
pub fn resolve_length(
    format: &SegmentFormat,
    index: usize,
    default_len: usize,
    separator: &str,
) -> usize {
    match format {
        SegmentFormat::Unset => default_len,
        SegmentFormat::ByList(lengths) => non_zero_or(lengths.get(index).copied(), default_len),
        SegmentFormat::ByDelimitedString(spec) => {
            let value = if !separator.is_empty() && spec.contains(separator) {
                spec.split(separator)
                    .nth(index)
                    .and_then(|part| part.trim().parse::<usize>().ok())
            } else {
                spec.chars()
                    .nth(index)
                    .and_then(|c| c.to_digit(10))
                    .map(|d| d as usize)
            };
            non_zero_or(value, default_len)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_lookup() {
        let f = SegmentFormat::from(vec![4usize, 6, 8]);
        assert_eq!(resolve_length(&f, 1, 8, "-"), 6);
        assert_eq!(resolve_length(&f, 3, 8, "-"), 8);
    }

    #[test]
    fn test_delimited_string() {
        let f = SegmentFormat::from("4-6-8");
        assert_eq!(resolve_length(&f, 0, 8, "-"), 4);
        assert_eq!(resolve_length(&f, 2, 8, "-"), 8);
        assert_eq!(resolve_length(&f, 5, 3, "-"), 3);

        let wide = SegmentFormat::from("12-4");
        assert_eq!(resolve_length(&wide, 0, 8, "-"), 12);
    }

    #[test]
    fn test_digit_string() {
        let f = SegmentFormat::from("468");
        assert_eq!(resolve_length(&f, 1, 8, "-"), 6);
        assert_eq!(resolve_length(&f, 3, 7, "-"), 7);
    }

    #[test]
    fn test_zero_falls_back_to_default() {
        assert_eq!(resolve_length(&SegmentFormat::from("048"), 0, 8, "-"), 8);
        assert_eq!(resolve_length(&SegmentFormat::from(vec![0usize, 3]), 0, 5, "-"), 5);
        assert_eq!(resolve_length(&SegmentFormat::from("0-3"), 0, 5, "-"), 5);
    }

    #[test]
    fn test_non_numeric_falls_back() {
        assert_eq!(resolve_length(&SegmentFormat::from("4x8"), 1, 9, "-"), 9);
        assert_eq!(resolve_length(&SegmentFormat::from("4-x-8"), 1, 9, "-"), 9);
    }

    #[test]
    fn test_empty_separator_reads_digits() {
        let f = SegmentFormat::from("4-6");
        assert_eq!(resolve_length(&f, 0, 8, ""), 4);
        // '-' is not a digit
        assert_eq!(resolve_length(&f, 1, 8, ""), 8);
        assert_eq!(resolve_length(&f, 2, 8, ""), 6);
    }

    #[test]
    fn test_unset_and_is_unset() {
        assert_eq!(resolve_length(&SegmentFormat::Unset, 0, 8, "-"), 8);
        assert!(SegmentFormat::Unset.is_unset());
        assert!(SegmentFormat::from("").is_unset());
        assert!(SegmentFormat::from(Vec::<usize>::new()).is_unset());
        assert!(!SegmentFormat::from("4").is_unset());
    }
}
