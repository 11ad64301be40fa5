//! Random character sources.
//!
//! Two sources are offered. `Fast` draws from the thread-local generator in
//! `rand`; `Secure` reads bytes from the operating system and reduces them
//! modulo the charset length. Charsets of up to 256 characters take one byte
//! per draw; longer charsets take four bytes read as a `u32`, so every index
//! stays reachable. The modulo reduction is slightly biased whenever the
//! charset length does not divide the byte range, which is accepted here.

use rand::random_range;
use serde::Serialize;

use crate::ucid::UcidError;

/// Where random characters come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RandomSource {
    /// Thread-local pseudorandom generator.
    Fast,
    /// OS-level secure random bytes.
    #[default]
    Secure,
}

impl RandomSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Secure => "secure",
        }
    }

    /// Draw one character from `charset`.
    pub fn pick(self, charset: &[char]) -> Result<char, UcidError> {
        if charset.is_empty() {
            return Err(UcidError::EmptyCharset);
        }

        let idx = match self {
            Self::Fast => random_range(0..charset.len()),
            Self::Secure if charset.len() <= 256 => {
                let mut byte = [0u8; 1];
                getrandom::fill(&mut byte).map_err(|e| UcidError::Entropy(e.to_string()))?;
                byte[0] as usize % charset.len()
            }
            Self::Secure => {
                let mut word = [0u8; 4];
                getrandom::fill(&mut word).map_err(|e| UcidError::Entropy(e.to_string()))?;
                u32::from_le_bytes(word) as usize % charset.len()
            }
        };

        Ok(charset[idx])
    }

    /// Draw `len` characters from `charset`, one `pick` per character.
    pub fn sample(self, charset: &[char], len: usize) -> Result<String, UcidError> {
        (0..len).map(|_| self.pick(charset)).collect()
    }
}
