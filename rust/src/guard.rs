//! Generation guards.
//!
//! A guard is consulted once per `generate` call, before validation. It
//! answers with a [`GuardDecision`]; a rejection either carries an error,
//! which fails the call, or a plain message, which declines it softly.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Message used when a guard declines without giving a reason.
pub const DEFAULT_REJECTION_MESSAGE: &str = "UCID condition rejected.";

/// Why a guard refused generation.
pub enum Rejection {
    /// Soft decline: logged, and the call yields no result.
    Message(Option<String>),
    /// Hard failure: propagated to the caller as `UcidError::GuardRejected`.
    Error(Box<dyn Error + Send + Sync>),
}

impl Rejection {
    pub fn message(msg: impl Into<String>) -> Self {
        Self::Message(Some(msg.into()))
    }

    pub fn error<E>(err: E) -> Self
    where
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        Self::Error(err.into())
    }
}

impl fmt::Debug for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Message(msg) => f.debug_tuple("Message").field(msg).finish(),
            Self::Error(err) => f.debug_tuple("Error").field(&err.to_string()).finish(),
        }
    }
}

/// Outcome of a guard check.
#[derive(Debug)]
pub enum GuardDecision {
    Accepted,
    Rejected(Rejection),
}

impl GuardDecision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

impl From<bool> for GuardDecision {
    fn from(allowed: bool) -> Self {
        if allowed {
            Self::Accepted
        } else {
            Self::Rejected(Rejection::Message(None))
        }
    }
}

/// Gate evaluated before any ID is generated.
pub trait GenerationGuard: Send + Sync {
    fn check(&self) -> GuardDecision;
}

impl<F> GenerationGuard for F
where
    F: Fn() -> GuardDecision + Send + Sync,
{
    fn check(&self) -> GuardDecision {
        self()
    }
}

/// Shared handle to a guard, as stored in options.
pub type SharedGuard = Arc<dyn GenerationGuard>;
