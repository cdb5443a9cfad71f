//! Transport-supplied sender identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque sender identifier as delivered by the chat transport
/// (for signald this is the sender's phone number).
///
/// The identity is the only access-control key in the system: verifier
/// membership and reward recipients are both keyed by it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Return the raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// An identity is usable when it carries at least one non-whitespace character.
    pub fn is_valid(&self) -> bool {
        !self.0.trim().is_empty()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Identity {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for Identity {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
