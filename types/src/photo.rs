//! Photo records held by the session store.

use crate::Identity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A content identifier returned by the archival gateway.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cid(String);

impl Cid {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A photo received from a submitter and awaiting an archive confirmation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingPhoto {
    /// Transport handle to the stored payload.
    pub reference: String,
    /// MIME type of the payload, forwarded to the gateway.
    pub content_type: String,
    pub submitter: Identity,
}

/// The most recently archived photo. Never mutated after creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchivedPhoto {
    pub cid: Cid,
    /// Public gateway URL where verifiers can view the photo.
    pub url: String,
    pub submitter: Identity,
}
