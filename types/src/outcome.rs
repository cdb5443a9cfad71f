//! Verification decisions and the ephemeral outcome they produce.

use crate::{Cid, Identity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A verifier's judgement on the authenticity of the latest archived photo.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    /// The verifier attests the photo is authentic.
    Agree,
    /// The verifier disputes the photo's authenticity.
    Disagree,
}

impl Decision {
    /// Label used in replies, e.g. `This photo is marked as "verified"`.
    pub fn label(&self) -> &'static str {
        match self {
            Decision::Agree => "verified",
            Decision::Disagree => "not verified",
        }
    }

    /// Whether the submitter shares in the reward for this decision.
    pub fn rewards_submitter(&self) -> bool {
        matches!(self, Decision::Agree)
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Produced when a registered verifier issues a decision command.
///
/// Consumed immediately to drive notifications; the session store never keeps it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationOutcome {
    pub verifier: Identity,
    /// Submitter of the photo the decision refers to.
    pub submitter: Identity,
    pub target_cid: Cid,
    pub decision: Decision,
}
