//! Reward notifications for verification outcomes.
//!
//! Payment settlement happens elsewhere; this module only decides who is told
//! that a reward was sent:
//! - The verifier is always rewarded for reviewing.
//! - The submitter shares the reward only when the photo was attested as authentic.

use witness_types::{Identity, OutboundMessage, VerificationOutcome};

/// Who a reward notice is addressed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RewardRole {
    Verifier,
    Submitter,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RewardNotice {
    pub recipient: Identity,
    pub role: RewardRole,
    pub body: String,
}

impl From<RewardNotice> for OutboundMessage {
    fn from(notice: RewardNotice) -> Self {
        OutboundMessage::new(notice.recipient, notice.body)
    }
}

/// Compute the reward notices for an outcome, verifier first.
///
/// A verifier reviewing their own submission gets a single notice.
pub fn reward_notices(outcome: &VerificationOutcome) -> Vec<RewardNotice> {
    let pays_submitter =
        outcome.decision.rewards_submitter() && outcome.submitter != outcome.verifier;

    let verifier_body = if pays_submitter {
        "Payment has been sent to you and the content creator."
    } else {
        "Payment has been sent to you."
    };

    let mut notices = vec![RewardNotice {
        recipient: outcome.verifier.clone(),
        role: RewardRole::Verifier,
        body: verifier_body.to_string(),
    }];

    if pays_submitter {
        notices.push(RewardNotice {
            recipient: outcome.submitter.clone(),
            role: RewardRole::Submitter,
            body: format!(
                "Your photo {} was verified as authentic. A reward payment has been sent to you.",
                outcome.target_cid
            ),
        });
    }

    notices
}
