//! Reply texts sent back to chat participants.

use crate::command::AGREE;
use witness_gateway::GatewayError;
use witness_types::{Identity, VerificationOutcome};

pub const ARCHIVE_PROMPT: &str = "Do you want to archive the photo to IPFS? (y/n)";

pub const ARCHIVE_DECLINED: &str = "I will not archive the uploaded photo to IPFS.";

pub const REGISTRATION_PROMPT: &str =
    "You are not a verifier yet.\n\nPlease reply \"/register\" to become one.";

pub const NOTHING_TO_VERIFY: &str = "There is no archived photo to verify yet.";

pub fn archived(url: &str) -> String {
    format!("The photo has been archived to IPFS\n\n{url}")
}

pub fn archive_failed(err: &GatewayError) -> String {
    if err.is_retryable() {
        format!(
            "The photo could not be archived ({err}).\n\n\
             Reply \"y\" to try again or \"n\" to discard it."
        )
    } else {
        format!(
            "The photo could not be archived ({err}).\n\n\
             The archive service needs attention; reply \"n\" to discard the photo."
        )
    }
}

pub fn registered(id: &Identity) -> String {
    format!(
        "{id} is a verifier now.\n\nPlease send \"/verify\" to get the latest photo to verify."
    )
}

pub fn review_request(url: &str) -> String {
    format!(
        "Please review the following photo:\n{url}\n\n\
         Is the photo authentic?\n\n\
         Yes: please reply \"{AGREE} y\"\n\
         No: please reply \"{AGREE} n\""
    )
}

/// Sent to other verifiers when a new photo has been archived.
pub fn new_photo_notice(url: &str) -> String {
    format!("A new photo is waiting for review:\n{url}\n\nSend \"/verify\" to review it.")
}

pub fn decision_recorded(outcome: &VerificationOutcome) -> String {
    format!(
        "Thank you.\n\nThis photo is marked as \"{}\".\nCID: {}",
        outcome.decision, outcome.target_cid
    )
}

pub fn usage(usage: &str) -> String {
    format!("Usage: {usage}")
}
