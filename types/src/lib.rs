//! Fundamental types for the witness bot.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! sender identities, inbound chat events, outbound messages, photo records and
//! verification outcomes.

pub mod event;
pub mod identity;
pub mod outcome;
pub mod photo;

pub use event::{Attachment, InboundEvent, OutboundMessage, ACCEPTED_IMAGE_TYPES};
pub use identity::Identity;
pub use outcome::{Decision, VerificationOutcome};
pub use photo::{ArchivedPhoto, Cid, PendingPhoto};
