//! Photo-authentication workflow.
//!
//! A submitter sends a photo, confirms archival, and registered verifiers
//! review the archived photo and attest to its authenticity:
//! 1. **Routing**: every inbound event is classified into a typed [`Inbound`]
//!    value by a pure function ([`router::classify`]).
//! 2. **Execution**: the [`WorkflowEngine`] applies the classified event to the
//!    [`SessionStore`], calling the archival gateway when a photo is confirmed.
//! 3. **Notification**: the engine returns the messages to deliver and, for
//!    decision commands, the [`VerificationOutcome`](witness_types::VerificationOutcome).

pub mod command;
pub mod engine;
pub mod error;
pub mod replies;
pub mod rewards;
pub mod router;
pub mod session;

pub use command::{parse_command, Command};
pub use engine::{Dispatch, EngineConfig, WorkflowEngine};
pub use error::CommandError;
pub use rewards::{reward_notices, RewardNotice, RewardRole};
pub use router::{classify, Inbound};
pub use session::SessionStore;
