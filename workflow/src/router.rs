//! Message router: a pure classifier from inbound events to [`Inbound`] values.
//!
//! Classification rules, in priority order:
//! 1. Empty body with attachments: the last accepted image wins; if no
//!    attachment is an accepted image the event is ignored.
//! 2. Empty body without attachments: nothing to do.
//! 3. Body that is a bare y/yes/n/no while the sender owns the pending photo:
//!    an archive confirmation.
//! 4. Body whose first token is a known command.
//! 5. Anything else is echoed back.

use crate::command::{parse_command, parse_yes_no, Command};
use crate::error::CommandError;
use witness_types::{Attachment, Identity, InboundEvent};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Inbound {
    /// A photo to hold pending confirmation.
    Photo(Attachment),
    /// Attachments arrived but none was an accepted image.
    Ignored { rejected: usize },
    /// Neither body nor attachments.
    Empty,
    /// Reply to the archive prompt; `true` means archive.
    Confirmation(bool),
    Command(Command),
    /// A known command with unusable arguments.
    Malformed(CommandError),
    /// Unrecognised text, returned verbatim.
    Echo(String),
}

/// Classify `event`.
///
/// `pending_submitter` is the submitter of the photo currently awaiting
/// confirmation, if any. Only that identity's y/n replies count as
/// confirmations.
pub fn classify(event: &InboundEvent, pending_submitter: Option<&Identity>) -> Inbound {
    let body = event.body.trim();

    if body.is_empty() {
        if event.attachments.is_empty() {
            return Inbound::Empty;
        }
        return match event
            .attachments
            .iter()
            .filter(|a| a.is_accepted_image())
            .last()
        {
            Some(photo) => Inbound::Photo(photo.clone()),
            None => Inbound::Ignored {
                rejected: event.attachments.len(),
            },
        };
    }

    if pending_submitter == Some(&event.sender) {
        if let Some(accept) = parse_yes_no(body) {
            return Inbound::Confirmation(accept);
        }
    }

    match parse_command(body) {
        Some(Ok(command)) => Inbound::Command(command),
        Some(Err(err)) => Inbound::Malformed(err),
        None => Inbound::Echo(event.body.clone()),
    }
}
