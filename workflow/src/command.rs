//! Typed command surface parsed from message text.
//!
//! Canonical decision syntax is `/agree <y|n>`. The older standalone
//! `/verified` and `/not-verified` spellings are still accepted but deprecated.

use crate::error::CommandError;
use witness_types::Decision;

pub const REGISTER: &str = "/register";
pub const VERIFY: &str = "/verify";
pub const AGREE: &str = "/agree";
/// Deprecated: use `/agree y`.
pub const LEGACY_VERIFIED: &str = "/verified";
/// Deprecated: use `/agree n`.
pub const LEGACY_NOT_VERIFIED: &str = "/not-verified";

pub const AGREE_USAGE: &str = "/agree y (the photo is authentic) or /agree n (it is not)";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Join the verifier set.
    Register,
    /// Ask for the latest archived photo to review.
    Verify,
    /// Attest to (or dispute) the latest archived photo.
    Decide(Decision),
}

/// Parse `y`, `yes`, `n`, `no` in any case.
pub fn parse_yes_no(text: &str) -> Option<bool> {
    match text.trim().to_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// Parse a message body into a command.
///
/// Returns `None` when the first token is not a known command, so the caller
/// can fall back to echoing the text.
pub fn parse_command(body: &str) -> Option<Result<Command, CommandError>> {
    let mut tokens = body.split_whitespace();
    let head = tokens.next()?.to_lowercase();

    let parsed = match head.as_str() {
        REGISTER => Ok(Command::Register),
        VERIFY => Ok(Command::Verify),
        LEGACY_VERIFIED => Ok(Command::Decide(Decision::Agree)),
        LEGACY_NOT_VERIFIED => Ok(Command::Decide(Decision::Disagree)),
        AGREE => match tokens.next() {
            None => Err(CommandError::MissingArgument {
                command: AGREE,
                usage: AGREE_USAGE,
            }),
            Some(arg) => match parse_yes_no(arg) {
                Some(true) => Ok(Command::Decide(Decision::Agree)),
                Some(false) => Ok(Command::Decide(Decision::Disagree)),
                None => Err(CommandError::InvalidArgument {
                    command: AGREE,
                    argument: arg.to_string(),
                    usage: AGREE_USAGE,
                }),
            },
        },
        _ => return None,
    };
    Some(parsed)
}
