//! Inbound chat events and outbound messages exchanged with the transport.

use crate::Identity;
use serde::{Deserialize, Serialize};

/// MIME types the bot is willing to archive. Anything else is dropped silently.
pub const ACCEPTED_IMAGE_TYPES: [&str; 2] = ["image/png", "image/jpeg"];

/// A file attached to an inbound message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// MIME type as reported by the sender's client.
    pub content_type: String,
    /// Opaque handle to the stored payload (a file path for signald).
    pub reference: String,
}

impl Attachment {
    pub fn new(content_type: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            reference: reference.into(),
        }
    }

    /// The MIME essence: lower-cased, without parameters such as `; charset=`.
    pub fn mime_type(&self) -> String {
        self.content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
    }

    /// Whether this attachment is one of the [`ACCEPTED_IMAGE_TYPES`].
    pub fn is_accepted_image(&self) -> bool {
        let mime = self.mime_type();
        ACCEPTED_IMAGE_TYPES.contains(&mime.as_str())
    }
}

/// One event delivered by the transport.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundEvent {
    pub sender: Identity,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl InboundEvent {
    /// A text-only event.
    pub fn text(sender: impl Into<Identity>, body: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            body: body.into(),
            attachments: Vec::new(),
        }
    }

    /// An event with an empty body carrying the given attachments.
    pub fn attachments(sender: impl Into<Identity>, attachments: Vec<Attachment>) -> Self {
        Self {
            sender: sender.into(),
            body: String::new(),
            attachments,
        }
    }
}

/// A text message the bot wants delivered to one identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub recipient: Identity,
    pub body: String,
}

impl OutboundMessage {
    pub fn new(recipient: impl Into<Identity>, body: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            body: body.into(),
        }
    }
}
