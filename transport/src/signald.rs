//! signald transport — newline-delimited JSON over a Unix socket.
//!
//! On start the client subscribes to the bot's account. signald then pushes
//! one JSON envelope per line; `IncomingMessage` envelopes carrying a data
//! message are mapped to [`InboundEvent`]s and everything else (receipts,
//! typing notices, responses to our own requests) is skipped.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Lines};
use witness_types::{Attachment, Identity, InboundEvent, OutboundMessage};

use crate::{Transport, TransportError};

/// Default location of signald's control socket.
pub const DEFAULT_SOCKET_PATH: &str = "/var/run/signald/signald.sock";

const PROTOCOL_VERSION: &str = "v1";

// ── Wire types ─────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct SubscribeRequest<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    version: &'static str,
    id: String,
    account: &'a str,
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    version: &'static str,
    id: String,
    username: &'a str,
    #[serde(rename = "recipientAddress")]
    recipient_address: RecipientAddress<'a>,
    #[serde(rename = "messageBody")]
    message_body: &'a str,
}

/// signald addresses a peer by phone number or, when the number is hidden, by
/// account uuid. Exactly one field is set.
#[derive(Debug, PartialEq, Eq, Serialize)]
struct RecipientAddress<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    number: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    uuid: Option<&'a str>,
}

impl<'a> RecipientAddress<'a> {
    /// E.164 identities (`+` then digits) are numbers; anything else came
    /// from a uuid-only source.
    fn for_identity(id: &'a str) -> Self {
        let is_number = id
            .strip_prefix('+')
            .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()));
        if is_number {
            Self {
                number: Some(id),
                uuid: None,
            }
        } else {
            Self {
                number: None,
                uuid: Some(id),
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
struct IncomingMessage {
    #[serde(default)]
    source: Option<JsonAddress>,
    #[serde(default)]
    data_message: Option<DataMessage>,
}

#[derive(Debug, Default, Deserialize)]
struct JsonAddress {
    #[serde(default)]
    number: Option<String>,
    #[serde(default)]
    uuid: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct DataMessage {
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    attachments: Vec<JsonAttachment>,
}

#[derive(Debug, Default, Deserialize)]
struct JsonAttachment {
    #[serde(rename = "contentType", default)]
    content_type: Option<String>,
    #[serde(rename = "storedFilename", default)]
    stored_filename: Option<String>,
}

impl IncomingMessage {
    fn into_event(self) -> Option<InboundEvent> {
        let source = self.source?;
        let sender = source.number.or(source.uuid).map(Identity::new)?;
        let data = self.data_message?;

        let attachments = data
            .attachments
            .into_iter()
            .filter_map(|a| {
                Some(Attachment::new(
                    a.content_type.unwrap_or_default(),
                    a.stored_filename?,
                ))
            })
            .collect();

        Some(InboundEvent {
            sender,
            body: data.body.unwrap_or_default(),
            attachments,
        })
    }
}

/// Decode one line from signald. `Ok(None)` for envelopes that are not chat messages.
pub fn decode_line(line: &str) -> Result<Option<InboundEvent>, TransportError> {
    let envelope: Envelope = serde_json::from_str(line)?;

    if let Some(err) = envelope.error {
        tracing::warn!(kind = %envelope.kind, id = ?envelope.id, error = %err, "signald reported an error");
        return Ok(None);
    }

    match envelope.kind.as_str() {
        "IncomingMessage" => {
            let Some(data) = envelope.data else {
                return Ok(None);
            };
            let message: IncomingMessage = serde_json::from_value(data)?;
            Ok(message.into_event())
        }
        other => {
            tracing::trace!(kind = other, id = ?envelope.id, "skipping signald envelope");
            Ok(None)
        }
    }
}

// ── Transport ──────────────────────────────────────────────────────────

/// Signal messaging through signald.
pub struct SignaldTransport<R, W> {
    account: String,
    lines: Lines<BufReader<R>>,
    writer: W,
    next_request_id: u64,
}

#[cfg(unix)]
impl SignaldTransport<tokio::net::unix::OwnedReadHalf, tokio::net::unix::OwnedWriteHalf> {
    /// Connect to signald's socket and subscribe to `account`.
    pub async fn connect(
        socket_path: impl AsRef<std::path::Path>,
        account: &str,
    ) -> Result<Self, TransportError> {
        let socket_path = socket_path.as_ref();
        let stream = tokio::net::UnixStream::connect(socket_path).await?;
        tracing::info!(socket = %socket_path.display(), account, "connected to signald");
        let (reader, writer) = stream.into_split();
        Self::subscribe(reader, writer, account).await
    }
}

impl<R, W> SignaldTransport<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    /// Wrap an established connection and send the subscribe request.
    pub async fn subscribe(reader: R, writer: W, account: &str) -> Result<Self, TransportError> {
        let mut transport = Self {
            account: account.to_string(),
            lines: BufReader::new(reader).lines(),
            writer,
            next_request_id: 0,
        };
        let id = transport.request_id();
        let request = SubscribeRequest {
            kind: "subscribe",
            version: PROTOCOL_VERSION,
            id,
            account,
        };
        let line = serde_json::to_string(&request)?;
        transport.write_line(&line).await?;
        Ok(transport)
    }

    fn request_id(&mut self) -> String {
        self.next_request_id += 1;
        format!("witness-{}", self.next_request_id)
    }

    async fn write_line(&mut self, line: &str) -> Result<(), TransportError> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl<R, W> Transport for SignaldTransport<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn next_event(&mut self) -> Result<Option<InboundEvent>, TransportError> {
        while let Some(line) = self.lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match decode_line(line) {
                Ok(Some(event)) => return Ok(Some(event)),
                Ok(None) => continue,
                Err(e) => {
                    tracing::warn!(error = %e, "undecodable line from signald");
                    continue;
                }
            }
        }
        Ok(None)
    }

    async fn send(&mut self, message: &OutboundMessage) -> Result<(), TransportError> {
        let id = self.request_id();
        let request = SendRequest {
            kind: "send",
            version: PROTOCOL_VERSION,
            id,
            username: &self.account,
            recipient_address: RecipientAddress::for_identity(message.recipient.as_str()),
            message_body: &message.body,
        };
        let line = serde_json::to_string(&request)?;
        self.write_line(&line).await
    }

    fn name(&self) -> &str {
        "signald"
    }
}
