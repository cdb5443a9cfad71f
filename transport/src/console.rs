//! Console transport for local development.
//!
//! Input lines look like `<sender>: <text>`. A text of the form
//! `@<path> [content-type]` sends the file at `path` as an attachment; the
//! content type defaults to a guess from the file extension. Replies are
//! printed as `-> <recipient>: <body>`.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Lines};
use witness_types::{Attachment, InboundEvent, OutboundMessage};

use crate::{Transport, TransportError};

pub struct ConsoleTransport<R, W> {
    lines: Lines<BufReader<R>>,
    out: W,
}

impl ConsoleTransport<tokio::io::Stdin, tokio::io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(tokio::io::stdin(), tokio::io::stdout())
    }
}

impl<R, W> ConsoleTransport<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(input: R, out: W) -> Self {
        Self {
            lines: BufReader::new(input).lines(),
            out,
        }
    }
}

/// Guess an image MIME type from a file extension.
fn guess_content_type(path: &str) -> &'static str {
    let ext = path.rsplit('.').next().unwrap_or_default().to_ascii_lowercase();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}

/// Parse one console line. Returns `None` for lines without a `sender:` prefix.
pub fn parse_console_line(line: &str) -> Option<InboundEvent> {
    let (sender, rest) = line.split_once(':')?;
    let sender = sender.trim();
    if sender.is_empty() {
        return None;
    }
    let rest = rest.trim();

    if let Some(attachment) = rest.strip_prefix('@') {
        let mut parts = attachment.split_whitespace();
        let path = parts.next()?;
        let content_type = parts
            .next()
            .map(str::to_string)
            .unwrap_or_else(|| guess_content_type(path).to_string());
        return Some(InboundEvent::attachments(
            sender,
            vec![Attachment::new(content_type, path)],
        ));
    }

    Some(InboundEvent::text(sender, rest))
}

#[async_trait]
impl<R, W> Transport for ConsoleTransport<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn next_event(&mut self) -> Result<Option<InboundEvent>, TransportError> {
        while let Some(line) = self.lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            match parse_console_line(&line) {
                Some(event) => return Ok(Some(event)),
                None => tracing::warn!(%line, "expected `<sender>: <text>`"),
            }
        }
        Ok(None)
    }

    async fn send(&mut self, message: &OutboundMessage) -> Result<(), TransportError> {
        let body = message.body.replace('\n', "\n   ");
        let line = format!("-> {}: {}\n", message.recipient, body);
        self.out.write_all(line.as_bytes()).await?;
        self.out.flush().await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
