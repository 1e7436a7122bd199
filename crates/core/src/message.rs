//! Outbound chat messages and their render modes.

/// Hard limit on a single chat message, in UTF-16 code units.
///
/// This is the unit the Telegram Bot API counts message length in.
pub const MAX_MESSAGE_SIZE: usize = 4096;

/// How the chat transport should interpret markup in a message body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderMode {
    /// Sent verbatim.
    Plain,
    /// Lightweight markup (Telegram MarkdownV2).
    Markdown,
    /// Escaped rich text (Telegram HTML subset).
    Html,
}

/// A message ready to be handed to the chat transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub body: String,
    pub render_mode: RenderMode,
}

impl OutboundMessage {
    pub fn new(body: impl Into<String>, render_mode: RenderMode) -> Self {
        Self { body: body.into(), render_mode }
    }

    pub fn plain(body: impl Into<String>) -> Self {
        Self::new(body, RenderMode::Plain)
    }

    pub fn markdown(body: impl Into<String>) -> Self {
        Self::new(body, RenderMode::Markdown)
    }

    pub fn html(body: impl Into<String>) -> Self {
        Self::new(body, RenderMode::Html)
    }

    /// Body length as the transport measures it.
    pub fn len(&self) -> usize {
        message_len(&self.body)
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Length of `text` in UTF-16 code units.
pub fn message_len(text: &str) -> usize {
    text.encode_utf16().count()
}
