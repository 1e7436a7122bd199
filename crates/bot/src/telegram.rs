//! Telegram side of the chat transport.

use async_trait::async_trait;
use corrector_core::{Inbound, OutboundMessage, RenderMode, ReplySink, TransportError};
use teloxide::RequestError;
use teloxide::prelude::*;
use teloxide::types::ParseMode;

/// Replies into one Telegram chat.
#[derive(Clone)]
pub struct TelegramSink {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramSink {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }
}

#[async_trait]
impl ReplySink for TelegramSink {
    async fn send(&self, message: &OutboundMessage) -> Result<(), TransportError> {
        let request = self.bot.send_message(self.chat_id, message.body.clone());

        let result = match parse_mode(message.render_mode) {
            Some(mode) => request.parse_mode(mode).await,
            None => request.await,
        };

        result.map(|_| ()).map_err(classify_error)
    }
}

/// Maps a render mode to the Bot API parse mode.
pub fn parse_mode(mode: RenderMode) -> Option<ParseMode> {
    match mode {
        RenderMode::Plain => None,
        RenderMode::Markdown => Some(ParseMode::MarkdownV2),
        RenderMode::Html => Some(ParseMode::Html),
    }
}

/// Only failures that guarantee the message was not delivered are retryable.
fn classify_error(err: RequestError) -> TransportError {
    match &err {
        RequestError::RetryAfter(after) => TransportError::rate_limited(err.to_string(), after.duration()),
        RequestError::Network(e) if e.is_connect() => TransportError::retryable(err.to_string()),
        _ => TransportError::fatal(err.to_string()),
    }
}

/// Builds the transport-neutral view of a text message.
pub fn inbound_from(msg: &Message) -> Option<Inbound> {
    let text = msg.text()?;
    let sender_name = msg.from.as_ref().map(|user| user.first_name.clone());
    Some(Inbound { text: text.to_string(), sender_name })
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::types::Seconds;

    #[test]
    fn test_parse_mode_mapping() {
        assert_eq!(parse_mode(RenderMode::Plain), None);
        assert_eq!(parse_mode(RenderMode::Markdown), Some(ParseMode::MarkdownV2));
        assert_eq!(parse_mode(RenderMode::Html), Some(ParseMode::Html));
    }

    #[test]
    fn test_retry_after_keeps_requested_wait() {
        let err = classify_error(RequestError::RetryAfter(Seconds::from_seconds(5)));
        assert!(err.retryable);
        assert_eq!(err.retry_after, Some(std::time::Duration::from_secs(5)));
    }

    #[test]
    fn test_api_error_is_fatal() {
        let err = classify_error(RequestError::Api(teloxide::ApiError::BotBlocked));
        assert!(!err.retryable);
        assert_eq!(err.retry_after, None);
    }

    #[test]
    fn test_inbound_from_group_uses_sender_name() {
        let msg: Message = serde_json::from_value(serde_json::json!({
            "message_id": 1,
            "date": 1700000000,
            "chat": { "id": -1001, "type": "group", "title": "Editors" },
            "from": { "id": 7, "is_bot": false, "first_name": "Olena" },
            "text": "/start"
        }))
        .unwrap();

        let inbound = inbound_from(&msg).unwrap();
        assert_eq!(inbound.text, "/start");
        assert_eq!(inbound.sender_name.as_deref(), Some("Olena"));
    }
}
