use crate::domain::{ChatId, UpdateId};

/// Gateway-agnostic incoming update.
///
/// Telegram-specific fields stay in the Telegram adapter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IncomingUpdate {
    pub id: UpdateId,
    pub message: Option<IncomingMessage>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IncomingMessage {
    pub chat_id: ChatId,
    /// `None` for non-text messages (stickers, photos, ...).
    pub text: Option<String>,
}

impl IncomingUpdate {
    pub fn text(id: UpdateId, chat_id: ChatId, text: impl Into<String>) -> Self {
        Self {
            id,
            message: Some(IncomingMessage {
                chat_id,
                text: Some(text.into()),
            }),
        }
    }
}
