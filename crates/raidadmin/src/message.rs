//! Broadcast messages to every participant

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::action::field;
use crate::error::{AdminError, Result, ValidationError};
use crate::raid::RaidId;

/// Prompt shown in the subject input until the sender types over it
pub const SUBJECT_PROMPT: &str = "Тема рассылки";
/// Prompt shown in the text area until the sender types over it
pub const TEXT_PROMPT: &str = "Текст сообщения";

/// Delivery priority chosen in the `SendForAllTypeId` select
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Ordinary,
    Urgent,
}

impl MessageKind {
    pub const ALL: [MessageKind; 2] = [MessageKind::Ordinary, MessageKind::Urgent];

    /// Value posted by the select option
    pub fn form_value(&self) -> u8 {
        match self {
            MessageKind::Ordinary => 1,
            MessageKind::Urgent => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MessageKind::Ordinary => "обычная",
            MessageKind::Urgent => "экстренная",
        }
    }

    pub fn from_form_value(value: &str) -> Result<Self> {
        match value.trim() {
            "1" => Ok(MessageKind::Ordinary),
            "2" => Ok(MessageKind::Urgent),
            other => Err(AdminError::invalid_field(
                field::MESSAGE_KIND,
                format!("unknown message type {:?}", other),
            )),
        }
    }
}

/// A validated message addressed to all participants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Broadcast {
    pub raid_id: RaidId,
    pub subject: String,
    pub text: String,
    pub kind: MessageKind,
}

impl Broadcast {
    /// Build a broadcast from raw form values
    pub fn from_form(
        raid_id: RaidId,
        subject: Option<&str>,
        text: Option<&str>,
        kind: Option<&str>,
    ) -> Result<Self> {
        let subject = required(field::MESSAGE_SUBJECT, subject, SUBJECT_PROMPT)?;
        let text = required(field::MESSAGE_TEXT, text, TEXT_PROMPT)?;
        let kind = match kind {
            Some(value) => MessageKind::from_form_value(value)?,
            None => MessageKind::default(),
        };

        Ok(Broadcast {
            raid_id,
            subject,
            text,
            kind,
        })
    }
}

fn required(name: &str, value: Option<&str>, prompt: &str) -> Result<String> {
    let value = value.map(str::trim).unwrap_or_default();
    if value.is_empty() {
        return Err(AdminError::missing_field(name));
    }
    if value == prompt {
        return Err(ValidationError::PromptText {
            field: name.to_string(),
        }
        .into());
    }
    Ok(value.to_string())
}

/// A broadcast waiting for delivery
#[derive(Debug, Clone, Serialize)]
pub struct QueuedBroadcast {
    pub broadcast: Broadcast,
    pub recipients: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub queued_at: OffsetDateTime,
}
