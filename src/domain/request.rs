use std::str::FromStr;

use crate::domain::validation::ValidationError;
use crate::domain::value::{MessageText, Recipient};

pub const SMS_MAX_CHARS: usize = 140;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
/// How the message reaches the recipient.
pub enum MessageKind {
    /// Text-to-speech phone call.
    #[default]
    Voice,
    /// Text message, limited to [`SMS_MAX_CHARS`] characters.
    Sms,
}

impl MessageKind {
    /// Value of the `type` element in the dispatch request.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Voice => "Voice",
            Self::Sms => "SMS",
        }
    }
}

impl FromStr for MessageKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "voice" => Ok(Self::Voice),
            "sms" => Ok(Self::Sms),
            _ => Err(ValidationError::UnknownMessageKind {
                input: s.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
/// A single message to dispatch.
pub struct SendMessage {
    recipient: Recipient,
    text: MessageText,
    kind: MessageKind,
}

impl SendMessage {
    pub fn new(
        recipient: Recipient,
        text: MessageText,
        kind: MessageKind,
    ) -> Result<Self, ValidationError> {
        if kind == MessageKind::Sms {
            let actual = text.char_count();
            if actual > SMS_MAX_CHARS {
                return Err(ValidationError::MessageTooLong {
                    max: SMS_MAX_CHARS,
                    actual,
                });
            }
        }
        Ok(Self {
            recipient,
            text,
            kind,
        })
    }

    pub fn recipient(&self) -> &Recipient {
        &self.recipient
    }

    pub fn text(&self) -> &MessageText {
        &self.text
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }
}
