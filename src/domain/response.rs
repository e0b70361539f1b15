use std::fmt;

use chrono::{DateTime, FixedOffset};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Delivery state of a dispatched message.
pub enum MessageState {
    Submitted,
    Sent,
    Delivered,
    Failed,
    Acknowledged,
    Expired,
    Unknown,
}

/// Gateway status strings (lower-cased) and the state each one maps to.
pub const STATUS_TABLE: [(&str, MessageState); 7] = [
    ("submitted", MessageState::Submitted),
    ("sent", MessageState::Sent),
    ("delivered", MessageState::Delivered),
    ("failed", MessageState::Failed),
    ("failed authorisation", MessageState::Failed),
    ("acknowledged", MessageState::Acknowledged),
    ("expired", MessageState::Expired),
];

impl MessageState {
    /// Map a gateway status string, ignoring case. Unrecognized strings yield
    /// [`MessageState::Unknown`].
    pub fn from_gateway(status: &str) -> Self {
        let key = status.trim().to_lowercase();
        STATUS_TABLE
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, state)| *state)
            .unwrap_or(Self::Unknown)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Submitted => "SUBMITTED",
            Self::Sent => "SENT",
            Self::Delivered => "DELIVERED",
            Self::Failed => "FAILED",
            Self::Acknowledged => "ACKNOWLEDGED",
            Self::Expired => "EXPIRED",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for MessageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Status of a message as last reported by the gateway.
pub struct MessageStatus {
    pub state: MessageState,
    pub updated_at: Option<DateTime<FixedOffset>>,
}

impl MessageStatus {
    pub fn new(state: MessageState, updated_at: Option<DateTime<FixedOffset>>) -> Self {
        Self { state, updated_at }
    }
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.updated_at {
            Some(at) => write!(f, "{} ({})", self.state, at.to_rfc3339()),
            None => write!(f, "{}", self.state),
        }
    }
}
