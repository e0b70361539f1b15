use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    InvalidSenderNumber { input: String },
    InvalidTimeZone { input: String },
    InvalidHost { input: String },
    MessageTooLong { max: usize, actual: usize },
    UnknownMessageKind { input: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::InvalidSenderNumber { input } => {
                write!(f, "invalid sender phone number: {input}")
            }
            Self::InvalidTimeZone { input } => write!(f, "unknown time zone: {input}"),
            Self::InvalidHost { input } => write!(f, "invalid host url: {input}"),
            Self::MessageTooLong { max, actual } => {
                write!(f, "SMS message too long: {actual} chars (max {max})")
            }
            Self::UnknownMessageKind { input } => write!(f, "invalid message type: {input}"),
        }
    }
}

impl std::error::Error for ValidationError {}
