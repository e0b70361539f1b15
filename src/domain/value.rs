use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::validation::ValidationError;

/// Five groups of two digits, each optionally followed by spaces (`06 12 34 56 78`).
static SENDER_NUMBER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{2} *){5}$").expect("sender number pattern is a valid regex")
});

fn non_empty(value: String, field: &'static str) -> Result<String, ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(value)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Esendex account reference (`accountreference`), e.g. `EX0123456`.
///
/// Invariant: non-empty. The value is kept exactly as provided.
pub struct AccountReference(String);

impl AccountReference {
    /// XML element name used by Esendex (`accountreference`).
    pub const FIELD: &'static str = "accountreference";

    /// Create a validated [`AccountReference`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        non_empty(value.into(), Self::FIELD).map(Self)
    }

    /// Borrow the validated account reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Esendex account login (basic-auth user name).
///
/// Invariant: non-empty. The value is kept exactly as provided.
pub struct Login(String);

impl Login {
    pub const FIELD: &'static str = "login";

    /// Create a validated [`Login`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        non_empty(value.into(), Self::FIELD).map(Self)
    }

    /// Borrow the validated login.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
/// Esendex account password (basic-auth secret).
///
/// Invariant: must not be empty (whitespace is preserved and allowed).
pub struct Password(String);

impl Password {
    pub const FIELD: &'static str = "password";

    /// Create a validated [`Password`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the password as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Sender phone number (`from`).
///
/// Invariant: five groups of two digits, optionally separated by spaces. The value is
/// kept exactly as provided.
pub struct SenderNumber(String);

impl SenderNumber {
    /// XML element name used by Esendex (`from`).
    pub const FIELD: &'static str = "from";

    /// Create a validated [`SenderNumber`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        if !SENDER_NUMBER_PATTERN.is_match(&value) {
            return Err(ValidationError::InvalidSenderNumber { input: value });
        }
        Ok(Self(value))
    }

    /// Borrow the sender number as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Recipient phone number (`to`).
///
/// Invariant: non-empty. The number is passed to Esendex as-is.
pub struct Recipient(String);

impl Recipient {
    /// XML element name used by Esendex (`to`).
    pub const FIELD: &'static str = "to";

    /// Create a validated [`Recipient`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        non_empty(value.into(), Self::FIELD).map(Self)
    }

    /// Raw value as sent to Esendex.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Message text (`body`), read aloud for voice calls or sent as-is for SMS.
///
/// Any text is accepted; the only size rule is the SMS limit checked by
/// [`crate::domain::SendMessage`].
pub struct MessageText(String);

impl MessageText {
    /// XML element name used by Esendex (`body`).
    pub const FIELD: &'static str = "body";

    /// Wrap message text. Nothing is rejected here.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the message text as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters (not bytes), as counted against the SMS limit.
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }
}

impl From<String> for MessageText {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for MessageText {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Esendex message id returned by the message dispatcher.
///
/// Invariant: non-empty after trimming.
pub struct MessageId(String);

impl MessageId {
    /// XML attribute name used by Esendex (`id`).
    pub const FIELD: &'static str = "id";

    /// Create a validated [`MessageId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        non_empty(value.trim().to_owned(), Self::FIELD).map(Self)
    }

    /// Borrow the validated message id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Number of delivery attempts the gateway makes (`retries`).
///
/// Invariant: at least 1. Smaller inputs are raised to 1 rather than rejected.
pub struct Retries(u32);

impl Retries {
    /// XML element name used by Esendex (`retries`).
    pub const FIELD: &'static str = "retries";

    pub const MIN: u32 = 1;

    /// Create a [`Retries`] value, clamping to [`Retries::MIN`].
    pub fn new(value: u32) -> Self {
        Self(value.max(Self::MIN))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for Retries {
    fn default() -> Self {
        Self(Self::MIN)
    }
}
