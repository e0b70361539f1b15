//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;

pub use request::{MessageKind, SMS_MAX_CHARS, SendMessage};
pub use response::{MessageState, MessageStatus, STATUS_TABLE};
pub use validation::ValidationError;
pub use value::{
    AccountReference, Login, MessageId, MessageText, Password, Recipient, Retries, SenderNumber,
};
