//! Typed blocking Rust client for the Esendex messaging API.
//!
//! The crate sends voice calls or SMS through the Esendex message dispatcher and
//! polls the delivery status of sent messages. The design has a domain layer of
//! strong types, a transport layer for the XML wire format, and a small client layer
//! orchestrating requests.
//!
//! ```rust,no_run
//! use esendex::{EsendexClient, MessageKind, MessageText, Recipient};
//!
//! fn main() -> Result<(), esendex::EsendexError> {
//!     let client = EsendexClient::builder("EX0123456", "login", "password", "06 12 34 56 78")
//!         .retries(2)
//!         .build()?;
//!     let id = client.send(
//!         Recipient::new("06 98 76 54 32")?,
//!         MessageText::new("Alarme niveau 2"),
//!         MessageKind::Sms,
//!     )?;
//!     let status = client.get_status(&id)?;
//!     println!("{status}");
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{EsendexClient, EsendexClientBuilder, EsendexError, SIMULATED_MESSAGE_ID};
pub use domain::{
    AccountReference, Login, MessageId, MessageKind, MessageState, MessageStatus, MessageText,
    Password, Recipient, Retries, SMS_MAX_CHARS, STATUS_TABLE, SendMessage, SenderNumber,
    ValidationError,
};
pub use transport::{NAMESPACE, TransportError};
