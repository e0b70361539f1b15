mod common;

use esendex::{MessageKind, MessageText, Recipient};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    common::init_tracing();

    let recipient = Recipient::new(common::required_env("ESENDEX_RECIPIENT")?)?;
    let message = std::env::var("ESENDEX_MESSAGE")
        .unwrap_or_else(|_| "Hello from the esendex demo.".to_owned());
    let kind = std::env::var("ESENDEX_KIND")
        .map(|raw| raw.parse::<MessageKind>())
        .unwrap_or(Ok(MessageKind::Sms))?;

    let client = common::client_from_env()?;
    let id = client.send(recipient, MessageText::new(message), kind)?;
    println!("message id: {id}");

    Ok(())
}
