mod common;

use esendex::MessageId;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    common::init_tracing();

    let message_id = MessageId::new(common::required_env("ESENDEX_MESSAGE_ID")?)?;

    let client = common::client_from_env()?;
    let status = client.get_status(&message_id)?;
    println!("{message_id}: {status}");

    Ok(())
}
