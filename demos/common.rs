use std::io;

use esendex::{EsendexClient, EsendexClientBuilder};
use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
}

pub fn required_env(name: &str) -> Result<String, io::Error> {
    std::env::var(name).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{name} environment variable is required"),
        )
    })
}

/// Builds a client from `ESENDEX_*` variables. `ESENDEX_SIMULATE=1` disables network I/O.
pub fn client_from_env() -> Result<EsendexClient, Box<dyn std::error::Error>> {
    let simulate = std::env::var("ESENDEX_SIMULATE").is_ok_and(|value| value == "1");

    let mut builder = EsendexClientBuilder::new(
        required_env("ESENDEX_ACCOUNT")?,
        required_env("ESENDEX_LOGIN")?,
        required_env("ESENDEX_PASSWORD")?,
        required_env("ESENDEX_SENDER")?,
    )
    .simulate(simulate);
    if let Ok(host) = std::env::var("ESENDEX_HOST") {
        builder = builder.debug_host(host);
    }

    Ok(builder.build()?)
}
