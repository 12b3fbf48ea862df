use std::io;

use smsfarm::{Recipient, SmsFarmClient};

fn required_env(name: &str) -> Result<String, io::Error> {
    std::env::var(name).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{name} environment variable is required"),
        )
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let code = required_env("SMSFARM_INTEGRATION_CODE")?;
    let id = required_env("SMSFARM_INTEGRATION_ID")?;
    let recipients = required_env("SMSFARM_RECIPIENTS")?;
    let message = std::env::var("SMSFARM_MESSAGE")
        .unwrap_or_else(|_| "Hello from the smsfarm example.".to_owned());

    let mut builder = SmsFarmClient::builder(code, id);
    if let Ok(sender) = std::env::var("SMSFARM_SENDER") {
        builder = builder.sender(sender);
    }
    let mut client = builder.connect().await?;

    let recipients = recipients
        .split(',')
        .map(Recipient::new)
        .collect::<Result<Vec<_>, _>>()?;
    client.add_recipients(recipients);

    let response = client.send_message(message).await?;
    println!(
        "success: {}, request_id: {:?}, error: {:?}",
        response.success(),
        response.data(),
        response.error()
    );

    Ok(())
}
