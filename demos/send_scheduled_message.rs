use std::io;

use smsfarm::{Recipient, SmsFarmClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let code = std::env::var("SMSFARM_INTEGRATION_CODE").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "SMSFARM_INTEGRATION_CODE environment variable is required",
        )
    })?;
    let id = std::env::var("SMSFARM_INTEGRATION_ID").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "SMSFARM_INTEGRATION_ID environment variable is required",
        )
    })?;
    let recipient = std::env::var("SMSFARM_RECIPIENT").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "SMSFARM_RECIPIENT environment variable is required",
        )
    })?;
    let send_time = std::env::var("SMSFARM_SEND_TIME").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "SMSFARM_SEND_TIME environment variable is required (YYYY-MM-DD HH:MM)",
        )
    })?;
    let message = std::env::var("SMSFARM_MESSAGE")
        .unwrap_or_else(|_| "Scheduled hello from the smsfarm example.".to_owned());

    let mut client = SmsFarmClient::new(code, id)?;
    client.add_recipients(Recipient::new(recipient)?);

    let response = client.send_scheduled_message(message, &send_time).await?;
    println!(
        "success: {}, request_id: {:?}, error: {:?}",
        response.success(),
        response.data(),
        response.error()
    );

    Ok(())
}
