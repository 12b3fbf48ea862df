use std::io;

use smsfarm::{Recipient, RequestId, SmsFarmClient};

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
    let request_id = std::env::var("SMSFARM_REQUEST_ID").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "SMSFARM_REQUEST_ID environment variable is required",
        )
    })?;

    let client = SmsFarmClient::new(code, id)?;
    let request_id = RequestId::new(request_id)?;

    match std::env::var("SMSFARM_RECIPIENT") {
        Ok(recipient) => {
            let recipient = Recipient::new(recipient)?;
            let response = client
                .get_message_status(&request_id, Some(&recipient))
                .await?;
            println!(
                "status: {:?}, known: {:?}, error: {:?}",
                response.data(),
                response.data().and_then(|it| it.known()),
                response.error()
            );
        }
        Err(_) => {
            let response = client.get_all_message_statuses(&request_id).await?;
            println!("statuses: {:?}, error: {:?}", response.data(), response.error());
        }
    }

    Ok(())
}
