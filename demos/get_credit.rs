use std::io;

use smsfarm::SmsFarmClient;

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

    let client = SmsFarmClient::new(code, id)?;
    let response = client.get_credit().await?;
    match response.into_result() {
        Ok(credit) => println!("credit: {}", credit.as_str()),
        Err(err) => println!("error: {err}"),
    }

    Ok(())
}
