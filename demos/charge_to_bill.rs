use std::io;

use mobilebill::{
    ChargeOptions, ContentDescription, ContentId, Credentials, MobileBillClient, MobileBillError,
    Msisdn, Reference, TransactionAmount,
};
use tracing_subscriber::EnvFilter;

fn required_env(name: &str) -> Result<String, io::Error> {
    std::env::var(name).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{name} environment variable is required"),
        )
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let username = required_env("MOBILEBILL_USERNAME")?;
    let password = required_env("MOBILEBILL_PASSWORD")?;
    let msisdn = required_env("MOBILEBILL_MSISDN")?;
    let content_id = required_env("MOBILEBILL_CONTENT_ID")?;
    let amount = std::env::var("MOBILEBILL_AMOUNT").unwrap_or_else(|_| "100".to_owned());

    let client = MobileBillClient::new(Credentials::new(username, password)?)?;
    let result = client
        .transaction()
        .content(
            ContentId::new(content_id)?,
            ContentDescription::new("mobilebill demo content")?,
        )
        .phone(Msisdn::new(msisdn)?, None)
        .charge(
            TransactionAmount::new(amount)?,
            Reference::new("mobilebill demo")?,
            ChargeOptions::default(),
        )
        .send();

    match result {
        Ok(record) => {
            for (key, value) in record.iter() {
                println!("{key}: {value}");
            }
            Ok(())
        }
        Err(MobileBillError::Response(err)) if err.category.is_user_facing() => {
            println!("charge declined: {err}");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
