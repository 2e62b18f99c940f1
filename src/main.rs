use datechat::calendar::SystemClock;
use datechat::client::cli::CliClient;
use datechat::client::{OpenAiBackend, Relay};
use datechat::config::{Args, Config};
use datechat::date_tools::{DateContext, date_toolset};
use datechat::logging;

use anyhow::Result;
use clap::Parser;
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init();

    let config = Config::try_from(Args::parse())?;
    tracing::info!(model = %config.relay.model, api_base = %config.api_base, "starting");

    let backend = OpenAiBackend::new(&config.api_key, &config.api_base);
    let relay = Relay::new(
        backend,
        date_toolset()?,
        DateContext::new(SystemClock),
        config.relay,
    );
    let mut cli_client = CliClient::new(relay, BufReader::new(tokio::io::stdin()));
    cli_client.chat().await?;
    Ok(())
}
