use anyhow::Result;
use clap::Parser;
use ops_cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let logger_config = cli.logger_config();
    logger_redacted::init(&logger_config)?;
    let redactor = logger_redacted::redactor_for(&logger_config)?;

    ops_cli::run(cli, &redactor).await
}
