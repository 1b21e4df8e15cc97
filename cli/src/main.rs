mod actions;
mod settings;

use std::process::ExitCode;

use clap::Parser;
use messagemedia_rest::ApiError;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::actions::{Action, error_report};
use crate::settings::Settings;

/// Command line front end for the MessageMedia REST API.
///
/// Credentials are read from MESSAGEMEDIA_API_KEY and MESSAGEMEDIA_SECRET_KEY. Set
/// MESSAGEMEDIA_ACCOUNT or MESSAGEMEDIA_USERNAME to act on behalf of another account.
#[derive(Debug, Parser)]
#[command(name = "messagemedia", version, about)]
struct Cli {
    #[command(subcommand)]
    action: Action,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("Error reading settings. {err}");
            return ExitCode::FAILURE;
        }
    };

    let description = cli.action.description();
    match run(cli.action, &settings).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", error_report(description, &err));
            ExitCode::FAILURE
        }
    }
}

async fn run(action: Action, settings: &Settings) -> Result<String, ApiError> {
    let client = settings.client()?;
    debug!(endpoint = %client.endpoint(), action = action.description(), "running action");

    match settings.context() {
        Some(context) => client.scope(context, action.run(&client)).await?,
        None => action.run(&client).await,
    }
}
