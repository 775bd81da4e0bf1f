use clap::Parser;
use medical_analysis_client::{
    ClientConfig,
    cli::{Cli, Outcome, error_box, run},
};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing based on environment variables. Logs go to stderr so
/// stdout only carries the analysis result.
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "medical_analysis_client=info,upload_flow=info".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        "pretty" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .compact()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = ClientConfig::from_env()?;

    match run(cli, config).await? {
        Outcome::Success(rendered) => {
            print!("{}", rendered);
            Ok(ExitCode::SUCCESS)
        }
        Outcome::Failure(message) => {
            eprint!("{}", error_box(&message));
            Ok(ExitCode::FAILURE)
        }
    }
}
