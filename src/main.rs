use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use companion_gateway::api::{ApiServer, ApiState};
use companion_gateway::config::validate_origin;
use companion_gateway::{Config, ProviderClient, SpeechTranscriber};

/// Companion - chat and voice relay for an LLM companion persona
#[derive(Parser)]
#[command(name = "companion", version, about)]
struct Cli {
    /// Port to listen on (overrides config)
    #[arg(long)]
    port: Option<u16>,

    /// Address to bind (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Frontend origin allowed by CORS (overrides config)
    #[arg(long)]
    cors_origin: Option<String>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,companion_gateway=info",
        1 => "info,companion_gateway=debug,tower_http=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load()?;

    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(origin) = cli.cors_origin {
        validate_origin(&origin)?;
        config.server.cors_origin = origin;
    }

    tracing::debug!(?config, "loaded configuration");

    let provider = ProviderClient::from_config(config.llm);
    let transcriber = SpeechTranscriber::from_config(config.stt);

    ApiServer::new(ApiState::new(provider, transcriber), config.server)
        .run()
        .await?;

    Ok(())
}
