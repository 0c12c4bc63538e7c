//! Scholar - study assistant client
//!
#![doc = "Scholar - study assistant client"]
#![doc = "Main entry point for the Scholar command-line application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use scholar::cli::{Cli, Commands};
use scholar::commands;
use scholar::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;
    tracing::debug!(base_url = %config.server.base_url, "Configuration loaded");

    // Execute command
    match cli.command {
        Commands::Chat { mode, session } => {
            tracing::info!("Starting interactive chat mode");
            if let Some(m) = &mode {
                tracing::debug!("Using mode override: {}", m);
            }
            if let Some(s) = &session {
                tracing::debug!("Continuing session: {}", s);
            }
            commands::chat::run_chat(config, mode, session).await?;
            Ok(())
        }
        Commands::Ask {
            question,
            mode,
            session,
        } => {
            tracing::info!("Asking a single question");
            commands::ask::run_ask(config, question, mode, session).await?;
            Ok(())
        }
        Commands::Upload { path, session } => {
            tracing::info!("Uploading {} for analysis", path.display());
            commands::upload::run_upload(config, path, session).await?;
            Ok(())
        }
        Commands::History { session, json } => {
            tracing::info!("Starting history command");
            commands::history::handle_history(&config, session, json).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// `RUST_LOG` wins when set; otherwise `--verbose` selects debug output.
fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "scholar=debug" } else { "scholar=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
