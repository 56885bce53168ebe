//! Tubelingo CLI entry point.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tubelingo::cli::{commands, AlreadyReported, Cli, Commands};
use tubelingo::config::Settings;
use tubelingo::session::Session;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_path = cli.config.as_deref().map(Settings::expand_path);
    let settings = Settings::load_from(config_path.as_ref())?;

    // Initialize logging
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("tubelingo={}", log_level)),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Execute command
    match &cli.command {
        Commands::Doctor => {
            commands::run_doctor(&settings, config_path.as_ref())?;
        }

        Commands::Config { action } => {
            commands::run_config(action, &settings, config_path.as_ref())?;
        }

        command => {
            let mut session = Session::new(settings);
            let result = run_session_command(&mut session, command).await;
            session.end().await;
            if let Err(e) = result {
                if e.is::<AlreadyReported>() {
                    std::process::exit(1);
                }
                return Err(e);
            }
        }
    }

    Ok(())
}

async fn run_session_command(session: &mut Session, command: &Commands) -> Result<()> {
    match command {
        Commands::Lesson { url, language, topic, level, chunks, json } => {
            commands::run_lesson(session, url, language, topic, level.clone(), *chunks, *json).await
        }

        Commands::Languages { url, json } => commands::run_languages(session, url, *json).await,

        Commands::Transcript { url, language, translate_to, format, output } => {
            commands::run_transcript(
                session,
                url,
                language.clone(),
                translate_to.clone(),
                format,
                output.clone(),
            )
            .await
        }

        Commands::Search { query, limit, language, json } => {
            commands::run_search(session, query, *limit, language.clone(), *json).await
        }

        Commands::Practice { audio, reference, language, level } => {
            commands::run_practice(session, audio, reference, language, level.clone()).await
        }

        Commands::Doctor | Commands::Config { .. } => Ok(()),
    }
}
