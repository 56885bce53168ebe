//! Languages command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::session::Session;
use anyhow::Result;

/// Run the languages command.
pub async fn run_languages(session: &mut Session, url: &str, json: bool) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Transcript, session.settings()) {
        Output::error(&format!("{}", e));
        Output::info("Run 'tubelingo doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let source = session.transcript_source().await?;
    let spinner = Output::spinner("Looking up transcripts...");
    let languages = source.available_languages(url).await;
    spinner.finish_and_clear();

    let languages = languages.inspect_err(|e| Output::error(&format!("Lookup failed: {}", e)))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&languages)?);
    } else if languages.is_empty() {
        Output::warning("This video has no transcripts.");
    } else {
        Output::header("Available transcripts");
        for lang in &languages {
            Output::language(lang);
        }
    }

    Ok(())
}
