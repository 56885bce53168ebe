//! Transcript command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::session::Session;
use crate::transcript_source::{format_transcript, OutputFormat};
use anyhow::Result;

/// Run the transcript command.
pub async fn run_transcript(
    session: &mut Session,
    url: &str,
    language: Option<String>,
    translate_to: Option<String>,
    format: &str,
    output: Option<String>,
) -> Result<()> {
    let format: OutputFormat = format.parse().map_err(|e: String| anyhow::anyhow!(e))?;

    if let Err(e) = preflight::check(Operation::Transcript, session.settings()) {
        Output::error(&format!("{}", e));
        Output::info("Run 'tubelingo doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let source = session.transcript_source().await?;
    let transcript = match &translate_to {
        Some(target) => source.transcribe_with_translation(url, target).await?,
        None => source.transcribe(url, language.as_deref()).await?,
    };

    let rendered = format_transcript(&transcript, format);

    match output {
        Some(path) => {
            std::fs::write(&path, rendered)?;
            Output::success(&format!(
                "Wrote {} transcript lines ({}) to {}",
                transcript.entries.len(),
                transcript.language_code,
                path
            ));
        }
        None => println!("{}", rendered),
    }

    Ok(())
}
