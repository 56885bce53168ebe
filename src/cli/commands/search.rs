//! Search command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::session::Session;
use crate::transcript_source::search_and_transcribe;
use anyhow::Result;

/// Run the search command.
pub async fn run_search(
    session: &mut Session,
    query: &str,
    limit: usize,
    language: Option<String>,
    json: bool,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Transcript, session.settings()) {
        Output::error(&format!("{}", e));
        Output::info("Run 'tubelingo doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let source = session.transcript_source().await?;

    let spinner = (!json).then(|| Output::spinner("Searching..."));
    let results = search_and_transcribe(source.as_ref(), query, limit, language.as_deref()).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let results = match results {
        Ok(results) => results,
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(e.into());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        Output::warning("No videos found matching your query.");
        return Ok(());
    }

    Output::success(&format!("Found {} videos", results.len()));
    for result in &results {
        Output::video(&result.video);
        match (&result.transcript, &result.error) {
            (Some(text), _) => Output::preview(text),
            (None, Some(err)) => Output::warning(&format!("No transcript: {}", err)),
            (None, None) => {}
        }
    }

    Ok(())
}
