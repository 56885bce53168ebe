//! Practice command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Prompts;
use crate::lesson::CefrLevel;
use crate::practice::PracticeCoach;
use crate::session::Session;
use anyhow::Result;
use std::path::Path;
use std::time::Duration;

/// Run the practice command.
pub async fn run_practice(
    session: &mut Session,
    audio: &str,
    reference: &str,
    language: &str,
    level: Option<String>,
) -> Result<()> {
    let settings = session.settings();
    let level: CefrLevel = level
        .unwrap_or_else(|| settings.lesson.default_level.clone())
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let audio_path = Path::new(audio);
    if !audio_path.exists() {
        anyhow::bail!("Audio file not found: {}", audio);
    }

    if let Err(e) = preflight::check(Operation::Practice, settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'tubelingo doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let prompts = Prompts::load(
        settings.prompts.custom_dir.as_deref(),
        Some(&settings.prompts.variables),
    )?;
    let coach = PracticeCoach::new(&settings.practice, Duration::from_secs(settings.openai.timeout_secs))?
        .with_prompts(prompts);

    let spinner = Output::spinner("Listening...");
    let result = coach.practice(audio_path, reference, language, level).await;
    spinner.finish_and_clear();

    match result {
        Ok(result) => {
            Output::kv("You said", &result.transcribed);
            println!();
            Output::success(&result.feedback);
        }
        Err(e) => {
            Output::error(&format!("Could not transcribe recording: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
