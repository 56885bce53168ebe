//! Lesson command implementation.

use crate::cli::{AlreadyReported, Output};
use crate::error::PipelineError;
use crate::lesson::{CefrLevel, LessonRequest};
use crate::session::Session;
use anyhow::Result;

/// Run the lesson command.
pub async fn run_lesson(
    session: &mut Session,
    url: &str,
    language: &str,
    topic: &str,
    level: Option<String>,
    chunks: Option<i64>,
    json: bool,
) -> Result<()> {
    let defaults = &session.settings().lesson;
    let level = normalize_level(level.unwrap_or_else(|| defaults.default_level.clone()));
    let request = LessonRequest::new(url, language, topic, level, chunks.unwrap_or(defaults.default_chunks));

    let spinner = (!json).then(|| Output::spinner("Building lesson..."));
    let result = session.generate_lesson(&request).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let items = match result {
        Ok(items) => items,
        Err(e) => {
            report_failure(&e);
            return Err(AlreadyReported.into());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if items.is_empty() {
        Output::warning(&format!("Nothing in this video matched the topic '{}'.", topic));
        return Ok(());
    }

    Output::success(&format!("{} passage(s) rewritten at {}", items.len(), request.level.to_uppercase()));
    for (i, item) in items.iter().enumerate() {
        Output::lesson_item(i, item);
    }

    Ok(())
}

/// Accept `b1` or ` B1 ` on the command line. Anything unparseable is passed
/// through so validation reports it.
fn normalize_level(level: String) -> String {
    match level.parse::<CefrLevel>() {
        Ok(parsed) => parsed.as_str().to_string(),
        Err(_) => level,
    }
}

fn report_failure(e: &PipelineError) {
    Output::error(&format!("{}: {}", e.kind(), e));

    match e {
        PipelineError::LanguageNotAvailable { available, .. } if !available.is_empty() => {
            eprintln!("Available languages:");
            for lang in available {
                eprintln!("  - {} ({})", lang.name, lang.code);
            }
        }
        PipelineError::General(_) => {
            Output::info("Run 'tubelingo doctor' for detailed diagnostics.");
        }
        _ if e.is_retryable() => {
            Output::info("This may be temporary; try again in a moment.");
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    #[test]
    fn test_normalize_level() {
        assert_eq!(normalize_level("b1".to_string()), "B1");
        assert_eq!(normalize_level(" a2 ".to_string()), "A2");
        assert_eq!(normalize_level("Z9".to_string()), "Z9");
    }

    #[tokio::test]
    async fn test_failure_is_reported_once() {
        let mut session = Session::new(Settings::default());

        let err = run_lesson(&mut session, "dQw4w9WgXcQ", "es", "  ", None, Some(3), true)
            .await
            .unwrap_err();
        assert!(err.is::<AlreadyReported>());
    }
}
