//! CLI output formatting utilities.

use crate::lesson::LessonItem;
use crate::transcript_source::{LanguageDescriptor, VideoSummary};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(msg: &str) {
        println!("  {} {}", style("*").cyan(), msg);
    }

    /// Print one transcript language.
    pub fn language(lang: &LanguageDescriptor) {
        let kind = if lang.is_generated { "auto-generated" } else { "manual" };
        let translatable = if lang.is_translatable { ", translatable" } else { "" };
        println!(
            "  {} {} ({}) {}",
            style("*").cyan(),
            style(&lang.name).bold(),
            style(&lang.code).cyan(),
            style(format!("[{}{}]", kind, translatable)).dim()
        );
    }

    /// Print one lesson item.
    pub fn lesson_item(index: usize, item: &LessonItem) {
        println!(
            "\n{} {} {}",
            style(format!("#{}", index + 1)).green().bold(),
            style(item.level).cyan(),
            style(format!("({} words)", item.word_count)).dim()
        );
        println!("{}", item.rewritten);
        println!("   {} {}", style("original:").dim(), style(content_preview(&item.original, 200)).dim());
    }

    /// Print a search hit.
    pub fn video(video: &VideoSummary) {
        let duration = video
            .duration_seconds
            .map(|d| format!(", {}", format_duration(d as f64)))
            .unwrap_or_default();
        println!(
            "\n{} {} ({}{})",
            style(">>").green(),
            style(&video.title).bold(),
            style(&video.video_id).dim(),
            duration
        );
        if let Some(channel) = &video.channel {
            println!("   {}", channel);
        }
        println!("   {}", style(&video.url).dim());
    }

    /// Print a shortened transcript.
    pub fn preview(content: &str) {
        println!("   {}", content_preview(content, 200));
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Format duration in seconds to a human-readable string.
fn format_duration(seconds: f64) -> String {
    let total_seconds = seconds as u32;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

/// Truncate content with ellipsis.
fn content_preview(content: &str, max_chars: usize) -> String {
    let content = content.replace('\n', " ");
    if content.chars().count() <= max_chars {
        content
    } else {
        let truncated: String = content.chars().take(max_chars).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(42.0), "42s");
        assert_eq!(format_duration(125.0), "2m 5s");
        assert_eq!(format_duration(3725.0), "1h 2m 5s");
    }

    #[test]
    fn test_content_preview() {
        assert_eq!(content_preview("short\ntext", 20), "short text");
        assert_eq!(content_preview("ñandú ñandú", 5), "ñandú...");
    }
}
