//! Doctor command - verify that lessons can run on this machine.

use crate::cli::Output;
use crate::config::Settings;
use console::style;
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Status {
    Ok,
    Warning,
    Error,
}

/// Outcome of one diagnostic.
#[derive(Debug)]
struct Check {
    name: &'static str,
    status: Status,
    detail: String,
    hint: Option<String>,
}

impl Check {
    fn new(name: &'static str, status: Status, detail: impl Into<String>) -> Self {
        Self {
            name,
            status,
            detail: detail.into(),
            hint: None,
        }
    }

    fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    fn print(&self) {
        let icon = match self.status {
            Status::Ok => style("✓").green(),
            Status::Warning => style("!").yellow(),
            Status::Error => style("✗").red(),
        };
        println!("  {} {} - {}", icon, style(self.name).bold(), self.detail);
        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks. Exits with status 1 if any check errors.
pub fn run_doctor(settings: &Settings, config_path: Option<&PathBuf>) -> anyhow::Result<()> {
    Output::header("Tubelingo Doctor");
    println!();

    let config_path = config_path.cloned().unwrap_or_else(Settings::default_config_path);
    let mut config_checks = vec![check_config_file(&config_path)];
    if let Some(dir) = &settings.prompts.custom_dir {
        config_checks.push(check_prompts_dir(&Settings::expand_path(dir)));
    }

    let sections = [
        ("External Tools", vec![check_ytdlp(&settings.youtube.ytdlp_path)]),
        ("API Configuration", vec![check_api_key(std::env::var("OPENAI_API_KEY").ok())]),
        ("Configuration", config_checks),
    ];

    let mut errors = 0;
    let mut warnings = 0;
    for (title, checks) in &sections {
        println!("{}", style(title).bold());
        for check in checks {
            check.print();
            match check.status {
                Status::Error => errors += 1,
                Status::Warning => warnings += 1,
                Status::Ok => {}
            }
        }
        println!();
    }

    if errors > 0 {
        Output::error(&format!("{} problem(s) will stop lessons from running.", errors));
        std::process::exit(1);
    }
    if warnings > 0 {
        Output::warning(&format!("Ready, with {} warning(s).", warnings));
    } else {
        Output::success("Ready to build lessons.");
    }
    Ok(())
}

fn check_ytdlp(path: &str) -> Check {
    match Command::new(path).arg("--version").output() {
        Ok(output) if output.status.success() => {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let version: String = stdout.lines().next().unwrap_or("installed").trim().chars().take(50).collect();
            Check::new("yt-dlp", Status::Ok, version)
        }
        Ok(output) => Check::new("yt-dlp", Status::Error, format!("{} exited with {}", path, output.status))
            .hint("Try reinstalling yt-dlp"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Check::new("yt-dlp", Status::Error, format!("{} not found", path)).hint(install_hint_ytdlp())
        }
        Err(e) => Check::new("yt-dlp", Status::Error, e.to_string()).hint(install_hint_ytdlp()),
    }
}

fn check_api_key(key: Option<String>) -> Check {
    const NAME: &str = "OPENAI_API_KEY";
    const SET_HINT: &str = "Set with: export OPENAI_API_KEY='sk-...'";

    let Some(key) = key.filter(|k| !k.trim().is_empty()) else {
        return Check::new(NAME, Status::Error, "not set").hint(SET_HINT);
    };
    if !key.starts_with("sk-") {
        return Check::new(NAME, Status::Warning, "set but format looks unusual")
            .hint("OpenAI keys start with sk-");
    }

    let chars: Vec<char> = key.chars().collect();
    let masked = if chars.len() > 12 {
        let head: String = chars[..7].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    } else {
        "sk-...".to_string()
    };
    Check::new(NAME, Status::Ok, format!("configured ({})", masked))
}

fn check_config_file(path: &Path) -> Check {
    if !path.exists() {
        return Check::new("Config file", Status::Warning, "using defaults")
            .hint("Create with: tubelingo config edit");
    }

    match Settings::load_from(Some(&path.to_path_buf())) {
        Ok(_) => Check::new("Config file", Status::Ok, path.display().to_string()),
        Err(e) => Check::new("Config file", Status::Error, format!("{} is invalid", path.display())).hint(e.to_string()),
    }
}

fn check_prompts_dir(dir: &Path) -> Check {
    if dir.is_dir() {
        Check::new("Custom prompts", Status::Ok, dir.display().to_string())
    } else {
        Check::new("Custom prompts", Status::Warning, format!("{} not found", dir.display()))
            .hint("Built-in prompts will be used")
    }
}

fn install_hint_ytdlp() -> &'static str {
    if cfg!(target_os = "macos") {
        "Install with: brew install yt-dlp"
    } else if cfg!(target_os = "linux") {
        "Install with: pip install yt-dlp (or your package manager)"
    } else {
        "Install from: https://github.com/yt-dlp/yt-dlp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_ytdlp() {
        let check = check_ytdlp("tubelingo-no-such-tool");
        assert_eq!(check.status, Status::Error);
        assert_eq!(check.detail, "tubelingo-no-such-tool not found");
        assert!(check.hint.is_some());
    }

    #[test]
    fn test_api_key_checks() {
        assert_eq!(check_api_key(None).status, Status::Error);
        assert_eq!(check_api_key(Some("  ".to_string())).status, Status::Error);
        assert_eq!(check_api_key(Some("abc".to_string())).status, Status::Warning);

        let check = check_api_key(Some("sk-abcdefghijklmnop1234".to_string()));
        assert_eq!(check.status, Status::Ok);
        assert_eq!(check.detail, "configured (sk-abcd...1234)");
        assert!(!check.detail.contains("efghijklmnop"));
    }

    #[test]
    fn test_config_file_checks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert_eq!(check_config_file(&path).status, Status::Warning);

        std::fs::write(&path, "[lesson]\ndefault_chunks = 4\n").unwrap();
        assert_eq!(check_config_file(&path).status, Status::Ok);

        std::fs::write(&path, "[lesson\n").unwrap();
        let check = check_config_file(&path);
        assert_eq!(check.status, Status::Error);
        assert!(check.hint.is_some());
    }

    #[test]
    fn test_prompts_dir_check() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(check_prompts_dir(dir.path()).status, Status::Ok);
        assert_eq!(check_prompts_dir(&dir.path().join("missing")).status, Status::Warning);
    }
}
