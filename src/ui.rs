use std::io::{self, Write};

use anyhow::Result;
use console::style;

use crate::bump::BumpKind;
use crate::commit::StructuredCommit;

pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", style("\u{2713}").green(), message);
}

pub fn display_status(message: &str) {
    println!("{} {}", style("\u{2192}").yellow(), message);
}

pub fn display_warning(message: &str) {
    println!("{}", style(message).yellow());
}

/// Verbose-mode detail line.
pub fn display_info(message: &str) {
    println!("{}", style(message).cyan());
}

/// One analysis line per parsed commit: message, resolved bump, force flag.
pub fn display_commit_line(commit: &StructuredCommit, bump: BumpKind) {
    let force_mark = if commit.force_major {
        " [FORCE MAJOR]"
    } else {
        ""
    };
    println!(
        "  {} \u{2192} {}{}",
        truncate(&commit.message, 60),
        bump,
        force_mark
    );
}

pub fn display_version_summary(current: &str, next: &str, bump: BumpKind) {
    println!();
    println!(
        "{}",
        style(format!("Current version: {}", current)).green()
    );
    println!("{}", style(format!("Next version:    {}", next)).green());
    println!(
        "{}",
        style(format!(
            "Bump type:       {}",
            bump.to_string().to_uppercase()
        ))
        .green()
    );
    println!();
}

/// Asks a yes/no question on stdin; anything but y/yes declines.
pub fn confirm(prompt: &str) -> Result<bool> {
    print!("{} (y/N): ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let response = input.trim().to_lowercase();
    Ok(response == "y" || response == "yes")
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let head: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", head)
}
