use std::path::Path;

use anyhow::Result;
use clap::{Parser, Subcommand};
use regex::Regex;

use sembump::bump::{determine_bump, BumpKind};
use sembump::changelog::Generator;
use sembump::commit::{self, StructuredCommit};
use sembump::config::{Config, CONFIG_FILE};
use sembump::git_ops::{compile_tag_pattern, version_from_tag, GitRepo};
use sembump::ui;
use sembump::updater::FileUpdater;
use sembump::version;

#[derive(Parser)]
#[command(
    name = "sembump",
    about = "Automated semantic versioning based on commit messages",
    long_about = "Sembump analyzes your commit history and automatically\n\
                  updates version numbers in your project files based on\n\
                  structured commit messages."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[arg(long, help = "Config file (default is .sembump.toml)")]
    config: Option<String>,

    #[arg(long, help = "Show what would be done without making changes")]
    dry_run: bool,

    #[arg(short, long, help = "Verbose output")]
    verbose: bool,

    #[arg(long, help = "Start ref for commit range (default: latest tag)")]
    from: Option<String>,

    #[arg(long, default_value = "HEAD", help = "End ref for commit range")]
    to: String,
}

#[derive(Subcommand)]
enum Command {
    /// Initialize a new .sembump.toml configuration file
    Init,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Init) => init_config(),
        None => run(&cli),
    }
}

fn init_config() -> Result<()> {
    if Path::new(CONFIG_FILE).exists() {
        ui::display_warning(&format!("Config file {} already exists", CONFIG_FILE));
        if !ui::confirm("Do you want to overwrite it?")? {
            ui::display_info("Operation cancelled");
            return Ok(());
        }
    }

    Config::default().save(CONFIG_FILE)?;

    ui::display_success(&format!("Created {}", CONFIG_FILE));
    println!();
    ui::display_info("Next steps:");
    println!("  1. Edit .sembump.toml to match your project");
    println!("  2. Run 'sembump --dry-run' to preview changes");
    println!("  3. Run 'sembump' to bump version");

    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    if cli.verbose {
        ui::display_info("[CONFIG] Loaded configuration");
        if let Some(path) = &cli.config {
            ui::display_info(&format!("[CONFIG] File: {}", path));
        }
    }

    if !GitRepo::is_repository(".") {
        anyhow::bail!("not a git repository");
    }
    let repo = GitRepo::open(".")?;

    let tag_pattern = compile_tag_pattern(&config.detection.tag_pattern)?;

    let current_version = detect_version(&repo, &config, &tag_pattern)?;
    if cli.verbose {
        ui::display_info(&format!("[VERSION] Current: {}", current_version));
    }

    // Default range start is the latest matching tag
    let from = match &cli.from {
        Some(rev) => Some(rev.clone()),
        None => repo.latest_tag(&tag_pattern)?,
    };

    let commits = repo.commits_between(from.as_deref(), &cli.to, config.detection.exclude_merges)?;
    if commits.is_empty() {
        ui::display_warning(&format!("No commits found since {}", current_version));
        return Ok(());
    }
    if cli.verbose {
        ui::display_info(&format!("[GIT] Found {} commits", commits.len()));
    }

    let mut parsed_commits: Vec<StructuredCommit> = Vec::new();
    for info in &commits {
        let mut parsed = commit::parse(&info.message);

        if !parsed.is_valid() {
            if cli.verbose {
                ui::display_warning(&format!("[WARN] Invalid commit format: {}", info.message));
            }
            continue;
        }

        parsed.hash = info.hash.clone();

        if cli.verbose {
            ui::display_commit_line(&parsed, config.bump_for(&parsed.r#type));
        }

        parsed_commits.push(parsed);
    }

    if parsed_commits.is_empty() {
        ui::display_warning("No valid commits found");
        return Ok(());
    }

    let bump = determine_bump(&config.bump_rules, &parsed_commits);
    let (new_version, bump) = version::calculate(&current_version, bump, config.version.format)?;

    if bump == BumpKind::None {
        ui::display_success(&format!(
            "No version bump needed (current: {})",
            current_version
        ));
        return Ok(());
    }

    ui::display_version_summary(&current_version, &new_version, bump);

    if cli.dry_run {
        ui::display_warning("Files to update:");
        for version_file in config.version_files() {
            ui::display_warning(&format!("  - {} ({})", version_file.file, version_file.key));
        }
        if config.changelog.enabled {
            ui::display_warning(&format!("  - {}", config.changelog.file));
        }
        println!();
        ui::display_warning("No changes made (dry run mode)");
        return Ok(());
    }

    let mut updated_files: Vec<String> = Vec::new();
    for version_file in config.version_files() {
        if !Path::new(&version_file.file).exists() {
            ui::display_warning(&format!("[WARN] File not found: {}", version_file.file));
            continue;
        }

        let updater = FileUpdater::new(&version_file.file)?;
        updater.set(&version_file.key, &new_version)?;

        ui::display_success(&format!("Updated {}", version_file.file));
        updated_files.push(version_file.file.clone());
    }

    if config.changelog.enabled {
        let generator = Generator::new(&config.changelog.file);
        generator.generate(&new_version, &parsed_commits)?;
        ui::display_success(&format!("Updated {}", config.changelog.file));
        updated_files.push(config.changelog.file.clone());
    }

    if config.git.auto_commit && !updated_files.is_empty() {
        let message = config.git.commit_message.replace("{version}", &new_version);
        repo.create_commit(&updated_files, &message)?;
        ui::display_success(&format!("Created commit: {}", message));
    }

    if config.git.auto_tag {
        let tag_name = config.git.tag_format.replace("{version}", &new_version);
        let tag_message = config.git.tag_message.replace("{version}", &new_version);
        repo.create_tag(&tag_name, &tag_message)?;
        ui::display_success(&format!("Created tag: {}", tag_name));
    }

    println!();
    ui::display_success(&format!(
        "Version updated: {} \u{2192} {}",
        current_version, new_version
    ));

    Ok(())
}

/// Discovers the current version using the configured strategies in order,
/// falling back to the configured initial version.
fn detect_version(repo: &GitRepo, config: &Config, tag_pattern: &Regex) -> Result<String> {
    for strategy in &config.detection.strategies {
        match strategy.as_str() {
            "git-tags" => {
                if let Some(tag) = repo.latest_tag(tag_pattern)? {
                    if let Ok(version) = version_from_tag(&tag, tag_pattern) {
                        return Ok(version);
                    }
                }
            }
            "version-file" => {
                if Path::new(&config.version.file).exists() {
                    if let Ok(updater) = FileUpdater::new(&config.version.file) {
                        if let Ok(version) = updater.get(&config.version.key) {
                            if !version.is_empty() && version::is_valid(&version) {
                                return Ok(version);
                            }
                        }
                    }
                }
            }
            other => {
                ui::display_warning(&format!("[WARN] Unknown detection strategy: {}", other));
            }
        }
    }

    Ok(config.version.initial.clone())
}
