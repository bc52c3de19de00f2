use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::commit::StructuredCommit;
use crate::error::Result;

const FILE_HEADER: &str =
    "# Changelog\n\nAll notable changes to this project will be documented in this file.\n\n";

// Display order for known commit types; unknown types follow, untyped last.
const TYPE_ORDER: &[&str] = &[
    "Breaking",
    "Feature",
    "Fix",
    "Refactor",
    "Docs",
    "Style",
    "Build",
    "Tests",
    "Conf",
    "Migrations",
    "Submodule",
];

fn type_metadata(commit_type: &str) -> (&'static str, &str) {
    match commit_type {
        "Feature" => ("\u{2728}", "Features"),
        "Fix" => ("\u{1F41D}", "Bug Fixes"),
        "Refactor" => ("\u{1F527}", "Refactoring"),
        "Docs" => ("\u{1F4DA}", "Documentation"),
        "Style" => ("\u{1F485}", "Styling"),
        "Build" => ("\u{1F3D7}\u{FE0F}", "Build System"),
        "Tests" => ("\u{1F9EA}", "Tests"),
        "Conf" => ("\u{1F9F0}", "Configuration"),
        "Migrations" => ("\u{1F5C4}\u{FE0F}", "Migrations"),
        "Submodule" => ("\u{1F3F7}\u{FE0F}", "Submodules"),
        "Breaking" => ("\u{1F4A5}", "Breaking Changes"),
        other => ("", other),
    }
}

/// Prepends release entries to a keep-a-changelog style markdown file.
pub struct Generator {
    file_path: PathBuf,
}

struct CommitGroup<'a> {
    emoji: &'static str,
    title: String,
    commits: Vec<&'a StructuredCommit>,
}

impl Generator {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Generator {
            file_path: file_path.into(),
        }
    }

    /// Writes a new entry for `version` at the top of the changelog,
    /// creating the file with a standard header when it does not exist yet.
    pub fn generate(&self, version: &str, commits: &[StructuredCommit]) -> Result<()> {
        let groups = group_commits(commits);
        let entry = format_entry(version, &groups);
        self.insert_entry(&entry)
    }

    fn insert_entry(&self, entry: &str) -> Result<()> {
        let content = if self.file_path.exists() {
            fs::read_to_string(&self.file_path)?
        } else {
            FILE_HEADER.to_string()
        };

        // New entries go after the header, before the first existing entry
        let insert_at = if content.starts_with("## [") {
            Some(0)
        } else {
            content.find("\n## [").map(|i| i + 1)
        };

        let new_content = match insert_at {
            Some(i) => format!("{}{}{}", &content[..i], entry, &content[i..]),
            None => {
                let mut c = content;
                if !c.ends_with('\n') {
                    c.push('\n');
                }
                c.push_str(entry);
                c
            }
        };

        fs::write(&self.file_path, new_content)?;
        Ok(())
    }
}

fn group_commits(commits: &[StructuredCommit]) -> Vec<CommitGroup<'_>> {
    let mut groups: Vec<CommitGroup<'_>> = Vec::new();
    let mut untyped: Vec<&StructuredCommit> = Vec::new();

    for commit in commits {
        if commit.r#type.is_empty() {
            untyped.push(commit);
            continue;
        }

        let (emoji, title) = type_metadata(&commit.r#type);
        match groups.iter_mut().find(|g| g.title == title) {
            Some(group) => group.commits.push(commit),
            None => groups.push(CommitGroup {
                emoji,
                title: title.to_string(),
                commits: vec![commit],
            }),
        }
    }

    // Known types in their canonical order, unknown types after
    groups.sort_by_key(|group| {
        TYPE_ORDER
            .iter()
            .position(|t| type_metadata(t).1 == group.title)
            .unwrap_or(TYPE_ORDER.len())
    });

    if !untyped.is_empty() {
        groups.push(CommitGroup {
            emoji: "\u{1F4DD}",
            title: "Other Changes".to_string(),
            commits: untyped,
        });
    }

    groups
}

fn format_entry(version: &str, groups: &[CommitGroup<'_>]) -> String {
    let mut entry = format!(
        "## [{}] - {}\n\n",
        version,
        Local::now().format("%Y-%m-%d")
    );

    for group in groups {
        if group.commits.is_empty() {
            continue;
        }

        entry.push_str(&format!("### {} {}\n\n", group.emoji, group.title));
        for commit in &group.commits {
            entry.push_str(&format_commit(commit));
        }
        entry.push('\n');
    }

    entry
}

fn format_commit(commit: &StructuredCommit) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(scope) = &commit.scope {
        parts.push(format!("**{}**", scope));
    }
    parts.push(commit.description.clone());

    let mut suffix = String::new();
    if let Some(board) = &commit.board {
        suffix.push_str(&format!(" ({})", board));
    }
    if !commit.hash.is_empty() {
        suffix.push_str(&format!(" [`{}`]", commit.hash));
    }

    format!("- {}{}\n", parts.join(": "), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    fn commit(r#type: &str, desc: &str) -> StructuredCommit {
        StructuredCommit {
            r#type: r#type.to_string(),
            description: desc.to_string(),
            ..Default::default()
        }
    }

    fn changelog_path(dir: &TempDir) -> PathBuf {
        dir.path().join("CHANGELOG.md")
    }

    #[test]
    fn test_creates_file_with_header() {
        let dir = TempDir::new().unwrap();
        let path = changelog_path(&dir);

        Generator::new(&path)
            .generate("1.1.0", &[commit("Feature", "add things")])
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# Changelog"));
        assert!(content.contains("## [1.1.0]"));
        assert!(content.contains("### \u{2728} Features"));
        assert!(content.contains("- add things"));
    }

    #[test]
    fn test_newest_entry_first() {
        let dir = TempDir::new().unwrap();
        let path = changelog_path(&dir);
        let generator = Generator::new(&path);

        generator
            .generate("1.0.1", &[commit("Fix", "first release fix")])
            .unwrap();
        generator
            .generate("1.1.0", &[commit("Feature", "second release")])
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let newer = content.find("## [1.1.0]").unwrap();
        let older = content.find("## [1.0.1]").unwrap();
        assert!(newer < older);
        // Header stays on top
        assert!(content.starts_with("# Changelog"));
    }

    #[test]
    fn test_breaking_group_sorts_first() {
        let dir = TempDir::new().unwrap();
        let path = changelog_path(&dir);

        let commits = vec![
            commit("Fix", "small fix"),
            commit("Breaking", "remove old API"),
            commit("Feature", "new API"),
        ];
        Generator::new(&path).generate("2.0.0", &commits).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let breaking = content.find("Breaking Changes").unwrap();
        let features = content.find("Features").unwrap();
        let fixes = content.find("Bug Fixes").unwrap();
        assert!(breaking < features);
        assert!(features < fixes);
    }

    #[test]
    fn test_unknown_type_gets_own_section() {
        let dir = TempDir::new().unwrap();
        let path = changelog_path(&dir);

        Generator::new(&path)
            .generate("1.0.1", &[commit("Hotfix", "urgent patch")])
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        // No emoji for unknown types; the empty slot leaves a double space
        assert!(content.contains("###  Hotfix"));
        assert!(content.contains("- urgent patch"));
    }

    #[test]
    fn test_note_emoji_reserved_for_other_changes() {
        let dir = TempDir::new().unwrap();
        let path = changelog_path(&dir);

        let commits = vec![commit("Hotfix", "urgent patch"), commit("", "mystery work")];
        Generator::new(&path).generate("1.0.1", &commits).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("### \u{1F4DD} Other Changes"));
        assert!(!content.contains("\u{1F4DD} Hotfix"));
    }

    #[test]
    fn test_commit_formatting_with_scope_board_hash() {
        let formatted = format_commit(&StructuredCommit {
            hash: "abc1234".to_string(),
            r#type: "Fix".to_string(),
            scope: Some("auth".to_string()),
            board: Some("B-42".to_string()),
            description: "tighten token checks".to_string(),
            ..Default::default()
        });

        assert_eq!(
            formatted,
            "- **auth**: tighten token checks (B-42) [`abc1234`]\n"
        );
    }

    #[test]
    fn test_untyped_commits_grouped_as_other() {
        let dir = TempDir::new().unwrap();
        let path = changelog_path(&dir);

        let commits = vec![commit("Fix", "a fix"), commit("", "mystery work")];

        Generator::new(&path).generate("1.0.1", &commits).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("Other Changes"));
        let fixes = content.find("Bug Fixes").unwrap();
        let other = content.find("Other Changes").unwrap();
        assert!(fixes < other);
    }
}
