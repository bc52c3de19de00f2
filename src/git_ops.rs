use std::path::Path;

use chrono::DateTime;
use git2::Repository;
use regex::Regex;

use crate::error::{Result, SembumpError};

/// A commit as seen by the version pipeline: short hash and first message
/// line only.
#[derive(Debug, Clone)]
pub struct CommitInfo {
    pub hash: String,
    pub message: String,
    pub author: String,
    pub date: String,
}

/// Wrapper around a git2 [`Repository`] for the operations sembump needs:
/// commit-range listing, tag discovery, and the optional commit/tag side
/// effects after a bump.
pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Opens the repository at `path`, discovering upwards from it.
    pub fn open(path: &str) -> Result<Self> {
        let repo = Repository::discover(path)?;
        Ok(GitRepo { repo })
    }

    /// Whether `path` is inside a git repository.
    pub fn is_repository(path: &str) -> bool {
        Repository::discover(path).is_ok()
    }

    /// Lists commits reachable from `to`, stopping before `from`.
    ///
    /// Walks most-recent-first. Merge commits are skipped when
    /// `exclude_merges` is set; only the first line of each message is kept.
    pub fn commits_between(
        &self,
        from: Option<&str>,
        to: &str,
        exclude_merges: bool,
    ) -> Result<Vec<CommitInfo>> {
        let to_oid = self
            .repo
            .revparse_single(to)
            .map_err(|e| SembumpError::config(format!("cannot resolve ref '{}': {}", to, e)))?
            .peel_to_commit()?
            .id();

        let from_oid = match from {
            Some(rev) => Some(
                self.repo
                    .revparse_single(rev)
                    .map_err(|e| {
                        SembumpError::config(format!("cannot resolve ref '{}': {}", rev, e))
                    })?
                    .peel_to_commit()?
                    .id(),
            ),
            None => None,
        };

        let mut revwalk = self.repo.revwalk()?;
        revwalk.push(to_oid)?;

        let mut commits = Vec::new();
        for oid in revwalk {
            let oid = oid?;

            if Some(oid) == from_oid {
                break;
            }

            let commit = self.repo.find_commit(oid)?;
            if exclude_merges && commit.parent_count() > 1 {
                continue;
            }

            let date = DateTime::from_timestamp(commit.time().seconds(), 0)
                .map(|dt| dt.format("%Y-%m-%d").to_string())
                .unwrap_or_default();

            commits.push(CommitInfo {
                hash: oid.to_string().chars().take(7).collect(),
                message: commit.summary().unwrap_or("").to_string(),
                author: commit.author().name().unwrap_or("").to_string(),
                date,
            });
        }

        Ok(commits)
    }

    /// Finds the latest tag matching the configured pattern.
    ///
    /// Matching tag names are sorted lexically descending and the first one
    /// is returned.
    pub fn latest_tag(&self, pattern: &Regex) -> Result<Option<String>> {
        let tags = self.repo.tag_names(None)?;

        let mut matching: Vec<String> = tags
            .iter()
            .flatten()
            .filter(|name| pattern.is_match(name))
            .map(|name| name.to_string())
            .collect();

        matching.sort_by(|a, b| b.cmp(a));
        Ok(matching.into_iter().next())
    }

    /// Stages the given files and commits them on HEAD.
    pub fn create_commit(&self, files: &[String], message: &str) -> Result<()> {
        let mut index = self.repo.index()?;
        for file in files {
            index.add_path(Path::new(file))?;
        }
        index.write()?;

        let tree_oid = index.write_tree()?;
        let tree = self.repo.find_tree(tree_oid)?;
        let signature = self.repo.signature()?;
        let head = self.repo.head()?.peel_to_commit()?;

        self.repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &[&head])?;
        Ok(())
    }

    /// Creates an annotated tag on the current HEAD commit.
    pub fn create_tag(&self, name: &str, message: &str) -> Result<()> {
        let head = self.repo.head()?.peel_to_commit()?;
        let signature = self.repo.signature()?;
        self.repo
            .tag(name, head.as_object(), &signature, message, false)?;
        Ok(())
    }
}

/// Extracts the version capture from a tag name using the configured pattern.
pub fn version_from_tag(tag: &str, pattern: &Regex) -> Result<String> {
    pattern
        .captures(tag)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| SembumpError::version(format!("tag '{}' does not match pattern", tag)))
}

/// Compiles the configured tag pattern, surfacing a config error on bad
/// syntax.
pub fn compile_tag_pattern(pattern: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|e| SembumpError::config(format!("invalid tag pattern '{}': {}", pattern, e)))
}
