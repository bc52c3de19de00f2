use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::commit::StructuredCommit;

/// The kind of semantic version bump to apply.
///
/// Variants are declared in precedence order so the derived `Ord` gives
/// `None < Patch < Minor < Major`; resolution keeps the highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BumpKind {
    None,
    Patch,
    Minor,
    Major,
}

impl fmt::Display for BumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BumpKind::None => "none",
            BumpKind::Patch => "patch",
            BumpKind::Minor => "minor",
            BumpKind::Major => "major",
        };
        write!(f, "{}", name)
    }
}

/// Mapping from commit type to bump kind, loaded once from configuration.
/// Lookup is case-sensitive and exact; unmapped types resolve to `None`.
pub type BumpRules = HashMap<String, BumpKind>;

/// Resolves the single bump to apply for a batch of commits.
///
/// Any commit with `force_major` short-circuits to `Major` immediately;
/// otherwise the result is the maximum mapped bump across all commits.
/// Pure function of its inputs, order-insensitive in effect.
pub fn determine_bump(rules: &BumpRules, commits: &[StructuredCommit]) -> BumpKind {
    let mut bump = BumpKind::None;

    for commit in commits {
        if commit.force_major {
            return BumpKind::Major;
        }

        let commit_bump = rules.get(&commit.r#type).copied().unwrap_or(BumpKind::None);
        bump = bump.max(commit_bump);
    }

    bump
}
