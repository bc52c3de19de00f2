use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Structured representation of a single commit message.
///
/// Produced by [`parse`]; a commit with an empty `type` carries no usable
/// bump information and is filtered out by [`parse_multiple`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StructuredCommit {
    pub hash: String,
    pub message: String,
    pub r#type: String,
    pub scope: Option<String>,
    pub board: Option<String>,
    pub description: String,
    pub force_major: bool,
}

// Message patterns in priority order. Each is anchored to the full message;
// the first match wins.
//
// 1. B-378670(payment,spare): <Fix> removed spares update
// 2. U-1234(config): Feature new section
// 3. U-1234: Tests added for parser
// 4. Feature!(log): added logger
static PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"^(?P<board>[A-Z]+-\d+)(?:\((?P<scope>[^)]+)\))?: <(?P<type>[^>]+)>\s*(?P<desc>.+)$")
            .expect("board/wrapped-type pattern"),
        Regex::new(r"^(?P<board>[A-Z]+-\d+)\((?P<scope>[^)]+)\): (?P<type>\w+)\s+(?P<desc>.+)$")
            .expect("board/scope pattern"),
        Regex::new(r"^(?P<board>[A-Z]+-\d+): (?P<type>\w+)\s+(?P<desc>.+)$")
            .expect("board pattern"),
        Regex::new(r"^(?P<type>\w+)(?P<force>!)?(?:\((?P<scope>[^)]+)\))?: (?P<desc>.+)$")
            .expect("generic pattern"),
    ]
});

/// Parses a commit message into a [`StructuredCommit`].
///
/// Never fails. Tries the anchored patterns in priority order; if none
/// matches, falls back to splitting on the first colon, and if there is no
/// colon at all the result has an empty `type` (callers filter those out).
///
/// Independent of pattern matching, the literal substrings `Breaking` and
/// `BREAKING` anywhere in the message set `force_major`. Exactly those two
/// spellings are recognized; the check is intentionally not case-insensitive.
pub fn parse(message: &str) -> StructuredCommit {
    let mut commit = StructuredCommit {
        message: message.to_string(),
        ..Default::default()
    };

    let message = message.trim();

    if message.contains("Breaking") || message.contains("BREAKING") {
        commit.force_major = true;
    }

    for pattern in PATTERNS.iter() {
        if let Some(captures) = pattern.captures(message) {
            if let Some(m) = captures.name("type") {
                commit.r#type = m.as_str().trim().to_string();
            }
            // Scope is carried verbatim, including embedded commas.
            if let Some(m) = captures.name("scope") {
                commit.scope = Some(m.as_str().to_string());
            }
            if let Some(m) = captures.name("board") {
                commit.board = Some(m.as_str().to_string());
            }
            if let Some(m) = captures.name("desc") {
                commit.description = m.as_str().to_string();
            }
            if captures.name("force").map(|m| m.as_str()) == Some("!") {
                commit.force_major = true;
            }
            return commit;
        }
    }

    // Fallback: try to recover type and description from a bare "type: desc"
    if let Some((left, right)) = message.split_once(':') {
        let mut possible_type = left.trim();
        if let Some(stripped) = possible_type.strip_suffix('!') {
            commit.force_major = true;
            possible_type = stripped;
        }
        commit.r#type = possible_type.to_string();
        commit.description = right.trim().to_string();
    }

    commit
}

/// Parses a sequence of messages, keeping only usable commits.
///
/// Messages that yield an empty `type` are dropped silently; relative order
/// of the surviving commits is preserved.
pub fn parse_multiple<S: AsRef<str>>(messages: &[S]) -> Vec<StructuredCommit> {
    messages
        .iter()
        .map(|msg| parse(msg.as_ref()))
        .filter(StructuredCommit::is_valid)
        .collect()
}

impl StructuredCommit {
    /// A commit is usable by the bump resolver only if it has a type.
    pub fn is_valid(&self) -> bool {
        !self.r#type.is_empty()
    }
}

impl fmt::Display for StructuredCommit {
    /// Renders as `[BOARD ]TYPE[!][ (SCOPE)][ DESCRIPTION]`, space-joined,
    /// omitting absent parts.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();

        if let Some(board) = &self.board {
            parts.push(board.clone());
        }

        if !self.r#type.is_empty() {
            let mut type_str = self.r#type.clone();
            if self.force_major {
                type_str.push('!');
            }
            parts.push(type_str);
        }

        if let Some(scope) = &self.scope {
            parts.push(format!("({})", scope));
        }

        if !self.description.is_empty() {
            parts.push(self.description.clone());
        }

        write!(f, "{}", parts.join(" "))
    }
}
