use std::cmp::Ordering;
use std::fmt;

use crate::bump::BumpKind;
use crate::config::Format;
use crate::error::{Result, SembumpError};

/// Semantic version as a plain integer triple.
///
/// The `v` prefix accepted by [`Version::parse`] is purely cosmetic and is
/// not part of the value; output formatting is driven by [`Format`] alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Parses a version string leniently.
    ///
    /// Strips one leading `v`, then accepts 1 to 3 dotted non-negative
    /// integer components, zero-extending the missing ones ("1.2" -> 1.2.0,
    /// "1" -> 1.0.0). Anything else is a version error.
    pub fn parse(version: &str) -> Result<Self> {
        let clean = version.strip_prefix('v').unwrap_or(version);

        let parts: Vec<&str> = clean.split('.').collect();
        if parts.len() > 3 {
            return Err(SembumpError::version(format!(
                "invalid version format: '{}'",
                version
            )));
        }

        let mut components = [0u64; 3];
        for (i, part) in parts.iter().enumerate() {
            components[i] = part.parse::<u64>().map_err(|_| {
                SembumpError::version(format!(
                    "invalid version component '{}' in '{}'",
                    part, version
                ))
            })?;
        }

        Ok(Version::new(components[0], components[1], components[2]))
    }

    /// Applies a bump, resetting the lower components.
    pub fn bump(&self, kind: BumpKind) -> Self {
        match kind {
            BumpKind::Major => Version::new(self.major + 1, 0, 0),
            BumpKind::Minor => Version::new(self.major, self.minor + 1, 0),
            BumpKind::Patch => Version::new(self.major, self.minor, self.patch + 1),
            BumpKind::None => *self,
        }
    }

    /// Serializes for output, prefixing `v` iff the configured format asks
    /// for it. The prefix is never auto-detected from the parsed input.
    pub fn format(&self, format: Format) -> String {
        match format {
            Format::Semver => self.to_string(),
            Format::VPrefix => format!("v{}", self),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Computes the next version string for a resolved bump.
///
/// A `None` bump echoes the input string untouched (prefix and all); any
/// other bump re-serializes in the configured format. An unparsable current
/// version is an error even when the bump is `None`.
pub fn calculate(current: &str, bump: BumpKind, format: Format) -> Result<(String, BumpKind)> {
    let version = Version::parse(current)?;

    if bump == BumpKind::None {
        return Ok((current.to_string(), BumpKind::None));
    }

    Ok((version.bump(bump).format(format), bump))
}

/// Whether a string parses as a version, prefix included.
pub fn is_valid(version: &str) -> bool {
    Version::parse(version).is_ok()
}

/// Compares two version strings as integer triples, ignoring any `v` prefix.
/// Returns -1, 0 or 1.
pub fn compare(v1: &str, v2: &str) -> Result<i32> {
    let a = Version::parse(v1)?;
    let b = Version::parse(v2)?;

    Ok(match a.cmp(&b) {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full() {
        let v = Version::parse("1.2.3").unwrap();
        assert_eq!(v, Version::new(1, 2, 3));
    }

    #[test]
    fn test_parse_with_prefix() {
        let v = Version::parse("v1.2.3").unwrap();
        assert_eq!(v, Version::new(1, 2, 3));
    }

    #[test]
    fn test_parse_zero_extends_short_forms() {
        assert_eq!(Version::parse("1.2").unwrap(), Version::new(1, 2, 0));
        assert_eq!(Version::parse("1").unwrap(), Version::new(1, 0, 0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Version::parse("").is_err());
        assert!(Version::parse("invalid").is_err());
        assert!(Version::parse("1.2.3.4").is_err());
        assert!(Version::parse("1.x.3").is_err());
        assert!(Version::parse("-1.2.3").is_err());
    }

    #[test]
    fn test_bump_arithmetic() {
        let v = Version::new(1, 2, 3);
        assert_eq!(v.bump(BumpKind::Major), Version::new(2, 0, 0));
        assert_eq!(v.bump(BumpKind::Minor), Version::new(1, 3, 0));
        assert_eq!(v.bump(BumpKind::Patch), Version::new(1, 2, 4));
        assert_eq!(v.bump(BumpKind::None), v);
    }

    #[test]
    fn test_calculate_semver() {
        assert_eq!(
            calculate("1.2.3", BumpKind::Major, Format::Semver).unwrap(),
            ("2.0.0".to_string(), BumpKind::Major)
        );
        assert_eq!(
            calculate("1.2.3", BumpKind::Minor, Format::Semver).unwrap(),
            ("1.3.0".to_string(), BumpKind::Minor)
        );
        assert_eq!(
            calculate("1.2.3", BumpKind::Patch, Format::Semver).unwrap(),
            ("1.2.4".to_string(), BumpKind::Patch)
        );
    }

    #[test]
    fn test_calculate_v_prefix_format() {
        assert_eq!(
            calculate("v1.2.3", BumpKind::Minor, Format::VPrefix).unwrap(),
            ("v1.3.0".to_string(), BumpKind::Minor)
        );
    }

    #[test]
    fn test_calculate_format_is_explicit_not_detected() {
        // Input had a prefix, but the configured format wins
        assert_eq!(
            calculate("v1.2.3", BumpKind::Patch, Format::Semver).unwrap(),
            ("1.2.4".to_string(), BumpKind::Patch)
        );
        assert_eq!(
            calculate("1.2.3", BumpKind::Patch, Format::VPrefix).unwrap(),
            ("v1.2.4".to_string(), BumpKind::Patch)
        );
    }

    #[test]
    fn test_calculate_none_is_idempotent() {
        assert_eq!(
            calculate("1.2.3", BumpKind::None, Format::Semver).unwrap(),
            ("1.2.3".to_string(), BumpKind::None)
        );
        // Input echoed verbatim, prefix included
        assert_eq!(
            calculate("v1.2.3", BumpKind::None, Format::Semver).unwrap(),
            ("v1.2.3".to_string(), BumpKind::None)
        );
    }

    #[test]
    fn test_calculate_invalid_version_errors() {
        assert!(calculate("not-a-version", BumpKind::Patch, Format::Semver).is_err());
        assert!(calculate("", BumpKind::None, Format::Semver).is_err());
    }

    #[test]
    fn test_is_valid() {
        assert!(is_valid("1.2.3"));
        assert!(is_valid("v1.2.3"));
        assert!(is_valid("0.0.1"));
        assert!(is_valid("10.20.30"));
        assert!(is_valid("1.2"));
        assert!(is_valid("1"));
        assert!(!is_valid("invalid"));
        assert!(!is_valid(""));
    }

    #[test]
    fn test_compare() {
        assert_eq!(compare("1.2.3", "1.2.3").unwrap(), 0);
        assert_eq!(compare("1.2.3", "1.2.4").unwrap(), -1);
        assert_eq!(compare("1.2.4", "1.2.3").unwrap(), 1);
        assert_eq!(compare("1.3.0", "1.2.9").unwrap(), 1);
        assert_eq!(compare("2.0.0", "1.9.9").unwrap(), 1);
        assert_eq!(compare("v1.2.3", "v1.2.3").unwrap(), 0);
        assert_eq!(compare("v1.2.3", "1.2.3").unwrap(), 0);
    }

    #[test]
    fn test_compare_rejects_invalid() {
        assert!(compare("bogus", "1.2.3").is_err());
        assert!(compare("1.2.3", "bogus").is_err());
    }
}
