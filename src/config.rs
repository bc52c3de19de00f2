use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::bump::{BumpKind, BumpRules};
use crate::error::{Result, SembumpError};

/// Default config file name looked up in the working directory.
pub const CONFIG_FILE: &str = ".sembump.toml";

/// Output format for calculated versions.
///
/// Validated at configuration load time: any literal other than `semver`
/// or `v-prefix` fails deserialization before any calculation happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
pub enum Format {
    #[default]
    #[serde(rename = "semver")]
    Semver,
    #[serde(rename = "v-prefix")]
    VPrefix,
}

/// Complete configuration for a sembump run.
///
/// Loaded once from TOML and read-only afterwards.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub version: VersionConfig,

    #[serde(default = "default_bump_rules")]
    pub bump_rules: BumpRules,

    #[serde(default)]
    pub detection: DetectionConfig,

    #[serde(default)]
    pub git: GitConfig,

    #[serde(default)]
    pub changelog: ChangelogConfig,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_files: Vec<VersionConfig>,
}

/// A versioned file and the dotted key holding its version string.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct VersionConfig {
    pub file: String,
    pub key: String,

    #[serde(default = "default_initial_version")]
    pub initial: String,

    #[serde(default)]
    pub format: Format,
}

impl Default for VersionConfig {
    fn default() -> Self {
        VersionConfig {
            file: "composer.json".to_string(),
            key: "version".to_string(),
            initial: default_initial_version(),
            format: Format::Semver,
        }
    }
}

/// How the current version is discovered before bumping.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DetectionConfig {
    #[serde(default = "default_strategies")]
    pub strategies: Vec<String>,

    #[serde(default = "default_tag_pattern")]
    pub tag_pattern: String,

    #[serde(default = "default_true")]
    pub exclude_merges: bool,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        DetectionConfig {
            strategies: default_strategies(),
            tag_pattern: default_tag_pattern(),
            exclude_merges: true,
        }
    }
}

/// Optional git side effects after the version files are updated.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GitConfig {
    #[serde(default)]
    pub auto_commit: bool,

    #[serde(default = "default_commit_message")]
    pub commit_message: String,

    #[serde(default)]
    pub auto_tag: bool,

    #[serde(default = "default_tag_format")]
    pub tag_format: String,

    #[serde(default = "default_tag_message")]
    pub tag_message: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        GitConfig {
            auto_commit: false,
            commit_message: default_commit_message(),
            auto_tag: false,
            tag_format: default_tag_format(),
            tag_message: default_tag_message(),
        }
    }
}

/// Changelog generation toggle and target file.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ChangelogConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_changelog_file")]
    pub file: String,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        ChangelogConfig {
            enabled: false,
            file: default_changelog_file(),
        }
    }
}

fn default_initial_version() -> String {
    "0.1.0".to_string()
}

fn default_strategies() -> Vec<String> {
    vec!["git-tags".to_string(), "version-file".to_string()]
}

fn default_tag_pattern() -> String {
    r"^v?([0-9]+\.[0-9]+\.[0-9]+)$".to_string()
}

fn default_true() -> bool {
    true
}

fn default_commit_message() -> String {
    "Conf: bump version to {version}".to_string()
}

fn default_tag_format() -> String {
    "v{version}".to_string()
}

fn default_tag_message() -> String {
    "Release {version}".to_string()
}

fn default_changelog_file() -> String {
    "CHANGELOG.md".to_string()
}

fn default_bump_rules() -> BumpRules {
    let mut rules = BumpRules::new();
    rules.insert("Fix".to_string(), BumpKind::Patch);
    rules.insert("Feature".to_string(), BumpKind::Minor);
    rules.insert("Refactor".to_string(), BumpKind::Patch);
    rules.insert("Style".to_string(), BumpKind::None);
    rules.insert("Docs".to_string(), BumpKind::None);
    rules.insert("Build".to_string(), BumpKind::Patch);
    rules.insert("Tests".to_string(), BumpKind::None);
    rules.insert("Breaking".to_string(), BumpKind::Major);
    rules.insert("!".to_string(), BumpKind::Major);
    rules
}

impl Default for Config {
    fn default() -> Self {
        Config {
            version: VersionConfig::default(),
            bump_rules: default_bump_rules(),
            detection: DetectionConfig::default(),
            git: GitConfig::default(),
            changelog: ChangelogConfig::default(),
            additional_files: Vec::new(),
        }
    }
}

impl Config {
    /// Loads configuration from file or returns defaults.
    ///
    /// Lookup order: explicit path, `.sembump.toml` in the current
    /// directory, `.sembump.toml` in the user config directory, defaults.
    pub fn load(config_path: Option<&str>) -> Result<Config> {
        let path = match config_path {
            Some(path) => PathBuf::from(path),
            None => {
                if Path::new(CONFIG_FILE).exists() {
                    PathBuf::from(CONFIG_FILE)
                } else if let Some(candidate) =
                    dirs::config_dir().map(|dir| dir.join(CONFIG_FILE))
                {
                    if candidate.exists() {
                        candidate
                    } else {
                        return Ok(Config::default());
                    }
                } else {
                    return Ok(Config::default());
                }
            }
        };

        let contents = fs::read_to_string(&path)?;
        let mut config: Config = toml::from_str(&contents).map_err(|e| {
            SembumpError::config(format!("failed to parse {}: {}", path.display(), e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Checks required fields and fills defaulted ones.
    pub fn validate(&mut self) -> Result<()> {
        if self.version.file.is_empty() {
            return Err(SembumpError::config("version.file is required"));
        }

        if self.version.key.is_empty() {
            return Err(SembumpError::config("version.key is required"));
        }

        if self.version.initial.is_empty() {
            self.version.initial = default_initial_version();
        }

        if self.bump_rules.is_empty() {
            return Err(SembumpError::config("bump_rules cannot be empty"));
        }

        if self.detection.strategies.is_empty() {
            self.detection.strategies = default_strategies();
        }

        if self.detection.tag_pattern.is_empty() {
            self.detection.tag_pattern = default_tag_pattern();
        }

        Ok(())
    }

    /// Writes this configuration as TOML, used by `sembump init`.
    pub fn save(&self, path: &str) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| SembumpError::config(format!("failed to encode config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Looks up the bump kind for a commit type; unmapped types are `None`.
    pub fn bump_for(&self, commit_type: &str) -> BumpKind {
        self.bump_rules
            .get(commit_type)
            .copied()
            .unwrap_or(BumpKind::None)
    }

    /// The primary version file followed by any additional ones.
    pub fn version_files(&self) -> Vec<&VersionConfig> {
        let mut files = vec![&self.version];
        files.extend(self.additional_files.iter());
        files
    }

    /// Resolves the primary version file relative to the config file location.
    pub fn resolve_version_file_path(&self, config_path: Option<&str>) -> PathBuf {
        let file = Path::new(&self.version.file);
        if file.is_absolute() {
            return file.to_path_buf();
        }

        match config_path {
            Some(config_path) => {
                let config_dir = Path::new(config_path)
                    .parent()
                    .unwrap_or_else(|| Path::new("."));
                config_dir.join(file)
            }
            None => file.to_path_buf(),
        }
    }
}
