use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value as JsonValue;
use serde_yaml::Value as YamlValue;

use crate::error::{Result, SembumpError};

/// Reads and writes a version string at a dotted key path inside a JSON or
/// YAML document. The format is chosen from the file extension.
pub enum FileUpdater {
    Json(PathBuf),
    Yaml(PathBuf),
}

impl FileUpdater {
    /// Creates an updater for `path`, dispatching on its extension.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "json" => Ok(FileUpdater::Json(path.to_path_buf())),
            "yaml" | "yml" => Ok(FileUpdater::Yaml(path.to_path_buf())),
            other => Err(SembumpError::update(format!(
                "unsupported file extension: '{}'",
                other
            ))),
        }
    }

    /// Reads the version string at `key_path` (dotted, e.g. `app.version`).
    pub fn get(&self, key_path: &str) -> Result<String> {
        let keys: Vec<&str> = key_path.split('.').collect();

        let value = match self {
            FileUpdater::Json(path) => {
                let document = read_json(path)?;
                json_get(&document, &keys).and_then(|v| v.as_str().map(str::to_string))
            }
            FileUpdater::Yaml(path) => {
                let document = read_yaml(path)?;
                yaml_get(&document, &keys).and_then(|v| v.as_str().map(str::to_string))
            }
        };

        value.ok_or_else(|| {
            SembumpError::update(format!(
                "version key '{}' not found or not a string",
                key_path
            ))
        })
    }

    /// Writes `version` at `key_path`, creating intermediate maps as needed.
    pub fn set(&self, key_path: &str, version: &str) -> Result<()> {
        let keys: Vec<&str> = key_path.split('.').collect();
        if keys.is_empty() {
            return Err(SembumpError::update("empty key path"));
        }

        match self {
            FileUpdater::Json(path) => {
                let mut document = read_json(path)?;
                json_set(&mut document, &keys, version)?;
                let mut contents = serde_json::to_string_pretty(&document)
                    .map_err(|e| SembumpError::update(format!("failed to encode JSON: {}", e)))?;
                contents.push('\n');
                fs::write(path, contents)?;
            }
            FileUpdater::Yaml(path) => {
                let mut document = read_yaml(path)?;
                yaml_set(&mut document, &keys, version)?;
                let contents = serde_yaml::to_string(&document)
                    .map_err(|e| SembumpError::update(format!("failed to encode YAML: {}", e)))?;
                fs::write(path, contents)?;
            }
        }

        Ok(())
    }
}

fn read_json(path: &Path) -> Result<JsonValue> {
    let contents = fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| SembumpError::update(format!("failed to parse {}: {}", path.display(), e)))
}

fn read_yaml(path: &Path) -> Result<YamlValue> {
    let contents = fs::read_to_string(path)?;
    serde_yaml::from_str(&contents)
        .map_err(|e| SembumpError::update(format!("failed to parse {}: {}", path.display(), e)))
}

fn json_get<'a>(document: &'a JsonValue, keys: &[&str]) -> Option<&'a JsonValue> {
    let mut current = document;
    for key in keys {
        current = current.get(key)?;
    }
    Some(current)
}

fn json_set(document: &mut JsonValue, keys: &[&str], version: &str) -> Result<()> {
    let mut current = document;
    for key in &keys[..keys.len() - 1] {
        let map = current
            .as_object_mut()
            .ok_or_else(|| SembumpError::update(format!("key '{}' is not a map", key)))?;
        current = map
            .entry(key.to_string())
            .or_insert_with(|| JsonValue::Object(serde_json::Map::new()));
    }

    let last = keys[keys.len() - 1];
    let map = current
        .as_object_mut()
        .ok_or_else(|| SembumpError::update(format!("key '{}' is not a map", last)))?;
    map.insert(last.to_string(), JsonValue::String(version.to_string()));
    Ok(())
}

fn yaml_get<'a>(document: &'a YamlValue, keys: &[&str]) -> Option<&'a YamlValue> {
    let mut current = document;
    for key in keys {
        current = current.get(*key)?;
    }
    Some(current)
}

fn yaml_set(document: &mut YamlValue, keys: &[&str], version: &str) -> Result<()> {
    let mut current = document;
    for key in &keys[..keys.len() - 1] {
        let map = current
            .as_mapping_mut()
            .ok_or_else(|| SembumpError::update(format!("key '{}' is not a map", key)))?;
        current = map
            .entry(YamlValue::String(key.to_string()))
            .or_insert_with(|| YamlValue::Mapping(serde_yaml::Mapping::new()));
    }

    let last = keys[keys.len() - 1];
    let map = current
        .as_mapping_mut()
        .ok_or_else(|| SembumpError::update(format!("key '{}' is not a map", last)))?;
    map.insert(
        YamlValue::String(last.to_string()),
        YamlValue::String(version.to_string()),
    );
    Ok(())
}
