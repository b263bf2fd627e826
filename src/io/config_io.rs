use std::fs;
use std::path::{Path, PathBuf};

use crate::io::oplog::{LogCategory, LogEntry, log_event};
use crate::model::config::{Config, KeyAction};

/// Config file name inside the workspace directory
pub const CONFIG_FILE: &str = "config.toml";

/// Written by `tl init`
pub const DEFAULT_CONFIG: &str = r##"# tally configuration

[keys]
# Single-letter shortcuts for the selected todo (matched case-insensitively)
complete = "C"
edit = "E"
delete = "D"
new = "N"
# Typing this first in the input line starts a filter
filter = "?"

[ui]
show_key_hints = true

# Theme overrides, as hex colors
# [ui.colors]
# priority = "#FF4444"
# context = "#44DDFF"
# project = "#FFD700"
# kvpair = "#B48EFF"
"##;

/// Error type for config file operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    EditError(#[from] toml_edit::TomlError),
    #[error("key must be a single character, got {0:?}")]
    InvalidKey(String),
}

/// Read the config, returning both the parsed config and the raw
/// toml_edit document for formatting-preserving edits.
/// A missing file reads as the defaults.
pub fn read_config(dir: &Path) -> Result<(Config, toml_edit::DocumentMut), ConfigError> {
    let path = dir.join(CONFIG_FILE);
    let text = match fs::read_to_string(&path) {
        Ok(t) => t,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(ConfigError::ReadError { path, source: e }),
    };
    let config: Config = toml::from_str(&text)?;
    let doc: toml_edit::DocumentMut = text.parse()?;
    Ok((config, doc))
}

/// The config, or the defaults if it can't be read. Problems go to the
/// operator log.
pub fn load_config_or_default(dir: &Path) -> Config {
    match read_config(dir) {
        Ok((config, _)) => {
            log_bad_keys(dir, &config);
            config
        }
        Err(e) => {
            log_event(
                dir,
                LogEntry::new(LogCategory::Config, "config unreadable, using defaults")
                    .field("Error", &e),
            );
            Config::default()
        }
    }
}

/// Log every key value that isn't a single character
fn log_bad_keys(dir: &Path, config: &Config) {
    for action in KeyAction::ALL {
        let raw = raw_key(config, action);
        if raw.chars().count() != 1 {
            log_event(
                dir,
                LogEntry::new(LogCategory::Config, "invalid key, using default")
                    .field("Key", action.name())
                    .field("Value", format!("{:?}", raw))
                    .field("Using", config.keys.key_for(action)),
            );
        }
    }
}

fn raw_key(config: &Config, action: KeyAction) -> &str {
    match action {
        KeyAction::Complete => &config.keys.complete,
        KeyAction::Edit => &config.keys.edit,
        KeyAction::Delete => &config.keys.delete,
        KeyAction::New => &config.keys.new,
        KeyAction::Filter => &config.keys.filter,
    }
}

/// Write the config document back to disk, preserving formatting.
pub fn write_config(dir: &Path, doc: &toml_edit::DocumentMut) -> Result<(), ConfigError> {
    let path = dir.join(CONFIG_FILE);
    fs::write(&path, doc.to_string()).map_err(|e| ConfigError::WriteError { path, source: e })
}

/// Set one shortcut in the `[keys]` table
pub fn set_key(doc: &mut toml_edit::DocumentMut, action: KeyAction, value: &str) -> Result<(), ConfigError> {
    if value.chars().count() != 1 {
        return Err(ConfigError::InvalidKey(value.to_string()));
    }
    if !doc.contains_key("keys") {
        doc["keys"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc["keys"][action.name()] = toml_edit::value(value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_parses() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.keys.complete(), 'C');
        assert_eq!(config.keys.filter(), '?');
        assert!(config.ui.show_key_hints);
    }

    #[test]
    fn test_round_trip_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), DEFAULT_CONFIG).unwrap();
        let (_config, doc) = read_config(tmp.path()).unwrap();
        write_config(tmp.path(), &doc).unwrap();
        let written = fs::read_to_string(tmp.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(written, DEFAULT_CONFIG);
    }

    #[test]
    fn test_missing_config_is_default() {
        let tmp = TempDir::new().unwrap();
        let (config, _) = read_config(tmp.path()).unwrap();
        assert_eq!(config.keys.edit(), 'E');
    }

    #[test]
    fn test_set_key_keeps_comments() {
        let mut doc: toml_edit::DocumentMut = DEFAULT_CONFIG.parse().unwrap();
        set_key(&mut doc, KeyAction::Complete, "X").unwrap();
        let result = doc.to_string();
        assert!(result.contains("complete = \"X\""));
        assert!(result.contains("# Typing this first"));
        let config: Config = toml::from_str(&result).unwrap();
        assert_eq!(config.keys.complete(), 'X');
    }

    #[test]
    fn test_set_key_creates_table() {
        let mut doc = toml_edit::DocumentMut::new();
        set_key(&mut doc, KeyAction::Filter, "/").unwrap();
        let config: Config = toml::from_str(&doc.to_string()).unwrap();
        assert_eq!(config.keys.filter(), '/');
    }

    #[test]
    fn test_set_key_rejects_multiple_chars() {
        let mut doc = toml_edit::DocumentMut::new();
        assert!(matches!(
            set_key(&mut doc, KeyAction::Edit, "ee"),
            Err(ConfigError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_bad_config_falls_back_and_logs() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "[keys\n").unwrap();
        let config = load_config_or_default(tmp.path());
        assert_eq!(config.keys.delete(), 'D');
        let entries = crate::io::oplog::read_entries(tmp.path(), None);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].category, LogCategory::Config);
    }

    #[test]
    fn test_invalid_key_is_logged() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "[keys]\nedit = \"EE\"\n").unwrap();
        let config = load_config_or_default(tmp.path());
        assert_eq!(config.keys.edit(), 'E');
        let entries = crate::io::oplog::read_entries(tmp.path(), None);
        assert_eq!(entries.len(), 1);
        assert!(entries[0].fields.contains(&("Key".to_string(), "edit".to_string())));
    }
}
