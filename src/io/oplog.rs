use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;

/// Size above which the oldest half of the entries is dropped (1 MB).
const MAX_LOG_SIZE: u64 = 1_048_576;

/// Header written at the top of a new log.
const FILE_HEADER: &str = "\
<!-- tally operator log, append-only
     Failed saves and config problems end up here, together with
     the data that could not be written.
     View with: tl log
     Clear with: tl log --clear -->

---
";

/// Category of a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogCategory {
    Store,
    Config,
    Watch,
}

impl fmt::Display for LogCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogCategory::Store => write!(f, "store"),
            LogCategory::Config => write!(f, "config"),
            LogCategory::Watch => write!(f, "watch"),
        }
    }
}

impl LogCategory {
    pub fn parse_category(s: &str) -> Option<Self> {
        match s {
            "store" => Some(LogCategory::Store),
            "config" => Some(LogCategory::Config),
            "watch" => Some(LogCategory::Watch),
            _ => None,
        }
    }
}

/// A single entry in the operator log
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub category: LogCategory,
    pub description: String,
    pub fields: Vec<(String, String)>,
    pub body: String,
}

impl LogEntry {
    pub fn new(category: LogCategory, description: impl Into<String>) -> Self {
        LogEntry {
            timestamp: Utc::now(),
            category,
            description: description.into(),
            fields: Vec::new(),
            body: String::new(),
        }
    }

    pub fn field(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.fields.push((key.to_string(), value.to_string()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "## {} {}: {}\n",
            self.timestamp
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            self.category,
            self.description,
        ));
        out.push('\n');

        for (key, value) in &self.fields {
            out.push_str(&format!("{}: {}\n", key, value));
        }

        if !self.body.is_empty() {
            out.push('\n');
            out.push_str("```text\n");
            out.push_str(&self.body);
            if !self.body.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("```\n");
        }

        out.push('\n');
        out.push_str("---\n");
        out
    }
}

/// Path of the operator log inside the workspace directory
pub fn log_path(dir: &Path) -> PathBuf {
    dir.join("log.md")
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Append an entry. Logging never fails the caller; problems go to stderr.
pub fn log_event(dir: &Path, entry: LogEntry) {
    if let Err(e) = log_event_inner(dir, &entry) {
        eprintln!("warning: could not write to operator log: {}", e);
    }
}

fn log_event_inner(dir: &Path, entry: &LogEntry) -> io::Result<()> {
    let path = log_path(dir);

    if let Ok(meta) = std::fs::metadata(&path)
        && meta.len() > MAX_LOG_SIZE
    {
        let content = std::fs::read_to_string(&path)?;
        atomic_write(&path, drop_oldest_half(&content).as_bytes())?;
    }

    let needs_header = std::fs::metadata(&path).map_or(true, |m| m.len() == 0);
    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    if needs_header {
        file.write_all(FILE_HEADER.as_bytes())?;
    }
    file.write_all(entry.to_markdown().as_bytes())?;
    Ok(())
}

/// Keep the header and the newer half of the entries
fn drop_oldest_half(content: &str) -> String {
    let (header, chunks) = split_entries(content);
    let skip = chunks.len() / 2 + chunks.len() % 2;
    let mut out = header;
    for chunk in chunks.into_iter().skip(skip) {
        out.push_str(&chunk);
    }
    out
}

/// Split raw log content into the header and one raw chunk per entry
fn split_entries(content: &str) -> (String, Vec<String>) {
    let mut header = String::new();
    let mut chunks: Vec<String> = Vec::new();
    let mut in_header = true;
    let mut in_code_block = false;

    for line in content.lines() {
        if in_header {
            header.push_str(line);
            header.push('\n');
            if line == "---" {
                in_header = false;
            }
            continue;
        }
        if in_code_block {
            if line == "```" {
                in_code_block = false;
            }
        } else if line.starts_with("```") {
            in_code_block = true;
        }
        // A `## ` line inside a body belongs to that entry
        if (line.starts_with("## ") && !in_code_block) || chunks.is_empty() {
            chunks.push(String::new());
        }
        if let Some(chunk) = chunks.last_mut() {
            chunk.push_str(line);
            chunk.push('\n');
        }
    }
    (header, chunks)
}

/// Read entries, most recent first
pub fn read_entries(dir: &Path, limit: Option<usize>) -> Vec<LogEntry> {
    let content = match std::fs::read_to_string(log_path(dir)) {
        Ok(c) => c,
        Err(_) => return Vec::new(),
    };
    let mut entries = parse_entries(&content);
    if let Some(n) = limit {
        let skip = entries.len().saturating_sub(n);
        entries = entries.into_iter().skip(skip).collect();
    }
    entries.reverse();
    entries
}

/// Truncate the log down to its header. Returns how many entries were removed.
pub fn clear_log(dir: &Path) -> io::Result<usize> {
    let path = log_path(dir);
    let content = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e),
    };
    let count = parse_entries(&content).len();
    atomic_write(&path, FILE_HEADER.as_bytes())?;
    Ok(count)
}

fn parse_entries(content: &str) -> Vec<LogEntry> {
    let (_, chunks) = split_entries(content);
    chunks.iter().filter_map(|c| parse_entry(c)).collect()
}

fn parse_entry(chunk: &str) -> Option<LogEntry> {
    let mut lines = chunk.lines();
    let (timestamp, category, description) = parse_entry_header(lines.next()?.strip_prefix("## ")?)?;

    let mut fields = Vec::new();
    let mut body = String::new();
    let mut in_code_block = false;
    for line in lines {
        if in_code_block {
            if line == "```" {
                in_code_block = false;
            } else {
                if !body.is_empty() {
                    body.push('\n');
                }
                body.push_str(line);
            }
            continue;
        }
        if line.starts_with("```") {
            in_code_block = true;
            continue;
        }
        if line == "---" || line.trim().is_empty() {
            continue;
        }
        if let Some((key, value)) = line.split_once(": ") {
            fields.push((key.to_string(), value.to_string()));
        }
    }

    Some(LogEntry {
        timestamp,
        category,
        description,
        fields,
        body,
    })
}

/// Parse `<timestamp> <category>: <description>`
fn parse_entry_header(header: &str) -> Option<(DateTime<Utc>, LogCategory, String)> {
    let (timestamp_str, rest) = header.split_once(' ')?;
    let timestamp = DateTime::parse_from_rfc3339(timestamp_str)
        .ok()?
        .with_timezone(&Utc);
    let (category_str, description) = rest.split_once(": ")?;
    let category = LogCategory::parse_category(category_str)?;
    Some((timestamp, category, description.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_entry_formatting() {
        let entry = LogEntry::new(LogCategory::Store, "save failed")
            .field("Path", "todos.json")
            .body("buy milk\ncall mom");
        let md = entry.to_markdown();
        assert!(md.contains("store: save failed"));
        assert!(md.contains("Path: todos.json"));
        assert!(md.contains("```text\nbuy milk\ncall mom\n```"));
        assert!(md.ends_with("---\n"));
    }

    #[test]
    fn test_log_and_read_back() {
        let tmp = TempDir::new().unwrap();
        log_event(tmp.path(), LogEntry::new(LogCategory::Config, "bad key").field("Key", "edit"));
        log_event(
            tmp.path(),
            LogEntry::new(LogCategory::Store, "save failed").body("a\nb"),
        );

        let content = std::fs::read_to_string(log_path(tmp.path())).unwrap();
        assert!(content.starts_with("<!-- tally operator log"));

        let entries = read_entries(tmp.path(), None);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].category, LogCategory::Store);
        assert_eq!(entries[0].body, "a\nb");
        assert_eq!(entries[1].description, "bad key");
        assert_eq!(entries[1].fields, vec![("Key".to_string(), "edit".to_string())]);

        let latest = read_entries(tmp.path(), Some(1));
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].category, LogCategory::Store);
    }

    #[test]
    fn test_clear_log() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(clear_log(tmp.path()).unwrap(), 0);
        log_event(tmp.path(), LogEntry::new(LogCategory::Watch, "watcher stopped"));
        assert_eq!(clear_log(tmp.path()).unwrap(), 1);
        assert!(read_entries(tmp.path(), None).is_empty());
    }

    #[test]
    fn test_drop_oldest_half() {
        let mut content = FILE_HEADER.to_string();
        for i in 0..4 {
            content.push_str(&LogEntry::new(LogCategory::Store, format!("entry {}", i)).to_markdown());
        }
        let trimmed = drop_oldest_half(&content);
        assert!(trimmed.starts_with(FILE_HEADER));
        let entries = parse_entries(&trimmed);
        let descs: Vec<&str> = entries.iter().map(|e| e.description.as_str()).collect();
        assert_eq!(descs, vec!["entry 2", "entry 3"]);
    }

    #[test]
    fn test_heading_inside_body_stays_in_entry() {
        let tmp = TempDir::new().unwrap();
        log_event(
            tmp.path(),
            LogEntry::new(LogCategory::Store, "save failed").body("## notes\nbuy milk"),
        );
        log_event(tmp.path(), LogEntry::new(LogCategory::Config, "bad key"));

        let entries = read_entries(tmp.path(), None);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].body, "## notes\nbuy milk");

        let content = std::fs::read_to_string(log_path(tmp.path())).unwrap();
        let (_, chunks) = split_entries(&content);
        assert_eq!(chunks.len(), 2);
        let trimmed = parse_entries(&drop_oldest_half(&content));
        assert_eq!(trimmed.len(), 1);
        assert_eq!(trimmed[0].description, "bad key");
    }

    #[test]
    fn test_malformed_header_is_skipped() {
        let content = format!("{}## not a timestamp store: x\n\n---\n", FILE_HEADER);
        assert!(parse_entries(&content).is_empty());
    }
}
