// Event Trace
// Append-only JSONL record of broadcast events for replay and debugging

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

use super::types::MusicEvent;

/// Errors that can occur during trace operations
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// One broadcast event as written to the trace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEntry {
    /// RFC 3339 wall-clock time the entry was recorded
    pub timestamp: String,

    /// Playback session the event belongs to (new on every start)
    pub session: Uuid,

    /// Bar the engine was on when the event was recorded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bar: Option<u64>,

    pub event: MusicEvent,
}

impl TraceEntry {
    /// Create a new trace entry with current timestamp
    pub fn new(session: Uuid, event: MusicEvent) -> Self {
        TraceEntry {
            timestamp: Utc::now().to_rfc3339(),
            session,
            bar: None,
            event,
        }
    }

    pub fn at_bar(mut self, bar: u64) -> Self {
        self.bar = Some(bar);
        self
    }

    /// Serialize to JSON line (with newline)
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_string(self)?;
        Ok(format!("{}\n", json))
    }
}

/// Event trace writer
/// Manages append-only JSONL trace file
pub struct TraceWriter {
    file_path: PathBuf,
}

impl TraceWriter {
    pub fn new(file_path: PathBuf) -> Self {
        TraceWriter { file_path }
    }

    /// Append one entry, creating the file if needed
    pub fn write(&self, entry: &TraceEntry) -> Result<(), TraceError> {
        self.write_batch(std::slice::from_ref(entry))
    }

    /// Append several entries with one open and flush
    pub fn write_batch(&self, entries: &[TraceEntry]) -> Result<(), TraceError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)?;

        for entry in entries {
            let json_line = entry.to_json_line()?;
            file.write_all(json_line.as_bytes())?;
        }

        file.flush()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

/// Read trace entries from a JSONL file
pub fn read_trace_file(path: &Path) -> Result<Vec<TraceEntry>, TraceError> {
    let contents = std::fs::read_to_string(path)?;
    let mut entries = Vec::new();

    for line in contents.lines() {
        if line.trim().is_empty() {
            continue;
        }
        entries.push(serde_json::from_str(line)?);
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arranger::Section;
    use crate::harmony::PitchClass;
    use tempfile::TempDir;

    #[test]
    fn test_trace_writer_appends() {
        let temp_dir = TempDir::new().unwrap();
        let trace_path = temp_dir.path().join("trace.jsonl");
        let writer = TraceWriter::new(trace_path.clone());
        let session = Uuid::new_v4();

        writer.write(&TraceEntry::new(session, MusicEvent::Section { section: Section::Intro }).at_bar(0)).unwrap();
        writer.write(&TraceEntry::new(session, MusicEvent::Bar { bar: 0 }).at_bar(0)).unwrap();

        let entries = read_trace_file(&trace_path).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].session, session);
        assert_eq!(entries[0].bar, Some(0));
        assert_eq!(entries[0].event, MusicEvent::Section { section: Section::Intro });
    }

    #[test]
    fn test_trace_writer_batch() {
        let temp_dir = TempDir::new().unwrap();
        let trace_path = temp_dir.path().join("trace.jsonl");
        let writer = TraceWriter::new(trace_path.clone());
        let session = Uuid::new_v4();

        let entries = vec![
            TraceEntry::new(session, MusicEvent::Kick { time: 0.001 }),
            TraceEntry::new(session, MusicEvent::Acid { time: 0.12, note: PitchClass::G.at(2) }),
            TraceEntry::new(session, MusicEvent::TrackMute { track: "hat".to_string() }),
        ];
        writer.write_batch(&entries).unwrap();

        let read_entries = read_trace_file(&trace_path).unwrap();
        assert_eq!(read_entries.len(), 3);
        assert_eq!(read_entries[1].event, entries[1].event);
        assert!(read_entries[0].bar.is_none());
    }

    #[test]
    fn test_json_line_format() {
        let entry = TraceEntry::new(Uuid::new_v4(), MusicEvent::TempoChange { bpm: 132.0 });
        let json_line = entry.to_json_line().unwrap();

        assert!(json_line.ends_with('\n'));
        assert!(!json_line.contains("\"bar\""));
        assert!(chrono::DateTime::parse_from_rfc3339(&entry.timestamp).is_ok());
    }

    #[test]
    fn test_read_missing_file_errors() {
        let temp_dir = TempDir::new().unwrap();
        let result = read_trace_file(&temp_dir.path().join("missing.jsonl"));
        assert!(matches!(result, Err(TraceError::IoError(_))));
    }
}
