//! Conversation transcript kept by interactive mode.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use aiyou_client::Role;
use anyhow::{Context as _, Result};
use chrono::{DateTime, Local};

/// One line of the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub role: Role,
    pub content: String,
    pub time: DateTime<Local>,
}

/// Ordered record of everything said during an interactive session.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry stamped with the current local time.
    pub fn push(&mut self, role: Role, content: impl Into<String>) {
        self.push_at(role, content, Local::now());
    }

    pub fn push_at(&mut self, role: Role, content: impl Into<String>, time: DateTime<Local>) {
        self.entries.push(TranscriptEntry {
            role,
            content: content.into(),
            time,
        });
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as `[HH:MM:SS] role: content` lines.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in self.entries() {
            let _ = writeln!(
                out,
                "[{}] {}: {}",
                entry.time.format("%H:%M:%S"),
                entry.role,
                entry.content
            );
        }
        out
    }

    /// Write the transcript into `dir` under a timestamped name and return the path.
    pub fn save_in(&self, dir: &Path) -> Result<PathBuf> {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        let path = dir.join(file_name(Local::now()));
        std::fs::write(&path, self.render())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), entries = self.len(), "Saved conversation");
        Ok(path)
    }
}

/// `conversation_YYYYMMDD_HHMMSS.txt`
pub fn file_name(time: DateTime<Local>) -> String {
    format!("conversation_{}.txt", time.format("%Y%m%d_%H%M%S"))
}
