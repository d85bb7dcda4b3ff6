use std::fs::{File, OpenOptions};
use std::io::Write;

use chrono::Utc;
use serde_json::{json, Value};
use tracing::warn;

use crate::events::Event;
use crate::types::AcState;

/// What a commit line carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandLogMode {
    /// Whole state on every commit.
    Full,
    /// Changed attributes only; the first commit still logs the whole state.
    Diffed,
}

pub(crate) struct CommandJournal {
    mode: CommandLogMode,
    file: File,
    logged_full: bool,
}

impl CommandJournal {
    pub fn new(mode: CommandLogMode, path: &str) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            mode,
            file,
            logged_full: false,
        })
    }

    pub fn log_request(&mut self, url: &str, candidate: &AcState) {
        let entry = json!({
            "ts": Utc::now().to_rfc3339(),
            "dir": "req",
            "url": url,
            "candidate": candidate,
        });
        self.write_line(&entry);
    }

    pub fn log_commit(&mut self, state: &AcState, events: &[Event], message: Option<&str>) {
        let mut entry = json!({
            "ts": Utc::now().to_rfc3339(),
            "dir": "commit",
            "message": message,
        });
        match self.mode {
            CommandLogMode::Diffed if self.logged_full => {
                entry["changes"] = json!(events);
            }
            _ => {
                entry["state"] = json!(state);
                entry["full"] = json!(true);
                self.logged_full = true;
            }
        }
        self.write_line(&entry);
    }

    pub fn log_failure(&mut self, url: &str, error: &str) {
        let entry = json!({
            "ts": Utc::now().to_rfc3339(),
            "dir": "fail",
            "url": url,
            "error": error,
        });
        self.write_line(&entry);
    }

    fn write_line(&mut self, entry: &Value) {
        if let Ok(line) = serde_json::to_string(entry)
            && let Err(e) = writeln!(self.file, "{line}")
        {
            warn!("failed to write journal entry: {e}");
        }
    }
}
