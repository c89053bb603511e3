//! Best-time progress persisted between sessions. The store is tolerant on
//! load: a missing, corrupt or old-version file just starts empty.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::level::LevelError;
use crate::types::RunSummary;

const PROGRESS_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct ProgressFile {
    version: u32,
    entries: Vec<ProgressEntry>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgressEntry {
    #[serde(rename = "levelName")]
    pub level_name: String,
    #[serde(rename = "bestTimeMs")]
    pub best_time_ms: u64,
    pub flashlights: u32,
    #[serde(rename = "completedAt")]
    pub completed_at: String,
}

pub struct ProgressStore {
    path: PathBuf,
    entries: Vec<ProgressEntry>,
}

impl ProgressStore {
    pub fn load(path: &Path) -> Self {
        let entries = match fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str::<ProgressFile>(&text) {
                Ok(file) if file.version == PROGRESS_VERSION => file.entries,
                Ok(file) => {
                    log::warn!(
                        "progress file {} has version {}, starting fresh",
                        path.display(),
                        file.version
                    );
                    Vec::new()
                }
                Err(e) => {
                    log::warn!(
                        "progress file {} is unreadable ({e}), starting fresh",
                        path.display()
                    );
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };
        Self {
            path: path.to_path_buf(),
            entries,
        }
    }

    pub fn best_for(&self, level_name: &str) -> Option<&ProgressEntry> {
        self.entries.iter().find(|e| e.level_name == level_name)
    }

    pub fn is_completed(&self, level_name: &str) -> bool {
        self.best_for(level_name).is_some()
    }

    /// How many levels of an ordered campaign are playable: every completed
    /// level unlocks the next one.
    pub fn unlocked_levels(&self, ordered_names: &[String]) -> usize {
        let done = ordered_names
            .iter()
            .take_while(|name| self.is_completed(name))
            .count();
        (done + 1).min(ordered_names.len().max(1))
    }

    /// Whether the level at `index` in an ordered campaign is playable.
    /// The first level always is; later ones need their predecessor done.
    pub fn is_unlocked(&self, index: usize, ordered_names: &[String]) -> bool {
        index < self.unlocked_levels(ordered_names)
    }

    /// Records a finished run. Returns true when it set a new best time.
    pub fn record_completed(&mut self, summary: &RunSummary) -> bool {
        if !summary.completed {
            return false;
        }
        let improved = match self.best_for(&summary.level_name) {
            Some(entry) => summary.time_ms < entry.best_time_ms,
            None => true,
        };
        if improved {
            let entry = ProgressEntry {
                level_name: summary.level_name.clone(),
                best_time_ms: summary.time_ms,
                flashlights: summary.flashlights_collected,
                completed_at: chrono::Utc::now().to_rfc3339(),
            };
            self.entries.retain(|e| e.level_name != summary.level_name);
            self.entries.push(entry);
        }
        improved
    }

    /// Drops all recorded progress.
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    pub fn save(&self) -> Result<(), LevelError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let file = ProgressFile {
            version: PROGRESS_VERSION,
            entries: self.entries.clone(),
        };
        fs::write(&self.path, serde_json::to_string_pretty(&file)?)?;
        Ok(())
    }
}
