use crate::error::{Result, TimingTableError};
use crate::extractor::table_extractor::{ExtractionStats, MissingTokenPolicy};
use crate::extractor::table_writer::{RowLayout, ThreadRange};
use crate::scanner::PatternMode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub input: String,
    pub output: String,
    pub thread_range: ThreadRange,
    pub settings: SettingsSnapshot,
    pub stats: ExtractionStats,
    pub extraction_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsSnapshot {
    pub layout: RowLayout,
    pub pattern: PatternMode,
    pub on_missing: MissingTokenPolicy,
    pub header: bool,
}

impl ExtractionReport {
    pub fn new(
        input: &Path,
        output: &Path,
        thread_range: ThreadRange,
        settings: SettingsSnapshot,
        stats: ExtractionStats,
    ) -> Self {
        Self {
            input: input.display().to_string(),
            output: output.display().to_string(),
            thread_range,
            settings,
            stats,
            extraction_time: Utc::now(),
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json_content =
            serde_json::to_string_pretty(self).map_err(|e| TimingTableError::Config {
                message: format!("Failed to serialize report to JSON: {}", e),
            })?;

        fs::write(path, json_content).map_err(|e| TimingTableError::OutputWrite {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }

    pub fn has_skipped_lines(&self) -> bool {
        !self.stats.skipped_lines.is_empty()
    }
}
