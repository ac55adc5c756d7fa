//! Script text and the helpers built on it
//!
//! - `estimate` - reading time from speed, progress from position
//! - `analysis` - large-script performance warnings

pub mod analysis;
pub mod estimate;

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::playback::Speed;
use crate::{Error, Result};

pub use analysis::{analyze_text, TextAnalysis};
pub use estimate::{calculate_progress, estimate_duration, format_time, wpm_for_speed, DurationEstimate};

/// Text shown in the prompter when no script is loaded
pub const PLACEHOLDER: &str = "Paste your script in the editor to get started...";

/// A teleprompter script
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    text: String,
    /// File the script was imported from
    source: Option<PathBuf>,
}

impl Script {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: None,
        }
    }

    /// Import a script from a text file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            Error::Script(format!("failed to read {}: {}", path.display(), e))
        })?;

        let analysis = analyze_text(&text);
        if analysis.is_very_large() {
            warn!(
                chars = analysis.char_count,
                path = %path.display(),
                "Importing a very large script; scrolling performance may suffer"
            );
        }
        info!(words = analysis.word_count, path = %path.display(), "Script loaded");

        Ok(Self {
            text,
            source: Some(path.to_path_buf()),
        })
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Mutable access for in-place editing
    pub fn text_mut(&mut self) -> &mut String {
        &mut self.text
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// True when the script has no visible text
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Text to display: the script, or the placeholder when blank
    pub fn display_text(&self) -> &str {
        if self.is_blank() {
            PLACEHOLDER
        } else {
            &self.text
        }
    }

    pub fn word_count(&self) -> usize {
        estimate::count_words(&self.text)
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn analysis(&self) -> TextAnalysis {
        analyze_text(&self.text)
    }

    pub fn estimate(&self, speed: Speed) -> DurationEstimate {
        estimate_duration(&self.text, speed)
    }

    /// File name used when exporting on `date`
    pub fn export_file_name(date: NaiveDate) -> String {
        format!("teleprompter-script-{}.txt", date.format("%Y-%m-%d"))
    }

    /// Write the script to a date-stamped file in `dir`
    pub async fn export(&self, dir: &Path, date: NaiveDate) -> Result<PathBuf> {
        if self.is_blank() {
            return Err(Error::Script("no script to export".to_string()));
        }

        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(Self::export_file_name(date));
        tokio::fs::write(&path, &self.text).await?;
        info!(path = %path.display(), "Script exported");

        Ok(path)
    }
}
