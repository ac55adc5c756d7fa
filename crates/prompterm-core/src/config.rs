use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::playback::Speed;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub prompter: PrompterConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub keymap: KeymapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Directory for log files written while the TUI owns the terminal
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

/// Initial presentation settings for a prompter session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrompterConfig {
    /// Speed level (1-10)
    #[serde(default = "default_speed")]
    pub speed: Speed,
    /// Horizontal margin as a percentage of the viewport width (0-40)
    #[serde(default = "default_margin")]
    pub margin: u16,
    /// Script text color, hex string ("#000000" or "000")
    #[serde(default = "default_text_color")]
    pub text_color: String,
    /// Prompter background color, hex string
    #[serde(default = "default_background_color")]
    pub background_color: String,
    /// Mirror the script horizontally (for beam-splitter glass)
    #[serde(default)]
    pub mirror: bool,
    /// Height of one terminal row in scroll pixels
    #[serde(default = "default_line_height_px")]
    pub line_height_px: f64,
}

impl Default for PrompterConfig {
    fn default() -> Self {
        Self {
            speed: default_speed(),
            margin: default_margin(),
            text_color: default_text_color(),
            background_color: default_background_color(),
            mirror: false,
            line_height_px: default_line_height_px(),
        }
    }
}

/// Chrome theme for the controls bar, editor and popups
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeName {
    Light,
    #[default]
    Dark,
    HighContrast,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Idle tick rate in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Frame rate while the prompter is scrolling
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
    /// Chrome theme
    #[serde(default)]
    pub theme: ThemeName,
    /// Start with the script editor hidden
    #[serde(default)]
    pub start_maximized: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            animation_fps: default_animation_fps(),
            theme: ThemeName::default(),
            start_maximized: false,
        }
    }
}

/// Keymap configuration using Vim-style notation
/// Format: "q", "<C-c>" (Ctrl+c), "<S-Tab>", "<Esc>", "<Space>"
///
/// Transport keys (Space, arrows, Home/End, PageUp/PageDown, f) are fixed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeymapConfig {
    /// Quit the application
    #[serde(default = "default_key_quit")]
    pub quit: String,
    /// Stop playback and rewind to the top
    #[serde(default = "default_key_stop")]
    pub stop: String,
    /// Toggle horizontal mirroring
    #[serde(default = "default_key_toggle_mirror")]
    pub toggle_mirror: String,
    /// Narrow the side margins
    #[serde(default = "default_key_margin_decrease")]
    pub margin_decrease: String,
    /// Widen the side margins
    #[serde(default = "default_key_margin_increase")]
    pub margin_increase: String,
    /// Enter the script editor
    #[serde(default = "default_key_edit_script")]
    pub edit_script: String,
    /// Hide or restore the script editor pane
    #[serde(default = "default_key_toggle_maximize")]
    pub toggle_maximize: String,
    /// Show the shortcuts popup
    #[serde(default = "default_key_show_shortcuts")]
    pub show_shortcuts: String,
    /// Switch to the next text color preset
    #[serde(default = "default_key_cycle_text_color")]
    pub cycle_text_color: String,
    /// Switch to the next background color preset
    #[serde(default = "default_key_cycle_background_color")]
    pub cycle_background_color: String,
    /// Smaller text (shorter lines)
    #[serde(default = "default_key_line_height_decrease")]
    pub line_height_decrease: String,
    /// Larger text (taller lines)
    #[serde(default = "default_key_line_height_increase")]
    pub line_height_increase: String,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            quit: default_key_quit(),
            stop: default_key_stop(),
            toggle_mirror: default_key_toggle_mirror(),
            margin_decrease: default_key_margin_decrease(),
            margin_increase: default_key_margin_increase(),
            edit_script: default_key_edit_script(),
            toggle_maximize: default_key_toggle_maximize(),
            show_shortcuts: default_key_show_shortcuts(),
            cycle_text_color: default_key_cycle_text_color(),
            cycle_background_color: default_key_cycle_background_color(),
            line_height_decrease: default_key_line_height_decrease(),
            line_height_increase: default_key_line_height_increase(),
        }
    }
}

fn default_key_quit() -> String { "q".to_string() }
fn default_key_stop() -> String { "s".to_string() }
fn default_key_toggle_mirror() -> String { "m".to_string() }
fn default_key_margin_decrease() -> String { "[".to_string() }
fn default_key_margin_increase() -> String { "]".to_string() }
fn default_key_edit_script() -> String { "e".to_string() }
fn default_key_toggle_maximize() -> String { "z".to_string() }
fn default_key_show_shortcuts() -> String { "?".to_string() }
fn default_key_cycle_text_color() -> String { "c".to_string() }
fn default_key_cycle_background_color() -> String { "b".to_string() }
fn default_key_line_height_decrease() -> String { "-".to_string() }
fn default_key_line_height_increase() -> String { "+".to_string() }

fn default_log_level() -> String {
    "info".to_string()
}

fn default_speed() -> Speed {
    Speed::default()
}

fn default_margin() -> u16 {
    20
}

fn default_text_color() -> String {
    "#000000".to_string()
}

fn default_background_color() -> String {
    "#ffffff".to_string()
}

fn default_line_height_px() -> f64 {
    36.0 // 24px font at 1.5 line height
}

fn default_tick_rate() -> u64 {
    100
}

fn default_animation_fps() -> u32 {
    60
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from the default path or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a specific file, falling back to defaults when absent
    pub fn load_from(path: &std::path::Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &std::path::Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/prompterm/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("prompterm")
            .join("config.toml")
    }

    /// Get the log directory (with tilde expansion)
    pub fn log_dir(&self) -> PathBuf {
        match &self.general.log_dir {
            Some(dir) => expand_tilde(dir),
            None => dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("prompterm")
                .join("logs"),
        }
    }

    fn validate(&self) -> crate::Result<()> {
        if !(self.prompter.line_height_px.is_finite() && self.prompter.line_height_px > 0.0) {
            return Err(crate::Error::Config(format!(
                "prompter.line_height_px must be positive, got {}",
                self.prompter.line_height_px
            )));
        }
        if self.prompter.margin > 40 {
            return Err(crate::Error::Config(format!(
                "prompter.margin must be between 0 and 40, got {}",
                self.prompter.margin
            )));
        }
        Ok(())
    }
}
