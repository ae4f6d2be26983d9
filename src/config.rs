use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const DEFAULT_DEBOUNCE_MS: i64 = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub theme: String,
    /// Default tracing filter, overridden by `NOTEFIND_LOG`
    pub log_level: String,
    pub find: FindConfig,
    pub editor: EditorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            log_level: "info".to_string(),
            find: FindConfig::default(),
            editor: EditorConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FindConfig {
    /// Delay between the last keystroke and the search. Zero or negative
    /// means searches only run on Enter.
    pub debounce_ms: i64,
    /// Run debounced searches on the find worker thread
    pub background: bool,
    pub case_sensitive: bool,
    pub whole_word: bool,
}

impl Default for FindConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            background: true,
            case_sensitive: false,
            whole_word: false,
        }
    }
}

impl FindConfig {
    /// `None` when the find bar waits for an explicit submit.
    pub fn debounce(&self) -> Option<Duration> {
        if self.debounce_ms > 0 {
            Some(Duration::from_millis(self.debounce_ms as u64))
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub line_numbers: bool,
    pub tab_width: u16,
    pub syntax_theme: String,
    /// How often the open note is checked for external changes
    pub reload_poll_ms: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            line_numbers: true,
            tab_width: 4,
            syntax_theme: "base16-ocean.dark".to_string(),
            reload_poll_ms: 1000,
        }
    }
}

impl Config {
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(shellexpand::tilde("~/.config").into_owned()))
            .join("notefind")
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load the default config file, writing one with defaults when it is
    /// missing. Runs before logging is up, so a fallback reason is handed
    /// back for the caller to log.
    pub fn load_or_create() -> (Self, Option<ConfigError>) {
        Self::load_or_create_at(&Self::config_path())
    }

    pub fn load_or_create_at(path: &Path) -> (Self, Option<ConfigError>) {
        if path.exists() {
            return match Self::load_from(path) {
                Ok(config) => (config, None),
                Err(e) => (Self::default(), Some(e)),
            };
        }

        let config = Self::default();
        let error = config.save_to(path).err();
        (config, error)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct SearchColors {
    pub input: Color,
    pub border: Color,
    pub background: Color,
    pub match_count: Color,
    pub option_on: Color,
    pub option_off: Color,
    pub highlight: Color,
    pub current_highlight: Color,
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub primary: Color,
    pub success: Color,
    pub error: Color,
    pub foreground: Color,
    pub muted: Color,
    pub border: Color,
    pub selection: Color,
    pub status_background: Color,
    pub search: SearchColors,
}

impl Theme {
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }

    fn dark() -> Self {
        Self {
            primary: Color::Cyan,
            success: Color::Green,
            error: Color::Red,
            foreground: Color::White,
            muted: Color::DarkGray,
            border: Color::Gray,
            selection: Color::Blue,
            status_background: Color::Rgb(30, 30, 40),
            search: SearchColors {
                input: Color::White,
                border: Color::Gray,
                background: Color::Rgb(25, 25, 35),
                match_count: Color::Yellow,
                option_on: Color::Cyan,
                option_off: Color::DarkGray,
                highlight: Color::Rgb(90, 80, 20),
                current_highlight: Color::Rgb(200, 120, 0),
            },
        }
    }

    fn light() -> Self {
        Self {
            primary: Color::Blue,
            success: Color::Green,
            error: Color::Red,
            foreground: Color::Black,
            muted: Color::Gray,
            border: Color::DarkGray,
            selection: Color::LightBlue,
            status_background: Color::Rgb(225, 225, 230),
            search: SearchColors {
                input: Color::Black,
                border: Color::DarkGray,
                background: Color::Rgb(245, 245, 245),
                match_count: Color::Magenta,
                option_on: Color::Blue,
                option_off: Color::Gray,
                highlight: Color::Rgb(255, 240, 150),
                current_highlight: Color::Rgb(255, 170, 60),
            },
        }
    }
}
