use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_wiki_dir")]
    pub wiki_dir: String,
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub theme: ThemeConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Hard-wrap width; the pane width when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrap_width: Option<u16>,
    #[serde(default = "default_tab_width")]
    pub tab_width: u16,
    #[serde(default = "default_check_interval_ms")]
    pub check_interval_ms: u64,
    #[serde(default = "default_nav_width")]
    pub nav_width: u16,
}

fn default_wiki_dir() -> String { "~/wiki".to_string() }
fn default_tab_width() -> u16 { 4 }
fn default_check_interval_ms() -> u64 { 1000 }
fn default_nav_width() -> u16 { 18 }

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            wrap_width: None,
            tab_width: default_tab_width(),
            check_interval_ms: default_check_interval_ms(),
            nav_width: default_nav_width(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wiki_dir: default_wiki_dir(),
            editor: EditorConfig::default(),
            theme: ThemeConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Read `path`, falling back to defaults when it is missing or invalid.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(content) => match Self::parse(&content) {
                Ok(config) => return config,
                Err(e) => warn!("Failed to parse config: {}", e),
            },
            Err(e) => warn!("Failed to read config: {}", e),
        }
        Self::default()
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load_or_create() -> Self {
        let config_dir = Self::config_dir();
        let config_path = Self::config_path();

        if !config_dir.exists() { let _ = fs::create_dir_all(&config_dir); }

        if !config_path.exists() {
            let default_config = Self::default();
            if let Ok(toml_string) = toml::to_string_pretty(&default_config) {
                let _ = fs::write(&config_path, toml_string);
            }
        }
        Self::load()
    }

    pub fn config_path() -> PathBuf { Self::config_dir().join("config.toml") }
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("linkpad")
    }

    pub fn wiki_path(&self) -> PathBuf {
        let path = shellexpand::tilde(&self.wiki_dir).to_string();
        PathBuf::from(path)
    }
}

/// Hex colours for the editor and its chrome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeConfig {
    #[serde(default = "defaults::foreground")]
    pub foreground: String,
    #[serde(default = "defaults::background")]
    pub background: String,
    #[serde(default = "defaults::cursor")]
    pub cursor: String,
    #[serde(default = "defaults::cursor_text")]
    pub cursor_text: String,
    #[serde(default = "defaults::link")]
    pub link: String,
    #[serde(default = "defaults::link_hover")]
    pub link_hover: String,
    #[serde(default = "defaults::link_pressed")]
    pub link_pressed: String,
    #[serde(default = "defaults::link_pressed_text")]
    pub link_pressed_text: String,
    #[serde(default = "defaults::border")]
    pub border: String,
    #[serde(default = "defaults::border_focused")]
    pub border_focused: String,
    #[serde(default = "defaults::current")]
    pub current: String,
    #[serde(default = "defaults::unsaved")]
    pub unsaved: String,
    #[serde(default = "defaults::error")]
    pub error: String,
}

mod defaults {
    pub fn foreground() -> String { "#ffffff".to_string() }
    pub fn background() -> String { "#000000".to_string() }
    pub fn cursor() -> String { "#ffff00".to_string() }
    pub fn cursor_text() -> String { "#000000".to_string() }
    pub fn link() -> String { "#7dcfff".to_string() }
    pub fn link_hover() -> String { "#666666".to_string() }
    pub fn link_pressed() -> String { "#ffffff".to_string() }
    pub fn link_pressed_text() -> String { "#000000".to_string() }
    pub fn border() -> String { "#3b4261".to_string() }
    pub fn border_focused() -> String { "#7aa2f7".to_string() }
    pub fn current() -> String { "#ffff00".to_string() }
    pub fn unsaved() -> String { "#e0af68".to_string() }
    pub fn error() -> String { "#f7768e".to_string() }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            foreground: defaults::foreground(),
            background: defaults::background(),
            cursor: defaults::cursor(),
            cursor_text: defaults::cursor_text(),
            link: defaults::link(),
            link_hover: defaults::link_hover(),
            link_pressed: defaults::link_pressed(),
            link_pressed_text: defaults::link_pressed_text(),
            border: defaults::border(),
            border_focused: defaults::border_focused(),
            current: defaults::current(),
            unsaved: defaults::unsaved(),
            error: defaults::error(),
        }
    }
}
