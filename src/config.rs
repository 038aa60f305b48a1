//! Configuration for termsurf.
//!
//! This module provides:
//! - TOML configuration file loading from `~/.termsurf/config.toml`
//! - The fixed display-surface profile (font, theme, scrollback, cursor)
//! - Built-in color themes (ubuntu, dracula, nord)
//! - The extension-to-command registry table
//!
//! # Configuration File
//!
//! ```toml
//! # Prompt identity (defaults: $USER / $HOSTNAME)
//! username = "user"
//! hostname = "localhost"
//!
//! # Initial working directory for new sessions
//! home = "/home/user"
//!
//! # Line-editor history capacity
//! history_size = 1000
//!
//! [surface]
//! font_family = "Ubuntu Mono, monospace"
//! font_size = 14
//! scrollback = 10000
//! cursor_style = "block"
//! theme = "ubuntu"
//!
//! [extensions]
//! txt = "edit"
//! py = "python"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Prompt username override
    pub username: Option<String>,
    /// Prompt hostname override
    pub hostname: Option<String>,
    /// Initial working directory for new sessions
    pub home: String,
    /// Line-editor history capacity
    pub history_size: usize,
    /// Display surface profile
    pub surface: SurfaceProfile,
    /// Extension-to-command registry ("open with" templates)
    pub extensions: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            username: None,
            hostname: None,
            home: "/home/user".to_string(),
            history_size: crate::history::DEFAULT_HISTORY_CAPACITY,
            surface: SurfaceProfile::default(),
            extensions: default_extensions(),
        }
    }
}

fn default_extensions() -> BTreeMap<String, String> {
    [
        ("txt", "edit"),
        ("md", "edit"),
        ("log", "edit"),
        ("py", "python"),
        ("js", "node"),
        ("sh", "sh"),
    ]
    .into_iter()
    .map(|(ext, cmd)| (ext.to_string(), cmd.to_string()))
    .collect()
}

/// Cursor rendering style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CursorStyle {
    Block,
    Underline,
    Bar,
}

/// Fixed display-widget configuration, applied once at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceProfile {
    pub font_family: String,
    pub font_size: u16,
    pub line_height: f32,
    /// Scrollback depth in lines
    pub scrollback: u32,
    pub cursor_style: CursorStyle,
    pub cursor_blink: bool,
    /// Theme name: ubuntu, dracula, nord
    pub theme: String,
}

impl Default for SurfaceProfile {
    fn default() -> Self {
        Self {
            font_family: "Ubuntu Mono, monospace".to_string(),
            font_size: 14,
            line_height: 1.2,
            scrollback: 10_000,
            cursor_style: CursorStyle::Block,
            cursor_blink: true,
            theme: "ubuntu".to_string(),
        }
    }
}

impl SurfaceProfile {
    /// Resolve the named theme.
    pub fn theme(&self) -> Theme {
        Theme::by_name(&self.theme)
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults.
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            if path.exists() {
                if let Ok(content) = fs::read_to_string(&path) {
                    match toml::from_str(&content) {
                        Ok(config) => return config,
                        Err(e) => tracing::warn!("invalid config file: {e}"),
                    }
                }
            }
        }
        Self::default()
    }

    /// Save configuration to file.
    #[allow(dead_code)]
    pub fn save(&self) -> Result<(), String> {
        if let Some(path) = Self::config_path() {
            let content = toml::to_string_pretty(self)
                .map_err(|e| format!("Failed to serialize config: {}", e))?;
            fs::write(&path, content).map_err(|e| format!("Failed to write config: {}", e))?;
            Ok(())
        } else {
            Err("Could not determine config path".to_string())
        }
    }

    /// Get config file path
    fn config_path() -> Option<PathBuf> {
        if let Some(home) = home_dir() {
            let dir = home.join(".termsurf");
            if !dir.exists() {
                let _ = fs::create_dir_all(&dir);
            }
            return Some(dir.join("config.toml"));
        }
        None
    }

    /// Prompt username: config override, then `$USER`, then "user".
    pub fn username(&self) -> String {
        self.username
            .clone()
            .or_else(|| std::env::var("USER").ok().filter(|u| !u.is_empty()))
            .unwrap_or_else(|| "user".to_string())
    }

    /// Prompt hostname: config override, then `$HOSTNAME`, then "localhost".
    pub fn hostname(&self) -> String {
        self.hostname
            .clone()
            .or_else(|| std::env::var("HOSTNAME").ok().filter(|h| !h.is_empty()))
            .unwrap_or_else(|| "localhost".to_string())
    }
}

/// Color definition (RGB)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert to crossterm Color
    pub fn to_crossterm(&self) -> crossterm::style::Color {
        crossterm::style::Color::Rgb {
            r: self.r,
            g: self.g,
            b: self.b,
        }
    }
}

/// Terminal color theme (16-color palette plus background and cursor).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,

    pub background: Color,
    pub cursor: Color,
    pub cursor_accent: Color,

    pub black: Color,
    pub red: Color,
    pub green: Color,
    pub yellow: Color,
    pub blue: Color,
    pub magenta: Color,
    pub cyan: Color,
    pub white: Color,

    pub bright_black: Color,
    pub bright_red: Color,
    pub bright_green: Color,
    pub bright_yellow: Color,
    pub bright_blue: Color,
    pub bright_magenta: Color,
    pub bright_cyan: Color,
    pub bright_white: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::ubuntu()
    }
}

impl Theme {
    /// Ubuntu-flavored theme (the classic terminal look).
    pub fn ubuntu() -> Self {
        Self {
            name: "ubuntu".to_string(),

            background: Color::new(0, 0, 0),
            cursor: Color::new(255, 255, 255),
            cursor_accent: Color::new(44, 0, 30),

            black: Color::new(0, 0, 0),
            red: Color::new(255, 85, 85),
            green: Color::new(79, 240, 79),
            yellow: Color::new(255, 184, 108),
            blue: Color::new(66, 165, 245),
            magenta: Color::new(255, 121, 198),
            cyan: Color::new(139, 233, 253),
            white: Color::new(248, 248, 242),

            bright_black: Color::new(98, 114, 164),
            bright_red: Color::new(255, 110, 110),
            bright_green: Color::new(105, 255, 148),
            bright_yellow: Color::new(255, 255, 165),
            bright_blue: Color::new(214, 172, 255),
            bright_magenta: Color::new(255, 146, 223),
            bright_cyan: Color::new(164, 255, 255),
            bright_white: Color::new(255, 255, 255),
        }
    }

    /// Dracula theme
    pub fn dracula() -> Self {
        Self {
            name: "dracula".to_string(),

            background: Color::new(40, 42, 54),
            cursor: Color::new(248, 248, 242),
            cursor_accent: Color::new(40, 42, 54),

            black: Color::new(33, 34, 44),
            red: Color::new(255, 85, 85),
            green: Color::new(80, 250, 123),
            yellow: Color::new(241, 250, 140),
            blue: Color::new(189, 147, 249),
            magenta: Color::new(255, 121, 198),
            cyan: Color::new(139, 233, 253),
            white: Color::new(248, 248, 242),

            bright_black: Color::new(98, 114, 164),
            bright_red: Color::new(255, 110, 110),
            bright_green: Color::new(105, 255, 148),
            bright_yellow: Color::new(255, 255, 165),
            bright_blue: Color::new(214, 172, 255),
            bright_magenta: Color::new(255, 146, 223),
            bright_cyan: Color::new(164, 255, 255),
            bright_white: Color::new(255, 255, 255),
        }
    }

    /// Nord theme
    pub fn nord() -> Self {
        Self {
            name: "nord".to_string(),

            background: Color::new(46, 52, 64),
            cursor: Color::new(216, 222, 233),
            cursor_accent: Color::new(46, 52, 64),

            black: Color::new(59, 66, 82),
            red: Color::new(191, 97, 106),
            green: Color::new(163, 190, 140),
            yellow: Color::new(235, 203, 139),
            blue: Color::new(129, 161, 193),
            magenta: Color::new(180, 142, 173),
            cyan: Color::new(136, 192, 208),
            white: Color::new(229, 233, 240),

            bright_black: Color::new(76, 86, 106),
            bright_red: Color::new(191, 97, 106),
            bright_green: Color::new(163, 190, 140),
            bright_yellow: Color::new(235, 203, 139),
            bright_blue: Color::new(129, 161, 193),
            bright_magenta: Color::new(180, 142, 173),
            bright_cyan: Color::new(143, 188, 187),
            bright_white: Color::new(236, 239, 244),
        }
    }

    /// Get theme by name
    pub fn by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "dracula" => Self::dracula(),
            "nord" => Self::nord(),
            _ => Self::ubuntu(),
        }
    }

    /// List available themes
    pub fn list() -> Vec<&'static str> {
        vec!["ubuntu", "dracula", "nord"]
    }
}

// Get home directory
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
