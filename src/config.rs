use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::render::{ColorMode, RenderMode};

/// User configuration loaded from config file.
/// All fields are optional: CLI flags override config, config overrides defaults.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Pattern opened when none is given on the command line
    pub pattern: Option<String>,
    pub render: Option<RenderModeConfig>,
    pub color: Option<ColorModeConfig>,
    /// Playback speed multiplier (0.5-2.0)
    pub speed: Option<f64>,
    /// Hide status bar
    pub clean: Option<bool>,
    /// Start playing as soon as a pattern opens
    pub autoplay: Option<bool>,
    /// Color quantization step (0 = off, 4/8/16 = coarser colors for less output)
    pub color_quant: Option<u8>,
    /// Problem catalog used by the progress commands
    pub catalog: Option<PathBuf>,
    /// Default user for the progress commands
    pub user: Option<String>,
    /// Directory holding per-user progress files
    pub progress_dir: Option<PathBuf>,
    /// Log file; logging is off when unset
    pub log_file: Option<PathBuf>,
}

/// Render mode names for config file (kebab-case friendly)
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderModeConfig {
    HalfBlock,
    Braille,
}

impl From<RenderModeConfig> for RenderMode {
    fn from(c: RenderModeConfig) -> Self {
        match c {
            RenderModeConfig::HalfBlock => RenderMode::HalfBlock,
            RenderModeConfig::Braille => RenderMode::Braille,
        }
    }
}

/// Color mode names for config file (kebab-case friendly)
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorModeConfig {
    Mono,
    Ansi16,
    Ansi256,
    TrueColor,
}

impl From<ColorModeConfig> for ColorMode {
    fn from(c: ColorModeConfig) -> Self {
        match c {
            ColorModeConfig::Mono => ColorMode::Mono,
            ColorModeConfig::Ansi16 => ColorMode::Ansi16,
            ColorModeConfig::Ansi256 => ColorMode::Ansi256,
            ColorModeConfig::TrueColor => ColorMode::TrueColor,
        }
    }
}

/// Get the config file path: ~/.config/patternflix/config.toml
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("patternflix").join("config.toml"))
}

pub fn parse(path: &Path, contents: &str) -> Result<Config> {
    toml::from_str(contents).map_err(|source| Error::Config {
        path: path.to_path_buf(),
        source,
    })
}

/// Load config from file. A missing file gives the defaults, so does a
/// malformed one after a warning.
pub fn load_config() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    let Ok(contents) = std::fs::read_to_string(&path) else {
        return Config::default();
    };
    match parse(&path, &contents) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: {e}");
            tracing::warn!(error = %e, "using default config");
            Config::default()
        }
    }
}

/// Generate a default config file with all options commented out
pub fn default_config_string() -> String {
    r#"# patternflix configuration
# Use --show-config to see the active config file path.
# CLI flags override these settings.

# Pattern opened at startup (use --list to see all)
# pattern = "two-pointers"

# Default render mode: half-block, braille
# render = "half-block"

# Default color mode: mono, ansi16, ansi256, true-color
# color = "true-color"

# Playback speed multiplier (0.5-2.0)
# speed = 1.0

# Start playing as soon as a pattern opens
# autoplay = false

# Hide status bar
# clean = false

# Color quantization step (0 = off, 4/8/16 = coarser colors, less output)
# Useful for slow terminals or tmux
# color_quant = 0

# Problem catalog (JSON) used by --catalog when no path is given
# catalog = "/path/to/catalog.json"

# User whose progress --solve/--unsolve update
# user = "me"

# Where per-user progress files live (default: data dir/patternflix/progress)
# progress_dir = "/path/to/progress"

# Write logs here; filter with PATTERNFLIX_LOG=debug
# log_file = "/tmp/patternflix.log"
"#
    .to_string()
}
