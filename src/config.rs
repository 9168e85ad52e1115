//! Configuration loading and merging.
//!
//! Values come from three layers, highest priority first:
//! - command line flags
//! - an optional settings.json
//! - built-in defaults

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::media::{MediaProfile, StickyEdge};

pub const DEFAULT_FONT: &str = "Noto Sans Bold";
pub const DEFAULT_PRINTER: &str = "nemonic_MIP_201";
pub const DEFAULT_MEDIA: &str = "note";
pub const DEFAULT_STICKY_EDGE: &str = "up";
pub const TEMP_FILE_NAME: &str = "printNote_temp.pdf";

/// Contents of settings.json; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub font: Option<String>,
    pub printer: Option<String>,
    pub media: Option<String>,
    pub sticky_edge: Option<String>,
    pub output: Option<PathBuf>,
    /// Extra directories searched for fonts that were not registered
    pub font_dirs: Vec<PathBuf>,
    /// Font id to font file
    pub fonts: BTreeMap<String, PathBuf>,
}

/// Values given on the command line
#[derive(Debug, Default)]
pub struct Overrides {
    pub font: Option<String>,
    pub printer: Option<String>,
    pub media: Option<String>,
    pub sticky_edge: Option<String>,
    pub output: Option<PathBuf>,
}

/// Fully resolved settings for one run
#[derive(Debug)]
pub struct RunConfig {
    pub font: String,
    pub printer: String,
    pub media: MediaProfile,
    pub sticky_edge: StickyEdge,
    pub output: PathBuf,
    pub font_dirs: Vec<PathBuf>,
    pub fonts: BTreeMap<String, PathBuf>,
}

impl RunConfig {
    /// Merge command line values over settings over defaults
    pub fn resolve(overrides: Overrides, settings: Settings) -> Result<RunConfig, ConfigError> {
        let media = overrides
            .media
            .or(settings.media)
            .unwrap_or_else(|| DEFAULT_MEDIA.to_string())
            .parse()?;
        let sticky_edge = overrides
            .sticky_edge
            .or(settings.sticky_edge)
            .unwrap_or_else(|| DEFAULT_STICKY_EDGE.to_string())
            .parse()?;

        Ok(RunConfig {
            font: overrides
                .font
                .or(settings.font)
                .unwrap_or_else(|| DEFAULT_FONT.to_string()),
            printer: overrides
                .printer
                .or(settings.printer)
                .unwrap_or_else(|| DEFAULT_PRINTER.to_string()),
            media,
            sticky_edge,
            output: overrides
                .output
                .or(settings.output)
                .map(|p| expand_home(&p))
                .unwrap_or_else(|| std::env::temp_dir().join(TEMP_FILE_NAME)),
            font_dirs: settings.font_dirs.iter().map(|p| expand_home(p)).collect(),
            fonts: settings
                .fonts
                .iter()
                .map(|(id, p)| (id.clone(), expand_home(p)))
                .collect(),
        })
    }
}

/// Replace a leading `~` with the home directory
pub fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), std::env::var_os("HOME")) {
        (Ok(rest), Some(home)) => PathBuf::from(home).join(rest),
        _ => path.to_path_buf(),
    }
}

/// Per-user font directory where the default fonts are expected
pub fn user_font_dir() -> Option<PathBuf> {
    let home = PathBuf::from(std::env::var_os("HOME")?);
    if cfg!(target_os = "macos") {
        Some(home.join("Library/Fonts"))
    } else {
        Some(home.join(".local/share/fonts"))
    }
}

/// Noto Sans regular and bold from the user font directory
pub fn default_fonts() -> Vec<(String, PathBuf)> {
    let Some(dir) = user_font_dir() else {
        return Vec::new();
    };
    vec![
        ("Noto Sans".to_string(), dir.join("NotoSans-Regular.ttf")),
        ("Noto Sans Bold".to_string(), dir.join("NotoSans-Bold.ttf")),
    ]
}

/// Helper function to open a file with consistent error context
fn open_file_with_context(path: &Path, description: &str) -> Result<File> {
    File::open(path)
        .with_context(|| format!("Failed to open {} at {:?}", description, path))
}

pub fn load_settings(path: &Path) -> Result<Settings> {
    let file = open_file_with_context(path, "settings")?;
    let reader = BufReader::new(file);
    let settings: Settings = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse settings at {:?}", path))?;
    Ok(settings)
}
