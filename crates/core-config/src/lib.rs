//! Configuration: `quill.toml` discovery, parsing, and validation.
//!
//! Lookup order: `./quill.toml` in the working directory, then
//! `<config dir>/quill/quill.toml`. A missing file means defaults; a file
//! that fails to parse also means defaults, with a warning, so a typo in
//! the config never prevents the editor from starting.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub editor: EditorConfig,
}

/// `[editor]` section. Unknown keys are ignored so a config written for a
/// newer version still loads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Spaces per indentation level (tabs expand to this on load).
    pub tab_size: usize,
    /// Maximum retained undo entries.
    pub undo_capacity: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_size: 4,
            undo_capacity: 200,
        }
    }
}

impl Config {
    /// Load from the discovered config file, or defaults when none exists
    /// or the file is malformed.
    pub fn load() -> Self {
        let Some(path) = discover() else {
            debug!(target: "config", "no_config_file_using_defaults");
            return Self::default();
        };
        match Self::load_from(&path) {
            Ok(cfg) => cfg,
            Err(err) => {
                warn!(target: "config", path = %path.display(), %err, "config_rejected_using_defaults");
                Self::default()
            }
        }
    }

    /// Parse and validate one specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let mut cfg: Config =
            toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
        cfg.clamp();
        debug!(target: "config", path = %path.display(), ?cfg, "loaded");
        Ok(cfg)
    }

    /// Pull out-of-range values back to sane bounds rather than erroring.
    fn clamp(&mut self) {
        if !(1..=16).contains(&self.editor.tab_size) {
            info!(target: "config", tab_size = self.editor.tab_size, "tab_size_clamped");
            self.editor.tab_size = self.editor.tab_size.clamp(1, 16);
        }
        if self.editor.undo_capacity == 0 {
            info!(target: "config", "undo_capacity_clamped");
            self.editor.undo_capacity = 1;
        }
    }
}

/// First existing config file in lookup order, if any.
pub fn discover() -> Option<PathBuf> {
    let local = PathBuf::from("quill.toml");
    if local.is_file() {
        return Some(local);
    }
    let user = dirs::config_dir()?.join("quill").join("quill.toml");
    user.is_file().then_some(user)
}
