//! Editor behavior configuration.
//!
//! A token-per-line rc file, merged from a global config path and a local
//! `.quillrc` override. Unknown tokens are ignored so older builds can read
//! newer files.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::history::MAX_HISTORY;

/// Tunable editing behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    /// Remember the cursor column across vertical moves through shorter
    /// lines. Off by default: the column is re-derived from wherever the
    /// cursor lands.
    pub sticky_column: bool,
    /// Maximum undo/redo entries kept per stack.
    pub history_limit: usize,
    /// Tab stop width in cells, used for pointer position mapping.
    pub tab_width: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            sticky_column: false,
            history_limit: MAX_HISTORY,
            tab_width: 4,
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("quill").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("quill")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("quill").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config").join("quill").join("config");
        }
    }

    PathBuf::from(".quillrc")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".quillrc")
}

/// Load `path` on top of `base`; a missing file returns `base` unchanged.
///
/// Layering is just repeated application: global first, then the local
/// override.
///
/// # Errors
/// [`Error::Read`] when the file exists but cannot be read.
pub fn load_config(path: &Path, base: EditorConfig) -> Result<EditorConfig> {
    if !path.exists() {
        return Ok(base);
    }
    let content = fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_config_tokens(&tokens, base))
}

/// Write the non-default settings in `config` to `path`.
///
/// # Errors
/// [`Error::Write`] on directory-creation or write failure.
pub fn save_config(path: &Path, config: &EditorConfig) -> Result<()> {
    let defaults = EditorConfig::default();
    let mut lines = vec!["# quill defaults".to_string()];
    if config.sticky_column {
        lines.push("sticky-column".to_string());
    }
    if config.history_limit != defaults.history_limit {
        lines.push(format!("history-limit {}", config.history_limit));
    }
    if config.tab_width != defaults.tab_width {
        lines.push(format!("tab-width {}", config.tab_width));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| Error::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, format!("{}\n", lines.join("\n"))).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Remove a saved config file if present.
///
/// # Errors
/// [`Error::Write`] when the file exists but cannot be removed.
pub fn clear_config(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

/// Apply known tokens onto `base`, ignoring everything else.
pub fn parse_config_tokens(tokens: &[String], base: EditorConfig) -> EditorConfig {
    let mut config = base;
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        if token == "sticky-column" {
            config.sticky_column = true;
        } else if token == "no-sticky-column" {
            config.sticky_column = false;
        } else if token == "history-limit" {
            if let Some(value) = tokens.get(i + 1).and_then(|v| v.parse().ok()) {
                config.history_limit = value;
                i += 1;
            }
        } else if token == "tab-width" {
            if let Some(value) = tokens.get(i + 1).and_then(|v| v.parse().ok()) {
                config.tab_width = value;
                i += 1;
            }
        }
        i += 1;
    }
    config
}
