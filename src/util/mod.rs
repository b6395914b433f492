//! Utility functions and helpers

use directories::ProjectDirs;
use std::path::PathBuf;

/// Per-user config directory, e.g. `~/.config/shellward` on Linux.
pub fn get_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("dev", "shellward", "shellward").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Default location of `config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    get_config_dir().map(|d| d.join("config.toml"))
}

pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
