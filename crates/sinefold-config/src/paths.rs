//! Platform-specific paths for controller layouts and configuration.
//!
//! # Directory Structure
//!
//! - **User config**: `~/.config/sinefold/` (Linux), `~/Library/Application Support/sinefold/` (macOS), `%APPDATA%\sinefold\` (Windows)
//! - **User layouts**: `layouts/` under the user config directory
//! - **Engine config**: `engine.toml` under the user config directory
//!
//! # Example
//!
//! ```rust,no_run
//! use sinefold_config::paths;
//!
//! println!("User layouts: {:?}", paths::user_layouts_dir());
//!
//! if let Some(path) = paths::find_layout("my_desk") {
//!     println!("Found layout at: {:?}", path);
//! }
//! ```

use std::path::{Path, PathBuf};

/// Application name used for directory paths.
const APP_NAME: &str = "sinefold";

/// Subdirectory name for layouts.
const LAYOUTS_SUBDIR: &str = "layouts";

/// File name of the engine configuration.
const ENGINE_CONFIG_FILE: &str = "engine.toml";

/// Returns the user-specific configuration directory.
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the user-specific layouts directory.
pub fn user_layouts_dir() -> PathBuf {
    user_config_dir().join(LAYOUTS_SUBDIR)
}

/// Returns the path of the user's engine configuration file.
pub fn engine_config_path() -> PathBuf {
    user_config_dir().join(ENGINE_CONFIG_FILE)
}

/// Find a layout file by name.
///
/// Searches in the following order:
/// 1. `name` as a path to an existing file
/// 2. The user layouts directory (`.toml` appended when missing)
pub fn find_layout(name: &str) -> Option<PathBuf> {
    find_layout_in(name, &user_layouts_dir())
}

/// [`find_layout`] against an explicit layouts directory.
pub fn find_layout_in(name: &str, dir: &Path) -> Option<PathBuf> {
    let path = PathBuf::from(name);
    if path.is_file() {
        return Some(path);
    }

    let filename = if name.ends_with(".toml") {
        name.to_string()
    } else {
        format!("{}.toml", name)
    };

    let candidate = dir.join(filename);
    candidate.is_file().then_some(candidate)
}

/// Ensure the user layouts directory exists.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_user_layouts_dir() -> Result<PathBuf, crate::ConfigError> {
    let dir = user_layouts_dir();

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| crate::ConfigError::create_dir(&dir, e))?;
    }

    Ok(dir)
}

/// List all layout files in the user layouts directory.
///
/// Returns an empty vector if the directory doesn't exist or can't be read.
pub fn list_user_layouts() -> Vec<PathBuf> {
    list_layouts_in_dir(&user_layouts_dir())
}

/// List `.toml` files in `dir`, sorted by path.
pub fn list_layouts_in_dir(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut layouts: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    layouts.sort();
    layouts
}

/// Get the layout name from a file path.
///
/// ```rust
/// use sinefold_config::paths::layout_name_from_path;
/// use std::path::Path;
///
/// let name = layout_name_from_path(Path::new("/path/to/desk.toml"));
/// assert_eq!(name, Some("desk".to_string()));
/// ```
pub fn layout_name_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_layouts_dir_is_under_config_dir() {
        let layouts = user_layouts_dir();
        assert!(layouts.starts_with(user_config_dir()));
        assert!(layouts.ends_with("sinefold/layouts"));
        assert!(engine_config_path().ends_with("sinefold/engine.toml"));
    }

    #[test]
    fn test_find_by_name_and_by_path() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("desk.toml");
        fs::write(&file, "name = \"Desk\"").unwrap();

        assert_eq!(find_layout_in("desk", dir.path()), Some(file.clone()));
        assert_eq!(find_layout_in("desk.toml", dir.path()), Some(file.clone()));
        let by_path = file.to_string_lossy().into_owned();
        assert_eq!(find_layout_in(&by_path, Path::new("/nonexistent")), Some(file));
        assert_eq!(find_layout_in("other", dir.path()), None);
    }

    #[test]
    fn test_lists_only_toml_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.toml"), "").unwrap();
        fs::write(dir.path().join("a.toml"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::create_dir(dir.path().join("sub.toml")).unwrap();

        let names: Vec<_> = list_layouts_in_dir(dir.path())
            .iter()
            .filter_map(|p| layout_name_from_path(p))
            .collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn test_missing_dir_lists_nothing() {
        assert!(list_layouts_in_dir(Path::new("/definitely/not/here")).is_empty());
    }
}
