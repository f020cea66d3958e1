use std::path::{Path, PathBuf};

pub const DEVKIT_DIR: &str = ".devkit";
pub const CONFIG_FILE: &str = ".devkit/config.yaml";
pub const PACKAGE_JSON: &str = "package.json";

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// Resolve `file` against `root` unless it is already absolute.
pub fn resolve_in(root: &Path, file: &Path) -> PathBuf {
    if file.is_absolute() {
        file.to_path_buf()
    } else {
        root.join(file)
    }
}
