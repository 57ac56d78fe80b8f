//! Config path resolution
//!
//! XDG Base Directory compliant lookup of the configuration directory, with
//! a `directories`-based fallback when the XDG variables are unset.

use std::path::PathBuf;

use directories::ProjectDirs;

/// Get the config directory for keep-mcp
///
/// Returns: $XDG_CONFIG_HOME/keep-mcp, or the platform config dir
pub fn get_config_dir() -> PathBuf {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg_config).join("keep-mcp");
    }
    if let Some(dirs) = ProjectDirs::from("", "", "keep-mcp") {
        return dirs.config_dir().to_path_buf();
    }
    PathBuf::from(".config").join("keep-mcp")
}

/// Get the default config file path
pub fn get_default_config_path() -> PathBuf {
    get_config_dir().join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_ends_with_toml() {
        let path = get_default_config_path();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("toml"));
    }

    #[test]
    fn test_xdg_override() {
        std::env::set_var("XDG_CONFIG_HOME", "/tmp/xdg-test");
        let dir = get_config_dir();
        assert_eq!(dir, PathBuf::from("/tmp/xdg-test/keep-mcp"));
        std::env::remove_var("XDG_CONFIG_HOME");
    }
}
