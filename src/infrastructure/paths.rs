//! Filesystem locations for logs and stored credentials.

use std::path::{Path, PathBuf};

use crate::Config;

/// Directory name under the platform data directory.
const APP_DIR: &str = "dexy";

/// Credential store file name inside the data directory.
pub const CREDENTIALS_FILE_NAME: &str = "credentials.json";

/// Returns the data directory for logs and credentials.
///
/// Resolution order:
/// 1. `config.data_dir`, with a leading `~` expanded
/// 2. `$XDG_DATA_HOME/dexy`
/// 3. `$HOME/.local/share/dexy`
/// 4. `.dexy` in the working directory
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use dexy::infrastructure::data_dir;
/// use dexy::Config;
///
/// let config = Config {
///     data_dir: Some(PathBuf::from("/var/lib/dexy")),
///     ..Default::default()
/// };
/// assert_eq!(data_dir(&config), PathBuf::from("/var/lib/dexy"));
/// ```
#[must_use]
pub fn data_dir(config: &Config) -> PathBuf {
    if let Some(dir) = &config.data_dir {
        return expand_tilde(dir);
    }
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(xdg).join(APP_DIR);
    }
    if let Some(home) = std::env::var_os("HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(home).join(".local").join("share").join(APP_DIR);
    }
    PathBuf::from(".dexy")
}

/// Path of the JSON credential store.
#[must_use]
pub fn credentials_path(config: &Config) -> PathBuf {
    data_dir(config).join(CREDENTIALS_FILE_NAME)
}

/// Expands a leading `~` to `$HOME`. Other paths are returned unchanged.
#[must_use]
pub fn expand_tilde(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(rest),
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_dir_wins() {
        let config = Config {
            data_dir: Some(PathBuf::from("/srv/dexy")),
            ..Config::default()
        };
        assert_eq!(credentials_path(&config), PathBuf::from("/srv/dexy/credentials.json"));
    }

    #[test]
    fn absolute_paths_are_not_expanded() {
        assert_eq!(expand_tilde(Path::new("/tmp/x")), PathBuf::from("/tmp/x"));
    }
}
