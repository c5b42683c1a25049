//! Path resolution for the data and configuration directories.
//!
//! Platform directories come from `directories::ProjectDirs`. When no home
//! directory can be determined (minimal containers, some CI runners) both
//! directories fall back to paths relative to the working directory so the
//! application can still start.

use directories::ProjectDirs;
use std::path::PathBuf;

/// Application name used for platform directory lookup.
pub const APP_NAME: &str = "student-helper";

/// Name of the optional configuration file inside [`get_config_dir`].
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Name of the log file inside the data directory.
pub const LOG_FILE_NAME: &str = "student-helper.log";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", APP_NAME)
}

/// Returns the default directory holding the JSON documents.
///
/// On Linux this is typically `~/.local/share/student-helper`.
#[must_use]
pub fn get_data_dir() -> PathBuf {
    project_dirs().map_or_else(
        || PathBuf::from("data"),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}

/// Returns the directory searched for [`CONFIG_FILE_NAME`].
#[must_use]
pub fn get_config_dir() -> PathBuf {
    project_dirs().map_or_else(
        || PathBuf::from("."),
        |dirs| dirs.config_dir().to_path_buf(),
    )
}

/// Returns the full path of the optional configuration file.
#[must_use]
pub fn get_config_path() -> PathBuf {
    get_config_dir().join(CONFIG_FILE_NAME)
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading tilde, and all paths when no home directory is
/// known, are returned unchanged.
///
/// # Examples
///
/// ```
/// use student_helper::infrastructure::expand_tilde;
/// use std::path::PathBuf;
///
/// assert_eq!(expand_tilde("/absolute/path"), PathBuf::from("/absolute/path"));
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    let home = directories::BaseDirs::new().map(|b| b.home_dir().to_path_buf());
    match (path, home) {
        ("~", Some(home)) => home,
        (p, Some(home)) if p.starts_with("~/") => home.join(&p[2..]),
        (p, _) => PathBuf::from(p),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_tilde_leaves_plain_paths_alone() {
        assert_eq!(expand_tilde("relative/dir"), PathBuf::from("relative/dir"));
        assert_eq!(expand_tilde("/srv/data"), PathBuf::from("/srv/data"));
    }

    #[test]
    fn expand_tilde_resolves_home_prefix() {
        if let Some(base) = directories::BaseDirs::new() {
            assert_eq!(expand_tilde("~"), base.home_dir());
            assert_eq!(expand_tilde("~/notes"), base.home_dir().join("notes"));
        }
    }
}
