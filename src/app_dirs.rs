use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Where the TUI writes its trace log; the terminal itself belongs to the UI.
    pub fn log_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("pword.log"))
    }

    fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(PathBuf::from(home).join(".local").join("state").join("pword"))
        } else {
            ProjectDirs::from("", "", "pword").map(|proj_dirs| proj_dirs.data_local_dir().to_path_buf())
        }
    }
}
