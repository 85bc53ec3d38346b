use std::path::PathBuf;

/// Returns the user's home directory using common environment variables.
pub fn home_dir() -> Option<PathBuf> {
    std::env::var_os("MEMORY_BROWSER_HOME")
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var_os("HOME")
                .or_else(|| std::env::var_os("USERPROFILE"))
                .map(PathBuf::from)
        })
}

/// Returns the default path to ~/.env (or $MEMORY_BROWSER_HOME/.env if set).
pub fn home_env_path() -> Option<PathBuf> {
    home_dir().map(|mut dir| {
        dir.push(".env");
        dir
    })
}

/// Returns the directory holding launcher state (config and logs).
pub fn data_dir() -> PathBuf {
    if let Some(mut dir) = home_dir() {
        dir.push(".memory-browser");
        dir
    } else {
        PathBuf::from(".memory-browser")
    }
}

pub fn default_config_path() -> PathBuf {
    data_dir().join("config.yaml")
}

pub fn log_dir() -> PathBuf {
    data_dir().join("logs")
}
