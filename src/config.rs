use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result, ensure};
use serde::Deserialize;

use crate::paths;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_APP: &str = "backend:app";
pub const DEFAULT_BROWSER_DELAY_MS: u64 = 2000;
pub const DEFAULT_READY_TIMEOUT_MS: u64 = 10_000;

#[cfg(windows)]
pub const DEFAULT_PYTHON: &str = "python";
#[cfg(not(windows))]
pub const DEFAULT_PYTHON: &str = "python3";

/// Fully resolved launcher settings: built-in defaults, then the YAML file,
/// then command-line overrides.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct LauncherConfig {
    pub host: String,
    pub port: u16,
    pub open_browser: bool,
    pub reload: bool,
    pub browser_delay_ms: u64,
    pub wait_for_ready: bool,
    pub ready_timeout_ms: u64,
    pub server: ServerSettings,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            open_browser: true,
            reload: true,
            browser_delay_ms: DEFAULT_BROWSER_DELAY_MS,
            wait_for_ready: false,
            ready_timeout_ms: DEFAULT_READY_TIMEOUT_MS,
            server: ServerSettings::default(),
        }
    }
}

/// How the server runtime is invoked.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSettings {
    pub python: String,
    pub app: String,
    pub app_dir: Option<PathBuf>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            python: DEFAULT_PYTHON.to_string(),
            app: DEFAULT_APP.to_string(),
            app_dir: None,
        }
    }
}

/// Values taken from the command line. `None`/`false` leaves the configured
/// value untouched; the two `no_*` switches can only turn features off.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub no_browser: bool,
    pub no_reload: bool,
    pub python: Option<String>,
    pub app: Option<String>,
    pub app_dir: Option<PathBuf>,
    pub browser_delay_ms: Option<u64>,
    pub wait_ready: bool,
}

impl LauncherConfig {
    /// Loads the explicit config file if given, otherwise the default config
    /// file when it exists, otherwise built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_path(path);
        }
        let fallback = paths::default_config_path();
        if fallback.is_file() {
            tracing::debug!(path = %fallback.display(), "using default config file");
            return Self::from_path(&fallback);
        }
        Ok(Self::default())
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let raw = fs::read_to_string(path_ref)
            .with_context(|| format!("Failed to read config file at {}", path_ref.display()))?;
        Self::from_yaml_str(&raw)
            .with_context(|| format!("Invalid configuration in {}", path_ref.display()))
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).context("Unable to parse config YAML")
    }

    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(host) = overrides.host {
            self.host = host;
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if overrides.no_browser {
            self.open_browser = false;
        }
        if overrides.no_reload {
            self.reload = false;
        }
        if let Some(python) = overrides.python {
            self.server.python = python;
        }
        if let Some(app) = overrides.app {
            self.server.app = app;
        }
        if let Some(dir) = overrides.app_dir {
            self.server.app_dir = Some(dir);
        }
        if let Some(delay) = overrides.browser_delay_ms {
            self.browser_delay_ms = delay;
        }
        if overrides.wait_ready {
            self.wait_for_ready = true;
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.server.python.trim().is_empty(),
            "server.python must name an interpreter"
        );
        let app = self.server.app.trim();
        ensure!(!app.is_empty(), "server.app must not be blank");
        ensure!(
            app.split_once(':')
                .is_some_and(|(module, attr)| !module.is_empty() && !attr.is_empty()),
            "server.app '{app}' must have the form <module>:<attribute>"
        );
        if self.wait_for_ready {
            ensure!(
                self.ready_timeout_ms > 0,
                "ready_timeout_ms must be > 0 when wait_for_ready is enabled"
            );
        }
        Ok(())
    }

    /// The address users are pointed at. IPv6 literals are bracketed.
    pub fn url(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("http://[{}]:{}", self.host, self.port)
        } else {
            format!("http://{}:{}", self.host, self.port)
        }
    }

    pub fn browser_delay(&self) -> Duration {
        Duration::from_millis(self.browser_delay_ms)
    }

    pub fn ready_timeout(&self) -> Duration {
        Duration::from_millis(self.ready_timeout_ms)
    }
}
