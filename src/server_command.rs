use std::{fmt, path::PathBuf, process::Stdio};

use crate::config::LauncherConfig;

/// A fully materialised server-runtime invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerCommand {
    pub program: String,
    pub args: Vec<String>,
    pub current_dir: Option<PathBuf>,
    pub envs: Vec<(String, String)>,
}

impl ServerCommand {
    /// `<python> -m uvicorn <app> --host <host> --port <port> [--reload]`
    pub fn from_config(config: &LauncherConfig) -> Self {
        let mut args = vec![
            "-m".to_string(),
            "uvicorn".to_string(),
            config.server.app.clone(),
            "--host".to_string(),
            config.host.clone(),
            "--port".to_string(),
            config.port.to_string(),
        ];
        if config.reload {
            args.push("--reload".to_string());
        }
        Self {
            program: config.server.python.clone(),
            args,
            current_dir: config.server.app_dir.clone(),
            envs: Vec::new(),
        }
    }

    pub fn with_envs(mut self, envs: Vec<(String, String)>) -> Self {
        self.envs = envs;
        self
    }

    pub fn has_reload(&self) -> bool {
        self.args.iter().any(|arg| arg == "--reload")
    }

    /// Child inherits stdio so the server's own output reaches the terminal.
    pub fn to_command(&self) -> tokio::process::Command {
        let mut command = tokio::process::Command::new(&self.program);
        command
            .args(&self.args)
            .envs(self.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        if let Some(dir) = &self.current_dir {
            command.current_dir(dir);
        }
        // Terminal Ctrl+C reaches the launcher only; it forwards the signal once.
        #[cfg(unix)]
        command.process_group(0);
        command
    }
}

impl fmt::Display for ServerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
