use std::path::PathBuf;

use clap::Parser;

use crate::config::ConfigOverrides;

const EXAMPLES: &str = "\
Examples:
  memory-browser                    # Start server on default port 8000
  memory-browser --port 8080        # Start server on port 8080
  memory-browser --host 0.0.0.0     # Allow connections from any host
  memory-browser --no-browser       # Start without opening browser
  memory-browser --no-reload        # Start without auto-reload for production";

/// Launcher for the AgentCore Memory Browser web application.
#[derive(Debug, Parser)]
#[command(name = "memory-browser")]
#[command(
    about = "AgentCore Memory Browser - A web interface for browsing Amazon Bedrock AgentCore Memory resources",
    version
)]
#[command(after_help = EXAMPLES)]
pub struct Cli {
    #[arg(long, help = "Host to bind the server to (default: 127.0.0.1)")]
    pub host: Option<String>,

    #[arg(long, help = "Port to bind the server to (default: 8000)")]
    pub port: Option<u16>,

    #[arg(long, help = "Don't automatically open the browser")]
    pub no_browser: bool,

    #[arg(long, help = "Disable auto-reload for production use")]
    pub no_reload: bool,

    #[arg(long, help = "Path to a YAML launcher configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Python interpreter used to run uvicorn (default: python3)")]
    pub python: Option<String>,

    #[arg(long, help = "ASGI application reference (default: backend:app)")]
    pub app: Option<String>,

    #[arg(long, help = "Working directory for the server process")]
    pub app_dir: Option<PathBuf>,

    #[arg(long, help = "Delay before opening the browser, in milliseconds (default: 2000)")]
    pub browser_delay_ms: Option<u64>,

    #[arg(long, help = "Wait until the server answers HTTP before opening the browser")]
    pub wait_ready: bool,

    #[arg(short, long, help = "Enable debug logging with timestamps")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON on stdout")]
    pub log_json: bool,

    #[arg(long, requires = "log_json", conflicts_with = "compact", help = "Pretty-print JSON logs")]
    pub pretty: bool,

    #[arg(long, requires = "log_json", help = "Single-line JSON logs (default)")]
    pub compact: bool,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            host: self.host.clone(),
            port: self.port,
            no_browser: self.no_browser,
            no_reload: self.no_reload,
            python: self.python.clone(),
            app: self.app.clone(),
            app_dir: self.app_dir.clone(),
            browser_delay_ms: self.browser_delay_ms,
            wait_ready: self.wait_ready,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parses_without_flags() {
        let cli = Cli::parse_from(["memory-browser"]);
        assert!(cli.host.is_none());
        assert!(cli.port.is_none());
        assert!(!cli.no_browser);
        assert!(!cli.no_reload);
    }

    #[test]
    fn parses_launch_flags() {
        let cli = Cli::parse_from([
            "memory-browser",
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
            "--no-browser",
            "--no-reload",
        ]);
        assert_eq!(cli.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(cli.port, Some(8080));
        assert!(cli.no_browser);
        assert!(cli.no_reload);
    }

    #[test]
    fn rejects_non_numeric_port() {
        let err = Cli::try_parse_from(["memory-browser", "--port", "eighty"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn pretty_requires_log_json() {
        assert!(Cli::try_parse_from(["memory-browser", "--pretty"]).is_err());
        assert!(Cli::try_parse_from(["memory-browser", "--log-json", "--pretty"]).is_ok());
    }
}
