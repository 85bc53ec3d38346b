use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::{
    browser::{self, BrowserOpener, ReadyCheck},
    config::LauncherConfig,
    error::{LaunchError, Result},
    readiness::ReadinessProbe,
    server_command::ServerCommand,
};

/// How a launch ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// The server exited on its own with a success status.
    Completed,
    /// A shutdown signal arrived while waiting on the server.
    Interrupted,
}

/// Which stop request reached the launcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopSignal {
    /// Ctrl+C / SIGINT.
    Interrupt,
    /// SIGTERM.
    Terminate,
}

pub type Shutdown = Pin<Box<dyn Future<Output = StopSignal> + Send>>;

/// Runs a server command to completion or until `shutdown` resolves.
#[async_trait]
pub trait ServerRuntime: Send + Sync {
    async fn run(&self, command: &ServerCommand, shutdown: Shutdown) -> Result<LaunchOutcome>;
}

/// Spawns the server as a child process. The child runs in its own process
/// group on unix, so stop requests reach it only through the launcher.
#[derive(Debug, Clone)]
pub struct ProcessRuntime {
    grace: Duration,
}

impl Default for ProcessRuntime {
    fn default() -> Self {
        Self {
            grace: Duration::from_secs(3),
        }
    }
}

impl ProcessRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time the child gets to exit after the stop request is forwarded,
    /// before it is killed.
    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }
}

#[async_trait]
impl ServerRuntime for ProcessRuntime {
    async fn run(&self, command: &ServerCommand, shutdown: Shutdown) -> Result<LaunchOutcome> {
        let mut child = command
            .to_command()
            .spawn()
            .map_err(|err| LaunchError::spawn(&command.program, err))?;
        debug!(pid = ?child.id(), %command, "server process started");

        let finished = tokio::select! {
            status = child.wait() => Ok(status),
            signal = shutdown => Err(signal),
        };

        match finished {
            Ok(status) => {
                let status = status.map_err(LaunchError::Wait)?;
                if status.success() {
                    info!("server process exited");
                    Ok(LaunchOutcome::Completed)
                } else {
                    Err(LaunchError::ServerExited {
                        code: status.code(),
                    })
                }
            }
            Err(signal) => {
                info!(?signal, "shutdown requested; stopping server process");
                forward_signal(&child, signal);
                match tokio::time::timeout(self.grace, child.wait()).await {
                    Ok(status) => {
                        let status = status.map_err(LaunchError::Wait)?;
                        debug!(%status, "server process stopped");
                    }
                    Err(_) => {
                        warn!("server process still running after grace period; killing it");
                        child.kill().await.map_err(LaunchError::Wait)?;
                    }
                }
                Ok(LaunchOutcome::Interrupted)
            }
        }
    }
}

#[cfg(unix)]
fn forward_signal(child: &tokio::process::Child, signal: StopSignal) {
    // None once the child has been reaped
    let Some(pid) = child.id() else {
        return;
    };
    let signo = match signal {
        StopSignal::Interrupt => libc::SIGINT,
        StopSignal::Terminate => libc::SIGTERM,
    };
    // SAFETY: `pid` is our own unreaped child, so it cannot have been recycled.
    let rc = unsafe { libc::kill(pid as libc::pid_t, signo) };
    if rc != 0 {
        debug!(pid, error = %std::io::Error::last_os_error(), "could not forward signal");
    }
}

#[cfg(not(unix))]
fn forward_signal(_: &tokio::process::Child, _: StopSignal) {}

/// Resolves on Ctrl+C, or SIGTERM on unix. A handler that cannot be
/// installed never resolves.
pub async fn shutdown_signal() -> StopSignal {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => StopSignal::Interrupt,
        () = terminate => StopSignal::Terminate,
    }
}

/// Wires the resolved configuration to the browser and server ports.
pub struct Launcher {
    config: LauncherConfig,
    runtime: Arc<dyn ServerRuntime>,
    browser: Arc<dyn BrowserOpener>,
    probe: Option<Arc<dyn ReadinessProbe>>,
    child_env: Vec<(String, String)>,
}

impl Launcher {
    pub fn new(
        config: LauncherConfig,
        runtime: Arc<dyn ServerRuntime>,
        browser: Arc<dyn BrowserOpener>,
    ) -> Self {
        Self {
            config,
            runtime,
            browser,
            probe: None,
            child_env: Vec::new(),
        }
    }

    /// Probe used when `wait_for_ready` is enabled.
    pub fn with_probe(mut self, probe: Arc<dyn ReadinessProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    pub fn with_child_env(mut self, envs: Vec<(String, String)>) -> Self {
        self.child_env = envs;
        self
    }

    pub fn command(&self) -> ServerCommand {
        ServerCommand::from_config(&self.config).with_envs(self.child_env.clone())
    }

    /// Schedules the browser (unless disabled) and then blocks on the server.
    /// The browser task never delays the server start.
    pub async fn launch<F>(&self, shutdown: F) -> Result<LaunchOutcome>
    where
        F: Future<Output = StopSignal> + Send + 'static,
    {
        let url = self.config.url();
        if self.config.open_browser {
            let ready = self.ready_check();
            if self.config.wait_for_ready && ready.is_none() {
                warn!("wait_for_ready is set but no readiness probe is available");
            }
            browser::schedule_open(
                self.browser.clone(),
                url.clone(),
                self.config.browser_delay(),
                ready,
            );
            debug!(%url, delay_ms = self.config.browser_delay_ms, "scheduled browser open");
        } else {
            debug!("browser opening disabled");
        }

        let command = self.command();
        info!(%command, "starting server runtime");
        self.runtime.run(&command, Box::pin(shutdown)).await
    }

    fn ready_check(&self) -> Option<ReadyCheck> {
        if !self.config.wait_for_ready {
            return None;
        }
        self.probe.clone().map(|probe| ReadyCheck {
            probe,
            timeout: self.config.ready_timeout(),
        })
    }
}
