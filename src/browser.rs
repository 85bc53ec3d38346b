//! Best-effort "open the app in a browser" side task.

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::readiness::ReadinessProbe;

/// Asks the operating system to show a URL.
pub trait BrowserOpener: Send + Sync {
    fn open(&self, url: &str) -> Result<()>;
}

/// Opens URLs with the platform's default handler.
#[derive(Debug, Default)]
pub struct SystemBrowser;

impl SystemBrowser {
    pub fn new() -> Self {
        Self
    }
}

impl BrowserOpener for SystemBrowser {
    fn open(&self, url: &str) -> Result<()> {
        webbrowser::open(url).with_context(|| format!("Failed to open browser at {url}"))
    }
}

/// Optional readiness gate applied after the fixed delay.
#[derive(Clone)]
pub struct ReadyCheck {
    pub probe: Arc<dyn ReadinessProbe>,
    pub timeout: Duration,
}

/// Spawns a detached task that waits `delay`, optionally waits for the server
/// to answer, then opens `url`. Failures (including a panicking opener) are
/// logged at debug level and otherwise dropped. The task holds no resources the
/// main flow waits on, so the runtime drops it at shutdown.
pub fn schedule_open(
    opener: Arc<dyn BrowserOpener>,
    url: String,
    delay: Duration,
    ready: Option<ReadyCheck>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;

        if let Some(check) = ready
            && !check.probe.wait_ready(&url, check.timeout).await
        {
            debug!(%url, "server not ready before timeout; opening browser anyway");
        }

        let target = url.clone();
        match tokio::task::spawn_blocking(move || opener.open(&target)).await {
            Ok(Ok(())) => debug!(%url, "opened browser"),
            Ok(Err(err)) => debug!(%url, error = %err, "could not open browser"),
            Err(err) => debug!(%url, error = %err, "browser opener aborted"),
        }
    })
}
