use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

/// Answers whether the server behind `url` accepts requests yet.
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    /// Returns `true` once the server responds, `false` if `timeout` elapses first.
    async fn wait_ready(&self, url: &str, timeout: Duration) -> bool;
}

/// Polls with plain HTTP GETs. Any response, whatever its status, counts as ready.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: reqwest::Client,
    interval: Duration,
}

impl HttpProbe {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(2))
            .build()
            .context("Failed to build readiness probe HTTP client")?;
        Ok(Self {
            client,
            interval: Duration::from_millis(250),
        })
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

#[async_trait]
impl ReadinessProbe for HttpProbe {
    async fn wait_ready(&self, url: &str, timeout: Duration) -> bool {
        let poll = async {
            loop {
                match self.client.get(url).send().await {
                    Ok(response) => {
                        debug!(%url, status = %response.status(), "server is accepting requests");
                        return;
                    }
                    Err(err) => debug!(%url, error = %err, "server not ready yet"),
                }
                tokio::time::sleep(self.interval).await;
            }
        };
        tokio::time::timeout(timeout, poll).await.is_ok()
    }
}
