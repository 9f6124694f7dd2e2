//! Periodic liveness polling for the remote service.
//!
//! One real probe against `/health` drives both status indicators: the data
//! store has no liveness endpoint of its own, so its status is derived from
//! the API probe. The monitor never surfaces errors to the rest of the
//! system; a failed probe only flips the indicators to `Offline`.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{interval, timeout, MissedTickBehavior};
use tracing::{debug, warn};

use crate::config::Config;
use crate::sink::{PresentationSink, Region, Severity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Checking,
    Online,
    Offline,
}

impl HealthStatus {
    fn label(self) -> &'static str {
        match self {
            HealthStatus::Checking => "Checking...",
            HealthStatus::Online => "Online",
            HealthStatus::Offline => "Offline",
        }
    }

    fn severity(self) -> Severity {
        match self {
            HealthStatus::Checking => Severity::Info,
            HealthStatus::Online => Severity::Success,
            HealthStatus::Offline => Severity::Error,
        }
    }
}

/// Status of both monitored subsystems. Fully overwritten on every poll
/// cycle; never merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthSnapshot {
    pub api: HealthStatus,
    pub store: HealthStatus,
}

impl HealthSnapshot {
    fn checking() -> Self {
        Self {
            api: HealthStatus::Checking,
            store: HealthStatus::Checking,
        }
    }
}

struct ProbeTask {
    http: Client,
    health_url: String,
    probe_timeout: Duration,
    snapshot: RwLock<HealthSnapshot>,
    sink: Arc<dyn PresentationSink>,
}

impl ProbeTask {
    async fn set(&self, snapshot: HealthSnapshot) {
        *self.snapshot.write().await = snapshot;
        self.sink.render(
            Region::ApiHealth,
            snapshot.api.label(),
            snapshot.api.severity(),
        );
        self.sink.render(
            Region::StoreHealth,
            snapshot.store.label(),
            snapshot.store.severity(),
        );
    }

    async fn run_once(&self) {
        self.set(HealthSnapshot::checking()).await;

        let status = match timeout(self.probe_timeout, self.http.get(&self.health_url).send()).await
        {
            Ok(Ok(response)) if response.status().is_success() => HealthStatus::Online,
            Ok(Ok(response)) => {
                debug!(status = %response.status(), "health endpoint unhealthy");
                HealthStatus::Offline
            }
            Ok(Err(err)) => {
                debug!("health probe failed: {err}");
                HealthStatus::Offline
            }
            Err(_) => {
                warn!("health probe timed out after {:?}", self.probe_timeout);
                HealthStatus::Offline
            }
        };

        // The store indicator is derived from the same probe.
        self.set(HealthSnapshot {
            api: status,
            store: status,
        })
        .await;
    }
}

/// Owns the recurring probe task. `start` spawns it, `stop` aborts it, and
/// dropping the monitor stops it as well, so the timer cannot outlive its
/// owner.
pub struct HealthMonitor {
    task: Arc<ProbeTask>,
    period: Duration,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl HealthMonitor {
    pub fn from_config(config: &Config, sink: Arc<dyn PresentationSink>) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("linkdeck/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.health.probe_timeout_secs))
            .build()
            .context("failed to build HTTP client for health probes")?;

        Ok(Self {
            task: Arc::new(ProbeTask {
                http,
                health_url: format!("{}/health", config.public_base_url),
                probe_timeout: Duration::from_secs(config.health.probe_timeout_secs),
                snapshot: RwLock::new(HealthSnapshot::checking()),
                sink,
            }),
            period: Duration::from_secs(config.health.interval_secs.max(1)),
            handle: Mutex::new(None),
        })
    }

    /// Run one probe immediately, then on every tick of the fixed timer.
    /// Idempotent; a second call keeps the existing task.
    pub fn start(&self) {
        let mut handle = self.handle.lock().unwrap();
        if handle.is_some() {
            return;
        }

        let task = Arc::clone(&self.task);
        let period = self.period;
        *handle = Some(tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                task.run_once().await;
            }
        }));
    }

    pub fn stop(&self) {
        if let Some(handle) = self.handle.lock().unwrap().take() {
            handle.abort();
        }
    }

    pub async fn snapshot(&self) -> HealthSnapshot {
        *self.task.snapshot.read().await
    }
}

impl Drop for HealthMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}
