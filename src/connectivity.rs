//! Shared connectivity signal.
//!
//! A cloneable handle over one atomic boolean, updated by a background probe
//! task. Reads are plain atomic loads; eventual consistency is fine — a stale
//! "online" costs one failed attempt, a stale "offline" one skipped attempt.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub struct Connectivity {
    online: Arc<AtomicBool>,
}

impl Connectivity {
    pub fn new(initially_online: bool) -> Self {
        Self {
            online: Arc::new(AtomicBool::new(initially_online)),
        }
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::Relaxed)
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::Relaxed);
    }

    /// Spawn a background probe that refreshes the flag on an interval.
    /// The handle may be dropped; the task keeps the shared flag alive.
    pub fn spawn_probe(
        &self,
        client: reqwest::Client,
        probe_url: String,
        interval: Duration,
    ) -> JoinHandle<()> {
        let handle = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let reachable = client.head(&probe_url).send().await.is_ok();
                if reachable != handle.is_online() {
                    tracing::info!(online = reachable, "connectivity changed");
                }
                handle.set_online(reachable);
            }
        })
    }
}

impl Default for Connectivity {
    fn default() -> Self {
        Self::new(true)
    }
}
