use std::path::Path;
use std::time::Duration;
use std::{fs, io};

use serde::{Deserialize, Serialize};

use crate::{MAX_TIMESTAMP, Timestamp};

/// Number of sync requests allowed in flight at once.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(from = "usize", into = "usize")]
pub struct SyncConcurrency(usize);

impl Default for SyncConcurrency {
    fn default() -> Self {
        Self(4)
    }
}

impl From<usize> for SyncConcurrency {
    fn from(value: usize) -> Self {
        SyncConcurrency(value.max(1))
    }
}

impl From<SyncConcurrency> for usize {
    fn from(value: SyncConcurrency) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Endpoints {
    pub graph: String,
    pub hover: String,
    pub content: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            graph: "ajax_graph.py".to_string(),
            hover: "ajax_graph_hover.py".to_string(),
            content: "ajax_render_graph_content.py".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    pub base_url: String,
    pub endpoints: Endpoints,
    /// Quiet period after a request during which interaction is ignored.
    pub cooldown_ms: u64,
    /// Delay between the last wheel step and syncing the other graphs.
    pub wheel_sync_delay_ms: u64,
    pub sync_concurrency: SyncConcurrency,
    pub reload_pause_secs: u64,
    pub zoom_step: f64,
    pub min_time_span: f64,
    /// Zooming in stops once the first curve has this many points or fewer.
    pub min_zoom_points: usize,
    pub max_timestamp: Timestamp,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost/".to_string(),
            endpoints: Endpoints::default(),
            cooldown_ms: 100,
            wheel_sync_delay_ms: 500,
            sync_concurrency: SyncConcurrency::default(),
            reload_pause_secs: 60,
            zoom_step: 1.1,
            min_time_span: 120.0,
            min_zoom_points: 10,
            max_timestamp: MAX_TIMESTAMP,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads the config file, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self, Error> {
        match fs::read_to_string(path) {
            Ok(json) => Self::from_json(&json),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::info!("No engine config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn wheel_sync_delay(&self) -> Duration {
        Duration::from_millis(self.wheel_sync_delay_ms)
    }

    pub fn reload_pause(&self) -> Duration {
        Duration::from_secs(self.reload_pause_secs)
    }

    pub fn concurrency(&self) -> usize {
        self.sync_concurrency.into()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
