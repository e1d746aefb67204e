pub mod artwork;
pub mod color;
pub mod config;
pub mod context;
pub mod log;
pub mod registry;
pub mod transform;

use std::path::PathBuf;

pub use artwork::{Curve, CurveKind, GraphArtwork, HorizontalRule, LineType, PlotLayout, Points};
pub use config::EngineConfig;
pub use context::{
    AjaxContext, ClickAction, ConsolidationFunction, GraphDataRange, GraphRecipe, RenderConfig, Step,
};
pub use registry::{GraphId, Registry};
pub use transform::CoordinateTransform;

/// Seconds since the epoch. Kept as `f64` so zoom math never rounds.
pub type Timestamp = f64;

/// Highest timestamp a graph range may reach (legacy 32-bit ceiling).
pub const MAX_TIMESTAMP: Timestamp = 2_147_483_646.0;

#[derive(thiserror::Error, Debug, Clone)]
pub enum InternalError {
    #[error("Unknown graph: {0}")]
    UnknownGraph(String),
    #[error("Graph {0} has no request context")]
    MissingContext(String),
}

pub fn data_path(path_name: &str) -> PathBuf {
    if let Ok(path) = std::env::var("GRAPHVIEW_DATA_PATH") {
        PathBuf::from(path).join(path_name)
    } else {
        let data_dir = dirs_next::data_dir().unwrap_or_else(|| PathBuf::from("."));
        data_dir.join("graphview").join(path_name)
    }
}
