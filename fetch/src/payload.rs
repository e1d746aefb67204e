//! Form-encoded request bodies for the graph endpoints.
//!
//! Every refresh carries the full [`AjaxContext`] as JSON in the `context`
//! field plus the fields of exactly one action.

use data::context::{ConsolidationFunction, GraphDataRange, GraphRecipe, RenderConfig};
use data::{AjaxContext, Timestamp};

use crate::FetchError;

pub type FormFields = Vec<(&'static str, String)>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    pub start: Timestamp,
    pub end: Timestamp,
    pub step: f64,
}

impl TimeWindow {
    pub fn span(&self) -> f64 {
        self.end - self.start
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Action {
    Window {
        window: TimeWindow,
        vertical_range: Option<(f64, f64)>,
    },
    Pin {
        window: TimeWindow,
        pin: i64,
    },
    Consolidation {
        window: TimeWindow,
        function: ConsolidationFunction,
    },
    Resize {
        dx: f64,
        dy: f64,
    },
}

/// Request for an authoritative re-render of one graph.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphRequest {
    pub context: AjaxContext,
    action: Action,
}

impl GraphRequest {
    pub fn window(
        context: AjaxContext,
        window: TimeWindow,
        vertical_range: Option<(f64, f64)>,
    ) -> Self {
        Self {
            context,
            action: Action::Window {
                window,
                vertical_range,
            },
        }
    }

    /// `pin = -1` removes the pin.
    pub fn pin(context: AjaxContext, window: TimeWindow, pin: i64) -> Self {
        Self {
            context,
            action: Action::Pin { window, pin },
        }
    }

    pub fn consolidation(
        context: AjaxContext,
        window: TimeWindow,
        function: ConsolidationFunction,
    ) -> Self {
        Self {
            context,
            action: Action::Consolidation { window, function },
        }
    }

    /// Pixel deltas of a resize gesture, in logical pixels.
    pub fn resize(context: AjaxContext, dx: f64, dy: f64) -> Self {
        Self {
            context,
            action: Action::Resize { dx, dy },
        }
    }

    pub fn time_window(&self) -> Option<TimeWindow> {
        match self.action {
            Action::Window { window, .. }
            | Action::Pin { window, .. }
            | Action::Consolidation { window, .. } => Some(window),
            Action::Resize { .. } => None,
        }
    }

    pub fn vertical_range(&self) -> Option<(f64, f64)> {
        match self.action {
            Action::Window { vertical_range, .. } => vertical_range,
            _ => None,
        }
    }

    pub fn form(&self) -> Result<FormFields, FetchError> {
        let mut fields = vec![("context", serde_json::to_string(&self.context)?)];

        if let Some(window) = self.time_window() {
            fields.push(("start_time", window.start.to_string()));
            fields.push(("end_time", window.end.to_string()));
            fields.push(("step", window.step.to_string()));
        }

        match &self.action {
            Action::Window {
                vertical_range: Some((from, to)),
                ..
            } => {
                fields.push(("range_from", from.to_string()));
                fields.push(("range_to", to.to_string()));
            }
            Action::Window { .. } => {}
            Action::Pin { pin, .. } => fields.push(("pin", pin.to_string())),
            Action::Consolidation { function, .. } => {
                fields.push(("consolidation_function", function.as_str().to_string()));
            }
            Action::Resize { dx, dy } => {
                fields.push(("resize_x", dx.to_string()));
                fields.push(("resize_y", dy.to_string()));
            }
        }

        Ok(fields)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HoverRequest {
    pub context: AjaxContext,
    pub hover_time: i64,
}

impl HoverRequest {
    pub fn form(&self) -> Result<FormFields, FetchError> {
        Ok(vec![
            ("context", serde_json::to_string(&self.context)?),
            ("hover_time", self.hover_time.to_string()),
        ])
    }
}

/// First load of a graph placeholder. `placeholder` is the token the host
/// handed out for the container and is echoed back to the caller untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadRequest {
    pub placeholder: String,
    pub recipe: GraphRecipe,
    pub data_range: GraphDataRange,
    pub render_config: RenderConfig,
    pub display_id: String,
}

impl LoadRequest {
    pub fn form(&self) -> Result<FormFields, FetchError> {
        let request = serde_json::json!({
            "graph_recipe": self.recipe,
            "graph_data_range": self.data_range,
            "graph_render_config": self.render_config,
            "graph_display_id": self.display_id,
        });
        Ok(vec![("request", serde_json::to_string(&request)?)])
    }
}
