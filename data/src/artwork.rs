//! Render-ready description of one graph as delivered by the backend.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::context::{AjaxContext, GraphRecipe, RenderConfig, Step};
use crate::registry::GraphId;
use crate::{InternalError, Timestamp};

/// A sample that may be missing. `None` marks a gap in the series.
pub type SeriesValue = Option<f64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineType {
    #[serde(rename = "line")]
    Line,
    #[serde(rename = "-line")]
    MirroredLine,
    #[serde(rename = "area")]
    Area,
    #[serde(rename = "-area")]
    MirroredArea,
    #[serde(rename = "stack")]
    Stack,
    #[serde(rename = "-stack")]
    MirroredStack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveKind {
    Line,
    Area,
    Stack,
}

impl LineType {
    pub fn kind(self) -> CurveKind {
        match self {
            LineType::Line | LineType::MirroredLine => CurveKind::Line,
            LineType::Area | LineType::MirroredArea => CurveKind::Area,
            LineType::Stack | LineType::MirroredStack => CurveKind::Stack,
        }
    }
}

/// Scalar samples for lines, `[lower, upper]` pairs for areas and stacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Points {
    Scalar(Vec<SeriesValue>),
    Ranged(Vec<(SeriesValue, SeriesValue)>),
}

impl Points {
    pub fn len(&self) -> usize {
        match self {
            Points::Scalar(points) => points.len(),
            Points::Ranged(points) => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Points {
    fn default() -> Self {
        Points::Scalar(Vec::new())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    pub line_type: LineType,
    pub points: Points,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub title: Option<String>,
    /// `#rrggbb`, optionally followed by a two digit alpha (`#rrggbbaa`).
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeAxisLabel {
    pub position: Timestamp,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(rename = "line_width", default)]
    pub gridline_weight: u8,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeAxis {
    #[serde(default)]
    pub labels: Vec<TimeAxisLabel>,
    pub range: (Timestamp, Timestamp),
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerticalAxisLabel {
    pub position: f64,
    pub text: String,
    #[serde(rename = "line_width", default)]
    pub gridline_weight: u8,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VerticalAxis {
    pub range: (f64, f64),
    #[serde(default)]
    pub axis_label: Option<String>,
    #[serde(default)]
    pub labels: Vec<VerticalAxisLabel>,
    #[serde(default)]
    pub max_label_length: Option<usize>,
}

/// Threshold line such as warn or crit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HorizontalRule {
    pub value: f64,
    #[serde(default)]
    pub rendered_value: String,
    pub color: String,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ExplicitVerticalRange {
    Fixed { min: Option<f64>, max: Option<f64> },
    Minimal { min: Option<f64>, max: Option<f64> },
}

/// Pixel geometry computed while rendering and reused to map pointer
/// positions back into the time/value domain.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlotLayout {
    pub time_origin: f64,
    pub vertical_origin: f64,
    pub pixels_per_second: f64,
    pub pixels_per_unit: f64,
    pub vertical_axis_width: f64,
    pub bottom_border: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphArtwork {
    #[serde(default)]
    pub id: GraphId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ajax_context: Option<AjaxContext>,
    #[serde(default)]
    pub render_config: RenderConfig,

    #[serde(default)]
    pub title: Option<String>,
    /// Canvas pixels, twice the logical size.
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub mirrored: bool,

    pub curves: Vec<Curve>,
    #[serde(default)]
    pub horizontal_rules: Vec<HorizontalRule>,
    pub vertical_axis: VerticalAxis,
    pub time_axis: TimeAxis,
    #[serde(default)]
    pub mark_requested_end_time: bool,

    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub step: f64,
    #[serde(default)]
    pub explicit_vertical_range: Option<ExplicitVerticalRange>,
    #[serde(default)]
    pub requested_vrange: Option<(f64, f64)>,
    pub requested_start_time: Timestamp,
    pub requested_end_time: Timestamp,
    #[serde(default)]
    pub requested_step: Step,
    #[serde(default)]
    pub pin_time: Option<Timestamp>,

    #[serde(default)]
    pub definition: GraphRecipe,
    #[serde(default)]
    pub display_id: String,

    #[serde(skip)]
    pub layout: Option<PlotLayout>,
}

impl GraphArtwork {
    /// Attaches identity and request context, taking the render config from
    /// the context as the authoritative one.
    pub fn bind(mut self, id: GraphId, mut context: AjaxContext) -> Self {
        context.graph_id = id.to_string();
        self.render_config = context.render_config.clone();
        self.ajax_context = Some(context);
        self.id = id;
        self
    }

    pub fn context(&self) -> Result<&AjaxContext, InternalError> {
        self.ajax_context
            .as_ref()
            .ok_or_else(|| InternalError::MissingContext(self.id.to_string()))
    }

    /// Number of samples in the first curve, used to refuse zooming in too far.
    pub fn first_curve_points(&self) -> Option<usize> {
        self.curves.first().map(|curve| curve.points.len())
    }

    /// Synthetic 800x400 artwork with one sine curve over the given range.
    #[cfg(any(test, feature = "test-support"))]
    pub fn sample(start_time: Timestamp, end_time: Timestamp, step: f64) -> Self {
        let samples = ((end_time - start_time) / step).max(0.0) as usize * 2;
        let points = (0..samples)
            .map(|i| Some(((i as f64) * 0.3).sin() * 40.0 + 50.0))
            .collect();

        Self {
            id: GraphId::default(),
            ajax_context: None,
            render_config: RenderConfig::default(),
            title: Some("Sample".to_string()),
            width: 800.0,
            height: 400.0,
            mirrored: false,
            curves: vec![Curve {
                line_type: LineType::Line,
                points: Points::Scalar(points),
                attributes: BTreeMap::new(),
                title: Some("sample".to_string()),
                color: "#00d1ff".to_string(),
            }],
            horizontal_rules: Vec::new(),
            vertical_axis: VerticalAxis {
                range: (0.0, 100.0),
                labels: (0..=4)
                    .map(|i| VerticalAxisLabel {
                        position: f64::from(i) * 25.0,
                        text: format!("{}", i * 25),
                        gridline_weight: 1,
                    })
                    .collect(),
                ..VerticalAxis::default()
            },
            time_axis: TimeAxis {
                labels: Vec::new(),
                range: (start_time, end_time),
                title: String::new(),
            },
            mark_requested_end_time: false,
            start_time,
            end_time,
            step,
            explicit_vertical_range: None,
            requested_vrange: None,
            requested_start_time: start_time,
            requested_end_time: end_time,
            requested_step: Step::Seconds(step),
            pin_time: None,
            definition: GraphRecipe::default(),
            display_id: String::new(),
            layout: None,
        }
    }
}
