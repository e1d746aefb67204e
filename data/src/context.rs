//! Request context carried by every graph.
//!
//! An [`AjaxContext`] is everything the backend needs to re-render one graph:
//! the recipe, the data range, the render configuration and the display id.
//! It doubles as the identity key used by the [`Registry`](crate::Registry).

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::Timestamp;

/// Opaque graph definition, only ever compared and echoed back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GraphRecipe(pub serde_json::Value);

impl GraphRecipe {
    pub fn specification(&self) -> Option<&serde_json::Value> {
        self.0.get("specification")
    }
}

/// A sampling step: either seconds or a symbolic name such as `"auto"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Step {
    Seconds(f64),
    Named(String),
}

impl Default for Step {
    fn default() -> Self {
        Step::Named("auto".to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphDataRange {
    pub time_range: (Timestamp, Timestamp),
    #[serde(default)]
    pub step: Step,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical_range: Option<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AjaxContext {
    #[serde(default)]
    pub graph_id: String,
    pub definition: GraphRecipe,
    pub data_range: GraphDataRange,
    pub render_config: RenderConfig,
    #[serde(default)]
    pub display_id: String,
}

impl AjaxContext {
    /// Two contexts describe the same graph when specification, render config
    /// and display id all match.
    pub fn same_graph(&self, other: &AjaxContext) -> bool {
        self.definition.specification() == other.definition.specification()
            && self.render_config == other.render_config
            && self.display_id == other.display_id
    }
}

/// Aggregation applied when the backend downsamples to the requested step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsolidationFunction {
    Min,
    Max,
    Average,
}

impl ConsolidationFunction {
    pub fn as_str(self) -> &'static str {
        match self {
            ConsolidationFunction::Min => "min",
            ConsolidationFunction::Max => "max",
            ConsolidationFunction::Average => "average",
        }
    }
}

/// What happens when a graph is clicked without dragging.
///
/// Resolved against a fixed set of handlers on the engine side; nothing in
/// here is ever executed as code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClickAction {
    Navigate {
        url: String,
    },
    Callback {
        name: String,
        #[serde(default)]
        args: Vec<serde_json::Value>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleFormat {
    pub plain: bool,
    pub add_host_name: bool,
    pub add_host_alias: bool,
    pub add_service_description: bool,
}

impl Default for TitleFormat {
    fn default() -> Self {
        Self {
            plain: false,
            add_host_name: true,
            add_host_alias: false,
            add_service_description: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShowTitle {
    Hidden,
    #[default]
    Shown,
    Inline,
}

impl Serialize for ShowTitle {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ShowTitle::Hidden => serializer.serialize_bool(false),
            ShowTitle::Shown => serializer.serialize_bool(true),
            ShowTitle::Inline => serializer.serialize_str("inline"),
        }
    }
}

impl<'de> Deserialize<'de> for ShowTitle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Tag(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Flag(true) => Ok(ShowTitle::Shown),
            Raw::Flag(false) => Ok(ShowTitle::Hidden),
            Raw::Tag(tag) if tag == "inline" => Ok(ShowTitle::Inline),
            Raw::Tag(tag) => Err(serde::de::Error::custom(format!(
                "Invalid show_title: {tag}"
            ))),
        }
    }
}

/// Width of the vertical axis gutter, `"fixed"` or `["explicit", pt]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum VerticalAxisWidth {
    #[default]
    Fixed,
    Explicit(f64),
}

impl Serialize for VerticalAxisWidth {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            VerticalAxisWidth::Fixed => serializer.serialize_str("fixed"),
            VerticalAxisWidth::Explicit(pt) => ("explicit", pt).serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for VerticalAxisWidth {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Tag(String),
            Tagged(String, f64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Tag(tag) if tag == "fixed" => Ok(VerticalAxisWidth::Fixed),
            Raw::Tagged(tag, pt) if tag == "explicit" => Ok(VerticalAxisWidth::Explicit(pt)),
            Raw::Tag(tag) | Raw::Tagged(tag, _) => Err(serde::de::Error::custom(format!(
                "Invalid vertical_axis_width: {tag}"
            ))),
        }
    }
}

/// Immutable per-graph render settings. Replaced as a whole, never patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub border_width: f64,
    pub color_gradient: f64,
    pub editing: bool,
    pub explicit_title: Option<String>,
    pub fixed_timerange: bool,
    /// In pt.
    pub font_size: f64,
    pub foreground_color: String,
    pub interaction: bool,
    pub onclick: Option<ClickAction>,
    pub preview: bool,
    pub resizable: bool,
    pub show_controls: bool,
    pub show_graph_time: bool,
    pub show_legend: bool,
    pub show_margin: bool,
    pub show_pin: bool,
    pub show_time_axis: bool,
    pub show_time_range_previews: bool,
    pub show_title: ShowTitle,
    pub show_vertical_axis: bool,
    /// In ex units, as configured by the user.
    pub size: (i64, i64),
    pub title_format: TitleFormat,
    pub vertical_axis_width: VerticalAxisWidth,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            border_width: 2.0,
            color_gradient: 20.0,
            editing: false,
            explicit_title: None,
            fixed_timerange: false,
            font_size: 8.0,
            foreground_color: "#000000".to_string(),
            interaction: true,
            onclick: None,
            preview: false,
            resizable: true,
            show_controls: true,
            show_graph_time: true,
            show_legend: true,
            show_margin: true,
            show_pin: true,
            show_time_axis: true,
            show_time_range_previews: true,
            show_title: ShowTitle::Shown,
            show_vertical_axis: true,
            size: (70, 16),
            title_format: TitleFormat::default(),
            vertical_axis_width: VerticalAxisWidth::Fixed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertical_axis_width_accepts_both_shapes() {
        let fixed: VerticalAxisWidth = serde_json::from_str(r#""fixed""#).unwrap();
        assert_eq!(fixed, VerticalAxisWidth::Fixed);

        let explicit: VerticalAxisWidth = serde_json::from_str(r#"["explicit", 40.5]"#).unwrap();
        assert_eq!(explicit, VerticalAxisWidth::Explicit(40.5));

        assert!(serde_json::from_str::<VerticalAxisWidth>(r#""wide""#).is_err());
    }

    #[test]
    fn show_title_roundtrips_inline_tag() {
        let inline: ShowTitle = serde_json::from_str(r#""inline""#).unwrap();
        assert_eq!(inline, ShowTitle::Inline);
        assert_eq!(serde_json::to_string(&ShowTitle::Hidden).unwrap(), "false");
    }

    #[test]
    fn click_action_is_a_typed_descriptor() {
        let action: ClickAction =
            serde_json::from_str(r#"{"kind": "navigate", "url": "view.py?host=a"}"#).unwrap();
        assert_eq!(
            action,
            ClickAction::Navigate {
                url: "view.py?host=a".to_string()
            }
        );

        let callback: ClickAction =
            serde_json::from_str(r#"{"kind": "callback", "name": "select_dashlet"}"#).unwrap();
        assert!(matches!(callback, ClickAction::Callback { args, .. } if args.is_empty()));
    }

    #[test]
    fn same_graph_ignores_data_range() {
        let a = AjaxContext {
            definition: GraphRecipe(serde_json::json!({"specification": {"id": "cpu"}})),
            ..AjaxContext::default()
        };
        let mut b = a.clone();
        b.data_range.time_range = (10.0, 500.0);
        assert!(a.same_graph(&b));

        b.display_id = "dashlet_3".to_string();
        assert!(!a.same_graph(&b));
    }
}
