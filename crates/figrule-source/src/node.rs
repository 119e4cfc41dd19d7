//! Source design tree.
//!
//! Mirrors the subset of the design tool's node JSON that the pipeline reads.
//! Everything except `id`, `name` and `type` is optional; absent data is never
//! an error, it simply produces no style downstream.

use serde::{Deserialize, Serialize};

/// One node of the external design tree.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: SourceNodeType,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SourceNode>,

    /// Auto-layout direction. `null` and `"NONE"` both mean no auto-layout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_mode: Option<LayoutMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_spacing: Option<f64>,
    /// Main-axis distribution of auto-layout children.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_axis_align_items: Option<AxisAlign>,
    /// Cross-axis alignment of auto-layout children.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counter_axis_align_items: Option<AxisAlign>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_top: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_right: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_bottom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_left: Option<f64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fills: Vec<Paint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub strokes: Vec<Paint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<Effect>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
    /// Per-corner radii: top-left, top-right, bottom-right, bottom-left.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rectangle_corner_radii: Option<[f64; 4]>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<f64>,
    /// Text content (text nodes only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characters: Option<String>,
    /// Nested type style, as the REST API reports it for text nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<TypeStyle>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absolute_bounding_box: Option<Rect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Constraints>,
    /// Rotation in radians.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

impl SourceNode {
    /// Absence of the flag means visible.
    pub fn is_visible(&self) -> bool {
        self.visible != Some(false)
    }

    /// Active auto-layout direction, if any.
    pub fn auto_layout(&self) -> Option<LayoutMode> {
        match self.layout_mode {
            Some(LayoutMode::None) | None => None,
            mode => mode,
        }
    }

    pub fn font_size(&self) -> Option<f64> {
        self.font_size
            .or_else(|| self.style.as_ref().and_then(|s| s.font_size))
    }

    pub fn font_family(&self) -> Option<&str> {
        self.font_family
            .as_deref()
            .or_else(|| self.style.as_ref().and_then(|s| s.font_family.as_deref()))
    }

    pub fn font_weight(&self) -> Option<f64> {
        self.font_weight
            .or_else(|| self.style.as_ref().and_then(|s| s.font_weight))
    }

    /// Count of nodes in this subtree, including invisible ones.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(SourceNode::subtree_len).sum::<usize>()
    }
}

/// Node type discriminant as reported by the design tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceNodeType {
    #[default]
    Frame,
    Group,
    Text,
    Rectangle,
    Ellipse,
    Vector,
    Component,
    Instance,
    /// Any type this crate does not know about.
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutMode {
    Horizontal,
    Vertical,
    None,
}

/// Auto-layout alignment along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AxisAlign {
    Min,
    Center,
    Max,
    SpaceBetween,
    Baseline,
    #[serde(other)]
    Other,
}

/// A fill or stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paint {
    #[serde(rename = "type")]
    pub paint_type: PaintType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bound_variables: Option<PaintVariables>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

impl Paint {
    pub fn solid(color: Color) -> Self {
        Self {
            paint_type: PaintType::Solid,
            color: Some(color),
            opacity: None,
            bound_variables: None,
            visible: None,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible != Some(false)
    }

    /// Id of the design token bound to this paint's color, if any.
    pub fn color_token(&self) -> Option<&str> {
        self.bound_variables
            .as_ref()
            .and_then(|v| v.color.as_ref())
            .map(|alias| alias.id.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaintType {
    Solid,
    GradientLinear,
    GradientRadial,
    Image,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaintVariables {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<VariableAlias>,
}

/// Reference from a node property to a design token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableAlias {
    pub id: String,
}

/// RGBA color, each channel in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "opaque")]
    pub a: f64,
}

fn opaque() -> f64 {
    1.0
}

impl Color {
    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }
}

/// A visual effect (shadow or blur).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    #[serde(rename = "type")]
    pub effect_type: EffectType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<Vector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

impl Effect {
    pub fn is_visible(&self) -> bool {
        self.visible != Some(false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectType {
    DropShadow,
    InnerShadow,
    LayerBlur,
    BackgroundBlur,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<f64>,
    /// Letter spacing in px.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height_px: Option<f64>,
    /// Line height as a percentage of the font size (`150` = 1.5).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height_percent_font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align_horizontal: Option<TextAlignHorizontal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextAlignHorizontal {
    Left,
    Center,
    Right,
    Justified,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraints {
    pub horizontal: Constraint,
    pub vertical: Constraint,
}

/// Alignment constraint on one axis.
///
/// The horizontal and vertical variants share one enum; only `Center` drives
/// normalization, the rest are kept for round-tripping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Constraint {
    Left,
    Right,
    Top,
    Bottom,
    Center,
    LeftRight,
    TopBottom,
    Scale,
    #[serde(other)]
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_minimal_node() {
        let node: SourceNode =
            serde_json::from_str(r#"{"id":"1:2","name":"Card","type":"FRAME"}"#).unwrap();
        assert_eq!(node.id, "1:2");
        assert_eq!(node.node_type, SourceNodeType::Frame);
        assert!(node.children.is_empty());
        assert!(node.is_visible());
    }

    #[test]
    fn test_unknown_type_decodes_as_other() {
        let node: SourceNode =
            serde_json::from_str(r#"{"id":"1","name":"S","type":"STICKY"}"#).unwrap();
        assert_eq!(node.node_type, SourceNodeType::Other);
    }

    #[test]
    fn test_layout_mode_none_is_no_auto_layout() {
        let node: SourceNode = serde_json::from_str(
            r#"{"id":"1","name":"F","type":"FRAME","layoutMode":"NONE"}"#,
        )
        .unwrap();
        assert_eq!(node.auto_layout(), None);

        let node: SourceNode = serde_json::from_str(
            r#"{"id":"1","name":"F","type":"FRAME","layoutMode":null}"#,
        )
        .unwrap();
        assert_eq!(node.auto_layout(), None);
    }

    #[test]
    fn test_text_style_fallback() {
        let node: SourceNode = serde_json::from_str(
            r#"{"id":"1","name":"T","type":"TEXT","style":{"fontSize":14,"fontFamily":"Inter"}}"#,
        )
        .unwrap();
        assert_eq!(node.font_size(), Some(14.0));
        assert_eq!(node.font_family(), Some("Inter"));
    }

    #[test]
    fn test_layout_and_type_details() {
        let node: SourceNode = serde_json::from_str(
            r#"{"id":"1","name":"T","type":"TEXT","cornerRadius":4,
                "rectangleCornerRadii":[4,4,0,0],
                "primaryAxisAlignItems":"SPACE_BETWEEN","counterAxisAlignItems":"STRETCH",
                "style":{"fontWeight":600,"letterSpacing":0.5,"lineHeightPx":20,
                         "textAlignHorizontal":"JUSTIFIED"}}"#,
        )
        .unwrap();
        assert_eq!(node.rectangle_corner_radii, Some([4.0, 4.0, 0.0, 0.0]));
        assert_eq!(node.primary_axis_align_items, Some(AxisAlign::SpaceBetween));
        assert_eq!(node.counter_axis_align_items, Some(AxisAlign::Other));
        assert_eq!(node.font_weight(), Some(600.0));
        let style = node.style.unwrap();
        assert_eq!(style.text_align_horizontal, Some(TextAlignHorizontal::Justified));
        assert_eq!(style.line_height_px, Some(20.0));
    }

    #[test]
    fn test_color_alpha_defaults_to_opaque() {
        let paint: Paint =
            serde_json::from_str(r#"{"type":"SOLID","color":{"r":1,"g":0,"b":0}}"#).unwrap();
        assert_eq!(paint.color, Some(Color::rgba(1.0, 0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_paint_color_token() {
        let paint: Paint = serde_json::from_str(
            r#"{"type":"SOLID","color":{"r":0,"g":0,"b":0,"a":1},
                "boundVariables":{"color":{"type":"VARIABLE_ALIAS","id":"VariableID:1:2"}}}"#,
        )
        .unwrap();
        assert_eq!(paint.color_token(), Some("VariableID:1:2"));
    }

    #[test]
    fn test_subtree_len_counts_hidden_nodes() {
        let node: SourceNode = serde_json::from_str(
            r#"{"id":"1","name":"F","type":"FRAME","children":[
                {"id":"2","name":"A","type":"TEXT","visible":false},
                {"id":"3","name":"B","type":"GROUP","children":[{"id":"4","name":"C","type":"VECTOR"}]}
            ]}"#,
        )
        .unwrap();
        assert_eq!(node.subtree_len(), 4);
        assert!(!node.children[0].is_visible());
    }
}
