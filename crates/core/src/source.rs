//! Parsed presentation tree, as produced by the external document parser.
//!
//! These types are read-only inputs to conversion. Field names follow the
//! camelCase JSON shape emitted by common pptx-to-JSON parsers so a parsed
//! tree can be loaded with `serde_json` directly.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A parsed presentation document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDocument {
    /// Slide size in source units (points).
    pub size: SlideSize,

    /// Theme color palette, in declaration order.
    #[serde(default)]
    pub theme_colors: Vec<String>,

    /// Slides in presentation order.
    #[serde(default)]
    pub slides: Vec<SourceSlide>,
}

/// Width and height of a slide.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlideSize {
    pub width: f64,
    pub height: f64,
}

/// A single parsed slide.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSlide {
    /// Background descriptor.
    #[serde(default)]
    pub fill: Option<SourceFill>,

    /// Elements placed directly on the slide.
    #[serde(default)]
    pub elements: Vec<SourceElement>,

    /// Elements inherited from the slide layout and master.
    #[serde(default)]
    pub layout_elements: Vec<SourceElement>,

    /// Speaker notes.
    #[serde(default)]
    pub note: String,
}

/// Fill of a slide background or shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum SourceFill {
    Color(String),
    Image(ImageFill),
    Gradient(GradientFill),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageFill {
    pub pic_base64: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradientFill {
    /// `line` for linear gradients, anything else is radial.
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub rot: f64,
    #[serde(default)]
    pub colors: Vec<GradientStop>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Stop position, usually a percentage string such as `"50%"`.
    pub pos: String,
    pub color: String,
}

/// Geometry shared by every element kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub rotate: f64,
    #[serde(default, rename = "isFlipH")]
    pub flip_h: bool,
    #[serde(default, rename = "isFlipV")]
    pub flip_v: bool,
    #[serde(default)]
    pub order: i64,
}

/// Outline description shared by text, image, shape, and line elements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceBorder {
    #[serde(default)]
    pub border_color: Option<String>,
    #[serde(default)]
    pub border_width: Option<f64>,
    #[serde(default)]
    pub border_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceShadow {
    pub h: f64,
    pub v: f64,
    pub blur: f64,
    pub color: String,
}

/// An element of a parsed slide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceElement {
    #[serde(flatten)]
    pub frame: Frame,

    #[serde(flatten)]
    pub kind: SourceKind,
}

/// Kind-specific payload of a parsed element.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SourceKind {
    Text(TextSource),
    Image(ImageSource),
    /// Formula rendered to a bitmap.
    Math(MathSource),
    Audio(MediaSource),
    Video(MediaSource),
    Shape(ShapeSource),
    Table(TableSource),
    Chart(ChartSource),
    Group(GroupSource),
    Diagram(GroupSource),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSource {
    /// Rich HTML-like markup with inline `font-size: <n>pt` styles.
    pub content: String,
    #[serde(default)]
    pub fill: Option<SourceFill>,
    #[serde(flatten)]
    pub border: SourceBorder,
    #[serde(default)]
    pub shadow: Option<SourceShadow>,
    #[serde(default)]
    pub is_vertical: bool,
    #[serde(default)]
    pub v_align: Option<String>,
    #[serde(default)]
    pub auto_fit: Option<AutoFit>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoFit {
    /// `shape` when the text box resizes with its shape.
    #[serde(rename = "type")]
    pub kind: String,
    /// Font scale percentage (100 = unscaled).
    #[serde(default)]
    pub font_scale: Option<f64>,
}

impl AutoFit {
    pub fn is_shape(&self) -> bool {
        self.kind == "shape"
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSource {
    pub src: String,
    /// Crop insets as percentages per side.
    #[serde(default)]
    pub rect: Option<CropRect>,
    /// Geometry preset the picture is clipped to.
    #[serde(default)]
    pub geom: Option<String>,
    #[serde(flatten)]
    pub border: SourceBorder,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    #[serde(default)]
    pub t: Option<f64>,
    #[serde(default)]
    pub b: Option<f64>,
    #[serde(default)]
    pub l: Option<f64>,
    #[serde(default)]
    pub r: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MathSource {
    pub pic_base64: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaSource {
    /// Media reference (object URL or embedded data).
    pub blob: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeSource {
    /// Geometry preset name (`rect`, `roundRect`, `custom`, `line`,
    /// `bentConnector3`, ...).
    #[serde(rename = "shapType")]
    pub shape_type: String,
    /// Raw SVG path for custom geometry.
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub fill: Option<SourceFill>,
    #[serde(flatten)]
    pub border: SourceBorder,
    #[serde(default)]
    pub shadow: Option<SourceShadow>,
    /// Embedded text markup.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub v_align: Option<String>,
}

impl ShapeSource {
    /// Lines and connectors are translated as line elements, not shapes.
    pub fn is_line(&self) -> bool {
        self.shape_type == "line" || self.shape_type.contains("Connector")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSource {
    /// Cell grid, row-major.
    pub data: Vec<Vec<SourceCell>>,
    #[serde(default)]
    pub borders: CellBorders,
    /// Absolute column widths.
    #[serde(default)]
    pub col_widths: Vec<f64>,
    /// Absolute row heights.
    #[serde(default)]
    pub row_heights: Vec<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceCell {
    /// Cell markup.
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub row_span: Option<u32>,
    #[serde(default)]
    pub col_span: Option<u32>,
    #[serde(default)]
    pub fill_color: Option<String>,
    #[serde(default)]
    pub font_color: Option<String>,
    #[serde(default)]
    pub font_bold: Option<bool>,
    #[serde(default)]
    pub borders: CellBorders,
}

/// Border definitions per side; a side is `None` when not defined.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellBorders {
    #[serde(default)]
    pub top: Option<SourceBorder>,
    #[serde(default)]
    pub bottom: Option<SourceBorder>,
    #[serde(default)]
    pub left: Option<SourceBorder>,
    #[serde(default)]
    pub right: Option<SourceBorder>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSource {
    /// Source subtype such as `barChart`, `pie3DChart`, `doughnutChart`.
    pub chart_type: String,
    pub data: ChartData,
    #[serde(default)]
    pub colors: Vec<String>,
    /// `bar` for horizontal bars, `col` for vertical.
    #[serde(default)]
    pub bar_dir: Option<String>,
    /// `clustered`, `stacked`, `percentStacked`, `standard`.
    #[serde(default)]
    pub grouping: Option<String>,
}

/// Chart payload: category series or a raw coordinate matrix.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChartData {
    Series(Vec<ChartSeries>),
    Matrix(Vec<Vec<f64>>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSeries {
    /// Series name.
    pub key: String,
    pub values: Vec<ChartPoint>,
    /// Category labels keyed by index.
    #[serde(default)]
    pub xlabels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChartPoint {
    #[serde(default)]
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupSource {
    /// Children positioned relative to the group's origin.
    #[serde(default)]
    pub elements: Vec<SourceElement>,
}
