//! Editor slide model produced by conversion.
//!
//! Every element is flat and absolutely positioned in viewport pixels;
//! groups never survive conversion.

use serde::{Deserialize, Serialize};

/// A converted deck ready to be committed to the editor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub slides: Vec<Slide>,
    pub theme: Theme,
    /// Viewport width in pixels.
    pub viewport_width: f64,
    /// Viewport height divided by width.
    pub viewport_ratio: f64,
}

impl Deck {
    /// Viewport height in pixels.
    pub fn viewport_height(&self) -> f64 {
        self.viewport_width * self.viewport_ratio
    }
}

/// Theme defaults applied to converted elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub theme_colors: Vec<String>,
    pub font_name: String,
    pub font_color: String,
}

impl Theme {
    /// First theme color, or black when the palette is empty.
    pub fn accent(&self) -> &str {
        self.theme_colors.first().map(String::as_str).unwrap_or("#000")
    }
}

/// A converted slide.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub id: String,
    pub elements: Vec<SlideElement>,
    pub background: Background,
    /// Speaker notes.
    pub remark: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<SlideRole>,
}

impl Slide {
    /// Iterate over the text elements of this slide with their indices.
    pub fn text_elements(&self) -> impl Iterator<Item = (usize, &TextElement)> {
        self.elements
            .iter()
            .enumerate()
            .filter_map(|(idx, el)| el.as_text().map(|text| (idx, text)))
    }

    /// Whether any text element on this slide carries the given tag.
    pub fn has_text_role(&self, role: TextRole) -> bool {
        self.text_elements()
            .any(|(_, text)| text.text_type == Some(role))
    }
}

/// Template role of a whole slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SlideRole {
    Cover,
    Contents,
    Transition,
    Content,
    End,
}

impl SlideRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlideRole::Cover => "cover",
            SlideRole::Contents => "contents",
            SlideRole::Transition => "transition",
            SlideRole::Content => "content",
            SlideRole::End => "end",
        }
    }
}

/// Semantic slot of a text element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextRole {
    Title,
    Content,
    Item,
    ItemTitle,
    ItemNumber,
    PartNumber,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Background {
    Solid {
        color: String,
    },
    Image {
        src: String,
        size: String,
    },
    Gradient {
        gradient: Gradient,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gradient {
    #[serde(rename = "type")]
    pub kind: GradientKind,
    pub colors: Vec<GradientColor>,
    pub rotate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GradientKind {
    Linear,
    Radial,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientColor {
    pub pos: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    pub width: f64,
    pub color: String,
    pub style: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub h: f64,
    pub v: f64,
    pub blur: f64,
    pub color: String,
}

/// Absolute position and size in viewport pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub rotate: f64,
}

/// A converted element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SlideElement {
    Text(TextElement),
    Image(ImageElement),
    Shape(ShapeElement),
    Line(LineElement),
    Table(TableElement),
    Chart(ChartElement),
    Audio(AudioElement),
    Video(VideoElement),
}

impl SlideElement {
    pub fn id(&self) -> &str {
        match self {
            SlideElement::Text(el) => &el.id,
            SlideElement::Image(el) => &el.id,
            SlideElement::Shape(el) => &el.id,
            SlideElement::Line(el) => &el.id,
            SlideElement::Table(el) => &el.id,
            SlideElement::Chart(el) => &el.id,
            SlideElement::Audio(el) => &el.id,
            SlideElement::Video(el) => &el.id,
        }
    }

    pub fn set_id(&mut self, id: String) {
        match self {
            SlideElement::Text(el) => el.id = id,
            SlideElement::Image(el) => el.id = id,
            SlideElement::Shape(el) => el.id = id,
            SlideElement::Line(el) => el.id = id,
            SlideElement::Table(el) => el.id = id,
            SlideElement::Chart(el) => el.id = id,
            SlideElement::Audio(el) => el.id = id,
            SlideElement::Video(el) => el.id = id,
        }
    }

    pub fn as_text(&self) -> Option<&TextElement> {
        match self {
            SlideElement::Text(el) => Some(el),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextElement> {
        match self {
            SlideElement::Text(el) => Some(el),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    pub id: String,
    #[serde(flatten)]
    pub placement: Placement,
    /// Rich markup with pixel font sizes.
    pub content: String,
    pub default_font_name: String,
    pub default_color: String,
    pub line_height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline: Option<Outline>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,
    #[serde(default)]
    pub vertical: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_type: Option<TextRole>,
    /// Links item/itemTitle/itemNumber elements of one row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClipShape {
    Rect,
    RoundRect,
    Ellipse,
    Triangle,
    Rhombus,
    Pentagon,
    Hexagon,
    Heptagon,
    Octagon,
    Parallelogram,
    Trapezoid,
}

impl ClipShape {
    /// Map a geometry preset name to a supported clip shape.
    pub fn from_preset(name: &str) -> Option<Self> {
        let shape = match name {
            "rect" => ClipShape::Rect,
            "roundRect" => ClipShape::RoundRect,
            "ellipse" => ClipShape::Ellipse,
            "triangle" => ClipShape::Triangle,
            "rhombus" => ClipShape::Rhombus,
            "pentagon" => ClipShape::Pentagon,
            "hexagon" => ClipShape::Hexagon,
            "heptagon" => ClipShape::Heptagon,
            "octagon" => ClipShape::Octagon,
            "parallelogram" => ClipShape::Parallelogram,
            "trapezoid" => ClipShape::Trapezoid,
            _ => return None,
        };
        Some(shape)
    }
}

/// Clip region as percentage corners `[[left, top], [right, bottom]]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageClip {
    pub shape: ClipShape,
    pub range: [[f64; 2]; 2],
}

impl ImageClip {
    /// The whole picture, clipped to `shape`.
    pub fn uncropped(shape: ClipShape) -> Self {
        Self {
            shape,
            range: [[0.0, 0.0], [100.0, 100.0]],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageElement {
    pub id: String,
    #[serde(flatten)]
    pub placement: Placement,
    pub src: String,
    pub fixed_ratio: bool,
    pub flip_h: bool,
    pub flip_v: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline: Option<Outline>,
    pub clip: ImageClip,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeText {
    pub content: String,
    pub default_font_name: String,
    pub default_color: String,
    /// Vertical alignment: `top`, `middle`, or `bottom`.
    pub align: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeElement {
    pub id: String,
    #[serde(flatten)]
    pub placement: Placement,
    pub view_box: [f64; 2],
    pub path: String,
    /// Solid fill color, empty for none.
    pub fill: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient: Option<Gradient>,
    /// Image used as a pattern fill.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    pub fixed_ratio: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline: Option<Outline>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<ShapeText>,
    #[serde(default)]
    pub flip_h: bool,
    #[serde(default)]
    pub flip_v: bool,
    /// Name of the parametric formula regenerating `path` on resize.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_formula: Option<String>,
    /// Control-point values fed to an editable formula.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keypoints: Option<Vec<f64>>,
    /// Path taken verbatim from the source rather than the shape library.
    #[serde(default)]
    pub special: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LinePoint {
    #[serde(rename = "")]
    None,
    Arrow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineElement {
    pub id: String,
    pub left: f64,
    pub top: f64,
    /// Stroke width.
    pub width: f64,
    pub start: [f64; 2],
    pub end: [f64; 2],
    pub style: String,
    pub color: String,
    /// Markers at `[start, end]`.
    pub points: [LinePoint; 2],
    /// Right-angle bend control point.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broken2: Option<[f64; 2]>,
    /// Cubic curve control points.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cubic: Option<[[f64; 2]; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCellStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backcolor: Option<String>,
    pub align: String,
    /// Font size with unit, e.g. `"18.7px"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fontsize: Option<String>,
    pub fontname: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    pub id: String,
    pub colspan: u32,
    pub rowspan: u32,
    pub text: String,
    pub style: TableCellStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableElement {
    pub id: String,
    #[serde(flatten)]
    pub placement: Placement,
    /// Column widths as fractions of the table width.
    pub col_widths: Vec<f64>,
    pub cell_min_height: f64,
    pub data: Vec<Vec<TableCell>>,
    pub outline: Outline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartKind {
    Bar,
    Column,
    Line,
    Area,
    Scatter,
    Pie,
    Radar,
    Ring,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartValues {
    pub labels: Vec<String>,
    pub legends: Vec<String>,
    pub series: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartOptions {
    #[serde(default)]
    pub stack: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartElement {
    pub id: String,
    #[serde(flatten)]
    pub placement: Placement,
    pub chart_type: ChartKind,
    pub data: ChartValues,
    pub options: ChartOptions,
    pub theme_colors: Vec<String>,
    pub text_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioElement {
    pub id: String,
    #[serde(flatten)]
    pub placement: Placement,
    pub src: String,
    #[serde(rename = "loop")]
    pub looping: bool,
    pub autoplay: bool,
    pub fixed_ratio: bool,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoElement {
    pub id: String,
    #[serde(flatten)]
    pub placement: Placement,
    pub src: String,
    pub autoplay: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_accent_falls_back_to_black() {
        let mut theme = Theme {
            theme_colors: vec![],
            font_name: "Arial".into(),
            font_color: "#333".into(),
        };
        assert_eq!(theme.accent(), "#000");
        theme.theme_colors.push("#5b9bd5".into());
        assert_eq!(theme.accent(), "#5b9bd5");
    }

    #[test]
    fn test_clip_shape_from_preset() {
        assert_eq!(ClipShape::from_preset("ellipse"), Some(ClipShape::Ellipse));
        assert_eq!(ClipShape::from_preset("heptagon"), Some(ClipShape::Heptagon));
        assert_eq!(ClipShape::from_preset("star5"), None);
    }

    #[test]
    fn test_element_serializes_with_type_tag() {
        let el = SlideElement::Video(VideoElement {
            id: "abc".into(),
            placement: Placement::default(),
            src: "movie.mp4".into(),
            autoplay: false,
        });
        let json = serde_json::to_value(&el).unwrap();
        assert_eq!(json["type"], "video");
        assert_eq!(json["id"], "abc");
        assert_eq!(json["left"], 0.0);
    }

    #[test]
    fn test_line_point_serializes_empty() {
        let json = serde_json::to_string(&[LinePoint::None, LinePoint::Arrow]).unwrap();
        assert_eq!(json, r#"["","arrow"]"#);
    }
}
