//! Deck and slide conversion with per-kind element dispatch.

use deck_core::geometry::{flip_group, rotated_child_position, scale_frame, scale_ratio, scale_stroke, FlipAxis};
use deck_core::markup::rescale_font_sizes;
use deck_core::model::{
    AudioElement, Background, Gradient, GradientColor, GradientKind, ImageClip, ImageElement,
    Outline, Placement, Shadow, ShapeElement, ShapeText, TextElement, VideoElement, ClipShape,
};
use deck_core::source::{
    Frame, GradientFill, GroupSource, ImageSource, MediaSource, SourceBorder, SourceFill,
    SourceShadow, TextSource,
};
use deck_core::{new_id, Deck, Slide, SlideElement, SourceDocument, SourceElement, SourceKind, SourceSlide, Theme};

use serde::{Deserialize, Serialize};

use crate::library::RECT_PATH;
use crate::{chart, shape, table};

/// Options controlling conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConvertOptions {
    /// Target viewport width; `None` converts points to pixels instead.
    pub fit_viewport: Option<f64>,
    /// Font applied to text without an explicit family.
    pub font_name: String,
    /// Color applied to text without an explicit color.
    pub font_color: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            fit_viewport: None,
            font_name: "Microsoft YaHei".to_string(),
            font_color: "#333".to_string(),
        }
    }
}

impl ConvertOptions {
    /// Create options with the default fonts and no viewport fitting.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scale slides to a fixed viewport width.
    pub fn with_fit_viewport(mut self, width: f64) -> Self {
        self.fit_viewport = (width > 0.0).then_some(width);
        self
    }

    /// Set the default font name.
    pub fn with_font_name(mut self, name: impl Into<String>) -> Self {
        self.font_name = name.into();
        self
    }

    /// Set the default font color.
    pub fn with_font_color(mut self, color: impl Into<String>) -> Self {
        self.font_color = color.into();
        self
    }
}

/// Per-document state shared by every element translator.
#[derive(Debug, Clone)]
pub struct ConvertContext {
    /// Source-to-viewport scaling ratio.
    pub ratio: f64,
    pub theme: Theme,
}

/// Converts parsed presentation trees into editor decks.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    options: ConvertOptions,
}

impl Converter {
    /// Create a converter with the given options.
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    /// Build the conversion context for a document.
    pub fn context(&self, doc: &SourceDocument) -> ConvertContext {
        ConvertContext {
            ratio: scale_ratio(doc.size.width, self.options.fit_viewport),
            theme: Theme {
                theme_colors: doc.theme_colors.clone(),
                font_name: self.options.font_name.clone(),
                font_color: self.options.font_color.clone(),
            },
        }
    }

    /// Convert a whole document.
    pub fn convert(&self, doc: &SourceDocument) -> Deck {
        let ctx = self.context(doc);
        log::debug!(
            "Converting {} slides at ratio {:.4}",
            doc.slides.len(),
            ctx.ratio
        );

        let slides = doc
            .slides
            .iter()
            .map(|slide| self.convert_slide(slide, &ctx))
            .collect();

        let width = doc.size.width.max(1.0);
        Deck {
            slides,
            viewport_width: width * ctx.ratio,
            viewport_ratio: doc.size.height / width,
            theme: ctx.theme,
        }
    }

    /// Convert one slide, layout elements first.
    pub fn convert_slide(&self, slide: &SourceSlide, ctx: &ConvertContext) -> Slide {
        let mut elements = Vec::new();
        self.translate_elements(&slide.layout_elements, ctx, &mut elements);
        self.translate_elements(&slide.elements, ctx, &mut elements);

        Slide {
            id: new_id(),
            elements,
            background: background(slide.fill.as_ref()),
            remark: slide.note.clone(),
            role: None,
        }
    }

    /// Translate elements in stacking order, flattening groups into `out`.
    pub fn translate_elements(
        &self,
        elements: &[SourceElement],
        ctx: &ConvertContext,
        out: &mut Vec<SlideElement>,
    ) {
        let mut sorted: Vec<&SourceElement> = elements.iter().collect();
        sorted.sort_by_key(|el| el.frame.order);

        for el in sorted {
            self.translate_element(el, ctx, out);
        }
    }

    fn translate_element(&self, el: &SourceElement, ctx: &ConvertContext, out: &mut Vec<SlideElement>) {
        let frame = &el.frame;
        match &el.kind {
            SourceKind::Text(text) => out.push(translate_text(frame, text, ctx)),
            SourceKind::Image(image) => out.push(translate_image(frame, image, ctx)),
            SourceKind::Math(math) => {
                let image = ImageSource {
                    src: math.pic_base64.clone(),
                    ..Default::default()
                };
                out.push(translate_image(frame, &image, ctx));
            }
            SourceKind::Audio(media) => out.push(translate_audio(frame, media, ctx)),
            SourceKind::Video(media) => out.push(translate_video(frame, media, ctx)),
            SourceKind::Shape(source) if source.is_line() => {
                out.push(SlideElement::Line(shape::translate_line(frame, source, ctx)));
            }
            SourceKind::Shape(source) => {
                out.push(SlideElement::Shape(shape::translate_shape(frame, source, ctx)));
            }
            SourceKind::Table(source) => {
                out.push(SlideElement::Table(table::translate_table(frame, source, ctx)));
            }
            SourceKind::Chart(source) => {
                out.push(SlideElement::Chart(chart::translate_chart(frame, source, ctx)));
            }
            SourceKind::Group(group) | SourceKind::Diagram(group) => {
                let children = position_group_children(frame, group);
                self.translate_elements(&children, ctx, out);
            }
        }
    }
}

/// Move group children into slide coordinates and apply group flips.
///
/// Children stay in source units; scaling happens when they are translated.
fn position_group_children(frame: &Frame, group: &GroupSource) -> Vec<SourceElement> {
    let width = if frame.width == 0.0 { 1.0 } else { frame.width };
    let height = if frame.height == 0.0 { 1.0 } else { frame.height };

    let mut children: Vec<SourceElement> = group
        .elements
        .iter()
        .map(|child| {
            let mut child = child.clone();
            let (left, top) = if frame.rotate != 0.0 {
                rotated_child_position(
                    frame.left,
                    frame.top,
                    width,
                    height,
                    child.frame.left,
                    child.frame.top,
                    frame.rotate,
                )
            } else {
                (child.frame.left + frame.left, child.frame.top + frame.top)
            };
            child.frame.left = left;
            child.frame.top = top;
            child.frame.flip_h |= frame.flip_h;
            child.frame.flip_v |= frame.flip_v;
            child
        })
        .collect();

    if frame.flip_h {
        flip_group(&mut children, FlipAxis::Horizontal);
    }
    if frame.flip_v {
        flip_group(&mut children, FlipAxis::Vertical);
    }

    children
}

fn background(fill: Option<&SourceFill>) -> Background {
    match fill {
        Some(SourceFill::Image(image)) => Background::Image {
            src: image.pic_base64.clone(),
            size: "cover".to_string(),
        },
        Some(SourceFill::Gradient(gradient)) => Background::Gradient {
            gradient: convert_gradient(gradient, 90.0),
        },
        Some(SourceFill::Color(color)) if !color.is_empty() => Background::Solid {
            color: color.clone(),
        },
        _ => Background::Solid {
            color: "#fff".to_string(),
        },
    }
}

/// Convert a gradient fill; `rotate_offset` is added to the source rotation.
pub(crate) fn convert_gradient(gradient: &GradientFill, rotate_offset: f64) -> Gradient {
    Gradient {
        kind: if gradient.path == "line" {
            GradientKind::Linear
        } else {
            GradientKind::Radial
        },
        colors: gradient
            .colors
            .iter()
            .map(|stop| GradientColor {
                pos: parse_leading_int(&stop.pos),
                color: stop.color.clone(),
            })
            .collect(),
        rotate: gradient.rot + rotate_offset,
    }
}

/// Parse the integer prefix of a string such as `"50%"`.
fn parse_leading_int(value: &str) -> f64 {
    let trimmed = value.trim();
    let end = trimmed
        .char_indices()
        .find(|&(idx, c)| !(c.is_ascii_digit() || (idx == 0 && c == '-')))
        .map(|(idx, _)| idx)
        .unwrap_or(trimmed.len());
    trimmed[..end].parse::<i64>().map(|v| v as f64).unwrap_or(0.0)
}

pub(crate) fn convert_outline(border: &SourceBorder, ratio: f64) -> Option<Outline> {
    let width = border.border_width.unwrap_or(0.0);
    if width <= 0.0 && border.border_color.is_none() {
        return None;
    }
    Some(Outline {
        width: scale_stroke(width, ratio),
        color: border.border_color.clone().unwrap_or_else(|| "#000".to_string()),
        style: border.border_type.clone().unwrap_or_else(|| "solid".to_string()),
    })
}

pub(crate) fn convert_shadow(shadow: Option<&SourceShadow>, ratio: f64) -> Option<Shadow> {
    shadow.map(|shadow| Shadow {
        h: shadow.h * ratio,
        v: shadow.v * ratio,
        blur: shadow.blur * ratio,
        color: shadow.color.clone(),
    })
}

/// Solid fill color, empty when the fill is absent or not a color.
pub(crate) fn solid_fill(fill: Option<&SourceFill>) -> String {
    match fill {
        Some(SourceFill::Color(color)) => color.clone(),
        _ => String::new(),
    }
}

/// Map a source vertical anchor to the editor's alignment name.
pub(crate) fn vertical_align(v_align: Option<&str>) -> String {
    match v_align {
        Some("up") => "top",
        Some("down") => "bottom",
        _ => "middle",
    }
    .to_string()
}

fn translate_text(frame: &Frame, text: &TextSource, ctx: &ConvertContext) -> SlideElement {
    let placement = scale_frame(frame, ctx.ratio);

    if let Some(auto_fit) = text.auto_fit.as_ref().filter(|fit| fit.is_shape()) {
        let font_scale = auto_fit.font_scale.unwrap_or(100.0) / 100.0;
        return SlideElement::Shape(ShapeElement {
            id: new_id(),
            placement,
            view_box: [200.0, 200.0],
            path: RECT_PATH.to_string(),
            fill: solid_fill(text.fill.as_ref()),
            gradient: None,
            pattern: None,
            fixed_ratio: false,
            outline: convert_outline(&text.border, ctx.ratio),
            shadow: convert_shadow(text.shadow.as_ref(), ctx.ratio),
            text: Some(ShapeText {
                content: rescale_font_sizes(&text.content, ctx.ratio * font_scale),
                default_font_name: ctx.theme.font_name.clone(),
                default_color: ctx.theme.font_color.clone(),
                align: vertical_align(text.v_align.as_deref()),
            }),
            flip_h: false,
            flip_v: false,
            path_formula: None,
            keypoints: None,
            special: false,
        });
    }

    let fill = solid_fill(text.fill.as_ref());
    SlideElement::Text(TextElement {
        id: new_id(),
        placement,
        content: rescale_font_sizes(&text.content, ctx.ratio),
        default_font_name: ctx.theme.font_name.clone(),
        default_color: ctx.theme.font_color.clone(),
        line_height: 1.0,
        outline: convert_outline(&text.border, ctx.ratio),
        fill: (!fill.is_empty()).then_some(fill),
        shadow: convert_shadow(text.shadow.as_ref(), ctx.ratio),
        vertical: text.is_vertical,
        text_type: None,
        group_id: None,
    })
}

fn translate_image(frame: &Frame, image: &ImageSource, ctx: &ConvertContext) -> SlideElement {
    let preset = image.geom.as_deref().and_then(ClipShape::from_preset);

    let shape = preset.unwrap_or(ClipShape::Rect);
    let clip = match image.rect {
        Some(rect) => ImageClip {
            shape,
            range: [
                [rect.l.unwrap_or(0.0), rect.t.unwrap_or(0.0)],
                [100.0 - rect.r.unwrap_or(0.0), 100.0 - rect.b.unwrap_or(0.0)],
            ],
        },
        None => ImageClip::uncropped(shape),
    };

    SlideElement::Image(ImageElement {
        id: new_id(),
        placement: scale_frame(frame, ctx.ratio),
        src: image.src.clone(),
        fixed_ratio: true,
        flip_h: frame.flip_h,
        flip_v: frame.flip_v,
        outline: convert_outline(&image.border, ctx.ratio),
        clip,
    })
}

fn translate_audio(frame: &Frame, media: &MediaSource, ctx: &ConvertContext) -> SlideElement {
    SlideElement::Audio(AudioElement {
        id: new_id(),
        placement: Placement {
            rotate: 0.0,
            ..scale_frame(frame, ctx.ratio)
        },
        src: media.blob.clone(),
        looping: false,
        autoplay: false,
        fixed_ratio: true,
        color: ctx.theme.accent().to_string(),
    })
}

fn translate_video(frame: &Frame, media: &MediaSource, ctx: &ConvertContext) -> SlideElement {
    SlideElement::Video(VideoElement {
        id: new_id(),
        placement: Placement {
            rotate: 0.0,
            ..scale_frame(frame, ctx.ratio)
        },
        src: media.blob.clone(),
        autoplay: false,
    })
}
