//! Shape and line/connector translators.

use deck_core::geometry::{rotate_line, scale_frame, scale_stroke};
use deck_core::markup::rescale_font_sizes;
use deck_core::model::{LineElement, LinePoint, ShapeElement, ShapeText};
use deck_core::new_id;
use deck_core::source::{Frame, ShapeSource, SourceFill};

use crate::converter::{
    convert_gradient, convert_outline, convert_shadow, solid_fill, vertical_align, ConvertContext,
};
use crate::path::resolve_path;

/// Translate a non-connector shape.
pub(crate) fn translate_shape(frame: &Frame, shape: &ShapeSource, ctx: &ConvertContext) -> ShapeElement {
    let mut placement = scale_frame(frame, ctx.ratio);
    let origin_width = if frame.width == 0.0 { 1.0 } else { frame.width };
    let origin_height = if frame.height == 0.0 { 1.0 } else { frame.height };

    let resolved = resolve_path(
        &shape.shape_type,
        shape.path.as_deref(),
        placement.width,
        placement.height,
        origin_width,
        origin_height,
    );

    if resolved.repaired {
        if placement.width == 0.0 {
            placement.width = 0.1;
        }
        if placement.height == 0.0 {
            placement.height = 0.1;
        }
    }

    let gradient = match shape.fill.as_ref() {
        Some(SourceFill::Gradient(gradient)) => Some(convert_gradient(gradient, 0.0)),
        _ => None,
    };
    let pattern = match shape.fill.as_ref() {
        Some(SourceFill::Image(image)) => Some(image.pic_base64.clone()),
        _ => None,
    };

    ShapeElement {
        id: new_id(),
        placement,
        view_box: resolved.view_box,
        path: resolved.path,
        fill: solid_fill(shape.fill.as_ref()),
        gradient,
        pattern,
        fixed_ratio: false,
        outline: convert_outline(&shape.border, ctx.ratio),
        shadow: convert_shadow(shape.shadow.as_ref(), ctx.ratio),
        text: Some(ShapeText {
            content: rescale_font_sizes(&shape.content, ctx.ratio),
            default_font_name: ctx.theme.font_name.clone(),
            default_color: ctx.theme.font_color.clone(),
            align: vertical_align(shape.v_align.as_deref()),
        }),
        flip_h: frame.flip_h,
        flip_v: frame.flip_v,
        path_formula: resolved.formula.map(str::to_string),
        keypoints: resolved.keypoints,
        special: resolved.special,
    }
}

/// Endpoints of an unrotated line from its flip state.
fn line_endpoints(width: f64, height: f64, flip_h: bool, flip_v: bool) -> ([f64; 2], [f64; 2]) {
    match (flip_h, flip_v) {
        (false, false) => ([0.0, 0.0], [width, height]),
        (true, true) => ([width, height], [0.0, 0.0]),
        (false, true) => ([0.0, height], [width, 0.0]),
        (true, false) => ([width, 0.0], [0.0, height]),
    }
}

/// Translate a line or connector.
pub(crate) fn translate_line(frame: &Frame, shape: &ShapeSource, ctx: &ConvertContext) -> LineElement {
    let placement = scale_frame(frame, ctx.ratio);
    let (start, end) = line_endpoints(placement.width, placement.height, frame.flip_h, frame.flip_v);

    let mut line = LineElement {
        id: new_id(),
        left: placement.left,
        top: placement.top,
        width: scale_stroke(shape.border.border_width.unwrap_or(1.0), ctx.ratio),
        start,
        end,
        style: shape.border.border_type.clone().unwrap_or_else(|| "solid".to_string()),
        color: shape.border.border_color.clone().unwrap_or_else(|| "#000".to_string()),
        points: [
            LinePoint::None,
            if shape.shape_type.contains("straightConnector") {
                LinePoint::Arrow
            } else {
                LinePoint::None
            },
        ],
        broken2: None,
        cubic: None,
    };

    if frame.rotate != 0.0 {
        let rotated = rotate_line(line.start, line.end, frame.rotate);
        line.start = rotated.start;
        line.end = rotated.end;
        line.left += rotated.offset[0];
        line.top += rotated.offset[1];
    }

    let control = [
        (line.start[0] - line.end[0]).abs() / 2.0,
        (line.start[1] - line.end[1]).abs() / 2.0,
    ];
    if shape.shape_type.contains("bentConnector") {
        line.broken2 = Some(control);
    } else if shape.shape_type.contains("curvedConnector") {
        line.cubic = Some([control, control]);
    }

    line
}
