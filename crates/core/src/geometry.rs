//! Geometry transforms applied while converting parsed elements.
//!
//! Source coordinates are points; the editor works in viewport pixels.
//! Angles are degrees, clockwise-positive as stored by the document format.

use crate::model::Placement;
use crate::source::{Frame, SourceElement};

/// Ratio from points to CSS pixels, used when no viewport fitting is requested.
pub const PT_TO_PX: f64 = 96.0 / 72.0;

/// Compute the coordinate scaling ratio for a source slide width.
///
/// With `fit_viewport` the slide is scaled to exactly that many pixels wide,
/// otherwise points are converted to pixels.
pub fn scale_ratio(source_width: f64, fit_viewport: Option<f64>) -> f64 {
    match fit_viewport {
        Some(viewport) if source_width > 0.0 => viewport / source_width,
        _ => PT_TO_PX,
    }
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Scale a border or stroke width, rounding to two decimals.
pub fn scale_stroke(width: f64, ratio: f64) -> f64 {
    round2(width * ratio)
}

/// Scale a source frame into an absolute placement.
pub fn scale_frame(frame: &Frame, ratio: f64) -> Placement {
    Placement {
        left: frame.left * ratio,
        top: frame.top * ratio,
        width: frame.width * ratio,
        height: frame.height * ratio,
        rotate: frame.rotate,
    }
}

/// Absolute position of a child inside a rotated container.
///
/// `(x, y, w, h)` is the container's origin and size, `(ox, oy)` the child's
/// un-rotated offset inside it. The offset is taken relative to the container
/// center, rotated by `angle`, and translated back.
pub fn rotated_child_position(
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    ox: f64,
    oy: f64,
    angle: f64,
) -> (f64, f64) {
    let radians = angle.to_radians();
    let (sin, cos) = radians.sin_cos();

    let center_x = x + w / 2.0;
    let center_y = y + h / 2.0;
    let rel_x = ox - w / 2.0;
    let rel_y = oy - h / 2.0;

    let rotated_x = rel_x * cos + rel_y * sin;
    let rotated_y = -rel_x * sin + rel_y * cos;

    (center_x + rotated_x, center_y + rotated_y)
}

/// Axis a group is mirrored on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipAxis {
    /// Mirror left/right across the vertical center line.
    Horizontal,
    /// Mirror top/bottom across the horizontal center line.
    Vertical,
}

/// Mirror children across the center of their combined bounding box.
pub fn flip_group(elements: &mut [SourceElement], axis: FlipAxis) {
    if elements.is_empty() {
        return;
    }

    let (min, max) = match axis {
        FlipAxis::Horizontal => bounds(elements.iter().map(|el| (el.frame.left, el.frame.width))),
        FlipAxis::Vertical => bounds(elements.iter().map(|el| (el.frame.top, el.frame.height))),
    };
    let center = (min + max) / 2.0;

    for el in elements.iter_mut() {
        match axis {
            FlipAxis::Horizontal => el.frame.left = 2.0 * center - el.frame.left - el.frame.width,
            FlipAxis::Vertical => el.frame.top = 2.0 * center - el.frame.top - el.frame.height,
        }
    }
}

fn bounds(spans: impl Iterator<Item = (f64, f64)>) -> (f64, f64) {
    spans.fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), (start, len)| {
        (min.min(start), max.max(start + len))
    })
}

/// Result of rotating a line about its midpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotatedLine {
    pub start: [f64; 2],
    pub end: [f64; 2],
    /// Shift to apply to the element's stored top-left.
    pub offset: [f64; 2],
}

/// Rotate line endpoints about their midpoint, re-normalized to the new
/// bounding box's minimum corner.
pub fn rotate_line(start: [f64; 2], end: [f64; 2], angle: f64) -> RotatedLine {
    let (sin, cos) = angle.to_radians().sin_cos();
    let mid_x = (start[0] + end[0]) / 2.0;
    let mid_y = (start[1] + end[1]) / 2.0;

    let rotate = |p: [f64; 2]| -> [f64; 2] {
        let dx = p[0] - mid_x;
        let dy = p[1] - mid_y;
        [dx * cos - dy * sin + mid_x, dx * sin + dy * cos + mid_y]
    };

    let new_start = rotate(start);
    let new_end = rotate(end);

    let min_x = new_start[0].min(new_end[0]);
    let min_y = new_start[1].min(new_end[1]);

    RotatedLine {
        start: [new_start[0] - min_x, new_start[1] - min_y],
        end: [new_end[0] - min_x, new_end[1] - min_y],
        offset: [min_x, min_y],
    }
}
