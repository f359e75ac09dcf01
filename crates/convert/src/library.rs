//! Built-in shape library keyed by geometry preset name.
//!
//! Static entries are normalized to a 200x200 view box. Entries with a
//! [`PathFormula`] regenerate their path from the element's own size.

use deck_core::geometry::round2;

/// Plain rectangle used for text boxes rendered as shapes and unknown presets.
pub const RECT_PATH: &str = "M 0 0 L 200 0 L 200 200 L 0 200 Z";

/// A shape library entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapePreset {
    /// Geometry preset name as written by the document format.
    pub name: &'static str,
    pub path: &'static str,
    pub view_box: [f64; 2],
    pub formula: Option<PathFormula>,
}

const fn preset(name: &'static str, path: &'static str) -> ShapePreset {
    ShapePreset {
        name,
        path,
        view_box: [200.0, 200.0],
        formula: None,
    }
}

const fn parametric(name: &'static str, path: &'static str, formula: PathFormula) -> ShapePreset {
    ShapePreset {
        name,
        path,
        view_box: [200.0, 200.0],
        formula: Some(formula),
    }
}

const SHAPE_LIBRARY: &[ShapePreset] = &[
    preset("rect", RECT_PATH),
    preset("ellipse", "M 100 0 A 50 50 0 1 1 100 200 A 50 50 0 1 1 100 0 Z"),
    preset("triangle", "M 100 0 L 0 200 L 200 200 L 100 0 Z"),
    preset("rtTriangle", "M 0 0 L 0 200 L 200 200 Z"),
    preset("diamond", "M 100 0 L 0 100 L 100 200 L 200 100 Z"),
    preset("pentagon", "M 100 0 L 0 76 L 38 200 L 162 200 L 200 76 Z"),
    preset("hexagon", "M 50 0 L 0 100 L 50 200 L 150 200 L 200 100 L 150 0 Z"),
    preset(
        "heptagon",
        "M 100 0 L 22 38 L 0 124 L 56 200 L 144 200 L 200 124 L 178 38 Z",
    ),
    preset(
        "octagon",
        "M 58 0 L 0 58 L 0 142 L 58 200 L 142 200 L 200 142 L 200 58 L 142 0 Z",
    ),
    preset(
        "star5",
        "M 100 0 L 124 76 L 200 76 L 138 123 L 162 200 L 100 153 L 38 200 L 62 123 L 0 76 L 76 76 Z",
    ),
    preset("rightArrow", "M 0 50 L 140 50 L 140 0 L 200 100 L 140 200 L 140 150 L 0 150 Z"),
    preset("leftArrow", "M 200 50 L 60 50 L 60 0 L 0 100 L 60 200 L 60 150 L 200 150 Z"),
    preset("upArrow", "M 50 200 L 50 60 L 0 60 L 100 0 L 200 60 L 150 60 L 150 200 Z"),
    preset("downArrow", "M 50 0 L 50 140 L 0 140 L 100 200 L 200 140 L 150 140 L 150 0 Z"),
    parametric(
        "roundRect",
        "M 25 0 L 175 0 Q 200 0 200 25 L 200 175 Q 200 200 175 200 L 25 200 Q 0 200 0 175 L 0 25 Q 0 0 25 0 Z",
        PathFormula::RoundRect,
    ),
    parametric(
        "parallelogram",
        "M 50 0 L 200 0 L 150 200 L 0 200 Z",
        PathFormula::Parallelogram,
    ),
    parametric(
        "trapezoid",
        "M 50 0 L 150 0 L 200 200 L 0 200 Z",
        PathFormula::Trapezoid,
    ),
    parametric(
        "chevron",
        "M 0 0 L 150 0 L 200 100 L 150 200 L 0 200 L 50 100 Z",
        PathFormula::Chevron,
    ),
    parametric(
        "plus",
        "M 50 0 L 150 0 L 150 50 L 200 50 L 200 150 L 150 150 L 150 200 L 50 200 L 50 150 L 0 150 L 0 50 L 50 50 Z",
        PathFormula::Plus,
    ),
];

/// Look up a library entry by geometry preset name.
pub fn find_preset(name: &str) -> Option<&'static ShapePreset> {
    SHAPE_LIBRARY.iter().find(|preset| preset.name == name)
}

/// Parametric path generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathFormula {
    RoundRect,
    Parallelogram,
    Trapezoid,
    Chevron,
    Plus,
}

impl PathFormula {
    /// Name stored on the converted element.
    pub fn name(&self) -> &'static str {
        match self {
            PathFormula::RoundRect => "roundRect",
            PathFormula::Parallelogram => "parallelogram",
            PathFormula::Trapezoid => "trapezoid",
            PathFormula::Chevron => "chevron",
            PathFormula::Plus => "plus",
        }
    }

    /// Whether the shape exposes user-draggable control points.
    pub fn editable(&self) -> bool {
        !matches!(self, PathFormula::Plus)
    }

    /// Default control-point values for editable formulas.
    pub fn default_keypoints(&self) -> &'static [f64] {
        match self {
            PathFormula::RoundRect => &[0.125],
            PathFormula::Parallelogram | PathFormula::Trapezoid | PathFormula::Chevron => &[0.25],
            PathFormula::Plus => &[],
        }
    }

    /// Generate the path for a `width` x `height` box.
    pub fn render(&self, width: f64, height: f64, keypoints: &[f64]) -> String {
        let w = width;
        let h = height;
        let k = keypoints
            .first()
            .copied()
            .or_else(|| self.default_keypoints().first().copied())
            .unwrap_or(0.0);

        match self {
            PathFormula::RoundRect => {
                let r = w.min(h) * k;
                path(&[
                    ("M", &[r, 0.0]),
                    ("L", &[w - r, 0.0]),
                    ("Q", &[w, 0.0, w, r]),
                    ("L", &[w, h - r]),
                    ("Q", &[w, h, w - r, h]),
                    ("L", &[r, h]),
                    ("Q", &[0.0, h, 0.0, h - r]),
                    ("L", &[0.0, r]),
                    ("Q", &[0.0, 0.0, r, 0.0]),
                ])
            }
            PathFormula::Parallelogram => {
                let o = w * k;
                path(&[
                    ("M", &[o, 0.0]),
                    ("L", &[w, 0.0]),
                    ("L", &[w - o, h]),
                    ("L", &[0.0, h]),
                ])
            }
            PathFormula::Trapezoid => {
                let o = w * k;
                path(&[
                    ("M", &[o, 0.0]),
                    ("L", &[w - o, 0.0]),
                    ("L", &[w, h]),
                    ("L", &[0.0, h]),
                ])
            }
            PathFormula::Chevron => {
                let o = w * k;
                path(&[
                    ("M", &[0.0, 0.0]),
                    ("L", &[w - o, 0.0]),
                    ("L", &[w, h / 2.0]),
                    ("L", &[w - o, h]),
                    ("L", &[0.0, h]),
                    ("L", &[o, h / 2.0]),
                ])
            }
            PathFormula::Plus => {
                let (x1, x2) = (w * 0.25, w * 0.75);
                let (y1, y2) = (h * 0.25, h * 0.75);
                path(&[
                    ("M", &[x1, 0.0]),
                    ("L", &[x2, 0.0]),
                    ("L", &[x2, y1]),
                    ("L", &[w, y1]),
                    ("L", &[w, y2]),
                    ("L", &[x2, y2]),
                    ("L", &[x2, h]),
                    ("L", &[x1, h]),
                    ("L", &[x1, y2]),
                    ("L", &[0.0, y2]),
                    ("L", &[0.0, y1]),
                    ("L", &[x1, y1]),
                ])
            }
        }
    }
}

/// Join path commands into a closed SVG path.
fn path(commands: &[(&str, &[f64])]) -> String {
    let mut out = String::new();
    for (command, args) in commands {
        out.push_str(command);
        for arg in args.iter() {
            out.push(' ');
            out.push_str(&round2(*arg).to_string());
        }
        out.push(' ');
    }
    out.push('Z');
    out
}
