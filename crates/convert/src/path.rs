//! Shape path resolution: library presets first, the source's own path second.

use deck_core::{Error, Result};
use kurbo::{BezPath, Rect, Shape};

use crate::library::{find_preset, RECT_PATH};

/// Marker emitted by parsers for coordinates they failed to compute.
const INVALID_NUMBER_MARKER: &str = "NaN";

/// A path ready to be placed on a shape element.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPath {
    pub path: String,
    pub view_box: [f64; 2],
    /// Formula name when the path is parametric.
    pub formula: Option<&'static str>,
    pub keypoints: Option<Vec<f64>>,
    /// Path copied verbatim from the source.
    pub special: bool,
    /// Invalid markers were replaced; the element needs a non-zero size.
    pub repaired: bool,
}

/// Resolve the renderable path for a shape.
///
/// `width`/`height` are the scaled element size used by formulas;
/// `origin_width`/`origin_height` are the source size driving the aspect ratio
/// of view boxes measured from raw paths.
pub fn resolve_path(
    preset_name: &str,
    raw_path: Option<&str>,
    width: f64,
    height: f64,
    origin_width: f64,
    origin_height: f64,
) -> ResolvedPath {
    if let Some(preset) = find_preset(preset_name) {
        return match preset.formula {
            Some(formula) if formula.editable() => {
                let keypoints = formula.default_keypoints().to_vec();
                ResolvedPath {
                    path: formula.render(width, height, &keypoints),
                    view_box: [width, height],
                    formula: Some(formula.name()),
                    keypoints: Some(keypoints),
                    special: false,
                    repaired: false,
                }
            }
            Some(formula) => ResolvedPath {
                path: formula.render(width, height, &[]),
                view_box: [width, height],
                formula: Some(formula.name()),
                keypoints: None,
                special: false,
                repaired: false,
            },
            None => ResolvedPath {
                path: preset.path.to_string(),
                view_box: preset.view_box,
                formula: None,
                keypoints: None,
                special: false,
                repaired: false,
            },
        };
    }

    let Some(raw) = raw_path.filter(|p| !p.trim().is_empty()) else {
        return ResolvedPath {
            path: RECT_PATH.to_string(),
            view_box: [200.0, 200.0],
            formula: None,
            keypoints: None,
            special: false,
            repaired: false,
        };
    };

    let repaired = raw.contains(INVALID_NUMBER_MARKER);
    let path = if repaired {
        log::debug!("Replacing invalid numbers in custom path for '{}'", preset_name);
        raw.replace(INVALID_NUMBER_MARKER, "0")
    } else {
        raw.to_string()
    };

    let view_box = measured_view_box(&path, origin_width, origin_height);
    ResolvedPath {
        path,
        view_box,
        formula: None,
        keypoints: None,
        special: !repaired,
        repaired,
    }
}

/// View box covering the path while keeping the element's aspect ratio.
fn measured_view_box(path: &str, origin_width: f64, origin_height: f64) -> [f64; 2] {
    let origin_width = if origin_width > 0.0 { origin_width } else { 1.0 };
    let origin_height = if origin_height > 0.0 { origin_height } else { 1.0 };

    let extent = match path_extent(path) {
        Ok(extent) => extent,
        Err(e) => {
            log::warn!("{}; using element size as view box", e);
            return [origin_width, origin_height];
        }
    };

    let (max_x, max_y) = (extent.x1, extent.y1);
    if max_x <= 0.0 && max_y <= 0.0 {
        return [origin_width, origin_height];
    }

    if max_y <= 0.0 || max_x / max_y > origin_width / origin_height {
        [max_x, max_x * origin_height / origin_width]
    } else {
        [max_y * origin_width / origin_height, max_y]
    }
}

/// Bounds of everything an SVG path draws, curves and arcs included.
pub fn path_extent(path: &str) -> Result<Rect> {
    let bez = BezPath::from_svg(path)
        .map_err(|e| Error::MalformedShapePath(format!("{} in '{}'", e, path)))?;
    if bez.segments().next().is_none() {
        return Err(Error::MalformedShapePath("path has no coordinates".to_string()));
    }
    Ok(bez.bounding_box())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_preset_resolves_exactly() {
        let resolved = resolve_path("rect", Some("M 0 0 L 5 5"), 300.0, 100.0, 225.0, 75.0);
        assert_eq!(resolved.path, RECT_PATH);
        assert_eq!(resolved.view_box, [200.0, 200.0]);
        assert!(!resolved.special);
        assert!(resolved.formula.is_none());
    }

    #[test]
    fn test_editable_formula_gets_keypoints() {
        let resolved = resolve_path("roundRect", None, 100.0, 40.0, 75.0, 30.0);
        assert_eq!(resolved.formula, Some("roundRect"));
        assert_eq!(resolved.keypoints, Some(vec![0.125]));
        assert_eq!(resolved.view_box, [100.0, 40.0]);
        assert!(resolved.path.starts_with("M 5 0"));
    }

    #[test]
    fn test_fixed_formula_has_no_keypoints() {
        let resolved = resolve_path("plus", None, 100.0, 100.0, 100.0, 100.0);
        assert_eq!(resolved.formula, Some("plus"));
        assert!(resolved.keypoints.is_none());
    }

    #[test]
    fn test_custom_path_is_special() {
        let resolved = resolve_path("custom", Some("M 0 0 L 100 0 L 100 50 Z"), 0.0, 0.0, 200.0, 100.0);
        assert!(resolved.special);
        assert!(!resolved.repaired);
        // Path ratio 2:1 matches the element ratio.
        assert_eq!(resolved.view_box, [100.0, 50.0]);
    }

    #[test]
    fn test_custom_path_with_invalid_markers() {
        let resolved = resolve_path("custom", Some("M NaN 0 L 100 NaN L 50 80 Z"), 0.0, 0.0, 100.0, 100.0);
        assert_eq!(resolved.path, "M 0 0 L 100 0 L 50 80 Z");
        assert!(resolved.repaired);
        assert!(!resolved.special);
        assert_eq!(resolved.view_box, [100.0, 100.0]);
    }

    #[test]
    fn test_view_box_keeps_aspect_when_path_is_tall() {
        // Path spans 50x100 but the element is square.
        let resolved = resolve_path("custom", Some("M 0 0 L 50 100"), 0.0, 0.0, 10.0, 10.0);
        assert_eq!(resolved.view_box, [100.0, 100.0]);
    }

    #[test]
    fn test_missing_path_defaults_to_rect() {
        let resolved = resolve_path("cloudCallout", None, 10.0, 10.0, 10.0, 10.0);
        assert_eq!(resolved.path, RECT_PATH);
        assert_eq!(resolved.view_box, [200.0, 200.0]);
    }

    #[test]
    fn test_path_extent_relative_commands() {
        let extent = path_extent("m 10 10 l 20 0 v 30 h -25 z").unwrap();
        assert_eq!(extent.x0, 5.0);
        assert_eq!(extent.x1, 30.0);
        assert_eq!(extent.y0, 10.0);
        assert_eq!(extent.y1, 40.0);
    }

    #[test]
    fn test_path_extent_follows_curves() {
        // The control points pull the curve up to y = -30, past both endpoints.
        let extent = path_extent("M0,0 C0,-40 100,-40 100,0").unwrap();
        assert!((extent.y0 + 30.0).abs() < 1e-6);
        assert_eq!(extent.y1, 0.0);
        assert_eq!(extent.x1, 100.0);
    }

    #[test]
    fn test_path_extent_implicit_and_compact_syntax() {
        let extent = path_extent("M 0 0 10 20 30 5").unwrap();
        assert_eq!(extent.x1, 30.0);
        assert_eq!(extent.y1, 20.0);

        let extent = path_extent("M0,0L10-5l5,15").unwrap();
        assert_eq!(extent.y0, -5.0);
        assert_eq!(extent.x1, 15.0);
        assert_eq!(extent.y1, 10.0);
    }

    #[test]
    fn test_compact_arc_flags() {
        // Half circle bulging right of x = 100.
        let path = "M 0 0 L 100 0 A 50 50 0 01 100 100 Z";
        let extent = path_extent(path).unwrap();
        assert!((extent.x1 - 150.0).abs() < 0.5);
        assert!((extent.y1 - 100.0).abs() < 1e-6);

        let resolved = resolve_path("custom", Some(path), 0.0, 0.0, 10.0, 10.0);
        assert!((resolved.view_box[0] - 150.0).abs() < 0.5);
        assert_eq!(resolved.view_box[0], resolved.view_box[1]);
    }

    #[test]
    fn test_path_extent_malformed() {
        assert!(matches!(
            path_extent("M 0 0 L 10 # 5"),
            Err(Error::MalformedShapePath(_))
        ));
        assert!(matches!(path_extent("M 5 5"), Err(Error::MalformedShapePath(_))));
    }

    #[test]
    fn test_unscannable_path_uses_element_size() {
        let resolved = resolve_path("custom", Some("M 0 0 L @ 1"), 0.0, 0.0, 40.0, 20.0);
        assert_eq!(resolved.view_box, [40.0, 20.0]);
        assert!(resolved.special);
    }
}
