//! Placeholder synthesis for tags a slide is missing.

use deck_core::markup::paragraph;
use deck_core::model::{Placement, TextElement};
use deck_core::{new_id, Slide, SlideElement, SlideRole, Theme};

use crate::config::{PlaceholderGroup, PlaceholderSlot, RolePlaceholders};
use crate::features::Viewport;

/// Visually blank text used in synthesized slots.
const PLACEHOLDER_TEXT: &str = "&nbsp;";

/// Append placeholder text elements for every required tag absent from the
/// slide. Returns the number of elements added.
pub fn synthesize(
    slide: &mut Slide,
    role: SlideRole,
    layout: &RolePlaceholders,
    viewport: Viewport,
    theme: &Theme,
) -> usize {
    let mut added = Vec::new();

    for slot in &layout.singles {
        if !slide.has_text_role(slot.role) {
            added.push(placeholder(slot, 0.0, 0.0, None, viewport, theme));
        }
    }

    if let Some(group) = &layout.group {
        if !slide.has_text_role(group.anchor) {
            added.extend(group_placeholders(group, viewport, theme));
        } else {
            added.extend(companion_placeholders(slide, group, viewport, theme));
        }
    }

    if !added.is_empty() {
        log::debug!("Synthesized {} placeholder(s) on {} slide", added.len(), role.as_str());
    }
    let count = added.len();
    slide.elements.extend(added);
    count
}

fn group_placeholders(group: &PlaceholderGroup, viewport: Viewport, theme: &Theme) -> Vec<SlideElement> {
    let columns = group.columns.max(1);
    let rows = group.count.div_ceil(columns).max(1);
    let mut elements = Vec::with_capacity(group.count * group.slots.len());

    for idx in 0..group.count {
        let column = idx / rows;
        let row = idx % rows;
        let dx = column as f64 * group.column_step;
        let dy = row as f64 * group.row_step;
        let group_id = new_id();

        for slot in &group.slots {
            elements.push(placeholder(slot, dx, dy, Some(&group_id), viewport, theme));
        }
    }
    elements
}

/// Complete every tagged anchor's group in place: missing companions are
/// placed relative to the anchor and share its group id.
fn companion_placeholders(
    slide: &mut Slide,
    group: &PlaceholderGroup,
    viewport: Viewport,
    theme: &Theme,
) -> Vec<SlideElement> {
    let Some(anchor_slot) = group.slots.iter().find(|slot| slot.role == group.anchor) else {
        return Vec::new();
    };

    let mut anchors = Vec::new();
    for element in &mut slide.elements {
        if let Some(text) = element.as_text_mut().filter(|t| t.text_type == Some(group.anchor)) {
            let group_id = text.group_id.get_or_insert_with(new_id).clone();
            anchors.push((group_id, text.placement.left, text.placement.top));
        }
    }

    let mut added = Vec::new();
    for (group_id, left, top) in anchors {
        let dx = left / viewport.width - anchor_slot.left;
        let dy = top / viewport.height - anchor_slot.top;

        for slot in group.slots.iter().filter(|slot| slot.role != group.anchor) {
            let present = slide.text_elements().any(|(_, t)| {
                t.text_type == Some(slot.role) && t.group_id.as_deref() == Some(group_id.as_str())
            });
            if !present {
                added.push(placeholder(slot, dx, dy, Some(&group_id), viewport, theme));
            }
        }
    }
    added
}

fn placeholder(
    slot: &PlaceholderSlot,
    dx: f64,
    dy: f64,
    group_id: Option<&str>,
    viewport: Viewport,
    theme: &Theme,
) -> SlideElement {
    let width = slot.width * viewport.width;
    let height = slot.height * viewport.height;
    SlideElement::Text(TextElement {
        id: new_id(),
        placement: Placement {
            left: ((slot.left + dx) * viewport.width).clamp(0.0, (viewport.width - width).max(0.0)),
            top: ((slot.top + dy) * viewport.height).clamp(0.0, (viewport.height - height).max(0.0)),
            width,
            height,
            rotate: 0.0,
        },
        content: paragraph(PLACEHOLDER_TEXT, slot.font_size),
        default_font_name: theme.font_name.clone(),
        default_color: theme.font_color.clone(),
        line_height: 1.0,
        outline: None,
        fill: None,
        shadow: None,
        vertical: false,
        text_type: Some(slot.role),
        group_id: group_id.map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlaceholderConfig;
    use crate::features::tests::{slide, text_el, VIEWPORT};
    use deck_core::TextRole;
    use std::collections::BTreeSet;

    fn theme() -> Theme {
        Theme {
            theme_colors: vec![],
            font_name: "Arial".into(),
            font_color: "#333".into(),
        }
    }

    fn run(s: &mut Slide, role: SlideRole) -> usize {
        let config = PlaceholderConfig::default();
        synthesize(s, role, config.for_role(role), VIEWPORT, &theme())
    }

    fn count_role(s: &Slide, role: TextRole) -> usize {
        s.text_elements().filter(|(_, t)| t.text_type == Some(role)).count()
    }

    #[test]
    fn test_contents_gets_ten_pairs() {
        let mut s = slide(vec![text_el(100.0, 20.0, 400.0, 60.0, "Agenda", 36.0)]);
        assert_eq!(run(&mut s, SlideRole::Contents), 20);
        assert_eq!(count_role(&s, TextRole::Item), 10);
        assert_eq!(count_role(&s, TextRole::ItemNumber), 10);

        let groups: BTreeSet<_> = s
            .text_elements()
            .filter_map(|(_, t)| t.group_id.clone())
            .collect();
        assert_eq!(groups.len(), 10);
        // Every slot stays inside the slide.
        for (_, t) in s.text_elements() {
            assert!(t.placement.left + t.placement.width <= VIEWPORT.width + 1e-6);
            assert!(t.placement.top + t.placement.height <= VIEWPORT.height + 1e-6);
        }
    }

    #[test]
    fn test_content_gets_body_and_four_triples() {
        let mut s = slide(vec![]);
        assert_eq!(run(&mut s, SlideRole::Content), 13);
        assert_eq!(count_role(&s, TextRole::Content), 1);
        assert_eq!(count_role(&s, TextRole::ItemTitle), 4);
        assert_eq!(count_role(&s, TextRole::Item), 4);
        assert_eq!(count_role(&s, TextRole::ItemNumber), 4);
    }

    #[test]
    fn test_existing_tags_are_kept() {
        let mut s = slide(vec![text_el(100.0, 100.0, 800.0, 80.0, "Welcome", 44.0)]);
        s.elements[0].as_text_mut().unwrap().text_type = Some(TextRole::Title);
        assert_eq!(run(&mut s, SlideRole::Cover), 1);
        assert_eq!(count_role(&s, TextRole::Title), 1);
        assert_eq!(count_role(&s, TextRole::Content), 1);

        // A second pass adds nothing.
        assert_eq!(run(&mut s, SlideRole::Cover), 0);
    }

    #[test]
    fn test_tagged_rows_get_numbers_beside_them() {
        let mut s = slide(vec![
            text_el(100.0, 120.0, 500.0, 40.0, "Intro", 24.0),
            text_el(100.0, 200.0, 500.0, 40.0, "Plan", 24.0),
        ]);
        for el in &mut s.elements {
            el.as_text_mut().unwrap().text_type = Some(TextRole::Item);
        }
        assert_eq!(run(&mut s, SlideRole::Contents), 2);
        assert_eq!(count_role(&s, TextRole::Item), 2);
        assert_eq!(count_role(&s, TextRole::ItemNumber), 2);

        for idx in 0..2 {
            let item = s.elements[idx].as_text().unwrap();
            let number = s.elements[idx + 2].as_text().unwrap();
            assert!(item.group_id.is_some());
            assert_eq!(number.group_id, item.group_id);
            // Same row, shifted left by the slot offset.
            assert!((number.placement.top - item.placement.top).abs() < 1e-6);
            assert!((number.placement.left - 30.0).abs() < 1e-6);
        }
        assert_ne!(s.elements[2].as_text().unwrap().group_id, s.elements[3].as_text().unwrap().group_id);
    }

    #[test]
    fn test_partial_groups_only_fill_gaps() {
        let mut s = slide(vec![
            text_el(160.0, 290.0, 320.0, 90.0, "First body", 16.0),
            text_el(80.0, 236.0, 60.0, 45.0, "01", 20.0),
            text_el(600.0, 290.0, 320.0, 90.0, "Second body", 16.0),
        ]);
        for (idx, role) in [(0, TextRole::Item), (1, TextRole::ItemNumber), (2, TextRole::Item)] {
            let text = s.elements[idx].as_text_mut().unwrap();
            text.text_type = Some(role);
            text.group_id = Some(if idx < 2 { "a".into() } else { "b".into() });
        }
        // Body placeholder, two item titles, one number for group "b".
        assert_eq!(run(&mut s, SlideRole::Content), 4);
        assert_eq!(count_role(&s, TextRole::ItemNumber), 2);
        assert_eq!(count_role(&s, TextRole::ItemTitle), 2);

        let numbers: Vec<_> = s
            .text_elements()
            .filter(|(_, t)| t.text_type == Some(TextRole::ItemNumber))
            .map(|(_, t)| t.group_id.clone())
            .collect();
        assert_eq!(numbers, vec![Some("a".to_string()), Some("b".to_string())]);
    }

    #[test]
    fn test_transition_and_end_requirements() {
        let mut transition = slide(vec![]);
        run(&mut transition, SlideRole::Transition);
        for role in [TextRole::Title, TextRole::Content, TextRole::PartNumber] {
            assert!(transition.has_text_role(role));
        }

        let mut end = slide(vec![]);
        assert_eq!(run(&mut end, SlideRole::End), 1);
        assert!(end.has_text_role(TextRole::Title));
    }

    #[test]
    fn test_placeholder_markup() {
        let mut s = slide(vec![]);
        run(&mut s, SlideRole::End);
        let text = s.elements[0].as_text().unwrap();
        assert!(text.content.contains("&nbsp;"));
        assert!(text.content.contains("font-size: 48.0px"));
        assert_eq!(text.default_font_name, "Arial");
        assert_eq!(text.placement.left, 100.0);
    }
}
