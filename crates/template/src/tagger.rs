//! Semantic tagging of text elements on classified slides.
//!
//! Tagging works on a clone of the slide, so a source slide reused for
//! several roles is tagged independently for each. A tagger abstains
//! (leaves elements untagged) when the slide does not show the expected
//! structure; synthesis fills in whatever is missing afterwards.

use deck_core::{new_id, Slide, SlideRole, TextRole};
use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::config::TemplateConfig;
use crate::features::{text_boxes, Filters, TextBox};
use crate::lexicon::{is_numeric_label, CompiledLexicons};

pub struct Tagger<'a> {
    config: &'a TemplateConfig,
    lexicons: &'a CompiledLexicons,
    filters: Filters<'a>,
}

impl<'a> Tagger<'a> {
    pub fn new(config: &'a TemplateConfig, lexicons: &'a CompiledLexicons, filters: Filters<'a>) -> Self {
        Self {
            config,
            lexicons,
            filters,
        }
    }

    /// Clone `slide` and tag its text elements for `role`.
    pub fn tag(&self, slide: &Slide, role: SlideRole) -> Slide {
        let mut tagged = slide.clone();
        let boxes = text_boxes(slide, self.config.filters.default_font_size);

        let tags = match role {
            SlideRole::Cover | SlideRole::Transition | SlideRole::End => self.tag_heading(&boxes, role),
            SlideRole::Contents => self.tag_contents(&boxes),
            SlideRole::Content => self.tag_content(&boxes),
        };

        log::debug!("Tagged {} element(s) on {} slide", tags.len(), role.as_str());
        for tag in tags {
            if let Some(text) = tagged.elements.get_mut(tag.index).and_then(|el| el.as_text_mut()) {
                text.text_type = Some(tag.role);
                text.group_id = tag.group_id;
            }
        }
        tagged
    }

    /// Cover, transition, and end slides: title, plus content and part number.
    fn tag_heading(&self, boxes: &[TextBox], role: SlideRole) -> Vec<Tag> {
        let mut pool: Vec<&TextBox> = boxes
            .iter()
            .filter(|tb| !tb.is_empty() && !self.filters.is_brand(tb))
            .collect();
        let mut tags = Vec::new();

        if role == SlideRole::Transition {
            if let Some(pos) = pool.iter().position(|tb| self.is_part_number(tb)) {
                tags.push(Tag::new(pool.remove(pos).index, TextRole::PartNumber));
            }
        }

        let Some(pos) = self.title_position(&pool, role) else {
            return tags;
        };
        tags.push(Tag::new(pool.remove(pos).index, TextRole::Title));

        if role == SlideRole::End {
            return tags;
        }

        let content = pool.iter().fold(None::<&TextBox>, |best, tb| match best {
            Some(current) if compare_area_then_top(current, tb) != Ordering::Less => Some(current),
            _ => Some(*tb),
        });
        if let Some(tb) = content {
            tags.push(Tag::new(tb.index, TextRole::Content));
        }
        tags
    }

    fn is_part_number(&self, tb: &TextBox) -> bool {
        let cfg = &self.config.tagging;
        tb.width <= cfg.part_number_max_width_ratio * self.filters.viewport().width
            && tb.text.chars().count() <= cfg.part_number_max_chars
            && is_numeric_label(&tb.text)
    }

    /// Keyword match first, otherwise the most prominent box, preferring the
    /// upper part of the slide.
    fn title_position(&self, pool: &[&TextBox], role: SlideRole) -> Option<usize> {
        let lexicon = self.lexicons.for_role(role);
        let matched = pool
            .iter()
            .enumerate()
            .filter(|(_, tb)| lexicon.matches(&tb.text))
            .fold(None::<(usize, f64)>, |best, (pos, tb)| match best {
                Some((_, size)) if size >= tb.font_size => best,
                _ => Some((pos, tb.font_size)),
            });
        if let Some((pos, _)) = matched {
            return Some(pos);
        }

        let region = self.config.tagging.title_region_ratio * self.filters.viewport().height;
        let in_region = pool.iter().any(|tb| tb.top < region);
        pool.iter()
            .enumerate()
            .filter(|(_, tb)| !in_region || tb.top < region)
            .fold(None::<(usize, f64)>, |best, (pos, tb)| {
                let score = title_score(tb);
                match best {
                    Some((_, top)) if top >= score => best,
                    _ => Some((pos, score)),
                }
            })
            .map(|(pos, _)| pos)
    }

    /// Contents slides: aligned list rows with optional numbers to their left.
    fn tag_contents(&self, boxes: &[TextBox]) -> Vec<Tag> {
        let cfg = &self.config.tagging;
        let viewport = self.filters.viewport();
        let [band_top, band_bottom] = cfg.contents_band;

        let candidates: Vec<&TextBox> = boxes
            .iter()
            .filter(|tb| {
                !tb.is_empty()
                    && !self.filters.is_footer(tb)
                    && !self.filters.is_tiny(tb)
                    && tb.top >= band_top * viewport.height
                    && tb.top <= band_bottom * viewport.height
            })
            .collect();

        let rows: Vec<&TextBox> = candidates
            .iter()
            .copied()
            .filter(|tb| self.filters.is_list_like(tb))
            .collect();
        if rows.len() < cfg.contents_min_rows {
            log::debug!("Contents tagging abstained: {} row(s)", rows.len());
            return Vec::new();
        }

        let anchor = median(rows.iter().map(|tb| tb.left).collect());
        let indent = cfg.indent_tolerance_px.max(cfg.indent_tolerance_ratio * viewport.width);
        let mut items: Vec<&TextBox> = rows
            .into_iter()
            .filter(|tb| (tb.left - anchor).abs() <= indent)
            .collect();
        if items.len() < cfg.contents_min_rows {
            log::debug!("Contents tagging abstained: {} aligned row(s)", items.len());
            return Vec::new();
        }
        items.sort_by(|a, b| a.top.total_cmp(&b.top));

        let item_indices: BTreeSet<usize> = items.iter().map(|tb| tb.index).collect();
        let mut used = BTreeSet::new();
        let mut tags = Vec::new();

        for item in items {
            let group = new_id();
            tags.push(Tag::grouped(item.index, TextRole::Item, &group));

            let tolerance = (cfg.number_tolerance_height_ratio * item.height)
                .clamp(cfg.number_tolerance_min, cfg.number_tolerance_max);
            let number = candidates
                .iter()
                .filter(|tb| !item_indices.contains(&tb.index) && !used.contains(&tb.index))
                .filter(|tb| tb.width <= cfg.number_max_width_ratio * viewport.width)
                .filter(|tb| tb.left < item.left && tb.right() <= item.left + indent)
                .filter(|tb| (tb.center_y() - item.center_y()).abs() <= tolerance)
                .fold(None::<&&TextBox>, |best, tb| match best {
                    Some(current) if current.right() >= tb.right() => Some(current),
                    _ => Some(tb),
                });
            if let Some(number) = number {
                used.insert(number.index);
                tags.push(Tag::grouped(number.index, TextRole::ItemNumber, &group));
            }
        }
        tags
    }

    /// Content slides: numbers, one main body, and title/body pairs.
    fn tag_content(&self, boxes: &[TextBox]) -> Vec<Tag> {
        let cfg = &self.config.tagging;
        let viewport = self.filters.viewport();

        let candidates: Vec<&TextBox> = boxes
            .iter()
            .filter(|tb| {
                !tb.is_empty()
                    && !self.filters.is_footer(tb)
                    && !self.filters.is_tiny(tb)
                    && tb.top >= cfg.content_top_ratio * viewport.height
            })
            .collect();

        let (mut numbers, rest): (Vec<&TextBox>, Vec<&TextBox>) = candidates.into_iter().partition(|tb| {
            tb.width <= cfg.number_max_width_ratio * viewport.width
                && tb.left < viewport.width / 2.0
                && is_numeric_label(&tb.text)
        });
        numbers.sort_by(|a, b| a.top.total_cmp(&b.top));

        let mut tags = Vec::new();

        let body = rest
            .iter()
            .filter(|tb| {
                tb.width >= cfg.content_min_width_ratio * viewport.width
                    && tb.height >= cfg.content_min_height_ratio * viewport.height
                    && tb.area() >= cfg.content_min_area_ratio * viewport.area()
            })
            .fold(None::<&&TextBox>, |best, tb| match best {
                Some(current) if current.area() >= tb.area() => Some(current),
                _ => Some(tb),
            })
            .map(|tb| tb.index);
        if let Some(index) = body {
            tags.push(Tag::new(index, TextRole::Content));
        }

        let mut pair_pool: Vec<&TextBox> = rest
            .into_iter()
            .filter(|tb| Some(tb.index) != body)
            .filter(|tb| {
                tb.width >= cfg.pair_min_width_ratio * viewport.width
                    && tb.height <= cfg.pair_max_height_ratio * viewport.height
                    && tb.area() >= cfg.pair_min_area_ratio * viewport.area()
            })
            .collect();
        pair_pool.sort_by(|a, b| a.top.total_cmp(&b.top));

        let mut groups = Vec::new();
        for pair in pair_pool.chunks_exact(2).take(cfg.max_pairs) {
            let (title, item) = if pair[1].height < pair[0].height {
                (pair[1], pair[0])
            } else {
                (pair[0], pair[1])
            };
            let group = new_id();
            tags.push(Tag::grouped(title.index, TextRole::ItemTitle, &group));
            tags.push(Tag::grouped(item.index, TextRole::Item, &group));
            groups.push(group);
        }

        for (k, number) in numbers.iter().enumerate() {
            match groups.get(k) {
                Some(group) => tags.push(Tag::grouped(number.index, TextRole::ItemNumber, group)),
                None => tags.push(Tag::new(number.index, TextRole::ItemNumber)),
            }
        }
        tags
    }
}

/// A text role to apply to one element.
#[derive(Debug, Clone, PartialEq)]
struct Tag {
    index: usize,
    role: TextRole,
    group_id: Option<String>,
}

impl Tag {
    fn new(index: usize, role: TextRole) -> Self {
        Self {
            index,
            role,
            group_id: None,
        }
    }

    fn grouped(index: usize, role: TextRole, group: &str) -> Self {
        Self {
            index,
            role,
            group_id: Some(group.to_string()),
        }
    }
}

/// Larger font dominates, then higher placement, then area.
fn title_score(tb: &TextBox) -> f64 {
    tb.font_size * 100_000.0 - tb.top * 10.0 + tb.area() / 100.0
}

/// Larger area wins; equal areas prefer the upper box.
fn compare_area_then_top(a: &TextBox, b: &TextBox) -> Ordering {
    a.area()
        .total_cmp(&b.area())
        .then_with(|| b.top.total_cmp(&a.top))
}

fn median(mut values: Vec<f64>) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}
