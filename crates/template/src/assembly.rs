//! Template deck assembly: classify, tag, synthesize, and order.

use deck_core::model::Background;
use deck_core::{new_id, Deck, Slide, SlideElement, SlideRole};

use crate::classifier::{assign_roles, RoleAssignment};
use crate::config::TemplateConfig;
use crate::features::{Filters, SlideFeatures, Viewport};
use crate::lexicon::CompiledLexicons;
use crate::synthesizer::synthesize;
use crate::tagger::Tagger;

/// Builds a five-role template deck from converted slides.
#[derive(Debug, Clone, Default)]
pub struct TemplateAssembler {
    config: TemplateConfig,
}

impl TemplateAssembler {
    pub fn new(config: TemplateConfig) -> Self {
        Self { config }
    }

    /// Assemble `[cover, contents, transition, content..., end]`.
    ///
    /// Source slides are never modified; each output slide is a tagged
    /// clone with fresh ids, so one source slide may back several roles.
    pub fn assemble(&self, deck: &Deck) -> Deck {
        let viewport = Viewport {
            width: deck.viewport_width,
            height: deck.viewport_height(),
        };
        let lexicons = CompiledLexicons::new(&self.config.lexicons);
        let filters = Filters::new(&self.config.filters, &lexicons.brand, viewport);
        let default_font = self.config.filters.default_font_size;

        let features: Vec<SlideFeatures> = deck
            .slides
            .iter()
            .map(|slide| SlideFeatures::extract(slide, &filters, default_font))
            .collect();
        let assignment = assign_roles(&features, &self.config, &lexicons);
        if assignment.is_none() {
            log::warn!("Deck has no slides, synthesizing a blank template");
        }

        let tagger = Tagger::new(&self.config, &lexicons, filters);
        let build = |role: SlideRole, source: Option<usize>| -> Slide {
            let source = source.and_then(|idx| deck.slides.get(idx));
            let mut slide = match source {
                Some(slide) => tagger.tag(slide, role),
                None => blank_slide(),
            };
            synthesize(
                &mut slide,
                role,
                self.config.placeholders.for_role(role),
                viewport,
                &deck.theme,
            );
            refresh_ids(&mut slide);
            slide.role = Some(role);
            slide
        };

        let pick = |role: SlideRole| assignment.as_ref().and_then(|a| a.slide_for(role));
        let content: Vec<Option<usize>> = match &assignment {
            Some(RoleAssignment { content, .. }) => content.iter().copied().map(Some).collect(),
            None => vec![None],
        };

        let mut slides = Vec::with_capacity(content.len() + 4);
        slides.push(build(SlideRole::Cover, pick(SlideRole::Cover)));
        slides.push(build(SlideRole::Contents, pick(SlideRole::Contents)));
        slides.push(build(SlideRole::Transition, pick(SlideRole::Transition)));
        slides.extend(content.into_iter().map(|idx| build(SlideRole::Content, idx)));
        slides.push(build(SlideRole::End, pick(SlideRole::End)));

        log::info!(
            "Assembled template deck: {} slide(s) from {} source slide(s)",
            slides.len(),
            deck.slides.len()
        );

        Deck {
            slides,
            theme: deck.theme.clone(),
            viewport_width: deck.viewport_width,
            viewport_ratio: deck.viewport_ratio,
        }
    }
}

fn blank_slide() -> Slide {
    Slide {
        id: new_id(),
        elements: Vec::new(),
        background: Background::Solid {
            color: "#fff".to_string(),
        },
        remark: String::new(),
        role: None,
    }
}

/// Give the slide, its elements, and table cells fresh ids.
fn refresh_ids(slide: &mut Slide) {
    slide.id = new_id();
    for el in &mut slide.elements {
        el.set_id(new_id());
        if let SlideElement::Table(table) = el {
            for cell in table.data.iter_mut().flatten() {
                cell.id = new_id();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::tests::{slide, text_el};
    use deck_core::{Theme, TextRole};
    use std::collections::BTreeSet;

    fn deck(slides: Vec<Slide>) -> Deck {
        Deck {
            slides,
            theme: Theme {
                theme_colors: vec!["#4472c4".into()],
                font_name: "Microsoft YaHei".into(),
                font_color: "#333".into(),
            },
            viewport_width: 1000.0,
            viewport_ratio: 0.5625,
        }
    }

    fn roles(deck: &Deck) -> Vec<SlideRole> {
        deck.slides.iter().filter_map(|s| s.role).collect()
    }

    #[test]
    fn test_empty_deck_is_fully_synthesized() {
        let out = TemplateAssembler::default().assemble(&deck(vec![]));
        assert_eq!(
            roles(&out),
            vec![
                SlideRole::Cover,
                SlideRole::Contents,
                SlideRole::Transition,
                SlideRole::Content,
                SlideRole::End
            ]
        );
        assert!(out.slides[1].has_text_role(TextRole::Item));
        assert!(out.slides[2].has_text_role(TextRole::PartNumber));
    }

    #[test]
    fn test_abstaining_contents_gets_ten_rows() {
        let source = deck(vec![slide(vec![
            text_el(100.0, 20.0, 400.0, 60.0, "Contents", 36.0),
            text_el(100.0, 120.0, 500.0, 40.0, "Intro", 24.0),
            text_el(100.0, 200.0, 500.0, 40.0, "Plan", 24.0),
        ])]);
        let out = TemplateAssembler::default().assemble(&source);
        let contents = &out.slides[1];
        assert_eq!(contents.role, Some(SlideRole::Contents));

        let count = |role: TextRole| {
            contents
                .text_elements()
                .filter(|(_, t)| t.text_type == Some(role))
                .count()
        };
        assert_eq!(count(TextRole::Item), 10);
        assert_eq!(count(TextRole::ItemNumber), 10);
        // The two real rows stay untagged.
        assert_eq!(contents.elements.len(), 23);
    }

    #[test]
    fn test_reused_slide_gets_distinct_ids() {
        let source = deck(vec![slide(vec![text_el(100.0, 100.0, 800.0, 80.0, "Hello", 24.0)])]);
        let out = TemplateAssembler::default().assemble(&source);
        assert_eq!(out.slides.len(), 5);

        let slide_ids: BTreeSet<_> = out.slides.iter().map(|s| s.id.clone()).collect();
        assert_eq!(slide_ids.len(), 5);
        let element_ids: Vec<_> = out
            .slides
            .iter()
            .flat_map(|s| s.elements.iter().map(|el| el.id().to_string()))
            .collect();
        let unique: BTreeSet<_> = element_ids.iter().cloned().collect();
        assert_eq!(unique.len(), element_ids.len());

        // The source deck is untouched.
        assert!(source.slides[0].role.is_none());
        assert!(source.slides[0].elements[0].as_text().unwrap().text_type.is_none());
    }

    #[test]
    fn test_multiple_content_slides_in_order() {
        let body = |label: &str| {
            slide(vec![
                text_el(50.0, 20.0, 900.0, 60.0, label, 32.0),
                text_el(50.0, 120.0, 900.0, 150.0, "Body", 18.0),
            ])
        };
        let source = deck(vec![
            slide(vec![text_el(100.0, 80.0, 800.0, 90.0, "Welcome", 48.0)]),
            slide(vec![text_el(100.0, 20.0, 400.0, 60.0, "Agenda", 40.0)]),
            body("Alpha"),
            body("Beta"),
            body("Gamma"),
            slide(vec![text_el(100.0, 200.0, 800.0, 90.0, "Thank you", 48.0)]),
        ]);
        let out = TemplateAssembler::default().assemble(&source);
        let out_roles = roles(&out);
        assert_eq!(out.slides.len(), 6);
        assert_eq!(out_roles.first(), Some(&SlideRole::Cover));
        assert_eq!(out_roles.last(), Some(&SlideRole::End));
        assert_eq!(out_roles[1], SlideRole::Contents);
        assert_eq!(out_roles[2], SlideRole::Transition);
        assert!(out_roles[3..out_roles.len() - 1]
            .iter()
            .all(|role| *role == SlideRole::Content));
        for s in &out.slides[3..out.slides.len() - 1] {
            assert!(s.has_text_role(TextRole::Content));
        }
    }
}
