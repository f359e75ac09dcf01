//! Slide role scoring and assignment.
//!
//! Each converted slide is scored for every role from its [`SlideFeatures`].
//! Roles are then assigned greedily in priority order (end, cover, contents,
//! transition), each claiming at most one slide. Whatever stays unclaimed
//! becomes content.

use deck_core::SlideRole;
use std::collections::BTreeSet;

use crate::config::{RoleScoring, TemplateConfig};
use crate::features::SlideFeatures;
use crate::lexicon::CompiledLexicons;

/// Order in which singular roles claim slides.
const CLAIM_ORDER: [SlideRole; 4] = [
    SlideRole::End,
    SlideRole::Cover,
    SlideRole::Contents,
    SlideRole::Transition,
];

/// Score one slide for one role.
pub fn score(features: &SlideFeatures, scoring: &RoleScoring, lexicons: &CompiledLexicons, role: SlideRole) -> f64 {
    let hits = lexicons.for_role(role).hits(&features.text);
    scoring
        .rules
        .iter()
        .map(|rule| rule.weight * rule.signal.strength(features, hits))
        .sum()
}

/// Source slide index chosen for every output role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAssignment {
    pub cover: usize,
    pub contents: usize,
    pub transition: usize,
    pub end: usize,
    /// Never empty.
    pub content: Vec<usize>,
}

impl RoleAssignment {
    /// Source index for a singular role.
    pub fn slide_for(&self, role: SlideRole) -> Option<usize> {
        match role {
            SlideRole::Cover => Some(self.cover),
            SlideRole::Contents => Some(self.contents),
            SlideRole::Transition => Some(self.transition),
            SlideRole::End => Some(self.end),
            SlideRole::Content => None,
        }
    }
}

/// Positional guess for a role when no slide scores high enough.
fn positional_default(role: SlideRole, slide_count: usize) -> usize {
    let last = slide_count.saturating_sub(1);
    let idx = match role {
        SlideRole::Cover => 0,
        SlideRole::Contents => 1,
        SlideRole::Transition => 2,
        SlideRole::End => last,
        SlideRole::Content => 0,
    };
    idx.min(last)
}

/// Pick a slide for `role`, recording it in `claimed` when it takes ownership.
///
/// The best-scoring unclaimed slide wins if it reaches the threshold (ties go
/// to the earlier slide). Otherwise the positional default is used, then the
/// first unclaimed slide. When every slide is already claimed, the
/// positional default is shared without being claimed again.
fn claim(role: SlideRole, scores: &[f64], threshold: f64, claimed: &mut BTreeSet<usize>) -> usize {
    let best = scores
        .iter()
        .enumerate()
        .filter(|(idx, _)| !claimed.contains(idx))
        .fold(None::<(usize, f64)>, |best, (idx, &score)| match best {
            Some((_, top)) if top >= score => best,
            _ => Some((idx, score)),
        });

    if let Some((idx, score)) = best {
        if score >= threshold {
            log::debug!("{} -> slide {} (score {:.2})", role.as_str(), idx, score);
            claimed.insert(idx);
            return idx;
        }
    }

    let default = positional_default(role, scores.len());
    if !claimed.contains(&default) {
        log::debug!("{} -> slide {} (positional)", role.as_str(), default);
        claimed.insert(default);
        return default;
    }

    if let Some(idx) = (0..scores.len()).find(|idx| !claimed.contains(idx)) {
        log::debug!("{} -> slide {} (first unclaimed)", role.as_str(), idx);
        claimed.insert(idx);
        return idx;
    }

    log::debug!("{} -> slide {} (shared)", role.as_str(), default);
    default
}

/// Assign a source slide to every role. Returns `None` for an empty deck.
pub fn assign_roles(
    features: &[SlideFeatures],
    config: &TemplateConfig,
    lexicons: &CompiledLexicons,
) -> Option<RoleAssignment> {
    if features.is_empty() {
        return None;
    }

    let mut claimed = BTreeSet::new();
    let mut picks = [0usize; 4];
    for (slot, role) in CLAIM_ORDER.iter().enumerate() {
        let scoring = config.scoring.for_role(*role);
        let scores: Vec<f64> = features
            .iter()
            .map(|f| score(f, scoring, lexicons, *role))
            .collect();
        picks[slot] = claim(*role, &scores, scoring.threshold, &mut claimed);
    }
    let [end, cover, contents, transition] = picks;

    let mut content: Vec<usize> = (0..features.len())
        .filter(|idx| !claimed.contains(idx))
        .collect();
    if content.is_empty() {
        content.push(cover);
    }

    Some(RoleAssignment {
        cover,
        contents,
        transition,
        end,
        content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Lexicons;

    fn lexicons() -> CompiledLexicons {
        CompiledLexicons::new(&Lexicons::default())
    }

    fn features(text: &str, count: usize, font: f64, top: f64, list_like: usize) -> SlideFeatures {
        SlideFeatures {
            text_count: count,
            largest_font: font,
            largest_font_top_ratio: top,
            list_like,
            text: text.to_string(),
        }
    }

    fn score_for(f: &SlideFeatures, role: SlideRole) -> f64 {
        let config = TemplateConfig::default();
        score(f, config.scoring.for_role(role), &lexicons(), role)
    }

    #[test]
    fn test_thank_you_scores_end_above_content() {
        let f = features("thank you", 1, 44.0, 0.4, 0);
        let end = score_for(&f, SlideRole::End);
        assert!(end > score_for(&f, SlideRole::Content));
        assert!(end >= TemplateConfig::default().scoring.end.threshold);
    }

    #[test]
    fn test_list_slide_scores_contents() {
        let f = features("目录\na\nb\nc\nd\ne", 6, 32.0, 0.1, 5);
        assert!(score_for(&f, SlideRole::Contents) >= 3.0);
        assert!(score_for(&f, SlideRole::Cover) < 2.5);
    }

    #[test]
    fn test_list_penalizes_transition() {
        let plain = features("part 1", 2, 44.0, 0.4, 0);
        let listy = features("part 1", 2, 44.0, 0.4, 4);
        assert!(score_for(&listy, SlideRole::Transition) < score_for(&plain, SlideRole::Transition));
    }

    #[test]
    fn test_three_slide_deck() {
        let slides = vec![
            features("welcome", 2, 44.0, 0.1, 1),
            features("agenda\nintro\ngoals\nplan\nwrap-up", 5, 32.0, 0.05, 4),
            features("thank you", 1, 44.0, 0.4, 0),
        ];
        let assignment = assign_roles(&slides, &TemplateConfig::default(), &lexicons()).unwrap();
        assert_eq!(assignment.end, 2);
        assert_eq!(assignment.cover, 0);
        assert_eq!(assignment.contents, 1);
        // Every slide is claimed: transition shares its positional slot and
        // content falls back to the cover.
        assert_eq!(assignment.transition, 2);
        assert_eq!(assignment.content, vec![0]);
    }

    #[test]
    fn test_unclaimed_slides_become_content() {
        let slides = vec![
            features("welcome", 2, 44.0, 0.1, 0),
            features("", 3, 18.0, 0.3, 0),
            features("chapter one", 2, 44.0, 0.4, 0),
            features("", 4, 18.0, 0.3, 3),
            features("", 4, 18.0, 0.3, 2),
            features("thanks", 1, 40.0, 0.4, 0),
        ];
        let assignment = assign_roles(&slides, &TemplateConfig::default(), &lexicons()).unwrap();
        assert_eq!(assignment.end, 5);
        assert_eq!(assignment.cover, 0);
        assert_eq!(assignment.transition, 2);
        assert_eq!(assignment.contents, 1);
        assert_eq!(assignment.content, vec![3, 4]);
    }

    #[test]
    fn test_collision_takes_first_unclaimed() {
        let mut claimed = BTreeSet::from([1]);
        // Nothing reaches the threshold and the default (1) is taken.
        assert_eq!(claim(SlideRole::Contents, &[0.0, 0.0, 0.0], 3.0, &mut claimed), 0);
        assert!(claimed.contains(&0));
    }

    #[test]
    fn test_ties_prefer_earlier_slide() {
        let mut claimed = BTreeSet::new();
        assert_eq!(claim(SlideRole::Cover, &[1.0, 4.0, 4.0], 2.5, &mut claimed), 1);
    }

    #[test]
    fn test_single_slide_deck() {
        let slides = vec![features("hello", 1, 24.0, 0.3, 0)];
        let assignment = assign_roles(&slides, &TemplateConfig::default(), &lexicons()).unwrap();
        assert_eq!(assignment.end, 0);
        assert_eq!(assignment.cover, 0);
        assert_eq!(assignment.contents, 0);
        assert_eq!(assignment.transition, 0);
        assert_eq!(assignment.content, vec![0]);
    }

    #[test]
    fn test_empty_deck() {
        assert!(assign_roles(&[], &TemplateConfig::default(), &lexicons()).is_none());
    }
}
