//! Tunable configuration for slide classification, tagging, and synthesis.
//!
//! Every threshold and weight lives here as named data so that scoring can
//! be tuned (or loaded from JSON) without touching the algorithms.
//! Ratios are fractions of the viewport width (`W`) or slide height (`H`).

use deck_core::{SlideRole, TextRole};
use serde::{Deserialize, Serialize};

use crate::features::SlideFeatures;

/// Complete template import configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TemplateConfig {
    pub scoring: ScoringTable,
    pub lexicons: Lexicons,
    pub filters: FilterConfig,
    pub tagging: TaggingConfig,
    pub placeholders: PlaceholderConfig,
}

/// Observable slide property a scoring rule reacts to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "when", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Signal {
    /// Fires once per role keyword found in the slide text.
    KeywordHits,
    /// At most `count` usable text elements.
    TextCountAtMost { count: usize },
    /// At least `count` usable text elements.
    TextCountAtLeast { count: usize },
    /// Largest font is at least `size`.
    FontAtLeast { size: f64 },
    /// Largest font is at least `size` and its element's top lies in
    /// `[min_top, max_top)` of the slide height.
    FontAtLeastWithin { size: f64, min_top: f64, max_top: f64 },
    /// Fires once per list-like box, up to `cap`.
    ListLikeCount { cap: usize },
    /// At least `count` list-like boxes.
    ListLikeAtLeast { count: usize },
}

impl Signal {
    /// Strength of the signal for a slide: a count, or 1/0 for conditions.
    pub fn strength(&self, features: &SlideFeatures, keyword_hits: usize) -> f64 {
        let fired = |condition: bool| if condition { 1.0 } else { 0.0 };
        match *self {
            Signal::KeywordHits => keyword_hits as f64,
            Signal::TextCountAtMost { count } => fired(features.text_count <= count),
            Signal::TextCountAtLeast { count } => fired(features.text_count >= count),
            Signal::FontAtLeast { size } => fired(features.largest_font >= size),
            Signal::FontAtLeastWithin { size, min_top, max_top } => {
                let top = features.largest_font_top_ratio;
                fired(features.largest_font >= size && top >= min_top && top < max_top)
            }
            Signal::ListLikeCount { cap } => features.list_like.min(cap) as f64,
            Signal::ListLikeAtLeast { count } => fired(features.list_like >= count),
        }
    }
}

/// A weighted signal; negative weights penalize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRule {
    #[serde(flatten)]
    pub signal: Signal,
    pub weight: f64,
}

impl ScoreRule {
    pub fn new(signal: Signal, weight: f64) -> Self {
        Self { signal, weight }
    }
}

/// Scoring rules for one role and the minimum score needed to claim a slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleScoring {
    pub rules: Vec<ScoreRule>,
    pub threshold: f64,
}

/// Scoring rules per role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScoringTable {
    pub cover: RoleScoring,
    pub contents: RoleScoring,
    pub transition: RoleScoring,
    pub content: RoleScoring,
    pub end: RoleScoring,
}

impl ScoringTable {
    pub fn for_role(&self, role: SlideRole) -> &RoleScoring {
        match role {
            SlideRole::Cover => &self.cover,
            SlideRole::Contents => &self.contents,
            SlideRole::Transition => &self.transition,
            SlideRole::Content => &self.content,
            SlideRole::End => &self.end,
        }
    }
}

impl Default for ScoringTable {
    fn default() -> Self {
        use Signal::*;
        Self {
            end: RoleScoring {
                rules: vec![
                    ScoreRule::new(KeywordHits, 3.0),
                    ScoreRule::new(TextCountAtMost { count: 3 }, 1.0),
                    ScoreRule::new(FontAtLeast { size: 36.0 }, 1.0),
                ],
                threshold: 3.0,
            },
            contents: RoleScoring {
                rules: vec![
                    ScoreRule::new(KeywordHits, 3.0),
                    ScoreRule::new(ListLikeCount { cap: 6 }, 0.5),
                    ScoreRule::new(TextCountAtLeast { count: 5 }, 1.0),
                    ScoreRule::new(
                        FontAtLeastWithin {
                            size: 28.0,
                            min_top: 0.0,
                            max_top: 0.3,
                        },
                        1.0,
                    ),
                ],
                threshold: 3.0,
            },
            transition: RoleScoring {
                rules: vec![
                    ScoreRule::new(KeywordHits, 3.0),
                    ScoreRule::new(TextCountAtMost { count: 3 }, 1.0),
                    ScoreRule::new(
                        FontAtLeastWithin {
                            size: 40.0,
                            min_top: 0.2,
                            max_top: 0.7,
                        },
                        1.5,
                    ),
                    ScoreRule::new(ListLikeAtLeast { count: 4 }, -2.0),
                ],
                threshold: 3.0,
            },
            cover: RoleScoring {
                rules: vec![
                    ScoreRule::new(KeywordHits, 2.0),
                    ScoreRule::new(
                        FontAtLeastWithin {
                            size: 40.0,
                            min_top: 0.0,
                            max_top: 0.35,
                        },
                        2.0,
                    ),
                    ScoreRule::new(TextCountAtMost { count: 4 }, 1.0),
                    ScoreRule::new(ListLikeAtLeast { count: 4 }, -2.0),
                ],
                threshold: 2.5,
            },
            content: RoleScoring {
                rules: vec![
                    ScoreRule::new(ListLikeAtLeast { count: 4 }, 2.0),
                    ScoreRule::new(TextCountAtLeast { count: 2 }, 1.0),
                ],
                threshold: 0.0,
            },
        }
    }
}

/// Bilingual keyword lexicons per role. Matching is case-insensitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Lexicons {
    pub cover: Vec<String>,
    pub contents: Vec<String>,
    pub transition: Vec<String>,
    pub end: Vec<String>,
    /// Vendor or boilerplate words marking brand-like text.
    pub brand: Vec<String>,
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

impl Default for Lexicons {
    fn default() -> Self {
        Self {
            cover: words(&[
                "welcome", "presentation", "presented by", "presenter", "report", "proposal",
                "欢迎", "汇报", "报告", "主讲", "演讲",
            ]),
            contents: words(&[
                "contents", "table of contents", "agenda", "outline", "overview",
                "目录", "大纲", "议程", "提纲",
            ]),
            transition: words(&["part", "chapter", "section", "部分", "章节"]),
            end: words(&[
                "thank you", "thanks", "thank", "the end", "q&a", "questions", "goodbye",
                "谢谢", "感谢", "致谢", "结束", "再见",
            ]),
            brand: words(&[
                "logo", "copyright", "all rights reserved", "powered by", "©", "版权所有",
            ]),
        }
    }
}

/// Geometry filters shared by scoring and tagging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterConfig {
    /// Font size assumed for text without an inline size.
    pub default_font_size: f64,

    /// Footer: top at or below this fraction of `H`...
    pub footer_top_ratio: f64,
    /// ...and height at most `max(footer_max_height_px, footer_max_height_ratio * H)`.
    pub footer_max_height_px: f64,
    pub footer_max_height_ratio: f64,

    /// Brand region: left at or beyond `(1 - brand_region_width_ratio) * W`,
    /// top within `brand_region_height_ratio * H`.
    pub brand_region_width_ratio: f64,
    pub brand_region_height_ratio: f64,
    pub brand_max_font: f64,

    /// Tiny: area at most this fraction of the slide with a small font...
    pub tiny_area_ratio: f64,
    pub tiny_font: f64,
    /// ...or width at most this fraction of `W` with a small font...
    pub tiny_width_ratio: f64,
    /// ...or height at most this many pixels.
    pub tiny_max_height_px: f64,

    /// List-like row: wide, short, and not too large.
    pub list_min_width_ratio: f64,
    pub list_max_height_ratio: f64,
    pub list_max_area_ratio: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            default_font_size: 18.0,
            footer_top_ratio: 0.9,
            footer_max_height_px: 18.0,
            footer_max_height_ratio: 0.04,
            brand_region_width_ratio: 0.35,
            brand_region_height_ratio: 0.18,
            brand_max_font: 22.0,
            tiny_area_ratio: 0.004,
            tiny_font: 12.0,
            tiny_width_ratio: 0.12,
            tiny_max_height_px: 10.0,
            list_min_width_ratio: 0.28,
            list_max_height_ratio: 0.16,
            list_max_area_ratio: 0.25,
        }
    }
}

/// Thresholds used by the per-role taggers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaggingConfig {
    /// Titles are preferred from the upper part of the slide.
    pub title_region_ratio: f64,

    pub part_number_max_width_ratio: f64,
    pub part_number_max_chars: usize,

    /// Contents rows must lie within this vertical band of `H`.
    pub contents_band: [f64; 2],
    pub contents_min_rows: usize,
    pub indent_tolerance_px: f64,
    pub indent_tolerance_ratio: f64,
    /// Row numbers must be vertically within `clamp(ratio * row height, min, max)`.
    pub number_tolerance_min: f64,
    pub number_tolerance_max: f64,
    pub number_tolerance_height_ratio: f64,
    pub number_max_width_ratio: f64,

    /// Content slides ignore the header band above this fraction of `H`.
    pub content_top_ratio: f64,
    pub content_min_width_ratio: f64,
    pub content_min_height_ratio: f64,
    pub content_min_area_ratio: f64,
    pub pair_min_width_ratio: f64,
    pub pair_max_height_ratio: f64,
    pub pair_min_area_ratio: f64,
    pub max_pairs: usize,
}

impl Default for TaggingConfig {
    fn default() -> Self {
        Self {
            title_region_ratio: 0.45,
            part_number_max_width_ratio: 0.14,
            part_number_max_chars: 4,
            contents_band: [0.13, 0.87],
            contents_min_rows: 3,
            indent_tolerance_px: 24.0,
            indent_tolerance_ratio: 0.06,
            number_tolerance_min: 16.0,
            number_tolerance_max: 36.0,
            number_tolerance_height_ratio: 0.8,
            number_max_width_ratio: 0.14,
            content_top_ratio: 0.16,
            content_min_width_ratio: 0.35,
            content_min_height_ratio: 0.12,
            content_min_area_ratio: 0.06,
            pair_min_width_ratio: 0.22,
            pair_max_height_ratio: 0.18,
            pair_min_area_ratio: 0.01,
            max_pairs: 4,
        }
    }
}

/// Geometry of one synthesized text slot, as fractions of `W`/`H`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceholderSlot {
    pub role: TextRole,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    /// Font size in pixels.
    pub font_size: f64,
}

const fn slot(role: TextRole, left: f64, top: f64, width: f64, height: f64, font_size: f64) -> PlaceholderSlot {
    PlaceholderSlot {
        role,
        left,
        top,
        width,
        height,
        font_size,
    }
}

/// A repeated set of linked slots, laid out column by column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceholderGroup {
    /// Tag whose slide-wide absence triggers synthesis of the whole set.
    pub anchor: TextRole,
    pub count: usize,
    pub columns: usize,
    /// Horizontal offset between columns, fraction of `W`.
    pub column_step: f64,
    /// Vertical offset between rows, fraction of `H`.
    pub row_step: f64,
    /// Slots of the first group; later groups are offset copies.
    pub slots: Vec<PlaceholderSlot>,
}

/// Placeholder layout for one role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RolePlaceholders {
    pub singles: Vec<PlaceholderSlot>,
    pub group: Option<PlaceholderGroup>,
}

/// Placeholder layouts per role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlaceholderConfig {
    pub cover: RolePlaceholders,
    pub contents: RolePlaceholders,
    pub transition: RolePlaceholders,
    pub content: RolePlaceholders,
    pub end: RolePlaceholders,
}

impl PlaceholderConfig {
    pub fn for_role(&self, role: SlideRole) -> &RolePlaceholders {
        match role {
            SlideRole::Cover => &self.cover,
            SlideRole::Contents => &self.contents,
            SlideRole::Transition => &self.transition,
            SlideRole::Content => &self.content,
            SlideRole::End => &self.end,
        }
    }
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        use TextRole::*;
        Self {
            cover: RolePlaceholders {
                singles: vec![
                    slot(Title, 0.1, 0.3, 0.8, 0.15, 48.0),
                    slot(Content, 0.1, 0.5, 0.8, 0.1, 24.0),
                ],
                group: None,
            },
            contents: RolePlaceholders {
                singles: vec![],
                group: Some(PlaceholderGroup {
                    anchor: Item,
                    count: 10,
                    columns: 2,
                    column_step: 0.42,
                    row_step: 0.14,
                    slots: vec![
                        slot(ItemNumber, 0.08, 0.18, 0.06, 0.1, 20.0),
                        slot(Item, 0.15, 0.18, 0.3, 0.1, 20.0),
                    ],
                }),
            },
            transition: RolePlaceholders {
                singles: vec![
                    slot(PartNumber, 0.1, 0.3, 0.15, 0.15, 60.0),
                    slot(Title, 0.3, 0.3, 0.6, 0.15, 40.0),
                    slot(Content, 0.3, 0.48, 0.6, 0.1, 20.0),
                ],
                group: None,
            },
            content: RolePlaceholders {
                singles: vec![slot(Content, 0.08, 0.18, 0.84, 0.2, 18.0)],
                group: Some(PlaceholderGroup {
                    anchor: Item,
                    count: 4,
                    columns: 2,
                    column_step: 0.44,
                    row_step: 0.27,
                    slots: vec![
                        slot(ItemNumber, 0.08, 0.42, 0.06, 0.08, 20.0),
                        slot(ItemTitle, 0.16, 0.42, 0.32, 0.08, 20.0),
                        slot(Item, 0.16, 0.51, 0.32, 0.16, 16.0),
                    ],
                }),
            },
            end: RolePlaceholders {
                singles: vec![slot(Title, 0.1, 0.4, 0.8, 0.15, 48.0)],
                group: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_round_trips_through_json() {
        let config = TemplateConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: TemplateConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.scoring, config.scoring);
        assert_eq!(parsed.placeholders, config.placeholders);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: TemplateConfig =
            serde_json::from_str(r#"{"filters": {"tinyFont": 10.0}}"#).unwrap();
        assert_eq!(parsed.filters.tiny_font, 10.0);
        assert_eq!(parsed.filters.footer_top_ratio, 0.9);
        assert_eq!(parsed.scoring, ScoringTable::default());
    }

    #[test]
    fn test_score_rule_json_shape() {
        let rule = ScoreRule::new(Signal::TextCountAtMost { count: 3 }, 1.0);
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["when"], "textCountAtMost");
        assert_eq!(json["count"], 3);
        assert_eq!(json["weight"], 1.0);

        let rule = ScoreRule::new(
            Signal::FontAtLeastWithin {
                size: 40.0,
                min_top: 0.2,
                max_top: 0.7,
            },
            1.5,
        );
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["when"], "fontAtLeastWithin");
        assert_eq!(json["minTop"], 0.2);
        assert_eq!(json["maxTop"], 0.7);
    }

    #[test]
    fn test_config_keys_are_camel_case() {
        let json = serde_json::to_value(TemplateConfig::default()).unwrap();
        assert_eq!(json["filters"]["footerTopRatio"], 0.9);
        assert!(json["filters"].get("footer_top_ratio").is_none());
        assert!(json["tagging"].as_object().unwrap().keys().all(|key| !key.contains('_')));
        assert!(json["placeholders"]["contents"]["group"]["columnStep"].is_number());
    }

    #[test]
    fn test_signal_strength() {
        let features = SlideFeatures {
            text_count: 2,
            largest_font: 44.0,
            largest_font_top_ratio: 0.5,
            list_like: 9,
            text: String::new(),
        };
        assert_eq!(Signal::KeywordHits.strength(&features, 2), 2.0);
        assert_eq!(Signal::TextCountAtMost { count: 3 }.strength(&features, 0), 1.0);
        assert_eq!(Signal::TextCountAtLeast { count: 3 }.strength(&features, 0), 0.0);
        assert_eq!(Signal::ListLikeCount { cap: 6 }.strength(&features, 0), 6.0);
        let centered = Signal::FontAtLeastWithin {
            size: 40.0,
            min_top: 0.2,
            max_top: 0.7,
        };
        assert_eq!(centered.strength(&features, 0), 1.0);
        let top = Signal::FontAtLeastWithin {
            size: 40.0,
            min_top: 0.0,
            max_top: 0.35,
        };
        assert_eq!(top.strength(&features, 0), 0.0);
    }

    #[test]
    fn test_placeholder_groups() {
        let config = PlaceholderConfig::default();
        let contents = config.contents.group.as_ref().unwrap();
        assert_eq!(contents.count, 10);
        assert_eq!(contents.slots.len(), 2);
        let content = config.content.group.as_ref().unwrap();
        assert_eq!(content.count, 4);
        assert_eq!(content.slots.len(), 3);
    }
}
