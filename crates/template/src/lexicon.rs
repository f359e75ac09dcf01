//! Keyword matching over normalized slide text.
//!
//! Text and keywords are both NFKC-normalized and lowercased, so full-width
//! forms and case variants match. ASCII keywords are matched on word
//! boundaries; CJK keywords match as substrings.

use deck_core::SlideRole;
use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

use crate::config::Lexicons;

/// Numbers such as `01`, `3.`, `IV`, `第二`, or `Part 2`.
static NUMERIC_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:no\.?\s*|part\s*|第)?(?:\d{1,3}|[一二三四五六七八九十]{1,3}|[ivxlc]{1,5})(?:[.、:：)）]|部分|章)?$",
    )
    .unwrap()
});

/// Normalize text for matching.
pub fn normalize(text: &str) -> String {
    text.nfkc().collect::<String>().to_lowercase()
}

/// Whether the text reads as a list or section number.
pub fn is_numeric_label(text: &str) -> bool {
    NUMERIC_REGEX.is_match(normalize(text).trim())
}

/// A compiled keyword list.
#[derive(Debug, Clone, Default)]
pub struct KeywordMatcher {
    patterns: Vec<Regex>,
}

impl KeywordMatcher {
    pub fn new(keywords: &[String]) -> Self {
        let patterns = keywords
            .iter()
            .map(|keyword| normalize(keyword.trim()))
            .filter(|keyword| !keyword.is_empty())
            .filter_map(|keyword| match Regex::new(&keyword_pattern(&keyword)) {
                Ok(regex) => Some(regex),
                Err(e) => {
                    log::warn!("Skipping keyword '{}': {}", keyword, e);
                    None
                }
            })
            .collect();

        Self { patterns }
    }

    /// Number of distinct keywords found in already-normalized text.
    pub fn hits(&self, normalized: &str) -> usize {
        self.patterns
            .iter()
            .filter(|pattern| pattern.is_match(normalized))
            .count()
    }

    /// Whether any keyword occurs in the (raw) text.
    pub fn matches(&self, text: &str) -> bool {
        self.hits(&normalize(text)) > 0
    }
}

fn keyword_pattern(keyword: &str) -> String {
    let escaped = regex::escape(keyword);
    let starts_word = keyword.chars().next().is_some_and(|c| c.is_ascii_alphanumeric());
    let ends_word = keyword.chars().last().is_some_and(|c| c.is_ascii_alphanumeric());

    format!(
        "{}{}{}",
        if starts_word { r"\b" } else { "" },
        escaped,
        if ends_word { r"\b" } else { "" }
    )
}

/// Keyword matchers for every role plus brand boilerplate.
#[derive(Debug, Clone)]
pub struct CompiledLexicons {
    cover: KeywordMatcher,
    contents: KeywordMatcher,
    transition: KeywordMatcher,
    end: KeywordMatcher,
    pub brand: KeywordMatcher,
    none: KeywordMatcher,
}

impl CompiledLexicons {
    pub fn new(lexicons: &Lexicons) -> Self {
        Self {
            cover: KeywordMatcher::new(&lexicons.cover),
            contents: KeywordMatcher::new(&lexicons.contents),
            transition: KeywordMatcher::new(&lexicons.transition),
            end: KeywordMatcher::new(&lexicons.end),
            brand: KeywordMatcher::new(&lexicons.brand),
            none: KeywordMatcher::default(),
        }
    }

    /// Matcher for a slide role; content slides have no lexicon.
    pub fn for_role(&self, role: SlideRole) -> &KeywordMatcher {
        match role {
            SlideRole::Cover => &self.cover,
            SlideRole::Contents => &self.contents,
            SlideRole::Transition => &self.transition,
            SlideRole::End => &self.end,
            SlideRole::Content => &self.none,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexicons() -> CompiledLexicons {
        CompiledLexicons::new(&Lexicons::default())
    }

    #[test]
    fn test_normalize_full_width_and_case() {
        assert_eq!(normalize("ＴＨＡＮＫ You"), "thank you");
        assert_eq!(normalize("Ｑ＆Ａ"), "q&a");
    }

    #[test]
    fn test_word_boundaries_for_ascii() {
        let lex = lexicons();
        let transition = lex.for_role(SlideRole::Transition);
        assert!(transition.matches("Part 1"));
        assert!(!transition.matches("Our partners"));

        let end = lex.for_role(SlideRole::End);
        assert_eq!(end.hits(&normalize("Thank You")), 2);
        assert!(end.matches("Any Q&A?"));
    }

    #[test]
    fn test_cjk_substring_match() {
        let lex = lexicons();
        assert!(lex.for_role(SlideRole::End).matches("谢谢观看"));
        assert!(lex.for_role(SlideRole::Contents).matches("目录 CONTENTS"));
        assert!(lex.for_role(SlideRole::Transition).matches("第一部分"));
    }

    #[test]
    fn test_content_has_no_keywords() {
        let lex = lexicons();
        assert_eq!(lex.for_role(SlideRole::Content).hits("thank you agenda"), 0);
    }

    #[test]
    fn test_numeric_labels() {
        for label in ["01", "3.", "IV", "第二", "Part 2", "２", "1)"] {
            assert!(is_numeric_label(label), "{}", label);
        }
        for label in ["Revenue", "2024 plan", "", "one"] {
            assert!(!is_numeric_label(label), "{}", label);
        }
    }

    #[test]
    fn test_brand_keywords() {
        let lex = lexicons();
        assert!(lex.brand.matches("© 2024 Acme"));
        assert!(lex.brand.matches("All Rights Reserved"));
        assert!(!lex.brand.matches("Quarterly results"));
    }
}
