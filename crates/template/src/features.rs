//! Text box features and geometry filters for converted slides.

use deck_core::markup::{max_font_size, plain_text};
use deck_core::model::TextElement;
use deck_core::Slide;
use regex::Regex;
use std::sync::LazyLock;

use crate::config::FilterConfig;
use crate::lexicon::{normalize, KeywordMatcher};

/// URLs and bare domains.
static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:https?://|www\.)\S+|\b[a-z0-9-]+(?:\.[a-z0-9-]+)*\.(?:com|cn|net|org|io|edu|gov|co)\b",
    )
    .unwrap()
});

/// Slide dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Geometry and text of one text element.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBox {
    /// Index of the element within its slide.
    pub index: usize,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub font_size: f64,
    pub text: String,
}

impl TextBox {
    pub fn new(index: usize, el: &TextElement, default_font_size: f64) -> Self {
        Self {
            index,
            left: el.placement.left,
            top: el.placement.top,
            width: el.placement.width,
            height: el.placement.height,
            font_size: max_font_size(&el.content).unwrap_or(default_font_size),
            text: plain_text(&el.content).replace('\u{a0}', " ").trim().to_string(),
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn center_y(&self) -> f64 {
        self.top + self.height / 2.0
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Every text box on a slide, in element order.
pub fn text_boxes(slide: &Slide, default_font_size: f64) -> Vec<TextBox> {
    slide
        .text_elements()
        .map(|(idx, el)| TextBox::new(idx, el, default_font_size))
        .collect()
}

/// Geometry filters evaluated against one viewport.
#[derive(Debug, Clone, Copy)]
pub struct Filters<'a> {
    config: &'a FilterConfig,
    brand: &'a KeywordMatcher,
    viewport: Viewport,
}

impl<'a> Filters<'a> {
    pub fn new(config: &'a FilterConfig, brand: &'a KeywordMatcher, viewport: Viewport) -> Self {
        Self {
            config,
            brand,
            viewport,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Short box hugging the bottom edge.
    pub fn is_footer(&self, tb: &TextBox) -> bool {
        let h = self.viewport.height;
        let max_height = self
            .config
            .footer_max_height_px
            .max(self.config.footer_max_height_ratio * h);
        tb.top >= self.config.footer_top_ratio * h && tb.height <= max_height
    }

    /// URL, vendor wording, or a small label in the top-right corner.
    pub fn is_brand(&self, tb: &TextBox) -> bool {
        if URL_REGEX.is_match(&tb.text) || self.brand.matches(&tb.text) {
            return true;
        }

        let Viewport { width, height } = self.viewport;
        let region_width = self.config.brand_region_width_ratio * width;
        let region_height = self.config.brand_region_height_ratio * height;
        tb.left >= width - region_width
            && tb.top <= region_height
            && tb.font_size <= self.config.brand_max_font
            && tb.width <= region_width
            && tb.height <= region_height
    }

    /// Too small to hold meaningful text.
    pub fn is_tiny(&self, tb: &TextBox) -> bool {
        let small_font = tb.font_size <= self.config.tiny_font;
        (tb.area() <= self.config.tiny_area_ratio * self.viewport.area() && small_font)
            || (tb.width <= self.config.tiny_width_ratio * self.viewport.width && small_font)
            || tb.height <= self.config.tiny_max_height_px
    }

    /// Wide, short box typical of a list row.
    pub fn is_list_like(&self, tb: &TextBox) -> bool {
        tb.width >= self.config.list_min_width_ratio * self.viewport.width
            && tb.height <= self.config.list_max_height_ratio * self.viewport.height
            && tb.area() <= self.config.list_max_area_ratio * self.viewport.area()
    }

    /// Non-empty and neither footer, brand, nor tiny.
    pub fn is_usable(&self, tb: &TextBox) -> bool {
        !tb.is_empty() && !self.is_footer(tb) && !self.is_brand(tb) && !self.is_tiny(tb)
    }
}

/// Summary of a slide used for role scoring.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlideFeatures {
    /// Usable text elements.
    pub text_count: usize,
    pub largest_font: f64,
    /// Top of the largest-font element as a fraction of slide height.
    pub largest_font_top_ratio: f64,
    pub list_like: usize,
    /// Normalized text of all usable elements.
    pub text: String,
}

impl SlideFeatures {
    pub fn extract(slide: &Slide, filters: &Filters, default_font_size: f64) -> Self {
        let boxes: Vec<TextBox> = text_boxes(slide, default_font_size)
            .into_iter()
            .filter(|tb| filters.is_usable(tb))
            .collect();

        let largest = boxes.iter().fold(None::<&TextBox>, |best, tb| match best {
            Some(current) if current.font_size >= tb.font_size => Some(current),
            _ => Some(tb),
        });
        let height = filters.viewport().height;

        Self {
            text_count: boxes.len(),
            largest_font: largest.map_or(0.0, |tb| tb.font_size),
            largest_font_top_ratio: match largest {
                Some(tb) if height > 0.0 => tb.top / height,
                _ => 0.0,
            },
            list_like: boxes.iter().filter(|tb| filters.is_list_like(tb)).count(),
            text: normalize(
                &boxes
                    .iter()
                    .map(|tb| tb.text.as_str())
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
        }
    }
}
