//! Import pipeline: parse, convert, optionally assemble, then commit once.

use deck_convert::Converter;
use deck_core::{Deck, Error, Result, Slide, SourceDocument};
use serde::{Deserialize, Serialize};

use crate::assembly::TemplateAssembler;

/// Turns raw input bytes into a parsed presentation tree.
pub trait DocumentParser {
    fn parse(&self, input: &[u8]) -> Result<SourceDocument>;
}

/// Parser for documents already rendered to the parsed-tree JSON shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDocumentParser;

impl DocumentParser for JsonDocumentParser {
    fn parse(&self, input: &[u8]) -> Result<SourceDocument> {
        serde_json::from_slice(input).map_err(|e| Error::ParseFailure(e.to_string()))
    }
}

/// The editor's slide store.
pub trait EditorState {
    /// Replace every slide, adopting the deck's theme and viewport.
    fn replace_all_slides(&mut self, deck: Deck) -> Result<()>;

    /// Append slides after the existing ones.
    fn append_slides(&mut self, slides: Vec<Slide>) -> Result<()>;
}

/// How converted slides are committed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImportMode {
    /// Replace the deck with the converted slides.
    #[default]
    Replace,
    /// Append converted slides to the current deck.
    Append,
    /// Replace the deck with an assembled five-role template.
    Template,
}

/// Result of an import attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    /// Slides were committed to the editor.
    Committed { slides: usize },
    /// No input was provided; nothing happened.
    Skipped,
}

/// Runs the whole import for one input.
#[derive(Debug, Clone)]
pub struct Importer<P> {
    parser: P,
    converter: Converter,
    assembler: TemplateAssembler,
}

impl<P: DocumentParser> Importer<P> {
    pub fn new(parser: P, converter: Converter, assembler: TemplateAssembler) -> Self {
        Self {
            parser,
            converter,
            assembler,
        }
    }

    /// Import `input` into `state`.
    ///
    /// A missing or empty input is a no-op. Parse failures abort before
    /// anything is committed; on success the editor is updated exactly once.
    pub fn import<S: EditorState>(&self, input: Option<&[u8]>, mode: ImportMode, state: &mut S) -> Result<ImportOutcome> {
        let Some(bytes) = input.filter(|bytes| !bytes.is_empty()) else {
            log::info!("No input selected, skipping import");
            return Ok(ImportOutcome::Skipped);
        };

        let document = self.parser.parse(bytes)?;
        let deck = self.build(&document, mode);
        let count = deck.slides.len();

        match mode {
            ImportMode::Append => state.append_slides(deck.slides)?,
            ImportMode::Replace | ImportMode::Template => state.replace_all_slides(deck)?,
        }

        log::info!("Imported {} slide(s)", count);
        Ok(ImportOutcome::Committed { slides: count })
    }

    /// Convert (and for template mode, assemble) without committing.
    pub fn build(&self, document: &SourceDocument, mode: ImportMode) -> Deck {
        let deck = self.converter.convert(document);
        match mode {
            ImportMode::Template => self.assembler.assemble(&deck),
            ImportMode::Replace | ImportMode::Append => deck,
        }
    }
}

/// In-memory editor state.
#[derive(Debug, Clone, Default)]
pub struct MemoryEditorState {
    pub deck: Option<Deck>,
    /// Number of successful commits.
    pub commits: usize,
}

impl EditorState for MemoryEditorState {
    fn replace_all_slides(&mut self, deck: Deck) -> Result<()> {
        self.deck = Some(deck);
        self.commits += 1;
        Ok(())
    }

    fn append_slides(&mut self, slides: Vec<Slide>) -> Result<()> {
        let deck = self
            .deck
            .as_mut()
            .ok_or_else(|| Error::CommitError("cannot append to an empty editor".to_string()))?;
        deck.slides.extend(slides);
        self.commits += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_convert::ConvertOptions;
    use deck_core::source::{Frame, SlideSize, TextSource};
    use deck_core::{SlideRole, SourceElement, SourceKind, SourceSlide, TextRole};

    fn text(left: f64, top: f64, width: f64, height: f64, label: &str, pt: f64) -> SourceElement {
        SourceElement {
            frame: Frame {
                left,
                top,
                width,
                height,
                ..Default::default()
            },
            kind: SourceKind::Text(TextSource {
                content: format!(r#"<p><span style="font-size: {}pt">{}</span></p>"#, pt, label),
                ..Default::default()
            }),
        }
    }

    fn source_slide(elements: Vec<SourceElement>) -> SourceSlide {
        SourceSlide {
            elements,
            ..Default::default()
        }
    }

    /// Welcome, contents, and closing slides.
    fn three_slide_document() -> SourceDocument {
        let mut agenda = vec![text(100.0, 30.0, 400.0, 60.0, "Contents", 20.0)];
        for (row, label) in ["Introduction", "Market", "Product", "Roadmap", "Summary"]
            .iter()
            .enumerate()
        {
            agenda.push(text(150.0, 120.0 + row as f64 * 70.0, 600.0, 50.0, label, 20.0));
        }

        SourceDocument {
            size: SlideSize {
                width: 1000.0,
                height: 562.5,
            },
            theme_colors: vec!["#4472c4".into()],
            slides: vec![
                source_slide(vec![text(100.0, 56.25, 800.0, 90.0, "Welcome", 44.0)]),
                source_slide(agenda),
                source_slide(vec![text(100.0, 220.0, 800.0, 100.0, "Thank You", 40.0)]),
            ],
        }
    }

    struct FixedParser(SourceDocument);

    impl DocumentParser for FixedParser {
        fn parse(&self, _input: &[u8]) -> Result<SourceDocument> {
            Ok(self.0.clone())
        }
    }

    struct FailingParser;

    impl DocumentParser for FailingParser {
        fn parse(&self, _input: &[u8]) -> Result<SourceDocument> {
            Err(Error::ParseFailure("not a presentation".to_string()))
        }
    }

    fn importer<P: DocumentParser>(parser: P) -> Importer<P> {
        Importer::new(
            parser,
            Converter::new(ConvertOptions::new().with_fit_viewport(1000.0)),
            TemplateAssembler::default(),
        )
    }

    #[test]
    fn test_template_import_end_to_end() {
        let mut state = MemoryEditorState::default();
        let outcome = importer(FixedParser(three_slide_document()))
            .import(Some(b"pptx".as_slice()), ImportMode::Template, &mut state)
            .unwrap();

        assert_eq!(outcome, ImportOutcome::Committed { slides: 5 });
        assert_eq!(state.commits, 1);

        let deck = state.deck.unwrap();
        let roles: Vec<_> = deck.slides.iter().filter_map(|s| s.role).collect();
        assert_eq!(
            roles,
            vec![
                SlideRole::Cover,
                SlideRole::Contents,
                SlideRole::Transition,
                SlideRole::Content,
                SlideRole::End
            ]
        );

        let title_of = |idx: usize| {
            deck.slides[idx]
                .text_elements()
                .find(|(_, t)| t.text_type == Some(TextRole::Title))
                .map(|(_, t)| deck_core::markup::plain_text(&t.content))
        };
        assert_eq!(title_of(0).as_deref(), Some("Welcome"));
        assert_eq!(title_of(4).as_deref(), Some("Thank You"));

        let items = deck.slides[1]
            .text_elements()
            .filter(|(_, t)| t.text_type == Some(TextRole::Item))
            .count();
        assert_eq!(items, 5);

        let transition = &deck.slides[2];
        for role in [TextRole::Title, TextRole::Content, TextRole::PartNumber] {
            assert!(transition.has_text_role(role));
        }

        let content = &deck.slides[3];
        for role in [TextRole::Content, TextRole::ItemTitle, TextRole::Item, TextRole::ItemNumber] {
            assert!(content.has_text_role(role));
        }
    }

    #[test]
    fn test_replace_and_append_modes() {
        let importer = importer(FixedParser(three_slide_document()));
        let mut state = MemoryEditorState::default();

        importer.import(Some(b"x".as_slice()), ImportMode::Replace, &mut state).unwrap();
        let outcome = importer.import(Some(b"x".as_slice()), ImportMode::Append, &mut state).unwrap();

        assert_eq!(outcome, ImportOutcome::Committed { slides: 3 });
        assert_eq!(state.commits, 2);
        let deck = state.deck.unwrap();
        assert_eq!(deck.slides.len(), 6);
        assert!(deck.slides.iter().all(|s| s.role.is_none()));
        assert_eq!(deck.viewport_width, 1000.0);
    }

    #[test]
    fn test_append_to_empty_editor_fails() {
        let mut state = MemoryEditorState::default();
        let result = importer(FixedParser(three_slide_document())).import(Some(b"x".as_slice()), ImportMode::Append, &mut state);
        assert!(matches!(result, Err(Error::CommitError(_))));
        assert_eq!(state.commits, 0);
    }

    #[test]
    fn test_parse_failure_commits_nothing() {
        let mut state = MemoryEditorState::default();
        let result = importer(FailingParser).import(Some(b"garbage".as_slice()), ImportMode::Template, &mut state);
        assert!(matches!(result, Err(Error::ParseFailure(_))));
        assert!(state.deck.is_none());
        assert_eq!(state.commits, 0);
    }

    #[test]
    fn test_missing_input_is_skipped() {
        let mut state = MemoryEditorState::default();
        let importer = importer(FailingParser);
        assert_eq!(
            importer.import(None, ImportMode::Replace, &mut state).unwrap(),
            ImportOutcome::Skipped
        );
        assert_eq!(
            importer.import(Some(b"".as_slice()), ImportMode::Replace, &mut state).unwrap(),
            ImportOutcome::Skipped
        );
        assert_eq!(state.commits, 0);
    }

    #[test]
    fn test_json_parser() {
        let json = br##"{
            "size": {"width": 960, "height": 540},
            "themeColors": ["#111"],
            "slides": [{"elements": [{"type": "text", "left": 0, "top": 0, "width": 10, "height": 10, "content": "<p>x</p>"}]}]
        }"##;
        let doc = JsonDocumentParser.parse(json).unwrap();
        assert_eq!(doc.slides.len(), 1);

        let err = JsonDocumentParser.parse(b"{not json").unwrap_err();
        assert!(matches!(err, Error::ParseFailure(_)));
    }
}
