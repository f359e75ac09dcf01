//! CLI tool for importing parsed presentations into editor slide decks.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use deck_convert::{ConvertOptions, Converter};
use deck_core::{Deck, Slide};
use deck_template::{
    EditorState, ImportMode, ImportOutcome, Importer, JsonDocumentParser, TemplateAssembler,
    TemplateConfig,
};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Import a parsed presentation (JSON tree) into an editor deck.
#[derive(Parser, Debug)]
#[command(name = "deck-import")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Parsed presentation tree (.json); nothing happens when omitted
    input: Option<PathBuf>,

    /// Editor deck file to write (and to append to in append mode)
    #[arg(short, long, default_value = "deck.json")]
    output: PathBuf,

    /// How converted slides are committed
    #[arg(short, long, value_enum, default_value = "replace")]
    mode: Mode,

    /// Scale slides to this viewport width in pixels (default: convert pt to px)
    #[arg(short = 'w', long)]
    viewport_width: Option<f64>,

    /// Template configuration overrides (.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the resulting deck to stdout instead of writing the output file
    #[arg(short, long)]
    print: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    Replace,
    Append,
    Template,
}

impl From<Mode> for ImportMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Replace => ImportMode::Replace,
            Mode::Append => ImportMode::Append,
            Mode::Template => ImportMode::Template,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let mut options = ConvertOptions::new();
    if let Some(width) = args.viewport_width {
        options = options.with_fit_viewport(width);
    }
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => TemplateConfig::default(),
    };
    let importer = Importer::new(
        JsonDocumentParser,
        Converter::new(options),
        TemplateAssembler::new(config),
    );

    let input = match &args.input {
        Some(path) => {
            if args.verbose {
                eprintln!("Processing: {}", path.display());
            }
            Some(fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?)
        }
        None => None,
    };

    let mut state = if args.print {
        JsonFileEditorState::detached()
    } else {
        JsonFileEditorState::open(&args.output)?
    };

    let outcome = importer
        .import(input.as_deref(), args.mode.into(), &mut state)
        .context("Import failed")?;

    match outcome {
        ImportOutcome::Skipped => {
            if args.verbose {
                eprintln!("No input given, nothing imported");
            }
        }
        ImportOutcome::Committed { slides } => {
            if args.print {
                let deck = state.deck.as_ref().context("No deck was committed")?;
                println!("{}", serde_json::to_string_pretty(deck)?);
            } else if args.verbose {
                eprintln!("  Committed {} slides to {}", slides, args.output.display());
            }
        }
    }

    Ok(())
}

/// Load template configuration overrides from a JSON file.
fn load_config(path: &Path) -> Result<TemplateConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid config {}", path.display()))
}

/// Editor state persisted as a deck JSON file.
struct JsonFileEditorState {
    path: Option<PathBuf>,
    deck: Option<Deck>,
}

impl JsonFileEditorState {
    /// Keep the deck in memory only.
    fn detached() -> Self {
        Self { path: None, deck: None }
    }

    /// Load the existing deck at `path`, if any.
    fn open(path: &Path) -> Result<Self> {
        let deck = if path.exists() {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Some(serde_json::from_str(&text).with_context(|| format!("Invalid deck {}", path.display()))?)
        } else {
            None
        };

        Ok(Self {
            path: Some(path.to_path_buf()),
            deck,
        })
    }

    /// Write `deck` to disk first, then adopt it. A failed write leaves both
    /// the file and the in-memory deck untouched.
    fn commit(&mut self, deck: Deck) -> deck_core::Result<()> {
        if let Some(path) = &self.path {
            write_atomically(path, &deck)?;
            log::debug!("Wrote {}", path.display());
        }
        self.deck = Some(deck);
        Ok(())
    }
}

/// Serialize to a temp file beside `path` and rename it over the target.
fn write_atomically(path: &Path, deck: &Deck) -> deck_core::Result<()> {
    let json = serde_json::to_string_pretty(deck)?;
    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => parent,
        None => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(json.as_bytes())?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

impl EditorState for JsonFileEditorState {
    fn replace_all_slides(&mut self, deck: Deck) -> deck_core::Result<()> {
        self.commit(deck)
    }

    fn append_slides(&mut self, slides: Vec<Slide>) -> deck_core::Result<()> {
        let mut deck = self.deck.clone().ok_or_else(|| {
            deck_core::Error::CommitError("no existing deck to append to".to_string())
        })?;
        deck.slides.extend(slides);
        self.commit(deck)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::Theme;

    fn deck(slides: usize) -> Deck {
        let slide = Slide {
            id: deck_core::new_id(),
            elements: vec![],
            background: deck_core::model::Background::Solid {
                color: "#fff".into(),
            },
            remark: String::new(),
            role: None,
        };
        Deck {
            slides: vec![slide; slides],
            theme: Theme {
                theme_colors: vec![],
                font_name: "Arial".into(),
                font_color: "#333".into(),
            },
            viewport_width: 1000.0,
            viewport_ratio: 0.5625,
        }
    }

    #[test]
    fn test_replace_then_append_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("deck.json");

        let mut state = JsonFileEditorState::open(&path).unwrap();
        state.replace_all_slides(deck(2)).unwrap();
        state.append_slides(deck(1).slides).unwrap();

        let reopened = JsonFileEditorState::open(&path).unwrap();
        assert_eq!(reopened.deck.unwrap().slides.len(), 3);
        // Only the deck itself is left in the directory.
        assert_eq!(fs::read_dir(path.parent().unwrap()).unwrap().count(), 1);
    }

    #[test]
    fn test_failed_write_keeps_previous_deck() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        // The target's parent is a regular file, so nothing can be written.
        let mut state = JsonFileEditorState {
            path: Some(blocker.join("deck.json")),
            deck: Some(deck(2)),
        };
        assert!(state.append_slides(deck(1).slides).is_err());
        assert!(state.replace_all_slides(deck(5)).is_err());
        assert_eq!(state.deck.as_ref().unwrap().slides.len(), 2);
        assert_eq!(fs::read_to_string(&blocker).unwrap(), "not a directory");
    }

    #[test]
    fn test_append_without_deck_fails() {
        let mut state = JsonFileEditorState::detached();
        assert!(matches!(
            state.append_slides(vec![]),
            Err(deck_core::Error::CommitError(_))
        ));
    }
}
