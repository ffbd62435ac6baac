use serde::Deserialize;
use std::{fs, io, num::NonZeroUsize, path::Path};

static SHOWCASE_DECK: &str = include_str!("../decks/showcase.yaml");

/// A deck of slides.
///
/// A deck always contains at least one slide.
#[derive(Clone, Debug)]
pub struct Deck {
    slides: Vec<SlideSpec>,
    total: NonZeroUsize,
}

impl Deck {
    pub fn new(slides: Vec<SlideSpec>) -> Result<Self, DeckLoadError> {
        let total = NonZeroUsize::new(slides.len()).ok_or(DeckLoadError::Empty)?;
        Ok(Self { slides, total })
    }

    /// Load a deck from a YAML file.
    pub fn load(path: &Path) -> Result<Self, DeckLoadError> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// The deck that ships with the binary.
    pub fn showcase() -> Result<Self, DeckLoadError> {
        Self::parse(SHOWCASE_DECK)
    }

    pub fn parse(contents: &str) -> Result<Self, DeckLoadError> {
        let raw: RawDeck = serde_yaml::from_str(contents)?;
        Self::new(raw.slides)
    }

    pub fn total_slides(&self) -> NonZeroUsize {
        self.total
    }

    #[cfg(test)]
    pub(crate) fn slides(&self) -> &[SlideSpec] {
        &self.slides
    }

    pub(crate) fn into_slides(self) -> Vec<SlideSpec> {
        self.slides
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDeck {
    slides: Vec<SlideSpec>,
}

#[derive(Debug, thiserror::Error)]
pub enum DeckLoadError {
    #[error("reading deck: {0}")]
    Io(#[from] io::Error),

    #[error("invalid deck: {0}")]
    Invalid(#[from] serde_yaml::Error),

    #[error("deck has no slides")]
    Empty,
}

/// A single slide.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlideSpec {
    pub title: String,

    #[serde(default)]
    pub subtitle: Option<String>,

    #[serde(default)]
    pub lines: Vec<String>,

    /// The effect that runs every time this slide is shown.
    #[serde(default)]
    pub effect: Option<SlideEffect>,
}

/// A decorative effect that runs when a slide becomes active.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SlideEffect {
    /// Hide the slide's lines and bring them back one after the other.
    Stagger {
        #[serde(default = "default_stagger_interval_ms")]
        interval_ms: u64,
    },

    /// Hide every element in the slide, including titles, and bring them back in order.
    Cascade {
        #[serde(default = "default_cascade_offset_ms")]
        offset_ms: u64,

        #[serde(default = "default_cascade_interval_ms")]
        interval_ms: u64,
    },

    /// Count up to a number.
    Counter {
        target: u32,

        #[serde(default)]
        label: Option<String>,

        #[serde(default = "default_counter_delay_ms")]
        delay_ms: u64,
    },
}

fn default_stagger_interval_ms() -> u64 {
    200
}

fn default_cascade_offset_ms() -> u64 {
    200
}

fn default_cascade_interval_ms() -> u64 {
    300
}

fn default_counter_delay_ms() -> u64 {
    500
}
