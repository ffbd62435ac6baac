//! slidenav: a slide navigation controller for terminal slideshows.
//!
//! This is not meant to be used as a crate!

pub(crate) mod commands;
pub(crate) mod config;
pub(crate) mod deck;
pub(crate) mod effects;
pub(crate) mod navigator;
pub(crate) mod presenter;
pub(crate) mod render;
pub(crate) mod stage;
pub(crate) mod terminal;

pub use crate::{
    config::{Config, ConfigLoadError},
    deck::{Deck, DeckLoadError},
    navigator::{SlideNavigator, SlideObserver},
    presenter::{PresentationError, Presenter, PresenterOptions},
    terminal::WindowSize,
};
