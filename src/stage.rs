use crate::{
    config::EffectsConfig,
    deck::{Deck, SlideEffect, SlideSpec},
    effects::{
        counter::CounterAnimation, parallax::Parallax, particles::ParticleField, scheduler::Scheduler, EffectAction,
        EffectTable, ElementLayout,
    },
    navigator::SlideObserver,
    terminal::WindowSize,
};
use std::time::Instant;
use tracing::debug;

#[derive(Debug)]
pub(crate) struct SlideState {
    pub(crate) spec: SlideSpec,
    pub(crate) layout: ElementLayout,
    visible: Vec<bool>,
    counter: Option<CounterAnimation>,
}

impl SlideState {
    fn new(spec: SlideSpec) -> Self {
        let layout = ElementLayout::from(&spec);
        Self { visible: vec![true; layout.total], layout, spec, counter: None }
    }

    pub(crate) fn is_visible(&self, element: usize) -> bool {
        self.visible.get(element).copied().unwrap_or(false)
    }

    /// The counter's text, if this slide has one.
    pub(crate) fn counter_text(&self, now: Instant) -> Option<String> {
        let Some(SlideEffect::Counter { label, .. }) = &self.spec.effect else {
            return None;
        };
        let value = self.counter.as_ref().map(|counter| counter.value_at(now)).unwrap_or(0);
        let text = match label {
            Some(label) => format!("{value} {label}"),
            None => value.to_string(),
        };
        Some(text)
    }
}

/// Everything that's displayed on screen.
///
/// This is the rendering side of navigation: the navigator tells it which slide is active and
/// it runs that slide's effects.
pub(crate) struct Stage {
    slides: Vec<SlideState>,
    active: usize,
    progress: f64,
    effects: EffectTable,
    scheduler: Scheduler<EffectAction>,
    particles: Option<ParticleField>,
    connection_distance: f64,
    parallax: Option<Parallax>,
    pointer: Option<(u16, u16)>,
    now: Instant,
}

impl Stage {
    pub(crate) fn new(deck: Deck, config: &EffectsConfig, dimensions: WindowSize, now: Instant) -> Self {
        let slides: Vec<_> = deck.into_slides().into_iter().map(SlideState::new).collect();
        let effects = EffectTable::new(slides.iter().map(|slide| slide.spec.effect.clone()).collect());
        let particles = match config.particles {
            0 => None,
            count => {
                let mut rng = fastrand::Rng::new();
                Some(ParticleField::new(count, dimensions.columns as f64, dimensions.rows as f64, &mut rng))
            }
        };
        let parallax = config.parallax.then(|| Parallax::new(config.parallax_columns, config.parallax_rows));
        Self {
            slides,
            active: 0,
            progress: 0.0,
            effects,
            scheduler: Scheduler::default(),
            particles,
            connection_distance: config.connection_distance,
            parallax,
            pointer: None,
            now,
        }
    }

    /// Advance time, applying every effect that's due and moving particles.
    pub(crate) fn tick(&mut self, now: Instant) {
        self.now = now;
        for action in self.scheduler.drain_due(now) {
            self.apply(action);
        }
        if let Some(particles) = &mut self.particles {
            particles.update();
        }
    }

    pub(crate) fn resize(&mut self, dimensions: WindowSize) {
        if let Some(particles) = &mut self.particles {
            particles.resize(dimensions.columns as f64, dimensions.rows as f64);
        }
    }

    pub(crate) fn pointer_moved(&mut self, column: u16, row: u16) {
        self.pointer = Some((column, row));
    }

    /// Whether anything on screen changes over time.
    pub(crate) fn is_animating(&self) -> bool {
        self.particles.is_some()
            || self.scheduler.pending() > 0
            || self.slides.iter().filter_map(|s| s.counter.as_ref()).any(|c| !c.is_finished(self.now))
    }

    pub(crate) fn active_slide(&self) -> &SlideState {
        &self.slides[self.active]
    }

    pub(crate) fn active_index(&self) -> usize {
        self.active
    }

    pub(crate) fn total_slides(&self) -> usize {
        self.slides.len()
    }

    pub(crate) fn progress(&self) -> f64 {
        self.progress
    }

    pub(crate) fn now(&self) -> Instant {
        self.now
    }

    pub(crate) fn particles(&self) -> Option<&ParticleField> {
        self.particles.as_ref()
    }

    /// How close two particles need to be to be joined by a line.
    pub(crate) fn connection_distance(&self) -> f64 {
        self.connection_distance
    }

    /// The parallax shift for the current pointer position.
    pub(crate) fn parallax_offset(&self, dimensions: WindowSize) -> (i16, i16) {
        match (&self.parallax, self.pointer) {
            (Some(parallax), Some(pointer)) => parallax.offset(pointer, (dimensions.columns, dimensions.rows)),
            _ => (0, 0),
        }
    }

    fn apply(&mut self, action: EffectAction) {
        let now = self.now;
        match action {
            EffectAction::Hide { slide, element } => self.set_visible(slide, element, false),
            EffectAction::Reveal { slide, element } => self.set_visible(slide, element, true),
            EffectAction::StartCounter { slide, target } => {
                if let Some(slide) = self.slides.get_mut(slide) {
                    slide.counter = Some(CounterAnimation::new(target, now));
                }
            }
        }
    }

    fn set_visible(&mut self, slide: usize, element: usize, visible: bool) {
        if let Some(cell) = self.slides.get_mut(slide).and_then(|slide| slide.visible.get_mut(element)) {
            *cell = visible;
        }
    }
}

impl SlideObserver for Stage {
    fn render(&mut self, active_index: usize, total_slides: usize) {
        debug_assert_eq!(total_slides, self.slides.len(), "slide count mismatch");
        self.active = active_index.min(self.slides.len().saturating_sub(1));
    }

    fn set_progress(&mut self, fraction: f64) {
        self.progress = fraction;
    }

    fn on_slide_activated(&mut self, index: usize) {
        let Some(slide) = self.slides.get(index) else {
            return;
        };
        debug!(index, effect = ?slide.spec.effect, "slide activated");
        let immediate = self.effects.activate(index, slide.layout, &mut self.scheduler, self.now);
        for action in immediate {
            self.apply(action);
        }
    }
}
