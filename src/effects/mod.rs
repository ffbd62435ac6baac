use crate::deck::{SlideEffect, SlideSpec};
use scheduler::Scheduler;
use std::time::{Duration, Instant};

pub(crate) mod counter;
pub(crate) mod parallax;
pub(crate) mod particles;
pub(crate) mod scheduler;

/// Something an effect does to a slide.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum EffectAction {
    Hide { slide: usize, element: usize },
    Reveal { slide: usize, element: usize },
    StartCounter { slide: usize, target: u32 },
}

/// Where a slide's elements are.
///
/// Elements are numbered top to bottom: the title, the subtitle if there is one, and then
/// every line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ElementLayout {
    pub(crate) first_line: usize,
    pub(crate) total: usize,
}

impl From<&SlideSpec> for ElementLayout {
    fn from(slide: &SlideSpec) -> Self {
        let first_line = if slide.subtitle.is_some() { 2 } else { 1 };
        Self { first_line, total: first_line + slide.lines.len() }
    }
}

/// The effect to run when each slide is activated.
#[derive(Debug, Default)]
pub(crate) struct EffectTable {
    effects: Vec<Option<SlideEffect>>,
}

impl EffectTable {
    pub(crate) fn new(effects: Vec<Option<SlideEffect>>) -> Self {
        Self { effects }
    }

    /// Run the effect for a slide that just became active.
    ///
    /// Returns the actions that apply right away; the rest are added to the scheduler.
    pub(crate) fn activate(
        &self,
        slide: usize,
        layout: ElementLayout,
        scheduler: &mut Scheduler<EffectAction>,
        now: Instant,
    ) -> Vec<EffectAction> {
        let Some(Some(effect)) = self.effects.get(slide) else {
            return Vec::new();
        };
        match effect {
            SlideEffect::Stagger { interval_ms } => {
                let elements = layout.first_line..layout.total;
                Self::reveal_in_sequence(slide, elements, 0, *interval_ms, scheduler, now)
            }
            SlideEffect::Cascade { offset_ms, interval_ms } => {
                Self::reveal_in_sequence(slide, 0..layout.total, *offset_ms, *interval_ms, scheduler, now)
            }
            SlideEffect::Counter { target, delay_ms, .. } => {
                let action = EffectAction::StartCounter { slide, target: *target };
                scheduler.schedule(now, Duration::from_millis(*delay_ms), action);
                Vec::new()
            }
        }
    }

    fn reveal_in_sequence(
        slide: usize,
        elements: std::ops::Range<usize>,
        offset_ms: u64,
        interval_ms: u64,
        scheduler: &mut Scheduler<EffectAction>,
        now: Instant,
    ) -> Vec<EffectAction> {
        let mut immediate = Vec::new();
        for (index, element) in elements.enumerate() {
            immediate.push(EffectAction::Hide { slide, element });
            let delay = Duration::from_millis(offset_ms + interval_ms * index as u64);
            scheduler.schedule(now, delay, EffectAction::Reveal { slide, element });
        }
        immediate
    }
}
