use std::num::NonZeroUsize;
use tracing::debug;

/// Receives the side effects of a navigation.
///
/// Every successful navigation calls [SlideObserver::render], [SlideObserver::set_progress] and
/// [SlideObserver::on_slide_activated], in that order.
pub trait SlideObserver {
    /// Make the slide at `active_index` the only visible one.
    fn render(&mut self, active_index: usize, total_slides: usize);

    /// Update the progress indicator. `fraction` is always in `(0, 1]`.
    fn set_progress(&mut self, fraction: f64);

    /// Trigger any slide specific effect.
    fn on_slide_activated(&mut self, index: usize);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct NavigatorState {
    current_index: usize,
    total_slides: NonZeroUsize,
}

/// Keeps track of the slide being displayed.
///
/// Requests are never rejected: any index is normalized into a valid one.
#[derive(Debug)]
pub struct SlideNavigator {
    state: NavigatorState,
}

impl SlideNavigator {
    pub fn new(total_slides: NonZeroUsize) -> Self {
        Self { state: NavigatorState { current_index: 0, total_slides } }
    }

    /// Show the first slide.
    pub fn start<O: SlideObserver>(&mut self, observer: &mut O) {
        self.go_to(0, observer);
    }

    /// Go to a specific slide.
    ///
    /// Negative indexes wrap to the last slide and indexes past the end wrap to the first one.
    pub fn go_to<O: SlideObserver>(&mut self, index: i64, observer: &mut O) {
        let total = self.total_slides();
        let index = if index < 0 {
            total - 1
        } else if index >= total as i64 {
            0
        } else {
            index as usize
        };
        debug!(index, total, "showing slide");
        self.state.current_index = index;
        observer.render(index, total);
        observer.set_progress(self.progress());
        observer.on_slide_activated(index);
    }

    pub fn next<O: SlideObserver>(&mut self, observer: &mut O) {
        self.go_to(self.current_index() as i64 + 1, observer);
    }

    pub fn previous<O: SlideObserver>(&mut self, observer: &mut O) {
        self.go_to(self.current_index() as i64 - 1, observer);
    }

    pub fn first<O: SlideObserver>(&mut self, observer: &mut O) {
        self.go_to(0, observer);
    }

    pub fn last<O: SlideObserver>(&mut self, observer: &mut O) {
        self.go_to(self.total_slides() as i64 - 1, observer);
    }

    /// The fraction of the presentation that has been shown, in `(0, 1]`.
    pub fn progress(&self) -> f64 {
        (self.state.current_index + 1) as f64 / self.total_slides() as f64
    }

    pub fn current_index(&self) -> usize {
        self.state.current_index
    }

    pub fn total_slides(&self) -> usize {
        self.state.total_slides.get()
    }
}
