use super::{
    keyboard::{CommandKeyBindings, KeyBindingsValidationError, KeyboardListener},
    touch::{TouchGestureInterpreter, TouchPoint},
    wheel::WheelDebouncer,
};
use crate::config::{InputConfig, KeyBindingsConfig};
use crossterm::event::{poll, read, Event, MouseButton, MouseEvent, MouseEventKind};
use std::{
    io,
    time::{Duration, Instant},
};
use strum::EnumDiscriminants;
use tracing::trace;

/// A command listener that turns every input channel into commands.
pub(crate) struct CommandListener {
    keyboard: KeyboardListener,
    wheel: WheelDebouncer,
    touch: TouchGestureInterpreter,
}

impl CommandListener {
    pub(crate) fn new(bindings: KeyBindingsConfig, input: &InputConfig) -> Result<Self, KeyBindingsValidationError> {
        let bindings = CommandKeyBindings::try_from(bindings)?;
        Ok(Self {
            keyboard: KeyboardListener::new(bindings),
            wheel: WheelDebouncer::new(Duration::from_millis(input.wheel_cooldown_ms)),
            touch: TouchGestureInterpreter::new(input.swipe_threshold),
        })
    }

    /// Try to get the next command.
    ///
    /// This waits up to `timeout` for an input event and returns `Ok(None)` if none arrives or
    /// the event doesn't translate into a command.
    pub(crate) fn try_next_command(&mut self, timeout: Duration) -> io::Result<Option<Command>> {
        if !poll(timeout)? {
            return Ok(None);
        }
        let event = read()?;
        Ok(self.handle_event(event, Instant::now()))
    }

    pub(crate) fn handle_event(&mut self, event: Event, now: Instant) -> Option<Command> {
        let command = match event {
            Event::Key(event) => self.keyboard.on_key(event),
            Event::Mouse(event) => self.handle_mouse_event(event, now),
            Event::Resize(..) => Some(Command::Redraw),
            _ => None,
        };
        if let Some(command) = &command {
            trace!(?command, "input produced command");
        }
        command
    }

    fn handle_mouse_event(&mut self, event: MouseEvent, now: Instant) -> Option<Command> {
        let MouseEvent { kind, column, row, .. } = event;
        let point = TouchPoint::new(column as f64, row as f64);
        match kind {
            MouseEventKind::ScrollDown => self.wheel.on_wheel(1.0, now),
            MouseEventKind::ScrollUp => self.wheel.on_wheel(-1.0, now),
            MouseEventKind::Down(MouseButton::Left) => {
                self.touch.on_touch_start(point);
                None
            }
            MouseEventKind::Up(MouseButton::Left) => self.touch.on_touch_end(point),
            MouseEventKind::Moved | MouseEventKind::Drag(_) => Some(Command::PointerMoved { column, row }),
            _ => None,
        }
    }
}

/// A command.
#[derive(Clone, Debug, PartialEq, Eq, EnumDiscriminants)]
pub(crate) enum Command {
    /// Redraw the presentation.
    ///
    /// This can happen on terminal resize.
    Redraw,

    /// Move to the next slide.
    Next,

    /// Move to the previous slide.
    Previous,

    /// Go to the first slide.
    FirstSlide,

    /// Go to the last slide.
    LastSlide,

    /// Go to one particular slide, 1 based.
    GoToSlide(u32),

    /// The mouse pointer moved.
    PointerMoved { column: u16, row: u16 },

    /// Exit the presentation.
    Exit,

    /// Suspend the presentation.
    Suspend,
}

#[cfg(test)]
mod test {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use rstest::rstest;

    fn listener() -> CommandListener {
        CommandListener::new(Default::default(), &Default::default()).expect("invalid defaults")
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent { kind, column, row, modifiers: KeyModifiers::empty() })
    }

    #[rstest]
    #[case::key(Event::Key(KeyEvent::new(KeyCode::Right, KeyModifiers::empty())), Some(Command::Next))]
    #[case::resize(Event::Resize(10, 10), Some(Command::Redraw))]
    #[case::scroll_down(mouse(MouseEventKind::ScrollDown, 0, 0), Some(Command::Next))]
    #[case::scroll_up(mouse(MouseEventKind::ScrollUp, 0, 0), Some(Command::Previous))]
    #[case::moved(mouse(MouseEventKind::Moved, 3, 4), Some(Command::PointerMoved { column: 3, row: 4 }))]
    #[case::focus(Event::FocusGained, None)]
    fn single_events(#[case] event: Event, #[case] expected: Option<Command>) {
        assert_eq!(listener().handle_event(event, Instant::now()), expected);
    }

    #[test]
    fn wheel_is_debounced() {
        let mut listener = listener();
        let now = Instant::now();
        let first = listener.handle_event(mouse(MouseEventKind::ScrollDown, 0, 0), now);
        let second = listener.handle_event(mouse(MouseEventKind::ScrollUp, 0, 0), now + Duration::from_millis(10));
        assert_eq!(first, Some(Command::Next));
        assert_eq!(second, None);
    }

    #[test]
    fn keyboard_not_debounced() {
        let mut listener = listener();
        let now = Instant::now();
        listener.handle_event(mouse(MouseEventKind::ScrollDown, 0, 0), now);
        let key = Event::Key(KeyEvent::new(KeyCode::Left, KeyModifiers::empty()));
        assert_eq!(listener.handle_event(key, now), Some(Command::Previous));
    }

    #[rstest]
    #[case::swipe_left(100, 0, Some(Command::Next))]
    #[case::short_swipe(140, 100, None)]
    fn drag_gestures(#[case] start_column: u16, #[case] end_column: u16, #[case] expected: Option<Command>) {
        let mut listener = listener();
        let now = Instant::now();
        let press = listener.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), start_column, 0), now);
        assert_eq!(press, None);
        let release = listener.handle_event(mouse(MouseEventKind::Up(MouseButton::Left), end_column, 0), now);
        assert_eq!(release, expected);
    }

    #[test]
    fn vertical_swipe_needs_small_threshold() {
        let press = |listener: &mut CommandListener, row| {
            listener.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 10, row), Instant::now())
        };
        let release = |listener: &mut CommandListener, row| {
            listener.handle_event(mouse(MouseEventKind::Up(MouseButton::Left), 10, row), Instant::now())
        };

        // a full height drag in an 80x24 terminal is below the default threshold
        let mut default_listener = listener();
        press(&mut default_listener, 23);
        assert_eq!(release(&mut default_listener, 0), None);

        let input = InputConfig { swipe_threshold: 5.0, ..Default::default() };
        let mut listener = CommandListener::new(Default::default(), &input).expect("invalid config");
        press(&mut listener, 20);
        assert_eq!(release(&mut listener, 2), Some(Command::Next));
    }
}
