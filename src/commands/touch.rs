use super::listener::Command;

/// In terminal cells, see `InputConfig::swipe_threshold`.
pub(crate) const DEFAULT_SWIPE_THRESHOLD: f64 = 50.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct TouchPoint {
    pub(crate) x: f64,
    pub(crate) y: f64,
}

impl TouchPoint {
    pub(crate) fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Classify a swipe from `start` to `end`.
///
/// The dominant axis decides the direction. Swiping right or down goes back, swiping left or up
/// moves forward. Movements that don't go past `threshold` on the dominant axis are ignored.
pub(crate) fn classify_swipe(start: TouchPoint, end: TouchPoint, threshold: f64) -> Option<Command> {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let delta = if dx.abs() > dy.abs() { dx } else { dy };
    if delta > threshold {
        Some(Command::Previous)
    } else if delta < -threshold {
        Some(Command::Next)
    } else {
        None
    }
}

/// Pairs touch starts and ends into swipes.
#[derive(Debug)]
pub(crate) struct TouchGestureInterpreter {
    threshold: f64,
    start: TouchPoint,
}

impl TouchGestureInterpreter {
    pub(crate) fn new(threshold: f64) -> Self {
        Self { threshold, start: TouchPoint::default() }
    }

    pub(crate) fn on_touch_start(&mut self, point: TouchPoint) {
        self.start = point;
    }

    /// Finish a gesture that started on the last seen touch start.
    ///
    /// Before any touch start is seen the origin is used as the start point.
    pub(crate) fn on_touch_end(&mut self, point: TouchPoint) -> Option<Command> {
        classify_swipe(self.start, point, self.threshold)
    }
}

impl Default for TouchGestureInterpreter {
    fn default() -> Self {
        Self::new(DEFAULT_SWIPE_THRESHOLD)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::swipe_left((100.0, 0.0), (0.0, 0.0), Some(Command::Next))]
    #[case::swipe_right((0.0, 0.0), (100.0, 0.0), Some(Command::Previous))]
    #[case::swipe_up((0.0, 100.0), (0.0, 0.0), Some(Command::Next))]
    #[case::swipe_down((0.0, 0.0), (0.0, 100.0), Some(Command::Previous))]
    #[case::short_horizontal((0.0, 0.0), (40.0, 0.0), None)]
    #[case::exactly_threshold((0.0, 0.0), (50.0, 0.0), None)]
    #[case::short_vertical((0.0, 0.0), (0.0, -50.0), None)]
    #[case::diagonal_vertical_wins((0.0, 0.0), (60.0, 60.0), Some(Command::Previous))]
    #[case::horizontal_dominant_but_short((0.0, 0.0), (45.0, 10.0), None)]
    #[case::vertical_dominant_long((0.0, 0.0), (30.0, -80.0), Some(Command::Next))]
    fn swipes(#[case] start: (f64, f64), #[case] end: (f64, f64), #[case] expected: Option<Command>) {
        let start = TouchPoint::new(start.0, start.1);
        let end = TouchPoint::new(end.0, end.1);
        assert_eq!(classify_swipe(start, end, DEFAULT_SWIPE_THRESHOLD), expected);
    }

    #[test]
    fn interpreter_uses_last_start() {
        let mut interpreter = TouchGestureInterpreter::default();
        interpreter.on_touch_start(TouchPoint::new(0.0, 0.0));
        interpreter.on_touch_start(TouchPoint::new(100.0, 0.0));
        assert_eq!(interpreter.on_touch_end(TouchPoint::new(0.0, 0.0)), Some(Command::Next));
    }

    #[test]
    fn end_without_start_uses_origin() {
        let mut interpreter = TouchGestureInterpreter::default();
        assert_eq!(interpreter.on_touch_end(TouchPoint::new(0.0, 70.0)), Some(Command::Previous));
    }

    #[test]
    fn custom_threshold() {
        let mut interpreter = TouchGestureInterpreter::new(5.0);
        interpreter.on_touch_start(TouchPoint::new(10.0, 3.0));
        assert_eq!(interpreter.on_touch_end(TouchPoint::new(3.0, 3.0)), Some(Command::Next));
    }
}
