/// Shifts slide contents following the mouse pointer.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Parallax {
    max_columns: u16,
    max_rows: u16,
}

impl Parallax {
    pub(crate) fn new(max_columns: u16, max_rows: u16) -> Self {
        Self { max_columns, max_rows }
    }

    /// Compute the `(columns, rows)` shift for a pointer in a screen of the given dimensions.
    ///
    /// A pointer in the center causes no shift; one in a corner shifts by the maximum.
    pub(crate) fn offset(&self, pointer: (u16, u16), screen: (u16, u16)) -> (i16, i16) {
        let columns = Self::axis_offset(pointer.0, screen.0, self.max_columns);
        let rows = Self::axis_offset(pointer.1, screen.1, self.max_rows);
        (columns, rows)
    }

    fn axis_offset(position: u16, length: u16, max: u16) -> i16 {
        if length == 0 {
            return 0;
        }
        // in [-0.5, 0.5]
        let normalized = (position.min(length) as f64 / length as f64) - 0.5;
        let offset = (normalized * 2.0 * max as f64).round();
        offset.clamp(-(max as f64), max as f64) as i16
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::center((40, 12), (0, 0))]
    #[case::top_left((0, 0), (-4, -2))]
    #[case::bottom_right((80, 24), (4, 2))]
    #[case::beyond((500, 500), (4, 2))]
    #[case::quarter((20, 6), (-2, -1))]
    fn offsets(#[case] pointer: (u16, u16), #[case] expected: (i16, i16)) {
        let parallax = Parallax::new(4, 2);
        assert_eq!(parallax.offset(pointer, (80, 24)), expected);
    }

    #[test]
    fn empty_screen() {
        assert_eq!(Parallax::new(4, 2).offset((3, 3), (0, 0)), (0, 0));
    }
}
