use super::{
    printer::{TerminalCommand, TerminalError, TerminalIo},
    WindowSize,
};
use unicode_width::UnicodeWidthChar;

/// An in memory terminal that only keeps track of the characters printed on it.
pub(crate) struct VirtualTerminal {
    row: u16,
    column: u16,
    rows: Vec<Vec<char>>,
    flushes: usize,
}

impl VirtualTerminal {
    pub(crate) fn new(dimensions: WindowSize) -> Self {
        let rows = vec![vec![' '; dimensions.columns as usize]; dimensions.rows as usize];
        Self { row: 0, column: 0, rows, flushes: 0 }
    }

    pub(crate) fn lines(&self) -> Vec<String> {
        self.rows.iter().map(|row| row.iter().collect()).collect()
    }

    pub(crate) fn flushes(&self) -> usize {
        self.flushes
    }

    fn print_text(&mut self, content: &str) {
        for c in content.chars() {
            if let Some(cell) = self.rows.get_mut(self.row as usize).and_then(|row| row.get_mut(self.column as usize)) {
                *cell = c;
            }
            self.column = self.column.saturating_add(c.width().unwrap_or(1) as u16);
        }
    }
}

impl TerminalIo for VirtualTerminal {
    fn execute(&mut self, command: &TerminalCommand) -> Result<(), TerminalError> {
        use TerminalCommand::*;
        match command {
            BeginUpdate | EndUpdate => (),
            MoveTo { column, row } => {
                self.column = *column;
                self.row = *row;
            }
            PrintText { content, .. } => self.print_text(content),
            ClearScreen => self.rows.iter_mut().flatten().for_each(|cell| *cell = ' '),
            Flush => self.flushes += 1,
        };
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn run(term: &mut VirtualTerminal, commands: &[TerminalCommand]) {
        for command in commands {
            term.execute(command).expect("execution failed");
        }
    }

    fn text(content: &str) -> TerminalCommand {
        TerminalCommand::PrintText { content: content.into(), style: Default::default() }
    }

    #[test]
    fn movement() {
        let mut term = VirtualTerminal::new(WindowSize { columns: 3, rows: 2 });
        use TerminalCommand::*;
        run(&mut term, &[text("A"), MoveTo { column: 1, row: 1 }, text("B"), MoveTo { column: 2, row: 0 }, text("C")]);
        assert_eq!(term.lines(), &["A C", " B "]);
    }

    #[test]
    fn overflow_is_dropped() {
        let mut term = VirtualTerminal::new(WindowSize { columns: 3, rows: 1 });
        run(&mut term, &[text("hello")]);
        assert_eq!(term.lines(), &["hel"]);
    }

    #[test]
    fn clear() {
        let mut term = VirtualTerminal::new(WindowSize { columns: 2, rows: 1 });
        run(&mut term, &[text("hi"), TerminalCommand::ClearScreen, TerminalCommand::Flush]);
        assert_eq!(term.lines(), &["  "]);
        assert_eq!(term.flushes(), 1);
    }
}
