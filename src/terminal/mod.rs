use crossterm::terminal;
use std::io;

pub(crate) mod printer;
#[cfg(test)]
pub(crate) mod virt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// The terminal's size in cells.
pub struct WindowSize {
    pub columns: u16,
    pub rows: u16,
}

impl WindowSize {
    pub fn current() -> io::Result<Self> {
        let (columns, rows) = terminal::size()?;
        Ok(Self { columns, rows })
    }
}
