use crossterm::{
    cursor, event,
    style::{self, ContentStyle, StyledContent},
    terminal, QueueableCommand,
};
use std::io::{self, Write};

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum TerminalCommand {
    BeginUpdate,
    EndUpdate,
    MoveTo { column: u16, row: u16 },
    PrintText { content: String, style: ContentStyle },
    ClearScreen,
    Flush,
}

pub(crate) trait TerminalIo {
    fn execute(&mut self, command: &TerminalCommand) -> Result<(), TerminalError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TerminalError {
    #[error("io: {0}")]
    Io(#[from] io::Error),
}

/// A wrapper over the terminal write handle.
pub(crate) struct Terminal<W: TerminalWrite> {
    writer: W,
}

impl<W: TerminalWrite> Terminal<W> {
    pub(crate) fn new(mut writer: W) -> io::Result<Self> {
        writer.init()?;
        Ok(Self { writer })
    }

    pub(crate) fn suspend(&mut self) {
        self.writer.deinit();
    }

    pub(crate) fn resume(&mut self) {
        let _ = self.writer.init();
    }
}

impl<W: TerminalWrite> TerminalIo for Terminal<W> {
    fn execute(&mut self, command: &TerminalCommand) -> Result<(), TerminalError> {
        use TerminalCommand::*;
        match command {
            BeginUpdate => self.writer.queue(terminal::BeginSynchronizedUpdate)?,
            EndUpdate => self.writer.queue(terminal::EndSynchronizedUpdate)?,
            MoveTo { column, row } => self.writer.queue(cursor::MoveTo(*column, *row))?,
            PrintText { content, style } => {
                self.writer.queue(style::PrintStyledContent(StyledContent::new(*style, content)))?
            }
            ClearScreen => self.writer.queue(terminal::Clear(terminal::ClearType::All))?,
            Flush => {
                self.writer.flush()?;
                return Ok(());
            }
        };
        Ok(())
    }
}

impl<W: TerminalWrite> Drop for Terminal<W> {
    fn drop(&mut self) {
        self.writer.deinit();
    }
}

pub(crate) trait TerminalWrite: io::Write {
    fn init(&mut self) -> io::Result<()>;
    fn deinit(&mut self);
}

impl TerminalWrite for io::Stdout {
    fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        self.queue(cursor::Hide)?;
        self.queue(terminal::EnterAlternateScreen)?;
        // Needed for wheel, drag and pointer events.
        self.queue(event::EnableMouseCapture)?;
        self.flush()
    }

    fn deinit(&mut self) {
        let _ = self.queue(event::DisableMouseCapture);
        let _ = self.queue(terminal::LeaveAlternateScreen);
        let _ = self.queue(cursor::Show);
        let _ = self.flush();
        let _ = terminal::disable_raw_mode();
    }
}
