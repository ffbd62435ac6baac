use crate::{
    commands::{
        keyboard::KeyBindingsValidationError,
        listener::{Command, CommandListener},
    },
    config::Config,
    deck::Deck,
    navigator::SlideNavigator,
    render::TerminalDrawer,
    stage::Stage,
    terminal::{
        printer::{Terminal, TerminalError},
        WindowSize,
    },
};
use std::{
    io::{self, Stdout},
    time::{Duration, Instant},
};
use tracing::{debug, info};

/// How long to wait for input when nothing on screen is moving.
const IDLE_POLL_TIMEOUT: Duration = Duration::from_millis(250);

pub struct PresenterOptions {
    /// The time between frames while something is being animated.
    pub frame_interval: Duration,
}

impl From<&Config> for PresenterOptions {
    fn from(config: &Config) -> Self {
        Self { frame_interval: Duration::from_millis(config.defaults.frame_interval_ms.max(1)) }
    }
}

/// A slideshow presenter.
///
/// This owns the navigator and everything it drives, and runs the event loop.
pub struct Presenter {
    navigator: SlideNavigator,
    stage: Stage,
    commands: CommandListener,
    dimensions: WindowSize,
    options: PresenterOptions,
}

impl Presenter {
    /// Construct a new presenter.
    pub fn new(deck: Deck, config: &Config, dimensions: WindowSize) -> Result<Self, PresentationError> {
        let commands = CommandListener::new(config.bindings.clone(), &config.input)?;
        let navigator = SlideNavigator::new(deck.total_slides());
        let stage = Stage::new(deck, &config.effects, dimensions, Instant::now());
        Ok(Self { navigator, stage, commands, dimensions, options: config.into() })
    }

    /// Run the presentation until the user exits.
    pub fn present(mut self) -> Result<(), PresentationError> {
        info!(slides = self.navigator.total_slides(), "starting presentation");
        let mut drawer = TerminalDrawer::new(Terminal::new(io::stdout())?);
        self.navigator.start(&mut self.stage);
        loop {
            self.stage.tick(Instant::now());
            drawer.render(&self.stage, self.dimensions)?;

            let timeout = if self.stage.is_animating() { self.options.frame_interval } else { IDLE_POLL_TIMEOUT };
            let Some(command) = self.commands.try_next_command(timeout)? else {
                continue;
            };
            match self.apply_command(command) {
                CommandSideEffect::Exit => {
                    info!("exiting presentation");
                    return Ok(());
                }
                CommandSideEffect::Suspend => Self::suspend(&mut drawer),
                CommandSideEffect::Resize => {
                    self.dimensions = WindowSize::current()?;
                    self.stage.resize(self.dimensions);
                }
                CommandSideEffect::None => (),
            };
        }
    }

    fn apply_command(&mut self, command: Command) -> CommandSideEffect {
        debug!(?command, "applying command");
        let stage = &mut self.stage;
        match command {
            Command::Next => self.navigator.next(stage),
            Command::Previous => self.navigator.previous(stage),
            Command::FirstSlide => self.navigator.first(stage),
            Command::LastSlide => self.navigator.last(stage),
            Command::GoToSlide(number) => self.navigator.go_to(number.saturating_sub(1) as i64, stage),
            Command::PointerMoved { column, row } => stage.pointer_moved(column, row),
            Command::Redraw => return CommandSideEffect::Resize,
            Command::Exit => return CommandSideEffect::Exit,
            Command::Suspend => return CommandSideEffect::Suspend,
        };
        CommandSideEffect::None
    }

    fn suspend(drawer: &mut TerminalDrawer<Terminal<Stdout>>) {
        #[cfg(unix)]
        unsafe {
            drawer.terminal.suspend();
            libc::raise(libc::SIGTSTP);
            drawer.terminal.resume();
        }
        #[cfg(not(unix))]
        let _ = drawer;
    }
}

#[derive(Debug, PartialEq, Eq)]
enum CommandSideEffect {
    Exit,
    Suspend,
    Resize,
    None,
}

/// An error during the presentation.
#[derive(thiserror::Error, Debug)]
pub enum PresentationError {
    #[error(transparent)]
    Terminal(#[from] TerminalError),

    #[error("io: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    KeyBindings(#[from] KeyBindingsValidationError),
}
