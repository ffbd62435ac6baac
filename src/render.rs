use crate::{
    effects::particles::Particle,
    stage::{SlideState, Stage},
    terminal::{
        printer::{TerminalCommand, TerminalError, TerminalIo},
        WindowSize,
    },
};
use crossterm::style::{Attribute, Color, ContentStyle};
use std::time::Instant;
use unicode_width::UnicodeWidthStr;

const GOLD: Color = Color::Rgb { r: 212, g: 175, b: 55 };
const PROGRESS_FILLED: &str = "█";
const PROGRESS_EMPTY: &str = "─";
const CONNECTION: &str = ".";

/// Connections at least this opaque are drawn at full intensity.
const STRONG_CONNECTION_OPACITY: f64 = 0.075;

/// Draws the stage into a terminal.
pub(crate) struct TerminalDrawer<T: TerminalIo> {
    pub(crate) terminal: T,
}

impl<T: TerminalIo> TerminalDrawer<T> {
    pub(crate) fn new(terminal: T) -> Self {
        Self { terminal }
    }

    pub(crate) fn render(&mut self, stage: &Stage, dimensions: WindowSize) -> Result<(), TerminalError> {
        for command in SlideDrawer::new(stage, dimensions).build() {
            self.terminal.execute(&command)?;
        }
        Ok(())
    }
}

struct SlideDrawer<'a> {
    stage: &'a Stage,
    dimensions: WindowSize,
    commands: Vec<TerminalCommand>,
}

impl<'a> SlideDrawer<'a> {
    fn new(stage: &'a Stage, dimensions: WindowSize) -> Self {
        Self { stage, dimensions, commands: Vec::new() }
    }

    fn build(mut self) -> Vec<TerminalCommand> {
        self.commands.extend([TerminalCommand::BeginUpdate, TerminalCommand::ClearScreen]);
        // The last row is for the progress bar.
        if self.dimensions.rows > 1 {
            self.draw_particles();
            self.draw_slide();
        }
        self.draw_progress();
        self.commands.extend([TerminalCommand::EndUpdate, TerminalCommand::Flush]);
        self.commands
    }

    fn content_rows(&self) -> u16 {
        self.dimensions.rows.saturating_sub(1)
    }

    fn draw_particles(&mut self) {
        let stage = self.stage;
        let Some(particles) = stage.particles() else {
            return;
        };
        // Lines go first so particles are drawn on top of them.
        for (from, to, opacity) in particles.connections(stage.connection_distance()) {
            self.draw_connection(from, to, opacity);
        }
        for particle in particles.iter() {
            let Some((column, row)) = self.content_cell(particle.x, particle.y) else {
                continue;
            };
            let symbol = if particle.size >= 2.0 { "•" } else { "·" };
            let mut style = ContentStyle { foreground_color: Some(GOLD), ..Default::default() };
            if particle.opacity < 0.45 {
                style.attributes.set(Attribute::Dim);
            }
            self.commands.push(TerminalCommand::MoveTo { column, row });
            self.commands.push(TerminalCommand::PrintText { content: symbol.into(), style });
        }
    }

    /// Draw the cells between two particles, leaving the particles' own cells alone.
    fn draw_connection(&mut self, from: &Particle, to: &Particle, opacity: f64) {
        let (dx, dy) = (to.x - from.x, to.y - from.y);
        let steps = dx.abs().max(dy.abs()).round() as usize;
        let mut style = ContentStyle { foreground_color: Some(GOLD), ..Default::default() };
        if opacity < STRONG_CONNECTION_OPACITY {
            style.attributes.set(Attribute::Dim);
        }
        for step in 1..steps {
            let fraction = step as f64 / steps as f64;
            let Some((column, row)) = self.content_cell(from.x + dx * fraction, from.y + dy * fraction) else {
                continue;
            };
            self.commands.push(TerminalCommand::MoveTo { column, row });
            self.commands.push(TerminalCommand::PrintText { content: CONNECTION.into(), style });
        }
    }

    /// The cell at a position, if it's within the content area.
    fn content_cell(&self, x: f64, y: f64) -> Option<(u16, u16)> {
        let (column, row) = (x.floor(), y.floor());
        if column < 0.0 || row < 0.0 || column >= self.dimensions.columns as f64 || row >= self.content_rows() as f64 {
            return None;
        }
        Some((column as u16, row as u16))
    }

    fn draw_slide(&mut self) {
        let stage = self.stage;
        let lines = Self::slide_lines(stage.active_slide(), stage.now());
        let (offset_columns, offset_rows) = stage.parallax_offset(self.dimensions);

        let height = lines.len() as u16;
        let top = self.content_rows().saturating_sub(height) / 2;
        let top = Self::shift(top, offset_rows);
        for (index, (text, style)) in lines.into_iter().enumerate() {
            let row = top.saturating_add(index as u16);
            if row >= self.content_rows() {
                break;
            }
            if text.is_empty() {
                continue;
            }
            let width = text.width() as u16;
            let column = Self::shift(self.dimensions.columns.saturating_sub(width) / 2, offset_columns);
            self.commands.push(TerminalCommand::MoveTo { column, row });
            self.commands.push(TerminalCommand::PrintText { content: text, style });
        }
    }

    /// The slide's rows, top to bottom. Hidden elements are kept as empty rows so that revealing
    /// them doesn't move anything else.
    fn slide_lines(slide: &SlideState, now: Instant) -> Vec<(String, ContentStyle)> {
        let visible_or_empty = |element: usize, text: &str| match slide.is_visible(element) {
            true => text.to_string(),
            false => String::new(),
        };
        let mut title_style = ContentStyle { foreground_color: Some(GOLD), ..Default::default() };
        title_style.attributes.set(Attribute::Bold);
        let mut subtitle_style = ContentStyle::default();
        subtitle_style.attributes.set(Attribute::Italic);

        let mut lines = vec![(visible_or_empty(0, &slide.spec.title), title_style)];
        if let Some(subtitle) = &slide.spec.subtitle {
            lines.push((visible_or_empty(1, subtitle), subtitle_style));
        }
        lines.push((String::new(), ContentStyle::default()));
        for (index, line) in slide.spec.lines.iter().enumerate() {
            let element = slide.layout.first_line + index;
            lines.push((visible_or_empty(element, line), ContentStyle::default()));
        }
        if let Some(counter) = slide.counter_text(now) {
            lines.push((String::new(), ContentStyle::default()));
            lines.push((counter, title_style));
        }
        lines
    }

    fn draw_progress(&mut self) {
        let Some(row) = self.dimensions.rows.checked_sub(1) else {
            return;
        };
        let columns = self.dimensions.columns as usize;
        let filled = progress_cells(self.stage.progress(), columns);
        let position = format!(" {} / {} ", self.stage.active_index() + 1, self.stage.total_slides());

        self.commands.push(TerminalCommand::MoveTo { column: 0, row });
        let style = ContentStyle { foreground_color: Some(GOLD), ..Default::default() };
        self.commands.push(TerminalCommand::PrintText { content: PROGRESS_FILLED.repeat(filled), style });
        let mut style = ContentStyle::default();
        style.attributes.set(Attribute::Dim);
        self.commands.push(TerminalCommand::PrintText { content: PROGRESS_EMPTY.repeat(columns - filled), style });

        let width = position.width();
        if width < columns && row > 0 {
            let column = (columns - width) as u16;
            self.commands.push(TerminalCommand::MoveTo { column, row: row - 1 });
            self.commands.push(TerminalCommand::PrintText { content: position, style });
        }
    }

    fn shift(value: u16, offset: i16) -> u16 {
        value.saturating_add_signed(offset)
    }
}

/// The number of cells the progress bar fills out of `columns`.
pub(crate) fn progress_cells(progress: f64, columns: usize) -> usize {
    let cells = (columns as f64 * progress.clamp(0.0, 1.0)).round() as usize;
    cells.min(columns)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        config::EffectsConfig, deck::Deck, navigator::SlideNavigator, stage::test::stage,
        terminal::virt::VirtualTerminal,
    };
    use rstest::rstest;
    use std::time::Duration;

    const DIMENSIONS: WindowSize = WindowSize { columns: 40, rows: 12 };

    fn draw(stage: &Stage) -> Vec<String> {
        let mut drawer = TerminalDrawer::new(VirtualTerminal::new(DIMENSIONS));
        drawer.render(stage, DIMENSIONS).expect("render failed");
        drawer.terminal.lines()
    }

    #[rstest]
    #[case::empty(0.0, 40, 0)]
    #[case::first_of_six(1.0 / 6.0, 60, 10)]
    #[case::half(0.5, 41, 21)]
    #[case::full(1.0, 40, 40)]
    #[case::overflow(3.0, 40, 40)]
    fn progress_bar(#[case] fraction: f64, #[case] columns: usize, #[case] expected: usize) {
        assert_eq!(progress_cells(fraction, columns), expected);
    }

    #[test]
    fn first_slide() {
        let now = Instant::now();
        let mut stage = stage(now);
        SlideNavigator::new(stage.total_slides().try_into().unwrap()).start(&mut stage);
        stage.tick(now + Duration::from_secs(1));
        let lines = draw(&stage);

        let title = lines.iter().position(|line| line.contains("The Grand Opening")).expect("no title");
        assert!(lines[title + 1].contains("A new era of performance"));
        assert!(lines[title + 3].contains("0-100 km/h in 2.9s"));
        assert!(lines[10].ends_with(" 1 / 6 "), "{:?}", lines[10]);
        let filled = lines[11].chars().filter(|c| *c == '█').count();
        assert_eq!(filled, 7);
    }

    #[test]
    fn hidden_lines_keep_their_row() {
        let now = Instant::now();
        let mut stage = stage(now);
        SlideNavigator::new(stage.total_slides().try_into().unwrap()).start(&mut stage);
        let lines = draw(&stage);
        assert!(lines.iter().any(|line| line.contains("The Grand Opening")));
        assert!(!lines.iter().any(|line| line.contains("650 horsepower")));
        assert!(!lines.iter().any(|line| line.contains("0-100")));

        stage.tick(now);
        let lines = draw(&stage);
        assert!(lines.iter().any(|line| line.contains("0-100")));
        assert!(!lines.iter().any(|line| line.contains("650 horsepower")));
    }

    #[test]
    fn counter_is_drawn() {
        let now = Instant::now();
        let mut stage = stage(now);
        SlideNavigator::new(stage.total_slides().try_into().unwrap()).go_to(3, &mut stage);
        // the counter starts on the first tick after its delay
        stage.tick(now + Duration::from_secs(1));
        stage.tick(now + Duration::from_secs(5));
        let lines = draw(&stage);
        assert!(lines.iter().any(|line| line.contains("650 horsepower")));
        assert!(lines[10].ends_with(" 4 / 6 "));
    }

    fn particle(x: f64, y: f64) -> Particle {
        Particle { x, y, size: 1.0, speed_x: 0.0, speed_y: 0.0, opacity: 0.5 }
    }

    fn draw_connection(from: Particle, to: Particle, opacity: f64) -> (Vec<String>, Vec<TerminalCommand>) {
        let stage = stage(Instant::now());
        let mut drawer = SlideDrawer::new(&stage, DIMENSIONS);
        drawer.draw_connection(&from, &to, opacity);
        let mut terminal = VirtualTerminal::new(DIMENSIONS);
        for command in &drawer.commands {
            terminal.execute(command).expect("execution failed");
        }
        (terminal.lines(), drawer.commands)
    }

    #[test]
    fn horizontal_connection() {
        let (lines, _) = draw_connection(particle(2.0, 1.0), particle(6.0, 1.0), 0.1);
        assert_eq!(&lines[1][..8], "   ...  ");
    }

    #[test]
    fn diagonal_connection() {
        let (lines, _) = draw_connection(particle(0.0, 0.0), particle(3.0, 3.0), 0.1);
        assert_eq!(&lines[1][..4], " .  ");
        assert_eq!(&lines[2][..4], "  . ");
        assert_eq!(lines[3].trim(), "");
    }

    #[rstest]
    #[case::faint(0.01, true)]
    #[case::strong(0.14, false)]
    fn connection_intensity(#[case] opacity: f64, #[case] dim: bool) {
        let (_, commands) = draw_connection(particle(0.0, 0.0), particle(4.0, 0.0), opacity);
        let styles: Vec<_> = commands
            .iter()
            .filter_map(|command| match command {
                TerminalCommand::PrintText { style, .. } => Some(style.attributes.has(Attribute::Dim)),
                _ => None,
            })
            .collect();
        assert_eq!(styles, vec![dim; 3]);
    }

    #[test]
    fn connection_outside_content_is_clipped() {
        // the last row belongs to the progress bar
        let (_, commands) = draw_connection(particle(0.0, 11.0), particle(5.0, 11.0), 0.1);
        assert!(commands.is_empty());
    }

    #[test]
    fn particles_drawn() {
        let config = EffectsConfig { particles: 30, ..Default::default() };
        let stage = Stage::new(Deck::showcase().expect("invalid deck"), &config, DIMENSIONS, Instant::now());
        let commands = SlideDrawer::new(&stage, DIMENSIONS).build();
        let particles = commands
            .iter()
            .filter(|command| matches!(command, TerminalCommand::PrintText { content, .. } if content == "•" || content == "·"))
            .count();
        // particles in the progress bar row are clipped
        assert!(particles > 0 && particles <= 30, "{particles} particles");
    }

    #[test]
    fn tiny_terminal() {
        let now = Instant::now();
        let stage = stage(now);
        let dimensions = WindowSize { columns: 3, rows: 1 };
        let mut drawer = TerminalDrawer::new(VirtualTerminal::new(dimensions));
        drawer.render(&stage, dimensions).expect("render failed");
        assert_eq!(drawer.terminal.flushes(), 1);
    }
}
