use super::listener::{Command, CommandDiscriminants};
use crate::config::KeyBindingsConfig;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use serde_with::DeserializeFromStr;
use std::{fmt, iter, mem, str::FromStr};

/// Keys that have a name rather than being typed as a single character.
const NAMED_KEYS: &[(&[&str], KeyCode)] = &[
    (&["<PageUp>", "<page_up>"], KeyCode::PageUp),
    (&["<PageDown>", "<page_down>"], KeyCode::PageDown),
    (&["<cr>", "<CR>", "<Enter>", "<enter>"], KeyCode::Enter),
    (&["<Home>", "<home>"], KeyCode::Home),
    (&["<End>", "<end>"], KeyCode::End),
    (&["<Left>", "<left>"], KeyCode::Left),
    (&["<Right>", "<right>"], KeyCode::Right),
    (&["<Up>", "<up>"], KeyCode::Up),
    (&["<Down>", "<down>"], KeyCode::Down),
    (&["<Esc>", "<esc>"], KeyCode::Esc),
    (&["<Tab>", "<tab>"], KeyCode::Tab),
    (&["<Backspace>", "<backspace>"], KeyCode::Backspace),
];

/// Turns key presses into commands.
///
/// Multi key bindings like `gg` are supported by buffering key events until they either fully
/// match a binding or can't match any of them.
pub(crate) struct KeyboardListener {
    bindings: CommandKeyBindings,
    events: Vec<KeyEvent>,
}

impl KeyboardListener {
    pub(crate) fn new(bindings: CommandKeyBindings) -> Self {
        Self { bindings, events: Vec::new() }
    }

    pub(crate) fn on_key(&mut self, event: KeyEvent) -> Option<Command> {
        // Only presses count, otherwise terminals that report releases would navigate twice.
        if event.kind == KeyEventKind::Release {
            return None;
        }
        let mut events = mem::take(&mut self.events);
        events.push(event);
        match self.bindings.apply(&events) {
            InputAction::Emit(command) => Some(command),
            InputAction::Buffer => {
                self.events = events;
                None
            }
            // The last key may start or be a binding on its own, e.g. an arrow after a stray digit.
            InputAction::Reset if events.len() > 1 => self.on_key(event),
            InputAction::Reset => None,
        }
    }
}

enum InputAction {
    Buffer,
    Reset,
    Emit(Command),
}

/// Every configured key binding along with the command it triggers.
pub(crate) struct CommandKeyBindings {
    bindings: Vec<(KeyBinding, CommandDiscriminants)>,
}

impl CommandKeyBindings {
    fn apply(&self, events: &[KeyEvent]) -> InputAction {
        let mut action = InputAction::Reset;
        for (binding, command) in &self.bindings {
            match binding.match_events(events) {
                BindingMatch::Full(context) => return Self::build_command(*command, context),
                BindingMatch::Partial => action = InputAction::Buffer,
                BindingMatch::None => (),
            }
        }
        action
    }

    fn build_command(command: CommandDiscriminants, context: MatchContext) -> InputAction {
        use CommandDiscriminants as C;
        let command = match (command, context) {
            (C::Next, _) => Command::Next,
            (C::Previous, _) => Command::Previous,
            (C::FirstSlide, _) => Command::FirstSlide,
            (C::LastSlide, _) => Command::LastSlide,
            (C::GoToSlide, MatchContext::Number(number)) => Command::GoToSlide(number),
            (C::Exit, _) => Command::Exit,
            (C::Suspend, _) => Command::Suspend,
            // go to slide bindings always carry a number and the rest can't be bound to keys
            (C::GoToSlide | C::Redraw | C::PointerMoved, _) => return InputAction::Reset,
        };
        InputAction::Emit(command)
    }

    /// Fails if a binding is a prefix of another one, as the longer one could never trigger.
    fn validate_conflicts<'a>(
        bindings: impl Iterator<Item = &'a KeyBinding>,
    ) -> Result<(), KeyBindingsValidationError> {
        let bindings: Vec<_> = bindings.collect();
        for (index, first) in bindings.iter().enumerate() {
            for second in &bindings[index + 1..] {
                let (shorter, longer) = if first.0.len() <= second.0.len() { (first, second) } else { (second, first) };
                if longer.0.starts_with(&shorter.0) {
                    return Err(KeyBindingsValidationError::Conflict((*shorter).clone(), (*longer).clone()));
                }
            }
        }
        Ok(())
    }
}

impl TryFrom<KeyBindingsConfig> for CommandKeyBindings {
    type Error = KeyBindingsValidationError;

    fn try_from(config: KeyBindingsConfig) -> Result<Self, Self::Error> {
        use CommandDiscriminants as C;
        if !config.go_to_slide.iter().all(KeyBinding::expects_number) {
            return Err(KeyBindingsValidationError::Invalid("go_to_slide", "<number> matcher required"));
        }
        let groups = [
            (C::Next, config.next),
            (C::Previous, config.previous),
            (C::FirstSlide, config.first_slide),
            (C::LastSlide, config.last_slide),
            (C::GoToSlide, config.go_to_slide),
            (C::Exit, config.exit),
            (C::Suspend, config.suspend),
        ];
        let bindings: Vec<_> = groups
            .into_iter()
            .flat_map(|(command, bindings)| bindings.into_iter().map(move |binding| (binding, command)))
            .collect();
        Self::validate_conflicts(bindings.iter().map(|(binding, _)| binding))?;
        Ok(Self { bindings })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum KeyBindingsValidationError {
    #[error("invalid binding for {0}: {1}")]
    Invalid(&'static str, &'static str),

    #[error("conflicting keybindings: {0} and {1}")]
    Conflict(KeyBinding, KeyBinding),
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum BindingMatch {
    Full(MatchContext),
    Partial,
    None,
}

/// A sequence of keys that triggers a command, e.g. `gg` or `<c-c>`.
#[derive(Clone, Debug, PartialEq, Eq, DeserializeFromStr)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
pub struct KeyBinding(#[cfg_attr(feature = "json-schema", schemars(with = "String"))] Vec<KeyMatcher>);

impl KeyBinding {
    fn match_events(&self, events: &[KeyEvent]) -> BindingMatch {
        let mut context = MatchContext::None;
        let mut remaining = events;
        let mut matchers = self.0.iter().peekable();
        while let Some(matcher) = matchers.next() {
            let Some((matched, rest)) = matcher.try_match_events(remaining) else {
                return BindingMatch::None;
            };
            if matches!(matched, MatchContext::Number(_)) {
                context = matched;
            }
            remaining = rest;
            if remaining.is_empty() && matchers.peek().is_some() {
                return BindingMatch::Partial;
            }
        }
        BindingMatch::Full(context)
    }

    fn expects_number(&self) -> bool {
        self.0.contains(&KeyMatcher::Number)
    }
}

impl FromStr for KeyBinding {
    type Err = KeyBindingParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        // an empty binding would match every key
        if input.is_empty() {
            return Err(KeyBindingParseError::NoInput);
        }
        let mut matchers: Vec<KeyMatcher> = Vec::new();
        let mut rest = input;
        while !rest.is_empty() {
            let (matcher, remaining) = KeyMatcher::parse(rest)?;
            if matcher == KeyMatcher::Number && matchers.contains(&KeyMatcher::Number) {
                return Err(KeyBindingParseError::TooManyNumbers);
            }
            matchers.push(matcher);
            rest = remaining;
        }
        Ok(Self(matchers))
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|matcher| write!(f, "{matcher}"))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum KeyBindingParseError {
    #[error("no input")]
    NoInput,

    #[error("not a valid key: {0}")]
    InvalidKey(char),

    #[error("too many number placeholders")]
    TooManyNumbers,

    #[error("invalid control sequence")]
    InvalidControlSequence,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum KeyMatcher {
    Key(KeyCombination),
    Number,
}

impl KeyMatcher {
    fn try_match_events<'a>(&self, events: &'a [KeyEvent]) -> Option<(MatchContext, &'a [KeyEvent])> {
        match self {
            Self::Key(combo) => {
                let (event, rest) = events.split_first()?;
                combo.matches(event).then_some((MatchContext::None, rest))
            }
            Self::Number => Self::try_match_number(events),
        }
    }

    fn try_match_number(mut events: &[KeyEvent]) -> Option<(MatchContext, &[KeyEvent])> {
        let mut number: Option<u32> = None;
        while let Some((head, rest)) = events.split_first() {
            let KeyCode::Char(c) = head.code else { break };
            let Some(digit) = c.to_digit(10) else { break };
            // overflowing numbers never match
            number = Some(number.unwrap_or(0).checked_mul(10)?.checked_add(digit)?);
            events = rest;
        }
        number.map(|number| (MatchContext::Number(number), events))
    }

    fn parse(input: &str) -> Result<(Self, &str), KeyBindingParseError> {
        if let Some(input) = input.strip_prefix("<number>") {
            return Ok((Self::Number, input));
        }
        let (control, input) = match strip_any_prefix(input, &["<c-", "<C-"]) {
            Some(input) => (true, input),
            None => (false, input),
        };
        let (key, mut input) = Self::parse_key_code(input)?;
        if control {
            input = input.strip_prefix('>').ok_or(KeyBindingParseError::InvalidControlSequence)?;
        }
        Ok((Self::Key(KeyCombination { key, control }), input))
    }

    fn parse_key_code(input: &str) -> Result<(KeyCode, &str), KeyBindingParseError> {
        for (aliases, key) in NAMED_KEYS {
            if let Some(rest) = strip_any_prefix(input, aliases) {
                return Ok((*key, rest));
            }
        }
        if let Some(input) = strip_any_prefix(input, &["<F", "<f"]) {
            let (number, rest) = input.split_once('>').ok_or(KeyBindingParseError::InvalidControlSequence)?;
            let number: u8 = number.parse().map_err(|_| KeyBindingParseError::InvalidControlSequence)?;
            return match number {
                1..=12 => Ok((KeyCode::F(number), rest)),
                _ => Err(KeyBindingParseError::InvalidControlSequence),
            };
        }
        let next = input.chars().next().ok_or(KeyBindingParseError::NoInput)?;
        match next {
            // these would make bindings ambiguous
            '<' | '>' => Err(KeyBindingParseError::InvalidKey(next)),
            c if c.is_alphanumeric() || c.is_ascii_punctuation() || c == ' ' => {
                Ok((KeyCode::Char(c), &input[c.len_utf8()..]))
            }
            c => Err(KeyBindingParseError::InvalidKey(c)),
        }
    }
}

fn strip_any_prefix<'a>(input: &'a str, prefixes: &[&str]) -> Option<&'a str> {
    prefixes.iter().find_map(|prefix| input.strip_prefix(prefix))
}

impl fmt::Display for KeyMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number => write!(f, "<number>"),
            Self::Key(combo) => write!(f, "{combo}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum MatchContext {
    Number(u32),
    None,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct KeyCombination {
    key: KeyCode,
    control: bool,
}

impl KeyCombination {
    fn matches(&self, event: &KeyEvent) -> bool {
        let is_control = event.modifiers == KeyModifiers::CONTROL;
        self.key == event.code && self.control == is_control
    }
}

impl From<KeyCode> for KeyCombination {
    fn from(key: KeyCode) -> Self {
        Self { key, control: false }
    }
}

impl fmt::Display for KeyCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = match self.key {
            KeyCode::Char(' ') => "' '".to_string(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::F(number) => format!("<F{number}>"),
            key => match NAMED_KEYS.iter().find(|(_, named)| *named == key) {
                Some((aliases, _)) => aliases[0].to_string(),
                None => format!("<{key:?}>"),
            },
        };
        match self.control {
            true => write!(f, "<c-{key}>"),
            false => write!(f, "{key}"),
        }
    }
}
