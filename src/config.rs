use crate::commands::keyboard::KeyBinding;
use serde::Deserialize;
use std::{fs, io, path::Path};

#[derive(Clone, Debug, Default, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// The default configuration for every presentation.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// How mouse input is interpreted.
    #[serde(default)]
    pub input: InputConfig,

    /// The decorative effects.
    #[serde(default)]
    pub effects: EffectsConfig,

    #[serde(default)]
    pub bindings: KeyBindingsConfig,
}

impl Config {
    /// Load the config from a path.
    ///
    /// A missing file is not an error and results in the default configuration.
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        let config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("io: {0}")]
    Io(#[from] io::Error),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] serde_yaml::Error),
}

#[derive(Clone, Debug, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct DefaultsConfig {
    /// The time between two frames, in milliseconds.
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self { frame_interval_ms: default_frame_interval_ms() }
    }
}

fn default_frame_interval_ms() -> u64 {
    33
}

#[derive(Clone, Debug, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct InputConfig {
    /// How long the mouse wheel is ignored after it moves the presentation, in milliseconds.
    #[serde(default = "default_wheel_cooldown_ms")]
    pub wheel_cooldown_ms: u64,

    /// How far a drag needs to go, in cells, before it's considered a swipe.
    ///
    /// Both axes use the same threshold, so a vertical swipe needs a terminal with more rows
    /// than this. The default of 50 rules out vertical swipes in an 80x24 terminal and needs
    /// a drag across more than 50 columns horizontally; lower it for small terminals.
    #[serde(default = "default_swipe_threshold")]
    pub swipe_threshold: f64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self { wheel_cooldown_ms: default_wheel_cooldown_ms(), swipe_threshold: default_swipe_threshold() }
    }
}

fn default_wheel_cooldown_ms() -> u64 {
    crate::commands::wheel::DEFAULT_WHEEL_COOLDOWN.as_millis() as u64
}

fn default_swipe_threshold() -> f64 {
    crate::commands::touch::DEFAULT_SWIPE_THRESHOLD
}

#[derive(Clone, Debug, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct EffectsConfig {
    /// The number of particles floating behind the slides. Use 0 to disable them.
    #[serde(default = "default_particles")]
    pub particles: usize,

    /// Particles closer than this, in columns, are joined by a faint line. Use 0 to disable these.
    #[serde(default = "default_connection_distance")]
    pub connection_distance: f64,

    /// Whether slide contents follow the mouse pointer.
    #[serde(default = "default_parallax")]
    pub parallax: bool,

    /// The maximum parallax shift in columns.
    #[serde(default = "default_parallax_columns")]
    pub parallax_columns: u16,

    /// The maximum parallax shift in rows.
    #[serde(default = "default_parallax_rows")]
    pub parallax_rows: u16,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            particles: default_particles(),
            connection_distance: default_connection_distance(),
            parallax: default_parallax(),
            parallax_columns: default_parallax_columns(),
            parallax_rows: default_parallax_rows(),
        }
    }
}

fn default_particles() -> usize {
    80
}

fn default_connection_distance() -> f64 {
    12.0
}

fn default_parallax() -> bool {
    true
}

fn default_parallax_columns() -> u16 {
    4
}

fn default_parallax_rows() -> u16 {
    2
}

#[derive(Clone, Debug, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct KeyBindingsConfig {
    /// The keys that move to the next slide.
    #[serde(default = "default_next_bindings")]
    pub(crate) next: Vec<KeyBinding>,

    /// The keys that move to the previous slide.
    #[serde(default = "default_previous_bindings")]
    pub(crate) previous: Vec<KeyBinding>,

    /// The key binding to jump to the first slide.
    #[serde(default = "default_first_slide_bindings")]
    pub(crate) first_slide: Vec<KeyBinding>,

    /// The key binding to jump to the last slide.
    #[serde(default = "default_last_slide_bindings")]
    pub(crate) last_slide: Vec<KeyBinding>,

    /// The key binding to jump to a specific slide.
    #[serde(default = "default_go_to_slide_bindings")]
    pub(crate) go_to_slide: Vec<KeyBinding>,

    /// The key binding to close the application.
    #[serde(default = "default_exit_bindings")]
    pub(crate) exit: Vec<KeyBinding>,

    /// The key binding to suspend the application.
    #[serde(default = "default_suspend_bindings")]
    pub(crate) suspend: Vec<KeyBinding>,
}

impl Default for KeyBindingsConfig {
    fn default() -> Self {
        Self {
            next: default_next_bindings(),
            previous: default_previous_bindings(),
            first_slide: default_first_slide_bindings(),
            last_slide: default_last_slide_bindings(),
            go_to_slide: default_go_to_slide_bindings(),
            exit: default_exit_bindings(),
            suspend: default_suspend_bindings(),
        }
    }
}

fn make_keybindings<const N: usize>(raw_bindings: [&str; N]) -> Vec<KeyBinding> {
    raw_bindings.into_iter().map(|binding| binding.parse().expect("invalid binding")).collect()
}

fn default_next_bindings() -> Vec<KeyBinding> {
    make_keybindings(["<right>", "<down>"])
}

fn default_previous_bindings() -> Vec<KeyBinding> {
    make_keybindings(["<left>", "<up>"])
}

fn default_first_slide_bindings() -> Vec<KeyBinding> {
    make_keybindings(["gg"])
}

fn default_last_slide_bindings() -> Vec<KeyBinding> {
    make_keybindings(["G"])
}

fn default_go_to_slide_bindings() -> Vec<KeyBinding> {
    make_keybindings(["<number>G"])
}

fn default_exit_bindings() -> Vec<KeyBinding> {
    make_keybindings(["<c-c>", "q"])
}

fn default_suspend_bindings() -> Vec<KeyBinding> {
    make_keybindings(["<c-z>"])
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::commands::keyboard::CommandKeyBindings;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn default_bindings() {
        let config = KeyBindingsConfig::default();
        CommandKeyBindings::try_from(config).expect("construction failed");
    }

    #[test]
    fn partial_config() {
        let input = r#"
input:
  wheel_cooldown_ms: 300
effects:
  particles: 0
bindings:
  next: ["l"]
"#;
        let config: Config = serde_yaml::from_str(input).expect("failed to parse");
        assert_eq!(config.input.wheel_cooldown_ms, 300);
        assert_eq!(config.input.swipe_threshold, 50.0);
        assert_eq!(config.effects.particles, 0);
        assert!(config.effects.parallax);
        assert_eq!(config.effects.connection_distance, 12.0);
        assert_eq!(config.bindings.next, vec!["l".parse::<KeyBinding>().unwrap()]);
        assert_eq!(config.bindings.previous, default_previous_bindings());
        assert_eq!(config.defaults.frame_interval_ms, 33);
    }

    #[test]
    fn unknown_fields_rejected() {
        let result = serde_yaml::from_str::<Config>("input:\n  potato: 1");
        assert!(result.is_err());
    }

    #[test]
    fn invalid_binding_rejected() {
        let result = serde_yaml::from_str::<KeyBindingsConfig>("next: [\"<hi>\"]");
        assert!(result.is_err());
    }

    #[test]
    fn missing_file_is_default() {
        let config = Config::load(Path::new("/this/path/does/not/exist.yaml")).expect("load failed");
        assert_eq!(config.input.wheel_cooldown_ms, 800);
    }

    #[test]
    fn load_from_file() {
        let mut file = NamedTempFile::new().expect("failed to create file");
        writeln!(file, "defaults:\n  frame_interval_ms: 16").expect("failed to write");
        let config = Config::load(file.path()).expect("load failed");
        assert_eq!(config.defaults.frame_interval_ms, 16);
    }
}
