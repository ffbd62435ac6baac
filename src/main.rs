use clap::Parser;
use directories::ProjectDirs;
use slidenav::{Config, Deck, Presenter, WindowSize};
use std::{
    env,
    fs::File,
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// The environment variable used to pick the log level.
const LOG_ENV_VAR: &str = "SLIDENAV_LOG";

/// Navigate slideshows from your terminal.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// The path to the YAML file that contains the deck. The built in showcase deck is used if
    /// none is given.
    deck: Option<PathBuf>,

    /// The path to the configuration file.
    #[clap(short, long)]
    config_file: Option<PathBuf>,

    /// Write logs to this file.
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// Generate a JSON schema for the configuration file.
    #[cfg(feature = "json-schema")]
    #[clap(long)]
    generate_config_file_schema: bool,
}

fn default_config_path() -> Option<PathBuf> {
    match env::var("XDG_CONFIG_HOME") {
        Ok(path) => Some(Path::new(&path).join("slidenav").join("config.yaml")),
        Err(_) => {
            let project_dirs = ProjectDirs::from("", "", "slidenav")?;
            Some(project_dirs.config_dir().join("config.yaml"))
        }
    }
}

fn load_config(path: Option<PathBuf>) -> Result<Config, Box<dyn std::error::Error>> {
    let Some(path) = path.or_else(default_config_path) else {
        return Ok(Config::default());
    };
    Ok(Config::load(&path)?)
}

// The terminal belongs to the presentation so logs only go to a file, if any.
fn init_logging(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .try_init()?;
    Ok(())
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "json-schema")]
    if cli.generate_config_file_schema {
        let schema = schemars::schema_for!(Config);
        serde_json::to_writer_pretty(std::io::stdout(), &schema)
            .map_err(|e| format!("failed to write schema: {e}"))?;
        return Ok(());
    }

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }
    let config = load_config(cli.config_file)?;
    let deck = match &cli.deck {
        Some(path) => Deck::load(path)?,
        None => Deck::showcase()?,
    };
    info!(deck = ?cli.deck, slides = deck.total_slides().get(), "loaded deck");

    let presenter = Presenter::new(deck, &config, WindowSize::current()?)?;
    presenter.present()?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
