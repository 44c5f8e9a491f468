use std::path::PathBuf;

use chrono::Local;
use clap::Parser;
use itinerary::{
    clock::{Clock, SystemClock},
    config::TrackerConfig,
    feed,
    loader::ItineraryLoader,
    project_itinerary, ConfigError, ItineraryError,
};
use log::info;
use logger::{Logger, LoggerError};

/// Follow Santa's yearly tour on a map.
#[derive(Parser, Debug)]
#[command(name = "santa-tracker", version)]
struct Cli {
    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Route feed URL, overriding the configuration.
    #[arg(long, conflicts_with = "feed_file")]
    feed_url: Option<String>,
    /// Local route file, overriding the configuration.
    #[arg(long)]
    feed_file: Option<PathBuf>,
    /// Directory for santa_tracker.log.
    #[arg(long)]
    log_dir: Option<PathBuf>,
    /// Print the current projection as JSON instead of opening the map.
    #[arg(long)]
    print: bool,
}

#[derive(thiserror::Error, Debug)]
enum TrackerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Logger(#[from] LoggerError),
    #[error(transparent)]
    Itinerary(#[from] ItineraryError),
    #[error("Graphical interface failed: {0}")]
    Gui(#[from] eframe::Error),
    #[error("Failed to write projection: {0}")]
    Output(#[from] serde_json::Error),
}

fn main() -> Result<(), TrackerError> {
    let cli = Cli::parse();
    let mut config = load_config(&cli)?;
    if cli.print {
        // stdout carries the JSON
        config.log.console = false;
    }

    Logger::new(
        config.log.dir.as_deref(),
        logger::parse_level(&config.log.level)?,
        config.log.console,
    )?
    .init()?;

    if cli.print {
        return print_projection(&config);
    }

    info!(
        "Tracking Santa every {}s",
        config.refresh.interval().as_secs()
    );
    graphical_interface::run(config)?;
    Ok(())
}

fn load_config(cli: &Cli) -> Result<TrackerConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => TrackerConfig::from_file(path)?,
        None => TrackerConfig::default(),
    };

    if let Some(url) = &cli.feed_url {
        config.feed.url = url.clone();
        config.feed.file = None;
    }
    if let Some(path) = &cli.feed_file {
        config.feed.file = Some(path.clone());
    }
    if let Some(dir) = &cli.log_dir {
        config.log.dir = Some(dir.clone());
    }

    config.validate()?;
    Ok(config)
}

/// Loads the route once and prints what the map would show right now. An
/// unavailable route prints an empty list.
fn print_projection(config: &TrackerConfig) -> Result<(), TrackerError> {
    let mut loader = ItineraryLoader::spawn(feed::open(&config.feed)?, || {})?;
    loader.wait();

    let now = SystemClock.now().with_timezone(&Local);
    let projected = project_itinerary(loader.latest().as_deref(), &now);

    println!("{}", serde_json::to_string_pretty(&projected)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_feed() {
        let cli = Cli::parse_from(["santa-tracker", "--feed-url", "http://localhost/route.json"]);
        let config = load_config(&cli).unwrap();

        assert_eq!(config.feed.url, "http://localhost/route.json");
        assert!(config.feed.file.is_none());
        assert_eq!(config.refresh.interval_secs, 30);
    }

    #[test]
    fn test_cli_feed_file_and_log_dir() {
        let cli = Cli::parse_from([
            "santa-tracker",
            "--feed-file",
            "/tmp/route.json",
            "--log-dir",
            "/tmp",
            "--print",
        ]);
        let config = load_config(&cli).unwrap();

        assert!(cli.print);
        assert_eq!(config.feed.file, Some(PathBuf::from("/tmp/route.json")));
        assert_eq!(config.log.dir, Some(PathBuf::from("/tmp")));
    }

    #[test]
    fn test_feed_url_and_file_conflict() {
        let parsed = Cli::try_parse_from([
            "santa-tracker",
            "--feed-url",
            "http://localhost/route.json",
            "--feed-file",
            "/tmp/route.json",
        ]);
        assert!(parsed.is_err());
    }
}
