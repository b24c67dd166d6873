// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{info, warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use wikiscript::app_config::{self, Config, OutputFormat};
use wikiscript::app_controller::{self, Controller};
use wikiscript::file_utils::FileManager;
use wikiscript::output;
use wikiscript::Show;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for OutputFormat to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Text,
    Json,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(cli_format: CliOutputFormat) -> Self {
        match cli_format {
            CliOutputFormat::Text => OutputFormat::Text,
            CliOutputFormat::Json => OutputFormat::Json,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch and parse a single episode transcript
    Episode {
        /// Episode name to record in the output
        #[arg(value_name = "NAME")]
        name: String,

        /// Transcript page URL
        #[arg(value_name = "URL")]
        url: String,
    },

    /// Parse every episode linked from the index page
    All {
        /// Index page URL (defaults to `index_url` from the config)
        #[arg(value_name = "INDEX_URL")]
        index_url: Option<String>,
    },

    /// Parse a saved transcript page, or every saved page in a directory
    File {
        /// HTML file or directory of HTML files
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Episode name for a single file (defaults to the file name)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// List the episode links found on the index page
    Links {
        /// Index page URL (defaults to `index_url` from the config)
        #[arg(value_name = "INDEX_URL")]
        index_url: Option<String>,
    },

    /// Generate shell completions for wikiscript
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// wikiscript - TV transcripts from wiki pages
///
/// Turns episode transcript pages of a fan wiki into scenes, stage
/// directions and dialogue lines.
#[derive(Parser, Debug)]
#[command(name = "wikiscript")]
#[command(version)]
#[command(about = "Parse wiki episode transcripts into structured scripts")]
#[command(long_about = "wikiscript fetches episode transcript pages from a wiki and parses them into scenes, stage directions and dialogue.

EXAMPLES:
    wikiscript all                                   # Every episode from the configured index
    wikiscript --format json -o show.json all        # Save the whole show as JSON
    wikiscript --speaker Mark all                    # Only Mark's lines
    wikiscript episode \"Pilot\" https://example.org/wiki/Pilot/Transcript
    wikiscript file saved_pages/                     # Parse saved HTML pages offline
    wikiscript links                                 # Show discovered episode links
    wikiscript completions bash > wikiscript.bash    # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, env = "WIKISCRIPT_CONFIG", default_value = "conf.json")]
    config: String,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    format: Option<CliOutputFormat>,

    /// Write output to this file instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Only print the lines spoken by this character
    #[arg(short, long, global = true)]
    speaker: Option<String>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        // the boxed logger lets everything through; set_max_level does the filtering
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let level = record.level();

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                Self::get_color_for_level(level),
                now,
                Self::get_emoji_for_level(level),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "wikiscript", &mut std::io::stdout());
        return Ok(());
    }

    // If log level is set via command line, apply it immediately
    if let Some(cli_level) = &cli.log_level {
        let level: app_config::LogLevel = cli_level.clone().into();
        log::set_max_level(level.level_filter());
    }

    let config = load_config(&cli)?;

    // If log level was not set via command line, update it from config now
    if cli.log_level.is_none() {
        log::set_max_level(config.log_level.level_filter());
    }

    let controller = Controller::with_config(config.clone())
        .context("Configuration validation failed")?;

    let show = match &cli.command {
        Commands::Episode { name, url } => {
            let mut show = Show::new();
            show.add_episode(controller.parse_episode(name, url).await?);
            show
        }
        Commands::All { index_url } => {
            let index_url = index_url.as_deref().unwrap_or(config.index_url.as_str());
            let progress = app_controller::episode_progress_bar();
            controller.parse_all_with_progress(index_url, &progress).await?
        }
        Commands::File { path, name } => {
            if !path.exists() {
                return Err(anyhow!("Input path does not exist: {:?}", path));
            }
            controller.parse_local(name.as_deref(), path)?
        }
        Commands::Links { index_url } => {
            let index_url = index_url.as_deref().unwrap_or(config.index_url.as_str());
            let links = controller.list_links(index_url).await?;
            let listing = links
                .iter()
                .map(|target| format!("{}\t{}", target.name, target.url))
                .collect::<Vec<_>>()
                .join("\n");
            return emit(&listing, cli.output.as_deref());
        }
        Commands::Completions { .. } => return Ok(()),
    };

    let rendered = match &cli.speaker {
        Some(speaker) => {
            output::render_speaker(&show, speaker, config.output.format, config.output.pretty)?
        }
        None => output::render(&show, config.output.format, config.output.pretty)?,
    };

    emit(&rendered, cli.output.as_deref())
}

/// Load or create the config file, then apply command line overrides
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let mut config = Config::load_or_create(&cli.config)?;

    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }

    if let Some(format) = cli.format {
        config.output.format = format.into();
    }

    config.validate()
        .context("Configuration validation failed")?;

    Ok(config)
}

fn emit(content: &str, output_path: Option<&Path>) -> Result<()> {
    match output_path {
        Some(path) => {
            FileManager::write_to_file(path, content)?;
            info!("Success: {:?}", path);
        }
        None => {
            if content.is_empty() {
                warn!("Nothing to print");
                return Ok(());
            }
            let mut stdout = std::io::stdout();
            writeln!(stdout, "{}", content).context("Failed to write to stdout")?;
        }
    }
    Ok(())
}
