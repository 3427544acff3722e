// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error, info, warn};
use std::io::Write;
use std::path::Path;

use locali18n::I18nError;
use locali18n::app_config::{self, Config, TranslationProvider};
use locali18n::app_controller::Controller;
use locali18n::providers::mock::MockProvider;
use locali18n::providers::ollama::OllamaProvider;
use locali18n::providers::platform::PlatformProvider;

/// Strings rendered by the demo page
const DEMO_TEXTS: &[&str] = &["count is 0", "Click on the Vite and React logos to learn more"];

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Platform,
    Ollama,
    Mock,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Platform => TranslationProvider::Platform,
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
            CliTranslationProvider::Mock => TranslationProvider::Mock,
        }
    }
}

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

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for locali18n
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// locali18n - cached, deduplicated translation of UI strings
#[derive(Parser, Debug)]
#[command(name = "locali18n")]
#[command(version)]
#[command(about = "Translate UI strings through a cached translation session")]
#[command(long_about = "Translates the given texts (or the demo page strings when none are given)
through one cached session per language pair. Repeated texts are translated once.

PROVIDERS:
    platform  Translator installed by a host application embedding locali18n.
              The standalone binary installs none, so this provider (the
              default) reports the capability as unavailable here.
    ollama    A local or remote Ollama server.
    mock      Offline pseudo-translation.

EXAMPLES:
    locali18n -p mock                           # Translate the demo strings en -> es
    locali18n -p mock 'Hello' 'Hello'           # Offline pseudo-translation
    locali18n -p ollama -t fr 'Good morning'    # Use a local Ollama server
    locali18n completions bash > locali18n.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. If the file doesn't exist,
    a default one is created.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Texts to translate
    #[arg(value_name = "TEXT")]
    texts: Vec<String>,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name (Ollama provider)
    #[arg(short, long)]
    model: Option<String>,

    /// Source language tag (e.g., 'en', 'pt-BR')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language tag (e.g., 'es', 'fr')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation, filtered by the global max level
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and tag for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "ERROR"),
            Level::Warn => ("1;33", "WARN "),
            Level::Info => ("1;32", "INFO "),
            Level::Debug => ("1;36", "DEBUG"),
            Level::Trace => ("1;35", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        // The level is raised or lowered after init, once CLI and config are read
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, tag) = Self::style_for_level(record.level());
            let _ = writeln!(std::io::stderr(), "\x1B[{}m{} {} {}\x1B[0m", color, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info until the config says otherwise
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "locali18n", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(level) = &cli.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.into());
    }

    let config = load_config(&cli)?;
    log::set_max_level(config.log_level.into());

    let texts: Vec<String> = if cli.texts.is_empty() {
        DEMO_TEXTS.iter().map(|text| text.to_string()).collect()
    } else {
        cli.texts
    };

    let pair = config.language_pair()?;
    info!("Using the {} provider", config.provider.display_name());

    let outcomes = match config.provider {
        TranslationProvider::Platform => Controller::new(PlatformProvider::new(), pair).run(&texts).await,
        TranslationProvider::Ollama => {
            let provider = OllamaProvider::from_config(&config.ollama)
                .context("Failed to set up the Ollama provider")?;
            Controller::new(provider, pair).run(&texts).await
        }
        TranslationProvider::Mock => Controller::new(MockProvider::working(), pair).run(&texts).await,
    };

    if let Err(e) = &outcomes {
        if e.is_capability_unavailable() && config.provider == TranslationProvider::Platform {
            warn!("No platform translator is installed in this process; try '-p mock' or '-p ollama'");
        }
    }

    report(&texts, outcomes)
}

fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let mut config = Config::load_or_create(Path::new(&cli.config_path))?;

    // Override config with CLI options if provided
    if let Some(provider) = &cli.provider {
        config.provider = provider.clone().into();
    }
    if let Some(model) = &cli.model {
        config.ollama.model = model.clone();
    }
    if let Some(source_language) = &cli.source_language {
        config.source_language = source_language.clone();
    }
    if let Some(target_language) = &cli.target_language {
        config.target_language = target_language.clone();
    }
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

fn report(texts: &[String], outcomes: Result<Vec<Result<String, I18nError>>, I18nError>) -> Result<()> {
    let outcomes = outcomes.map_err(|e| {
        error!("{}", e);
        anyhow!(e)
    })?;

    let mut failures = 0;
    for (text, outcome) in texts.iter().zip(outcomes) {
        match outcome {
            Ok(translated) => println!("{}\t{}", text, translated),
            Err(_) => failures += 1,
        }
    }

    if failures > 0 {
        return Err(anyhow!("{} of {} text(s) could not be translated", failures, texts.len()));
    }
    Ok(())
}
