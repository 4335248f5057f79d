// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use indicatif::{ProgressBar, ProgressStyle};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, debug, info, warn};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

use linguaflow::app_config::{self, Config};
use linguaflow::language_utils;
use linguaflow::output::{self, SpeechRequest};
use linguaflow::persistence::{HistoryEntry, PersistenceStore, ThemePreference};
use linguaflow::providers::mymemory::MyMemory;
use linguaflow::session::{LanguagePair, TranslationSession};
use linguaflow::storage::{KeyValueStore, MemoryStore, SqliteStore};
use linguaflow::translation::TranslationClient;

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

#[derive(Debug, Clone, ValueEnum)]
enum ThemeMode {
    Dark,
    Light,
    Toggle,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a piece of text once
    Translate(TranslateArgs),

    /// Translate as you type; lines starting with ':' are commands
    Interactive(LanguageArgs),

    /// Show the translation history, newest first
    History,

    /// Show the favorites, newest first
    Favorites,

    /// Copy a history entry into the favorites
    Favorite {
        /// Entry id (a unique prefix is enough)
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Delete the whole history (favorites are kept)
    ClearHistory,

    /// Delete all favorites
    ClearFavorites,

    /// Show or change the theme preference
    Theme {
        #[arg(value_enum)]
        mode: Option<ThemeMode>,
    },

    /// Generate shell completions for linguaflow
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug, Clone)]
struct LanguageArgs {
    /// Source language code (e.g., 'en', 'es') or 'auto'
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'tr', 'fr')
    #[arg(short, long)]
    target_language: Option<String>,
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Text to translate
    #[arg(value_name = "TEXT")]
    text: String,

    #[command(flatten)]
    languages: LanguageArgs,

    /// Read the translation aloud (requires espeak-ng)
    #[arg(long)]
    speak: bool,

    /// Copy the translation to the clipboard (OSC 52)
    #[arg(long)]
    copy: bool,
}

/// LinguaFlow - quick text translation
///
/// Translates short texts through the MyMemory API and keeps a local history
/// of translations and favorites.
#[derive(Parser, Debug)]
#[command(name = "linguaflow")]
#[command(version)]
#[command(about = "Quick text translation with history and favorites")]
#[command(long_about = "LinguaFlow translates short texts through the MyMemory API and keeps
a local history of translations and favorites.

EXAMPLES:
    linguaflow translate hello -s en -t tr      # Translate once
    linguaflow translate \"good night\" --speak    # Translate from auto-detect and speak
    linguaflow interactive -t fr                # Translate as you type
    linguaflow history                          # Show recent translations
    linguaflow favorite 3f2a9c1e                # Promote a history entry
    linguaflow completions bash > linguaflow.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,

    /// SQLite file holding history and favorites
    #[arg(long, global = true, value_name = "PATH")]
    storage: Option<PathBuf>,

    /// Keep history and favorites in memory only
    #[arg(long, global = true, conflicts_with = "storage")]
    ephemeral: bool,
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
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji and ANSI color for log level
    fn decoration_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌ ", "1;31"),
            Level::Warn => ("🚧 ", "1;33"),
            Level::Info => (" ", "1;32"),
            Level::Debug => ("🔍 ", "1;36"),
            Level::Trace => ("📋 ", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (emoji, color) = Self::decoration_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\x1B[{}m{} {} {}\x1B[0m", color, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The logger accepts everything; verbosity is governed by max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "linguaflow", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli)?;
    let store = open_store(&config, &cli)?;

    match cli.command {
        Commands::Translate(args) => run_translate(&config, store, args).await,
        Commands::Interactive(languages) => run_interactive(&config, store, &languages).await,
        Commands::History => {
            print_entries("History", &store.list_history());
            Ok(())
        }
        Commands::Favorites => {
            print_entries("Favorites", &store.list_favorites());
            Ok(())
        }
        Commands::Favorite { id } => promote(&store, &id),
        Commands::ClearHistory => {
            store.clear_history();
            println!("🗑️ History cleared.");
            Ok(())
        }
        Commands::ClearFavorites => {
            store.clear_favorites();
            println!("🗑️ Favorites cleared.");
            Ok(())
        }
        Commands::Theme { mode } => {
            let theme = match mode {
                None => store.theme(),
                Some(ThemeMode::Toggle) => store.toggle_theme(),
                Some(ThemeMode::Dark) => set_theme(&store, ThemePreference::Dark),
                Some(ThemeMode::Light) => set_theme(&store, ThemePreference::Light),
            };
            println!("Theme: {}", theme);
            Ok(())
        }
        Commands::Completions { .. } => Ok(()),
    }
}

fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    if let Some(level) = &cli.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(LevelFilter::from(&level));
    }

    let mut config = Config::load_or_create(&cli.config_path)?;

    // Command line wins over the config file
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone().into();
    }
    if let Some(path) = &cli.storage {
        config.storage_path = Some(path.clone());
    }

    config.validate().context("Configuration validation failed")?;
    log::set_max_level(LevelFilter::from(&config.log_level));

    Ok(config)
}

fn open_store(config: &Config, cli: &CommandLineOptions) -> Result<PersistenceStore> {
    let kv: Arc<dyn KeyValueStore> = if cli.ephemeral {
        debug!("Using in-memory storage");
        Arc::new(MemoryStore::new())
    } else {
        match &config.storage_path {
            Some(path) => Arc::new(SqliteStore::open(path)?),
            None => Arc::new(SqliteStore::open_default()?),
        }
    };

    Ok(PersistenceStore::with_limit(kv, config.history_limit))
}

fn build_session(config: &Config, store: PersistenceStore, languages: &LanguageArgs) -> Result<TranslationSession> {
    let provider = Arc::new(MyMemory::from_config(&config.provider));
    let client = TranslationClient::new(provider, store, config.auto_detect_fallback.clone());
    let session = TranslationSession::new(
        client,
        LanguagePair::new(config.source_language.clone(), config.target_language.clone()),
        config.debounce(),
    );

    if let Some(source) = &languages.source_language {
        session.set_source_language(source)?;
    }
    if let Some(target) = &languages.target_language {
        session.set_target_language(target)?;
    }

    Ok(session)
}

async fn run_translate(config: &Config, store: PersistenceStore, args: TranslateArgs) -> Result<()> {
    let session = build_session(config, store, &args.languages)?;
    let languages = session.language_pair();
    debug!("Translating {} -> {}", languages.source, languages.target);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(output::IN_PROGRESS_STATUS);
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = session.translate_now(&args.text).await;
    spinner.finish_and_clear();

    match result {
        Ok(_) => println!("{}", session.output()),
        Err(e) => {
            println!("{}", session.output());
            return Err(anyhow!(e));
        }
    }

    if args.speak {
        speak_current(&session).await;
    }
    if args.copy {
        copy_current(&session);
    }

    Ok(())
}

// =============================================================================
// Interactive mode
// =============================================================================

#[derive(Debug, PartialEq)]
enum ReplCommand {
    Go,
    Swap,
    From(String),
    To(String),
    Speak,
    Copy,
    History,
    Favorites,
    Favorite(String),
    ClearHistory,
    ClearFavorites,
    Theme,
    Help,
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> Option<ReplCommand> {
    let line = line.trim();
    let rest = line.strip_prefix(':')?;
    let mut parts = rest.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default();
    let argument = parts.next().map(str::trim).unwrap_or_default().to_string();

    let command = match name {
        "go" => ReplCommand::Go,
        "swap" => ReplCommand::Swap,
        "from" if !argument.is_empty() => ReplCommand::From(argument),
        "to" if !argument.is_empty() => ReplCommand::To(argument),
        "speak" => ReplCommand::Speak,
        "copy" => ReplCommand::Copy,
        "history" => ReplCommand::History,
        "favorites" => ReplCommand::Favorites,
        "fav" if !argument.is_empty() => ReplCommand::Favorite(argument),
        "clear-history" => ReplCommand::ClearHistory,
        "clear-favorites" => ReplCommand::ClearFavorites,
        "theme" => ReplCommand::Theme,
        "help" => ReplCommand::Help,
        "quit" | "q" => ReplCommand::Quit,
        _ => ReplCommand::Unknown(line.to_string()),
    };
    Some(command)
}

const REPL_HELP: &str = "Commands:
  :go               translate the last input now
  :swap             swap source and target languages
  :from CODE        set the source language ('auto' allowed)
  :to CODE          set the target language
  :speak            read the translation aloud
  :copy             copy the translation to the clipboard
  :history          show the history
  :favorites        show the favorites
  :fav ID           copy a history entry into the favorites
  :clear-history    delete the history
  :clear-favorites  delete the favorites
  :theme            toggle dark/light theme
  :quit             leave";

async fn run_interactive(config: &Config, store: PersistenceStore, languages: &LanguageArgs) -> Result<()> {
    let session = build_session(config, store, languages)?;
    print_languages(&session.language_pair());
    println!("Theme: {}", session.store().theme());
    println!("{}", session.output());
    println!("Type ':help' for commands.");

    let mut updates = session.subscribe();
    let printer = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let current = updates.borrow_and_update().clone();
            println!("» {}", current);
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last_input = String::new();

    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            None => {
                last_input = line.clone();
                session.schedule_translate(line);
            }
            Some(ReplCommand::Quit) => break,
            Some(command) => handle_command(&session, command, &last_input).await,
        }
    }

    session.cancel_pending();
    printer.abort();
    info!("Bye!");
    Ok(())
}

async fn handle_command(session: &TranslationSession, command: ReplCommand, last_input: &str) {
    let store = session.store();
    match command {
        ReplCommand::Go => {
            session.cancel_pending();
            // Outcome is printed by the output subscriber
            let _ = session.translate_now(last_input).await;
        }
        ReplCommand::Swap => match session.swap_languages() {
            Ok(pair) => print_languages(&pair),
            Err(_) => println!("{}", output::SWAP_REFUSED),
        },
        ReplCommand::From(code) => match session.set_source_language(&code) {
            Ok(()) => print_languages(&session.language_pair()),
            Err(e) => warn!("{}", e),
        },
        ReplCommand::To(code) => match session.set_target_language(&code) {
            Ok(()) => print_languages(&session.language_pair()),
            Err(e) => warn!("{}", e),
        },
        ReplCommand::Speak => speak_current(session).await,
        ReplCommand::Copy => copy_current(session),
        ReplCommand::History => print_entries("History", &store.list_history()),
        ReplCommand::Favorites => print_entries("Favorites", &store.list_favorites()),
        ReplCommand::Favorite(id) => {
            if let Err(e) = promote(store, &id) {
                warn!("{}", e);
            }
        }
        ReplCommand::ClearHistory => {
            store.clear_history();
            println!("🗑️ History cleared.");
        }
        ReplCommand::ClearFavorites => {
            store.clear_favorites();
            println!("🗑️ Favorites cleared.");
        }
        ReplCommand::Theme => println!("Theme: {}", store.toggle_theme()),
        ReplCommand::Help => println!("{}", REPL_HELP),
        ReplCommand::Unknown(line) => println!("Unknown command '{}'.\n{}", line, REPL_HELP),
        ReplCommand::Quit => {}
    }
}

// =============================================================================
// Actions
// =============================================================================

async fn speak_current(session: &TranslationSession) {
    match session.speech_request() {
        Ok(request) => {
            if let Err(e) = speak(&request).await {
                warn!("{}", e);
            }
        }
        Err(_) => println!("{}", output::NOTHING_TO_SPEAK),
    }
}

/// Hand the text to espeak-ng, trying the full locale then the bare language
async fn speak(request: &SpeechRequest) -> Result<()> {
    let voices = [
        request.locale.to_lowercase(),
        language_utils::primary_subtag(&request.locale).to_lowercase(),
    ];

    for voice in voices.iter() {
        let status = tokio::process::Command::new("espeak-ng")
            .arg("-v")
            .arg(voice)
            .arg(&request.text)
            .status()
            .await
            .context("Speech synthesis is unavailable (espeak-ng not found)")?;

        if status.success() {
            return Ok(());
        }
        debug!("espeak-ng rejected voice '{}'", voice);
    }

    Err(anyhow!("No speech voice available for {}", request.locale))
}

fn copy_current(session: &TranslationSession) {
    match session.clipboard_text() {
        Ok(text) => {
            // OSC 52 lets the terminal emulator set the system clipboard
            let mut stdout = std::io::stdout();
            let _ = write!(stdout, "\x1B]52;c;{}\x07", STANDARD.encode(text.as_bytes()));
            let _ = stdout.flush();
            println!("✅ Translation copied to clipboard!");
        }
        Err(_) => println!("{}", output::NOTHING_TO_COPY),
    }
}

fn set_theme(store: &PersistenceStore, theme: ThemePreference) -> ThemePreference {
    store.set_theme(theme);
    theme
}

/// Promote the history entry whose id starts with `prefix`
fn promote(store: &PersistenceStore, prefix: &str) -> Result<()> {
    let prefix = prefix.trim();
    let history = store.list_history();
    let matches: Vec<&HistoryEntry> = history.iter().filter(|e| e.id.starts_with(prefix)).collect();

    let entry = match matches.as_slice() {
        [entry] => *entry,
        [] => return Err(anyhow!("No history entry with id '{}'", prefix)),
        _ => return Err(anyhow!("Id prefix '{}' is ambiguous ({} entries)", prefix, matches.len())),
    };

    if store.list_favorites().iter().any(|f| f.same_pair(entry)) {
        println!("⭐ Already in favorites: {} ➝ {}", entry.input, entry.output);
        return Ok(());
    }

    if store.promote_to_favorite_by_id(&entry.id) {
        println!("⭐ Added to favorites: {} ➝ {}", entry.input, entry.output);
        Ok(())
    } else {
        Err(anyhow!("History entry '{}' disappeared", prefix))
    }
}

fn print_languages(pair: &LanguagePair) {
    let name = |code: &str| language_utils::get_language_name(code).unwrap_or_else(|_| code.to_string());
    println!("🌍 {} ({}) ➝ {} ({})", name(&pair.source), pair.source, name(&pair.target), pair.target);
}

fn print_entries(title: &str, entries: &[HistoryEntry]) {
    if entries.is_empty() {
        println!("{}: empty", title);
        return;
    }

    println!("{} ({}):", title, entries.len());
    for entry in entries {
        let short_id: String = entry.id.chars().take(8).collect();
        println!(
            "  [{}] {} {} ➝ {} ({})",
            short_id,
            entry.created_date(),
            entry.input,
            entry.output,
            entry.language_target
        );
    }
}
