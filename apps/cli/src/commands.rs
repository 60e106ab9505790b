//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use ctdocs_core::{TocGenerator, read_time_minutes};
use ctdocs_shared::{AppConfig, ArticleId, init_config, load_config, load_config_from};
use ctdocs_storage::{Cache, FileCache};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// ctdocs — tables of contents and reading metadata for documentation articles.
#[derive(Parser)]
#[command(
    name = "ctdocs",
    version,
    about = "Generate tables of contents and reading metadata for documentation articles.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.ctdocs/ctdocs.toml.
    #[arg(long, global = true, env = "CTDOCS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Build the table of contents for an HTML article.
    Toc {
        /// Article HTML file.
        file: PathBuf,

        /// Article id; when given, the result is cached under it.
        #[arg(long)]
        id: Option<u64>,

        /// Print the full result (navigation, content, headings) as JSON.
        #[arg(long, conflicts_with = "content")]
        json: bool,

        /// Print the rewritten content instead of the navigation markup.
        #[arg(long)]
        content: bool,
    },

    /// Estimate the reading time of an HTML article.
    ReadTime {
        /// Article HTML file.
        file: PathBuf,
    },

    /// Cache maintenance.
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Cache subcommands.
#[derive(Subcommand)]
pub(crate) enum CacheAction {
    /// Remove every cached entry.
    Flush,
    /// Drop the cached table of contents of one article.
    Delete {
        #[arg(long)]
        id: u64,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr so command output
/// on stdout stays pipeable.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = ["ctdocs", "ctdocs_core", "ctdocs_storage", "ctdocs_shared"]
        .map(|target| format!("{target}={level}"))
        .join(",");

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };

    match cli.command {
        Command::Toc {
            file,
            id,
            json,
            content,
        } => cmd_toc(&config, &file, id.map(ArticleId), json, content),
        Command::ReadTime { file } => cmd_read_time(&config, &file),
        Command::Cache { action } => match action {
            CacheAction::Flush => cmd_cache_flush(&config),
            CacheAction::Delete { id } => cmd_cache_delete(&config, ArticleId(id)),
        },
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(&config),
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_toc(
    config: &AppConfig,
    file: &Path,
    id: Option<ArticleId>,
    json: bool,
    content: bool,
) -> Result<()> {
    let html = read_article(file)?;
    let cache = file_cache(config)?;
    let generator = TocGenerator::new(&config.toc).with_cache(&cache);

    let result = generator.generate(&html, id);
    info!(
        file = %file.display(),
        headings = result.headings.len(),
        "table of contents ready"
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if content {
        println!("{}", result.rewritten_content);
    } else {
        println!("{}", result.navigation_markup);
    }

    Ok(())
}

fn cmd_read_time(config: &AppConfig, file: &Path) -> Result<()> {
    let html = read_article(file)?;
    let minutes = read_time_minutes(&html, config.reading.words_per_minute);
    println!("{minutes} min read");
    Ok(())
}

fn cmd_cache_flush(config: &AppConfig) -> Result<()> {
    let cache = file_cache(config)?;
    let removed = cache.flush_all()?;
    println!("Removed {removed} cached entries from {}", cache.dir().display());
    Ok(())
}

fn cmd_cache_delete(config: &AppConfig, id: ArticleId) -> Result<()> {
    let cache = file_cache(config)?;
    let generator = TocGenerator::new(&config.toc).with_cache(&cache);
    if generator.invalidate(id) {
        println!("Dropped cached table of contents for article {id}");
    } else {
        println!("No cached table of contents for article {id}");
    }
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config: &AppConfig) -> Result<()> {
    let toml_str = toml::to_string_pretty(config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_article(file: &Path) -> Result<String> {
    std::fs::read_to_string(file).map_err(|e| eyre!("cannot read '{}': {e}", file.display()))
}

fn file_cache(config: &AppConfig) -> Result<FileCache> {
    Ok(FileCache::from_config(config.cache_dir()?, &config.cache))
}
