//! `verba` - translate dictionary paths and check locale coverage

mod config;
mod dictionaries;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use config::VerbaConfig;
use dictionaries::{load_dictionary, Catalog, Coverage};
use verba_i18n::{available, LocaleContext, TranslationRequest};

#[derive(Parser)]
#[command(name = "verba", version, about = "Locale dictionary tooling")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a verba.toml (defaults to ./verba.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a dotted dictionary path
    Translate {
        /// Dotted path, e.g. el.pagination.total
        path: String,

        /// Dictionary file to translate against
        #[arg(long, conflicts_with = "lang")]
        dict: Option<PathBuf>,

        /// Language identifier (built-in or configured dictionary)
        #[arg(long)]
        lang: Option<String>,

        /// Placeholder value as name=value (repeatable)
        #[arg(long = "arg", value_name = "NAME=VALUE", value_parser = parse_arg)]
        args: Vec<(String, String)>,
    },

    /// Report dictionary paths missing relative to a base language
    Check {
        /// Dictionary file to check
        file: PathBuf,

        /// Base language to compare against
        #[arg(long, default_value = "en")]
        base: String,
    },

    /// List built-in languages
    List,
}

fn parse_arg(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got `{s}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty placeholder name in `{s}`"));
    }
    Ok((name.to_string(), value.to_string()))
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// `--config` if given, otherwise `./verba.toml` when present.
fn load_config(path: Option<&Path>) -> Result<VerbaConfig> {
    let config = match path {
        Some(path) => VerbaConfig::load(path)?,
        None => {
            let cwd = std::env::current_dir().context("Failed to read current directory")?;
            VerbaConfig::load_from_dir(&cwd)?
        }
    };
    debug!(default = %config.locale.default, "configuration loaded");
    Ok(config)
}

fn translate(
    config_path: Option<&Path>,
    path: String,
    dict: Option<&Path>,
    lang: Option<&str>,
    args: Vec<(String, String)>,
) -> Result<String> {
    // An explicit dictionary file needs no configuration.
    let dictionary = match dict {
        Some(file) => Arc::new(load_dictionary(file)?),
        None => {
            let config = load_config(config_path)?;
            let catalog = Catalog::load(&config.locale.dictionaries)?;
            catalog.resolve(lang.unwrap_or(&config.locale.default))
        }
    };

    let ctx = LocaleContext::new(dictionary);
    let mut request = TranslationRequest::new(path);
    for (name, value) in args {
        request = request.arg(name, value);
    }

    let text = ctx.tr(&request);
    if text.is_empty() {
        warn!(path = %request.path, lang = %ctx.lang(), "no translation found");
    }
    Ok(text)
}

fn check(config_path: Option<&Path>, file: &Path, base: &str) -> Result<Coverage> {
    let config = load_config(config_path)?;
    let catalog = Catalog::load(&config.locale.dictionaries)?;
    let base = catalog.resolve(base);
    let target = load_dictionary(file)?;

    let coverage = Coverage::compare(&base, &target);
    for path in &coverage.missing {
        println!("missing  {path}");
    }
    for path in &coverage.extra {
        println!("extra    {path}");
    }
    println!(
        "{}: {} missing, {} extra (base: {})",
        file.display(),
        coverage.missing.len(),
        coverage.extra.len(),
        base.name()
    );
    Ok(coverage)
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Translate {
            path,
            dict,
            lang,
            args,
        } => {
            let text = translate(config_path, path, dict.as_deref(), lang.as_deref(), args)?;
            println!("{text}");
            Ok(ExitCode::SUCCESS)
        }

        Commands::Check { file, base } => {
            let coverage = check(config_path, &file, &base)?;
            Ok(if coverage.is_complete() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }

        Commands::List => {
            for lang in available() {
                println!("{lang}");
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
