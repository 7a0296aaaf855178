//! sheetspell CLI - spell-check text through Google Sheets

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sheetspell_core::Row;
use sheetspell_server::{App, AppConfig};

#[derive(Parser)]
#[command(name = "sheetspell")]
#[command(
    author,
    version,
    about = "Spell-check text with the Google Sheets spell checker"
)]
struct Cli {
    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Address to bind (default: server.host from config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (default: server.port from config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Spell-check words or a file once and print the result as JSON
    Check {
        /// Words or phrases to check, one row each
        words: Vec<String>,

        /// Input file (csv, xlsx or one row per line)
        #[arg(short, long, conflicts_with = "words")]
        file: Option<PathBuf>,
    },

    /// Kill every Chrome process on this host
    Kill,
}

fn init_tracing(quiet: bool, verbose: bool) -> Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("SHEETSPELL_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    match cli.command {
        Commands::Serve { host, port } => serve(host, port).await,
        Commands::Check { words, file } => check(words, file).await,
        Commands::Kill => kill().await,
    }
}

async fn serve(host: Option<String>, port: Option<u16>) -> Result<()> {
    let mut config = AppConfig::load_with_dotenv().context("Failed to load configuration")?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let address = config.server.address();
    let app = Arc::new(App::from_config(config));
    sheetspell_server::serve(app, &address)
        .await
        .with_context(|| format!("Server on {address} stopped"))
}

async fn check(words: Vec<String>, file: Option<PathBuf>) -> Result<()> {
    let rows = match file {
        Some(path) => sheetspell_intake::read_rows(&path)
            .with_context(|| format!("Failed to read '{}'", path.display()))?,
        None if words.is_empty() => anyhow::bail!("Nothing to check: pass words or --file"),
        None => words
            .iter()
            .enumerate()
            .map(|(idx, word)| Row::new(idx.to_string(), word))
            .collect(),
    };

    let config = AppConfig::load_with_dotenv().context("Failed to load configuration")?;
    let app = App::from_config(config);
    let response = app
        .spell_check(rows)
        .await
        .context("Spell-check failed")?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

async fn kill() -> Result<()> {
    let killed = sheetspell_chrome::kill_host_chrome()
        .await
        .context("Failed to kill Chrome")?;
    if killed {
        eprintln!("All instances of chrome killed!");
    } else {
        eprintln!("No instances of chrome to kill");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_check_words_or_file() {
        let cli = Cli::try_parse_from(["sheetspell", "check", "helo", "wrld"]).unwrap();
        assert!(matches!(cli.command, Commands::Check { ref words, file: None } if words.len() == 2));

        let cli = Cli::try_parse_from(["sheetspell", "-v", "check", "--file", "in.csv"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Check { file: Some(_), .. }));

        assert!(Cli::try_parse_from(["sheetspell", "check", "helo", "--file", "in.csv"]).is_err());
    }

    #[test]
    fn test_serve_overrides() {
        let cli = Cli::try_parse_from(["sheetspell", "serve", "--port", "9000"]).unwrap();
        assert!(matches!(cli.command, Commands::Serve { host: None, port: Some(9000) }));
    }
}
