//! deckforge - Main Binary
//!
//! Convert deck lists between formats and look up cards from the terminal

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use deckforge_rs::{
    directory::{DirectoryConfig, FileSource, HttpSource},
    CardDirectory, Converter, Dataset, DeckFormat, Scope,
};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "deckforge")]
#[command(about = "deckforge - Yu-Gi-Oh! deck list converter", long_about = None)]
struct Cli {
    #[command(flatten)]
    databases: DatabaseArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Where card data comes from
#[derive(Args)]
struct DatabaseArgs {
    /// Local Ignis cards.cdb (skips downloading; requires --cdb-omega)
    #[arg(long, global = true, value_name = "PATH", requires = "cdb_omega")]
    cdb_ignis: Option<PathBuf>,

    /// Local OmegaDB.cdb (skips downloading; requires --cdb-ignis)
    #[arg(long, global = true, value_name = "PATH", requires = "cdb_ignis")]
    cdb_omega: Option<PathBuf>,

    /// Directory for downloaded card databases
    #[arg(long, global = true, value_name = "DIR")]
    cache_dir: Option<PathBuf>,

    /// Download URL for the Ignis cards.cdb
    #[arg(long, global = true, value_name = "URL")]
    ignis_url: Option<String>,

    /// Download URL for OmegaDB.cdb
    #[arg(long, global = true, value_name = "URL")]
    omega_url: Option<String>,

    /// Seconds allowed for each database download
    #[arg(long, global = true, value_name = "SECS")]
    download_timeout: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a deck from one format to another
    Convert {
        /// Input format (ydk, ydke, omega, namelist, konami, json, ygoprodeck)
        #[arg(long)]
        from: DeckFormat,

        /// Output format (ydk, ydke, omega, namelist, json)
        #[arg(long)]
        to: DeckFormat,

        /// Read the deck from this file (default: stdin)
        #[arg(long, value_name = "FILE", conflicts_with = "url")]
        input: Option<PathBuf>,

        /// Deck page URL, for konami and ygoprodeck input
        #[arg(long)]
        url: Option<String>,

        /// Deck name for the output file
        #[arg(long)]
        name: Option<String>,

        /// Output path (default: `<deck name>.ydk`/`.json` for file formats,
        /// stdout for the rest)
        #[arg(long, short = 'o', value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Look up a card by id or name
    Lookup {
        /// Card id
        #[arg(long, conflicts_with = "name", required_unless_present = "name")]
        id: Option<u32>,

        /// Card name (exact, then accent/case-insensitive)
        #[arg(long)]
        name: Option<String>,

        /// Restrict the lookup to one dataset (ignis or omega)
        #[arg(long)]
        dataset: Option<Dataset>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            from,
            to,
            input,
            url,
            name,
            output,
        } => run_convert(&cli.databases, from, to, input, url, name, output).await?,
        Commands::Lookup { id, name, dataset } => {
            run_lookup(&cli.databases, id, name, dataset).await?
        }
    }

    Ok(())
}

/// Build the card directory and load it once; the CLI is short-lived so
/// no periodic refresh is started
async fn open_directory(args: &DatabaseArgs) -> anyhow::Result<Arc<CardDirectory>> {
    let mut config = DirectoryConfig::default().with_refresh_interval(Duration::ZERO);
    if let Some(dir) = &args.cache_dir {
        config = config.with_cache_dir(dir);
    }
    if let Some(url) = &args.ignis_url {
        config.ignis_url = url.clone();
    }
    if let Some(url) = &args.omega_url {
        config.omega_url = url.clone();
    }
    if let Some(secs) = args.download_timeout {
        config = config.with_download_timeout(Duration::from_secs(secs));
    }

    let directory = match (&args.cdb_ignis, &args.cdb_omega) {
        (Some(ignis), Some(omega)) => CardDirectory::new(FileSource::new(ignis, omega), config),
        _ => CardDirectory::new(HttpSource::new(&config), config),
    };
    let stats = directory
        .refresh_now()
        .await
        .context("loading card databases")?;
    tracing::info!(
        ignis = stats.ignis_cards,
        omega = stats.omega_cards,
        "card databases ready"
    );
    Ok(directory)
}

async fn run_convert(
    databases: &DatabaseArgs,
    from: DeckFormat,
    to: DeckFormat,
    input: Option<PathBuf>,
    url: Option<String>,
    name: Option<String>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    if !to.can_encode() {
        bail!("{to} is an input-only format");
    }

    let text = match (from.is_remote(), url, input) {
        (true, Some(url), _) => url,
        (true, None, _) => bail!("--url is required for {from} input"),
        (false, Some(_), _) => bail!("--url only applies to konami and ygoprodeck input"),
        (false, None, Some(path)) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("reading {}", path.display()))?,
        (false, None, None) => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading deck from stdin")?;
            buf
        }
    };

    let directory = open_directory(databases).await?;
    let converter = Converter::new(&directory);
    let conversion = converter.convert(from, to, &text, name.as_deref()).await?;

    let target = output.or_else(|| conversion.file_name.as_ref().map(PathBuf::from));
    match target {
        Some(path) => {
            tokio::fs::write(&path, conversion.output.as_bytes())
                .await
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => println!("{}", conversion.output),
    }
    Ok(())
}

async fn run_lookup(
    databases: &DatabaseArgs,
    id: Option<u32>,
    name: Option<String>,
    dataset: Option<Dataset>,
) -> anyhow::Result<()> {
    let scope = dataset.map(Scope::Only).unwrap_or_default();
    let directory = open_directory(databases).await?;
    let snapshot = directory.snapshot();

    let record = match (id, name) {
        (Some(id), _) => snapshot.record_for_id(id, scope)?,
        (None, Some(name)) => snapshot.record_for_name(&name, scope)?,
        (None, None) => bail!("either --id or --name is required"),
    };

    println!("{} {}", record.id, record.name);
    println!("  types: {}", record.type_flags());
    println!("  ATK/DEF: {}/{}  level: {}", record.atk, record.def, record.level);
    if !record.desc.is_empty() {
        println!("  {}", record.desc.replace('\n', "\n  "));
    }
    Ok(())
}
