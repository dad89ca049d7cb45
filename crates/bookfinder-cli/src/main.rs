mod render;

use anyhow::Context;
use bookfinder_core::{
    Config, CoverSize, Exporter, FavoritesStorage, FavoritesStore, Links, MemoryStorage,
    OpenLibraryProvider, SearchField, SearchFilters, SearchSession, SlotStorage,
};
use bookfinder_store::SlotStore;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "bookfinder")]
#[command(version, about = "Search the Open Library catalog and keep a reading list", long_about = None)]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "BOOKFINDER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Search for books
    Search {
        /// Search query
        query: String,
        /// Field to match the query against (defaults to the configured field)
        #[arg(short, long, value_enum)]
        by: Option<FieldArg>,
        /// Language code, e.g. eng, spa, fre, ger, ita
        #[arg(short, long)]
        language: Option<String>,
        /// Earliest first-publish year (inclusive)
        #[arg(long)]
        from: Option<i32>,
        /// Latest first-publish year (inclusive)
        #[arg(long)]
        to: Option<i32>,
        /// Toggle the favorite state of result number N (repeatable)
        #[arg(short, long = "favorite", value_name = "N")]
        favorite: Vec<usize>,
        /// Show the full details of result number N
        #[arg(short, long, value_name = "N")]
        details: Option<usize>,
        /// Print raw records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage the reading list
    Favorites {
        #[command(subcommand)]
        action: FavoritesCommand,
    },
    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(clap::Subcommand)]
enum FavoritesCommand {
    /// List favorited books
    List {
        #[arg(long)]
        json: bool,
    },
    /// Remove a book by its catalog key (e.g. /works/OL893415W)
    Remove { key: String },
    /// Remove every book
    Clear,
    /// Export the list; format follows the extension (.json, .csv, .md)
    Export { path: PathBuf },
}

#[derive(clap::Subcommand)]
enum ConfigCommand {
    /// Print the effective configuration
    Show,
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum FieldArg {
    Title,
    Author,
    Subject,
    Isbn,
    All,
}

impl From<FieldArg> for SearchField {
    fn from(arg: FieldArg) -> Self {
        match arg {
            FieldArg::Title => SearchField::Title,
            FieldArg::Author => SearchField::Author,
            FieldArg::Subject => SearchField::Subject,
            FieldArg::Isbn => SearchField::Isbn,
            FieldArg::All => SearchField::All,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays clean for results and JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bookfinder_cli=info,bookfinder_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;

    match cli.command {
        Some(Commands::Search {
            query,
            by,
            language,
            from,
            to,
            favorite,
            details,
            json,
        }) => {
            let field = by.map(SearchField::from).unwrap_or_else(|| config.search.field());
            let mut filters = SearchFilters::by(field).years(from, to);
            if let Some(code) = language {
                filters = filters.language(code);
            }

            run_search(&config, &query, &filters, &favorite, details, json).await?;
        }
        Some(Commands::Favorites { action }) => run_favorites(&config, action)?,
        Some(Commands::Config { action }) => run_config(&config, cli.config.as_deref(), action)?,
        None => {
            println!("No command specified. Try --help");
        }
    }

    Ok(())
}

async fn run_search(
    config: &Config,
    query: &str,
    filters: &SearchFilters,
    toggles: &[usize],
    details: Option<usize>,
    json: bool,
) -> anyhow::Result<()> {
    let provider = OpenLibraryProvider::from_config(&config.api)?;
    let session = SearchSession::new(Arc::new(provider));

    tracing::info!("Searching by {} for: {}", filters.field, query);
    let Some(page) = session.search(query, filters).await? else {
        println!("Nothing to search for.");
        return Ok(());
    };

    let mut favorites = open_favorites(config);
    let links = Links::from_config(&config.api);

    for &n in toggles {
        match n.checked_sub(1).and_then(|i| page.records.get(i)) {
            Some(book) => {
                let added = favorites.toggle(book);
                eprintln!(
                    "{} {}",
                    if added { "Added to reading list:" } else { "Removed from reading list:" },
                    book.display_title()
                );
            }
            None => warn!("No result number {} (got {})", n, page.records.len()),
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&page.records)?);
    } else {
        let state = session.snapshot().await;
        print!("{}", render::results(&state.current_query, &page, &favorites));
    }

    if let Some(n) = details {
        let book = n
            .checked_sub(1)
            .and_then(|i| page.records.get(i))
            .with_context(|| format!("No result number {}", n))?;
        println!();
        print!(
            "{}",
            render::details(book, favorites.is_favorite(book), &links, CoverSize::Large)
        );
    }

    Ok(())
}

fn run_favorites(config: &Config, action: FavoritesCommand) -> anyhow::Result<()> {
    let mut favorites = open_favorites(config);

    match action {
        FavoritesCommand::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(favorites.favorites())?);
            } else {
                print!(
                    "{}",
                    render::favorites_list(favorites.favorites(), favorites.last_saved())
                );
            }
        }
        FavoritesCommand::Remove { key } => {
            if favorites.remove_key(&key) {
                println!("Removed {}", key);
            } else {
                println!("{} is not in your reading list", key);
            }
        }
        FavoritesCommand::Clear => {
            let count = favorites.len();
            favorites.clear_all();
            println!("Cleared {} book{}", count, if count == 1 { "" } else { "s" });
        }
        FavoritesCommand::Export { path } => {
            let exporter = Exporter::new(Links::from_config(&config.api));
            let format = exporter.export_to_file(favorites.favorites(), &path)?;
            println!(
                "Exported {} books to {} ({})",
                favorites.len(),
                path.display(),
                format.extension()
            );
        }
    }

    Ok(())
}

fn run_config(
    config: &Config,
    explicit_path: Option<&std::path::Path>,
    action: ConfigCommand,
) -> anyhow::Result<()> {
    let path = match explicit_path {
        Some(path) => path.to_path_buf(),
        None => Config::config_path()?,
    };

    match action {
        ConfigCommand::Show => {
            println!("# {}", path.display());
            print!("{}", config.to_toml()?);
        }
        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
            }
            Config::default().save_to(&path)?;
            println!("Wrote default config to {}", path.display());
        }
    }

    Ok(())
}

/// Favorites backed by the configured slot store. If the store can't be
/// opened the list still works, it just won't outlive this run.
fn open_favorites(config: &Config) -> FavoritesStore {
    if !config.storage.persist_favorites {
        return FavoritesStore::open(Box::new(MemoryStorage::new()));
    }

    let storage: Box<dyn FavoritesStorage> = match config.storage.resolved_path() {
        Ok(path) => match SlotStore::open(&path) {
            Ok(slots) => Box::new(SlotStorage::new(slots)),
            Err(e) => {
                warn!("Favorites will not be saved ({}): {}", path.display(), e);
                Box::new(MemoryStorage::new())
            }
        },
        Err(e) => {
            warn!("Favorites will not be saved: {}", e);
            Box::new(MemoryStorage::new())
        }
    };

    FavoritesStore::open(storage)
}
