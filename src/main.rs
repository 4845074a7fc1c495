//! Chronicle - Entry Point

use chronicle::app::{self, AddOutcome};
use chronicle::config::ResolvedConfig;
use chronicle::era::{ClassifyError, EraClassifier, EraExtractor};
use chronicle::import::ExportFormat;
use chronicle::library::LibraryStore;
use chronicle::model::{Book, BookId, ZoomLevel};
use chronicle::service::{AnthropicClassifier, OpenLibraryClient};
use chronicle::timeline::{row_count, RowStacker};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};

/// Chronicle - your reading history on a timeline
#[derive(Parser, Debug)]
#[command(name = "chronicle")]
#[command(version)]
#[command(about = "Place the non-fiction books you have read on a historical timeline")]
pub struct Args {
    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the library file
    #[arg(long, global = true)]
    pub library: Option<PathBuf>,

    /// Initial zoom level (century or decade)
    #[arg(long, global = true)]
    pub zoom: Option<ZoomLevel>,

    /// What to do (defaults to the timeline viewer)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open the timeline viewer
    Timeline,

    /// List the books in the library
    List {
        /// Only books without a historical era
        #[arg(long)]
        needs_era: bool,
    },

    /// Print the stacked card rows at the configured zoom
    Layout,

    /// Look a book up by ISBN or title and add it
    Add {
        /// ISBN (10 or 13 digits, dashes allowed) or title
        query: String,
    },

    /// Import a Goodreads or StoryGraph CSV export
    Import {
        /// Export file
        file: PathBuf,

        /// Export schema
        #[arg(long, value_enum)]
        format: ExportFormat,
    },

    /// Remove a book
    Remove {
        /// Book id
        id: String,
    },

    /// Set a book's era by hand
    SetEra {
        /// Book id
        id: String,

        /// First year (negative for BCE)
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        start: String,

        /// Last year (negative for BCE)
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        end: String,

        /// Period name
        #[arg(long, default_value = "")]
        label: String,
    },

    /// Classify books that still have no historical era
    Classify,

    /// Print the classification prompt for books without an era
    Prompt,
}

/// Stands in for the classification backend when it cannot be configured.
///
/// Every request fails, so books are stored without an era and can be
/// classified later.
struct Unavailable(String);

impl EraClassifier for Unavailable {
    fn classify(&self, _prompt: &str) -> Result<String, ClassifyError> {
        Err(ClassifyError::MissingApiKey(self.0.clone()))
    }
}

fn build_extractor(config: &ResolvedConfig) -> EraExtractor<Box<dyn EraClassifier>> {
    let classifier: Box<dyn EraClassifier> = match AnthropicClassifier::from_config(&config.classifier)
    {
        Ok(client) => Box::new(client),
        Err(e) => {
            warn!(error = %e, "Classification unavailable; books will be stored without an era");
            eprintln!("warning: {e}; books will be stored without an era");
            Box::new(Unavailable(config.classifier.api_key_env.clone()))
        }
    };
    EraExtractor::new(classifier).with_batch_size(config.classifier.batch_size)
}

fn parse_id(raw: &str) -> Result<BookId, Box<dyn std::error::Error>> {
    Ok(BookId::new(raw.trim())?)
}

fn print_book(book: &Book) {
    println!("{}  {} by {}  [{}]", book.id, book.title, book.author, book.era_text());
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load configuration with full precedence chain:
    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = chronicle::config::load_config_with_precedence(args.config.clone())?;
        let merged = chronicle::config::merge_config(config_file)?;
        let with_env = chronicle::config::apply_env_overrides(merged);
        chronicle::config::apply_cli_overrides(with_env, args.library.clone(), args.zoom)
    };

    chronicle::logging::init(&config.log_file_path)?;

    info!(
        config = ?config,
        "Configuration loaded and resolved"
    );

    let mut store = LibraryStore::open(&config.library_path)?;

    match args.command.unwrap_or(Command::Timeline) {
        Command::Timeline => {
            chronicle::view::run_timeline(store.books().to_vec(), &config)?;
        }
        Command::List { needs_era } => {
            let books: Vec<&Book> = if needs_era {
                store.needs_era().collect()
            } else {
                store.books().iter().collect()
            };
            for book in books {
                print_book(book);
            }
        }
        Command::Layout => {
            let stacker = RowStacker {
                bounds: config.bounds,
                min_card_width: config.min_card_width,
                card_gap: config.card_gap,
            };
            let cards = stacker.stack(store.books(), config.zoom.pixels_per_year());
            println!("{} cards in {} rows at {} zoom", cards.len(), row_count(&cards), config.zoom);
            for card in &cards {
                println!(
                    "row {:>3}  x {:>9.1}  w {:>7.1}  {} [{}]",
                    card.row,
                    card.x,
                    card.width,
                    card.book.title,
                    card.book.era_text()
                );
            }
        }
        Command::Add { query } => {
            let lookup = OpenLibraryClient::new(&config.lookup);
            let extractor = build_extractor(&config);
            match app::add_from_lookup(&mut store, &lookup, &extractor, &query)? {
                AddOutcome::Added(book) => {
                    print!("Added: ");
                    print_book(&book);
                }
                AddOutcome::Duplicate(book) => {
                    println!("Already in library: {} by {}", book.title, book.author);
                }
                AddOutcome::NotFound => println!("No match for '{query}'"),
            }
        }
        Command::Import { file, format } => {
            let extractor = build_extractor(&config);
            let summary = app::import_file(&mut store, &extractor, &file, format)?;
            if summary.parsed == 0 {
                println!("No read books found in {}", file.display());
            } else {
                println!(
                    "Imported {} of {} books ({} with a historical era)",
                    summary.added, summary.parsed, summary.historical
                );
            }
        }
        Command::Remove { id } => {
            let removed = store.remove(&parse_id(&id)?)?;
            println!("Removed {} by {}", removed.title, removed.author);
        }
        Command::SetEra {
            id,
            start,
            end,
            label,
        } => {
            let book = app::set_era(&mut store, &parse_id(&id)?, &start, &end, &label)?;
            print_book(book);
        }
        Command::Classify => {
            let classifier = AnthropicClassifier::from_config(&config.classifier)?;
            let extractor =
                EraExtractor::new(classifier).with_batch_size(config.classifier.batch_size);
            let summary = app::classify_pending(&mut store, &extractor)?;
            println!(
                "Classified {} books ({} with a historical era)",
                summary.attempted, summary.historical
            );
        }
        Command::Prompt => {
            println!(
                "{}",
                app::pending_prompt(&store, config.classifier.batch_size)
            );
        }
    }

    Ok(())
}
