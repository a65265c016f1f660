use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookshelf_client::client::ApiClient;
use bookshelf_client::config::Config;
use bookshelf_client::models::book_model::{Book, BookUpdate, CoverImage, NewBook};
use bookshelf_client::models::patch::Patch;
use bookshelf_client::services::book_service::BookService;
use bookshelf_client::services::library_service::LibrarySession;
use bookshelf_client::utils::image::resolve_cover_url;

#[derive(Parser)]
#[command(name = "bookshelf", about = "Personal book catalog client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List books, optionally filtered by name
    List {
        #[arg(long)]
        search: Option<String>,
    },
    /// Add a book to the catalog
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        genre: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        pages: Option<u32>,
        #[arg(long)]
        year: Option<i32>,
        /// Path to a cover image file
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Update fields of an existing book
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, conflicts_with = "clear_author")]
        author: Option<String>,
        #[arg(long)]
        clear_author: bool,
        #[arg(long, conflicts_with = "clear_genre")]
        genre: Option<String>,
        #[arg(long)]
        clear_genre: bool,
        #[arg(long, conflicts_with = "clear_status")]
        status: Option<String>,
        #[arg(long)]
        clear_status: bool,
    },
    /// Delete a book by id
    Delete { id: i64 },
    /// List known genres
    Genres,
    /// List the reading statuses the server supports
    Statuses,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true),
        )
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("failed to load configuration")?;
    let client = ApiClient::new(&config).context("failed to build API client")?;
    let service = BookService::new(client);

    match cli.command {
        Command::List { search } => {
            let session = LibrarySession::new(service, config.search_debounce());
            session.start().await;
            if let Some(query) = search {
                session.set_search_query(query).await;
                session.flush_search().await;
            }

            let state = session.state().await;
            if let Some(error) = state.error {
                anyhow::bail!(error);
            }
            if state.books.is_empty() {
                println!("No books found.");
            }
            for book in &state.books {
                print_book(book, &config);
            }
        }
        Command::Add {
            name,
            author,
            genre,
            status,
            pages,
            year,
            image,
        } => {
            let image = match image {
                Some(path) => Some(read_cover(&path)?),
                None => None,
            };
            let book = NewBook {
                name,
                author,
                genre,
                status,
                pages,
                year,
                image,
            };

            let session = LibrarySession::new(service, config.search_debounce());
            let created = session.add_book(book).await?;
            println!("Added book {}:", created.id);
            print_book(&created, &config);
        }
        Command::Update {
            id,
            name,
            author,
            clear_author,
            genre,
            clear_genre,
            status,
            clear_status,
        } => {
            let update = BookUpdate {
                name: name.map(Patch::Value).unwrap_or_default(),
                author: patch_arg(author, clear_author),
                genre: patch_arg(genre, clear_genre),
                status: patch_arg(status, clear_status),
            };
            if update.is_empty() {
                anyhow::bail!("nothing to update");
            }

            let session = LibrarySession::new(service, config.search_debounce());
            let updated = session.update_book(id, update).await?;
            println!("Updated book {}:", updated.id);
            print_book(&updated, &config);
        }
        Command::Delete { id } => {
            let session = LibrarySession::new(service, config.search_debounce());
            session.delete_book(id).await?;
            println!("Deleted book {id}.");
        }
        Command::Genres => {
            for genre in service.list_genres().await? {
                println!("{genre}");
            }
        }
        Command::Statuses => {
            for status in service.list_statuses().await? {
                println!("{}\t{}", status.value, status.label);
            }
        }
    }

    Ok(())
}

fn patch_arg(value: Option<String>, clear: bool) -> Patch<String> {
    if clear {
        Patch::Null
    } else {
        value.map(Patch::Value).unwrap_or_default()
    }
}

fn read_cover(path: &PathBuf) -> Result<CoverImage> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read cover image {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "cover".to_string());
    Ok(CoverImage { file_name, bytes })
}

fn print_book(book: &Book, config: &Config) {
    let mut line = format!("#{} {}", book.id, book.name);
    if let Some(author) = &book.author {
        line.push_str(&format!(" by {author}"));
    }
    if let Some(genre) = &book.genre {
        line.push_str(&format!(" [{genre}]"));
    }
    if let Some(status) = &book.status {
        line.push_str(&format!(" ({status})"));
    }
    if let Some(pages) = book.pages {
        line.push_str(&format!(", {pages} pages"));
    }
    if let Some(year) = book.year {
        line.push_str(&format!(", {year}"));
    }
    println!("{line}");
    if let Some(image_url) = &book.image_url {
        println!("    cover: {}", resolve_cover_url(&config.server_origin, image_url));
    }
}
