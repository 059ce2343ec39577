// src/main.rs
//
// Command line front end.
// Every invocation hydrates the ranking, runs one command, flushes.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use aniranker::application::commands::*;
use aniranker::application::dto::*;
use aniranker::domain::{
    DropSide, Entry, FormatFilter, Item, ListStatus, MediaType, SortDirection, SortKey,
};
use aniranker::events::{attach_render_sink, Notice, RenderSink};
use aniranker::{AppConfig, AppState};

/// Curate a ranked list of anime, manga or characters
#[derive(Parser)]
#[command(name = "aniranker", version)]
struct Cli {
    /// SQLite database holding the ranking
    #[arg(long, env = "ANIRANKER_DB", global = true)]
    db: Option<PathBuf>,

    /// AniList GraphQL endpoint
    #[arg(long, env = "ANIRANKER_API_URL", global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the ranked list
    List,
    /// Search the catalog
    Search {
        query: String,
        #[arg(long = "type", default_value = "anime")]
        media_type: MediaType,
    },
    /// Import one status of a user's AniList list
    Import {
        username: String,
        #[arg(long, default_value = "completed")]
        status: ListStatus,
        #[arg(long = "type", default_value = "anime")]
        media_type: MediaType,
        #[arg(long, default_value = "title")]
        sort: SortKey,
        #[arg(long, default_value = "asc")]
        order: SortDirection,
        #[arg(long, default_value = "all")]
        format: FormatFilter,
        #[arg(long, default_value_t = 0)]
        min_score: u32,
    },
    /// Fetch an item by AniList id and append it
    Add {
        id: i64,
        #[arg(long = "type", default_value = "anime")]
        media_type: MediaType,
    },
    /// Remove an item
    Remove { id: String },
    /// Move an item one rank up
    Up { id: String },
    /// Move an item one rank down
    Down { id: String },
    /// Move an item next to another one
    Move {
        id: String,
        target: String,
        /// Place after the target instead of before
        #[arg(long)]
        after: bool,
    },
    /// Remove every item
    Clear {
        /// Confirm clearing the whole list
        #[arg(long)]
        yes: bool,
    },
    /// Write the list as numbered text
    Export {
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Print the 5-column grid preview
    Grid,
}

/// Listings are printed by the commands themselves. Duplicate, provider
/// and save notices come back as command errors, so only a failed load is
/// printed here.
struct ConsoleSink;

impl RenderSink for ConsoleSink {
    fn ranking_changed(&self, _items: &[Item]) {}

    fn candidates_changed(&self, _entries: &[Entry], _fetched: usize) {}

    fn notice(&self, notice: Notice) {
        if let Notice::LoadFailed(_) = notice {
            eprintln!("{}", notice);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::default();
    if let Some(db) = cli.db {
        config = config.with_database_path(db);
    }
    if let Some(url) = cli.api_url {
        config = config.with_api_url(url);
    }

    let state = AppState::bootstrap(config).context("failed to start")?;
    attach_render_sink(&state.event_bus, Arc::new(ConsoleSink));
    state.hydrate();

    let outcome = run(&state, cli.command).await;
    state.shutdown().context("failed to save the ranking")?;
    outcome
}

async fn run(state: &AppState, command: Command) -> anyhow::Result<()> {
    match command {
        Command::List => print_ranking(state),
        Command::Search { query, media_type } => {
            let list = search_catalog(state, SearchRequestDto { query, media_type }).await?;
            print_candidates(&list);
        }
        Command::Import {
            username,
            status,
            media_type,
            sort,
            order,
            format,
            min_score,
        } => {
            set_query_config(
                state,
                QueryConfigDto {
                    sort_key: sort,
                    sort_direction: order,
                    format_filter: format,
                    min_score,
                },
            );
            let list = import_user_list(
                state,
                ImportRequestDto {
                    username,
                    status,
                    media_type,
                },
            )
            .await?;
            print_candidates(&list);
        }
        Command::Add { id, media_type } => {
            let rank = add_item(state, AddItemDto { id, media_type }).await?;
            println!("Added at #{}", rank);
        }
        Command::Remove { id } => {
            if !remove_item(state, &id)? {
                println!("{} is not in your list", id);
            }
            print_ranking(state);
        }
        Command::Up { id } => {
            move_item(state, &id, -1)?;
            print_ranking(state);
        }
        Command::Down { id } => {
            move_item(state, &id, 1)?;
            print_ranking(state);
        }
        Command::Move { id, target, after } => {
            let side = if after { DropSide::After } else { DropSide::Before };
            drag_item(
                state,
                MoveItemDto {
                    id,
                    target_id: target,
                    side,
                },
            )?;
            print_ranking(state);
        }
        Command::Clear { yes } => {
            if clear_ranking(state, yes)? {
                println!("List cleared");
            }
        }
        Command::Export { output } => {
            let export = export_ranking(state)?;
            let path = output.unwrap_or_else(|| PathBuf::from(&export.file_name));
            std::fs::write(&path, export.content)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Exported to {}", path.display());
        }
        Command::Grid => print_grid(state),
    }
    Ok(())
}

fn print_ranking(state: &AppState) {
    let rows = list_ranking(state);
    if rows.is_empty() {
        println!("Your list is empty");
        return;
    }
    for row in rows {
        let details: Vec<String> = row
            .format
            .into_iter()
            .chain(row.year.map(|y| y.to_string()))
            .collect();
        if details.is_empty() {
            println!("{:>3}. {} [{}]", row.rank, row.title, row.id);
        } else {
            println!("{:>3}. {} ({}) [{}]", row.rank, row.title, details.join(", "), row.id);
        }
    }
}

fn print_candidates(list: &CandidateListDto) {
    if list.stale {
        return;
    }
    if list.filtered_out() {
        println!("No results match your filters");
        return;
    }
    if list.candidates.is_empty() {
        println!("No results found");
        return;
    }
    for candidate in &list.candidates {
        let score = candidate
            .score
            .map(|s| format!(" score {}", s))
            .unwrap_or_default();
        let format = candidate.format.as_deref().unwrap_or("-");
        println!("[{}] {} ({}){}", candidate.id, candidate.title, format, score);
    }
}

fn print_grid(state: &AppState) {
    let grid = ranking_grid(state);
    if grid.is_empty() {
        println!("Your list is empty");
        return;
    }
    for row in grid.tiles.chunks(grid.columns) {
        let cells: Vec<String> = row
            .iter()
            .map(|tile| format!("{} {}", tile.label, tile.title))
            .collect();
        println!("{}", cells.join(" | "));
    }
    if grid.empty_slots > 0 {
        println!("({} empty slots)", grid.empty_slots);
    }
}
