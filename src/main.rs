use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use gleaner::api::create_router;
use gleaner::data_models::{SearchOptions, SearchRequest};
use gleaner::{Config, SearchError, SearchService, renderer};

#[derive(Parser)]
#[command(name = "gleaner", version, about = "Search-and-summarize web front end")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the web UI and `/api/search` (default)
    Serve {
        /// Address to listen on, overrides BIND_ADDR
        #[arg(long)]
        bind: Option<String>,
        /// Directory with the UI files, overrides STATIC_DIR
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
    /// Run a single search and print the report
    Search {
        query: String,
        #[arg(long, default_value_t = 8)]
        max_results: u32,
        #[arg(long, default_value_t = 3)]
        max_pages: u32,
        #[arg(long, default_value_t = 5)]
        max_sentences: u32,
        #[arg(long)]
        no_groq: bool,
        #[arg(long)]
        verbose: bool,
        /// Print the extracted result as JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,gleaner=debug,tower_http=info".into()),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    let service = Arc::new(SearchService::new(
        config.summarizer.clone(),
        config.markers.clone(),
        config.max_concurrent_searches,
    ));

    match cli.command.unwrap_or(Command::Serve {
        bind: None,
        static_dir: None,
    }) {
        Command::Serve { bind, static_dir } => {
            let addr = bind.unwrap_or(config.bind_addr);
            let static_dir = static_dir.unwrap_or(config.static_dir);
            serve(service, &addr, static_dir).await
        }
        Command::Search {
            query,
            max_results,
            max_pages,
            max_sentences,
            no_groq,
            verbose,
            json,
        } => {
            let options = SearchOptions {
                max_results,
                max_pages,
                max_sentences,
                no_groq,
                verbose,
            };
            search_once(&service, query, options, json).await
        }
    }
}

async fn serve(service: Arc<SearchService>, addr: &str, static_dir: PathBuf) -> Result<()> {
    let app = create_router(service, &static_dir);

    tracing::info!("Starting server on {}", addr);
    tracing::info!("Serving UI from {}", static_dir.display());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

async fn search_once(
    service: &SearchService,
    query: String,
    options: SearchOptions,
    json: bool,
) -> Result<()> {
    let request = SearchRequest::new(query, options)?;
    let result = service.search(&request).await.inspect_err(|e| {
        if let SearchError::BackendFailure { stderr, .. } = e {
            eprintln!("{stderr}");
        }
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    match &result.structured {
        Some(record) => print!("{}", renderer::render_text(&renderer::render(record))),
        None => println!("No structured result was produced."),
    }
    if !result.sources.is_empty() {
        println!();
        println!("SOURCES");
        for source in &result.sources {
            println!("  {source}");
        }
    }
    Ok(())
}
