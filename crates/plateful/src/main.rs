use anyhow::Result;
use clap::{Parser, Subcommand};
use plateful::commands;
use plateful::search::{SearchRequest, DEFAULT_TOP_K};

#[derive(Parser)]
#[command(name = "plateful")]
#[command(
  about = "Plateful - Semantic Recipe Search\nFind recipes in Instagram-style posts by ingredients, cooking methods, or cuisine"
)]
#[command(version)]
struct Cli {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Generate the mock fixture dataset
  MockData,
  /// Build the vector index from the fixture data
  Index,
  /// Search indexed recipes from the command line
  Search {
    /// What you would like to cook
    query: String,
    /// Number of results to return
    #[arg(short = 'k', long, default_value_t = DEFAULT_TOP_K)]
    top_k: usize,
    /// Restrict to a media type (IMAGE, CAROUSEL_ALBUM, VIDEO); "all" disables
    #[arg(short, long)]
    media_type: Option<String>,
    /// Minimum like count; zero disables
    #[arg(short = 'l', long)]
    min_likes: Option<u32>,
    /// Print results as JSON instead of formatted output
    #[arg(long)]
    json: bool,
  },
  /// Serve the search API over HTTP
  Serve {
    /// Port to listen on
    #[arg(short, long, default_value_t = 8080)]
    port: u16,
  },
}

async fn handle(command: Command) -> Result<()> {
  match command {
    Command::MockData => commands::generate_mock_data(),
    Command::Index => commands::build_index().await,
    Command::Search { query, top_k, media_type, min_likes, json } => {
      let request = SearchRequest { query, top_k, media_type, min_likes };
      commands::run_search(request, json).await
    }
    Command::Serve { port } => commands::serve(port).await,
  }
}

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
    )
    .init();

  let cli = Cli::parse();
  handle(cli.command).await
}
