//! searchlink CLI - signed searches and index command publishing.
//!
//! # Commands
//!
//! - `searchlink search [query]` - Run a signed search and print the raw response
//! - `searchlink publish <file.json>` - Publish an index command, offloading large payloads
//!
//! Settings are read from the environment or a `.env` file in the working
//! directory. Logging is controlled with `RUST_LOG` and goes to stderr.

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use searchlink_messaging::Site;
use std::num::NonZeroU32;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;

use commands::{publish, search};
use error::CliResult;

/// searchlink - signed search and queue publishing for the indexing pipeline
#[derive(Parser)]
#[command(name = "searchlink")]
#[command(version)]
#[command(about = "Signed searches against the search cluster and index command publishing")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging when RUST_LOG is unset
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log warnings and errors when RUST_LOG is unset
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a signed search and print the raw response
    #[command(alias = "s")]
    Search(SearchArgs),

    /// Publish an index command read from a JSON file
    #[command(alias = "p")]
    Publish(PublishArgs),
}

#[derive(Args)]
struct SearchArgs {
    /// Query text; empty matches every document of the site
    #[arg(default_value = "")]
    query: String,

    /// Site to search within
    #[arg(long, default_value = "datahub")]
    site: Site,

    /// Result offset
    #[arg(long, default_value = "0")]
    from: u32,

    /// Page size
    #[arg(long, default_value = "10")]
    size: NonZeroU32,

    /// Index to search instead of ELASTICSEARCH_INDEX
    #[arg(long)]
    index: Option<String>,

    /// Print the query document without sending it
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args)]
struct PublishArgs {
    /// JSON file holding the index command
    file: PathBuf,

    /// File to attach as base64 content (a PDF, for instance)
    #[arg(long, requires = "mime")]
    attach: Option<PathBuf>,

    /// MIME type of the attached file
    #[arg(long, requires = "attach")]
    mime: Option<String>,

    /// Offload threshold in bytes, overriding SQS_PAYLOAD_THRESHOLD
    #[arg(long)]
    threshold: Option<usize>,

    /// Queue message size limit in bytes, overriding SQS_MAX_MESSAGE_SIZE
    #[arg(long)]
    queue_limit: Option<usize>,

    /// Publish to in-memory backends instead of SQS and S3
    #[arg(long)]
    dry_run: bool,
}

fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn dispatch(command: Commands) -> CliResult<()> {
    match command {
        Commands::Search(args) => {
            search::run(search::SearchOptions {
                query: args.query,
                site: args.site,
                from: args.from,
                size: args.size,
                index: args.index,
                dry_run: args.dry_run,
            })
            .await
        }
        Commands::Publish(args) => {
            publish::run(publish::PublishOptions {
                file: args.file,
                attach: args.attach,
                mime: args.mime,
                threshold: args.threshold,
                queue_limit: args.queue_limit,
                dry_run: args.dry_run,
            })
            .await
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    if let Err(e) = dispatch(cli.command).await {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
