//! Search command - run a signed search and print the raw response.

use colored::Colorize;
use searchlink_config::SearchSettings;
use searchlink_messaging::Site;
use searchlink_search::{SearchClient, SearchError, SearchQuery};
use std::io::{self, Write};
use std::num::NonZeroU32;
use tracing::debug;

use crate::error::CliResult;

/// Options for the search command.
pub struct SearchOptions {
    pub query: String,
    pub site: Site,
    pub from: u32,
    pub size: NonZeroU32,
    pub index: Option<String>,
    pub dry_run: bool,
}

/// Run a search.
pub async fn run(options: SearchOptions) -> CliResult<()> {
    let query = SearchQuery::build(
        options.from,
        options.size,
        options.site.as_str(),
        options.query.as_str(),
    );

    if options.dry_run {
        let json = query.to_json().map_err(SearchError::from)?;
        let pretty = serde_json::to_string_pretty(&json).map_err(SearchError::from)?;
        println!("{}", pretty);
        return Ok(());
    }

    let settings = SearchSettings::load()?;
    let index = options.index.as_deref().unwrap_or(settings.index());
    let client = SearchClient::new(settings.endpoint().clone(), settings.credential().clone())?;

    debug!(index, site = %options.site, "Running search");
    eprintln!("{} {}", "→".dimmed(), client.search_url(index)?);

    let body = client.search(index, &query).await?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(&body)?;
    writeln!(stdout)?;

    Ok(())
}
