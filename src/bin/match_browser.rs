//! match-browser: terminal client for the upcoming-matches API.
//!
//! Loads pages through a [`MatchFeed`] until the feed is exhausted (or a
//! page cap is hit), then prints the matches that pass the search and
//! competition filters, followed by the competitions seen.

use std::sync::Arc;

use anyhow::bail;
use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use upcoming_matches::client::backend::DEFAULT_API_URL;
use upcoming_matches::client::{BackendClient, MatchFeed, PageSource, Trigger};
use upcoming_matches::domain::{LoadState, LoaderSnapshot, Match, MatchFilter};

/// Browse upcoming soccer matches.
#[derive(Debug, Parser)]
#[command(name = "match-browser", version, about)]
struct Args {
    /// Backend base URL.
    #[arg(long, env = "MATCHES_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Case-insensitive text to look for in titles and competitions.
    #[arg(short, long, default_value = "")]
    search: String,

    /// Exact competition name to show.
    #[arg(short, long)]
    competition: Option<String>,

    /// Stop after this many pages.
    #[arg(long)]
    max_pages: Option<u32>,

    /// Retry a failed page this many times before giving up.
    #[arg(long, default_value_t = 0)]
    retries: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let source: Arc<dyn PageSource> = Arc::new(BackendClient::new(args.api_url.clone()));
    let feed = MatchFeed::start(source).await;

    let mut retries_left = args.retries;
    let snapshot = loop {
        let snapshot = feed.drain(args.max_pages).await;
        if snapshot.state() != LoadState::Failed || retries_left == 0 {
            break snapshot;
        }
        retries_left -= 1;
        tracing::info!(page = %snapshot.cursor().next_page, retries_left, "retrying failed page");
        if feed.retry().await == Trigger::Ignored {
            break feed.snapshot();
        }
    };

    let filter = MatchFilter::new(args.search, args.competition);
    print_matches(&snapshot, &filter);

    if snapshot.state() == LoadState::Failed {
        let reason = snapshot.last_error().unwrap_or("unknown error");
        bail!(
            "stopped loading at page {}: {reason}",
            snapshot.cursor().next_page
        );
    }
    Ok(())
}

fn print_matches(snapshot: &LoaderSnapshot, filter: &MatchFilter) {
    let shown = snapshot.filtered(filter);
    if shown.is_empty() {
        println!("No matches found for your search/filter.");
    }
    for (position, m) in shown.iter().enumerate() {
        print_card(position, m);
    }

    let competitions = snapshot.competitions();
    if !competitions.is_empty() {
        println!("Competitions:");
        for competition in competitions {
            println!("  {competition}");
        }
    }
    println!(
        "{} of {} loaded matches shown ({} pages, {})",
        shown.len(),
        snapshot.matches().len(),
        snapshot.pages_loaded(),
        describe(snapshot.state()),
    );
}

fn print_card(position: usize, m: &Match) {
    println!("[{}] {}", m.key(position), m.title.as_deref().unwrap_or("untitled"));
    if let Some(competition) = &m.competition {
        println!("    {competition}");
    }
    if let Some(kickoff) = m.kickoff() {
        println!("    {}", kickoff.with_timezone(&Local).format("%a %d %b %Y %H:%M"));
    }
    if let Some(url) = &m.matchview_url {
        println!("    match:       {url}");
    }
    if let Some(url) = &m.competition_url {
        println!("    competition: {url}");
    }
    if let Some(src) = m.highlight().and_then(|video| video.embed_src()) {
        println!("    highlights:  {src}");
    }
}

fn describe(state: LoadState) -> &'static str {
    match state {
        LoadState::Idle => "more available",
        LoadState::Loading => "loading",
        LoadState::Exhausted => "all loaded",
        LoadState::Failed => "stopped on error",
    }
}
