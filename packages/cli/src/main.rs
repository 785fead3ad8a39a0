#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the live earthquake feed viewer.
//!
//! Every command goes through [`FeedPipeline::load_records`]; an empty
//! result is shown as "no data", with the pipeline's diagnostic when the
//! feed could not be reached.

mod table;

use std::time::Duration;

use clap::{Parser, Subcommand};
use quake_map_feed::FeedPipeline;
use quake_map_feed::registry::{self, FEED_ENV_VAR};
use quake_map_feed::summary::{FeedSummary, RecordFilter};
use quake_map_feed_models::Column;
use quake_map_place::parse_place;

#[derive(Parser)]
#[command(name = "quake_map", about = "Live earthquake feed viewer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a feed and print its records
    Load {
        /// Feed id (defaults to `QUAKE_MAP_FEED`, then `all_day`)
        #[arg(long)]
        feed: Option<String>,
        /// Only show events with at least this magnitude
        #[arg(long)]
        min_magnitude: Option<f64>,
        /// Only show events in this country (case-insensitive)
        #[arg(long)]
        country: Option<String>,
        /// Print records as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print key figures for a feed
    Summary {
        /// Feed id (defaults to `QUAKE_MAP_FEED`, then `all_day`)
        #[arg(long)]
        feed: Option<String>,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Reload a feed on an interval, serving from cache until it expires
    Watch {
        /// Feed id (defaults to `QUAKE_MAP_FEED`, then `all_day`)
        #[arg(long)]
        feed: Option<String>,
        /// Seconds between reloads
        #[arg(long, default_value = "15")]
        interval: u64,
        /// Stop after this many reloads
        #[arg(long)]
        iterations: Option<u64>,
        /// Clear the cache before every reload
        #[arg(long)]
        force: bool,
    },
    /// List configured feeds
    Feeds,
    /// Split a place string into region and country
    Place {
        /// Place text, e.g. "18km SE of Anchorage, Alaska"
        text: String,
    },
    /// Describe the record table columns
    Columns,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Load {
            feed,
            min_magnitude,
            country,
            json,
        } => {
            let pipeline = pipeline_for(feed.as_deref())?;
            let records = pipeline.load_records().await;
            if records.is_empty() {
                report_no_data(&pipeline).await;
                return Ok(());
            }

            let filter = RecordFilter {
                min_magnitude,
                country,
            };
            let selected = filter.apply(&records);
            log::debug!("{} of {} records pass the filter", selected.len(), records.len());

            if json {
                println!("{}", serde_json::to_string_pretty(&selected)?);
            } else {
                let columns = Column::for_mode(pipeline.feed().place);
                print!("{}", table::render(&selected, columns));
            }
        }
        Commands::Summary { feed, json } => {
            let pipeline = pipeline_for(feed.as_deref())?;
            let records = pipeline.load_records().await;
            if records.is_empty() {
                report_no_data(&pipeline).await;
                return Ok(());
            }

            let summary = FeedSummary::from_records(&records);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_summary(&pipeline, &summary).await;
            }
        }
        Commands::Watch {
            feed,
            interval,
            iterations,
            force,
        } => {
            let pipeline = pipeline_for(feed.as_deref())?;
            let mut ticker = tokio::time::interval(Duration::from_secs(interval.max(1)));
            let mut count = 0_u64;

            loop {
                ticker.tick().await;
                if force {
                    pipeline.clear_cache().await;
                }

                let records = pipeline.load_records().await;
                if records.is_empty() {
                    report_no_data(&pipeline).await;
                } else {
                    print_summary(&pipeline, &FeedSummary::from_records(&records)).await;
                }

                count += 1;
                if iterations.is_some_and(|max| count >= max) {
                    break;
                }
                println!();
            }
        }
        Commands::Feeds => {
            println!("Configured feeds (select with --feed or {FEED_ENV_VAR}):");
            for feed in registry::all_feeds() {
                println!(
                    "  {:<18} {}{}  [coordinates={}, place={}, ttl={}s]",
                    feed.id,
                    feed.name,
                    if feed.enabled { "" } else { " (disabled)" },
                    feed.coordinates,
                    feed.place,
                    feed.ttl_secs,
                );
            }
        }
        Commands::Place { text } => {
            let parsed = parse_place(Some(&text));
            println!("region:  {}", parsed.region);
            println!("country: {}", parsed.country);
        }
        Commands::Columns => {
            for column in Column::PARSED.iter().chain(std::iter::once(&Column::Place)) {
                println!("  {:<10} {}", column.as_ref(), column.description());
            }
        }
    }

    Ok(())
}

fn pipeline_for(feed: Option<&str>) -> Result<FeedPipeline, quake_map_feed::FeedError> {
    let feed = registry::resolve_feed(feed)?;
    log::info!("Using feed {} ({})", feed.id, feed.url);
    FeedPipeline::http(feed)
}

async fn report_no_data(pipeline: &FeedPipeline) {
    match pipeline.last_diagnostic().await {
        Some(message) => eprintln!("{message}"),
        None => println!("No earthquake records in {}.", pipeline.feed().name),
    }
}

async fn print_summary(pipeline: &FeedPipeline, summary: &FeedSummary) {
    let fetched = pipeline.cached_at().await.map_or_else(
        || "-".to_string(),
        |t| t.format("%d.%m.%Y, %H:%M:%S UTC").to_string(),
    );

    println!("{}", pipeline.feed().name);
    println!("  Last data query time:   {fetched}");
    println!("  Records:                {}", summary.total);
    println!("  Tsunami alert events:   {}", summary.tsunami_events);
    println!("  Max felt reports:       {}", summary.max_felt_reports);
    println!(
        "  Max magnitude:          {}",
        summary
            .max_magnitude
            .map_or_else(|| "-".to_string(), |m| format!("{m:.1}"))
    );
    println!(
        "  Average azimuthal gap:  {}",
        summary
            .mean_azimuthal_gap
            .map_or_else(|| "-".to_string(), |g| format!("{g:.2}"))
    );
}
