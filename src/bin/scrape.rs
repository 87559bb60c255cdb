// src/bin/scrape.rs
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use places_export::config::Config;
use places_export::models::{ExportFormat, SearchResult};
use places_export::services::{
    parse_selection, ExportService, ExportStats, ExportWriter, GooglePlacesClient, PlaceService,
    SCRAPE_MAX_RESULTS,
};
use std::io::{self, BufRead, Write};

// --- ANSI colors for the terminal ---
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

#[derive(Parser, Debug)]
#[command(name = "places-scrape", version, about = "Search places and export them to CSV/XLSX")]
struct Cli {
    /// Directory exports are written to
    #[arg(long, global = true, env = "EXPORT_DIR")]
    export_dir: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search, pick results, export the selection
    Search {
        /// Free-text query, e.g. "plumbers in Ljubljana"
        query: String,

        #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u32).range(1..=60))]
        max_results: u32,

        #[arg(long, default_value_t = 0.0)]
        min_rating: f32,

        #[arg(long, default_value = "csv")]
        format: ExportFormat,

        /// Selection like "1,3-5"; prompts when omitted
        #[arg(long, conflicts_with = "all")]
        select: Option<String>,

        /// Export every result without prompting
        #[arg(long)]
        all: bool,
    },
    /// One-shot scrape of "<TERM> in <LOCATION>" straight to CSV
    Scrape {
        term: String,
        location: String,

        #[arg(long, default_value_t = SCRAPE_MAX_RESULTS)]
        max_results: u32,
    },
    /// List files in the export directory
    Exports,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(dir) = cli.export_dir {
        config.export_dir = dir;
    }
    places_export::init(&config).map_err(anyhow::Error::msg)?;

    let writer = ExportWriter::new(&config.export_dir)
        .with_context(|| format!("preparing {}", config.export_dir.display()))?;

    match cli.command {
        Command::Exports => list_exports(&writer),
        Command::Search {
            query,
            max_results,
            min_rating,
            format,
            select,
            all,
        } => {
            let client = client(&config)?;
            run_search(&config, &client, &writer, &query, max_results, min_rating, format, select, all)
                .await
        }
        Command::Scrape {
            term,
            location,
            max_results,
        } => {
            let client = client(&config)?;
            println!(
                "\n{}🔍 Scraping \"{} in {}\"...{}",
                CYAN, term, location, RESET
            );
            let stats = ExportService::scrape(
                &client,
                &writer,
                &term,
                &location,
                max_results,
                config.detail_delay(),
            )
            .await?;
            print_summary(&stats);
            Ok(())
        }
    }
}

fn client(config: &Config) -> Result<GooglePlacesClient> {
    GooglePlacesClient::from_config(config, config.google_maps_api_key.clone()).map_err(|e| {
        println!(
            "{}❌ {}{}",
            RED, e, RESET
        );
        anyhow::Error::new(e)
    })
}

#[allow(clippy::too_many_arguments)]
async fn run_search(
    config: &Config,
    client: &GooglePlacesClient,
    writer: &ExportWriter,
    query: &str,
    max_results: u32,
    min_rating: f32,
    format: ExportFormat,
    select: Option<String>,
    all: bool,
) -> Result<()> {
    println!("\n{}🔍 Searching \"{}\"...{}", CYAN, query, RESET);
    let results = PlaceService::search(client, query, max_results, min_rating).await?;

    if results.is_empty() {
        println!("{}No results found.{}", YELLOW, RESET);
        return Ok(());
    }
    print_results(&results);

    let spec = match (all, select) {
        (true, _) => "all".to_string(),
        (false, Some(spec)) => spec,
        (false, None) => prompt_selection()?,
    };
    let indices = parse_selection(&spec, results.len())?;
    let ids: Vec<String> = indices.iter().map(|&i| results[i].id.clone()).collect();

    println!(
        "\n{}🚀 Fetching details for {} places...{}",
        BOLD,
        ids.len(),
        RESET
    );
    let stats =
        ExportService::export_selected(client, writer, &ids, format, config.detail_delay()).await?;
    print_summary(&stats);
    Ok(())
}

fn prompt_selection() -> Result<String> {
    print!("\nSelect results to export (e.g. 1,3-5 or all): ");
    io::stdout().flush()?;

    let mut line = String::new();
    let read = io::stdin().lock().read_line(&mut line)?;
    if read == 0 {
        bail!("no selection given");
    }
    Ok(line.trim().to_string())
}

fn print_results(results: &[SearchResult]) {
    println!("──────────────────────────────────────────────────────────────────────────────");
    println!("{:>3}  {:<36} {:>6} {:>8}  {}", "#", "Name", "Rating", "Reviews", "Address");
    println!("──────────────────────────────────────────────────────────────────────────────");
    for (idx, r) in results.iter().enumerate() {
        println!(
            "{:>3}  {:<36} {:>6} {:>8}  {}",
            idx + 1,
            truncate(&r.name, 36),
            r.rating.map(|v| format!("{:.1}", v)).unwrap_or_else(|| "-".to_string()),
            r.user_rating_count
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".to_string()),
            r.formatted_address
        );
    }
    println!("──────────────────────────────────────────────────────────────────────────────");
}

fn print_summary(stats: &ExportStats) {
    println!(
        "\n{}✅ Export completed: {} records written to {}{}",
        GREEN, stats.exported, stats.filename, RESET
    );
    if !stats.skipped.is_empty() {
        println!(
            "{}⚠️  {} places skipped (details unavailable): {}{}",
            YELLOW,
            stats.skipped.len(),
            stats.skipped.join(", "),
            RESET
        );
    }
    println!("  • Path: {}", stats.path.display());
    println!("  • Duration: {}s", stats.duration_seconds);
}

fn list_exports(writer: &ExportWriter) -> Result<()> {
    let exports = writer.list()?;
    if exports.is_empty() {
        println!("No files available in {}.", writer.output_dir().display());
        return Ok(());
    }

    println!("{:<48} {:<20} {:<6} {:>10}", "File", "Date", "Format", "Size");
    for e in exports {
        println!("{:<48} {:<20} {:<6} {:>10}", e.filename, e.date, e.format, e.size);
    }
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
