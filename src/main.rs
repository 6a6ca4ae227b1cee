mod config;
mod error;
mod hebrew;
mod ingest;
mod matcher;
mod render;
mod report;
mod retry;
mod segment;

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use config::Settings;
use matcher::MatchResult;
use retry::RetryPolicy;
use segment::Document;

#[derive(Parser)]
#[command(name = "likutei_processor", about = "Match Hebrew commentary summaries to their source passages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Segment a document and show what was found
    Segment {
        /// Flat text dump with residual markup
        input: PathBuf,
    },
    /// Segment, match, and write the JSON mapping report
    Match {
        input: PathBuf,
        /// Where to write the mapping report
        #[arg(short, long, default_value = "mapping.json")]
        output: PathBuf,
    },
    /// Segment, match, and write the HTML document
    Render {
        input: PathBuf,
        #[arg(short, long, default_value = "output.html")]
        output: PathBuf,
        /// Document title
        #[arg(short, long, default_value = "ליקוטי ספרי חסידות")]
        title: String,
    },
    /// Full pipeline: mapping report + HTML in one pass
    Run {
        input: PathBuf,
        /// Directory for mapping.json and output.html
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
        #[arg(short, long, default_value = "ליקוטי ספרי חסידות")]
        title: String,
    },
    /// Print statistics from an existing mapping report
    Stats {
        mapping: PathBuf,
    },
    /// Assemble per-page transcript files into one document, checkpointing
    /// after every page
    Ingest {
        /// Directory holding page_001.txt, page_002.txt, ...
        dir: PathBuf,
        /// Number of pages to collect
        #[arg(short = 'n', long)]
        pages: u32,
        /// Where to write the joined document
        #[arg(short, long, default_value = "document.txt")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?;

    match cli.command {
        Commands::Segment { input } => {
            let doc = segment_file(&input, &settings)?;
            println!(
                "Found {} summaries, {} passages, {} TOC authors",
                doc.summaries.len(),
                doc.passages.len(),
                doc.toc_authors.len()
            );
            for s in doc.summaries.iter().take(10) {
                println!("  [{}] {} | {} | עמ' {}", s.seq, s.sefer, s.opening, s.page_ref);
            }
        }
        Commands::Match { input, output } => {
            let (doc, results) = pipeline(&input, &settings)?;
            write_mapping(&doc, &results, &output)?;
            print_matches(&doc, &results);
        }
        Commands::Render { input, output, title } => {
            let (doc, results) = pipeline(&input, &settings)?;
            let html = render::render_html(&doc, &results, &settings, &title);
            fs::write(&output, html)
                .with_context(|| format!("writing {}", output.display()))?;
            println!("Saved: {}", output.display());
        }
        Commands::Run { input, out_dir, title } => {
            let (doc, results) = pipeline(&input, &settings)?;
            let mapping_path = out_dir.join("mapping.json");
            write_mapping(&doc, &results, &mapping_path)?;
            let html_path = out_dir.join("output.html");
            let html = render::render_html(&doc, &results, &settings, &title);
            fs::write(&html_path, html)
                .with_context(|| format!("writing {}", html_path.display()))?;
            println!("Saved: {}", html_path.display());
            print_matches(&doc, &results);
        }
        Commands::Stats { mapping } => {
            let raw = fs::read_to_string(&mapping)
                .with_context(|| format!("reading {}", mapping.display()))?;
            let parsed: report::MappingReport = serde_json::from_str(&raw)?;
            report::print_statistics(&parsed);
        }
        Commands::Ingest { dir, pages, output } => {
            let policy = RetryPolicy::new(
                settings.retry_attempts,
                Duration::from_secs(settings.retry_delay_secs),
            );
            let checkpoint = output.with_extension("partial.json");
            let source = ingest::DirSource::new(&dir);
            let batch = ingest::collect_pages(&source, pages, &policy, &checkpoint)?;
            let failed = batch.pages.iter().filter(|p| p.error.is_some()).count();
            println!("Collected {}/{} pages ({} failed)", batch.completed_pages, pages, failed);
            fs::write(&output, batch.into_document())
                .with_context(|| format!("writing {}", output.display()))?;
            println!("Saved: {}", output.display());
        }
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }
    Ok(())
}

fn segment_file(input: &PathBuf, settings: &Settings) -> Result<Document> {
    let raw = fs::read_to_string(input)
        .with_context(|| format!("reading {}", input.display()))?;
    info!("read {} chars from {}", raw.chars().count(), input.display());
    Ok(segment::segment_document(&raw, settings))
}

fn pipeline(input: &PathBuf, settings: &Settings) -> Result<(Document, Vec<MatchResult>)> {
    let doc = segment_file(input, settings)?;
    println!(
        "Found {} summaries, {} passages",
        doc.summaries.len(),
        doc.passages.len()
    );
    let results = matcher::match_all(&doc.summaries, &doc.passages, settings);
    Ok((doc, results))
}

fn write_mapping(doc: &Document, results: &[MatchResult], path: &PathBuf) -> Result<()> {
    let mapping = report::build_report(doc, results);
    fs::write(path, serde_json::to_string_pretty(&mapping)?)
        .with_context(|| format!("writing {}", path.display()))?;
    println!("Saved: {}", path.display());
    Ok(())
}

fn print_matches(doc: &Document, results: &[MatchResult]) {
    let matched = results.iter().filter(|r| r.passage_idx.is_some()).count();
    let total = results.len();
    let pct = if total == 0 {
        0.0
    } else {
        100.0 * matched as f64 / total as f64
    };
    println!("Matched: {}/{} ({:.1}%)", matched, total, pct);

    for (s, r) in doc.summaries.iter().zip(results).take(10) {
        match r.passage_idx {
            Some(idx) => {
                let heading: String = doc.passages[idx].heading.chars().take(25).collect();
                println!("  [{}] {} -> {} (score: {:.2})", s.seq, s.opening, heading, r.score);
            }
            None => println!("  [{}] {} -> NO MATCH", s.seq, s.opening),
        }
    }
}
