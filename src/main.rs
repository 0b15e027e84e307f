use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing::{info, warn};

use quillmark::config::{parse_max_common_words, Config};
use quillmark::corpus::loader;
use quillmark::corpus::{AuthorId, DocumentId};
use quillmark::counts::artifact;
use quillmark::counts::table::CountTable;
use quillmark::features::extract::FeatureExtractor;
use quillmark::output::{markdown, terminal};
use quillmark::pipeline::attribution::{self, AttributionReport};
use quillmark::pipeline::extraction;
use quillmark::ranking::rank::DeltaOptions;
use quillmark::ranking::stats::Spread;

/// Quillmark: stylometric authorship attribution.
///
/// Profiles known authors by their function-word and punctuation habits and
/// ranks them against documents of unknown authorship by Burrows' Delta.
#[derive(Parser)]
#[command(name = "quillmark", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Settings shared by every command that extracts or ranks.
#[derive(Args)]
struct RunArgs {
    /// Language id, or "auto" for per-line detection (overrides QUILLMARK_LANGUAGE)
    #[arg(long)]
    language: Option<String>,

    /// Extra category tables file (overrides QUILLMARK_TABLES)
    #[arg(long)]
    tables: Option<PathBuf>,

    /// Spread statistic: "mad" or "std" (overrides QUILLMARK_SPREAD)
    #[arg(long)]
    spread: Option<Spread>,

    /// Cap on common-word features, 0 for no cap (overrides QUILLMARK_MAX_COMMON_WORDS)
    #[arg(long)]
    max_common_words: Option<String>,

    /// Output directory for reports and artifacts (overrides QUILLMARK_OUTPUT_DIR)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Hide progress bars
    #[arg(long)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank known authors against every unknown document
    Rank {
        /// Directory of known authors, one subdirectory per author
        known: PathBuf,

        /// Directory of documents to attribute
        unknown: PathBuf,

        #[command(flatten)]
        run: RunArgs,

        /// Print the JSON report to stdout instead of the terminal tables
        #[arg(long)]
        json: bool,

        /// Most frequent common words shown per author (default: 10)
        #[arg(long, default_value = "10")]
        top_words: usize,
    },

    /// Extract per-document feature counts to a count artifact
    Counts {
        /// Directory of documents (every *.txt below it)
        dir: PathBuf,

        #[command(flatten)]
        run: RunArgs,

        /// Artifact path; the counts go to stdout when omitted
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Rank from previously written count artifacts
    RankCounts {
        /// Known-group artifact; ids must be <author>/<document>
        known: PathBuf,

        /// Unknown-group artifact
        unknown: PathBuf,

        #[command(flatten)]
        run: RunArgs,

        /// Print the JSON report to stdout instead of the terminal tables
        #[arg(long)]
        json: bool,
    },

    /// List the configured languages and their table sizes
    Languages {
        /// Extra category tables file (overrides QUILLMARK_TABLES)
        #[arg(long)]
        tables: Option<PathBuf>,

        /// Print the tables as JSON, usable as a QUILLMARK_TABLES file
        #[arg(long)]
        dump: bool,
    },
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Logs go to stderr so `--json` and `counts` output stay clean on stdout
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("quillmark=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Rank {
            known,
            unknown,
            run,
            json,
            top_words,
        } => {
            let config = load_config(&run)?;
            let extractor = build_extractor(&config)?;
            let corpus = loader::load_corpus(&known, &unknown)?;
            if corpus.unknown.is_empty() {
                warn!(dir = %unknown.display(), "No unknown documents found");
            }

            let result = attribution::run(&corpus, &extractor, &delta_options(&config), !run.quiet)?;

            std::fs::create_dir_all(&config.output_dir).with_context(|| {
                format!("creating output directory {}", config.output_dir.display())
            })?;
            write_artifact(&result.known_counts, &config.output_dir.join("counts-known.tsv"))?;
            write_artifact(
                &result.unknown_counts,
                &config.output_dir.join("counts-unknown.tsv"),
            )?;

            finish_report(&result.report, &config, json, top_words)?;
        }

        Commands::Counts { dir, run, output } => {
            let config = load_config(&run)?;
            let extractor = build_extractor(&config)?;

            let mut documents = Vec::new();
            for path in loader::text_files(&dir)? {
                documents.push((loader::relative_id(&dir, &path), loader::read_text(&path)?));
            }
            let borrowed: Vec<(&DocumentId, &str)> =
                documents.iter().map(|(id, text)| (id, text.as_str())).collect();
            let table = extraction::extract_counts(&extractor, &borrowed, "Documents", !run.quiet);

            match output {
                Some(path) => {
                    write_artifact(&table, &path)?;
                    terminal::display_count_summary(&table);
                    println!("{}", format!("Counts saved to: {}", path.display()).bold());
                }
                None => {
                    let stdout = io::stdout();
                    let mut out = BufWriter::new(stdout.lock());
                    artifact::write_table(&table, &mut out)?;
                    out.flush()?;
                }
            }
        }

        Commands::RankCounts {
            known,
            unknown,
            run,
            json,
        } => {
            let config = load_config(&run)?;
            let registry = config.registry()?;
            let selector = config.require_language(&registry)?;

            let known_counts = read_artifact(&known)?;
            let unknown_counts = read_artifact(&unknown)?;

            let mut assignments: Vec<(DocumentId, AuthorId)> = Vec::new();
            for (document, _) in known_counts.iter() {
                match loader::author_of(document) {
                    Some(author) => assignments.push((document.clone(), author)),
                    None => warn!(document = %document, "Known count has no author prefix, skipped"),
                }
            }
            let unknown_ids: Vec<DocumentId> =
                unknown_counts.iter().map(|(id, _)| id.clone()).collect();
            info!(
                known = assignments.len(),
                unknown = unknown_ids.len(),
                "Loaded count artifacts"
            );

            let report = attribution::rank_counts(
                &assignments,
                &known_counts,
                &unknown_ids,
                &unknown_counts,
                selector,
                &delta_options(&config),
            )?;

            finish_report(&report, &config, json, 10)?;
        }

        Commands::Languages { tables, dump } => {
            let mut config = Config::load()?;
            if tables.is_some() {
                config.tables_path = tables;
            }
            let registry = config.registry()?;
            if dump {
                println!("{}", registry.to_json()?);
            } else {
                terminal::display_languages(&registry);
            }
        }
    }

    Ok(())
}

/// Environment configuration with CLI overrides applied.
fn load_config(run: &RunArgs) -> Result<Config> {
    let mut config = Config::load()?;
    if let Some(language) = &run.language {
        config.language = language.clone();
    }
    if let Some(tables) = &run.tables {
        config.tables_path = Some(tables.clone());
    }
    if let Some(spread) = run.spread {
        config.spread = spread;
    }
    if let Some(value) = &run.max_common_words {
        config.max_common_words = parse_max_common_words(value)?;
    }
    if let Some(dir) = &run.output_dir {
        config.output_dir = dir.clone();
    }
    Ok(config)
}

/// Validate the language up front, before any document is read.
fn build_extractor(config: &Config) -> Result<FeatureExtractor> {
    let registry = config.registry()?;
    let selector = config.require_language(&registry)?;
    info!(language = %config.language, "Using category tables");
    FeatureExtractor::new(registry, selector)
}

fn delta_options(config: &Config) -> DeltaOptions {
    DeltaOptions {
        spread: config.spread,
        max_common_words: config.max_common_words,
    }
}

fn write_artifact(table: &CountTable, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("creating count artifact {}", path.display()))?;
    let mut out = BufWriter::new(file);
    artifact::write_table(table, &mut out)
        .with_context(|| format!("writing count artifact {}", path.display()))?;
    out.flush()?;
    info!(path = %path.display(), documents = table.len(), "Wrote count artifact");
    Ok(())
}

fn read_artifact(path: &Path) -> Result<CountTable> {
    let file =
        File::open(path).with_context(|| format!("opening count artifact {}", path.display()))?;
    artifact::read_table(BufReader::new(file))
        .with_context(|| format!("reading count artifact {}", path.display()))
}

/// Display (or print as JSON) and save the markdown and JSON reports.
fn finish_report(
    report: &AttributionReport,
    config: &Config,
    json: bool,
    top_words: usize,
) -> Result<()> {
    let report_json = serde_json::to_string_pretty(report)?;

    if json {
        println!("{report_json}");
    } else {
        terminal::display_rankings(report);
        terminal::display_exclusions(&report.exclusions);
        terminal::display_author_profiles(report, top_words);
    }

    std::fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("creating output directory {}", config.output_dir.display()))?;
    let json_path = config.output_dir.join("report.json");
    std::fs::write(&json_path, &report_json)
        .with_context(|| format!("writing {}", json_path.display()))?;

    let report_path = markdown::generate_report(report, &config.output_dir.join("report.md"))?;

    if !json {
        println!(
            "{}",
            format!("Markdown report saved to: {report_path}").bold()
        );
        println!(
            "{}",
            format!("JSON report saved to: {}", json_path.display()).dimmed()
        );
    }
    Ok(())
}
