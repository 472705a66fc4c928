//! CLI binary for sema: analyze source files and search cached analyses.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sema_core::config::SemaConfig;
use sema_engine::Analyzer;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "sema", about = "Semantic source-code analysis engine")]
struct Cli {
    /// Directory containing sema.toml (defaults to current directory)
    #[arg(short, long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a file: symbols, imports, anti-patterns, metrics
    Analyze {
        /// Source file to analyze
        file: PathBuf,

        /// Emit the full analysis as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show only the metrics summary for a file
    Info {
        /// Source file to analyze
        file: PathBuf,
    },

    /// Rank files by semantic similarity to a query snippet
    Similar {
        /// Query text or code snippet
        query: String,

        /// Files to analyze and rank
        files: Vec<PathBuf>,

        /// Minimum cosine score (defaults to config threshold)
        #[arg(short, long)]
        threshold: Option<f32>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config_dir = match &cli.config_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("failed to get current directory")?,
    };
    let config = SemaConfig::load(&config_dir)?;
    let analyzer = build_analyzer(config);

    match cli.command {
        Commands::Analyze { file, json } => cmd_analyze(&analyzer, &file, json),
        Commands::Info { file } => cmd_info(&analyzer, &file),
        Commands::Similar {
            query,
            files,
            threshold,
        } => cmd_similar(&analyzer, &query, &files, threshold),
    }
}

#[cfg(feature = "local-embeddings")]
fn build_analyzer(config: SemaConfig) -> Analyzer {
    Analyzer::with_local_model(config)
}

#[cfg(not(feature = "local-embeddings"))]
fn build_analyzer(config: SemaConfig) -> Analyzer {
    Analyzer::new(config)
}

fn cmd_analyze(analyzer: &Analyzer, file: &Path, json: bool) -> Result<()> {
    let analysis = analyzer.analyze(file)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&*analysis)?);
        return Ok(());
    }

    println!("{}", analysis.file_path.display());
    println!(
        "  {} lines, complexity {:.2}, maintainability {:.1}",
        analysis.lines_of_code, analysis.complexity_score, analysis.maintainability_index
    );

    if !analysis.imports.is_empty() {
        println!("  imports: {}", analysis.imports.join(", "));
    }

    for symbol in &analysis.symbols {
        println!(
            "  {:?} {} (line {}, complexity {})",
            symbol.kind, symbol.name, symbol.line, symbol.cyclomatic_complexity
        );
    }

    if analysis.patterns.is_empty() {
        println!("  no anti-patterns detected");
    } else {
        for pattern in &analysis.patterns {
            println!(
                "  [{:?}] line {}: {} (confidence {:.2})",
                pattern.severity, pattern.line, pattern.description, pattern.confidence
            );
        }
    }

    Ok(())
}

fn cmd_info(analyzer: &Analyzer, file: &Path) -> Result<()> {
    let analysis = analyzer.analyze(file)?;
    println!("file:            {}", analysis.file_path.display());
    println!("lines of code:   {}", analysis.lines_of_code);
    println!("classes:         {}", analysis.classes().len());
    println!("functions:       {}", analysis.functions().len());
    println!("imports:         {}", analysis.imports.len());
    println!("findings:        {}", analysis.patterns.len());
    println!("complexity:      {:.2}", analysis.complexity_score);
    println!("maintainability: {:.1}", analysis.maintainability_index);
    Ok(())
}

fn cmd_similar(
    analyzer: &Analyzer,
    query: &str,
    files: &[PathBuf],
    threshold: Option<f32>,
) -> Result<()> {
    for file in files {
        analyzer
            .analyze(file)
            .with_context(|| format!("failed to analyze {}", file.display()))?;
    }

    let hits = match threshold {
        Some(t) => analyzer.find_similar_with(query, t),
        None => analyzer.find_similar(query),
    };

    if hits.is_empty() {
        println!("no matches (is an embedding backend available?)");
        return Ok(());
    }

    for (path, score) in hits {
        println!("{score:.3}  {}", path.display());
    }
    Ok(())
}
