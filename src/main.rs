//! sitegen CLI - render, validate and format `.hi` documents

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;

use sitegen::config::CONFIG_FILE;
use sitegen::{FixSuggestion, Node, RenderOptions, Runner, SiteError};

#[derive(Parser)]
#[command(name = "sitegen")]
#[command(about = "sitegen - render .hi documents into a static page")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a document into HTML
    Render {
        /// YAML options file (defaults to ./sitegen.yaml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Input .hi file
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output HTML file
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Data directory for fetched and cached bindings
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Layout HTML file
        #[arg(long)]
        layout: Option<PathBuf>,
    },

    /// Parse a document and summarize it
    Validate {
        /// Path to .hi file
        file: PathBuf,
    },

    /// Print a document in canonical form
    Fmt {
        /// Path to .hi file
        file: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render {
            config,
            input,
            out,
            data_dir,
            layout,
        } => render(config, input, out, data_dir, layout),
        Commands::Validate { file } => validate(&file),
        Commands::Fmt { file } => format(&file),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        if let Some(suggestion) = e.downcast_ref::<SiteError>().and_then(|e| e.fix_suggestion()) {
            eprintln!("  {} {}", "Fix:".yellow(), suggestion);
        }
        std::process::exit(1);
    }
}

fn render(
    config: Option<PathBuf>,
    input: Option<PathBuf>,
    out: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    layout: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut options = match config {
        Some(path) => RenderOptions::load(&path)
            .with_context(|| format!("loading options from {}", path.display()))?,
        None if Path::new(CONFIG_FILE).exists() => RenderOptions::load(CONFIG_FILE)?,
        None => RenderOptions::default(),
    };

    if let Some(input) = input {
        options.input = input;
    }
    if let Some(out) = out {
        options.out = out;
    }
    if let Some(data_dir) = data_dir {
        options.data_dir = data_dir;
    }
    if let Some(layout) = layout {
        options.layout = layout;
    }

    let report = Runner::new(options).run()?;
    println!(
        "{} Rendered {} ({} bytes, {} bindings)",
        "✓".green(),
        report.out.display().to_string().cyan(),
        report.bytes,
        report.bindings
    );
    Ok(())
}

fn read_document(file: &Path) -> anyhow::Result<sitegen::Document> {
    let source = fs::read_to_string(file).map_err(SiteError::from)?;
    Ok(sitegen::parse(&source)?)
}

fn validate(file: &Path) -> anyhow::Result<()> {
    let doc = read_document(file)?;

    let lazy = doc.bindings.iter().filter(|b| b.is_lazy()).count();
    let manual = doc.bindings.iter().filter(|b| b.is_manual()).count();
    let eager = doc.bindings.len() - lazy - manual;

    println!("{} Document '{}' is valid", "✓".green(), file.display());
    println!("  Bindings: {} ({} eager, {} lazy, {} manual)", doc.bindings.len(), eager, lazy, manual);
    println!("  Nodes: {}", count_nodes(&doc.nodes));
    Ok(())
}

fn count_nodes(nodes: &[Node]) -> usize {
    nodes
        .iter()
        .map(|n| match n {
            Node::Loop(l) => 1 + count_nodes(&l.body),
            _ => 1,
        })
        .sum()
}

fn format(file: &Path) -> anyhow::Result<()> {
    let doc = read_document(file)?;
    print!("{doc}");
    Ok(())
}
