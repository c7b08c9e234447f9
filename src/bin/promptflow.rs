#![forbid(unsafe_code)]

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use promptflow::gateway::{AnalyzerConfig, AnalyzerGateway, HttpAnalyzer, TracingUsageSink};
use promptflow::{
    build_graph, render_card_markdown, GraphLayout, History, Session, VersionCard,
};

#[derive(Parser)]
#[command(name = "promptflow", version, about = "Prompt version history, comparison, and graph CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive the prompt graph from a history JSON file
    Graph {
        #[arg(long)]
        history: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
        /// Horizontal distance between versions
        #[arg(long)]
        spacing: Option<f64>,
    },
    /// Show the card for one version of a history JSON file
    Card {
        #[arg(long)]
        history: PathBuf,
        /// Zero-based version index (default: latest)
        #[arg(long)]
        index: Option<usize>,
        #[arg(long, value_enum, default_value = "md")]
        format: OutputFormat,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Submit prompts to the analyzer in order and show the resulting card
    Session {
        /// Prompt text (repeatable)
        #[arg(long = "prompt")]
        prompts: Vec<String>,
        /// File with one prompt per line
        #[arg(long)]
        prompts_file: Option<PathBuf>,
        /// Zero-based version to show (default: latest)
        #[arg(long)]
        select: Option<usize>,
        /// Also write the derived graph JSON here
        #[arg(long)]
        graph_out: Option<PathBuf>,
        #[command(flatten)]
        analyzer: AnalyzerArgs,
    },
    /// Ask the analyzer to rewrite a prompt
    Rewrite {
        #[arg(long)]
        prompt: String,
        #[command(flatten)]
        analyzer: AnalyzerArgs,
    },
    /// Ask the analyzer for a refined final prompt
    Refine {
        #[arg(long)]
        prompt: String,
        #[command(flatten)]
        analyzer: AnalyzerArgs,
    },
}

#[derive(clap::Args)]
struct AnalyzerArgs {
    /// Analyzer base URL (overrides PROMPTFLOW_ANALYZER_URL)
    #[arg(long)]
    analyzer_url: Option<String>,
    /// Request timeout in seconds (overrides PROMPTFLOW_ANALYZER_TIMEOUT_SECONDS)
    #[arg(long)]
    timeout_secs: Option<u64>,
}

impl AnalyzerArgs {
    fn gateway(&self) -> Result<AnalyzerGateway<TracingUsageSink>, Box<dyn std::error::Error>> {
        let mut config = AnalyzerConfig::from_env();
        if let Some(url) = &self.analyzer_url {
            config = config.with_base_url(url);
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        let client = HttpAnalyzer::new(config)?;
        Ok(AnalyzerGateway::new(client, Arc::new(TracingUsageSink)))
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Md,
    Json,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Graph {
            history,
            out,
            spacing,
        } => {
            let history = read_history(&history)?;
            let mut layout = GraphLayout::default();
            if let Some(spacing) = spacing {
                layout.horizontal_spacing = spacing;
            }
            let graph = build_graph(&history, &layout);
            write_output(out.as_deref(), &serde_json::to_string_pretty(&graph)?)?;
        }
        Commands::Card {
            history,
            index,
            format,
            out,
        } => {
            let history = read_history(&history)?;
            if history.is_empty() {
                return Err("history is empty".into());
            }
            let index = index.unwrap_or(history.len() - 1);
            let card = VersionCard::build(&history, index).ok_or_else(|| {
                format!("index {index} out of range (history has {} versions)", history.len())
            })?;
            let rendered = match format {
                OutputFormat::Md => render_card_markdown(&card),
                OutputFormat::Json => serde_json::to_string_pretty(&card)?,
            };
            write_output(out.as_deref(), &rendered)?;
        }
        Commands::Session {
            mut prompts,
            prompts_file,
            select,
            graph_out,
            analyzer,
        } => {
            if let Some(path) = prompts_file {
                let raw = std::fs::read_to_string(path)?;
                prompts.extend(
                    raw.lines()
                        .map(str::trim)
                        .filter(|l| !l.is_empty())
                        .map(str::to_string),
                );
            }
            if prompts.is_empty() {
                return Err("session requires --prompt and/or --prompts-file".into());
            }

            let mut session = Session::new(analyzer.gateway()?);
            for prompt in &prompts {
                if let Err(err) = session.submit(prompt).await {
                    eprintln!("skipping prompt ({err}): {prompt}");
                }
            }
            if session.is_empty() {
                return Err("no prompt was analyzed".into());
            }
            if let Some(index) = select {
                session.select(index);
            }

            if let Some(card) = session.card() {
                print!("{}", render_card_markdown(&card));
            }
            if let Some(path) = graph_out {
                let graph = session.graph();
                write_output(Some(&path), &serde_json::to_string_pretty(graph.as_ref())?)?;
            }
        }
        Commands::Rewrite { prompt, analyzer } => {
            let session = Session::new(analyzer.gateway()?);
            let rewritten = session.rewrite(&prompt).await?;
            println!("{}", rewritten.text);
        }
        Commands::Refine { prompt, analyzer } => {
            let session = Session::new(analyzer.gateway()?);
            let refined = session.refine(&prompt).await?;
            println!("{}", refined.text);
        }
    }

    Ok(())
}

fn read_history(path: &Path) -> Result<History, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)?;
    let history: History = serde_json::from_str(&raw)?;
    let fingerprint = history.fingerprint()?;
    tracing::debug!(
        path = %path.display(),
        versions = history.len(),
        %fingerprint,
        "loaded history"
    );
    Ok(history)
}

fn write_output(out: Option<&Path>, contents: &str) -> io::Result<()> {
    match out {
        Some(path) => {
            let mut file = File::create(path)?;
            file.write_all(contents.as_bytes())?;
            file.write_all(b"\n")
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(contents.as_bytes())?;
            stdout.write_all(b"\n")
        }
    }
}
