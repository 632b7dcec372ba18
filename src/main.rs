use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use kgraph::ingestion::{ChatCompletionClient, CompletionConfig, PromptTemplate, Provider};
use kgraph::memory::ExportWriter;
use kgraph::{MergeSummary, Session};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "kgraph",
    version,
    about = "Knowledge graph builder for LLM completions",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge completion text files and import documents into one graph, in order.
    Build {
        #[arg(long = "text")]
        texts: Vec<PathBuf>,
        #[arg(long = "import")]
        imports: Vec<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
        /// Print the {nodes, edges} snapshot to stdout.
        #[arg(long, default_value_t = false)]
        snapshot: bool,
    },
    /// Interactive session reading commands from stdin.
    Session {
        #[arg(long, default_value = "openrouter")]
        provider: String,
        #[arg(long)]
        endpoint: Option<String>,
        #[arg(long)]
        model: Option<String>,
        #[arg(long, default_value_t = 0.3)]
        temperature: f32,
        #[arg(long, default_value_t = 800)]
        max_tokens: u32,
        #[arg(long, env = "KGRAPH_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
        #[arg(long)]
        prompt_template: Option<PathBuf>,
    },
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Commands::Build {
            texts,
            imports,
            output,
            snapshot,
        } => {
            let mut session = Session::new();
            for path in &texts {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("failed to read completion text {:?}", path))?;
                let summary = session.ingest_text(&text);
                log_summary("text", path, summary);
            }
            for path in &imports {
                let summary = session.import_file(path)?;
                log_summary("import", path, summary);
            }
            if let Some(output) = output {
                let edges = session.export_file(&output, true)?;
                info!("export" = %output.display(), edges);
            }
            if snapshot {
                println!("{}", serde_json::to_string_pretty(session.snapshot())?);
            }
        }
        Commands::Session {
            provider,
            endpoint,
            model,
            temperature,
            max_tokens,
            api_key,
            prompt_template,
        } => {
            let provider = Provider::from_str(&provider)?;
            let mut config = CompletionConfig::new(provider)
                .with_temperature(temperature)
                .with_max_tokens(max_tokens)
                .with_api_key(api_key);
            if let Some(endpoint) = endpoint {
                config = config.with_endpoint(endpoint);
            }
            if let Some(model) = model {
                config = config.with_model(model);
            }
            let template = match prompt_template {
                Some(path) => PromptTemplate::load_from_path(path)?,
                None => PromptTemplate::default(),
            };
            let client = ChatCompletionClient::new(config)?;
            let mut session = Session::with_client(Arc::new(client), template);
            run_session(&mut session)?;
        }
    }

    Ok(())
}

fn log_summary(kind: &str, path: &Path, summary: MergeSummary) {
    info!(
        kind,
        "file" = %path.display(),
        tuples = summary.tuples,
        nodes_added = summary.nodes_added,
        edges_added = summary.edges_added,
        "merged"
    );
}

const HELP: &str = "\
commands:
  generate <text>   ask the model for tuples about <text> and merge them
  text <file>       merge tuples extracted from a completion text file
  import <file>     merge an exported JSON document
  export [file]     write the current edges as JSON
  clear             empty the graph
  show              print the {nodes, edges} snapshot
  stats             print node and edge counts
  quit";

fn run_session(session: &mut Session) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    println!("{}", HELP);
    loop {
        print!("> ");
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (command, argument) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };
        match command {
            "generate" if !argument.is_empty() => match session.generate(argument) {
                Ok(summary) => print_summary(summary),
                Err(err) => error!(error = %format!("{:#}", err), "generation failed"),
            },
            "text" if !argument.is_empty() => match fs::read_to_string(argument) {
                Ok(text) => print_summary(session.ingest_text(&text)),
                Err(err) => error!(%err, file = argument, "cannot read completion text"),
            },
            "import" if !argument.is_empty() => match session.import_file(argument) {
                Ok(summary) => print_summary(summary),
                Err(err) => error!(error = %format!("{:#}", err), "import failed"),
            },
            "export" => {
                let path = if argument.is_empty() {
                    PathBuf::from(ExportWriter::default_file_name(Utc::now()))
                } else {
                    PathBuf::from(argument)
                };
                match session.export_file(&path, false) {
                    Ok(edges) => println!("exported {} edges to {}", edges, path.display()),
                    Err(err) => warn!(error = %format!("{:#}", err), "export skipped"),
                }
            }
            "clear" => {
                session.clear();
                println!("graph cleared");
            }
            "show" => println!("{}", serde_json::to_string_pretty(session.snapshot())?),
            "stats" => {
                let state = session.snapshot();
                println!("{} nodes, {} edges", state.nodes().len(), state.edges().len());
            }
            "quit" | "exit" => break,
            _ => println!("{}", HELP),
        }
    }
    Ok(())
}

fn print_summary(summary: MergeSummary) {
    println!(
        "{} tuples, +{} nodes, +{} edges",
        summary.tuples, summary.nodes_added, summary.edges_added
    );
}
