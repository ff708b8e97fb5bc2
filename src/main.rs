//! # GTFOBins CLI (`gtfo`)
//!
//! | Command | Description |
//! |---------|-------------|
//! | `gtfo build` | Build `api.json` and `functions.json` from a GTFOBins checkout |
//! | `gtfo serve mcp` | Serve the MCP protocol over stdio |
//! | `gtfo serve http` | Serve the HTTP tool API and `/mcp` endpoint |
//! | `gtfo tool list` | List the available tools |
//! | `gtfo tool call <name>` | Call a tool and print its JSON result |
//!
//! ## Examples
//!
//! ```bash
//! gtfo build --corpus-dir GTFOBins.github.io/_gtfobins \
//!     --functions-yml GTFOBins.github.io/_data/functions.yml
//! gtfo tool call list_binaries_by_function --param function_name=suid
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use gtfobins_mcp::traits::{ToolContext, ToolInfo, ToolRegistry};
use gtfobins_mcp::{build, config, logging, mcp, server};

/// GTFOBins knowledge base for AI tools.
///
/// All commands accept a `--config` flag (or `GTFO_CONFIG`) pointing to a
/// TOML configuration file. Relative paths inside it resolve against its
/// directory. When the file does not exist, built-in defaults are used and
/// the artifacts live next to the executable.
#[derive(Parser)]
#[command(
    name = "gtfo",
    about = "GTFOBins MCP server and index builder",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, env = "GTFO_CONFIG", default_value = "./config/gtfo.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the JSON artifacts from a GTFOBins corpus.
    ///
    /// Reads every `*.md` document in the corpus directory plus the function
    /// catalog, then overwrites `api.json` and `functions.json`.
    Build {
        /// Directory of per-binary Markdown documents.
        #[arg(long)]
        corpus_dir: Option<PathBuf>,

        /// Function catalog YAML (`_data/functions.yml`).
        #[arg(long)]
        functions_yml: Option<PathBuf>,

        /// Output path for the binary index.
        #[arg(long)]
        api_out: Option<PathBuf>,

        /// Output path for the function catalog.
        #[arg(long)]
        functions_out: Option<PathBuf>,
    },

    /// Start a server.
    Serve {
        #[command(subcommand)]
        service: ServeService,
    },

    /// Inspect and call tools without a server.
    Tool {
        #[command(subcommand)]
        action: ToolAction,
    },
}

#[derive(Subcommand)]
enum ServeService {
    /// Serve MCP over stdin/stdout.
    Mcp,
    /// Serve the HTTP tool API on `[server].bind`.
    Http,
}

#[derive(Subcommand)]
enum ToolAction {
    /// List all tools with their parameter schemas.
    List,
    /// Call a tool and print the JSON result.
    Call {
        /// Tool name (e.g. `query_binary`).
        name: String,
        /// Tool parameters as `key=value` pairs.
        #[arg(long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,
    },
}

/// Parse a `key=value` pair for `--param` arguments.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no '=' found in '{}'", s))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();
    let mut cfg = config::load_or_default(&cli.config)?;

    match cli.command {
        Commands::Build {
            corpus_dir,
            functions_yml,
            api_out,
            functions_out,
        } => {
            if let Some(dir) = corpus_dir {
                cfg.build.corpus_dir = dir;
            }
            if let Some(path) = functions_yml {
                cfg.build.functions_yml = path;
            }
            if let Some(path) = api_out {
                cfg.artifacts.api_path = path;
            }
            if let Some(path) = functions_out {
                cfg.artifacts.functions_path = path;
            }

            let summary = build::run_build(&cfg)?;
            println!(
                "Built {} binaries, {} functions",
                summary.binaries, summary.functions
            );
        }
        Commands::Serve { service } => match service {
            ServeService::Mcp => mcp::run_stdio(&cfg).await?,
            ServeService::Http => server::run_server(&cfg).await?,
        },
        Commands::Tool { action } => {
            let registry = ToolRegistry::with_builtins();
            match action {
                ToolAction::List => {
                    let tools: Vec<ToolInfo> = registry
                        .tools()
                        .iter()
                        .map(|t| ToolInfo::from_tool(t.as_ref()))
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&tools)?);
                }
                ToolAction::Call { name, params } => {
                    let params: serde_json::Map<String, serde_json::Value> = params
                        .into_iter()
                        .map(|(k, v)| (k, serde_json::Value::String(v)))
                        .collect();
                    let ctx = ToolContext::new(Arc::new(cfg));
                    let result = registry
                        .call(&name, serde_json::Value::Object(params), &ctx)
                        .await?;
                    println!("{}", serde_json::to_string_pretty(&result)?);
                }
            }
        }
    }

    Ok(())
}
