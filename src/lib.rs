//! # GTFOBins MCP
//!
//! An MCP server exposing the [GTFOBins](https://gtfobins.github.io/)
//! knowledge base: Unix binaries that can be abused to bypass local security
//! restrictions, grouped by function (`shell`, `suid`, `file-read`, ...).
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌─────────────────┐
//! │ _gtfobins/   │──▶│ gtfo build   │──▶│ api.json        │
//! │ functions.yml│   │ (offline)    │   │ functions.json  │
//! └──────────────┘   └──────────────┘   └────────┬────────┘
//!                                                │ loaded per call
//!                          ┌─────────────────────┤
//!                          ▼                     ▼
//!                    ┌───────────┐         ┌───────────┐
//!                    │ MCP stdio │         │   HTTP    │
//!                    │ (rmcp)    │         │  (axum)   │
//!                    └───────────┘         └───────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! gtfo build                          # corpus → api.json + functions.json
//! gtfo serve mcp                      # stdio MCP server
//! gtfo tool call query_binary --param binary_name=base64
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration with defaults |
//! | [`frontmatter`] | YAML front matter extraction |
//! | [`build`] | Offline corpus scan and artifact writer |
//! | [`artifacts`] | Per-call artifact loading |
//! | [`query`] | The five read-only query operations |
//! | [`traits`] | `Tool` trait, built-in tools, `ToolRegistry` |
//! | [`mcp`] | rmcp bridge and stdio transport |
//! | [`server`] | HTTP tool API and Streamable HTTP MCP endpoint |
//! | [`logging`] | tracing subscriber setup |

pub mod artifacts;
pub mod build;
pub mod config;
pub mod frontmatter;
pub mod logging;
pub mod mcp;
pub mod query;
pub mod server;
pub mod traits;

pub use gtfobins_core::{Operation, QueryError};
pub use query::QueryService;
pub use traits::{Tool, ToolContext, ToolRegistry};
