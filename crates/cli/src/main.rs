use anyhow::Result;
use clap::{Parser, Subcommand};
use pq_readiness::commands::{
    explain_command, init_config_command, latest_command, readiness_command,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Protocol readiness CLI for signature-scheme benchmarks.
///
/// This CLI is a thin wrapper around `readiness-core` (exposed in code as
/// `readiness_core`). All substantive logic lives in the library so it can be
/// tested thoroughly and reused from other frontends.
#[derive(Parser, Debug)]
#[command(
    name = "pq-readiness",
    version,
    about = "Weakest-link protocol readiness over benchmark records",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute effective security bits for every surface.
    ///
    /// Each record is capped by the weakest security level among its
    /// declared dependencies; the blocking dependency is reported.
    Readiness {
        /// Dataset root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Record store path (relative to root). Defaults to `data/results.jsonl`.
        #[arg(long)]
        input: Option<String>,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// List the latest record per canonical id.
    Latest {
        /// Dataset root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Record store path (relative to root). Defaults to `data/results.jsonl`.
        #[arg(long)]
        input: Option<String>,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Explain how one record's effective bits were derived.
    Explain {
        /// Canonical id of the record (e.g. `falcon::falcon_handleOps_userOp_e2e`).
        #[arg(long)]
        id: String,

        /// Dataset root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Record store path (relative to root). Defaults to `data/results.jsonl`.
        #[arg(long)]
        input: Option<String>,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Write the default `readiness.yaml` config at the given root.
    InitConfig {
        /// Dataset root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Overwrite an existing config.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Readiness { root, input, json } => {
            readiness_command(&root, input.as_deref(), json)?
        }
        Command::Latest { root, input, json } => latest_command(&root, input.as_deref(), json)?,
        Command::Explain { id, root, input, json } => {
            explain_command(&root, input.as_deref(), &id, json)?
        }
        Command::InitConfig { root, force } => init_config_command(&root, force)?,
    }

    Ok(())
}
