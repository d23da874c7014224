use std::path::PathBuf;

use clap::{Parser, Subcommand};
use nodegrid_core::LatchPolicy;

mod commands;

#[derive(Parser)]
#[command(
    name = "nodegrid",
    about = "nodegrid — build the node pool a distributed job launches on",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the allocation chain for a job and print the resulting pool.
    ///
    /// Sources are tried in order: managed module, default hostfile,
    /// per-app hostfiles, dash-host lists, then the local host.
    Allocate {
        /// Job file (TOML)
        #[arg(short, long)]
        job: PathBuf,
        /// Launcher config file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Default hostfile; overrides [allocation].default_hostfile
        #[arg(long)]
        hostfile: Option<PathBuf>,
        /// Latch policy: sticky or reset_on_failure
        #[arg(long)]
        latch: Option<LatchPolicy>,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Parse a hostfile or dash-host list and print what it contributes
    Hosts {
        /// Hostfile to parse
        hostfile: Option<PathBuf>,
        /// Inline host list, e.g. "n1,n2:4" (repeatable)
        #[arg(long = "dash-host", conflicts_with = "hostfile")]
        dash_host: Vec<String>,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json)?;

    match cli.command {
        Commands::Allocate {
            job,
            config,
            hostfile,
            latch,
            format,
        } => commands::allocate::allocate(commands::allocate::AllocateArgs {
            job,
            config,
            hostfile,
            latch,
            format,
        }),
        Commands::Hosts {
            hostfile,
            dash_host,
            format,
        } => commands::hosts::hosts(hostfile.as_deref(), &dash_host, &format),
    }
}

fn init_tracing(verbose: bool, json: bool) -> anyhow::Result<()> {
    let level = if verbose { "nodegrid=debug" } else { "nodegrid=info" };
    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.parse()?);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}
