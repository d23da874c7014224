//! `nodegrid allocate` — run the allocation chain once for a job.

use std::path::PathBuf;

use anyhow::Context;
use nodegrid_allocator::Allocator;
use nodegrid_core::{JobSpec, LatchPolicy, LauncherConfig};
use nodegrid_registry::NodePool;
use tracing::info;

use super::render::{AllocationReport, format_report};

pub struct AllocateArgs {
    pub job: PathBuf,
    pub config: Option<PathBuf>,
    pub hostfile: Option<PathBuf>,
    pub latch: Option<LatchPolicy>,
    pub format: String,
}

pub fn allocate(args: AllocateArgs) -> anyhow::Result<()> {
    let report = run(&args)?;

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print!("{}", format_report(&report)),
    }
    Ok(())
}

fn run(args: &AllocateArgs) -> anyhow::Result<AllocationReport> {
    let mut config = match &args.config {
        Some(path) => LauncherConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => LauncherConfig::default(),
    };
    if let Some(hostfile) = &args.hostfile {
        config.allocation.default_hostfile = Some(hostfile.clone());
    }
    if let Some(latch) = args.latch {
        config.allocation.latch = latch;
    }

    let mut job = JobSpec::from_file(&args.job)
        .with_context(|| format!("loading job {}", args.job.display()))?
        .into_job();
    info!(job = %job.id, apps = job.apps.len(), "job loaded");

    let pool = match config.registry.max_nodes {
        Some(limit) => NodePool::new().with_max_nodes(limit),
        None => NodePool::new(),
    };
    let mut allocator = Allocator::from_config(&config, pool);
    allocator.allocate(&mut job)?;

    Ok(AllocationReport {
        source: allocator.state().committed_by(),
        oversubscribe_override: job.oversubscribe_override,
        pool: allocator.registry().snapshot(),
        job: job.id,
    })
}
