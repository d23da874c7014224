//! Allocator — the ordered fallback chain over discovery sources.

use std::path::PathBuf;

use nodegrid_core::{Job, LatchPolicy, LauncherConfig};
use nodegrid_discovery::{
    DashHostSource, DefaultHostfileSource, Discovery, DiscoverySource, LocalFallbackSource,
    ManagedSource, PerAppHostfileSource,
};
use nodegrid_registry::NodeRegistry;
use tracing::{debug, error, info, warn};

use crate::error::{AllocError, AllocResult};
use crate::state::AllocationState;

/// Builds the initial node pool and commits it to a registry.
pub struct Allocator<R> {
    state: AllocationState,
    managed: ManagedSource,
    default_hostfile: Option<DefaultHostfileSource>,
    per_app: PerAppHostfileSource,
    dash_host: DashHostSource,
    local: LocalFallbackSource,
    registry: R,
}

impl<R: NodeRegistry> Allocator<R> {
    /// An allocator with no managed module and no default hostfile.
    pub fn new(registry: R, local: LocalFallbackSource) -> Self {
        Self {
            state: AllocationState::default(),
            managed: ManagedSource::None,
            default_hostfile: None,
            per_app: PerAppHostfileSource,
            dash_host: DashHostSource,
            local,
            registry,
        }
    }

    /// Build from launcher configuration, consulting the process
    /// environment for managed-module selection.
    pub fn from_config(config: &LauncherConfig, registry: R) -> Self {
        let local = match &config.local.nodename {
            Some(name) => LocalFallbackSource::new(name.clone()),
            None => LocalFallbackSource::from_system(),
        };
        let managed = ManagedSource::select(config.managed.as_ref(), |var| std::env::var(var).ok());

        let mut allocator = Self::new(registry, local)
            .with_managed(managed)
            .with_latch_policy(config.allocation.latch);
        if let Some(path) = &config.allocation.default_hostfile {
            allocator = allocator.with_default_hostfile(path.clone());
        }
        allocator
    }

    pub fn with_managed(mut self, managed: ManagedSource) -> Self {
        self.managed = managed;
        self
    }

    pub fn with_default_hostfile(mut self, path: impl Into<PathBuf>) -> Self {
        self.default_hostfile = Some(DefaultHostfileSource::new(path));
        self
    }

    pub fn with_latch_policy(mut self, policy: LatchPolicy) -> Self {
        self.state = AllocationState::new(policy);
        self
    }

    /// Build the global node pool for `job`, unless that already happened.
    ///
    /// The first call sets the latch before any source runs. Every later
    /// call returns `Ok(())` immediately, even if the first call failed,
    /// unless the latch policy is [`LatchPolicy::ResetOnFailure`].
    pub fn allocate(&mut self, job: &mut Job) -> AllocResult<()> {
        debug!(job = %job.id, "allocate");

        if !self.state.begin() {
            debug!(job = %job.id, "allocation already read");
            return Ok(());
        }

        let outcome = self
            .discover_pool(job)
            .and_then(|(source, found)| self.commit(source, found, job));

        if let Err(e) = &outcome {
            error!(job = %job.id, error = %e, "allocation failed");
            self.state.failed();
        }
        outcome
    }

    /// Run the chain up to the first source that finds anything.
    fn discover_pool(&self, job: &Job) -> AllocResult<(&'static str, Discovery)> {
        let mut chain: Vec<&dyn DiscoverySource> = vec![&self.managed];
        if let Some(hostfile) = &self.default_hostfile {
            chain.push(hostfile);
        }
        chain.push(&self.per_app);
        chain.push(&self.dash_host);

        for source in chain {
            let found = source.discover(job)?;
            if !found.is_empty() {
                return Ok((source.name(), found));
            }
            debug!(source = source.name(), "nothing found, trying next source");
        }

        warn!(job = %job.id, "no nodes discovered, using the local host");
        let found = self
            .local
            .discover(job)
            .map_err(|e| AllocError::ResourceExhausted(e.to_string()))?;
        Ok((self.local.name(), found))
    }

    /// Hand the winning result to the registry.
    fn commit(&mut self, source: &'static str, found: Discovery, job: &mut Job) -> AllocResult<()> {
        let Discovery {
            nodes,
            oversubscribe_hint,
        } = found;

        if let Some(hint) = oversubscribe_hint {
            job.oversubscribe_override = hint;
        }

        let count = nodes.len();
        self.registry.insert(nodes, job)?;
        self.state.committed(source);

        info!(
            job = %job.id,
            %source,
            nodes = count,
            oversubscribe_override = job.oversubscribe_override,
            "node pool allocated"
        );
        Ok(())
    }

    pub fn state(&self) -> &AllocationState {
        &self.state
    }

    /// See [`AllocationState::reset`].
    pub fn reset(&mut self) {
        self.state.reset();
    }

    pub fn managed(&self) -> &ManagedSource {
        &self.managed
    }

    pub fn local(&self) -> &LocalFallbackSource {
        &self.local
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }
}
