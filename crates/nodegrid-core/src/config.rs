//! Launcher configuration parser.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default environment variable naming a scheduler-provided nodefile.
pub const DEFAULT_NODEFILE_ENV: &str = "PBS_NODEFILE";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LauncherConfig {
    #[serde(default)]
    pub allocation: AllocationConfig,
    pub managed: Option<ManagedConfig>,
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub local: LocalConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AllocationConfig {
    /// Hostfile used for every job unless a managed allocation wins.
    pub default_hostfile: Option<PathBuf>,
    #[serde(default)]
    pub latch: LatchPolicy,
}

/// What happens to the "already allocated" latch when the first
/// allocation attempt fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LatchPolicy {
    /// The latch stays set; later calls succeed without retrying.
    #[default]
    Sticky,
    /// The latch is cleared so a later call runs the chain again.
    ResetOnFailure,
}

impl std::str::FromStr for LatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sticky" => Ok(LatchPolicy::Sticky),
            "reset_on_failure" | "reset-on-failure" => Ok(LatchPolicy::ResetOnFailure),
            other => Err(format!("unknown latch policy: {other}")),
        }
    }
}

/// A managed (scheduler-provided) allocation source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ManagedConfig {
    /// One hostname per line in the file named by `env`.
    Nodefile {
        #[serde(default)]
        env: Option<String>,
    },
}

impl ManagedConfig {
    /// Environment variable consulted by a nodefile module.
    pub fn nodefile_env(&self) -> &str {
        match self {
            ManagedConfig::Nodefile { env } => env.as_deref().unwrap_or(DEFAULT_NODEFILE_ENV),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    pub max_nodes: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalConfig {
    /// Overrides the resolved hostname of the launcher.
    pub nodename: Option<String>,
}

impl LauncherConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: LauncherConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
