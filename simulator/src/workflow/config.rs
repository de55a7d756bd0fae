use crate::generator::profile::GeneratorConfig;
use anyhow::Context;
use inpcore::prelude::{RecordKind, SessionConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorSelection {
    pub inp: bool,
    pub long_tasks: bool,
    pub loaf: bool,
}

impl Default for MonitorSelection {
    fn default() -> Self {
        Self {
            inp: true,
            long_tasks: true,
            loaf: true,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub monitors: MonitorSelection,
    /// Record kinds the replayed environment advertises.
    pub supported_kinds: Vec<RecordKind>,
    pub session: SessionConfig,
    /// Records emitted before the sessions subscribe.
    pub buffered_prefix: usize,
    /// Reset the INP session once the replay finishes.
    pub reset_after: bool,
    pub user_agent: String,
    pub generator: GeneratorConfig,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            monitors: MonitorSelection::default(),
            supported_kinds: RecordKind::ALL.to_vec(),
            session: SessionConfig::default(),
            buffered_prefix: 0,
            reset_after: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            generator: GeneratorConfig::default(),
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(interactions: usize, seed: u64, buffered_prefix: usize) -> Self {
        let mut config = Self {
            buffered_prefix,
            ..Default::default()
        };
        config.generator.interactions = interactions;
        config.generator.seed = seed;
        config
    }
}
