use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_MAX_STARTING_ASSEMBLIES: usize = 5;
pub const DEFAULT_NUM_THREADS: usize = 4;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: String,
    },

    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// How the score deficit of a ligand treats peers that have no pose in the assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeficitPolicy {
    /// Pairs with an unassigned side contribute nothing.
    #[default]
    SkipAbsentPeers,
    /// Pairs with an unassigned side count as scoring zero, so the full ideal score is missing.
    IncludeAbsentPeers,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultiAlignerConfig {
    /// Number of best starting assemblies kept for refinement (K).
    pub max_starting_assemblies: usize,
    /// Size of the worker pool owned by one aligner.
    pub num_threads: usize,
    /// Upper bound on local-search steps per starting assembly; `None` runs to a local optimum.
    pub max_iterations: Option<usize>,
    pub deficit_policy: DeficitPolicy,
    /// Accept ligands without poses instead of rejecting them during validation.
    pub allow_empty_pose_sets: bool,
    /// Leave starting assemblies with missing ligands unrefined.
    pub skip_incomplete_assemblies: bool,
}

impl Default for MultiAlignerConfig {
    fn default() -> Self {
        Self {
            max_starting_assemblies: DEFAULT_MAX_STARTING_ASSEMBLIES,
            num_threads: DEFAULT_NUM_THREADS,
            max_iterations: None,
            deficit_policy: DeficitPolicy::default(),
            allow_empty_pose_sets: false,
            skip_incomplete_assemblies: false,
        }
    }
}

impl MultiAlignerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_starting_assemblies == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "max_starting_assemblies",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.num_threads == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "num_threads",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.max_iterations == Some(0) {
            return Err(ConfigError::InvalidParameter {
                name: "max_iterations",
                reason: "must be greater than zero when set".to_string(),
            });
        }
        Ok(())
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let partial: PartialMultiAlignerConfig = toml::from_str(content)?;
        partial.into_builder().build()
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content)
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialMultiAlignerConfig {
    max_starting_assemblies: Option<usize>,
    num_threads: Option<usize>,
    max_iterations: Option<usize>,
    deficit_policy: Option<DeficitPolicy>,
    allow_empty_pose_sets: Option<bool>,
    skip_incomplete_assemblies: Option<bool>,
}

impl PartialMultiAlignerConfig {
    fn into_builder(self) -> MultiAlignerConfigBuilder {
        MultiAlignerConfigBuilder {
            max_starting_assemblies: self.max_starting_assemblies,
            num_threads: self.num_threads,
            max_iterations: self.max_iterations,
            deficit_policy: self.deficit_policy,
            allow_empty_pose_sets: self.allow_empty_pose_sets,
            skip_incomplete_assemblies: self.skip_incomplete_assemblies,
        }
    }
}

#[derive(Default)]
pub struct MultiAlignerConfigBuilder {
    max_starting_assemblies: Option<usize>,
    num_threads: Option<usize>,
    max_iterations: Option<usize>,
    deficit_policy: Option<DeficitPolicy>,
    allow_empty_pose_sets: Option<bool>,
    skip_incomplete_assemblies: Option<bool>,
}

impl MultiAlignerConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_starting_assemblies(mut self, count: usize) -> Self {
        self.max_starting_assemblies = Some(count);
        self
    }
    pub fn num_threads(mut self, threads: usize) -> Self {
        self.num_threads = Some(threads);
        self
    }
    pub fn max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = Some(iterations);
        self
    }
    pub fn deficit_policy(mut self, policy: DeficitPolicy) -> Self {
        self.deficit_policy = Some(policy);
        self
    }
    pub fn allow_empty_pose_sets(mut self, allow: bool) -> Self {
        self.allow_empty_pose_sets = Some(allow);
        self
    }
    pub fn skip_incomplete_assemblies(mut self, skip: bool) -> Self {
        self.skip_incomplete_assemblies = Some(skip);
        self
    }

    pub fn build(self) -> Result<MultiAlignerConfig, ConfigError> {
        let defaults = MultiAlignerConfig::default();
        let config = MultiAlignerConfig {
            max_starting_assemblies: self
                .max_starting_assemblies
                .unwrap_or(defaults.max_starting_assemblies),
            num_threads: self.num_threads.unwrap_or(defaults.num_threads),
            max_iterations: self.max_iterations.or(defaults.max_iterations),
            deficit_policy: self.deficit_policy.unwrap_or(defaults.deficit_policy),
            allow_empty_pose_sets: self
                .allow_empty_pose_sets
                .unwrap_or(defaults.allow_empty_pose_sets),
            skip_incomplete_assemblies: self
                .skip_incomplete_assemblies
                .unwrap_or(defaults.skip_incomplete_assemblies),
        };
        config.validate()?;
        Ok(config)
    }
}
