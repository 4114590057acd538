//! Job file loading from sprites.toml

use std::path::{Path, PathBuf};

use petsprite_core::{BackgroundMode, NormalizeOptions};
use serde::Deserialize;

use crate::batch::{alpha_output_path, expand_pattern, BatchError, Job};

/// Root of a job file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Defaults shared by every job
    #[serde(default)]
    pub options: OptionsConfig,
    /// Explicit (source, destination) pairs
    #[serde(default)]
    pub jobs: Vec<JobConfig>,
    /// Glob-matched files
    #[serde(default)]
    pub patterns: Vec<PatternConfig>,
    /// Directory relative paths are resolved against
    #[serde(skip)]
    pub base_dir: PathBuf,
}

/// Partial normalization options. Unset fields fall through to the layer below.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OptionsConfig {
    pub background: Option<BackgroundMode>,
    pub key_threshold: Option<u8>,
    pub flood_tolerance: Option<u32>,
    pub alpha_threshold: Option<u8>,
    pub target_height: Option<u32>,
    /// `false` skips the resize step entirely
    pub resize: Option<bool>,
}

impl OptionsConfig {
    /// Layer these settings over `base`.
    pub fn apply(&self, base: NormalizeOptions) -> NormalizeOptions {
        let mut options = base;
        if let Some(background) = self.background {
            options.background = background;
        }
        if let Some(threshold) = self.key_threshold {
            options.key_threshold = threshold;
        }
        if let Some(tolerance) = self.flood_tolerance {
            options.flood_tolerance = tolerance;
        }
        if let Some(threshold) = self.alpha_threshold {
            options.alpha_threshold = threshold;
        }
        if let Some(height) = self.target_height {
            options.target_height = Some(height);
        }
        if self.resize == Some(false) {
            options.target_height = None;
        }
        options
    }
}

/// One explicit job
#[derive(Debug, Clone, Deserialize)]
pub struct JobConfig {
    pub source: PathBuf,
    /// Output path; the source is overwritten when absent (as PNG when the
    /// source format has no alpha)
    pub dest: Option<PathBuf>,
    #[serde(default)]
    pub options: OptionsConfig,
}

/// Every file matching `pattern`, processed in place unless `out_dir` is set
#[derive(Debug, Clone, Deserialize)]
pub struct PatternConfig {
    pub pattern: String,
    /// Skip files whose name contains any of these substrings
    #[serde(default)]
    pub exclude: Vec<String>,
    pub out_dir: Option<PathBuf>,
    #[serde(default)]
    pub options: OptionsConfig,
}

impl Config {
    /// Load a job file. Relative paths inside it resolve against its directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;

        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Self::parse(&content, base_dir)
    }

    /// Parse job file contents.
    pub fn parse(content: &str, base_dir: PathBuf) -> Result<Self, ConfigError> {
        let mut config: Config =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.base_dir = base_dir;
        Ok(config)
    }

    /// The defaults every job starts from.
    pub fn base_options(&self) -> NormalizeOptions {
        self.options.apply(NormalizeOptions::default())
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_relative() {
            self.base_dir.join(path)
        } else {
            path.to_path_buf()
        }
    }

    /// Flatten explicit jobs and pattern matches into a single job list,
    /// explicit jobs first.
    pub fn jobs(&self) -> Result<Vec<Job>, BatchError> {
        let base = self.base_options();
        let mut jobs = Vec::new();

        for job in &self.jobs {
            let source = self.resolve(&job.source);
            let dest = match &job.dest {
                Some(dest) => self.resolve(dest),
                None => alpha_output_path(&source),
            };
            jobs.push(Job {
                source,
                dest,
                options: job.options.apply(base.clone()),
            });
        }

        for pattern in &self.patterns {
            let resolved = self.resolve(Path::new(&pattern.pattern));
            let out_dir = pattern.out_dir.as_deref().map(|dir| self.resolve(dir));
            let matched = expand_pattern(
                &resolved.to_string_lossy(),
                &pattern.exclude,
                out_dir.as_deref(),
                &pattern.options.apply(base.clone()),
            )?;
            log::info!("Pattern {} matched {} file(s)", pattern.pattern, matched.len());
            jobs.extend(matched);
        }

        Ok(jobs)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(String),
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {}", e),
            Self::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}
