//! Index generation: extract → allocate → write.
//!
//! A run either completes and leaves the merged index on disk, or fails
//! before the index is touched.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::allocate::{Allocation, Allocator, EnvMarkedScheme, IdentifierScheme, IndexEntry, LevelFilter};
use crate::config::KrillConfig;
use crate::errors::{ConfigError, ExtractionError, GenerateError};
use crate::extract::{CallSite, SourceScan};
use crate::index::write_index;

/// Per-run generation options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    pub prefix: String,
    /// Levels that get identifiers; empty admits all.
    pub levels: LevelFilter,
    /// Use the environment scheme instead of the plain one.
    pub env_identifier: bool,
}

impl GenerateOptions {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::default()
        }
    }

    pub fn with_levels(mut self, levels: LevelFilter) -> Self {
        self.levels = levels;
        self
    }

    pub fn with_env_identifier(mut self, env_identifier: bool) -> Self {
        self.env_identifier = env_identifier;
        self
    }
}

/// What a generation run wrote.
#[derive(Debug, Clone)]
pub struct GenerateSummary {
    pub root_key: String,
    pub output_path: PathBuf,
    /// Entries produced by this run, in allocation order.
    pub entries: Vec<IndexEntry>,
    pub filtered_out: usize,
}

/// Builds identifier indexes from source files.
#[derive(Clone)]
pub struct Generator {
    config: KrillConfig,
    env_scheme: Option<Arc<dyn IdentifierScheme>>,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(KrillConfig::default())
    }
}

impl Generator {
    /// The environment scheme comes from `[identifier].env_marker`, if set.
    pub fn new(config: KrillConfig) -> Self {
        let env_scheme = EnvMarkedScheme::from_config(&config.identifier)
            .map(|scheme| Arc::new(scheme) as Arc<dyn IdentifierScheme>);
        Self { config, env_scheme }
    }

    /// Generator configured from the project at `root`: `krill.toml` there,
    /// `~/.krill/config.toml` and `KRILL_*` variables, layered by
    /// [`KrillConfig::load`].
    pub fn from_project(root: &Path) -> Result<Self, ConfigError> {
        Ok(Self::new(KrillConfig::load(root, None)?))
    }

    /// Replace the environment scheme used when `env_identifier` is set.
    pub fn with_env_scheme(mut self, scheme: Arc<dyn IdentifierScheme>) -> Self {
        self.env_scheme = Some(scheme);
        self
    }

    pub fn config(&self) -> &KrillConfig {
        &self.config
    }

    /// Options seeded from config: configured prefix, all levels, plain scheme.
    pub fn default_options(&self) -> GenerateOptions {
        GenerateOptions::new(self.config.identifier.effective_prefix())
    }

    /// Extract and allocate from in-memory source text. No I/O.
    pub fn build_entries(
        &self,
        source: &str,
        root_key: &str,
        options: &GenerateOptions,
    ) -> Result<Allocation, GenerateError> {
        let scan = SourceScan::parse(source)?;
        self.allocate_scan(&scan, root_key, options)
    }

    /// Generate entries for `source_path` under `root_key` and merge them
    /// into the index at `output_path`.
    pub fn generate(
        &self,
        source_path: &Path,
        root_key: &str,
        output_path: &Path,
        options: &GenerateOptions,
    ) -> Result<GenerateSummary, GenerateError> {
        let scan = SourceScan::from_path(source_path)?;
        self.run(&scan, source_path, root_key, output_path, options)
    }

    /// Like [`Generator::generate`], with the root key taken from the
    /// source file's own declaration (`CKRILL_API_KEY = "..."` by default).
    pub fn generate_declared(
        &self,
        source_path: &Path,
        output_path: &Path,
        options: &GenerateOptions,
    ) -> Result<GenerateSummary, GenerateError> {
        let scan = SourceScan::from_path(source_path)?;
        let variable = self.config.extract.effective_root_key_variable();
        let root_key = scan
            .declared_root_key(variable)
            .ok_or_else(|| ExtractionError::MissingRootKey {
                variable: variable.to_string(),
            })?;
        self.run(&scan, source_path, &root_key, output_path, options)
    }

    fn run(
        &self,
        scan: &SourceScan,
        source_path: &Path,
        root_key: &str,
        output_path: &Path,
        options: &GenerateOptions,
    ) -> Result<GenerateSummary, GenerateError> {
        let start = Instant::now();
        let allocation = self.allocate_scan(scan, root_key, options)?;
        write_index(output_path, root_key, &allocation.entries)?;

        tracing::info!(
            source = %source_path.display(),
            output = %output_path.display(),
            root_key,
            allocated = allocation.entries.len(),
            filtered_out = allocation.filtered_out,
            duration_ms = start.elapsed().as_millis() as u64,
            "identifier index generated"
        );
        Ok(GenerateSummary {
            root_key: root_key.to_string(),
            output_path: output_path.to_path_buf(),
            entries: allocation.entries,
            filtered_out: allocation.filtered_out,
        })
    }

    fn allocate_scan(
        &self,
        scan: &SourceScan,
        root_key: &str,
        options: &GenerateOptions,
    ) -> Result<Allocation, GenerateError> {
        if root_key.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "root_key".to_string(),
                message: "must not be empty".to_string(),
            }
            .into());
        }
        let allocator = self.allocator(options)?;
        let sites = scan.call_sites().collect::<Result<Vec<CallSite>, _>>()?;
        Ok(allocator.allocate(root_key, sites))
    }

    fn allocator(&self, options: &GenerateOptions) -> Result<Allocator, ConfigError> {
        let allocator = Allocator::new(options.prefix.clone(), options.levels)
            .with_width(self.config.identifier.effective_min_width());
        if !options.env_identifier {
            return Ok(allocator);
        }
        match &self.env_scheme {
            Some(scheme) => Ok(allocator.with_scheme(Arc::clone(scheme))),
            None => Err(ConfigError::MissingValue {
                field: "identifier.env_marker".to_string(),
            }),
        }
    }
}

/// Generate the index for one source file.
///
/// Configuration comes from compiled defaults plus `KRILL_*` environment
/// variables only; no `krill.toml` is read, so the result does not depend
/// on the working directory. `env_identifier` therefore needs
/// `KRILL_IDENTIFIER_ENV_MARKER`. Use [`Generator::from_project`] for
/// project and user config files, or [`Generator::with_env_scheme`] for an
/// explicit scheme.
pub fn generate<S: AsRef<str>>(
    source_path: impl AsRef<Path>,
    root_key: &str,
    output_path: impl AsRef<Path>,
    prefix: &str,
    target_levels: &[S],
    env_identifier: bool,
) -> Result<GenerateSummary, GenerateError> {
    let options = GenerateOptions::new(prefix)
        .with_levels(LevelFilter::from_names(target_levels)?)
        .with_env_identifier(env_identifier);
    Generator::new(KrillConfig::from_env()?).generate(
        source_path.as_ref(),
        root_key,
        output_path.as_ref(),
        &options,
    )
}
