//! Batch analysis of sample groups.
//!
//! Each group is processed on its own: load the samples, build the empirical
//! CDF, then estimate the mean and the fraction of accesses below the group's
//! worst case. A group that fails is reported as failed and does not stop the
//! remaining groups.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info, warn};
use thiserror::Error;

use cachestat_core::{
    build_ecdf, derive_seed, seeded_rng, Bootstrap, FractionBelow, GroupReport, GroupSummary,
    Mean, SampleGroup, Statistic, StatsError,
};

use crate::config::{BootstrapConfig, GroupSpec};
use crate::loader::{load_samples, LoadError};

/// Errors that can occur while analyzing a single group.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The group's sample file could not be loaded.
    #[error("Failed to load samples for '{label}': {source}")]
    Load {
        label: String,
        #[source]
        source: LoadError,
    },

    /// The engine rejected the group's data for one statistic.
    #[error("Computing {statistic} for '{label}' failed: {source}")]
    Statistic {
        label: String,
        statistic: String,
        #[source]
        source: StatsError,
    },
}

/// Runs the per-group pipeline with one bootstrap configuration.
#[derive(Debug, Clone)]
pub struct Analyzer {
    bootstrap: Bootstrap,
    /// Master seed; group `i` uses the generator seeded with `derive_seed(seed, i)`.
    seed: u64,
}

impl Analyzer {
    pub fn new(bootstrap: Bootstrap, seed: u64) -> Self {
        Self { bootstrap, seed }
    }

    pub fn from_config(config: &BootstrapConfig) -> Self {
        Self::new(
            Bootstrap::new(config.resamples, config.confidence_level),
            config.seed,
        )
    }

    pub fn bootstrap(&self) -> &Bootstrap {
        &self.bootstrap
    }

    /// Analyze one group held in memory.
    ///
    /// `index` is the group's position in the batch and selects its generator
    /// stream, so results do not depend on which other groups ran.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Statistic`] naming the failing step.
    pub fn analyze_group(
        &self,
        group: &SampleGroup,
        index: usize,
    ) -> Result<GroupSummary, AnalysisError> {
        let data = group.as_f64();
        let fail = |statistic: String| {
            let label = group.label.clone();
            move |source| AnalysisError::Statistic {
                label,
                statistic,
                source,
            }
        };

        let ecdf = build_ecdf(&data).map_err(fail("empirical CDF".to_string()))?;
        debug!("{}: built empirical CDF over {} samples", group.label, ecdf.len());

        let mut rng = seeded_rng(derive_seed(self.seed, index as u64));

        let mean = self
            .bootstrap
            .estimate(&mut rng, &Mean, &data)
            .map_err(fail(Mean.name()))?;

        let fraction = FractionBelow::new(group.worst_case as f64);
        let fraction_below = self
            .bootstrap
            .estimate(&mut rng, &fraction, &data)
            .map_err(fail(fraction.name()))?;

        debug!(
            "{}: mean {:.6} [{:.6}, {:.6}], fraction {:.6} [{:.6}, {:.6}]",
            group.label,
            mean.point,
            mean.interval.lower,
            mean.interval.upper,
            fraction_below.point,
            fraction_below.interval.lower,
            fraction_below.interval.upper
        );

        Ok(GroupSummary {
            label: group.label.clone(),
            worst_case: group.worst_case,
            sample_count: data.len(),
            mean,
            fraction_below,
            ecdf: Some(ecdf),
        })
    }

    /// Analyze groups already held in memory, one report per group.
    pub fn analyze_groups(&self, groups: &[SampleGroup]) -> Vec<GroupReport> {
        groups
            .iter()
            .enumerate()
            .map(|(index, group)| match self.analyze_group(group, index) {
                Ok(summary) => GroupReport::completed(summary),
                Err(e) => {
                    warn!("{}", e);
                    GroupReport::failed(&group.label, e.to_string())
                }
            })
            .collect()
    }

    /// Load and analyze every configured group, one report per group.
    ///
    /// Relative sample paths are resolved against `base_dir` when given.
    pub fn run(&self, specs: &[GroupSpec], base_dir: Option<&Path>) -> Vec<GroupReport> {
        specs
            .iter()
            .enumerate()
            .map(|(index, spec)| {
                let path = resolve_path(&spec.path, base_dir);
                info!("Analyzing {} ({})", spec.label, path.display());

                let result = load_samples(&path)
                    .map_err(|source| AnalysisError::Load {
                        label: spec.label.clone(),
                        source,
                    })
                    .and_then(|samples| {
                        let group = SampleGroup::new(&spec.label, samples, spec.worst_case);
                        self.analyze_group(&group, index)
                    });

                match result {
                    Ok(summary) => GroupReport::completed(summary),
                    Err(e) => {
                        warn!("{}", e);
                        GroupReport::failed(&spec.label, e.to_string())
                    }
                }
            })
            .collect()
    }
}

/// Resolve a sample path against an optional base directory.
pub fn resolve_path(path: &Path, base_dir: Option<&Path>) -> PathBuf {
    match base_dir {
        Some(dir) if path.is_relative() => dir.join(path),
        _ => path.to_path_buf(),
    }
}

/// File name for a group's exported CDF, derived from its label.
///
/// "(a) Random,  Cache ON" becomes `a_random_cache_on.ecdf.csv`.
pub fn ecdf_file_name(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    for c in label.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }
    let slug = slug.trim_end_matches('_');
    if slug.is_empty() {
        "group.ecdf.csv".to_string()
    } else {
        format!("{}.ecdf.csv", slug)
    }
}

/// Write a group's empirical CDF as `value,probability` rows for plotting.
///
/// Returns the path written, or `None` if the summary carries no CDF.
pub fn write_ecdf_csv(dir: &Path, summary: &GroupSummary) -> Result<Option<PathBuf>> {
    let Some(ecdf) = &summary.ecdf else {
        return Ok(None);
    };

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    let path = dir.join(ecdf_file_name(&summary.label));
    let file = File::create(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    let mut writer = BufWriter::new(file);
    writeln!(writer, "value,probability")?;
    for (value, probability) in ecdf.points() {
        writeln!(writer, "{},{}", value, probability)?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(Some(path))
}
