//! Configuration loading for cachestat.
//!
//! Supports loading configuration from TOML files, with sensible defaults
//! for all settings.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration for cachestat.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Settings for bootstrap confidence intervals.
    pub bootstrap: BootstrapConfig,
    /// The sample groups to analyze.
    pub groups: Vec<GroupSpec>,
    /// Settings for generating samples from the cache model.
    pub simulation: SimulationConfig,
    /// Geometry and timings of the simulated memory system.
    pub cache: CacheConfig,
}

/// Configuration for bootstrap estimation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Number of resamples per confidence interval.
    pub resamples: usize,
    /// Confidence level of the intervals (e.g., 0.95 for 95% confidence).
    pub confidence_level: f64,
    /// Master seed; every group derives its own generator from it.
    pub seed: u64,
}

/// One input group: a label, the sample file and its worst-case latency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSpec {
    pub label: String,
    pub path: PathBuf,
    /// Worst-case access latency in cycles.
    pub worst_case: i64,
}

impl GroupSpec {
    pub fn new(label: impl Into<String>, path: impl Into<PathBuf>, worst_case: i64) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
            worst_case,
        }
    }
}

/// Configuration for the sample simulator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of accesses simulated per group.
    pub trials: usize,
    /// Directory the sample files are written to.
    pub output_dir: PathBuf,
    /// Initial xoshiro128** state.
    pub seed_state: [u32; 4],
    /// Mix of the locality access pattern.
    pub locality: LocalityConfig,
}

/// Probabilities of the locality access pattern; the remainder is uniform.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalityConfig {
    /// Probability of accessing the next word.
    pub sequential: f64,
    /// Probability of a short jump within `near_radius` words.
    pub near: f64,
    /// Maximum distance of a short jump, in words.
    pub near_radius: u32,
}

/// Memory system parameters. Sizes are in words, timings in cycles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub address_space_size: u32,
    pub cache_lines: u32,
    pub line_size: u32,
    pub dram_buffer_size: u32,
    pub dram_latency: u32,
    pub dram_cycles_per_word: u32,
    pub cache_update_cycles: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bootstrap: BootstrapConfig::default(),
            groups: default_groups(),
            simulation: SimulationConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            resamples: 2000,
            confidence_level: 0.95,
            seed: 12345,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            trials: 100_000,
            output_dir: PathBuf::from("."),
            seed_state: [1, 4, 7, 3],
            locality: LocalityConfig::default(),
        }
    }
}

impl Default for LocalityConfig {
    fn default() -> Self {
        Self {
            sequential: 0.60,
            near: 0.35,
            near_radius: 40,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        // Worst cases: 10 + 1 + 1 * 8 = 19 cycles with the cache, 10 + 1 * 2 = 12 without.
        Self {
            address_space_size: 4096,
            cache_lines: 32,
            line_size: 8,
            dram_buffer_size: 2,
            dram_latency: 10,
            dram_cycles_per_word: 1,
            cache_update_cycles: 1,
        }
    }
}

/// The four standard groups: random and locality workloads, cache on and off.
pub fn default_groups() -> Vec<GroupSpec> {
    vec![
        GroupSpec::new("(a) Random,  Cache ON", "random_on.csv", 19),
        GroupSpec::new("(a) Random,  Cache OFF", "random_off.csv", 12),
        GroupSpec::new("(b) Locality, Cache ON", "locality_on.csv", 19),
        GroupSpec::new("(b) Locality, Cache OFF", "locality_off.csv", 12),
    ]
}

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = ".cachestat.toml";

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the TOML configuration file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load configuration from the default file (`.cachestat.toml`) or use defaults.
    ///
    /// If the file doesn't exist, default configuration is returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load_or_default() -> Result<Config> {
        let path = Path::new(DEFAULT_CONFIG_FILE);

        if path.exists() {
            Self::load(path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load configuration from the specified path, or try the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the specified file cannot be read or parsed.
    pub fn load_from(path: Option<&Path>) -> Result<Config> {
        match path {
            Some(p) => Self::load(p),
            None => Self::load_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.bootstrap.resamples, 2000);
        assert_eq!(config.bootstrap.confidence_level, 0.95);
        assert_eq!(config.bootstrap.seed, 12345);
        assert_eq!(config.groups.len(), 4);
        assert_eq!(config.groups[0].label, "(a) Random,  Cache ON");
        assert_eq!(config.groups[0].worst_case, 19);
        assert_eq!(config.groups[3].path, PathBuf::from("locality_off.csv"));
        assert_eq!(config.groups[3].worst_case, 12);
        assert_eq!(config.simulation.trials, 100_000);
        assert_eq!(config.simulation.seed_state, [1, 4, 7, 3]);
        assert_eq!(config.simulation.locality.sequential, 0.60);
        assert_eq!(config.simulation.locality.near, 0.35);
        assert_eq!(config.simulation.locality.near_radius, 40);
    }

    #[test]
    fn test_load_partial_config() {
        let toml_content = r#"
[bootstrap]
resamples = 500

[simulation]
trials = 1000
"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(toml_content.as_bytes()).unwrap();

        let config = Config::load(file.path()).unwrap();

        // Overridden values
        assert_eq!(config.bootstrap.resamples, 500);
        assert_eq!(config.simulation.trials, 1000);

        // Default values
        assert_eq!(config.bootstrap.confidence_level, 0.95);
        assert_eq!(config.groups, default_groups());
        assert_eq!(config.cache, CacheConfig::default());
    }

    #[test]
    fn test_load_full_config() {
        let toml_content = r#"
[bootstrap]
resamples = 1000
confidence_level = 0.99
seed = 7

[[groups]]
label = "hot loop"
path = "data/hot.txt"
worst_case = 30

[simulation]
trials = 5000
output_dir = "out"
seed_state = [9, 8, 7, 6]

[simulation.locality]
sequential = 0.5
near = 0.25
near_radius = 16

[cache]
address_space_size = 1024
cache_lines = 16
line_size = 4
dram_buffer_size = 8
dram_latency = 20
dram_cycles_per_word = 2
cache_update_cycles = 3
"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(toml_content.as_bytes()).unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.bootstrap.resamples, 1000);
        assert_eq!(config.bootstrap.confidence_level, 0.99);
        assert_eq!(config.bootstrap.seed, 7);
        assert_eq!(
            config.groups,
            vec![GroupSpec::new("hot loop", "data/hot.txt", 30)]
        );
        assert_eq!(config.simulation.trials, 5000);
        assert_eq!(config.simulation.output_dir, PathBuf::from("out"));
        assert_eq!(config.simulation.seed_state, [9, 8, 7, 6]);
        assert_eq!(config.simulation.locality.sequential, 0.5);
        assert_eq!(config.simulation.locality.near, 0.25);
        assert_eq!(config.simulation.locality.near_radius, 16);
        assert_eq!(config.cache.address_space_size, 1024);
        assert_eq!(config.cache.cache_lines, 16);
        assert_eq!(config.cache.line_size, 4);
        assert_eq!(config.cache.dram_buffer_size, 8);
        assert_eq!(config.cache.dram_latency, 20);
        assert_eq!(config.cache.dram_cycles_per_word, 2);
        assert_eq!(config.cache.cache_update_cycles, 3);
    }

    #[test]
    fn test_load_from_explicit_path() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[bootstrap]\nseed = 99\n").unwrap();

        let config = Config::load_from(Some(file.path())).unwrap();

        assert_eq!(config.bootstrap.seed, 99);
        assert_eq!(config.bootstrap.resamples, 2000);
    }

    #[test]
    fn test_load_from_missing_explicit_path_fails() {
        let result = Config::load_from(Some(Path::new("/nonexistent/path/config.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_without_path() {
        // Tests run from the crate directory, which has no config file.
        assert!(!Path::new(DEFAULT_CONFIG_FILE).exists());

        let config = Config::load_from(None).unwrap();
        assert_eq!(config.bootstrap.resamples, 2000);
        assert_eq!(config.groups, default_groups());
        assert_eq!(config.cache, CacheConfig::default());
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load(Path::new("/nonexistent/path/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"this is not valid toml {{{{").unwrap();

        let result = Config::load(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.bootstrap.seed, parsed.bootstrap.seed);
        assert_eq!(config.groups, parsed.groups);
        assert_eq!(config.cache, parsed.cache);
        assert_eq!(config.simulation.seed_state, parsed.simulation.seed_state);
    }
}
