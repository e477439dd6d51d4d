//! Cache latency simulator that produces the sample files.
//!
//! Addresses are drawn from a xoshiro128** generator under one of two access
//! patterns and replayed against a [`CacheModel`]; the latency of every access
//! is recorded as one sample.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro128StarStar;
use thiserror::Error;

use crate::config::{default_groups, CacheConfig, GroupSpec, LocalityConfig, SimulationConfig};

mod cache;
pub use cache::CacheModel;

/// Errors that can occur while simulating.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// An access fell outside the simulated address space.
    #[error("Address {address} out of range (address space is {size} words)")]
    AddressOutOfRange { address: u32, size: u32 },

    /// The cache or locality configuration cannot be simulated.
    #[error("Invalid simulation config: {0}")]
    InvalidConfig(String),
}

/// How successive addresses are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// Every address uniform over the address space.
    Uniform,
    /// Mostly sequential, sometimes a short jump, rarely uniform.
    Locality,
}

/// Samples produced for one standard group.
#[derive(Debug, Clone)]
pub struct SimulatedGroup {
    /// Label, output file name and worst case of the group.
    pub spec: GroupSpec,
    pub samples: Vec<i64>,
}

/// Fixed-point resolution of the locality probabilities.
const LOCALITY_SCALE: u32 = 10_000;

/// Largest jump radius whose span `2 * radius + 1` fits a 32-bit draw.
pub const MAX_NEAR_RADIUS: u32 = (u32::MAX - 1) / 2;

/// Drives a [`CacheModel`] with generated address streams.
pub struct Simulator {
    model: CacheModel,
    rng: Xoshiro128StarStar,
    locality: LocalityConfig,
}

impl Simulator {
    /// Create a simulator.
    ///
    /// `seed_state` is the generator's initial 128-bit state as four words; it
    /// must not be all zero.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidConfig`] for unusable cache sizes, a
    /// locality mix outside `[0, 1]`, a zero jump radius or an all-zero seed.
    pub fn new(
        cache: CacheConfig,
        locality: LocalityConfig,
        seed_state: [u32; 4],
    ) -> Result<Self, SimulationError> {
        validate_locality(&locality, cache.address_space_size)?;
        if seed_state == [0; 4] {
            return Err(SimulationError::InvalidConfig(
                "generator state must not be all zero".to_string(),
            ));
        }

        let mut seed = [0u8; 16];
        for (chunk, word) in seed.chunks_exact_mut(4).zip(seed_state) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }

        Ok(Self {
            model: CacheModel::new(cache)?,
            rng: Xoshiro128StarStar::from_seed(seed),
            locality,
        })
    }

    pub fn from_config(
        simulation: &SimulationConfig,
        cache: &CacheConfig,
    ) -> Result<Self, SimulationError> {
        Self::new(
            cache.clone(),
            simulation.locality.clone(),
            simulation.seed_state,
        )
    }

    pub fn model(&self) -> &CacheModel {
        &self.model
    }

    /// Pseudo-random integer in `[0, bound)`.
    fn rand_int(&mut self, bound: u32) -> u32 {
        self.rng.next_u32() % bound
    }

    /// A uniformly random address.
    pub fn uniform_address(&mut self) -> u32 {
        self.rand_int(self.model.config().address_space_size)
    }

    /// The address following `current` under `pattern`.
    pub fn next_address(&mut self, pattern: Pattern, current: u32) -> u32 {
        match pattern {
            Pattern::Uniform => self.uniform_address(),
            Pattern::Locality => self.next_local_address(current),
        }
    }

    fn next_local_address(&mut self, current: u32) -> u32 {
        let sequential = to_fixed_point(self.locality.sequential);
        let near = sequential + to_fixed_point(self.locality.near);
        let r = self.rand_int(LOCALITY_SCALE);

        if r < sequential {
            self.wrap(current as i64 + 1)
        } else if r < near {
            let radius = self.locality.near_radius;
            let span = 2 * radius + 1;
            // 0 and +1 would be a repeat or a sequential access.
            let delta = loop {
                let d = self.rand_int(span) as i64 - radius as i64;
                if d != 0 && d != 1 {
                    break d;
                }
            };
            self.wrap(current as i64 + delta)
        } else {
            self.uniform_address()
        }
    }

    fn wrap(&self, address: i64) -> u32 {
        address.rem_euclid(self.model.config().address_space_size as i64) as u32
    }

    /// Simulate `trials` accesses and return the latency of each.
    ///
    /// The cache is switched on or off (clearing its state) first, and the
    /// address stream starts from `start`.
    pub fn run(
        &mut self,
        trials: usize,
        cache_on: bool,
        pattern: Pattern,
        start: u32,
    ) -> Result<Vec<i64>, SimulationError> {
        if cache_on {
            self.model.enable_cache();
        } else {
            self.model.disable_cache();
        }

        let mut samples = Vec::with_capacity(trials);
        let mut address = start;
        for _ in 0..trials {
            address = self.next_address(pattern, address);
            let cycles = self.model.access(address)?;
            samples.push(cycles as i64);
        }
        Ok(samples)
    }

    /// Produce the four standard groups in order: random on/off, then
    /// locality on/off. Both locality runs share one random start address.
    pub fn run_all(&mut self, trials: usize) -> Result<Vec<SimulatedGroup>, SimulationError> {
        let runs = [
            (true, Pattern::Uniform),
            (false, Pattern::Uniform),
            (true, Pattern::Locality),
            (false, Pattern::Locality),
        ];

        let mut locality_start = None;
        let mut groups = Vec::with_capacity(runs.len());

        for (mut spec, (cache_on, pattern)) in default_groups().into_iter().zip(runs) {
            let start = match pattern {
                Pattern::Uniform => 0,
                Pattern::Locality => {
                    *locality_start.get_or_insert_with(|| self.uniform_address())
                }
            };
            let samples = self.run(trials, cache_on, pattern, start)?;
            spec.worst_case = self.model.config().worst_case_cycles(cache_on) as i64;
            groups.push(SimulatedGroup { spec, samples });
        }

        Ok(groups)
    }
}

fn to_fixed_point(probability: f64) -> u32 {
    (probability * LOCALITY_SCALE as f64 + 0.5) as u32
}

fn validate_locality(locality: &LocalityConfig, address_space: u32) -> Result<(), SimulationError> {
    let in_unit = |p: f64| (0.0..=1.0).contains(&p);
    if !in_unit(locality.sequential)
        || !in_unit(locality.near)
        || locality.sequential + locality.near > 1.0 + 1e-9
    {
        return Err(SimulationError::InvalidConfig(format!(
            "locality probabilities must lie in [0, 1] and sum to at most 1 (sequential={}, near={})",
            locality.sequential, locality.near
        )));
    }
    let limit = MAX_NEAR_RADIUS.min(address_space.saturating_sub(1));
    if locality.near_radius == 0 || locality.near_radius > limit {
        return Err(SimulationError::InvalidConfig(format!(
            "near_radius must be between 1 and {}, got {}",
            limit, locality.near_radius
        )));
    }
    Ok(())
}

/// Write samples to `path`, one integer per line.
pub fn write_samples(path: &Path, samples: &[i64]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }

    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for sample in samples {
        writeln!(writer, "{}", sample)?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simulator() -> Simulator {
        Simulator::new(
            CacheConfig::default(),
            LocalityConfig::default(),
            [1, 4, 7, 3],
        )
        .unwrap()
    }

    #[test]
    fn test_same_state_same_samples() {
        let a = simulator().run(1000, true, Pattern::Locality, 0).unwrap();
        let b = simulator().run(1000, true, Pattern::Locality, 0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_samples_are_hit_or_worst_case() {
        let mut sim = simulator();
        for &(cache_on, worst) in &[(true, 19), (false, 12)] {
            for pattern in [Pattern::Uniform, Pattern::Locality] {
                let samples = sim.run(2000, cache_on, pattern, 0).unwrap();
                assert_eq!(samples.len(), 2000);
                assert!(samples.iter().all(|&s| s == 1 || s == worst));
            }
        }
    }

    #[test]
    fn test_locality_hits_more_than_uniform() {
        let mut sim = simulator();
        let hits = |samples: &[i64]| samples.iter().filter(|&&s| s == 1).count();

        let uniform = sim.run(20_000, true, Pattern::Uniform, 0).unwrap();
        let local = sim.run(20_000, true, Pattern::Locality, 0).unwrap();

        assert!(hits(&local) > 2 * hits(&uniform));
    }

    #[test]
    fn test_sequential_only_walks_forward() {
        let locality = LocalityConfig {
            sequential: 1.0,
            near: 0.0,
            near_radius: 40,
        };
        let mut sim = Simulator::new(CacheConfig::default(), locality, [1, 4, 7, 3]).unwrap();

        assert_eq!(sim.next_address(Pattern::Locality, 10), 11);
        assert_eq!(sim.next_address(Pattern::Locality, 4095), 0);
    }

    #[test]
    fn test_near_jumps_stay_in_radius() {
        let locality = LocalityConfig {
            sequential: 0.0,
            near: 1.0,
            near_radius: 5,
        };
        let mut sim = Simulator::new(CacheConfig::default(), locality, [1, 4, 7, 3]).unwrap();

        for _ in 0..500 {
            let next = sim.next_address(Pattern::Locality, 100) as i64;
            let delta = next - 100;
            assert!((-5..=5).contains(&delta));
            assert!(delta != 0 && delta != 1);
        }
    }

    #[test]
    fn test_run_all_standard_groups() {
        let groups = simulator().run_all(500).unwrap();
        let labels: Vec<&str> = groups.iter().map(|g| g.spec.label.as_str()).collect();

        assert_eq!(
            labels,
            vec![
                "(a) Random,  Cache ON",
                "(a) Random,  Cache OFF",
                "(b) Locality, Cache ON",
                "(b) Locality, Cache OFF",
            ]
        );
        let worst: Vec<i64> = groups.iter().map(|g| g.spec.worst_case).collect();
        assert_eq!(worst, vec![19, 12, 19, 12]);
        assert!(groups.iter().all(|g| g.samples.len() == 500));
    }

    #[test]
    fn test_invalid_locality_rejected() {
        let locality = LocalityConfig {
            sequential: 0.8,
            near: 0.4,
            near_radius: 40,
        };
        assert!(matches!(
            Simulator::new(CacheConfig::default(), locality, [1, 4, 7, 3]),
            Err(SimulationError::InvalidConfig(_))
        ));

        let locality = LocalityConfig {
            near_radius: 0,
            ..LocalityConfig::default()
        };
        assert!(matches!(
            Simulator::new(CacheConfig::default(), locality, [1, 4, 7, 3]),
            Err(SimulationError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_oversized_radius_rejected() {
        let cache = CacheConfig {
            address_space_size: 4_000_000_000,
            ..CacheConfig::default()
        };
        let locality = LocalityConfig {
            sequential: 0.0,
            near: 1.0,
            near_radius: 3_000_000_000,
        };

        let err = Simulator::new(cache, locality, [1, 4, 7, 3]).err();
        match err {
            Some(SimulationError::InvalidConfig(message)) => {
                assert!(message.contains("near_radius"))
            }
            other => panic!("unexpected result: {:?}", other.map(|e| e.to_string())),
        }
    }

    #[test]
    fn test_largest_radius_on_large_address_space() {
        let cache = CacheConfig {
            address_space_size: 4_000_000_000,
            ..CacheConfig::default()
        };
        let locality = LocalityConfig {
            sequential: 0.0,
            near: 1.0,
            near_radius: MAX_NEAR_RADIUS,
        };
        let mut sim = Simulator::new(cache, locality, [1, 4, 7, 3]).unwrap();

        for _ in 0..100 {
            let next = sim.next_address(Pattern::Locality, 2_000_000_000);
            assert!(next < 4_000_000_000);
        }
    }

    #[test]
    fn test_radius_must_be_below_address_space() {
        let locality = LocalityConfig {
            near_radius: 4096,
            ..LocalityConfig::default()
        };
        assert!(matches!(
            Simulator::new(CacheConfig::default(), locality, [1, 4, 7, 3]),
            Err(SimulationError::InvalidConfig(_))
        ));

        let locality = LocalityConfig {
            near_radius: 4095,
            ..LocalityConfig::default()
        };
        assert!(Simulator::new(CacheConfig::default(), locality, [1, 4, 7, 3]).is_ok());
    }

    #[test]
    fn test_zero_seed_rejected() {
        assert!(matches!(
            Simulator::new(CacheConfig::default(), LocalityConfig::default(), [0; 4]),
            Err(SimulationError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_write_samples() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("random_on.csv");

        write_samples(&path, &[19, 1, 1]).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "19\n1\n1\n");
    }
}
