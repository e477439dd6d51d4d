use super::SimulationError;
use crate::config::CacheConfig;

impl CacheConfig {
    /// Cycles for a cache miss with the cache enabled (the cached worst case).
    pub fn cached_miss_cycles(&self) -> u32 {
        self.dram_latency + self.cache_update_cycles + self.dram_cycles_per_word * self.line_size
    }

    /// Cycles for a DRAM row-buffer miss with the cache disabled (the uncached worst case).
    pub fn uncached_miss_cycles(&self) -> u32 {
        self.dram_latency + self.dram_cycles_per_word * self.dram_buffer_size
    }

    /// Worst-case access latency for the given cache state.
    pub fn worst_case_cycles(&self, cache_on: bool) -> u32 {
        if cache_on {
            self.cached_miss_cycles()
        } else {
            self.uncached_miss_cycles()
        }
    }

    fn validate(&self) -> Result<(), SimulationError> {
        let sizes = [
            ("address_space_size", self.address_space_size),
            ("cache_lines", self.cache_lines),
            ("line_size", self.line_size),
            ("dram_buffer_size", self.dram_buffer_size),
        ];
        for (name, value) in sizes {
            if value == 0 {
                return Err(SimulationError::InvalidConfig(format!(
                    "{} must be positive",
                    name
                )));
            }
        }
        Ok(())
    }
}

/// Timing model of a direct-mapped cache in front of DRAM with one row buffer.
///
/// With the cache enabled, a tag hit costs one cycle and a miss fetches the
/// whole line. With it disabled, every access goes to DRAM and only hits the
/// currently open row buffer.
#[derive(Debug, Clone)]
pub struct CacheModel {
    config: CacheConfig,
    tags: Vec<Option<u32>>,
    open_row: Option<u32>,
    enabled: bool,
    last_access_cycles: u32,
}

impl CacheModel {
    /// Create a model with the cache disabled and all state cleared.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidConfig`] if any size is zero.
    pub fn new(config: CacheConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        let lines = config.cache_lines as usize;
        Ok(Self {
            config,
            tags: vec![None; lines],
            open_row: None,
            enabled: false,
            last_access_cycles: 0,
        })
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Invalidate every cache line and close the DRAM row buffer.
    pub fn reset(&mut self) {
        self.tags.iter_mut().for_each(|tag| *tag = None);
        self.open_row = None;
    }

    pub fn enable_cache(&mut self) {
        self.reset();
        self.enabled = true;
    }

    pub fn disable_cache(&mut self) {
        self.reset();
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Perform one word access and return its latency in cycles.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::AddressOutOfRange`] for addresses outside the
    /// address space.
    pub fn access(&mut self, address: u32) -> Result<u32, SimulationError> {
        if address >= self.config.address_space_size {
            return Err(SimulationError::AddressOutOfRange {
                address,
                size: self.config.address_space_size,
            });
        }

        self.last_access_cycles = if self.enabled {
            self.cached_access(address)
        } else {
            self.uncached_access(address)
        };
        Ok(self.last_access_cycles)
    }

    /// Latency of the most recent access.
    pub fn last_access_cycles(&self) -> u32 {
        self.last_access_cycles
    }

    fn cached_access(&mut self, address: u32) -> u32 {
        let tag = address / self.config.line_size;
        let line = (tag % self.config.cache_lines) as usize;

        if self.tags[line] == Some(tag) {
            1
        } else {
            self.tags[line] = Some(tag);
            self.config.cached_miss_cycles()
        }
    }

    fn uncached_access(&mut self, address: u32) -> u32 {
        let row = address / self.config.dram_buffer_size;

        if self.open_row == Some(row) {
            1
        } else {
            self.open_row = Some(row);
            self.config.uncached_miss_cycles()
        }
    }
}
