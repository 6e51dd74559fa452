//! Memory budget used to size the resource cache
//!
//! The cache is sized once, as a fraction of the memory the process may use,
//! expressed in kilobytes. This module owns that calculation and the memory
//! pressure levels reported by cache statistics.

use sysinfo::System;
use tracing::warn;

/// Fraction of the process memory given to the cache, as a divisor
pub const DEFAULT_MEMORY_DIVISOR: usize = 8;

/// Max memory assumed when the host cannot be probed
pub const FALLBACK_MAX_MEMORY: u64 = 256 * 1024 * 1024;

/// Memory pressure level indicating cache health
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MemoryPressure {
    /// Memory usage is low (< 50% utilization)
    Low,
    /// Memory usage is moderate (50-75% utilization)
    Moderate,
    /// Memory usage is high (75-90% utilization)
    High,
    /// Memory usage is critical (> 90% utilization)
    Critical,
}

impl MemoryPressure {
    /// Get the memory pressure level from a utilization ratio (0.0 to 1.0)
    pub fn from_utilization(utilization: f64) -> Self {
        if utilization < 0.5 {
            MemoryPressure::Low
        } else if utilization < 0.75 {
            MemoryPressure::Moderate
        } else if utilization < 0.90 {
            MemoryPressure::High
        } else {
            MemoryPressure::Critical
        }
    }

    /// Returns true if memory pressure requires action (High or Critical)
    pub fn needs_eviction(&self) -> bool {
        matches!(self, MemoryPressure::High | MemoryPressure::Critical)
    }
}

/// Memory available to the process and the share of it given to the cache
///
/// # Example
///
/// ```
/// use svg_view_cache::MemoryBudget;
///
/// // 512 MiB process budget, one-eighth for the cache
/// let budget = MemoryBudget::with_max_memory(512 * 1024 * 1024);
/// assert_eq!(budget.cache_capacity_kb(), 64 * 1024);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryBudget {
    max_memory_bytes: u64,
    divisor: usize,
}

impl MemoryBudget {
    /// Probe the host for its total memory
    ///
    /// Falls back to [`FALLBACK_MAX_MEMORY`] if the platform reports nothing.
    pub fn from_system() -> Self {
        let mut system = System::new();
        system.refresh_memory();

        Self::from_total(system.total_memory())
    }

    /// Use a probed total memory in bytes, where zero means the probe failed
    pub fn from_total(total: u64) -> Self {
        if total == 0 {
            warn!(
                fallback_bytes = FALLBACK_MAX_MEMORY,
                "could not read total memory, using fallback budget"
            );
            return Self::with_max_memory(FALLBACK_MAX_MEMORY);
        }

        Self::with_max_memory(total)
    }

    /// Use a known max memory in bytes
    pub fn with_max_memory(max_memory_bytes: u64) -> Self {
        Self {
            max_memory_bytes,
            divisor: DEFAULT_MEMORY_DIVISOR,
        }
    }

    /// Give the cache `1 / divisor` of the max memory. Zero is treated as one.
    pub fn with_divisor(mut self, divisor: usize) -> Self {
        self.divisor = divisor.max(1);
        self
    }

    /// Max memory in bytes
    pub fn max_memory_bytes(&self) -> u64 {
        self.max_memory_bytes
    }

    /// Max memory in whole kilobytes
    pub fn max_memory_kb(&self) -> u64 {
        self.max_memory_bytes / 1024
    }

    pub fn divisor(&self) -> usize {
        self.divisor
    }

    /// Cache capacity in kilobytes
    pub fn cache_capacity_kb(&self) -> usize {
        let capacity = self.max_memory_kb() / self.divisor as u64;
        usize::try_from(capacity).unwrap_or(usize::MAX)
    }
}
