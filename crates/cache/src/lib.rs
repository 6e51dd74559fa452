//! SVG View Cache Library
//!
//! Bounded LRU cache of decoded drawables keyed by resource identifier,
//! sized from the process memory budget.

pub mod config;
pub mod cost;
pub mod memory_budget;
pub mod resource;
pub mod surface;

pub use config::{CacheConfig, ConfigError};
pub use cost::{CostModel, EntryCost};
pub use memory_budget::{MemoryBudget, MemoryPressure};
pub use resource::{CacheStats, ResourceCache};
pub use surface::{BufferOwner, Detached};
