//! Entry cost accounting
//!
//! The resource cache enforces `sum(cost(entry)) <= capacity`. How an entry is
//! charged is decided by a [`CostModel`] chosen once when the cache is built,
//! so the unit of the capacity and the unit of the charge always agree.

use serde::{Deserialize, Serialize};

/// Decoded data that knows how much memory it holds.
pub trait EntryCost {
    /// Size of the decoded data in bytes
    fn byte_size(&self) -> usize;
}

impl EntryCost for Vec<u8> {
    fn byte_size(&self) -> usize {
        self.len()
    }
}

impl<T: EntryCost + ?Sized> EntryCost for std::sync::Arc<T> {
    fn byte_size(&self) -> usize {
        (**self).byte_size()
    }
}

/// How an entry is charged against the cache capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CostModel {
    /// Every entry costs one unit; capacity is an entry count
    Unit,
    /// Entries cost their decoded size in kilobytes, rounded up
    #[default]
    Kilobytes,
}

impl CostModel {
    /// Cost of an entry holding `byte_size` bytes. Never returns zero.
    pub fn cost_of(&self, byte_size: usize) -> usize {
        match self {
            CostModel::Unit => 1,
            CostModel::Kilobytes => byte_size.div_ceil(1024).max(1),
        }
    }

    /// Cost of a value under this model
    pub fn weigh<V: EntryCost + ?Sized>(&self, value: &V) -> usize {
        self.cost_of(value.byte_size())
    }

    /// Parse the names accepted in configuration (`unit`, `kilobytes`)
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "unit" => Some(CostModel::Unit),
            "kilobytes" | "kb" => Some(CostModel::Kilobytes),
            _ => None,
        }
    }
}
