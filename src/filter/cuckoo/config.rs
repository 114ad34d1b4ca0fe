use derive_builder::Builder;

use super::MAX_KICKS;
use crate::{FilterError, Result};

/// Largest capacity hint a filter accepts. The bucket array for it stays within
/// `isize::MAX` bytes, so sizing never overflows even where allocation fails.
pub const MAX_CAPACITY: usize = 1 << (usize::BITS - 4);

#[derive(Clone, Debug, PartialEq, Eq, Builder, serde::Serialize, serde::Deserialize)]
#[builder(pattern = "owned")]
pub struct FilterConfig {
    /// Expected number of elements
    #[builder(default = "1_000_000")]
    pub capacity: usize,

    /// Relocation steps before an insert gives up
    #[builder(default = "MAX_KICKS")]
    pub max_kicks: usize,

    /// Seed for the relocation RNG, random when unset
    #[builder(default, setter(strip_option))]
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            capacity: 1_000_000,
            max_kicks: MAX_KICKS,
            seed: None,
        }
    }
}

impl FilterConfig {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_kicks == 0 {
            return Err(FilterError::InvalidConfig("max_kicks must be > 0".into()));
        }
        if self.capacity > MAX_CAPACITY {
            return Err(FilterError::InvalidConfig(format!(
                "capacity {} exceeds {}",
                self.capacity, MAX_CAPACITY
            )));
        }
        Ok(())
    }
}
