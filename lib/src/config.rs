use crate::error::ConfigError;
#[cfg(feature = "clap")]
use clap::Args;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The configuration of an object separation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(Args))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SeparatorConfig {
    /// Maximum number of generations to run each candidate object for when classifying it.
    ///
    /// Objects whose period is larger than this are never considered stable.
    #[cfg_attr(feature = "clap", arg(short = 'l', long, default_value = "256"))]
    pub generation_limit: usize,

    /// Maximum number of generations to run the whole pattern for before giving up.
    ///
    /// When this is reached, the separation is retried once with recursive refinement
    /// at every step, and then a partial result is reported.
    #[cfg_attr(feature = "clap", arg(short = 'm', long, default_value = "256"))]
    pub max_generations: usize,

    /// Recursion depth for candidates made of several disconnected pieces.
    ///
    /// Such a candidate is separated again by a fresh separator with one less depth.
    /// `0` disables recursion.
    #[cfg_attr(feature = "clap", arg(short, long, default_value = "1"))]
    pub depth: usize,
}

impl Default for SeparatorConfig {
    fn default() -> Self {
        Self {
            generation_limit: 256,
            max_generations: 256,
            depth: 1,
        }
    }
}

impl SeparatorConfig {
    /// Create a new configuration.
    #[inline]
    pub const fn new(generation_limit: usize, max_generations: usize) -> Self {
        Self {
            generation_limit,
            max_generations,
            depth: 1,
        }
    }

    /// Set the classification limit.
    ///
    /// See [`generation_limit`](SeparatorConfig::generation_limit) for more details.
    #[inline]
    pub const fn with_generation_limit(mut self, generation_limit: usize) -> Self {
        self.generation_limit = generation_limit;
        self
    }

    /// Set the maximum number of generations.
    ///
    /// See [`max_generations`](SeparatorConfig::max_generations) for more details.
    #[inline]
    pub const fn with_max_generations(mut self, max_generations: usize) -> Self {
        self.max_generations = max_generations;
        self
    }

    /// Set the recursion depth.
    ///
    /// See [`depth`](SeparatorConfig::depth) for more details.
    #[inline]
    pub const fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Check whether the configuration is valid.
    pub const fn check(self) -> Result<Self, ConfigError> {
        if self.generation_limit == 0 || self.max_generations == 0 {
            return Err(ConfigError::InvalidLimit);
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check() {
        assert!(SeparatorConfig::default().check().is_ok());
        assert_eq!(
            SeparatorConfig::new(0, 10).check(),
            Err(ConfigError::InvalidLimit)
        );
        let config = SeparatorConfig::new(16, 64).with_depth(0).check().unwrap();
        assert_eq!(config.depth, 0);
        assert_eq!(config.with_max_generations(8).max_generations, 8);
    }
}
