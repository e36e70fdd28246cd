//! A library for separating patterns of isotropic non-totalistic Life-like cellular automata
//! into their independent objects.
//!
//! Every connected component of a pattern starts as its own group. The pattern is run with
//! group-aware stepping, merging groups whenever a birth or a knot shows that they interact,
//! until every group is a stable object on its own: a still life, an oscillator, a spaceship,
//! or linear growth.
//!
//! # Example
//!
//! ```rust
//! use lifesep_lib::{
//!     from_rle, ObjectSeparator, PeriodFinder, SeparationRule, SeparatorConfig, TransitionTable,
//! };
//!
//! // A glider and a block.
//! let grid = from_rle("bo$2bo$3o18b2o$21b2o!").unwrap();
//! let rule = SeparationRule::new(TransitionTable::life_like(&[3], &[2, 3])).unwrap();
//!
//! let mut separator = ObjectSeparator::new(grid, &rule);
//! let separation = separator.separate(&PeriodFinder, &SeparatorConfig::default());
//!
//! assert!(separation.is_complete());
//! assert_eq!(separation.objects.len(), 2);
//! ```

#![warn(clippy::missing_const_for_fn)]
#![warn(clippy::use_self)]
#![warn(missing_docs)]

mod classify;
mod config;
mod error;
mod grid;
mod group;
mod knot;
mod rle;
mod rule;
mod separate;
mod step;

pub use classify::{Classification, Classify, PeriodFinder};
pub use config::SeparatorConfig;
pub use error::{ConfigError, RleError, RuleError, TransitionError};
pub use grid::Grid;
pub use group::GroupTracker;
pub use knot::{Knot, KnotFlag, KnotShape, KnotTable};
pub use rle::{from_rle, to_rle};
pub use rule::{TransitionTable, CENTER, TABLE_SIZE};
pub use separate::{
    ObjectSeparator, SeparatedObject, Separation, SeparationRule, SeparationStatus,
};
