use crate::{grid::Grid, rule::TransitionTable};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The number of consecutive equal population differences needed to call growth linear.
const LINEAR_SAMPLES: usize = 8;

/// What a pattern turns out to be after running it for a while.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Classification {
    /// The generation from which the pattern is periodic, dies, or grows linearly.
    ///
    /// [`None`] if nothing was found within the generation limit.
    pub stabilized_at: Option<usize>,

    /// The period of the oscillation or of the linear growth.
    ///
    /// A pattern that dies has period 1.
    pub period: Option<usize>,

    /// The displacement over one period.
    ///
    /// [`None`] for linear growth and unidentified patterns.
    pub displacement: Option<(i64, i64)>,

    /// Whether the population grows linearly.
    pub linear: bool,

    /// Every generation that was computed, shrunk to fit.
    pub phases: Vec<Grid>,
}

impl Classification {
    /// Whether the pattern is periodic from the start and does not die.
    pub fn is_stable(&self) -> bool {
        self.stabilized_at == Some(0) && self.phases.last().is_some_and(|p| !p.is_empty())
    }

    /// The period used to decide how long a collection of objects must stay stable.
    ///
    /// Linear growth counts eight times its period.
    pub fn effective_period(&self) -> usize {
        let period = self.period.unwrap_or(1);
        if self.linear {
            period * 8
        } else {
            period
        }
    }

    /// The apgcode-style prefix of the pattern type: `xs4` for a still life of 4 cells,
    /// `xp2` for an oscillator of period 2, `xq4` for a spaceship of period 4,
    /// `yl144` for linear growth of period 144.
    pub fn prefix(&self) -> Option<String> {
        let period = self.period?;
        if self.linear {
            return Some(format!("yl{period}"));
        }
        let (dx, dy) = self.displacement?;
        Some(if dx != 0 || dy != 0 {
            format!("xq{period}")
        } else if period == 1 {
            let population = self.phases.last().map_or(0, Grid::population);
            format!("xs{population}")
        } else {
            format!("xp{period}")
        })
    }
}

/// Something that can tell what a pattern is.
pub trait Classify {
    /// Classify a pattern under a transition table, computing at most `limit` generations.
    fn classify(&self, pattern: &Grid, table: &TransitionTable, limit: usize) -> Classification;
}

/// A classifier that runs the pattern and compares every generation with the earlier ones,
/// up to translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PeriodFinder;

impl PeriodFinder {
    /// Look for linear growth in the population sequence.
    ///
    /// Returns the period and the generation where the growth starts.
    fn linear_growth(populations: &[usize]) -> Option<(usize, usize)> {
        for period in 1..populations.len() {
            let diffs = populations
                .iter()
                .step_by(period)
                .collect::<Vec<_>>()
                .windows(2)
                .map(|w| *w[1] as i64 - *w[0] as i64)
                .collect::<Vec<_>>();

            if diffs.len() < LINEAR_SAMPLES {
                continue;
            }

            for j in 0..diffs.len() + 1 - LINEAR_SAMPLES {
                if diffs[j] > 0 && diffs[j + 1..].iter().all(|&d| d == diffs[j]) {
                    return Some((period, j));
                }
            }
        }
        None
    }
}

impl Classify for PeriodFinder {
    fn classify(&self, pattern: &Grid, table: &TransitionTable, limit: usize) -> Classification {
        let mut p = pattern.clone();
        p.shrink_to_fit();
        let mut populations = vec![p.population()];
        let mut phases = vec![p.clone()];

        for i in 0..limit {
            p.step(table);
            p.shrink_to_fit();
            let population = p.population();

            if population == 0 {
                phases.push(p);
                return Classification {
                    stabilized_at: Some(i),
                    period: Some(1),
                    displacement: Some((0, 0)),
                    linear: false,
                    phases,
                };
            }

            let repeat =
                (0..=i).find(|&j| populations[j] == population && p.same_shape(&phases[j]));
            if let Some(j) = repeat {
                let (x0, y0) = phases[j].offset();
                let (x1, y1) = p.offset();
                return Classification {
                    stabilized_at: Some(j),
                    period: Some(i + 1 - j),
                    displacement: Some((x1 - x0, y1 - y0)),
                    linear: false,
                    phases,
                };
            }

            populations.push(population);
            phases.push(p.clone());
        }

        match Self::linear_growth(&populations) {
            Some((period, start)) => Classification {
                stabilized_at: Some(start),
                period: Some(period),
                displacement: None,
                linear: true,
                phases,
            },
            None => Classification {
                stabilized_at: None,
                period: None,
                displacement: None,
                linear: false,
                phases,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn life() -> TransitionTable {
        TransitionTable::life_like(&[3], &[2, 3])
    }

    #[test]
    fn test_still_life() {
        let block = Grid::from_cells([(0, 0), (1, 0), (0, 1), (1, 1)]);
        let c = PeriodFinder.classify(&block, &life(), 16);
        assert_eq!(c.stabilized_at, Some(0));
        assert_eq!(c.period, Some(1));
        assert!(c.is_stable());
        assert_eq!(c.prefix().as_deref(), Some("xs4"));
    }

    #[test]
    fn test_oscillator() {
        let blinker = Grid::from_cells([(0, 0), (1, 0), (2, 0)]);
        let c = PeriodFinder.classify(&blinker, &life(), 16);
        assert_eq!(c.period, Some(2));
        assert_eq!(c.displacement, Some((0, 0)));
        assert!(c.is_stable());
        assert_eq!(c.prefix().as_deref(), Some("xp2"));
    }

    #[test]
    fn test_spaceship() {
        let glider = Grid::from_cells([(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)]);
        let c = PeriodFinder.classify(&glider, &life(), 16);
        assert_eq!(c.period, Some(4));
        assert_eq!(c.displacement, Some((1, 1)));
        assert_eq!(c.prefix().as_deref(), Some("xq4"));

        let short = PeriodFinder.classify(&glider, &life(), 3);
        assert_eq!(short.stabilized_at, None);
        assert!(!short.is_stable());
        assert_eq!(short.prefix(), None);
    }

    #[test]
    fn test_death() {
        let pair = Grid::from_cells([(0, 0), (1, 0)]);
        let c = PeriodFinder.classify(&pair, &life(), 16);
        assert_eq!(c.stabilized_at, Some(0));
        assert!(c.phases.last().is_some_and(Grid::is_empty));
        assert!(!c.is_stable());
        assert_eq!(c.prefix().as_deref(), Some("xs0"));
    }

    #[test]
    fn test_transient() {
        // A pre-block becomes a block after one generation.
        let preblock = Grid::from_cells([(0, 0), (1, 0), (0, 1)]);
        let c = PeriodFinder.classify(&preblock, &life(), 16);
        assert_eq!(c.stabilized_at, Some(1));
        assert!(!c.is_stable());
    }

    #[test]
    fn test_linear_growth() {
        let populations = (0..40).map(|i| 10 + 3 * i).collect::<Vec<_>>();
        assert_eq!(PeriodFinder::linear_growth(&populations), Some((1, 0)));

        let flat = vec![5; 40];
        assert_eq!(PeriodFinder::linear_growth(&flat), None);
    }
}
