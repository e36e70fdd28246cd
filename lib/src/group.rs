//! Group labels for the living cells of a grid.
//!
//! A group is a provisional object. Groups start as the connected components of the pattern
//! and only ever merge.

use crate::grid::Grid;
use std::collections::{BTreeSet, HashMap};

/// Group labels of the living cells of a grid, with the history of merged groups.
///
/// Label `0` means no group. Merging is eager: every cell of the merged group is relabeled
/// immediately, so the label buffer only ever holds resolved labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupTracker {
    /// One label per cell, in the same layout as the grid.
    labels: Vec<u32>,

    /// Merged groups, mapping each to the group it was merged into.
    reassigned: HashMap<u32, u32>,

    /// The next fresh label.
    next: u32,
}

impl Default for GroupTracker {
    fn default() -> Self {
        Self {
            labels: Vec::new(),
            reassigned: HashMap::new(),
            next: 1,
        }
    }
}

impl GroupTracker {
    /// Give every king-wise connected component of living cells its own label.
    ///
    /// A single raster scan: a living cell takes the label of the first labeled neighbor among
    /// northwest, north, northeast and west, and merges the others into it.
    pub fn label(grid: &Grid) -> Self {
        let (height, width) = (grid.height(), grid.width());
        let mut tracker = Self {
            labels: vec![0; height * width],
            ..Self::default()
        };

        for y in 0..height {
            for x in 0..width {
                if !grid.get(x, y) {
                    continue;
                }

                let mut label = 0;
                for (dx, dy) in [(-1, -1), (0, -1), (1, -1), (-1, 0)] {
                    let neighbor =
                        tracker.label_at(width, height, x as isize + dx, y as isize + dy);
                    if neighbor == 0 {
                        continue;
                    }
                    if label == 0 {
                        label = neighbor;
                    } else {
                        tracker.reassign(neighbor, label);
                    }
                }

                if label == 0 {
                    label = tracker.new_label();
                }
                tracker.labels[y * width + x] = tracker.resolve(label);
            }
        }

        tracker
    }

    /// Allocate a fresh label.
    pub fn new_label(&mut self) -> u32 {
        let label = self.next;
        self.next += 1;
        label
    }

    /// Follow the merges of a label to the group it currently belongs to.
    pub fn resolve(&self, mut label: u32) -> u32 {
        while let Some(&next) = self.reassigned.get(&label) {
            label = next;
        }
        label
    }

    /// Merge the group of `from` into the group of `into`.
    ///
    /// Returns whether anything changed: merging a group into itself, or merging label `0`,
    /// does nothing.
    pub fn reassign(&mut self, from: u32, into: u32) -> bool {
        if from == 0 || into == 0 {
            return false;
        }
        let (from, into) = (self.resolve(from), self.resolve(into));
        if from == into {
            return false;
        }

        log::trace!("Merging group {} into {}", from, into);
        self.reassigned.insert(from, into);
        for label in self.labels.iter_mut().filter(|l| **l == from) {
            *label = into;
        }
        true
    }

    /// The label buffer.
    #[inline]
    pub fn labels(&self) -> &[u32] {
        &self.labels
    }

    /// The label at a signed position of a buffer with the given size, `0` outside it.
    #[inline]
    pub(crate) fn label_at(&self, width: usize, height: usize, x: isize, y: isize) -> u32 {
        if x < 0 || y < 0 || x as usize >= width || y as usize >= height {
            0
        } else {
            self.labels[y as usize * width + x as usize]
        }
    }

    /// Replace the label buffer after a generation.
    pub(crate) fn set_labels(&mut self, labels: Vec<u32>) {
        self.labels = labels;
    }

    /// The distinct labels in use, in increasing order.
    pub fn groups(&self) -> Vec<u32> {
        self.labels
            .iter()
            .copied()
            .filter(|&l| l != 0)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reassign() {
        let mut tracker = GroupTracker::default();
        let a = tracker.new_label();
        let b = tracker.new_label();
        let c = tracker.new_label();
        assert_eq!((a, b, c), (1, 2, 3));

        assert!(tracker.reassign(a, b));
        assert!(tracker.reassign(b, c));
        assert_eq!(tracker.resolve(a), c);
        assert_eq!(tracker.resolve(b), c);

        assert!(!tracker.reassign(a, c));
        assert!(!tracker.reassign(c, a));
        assert!(!tracker.reassign(a, a));
        assert!(!tracker.reassign(0, a));
        assert!(!tracker.reassign(a, 0));
    }

    #[test]
    fn test_reassign_rewrites_labels() {
        let grid = Grid::from_cells([(0, 0), (3, 0), (6, 0)]);
        let mut tracker = GroupTracker::label(&grid);
        assert_eq!(tracker.groups(), vec![1, 2, 3]);

        tracker.reassign(3, 1);
        tracker.reassign(1, 2);
        assert_eq!(tracker.groups(), vec![2]);
        assert_eq!(tracker.labels()[0], 2);
        assert_eq!(tracker.labels()[6], 2);
    }

    #[test]
    fn test_initial_labels() {
        // Two arms joined only by the bottom cell.
        let grid = Grid::from_cells([(0, 0), (2, 0), (1, 1), (5, 0), (5, 1)]);
        let tracker = GroupTracker::label(&grid);
        assert_eq!(tracker.groups().len(), 2);

        let labels = tracker.labels();
        let width = grid.width();
        assert_eq!(labels[0], labels[2]);
        assert_eq!(labels[0], labels[width + 1]);
        assert_ne!(labels[0], labels[5]);
        assert_eq!(labels[5], labels[width + 5]);
        assert_eq!(labels[1], 0);
    }
}
