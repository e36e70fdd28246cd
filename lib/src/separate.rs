//! Object separation.
//!
//! Every king-wise connected component of the pattern starts as its own group. The pattern is
//! then run with group-aware stepping: a birth joins the group of one of its parents, and a
//! birth touching several islands merges their groups. After each generation, knots are
//! resolved. Once no merge happens for long enough and every group is a stable object on its
//! own, the groups are the separated objects.

use crate::{
    classify::{Classification, Classify},
    config::SeparatorConfig,
    error::RuleError,
    grid::Grid,
    group::GroupTracker,
    knot::{self, Knot, KnotTable, E, N, NE, NW, S, SE, SW, W},
    rule::{TransitionTable, CENTER},
    step::{self, Successor},
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Preference order of the parent whose group a newborn cell joins.
const PARENT_ORDER: [usize; 8] = [NW, W, SW, N, S, NE, E, SE];

/// Scan order for merging the islands around a newborn cell.
const ISLAND_ORDER: [usize; 8] = [NE, E, SE, N, S, NW, W, SW];

/// A transition table prepared for object separation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeparationRule {
    table: TransitionTable,
    knots: KnotTable,
}

impl SeparationRule {
    /// Prepare a transition table for object separation.
    ///
    /// Rules with B0 are not supported.
    pub fn new(table: TransitionTable) -> Result<Self, RuleError> {
        if table.contains_b0() {
            return Err(RuleError::B0);
        }
        let knots = KnotTable::new(&table);
        Ok(Self { table, knots })
    }

    /// The transition table.
    #[inline]
    pub const fn table(&self) -> &TransitionTable {
        &self.table
    }

    /// The knot table derived from the transition table.
    #[inline]
    pub const fn knots(&self) -> &KnotTable {
        &self.knots
    }
}

/// One separated object.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SeparatedObject {
    /// The cells of the object, in a minimal bounding box placed on the plane.
    pub pattern: Grid,

    /// What the object is.
    pub classification: Classification,
}

/// Whether a separation finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SeparationStatus {
    /// Every object is stable.
    Separated,

    /// The separation gave up or some recursive refinement failed.
    /// The objects are a best-effort answer.
    Partial,
}

/// The result of an object separation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Separation {
    /// The objects found.
    pub objects: Vec<SeparatedObject>,

    /// Whether the separation finished.
    pub status: SeparationStatus,
}

impl Separation {
    /// Whether every object was separated and is stable.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.status == SeparationStatus::Separated
    }
}

/// Objects found by one separation attempt, and whether some refinement failed.
type Attempt = (Vec<SeparatedObject>, bool);

/// Assigns group labels to the cells of the next generation.
struct Labeler<'a> {
    /// Labels of the current generation.
    old: &'a GroupTracker,
    width: usize,
    height: usize,

    /// Labels of the next generation.
    labels: Vec<u32>,

    /// Merges to apply after the generation, as `(from, into)` pairs.
    merges: Vec<(u32, u32)>,
}

impl Successor for Labeler<'_> {
    fn begin(&mut self, height: usize, width: usize) {
        self.labels = vec![0; height * width];
    }

    fn alive(&mut self, index: usize, code: usize, x: isize, y: isize) {
        let (old, width, height) = (self.old, self.width, self.height);
        let label = |bit: usize| {
            let (dx, dy) = knot::offset(bit);
            old.label_at(width, height, x + dx, y + dy)
        };

        if code & CENTER != 0 {
            self.labels[index] = label(4);
            return;
        }

        self.labels[index] = PARENT_ORDER
            .into_iter()
            .map(label)
            .find(|&l| l != 0)
            .unwrap_or_default();

        let islands = knot::islands(code);
        if islands < 2 {
            return;
        }
        let mut first = 0;
        for l in ISLAND_ORDER.into_iter().map(label).filter(|&l| l != 0) {
            if first == 0 {
                first = l;
            } else if l != first {
                self.merges.push((l, first));
                if islands == 2 {
                    break;
                }
            }
        }
    }
}

/// Separates a pattern into its independent objects.
#[derive(Debug, Clone)]
pub struct ObjectSeparator<'a> {
    rule: &'a SeparationRule,
    grid: Grid,
    tracker: GroupTracker,
}

impl<'a> ObjectSeparator<'a> {
    /// Create a separator, giving each connected component of the pattern its own group.
    pub fn new(grid: Grid, rule: &'a SeparationRule) -> Self {
        let tracker = GroupTracker::label(&grid);
        Self {
            rule,
            grid,
            tracker,
        }
    }

    /// The current generation of the pattern.
    #[inline]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The group label of each cell of [`grid`](Self::grid).
    #[inline]
    pub fn labels(&self) -> &[u32] {
        self.tracker.labels()
    }

    /// The group tracker.
    #[inline]
    pub const fn tracker(&self) -> &GroupTracker {
        &self.tracker
    }

    /// The number of generations run so far.
    #[inline]
    pub const fn generation(&self) -> u64 {
        self.grid.generation()
    }

    /// Merge the group of `from` into the group of `into`.
    pub fn reassign(&mut self, from: u32, into: u32) -> bool {
        self.tracker.reassign(from, into)
    }

    /// Apply merges, returning whether any group changed.
    fn apply(&mut self, merges: Vec<(u32, u32)>) -> bool {
        let mut merged = false;
        for (from, into) in merges {
            merged |= self.tracker.reassign(from, into);
        }
        merged
    }

    /// Run one generation with group-aware stepping.
    ///
    /// Returns whether any groups were merged.
    pub fn step(&mut self) -> bool {
        let mut labeler = Labeler {
            old: &self.tracker,
            width: self.grid.width(),
            height: self.grid.height(),
            labels: Vec::new(),
            merges: Vec::new(),
        };
        let population = step::scan(&mut self.grid, &self.rule.table, &mut labeler);

        let Labeler {
            mut labels, merges, ..
        } = labeler;
        if population == 0 {
            labels.clear();
        }
        self.tracker.set_labels(labels);
        self.apply(merges)
    }

    /// Merge groups around knots: dead cells that would be born if some of their neighboring
    /// groups were alone.
    ///
    /// Dead cells in the ring just outside the buffer are checked too.
    ///
    /// Returns whether any groups were merged.
    pub fn resolve_knots(&mut self) -> bool {
        let (width, height) = (self.grid.width(), self.grid.height());
        if width == 0 || height == 0 {
            return false;
        }
        let (w, h) = (width as isize, height as isize);

        let mut merges = Vec::new();
        for y in -1..=h {
            let mut code = step::column(&self.grid, -2, y) << 3 | step::column(&self.grid, -1, y);

            for x in -1..=w {
                code = ((code << 3) & 511) | step::column(&self.grid, x + 1, y);

                let knot = self.rule.knots.get(code);
                if knot == Knot::None {
                    continue;
                }
                let tracker = &self.tracker;
                let label = |bit: usize| {
                    let (dx, dy) = knot::offset(bit);
                    tracker.label_at(width, height, x + dx, y + dy)
                };
                knot.merges(code, label, &mut merges);
            }
        }

        self.apply(merges)
    }

    /// The current groups as separate patterns, in order of their labels.
    pub fn objects(&self) -> Vec<Grid> {
        let width = self.grid.width();
        let (x0, y0) = self.grid.offset();
        let mut groups = BTreeMap::<u32, Vec<(i64, i64)>>::new();

        for (i, &label) in self.tracker.labels().iter().enumerate() {
            if label != 0 {
                groups
                    .entry(label)
                    .or_default()
                    .push((x0 + (i % width) as i64, y0 + (i / width) as i64));
            }
        }

        groups
            .into_values()
            .map(|cells| Grid::from_cells(cells).with_generation(self.grid.generation()))
            .collect()
    }

    /// Classify a candidate object.
    fn classify<C: Classify + ?Sized>(
        &self,
        classifier: &C,
        pattern: Grid,
        limit: usize,
    ) -> SeparatedObject {
        let classification = classifier.classify(&pattern, &self.rule.table, limit);
        SeparatedObject {
            pattern,
            classification,
        }
    }

    /// Classify every current group as it is.
    fn classify_objects<C: Classify + ?Sized>(
        &self,
        classifier: &C,
        limit: usize,
    ) -> Vec<SeparatedObject> {
        self.objects()
            .into_iter()
            .map(|pattern| self.classify(classifier, pattern, limit))
            .collect()
    }

    /// Classify every current group, separating groups made of several pieces again with a
    /// fresh separator.
    ///
    /// Returns [`None`] as soon as some object is not stable. Sets `failed` if a nested
    /// separation gave up or failed.
    fn refine<C: Classify + ?Sized>(
        &self,
        classifier: &C,
        config: &SeparatorConfig,
        recursive: bool,
        depth: usize,
        failed: &mut bool,
    ) -> Option<Vec<SeparatedObject>> {
        let mut objects = Vec::new();

        for pattern in self.objects() {
            if pattern.component_count() <= 1 {
                let object = self.classify(classifier, pattern, config.generation_limit);
                if !object.classification.is_stable() {
                    return None;
                }
                objects.push(object);
                continue;
            }

            let mut nested = ObjectSeparator::new(pattern.clone(), self.rule);
            match nested.attempt(classifier, config, recursive, depth - 1) {
                Some((nested_objects, nested_failed)) => {
                    *failed |= nested_failed;
                    if !nested_objects
                        .iter()
                        .all(|o| o.classification.is_stable())
                    {
                        return None;
                    }
                    objects.extend(nested_objects);
                }
                None => {
                    *failed = true;
                    let object = self.classify(classifier, pattern, config.generation_limit);
                    if !object.classification.is_stable() {
                        return None;
                    }
                    objects.push(object);
                }
            }
        }

        Some(objects)
    }

    /// Run the separation loop once.
    ///
    /// Returns [`None`] if `max_generations` is reached without a stable result.
    fn run<C: Classify + ?Sized>(
        &mut self,
        classifier: &C,
        config: &SeparatorConfig,
        recursive: bool,
        depth: usize,
    ) -> Option<Attempt> {
        let mut failed = false;
        let mut stable_for = 0;
        let mut required = config.max_generations;
        let mut total = 0;

        while total < config.max_generations {
            if self.grid.is_empty() {
                return Some((Vec::new(), failed));
            }

            let merged = self.step();
            let knotted = self.resolve_knots();
            if merged || knotted {
                stable_for = 0;
                total += 1;
                continue;
            }

            let candidates = if recursive && depth > 0 {
                self.refine(classifier, config, recursive, depth, &mut failed)
            } else {
                Some(self.classify_objects(classifier, config.generation_limit))
            };

            let stable = candidates
                .as_ref()
                .is_some_and(|objects| objects.iter().all(|o| o.classification.is_stable()));
            if !stable {
                stable_for = 0;
            } else if stable_for == 0 {
                stable_for = 1;
                required = candidates.iter().flatten().fold(1, |acc, o| {
                    lcm(acc, o.classification.effective_period())
                });
            } else {
                stable_for += 1;
            }

            if stable_for == required {
                log::debug!(
                    "Stable for {} generations after {} generations",
                    required,
                    total + 1
                );
                if recursive {
                    return candidates.map(|objects| (objects, failed));
                }
                let objects = if depth > 0 {
                    match self.refine(classifier, config, recursive, depth, &mut failed) {
                        Some(objects) => objects,
                        None => {
                            failed = true;
                            self.classify_objects(classifier, config.generation_limit)
                        }
                    }
                } else {
                    let objects = self.classify_objects(classifier, config.generation_limit);
                    failed = !objects.iter().all(|o| o.classification.is_stable());
                    objects
                };
                return Some((objects, failed));
            }

            total += 1;
        }

        None
    }

    /// Run the separation loop, retrying once with recursive refinement at every step.
    fn attempt<C: Classify + ?Sized>(
        &mut self,
        classifier: &C,
        config: &SeparatorConfig,
        recursive: bool,
        depth: usize,
    ) -> Option<Attempt> {
        match self.run(classifier, config, recursive, depth) {
            None if !recursive => {
                log::debug!(
                    "No separation after {} generations, retrying recursively",
                    config.max_generations
                );
                self.run(classifier, config, true, depth)
            }
            result => result,
        }
    }

    /// Separate the pattern into objects.
    ///
    /// This never fails: if the objects do not become stable in time, the current groups are
    /// reported as a [`Partial`](SeparationStatus::Partial) result.
    pub fn separate<C: Classify + ?Sized>(
        &mut self,
        classifier: &C,
        config: &SeparatorConfig,
    ) -> Separation {
        match self.attempt(classifier, config, false, config.depth) {
            Some((objects, failed)) => Separation {
                objects,
                status: if failed {
                    SeparationStatus::Partial
                } else {
                    SeparationStatus::Separated
                },
            },
            None => {
                log::debug!("Separation gave up at generation {}", self.generation());
                Separation {
                    objects: self.classify_objects(classifier, config.generation_limit),
                    status: SeparationStatus::Partial,
                }
            }
        }
    }
}

const fn gcd(mut a: usize, mut b: usize) -> usize {
    while b > 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

const fn lcm(a: usize, b: usize) -> usize {
    (a / gcd(a, b)).saturating_mul(b)
}
