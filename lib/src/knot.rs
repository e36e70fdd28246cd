//! Knots: dead cells touching two or more groups that stay dead only because the groups
//! interact.
//!
//! When such a cell would be born if one of the groups were alone, the groups cannot be
//! separated and must be merged. Which merges are implied depends only on the transition
//! table, so they are computed once into a [`KnotTable`].
//!
//! Single-corner births (B1c) are not modelled.

use crate::rule::{TransitionTable, CENTER, TABLE_SIZE};
use enumflags2::{bitflags, BitFlags};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

/// Bits of each neighbor in a neighborhood code.
pub(crate) const NW: usize = 8;
pub(crate) const W: usize = 7;
pub(crate) const SW: usize = 6;
pub(crate) const N: usize = 5;
pub(crate) const S: usize = 3;
pub(crate) const NE: usize = 2;
pub(crate) const E: usize = 1;
pub(crate) const SE: usize = 0;

const CORNERS: [usize; 4] = [NW, NE, SW, SE];
const EDGES: [usize; 4] = [N, W, E, S];

/// Offset `(dx, dy)` of the neighbor at a bit of a neighborhood code.
#[inline]
pub(crate) const fn offset(bit: usize) -> (isize, isize) {
    (1 - (bit / 3) as isize, 1 - (bit % 3) as isize)
}

/// The neighbor on the opposite side of the center.
#[inline]
const fn opposite(bit: usize) -> usize {
    8 - bit
}

/// The two corners next to an edge neighbor.
const fn corners_of(edge: usize) -> [usize; 2] {
    match edge {
        N => [NW, NE],
        W => [NW, SW],
        E => [NE, SE],
        _ => [SW, SE],
    }
}

const fn adjacent(a: usize, b: usize) -> bool {
    let (ax, ay) = offset(a);
    let (bx, by) = offset(b);
    let (dx, dy) = (ax - bx, ay - by);
    -1 <= dx && dx <= 1 && -1 <= dy && dy <= 1
}

/// Number of king-wise connected islands among the living neighbors, ignoring the center.
const fn count_islands(code: usize) -> u8 {
    let live = code & !CENTER;
    let mut seen = 0usize;
    let mut count = 0;
    let mut start = 0;

    while start < 9 {
        if live & (1 << start) != 0 && seen & (1 << start) == 0 {
            count += 1;
            seen |= 1 << start;
            let mut frontier = 1usize << start;

            while frontier != 0 {
                let bit = frontier.trailing_zeros() as usize;
                frontier &= !(1 << bit);

                let mut other = 0;
                while other < 9 {
                    if live & (1 << other) != 0
                        && seen & (1 << other) == 0
                        && adjacent(bit, other)
                    {
                        seen |= 1 << other;
                        frontier |= 1 << other;
                    }
                    other += 1;
                }
            }
        }
        start += 1;
    }

    count
}

static ISLANDS: [u8; TABLE_SIZE] = {
    let mut table = [0; TABLE_SIZE];
    let mut code = 0;
    while code < TABLE_SIZE {
        table[code] = count_islands(code);
        code += 1;
    }
    table
};

/// Number of islands of living neighbors in a neighborhood.
#[inline]
pub(crate) fn islands(code: usize) -> u8 {
    ISLANDS[code]
}

/// Shapes of knots whose resolution depends on the current group labels.
///
/// The names are the transitions formed by the living neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum KnotShape {
    /// Three corners.
    A3c,
    /// Two corners on one side and the edge cell on the opposite side.
    A3y,
    /// All four corners.
    A4c,
    /// Three corners and an edge cell next to the missing corner.
    A4y,
    /// All four corners and an edge cell.
    A5e,
}

/// Rule facts that decide how a complex knot is resolved.
#[bitflags]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum KnotFlag {
    /// Merge every group around the knot unconditionally.
    MergeAll,
    /// The rule contains B2a.
    B2a,
    /// The rule contains B2c.
    B2c,
    /// The rule contains B2k.
    B2k,
    /// The rule contains B2n.
    B2n,
    /// The rule contains B3n.
    B3n,
    /// The rule contains B3q.
    B3q,
    /// The rule contains B4n.
    B4n,
}

/// The knot classification of one neighborhood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Knot {
    /// Not a knot.
    #[default]
    None,

    /// A knot between two islands: the groups are merged if they differ.
    TwoIsland,

    /// A knot between three or more corners, resolved according to the labels.
    Complex {
        /// The arrangement of the living neighbors.
        shape: KnotShape,
        /// Rule facts used by the resolution.
        flags: BitFlags<KnotFlag>,
    },
}

/// Push merges of every label into the first one.
fn merge_all(labels: &[u32], merges: &mut Vec<(u32, u32)>) {
    let (&first, rest) = match labels.split_first() {
        Some(split) => split,
        None => return,
    };
    merges.extend(rest.iter().filter(|&&l| l != first).map(|&l| (l, first)));
}

impl Knot {
    /// Push the merges implied by this knot as `(from, into)` pairs.
    ///
    /// `code` is the neighborhood code of the knot cell, and `label(bit)` gives the group label
    /// of the neighbor at that bit.
    pub(crate) fn merges<F: Fn(usize) -> u32>(
        self,
        code: usize,
        label: F,
        merges: &mut Vec<(u32, u32)>,
    ) {
        match self {
            Self::None => {}
            Self::TwoIsland => two_island_merges(label, merges),
            Self::Complex { shape, flags } => {
                let live = |bit: usize| code & (1 << bit) != 0;
                match shape {
                    KnotShape::A3c => resolve_a3c(flags, &live, &label, merges),
                    KnotShape::A3y => resolve_a3y(flags, &live, &label, merges),
                    KnotShape::A4c => resolve_a4c(flags, &label, merges),
                    KnotShape::A4y => resolve_a4y(flags, &live, &label, merges),
                    KnotShape::A5e => resolve_a5e(flags, &live, &label, merges),
                }
            }
        }
    }
}

/// Seed from the northwest and north neighbors, then merge the first differing label.
fn two_island_merges<F: Fn(usize) -> u32>(label: F, merges: &mut Vec<(u32, u32)>) {
    let mut seed = label(NW);
    if seed == 0 {
        seed = label(N);
    }
    for bit in [NE, W, E, SW, S, SE] {
        let l = label(bit);
        if l == 0 {
            continue;
        }
        if seed == 0 {
            seed = l;
        } else if l != seed {
            merges.push((l, seed));
            return;
        }
    }
}

/// ```text
/// B . A
/// . x .
/// C . .
/// ```
///
/// `B` is the corner sharing a side with both others.
fn resolve_a3c<L, F>(flags: BitFlags<KnotFlag>, live: &L, label: &F, merges: &mut Vec<(u32, u32)>)
where
    L: Fn(usize) -> bool,
    F: Fn(usize) -> u32,
{
    let Some(missing) = CORNERS.into_iter().find(|&c| !live(c)) else {
        return;
    };
    let middle = opposite(missing);
    let mut ends = CORNERS.into_iter().filter(|&c| c != missing && c != middle);
    let (Some(end_a), Some(end_c)) = (ends.next(), ends.next()) else {
        return;
    };
    let (a, b, c) = (label(end_a), label(middle), label(end_c));

    if flags.contains(KnotFlag::MergeAll) {
        merge_all(&[a, b, c], merges);
    } else if flags.contains(KnotFlag::B2c) {
        if a == b {
            merges.push((c, b));
        } else if b == c {
            merges.push((a, b));
        } else if flags.contains(KnotFlag::B2n) && a == c {
            merges.push((b, a));
        }
    } else if flags.contains(KnotFlag::B2n) && a == c {
        merges.push((b, a));
    }
}

/// ```text
/// A . .
/// . x C
/// B . .
/// ```
fn resolve_a3y<L, F>(flags: BitFlags<KnotFlag>, live: &L, label: &F, merges: &mut Vec<(u32, u32)>)
where
    L: Fn(usize) -> bool,
    F: Fn(usize) -> u32,
{
    let Some(edge) = EDGES.into_iter().find(|&e| live(e)) else {
        return;
    };
    let [corner_a, corner_b] = corners_of(opposite(edge));
    let (a, b, c) = (label(corner_a), label(corner_b), label(edge));

    if flags.contains(KnotFlag::MergeAll) {
        merge_all(&[a, b, c], merges);
    } else if flags.contains(KnotFlag::B2k) {
        if a == c {
            merges.push((b, a));
        } else if b == c {
            merges.push((a, b));
        } else if flags.contains(KnotFlag::B2c) && a == b {
            merges.push((c, a));
        }
    } else if flags.contains(KnotFlag::B2c) && a == b {
        merges.push((c, a));
    }
}

/// ```text
/// A . B
/// . x .
/// C . D
/// ```
fn resolve_a4c<F>(flags: BitFlags<KnotFlag>, label: &F, merges: &mut Vec<(u32, u32)>)
where
    F: Fn(usize) -> u32,
{
    let (a, b, c, d) = (label(NW), label(NE), label(SW), label(SE));

    let diagonal = |merges: &mut Vec<(u32, u32)>| {
        if a == d {
            merge_all(&[a, b, c], merges);
        } else if b == c {
            merge_all(&[b, a, d], merges);
        }
    };

    if flags.contains(KnotFlag::MergeAll) {
        merge_all(&[a, b, c, d], merges);
    } else if (a == b && (b == c || b == d)) || (c == d && (a == c || b == c)) {
        // Three corners alone would give birth by B3c.
        merge_all(&[a, b, c, d], merges);
    } else if flags.contains(KnotFlag::B2c) {
        if a == b {
            merge_all(&[a, c, d], merges);
        } else if a == c {
            merge_all(&[a, b, d], merges);
        } else if b == d {
            merge_all(&[b, a, c], merges);
        } else if c == d {
            merge_all(&[c, a, b], merges);
        } else if flags.contains(KnotFlag::B2n) {
            diagonal(merges);
        }
    } else if flags.contains(KnotFlag::B2n) {
        diagonal(merges);
    }
}

/// ```text
/// A A .
/// . x .
/// B . C
/// ```
///
/// `A` is the corner next to the edge cell, `C` the corner opposite to it.
fn resolve_a4y<L, F>(flags: BitFlags<KnotFlag>, live: &L, label: &F, merges: &mut Vec<(u32, u32)>)
where
    L: Fn(usize) -> bool,
    F: Fn(usize) -> u32,
{
    let Some(edge) = EDGES.into_iter().find(|&e| live(e)) else {
        return;
    };
    let Some(corner_a) = corners_of(edge).into_iter().find(|&c| live(c)) else {
        return;
    };
    let corner_c = opposite(corner_a);
    let Some(corner_b) = CORNERS
        .into_iter()
        .find(|&c| live(c) && c != corner_a && c != corner_c)
    else {
        return;
    };
    let (a, b, c) = (label(corner_a), label(corner_b), label(corner_c));

    if flags.contains(KnotFlag::MergeAll) {
        merge_all(&[a, b, c], merges);
    } else if flags.contains(KnotFlag::B2a) {
        if flags.contains(KnotFlag::B3n) {
            merges.push((b, a));
        }
        if flags.contains(KnotFlag::B3q) {
            merges.push((c, a));
        }
    } else if flags.contains(KnotFlag::B3n) && a == b {
        merges.push((c, a));
    } else if flags.contains(KnotFlag::B3q) && a == c {
        merges.push((b, a));
    } else if flags.contains(KnotFlag::B2c) && b == c {
        merges.push((a, b));
    }
}

/// ```text
/// A A A
/// . x .
/// B . C
/// ```
fn resolve_a5e<L, F>(flags: BitFlags<KnotFlag>, live: &L, label: &F, merges: &mut Vec<(u32, u32)>)
where
    L: Fn(usize) -> bool,
    F: Fn(usize) -> u32,
{
    let Some(edge) = EDGES.into_iter().find(|&e| live(e)) else {
        return;
    };
    let [corner_b, corner_c] = corners_of(opposite(edge));
    let (a, b, c) = (label(edge), label(corner_b), label(corner_c));

    let merge = flags.contains(KnotFlag::MergeAll)
        || (flags.contains(KnotFlag::B2c) && b == c)
        || (flags.contains(KnotFlag::B4n) && (a == b || a == c));
    if merge {
        merge_all(&[a, b, c], merges);
    }
}

/// Knot classification of every neighborhood, derived from a transition table.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct KnotTable {
    entries: [Knot; TABLE_SIZE],
}

impl std::fmt::Debug for KnotTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let two_island = self.entries.iter().filter(|k| **k == Knot::TwoIsland).count();
        let mut s = f.debug_struct("KnotTable");
        s.field("two_island", &two_island);
        for shape in KnotShape::iter() {
            s.field(&shape.to_string(), &self.shape_count(shape));
        }
        s.finish_non_exhaustive()
    }
}

fn set(entries: &mut [Knot; TABLE_SIZE], condition: bool, codes: &[usize], knot: Knot) {
    if condition {
        for &code in codes {
            entries[code] = knot;
        }
    }
}

/// Add a flag to a set when a condition holds.
fn flag_if(condition: bool, flag: KnotFlag) -> BitFlags<KnotFlag> {
    if condition {
        flag.into()
    } else {
        BitFlags::empty()
    }
}

impl KnotTable {
    /// Derive the knot table of a transition table.
    pub fn new(table: &TransitionTable) -> Self {
        let t = |code: usize| table.fires(code);
        let b1e = t(0b010000000);
        let b2a = t(0b110000000);
        let b2c = t(0b101000000);
        let b2e = t(0b010100000);
        let b2i = t(0b000101000);
        let b2k = t(0b001100000);
        let b2n = t(0b100000001);
        let b3a = t(0b110100000);
        let b3c = t(0b101000100);
        let b3i = t(0b111000000);
        let b3j = t(0b011100000);
        let b3k = t(0b010100001);
        let b3n = t(0b110000100);
        let b3q = t(0b110000001);
        let b3r = t(0b110000010);
        let b3y = t(0b100001100);
        let b4a = t(0b111100000);
        let b4c = t(0b101000101);
        let b4i = t(0b110000110);
        let b4k = t(0b010100101);
        let b4n = t(0b111000001);
        let b4q = t(0b110100001);
        let b4t = t(0b111000010);
        let b4w = t(0b110001001);
        let b4y = t(0b101001100);
        let b4z = t(0b110000011);
        let b5a = t(0b111100100);
        let b5e = t(0b101001101);
        let b5j = t(0b111100001);
        let b5k = t(0b101001110);
        let b5r = t(0b111000011);
        let b6e = t(0b101001111);
        let b6i = t(0b111000111);

        let complex = |shape, flags| Knot::Complex { shape, flags };
        let two = Knot::TwoIsland;
        let mut e = [Knot::None; TABLE_SIZE];

        set(&mut e, !b2i && b1e, &[0b010000010, 0b000101000], two);
        set(
            &mut e,
            !b2k && b1e,
            &[
                0b100001000,
                0b000001100,
                0b001000010,
                0b100000010,
                0b000100001,
                0b001100000,
                0b010000100,
                0b010000001,
            ],
            two,
        );
        set(
            &mut e,
            !b3c,
            &[0b101000100, 0b101000001, 0b100000101, 0b001000101],
            complex(
                KnotShape::A3c,
                flag_if(b2n, KnotFlag::B2n) | flag_if(b2c, KnotFlag::B2c),
            ),
        );
        set(
            &mut e,
            !b3k && b2e,
            &[0b010100001, 0b001100010, 0b010001100, 0b100001010],
            two,
        );
        set(
            &mut e,
            !b3n && b2a,
            &[
                0b101100000,
                0b101001000,
                0b011000001,
                0b001000011,
                0b000001101,
                0b000100101,
                0b100000110,
                0b110000100,
            ],
            two,
        );
        set(
            &mut e,
            !b3q && b2a,
            &[
                0b100100001,
                0b001001100,
                0b011000100,
                0b100000011,
                0b001100100,
                0b100001001,
                0b001000110,
                0b110000001,
            ],
            two,
        );
        set(
            &mut e,
            !b3r && b2a,
            &[
                0b100101000,
                0b001101000,
                0b000101100,
                0b000101001,
                0b110000010,
                0b011000010,
                0b010000110,
                0b010000011,
            ],
            two,
        );
        let a3y_flags = if b1e {
            KnotFlag::MergeAll.into()
        } else {
            flag_if(b2c, KnotFlag::B2c) | flag_if(b2k, KnotFlag::B2k)
        };
        set(
            &mut e,
            !b3y,
            &[0b101000010, 0b001100001, 0b010000101, 0b100001100],
            complex(KnotShape::A3y, a3y_flags),
        );
        if !b4c {
            e[0b101000101] = if b3c {
                complex(
                    KnotShape::A4c,
                    flag_if(b2c, KnotFlag::B2c) | flag_if(b2n, KnotFlag::B2n),
                )
            } else if b2c || b2n {
                complex(KnotShape::A4c, KnotFlag::MergeAll.into())
            } else {
                Knot::None
            };
        }
        set(
            &mut e,
            !b4i && b2a,
            &[0b101101000, 0b000101101, 0b110000110, 0b011000011],
            two,
        );
        set(
            &mut e,
            !b4k && b3j,
            &[
                0b011100001,
                0b110001100,
                0b010001101,
                0b101001010,
                0b100001110,
                0b001100011,
                0b101100010,
                0b010100101,
            ],
            two,
        );
        set(
            &mut e,
            !b4q && b3a,
            &[0b110100001, 0b011001100, 0b100001011, 0b001100110],
            two,
        );
        set(
            &mut e,
            !b4t && (b1e || b3i),
            &[0b111000010, 0b001101001, 0b010000111, 0b100101100],
            two,
        );
        let a4y_flags = if b2a {
            if !b3q && !b3n {
                KnotFlag::MergeAll.into()
            } else {
                flag_if(b3q, KnotFlag::B3q) | flag_if(b3n, KnotFlag::B3n) | KnotFlag::B2a
            }
        } else if b2c {
            flag_if(b3q, KnotFlag::B3q) | flag_if(b3n, KnotFlag::B3n) | KnotFlag::B2c
        } else if b3q && b2n {
            KnotFlag::MergeAll.into()
        } else {
            flag_if(b3q, KnotFlag::B3q) | flag_if(b3n, KnotFlag::B3n)
        };
        set(
            &mut e,
            !b4y,
            &[
                0b101000110,
                0b101000011,
                0b101100001,
                0b001100101,
                0b110000101,
                0b011000101,
                0b100001101,
                0b101001100,
            ],
            complex(KnotShape::A4y, a4y_flags),
        );
        set(
            &mut e,
            !b4z && b2a,
            &[0b110000011, 0b001101100, 0b011000110, 0b100101001],
            two,
        );
        let a5e_flags = if b3i {
            KnotFlag::MergeAll.into()
        } else {
            flag_if(b2c, KnotFlag::B2c) | flag_if(b4n, KnotFlag::B4n)
        };
        set(
            &mut e,
            !b5e,
            &[0b101000111, 0b111000101, 0b101100101, 0b101001101],
            complex(KnotShape::A5e, a5e_flags),
        );
        set(
            &mut e,
            !b5j && b4a,
            &[
                0b110100101,
                0b011001101,
                0b111001100,
                0b100001111,
                0b101001011,
                0b101100110,
                0b001100111,
                0b111100001,
            ],
            two,
        );
        set(
            &mut e,
            !b5k && b4w,
            &[0b101001110, 0b101100110, 0b110100101, 0b110001101],
            two,
        );
        set(
            &mut e,
            !b5r && (b2a || b3i),
            &[
                0b100101101,
                0b101101100,
                0b111000110,
                0b111000011,
                0b001101101,
                0b101101001,
                0b011000111,
                0b110000111,
            ],
            two,
        );
        set(
            &mut e,
            !b6e && b5a,
            &[0b101001111, 0b101100111, 0b111100101, 0b111001101],
            two,
        );
        set(&mut e, !b6i && b3i, &[0b101101101, 0b111000111], two);

        Self { entries: e }
    }

    /// The knot classification of a neighborhood code.
    #[inline]
    pub fn get(&self, code: usize) -> Knot {
        self.entries[code]
    }

    /// Number of neighborhoods that are complex knots of the given shape.
    pub fn shape_count(&self, shape: KnotShape) -> usize {
        self.entries
            .iter()
            .filter(|k| matches!(k, Knot::Complex { shape: s, .. } if *s == shape))
            .count()
    }

    /// Number of neighborhoods that are knots.
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|k| **k != Knot::None).count()
    }

    /// Whether no neighborhood is a knot.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(cells: &[(usize, u32)]) -> impl Fn(usize) -> u32 + '_ {
        move |bit| {
            cells
                .iter()
                .find(|&&(b, _)| b == bit)
                .map_or(0, |&(_, l)| l)
        }
    }

    #[test]
    fn test_islands() {
        assert_eq!(islands(0), 0);
        assert_eq!(islands(0b110000000), 1);
        assert_eq!(islands(0b010000010), 2);
        assert_eq!(islands(0b101000101), 4);
        assert_eq!(islands(0b101000101 | CENTER), 4);
        assert_eq!(islands(0b111101111), 1);
        // North and east neighbors touch diagonally.
        assert_eq!(islands(0b000100010), 1);
    }

    #[test]
    fn test_pure() {
        let life = TransitionTable::life_like(&[3], &[2, 3]);
        let a = KnotTable::new(&life);
        let b = KnotTable::new(&life.clone());
        assert_eq!(a, b);
    }

    #[test]
    fn test_life_knots() {
        let knots = KnotTable::new(&TransitionTable::life_like(&[3], &[2, 3]));
        assert_eq!(
            knots.get(0b101000101),
            Knot::Complex {
                shape: KnotShape::A4c,
                flags: BitFlags::empty()
            }
        );
        assert_eq!(knots.get(0b010100101), Knot::TwoIsland);
        assert_eq!(
            knots.get(0b101000111),
            Knot::Complex {
                shape: KnotShape::A5e,
                flags: KnotFlag::MergeAll.into()
            }
        );
        assert_eq!(
            knots.get(0b101000110),
            Knot::Complex {
                shape: KnotShape::A4y,
                flags: KnotFlag::B3n | KnotFlag::B3q
            }
        );
        assert_eq!(knots.get(0b110000000), Knot::None);
        assert_eq!(knots.get(0b101000100), Knot::None);
        for code in 0..TABLE_SIZE {
            if code & CENTER != 0 {
                assert_eq!(knots.get(code), Knot::None);
            }
        }
    }

    #[test]
    fn test_two_island_merges() {
        let mut merges = Vec::new();
        Knot::TwoIsland.merges(0, labels(&[(N, 1), (E, 1), (SW, 2)]), &mut merges);
        assert_eq!(merges, vec![(2, 1)]);

        merges.clear();
        Knot::TwoIsland.merges(0, labels(&[(W, 3), (SE, 3)]), &mut merges);
        assert!(merges.is_empty());
    }

    #[test]
    fn test_a3c_merges() {
        let code = 1 << NW | 1 << NE | 1 << SW;
        let knot = Knot::Complex {
            shape: KnotShape::A3c,
            flags: KnotFlag::B2c.into(),
        };

        let mut merges = Vec::new();
        knot.merges(code, labels(&[(NW, 1), (NE, 1), (SW, 2)]), &mut merges);
        assert_eq!(merges, vec![(2, 1)]);

        merges.clear();
        knot.merges(code, labels(&[(NW, 1), (NE, 2), (SW, 3)]), &mut merges);
        assert!(merges.is_empty());
    }

    #[test]
    fn test_a4y_roles() {
        // The domino is the northeast corner and the east edge.
        let code = 1 << NW | 1 << SW | 1 << NE | 1 << E;
        let knot = Knot::Complex {
            shape: KnotShape::A4y,
            flags: KnotFlag::B3n.into(),
        };
        let mut merges = Vec::new();
        knot.merges(
            code,
            labels(&[(NE, 1), (E, 1), (NW, 1), (SW, 2)]),
            &mut merges,
        );
        assert_eq!(merges, vec![(2, 1)]);
    }

    #[test]
    fn test_a5e_symmetric() {
        let code = 1 << NW | 1 << NE | 1 << SW | 1 << SE | 1 << N;
        let knot = Knot::Complex {
            shape: KnotShape::A5e,
            flags: KnotFlag::B4n.into(),
        };
        for (b, c) in [(1, 2), (2, 1)] {
            let mut merges = Vec::new();
            knot.merges(
                code,
                labels(&[(N, 1), (NW, 1), (NE, 1), (SW, b), (SE, c)]),
                &mut merges,
            );
            assert!(merges.contains(&(2, 1)));
        }
    }

    #[test]
    fn test_a3y_merges() {
        // Two corners on the west side and the east edge.
        let code = 1 << NW | 1 << SW | 1 << E;
        let merges_with = |flags: BitFlags<KnotFlag>, nw, sw, e| {
            let knot = Knot::Complex {
                shape: KnotShape::A3y,
                flags,
            };
            let mut merges = Vec::new();
            knot.merges(code, labels(&[(NW, nw), (SW, sw), (E, e)]), &mut merges);
            merges
        };

        assert_eq!(
            merges_with(KnotFlag::MergeAll.into(), 1, 2, 3),
            vec![(2, 1), (3, 1)]
        );

        let b2k = KnotFlag::B2k.into();
        assert_eq!(merges_with(b2k, 1, 2, 1), vec![(2, 1)]);
        assert_eq!(merges_with(b2k, 2, 1, 1), vec![(2, 1)]);
        assert!(merges_with(b2k, 1, 1, 2).is_empty());
        assert!(merges_with(b2k, 1, 2, 3).is_empty());
        assert_eq!(
            merges_with(KnotFlag::B2k | KnotFlag::B2c, 1, 1, 2),
            vec![(2, 1)]
        );

        let b2c = KnotFlag::B2c.into();
        assert_eq!(merges_with(b2c, 1, 1, 2), vec![(2, 1)]);
        assert!(merges_with(b2c, 1, 2, 1).is_empty());
        assert!(merges_with(BitFlags::empty(), 1, 1, 2).is_empty());
    }

    #[test]
    fn test_a4c_merges() {
        let code = 1 << NW | 1 << NE | 1 << SW | 1 << SE;
        let merges_with = |flags: BitFlags<KnotFlag>, nw, ne, sw, se| {
            let knot = Knot::Complex {
                shape: KnotShape::A4c,
                flags,
            };
            let mut merges = Vec::new();
            knot.merges(
                code,
                labels(&[(NW, nw), (NE, ne), (SW, sw), (SE, se)]),
                &mut merges,
            );
            merges
        };

        assert_eq!(
            merges_with(KnotFlag::MergeAll.into(), 1, 2, 3, 4),
            vec![(2, 1), (3, 1), (4, 1)]
        );

        // Three corners of one group give a birth by B3c on their own.
        assert_eq!(merges_with(BitFlags::empty(), 1, 1, 1, 2), vec![(2, 1)]);
        assert_eq!(merges_with(BitFlags::empty(), 1, 2, 1, 1), vec![(2, 1)]);
        assert!(merges_with(BitFlags::empty(), 1, 1, 2, 2).is_empty());

        let b2c = KnotFlag::B2c.into();
        assert_eq!(merges_with(b2c, 1, 1, 2, 3), vec![(2, 1), (3, 1)]);
        assert_eq!(merges_with(b2c, 1, 2, 1, 3), vec![(2, 1), (3, 1)]);
        assert_eq!(merges_with(b2c, 2, 1, 3, 1), vec![(2, 1), (3, 1)]);
        assert_eq!(merges_with(b2c, 2, 3, 1, 1), vec![(2, 1), (3, 1)]);
        assert!(merges_with(b2c, 1, 2, 3, 1).is_empty());

        let b2n = KnotFlag::B2n.into();
        assert_eq!(merges_with(b2n, 1, 2, 3, 1), vec![(2, 1), (3, 1)]);
        assert_eq!(merges_with(b2n, 2, 1, 1, 3), vec![(2, 1), (3, 1)]);
        assert!(merges_with(b2n, 1, 2, 3, 4).is_empty());
        assert_eq!(
            merges_with(KnotFlag::B2c | KnotFlag::B2n, 1, 2, 3, 1),
            vec![(2, 1), (3, 1)]
        );
    }

    #[test]
    fn test_life_a4c() {
        let knots = KnotTable::new(&TransitionTable::life_like(&[3], &[2, 3]));
        let code = 1 << NW | 1 << NE | 1 << SW | 1 << SE;
        let mut merges = Vec::new();
        knots.get(code).merges(
            code,
            labels(&[(NW, 1), (NE, 1), (SW, 2), (SE, 1)]),
            &mut merges,
        );
        assert_eq!(merges, vec![(2, 1)]);
    }

    #[test]
    fn test_every_shape() {
        let knots = KnotTable::new(&TransitionTable::from_transitions(&["2c"], &[]).unwrap());
        for shape in KnotShape::iter() {
            assert!(knots.shape_count(shape) > 0, "no {shape} knot");
        }
        assert_eq!(
            knots.get(0b101000101),
            Knot::Complex {
                shape: KnotShape::A4c,
                flags: KnotFlag::MergeAll.into()
            }
        );
        assert!(format!("{knots:?}").contains("A5e"));
    }
}
