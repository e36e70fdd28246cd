//! Running a grid for one generation.
//!
//! The scan is shared between the plain stepper and the group-aware stepper of the separator:
//! the latter plugs in a [`Successor`] that assigns group labels to the living cells.

use crate::{grid::Grid, rule::TransitionTable};

/// Receives the living cells of the next generation while it is being computed.
pub(crate) trait Successor {
    /// Called once before the scan, with the size of the next generation.
    fn begin(&mut self, _height: usize, _width: usize) {}

    /// Called for each living cell of the next generation.
    ///
    /// `index` is its position in the new buffer, `code` its neighborhood code,
    /// and `(x, y)` its position in the old buffer, which may be just outside it.
    fn alive(&mut self, _index: usize, _code: usize, _x: isize, _y: isize) {}
}

impl Successor for () {}

/// How many cells the grid grows on each side in the next generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Growth {
    pub(crate) up: usize,
    pub(crate) down: usize,
    pub(crate) left: usize,
    pub(crate) right: usize,
}

/// The neighborhood code of the cell at a signed buffer position.
pub(crate) fn code_at(grid: &Grid, x: isize, y: isize) -> usize {
    let mut code = 0;
    for dx in -1..=1 {
        for dy in -1..=1 {
            code = (code << 1) | grid.bit(x + dx, y + dy);
        }
    }
    code
}

/// A column triple of the neighborhood code: `top << 2 | middle << 1 | bottom`.
#[inline]
pub(crate) fn column(grid: &Grid, x: isize, y: isize) -> usize {
    grid.bit(x, y - 1) << 2 | grid.bit(x, y) << 1 | grid.bit(x, y + 1)
}

/// Decide the growth of each side by evaluating the rows and columns just outside the grid.
///
/// The scans include the four diagonal corners, so a corner birth grows two sides.
pub(crate) fn growth(grid: &Grid, table: &TransitionTable) -> Growth {
    if grid.height() == 0 || grid.width() == 0 {
        return Growth::default();
    }

    let (h, w) = (grid.height() as isize, grid.width() as isize);
    let fires = |x, y| table.fires(code_at(grid, x, y));

    Growth {
        up: (-1..=w).any(|x| fires(x, -1)) as usize,
        down: (-1..=w).any(|x| fires(x, h)) as usize,
        left: (-1..=h).any(|y| fires(-1, y)) as usize,
        right: (-1..=h).any(|y| fires(w, y)) as usize,
    }
}

/// Run the grid for one generation, reporting each living cell to `successor`.
///
/// Returns the population of the new generation. If it is zero, the grid becomes 0x0.
pub(crate) fn scan<S: Successor>(
    grid: &mut Grid,
    table: &TransitionTable,
    successor: &mut S,
) -> usize {
    let growth = growth(grid, table);
    let height = grid.height() + growth.up + growth.down;
    let width = grid.width() + growth.left + growth.right;
    log::trace!("Growth {:?}, next size {}x{}", growth, width, height);

    successor.begin(height, width);

    let mut cells = vec![0; height * width];
    let mut population = 0;
    let x0 = -(growth.left as isize);

    for ny in 0..height {
        let y = ny as isize - growth.up as isize;
        let mut code = column(grid, x0 - 1, y) << 3 | column(grid, x0, y);

        for nx in 0..width {
            let x = x0 + nx as isize;
            code = ((code << 3) & 511) | column(grid, x + 1, y);

            if table.fires(code) {
                let index = ny * width + nx;
                cells[index] = 1;
                population += 1;
                successor.alive(index, code, x, y);
            }
        }
    }

    if population == 0 {
        grid.commit(0, 0, Vec::new(), growth.left, growth.up);
    } else {
        grid.commit(height, width, cells, growth.left, growth.up);
    }

    population
}

/// Run the grid for one generation.
///
/// The grid grows by at most one cell on each side. The background is assumed to stay dead,
/// so the result is meaningless for tables containing B0.
pub(crate) fn step(grid: &mut Grid, table: &TransitionTable) {
    scan(grid, table, &mut ());
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn life() -> TransitionTable {
        TransitionTable::life_like(&[3], &[2, 3])
    }

    fn soup(seed: u64) -> Grid {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        Grid::random(8, 8, 0.5, &mut rng)
    }

    #[test]
    fn test_code_layout() {
        let grid = Grid::from_cells([(0, 0), (2, 0), (1, 1), (2, 2)]);
        assert_eq!(code_at(&grid, 1, 1), 0b100010101);
        assert_eq!(code_at(&grid, -1, -1), 0b000000001);
        assert_eq!(code_at(&grid, 3, 3), 0b100000000);
    }

    #[test]
    fn test_blinker() {
        let table = life();
        let mut grid = Grid::from_cells([(0, 0), (1, 0), (2, 0)]);
        grid.step(&table);
        assert_eq!(grid.generation(), 1);
        assert_eq!(
            grid.live_cells().collect::<Vec<_>>(),
            vec![(1, -1), (1, 0), (1, 1)]
        );
        grid.step(&table);
        assert_eq!(grid.generation(), 2);
        assert_eq!(
            grid.live_cells().collect::<Vec<_>>(),
            vec![(0, 0), (1, 0), (2, 0)]
        );
    }

    #[test]
    fn test_width_one() {
        let mut grid = Grid::new(3, 1, vec![1, 1, 1]);
        grid.step(&life());
        assert_eq!(
            grid.live_cells().collect::<Vec<_>>(),
            vec![(-1, 1), (0, 1), (1, 1)]
        );
    }

    #[test]
    fn test_glider() {
        let table = life();
        let glider = Grid::from_cells([(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)]);
        let mut grid = glider.clone();
        grid.run(&table, 4);
        grid.shrink_to_fit();
        assert!(grid.same_shape(&glider));
        assert_eq!(grid.offset(), (1, 1));
        assert_eq!(grid.generation(), 4);
    }

    #[test]
    fn test_corner_birth() {
        let table = TransitionTable::from_transitions(&["1c"], &[]).unwrap();
        let mut grid = Grid::from_cells([(0, 0)]);
        grid.step(&table);
        assert_eq!((grid.width(), grid.height()), (3, 3));
        assert_eq!(grid.offset(), (-1, -1));
        assert_eq!(
            grid.live_cells().collect::<Vec<_>>(),
            vec![(-1, -1), (1, -1), (-1, 1), (1, 1)]
        );
    }

    #[test]
    fn test_all_dead() {
        let table = life();
        let mut grid = Grid::empty(4, 5);
        grid.step(&table);
        assert_eq!((grid.width(), grid.height()), (0, 0));
        assert_eq!(grid.generation(), 1);
        grid.step(&table);
        assert_eq!((grid.width(), grid.height()), (0, 0));
        assert_eq!(grid.generation(), 2);

        let mut single = Grid::from_cells([(5, 5)]);
        single.step(&table);
        assert!(single.is_empty());
        assert_eq!((single.width(), single.height()), (0, 0));
    }

    #[test]
    fn test_deterministic() {
        let table = life();
        let mut a = soup(1);
        let mut b = soup(1);
        a.run(&table, 30);
        b.run(&table, 30);
        assert_eq!(a, b);
    }

    #[test]
    fn test_non_interaction() {
        let table = life();
        let generations = 10;

        let mut a = soup(2);
        let mut b = soup(3).with_offset(100, 0);
        let mut both = Grid::from_cells(a.live_cells().chain(b.live_cells()));

        a.run(&table, generations);
        b.run(&table, generations);
        both.run(&table, generations);

        let mut expected = a.live_cells().chain(b.live_cells()).collect::<Vec<_>>();
        let mut actual = both.live_cells().collect::<Vec<_>>();
        expected.sort_unstable();
        actual.sort_unstable();
        assert_eq!(actual, expected);
    }
}
