use crate::{rule::TransitionTable, step};
use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Display, Formatter};

/// A dense rectangular region of the plane.
///
/// Cells are stored row-major, one byte per cell. Cells outside the buffer are dead.
///
/// The cell at buffer position `(0, 0)` lies at plane position `(x_offset, y_offset)`.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Grid {
    /// Number of rows.
    height: usize,

    /// Number of columns.
    width: usize,

    /// Plane position of the leftmost column.
    x_offset: i64,

    /// Plane position of the topmost row.
    y_offset: i64,

    /// Number of generations this grid has been run for.
    generation: u64,

    /// The cells, `0` for dead and `1` for alive.
    cells: Vec<u8>,
}

impl Debug for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("height", &self.height)
            .field("width", &self.width)
            .field("offset", &(self.x_offset, self.y_offset))
            .field("generation", &self.generation)
            .field("population", &self.population())
            .finish_non_exhaustive()
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width.max(1)) {
            for &cell in row {
                write!(f, "{}", if cell != 0 { 'o' } else { '.' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Grid {
    /// Create a grid from a row-major buffer.
    ///
    /// # Panics
    ///
    /// Panics if the buffer length is not `height * width`.
    pub fn new(height: usize, width: usize, cells: Vec<u8>) -> Self {
        assert_eq!(
            cells.len(),
            height * width,
            "buffer length does not match the grid size"
        );
        Self {
            height,
            width,
            x_offset: 0,
            y_offset: 0,
            generation: 0,
            cells: cells.into_iter().map(|c| (c != 0) as u8).collect(),
        }
    }

    /// Create a grid with all cells dead.
    pub fn empty(height: usize, width: usize) -> Self {
        Self::new(height, width, vec![0; height * width])
    }

    /// Create the smallest grid containing the given living cells, in plane coordinates.
    pub fn from_cells<I: IntoIterator<Item = (i64, i64)>>(cells: I) -> Self {
        let cells = cells.into_iter().collect::<Vec<_>>();
        let Some(&(x0, y0)) = cells.first() else {
            return Self::default();
        };

        let (mut min_x, mut min_y, mut max_x, mut max_y) = (x0, y0, x0, y0);
        for &(x, y) in &cells {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }

        let width = (max_x - min_x + 1) as usize;
        let height = (max_y - min_y + 1) as usize;
        let mut grid = Self::empty(height, width).with_offset(min_x, min_y);
        for (x, y) in cells {
            grid.set((x - min_x) as usize, (y - min_y) as usize, true);
        }
        grid
    }

    /// Create a random soup where each cell is alive with the given probability.
    ///
    /// # Panics
    ///
    /// Panics if `density` is not in `[0, 1]`.
    pub fn random<R: Rng + ?Sized>(height: usize, width: usize, density: f64, rng: &mut R) -> Self {
        let cells = (0..height * width)
            .map(|_| rng.gen_bool(density) as u8)
            .collect();
        Self::new(height, width, cells)
    }

    /// Set the plane position of the top-left cell.
    #[inline]
    pub const fn with_offset(mut self, x_offset: i64, y_offset: i64) -> Self {
        self.x_offset = x_offset;
        self.y_offset = y_offset;
        self
    }

    /// Set the generation counter.
    #[inline]
    pub const fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    /// Number of rows.
    #[inline]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Number of columns.
    #[inline]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Plane position of the top-left cell.
    #[inline]
    pub const fn offset(&self) -> (i64, i64) {
        (self.x_offset, self.y_offset)
    }

    /// Number of generations this grid has been run for.
    #[inline]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// The row-major cell buffer.
    #[inline]
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Whether the cell at buffer position `(x, y)` is alive.
    ///
    /// Cells outside the buffer are dead.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.cells[y * self.width + x] != 0
    }

    /// Whether the cell at plane position `(x, y)` is alive.
    pub fn get_plane(&self, x: i64, y: i64) -> bool {
        let (x, y) = (x - self.x_offset, y - self.y_offset);
        x >= 0 && y >= 0 && self.get(x as usize, y as usize)
    }

    /// Set the cell at buffer position `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the position is outside the buffer.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, alive: bool) {
        assert!(x < self.width && y < self.height, "cell out of bounds");
        self.cells[y * self.width + x] = alive as u8;
    }

    /// The cell at a signed buffer position, as `0` or `1`.
    #[inline]
    pub(crate) fn bit(&self, x: isize, y: isize) -> usize {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            0
        } else {
            self.cells[y as usize * self.width + x as usize] as usize
        }
    }

    /// Number of living cells.
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&c| c != 0).count()
    }

    /// Whether there are no living cells.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&c| c == 0)
    }

    /// Plane positions of all living cells, in row-major order.
    pub fn live_cells(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        let width = self.width.max(1);
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &c)| c != 0)
            .map(move |(i, _)| {
                (
                    self.x_offset + (i % width) as i64,
                    self.y_offset + (i / width) as i64,
                )
            })
    }

    /// Replace the contents of the grid after a generation.
    pub(crate) fn commit(
        &mut self,
        height: usize,
        width: usize,
        cells: Vec<u8>,
        left: usize,
        up: usize,
    ) {
        debug_assert_eq!(cells.len(), height * width);
        self.height = height;
        self.width = width;
        self.cells = cells;
        self.x_offset -= left as i64;
        self.y_offset -= up as i64;
        self.generation += 1;
    }

    /// Drop every cell, keeping the offset and the generation.
    pub(crate) fn clear(&mut self) {
        self.height = 0;
        self.width = 0;
        self.cells.clear();
    }

    /// The bounding box of the living cells in buffer coordinates,
    /// as `(min_x, min_y, max_x, max_y)`.
    pub fn bounding_box(&self) -> Option<(usize, usize, usize, usize)> {
        let mut bounds: Option<(usize, usize, usize, usize)> = None;
        for y in 0..self.height {
            for x in 0..self.width {
                if self.cells[y * self.width + x] == 0 {
                    continue;
                }
                bounds = Some(match bounds {
                    None => (x, y, x, y),
                    Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
                });
            }
        }
        bounds
    }

    /// Shrink the grid to the bounding box of its living cells.
    ///
    /// An empty grid becomes 0x0.
    pub fn shrink_to_fit(&mut self) {
        match self.bounding_box() {
            None => self.clear(),
            Some((x0, y0, x1, y1)) => {
                if x0 == 0 && y0 == 0 && x1 + 1 == self.width && y1 + 1 == self.height {
                    return;
                }
                *self = self.copy_part(x0, y0, x1 - x0 + 1, y1 - y0 + 1);
            }
        }
    }

    /// Extract a sub-rectangle, keeping its position in the plane.
    ///
    /// # Panics
    ///
    /// Panics if the rectangle is not inside the grid.
    pub fn copy_part(&self, x: usize, y: usize, width: usize, height: usize) -> Self {
        assert!(
            x + width <= self.width && y + height <= self.height,
            "rectangle out of bounds"
        );
        let mut cells = Vec::with_capacity(width * height);
        for row in y..y + height {
            let start = row * self.width + x;
            cells.extend_from_slice(&self.cells[start..start + width]);
        }
        Self {
            height,
            width,
            x_offset: self.x_offset + x as i64,
            y_offset: self.y_offset + y as i64,
            generation: self.generation,
            cells,
        }
    }

    /// Grow the grid with dead cells on each side, keeping its position in the plane.
    pub fn expand(&mut self, up: usize, down: usize, left: usize, right: usize) {
        let height = self.height + up + down;
        let width = self.width + left + right;
        let mut cells = vec![0; height * width];
        for (y, row) in self.cells.chunks(self.width.max(1)).enumerate() {
            let start = (y + up) * width + left;
            cells[start..start + row.len()].copy_from_slice(row);
        }
        self.height = height;
        self.width = width;
        self.cells = cells;
        self.x_offset -= left as i64;
        self.y_offset -= up as i64;
    }

    /// Whether two grids hold the same cells, ignoring their positions and generations.
    pub fn same_shape(&self, other: &Self) -> bool {
        self.height == other.height && self.width == other.width && self.cells == other.cells
    }

    /// Number of king-wise connected components of living cells.
    pub fn component_count(&self) -> usize {
        let mut seen = vec![false; self.cells.len()];
        let mut stack = Vec::new();
        let mut count = 0;

        for start in 0..self.cells.len() {
            if self.cells[start] == 0 || seen[start] {
                continue;
            }
            count += 1;
            seen[start] = true;
            stack.push(start);

            while let Some(i) = stack.pop() {
                let (x, y) = ((i % self.width) as isize, (i / self.width) as isize);
                for dy in -1..=1 {
                    for dx in -1..=1 {
                        if self.bit(x + dx, y + dy) == 0 {
                            continue;
                        }
                        let j = (y + dy) as usize * self.width + (x + dx) as usize;
                        if !seen[j] {
                            seen[j] = true;
                            stack.push(j);
                        }
                    }
                }
            }
        }

        count
    }

    /// Run the grid for one generation.
    #[inline]
    pub fn step(&mut self, table: &TransitionTable) {
        step::step(self, table);
    }

    /// Run the grid for the given number of generations.
    pub fn run(&mut self, table: &TransitionTable, generations: u64) {
        for _ in 0..generations {
            self.step(table);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cells() {
        let grid = Grid::from_cells([(3, -1), (5, 0), (4, 2)]);
        assert_eq!((grid.width(), grid.height()), (3, 4));
        assert_eq!(grid.offset(), (3, -1));
        assert_eq!(grid.population(), 3);
        assert!(grid.get(0, 0));
        assert!(grid.get_plane(4, 2));
        assert!(!grid.get_plane(4, 1));
        assert_eq!(
            grid.live_cells().collect::<Vec<_>>(),
            vec![(3, -1), (5, 0), (4, 2)]
        );
    }

    #[test]
    fn test_shrink_to_fit() {
        let mut grid = Grid::empty(5, 6).with_offset(10, 20);
        grid.set(2, 1, true);
        grid.set(3, 3, true);
        grid.shrink_to_fit();
        assert_eq!((grid.width(), grid.height()), (2, 3));
        assert_eq!(grid.offset(), (12, 21));
        assert_eq!(grid.to_string(), "o.\n..\n.o\n");

        let mut empty = Grid::empty(3, 3);
        empty.shrink_to_fit();
        assert_eq!((empty.width(), empty.height()), (0, 0));
        assert!(empty.is_empty());
    }

    #[test]
    fn test_expand_keeps_position() {
        let mut grid = Grid::from_cells([(0, 0), (1, 1)]);
        let cells = grid.live_cells().collect::<Vec<_>>();
        grid.expand(1, 2, 3, 4);
        assert_eq!((grid.width(), grid.height()), (9, 5));
        assert_eq!(grid.live_cells().collect::<Vec<_>>(), cells);
    }

    #[test]
    fn test_component_count() {
        let grid = Grid::from_cells([(0, 0), (1, 1), (3, 0), (3, 1), (0, 3)]);
        assert_eq!(grid.component_count(), 3);
        assert_eq!(Grid::default().component_count(), 0);
    }

    #[test]
    fn test_same_shape() {
        let a = Grid::from_cells([(0, 0), (1, 0)]);
        let b = Grid::from_cells([(7, 3), (8, 3)]).with_generation(4);
        assert!(a.same_shape(&b));
        assert_ne!(a, b);
    }
}
