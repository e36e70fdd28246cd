//! Reading and writing patterns in the RLE format.

use crate::{error::RleError, grid::Grid, rule::TransitionTable};
use std::fmt::Write;

/// Maximum length of a line in the RLE body.
const LINE_WIDTH: usize = 70;

/// Appends runs to the RLE body, wrapping lines.
struct RunWriter {
    body: String,
    line: usize,
}

impl RunWriter {
    fn push(&mut self, count: usize, tag: char) {
        if count == 0 {
            return;
        }
        let run = if count == 1 {
            tag.to_string()
        } else {
            format!("{count}{tag}")
        };
        if self.line + run.len() > LINE_WIDTH {
            self.body.push('\n');
            self.line = 0;
        }
        self.line += run.len();
        self.body.push_str(&run);
    }
}

/// Output a grid in RLE format.
///
/// - Dead cells are represented by `b`.
/// - Alive cells are represented by `o`.
/// - Rows are separated by `$`, and runs of empty rows are merged.
/// - The whole pattern is terminated by `!`.
///
/// The header includes the rule when a transition table is given.
pub fn to_rle(grid: &Grid, rule: Option<&TransitionTable>) -> String {
    let mut s = String::new();
    let _ = write!(s, "x = {}, y = {}", grid.width(), grid.height());
    if let Some(rule) = rule {
        let _ = write!(s, ", rule = {rule}");
    }
    s.push('\n');

    let mut writer = RunWriter {
        body: String::new(),
        line: 0,
    };
    let mut pending_rows = 0;

    for y in 0..grid.height() {
        let mut run = (0, false);
        let mut row_started = false;

        for x in 0..grid.width() {
            let alive = grid.get(x, y);
            if run.0 > 0 && run.1 != alive {
                if !row_started {
                    writer.push(pending_rows, '$');
                    pending_rows = 0;
                    row_started = true;
                }
                writer.push(run.0, if run.1 { 'o' } else { 'b' });
                run.0 = 0;
            }
            run = (run.0 + 1, alive);
        }

        // Trailing dead cells are omitted.
        if run.1 {
            if !row_started {
                writer.push(pending_rows, '$');
                pending_rows = 0;
            }
            writer.push(run.0, 'o');
        }
        pending_rows += 1;
    }

    writer.push(1, '!');
    s.push_str(&writer.body);
    s.push('\n');
    s
}

/// Parse the `x = .., y = ..` header line, returning the width and height.
fn parse_header(line: &str) -> Result<(usize, usize), RleError> {
    let invalid = || RleError::InvalidHeader(line.to_string());
    let mut width = None;
    let mut height = None;

    for field in line.split(',') {
        let (key, value) = field.split_once('=').ok_or_else(invalid)?;
        match key.trim() {
            "x" => width = Some(value.trim().parse().map_err(|_| invalid())?),
            "y" => height = Some(value.trim().parse().map_err(|_| invalid())?),
            _ => {}
        }
    }

    Ok((width.ok_or_else(invalid)?, height.ok_or_else(invalid)?))
}

/// Parse a pattern in RLE format.
///
/// Lines starting with `#` are ignored. The header line is optional; without it, the grid is
/// the bounding box of the living cells. Any letter other than `b` counts as a living cell.
pub fn from_rle(rle: &str) -> Result<Grid, RleError> {
    let mut size = None;
    let mut cells = Vec::new();
    let (mut x, mut y) = (0_i64, 0_i64);
    let mut count: Option<usize> = None;

    'lines: for line in rle.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with('x') {
            size = Some(parse_header(line)?);
            continue;
        }

        for c in line.chars() {
            if let Some(d) = c.to_digit(10) {
                let n = count.unwrap_or(0);
                count = Some(
                    n.checked_mul(10)
                        .and_then(|n| n.checked_add(d as usize))
                        .ok_or(RleError::RunTooLong)?,
                );
                continue;
            }

            let n = count.take().unwrap_or(1);
            let n = i64::try_from(n).map_err(|_| RleError::RunTooLong)?;
            match c {
                'b' | '.' => x += n,
                '$' => {
                    x = 0;
                    y += n;
                }
                '!' => break 'lines,
                c if c.is_ascii_alphabetic() => {
                    cells.extend((x..x + n).map(|x| (x, y)));
                    x += n;
                }
                c if c.is_whitespace() => {}
                c => return Err(RleError::InvalidChar(c)),
            }
        }
    }

    let grid = Grid::from_cells(cells.iter().copied());
    let Some((width, height)) = size else {
        return Ok(grid);
    };

    // Place the cells in the declared box, which may be larger than the bounding box.
    let mut boxed = Grid::empty(height, width);
    for (x, y) in cells {
        let (x, y) = (x as usize, y as usize);
        if x >= width || y >= height {
            return Err(RleError::InvalidHeader(format!(
                "cell ({x}, {y}) lies outside the declared {width}x{height} pattern"
            )));
        }
        boxed.set(x, y, true);
    }
    Ok(boxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_rle() {
        let glider = Grid::from_cells([(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)]);
        assert_eq!(to_rle(&glider, None), "x = 3, y = 3\nbo$2bo$3o!\n");

        let life = TransitionTable::life_like(&[3], &[2, 3]);
        let gap = Grid::from_cells([(0, 0), (0, 3)]);
        assert_eq!(
            to_rle(&gap, Some(&life)),
            "x = 1, y = 4, rule = B3/S23\no3$o!\n"
        );

        assert_eq!(to_rle(&Grid::default(), None), "x = 0, y = 0\n!\n");
    }

    #[test]
    fn test_wrap() {
        let row = Grid::from_cells((0..100).step_by(2).map(|x| (x, 0)));
        let rle = to_rle(&row, None);
        assert!(rle.lines().all(|line| line.len() <= LINE_WIDTH));
        assert_eq!(from_rle(&rle).unwrap(), row);
    }

    #[test]
    fn test_from_rle() {
        let rle = "#N Glider\n#C A comment\nx = 3, y = 3, rule = B3/S23\nbo$2bo$3o!";
        let glider = from_rle(rle).unwrap();
        assert_eq!((glider.width(), glider.height()), (3, 3));
        assert_eq!(
            glider.live_cells().collect::<Vec<_>>(),
            vec![(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)]
        );

        let padded = from_rle("x = 4, y = 2\nbo!").unwrap();
        assert_eq!((padded.width(), padded.height()), (4, 2));
        assert_eq!(padded.population(), 1);

        let headless = from_rle("2o$\n2o!").unwrap();
        assert_eq!(headless.population(), 4);
        assert_eq!((headless.width(), headless.height()), (2, 2));
    }

    #[test]
    fn test_invalid() {
        assert!(matches!(
            from_rle("x = three, y = 3\no!"),
            Err(RleError::InvalidHeader(_))
        ));
        assert_eq!(from_rle("o*o!"), Err(RleError::InvalidChar('*')));
        assert_eq!(
            from_rle("99999999999999999999999o!"),
            Err(RleError::RunTooLong)
        );
        assert!(from_rle("x = 1, y = 1\n2o!").is_err());
    }
}
