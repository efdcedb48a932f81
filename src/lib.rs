// Code lints

#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
#![warn(unreachable_pub)]
#![warn(unused_import_braces)]
#![warn(unused_lifetimes)]
#![warn(unused_qualifications)]

// Doc lints

#![warn(missing_docs)]

//! This crate implements a hybrid engine for 9x9 Sudoku. It supports the
//! following key features:
//!
//! * Parsing and printing Sudoku grids
//! * Generating completely filled, valid grids by constrained backtracking
//! and deriving puzzles from them by removing clues
//! * Solving puzzles with an evolutionary search over candidate grids
//! * Refining imperfect evolutionary results with an exact backtracking
//! solver
//!
//! # Parsing and printing grids
//!
//! See [SudokuGrid::parse] for the exact format of a grid code. Codes can be
//! used to exchange grids, while pretty prints can be used to display a grid
//! in a clearer manner.
//!
//! ```
//! use sudoku_genetic::SudokuGrid;
//! use sudoku_genetic::fitness::{fitness, MAX_FITNESS};
//!
//! let solved = SudokuGrid::parse(
//!     "5,3,4,6,7,8,9,1,2,\
//!      6,7,2,1,9,5,3,4,8,\
//!      1,9,8,3,4,2,5,6,7,\
//!      8,5,9,7,6,1,4,2,3,\
//!      4,2,6,8,5,3,7,9,1,\
//!      7,1,3,9,2,4,8,5,6,\
//!      9,6,1,5,3,7,2,8,4,\
//!      2,8,7,4,1,9,6,3,5,\
//!      3,4,5,2,8,6,1,7,9").unwrap();
//! println!("{}", solved);
//! assert_eq!(MAX_FITNESS, fitness(&solved));
//! ```
//!
//! # Generating puzzles
//!
//! Generation is done in two steps: producing a full grid with a
//! [Generator](generator::Generator) and then removing a difficulty-dependent
//! number of clues with a [Reducer](generator::Reducer). Both use the `Rng`
//! trait from the [rand](https://rust-random.github.io/rand/rand/index.html)
//! crate, so seeded generators can be injected for reproducible runs.
//!
//! ```
//! use sudoku_genetic::generator::{Difficulty, Generator, Reducer};
//!
//! let mut generator = Generator::new_default();
//! let mut reducer = Reducer::new_default();
//!
//! let mut grid = generator.generate_full().unwrap();
//! reducer.reduce(&mut grid, Difficulty::Easy);
//!
//! assert_eq!(51, grid.count_clues());
//! ```
//!
//! Note that the reducer does *not* check that the reduced puzzle still has
//! a unique solution. See [Reducer::reduce](generator::Reducer::reduce).
//!
//! # Solving puzzles
//!
//! The [HybridSolver](solver::HybridSolver) first runs an evolutionary
//! search (see the [genetic] module) and, if that stalls short of a perfect
//! solution, falls back to the exact
//! [BacktrackingSolver](solver::BacktrackingSolver).
//!
//! ```
//! use sudoku_genetic::SudokuGrid;
//! use sudoku_genetic::genetic::EvolutionConfig;
//! use sudoku_genetic::solver::HybridSolver;
//!
//! let puzzle = SudokuGrid::parse(
//!     "5,3,,,7,,,,,\
//!      6,,,1,9,5,,,,\
//!      ,9,8,,,,,6,,\
//!      8,,,,6,,,,3,\
//!      4,,,8,,3,,,1,\
//!      7,,,,2,,,,6,\
//!      ,6,,,,,2,8,,\
//!      ,,,4,1,9,,,5,\
//!      ,,,,8,,,7,9").unwrap();
//! let config = EvolutionConfig {
//!     generations: 100,
//!     population_size: 50,
//!     ..EvolutionConfig::default()
//! };
//! let mut solver = HybridSolver::new(config, rand::thread_rng()).unwrap();
//! let report = solver.solve(&puzzle).unwrap();
//!
//! assert!(report.is_valid_solution);
//! ```

pub mod error;
pub mod fitness;
pub mod generator;
pub mod genetic;
pub mod solver;
pub mod util;

use error::{
    SudokuError,
    SudokuParseError,
    SudokuParseResult,
    SudokuResult
};
use util::DigitSet;

use serde::{Deserialize, Serialize};

use std::convert::TryFrom;
use std::fmt::{self, Display, Formatter};

/// The width and height of a Sudoku grid, in cells.
pub const SIZE: usize = 9;

/// The width and height of one of the nine boxes of a Sudoku grid, in cells.
pub const BOX_SIZE: usize = 3;

/// The total number of cells in a Sudoku grid.
pub const CELL_COUNT: usize = SIZE * SIZE;

pub(crate) fn index(column: usize, row: usize) -> usize {
    row * SIZE + column
}

/// Computes the index of the box which contains the cell at the given
/// position. Boxes are numbered 0 to 8 in row-major order, i.e. the top-left
/// box has index 0 and the bottom-right box has index 8. Both `column` and
/// `row` must be less than [SIZE].
pub fn box_index(column: usize, row: usize) -> usize {
    (row / BOX_SIZE) * BOX_SIZE + column / BOX_SIZE
}

/// A 9x9 Sudoku grid. Each cell may or may not be occupied by a digit from 1
/// to 9. In the integer representation used at the conversion boundary (see
/// [SudokuGrid::from_rows]), `0` denotes an empty cell.
///
/// The grid itself does not enforce the Sudoku rules. Use
/// [fitness](crate::fitness::fitness) to measure how well a grid satisfies
/// them, or [TrackedGrid] for rule-checked cell writes.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(into = "Vec<Vec<usize>>", try_from = "Vec<Vec<usize>>")]
pub struct SudokuGrid {
    cells: Vec<Option<usize>>
}

fn to_char(cell: Option<usize>) -> char {
    if let Some(n) = cell {
        (b'0' + n as u8) as char
    }
    else {
        ' '
    }
}

fn line(start: char, thick_sep: char, thin_sep: char,
        segment: impl Fn(usize) -> char, pad: char, end: char, newline: bool)
        -> String {
    let mut result = String::new();

    for x in 0..SIZE {
        if x == 0 {
            result.push(start);
        }
        else if x % BOX_SIZE == 0 {
            result.push(thick_sep);
        }
        else {
            result.push(thin_sep);
        }

        result.push(pad);
        result.push(segment(x));
        result.push(pad);
    }

    result.push(end);

    if newline {
        result.push('\n');
    }

    result
}

fn top_row() -> String {
    line('╔', '╦', '╤', |_| '═', '═', '╗', true)
}

fn thin_separator_line() -> String {
    line('╟', '╫', '┼', |_| '─', '─', '╢', true)
}

fn thick_separator_line() -> String {
    line('╠', '╬', '╪', |_| '═', '═', '╣', true)
}

fn bottom_row() -> String {
    line('╚', '╩', '╧', |_| '═', '═', '╝', false)
}

fn content_row(grid: &SudokuGrid, y: usize) -> String {
    line('║', '║', '│', |x| to_char(grid.get_cell(x, y).unwrap()), ' ', '║',
        true)
}

impl Display for SudokuGrid {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let thin_separator_line = thin_separator_line();
        let thick_separator_line = thick_separator_line();

        for y in 0..SIZE {
            if y == 0 {
                f.write_str(top_row().as_str())?;
            }
            else if y % BOX_SIZE == 0 {
                f.write_str(thick_separator_line.as_str())?;
            }
            else {
                f.write_str(thin_separator_line.as_str())?;
            }

            f.write_str(content_row(self, y).as_str())?;
        }

        f.write_str(bottom_row().as_str())?;
        Ok(())
    }
}

fn to_string(cell: &Option<usize>) -> String {
    if let Some(number) = cell {
        number.to_string()
    }
    else {
        String::from("")
    }
}

impl SudokuGrid {

    /// Creates a new, empty 9x9 Sudoku grid.
    pub fn new() -> SudokuGrid {
        SudokuGrid {
            cells: vec![None; CELL_COUNT]
        }
    }

    /// Parses a code encoding a Sudoku grid. The code is a comma-separated
    /// list of exactly 81 entries, which are either empty, `0`, or a digit
    /// from 1 to 9. Both an empty entry and `0` denote an empty cell. The
    /// entries are assigned left-to-right, top-to-bottom, where each row is
    /// completed before the next one is started. Whitespace in the entries
    /// is ignored to allow for more intuitive formatting.
    ///
    /// As an example, the code `5,3,,,7,,,,,6,,,1,9,5,,,,[...]` will parse
    /// to a grid whose first row starts with the digits 5 and 3.
    ///
    /// # Errors
    ///
    /// Any specialization of `SudokuParseError` (see that documentation).
    pub fn parse(code: &str) -> SudokuParseResult<SudokuGrid> {
        let entries: Vec<&str> = code.split(',').collect();

        if entries.len() != CELL_COUNT {
            return Err(SudokuParseError::WrongNumberOfCells);
        }

        let mut grid = SudokuGrid::new();

        for (i, entry) in entries.iter().enumerate() {
            let entry = entry.trim();

            if entry.is_empty() {
                continue;
            }

            let number = entry.parse::<usize>()?;

            if number > SIZE {
                return Err(SudokuParseError::InvalidNumber);
            }

            if number > 0 {
                grid.cells[i] = Some(number);
            }
        }

        Ok(grid)
    }

    /// Converts the grid into a `String` in a way that is consistent with
    /// [SudokuGrid::parse]. That is, a grid that is converted to a string
    /// and parsed again will not change.
    ///
    /// ```
    /// use sudoku_genetic::SudokuGrid;
    ///
    /// let mut grid = SudokuGrid::new();
    /// grid.set_cell(1, 1, 4).unwrap();
    ///
    /// let grid_str = grid.to_parseable_string();
    /// let grid_parsed = SudokuGrid::parse(grid_str.as_str()).unwrap();
    /// assert_eq!(grid, grid_parsed);
    /// ```
    pub fn to_parseable_string(&self) -> String {
        self.cells.iter()
            .map(to_string)
            .collect::<Vec<String>>()
            .join(",")
    }

    /// Creates a grid from nested rows of integers, where each cell is a
    /// number from 0 to 9 and 0 denotes an empty cell. This is the
    /// representation used by the JSON wire format.
    ///
    /// # Errors
    ///
    /// * `SudokuParseError::WrongNumberOfRows` If `rows` does not contain
    /// exactly 9 rows.
    /// * `SudokuParseError::WrongNumberOfCells` If any row does not contain
    /// exactly 9 cells.
    /// * `SudokuParseError::InvalidNumber` If any cell contains a number
    /// greater than 9.
    pub fn from_rows(rows: &[Vec<usize>]) -> SudokuParseResult<SudokuGrid> {
        if rows.len() != SIZE {
            return Err(SudokuParseError::WrongNumberOfRows);
        }

        let mut grid = SudokuGrid::new();

        for (row, row_values) in rows.iter().enumerate() {
            if row_values.len() != SIZE {
                return Err(SudokuParseError::WrongNumberOfCells);
            }

            for (column, &number) in row_values.iter().enumerate() {
                if number > SIZE {
                    return Err(SudokuParseError::InvalidNumber);
                }

                if number > 0 {
                    grid.cells[index(column, row)] = Some(number);
                }
            }
        }

        Ok(grid)
    }

    /// Converts the grid into nested rows of integers, where each cell is a
    /// number from 0 to 9 and 0 denotes an empty cell. This is the inverse
    /// of [SudokuGrid::from_rows].
    pub fn to_rows(&self) -> Vec<Vec<usize>> {
        (0..SIZE)
            .map(|row| (0..SIZE)
                .map(|column| self.cells[index(column, row)].unwrap_or(0))
                .collect())
            .collect()
    }

    /// Gets the content of the cell at the specified position.
    ///
    /// # Arguments
    ///
    /// * `column`: The column (x-coordinate) of the desired cell. Must be in
    /// the range `[0, 9[`.
    /// * `row`: The row (y-coordinate) of the desired cell. Must be in the
    /// range `[0, 9[`.
    ///
    /// # Errors
    ///
    /// If either `column` or `row` are not in the specified range. In that
    /// case, `SudokuError::OutOfBounds` is returned.
    pub fn get_cell(&self, column: usize, row: usize)
            -> SudokuResult<Option<usize>> {
        if column >= SIZE || row >= SIZE {
            Err(SudokuError::OutOfBounds)
        }
        else {
            Ok(self.cells[index(column, row)])
        }
    }

    /// Indicates whether the cell at the specified position has the given
    /// number. This will return `false` if there is a different number in
    /// that cell or it is empty.
    ///
    /// # Errors
    ///
    /// If either `column` or `row` are greater than or equal to 9. In that
    /// case, `SudokuError::OutOfBounds` is returned.
    pub fn has_number(&self, column: usize, row: usize, number: usize)
            -> SudokuResult<bool> {
        if let Some(content) = self.get_cell(column, row)? {
            Ok(number == content)
        }
        else {
            Ok(false)
        }
    }

    /// Sets the content of the cell at the specified position to the given
    /// number. If the cell was not empty, the old number will be
    /// overwritten.
    ///
    /// # Arguments
    ///
    /// * `column`: The column (x-coordinate) of the assigned cell. Must be
    /// in the range `[0, 9[`.
    /// * `row`: The row (y-coordinate) of the assigned cell. Must be in the
    /// range `[0, 9[`.
    /// * `number`: The number to assign to the specified cell. Must be in
    /// the range `[1, 9]`.
    ///
    /// # Errors
    ///
    /// * `SudokuError::OutOfBounds` If either `column` or `row` are not in
    /// the specified range.
    /// * `SudokuError::InvalidNumber` If `number` is not in the specified
    /// range.
    pub fn set_cell(&mut self, column: usize, row: usize, number: usize)
            -> SudokuResult<()> {
        if column >= SIZE || row >= SIZE {
            return Err(SudokuError::OutOfBounds);
        }

        if number == 0 || number > SIZE {
            return Err(SudokuError::InvalidNumber);
        }

        self.cells[index(column, row)] = Some(number);
        Ok(())
    }

    /// Clears the content of the cell at the specified position, that is, if
    /// it contains a number, that number is removed. If the cell is already
    /// empty, it will be left that way.
    ///
    /// # Errors
    ///
    /// If either `column` or `row` are greater than or equal to 9. In that
    /// case, `SudokuError::OutOfBounds` is returned.
    pub fn clear_cell(&mut self, column: usize, row: usize)
            -> SudokuResult<()> {
        if column >= SIZE || row >= SIZE {
            return Err(SudokuError::OutOfBounds);
        }

        self.cells[index(column, row)] = None;
        Ok(())
    }

    /// Counts the number of clues given by this grid. This is the number of
    /// non-empty cells.
    pub fn count_clues(&self) -> usize {
        self.cells.iter()
            .filter(|c| c.is_some())
            .count()
    }

    /// Indicates whether this grid is full, i.e. every cell is filled with a
    /// number. In this case, [SudokuGrid::count_clues] returns 81.
    pub fn is_full(&self) -> bool {
        !self.cells.iter().any(|c| c == &None)
    }

    /// Indicates whether this grid is empty, i.e. no cell is filled with a
    /// number. In this case, [SudokuGrid::count_clues] returns 0.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| c == &None)
    }

    /// Indicates whether this grid configuration is a subset of another one.
    /// That is, all cells filled in this grid with some number must be
    /// filled in `other` with the same number.
    pub fn is_subset(&self, other: &SudokuGrid) -> bool {
        self.cells.iter()
            .zip(other.cells.iter())
            .all(|(self_cell, other_cell)| {
                match self_cell {
                    Some(self_number) =>
                        match other_cell {
                            Some(other_number) => self_number == other_number,
                            None => false
                        },
                    None => true
                }
            })
    }
}

impl Default for SudokuGrid {
    fn default() -> SudokuGrid {
        SudokuGrid::new()
    }
}

impl From<SudokuGrid> for Vec<Vec<usize>> {
    fn from(grid: SudokuGrid) -> Vec<Vec<usize>> {
        grid.to_rows()
    }
}

impl TryFrom<Vec<Vec<usize>>> for SudokuGrid {
    type Error = SudokuParseError;

    fn try_from(rows: Vec<Vec<usize>>) -> SudokuParseResult<SudokuGrid> {
        SudokuGrid::from_rows(&rows)
    }
}

/// Records which cells of a puzzle were given as clues. The mask is derived
/// once from the input puzzle and stays immutable for the lifetime of a
/// solve; every operator that rewrites cells consults it first and never
/// alters a fixed cell.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClueMask {
    fixed: Vec<bool>
}

impl ClueMask {

    /// Derives the clue mask of the given puzzle. Every non-empty cell is
    /// considered a clue.
    pub fn from_puzzle(puzzle: &SudokuGrid) -> ClueMask {
        ClueMask {
            fixed: puzzle.cells.iter()
                .map(|c| c.is_some())
                .collect()
        }
    }

    /// Indicates whether the cell at the specified position was given as a
    /// clue, i.e. must never be rewritten.
    ///
    /// # Errors
    ///
    /// If either `column` or `row` are greater than or equal to 9. In that
    /// case, `SudokuError::OutOfBounds` is returned.
    pub fn is_fixed(&self, column: usize, row: usize) -> SudokuResult<bool> {
        if column >= SIZE || row >= SIZE {
            Err(SudokuError::OutOfBounds)
        }
        else {
            Ok(self.fixed[index(column, row)])
        }
    }

    /// Returns the columns within the given row whose cells are *not* fixed
    /// by this mask, in ascending order. These are the cells the genetic
    /// operators are allowed to rewrite.
    ///
    /// # Errors
    ///
    /// If `row` is greater than or equal to 9. In that case,
    /// `SudokuError::OutOfBounds` is returned.
    pub fn free_columns(&self, row: usize) -> SudokuResult<Vec<usize>> {
        if row >= SIZE {
            return Err(SudokuError::OutOfBounds);
        }

        Ok((0..SIZE)
            .filter(|&column| !self.fixed[index(column, row)])
            .collect())
    }
}

/// A [SudokuGrid] extended with per-row, per-column, and per-box digit
/// membership sets, which allow testing a candidate placement in O(1). The
/// sets are kept in exact sync with the grid at all times: every write goes
/// through [TrackedGrid::place] or [TrackedGrid::clear], which validate the
/// mutation completely before either the grid or any set changes.
///
/// This is the index structure used by the full-grid generator and the
/// backtracking solver. The genetic operators do not need it, since they
/// maintain a weaker invariant (row-local validity) on plain grids.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TrackedGrid {
    grid: SudokuGrid,
    rows: [DigitSet; SIZE],
    columns: [DigitSet; SIZE],
    boxes: [DigitSet; SIZE]
}

impl TrackedGrid {

    /// Creates a new tracked grid with no digits and empty membership sets.
    pub fn new() -> TrackedGrid {
        TrackedGrid {
            grid: SudokuGrid::new(),
            rows: [DigitSet::new(); SIZE],
            columns: [DigitSet::new(); SIZE],
            boxes: [DigitSet::new(); SIZE]
        }
    }

    /// Creates a tracked grid from the given grid, building the membership
    /// sets from its present digits.
    ///
    /// # Errors
    ///
    /// If the grid contains two equal digits within one row, column, or
    /// box. In that case, `SudokuError::ContradictoryPuzzle` is returned.
    /// This doubles as the consistency validation applied to input puzzles
    /// before any search begins.
    pub fn from_grid(grid: SudokuGrid) -> SudokuResult<TrackedGrid> {
        let mut tracked = TrackedGrid::new();

        for row in 0..SIZE {
            for column in 0..SIZE {
                if let Some(number) = grid.get_cell(column, row).unwrap() {
                    tracked.place(column, row, number)
                        .map_err(|_| SudokuError::ContradictoryPuzzle)?;
                }
            }
        }

        Ok(tracked)
    }

    /// Gets a reference to the underlying [SudokuGrid].
    pub fn grid(&self) -> &SudokuGrid {
        &self.grid
    }

    /// Consumes this tracked grid and returns the underlying [SudokuGrid].
    pub fn into_grid(self) -> SudokuGrid {
        self.grid
    }

    /// Indicates whether the given number could be placed into the cell at
    /// the specified position without duplicating a digit in the cell's
    /// row, column, or box. The content of the cell itself is not
    /// considered.
    ///
    /// # Errors
    ///
    /// * `SudokuError::OutOfBounds` If `column` or `row` are greater than or
    /// equal to 9.
    /// * `SudokuError::InvalidNumber` If `number` is not in the range
    /// `[1, 9]`.
    pub fn allows(&self, column: usize, row: usize, number: usize)
            -> SudokuResult<bool> {
        if column >= SIZE || row >= SIZE {
            return Err(SudokuError::OutOfBounds);
        }

        if number == 0 || number > SIZE {
            return Err(SudokuError::InvalidNumber);
        }

        Ok(!self.rows[row].contains(number) &&
            !self.columns[column].contains(number) &&
            !self.boxes[box_index(column, row)].contains(number))
    }

    /// Returns the set of digits which could be placed into the cell at the
    /// specified position, that is, all digits not yet present in the
    /// cell's row, column, or box.
    ///
    /// # Errors
    ///
    /// If `column` or `row` are greater than or equal to 9. In that case,
    /// `SudokuError::OutOfBounds` is returned.
    pub fn candidates(&self, column: usize, row: usize)
            -> SudokuResult<DigitSet> {
        if column >= SIZE || row >= SIZE {
            return Err(SudokuError::OutOfBounds);
        }

        let used = self.rows[row]
            .union(&self.columns[column])
            .union(&self.boxes[box_index(column, row)]);
        Ok(used.missing())
    }

    /// Places the given number into the cell at the specified position and
    /// inserts it into the row, column, and box membership sets. The
    /// mutation is validated completely before it is applied, so on any
    /// error neither the grid nor any set has changed.
    ///
    /// # Errors
    ///
    /// * `SudokuError::OutOfBounds` If `column` or `row` are greater than or
    /// equal to 9.
    /// * `SudokuError::InvalidNumber` If `number` is not in the range
    /// `[1, 9]`.
    /// * `SudokuError::CellOccupied` If the cell already contains a digit.
    /// * `SudokuError::ConflictingNumber` If the number is already present
    /// in the cell's row, column, or box.
    pub fn place(&mut self, column: usize, row: usize, number: usize)
            -> SudokuResult<()> {
        if self.grid.get_cell(column, row)?.is_some() {
            return Err(SudokuError::CellOccupied);
        }

        if !self.allows(column, row, number)? {
            return Err(SudokuError::ConflictingNumber);
        }

        self.grid.set_cell(column, row, number).unwrap();
        self.rows[row].insert(number);
        self.columns[column].insert(number);
        self.boxes[box_index(column, row)].insert(number);
        Ok(())
    }

    /// Clears the cell at the specified position and removes its digit from
    /// the row, column, and box membership sets. Clearing an empty cell is
    /// a no-op.
    ///
    /// # Errors
    ///
    /// If `column` or `row` are greater than or equal to 9. In that case,
    /// `SudokuError::OutOfBounds` is returned.
    pub fn clear(&mut self, column: usize, row: usize) -> SudokuResult<()> {
        if let Some(number) = self.grid.get_cell(column, row)? {
            self.grid.clear_cell(column, row).unwrap();
            self.rows[row].remove(number);
            self.columns[column].remove(number);
            self.boxes[box_index(column, row)].remove(number);
        }

        Ok(())
    }
}

impl Default for TrackedGrid {
    fn default() -> TrackedGrid {
        TrackedGrid::new()
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn parse_ok() {
        let code = "1,,,2,,,3,,,\
                    ,4,,,5,,,6,,\
                    ,,7,,,8,,,9,\
                    ,,,,,,,,,\
                    ,,,,,,,,,\
                    ,,,,,,,,,\
                    ,,,,,,,,,\
                    ,,,,,,,,,\
                    9,,,,,,,,1";
        let grid = SudokuGrid::parse(code).unwrap();

        assert_eq!(Some(1), grid.get_cell(0, 0).unwrap());
        assert_eq!(Some(2), grid.get_cell(3, 0).unwrap());
        assert_eq!(Some(3), grid.get_cell(6, 0).unwrap());
        assert_eq!(Some(4), grid.get_cell(1, 1).unwrap());
        assert_eq!(Some(5), grid.get_cell(4, 1).unwrap());
        assert_eq!(Some(9), grid.get_cell(0, 8).unwrap());
        assert_eq!(Some(1), grid.get_cell(8, 8).unwrap());
        assert_eq!(None, grid.get_cell(1, 0).unwrap());
        assert_eq!(11, grid.count_clues());
    }

    #[test]
    fn parse_zero_is_empty() {
        let mut code = String::from("0");
        code.push_str(&",0".repeat(CELL_COUNT - 1));
        let grid = SudokuGrid::parse(code.as_str()).unwrap();
        assert!(grid.is_empty());
    }

    #[test]
    fn parse_wrong_number_of_cells() {
        assert_eq!(Err(SudokuParseError::WrongNumberOfCells),
            SudokuGrid::parse("1,2,3"));

        let mut code = ",".repeat(CELL_COUNT - 1);
        code.push(',');
        assert_eq!(Err(SudokuParseError::WrongNumberOfCells),
            SudokuGrid::parse(code.as_str()));
    }

    #[test]
    fn parse_number_format_error() {
        let mut code = String::from("x");
        code.push_str(&",".repeat(CELL_COUNT - 1));
        assert_eq!(Err(SudokuParseError::NumberFormatError),
            SudokuGrid::parse(code.as_str()));
    }

    #[test]
    fn parse_invalid_number() {
        let mut code = String::from("10");
        code.push_str(&",".repeat(CELL_COUNT - 1));
        assert_eq!(Err(SudokuParseError::InvalidNumber),
            SudokuGrid::parse(code.as_str()));
    }

    #[test]
    fn to_parseable_string_round_trip() {
        let mut grid = SudokuGrid::new();
        grid.set_cell(0, 0, 1).unwrap();
        grid.set_cell(4, 2, 5).unwrap();
        grid.set_cell(8, 8, 9).unwrap();

        let code = grid.to_parseable_string();
        assert_eq!(grid, SudokuGrid::parse(code.as_str()).unwrap());
    }

    #[test]
    fn from_rows_ok() {
        let mut rows = vec![vec![0usize; SIZE]; SIZE];
        rows[0][0] = 5;
        rows[8][8] = 9;
        let grid = SudokuGrid::from_rows(&rows).unwrap();

        assert_eq!(Some(5), grid.get_cell(0, 0).unwrap());
        assert_eq!(Some(9), grid.get_cell(8, 8).unwrap());
        assert_eq!(2, grid.count_clues());
        assert_eq!(rows, grid.to_rows());
    }

    #[test]
    fn from_rows_wrong_shape() {
        assert_eq!(Err(SudokuParseError::WrongNumberOfRows),
            SudokuGrid::from_rows(&vec![vec![0usize; SIZE]; SIZE - 1]));

        let mut rows = vec![vec![0usize; SIZE]; SIZE];
        rows[3] = vec![0usize; SIZE + 1];
        assert_eq!(Err(SudokuParseError::WrongNumberOfCells),
            SudokuGrid::from_rows(&rows));
    }

    #[test]
    fn from_rows_invalid_number() {
        let mut rows = vec![vec![0usize; SIZE]; SIZE];
        rows[1][1] = 10;
        assert_eq!(Err(SudokuParseError::InvalidNumber),
            SudokuGrid::from_rows(&rows));
    }

    #[test]
    fn serde_round_trip() {
        let mut grid = SudokuGrid::new();
        grid.set_cell(2, 0, 7).unwrap();
        grid.set_cell(5, 4, 3).unwrap();

        let json = serde_json::to_string(&grid).unwrap();
        let parsed: SudokuGrid = serde_json::from_str(json.as_str()).unwrap();
        assert_eq!(grid, parsed);
    }

    #[test]
    fn serde_wire_format_is_nested_rows() {
        let mut grid = SudokuGrid::new();
        grid.set_cell(1, 0, 2).unwrap();

        let json = serde_json::to_string(&grid).unwrap();
        assert!(json.starts_with("[[0,2,0,"));
    }

    #[test]
    fn serde_rejects_invalid_digit() {
        let mut rows = vec![vec![0usize; SIZE]; SIZE];
        rows[0][0] = 11;
        let json = serde_json::to_string(&rows).unwrap();
        let result: Result<SudokuGrid, _> =
            serde_json::from_str(json.as_str());
        assert!(result.is_err());
    }

    #[test]
    fn cell_access_out_of_bounds() {
        let mut grid = SudokuGrid::new();
        assert_eq!(Err(SudokuError::OutOfBounds), grid.get_cell(9, 0));
        assert_eq!(Err(SudokuError::OutOfBounds), grid.get_cell(0, 9));
        assert_eq!(Err(SudokuError::OutOfBounds), grid.set_cell(9, 0, 1));
        assert_eq!(Err(SudokuError::OutOfBounds), grid.clear_cell(0, 9));
    }

    #[test]
    fn cell_assignment_invalid_number() {
        let mut grid = SudokuGrid::new();
        assert_eq!(Err(SudokuError::InvalidNumber), grid.set_cell(0, 0, 0));
        assert_eq!(Err(SudokuError::InvalidNumber), grid.set_cell(0, 0, 10));
    }

    #[test]
    fn count_clues_and_empty_and_full() {
        let empty = SudokuGrid::new();
        let mut partial = SudokuGrid::new();
        partial.set_cell(0, 0, 1).unwrap();
        partial.set_cell(5, 5, 5).unwrap();

        assert_eq!(0, empty.count_clues());
        assert_eq!(2, partial.count_clues());

        assert!(empty.is_empty());
        assert!(!partial.is_empty());
        assert!(!empty.is_full());
        assert!(!partial.is_full());
    }

    #[test]
    fn subset_relation() {
        let mut small = SudokuGrid::new();
        small.set_cell(0, 0, 1).unwrap();
        let mut large = small.clone();
        large.set_cell(1, 1, 2).unwrap();

        assert!(small.is_subset(&large));
        assert!(!large.is_subset(&small));
        assert!(small.is_subset(&small));

        let mut conflicting = SudokuGrid::new();
        conflicting.set_cell(0, 0, 2).unwrap();
        assert!(!small.is_subset(&conflicting));
    }

    #[test]
    fn box_index_maps_boxes() {
        assert_eq!(0, box_index(0, 0));
        assert_eq!(0, box_index(2, 2));
        assert_eq!(1, box_index(3, 0));
        assert_eq!(2, box_index(8, 1));
        assert_eq!(3, box_index(1, 4));
        assert_eq!(4, box_index(4, 4));
        assert_eq!(8, box_index(8, 8));
    }

    #[test]
    fn clue_mask_marks_clues() {
        let mut puzzle = SudokuGrid::new();
        puzzle.set_cell(0, 0, 5).unwrap();
        puzzle.set_cell(3, 2, 7).unwrap();
        let mask = ClueMask::from_puzzle(&puzzle);

        assert!(mask.is_fixed(0, 0).unwrap());
        assert!(mask.is_fixed(3, 2).unwrap());
        assert!(!mask.is_fixed(1, 0).unwrap());
        assert_eq!(Err(SudokuError::OutOfBounds), mask.is_fixed(9, 0));
    }

    #[test]
    fn clue_mask_free_columns() {
        let mut puzzle = SudokuGrid::new();
        puzzle.set_cell(0, 1, 5).unwrap();
        puzzle.set_cell(4, 1, 7).unwrap();
        let mask = ClueMask::from_puzzle(&puzzle);

        assert_eq!(vec![1, 2, 3, 5, 6, 7, 8], mask.free_columns(1).unwrap());
        assert_eq!((0..SIZE).collect::<Vec<usize>>(),
            mask.free_columns(0).unwrap());
    }

    #[test]
    fn tracked_place_updates_sets() {
        let mut tracked = TrackedGrid::new();
        tracked.place(0, 0, 5).unwrap();

        assert_eq!(Some(5), tracked.grid().get_cell(0, 0).unwrap());
        assert!(!tracked.allows(8, 0, 5).unwrap());
        assert!(!tracked.allows(0, 8, 5).unwrap());
        assert!(!tracked.allows(1, 1, 5).unwrap());
        assert!(tracked.allows(3, 3, 5).unwrap());
    }

    #[test]
    fn tracked_clear_restores_sets() {
        let mut tracked = TrackedGrid::new();
        tracked.place(4, 4, 9).unwrap();
        tracked.clear(4, 4).unwrap();

        assert_eq!(None, tracked.grid().get_cell(4, 4).unwrap());
        assert!(tracked.allows(4, 0, 9).unwrap());
        assert!(tracked.allows(0, 4, 9).unwrap());
    }

    #[test]
    fn tracked_rejected_place_changes_nothing() {
        let mut tracked = TrackedGrid::new();
        tracked.place(0, 0, 5).unwrap();
        let before = tracked.clone();

        assert_eq!(Err(SudokuError::ConflictingNumber),
            tracked.place(8, 0, 5));
        assert_eq!(Err(SudokuError::CellOccupied), tracked.place(0, 0, 6));
        assert_eq!(Err(SudokuError::InvalidNumber), tracked.place(1, 1, 0));
        assert_eq!(Err(SudokuError::OutOfBounds), tracked.place(9, 0, 1));
        assert_eq!(before, tracked);
    }

    #[test]
    fn tracked_candidates_excludes_row_column_and_box() {
        let mut tracked = TrackedGrid::new();
        tracked.place(0, 0, 1).unwrap();
        tracked.place(8, 1, 2).unwrap();
        tracked.place(4, 8, 3).unwrap();

        // cell (4, 1) shares a row with (8, 1) and a column with (4, 8)
        let candidates = tracked.candidates(4, 1).unwrap();
        assert!(candidates.contains(1));
        assert!(!candidates.contains(2));
        assert!(!candidates.contains(3));
        assert_eq!(7, candidates.len());

        let candidates = tracked.candidates(1, 1).unwrap();
        assert!(!candidates.contains(1));
        assert!(!candidates.contains(2));
        assert!(candidates.contains(3));
    }

    #[test]
    fn tracked_from_contradictory_grid_fails() {
        let mut grid = SudokuGrid::new();
        grid.set_cell(0, 0, 5).unwrap();
        grid.set_cell(8, 0, 5).unwrap();

        assert_eq!(Err(SudokuError::ContradictoryPuzzle),
            TrackedGrid::from_grid(grid));
    }

    #[test]
    fn tracked_from_consistent_grid_preserves_cells() {
        let mut grid = SudokuGrid::new();
        grid.set_cell(0, 0, 5).unwrap();
        grid.set_cell(8, 8, 5).unwrap();
        let tracked = TrackedGrid::from_grid(grid.clone()).unwrap();

        assert_eq!(&grid, tracked.grid());
        assert!(!tracked.allows(1, 0, 5).unwrap());
        assert!(tracked.allows(4, 4, 5).unwrap());
    }
}
