//! This module contains logic for generating random Sudoku puzzles.
//!
//! Generation is done by first producing a completely filled, valid grid
//! with a [Generator] and then removing a difficulty-dependent number of
//! clues using a [Reducer].

use crate::{BOX_SIZE, CELL_COUNT, SIZE, SudokuGrid, TrackedGrid};
use crate::error::{ConfigError, SudokuError, SudokuResult};

use rand::Rng;
use rand::rngs::ThreadRng;

use serde::{Deserialize, Serialize};

use std::str::FromStr;

pub(crate) fn shuffle<T>(rng: &mut impl Rng, values: impl Iterator<Item = T>)
        -> Vec<T> {
    let mut vec: Vec<T> = values.collect();
    let len = vec.len();

    if len > 1 {
        for i in 0..(len - 1) {
            let j = rng.gen_range(i..len);
            vec.swap(i, j);
        }
    }

    vec
}

/// The difficulty tier of a generated puzzle. Each tier maps to a fixed
/// number of cells that the [Reducer] removes from a full grid; fewer
/// remaining clues make for a harder puzzle on average, though this is *not*
/// a reliable measure of difficulty.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {

    /// 30 of the 81 cells are removed, leaving 51 clues.
    Easy,

    /// 40 of the 81 cells are removed, leaving 41 clues.
    Medium,

    /// 50 of the 81 cells are removed, leaving 31 clues.
    Hard
}

impl Difficulty {

    /// The number of cells the [Reducer] removes from a full grid for this
    /// difficulty.
    pub fn removed_cells(self) -> usize {
        match self {
            Difficulty::Easy => 30,
            Difficulty::Medium => 40,
            Difficulty::Hard => 50
        }
    }
}

impl FromStr for Difficulty {
    type Err = ConfigError;

    /// Parses a difficulty identifier as used by the wire format. Recognized
    /// identifiers are `easy`, `medium`, and `hard`; anything else is
    /// rejected with [ConfigError::UnknownDifficulty].
    fn from_str(identifier: &str) -> Result<Difficulty, ConfigError> {
        match identifier {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ConfigError::UnknownDifficulty(identifier.to_owned()))
        }
    }
}

/// A generator randomly generates a completely filled, valid [SudokuGrid],
/// that is, a grid in which every row, column, and box is a permutation of
/// the digits 1 to 9. It uses a random number generator to decide the
/// content. For most cases, sensible defaults are provided by
/// [Generator::new_default].
///
/// The generator first fills the three diagonal boxes with independent
/// random permutations (they share no row or column, so no conflicts are
/// possible between them) and then completes the remaining cells by
/// backtracking over shuffled candidate sets, which the membership sets of a
/// [TrackedGrid] provide in O(1).
pub struct Generator<R: Rng> {
    rng: R
}

impl Generator<ThreadRng> {

    /// Creates a new generator that uses a [ThreadRng] to generate the
    /// random digits.
    pub fn new_default() -> Generator<ThreadRng> {
        Generator::new(rand::thread_rng())
    }
}

impl<R: Rng> Generator<R> {

    /// Creates a new generator that uses the given random number generator
    /// to generate random digits.
    pub fn new(rng: R) -> Generator<R> {
        Generator {
            rng
        }
    }

    fn fill_box(&mut self, tracked: &mut TrackedGrid, band: usize) {
        let start = band * BOX_SIZE;
        let digits = shuffle(&mut self.rng, 1..=SIZE);

        for (i, &number) in digits.iter().enumerate() {
            let column = start + i % BOX_SIZE;
            let row = start + i / BOX_SIZE;

            // the box is empty and the diagonal boxes are independent, so
            // this placement cannot conflict
            tracked.place(column, row, number).unwrap();
        }
    }

    fn fill_rec(&mut self, tracked: &mut TrackedGrid, column: usize,
            row: usize) -> bool {
        if row == SIZE {
            return true;
        }

        let next_column = (column + 1) % SIZE;
        let next_row =
            if next_column == 0 { row + 1 } else { row };

        if tracked.grid().get_cell(column, row).unwrap().is_some() {
            return self.fill_rec(tracked, next_column, next_row);
        }

        let candidates = tracked.candidates(column, row).unwrap();

        for number in shuffle(&mut self.rng, candidates.iter()) {
            tracked.place(column, row, number).unwrap();

            if self.fill_rec(tracked, next_column, next_row) {
                return true;
            }

            tracked.clear(column, row).unwrap();
        }

        false
    }

    /// Fills the given [SudokuGrid] with random digits such that every row,
    /// column, and box becomes a permutation of 1 to 9, while all already
    /// present digits are kept. If that is not possible, an error is
    /// returned and the grid remains unchanged.
    ///
    /// # Errors
    ///
    /// * `SudokuError::ContradictoryPuzzle` If the present digits already
    /// duplicate within a row, column, or box.
    /// * `SudokuError::UnsatisfiablePuzzle` If the present digits are
    /// consistent but admit no completion.
    pub fn fill(&mut self, grid: &mut SudokuGrid) -> SudokuResult<()> {
        let mut tracked = TrackedGrid::from_grid(grid.clone())?;

        if self.fill_rec(&mut tracked, 0, 0) {
            *grid = tracked.into_grid();
            Ok(())
        }
        else {
            Err(SudokuError::UnsatisfiablePuzzle)
        }
    }

    /// Generates a new random, completely filled [SudokuGrid] in which every
    /// row, column, and box is a permutation of the digits 1 to 9.
    ///
    /// # Errors
    ///
    /// * `SudokuError::UnsatisfiablePuzzle` If the backtracking search finds
    /// no completion. Since every diagonal-box configuration can be
    /// completed and the search is exhaustive, this cannot actually occur;
    /// the error case exists to avoid a panic path in the signature.
    pub fn generate_full(&mut self) -> SudokuResult<SudokuGrid> {
        let mut tracked = TrackedGrid::new();

        for band in 0..BOX_SIZE {
            self.fill_box(&mut tracked, band);
        }

        if self.fill_rec(&mut tracked, 0, 0) {
            Ok(tracked.into_grid())
        }
        else {
            Err(SudokuError::UnsatisfiablePuzzle)
        }
    }
}

/// A reducer can be applied to the output of a [Generator] to derive a
/// puzzle from it. It removes a fixed, difficulty-dependent number of
/// random cells; the remaining digits become the clues of the puzzle.
///
/// [Reducer::new_default] yields a reducer with a [ThreadRng].
pub struct Reducer<R: Rng> {
    rng: R
}

impl Reducer<ThreadRng> {

    /// Creates a new reducer with a [ThreadRng] to decide which cells are
    /// removed.
    pub fn new_default() -> Reducer<ThreadRng> {
        Reducer::new(rand::thread_rng())
    }
}

impl<R: Rng> Reducer<R> {

    /// Creates a new reducer with the given random number generator.
    pub fn new(rng: R) -> Reducer<R> {
        Reducer {
            rng
        }
    }

    /// Removes [Difficulty::removed_cells] distinct random cells from the
    /// given grid. It is expected that the grid is full; cells which are
    /// already empty still count against the removal budget.
    ///
    /// Note that the reducer does *not* verify that the remaining puzzle
    /// has a unique solution. A reduced puzzle may admit multiple
    /// solutions; callers that require uniqueness must check it themselves.
    pub fn reduce(&mut self, grid: &mut SudokuGrid, difficulty: Difficulty) {
        let cells = shuffle(&mut self.rng, 0..CELL_COUNT);

        for &cell in cells.iter().take(difficulty.removed_cells()) {
            let column = cell % SIZE;
            let row = cell / SIZE;
            grid.clear_cell(column, row).unwrap();
        }
    }
}
