//! This module contains the logic for solving Sudoku puzzles.
//!
//! Two solvers are provided: the exact [BacktrackingSolver], which completes
//! a puzzle by exhaustive depth-first search, and the [HybridSolver], which
//! first runs the evolutionary search of the [genetic](crate::genetic)
//! module and falls back to exact backtracking when evolution stalls short
//! of a perfect solution.

use crate::{SIZE, SudokuGrid, TrackedGrid};
use crate::error::{ConfigResult, SudokuResult};
use crate::genetic::{EvolutionConfig, EvolutionEngine};

use rand::Rng;
use rand::rngs::ThreadRng;

use serde::{Deserialize, Serialize};

/// An exact solver which completes Sudoku grids by recursively testing all
/// valid digits for each empty cell, in row-major order and ascending digit
/// order. This means two things:
///
/// * Its worst-case runtime is exponential in the number of empty cells,
/// i.e. it may be slow on nearly empty grids.
/// * It is complete: if the grid has any valid completion, it will be
/// found.
///
/// The solver only ever assigns empty cells; digits already present are
/// treated as immutable. In particular, running it on a full grid is a pure
/// validity check.
pub struct BacktrackingSolver;

impl BacktrackingSolver {
    fn complete_rec(tracked: &mut TrackedGrid, column: usize, row: usize)
            -> bool {
        if row == SIZE {
            return true;
        }

        let next_column = (column + 1) % SIZE;
        let next_row =
            if next_column == 0 { row + 1 } else { row };

        if tracked.grid().get_cell(column, row).unwrap().is_some() {
            return BacktrackingSolver::complete_rec(tracked, next_column,
                next_row);
        }

        for number in 1..=SIZE {
            if tracked.allows(column, row, number).unwrap() {
                tracked.place(column, row, number).unwrap();

                if BacktrackingSolver::complete_rec(tracked, next_column,
                        next_row) {
                    return true;
                }

                tracked.clear(column, row).unwrap();
            }
        }

        false
    }

    /// Attempts to fill all empty cells of the given grid such that every
    /// row, column, and box becomes duplicate-free. On success, the grid is
    /// updated in place and `true` is returned. If no completion exists,
    /// including the case that the present digits already contain a
    /// duplicate, the grid is left unchanged and `false` is returned.
    /// Exhaustion is an expected outcome, not an error.
    ///
    /// A grid without empty cells is not modified in any case; for such
    /// grids, the returned flag simply indicates whether the grid is a
    /// valid solution.
    pub fn complete(&self, grid: &mut SudokuGrid) -> bool {
        let mut tracked = match TrackedGrid::from_grid(grid.clone()) {
            Ok(tracked) => tracked,
            Err(_) => return false
        };

        if BacktrackingSolver::complete_rec(&mut tracked, 0, 0) {
            *grid = tracked.into_grid();
            true
        }
        else {
            false
        }
    }
}

/// The result of a [HybridSolver::solve] call. Exactly one of `solved_grid`
/// and `best_candidate` is present, depending on whether a valid solution
/// was found. Serializes with camelCase field names for the JSON wire
/// format.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveReport {

    /// The puzzle that was solved, unchanged.
    pub original_puzzle: SudokuGrid,

    /// The solution, if one was found, either by evolution or by the
    /// backtracking fallback.
    pub solved_grid: Option<SudokuGrid>,

    /// The best (imperfect) candidate produced by the evolutionary search,
    /// if no valid solution was found.
    pub best_candidate: Option<SudokuGrid>,

    /// The generation index at which the evolutionary search ended. If
    /// evolution did not find the solution itself, this is the exhausted
    /// generation budget (or the stagnation generation).
    pub generation_found: usize,

    /// Whether `solved_grid` contains a valid solution.
    pub is_valid_solution: bool
}

/// A solver which combines the evolutionary search with exact backtracking
/// refinement: the [EvolutionEngine] runs first, and if it terminates
/// without a perfect candidate, the [BacktrackingSolver] attempts an exact
/// completion of the original puzzle. Non-convergence of the evolutionary
/// search is therefore invisible to the caller unless the puzzle has no
/// solution at all.
///
/// The refinement starts from the *puzzle*, not from the evolutionary
/// candidate: candidates are always completely filled, so the refiner could
/// only confirm or reject them, never repair them.
pub struct HybridSolver<R: Rng> {
    engine: EvolutionEngine<R>
}

impl HybridSolver<ThreadRng> {

    /// Creates a new hybrid solver with the default [EvolutionConfig] and a
    /// [ThreadRng].
    pub fn new_default() -> HybridSolver<ThreadRng> {
        HybridSolver {
            engine: EvolutionEngine::new_default()
        }
    }
}

impl<R: Rng> HybridSolver<R> {

    /// Creates a new hybrid solver with the given configuration and random
    /// number generator.
    ///
    /// # Errors
    ///
    /// If the configuration is invalid. See
    /// [EvolutionConfig::validate](crate::genetic::EvolutionConfig::validate)
    /// for the possible errors.
    pub fn new(config: EvolutionConfig, rng: R)
            -> ConfigResult<HybridSolver<R>> {
        Ok(HybridSolver {
            engine: EvolutionEngine::new(config, rng)?
        })
    }

    /// Gets a reference to the configuration of this solver.
    pub fn config(&self) -> &EvolutionConfig {
        self.engine.config()
    }

    /// Solves the given puzzle. The evolutionary search runs first; if it
    /// finds a perfect candidate, that candidate is reported together with
    /// the generation in which it appeared. Otherwise the
    /// [BacktrackingSolver] attempts an exact completion of the puzzle.
    /// Only if that fails as well, i.e. the puzzle has no solution, does
    /// the report carry the best evolutionary candidate with
    /// `is_valid_solution` set to `false`.
    ///
    /// # Errors
    ///
    /// * `SudokuError::ContradictoryPuzzle` If the puzzle contains two
    /// equal clues within one row, column, or box. The puzzle is rejected
    /// before any search begins.
    pub fn solve(&mut self, puzzle: &SudokuGrid)
            -> SudokuResult<SolveReport> {
        let outcome = self.engine.run(puzzle)?;
        let generation_found = outcome.generation;

        if outcome.is_solution() {
            return Ok(SolveReport {
                original_puzzle: puzzle.clone(),
                solved_grid: Some(outcome.grid),
                best_candidate: None,
                generation_found,
                is_valid_solution: true
            });
        }

        let mut refined = puzzle.clone();

        if BacktrackingSolver.complete(&mut refined) {
            Ok(SolveReport {
                original_puzzle: puzzle.clone(),
                solved_grid: Some(refined),
                best_candidate: None,
                generation_found,
                is_valid_solution: true
            })
        }
        else {
            Ok(SolveReport {
                original_puzzle: puzzle.clone(),
                solved_grid: None,
                best_candidate: Some(outcome.grid),
                generation_found,
                is_valid_solution: false
            })
        }
    }
}
