//! This module contains the fitness evaluation used by the evolutionary
//! search.
//!
//! The fitness of a grid is the sum, over all 27 groups (9 rows, 9 columns,
//! and 9 boxes), of the number of distinct digits present in that group. A
//! completely filled grid therefore scores [MAX_FITNESS] if and only if
//! every group is a permutation of the digits 1 to 9. The score strictly
//! decreases with every additional duplicate, which is what gives the
//! selection pressure a gradient to climb.
//!
//! This is the canonical, maximizing scale used throughout the crate. For
//! callers that prefer the minimizing convention, [defects] is provided as a
//! derived view.

use crate::{SIZE, SudokuGrid, box_index};
use crate::util::DigitSet;

/// The fitness of a perfect solution: 27 groups with 9 distinct digits each.
pub const MAX_FITNESS: usize = 27 * SIZE;

/// Computes the fitness of the given grid, i.e. the total number of distinct
/// digits over all rows, columns, and boxes. Empty cells contribute to no
/// group. The maximum of [MAX_FITNESS] is attained if and only if the grid
/// is completely filled and free of duplicates within every group.
///
/// This is a pure function: the grid is not modified.
pub fn fitness(grid: &SudokuGrid) -> usize {
    let mut row_sets = [DigitSet::new(); SIZE];
    let mut column_sets = [DigitSet::new(); SIZE];
    let mut box_sets = [DigitSet::new(); SIZE];

    for row in 0..SIZE {
        for column in 0..SIZE {
            if let Some(number) = grid.get_cell(column, row).unwrap() {
                row_sets[row].insert(number);
                column_sets[column].insert(number);
                box_sets[box_index(column, row)].insert(number);
            }
        }
    }

    let sets = row_sets.iter()
        .chain(column_sets.iter())
        .chain(box_sets.iter());
    sets.map(|set| set.len()).sum()
}

/// Computes the number of defects of the given grid, i.e. how far its
/// fitness falls short of [MAX_FITNESS]. This is the minimizing view of
/// [fitness]: a grid is a perfect solution if and only if it has 0 defects.
pub fn defects(grid: &SudokuGrid) -> usize {
    MAX_FITNESS - fitness(grid)
}

/// Indicates whether the given grid is a perfect solution, i.e. completely
/// filled with no duplicate digit in any row, column, or box.
pub fn is_perfect(grid: &SudokuGrid) -> bool {
    fitness(grid) == MAX_FITNESS
}
