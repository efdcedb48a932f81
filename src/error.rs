//! This module contains some error and result definitions used in this crate.

use std::fmt::{self, Display, Formatter};
use std::num::ParseIntError;

/// Miscellaneous errors that can occur on some methods in the
/// [root module](../index.html). This does not include errors that occur when
/// parsing a grid, see [SudokuParseError](enum.SudokuParseError.html), nor
/// errors in the search configuration, see
/// [ConfigError](enum.ConfigError.html).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SudokuError {

    /// Indicates that the specified coordinates (column and row) lie outside
    /// the 9x9 grid. This is the case if either is greater than or equal to
    /// 9.
    OutOfBounds,

    /// Indicates that some digit is invalid for a Sudoku cell. This is the
    /// case if it is less than 1 or greater than 9.
    InvalidNumber,

    /// Indicates that it was attempted to place a digit into a cell which
    /// already contains one. Tracked cells must be cleared before they can be
    /// reassigned, otherwise the membership sets would lose digits.
    CellOccupied,

    /// Indicates that it was attempted to place a digit which is already
    /// present in the row, column, or box of the target cell.
    ConflictingNumber,

    /// Indicates that an input puzzle contains two equal clues within one
    /// row, column, or box, i.e. the puzzle cannot have any solution. Such
    /// puzzles are rejected before any search begins.
    ContradictoryPuzzle,

    /// An error that is raised whenever it is attempted to fill a grid whose
    /// present digits admit no completion.
    UnsatisfiablePuzzle
}

/// Syntactic sugar for `Result<V, SudokuError>`.
pub type SudokuResult<V> = Result<V, SudokuError>;

/// An enumeration of the errors that may occur when parsing a
/// [SudokuGrid](crate::SudokuGrid) from a code or converting it from nested
/// rows of integers.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SudokuParseError {

    /// Indicates that the number of rows provided in a nested-row conversion
    /// is not 9.
    WrongNumberOfRows,

    /// Indicates that the number of cells (which are separated by commas in
    /// a code, or listed within a row in a nested-row conversion) does not
    /// match the fixed 9x9 layout.
    WrongNumberOfCells,

    /// Indicates that one of the cell entries could not be parsed as a
    /// number.
    NumberFormatError,

    /// Indicates that a cell is filled with an invalid number (more than 9).
    InvalidNumber
}

/// Syntactic sugar for `Result<V, SudokuParseError>`.
pub type SudokuParseResult<V> = Result<V, SudokuParseError>;

impl From<ParseIntError> for SudokuParseError {
    fn from(_: ParseIntError) -> Self {
        SudokuParseError::NumberFormatError
    }
}

// Serde deserialization of grids goes through TryFrom, which requires the
// error to be displayable.
impl Display for SudokuParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let message = match self {
            SudokuParseError::WrongNumberOfRows =>
                "expected exactly 9 rows",
            SudokuParseError::WrongNumberOfCells =>
                "expected exactly 9 cells per row and 81 cells in total",
            SudokuParseError::NumberFormatError =>
                "cell entry is not a valid number",
            SudokuParseError::InvalidNumber =>
                "cell entry must be a digit from 0 to 9"
        };
        f.write_str(message)
    }
}

/// An enumeration of the errors that may occur when validating the
/// configuration of the evolutionary search or a difficulty identifier.
/// Configuration problems are rejected before any search begins, they never
/// default silently.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {

    /// Indicates that a selection strategy identifier was not recognized.
    /// The unknown identifier is attached.
    UnknownSelection(String),

    /// Indicates that a difficulty identifier was not recognized. The
    /// unknown identifier is attached.
    UnknownDifficulty(String),

    /// Indicates that the configured mutation rate lies outside the interval
    /// `[0, 1]`. The offending rate is attached.
    MutationRateOutOfRange(f64),

    /// Indicates that the configured elite fraction lies outside the
    /// interval `[0, 1]`. The offending fraction is attached.
    EliteFractionOutOfRange(f64),

    /// Indicates that the configured population size is zero.
    InvalidPopulationSize,

    /// Indicates that the configured tournament size is zero or exceeds the
    /// population size, i.e. a tournament could never be sampled without
    /// replacement.
    InvalidTournamentSize {

        /// The configured tournament size.
        size: usize,

        /// The configured population size.
        population_size: usize
    }
}

/// Syntactic sugar for `Result<V, ConfigError>`.
pub type ConfigResult<V> = Result<V, ConfigError>;
