//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects parsing
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// Owner was neither `players` nor `npcs`
    #[error("owner must be `players` or `npcs` (got: {0})")]
    UnknownOwner(String),

    /// Direction was not one of the four cardinal points
    #[error("direction must be one of north, south, east, west (got: {0})")]
    UnknownDirection(String),

    /// Battle map name is not known
    #[error("map must be one of alpha, bravo, charlie (got: {0})")]
    UnknownMap(String),
}

/// Errors raised while converting between grid indices and labels.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoordinateError {
    /// Column label was empty
    #[error("column label cannot be empty")]
    EmptyColumnLabel,

    /// Column label contained something other than ASCII letters
    #[error("column label must contain only letters A-Z (got: {0})")]
    InvalidColumnLabel(String),

    /// Row label was empty
    #[error("row label cannot be empty")]
    EmptyRowLabel,

    /// Row label was not a positive 1-based integer
    #[error("row label must be a positive integer (got: {0})")]
    InvalidRowLabel(String),

    /// Cell label could not be split into a column and a row part
    #[error("cell label must look like `B3` (got: {0})")]
    InvalidCellLabel(String),

    /// Index outside of the grid
    #[error("{axis} index {index} is outside of the grid (size: {size})")]
    OutOfBounds {
        axis: &'static str,
        index: usize,
        size: usize,
    },
}

/// Errors raised when a decoded snapshot is not self-consistent.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SnapshotError {
    /// The grid has a different number of rows than `height`
    #[error("grid has {actual} rows but height is {expected}")]
    RowCountMismatch { expected: usize, actual: usize },

    /// A grid row has a different number of cells than `width`
    #[error("grid row {row} has {actual} cells but width is {expected}")]
    ColumnCountMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// A named position points outside the grid
    #[error("position `{name}` ({x}, {y}) is outside of the {width}x{height} grid")]
    PositionOutOfGrid {
        name: String,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    /// Ship health is above its maximum
    #[error("ship `{name}` has {hp} hp but only {total_hp} total hp")]
    HealthAboveTotal { name: String, hp: u32, total_hp: u32 },

    /// Travel step completion is outside of [0, 1]
    #[error("step completion must be within [0, 1] (got: {0})")]
    StepCompletionOutOfRange(f64),
}
