use std::{collections::BTreeSet, fmt, str::FromStr};

use serde::Serialize;

/// Zero-based coordinate of a clue cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellCoord {
    /// Row index, top to bottom.
    pub row: u32,
    /// Column (category) index, left to right.
    pub col: u32,
}

impl CellCoord {
    /// Coordinate of the cell at `row`, `col`.
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

/// Storage key of a cell, `"{row}:{col}"`.
impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row, self.col)
    }
}

impl Serialize for CellCoord {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A cell key that is not two non-negative integers separated by `:`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid cell key `{0}`")]
pub struct InvalidCellKey(pub String);

impl FromStr for CellCoord {
    type Err = InvalidCellKey;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidCellKey(value.to_string());
        let (row, col) = value.split_once(':').ok_or_else(invalid)?;
        let row = row.parse::<u32>().map_err(|_| invalid())?;
        let col = col.parse::<u32>().map_err(|_| invalid())?;
        Ok(Self { row, col })
    }
}

/// Cells consumed during the session. Only grows until a full reset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct UsedCellSet {
    cells: BTreeSet<CellCoord>,
}

impl UsedCellSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cell; returns `true` when it was not already used.
    pub fn insert(&mut self, row: u32, col: u32) -> bool {
        self.cells.insert(CellCoord::new(row, col))
    }

    /// Whether the cell at `row`, `col` was consumed.
    pub fn contains(&self, row: u32, col: u32) -> bool {
        self.cells.contains(&CellCoord::new(row, col))
    }

    /// Number of consumed cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cell was consumed yet.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Consumed cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.cells.iter().copied()
    }

    /// Coordinate keys in row-major order.
    pub fn to_keys(&self) -> Vec<String> {
        self.cells.iter().map(ToString::to_string).collect()
    }
}

/// The clue currently open in the question view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActiveClue {
    /// Cell the clue belongs to.
    pub cell: CellCoord,
    /// Points the clue is worth; also the score step while it is open.
    pub points: i64,
}

impl FromIterator<CellCoord> for UsedCellSet {
    fn from_iter<I: IntoIterator<Item = CellCoord>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}
