use serde::Serialize;
use tileworld_common::{Dimensions, GridPos, LayerKind};

use crate::tile::{Tile, presets};

/// Errors from building a map or world out of existing parts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    #[error("{layer} layer has {actual} rows, expected {expected}")]
    RowCount {
        layer: LayerKind,
        expected: usize,
        actual: usize,
    },
    #[error("{layer} layer row {row} has {actual} tiles, expected {expected}")]
    RowWidth {
        layer: LayerKind,
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("{layer} layer is {actual}, world is {expected}")]
    Dimensions {
        layer: LayerKind,
        expected: Dimensions,
        actual: Dimensions,
    },
    #[error("expected a {expected} layer in that slot, found {actual}")]
    Kind { expected: LayerKind, actual: LayerKind },
}

/// One layer of a world: a fixed-size grid of tiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileMap {
    dimensions: Dimensions,
    rows: Vec<Vec<Tile>>,
    #[serde(rename = "type")]
    kind: LayerKind,
}

impl TileMap {
    /// A map where every cell holds its own copy of `default_tile`
    /// (the `empty` preset when `None`).
    pub fn empty(dimensions: Dimensions, kind: LayerKind, default_tile: Option<&Tile>) -> Self {
        let fill = default_tile.cloned().unwrap_or_else(presets::empty);
        let rows = (0..dimensions.height)
            .map(|_| vec![fill.clone(); dimensions.width])
            .collect();
        Self {
            dimensions,
            rows,
            kind,
        }
    }

    /// Wrap already-built rows, checking them against `dimensions`.
    pub fn from_rows(
        dimensions: Dimensions,
        kind: LayerKind,
        rows: Vec<Vec<Tile>>,
    ) -> Result<Self, ShapeError> {
        if rows.len() != dimensions.height {
            return Err(ShapeError::RowCount {
                layer: kind,
                expected: dimensions.height,
                actual: rows.len(),
            });
        }
        if let Some((row, r)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != dimensions.width)
        {
            return Err(ShapeError::RowWidth {
                layer: kind,
                row,
                expected: dimensions.width,
                actual: r.len(),
            });
        }
        Ok(Self {
            dimensions,
            rows,
            kind,
        })
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    pub fn rows(&self) -> &[Vec<Tile>] {
        &self.rows
    }

    /// The tile at `(x, y)`, or `None` outside the grid.
    pub fn get(&self, x: i32, y: i32) -> Option<&Tile> {
        let (col, row) = self.dimensions.index_of(GridPos::new(x, y))?;
        Some(&self.rows[row][col])
    }

    /// Write a copy of `tile` at `(x, y)`. Returns `false`, leaving the map
    /// untouched, when the position is outside the grid.
    pub fn set(&mut self, x: i32, y: i32, tile: &Tile) -> bool {
        let Some((col, row)) = self.dimensions.index_of(GridPos::new(x, y)) else {
            tracing::trace!(x, y, layer = %self.kind, "set outside map");
            return false;
        };
        self.rows[row][col] = tile.clone();
        true
    }

    /// All cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (GridPos, &Tile)> {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(move |(x, tile)| (GridPos::new(x as i32, y as i32), tile))
        })
    }
}
