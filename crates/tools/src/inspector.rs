use std::collections::BTreeMap;
use std::fmt;

use tileworld_common::{Dimensions, GridPos, LayerKind};
use tileworld_kernel::{Tile, World};

/// Name of the filler tile; cells holding it count as empty.
const EMPTY_TILE: &str = "empty";

/// World inspector for developer tooling.
///
/// Provides read-only queries against the world state for debugging and
/// the debug panel of a front end.
pub struct WorldInspector;

impl WorldInspector {
    /// Produce a summary of the world state.
    pub fn summary(world: &World) -> WorldSummary {
        let layers = world
            .layers()
            .map(|map| LayerSummary {
                kind: map.kind(),
                cells: map.dimensions().area(),
                occupied: map.iter().filter(|(_, t)| !t.is_named(EMPTY_TILE)).count(),
            })
            .collect();
        WorldSummary {
            dimensions: world.dimensions(),
            layers,
        }
    }

    /// Tile name to count for one layer.
    pub fn census(world: &World, kind: LayerKind) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for (_, tile) in world.layer(kind).iter() {
            *counts.entry(tile.name().to_string()).or_insert(0) += 1;
        }
        counts
    }

    /// Everything stacked at one position, or `None` outside the grid.
    pub fn inspect_tile(world: &World, pos: GridPos) -> Option<TileInfo> {
        let mut stack = Vec::with_capacity(LayerKind::ALL.len());
        for kind in LayerKind::ALL {
            stack.push((kind, world.tile_at(kind, pos)?.clone()));
        }
        Some(TileInfo { pos, stack })
    }

    /// Positions of props tiles that respond to clicks in display mode.
    pub fn interactive_tiles(world: &World) -> Vec<GridPos> {
        world
            .layer(LayerKind::Props)
            .iter()
            .filter(|(_, t)| t.is_named("switch"))
            .map(|(pos, _)| pos)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerSummary {
    pub kind: LayerKind,
    pub cells: usize,
    /// Cells holding something other than the empty tile.
    pub occupied: usize,
}

/// Summary of world state for the inspector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldSummary {
    pub dimensions: Dimensions,
    pub layers: Vec<LayerSummary>,
}

impl fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "World: {}", self.dimensions)?;
        for l in &self.layers {
            write!(f, " {}={}/{}", l.kind, l.occupied, l.cells)?;
        }
        Ok(())
    }
}

/// The tiles of every layer at one position, bottom to top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileInfo {
    pub pos: GridPos,
    pub stack: Vec<(LayerKind, Tile)>,
}

impl fmt::Display for TileInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tile {}", self.pos)?;
        for (kind, tile) in &self.stack {
            write!(f, " {kind}: {tile};")?;
        }
        Ok(())
    }
}
