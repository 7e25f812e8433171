use serde::Serialize;
use tileworld_common::{Dimensions, GridPos, LayerKind};

use crate::tile::Tile;
use crate::tilemap::{ShapeError, TileMap};

/// The authoritative layered world: three aligned tile maps in one coordinate space.
///
/// The world owns its maps outright. Renderers and tools read from it; all
/// writes go through [`World::set_tile`] one cell at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct World {
    dimensions: Dimensions,
    #[serde(rename = "setTileMap")]
    set_map: TileMap,
    #[serde(rename = "propsTileMap")]
    props_map: TileMap,
    #[serde(rename = "charactersTileMap")]
    characters_map: TileMap,
}

impl World {
    /// A world of the given size with every layer filled with empty tiles.
    pub fn new(dimensions: Dimensions) -> Self {
        Self {
            dimensions,
            set_map: TileMap::empty(dimensions, LayerKind::Set, None),
            props_map: TileMap::empty(dimensions, LayerKind::Props, None),
            characters_map: TileMap::empty(dimensions, LayerKind::Characters, None),
        }
    }

    /// Assemble a world from three maps, checking kinds and dimensions.
    pub fn from_maps(
        dimensions: Dimensions,
        set_map: TileMap,
        props_map: TileMap,
        characters_map: TileMap,
    ) -> Result<Self, ShapeError> {
        for (expected, map) in [
            (LayerKind::Set, &set_map),
            (LayerKind::Props, &props_map),
            (LayerKind::Characters, &characters_map),
        ] {
            if map.kind() != expected {
                return Err(ShapeError::Kind {
                    expected,
                    actual: map.kind(),
                });
            }
            if map.dimensions() != dimensions {
                return Err(ShapeError::Dimensions {
                    layer: expected,
                    expected: dimensions,
                    actual: map.dimensions(),
                });
            }
        }
        Ok(Self {
            dimensions,
            set_map,
            props_map,
            characters_map,
        })
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn layer(&self, kind: LayerKind) -> &TileMap {
        match kind {
            LayerKind::Set => &self.set_map,
            LayerKind::Props => &self.props_map,
            LayerKind::Characters => &self.characters_map,
        }
    }

    fn layer_mut(&mut self, kind: LayerKind) -> &mut TileMap {
        match kind {
            LayerKind::Set => &mut self.set_map,
            LayerKind::Props => &mut self.props_map,
            LayerKind::Characters => &mut self.characters_map,
        }
    }

    /// Layers bottom to top.
    pub fn layers(&self) -> impl Iterator<Item = &TileMap> {
        LayerKind::ALL.into_iter().map(move |kind| self.layer(kind))
    }

    pub fn tile_at(&self, kind: LayerKind, pos: GridPos) -> Option<&Tile> {
        self.layer(kind).get(pos.x, pos.y)
    }

    /// Replace one cell of one layer. Returns `false` outside the grid.
    pub fn set_tile(&mut self, kind: LayerKind, pos: GridPos, tile: &Tile) -> bool {
        self.layer_mut(kind).set(pos.x, pos.y, tile)
    }
}
