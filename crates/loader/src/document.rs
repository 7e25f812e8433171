use serde::{Deserialize, Serialize};
use serde_json::Value;
use tileworld_common::{Dimensions, LayerKind};
use tileworld_kernel::{Tile, TileMap, TileOptions, World};

use crate::error::LoadError;

/// Which layer field names a world document uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVariant {
    /// `setTileMap`, `propsTileMap`, `charactersTileMap`.
    TileMap,
    /// `setMap`, `propsMap`, `charactersMap`.
    Map,
}

impl SchemaVariant {
    /// Guess the variant from the raw JSON. Documents naming neither are
    /// reported as canonical and will fail later with a missing layer.
    pub fn detect(value: &Value) -> Self {
        if value.get("setTileMap").is_none() && value.get("setMap").is_some() {
            Self::Map
        } else {
            Self::TileMap
        }
    }
}

/// A tile as it appears in a world file. Everything except `name` may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileDocument {
    pub name: String,
    #[serde(default)]
    pub glyph: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub states: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_state: Option<String>,
}

impl TileDocument {
    /// Fill in missing states and current state, then validate.
    pub fn normalize(self) -> Result<Tile, tileworld_kernel::ValidationError> {
        Tile::new(
            self.name,
            self.glyph,
            TileOptions {
                image: self.image,
                states: self.states,
                current_state: self.current_state,
            },
        )
    }
}

impl From<&Tile> for TileDocument {
    fn from(tile: &Tile) -> Self {
        Self {
            name: tile.name().to_string(),
            glyph: tile.glyph().to_string(),
            image: tile.image().map(str::to_string),
            states: Some(tile.states().to_vec()),
            current_state: Some(tile.current_state().to_string()),
        }
    }
}

/// One layer in a world file. Any per-layer `dimensions` or `type` fields are
/// ignored; the world's dimensions and the field the layer sits in are authoritative.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerDocument {
    pub rows: Vec<Vec<TileDocument>>,
}

impl LayerDocument {
    fn into_map(self, dimensions: Dimensions, kind: LayerKind) -> Result<TileMap, LoadError> {
        let rows = self
            .rows
            .into_iter()
            .enumerate()
            .map(|(y, row)| {
                row.into_iter()
                    .enumerate()
                    .map(|(x, raw)| {
                        raw.normalize().map_err(|source| LoadError::InvalidTile {
                            layer: kind,
                            x,
                            y,
                            source,
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TileMap::from_rows(dimensions, kind, rows)?)
    }
}

impl From<&TileMap> for LayerDocument {
    fn from(map: &TileMap) -> Self {
        Self {
            rows: map
                .rows()
                .iter()
                .map(|row| row.iter().map(TileDocument::from).collect())
                .collect(),
        }
    }
}

/// The on-disk world description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldDocument {
    pub dimensions: Dimensions,
    #[serde(alias = "setMap", default, skip_serializing_if = "Option::is_none")]
    pub set_tile_map: Option<LayerDocument>,
    #[serde(alias = "propsMap", default, skip_serializing_if = "Option::is_none")]
    pub props_tile_map: Option<LayerDocument>,
    #[serde(alias = "charactersMap", default, skip_serializing_if = "Option::is_none")]
    pub characters_tile_map: Option<LayerDocument>,
}

impl WorldDocument {
    /// Normalize every tile and assemble a validated world.
    pub fn into_world(self) -> Result<World, LoadError> {
        let d = self.dimensions;
        let set = self
            .set_tile_map
            .ok_or(LoadError::MissingLayer(LayerKind::Set))?
            .into_map(d, LayerKind::Set)?;
        let props = self
            .props_tile_map
            .ok_or(LoadError::MissingLayer(LayerKind::Props))?
            .into_map(d, LayerKind::Props)?;
        let characters = self
            .characters_tile_map
            .ok_or(LoadError::MissingLayer(LayerKind::Characters))?
            .into_map(d, LayerKind::Characters)?;
        Ok(World::from_maps(d, set, props, characters)?)
    }
}

impl From<&World> for WorldDocument {
    fn from(world: &World) -> Self {
        Self {
            dimensions: world.dimensions(),
            set_tile_map: Some(world.layer(LayerKind::Set).into()),
            props_tile_map: Some(world.layer(LayerKind::Props).into()),
            characters_tile_map: Some(world.layer(LayerKind::Characters).into()),
        }
    }
}

/// Parse and normalize a world from JSON text.
pub fn parse_world(text: &str) -> Result<World, LoadError> {
    let value: Value = serde_json::from_str(text)?;
    let variant = SchemaVariant::detect(&value);
    tracing::debug!(?variant, "parsing world document");
    let doc: WorldDocument = serde_json::from_value(value)?;
    doc.into_world()
}

/// Canonical, fully normalized JSON for a world.
pub fn world_to_json(world: &World) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&WorldDocument::from(world))
}
