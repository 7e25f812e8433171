use glam::Vec2;
use tileworld_common::{GridPos, LayerKind};
use tileworld_input::TileEvent;
use tileworld_kernel::World;

use crate::layers::LayerSet;

/// Tile edge length in pixels when the surface does not choose one.
pub const DEFAULT_TILE_SIZE: f32 = 160.0;

/// Maps surface-local pointer positions (pixels, origin at the grid's
/// top-left corner) to tile coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileGrid {
    tile_size: f32,
}

impl Default for TileGrid {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
        }
    }
}

impl TileGrid {
    /// Non-positive or non-finite sizes fall back to [`DEFAULT_TILE_SIZE`].
    pub fn new(tile_size: f32) -> Self {
        if tile_size.is_finite() && tile_size > 0.0 {
            Self { tile_size }
        } else {
            tracing::warn!(tile_size, "invalid tile size, using default");
            Self::default()
        }
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Pixel size of a whole world.
    pub fn extent(&self, world: &World) -> Vec2 {
        let d = world.dimensions();
        Vec2::new(d.width as f32, d.height as f32) * self.tile_size
    }

    /// Tile under `point`. May lie outside the world: pointers drift past the
    /// edges during fast movement, and bounds are checked by the consumer.
    pub fn cell_at(&self, point: Vec2) -> GridPos {
        (point / self.tile_size).floor().as_ivec2().into()
    }

    /// Top-left pixel of a tile.
    pub fn origin_of(&self, pos: GridPos) -> Vec2 {
        Vec2::new(pos.x as f32, pos.y as f32) * self.tile_size
    }

    /// Event for a pointer over `layer`, or `None` when the layer is hidden or
    /// the pointer is outside the grid.
    pub fn hit(
        &self,
        world: &World,
        layers: &LayerSet,
        layer: LayerKind,
        point: Vec2,
    ) -> Option<TileEvent> {
        if !layers.is_visible(layer) {
            return None;
        }
        let pos = self.cell_at(point);
        let tile = world.tile_at(layer, pos)?;
        Some(TileEvent::new(pos, tile.clone(), layer))
    }

    /// Events for every visible layer under `point`, topmost first.
    pub fn hits(&self, world: &World, layers: &LayerSet, point: Vec2) -> Vec<TileEvent> {
        layers
            .visible_layers()
            .into_iter()
            .rev()
            .filter_map(|layer| self.hit(world, layers, layer, point))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::LayerMode;
    use tileworld_common::Dimensions;
    use tileworld_kernel::presets;

    fn world() -> World {
        let mut w = World::new(Dimensions::new(4, 3));
        w.set_tile(LayerKind::Props, GridPos::new(2, 1), &presets::switch());
        w
    }

    #[test]
    fn cell_at_floors_pixel_positions() {
        let grid = TileGrid::new(32.0);
        assert_eq!(grid.cell_at(Vec2::new(0.0, 0.0)), GridPos::new(0, 0));
        assert_eq!(grid.cell_at(Vec2::new(31.9, 32.0)), GridPos::new(0, 1));
        assert_eq!(grid.cell_at(Vec2::new(-0.5, 10.0)), GridPos::new(-1, 0));
    }

    #[test]
    fn hit_returns_tagged_event() {
        let grid = TileGrid::new(32.0);
        let ev = grid
            .hit(&world(), &LayerSet::default(), LayerKind::Props, Vec2::new(70.0, 40.0))
            .unwrap();
        assert_eq!(ev.pos, GridPos::new(2, 1));
        assert_eq!(ev.layer, LayerKind::Props);
        assert_eq!(ev.tile.name(), "switch");
    }

    #[test]
    fn hit_outside_grid_is_none() {
        let grid = TileGrid::new(32.0);
        let layers = LayerSet::default();
        for p in [Vec2::new(-1.0, 5.0), Vec2::new(128.0, 5.0), Vec2::new(5.0, 96.0)] {
            assert!(grid.hit(&world(), &layers, LayerKind::Set, p).is_none());
        }
    }

    #[test]
    fn hidden_layer_receives_no_hits() {
        let grid = TileGrid::new(32.0);
        let mut layers = LayerSet::default();
        layers.set_mode(LayerKind::Props, LayerMode::Disabled);
        assert!(grid.hit(&world(), &layers, LayerKind::Props, Vec2::new(70.0, 40.0)).is_none());

        let kinds: Vec<_> = grid.hits(&world(), &layers, Vec2::new(70.0, 40.0)).into_iter().map(|e| e.layer).collect();
        assert_eq!(kinds, vec![LayerKind::Characters, LayerKind::Set]);
    }

    #[test]
    fn bad_tile_size_falls_back() {
        assert_eq!(TileGrid::new(0.0).tile_size(), DEFAULT_TILE_SIZE);
        assert_eq!(TileGrid::new(f32::NAN).tile_size(), DEFAULT_TILE_SIZE);
    }

    #[test]
    fn extent_and_origin() {
        let grid = TileGrid::new(10.0);
        assert_eq!(grid.extent(&world()), Vec2::new(40.0, 30.0));
        assert_eq!(grid.origin_of(GridPos::new(2, 1)), Vec2::new(20.0, 10.0));
    }
}
