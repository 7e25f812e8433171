use tileworld_common::LayerKind;
use tileworld_kernel::{Tile, World};

use crate::layers::LayerSet;

/// How layers are arranged on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// All visible layers stacked in one grid, characters on top.
    #[default]
    Layered,
    /// Each visible layer drawn as its own titled grid.
    Separated,
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads world state and a layer configuration, then produces
/// output. It never mutates the world; world truth is store-owned.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render the world with the given layer visibility.
    fn render(&self, world: &World, layers: &LayerSet) -> Self::Output;
}

/// Draws glyphs as plain text. Tiles with images still show their glyph.
#[derive(Debug, Default)]
pub struct TextRenderer {
    view: ViewMode,
}

impl TextRenderer {
    pub fn new(view: ViewMode) -> Self {
        Self { view }
    }

    fn cell_width(world: &World, visible: &[LayerKind]) -> usize {
        visible
            .iter()
            .flat_map(|k| world.layer(*k).iter())
            .map(|(_, t)| t.glyph().chars().count())
            .max()
            .unwrap_or(0)
            .max(1)
    }

    fn push_grid<'a>(
        out: &mut String,
        world: &World,
        width: usize,
        mut glyph_at: impl FnMut(usize, usize) -> Option<&'a Tile>,
    ) {
        let dims = world.dimensions();
        for y in 0..dims.height {
            let line: Vec<String> = (0..dims.width)
                .map(|x| {
                    let glyph = glyph_at(x, y).map(Tile::glyph).unwrap_or("");
                    format!("{glyph:<width$}")
                })
                .collect();
            out.push_str(line.join(" ").trim_end());
            out.push('\n');
        }
    }
}

fn is_blank(tile: &Tile) -> bool {
    tile.glyph().trim().is_empty()
}

impl Renderer for TextRenderer {
    type Output = String;

    fn render(&self, world: &World, layers: &LayerSet) -> String {
        let visible = layers.visible_layers();
        let width = Self::cell_width(world, &visible);
        let mut out = String::new();

        match self.view {
            ViewMode::Layered => {
                Self::push_grid(&mut out, world, width, |x, y| {
                    // Topmost visible layer with something to show wins.
                    visible.iter().rev().find_map(|k| {
                        world.layer(*k).rows()[y]
                            .get(x)
                            .filter(|t| !is_blank(t))
                    })
                });
            }
            ViewMode::Separated => {
                for kind in &visible {
                    let map = world.layer(*kind);
                    out.push_str(&format!("[{kind}]\n"));
                    Self::push_grid(&mut out, world, width, |x, y| map.rows()[y].get(x));
                    out.push('\n');
                }
            }
        }

        let names: Vec<&str> = visible.iter().map(LayerKind::as_str).collect();
        out.push_str(&format!("Dimensions: {}\n", world.dimensions()));
        out.push_str(&format!("Active Layers: {}\n", names.join(", ")));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::LayerMode;
    use tileworld_common::{Dimensions, GridPos};
    use tileworld_kernel::presets;

    fn sample() -> World {
        let mut w = World::new(Dimensions::new(3, 2));
        for y in 0..2 {
            for x in 0..3 {
                w.set_tile(LayerKind::Set, GridPos::new(x, y), &presets::grass());
            }
        }
        w.set_tile(LayerKind::Props, GridPos::new(1, 0), &presets::switch());
        w.set_tile(LayerKind::Characters, GridPos::new(2, 1), &presets::player());
        w
    }

    #[test]
    fn layered_shows_topmost_visible_glyph() {
        let out = TextRenderer::new(ViewMode::Layered).render(&sample(), &LayerSet::default());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], ",,, [O] ,,,");
        assert_eq!(lines[1], ",,, ,,, @");
        assert!(out.contains("Dimensions: 3 x 2"));
        assert!(out.contains("Active Layers: set, props, characters"));
    }

    #[test]
    fn hidden_layers_are_not_drawn() {
        let mut layers = LayerSet::default();
        layers.set_mode(LayerKind::Props, LayerMode::Off);
        layers.set_mode(LayerKind::Characters, LayerMode::Disabled);
        let out = TextRenderer::new(ViewMode::Layered).render(&sample(), &layers);
        assert!(!out.contains("[O]"));
        assert!(!out.contains('@'));
        assert!(out.contains("Active Layers: set\n"));
    }

    #[test]
    fn separated_titles_each_visible_layer() {
        let mut layers = LayerSet::default();
        layers.set_mode(LayerKind::Set, LayerMode::Off);
        let out = TextRenderer::new(ViewMode::Separated).render(&sample(), &layers);
        assert!(!out.contains("[set]"));
        assert!(out.contains("[props]"));
        assert!(out.contains("[characters]"));
    }

    #[test]
    fn rendering_does_not_change_world() {
        let world = sample();
        let before = world.clone();
        TextRenderer::default().render(&world, &LayerSet::default());
        assert_eq!(world, before);
    }

    #[test]
    fn empty_world_renders_footer_only() {
        let out = TextRenderer::default().render(&World::new(Dimensions::new(0, 0)), &LayerSet::default());
        assert_eq!(out, "Dimensions: 0 x 0\nActive Layers: set, props, characters\n");
    }
}
