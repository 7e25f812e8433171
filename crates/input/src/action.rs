use tileworld_common::{GridPos, LayerKind, Mode};
use tileworld_kernel::Tile;
use tileworld_store::WorldStore;

/// Name of the only tile that reacts to clicks in display mode.
pub const SWITCH_TILE: &str = "switch";

/// States every switch moves through, in cycle order.
pub const SWITCH_STATES: [&str; 3] = ["default", "on", "off"];

/// A click or hover reported by the rendering surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileEvent {
    pub pos: GridPos,
    pub tile: Tile,
    pub layer: LayerKind,
}

impl TileEvent {
    pub fn new(pos: GridPos, tile: Tile, layer: LayerKind) -> Self {
        Self { pos, tile, layer }
    }
}

/// What the interaction policy wants done with the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileAction {
    /// Write `tile` into one cell.
    Update {
        layer: LayerKind,
        pos: GridPos,
        tile: Tile,
    },
    /// Nothing to do.
    Noop,
}

impl TileAction {
    /// Carry out the action. Returns whether the world changed.
    pub fn apply(self, store: &mut WorldStore) -> bool {
        match self {
            Self::Update { layer, pos, tile } => store.update_tile(layer, pos.x, pos.y, &tile),
            Self::Noop => false,
        }
    }
}

/// The switch cycle: `default -> on -> off -> default`. Unknown states reset to `default`.
pub fn next_switch_state(current: &str) -> &'static str {
    match current {
        "default" => "on",
        "on" => "off",
        _ => "default",
    }
}

/// Decide what a click does.
///
/// In display mode only a `switch` on the props layer responds, advancing one
/// step through its cycle. A switch that does not declare the cycle states
/// gains them. Edit mode has no click behavior yet.
pub fn handle_tile_click(mode: Mode, event: &TileEvent) -> TileAction {
    let TileEvent { pos, tile, layer } = event;
    tracing::debug!(%layer, %pos, tile = %tile, "tile clicked");

    match mode {
        Mode::Display => {
            if *layer != LayerKind::Props || !tile.is_named(SWITCH_TILE) {
                return TileAction::Noop;
            }
            let next = next_switch_state(tile.current_state());
            match tile.declaring(SWITCH_STATES).with_state(next) {
                Ok(tile) => TileAction::Update {
                    layer: *layer,
                    pos: *pos,
                    tile,
                },
                Err(e) => {
                    tracing::warn!(%pos, error = %e, "switch cannot enter next state");
                    TileAction::Noop
                }
            }
        }
        Mode::Edit => {
            tracing::debug!("no edit-mode click behavior");
            TileAction::Noop
        }
    }
}

/// Hovering has no effect on the world.
pub fn handle_tile_hover(event: &TileEvent) {
    tracing::trace!(layer = %event.layer, pos = %event.pos, tile = %event.tile, "tile hovered");
}

/// Run a click through the policy against the store's current mode and apply it.
pub fn dispatch_click(store: &mut WorldStore, event: &TileEvent) -> bool {
    handle_tile_click(store.mode(), event).apply(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tileworld_common::Dimensions;
    use tileworld_kernel::{TileOptions, World, presets};

    fn store_with_switch_at(pos: GridPos) -> WorldStore {
        let mut world = World::new(Dimensions::new(5, 5));
        world.set_tile(LayerKind::Props, pos, &presets::switch());
        WorldStore::with_world(world)
    }

    fn click(store: &mut WorldStore, layer: LayerKind, pos: GridPos) -> bool {
        let tile = store.tile_at(layer, pos).unwrap().clone();
        dispatch_click(store, &TileEvent::new(pos, tile, layer))
    }

    #[test]
    fn switch_cycle_order() {
        assert_eq!(next_switch_state("default"), "on");
        assert_eq!(next_switch_state("on"), "off");
        assert_eq!(next_switch_state("off"), "default");
        assert_eq!(next_switch_state("anything"), "default");
    }

    #[test]
    fn switch_cycles_through_three_clicks() {
        let pos = GridPos::new(2, 3);
        let mut store = store_with_switch_at(pos);
        let before = store.world().unwrap().clone();

        let mut seen = vec![];
        for _ in 0..3 {
            assert!(click(&mut store, LayerKind::Props, pos));
            seen.push(store.tile_at(LayerKind::Props, pos).unwrap().current_state().to_string());
        }
        assert_eq!(seen, ["on", "off", "default"]);

        // Back where we started, and nothing else moved along the way.
        assert_eq!(store.world().unwrap(), &before);
    }

    #[test]
    fn other_cells_untouched_by_switch_click() {
        let pos = GridPos::new(2, 3);
        let mut store = store_with_switch_at(pos);
        let before = store.world().unwrap().clone();
        click(&mut store, LayerKind::Props, pos);

        let after = store.world().unwrap();
        for kind in LayerKind::ALL {
            for (p, tile) in after.layer(kind).iter() {
                if !(kind == LayerKind::Props && p == pos) {
                    assert_eq!(Some(tile), before.tile_at(kind, p));
                }
            }
        }
    }

    #[test]
    fn switch_on_other_layer_is_inert() {
        let event = TileEvent::new(GridPos::new(0, 0), presets::switch(), LayerKind::Set);
        assert_eq!(handle_tile_click(Mode::Display, &event), TileAction::Noop);
    }

    #[test]
    fn non_switch_props_are_inert() {
        let event = TileEvent::new(GridPos::new(0, 0), presets::stone(), LayerKind::Props);
        assert_eq!(handle_tile_click(Mode::Display, &event), TileAction::Noop);
    }

    #[test]
    fn edit_mode_clicks_do_nothing() {
        let pos = GridPos::new(2, 3);
        let mut store = store_with_switch_at(pos);
        store.set_mode(Mode::Edit);
        assert!(!click(&mut store, LayerKind::Props, pos));
        assert_eq!(store.tile_at(LayerKind::Props, pos).unwrap().current_state(), "default");
    }

    #[test]
    fn switch_without_declared_states_gains_the_cycle() {
        let bare = Tile::new("switch", "[O]", TileOptions::default()).unwrap();
        let event = TileEvent::new(GridPos::new(1, 1), bare, LayerKind::Props);
        match handle_tile_click(Mode::Display, &event) {
            TileAction::Update { tile, .. } => {
                assert_eq!(tile.current_state(), "on");
                assert_eq!(tile.states(), SWITCH_STATES);
            }
            other => panic!("expected update, got {other:?}"),
        }
    }

    #[test]
    fn loaded_switch_without_states_cycles() {
        let grid = |tile: serde_json::Value| serde_json::json!({ "rows": vec![vec![tile; 5]; 5] });
        let mut doc = serde_json::json!({
            "dimensions": { "width": 5, "height": 5 },
            "setMap": grid(serde_json::json!({ "name": "grass", "glyph": ",,," })),
            "propsMap": grid(serde_json::json!({ "name": "empty", "glyph": " " })),
            "charactersMap": grid(serde_json::json!({ "name": "empty", "glyph": " " })),
        });
        doc["propsMap"]["rows"][3][2] =
            serde_json::json!({ "name": "switch", "glyph": "[O]", "currentState": "default" });

        let world = tileworld_loader::parse_world(&doc.to_string()).unwrap();
        let mut store = WorldStore::with_world(world);
        let pos = GridPos::new(2, 3);

        let mut seen = vec![];
        for _ in 0..3 {
            assert!(click(&mut store, LayerKind::Props, pos));
            seen.push(store.tile_at(LayerKind::Props, pos).unwrap().current_state().to_string());
        }
        assert_eq!(seen, ["on", "off", "default"]);
    }

    #[test]
    fn update_action_out_of_bounds_is_ignored() {
        let mut store = store_with_switch_at(GridPos::new(0, 0));
        let before = store.world().unwrap().clone();
        let action = TileAction::Update {
            layer: LayerKind::Props,
            pos: GridPos::new(-1, 0),
            tile: presets::wall(),
        };
        assert!(!action.apply(&mut store));
        assert_eq!(store.world().unwrap(), &before);
    }
}
