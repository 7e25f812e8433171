use tileworld_common::{GridPos, LayerKind, Mode};
use tileworld_kernel::{Tile, World};
use tileworld_loader::{LoadError, WorldLoader};

/// Handle for one in-flight load, issued by [`WorldStore::begin_load`].
///
/// Generations increase monotonically, so a response can be compared with
/// whatever has already been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    name: String,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// What happened to a finished load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The loaded world is now current.
    Installed,
    /// The load failed; the error is recorded and the previous world kept.
    Failed,
    /// A newer load had already been applied, so this result was dropped.
    Stale,
}

/// Explicit session state container: the current world, the UI mode, and the
/// load status the rendering surface reads.
///
/// Created at session start, dropped at session end, and handed to consumers
/// by reference. Every mutation takes `&mut self`, so there is exactly one
/// writer at a time.
#[derive(Debug, Default)]
pub struct WorldStore {
    world: Option<World>,
    error: Option<String>,
    mode: Mode,
    revision: u64,
    in_flight: usize,
    next_generation: u64,
    settled_generation: u64,
}

impl WorldStore {
    /// An empty store: no world, not loading, display mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that starts with `world` already installed.
    pub fn with_world(world: World) -> Self {
        Self {
            world: Some(world),
            revision: 1,
            ..Self::default()
        }
    }

    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Message from the most recent failed load, cleared when a load starts.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Bumped every time a different world (or world contents) becomes current.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn tile_at(&self, layer: LayerKind, pos: GridPos) -> Option<&Tile> {
        self.world.as_ref()?.tile_at(layer, pos)
    }

    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            tracing::debug!(from = %self.mode, to = %mode, "mode changed");
        }
        self.mode = mode;
    }

    /// Load `name` through `loader` and install the result.
    ///
    /// The loading flag is raised for the duration and lowered afterwards,
    /// including when this future is dropped before completing.
    pub async fn load_world<L: WorldLoader>(&mut self, loader: &L, name: &str) -> LoadOutcome {
        let ticket = self.begin_load(name);
        let mut guard = PendingLoad {
            store: self,
            ticket: ticket.clone(),
            armed: true,
        };
        let result = loader.load(name).await;
        guard.armed = false;
        guard.store.finish_load(ticket, result)
    }

    /// Start a load and get the ticket to finish it with. Clears any previous error.
    pub fn begin_load(&mut self, name: &str) -> LoadTicket {
        self.next_generation += 1;
        self.in_flight += 1;
        self.error = None;
        tracing::debug!(name, generation = self.next_generation, "load started");
        LoadTicket {
            generation: self.next_generation,
            name: name.to_string(),
        }
    }

    /// Apply the result of a load started with [`WorldStore::begin_load`].
    ///
    /// Results arriving after a newer load has already been applied are
    /// discarded, so the newest request wins regardless of arrival order.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<World, LoadError>,
    ) -> LoadOutcome {
        self.in_flight = self.in_flight.saturating_sub(1);

        if ticket.generation < self.settled_generation {
            tracing::warn!(
                name = %ticket.name,
                generation = ticket.generation,
                current = self.settled_generation,
                "discarding stale world load"
            );
            return LoadOutcome::Stale;
        }
        self.settled_generation = ticket.generation;

        match result {
            Ok(world) => {
                tracing::info!(name = %ticket.name, dimensions = %world.dimensions(), "world installed");
                self.world = Some(world);
                self.error = None;
                self.revision += 1;
                LoadOutcome::Installed
            }
            Err(e) => {
                tracing::warn!(name = %ticket.name, error = %e, "error loading world");
                self.error = Some(e.to_string());
                LoadOutcome::Failed
            }
        }
    }

    /// Give up on a load without a result. Only the loading flag is affected.
    pub fn abandon_load(&mut self, ticket: LoadTicket) {
        self.in_flight = self.in_flight.saturating_sub(1);
        tracing::debug!(name = %ticket.name, generation = ticket.generation, "load abandoned");
    }

    /// Replace the single cell at `(x, y)` of `layer` with a copy of `tile`.
    ///
    /// Does nothing without a world. Coordinates outside the layer are logged
    /// and ignored. Returns whether a cell was written.
    pub fn update_tile(&mut self, layer: LayerKind, x: i32, y: i32, tile: &Tile) -> bool {
        let Some(world) = self.world.as_mut() else {
            tracing::debug!(%layer, x, y, "update_tile with no world loaded");
            return false;
        };

        let pos = GridPos::new(x, y);
        if !world.layer(layer).dimensions().contains(pos) {
            tracing::warn!(%layer, x, y, "update_tile: coordinates out of bounds");
            return false;
        }

        world.set_tile(layer, pos, tile);
        self.revision += 1;
        tracing::debug!(%layer, x, y, tile = %tile, "tile updated");
        true
    }
}

/// Lowers the loading flag if a [`WorldStore::load_world`] future is dropped mid-load.
struct PendingLoad<'a> {
    store: &'a mut WorldStore,
    ticket: LoadTicket,
    armed: bool,
}

impl Drop for PendingLoad<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.store.abandon_load(self.ticket.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::pin::pin;
    use std::task::{Context, Waker};
    use tileworld_common::Dimensions;
    use tileworld_kernel::presets;
    use tileworld_loader::{MemoryWorldLoader, world_to_json};

    fn world_5x5() -> World {
        let mut w = World::new(Dimensions::new(5, 5));
        w.set_tile(LayerKind::Props, GridPos::new(2, 3), &presets::switch());
        w
    }

    fn loader_with(name: &str, world: &World) -> MemoryWorldLoader {
        let mut loader = MemoryWorldLoader::new();
        loader.insert(name, world_to_json(world).unwrap());
        loader
    }

    #[test]
    fn new_store_is_empty() {
        let store = WorldStore::new();
        assert!(store.world().is_none());
        assert!(!store.is_loading());
        assert!(store.error().is_none());
        assert_eq!(store.mode(), Mode::Display);
    }

    #[test]
    fn load_installs_world_and_clears_flag() {
        let loader = loader_with("world0", &world_5x5());
        let mut store = WorldStore::new();

        let outcome = pollster::block_on(store.load_world(&loader, "world0"));
        assert_eq!(outcome, LoadOutcome::Installed);
        assert_eq!(store.world(), Some(&world_5x5()));
        assert!(!store.is_loading());
        assert!(store.error().is_none());
    }

    #[test]
    fn failed_load_keeps_previous_world() {
        let loader = loader_with("world0", &world_5x5());
        let mut store = WorldStore::new();
        pollster::block_on(store.load_world(&loader, "world0"));
        let revision = store.revision();

        let outcome = pollster::block_on(store.load_world(&loader, "missing"));
        assert_eq!(outcome, LoadOutcome::Failed);
        assert_eq!(store.world(), Some(&world_5x5()));
        assert!(store.error().unwrap().contains("missing"));
        assert!(!store.is_loading());
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn successful_load_clears_earlier_error() {
        let loader = loader_with("world0", &world_5x5());
        let mut store = WorldStore::new();
        pollster::block_on(store.load_world(&loader, "missing"));
        assert!(store.error().is_some());

        pollster::block_on(store.load_world(&loader, "world0"));
        assert!(store.error().is_none());
    }

    #[test]
    fn loading_flag_raised_while_ticket_outstanding() {
        let mut store = WorldStore::new();
        let ticket = store.begin_load("world0");
        assert!(store.is_loading());
        store.finish_load(ticket, Ok(world_5x5()));
        assert!(!store.is_loading());
    }

    #[test]
    fn stale_load_is_discarded() {
        let mut store = WorldStore::new();
        let first = store.begin_load("old");
        let second = store.begin_load("new");

        let newer = World::new(Dimensions::new(2, 2));
        assert_eq!(store.finish_load(second, Ok(newer.clone())), LoadOutcome::Installed);
        assert!(store.is_loading());

        assert_eq!(store.finish_load(first, Ok(world_5x5())), LoadOutcome::Stale);
        assert_eq!(store.world(), Some(&newer));
        assert!(!store.is_loading());
    }

    #[test]
    fn in_order_overlapping_loads_both_apply() {
        let mut store = WorldStore::new();
        let first = store.begin_load("a");
        let second = store.begin_load("b");
        assert_eq!(store.finish_load(first, Ok(world_5x5())), LoadOutcome::Installed);
        let newer = World::new(Dimensions::new(1, 1));
        assert_eq!(store.finish_load(second, Ok(newer.clone())), LoadOutcome::Installed);
        assert_eq!(store.world(), Some(&newer));
    }

    #[test]
    fn dropped_load_future_lowers_flag() {
        struct Never;
        impl WorldLoader for Never {
            fn load(&self, _name: &str) -> impl Future<Output = Result<World, LoadError>> {
                std::future::pending()
            }
        }

        let mut store = WorldStore::new();
        {
            let mut fut = pin!(store.load_world(&Never, "forever"));
            let mut cx = Context::from_waker(Waker::noop());
            assert!(fut.as_mut().poll(&mut cx).is_pending());
        }
        assert!(!store.is_loading());
        assert!(store.world().is_none());
    }

    #[test]
    fn update_without_world_is_noop() {
        let mut store = WorldStore::new();
        assert!(!store.update_tile(LayerKind::Props, 0, 0, &presets::switch()));
        assert!(store.world().is_none());
    }

    #[test]
    fn update_replaces_exactly_one_cell() {
        let mut store = WorldStore::with_world(world_5x5());
        let before = store.world().unwrap().clone();
        let revision = store.revision();

        assert!(store.update_tile(LayerKind::Set, 4, 0, &presets::water()));
        assert_eq!(store.revision(), revision + 1);

        let after = store.world().unwrap();
        for kind in LayerKind::ALL {
            for (pos, tile) in after.layer(kind).iter() {
                let expected = if kind == LayerKind::Set && pos == GridPos::new(4, 0) {
                    presets::water()
                } else {
                    before.tile_at(kind, pos).unwrap().clone()
                };
                assert_eq!(tile, &expected, "{kind} {pos}");
            }
        }
    }

    #[test]
    fn out_of_bounds_update_is_ignored() {
        let mut store = WorldStore::with_world(world_5x5());
        let revision = store.revision();
        for (x, y) in [(-1, 0), (0, -1), (5, 0), (0, 5)] {
            assert!(!store.update_tile(LayerKind::Props, x, y, &presets::wall()));
        }
        assert_eq!(store.world(), Some(&world_5x5()));
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn set_mode_does_not_touch_world() {
        let mut store = WorldStore::with_world(world_5x5());
        store.set_mode(Mode::Edit);
        assert_eq!(store.mode(), Mode::Edit);
        assert_eq!(store.world(), Some(&world_5x5()));
    }
}
