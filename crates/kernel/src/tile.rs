use serde::Serialize;
use std::fmt;

/// State every tile starts in unless told otherwise.
pub const DEFAULT_STATE: &str = "default";

/// Errors from tile construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("current state {current:?} must be included in states {states:?}")]
    StateNotInStates { current: String, states: Vec<String> },
    #[error("a tile must declare at least one state")]
    EmptyStates,
}

/// Optional fields for [`Tile::new`]. Omitted states default to
/// `["default"]` and an omitted or empty current state to `"default"`.
#[derive(Debug, Clone, Default)]
pub struct TileOptions {
    pub image: Option<String>,
    pub states: Option<Vec<String>>,
    pub current_state: Option<String>,
}

impl TileOptions {
    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.states = Some(states.into_iter().map(Into::into).collect());
        self
    }

    pub fn current_state(mut self, state: impl Into<String>) -> Self {
        self.current_state = Some(state.into());
        self
    }
}

/// The atomic cell content of a layer.
///
/// Tiles are values: changing a tile means building a new one (see
/// [`Tile::with_state`]), and a grid cell always holds its own copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    name: String,
    glyph: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<String>,
    states: Vec<String>,
    current_state: String,
}

impl Tile {
    /// Build a tile, resolving defaults and checking that the current state
    /// is one of the states.
    pub fn new(
        name: impl Into<String>,
        glyph: impl Into<String>,
        options: TileOptions,
    ) -> Result<Self, ValidationError> {
        let states = options
            .states
            .unwrap_or_else(|| vec![DEFAULT_STATE.to_string()]);
        let current_state = options
            .current_state
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_STATE.to_string());

        if states.is_empty() {
            return Err(ValidationError::EmptyStates);
        }
        if !states.contains(&current_state) {
            return Err(ValidationError::StateNotInStates {
                current: current_state,
                states,
            });
        }

        Ok(Self {
            name: name.into(),
            glyph: glyph.into(),
            image: options.image,
            states,
            current_state,
        })
    }

    /// A single-state tile with no image. Cannot fail.
    pub fn simple(name: impl Into<String>, glyph: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            glyph: glyph.into(),
            image: None,
            states: vec![DEFAULT_STATE.to_string()],
            current_state: DEFAULT_STATE.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fallback visual used when there is no image.
    pub fn glyph(&self) -> &str {
        &self.glyph
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn states(&self) -> &[String] {
        &self.states
    }

    pub fn current_state(&self) -> &str {
        &self.current_state
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name == name
    }

    pub fn has_state(&self, state: &str) -> bool {
        self.states.iter().any(|s| s == state)
    }

    /// Return a copy of this tile that also declares `states`, appended in
    /// order after the ones it already has.
    pub fn declaring<'a>(&self, states: impl IntoIterator<Item = &'a str>) -> Self {
        let mut tile = self.clone();
        for state in states {
            if !tile.has_state(state) {
                tile.states.push(state.to_string());
            }
        }
        tile
    }

    /// Return a copy of this tile in `state`.
    pub fn with_state(&self, state: &str) -> Result<Self, ValidationError> {
        if !self.has_state(state) {
            return Err(ValidationError::StateNotInStates {
                current: state.to_string(),
                states: self.states.clone(),
            });
        }
        Ok(Self {
            current_state: state.to_string(),
            ..self.clone()
        })
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.current_state)
    }
}

/// Common tiles.
pub mod presets {
    use super::Tile;

    pub fn empty() -> Tile {
        Tile::simple("empty", " ")
    }

    pub fn grass() -> Tile {
        Tile::simple("grass", ",,,")
    }

    pub fn stone() -> Tile {
        Tile::simple("stone", "###")
    }

    pub fn water() -> Tile {
        Tile::simple("water", "~~~")
    }

    pub fn wall() -> Tile {
        Tile::simple("wall", "|||")
    }

    pub fn player() -> Tile {
        Tile::simple("player", "@")
    }

    /// A three-state switch starting in `default`.
    pub fn switch() -> Tile {
        Tile {
            name: "switch".into(),
            glyph: "[O]".into(),
            image: None,
            states: vec!["default".into(), "on".into(), "off".into()],
            current_state: "default".into(),
        }
    }
}
