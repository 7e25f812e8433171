use glam::IVec2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Size of a world or layer, in tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: usize,
    pub height: usize,
}

impl Dimensions {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Total number of cells.
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Whether `pos` lies inside `[0, width) x [0, height)`.
    pub fn contains(&self, pos: GridPos) -> bool {
        self.index_of(pos).is_some()
    }

    /// Convert a signed position into `(column, row)` indices, or `None` when out of range.
    pub fn index_of(&self, pos: GridPos) -> Option<(usize, usize)> {
        let x = usize::try_from(pos.x).ok()?;
        let y = usize::try_from(pos.y).ok()?;
        (x < self.width && y < self.height).then_some((x, y))
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.width, self.height)
    }
}

/// A tile coordinate. Signed so that pointer positions left of or above the
/// grid are representable (and rejected by bounds checks, not by the type).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<IVec2> for GridPos {
    fn from(v: IVec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<GridPos> for IVec2 {
    fn from(p: GridPos) -> Self {
        IVec2::new(p.x, p.y)
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The three stacked layers of a world, bottom to top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    /// Terrain and background.
    Set,
    /// Objects such as switches.
    Props,
    /// Players and NPCs.
    Characters,
}

impl LayerKind {
    /// All layers in stacking order.
    pub const ALL: [LayerKind; 3] = [LayerKind::Set, LayerKind::Props, LayerKind::Characters];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Set => "set",
            Self::Props => "props",
            Self::Characters => "characters",
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a [`LayerKind`] or [`Mode`] from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown layer {0:?}, expected one of: set, props, characters")]
    UnknownLayer(String),
    #[error("unknown mode {0:?}, expected display or edit")]
    UnknownMode(String),
}

impl FromStr for LayerKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "set" => Ok(Self::Set),
            "props" => Ok(Self::Props),
            "characters" => Ok(Self::Characters),
            other => Err(ParseError::UnknownLayer(other.to_string())),
        }
    }
}

/// Session-level UI mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Interactive viewing; switches respond to clicks.
    #[default]
    Display,
    /// Reserved for authoring.
    Edit,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Display => "display",
            Self::Edit => "edit",
        })
    }
}

impl FromStr for Mode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "display" => Ok(Self::Display),
            "edit" => Ok(Self::Edit),
            other => Err(ParseError::UnknownMode(other.to_string())),
        }
    }
}
