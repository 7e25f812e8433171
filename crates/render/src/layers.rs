use serde::{Deserialize, Serialize};
use tileworld_common::LayerKind;

/// Presentation mode of a layer.
///
/// `Off` and `Disabled` currently behave the same (the layer is not drawn);
/// they are kept apart so `Disabled` can later mean more than hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerMode {
    #[default]
    On,
    Off,
    Disabled,
}

impl LayerMode {
    pub fn is_visible(self) -> bool {
        self == LayerMode::On
    }
}

/// Visibility of one layer. Does not affect stored world data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerConfig {
    #[serde(rename = "type")]
    pub kind: LayerKind,
    pub mode: LayerMode,
}

impl LayerConfig {
    pub fn new(kind: LayerKind, mode: LayerMode) -> Self {
        Self { kind, mode }
    }
}

/// Configuration for all three layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSet {
    pub set: LayerConfig,
    pub props: LayerConfig,
    pub characters: LayerConfig,
}

impl Default for LayerSet {
    fn default() -> Self {
        Self {
            set: LayerConfig::new(LayerKind::Set, LayerMode::On),
            props: LayerConfig::new(LayerKind::Props, LayerMode::On),
            characters: LayerConfig::new(LayerKind::Characters, LayerMode::On),
        }
    }
}

impl LayerSet {
    pub fn get(&self, kind: LayerKind) -> LayerConfig {
        match kind {
            LayerKind::Set => self.set,
            LayerKind::Props => self.props,
            LayerKind::Characters => self.characters,
        }
    }

    pub fn set_mode(&mut self, kind: LayerKind, mode: LayerMode) {
        let slot = match kind {
            LayerKind::Set => &mut self.set,
            LayerKind::Props => &mut self.props,
            LayerKind::Characters => &mut self.characters,
        };
        slot.mode = mode;
    }

    pub fn is_visible(&self, kind: LayerKind) -> bool {
        self.get(kind).mode.is_visible()
    }

    /// Layers to draw, bottom to top.
    pub fn visible_layers(&self) -> Vec<LayerKind> {
        LayerKind::ALL
            .into_iter()
            .filter(|k| self.is_visible(*k))
            .collect()
    }
}
