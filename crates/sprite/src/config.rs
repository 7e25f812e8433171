use serde::{Deserialize, Serialize};

/// Frames per second when none is given.
pub const DEFAULT_FPS: f32 = 10.0;

fn default_fps() -> f32 {
    DEFAULT_FPS
}

fn default_true() -> bool {
    true
}

/// A named frame sequence. Frame indices may repeat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationDescriptor {
    pub name: String,
    pub frames: Vec<u32>,
    /// Play-once unless set.
    #[serde(default, rename = "loop", skip_serializing_if = "Option::is_none")]
    pub looping: Option<bool>,
}

impl AnimationDescriptor {
    pub fn new(name: impl Into<String>, frames: impl IntoIterator<Item = u32>) -> Self {
        Self {
            name: name.into(),
            frames: frames.into_iter().collect(),
            looping: None,
        }
    }

    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = Some(looping);
        self
    }

    /// Overlay animations play once by default.
    pub fn loops(&self) -> bool {
        self.looping.unwrap_or(false)
    }
}

/// Everything a sprite needs: its idle animation, speed, and optional press
/// and release animations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpriteConfig {
    pub name: String,
    pub frames: Vec<u32>,
    #[serde(default = "default_fps")]
    pub fps: f32,
    #[serde(default = "default_true", rename = "loop")]
    pub looping: bool,
    #[serde(default, rename = "onMouseDownAnimation")]
    pub on_mouse_down: Option<AnimationDescriptor>,
    #[serde(default, rename = "onMouseUpAnimation")]
    pub on_mouse_up: Option<AnimationDescriptor>,
}

impl SpriteConfig {
    /// An idle-only sprite at [`DEFAULT_FPS`], looping.
    pub fn new(name: impl Into<String>, frames: impl IntoIterator<Item = u32>) -> Self {
        Self {
            name: name.into(),
            frames: frames.into_iter().collect(),
            fps: DEFAULT_FPS,
            looping: true,
            on_mouse_down: None,
            on_mouse_up: None,
        }
    }

    pub fn fps(mut self, fps: f32) -> Self {
        self.fps = fps;
        self
    }

    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn on_mouse_down(mut self, anim: AnimationDescriptor) -> Self {
        self.on_mouse_down = Some(anim);
        self
    }

    pub fn on_mouse_up(mut self, anim: AnimationDescriptor) -> Self {
        self.on_mouse_up = Some(anim);
        self
    }
}
