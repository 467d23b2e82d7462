//! Built-in rendering adapters and input state.
//!
//! [`HeadlessRender`] mirrors the scenario's entity set and tracks key
//! state without opening a window; input events are fed in through
//! [`HeadlessRender::press_key`] / [`HeadlessRender::release_key`], which
//! stand in for a windowing system's event queue. [`NullRender`] drops
//! everything.

use strider_scene::Scenario;
use strider_types::SceneError;

use crate::backend::RenderBackend;
use crate::flatten::flatten;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of addressable key codes.
pub const KEY_COUNT: usize = 256;

/// Key codes used by the example scripts.
pub mod keys {
    /// P — conventionally toggles pause in the examples.
    pub const KEY_P: usize = 15;
    /// R — conventionally resets the simulation in the examples.
    pub const KEY_R: usize = 17;
    /// Escape — conventionally exits the loop in the examples.
    pub const KEY_ESCAPE: usize = 26;
}

/// Snapshot of which keys are down at one instant.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeyState {
    down: Vec<bool>,
}

impl Default for KeyState {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyState {
    /// All keys up.
    #[must_use]
    pub fn new() -> Self {
        Self {
            down: vec![false; KEY_COUNT],
        }
    }

    /// Whether the key is down in this snapshot.
    #[must_use]
    pub fn is_down(&self, code: usize) -> bool {
        self.down.get(code).copied().unwrap_or(false)
    }

    /// Set a key's state. Out-of-range codes are ignored.
    pub fn set(&mut self, code: usize, down: bool) {
        if let Some(slot) = self.down.get_mut(code) {
            *slot = down;
        }
    }
}

/// Windowless rendering adapter.
#[derive(Debug, Default)]
pub struct HeadlessRender {
    entities: Vec<String>,
    keys: KeyState,
    frames: u64,
    loaded: bool,
}

impl HeadlessRender {
    /// Create a headless renderer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            keys: KeyState::new(),
            frames: 0,
            loaded: false,
        }
    }

    /// Names of mirrored entities, in flattening order.
    #[must_use]
    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    /// Feed a key-down event.
    pub fn press_key(&mut self, code: usize) {
        self.keys.set(code, true);
    }

    /// Feed a key-up event.
    pub fn release_key(&mut self, code: usize) {
        self.keys.set(code, false);
    }
}

impl RenderBackend for HeadlessRender {
    fn backend_id(&self) -> &'static str {
        "headless"
    }

    fn load_scenario(&mut self, scenario: &Scenario) -> strider_types::Result<()> {
        let scene = flatten(scenario)?;
        self.entities = scene.bodies.iter().map(|b| b.name.clone()).collect();
        self.frames = 0;
        self.loaded = true;
        Ok(())
    }

    fn render_frame(&mut self) -> strider_types::Result<()> {
        if !self.loaded {
            return Err(SceneError::not_ready("render"));
        }
        self.frames += 1;
        Ok(())
    }

    fn poll_key_state(&self) -> KeyState {
        self.keys.clone()
    }

    fn frame_count(&self) -> u64 {
        self.frames
    }
}

/// No-op rendering adapter.
#[derive(Debug, Default)]
pub struct NullRender {
    frames: u64,
}

impl NullRender {
    /// Create a null renderer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderBackend for NullRender {
    fn backend_id(&self) -> &'static str {
        "null"
    }

    fn load_scenario(&mut self, _scenario: &Scenario) -> strider_types::Result<()> {
        Ok(())
    }

    fn render_frame(&mut self) -> strider_types::Result<()> {
        self.frames += 1;
        Ok(())
    }

    fn poll_key_state(&self) -> KeyState {
        KeyState::new()
    }

    fn frame_count(&self) -> u64 {
        self.frames
    }
}
