//! Input events and key bindings.

use std::collections::HashMap;

use orb_math::Vec3;

use crate::command::Command;

/// Keys the viewer forwards to the render loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    I,
    J,
    K,
    L,
    U,
    O,
    Up,
    Down,
    Left,
    Right,
    Tab,
}

/// A discrete event from the presentation surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    KeyDown(Key),
}

/// What a key does once decoded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Binding {
    /// Apply a camera command
    Command(Command),
    /// Move the currently selected sphere by this offset
    MoveSelected(Vec3),
    /// Select the next sphere, wrapping around
    SelectNext,
}

/// Key to binding table.
#[derive(Debug, Clone)]
pub struct KeyMap {
    bindings: HashMap<Key, Binding>,
}

impl KeyMap {
    /// An empty key map.
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Default bindings with spheres moving `sphere_step` units per press.
    ///
    /// - `W`/`S`: move forward/back
    /// - `A`/`D`, `Left`/`Right`: turn
    /// - `Up`/`Down`: look up/down
    /// - `J`/`L`, `U`/`O`, `I`/`K`: move the selected sphere along x, y, z
    /// - `Tab`: select the next sphere
    pub fn with_sphere_step(sphere_step: f64) -> Self {
        let step = sphere_step;
        let mut map = Self::empty();
        map.bind(Key::W, Binding::Command(Command::TranslateForward))
            .bind(Key::S, Binding::Command(Command::TranslateBackward))
            .bind(Key::A, Binding::Command(Command::YawLeft))
            .bind(Key::Left, Binding::Command(Command::YawLeft))
            .bind(Key::D, Binding::Command(Command::YawRight))
            .bind(Key::Right, Binding::Command(Command::YawRight))
            .bind(Key::Up, Binding::Command(Command::PitchUp))
            .bind(Key::Down, Binding::Command(Command::PitchDown))
            .bind(Key::J, Binding::MoveSelected(Vec3::new(-step, 0.0, 0.0)))
            .bind(Key::L, Binding::MoveSelected(Vec3::new(step, 0.0, 0.0)))
            .bind(Key::U, Binding::MoveSelected(Vec3::new(0.0, step, 0.0)))
            .bind(Key::O, Binding::MoveSelected(Vec3::new(0.0, -step, 0.0)))
            .bind(Key::I, Binding::MoveSelected(Vec3::new(0.0, 0.0, -step)))
            .bind(Key::K, Binding::MoveSelected(Vec3::new(0.0, 0.0, step)))
            .bind(Key::Tab, Binding::SelectNext);
        map
    }

    /// Bind a key, replacing any previous binding.
    pub fn bind(&mut self, key: Key, binding: Binding) -> &mut Self {
        self.bindings.insert(key, binding);
        self
    }

    /// Look up what a key does.
    pub fn decode(&self, key: Key) -> Option<Binding> {
        self.bindings.get(&key).copied()
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::with_sphere_step(0.25)
    }
}
