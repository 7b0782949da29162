//! Input handling for keyboard and mouse, reduced to named flight controls.

mod controls;

pub use controls::{Control, Controls};

use glam::Vec2;
use std::collections::{HashMap, HashSet};

/// Manages raw input state for the current frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down.
    keys_held: HashSet<KeyCode>,
    /// Keys pressed this frame.
    keys_pressed: HashSet<KeyCode>,

    /// Mouse buttons currently held.
    mouse_held: HashSet<MouseButton>,

    /// Last cursor position in window coordinates.
    mouse_position: Option<Vec2>,
    /// Drag movement accumulated since the last frame (pixels).
    accumulated_drag: Vec2,
    /// Scroll lines accumulated since the last frame.
    accumulated_scroll: f32,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame state. Call after sampling controls for a tick.
    pub fn end_frame(&mut self) {
        self.keys_pressed.clear();
        self.accumulated_drag = Vec2::ZERO;
        self.accumulated_scroll = 0.0;
    }

    /// Process a keyboard event.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.keys_held.contains(&key) {
                    self.keys_pressed.insert(key);
                }
                self.keys_held.insert(key);
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
            }
        }
    }

    /// Process a mouse button event.
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.mouse_held.insert(button);
            }
            ElementState::Released => {
                self.mouse_held.remove(&button);
            }
        }
    }

    /// Process cursor position update. Movement counts as orbit drag only while
    /// the drag button is held.
    pub fn process_cursor_position(&mut self, position: (f64, f64), drag_button: MouseButton) {
        let position = Vec2::new(position.0 as f32, position.1 as f32);
        if let Some(previous) = self.mouse_position {
            if self.mouse_held.contains(&drag_button) {
                self.accumulated_drag += position - previous;
            }
        }
        self.mouse_position = Some(position);
    }

    /// Process a wheel event in lines (positive = scroll up).
    pub fn process_scroll(&mut self, lines: f32) {
        self.accumulated_scroll += lines;
    }

    /// Check if a key is currently held.
    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Check if a key was pressed this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Sample the named controls for this tick through `bindings`.
    pub fn controls(&self, bindings: &Bindings) -> Controls {
        let mut controls = Controls::default();
        for (key, control) in &bindings.keys {
            if self.keys_held.contains(key) {
                controls.set(*control, true);
            }
        }
        if let Some(fire) = bindings.fire_button {
            if self.mouse_held.contains(&fire) {
                controls.set(Control::Fire, true);
            }
        }
        controls.look_delta = Vec2::new(
            -self.accumulated_drag.x * bindings.look_sensitivity,
            self.accumulated_drag.y * bindings.look_sensitivity,
        );
        controls.zoom_delta = -self.accumulated_scroll * bindings.zoom_step;
        controls
    }
}

/// Maps physical keys and buttons onto [`Control`]s.
#[derive(Debug, Clone)]
pub struct Bindings {
    pub keys: HashMap<KeyCode, Control>,
    pub fire_button: Option<MouseButton>,
    pub drag_button: MouseButton,
    /// Radians of camera orbit per pixel of drag.
    pub look_sensitivity: f32,
    /// World units of zoom per scroll line.
    pub zoom_step: f32,
}

impl Default for Bindings {
    fn default() -> Self {
        let keys = HashMap::from([
            (KeyCode::ShiftLeft, Control::ThrottleUp),
            (KeyCode::ControlLeft, Control::ThrottleDown),
            (KeyCode::KeyA, Control::RollLeft),
            (KeyCode::KeyD, Control::RollRight),
            (KeyCode::KeyQ, Control::FineRollLeft),
            (KeyCode::KeyE, Control::FineRollRight),
            (KeyCode::KeyS, Control::PitchUp),
            (KeyCode::KeyW, Control::PitchDown),
            (KeyCode::ArrowLeft, Control::YawLeft),
            (KeyCode::ArrowRight, Control::YawRight),
            (KeyCode::Space, Control::Fire),
            (KeyCode::KeyC, Control::LookBehind),
        ]);
        Self {
            keys,
            fire_button: Some(MouseButton::Left),
            drag_button: MouseButton::Right,
            look_sensitivity: 0.005,
            zoom_step: 2.0,
        }
    }
}

impl Bindings {
    /// Rebind `key` to `control`, replacing whatever it did before.
    pub fn bind(&mut self, key: KeyCode, control: Control) {
        self.keys.insert(key, control);
    }
}

// Re-export for convenience
pub use winit::event::{ElementState, MouseButton};
pub use winit::keyboard::KeyCode;
