/// Input sampler: which movement keys are held and where the pointer is.
///
/// The terminal event loop feeds this struct; the simulation step only reads
/// it. Terminal-specific key codes are translated in `main.rs`, so nothing
/// here depends on crossterm.
use std::collections::HashSet;

use crate::config::FireTrigger;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveKey {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputState {
    held: HashSet<MoveKey>,
    /// Pointer position in screen space (world units relative to the viewport).
    pub pointer_x: f32,
    pub pointer_y: f32,
    /// Pointer position in world space.
    pub world_x: f32,
    pub world_y: f32,
    /// Fire button is currently down.
    pub fire_down: bool,
    /// Fire button went down since the last `end_frame`.
    pub fire_pressed: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: MoveKey) {
        self.held.insert(key);
    }

    pub fn release(&mut self, key: MoveKey) {
        self.held.remove(&key);
    }

    pub fn is_held(&self, key: MoveKey) -> bool {
        self.held.contains(&key)
    }

    /// Horizontal and vertical intent in `{-1, 0, 1}`.
    pub fn axis(&self) -> (f32, f32) {
        let ax = self.is_held(MoveKey::Right) as i32 - self.is_held(MoveKey::Left) as i32;
        let ay = self.is_held(MoveKey::Down) as i32 - self.is_held(MoveKey::Up) as i32;
        (ax as f32, ay as f32)
    }

    /// Record a pointer move. `camera` is the current top-left view offset.
    pub fn set_pointer(&mut self, screen_x: f32, screen_y: f32, camera: (f32, f32)) {
        self.pointer_x = screen_x;
        self.pointer_y = screen_y;
        self.world_x = screen_x + camera.0;
        self.world_y = screen_y + camera.1;
    }

    /// Re-project the last screen position after the camera moved.
    pub fn follow_camera(&mut self, camera: (f32, f32)) {
        self.world_x = self.pointer_x + camera.0;
        self.world_y = self.pointer_y + camera.1;
    }

    pub fn fire_down(&mut self) {
        if !self.fire_down {
            self.fire_pressed = true;
        }
        self.fire_down = true;
    }

    pub fn fire_up(&mut self) {
        self.fire_down = false;
    }

    pub fn fire_requested(&self, trigger: FireTrigger) -> bool {
        match trigger {
            FireTrigger::Held => self.fire_down,
            FireTrigger::Press => self.fire_pressed,
        }
    }

    /// Clear one-frame edges. Call once after each simulation step.
    pub fn end_frame(&mut self) {
        self.fire_pressed = false;
    }
}
