/*
 * Pointer Module
 *
 * This module tracks the pointer shared by the particle field and the cursor
 * overlay. It keeps the last observed coordinates, a pulse intensity raised
 * by presses, and an autonomous drift point that stands in for the pointer
 * while it is idle so the field never goes fully static.
 */

use nannou::prelude::*;

use crate::config::FieldConfig;
use crate::viewport::Viewport;

// Coordinates used before the first pointer event
pub const OFFSCREEN: f32 = -10000.0;

// Pulse values below this snap to zero
const PULSE_EPSILON: f32 = 1e-3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerState {
    pub x: f32,
    pub y: f32,
    pub pulse: f32,
    pub idle: bool,
    pub drift: Vec2,
}

impl Default for PointerState {
    fn default() -> Self {
        Self {
            x: OFFSCREEN,
            y: OFFSCREEN,
            pulse: 0.0,
            idle: true,
            drift: vec2(OFFSCREEN, OFFSCREEN),
        }
    }
}

impl PointerState {
    // The point forces are computed against: live coordinates, or the drift point while idle
    pub fn focus(&self) -> Vec2 {
        if self.idle {
            self.drift
        } else {
            vec2(self.x, self.y)
        }
    }

    pub fn is_active(&self) -> bool {
        !self.idle
    }
}

pub struct PointerTracker {
    state: PointerState,
    drift_clock: f32,
    press_pulse: f32,
    pulse_decay: f32,
    drift_speed: f32,
}

impl PointerTracker {
    pub fn new(config: &FieldConfig) -> Self {
        Self {
            state: PointerState::default(),
            drift_clock: 0.0,
            press_pulse: config.press_pulse,
            pulse_decay: config.pulse_decay,
            drift_speed: config.drift_speed,
        }
    }

    pub fn state(&self) -> &PointerState {
        &self.state
    }

    // Pick up tuning changes without losing the current pointer
    pub fn reconfigure(&mut self, config: &FieldConfig) {
        self.press_pulse = config.press_pulse;
        self.pulse_decay = config.pulse_decay;
        self.drift_speed = config.drift_speed;
    }

    pub fn on_move(&mut self, x: f32, y: f32) {
        self.state.x = x;
        self.state.y = y;
        self.state.idle = false;
    }

    pub fn on_press(&mut self) {
        self.state.pulse = self.press_pulse;
        self.state.idle = false;
    }

    pub fn on_leave(&mut self) {
        self.state.idle = true;
    }

    // Per-frame bookkeeping: decay the pulse and advance the drift while idle
    pub fn tick(&mut self, viewport: &Viewport) {
        self.state.pulse *= self.pulse_decay;
        if self.state.pulse < PULSE_EPSILON {
            self.state.pulse = 0.0;
        }

        if self.state.idle {
            self.drift_clock += self.drift_speed;
            self.state.drift = autonomous_drift(viewport, self.drift_clock);
        }
    }

    // Place the drift point for the current clock, used when a surface is (re)measured
    pub fn settle(&mut self, viewport: &Viewport) {
        self.state.drift = autonomous_drift(viewport, self.drift_clock);
    }

    pub fn reset(&mut self) {
        self.state = PointerState::default();
        self.drift_clock = 0.0;
    }
}

// Deterministic Lissajous path that stays inside the surface
pub fn autonomous_drift(viewport: &Viewport, t: f32) -> Vec2 {
    let center = viewport.center();
    vec2(
        center.x + viewport.width * 0.35 * (t * 0.7).sin(),
        center.y + viewport.height * 0.3 * (t * 1.1 + 0.5).sin(),
    )
}
