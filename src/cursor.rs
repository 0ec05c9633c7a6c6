/*
 * Cursor Overlay Module
 *
 * This module defines the CursorOverlay drawn on top of the particle field.
 * It reads the same pointer state the field uses: a dot pinned to the
 * pointer and a ring that trails behind it and swells with the pulse. The
 * tracker does no smoothing itself, so the trailing happens here.
 */

use nannou::prelude::*;

use crate::pointer::PointerState;
use crate::renderer::Canvas;

const DOT_RADIUS: f32 = 3.0;
const RING_RADIUS: f32 = 14.0;
const RING_WEIGHT: f32 = 1.5;
const RING_FOLLOW: f32 = 0.18;
const PULSE_SWELL: f32 = 0.8;

pub struct CursorOverlay {
    pub dot: Point2,
    pub ring: Point2,
    pub ring_scale: f32,
    pub visible: bool,
    pub color: Rgb<u8>,
}

impl Default for CursorOverlay {
    fn default() -> Self {
        Self {
            dot: Point2::ZERO,
            ring: Point2::ZERO,
            ring_scale: 1.0,
            visible: false,
            color: rgb(0, 255, 65),
        }
    }
}

impl CursorOverlay {
    // Follow the pointer. With reduced motion the ring snaps instead of trailing.
    pub fn update(&mut self, pointer: &PointerState, reduced_motion: bool) {
        let was_visible = self.visible;
        self.visible = pointer.is_active();
        if !self.visible {
            return;
        }

        self.dot = pt2(pointer.x, pointer.y);

        // Appear on the pointer rather than sliding in from the last spot
        if reduced_motion || !was_visible {
            self.ring = self.dot;
        } else {
            self.ring += (self.dot - self.ring) * RING_FOLLOW;
        }

        self.ring_scale = if reduced_motion { 1.0 } else { 1.0 + pointer.pulse * PULSE_SWELL };
    }

    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        if !self.visible {
            return;
        }

        // Ring drawn as a closed polyline so any Canvas can take it
        let radius = RING_RADIUS * self.ring_scale;
        let segments = 24;
        for i in 0..segments {
            let a0 = i as f32 / segments as f32 * std::f32::consts::TAU;
            let a1 = (i + 1) as f32 / segments as f32 * std::f32::consts::TAU;
            let from = self.ring + vec2(a0.cos(), a0.sin()) * radius;
            let to = self.ring + vec2(a1.cos(), a1.sin()) * radius;
            canvas.line(from, to, RING_WEIGHT, self.color, 0.6);
        }

        canvas.circle(self.dot, DOT_RADIUS, self.color, 1.0);
    }
}
