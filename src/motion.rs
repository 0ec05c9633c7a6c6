/*
 * Motion Module
 *
 * This module holds the per-particle update applied once per frame:
 * 1. Pointer force: push away from (or pull towards) the pointer focus
 * 2. Speed clamp
 * 3. Euler integration
 * 4. Glitch: rare random displacement, not subject to the clamp
 * 5. Friction
 * 6. Toroidal wrap
 * 7. Aging
 *
 * A particle's update never reads another particle, so the order particles
 * are stepped in does not matter.
 */

use nannou::prelude::*;
use rand::Rng;

use crate::config::{FieldConfig, PointerMode};
use crate::particle::Particle;
use crate::pointer::PointerState;
use crate::viewport::Viewport;

// Acceleration the pointer exerts on a particle this frame
pub fn pointer_force(position: Point2, pointer: &PointerState, config: &FieldConfig) -> Vec2 {
    let displacement = pointer.focus() - position;
    let distance = displacement.length();

    // Exact overlap has no direction, skip the force for this frame
    if distance <= 0.0 || distance >= config.interaction_radius || !distance.is_finite() {
        return Vec2::ZERO;
    }

    let falloff = (config.interaction_radius - distance) / config.interaction_radius;
    let magnitude = config.pointer_strength / distance * falloff * (1.0 + config.pulse_gain * pointer.pulse);
    let direction = displacement / distance;

    match config.pointer_mode {
        PointerMode::Repel => -direction * magnitude,
        PointerMode::Attract => direction * magnitude,
    }
}

#[inline]
fn clamp_speed(velocity: Vec2, max_speed: f32) -> Vec2 {
    let speed_squared = velocity.length_squared();
    if speed_squared > max_speed * max_speed {
        velocity * (max_speed / speed_squared.sqrt())
    } else {
        velocity
    }
}

// Advance one particle by one frame
pub fn step<R: Rng>(
    particle: &mut Particle,
    pointer: &PointerState,
    viewport: &Viewport,
    config: &FieldConfig,
    rng: &mut R,
) {
    let force = pointer_force(particle.position, pointer, config);
    if force != Vec2::ZERO {
        particle.velocity = clamp_speed(particle.velocity + force, config.max_speed);
    }

    particle.position += particle.velocity;

    if config.glitch_probability > 0.0 && rng.gen_bool(config.glitch_probability) {
        let jump = config.glitch_distance;
        particle.position += vec2(rng.gen_range(-jump..=jump), rng.gen_range(-jump..=jump));
    }

    particle.velocity *= config.friction;

    particle.position = viewport.wrap(particle.position);

    particle.age();
}

// Advance every particle; expired ones stay in place until reconciliation
pub fn step_all<R: Rng>(
    particles: &mut [Particle],
    pointer: &PointerState,
    viewport: &Viewport,
    config: &FieldConfig,
    rng: &mut R,
) {
    for particle in particles {
        step(particle, pointer, viewport, config, rng);
    }
}
