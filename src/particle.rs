/*
 * Particle Module
 *
 * This module defines the Particle struct and how new particles are spawned.
 * A particle is a short-lived point with a velocity, a palette color and an
 * optional terminal-style glyph. Its life runs from 1 down to 0 over
 * `max_life` frames.
 */

use nannou::prelude::*;
use rand::Rng;
use std::f32::consts::TAU;

use crate::config::FieldConfig;

// Terminal greens, a cyan and an amber accent
pub const PALETTE: [(u8, u8, u8); 5] = [
    (0, 255, 65),
    (0, 190, 60),
    (120, 255, 170),
    (0, 200, 255),
    (255, 176, 0),
];

pub const GLYPHS: [char; 14] = ['0', '1', '>', '_', '/', '\\', '{', '}', '#', '$', '*', '+', ';', '|'];

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub position: Point2,
    pub velocity: Vec2,
    pub size: f32,
    pub color: Rgb<u8>,
    pub glyph: Option<char>,
    pub life: f32,
    pub max_life: u32,
}

impl Particle {
    pub fn spawn<R: Rng>(position: Point2, config: &FieldConfig, rng: &mut R) -> Self {
        // Random heading, random speed up to the initial speed
        let angle = rng.gen_range(0.0..TAU);
        let speed = rng.gen::<f32>() * config.initial_speed;
        let velocity = vec2(angle.cos(), angle.sin()) * speed;

        let (r, g, b) = PALETTE[rng.gen_range(0..PALETTE.len())];
        let glyph = if rng.gen_bool(config.glyph_probability) {
            Some(GLYPHS[rng.gen_range(0..GLYPHS.len())])
        } else {
            None
        };

        Self {
            position,
            velocity,
            size: rng.gen_range(config.min_size..=config.max_size),
            color: rgb(r, g, b),
            glyph,
            life: 1.0,
            max_life: rng.gen_range(config.min_life_frames..=config.max_life_frames).max(1),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    // Spend one frame of life
    pub fn age(&mut self) {
        self.life = (self.life - 1.0 / self.max_life as f32).max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn spawn_respects_config_ranges() {
        let config = FieldConfig::default();
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..500 {
            let particle = Particle::spawn(pt2(10.0, 20.0), &config, &mut rng);

            assert_eq!(particle.life, 1.0);
            assert!(particle.size >= config.min_size && particle.size <= config.max_size);
            assert!(particle.max_life >= config.min_life_frames && particle.max_life <= config.max_life_frames);
            assert!(particle.speed() <= config.initial_speed + 1e-5);
            assert!(PALETTE.contains(&(particle.color.red, particle.color.green, particle.color.blue)));
            if let Some(glyph) = particle.glyph {
                assert!(GLYPHS.contains(&glyph));
            }
        }
    }

    #[test]
    fn glyphs_can_be_disabled() {
        let config = FieldConfig { glyph_probability: 0.0, ..FieldConfig::default() };
        let mut rng = StdRng::seed_from_u64(9);

        assert!((0..100).all(|_| Particle::spawn(Point2::ZERO, &config, &mut rng).glyph.is_none()));
    }

    #[test]
    fn age_runs_out_after_max_life_frames() {
        let config = FieldConfig { min_life_frames: 4, max_life_frames: 4, ..FieldConfig::default() };
        let mut rng = StdRng::seed_from_u64(1);
        let mut particle = Particle::spawn(Point2::ZERO, &config, &mut rng);

        for _ in 0..3 {
            particle.age();
            assert!(particle.is_alive());
        }
        particle.age();
        assert!(!particle.is_alive());

        particle.age();
        assert_eq!(particle.life, 0.0);
    }
}
