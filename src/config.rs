/*
 * Field Configuration Module
 *
 * This module defines the FieldConfig struct holding every tuning constant of
 * the particle field. Values can be adjusted through the tuning panel or
 * loaded from a JSON file. Missing keys fall back to the defaults.
 */

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read or write config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

// How particles are drawn. This is purely a rendering-time choice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderStyle {
    Glyph,
    Shape,
}

// Whether the pointer pushes particles away or pulls them in
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerMode {
    Repel,
    Attract,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ClearMode {
    // Wipe the surface every frame
    Full,
    // Paint a translucent background so previous frames leave a trail
    Fade { alpha: f32 },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    // Density
    pub density_divisor: f32,
    pub hard_cap: usize,
    pub compact_width: f32,
    pub compact_density_scale: f32,

    // Pointer interaction
    pub interaction_radius: f32,
    pub pointer_strength: f32,
    pub pointer_mode: PointerMode,
    pub pulse_gain: f32,
    pub press_pulse: f32,
    pub pulse_decay: f32,
    pub drift_speed: f32,
    pub pointer_spawn_probability: f64,
    pub pointer_spawn_jitter: f32,

    // Motion
    pub max_speed: f32,
    pub initial_speed: f32,
    pub friction: f32,
    pub glitch_probability: f64,
    pub glitch_distance: f32,

    // Particle appearance and lifetime
    pub min_size: f32,
    pub max_size: f32,
    pub glyph_probability: f64,
    pub min_life_frames: u32,
    pub max_life_frames: u32,

    // Rendering
    pub style: RenderStyle,
    pub clear: ClearMode,
    pub background: [u8; 3],
    pub particle_opacity: f32,
    pub shape_scale: f32,
    pub connection_radius: f32,
    pub connection_opacity: f32,
    pub connection_weight: f32,
    pub enable_spatial_grid: bool,

    // Resizing
    pub reseed_area_ratio: f32,

    // Fixed seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            density_divisor: 15000.0,
            hard_cap: 80,
            compact_width: 768.0,
            compact_density_scale: 0.5,

            interaction_radius: 100.0,
            pointer_strength: 20.0,
            pointer_mode: PointerMode::Repel,
            pulse_gain: 2.0,
            press_pulse: 1.0,
            pulse_decay: 0.92,
            drift_speed: 0.01,
            pointer_spawn_probability: 0.2,
            pointer_spawn_jitter: 12.0,

            max_speed: 3.0,
            initial_speed: 0.5,
            friction: 0.99,
            glitch_probability: 0.02,
            glitch_distance: 4.0,

            min_size: 8.0,
            max_size: 14.0,
            glyph_probability: 0.85,
            min_life_frames: 240,
            max_life_frames: 720,

            style: RenderStyle::Glyph,
            clear: ClearMode::Full,
            background: [4, 8, 6],
            particle_opacity: 0.9,
            shape_scale: 0.25,
            connection_radius: 80.0,
            connection_opacity: 0.35,
            connection_weight: 1.0,
            enable_spatial_grid: false,

            reseed_area_ratio: 0.2,

            seed: None,
        }
    }
}

impl FieldConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let floats = [
            ("density_divisor", self.density_divisor),
            ("compact_width", self.compact_width),
            ("compact_density_scale", self.compact_density_scale),
            ("interaction_radius", self.interaction_radius),
            ("pointer_strength", self.pointer_strength),
            ("pulse_gain", self.pulse_gain),
            ("press_pulse", self.press_pulse),
            ("pulse_decay", self.pulse_decay),
            ("drift_speed", self.drift_speed),
            ("pointer_spawn_jitter", self.pointer_spawn_jitter),
            ("max_speed", self.max_speed),
            ("initial_speed", self.initial_speed),
            ("friction", self.friction),
            ("glitch_distance", self.glitch_distance),
            ("min_size", self.min_size),
            ("max_size", self.max_size),
            ("particle_opacity", self.particle_opacity),
            ("shape_scale", self.shape_scale),
            ("connection_radius", self.connection_radius),
            ("connection_opacity", self.connection_opacity),
            ("connection_weight", self.connection_weight),
            ("reseed_area_ratio", self.reseed_area_ratio),
        ];
        for (field, value) in floats {
            if !value.is_finite() {
                return Err(invalid(field, "must be a finite number"));
            }
        }

        positive("density_divisor", self.density_divisor)?;
        positive("interaction_radius", self.interaction_radius)?;
        positive("connection_radius", self.connection_radius)?;
        positive("max_speed", self.max_speed)?;
        positive("min_size", self.min_size)?;
        non_negative("compact_width", self.compact_width)?;
        non_negative("pointer_strength", self.pointer_strength)?;
        non_negative("pulse_gain", self.pulse_gain)?;
        non_negative("press_pulse", self.press_pulse)?;
        non_negative("drift_speed", self.drift_speed)?;
        non_negative("pointer_spawn_jitter", self.pointer_spawn_jitter)?;
        non_negative("initial_speed", self.initial_speed)?;
        non_negative("glitch_distance", self.glitch_distance)?;
        non_negative("shape_scale", self.shape_scale)?;
        non_negative("connection_weight", self.connection_weight)?;
        non_negative("reseed_area_ratio", self.reseed_area_ratio)?;
        unit_interval("compact_density_scale", self.compact_density_scale as f64)?;
        unit_interval("pointer_spawn_probability", self.pointer_spawn_probability)?;
        unit_interval("glitch_probability", self.glitch_probability)?;
        unit_interval("glyph_probability", self.glyph_probability)?;
        unit_interval("particle_opacity", self.particle_opacity as f64)?;
        unit_interval("connection_opacity", self.connection_opacity as f64)?;

        if !(self.friction > 0.0 && self.friction <= 1.0) {
            return Err(invalid("friction", "must be in (0, 1]"));
        }
        if !(0.0..1.0).contains(&self.pulse_decay) {
            return Err(invalid("pulse_decay", "must be in [0, 1)"));
        }
        if self.min_life_frames == 0 {
            return Err(invalid("min_life_frames", "must be at least one frame"));
        }
        if self.max_life_frames < self.min_life_frames {
            return Err(invalid("max_life_frames", "must not be below min_life_frames"));
        }
        if self.max_size < self.min_size {
            return Err(invalid("max_size", "must not be below min_size"));
        }
        if let ClearMode::Fade { alpha } = self.clear {
            if !(alpha > 0.0 && alpha <= 1.0) {
                return Err(invalid("clear", "fade alpha must be in (0, 1]"));
            }
        }

        Ok(())
    }

    // Slider ranges for the tuning panel
    pub fn density_divisor_range() -> std::ops::RangeInclusive<f32> {
        2000.0..=60000.0
    }

    pub fn hard_cap_range() -> std::ops::RangeInclusive<usize> {
        0..=400
    }

    pub fn radius_range() -> std::ops::RangeInclusive<f32> {
        10.0..=250.0
    }

    pub fn max_speed_range() -> std::ops::RangeInclusive<f32> {
        0.5..=12.0
    }

    pub fn friction_range() -> std::ops::RangeInclusive<f32> {
        0.8..=1.0
    }

    pub fn probability_range() -> std::ops::RangeInclusive<f64> {
        0.0..=1.0
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid { field, reason: reason.to_string() }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, "must be a positive number"))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, "must not be negative"))
    }
}

fn unit_interval(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, "must be in [0, 1]"))
    }
}
