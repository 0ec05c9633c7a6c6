/*
 * UI Module
 *
 * This module contains the egui tuning panel. The panel edits a working copy
 * of the field settings (PanelState); the app compares it against the live
 * field after each frame and applies whatever changed.
 */

use nannou_egui::{egui, Egui};
use std::time::Duration;

use crate::config::{ClearMode, FieldConfig, PointerMode, RenderStyle};
use crate::debug::FieldStats;

pub struct PanelState {
    pub config: FieldConfig,
    pub enabled: bool,
    pub reduced_motion: bool,
}

impl PanelState {
    pub fn new(config: FieldConfig, enabled: bool, reduced_motion: bool) -> Self {
        Self { config, enabled, reduced_motion }
    }
}

pub fn update_panel(egui: &mut Egui, panel: &mut PanelState, stats: &FieldStats, fps: f32, frame_time: Duration) {
    let ctx = egui.begin_frame();

    egui::Window::new("Field Controls")
        .default_pos([10.0, 10.0])
        .show(&ctx, |ui| {
            ui.checkbox(&mut panel.enabled, "Enabled");
            ui.checkbox(&mut panel.reduced_motion, "Reduce motion");

            ui.collapsing("Density", |ui| {
                ui.add(egui::Slider::new(&mut panel.config.density_divisor, FieldConfig::density_divisor_range()).text("Area per particle"));
                ui.add(egui::Slider::new(&mut panel.config.hard_cap, FieldConfig::hard_cap_range()).text("Hard cap"));
            });

            ui.collapsing("Pointer", |ui| {
                ui.add(egui::Slider::new(&mut panel.config.interaction_radius, FieldConfig::radius_range()).text("Interaction radius"));
                ui.horizontal(|ui| {
                    ui.radio_value(&mut panel.config.pointer_mode, PointerMode::Repel, "Repel");
                    ui.radio_value(&mut panel.config.pointer_mode, PointerMode::Attract, "Attract");
                });
                ui.add(egui::Slider::new(&mut panel.config.pointer_spawn_probability, FieldConfig::probability_range()).text("Spawn at pointer"));
            });

            ui.collapsing("Motion", |ui| {
                ui.add(egui::Slider::new(&mut panel.config.max_speed, FieldConfig::max_speed_range()).text("Max speed"));
                ui.add(egui::Slider::new(&mut panel.config.friction, FieldConfig::friction_range()).text("Friction"));
                ui.add(egui::Slider::new(&mut panel.config.glitch_probability, FieldConfig::probability_range()).text("Glitch chance"));
            });

            ui.collapsing("Rendering", |ui| {
                ui.horizontal(|ui| {
                    ui.radio_value(&mut panel.config.style, RenderStyle::Glyph, "Glyphs");
                    ui.radio_value(&mut panel.config.style, RenderStyle::Shape, "Shapes");
                });

                let mut trails = matches!(panel.config.clear, ClearMode::Fade { .. });
                if ui.checkbox(&mut trails, "Trails").changed() {
                    panel.config.clear = if trails { ClearMode::Fade { alpha: 0.25 } } else { ClearMode::Full };
                }

                ui.add(egui::Slider::new(&mut panel.config.connection_radius, FieldConfig::radius_range()).text("Connection radius"));
                ui.checkbox(&mut panel.config.enable_spatial_grid, "Spatial grid for connections");
            });

            ui.separator();

            ui.label(format!("FPS: {:.1}", fps));
            ui.label(format!("Frame time: {:.2} ms", frame_time.as_secs_f64() * 1000.0));
            ui.label(format!("Particles: {} / {}", stats.particles, stats.target));
            ui.label(format!("Spawned / expired: {} / {}", stats.spawned_last_frame, stats.expired_last_frame));
            ui.label(format!("Connections: {}", stats.connections));
            ui.label(format!("Frames rendered: {}", stats.frames_rendered));
        });
}
