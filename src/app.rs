/*
 * Application Module
 *
 * This module defines the nannou model for the particle field backdrop. The
 * window owns a ParticleField running on a HostPlatform: window events are
 * forwarded as FieldEvents (see input.rs), update delivers the due animation
 * frame, and view replays the field's display list followed by the cursor
 * overlay and the tuning panel.
 */

use nannou::prelude::*;
use nannou_egui::Egui;
use std::time::Duration;

use crate::config::FieldConfig;
use crate::cursor::CursorOverlay;
use crate::field::ParticleField;
use crate::host::{reduced_motion_from_env, HostPlatform};
use crate::input::{focused, key_pressed, mouse_exited, mouse_moved, mouse_pressed, raw_window_event, resized, unfocused};
use crate::lifecycle::{FieldEvent, Platform};
use crate::renderer::{Canvas, WindowCanvas};
use crate::ui::{self, PanelState};
use crate::viewport::Viewport;

const FALLBACK_WINDOW_SIZE: (u32, u32) = (1280, 800);

// Main model for the application
pub struct Model {
    pub field: ParticleField<HostPlatform>,
    pub cursor: CursorOverlay,
    pub egui: Egui,
    pub panel: PanelState,
    pub show_panel: bool,
    pub fps: f32,
    pub frame_time: Duration,
}

// Initialize the model
pub fn model(app: &App) -> Model {
    // 80% of the primary monitor when one is reported
    let (window_width, window_height) = match app.primary_monitor() {
        Some(monitor) => {
            let size = monitor.size();
            ((size.width as f32 * 0.8) as u32, (size.height as f32 * 0.8) as u32)
        }
        None => FALLBACK_WINDOW_SIZE,
    };

    let window_id = app
        .new_window()
        .title("Particle Field")
        .size(window_width, window_height)
        .view(view)
        .mouse_moved(mouse_moved)
        .mouse_pressed(mouse_pressed)
        .mouse_exited(mouse_exited)
        .resized(resized)
        .focused(focused)
        .unfocused(unfocused)
        .key_pressed(key_pressed)
        .raw_event(raw_window_event)
        .build()
        .expect("failed to build the main window");

    let window = app.window(window_id).expect("main window closed during startup");
    let egui = Egui::from_window(&window);

    let config = load_config();
    let reduced_motion = reduced_motion_from_env();
    let platform = HostPlatform::new(Some(Viewport::from_rect(window.rect()))).with_reduced_motion(reduced_motion);

    let mut field = ParticleField::new(platform, config);
    field.set_enabled(true);
    let config = field.config().clone();

    Model {
        field,
        cursor: CursorOverlay::default(),
        egui,
        panel: PanelState::new(config, true, reduced_motion),
        show_panel: true,
        fps: 0.0,
        frame_time: Duration::ZERO,
    }
}

// Read the config path from the first argument, falling back to defaults
fn load_config() -> FieldConfig {
    let path = match std::env::args().nth(1) {
        Some(path) => path,
        None => return FieldConfig::default(),
    };

    match FieldConfig::load(&path) {
        Ok(config) => {
            log::info!("loaded field config from {}", path);
            config
        }
        Err(err) => {
            log::warn!("could not load config from {}: {}, using defaults", path, err);
            FieldConfig::default()
        }
    }
}

pub fn update(app: &App, model: &mut Model, update: Update) {
    model.fps = app.fps();
    model.frame_time = update.since_last;

    model.egui.set_elapsed_time(update.since_start);
    if model.show_panel {
        let stats = model.field.stats().clone();
        ui::update_panel(&mut model.egui, &mut model.panel, &stats, model.fps, model.frame_time);
        apply_panel(model);
    }

    // Deliver the frame the field asked for, if any
    if let Some(handle) = model.field.platform_mut().take_due_frame() {
        model.field.on_animation_frame(handle);
    }

    model.cursor.update(model.field.pointer().state(), model.field.is_reduced_motion());
}

// Push whatever the panel changed into the field
fn apply_panel(model: &mut Model) {
    if model.panel.config != *model.field.config() {
        if let Err(err) = model.field.set_config(model.panel.config.clone()) {
            log::warn!("rejected panel settings: {}", err);
            model.panel.config = model.field.config().clone();
        }
    }

    if model.panel.enabled != model.field.is_enabled() {
        model.field.set_enabled(model.panel.enabled);
    }

    let reduce = model.panel.reduced_motion;
    if reduce != model.field.platform().prefers_reduced_motion() {
        set_reduced_motion(model, reduce);
    }
}

// Change the host preference and notify the field the way a system signal would
pub fn set_reduced_motion(model: &mut Model, reduce: bool) {
    model.field.platform_mut().set_reduced_motion(reduce);
    model.field.handle_event(FieldEvent::ReducedMotionChanged { reduce });
    model.panel.reduced_motion = reduce;
    log::info!("reduced motion {}", if reduce { "on" } else { "off" });
}

pub fn set_enabled(model: &mut Model, enabled: bool) {
    model.field.set_enabled(enabled);
    model.panel.enabled = enabled;
}

pub fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    let mut canvas = WindowCanvas::new(&draw, app.window_rect());

    match model.field.surface() {
        Some(surface) => surface.replay(&mut canvas),
        None => {
            let config = model.field.config();
            let [r, g, b] = config.background;
            canvas.clear(rgb(r, g, b), config.clear);
        }
    }

    model.cursor.draw(&mut canvas);

    if let Err(err) = draw.to_frame(app, &frame) {
        log::warn!("failed to draw frame: {:?}", err);
    }

    if model.show_panel {
        if let Err(err) = model.egui.draw_to_frame(&frame) {
            log::warn!("failed to draw tuning panel: {:?}", err);
        }
    }
}
