/*
 * Input Module
 *
 * This module contains the window event handlers. Each one translates a
 * nannou window event into the matching FieldEvent; the field drops events
 * whose listener is not attached, so the handlers forward unconditionally.
 *
 * Keys:
 * - M: toggle reduced motion
 * - E: enable / disable the field
 * - S: switch between glyph and shape rendering
 * - H: show / hide the tuning panel
 * - Space: pulse as if clicked
 */

use nannou::prelude::*;

use crate::app::{set_enabled, set_reduced_motion, Model};
use crate::config::RenderStyle;
use crate::lifecycle::{FieldEvent, Platform};
use crate::viewport::Viewport;

pub fn mouse_moved(app: &App, model: &mut Model, pos: Point2) {
    let surface = Viewport::to_surface(pos, app.window_rect());
    model.field.handle_event(FieldEvent::PointerMoved { x: surface.x, y: surface.y });
}

pub fn mouse_pressed(_app: &App, model: &mut Model, button: MouseButton) {
    // Clicks on the panel belong to egui
    if button == MouseButton::Left && !model.egui.ctx().is_pointer_over_area() {
        model.field.handle_event(FieldEvent::PointerPressed);
    }
}

pub fn mouse_exited(_app: &App, model: &mut Model) {
    model.field.handle_event(FieldEvent::PointerLeft);
}

pub fn resized(_app: &App, model: &mut Model, size: Vec2) {
    let viewport = Viewport::new(size.x, size.y);

    // The host is measured even while the field is detached, so a later mount sees the right size
    model.field.platform_mut().set_viewport(Some(viewport));
    model.field.handle_event(FieldEvent::Resized { width: viewport.width, height: viewport.height });
}

pub fn focused(_app: &App, model: &mut Model) {
    model.field.handle_event(FieldEvent::VisibilityChanged { visible: true });
}

pub fn unfocused(_app: &App, model: &mut Model) {
    model.field.handle_event(FieldEvent::VisibilityChanged { visible: false });
}

pub fn key_pressed(_app: &App, model: &mut Model, key: Key) {
    // Typing into a panel widget
    if model.egui.ctx().wants_keyboard_input() {
        return;
    }

    match key {
        Key::M => {
            let reduce = !model.field.platform().prefers_reduced_motion();
            set_reduced_motion(model, reduce);
        }
        Key::E => {
            let enabled = !model.field.is_enabled();
            set_enabled(model, enabled);
        }
        Key::S => {
            let mut config = model.field.config().clone();
            config.style = match config.style {
                RenderStyle::Glyph => RenderStyle::Shape,
                RenderStyle::Shape => RenderStyle::Glyph,
            };
            model.panel.config.style = config.style;
            if let Err(err) = model.field.set_config(config) {
                log::warn!("could not switch render style: {}", err);
            }
        }
        Key::H => model.show_panel = !model.show_panel,
        Key::Space => model.field.handle_event(FieldEvent::PointerPressed),
        _ => {}
    }
}

// Handle raw window events for egui
pub fn raw_window_event(_app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    model.egui.handle_raw_event(event);
}
