/*
 * Particle Field - Module Definitions
 *
 * This file defines the module structure for the particle field backdrop.
 * The engine (field, store, motion, renderer, lifecycle) runs against the
 * Platform trait and has no window of its own; app, input and ui wire it
 * into a nannou window.
 */

// Re-export key components for easier access
pub use config::{ConfigError, FieldConfig};
pub use field::ParticleField;
pub use host::HostPlatform;
pub use lifecycle::{FieldEvent, FrameHandle, ListenerKind, Platform};
pub use particle::Particle;
pub use pointer::{PointerState, PointerTracker};
pub use renderer::{Canvas, DisplayList, DrawCommand};
pub use spatial_grid::SpatialGrid;
pub use viewport::Viewport;
pub use app::Model;

// Define modules
pub mod viewport;
pub mod config;
pub mod pointer;
pub mod particle;
pub mod motion;
pub mod store;
pub mod spatial_grid;
pub mod renderer;
pub mod lifecycle;
pub mod host;
pub mod field;
pub mod cursor;
pub mod debug;
pub mod ui;
pub mod input;
pub mod app;
