/*
 * Particle Field Module
 *
 * This module defines the ParticleField engine. It owns the pointer tracker,
 * the particle store, the drawing surface and the lifecycle bookkeeping, and
 * runs one frame every time its host delivers the animation-frame handle it
 * asked for:
 * 1. Step every particle against the pointer
 * 2. Reconcile the store toward the density target
 * 3. Render into the display list
 * 4. Decay the pointer pulse
 * 5. Request the next frame
 *
 * The field attaches to its host when enabled and detaches completely when
 * disabled or dropped. With reduced motion it renders a single static frame
 * and never schedules another one.
 */

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{ConfigError, FieldConfig};
use crate::debug::FieldStats;
use crate::lifecycle::{FieldEvent, FrameHandle, Lifecycle, ListenerKind, Platform};
use crate::motion;
use crate::pointer::PointerTracker;
use crate::renderer::{render_frame, DisplayList};
use crate::spatial_grid::SpatialGrid;
use crate::store::{target_count, ParticleStore};
use crate::viewport::Viewport;

// Listeners that only matter while the field is animating
const MOTION_LISTENERS: [ListenerKind; 5] = [
    ListenerKind::Resize,
    ListenerKind::PointerMove,
    ListenerKind::PointerDown,
    ListenerKind::PointerLeave,
    ListenerKind::VisibilityChange,
];

// Kept while reduced motion is active so the field can resume
const PREFERENCE_LISTENERS: [ListenerKind; 1] = [ListenerKind::ReducedMotionChange];

pub struct ParticleField<P: Platform> {
    platform: P,
    config: FieldConfig,
    lifecycle: Lifecycle,
    pointer: PointerTracker,
    store: ParticleStore,
    grid: Option<SpatialGrid>,
    viewport: Viewport,
    surface: Option<DisplayList>,
    rng: StdRng,
    enabled: bool,
    reduced_motion: bool,
    visible: bool,
    stats: FieldStats,
}

impl<P: Platform> ParticleField<P> {
    // An invalid config falls back to the defaults, keeping the seed
    pub fn new(platform: P, config: FieldConfig) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(err) => {
                log::warn!("invalid field config ({}), using defaults", err);
                FieldConfig { seed: config.seed, ..FieldConfig::default() }
            }
        };

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            platform,
            pointer: PointerTracker::new(&config),
            store: ParticleStore::with_capacity(config.hard_cap),
            config,
            lifecycle: Lifecycle::default(),
            grid: None,
            viewport: Viewport::new(0.0, 0.0),
            surface: None,
            rng,
            enabled: false,
            reduced_motion: false,
            visible: true,
            stats: FieldStats::default(),
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn pointer(&self) -> &PointerTracker {
        &self.pointer
    }

    pub fn store(&self) -> &ParticleStore {
        &self.store
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn stats(&self) -> &FieldStats {
        &self.stats
    }

    // The last rendered frame, None while unmounted
    pub fn surface(&self) -> Option<&DisplayList> {
        self.surface.as_ref()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_mounted(&self) -> bool {
        self.lifecycle.is_alive()
    }

    pub fn is_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    // True while a next frame is pending
    pub fn is_running(&self) -> bool {
        self.lifecycle.is_alive() && self.lifecycle.pending_frame().is_some()
    }

    pub fn listener_count(&self) -> usize {
        self.lifecycle.listener_count()
    }

    pub fn target_count(&self) -> usize {
        target_count(&self.viewport, &self.config)
    }

    // Attach on false -> true, detach everything on true -> false
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled == self.enabled {
            return;
        }
        self.enabled = enabled;

        if enabled {
            self.mount();
        } else {
            self.teardown();
        }
    }

    // Swap in new tuning values. Invalid values are rejected and the old ones kept.
    pub fn set_config(&mut self, config: FieldConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.pointer.reconfigure(&config);
        self.config = config;
        self.stats.target = self.target_count();

        // A lowered cap is the one case where the live set may not wait for expiry
        if self.store.len() > self.config.hard_cap {
            self.reseed();
        }

        // No frame loop is running to pick the change up
        if self.reduced_motion && self.is_mounted() {
            self.render();
        }
        Ok(())
    }

    fn mount(&mut self) {
        let viewport = match self.platform.viewport() {
            Some(viewport) => viewport,
            None => {
                log::debug!("no drawing surface available, particle field not started");
                // Release anything a previous attempt may have left attached
                self.teardown();
                return;
            }
        };

        self.lifecycle.set_alive(true);
        self.surface = Some(DisplayList::default());
        self.viewport = viewport;
        self.visible = true;
        self.pointer.reset();
        self.pointer.settle(&viewport);
        self.reseed();

        self.lifecycle.attach(&mut self.platform, &PREFERENCE_LISTENERS);
        self.reduced_motion = self.platform.prefers_reduced_motion();

        log::info!(
            "particle field mounted on {}x{} surface, target {} particles{}",
            viewport.width,
            viewport.height,
            self.stats.target,
            if self.reduced_motion { " (reduced motion)" } else { "" }
        );

        if self.reduced_motion {
            self.enter_static();
        } else {
            self.start_motion();
        }
    }

    // Cancel the frame, detach every listener, release the surface. Safe to call repeatedly.
    pub fn teardown(&mut self) {
        let was_alive = self.lifecycle.is_alive();

        self.lifecycle.cancel(&mut self.platform);
        self.lifecycle.detach_all(&mut self.platform);
        self.lifecycle.set_alive(false);

        self.surface = None;
        self.grid = None;
        self.store.clear();
        self.pointer.reset();
        self.stats.particles = 0;

        if was_alive {
            log::info!("particle field torn down");
        }
    }

    fn start_motion(&mut self) {
        self.lifecycle.attach(&mut self.platform, &MOTION_LISTENERS);
        if self.visible {
            self.lifecycle.schedule(&mut self.platform);
        }
    }

    fn enter_static(&mut self) {
        self.lifecycle.cancel(&mut self.platform);
        self.lifecycle.detach_except(&mut self.platform, &PREFERENCE_LISTENERS);
        self.render();
        log::debug!("reduced motion active, rendered one static frame");
    }

    pub fn handle_event(&mut self, event: FieldEvent) {
        if !self.lifecycle.is_listening(event.listener()) {
            return;
        }

        match event {
            FieldEvent::PointerMoved { x, y } => self.pointer.on_move(x, y),
            FieldEvent::PointerPressed => self.pointer.on_press(),
            FieldEvent::PointerLeft => self.pointer.on_leave(),
            FieldEvent::Resized { width, height } => self.resize(Viewport::new(width, height)),
            FieldEvent::VisibilityChanged { visible } => {
                self.visible = visible;
                if visible {
                    self.lifecycle.schedule(&mut self.platform);
                } else {
                    self.lifecycle.cancel(&mut self.platform);
                }
            }
            FieldEvent::ReducedMotionChanged { reduce } => {
                if reduce == self.reduced_motion {
                    return;
                }
                self.reduced_motion = reduce;

                if reduce {
                    self.enter_static();
                } else {
                    // Visibility and resize events were not delivered while static
                    self.visible = true;
                    if let Some(viewport) = self.platform.viewport() {
                        self.resize(viewport);
                    }
                    self.start_motion();
                    log::debug!("reduced motion cleared, animation resumed");
                }
            }
        }
    }

    fn resize(&mut self, viewport: Viewport) {
        let old_area = self.viewport.area();
        self.viewport = viewport;

        let changed = if old_area > 0.0 {
            (viewport.area() - old_area).abs() / old_area
        } else {
            f32::INFINITY
        };

        if changed > self.config.reseed_area_ratio {
            self.reseed();
        } else {
            self.store.wrap_into(&viewport);
            self.stats.target = self.target_count();
        }

        self.pointer.settle(&viewport);
        log::debug!("surface resized to {}x{}", viewport.width, viewport.height);
    }

    fn reseed(&mut self) {
        let target = self.target_count();
        self.store.seed(target, &self.viewport, &self.config, &mut self.rng);
        self.grid = None;
        self.stats.target = target;
        self.stats.particles = self.store.len();
        self.stats.reseeds += 1;
    }

    // Run one frame for a delivered handle. Returns false when the callback was ignored.
    pub fn on_animation_frame(&mut self, handle: FrameHandle) -> bool {
        if !self.lifecycle.begin_frame(handle) {
            self.stats.stray_callbacks += 1;
            return false;
        }

        if self.reduced_motion || !self.visible {
            return false;
        }

        motion::step_all(
            self.store.particles_mut(),
            self.pointer.state(),
            &self.viewport,
            &self.config,
            &mut self.rng,
        );

        let target = self.target_count();
        let expired = self.store.remove_expired();
        let spawned = self.store.reconcile(target, self.pointer.state(), &self.viewport, &self.config, &mut self.rng);

        self.stats.target = target;
        self.stats.expired_last_frame = expired;
        self.stats.spawned_last_frame = spawned;

        self.render();
        self.pointer.tick(&self.viewport);
        self.lifecycle.schedule(&mut self.platform);

        true
    }

    fn render(&mut self) {
        if self.config.enable_spatial_grid {
            let fits = self
                .grid
                .as_ref()
                .map_or(false, |grid| grid.matches(self.config.connection_radius, &self.viewport));
            if !fits {
                self.grid = Some(SpatialGrid::new(self.config.connection_radius, &self.viewport));
            }
        } else {
            self.grid = None;
        }

        if let Some(surface) = self.surface.as_mut() {
            surface.reset();
            let connections = render_frame(surface, self.store.particles(), &self.config, self.grid.as_mut());

            self.stats.connections = connections;
            self.stats.particles = self.store.len();
            self.stats.frames_rendered += 1;
        }
    }
}

impl<P: Platform> Drop for ParticleField<P> {
    fn drop(&mut self) {
        self.teardown();
    }
}
