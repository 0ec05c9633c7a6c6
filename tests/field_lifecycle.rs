/*
 * Field Lifecycle Tests
 *
 * Drive a ParticleField through the HostPlatform the way the window does and
 * check what it leaves behind on the host: pending frames, attached
 * listeners, and the frames it rendered.
 */

use particle_field::{FieldConfig, FieldEvent, FrameHandle, HostPlatform, ListenerKind, ParticleField, Viewport};

fn config() -> FieldConfig {
    FieldConfig { seed: Some(42), ..FieldConfig::default() }
}

fn mounted(width: f32, height: f32) -> ParticleField<HostPlatform> {
    let mut field = ParticleField::new(HostPlatform::new(Some(Viewport::new(width, height))), config());
    field.set_enabled(true);
    field
}

// Deliver up to `frames` due frames, returning how many ran
fn pump(field: &mut ParticleField<HostPlatform>, frames: usize) -> usize {
    let mut ran = 0;
    for _ in 0..frames {
        if let Some(handle) = field.platform_mut().take_due_frame() {
            if field.on_animation_frame(handle) {
                ran += 1;
            }
        }
    }
    ran
}

#[test]
fn teardown_leaves_nothing_on_the_host() {
    let mut field = mounted(800.0, 600.0);
    pump(&mut field, 10);

    let stale = field.platform().pending_frame().expect("a frame should be pending while running");
    field.set_enabled(false);

    assert_eq!(field.platform().pending_frame(), None);
    assert_eq!(field.platform().listener_count(), 0);
    assert!(field.surface().is_none());

    // A callback that was already in flight does nothing
    assert!(!field.on_animation_frame(stale));
    assert_eq!(field.platform().frames_requested(), 11);
    assert_eq!(field.platform().pending_frame(), None);
}

#[test]
fn stray_handles_are_ignored_while_running() {
    let mut field = mounted(800.0, 600.0);
    let rendered = field.stats().frames_rendered;

    assert!(!field.on_animation_frame(FrameHandle(9999)));
    assert_eq!(field.stats().frames_rendered, rendered);
    assert_eq!(field.stats().stray_callbacks, 1);
    assert!(field.is_running());
}

#[test]
fn repeated_mount_cycles_do_not_leak() {
    let mut field = ParticleField::new(HostPlatform::new(Some(Viewport::new(1024.0, 768.0))), config());

    for _ in 0..50 {
        field.set_enabled(true);
        pump(&mut field, 2);
        field.set_enabled(false);
    }

    let host = field.platform();
    assert_eq!(host.listener_count(), 0);
    assert_eq!(host.pending_frame(), None);
    assert_eq!(host.frames_requested(), host.frames_delivered() + host.frames_cancelled());
}

#[test]
fn reduced_motion_renders_one_static_frame() {
    let platform = HostPlatform::new(Some(Viewport::new(800.0, 600.0))).with_reduced_motion(true);
    let mut field = ParticleField::new(platform, config());
    field.set_enabled(true);

    assert!(field.is_reduced_motion());
    assert_eq!(field.stats().frames_rendered, 1);
    assert_eq!(field.platform().frames_requested(), 0);
    assert_eq!(pump(&mut field, 10), 0);

    // Only the preference listener stays attached
    assert_eq!(field.platform().listener_count(), 1);
    assert!(field.platform().is_listening(ListenerKind::ReducedMotionChange));

    // Pointer input is no longer delivered
    field.handle_event(FieldEvent::PointerMoved { x: 10.0, y: 10.0 });
    assert!(field.pointer().state().idle);
}

#[test]
fn clearing_reduced_motion_resumes_animation() {
    let platform = HostPlatform::new(Some(Viewport::new(800.0, 600.0))).with_reduced_motion(true);
    let mut field = ParticleField::new(platform, config());
    field.set_enabled(true);

    field.platform_mut().set_reduced_motion(false);
    field.handle_event(FieldEvent::ReducedMotionChanged { reduce: false });

    assert!(field.is_running());
    assert_eq!(field.platform().listener_count(), ListenerKind::ALL.len());
    assert_eq!(pump(&mut field, 5), 5);

    // And back again
    field.platform_mut().set_reduced_motion(true);
    field.handle_event(FieldEvent::ReducedMotionChanged { reduce: true });
    assert!(!field.is_running());
    assert_eq!(field.platform().pending_frame(), None);
}

#[test]
fn focus_regained_while_static_still_resumes() {
    let mut field = mounted(800.0, 600.0);

    field.handle_event(FieldEvent::VisibilityChanged { visible: false });
    field.platform_mut().set_reduced_motion(true);
    field.handle_event(FieldEvent::ReducedMotionChanged { reduce: true });

    // Not listening for visibility while static, so this one is dropped
    field.handle_event(FieldEvent::VisibilityChanged { visible: true });

    field.platform_mut().set_reduced_motion(false);
    field.handle_event(FieldEvent::ReducedMotionChanged { reduce: false });

    assert!(field.is_running());
    assert_eq!(pump(&mut field, 10), 10);
}

#[test]
fn steady_state_matches_density_target() {
    let mut field = mounted(800.0, 600.0);
    assert_eq!(field.target_count(), 32);

    for _ in 0..600 {
        pump(&mut field, 1);
        assert_eq!(field.store().len(), 32);
    }
}

#[test]
fn count_never_exceeds_hard_cap() {
    let mut field = mounted(3840.0, 2160.0);
    let cap = field.config().hard_cap;

    field.handle_event(FieldEvent::PointerMoved { x: 1900.0, y: 1000.0 });
    for frame in 0..300 {
        if frame % 20 == 0 {
            field.handle_event(FieldEvent::PointerPressed);
        }
        pump(&mut field, 1);
        assert!(field.store().len() <= cap);
    }
    assert_eq!(field.store().len(), cap);
}

#[test]
fn particles_stay_in_bounds_with_valid_life() {
    let mut field = mounted(640.0, 480.0);
    field.handle_event(FieldEvent::PointerMoved { x: 320.0, y: 240.0 });

    for frame in 0..400 {
        if frame % 30 == 0 {
            field.handle_event(FieldEvent::PointerPressed);
        }
        pump(&mut field, 1);

        let viewport = field.viewport();
        for particle in field.store().iter() {
            assert!(viewport.contains(particle.position), "escaped: {:?}", particle.position);
            assert!(particle.life > 0.0 && particle.life <= 1.0);
            assert!(particle.size > 0.0);
        }
    }
}

#[test]
fn same_seed_renders_the_same_frames() {
    let mut first = mounted(800.0, 600.0);
    let mut second = mounted(800.0, 600.0);

    for field in [&mut first, &mut second] {
        field.handle_event(FieldEvent::PointerMoved { x: 400.0, y: 300.0 });
        field.handle_event(FieldEvent::PointerPressed);
    }

    for _ in 0..60 {
        pump(&mut first, 1);
        pump(&mut second, 1);
        assert_eq!(first.surface().unwrap().commands(), second.surface().unwrap().commands());
    }
}

#[test]
fn unavailable_surface_can_mount_later() {
    let mut field = ParticleField::new(HostPlatform::new(None), config());
    field.set_enabled(true);
    assert!(!field.is_mounted());

    // Retry by toggling once the host can measure a surface
    field.platform_mut().set_viewport(Some(Viewport::new(800.0, 600.0)));
    field.set_enabled(false);
    field.set_enabled(true);

    assert!(field.is_mounted());
    assert_eq!(field.store().len(), 32);
    assert_eq!(pump(&mut field, 3), 3);
}
