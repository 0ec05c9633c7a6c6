/*
 * Lifecycle Module
 *
 * This module defines the seam between the particle field and whatever hosts
 * it (the nannou window, or a test harness), plus the bookkeeping that makes
 * teardown complete:
 * - the pending animation-frame handle
 * - every attached listener
 * - the liveness flag checked at the top of each frame
 */

use crate::viewport::Viewport;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    Resize,
    PointerMove,
    PointerDown,
    PointerLeave,
    VisibilityChange,
    ReducedMotionChange,
}

impl ListenerKind {
    pub const ALL: [ListenerKind; 6] = [
        ListenerKind::Resize,
        ListenerKind::PointerMove,
        ListenerKind::PointerDown,
        ListenerKind::PointerLeave,
        ListenerKind::VisibilityChange,
        ListenerKind::ReducedMotionChange,
    ];
}

// Events the field reacts to, in surface coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldEvent {
    PointerMoved { x: f32, y: f32 },
    PointerPressed,
    PointerLeft,
    Resized { width: f32, height: f32 },
    VisibilityChanged { visible: bool },
    ReducedMotionChanged { reduce: bool },
}

impl FieldEvent {
    // The listener that has to be attached for this event to be delivered
    pub fn listener(&self) -> ListenerKind {
        match self {
            FieldEvent::PointerMoved { .. } => ListenerKind::PointerMove,
            FieldEvent::PointerPressed => ListenerKind::PointerDown,
            FieldEvent::PointerLeft => ListenerKind::PointerLeave,
            FieldEvent::Resized { .. } => ListenerKind::Resize,
            FieldEvent::VisibilityChanged { .. } => ListenerKind::VisibilityChange,
            FieldEvent::ReducedMotionChanged { .. } => ListenerKind::ReducedMotionChange,
        }
    }
}

// What the field needs from its host
pub trait Platform {
    // Size of the drawing surface, or None when no surface can be acquired
    fn viewport(&self) -> Option<Viewport>;
    fn prefers_reduced_motion(&self) -> bool;
    fn request_animation_frame(&mut self) -> FrameHandle;
    fn cancel_animation_frame(&mut self, handle: FrameHandle);
    fn add_listener(&mut self, kind: ListenerKind) -> ListenerId;
    fn remove_listener(&mut self, id: ListenerId);
}

#[derive(Default)]
pub struct Lifecycle {
    alive: bool,
    pending: Option<FrameHandle>,
    listeners: Vec<(ListenerKind, ListenerId)>,
}

impl Lifecycle {
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn set_alive(&mut self, alive: bool) {
        self.alive = alive;
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn is_listening(&self, kind: ListenerKind) -> bool {
        self.listeners.iter().any(|&(k, _)| k == kind)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn attach<P: Platform + ?Sized>(&mut self, platform: &mut P, kinds: &[ListenerKind]) {
        for &kind in kinds {
            if !self.is_listening(kind) {
                let id = platform.add_listener(kind);
                self.listeners.push((kind, id));
            }
        }
    }

    // Detach every listener except the kinds in `keep`
    pub fn detach_except<P: Platform + ?Sized>(&mut self, platform: &mut P, keep: &[ListenerKind]) {
        self.listeners.retain(|&(kind, id)| {
            if keep.contains(&kind) {
                true
            } else {
                platform.remove_listener(id);
                false
            }
        });
    }

    pub fn detach_all<P: Platform + ?Sized>(&mut self, platform: &mut P) {
        self.detach_except(platform, &[]);
    }

    // Request the next frame unless one is already pending
    pub fn schedule<P: Platform + ?Sized>(&mut self, platform: &mut P) {
        if self.alive && self.pending.is_none() {
            self.pending = Some(platform.request_animation_frame());
        }
    }

    pub fn cancel<P: Platform + ?Sized>(&mut self, platform: &mut P) {
        if let Some(handle) = self.pending.take() {
            platform.cancel_animation_frame(handle);
        }
    }

    // Accept a delivered frame. Stray or stale callbacks are refused.
    pub fn begin_frame(&mut self, handle: FrameHandle) -> bool {
        if !self.alive || self.pending != Some(handle) {
            return false;
        }
        self.pending = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HostPlatform;

    #[test]
    fn attach_is_idempotent_per_kind() {
        let mut platform = HostPlatform::new(None);
        let mut lifecycle = Lifecycle::default();

        lifecycle.attach(&mut platform, &ListenerKind::ALL);
        lifecycle.attach(&mut platform, &[ListenerKind::Resize]);

        assert_eq!(lifecycle.listener_count(), 6);
        assert_eq!(platform.listener_count(), 6);
    }

    #[test]
    fn detach_except_keeps_named_kinds() {
        let mut platform = HostPlatform::new(None);
        let mut lifecycle = Lifecycle::default();
        lifecycle.attach(&mut platform, &ListenerKind::ALL);

        lifecycle.detach_except(&mut platform, &[ListenerKind::ReducedMotionChange]);

        assert_eq!(platform.listener_count(), 1);
        assert!(lifecycle.is_listening(ListenerKind::ReducedMotionChange));
        assert!(!lifecycle.is_listening(ListenerKind::PointerMove));
    }

    #[test]
    fn schedule_requires_liveness_and_dedupes() {
        let mut platform = HostPlatform::new(None);
        let mut lifecycle = Lifecycle::default();

        lifecycle.schedule(&mut platform);
        assert_eq!(platform.frames_requested(), 0);

        lifecycle.set_alive(true);
        lifecycle.schedule(&mut platform);
        lifecycle.schedule(&mut platform);
        assert_eq!(platform.frames_requested(), 1);
    }

    #[test]
    fn stale_handles_are_refused() {
        let mut platform = HostPlatform::new(None);
        let mut lifecycle = Lifecycle::default();
        lifecycle.set_alive(true);
        lifecycle.schedule(&mut platform);
        let handle = lifecycle.pending_frame().unwrap();

        assert!(!lifecycle.begin_frame(FrameHandle(handle.0 + 100)));
        assert!(lifecycle.begin_frame(handle));
        // Already consumed
        assert!(!lifecycle.begin_frame(handle));
    }

    #[test]
    fn dead_lifecycle_refuses_frames() {
        let mut platform = HostPlatform::new(None);
        let mut lifecycle = Lifecycle::default();
        lifecycle.set_alive(true);
        lifecycle.schedule(&mut platform);
        let handle = lifecycle.pending_frame().unwrap();

        lifecycle.set_alive(false);
        assert!(!lifecycle.begin_frame(handle));
    }

    #[test]
    fn every_event_maps_to_a_listener() {
        let kinds: Vec<ListenerKind> = [
            FieldEvent::PointerMoved { x: 0.0, y: 0.0 },
            FieldEvent::PointerPressed,
            FieldEvent::PointerLeft,
            FieldEvent::Resized { width: 1.0, height: 1.0 },
            FieldEvent::VisibilityChanged { visible: true },
            FieldEvent::ReducedMotionChanged { reduce: false },
        ]
        .iter()
        .map(FieldEvent::listener)
        .collect();

        assert_eq!(kinds, ListenerKind::ALL.to_vec());
    }
}
