/*
 * Host Platform Module
 *
 * This module provides the Platform the field runs on. The window drives it
 * from nannou's update loop: a requested frame stays pending until the next
 * update takes it and hands it to the field. Nothing else ever starts a
 * frame, so cancelling the pending handle is enough to stop the loop.
 *
 * Every request, cancellation and listener change is counted, which is what
 * the tests use to check that teardown leaves nothing behind.
 */

use std::collections::BTreeMap;

use crate::lifecycle::{FrameHandle, ListenerId, ListenerKind, Platform};
use crate::viewport::Viewport;

// Environment variable standing in for the system reduced-motion preference
pub const REDUCED_MOTION_ENV: &str = "PARTICLE_FIELD_REDUCED_MOTION";

pub fn reduced_motion_from_env() -> bool {
    match std::env::var(REDUCED_MOTION_ENV) {
        Ok(value) => matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "reduce"),
        Err(_) => false,
    }
}

#[derive(Default)]
pub struct HostPlatform {
    viewport: Option<Viewport>,
    reduced_motion: bool,
    next_id: u64,
    pending: Option<FrameHandle>,
    listeners: BTreeMap<ListenerId, ListenerKind>,
    frames_requested: usize,
    frames_cancelled: usize,
    frames_delivered: usize,
}

impl HostPlatform {
    pub fn new(viewport: Option<Viewport>) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    pub fn with_reduced_motion(mut self, reduce: bool) -> Self {
        self.reduced_motion = reduce;
        self
    }

    pub fn set_viewport(&mut self, viewport: Option<Viewport>) {
        self.viewport = viewport;
    }

    pub fn set_reduced_motion(&mut self, reduce: bool) {
        self.reduced_motion = reduce;
    }

    // Hand out the pending frame, if any. Called once per nannou update.
    pub fn take_due_frame(&mut self) -> Option<FrameHandle> {
        let handle = self.pending.take();
        if handle.is_some() {
            self.frames_delivered += 1;
        }
        handle
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_listening(&self, kind: ListenerKind) -> bool {
        self.listeners.values().any(|&k| k == kind)
    }

    pub fn frames_requested(&self) -> usize {
        self.frames_requested
    }

    pub fn frames_cancelled(&self) -> usize {
        self.frames_cancelled
    }

    pub fn frames_delivered(&self) -> usize {
        self.frames_delivered
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl Platform for HostPlatform {
    fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    fn request_animation_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_id());
        self.pending = Some(handle);
        self.frames_requested += 1;
        handle
    }

    fn cancel_animation_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
            self.frames_cancelled += 1;
        }
    }

    fn add_listener(&mut self, kind: ListenerKind) -> ListenerId {
        let id = ListenerId(self.next_id());
        self.listeners.insert(id, kind);
        id
    }

    fn remove_listener(&mut self, id: ListenerId) {
        if self.listeners.remove(&id).is_none() {
            log::debug!("listener {:?} was already detached", id);
        }
    }
}
