/*
 * Debug Information Module
 *
 * This module defines the FieldStats struct with frame metrics shown in the
 * tuning panel. The field fills these in as it runs; fps and frame time are
 * tracked by the app itself.
 */

#[derive(Clone, Debug, Default)]
pub struct FieldStats {
    pub particles: usize,
    pub target: usize,
    pub spawned_last_frame: usize,
    pub expired_last_frame: usize,
    pub connections: usize,
    pub frames_rendered: u64,
    pub stray_callbacks: u64,
    pub reseeds: u64,
}
