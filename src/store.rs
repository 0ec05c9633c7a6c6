/*
 * Particle Store Module
 *
 * This module owns the live particles and the density controller that
 * decides how many should exist. Reconciliation runs once per frame after
 * every particle has been stepped: expired particles are dropped, then new
 * ones are spawned until the target count is met. Live particles are never
 * culled to meet a lower target; they are only ever removed by expiry.
 */

use nannou::prelude::*;
use rand::Rng;

use crate::config::FieldConfig;
use crate::particle::Particle;
use crate::pointer::PointerState;
use crate::viewport::Viewport;

// How many particles the surface should hold
pub fn target_count(viewport: &Viewport, config: &FieldConfig) -> usize {
    if viewport.is_empty() || config.density_divisor <= 0.0 {
        return 0;
    }

    let mut target = (viewport.area() / config.density_divisor).floor();

    // Small surfaces (phones, narrow windows) get a thinner field
    if viewport.width < config.compact_width {
        target = (target * config.compact_density_scale).floor();
    }

    if !target.is_finite() || target <= 0.0 {
        return 0;
    }

    (target as usize).min(config.hard_cap)
}

#[derive(Default)]
pub struct ParticleStore {
    particles: Vec<Particle>,
}

impl ParticleStore {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            particles: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    // Drop expired particles, keeping the survivors in order. Returns how many were removed.
    pub fn remove_expired(&mut self) -> usize {
        let before = self.particles.len();
        self.particles.retain(Particle::is_alive);
        before - self.particles.len()
    }

    // Bring the store up to `target`. Returns how many particles were spawned.
    pub fn reconcile<R: Rng>(
        &mut self,
        target: usize,
        pointer: &PointerState,
        viewport: &Viewport,
        config: &FieldConfig,
        rng: &mut R,
    ) -> usize {
        self.remove_expired();

        let missing = target.saturating_sub(self.particles.len());
        for _ in 0..missing {
            let position = spawn_position(pointer, viewport, config, rng);
            self.particles.push(Particle::spawn(position, config, rng));
        }

        missing
    }

    // Fill an empty surface without favouring the pointer
    pub fn seed<R: Rng>(&mut self, target: usize, viewport: &Viewport, config: &FieldConfig, rng: &mut R) -> usize {
        self.particles.clear();
        self.particles.reserve(target);
        for _ in 0..target {
            let position = random_position(viewport, rng);
            self.particles.push(Particle::spawn(position, config, rng));
        }
        target
    }

    // Pull every particle back inside a resized surface
    pub fn wrap_into(&mut self, viewport: &Viewport) {
        for particle in &mut self.particles {
            particle.position = viewport.wrap(particle.position);
        }
    }
}

fn random_position<R: Rng>(viewport: &Viewport, rng: &mut R) -> Point2 {
    // Scaled unit samples keep this safe on a zero-sized surface
    viewport.wrap(pt2(rng.gen::<f32>() * viewport.width, rng.gen::<f32>() * viewport.height))
}

fn spawn_position<R: Rng>(pointer: &PointerState, viewport: &Viewport, config: &FieldConfig, rng: &mut R) -> Point2 {
    if pointer.is_active() && rng.gen_bool(config.pointer_spawn_probability) {
        let jitter = config.pointer_spawn_jitter;
        let offset = if jitter > 0.0 {
            vec2(rng.gen_range(-jitter..=jitter), rng.gen_range(-jitter..=jitter))
        } else {
            Vec2::ZERO
        };
        viewport.wrap(pointer.focus() + offset)
    } else {
        random_position(viewport, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn target_for_reference_viewport() {
        let config = FieldConfig::default();
        assert_eq!(target_count(&Viewport::new(800.0, 600.0), &config), 32);
    }

    #[test]
    fn target_is_capped() {
        let config = FieldConfig::default();
        assert_eq!(target_count(&Viewport::new(7680.0, 4320.0), &config), config.hard_cap);
    }

    #[test]
    fn zero_area_means_zero_target() {
        let config = FieldConfig::default();
        assert_eq!(target_count(&Viewport::new(0.0, 900.0), &config), 0);
        assert_eq!(target_count(&Viewport::new(1200.0, 0.0), &config), 0);
    }

    #[test]
    fn compact_surfaces_get_fewer_particles() {
        let config = FieldConfig::default();
        // 400 * 900 / 15000 = 24, halved on a compact surface
        assert_eq!(target_count(&Viewport::new(400.0, 900.0), &config), 12);
    }

    #[test]
    fn reconcile_backfills_to_target() {
        let config = FieldConfig::default();
        let viewport = Viewport::new(800.0, 600.0);
        let mut rng = StdRng::seed_from_u64(8);
        let mut store = ParticleStore::default();

        let spawned = store.reconcile(32, &PointerState::default(), &viewport, &config, &mut rng);

        assert_eq!(spawned, 32);
        assert_eq!(store.len(), 32);
        assert!(store.iter().all(|p| viewport.contains(p.position)));
    }

    #[test]
    fn reconcile_removes_expired_but_never_culls() {
        let config = FieldConfig::default();
        let viewport = Viewport::new(800.0, 600.0);
        let mut rng = StdRng::seed_from_u64(8);
        let mut store = ParticleStore::default();
        store.seed(40, &viewport, &config, &mut rng);

        store.particles_mut()[3].life = 0.0;
        store.particles_mut()[7].life = 0.0;
        let survivor = store.particles()[4].clone();

        // Target well below the live count: only the expired two go
        let spawned = store.reconcile(10, &PointerState::default(), &viewport, &config, &mut rng);

        assert_eq!(spawned, 0);
        assert_eq!(store.len(), 38);
        assert_eq!(store.particles()[3], survivor);
        assert!(store.iter().all(Particle::is_alive));
    }

    #[test]
    fn active_pointer_attracts_spawns() {
        let config = FieldConfig { pointer_spawn_probability: 1.0, pointer_spawn_jitter: 5.0, ..FieldConfig::default() };
        let viewport = Viewport::new(800.0, 600.0);
        let pointer = PointerState { x: 200.0, y: 150.0, idle: false, ..PointerState::default() };
        let mut rng = StdRng::seed_from_u64(4);
        let mut store = ParticleStore::default();

        store.reconcile(20, &pointer, &viewport, &config, &mut rng);

        for particle in store.iter() {
            assert!((particle.position.x - 200.0).abs() <= 5.0);
            assert!((particle.position.y - 150.0).abs() <= 5.0);
        }
    }

    #[test]
    fn idle_pointer_never_attracts_spawns() {
        let config = FieldConfig { pointer_spawn_probability: 1.0, ..FieldConfig::default() };
        let viewport = Viewport::new(800.0, 600.0);
        let pointer = PointerState { drift: pt2(400.0, 300.0), ..PointerState::default() };
        let mut rng = StdRng::seed_from_u64(4);
        let mut store = ParticleStore::default();

        store.reconcile(30, &pointer, &viewport, &config, &mut rng);

        let clustered = store.iter().filter(|p| p.position.distance(pt2(400.0, 300.0)) < 15.0).count();
        assert!(clustered < 5);
    }

    #[test]
    fn wrap_into_pulls_particles_inside() {
        let config = FieldConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut store = ParticleStore::default();
        store.seed(30, &Viewport::new(1600.0, 1200.0), &config, &mut rng);

        let smaller = Viewport::new(1500.0, 1100.0);
        store.wrap_into(&smaller);
        assert!(store.iter().all(|p| smaller.contains(p.position)));
    }
}
