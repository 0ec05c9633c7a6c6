/*
 * Particle Field
 *
 * A pointer-reactive particle backdrop. Particles drift across the window,
 * scatter away from the pointer, pulse on click and link up with faint lines
 * when they pass close to each other. Pass a JSON config path as the first
 * argument to override the defaults; set PARTICLE_FIELD_REDUCED_MOTION=1 to
 * start with a single static frame.
 */

use particle_field::app;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    nannou::app(app::model).update(app::update).run();
}
