/*
 * Renderer Module
 *
 * This module handles drawing the particle field.
 * The engine renders into a DisplayList, a recorded surface that the window
 * replays every time nannou asks for a view. Each frame:
 * 1. Clear the surface (or fade it, when a trail is wanted)
 * 2. Draw proximity connections between nearby particles
 * 3. Draw the particles as glyphs or shapes, faded by their remaining life
 *
 * The connection pass compares every pair of particles. The density hard cap
 * keeps that cheap; the spatial grid is an optional shortcut giving the same
 * pairs.
 */

use nannou::prelude::*;

use crate::config::{ClearMode, FieldConfig, RenderStyle};
use crate::particle::Particle;
use crate::spatial_grid::SpatialGrid;
use crate::viewport::Viewport;

// Anything that can receive the field's drawing calls, in surface space
pub trait Canvas {
    fn clear(&mut self, color: Rgb<u8>, mode: ClearMode);
    fn line(&mut self, from: Point2, to: Point2, weight: f32, color: Rgb<u8>, alpha: f32);
    fn circle(&mut self, center: Point2, radius: f32, color: Rgb<u8>, alpha: f32);
    fn glyph(&mut self, glyph: char, center: Point2, size: f32, color: Rgb<u8>, alpha: f32);
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear { color: Rgb<u8>, mode: ClearMode },
    Line { from: Point2, to: Point2, weight: f32, color: Rgb<u8>, alpha: f32 },
    Circle { center: Point2, radius: f32, color: Rgb<u8>, alpha: f32 },
    Glyph { glyph: char, center: Point2, size: f32, color: Rgb<u8>, alpha: f32 },
}

impl DrawCommand {
    pub fn apply<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        match *self {
            DrawCommand::Clear { color, mode } => canvas.clear(color, mode),
            DrawCommand::Line { from, to, weight, color, alpha } => canvas.line(from, to, weight, color, alpha),
            DrawCommand::Circle { center, radius, color, alpha } => canvas.circle(center, radius, color, alpha),
            DrawCommand::Glyph { glyph, center, size, color, alpha } => canvas.glyph(glyph, center, size, color, alpha),
        }
    }
}

// The engine's drawing surface: the commands of the last rendered frame
#[derive(Clone, Debug, Default)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn reset(&mut self) {
        self.commands.clear();
    }

    pub fn replay<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        for command in &self.commands {
            command.apply(canvas);
        }
    }

    pub fn count_lines(&self) -> usize {
        self.commands.iter().filter(|c| matches!(c, DrawCommand::Line { .. })).count()
    }
}

impl Canvas for DisplayList {
    fn clear(&mut self, color: Rgb<u8>, mode: ClearMode) {
        self.commands.push(DrawCommand::Clear { color, mode });
    }

    fn line(&mut self, from: Point2, to: Point2, weight: f32, color: Rgb<u8>, alpha: f32) {
        self.commands.push(DrawCommand::Line { from, to, weight, color, alpha });
    }

    fn circle(&mut self, center: Point2, radius: f32, color: Rgb<u8>, alpha: f32) {
        self.commands.push(DrawCommand::Circle { center, radius, color, alpha });
    }

    fn glyph(&mut self, glyph: char, center: Point2, size: f32, color: Rgb<u8>, alpha: f32) {
        self.commands.push(DrawCommand::Glyph { glyph, center, size, color, alpha });
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Connection {
    pub a: usize,
    pub b: usize,
    pub distance: f32,
}

// Every unordered pair closer than `radius`, brute force
pub fn find_connections(particles: &[Particle], radius: f32) -> Vec<Connection> {
    let radius_squared = radius * radius;
    let mut connections = Vec::new();

    for a in 0..particles.len() {
        for b in (a + 1)..particles.len() {
            let distance_squared = particles[a].position.distance_squared(particles[b].position);
            if distance_squared < radius_squared {
                connections.push(Connection { a, b, distance: distance_squared.sqrt() });
            }
        }
    }

    connections
}

// Same pairs as `find_connections`, found through the grid
pub fn find_connections_with_grid(particles: &[Particle], radius: f32, grid: &mut SpatialGrid) -> Vec<Connection> {
    let positions: Vec<Point2> = particles.iter().map(|p| p.position).collect();
    grid.rebuild(positions.iter().cloned());

    let mut connections = Vec::new();
    grid.for_each_pair_within(&positions, radius, |a, b, distance| {
        connections.push(Connection { a, b, distance });
    });

    // Match the brute-force ordering
    connections.sort_by(|x, y| (x.a, x.b).cmp(&(y.a, y.b)));
    connections
}

pub fn connection_alpha(connection: &Connection, particles: &[Particle], config: &FieldConfig) -> f32 {
    let closeness = 1.0 - connection.distance / config.connection_radius;
    closeness * particles[connection.a].life * particles[connection.b].life * config.connection_opacity
}

// Draw one frame of the field. Returns the number of connections drawn.
pub fn render_frame<C: Canvas + ?Sized>(
    canvas: &mut C,
    particles: &[Particle],
    config: &FieldConfig,
    grid: Option<&mut SpatialGrid>,
) -> usize {
    let background = rgb(config.background[0], config.background[1], config.background[2]);
    canvas.clear(background, config.clear);

    let connections = match grid {
        Some(grid) => find_connections_with_grid(particles, config.connection_radius, grid),
        None => find_connections(particles, config.connection_radius),
    };

    for connection in &connections {
        let alpha = connection_alpha(connection, particles, config);
        if alpha <= 0.0 {
            continue;
        }
        let from = &particles[connection.a];
        let to = &particles[connection.b];
        canvas.line(from.position, to.position, config.connection_weight, from.color, alpha);
    }

    for particle in particles {
        let alpha = particle.life * config.particle_opacity;

        match (config.style, particle.glyph) {
            (RenderStyle::Glyph, Some(glyph)) => {
                canvas.glyph(glyph, particle.position, particle.size, particle.color, alpha);
            }
            _ => {
                canvas.circle(particle.position, particle.size * config.shape_scale, particle.color, alpha);
            }
        }
    }

    connections.len()
}

// Canvas drawing straight into a nannou Draw, converting surface to window space
pub struct WindowCanvas<'a> {
    draw: &'a Draw,
    window_rect: Rect,
}

impl<'a> WindowCanvas<'a> {
    pub fn new(draw: &'a Draw, window_rect: Rect) -> Self {
        Self { draw, window_rect }
    }

    #[inline]
    fn to_window(&self, point: Point2) -> Point2 {
        Viewport::to_window(point, self.window_rect)
    }
}

#[inline]
fn with_alpha(color: Rgb<u8>, alpha: f32) -> Rgba {
    rgba(
        color.red as f32 / 255.0,
        color.green as f32 / 255.0,
        color.blue as f32 / 255.0,
        alpha.clamp(0.0, 1.0),
    )
}

impl<'a> Canvas for WindowCanvas<'a> {
    fn clear(&mut self, color: Rgb<u8>, mode: ClearMode) {
        match mode {
            ClearMode::Full => {
                self.draw.background().color(with_alpha(color, 1.0));
            }
            ClearMode::Fade { alpha } => {
                // The previous frame stays in the window texture, dim it
                self.draw
                    .rect()
                    .xy(self.window_rect.xy())
                    .wh(self.window_rect.wh())
                    .color(with_alpha(color, alpha));
            }
        }
    }

    fn line(&mut self, from: Point2, to: Point2, weight: f32, color: Rgb<u8>, alpha: f32) {
        self.draw
            .line()
            .start(self.to_window(from))
            .end(self.to_window(to))
            .stroke_weight(weight)
            .color(with_alpha(color, alpha));
    }

    fn circle(&mut self, center: Point2, radius: f32, color: Rgb<u8>, alpha: f32) {
        self.draw
            .ellipse()
            .xy(self.to_window(center))
            .radius(radius)
            .color(with_alpha(color, alpha));
    }

    fn glyph(&mut self, glyph: char, center: Point2, size: f32, color: Rgb<u8>, alpha: f32) {
        let mut buffer = [0u8; 4];
        let text: &str = glyph.encode_utf8(&mut buffer);
        self.draw
            .text(text)
            .xy(self.to_window(center))
            .font_size(size.round().max(1.0) as u32)
            .color(with_alpha(color, alpha));
    }
}
