/*
 * Viewport Module
 *
 * This module defines the Viewport struct describing the drawing surface.
 * Surface space has its origin in the top-left corner with y pointing down,
 * the way pointer coordinates arrive. nannou draws in window space, centred
 * on the window with y pointing up, so the conversions live here too.
 */

use nannou::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        // Negative or NaN sizes collapse to an empty surface
        Self {
            width: if width > 0.0 { width } else { 0.0 },
            height: if height > 0.0 { height } else { 0.0 },
        }
    }

    // Measure a nannou window rectangle
    pub fn from_rect(rect: Rect) -> Self {
        Self::new(rect.w(), rect.h())
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.area() <= 0.0
    }

    pub fn center(&self) -> Vec2 {
        vec2(self.width / 2.0, self.height / 2.0)
    }

    pub fn contains(&self, position: Vec2) -> bool {
        position.x >= 0.0 && position.x < self.width && position.y >= 0.0 && position.y < self.height
    }

    // Wrap a position toroidally into [0, width) x [0, height)
    pub fn wrap(&self, position: Vec2) -> Vec2 {
        vec2(wrap_axis(position.x, self.width), wrap_axis(position.y, self.height))
    }

    // Convert a point from surface space to nannou window space
    pub fn to_window(point: Vec2, window_rect: Rect) -> Vec2 {
        vec2(window_rect.left() + point.x, window_rect.top() - point.y)
    }

    // Convert a point from nannou window space to surface space
    pub fn to_surface(point: Vec2, window_rect: Rect) -> Vec2 {
        vec2(point.x - window_rect.left(), window_rect.top() - point.y)
    }
}

#[inline]
fn wrap_axis(value: f32, extent: f32) -> f32 {
    if extent <= 0.0 || !value.is_finite() {
        return 0.0;
    }

    let wrapped = value.rem_euclid(extent);

    // rem_euclid can round up to `extent` for tiny negative inputs
    if wrapped >= extent {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_sizes_collapse_to_empty() {
        let viewport = Viewport::new(-10.0, 300.0);
        assert_eq!(viewport.width, 0.0);
        assert!(viewport.is_empty());
    }

    #[test]
    fn wrap_reenters_from_opposite_edge() {
        let viewport = Viewport::new(800.0, 600.0);

        assert_eq!(viewport.wrap(vec2(805.0, 10.0)), vec2(5.0, 10.0));
        assert_eq!(viewport.wrap(vec2(-5.0, 10.0)), vec2(795.0, 10.0));
        assert_eq!(viewport.wrap(vec2(10.0, 600.0)), vec2(10.0, 0.0));
        assert_eq!(viewport.wrap(vec2(10.0, -1.0)), vec2(10.0, 599.0));
    }

    #[test]
    fn wrap_never_returns_the_far_edge() {
        let viewport = Viewport::new(800.0, 600.0);
        let wrapped = viewport.wrap(vec2(-1e-9, -1e-9));
        assert!(viewport.contains(wrapped));
    }

    #[test]
    fn wrap_on_empty_surface_pins_to_origin() {
        let viewport = Viewport::new(0.0, 0.0);
        assert_eq!(viewport.wrap(vec2(42.0, -3.0)), Vec2::ZERO);
    }

    #[test]
    fn window_conversion_round_trips_corners() {
        let rect = Rect::from_w_h(800.0, 600.0);
        assert_eq!(Viewport::from_rect(rect), Viewport::new(800.0, 600.0));

        let top_left = Viewport::to_window(Vec2::ZERO, rect);
        assert_eq!(top_left, vec2(-400.0, 300.0));

        let back = Viewport::to_surface(vec2(400.0, -300.0), rect);
        assert_eq!(back, vec2(800.0, 600.0));
    }
}
