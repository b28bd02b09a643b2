//! Shape generation for 2D primitives
//!
//! Everything here is in window pixels (origin top-left, y down);
//! `RenderState` maps to NDC at upload time.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{SpriteVertex, Vertex, colors};
use crate::sim::DebugShape;

/// Segments used for debug circles
const CIRCLE_SEGMENTS: u32 = 48;
/// Outline width for debug circles, pixels
const OUTLINE_WIDTH: f32 = 2.0;

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let dir1 = Vec2::new(theta1.cos(), theta1.sin());
        let dir2 = Vec2::new(theta2.cos(), theta2.sin());
        let inner1 = center + dir1 * inner_radius;
        let outer1 = center + dir1 * outer_radius;
        let inner2 = center + dir2 * inner_radius;
        let outer2 = center + dir2 * outer_radius;

        // Two triangles per segment
        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(inner2.x, inner2.y, color));

        vertices.push(Vertex::new(inner2.x, inner2.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(outer2.x, outer2.y, color));
    }

    vertices
}

/// Generate vertices for a straight band from `a` to `b`, `half_width` each side
pub fn segment(a: Vec2, b: Vec2, half_width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (b - a).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    // Perpendicular for width
    let perp = dir.perp() * half_width;

    let a1 = a + perp;
    let a2 = a - perp;
    let b1 = b + perp;
    let b2 = b - perp;

    vec![
        Vertex::new(a1.x, a1.y, color),
        Vertex::new(a2.x, a2.y, color),
        Vertex::new(b1.x, b1.y, color),
        Vertex::new(b1.x, b1.y, color),
        Vertex::new(a2.x, a2.y, color),
        Vertex::new(b2.x, b2.y, color),
    ]
}

fn shade(color: [f32; 4], factor: f32) -> [f32; 4] {
    [color[0] * factor, color[1] * factor, color[2] * factor, color[3]]
}

/// Vertices for one debug primitive: filled circle with outline and angle
/// line, or a thick segment (at least one pixel wide)
pub fn debug_shape(shape: &DebugShape) -> Vec<Vertex> {
    match *shape {
        DebugShape::Circle {
            center,
            radius,
            angle,
            color,
        } => {
            let mut vertices = circle(center, radius, color, CIRCLE_SEGMENTS);
            vertices.extend(ring(
                center,
                (radius - OUTLINE_WIDTH).max(0.0),
                radius,
                shade(color, colors::OUTLINE_SHADE),
                CIRCLE_SEGMENTS,
            ));
            let rim = center + Vec2::new(angle.cos(), angle.sin()) * radius;
            vertices.extend(segment(center, rim, OUTLINE_WIDTH / 2.0, colors::ANGLE_LINE));
            vertices
        }
        DebugShape::Segment { a, b, radius, color } => segment(a, b, radius.max(1.0), color),
    }
}

/// Vertices for a whole debug overlay
pub fn debug_overlay(shapes: &[DebugShape]) -> Vec<Vertex> {
    shapes.iter().flat_map(debug_shape).collect()
}

/// Textured quad covering `size` pixels from `origin`
pub fn sprite_quad(origin: Vec2, size: Vec2) -> [SpriteVertex; 6] {
    let (x0, y0) = (origin.x, origin.y);
    let (x1, y1) = (origin.x + size.x, origin.y + size.y);
    [
        SpriteVertex::new(x0, y0, 0.0, 0.0),
        SpriteVertex::new(x0, y1, 0.0, 1.0),
        SpriteVertex::new(x1, y0, 1.0, 0.0),
        SpriteVertex::new(x1, y0, 1.0, 0.0),
        SpriteVertex::new(x0, y1, 0.0, 1.0),
        SpriteVertex::new(x1, y1, 1.0, 1.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREEN: [f32; 4] = [0.0, 1.0, 0.0, 1.0];

    #[test]
    fn test_circle_vertices_on_rim() {
        let vertices = circle(Vec2::new(10.0, 10.0), 5.0, GREEN, 8);
        assert_eq!(vertices.len(), 24);
        for tri in vertices.chunks(3) {
            assert_eq!(tri[0].position, [10.0, 10.0]);
            let p = Vec2::from(tri[1].position);
            assert!(((p - Vec2::new(10.0, 10.0)).length() - 5.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_segment_width() {
        let vertices = segment(Vec2::ZERO, Vec2::new(10.0, 0.0), 2.0, GREEN);
        assert_eq!(vertices.len(), 6);
        for v in &vertices {
            assert!((v.position[1].abs() - 2.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_degenerate_segment_is_empty() {
        assert!(segment(Vec2::ONE, Vec2::ONE, 2.0, GREEN).is_empty());
    }

    #[test]
    fn test_debug_circle_has_fill_outline_and_angle() {
        let shape = DebugShape::Circle {
            center: Vec2::new(50.0, 50.0),
            radius: 20.0,
            angle: 0.0,
            color: GREEN,
        };
        let n = CIRCLE_SEGMENTS as usize;
        assert_eq!(debug_shape(&shape).len(), n * 3 + n * 6 + 6);
    }

    #[test]
    fn test_thin_wall_still_visible() {
        let shape = DebugShape::Segment {
            a: Vec2::ZERO,
            b: Vec2::new(0.0, 100.0),
            radius: 0.0,
            color: GREEN,
        };
        let vertices = debug_shape(&shape);
        assert_eq!(vertices.len(), 6);
        assert!(vertices.iter().any(|v| v.position[0].abs() >= 1.0 - 1e-5));
    }

    #[test]
    fn test_sprite_quad_corners() {
        let quad = sprite_quad(Vec2::ZERO, Vec2::new(200.0, 100.0));
        assert_eq!(quad[0], SpriteVertex::new(0.0, 0.0, 0.0, 0.0));
        assert_eq!(quad[5], SpriteVertex::new(200.0, 100.0, 1.0, 1.0));
    }
}
