//! Wireframe overlays drawn on top of a rendered frame.
//!
//! These use the camera's forward projection, so they double as a visual
//! check that ray generation and projection agree.

use std::f32::consts::TAU;

use horizon_math::Vec3;

use crate::{Camera, ImageBuffer, Rgb, SceneConfig};

/// Color of the disk edge outlines.
pub const RING_COLOR: Rgb = [200, 120, 50];

/// Points per ring outline.
pub const RING_SEGMENTS: usize = 200;

/// Outline stroke width in pixels.
pub const RING_WIDTH: u32 = 2;

/// Project evenly spaced points of a circle of `radius` in the y = 0 plane.
///
/// Points behind the camera are dropped, so the result may be shorter than
/// `segments`.
pub fn ring_points(
    camera: &Camera,
    radius: f32,
    segments: usize,
    width: u32,
    height: u32,
) -> Vec<(i32, i32)> {
    (0..segments)
        .filter_map(|i| {
            let angle = TAU * i as f32 / segments as f32;
            let point = Vec3::new(radius * angle.cos(), 0.0, radius * angle.sin());
            camera.project(point, width, height)
        })
        .collect()
}

/// Draw connected line segments `thickness` pixels wide, clipped to the image.
pub fn draw_polyline(
    image: &mut ImageBuffer,
    points: &[(i32, i32)],
    color: Rgb,
    closed: bool,
    thickness: u32,
) {
    for pair in points.windows(2) {
        draw_thick_line(image, pair[0], pair[1], color, thickness);
    }
    if closed && points.len() > 2 {
        draw_thick_line(image, points[points.len() - 1], points[0], color, thickness);
    }
}

/// Parallel copies of a line, stacked along its minor axis.
fn draw_thick_line(image: &mut ImageBuffer, from: (i32, i32), to: (i32, i32), color: Rgb, thickness: u32) {
    let x_major = (to.0 - from.0).abs() >= (to.1 - from.1).abs();
    for i in 0..thickness.max(1) as i32 {
        let (ox, oy) = if x_major { (0, i) } else { (i, 0) };
        draw_line(
            image,
            (from.0.saturating_add(ox), from.1.saturating_add(oy)),
            (to.0.saturating_add(ox), to.1.saturating_add(oy)),
            color,
        );
    }
}

/// Bresenham line between two pixel positions, clipped to the image first.
pub fn draw_line(image: &mut ImageBuffer, from: (i32, i32), to: (i32, i32), color: Rgb) {
    if image.width == 0 || image.height == 0 {
        return;
    }
    let bounds = ((image.width - 1) as f64, (image.height - 1) as f64);
    let Some((from, to)) = clip_segment(from, to, bounds) else {
        return;
    };

    let (mut x, mut y) = from;
    let dx = (to.0 - x).abs();
    let dy = -(to.1 - y).abs();
    let sx = if x < to.0 { 1 } else { -1 };
    let sy = if y < to.1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        image.set_clipped(x, y, color);
        if (x, y) == to {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Liang-Barsky clip of a segment against `[0, max.0] x [0, max.1]`.
///
/// Returns `None` when no part of the segment lies inside.
fn clip_segment(from: (i32, i32), to: (i32, i32), max: (f64, f64)) -> Option<((i32, i32), (i32, i32))> {
    let (x0, y0) = (from.0 as f64, from.1 as f64);
    let (dx, dy) = (to.0 as f64 - x0, to.1 as f64 - y0);

    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;
    for (p, q) in [(-dx, x0), (dx, max.0 - x0), (-dy, y0), (dy, max.1 - y0)] {
        if p == 0.0 {
            // Parallel to this edge and outside it
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
        }
    }
    if t0 > t1 {
        return None;
    }

    let at = |t: f64| ((x0 + t * dx).round() as i32, (y0 + t * dy).round() as i32);
    Some((at(t0), at(t1)))
}

/// Outline the inner and outer edges of the accretion disk.
///
/// A ring is only drawn when more than two of its points are visible.
pub fn draw_disk_outline(image: &mut ImageBuffer, camera: &Camera, scene: &SceneConfig) {
    for radius in [scene.disk_inner_radius, scene.disk_outer_radius] {
        let points = ring_points(camera, radius, RING_SEGMENTS, image.width, image.height);
        if points.len() > 2 {
            draw_polyline(image, &points, RING_COLOR, true, RING_WIDTH);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{render, RenderConfig};

    #[test]
    fn test_ring_points_all_visible_from_afar() {
        let camera = Camera::new().with_orbit(50.0, 0.3, 0.8);
        let points = ring_points(&camera, 8.0, 200, 200, 150);
        assert_eq!(points.len(), 200);
        assert!(points
            .iter()
            .all(|&(x, y)| (0..200).contains(&x) && (0..150).contains(&y)));
    }

    #[test]
    fn test_ring_points_behind_camera_dropped() {
        // Camera inside the ring radius: the part behind it cannot project
        let camera = Camera::new().with_orbit(5.0, 0.0, 0.2);
        let points = ring_points(&camera, 20.0, 100, 200, 150);
        assert!(points.len() < 100);
    }

    #[test]
    fn test_draw_line_endpoints_and_length() {
        let mut image = ImageBuffer::new(10, 10);
        draw_line(&mut image, (1, 1), (8, 4), [255, 0, 0]);

        assert_eq!(image.get(1, 1), [255, 0, 0]);
        assert_eq!(image.get(8, 4), [255, 0, 0]);
        let lit = image.pixels.iter().filter(|&&p| p == [255, 0, 0]).count();
        // One pixel per column along the major axis
        assert_eq!(lit, 8);
    }

    #[test]
    fn test_draw_line_clips() {
        let mut image = ImageBuffer::new(10, 10);
        draw_line(&mut image, (-5, 5), (15, 5), [1, 1, 1]);
        assert!(image.row(5).iter().all(|&p| p == [1, 1, 1]));
        assert!(image.row(4).iter().all(|&p| p == [0, 0, 0]));
    }

    #[test]
    fn test_draw_line_far_endpoint_clipped() {
        let mut image = ImageBuffer::new(10, 10);
        draw_line(&mut image, (5, 5), (1_000_000, 5), [1, 1, 1]);

        // The on-screen part survives even though one end is far away
        for x in 5..10 {
            assert_eq!(image.get(x, 5), [1, 1, 1]);
        }
        assert_eq!(image.get(4, 5), [0, 0, 0]);
        assert_eq!(image.pixels.iter().filter(|&&p| p == [1, 1, 1]).count(), 5);
    }

    #[test]
    fn test_draw_line_crossing_from_far_outside() {
        let mut image = ImageBuffer::new(10, 10);
        draw_line(&mut image, (-1_000_000, 4), (1_000_000, 4), [2, 2, 2]);
        assert!(image.row(4).iter().all(|&p| p == [2, 2, 2]));

        // Diagonal with both ends off-image
        let mut image = ImageBuffer::new(10, 10);
        draw_line(&mut image, (-100, -100), (100, 100), [2, 2, 2]);
        for i in 0..10 {
            assert_eq!(image.get(i, i), [2, 2, 2]);
        }
    }

    #[test]
    fn test_draw_line_entirely_outside() {
        let mut image = ImageBuffer::new(10, 10);
        draw_line(&mut image, (-50, -3), (50, -3), [1, 1, 1]);
        draw_line(&mut image, (20, 0), (40, 9), [1, 1, 1]);
        assert!(image.pixels.iter().all(|&p| p == [0, 0, 0]));
    }

    #[test]
    fn test_thick_polyline() {
        let mut image = ImageBuffer::new(10, 10);
        draw_polyline(&mut image, &[(1, 2), (8, 2)], [3, 3, 3], false, 2);

        // Horizontal stroke grows downward
        assert!((1..=8).all(|x| image.get(x, 2) == [3, 3, 3] && image.get(x, 3) == [3, 3, 3]));
        assert_eq!(image.get(1, 4), [0, 0, 0]);
        assert_eq!(image.pixels.iter().filter(|&&p| p == [3, 3, 3]).count(), 16);
    }

    #[test]
    fn test_closed_polyline() {
        let mut image = ImageBuffer::new(10, 10);
        let square = [(2, 2), (7, 2), (7, 7), (2, 7)];
        draw_polyline(&mut image, &square, [9, 9, 9], true, 1);

        // Closing edge from (2, 7) back to (2, 2)
        for y in 2..=7 {
            assert_eq!(image.get(2, y), [9, 9, 9]);
        }
        assert_eq!(image.get(5, 5), [0, 0, 0]);
    }

    #[test]
    fn test_disk_outline_kept_when_camera_is_close() {
        // Inside the outer ring, so some of its points project far off-image
        let camera = Camera::new().with_orbit(6.0, 0.0, 0.3);
        let points = ring_points(&camera, 8.0, RING_SEGMENTS, 200, 150);
        assert!(points.iter().any(|&(x, y)| x.abs() > 350 || y.abs() > 350));

        let mut image = ImageBuffer::new(200, 150);
        draw_polyline(&mut image, &points, RING_COLOR, true, RING_WIDTH);

        let ring_pixels = image.pixels.iter().filter(|&&p| p == RING_COLOR).count();
        assert!(ring_pixels > 0);
    }

    #[test]
    fn test_disk_outline_drawn_over_frame() {
        let camera = Camera::new().with_orbit(50.0, 0.0, 1.0);
        let scene = SceneConfig::default();
        let mut image = render(&camera, &scene, &RenderConfig::default());
        draw_disk_outline(&mut image, &camera, &scene);

        let ring_pixels = image.pixels.iter().filter(|&&p| p == RING_COLOR).count();
        assert!(ring_pixels > 50);
    }
}
