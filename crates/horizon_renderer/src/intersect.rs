//! Ray intersection with the black hole sphere and the accretion disk.
//!
//! Both tests are pure functions of the ray and the scene radii. A miss is
//! `None`; a hit carries the ray parameter `t` of the nearest valid crossing.

use horizon_math::{Interval, Ray, EPSILON};

/// Intersect a ray with a sphere of `radius` centred at the origin.
///
/// The ray direction must be unit length, so the quadratic reduces to
/// `t^2 + b t + c = 0`. The nearer root wins when it lies past the
/// self-intersection threshold, otherwise the farther one is tried.
pub fn intersect_sphere(ray: &Ray, radius: f32) -> Option<f32> {
    let b = 2.0 * ray.origin().dot(ray.direction());
    let c = ray.origin().length_squared() - radius * radius;

    let discriminant = b * b - 4.0 * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrtd = discriminant.sqrt();
    let t0 = (-b - sqrtd) / 2.0;
    let t1 = (-b + sqrtd) / 2.0;

    [t0, t1].into_iter().find(|&t| Interval::FORWARD.surrounds(t))
}

/// Intersect a ray with the annulus `inner <= r <= outer` in the plane y = 0.
pub fn intersect_disk(ray: &Ray, inner: f32, outer: f32) -> Option<f32> {
    let direction = ray.direction();
    // Parallel to the disk plane
    if direction.y.abs() < EPSILON {
        return None;
    }

    let t = -ray.origin().y / direction.y;
    if !Interval::FORWARD.surrounds(t) {
        return None;
    }

    let p = ray.at(t);
    let r = (p.x * p.x + p.z * p.z).sqrt();
    Interval::new(inner, outer).contains(r).then_some(t)
}
