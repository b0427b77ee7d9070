//! Segment raycasts against the static world.

use engine_core::Vec2;

use crate::collision::{Shape, SurfaceKind};
use crate::world::{ColliderHandle, StaticWorld};

/// Result of a raycast query.
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    /// The collider that was hit.
    pub collider: ColliderHandle,
    pub kind: SurfaceKind,
    /// Distance along the ray to the hit point.
    pub distance: f32,
    /// World position of the hit.
    pub point: Vec2,
    /// Surface normal at the hit point, facing the ray origin.
    pub normal: Vec2,
}

fn cross(a: Vec2, b: Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Ray vs segment. Returns (distance, normal) if they intersect.
fn ray_vs_segment(origin: Vec2, dir: Vec2, a: Vec2, b: Vec2, max_dist: f32) -> Option<(f32, Vec2)> {
    let ab = b - a;
    let denom = cross(dir, ab);
    if denom.abs() < 1e-8 {
        return None; // parallel
    }
    let ao = a - origin;
    let t = cross(ao, ab) / denom;
    let s = cross(ao, dir) / denom;
    if t < 0.0 || t > max_dist || !(0.0..=1.0).contains(&s) {
        return None;
    }
    let mut normal = Vec2::new(-ab.y, ab.x).normalize_or_zero();
    if normal.dot(dir) > 0.0 {
        normal = -normal;
    }
    Some((t, normal))
}

/// Ray vs AABB by the slab method. A ray starting inside hits at distance 0.
fn ray_vs_aabb(
    origin: Vec2,
    dir: Vec2,
    center: Vec2,
    half: Vec2,
    max_dist: f32,
) -> Option<(f32, Vec2)> {
    let min = center - half;
    let max = center + half;
    let inv = Vec2::new(1.0 / dir.x, 1.0 / dir.y);
    let t1 = (min - origin) * inv;
    let t2 = (max - origin) * inv;
    let lo = t1.min(t2);
    let hi = t1.max(t2);
    let t_near = lo.x.max(lo.y);
    let t_far = hi.x.min(hi.y);
    if t_near > t_far || t_far < 0.0 || t_near > max_dist {
        return None;
    }
    let t = t_near.max(0.0);
    let normal = if t == 0.0 {
        -dir
    } else if lo.x > lo.y {
        Vec2::new(-dir.x.signum(), 0.0)
    } else {
        Vec2::new(0.0, -dir.y.signum())
    };
    Some((t, normal))
}

/// Ray vs circle. Returns the nearest non-negative intersection.
fn ray_vs_circle(
    origin: Vec2,
    dir: Vec2,
    center: Vec2,
    radius: f32,
    max_dist: f32,
) -> Option<(f32, Vec2)> {
    let oc = origin - center;
    let b = oc.dot(dir);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();
    let t = if -b - sqrt_disc >= 0.0 {
        -b - sqrt_disc
    } else if -b + sqrt_disc >= 0.0 {
        0.0 // origin inside the circle
    } else {
        return None;
    };
    if t > max_dist {
        return None;
    }
    let point = origin + dir * t;
    Some((t, (point - center).normalize_or_zero()))
}

fn ray_vs_shape(origin: Vec2, dir: Vec2, shape: &Shape, max_dist: f32) -> Option<(f32, Vec2)> {
    match *shape {
        Shape::Segment { a, b } => ray_vs_segment(origin, dir, a, b, max_dist),
        Shape::Aabb { center, half } => ray_vs_aabb(origin, dir, center, half, max_dist),
        Shape::Circle { center, radius } => ray_vs_circle(origin, dir, center, radius, max_dist),
    }
}

impl StaticWorld {
    /// Cast a ray and return the first hit. `direction` must be normalized.
    /// Sensors are included; filter on `kind` if only solids matter.
    pub fn raycast(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Option<RayHit> {
        let mut best: Option<RayHit> = None;
        for (handle, collider) in self.colliders() {
            if let Some((distance, normal)) =
                ray_vs_shape(origin, direction, &collider.shape, max_distance)
            {
                let closer = best.as_ref().map_or(true, |b| distance < b.distance);
                if closer {
                    best = Some(RayHit {
                        collider: handle,
                        kind: collider.kind,
                        distance,
                        point: origin + direction * distance,
                        normal,
                    });
                }
            }
        }
        best
    }

    /// Whether the straight segment between two points is free of solid
    /// geometry. Sensors do not block sight.
    pub fn line_of_sight(&self, from: Vec2, to: Vec2) -> bool {
        let delta = to - from;
        let distance = delta.length();
        if distance < 0.001 {
            return true;
        }
        let dir = delta / distance;
        !self
            .colliders()
            .filter(|(_, c)| c.kind.is_solid())
            .any(|(_, c)| ray_vs_shape(from, dir, &c.shape, distance).is_some())
    }

    /// Whether the straight segment between two points crosses any collider
    /// of the given kind. The enemy AI uses this with
    /// [`SurfaceKind::ForceField`] to decide between curve and ballistic fire.
    pub fn segment_crosses_kind(&self, from: Vec2, to: Vec2, kind: SurfaceKind) -> bool {
        let delta = to - from;
        let distance = delta.length();
        if distance < 0.001 {
            return false;
        }
        let dir = delta / distance;
        self.colliders()
            .filter(|(_, c)| c.kind == kind)
            .any(|(_, c)| ray_vs_shape(from, dir, &c.shape, distance).is_some())
    }
}
