//! Collider shapes, surface kinds, and circle narrow phase.

use glam::Vec2;

/// What a static surface does to projectiles that touch it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    /// Terrain floor. Projectiles configured to die on ground stop here.
    Ground,
    /// Solid obstacle. Always stops projectiles.
    Wall,
    /// Reflective surface: curve-mode projectiles bounce off and fall under
    /// gravity from then on.
    BouncePad,
    /// Non-solid sensor region. Never blocks motion; the enemy AI switches
    /// to ballistic aiming when its firing line crosses one.
    ForceField,
}

impl SurfaceKind {
    /// Sensors overlap without blocking; everything else is solid.
    pub fn is_solid(&self) -> bool {
        !matches!(self, SurfaceKind::ForceField)
    }
}

/// Static collider geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Line segment between two endpoints (ground strips, ramps).
    Segment { a: Vec2, b: Vec2 },
    /// Axis-aligned box given by center and half extents.
    Aabb { center: Vec2, half: Vec2 },
    /// Circle given by center and radius.
    Circle { center: Vec2, radius: f32 },
}

/// Contact between a swept circle and a static shape.
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    /// Point on the shape surface closest to the circle center.
    pub point: Vec2,
    /// Unit normal pointing from the shape toward the circle center.
    pub normal: Vec2,
    /// Penetration depth (radius minus separation).
    pub depth: f32,
}

/// Reflect a velocity about a unit surface normal.
pub fn reflect(v: Vec2, normal: Vec2) -> Vec2 {
    v - 2.0 * v.dot(normal) * normal
}

/// Test a circle against a shape. Returns the contact if they overlap.
pub fn circle_vs_shape(center: Vec2, radius: f32, shape: &Shape) -> Option<Contact> {
    match *shape {
        Shape::Segment { a, b } => circle_vs_segment(center, radius, a, b),
        Shape::Aabb { center: c, half } => circle_vs_aabb(center, radius, c, half),
        Shape::Circle {
            center: c,
            radius: r,
        } => circle_vs_circle(center, radius, c, r),
    }
}

fn circle_vs_segment(center: Vec2, radius: f32, a: Vec2, b: Vec2) -> Option<Contact> {
    let ab = b - a;
    let len_sq = ab.length_squared();
    let closest = if len_sq <= f32::EPSILON {
        a
    } else {
        let t = ((center - a).dot(ab) / len_sq).clamp(0.0, 1.0);
        a + ab * t
    };
    contact_from_closest(center, radius, closest, || {
        // Circle center sits exactly on the segment; fall back to the
        // segment's left-hand perpendicular.
        Vec2::new(-ab.y, ab.x).normalize_or_zero()
    })
}

fn circle_vs_aabb(center: Vec2, radius: f32, box_center: Vec2, half: Vec2) -> Option<Contact> {
    let min = box_center - half;
    let max = box_center + half;
    let closest = center.clamp(min, max);
    contact_from_closest(center, radius, closest, || {
        // Center inside the box: push out along the thinnest axis.
        let to_center = center - box_center;
        let overlap_x = half.x - to_center.x.abs();
        let overlap_y = half.y - to_center.y.abs();
        if overlap_x < overlap_y {
            Vec2::new(to_center.x.signum(), 0.0)
        } else {
            Vec2::new(0.0, to_center.y.signum())
        }
    })
}

fn circle_vs_circle(center: Vec2, radius: f32, other: Vec2, other_radius: f32) -> Option<Contact> {
    let to_center = center - other;
    let dist = to_center.length();
    let reach = radius + other_radius;
    if dist >= reach {
        return None;
    }
    let normal = if dist > f32::EPSILON {
        to_center / dist
    } else {
        Vec2::Y
    };
    Some(Contact {
        point: other + normal * other_radius,
        normal,
        depth: reach - dist,
    })
}

fn contact_from_closest(
    center: Vec2,
    radius: f32,
    closest: Vec2,
    degenerate_normal: impl FnOnce() -> Vec2,
) -> Option<Contact> {
    let to_center = center - closest;
    let dist_sq = to_center.length_squared();
    if dist_sq >= radius * radius {
        return None;
    }
    let dist = dist_sq.sqrt();
    let normal = if dist > f32::EPSILON {
        to_center / dist
    } else {
        degenerate_normal()
    };
    Some(Contact {
        point: closest,
        normal,
        depth: radius - dist,
    })
}
