//! Static collider registry.

use engine_core::Vec2;

use crate::collision::{circle_vs_shape, Contact, Shape, SurfaceKind};

/// Stable handle into the static collider registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderHandle(u32);

/// A static collider: geometry plus what it does to projectiles.
#[derive(Debug, Clone, Copy)]
pub struct StaticCollider {
    pub shape: Shape,
    pub kind: SurfaceKind,
}

/// Contact against a registered collider, tagged with its handle and kind.
#[derive(Debug, Clone, Copy)]
pub struct ContactHit {
    pub collider: ColliderHandle,
    pub kind: SurfaceKind,
    pub contact: Contact,
}

/// The stage's static geometry. Colliders are added once during stage setup
/// and never move; handles stay valid for the life of the world.
#[derive(Debug, Default)]
pub struct StaticWorld {
    colliders: Vec<StaticCollider>,
}

impl StaticWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collider and return its handle.
    pub fn add(&mut self, shape: Shape, kind: SurfaceKind) -> ColliderHandle {
        let handle = ColliderHandle(self.colliders.len() as u32);
        self.colliders.push(StaticCollider { shape, kind });
        handle
    }

    /// Flat ground strip at height `y` spanning [x_min, x_max].
    pub fn add_ground(&mut self, y: f32, x_min: f32, x_max: f32) -> ColliderHandle {
        self.add(
            Shape::Segment {
                a: Vec2::new(x_min, y),
                b: Vec2::new(x_max, y),
            },
            SurfaceKind::Ground,
        )
    }

    /// Axis-aligned wall block.
    pub fn add_wall(&mut self, center: Vec2, half: Vec2) -> ColliderHandle {
        self.add(Shape::Aabb { center, half }, SurfaceKind::Wall)
    }

    /// Reflective bounce pad.
    pub fn add_bounce_pad(&mut self, center: Vec2, half: Vec2) -> ColliderHandle {
        self.add(Shape::Aabb { center, half }, SurfaceKind::BouncePad)
    }

    /// Force-field sensor region (non-solid).
    pub fn add_force_field(&mut self, center: Vec2, half: Vec2) -> ColliderHandle {
        self.add(Shape::Aabb { center, half }, SurfaceKind::ForceField)
    }

    pub fn get(&self, handle: ColliderHandle) -> Option<&StaticCollider> {
        self.colliders.get(handle.0 as usize)
    }

    pub fn colliders(&self) -> impl Iterator<Item = (ColliderHandle, &StaticCollider)> {
        self.colliders
            .iter()
            .enumerate()
            .map(|(i, c)| (ColliderHandle(i as u32), c))
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// Deepest solid contact for a circle, if any. Sensors never count.
    pub fn circle_contact(&self, center: Vec2, radius: f32) -> Option<ContactHit> {
        let mut best: Option<ContactHit> = None;
        for (handle, collider) in self.colliders() {
            if !collider.kind.is_solid() {
                continue;
            }
            if let Some(contact) = circle_vs_shape(center, radius, &collider.shape) {
                let deeper = best
                    .as_ref()
                    .map_or(true, |b| contact.depth > b.contact.depth);
                if deeper {
                    best = Some(ContactHit {
                        collider: handle,
                        kind: collider.kind,
                        contact,
                    });
                }
            }
        }
        best
    }

    /// Whether a circle overlaps any collider of the given kind (solid or
    /// sensor). Used for force-field checks.
    pub fn circle_overlaps_kind(&self, center: Vec2, radius: f32, kind: SurfaceKind) -> bool {
        self.colliders
            .iter()
            .filter(|c| c.kind == kind)
            .any(|c| circle_vs_shape(center, radius, &c.shape).is_some())
    }
}
