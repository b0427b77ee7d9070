//! Player shooter: charged manual fire plus the aim-preview query surface.

use engine_core::{Damage, Entity, Team, Vec2, World};

use crate::ballistics::{charged_launch_velocity, predict_trajectory};
use crate::events::EventQueue;
use crate::projectile::{spawn_projectile, Projectile};

/// Fires ballistic shots whose speed scales with how far the aim point is
/// dragged from the muzzle. Turn gating lives in the coordinator; this type
/// only knows how to launch.
#[derive(Debug, Clone)]
pub struct Shooter {
    /// World position shots launch from.
    pub muzzle: Vec2,
    pub team: Team,
    pub min_speed: f32,
    pub max_speed: f32,
    /// Aim drag distance at which launch speed saturates.
    pub max_charge_distance: f32,
    /// Signed y acceleration for spawned projectiles.
    pub gravity: f32,
    pub damage: f32,
    pub projectile_radius: f32,
    pub spin: f32,
    pub projectile_lifetime: f32,
}

impl Shooter {
    pub fn new(muzzle: Vec2, team: Team) -> Self {
        Self {
            muzzle,
            team,
            min_speed: 5.0,
            max_speed: 20.0,
            max_charge_distance: 10.0,
            gravity: -9.81,
            damage: 25.0,
            projectile_radius: 0.2,
            spin: 6.0,
            projectile_lifetime: 12.0,
        }
    }

    /// Launch velocity for a candidate aim point. This is the aim-preview
    /// query surface: HUD arcs call it every frame without firing.
    pub fn predict_velocity(&self, aim: Vec2) -> Vec2 {
        let delta = aim - self.muzzle;
        charged_launch_velocity(
            delta,
            delta.length(),
            self.min_speed,
            self.max_speed,
            self.max_charge_distance,
        )
    }

    /// Forward-sampled flight path for the same aim point.
    pub fn predict_path(&self, aim: Vec2, dt: f32, max_seconds: f32) -> Vec<Vec2> {
        predict_trajectory(self.muzzle, self.predict_velocity(aim), self.gravity, dt, max_seconds)
    }

    /// Spawn a charged shot toward `aim`. Returns None for a degenerate aim
    /// point on top of the muzzle (nothing to normalize against).
    pub fn fire(&self, world: &mut World, events: &mut EventQueue, aim: Vec2) -> Option<Entity> {
        let velocity = self.predict_velocity(aim);
        if velocity.length_squared() < 1e-6 {
            log::debug!("ignoring fire request with degenerate aim point");
            return None;
        }
        Some(spawn_projectile(
            world,
            events,
            self.muzzle,
            velocity,
            self.spin,
            self.projectile_lifetime,
            Projectile::ballistic(
                self.gravity,
                Damage::new(self.damage, self.team),
                self.projectile_radius,
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::GameEvent;

    #[test]
    fn half_charge_launches_at_midpoint_speed() {
        // Player at origin aiming at (5, 0): lerp(5, 20, 5/10) = 12.5 along +X
        let shooter = Shooter::new(Vec2::ZERO, Team::Player);
        let v = shooter.predict_velocity(Vec2::new(5.0, 0.0));
        assert!((v.x - 12.5).abs() < 1e-5);
        assert!(v.y.abs() < 1e-6);
    }

    #[test]
    fn fire_spawns_a_ballistic_projectile() {
        let shooter = Shooter::new(Vec2::new(1.0, 1.0), Team::Player);
        let mut world = World::new();
        let mut events = EventQueue::new();
        let entity = shooter
            .fire(&mut world, &mut events, Vec2::new(6.0, 1.0))
            .unwrap();
        assert!(world.contains(entity));
        assert!(matches!(
            events.drain()[0],
            GameEvent::ProjectileSpawned { team: Team::Player, .. }
        ));
    }

    #[test]
    fn degenerate_aim_is_rejected() {
        let shooter = Shooter::new(Vec2::new(2.0, 0.0), Team::Player);
        let mut world = World::new();
        let mut events = EventQueue::new();
        assert!(shooter
            .fire(&mut world, &mut events, Vec2::new(2.0, 0.0))
            .is_none());
        assert!(events.is_empty());
    }

    #[test]
    fn predicted_path_starts_at_the_muzzle() {
        let shooter = Shooter::new(Vec2::new(-3.0, 2.0), Team::Player);
        let path = shooter.predict_path(Vec2::new(5.0, 2.0), 0.02, 1.0);
        assert_eq!(path[0], Vec2::new(-3.0, 2.0));
        assert!(path.len() > 10);
    }
}
