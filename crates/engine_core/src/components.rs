//! Common ECS components used across the simulation.

use glam::Vec2;

/// Team tag for damage attribution and friendly-fire filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Team {
    /// Unaffiliated (environment props, neutral targets). Can damage and be
    /// damaged by anyone.
    #[default]
    Neutral,
    Player,
    Enemy,
}

impl Team {
    /// Whether a hit from `source` should be applied to an entity on this team.
    /// Same non-neutral team means friendly fire, which is always blocked.
    pub fn accepts_damage_from(&self, source: Team) -> bool {
        *self == Team::Neutral || source == Team::Neutral || *self != source
    }
}

/// Outcome of a damage application, so callers can emit the right events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageResult {
    /// Friendly fire, zero amount, or target already dead.
    Blocked,
    /// Health reduced; target still alive.
    Damaged,
    /// This hit dropped the target to zero. Reported exactly once per life.
    Killed,
}

/// Health component for damageable entities.
#[derive(Debug, Clone, Copy)]
pub struct Health {
    pub current: f32,
    pub max: f32,
    pub team: Team,
    dead: bool,
}

impl Health {
    pub fn new(max: f32, team: Team) -> Self {
        Self {
            current: max,
            max,
            team,
            dead: false,
        }
    }

    /// Apply damage from `source`. Dead entities and friendly hits are
    /// no-ops; current never leaves [0, max].
    pub fn take_damage(&mut self, amount: f32, source: Team) -> DamageResult {
        if self.dead || amount <= 0.0 || !self.team.accepts_damage_from(source) {
            return DamageResult::Blocked;
        }
        self.current = (self.current - amount).max(0.0);
        if self.current <= 0.0 {
            self.dead = true;
            DamageResult::Killed
        } else {
            DamageResult::Damaged
        }
    }

    /// Heal up to max. Dead entities stay dead until `reset`.
    pub fn heal(&mut self, amount: f32) {
        if self.dead || amount <= 0.0 {
            return;
        }
        self.current = (self.current + amount).min(self.max);
    }

    /// Restore to full health and clear the dead flag (re-activation).
    pub fn reset(&mut self) {
        self.current = self.max;
        self.dead = false;
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn percentage(&self) -> f32 {
        if self.max > 0.0 {
            self.current / self.max
        } else {
            0.0
        }
    }
}

/// Velocity component for moving entities. Angular velocity is cosmetic
/// spin only; it never feeds back into linear motion.
#[derive(Debug, Clone, Copy, Default)]
pub struct Velocity2 {
    pub linear: Vec2,
    pub angular: f32,
}

impl Velocity2 {
    pub fn new(linear: Vec2) -> Self {
        Self {
            linear,
            angular: 0.0,
        }
    }

    pub fn with_spin(linear: Vec2, angular: f32) -> Self {
        Self { linear, angular }
    }
}

/// Lifetime component for temporary entities (projectiles, effects).
#[derive(Debug, Clone, Copy)]
pub struct Lifetime {
    pub remaining: f32,
}

impl Lifetime {
    pub fn new(seconds: f32) -> Self {
        Self { remaining: seconds }
    }

    /// Tick down; returns true once expired.
    pub fn update(&mut self, dt: f32) -> bool {
        self.remaining -= dt;
        self.remaining <= 0.0
    }
}

/// Circular collision body for damageable entities.
#[derive(Debug, Clone, Copy)]
pub struct BodyCircle {
    pub radius: f32,
}

impl BodyCircle {
    pub fn new(radius: f32) -> Self {
        Self { radius }
    }
}

/// Damage payload carried by projectiles.
#[derive(Debug, Clone, Copy)]
pub struct Damage {
    pub amount: f32,
    /// Team that fired the hit, checked against the target's team.
    pub source: Team,
}

impl Damage {
    pub fn new(amount: f32, source: Team) -> Self {
        Self { amount, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_clamps_to_zero() {
        let mut h = Health::new(50.0, Team::Player);
        assert_eq!(h.take_damage(80.0, Team::Enemy), DamageResult::Killed);
        assert_eq!(h.current, 0.0);
        assert!(h.is_dead());
    }

    #[test]
    fn dead_entities_ignore_further_damage() {
        let mut h = Health::new(10.0, Team::Player);
        assert_eq!(h.take_damage(10.0, Team::Enemy), DamageResult::Killed);
        assert_eq!(h.take_damage(10.0, Team::Enemy), DamageResult::Blocked);
        assert_eq!(h.current, 0.0);
    }

    #[test]
    fn friendly_fire_is_blocked() {
        let mut h = Health::new(100.0, Team::Enemy);
        assert_eq!(h.take_damage(25.0, Team::Enemy), DamageResult::Blocked);
        assert_eq!(h.current, 100.0);
        // Neutral sources always connect
        assert_eq!(h.take_damage(25.0, Team::Neutral), DamageResult::Damaged);
    }

    #[test]
    fn heal_clamps_to_max_and_skips_dead() {
        let mut h = Health::new(100.0, Team::Player);
        h.take_damage(30.0, Team::Enemy);
        h.heal(500.0);
        assert_eq!(h.current, 100.0);

        h.take_damage(100.0, Team::Enemy);
        h.heal(50.0);
        assert!(h.is_dead());
        assert_eq!(h.current, 0.0);
    }

    #[test]
    fn reset_revives_at_full_health() {
        let mut h = Health::new(40.0, Team::Enemy);
        h.take_damage(40.0, Team::Player);
        h.reset();
        assert!(!h.is_dead());
        assert_eq!(h.current, 40.0);
        // A fresh life can die again, exactly once
        assert_eq!(h.take_damage(40.0, Team::Player), DamageResult::Killed);
    }

    #[test]
    fn random_damage_heal_sequence_stays_in_range() {
        let mut h = Health::new(100.0, Team::Neutral);
        let amounts = [12.5, 200.0, -5.0, 33.0, 7.0, 150.0];
        for (i, amt) in amounts.iter().enumerate() {
            if i % 2 == 0 {
                h.take_damage(*amt, Team::Player);
            } else {
                h.heal(*amt);
            }
            assert!(h.current >= 0.0 && h.current <= h.max);
        }
    }
}
