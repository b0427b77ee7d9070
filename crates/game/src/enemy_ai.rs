//! Enemy aim/accuracy model.
//!
//! Each shot rolls hit-or-miss against an accuracy setting; misses displace
//! the aim point perpendicular to the firing line with a severity-scaled
//! magnitude plus vertical noise. Shot cadence is modulated by Perlin noise
//! so consecutive delays drift smoothly instead of jumping white-noise
//! style. Curve shots are the default; ballistic shots take over when
//! forced or when the firing line crosses a force field.

use engine_core::{Damage, Entity, Vec2, World};
use noise::{NoiseFn, Perlin};
use physics::{StaticWorld, SurfaceKind};
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::ballistics::launch_velocity_for_arc;
use crate::events::EventQueue;
use crate::projectile::{spawn_projectile, CurveParams, Projectile};

/// Cadence noise frequency in lattice units per second. Off-integer so the
/// sampler never sits on Perlin lattice zeros.
const CADENCE_FREQ: f64 = 0.35;

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Aim tuning for one enemy. Every external mutation goes through
/// [`AimSettings::sanitized`], so no caller can push the model into an
/// invalid numeric state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AimSettings {
    /// Chance a shot aims at the exact target, in [0, 1].
    pub accuracy: f32,
    /// Closest a rolled miss may land to the target.
    pub min_miss_distance: f32,
    /// Farthest a rolled miss may land from the target.
    pub max_miss_distance: f32,
    /// Base seconds between shots.
    pub shoot_interval: f32,
    /// Fractional cadence wobble applied on top of the base interval.
    pub interval_jitter: f32,
    pub projectile_speed: f32,
    /// Curve-shot arc height as a fraction of horizontal distance.
    pub arc_height: f32,
    /// Cosmetic spin rate for spawned projectiles.
    pub spin: f32,
    /// Fractional perturbation of curve arc height per shot.
    pub height_noise: f32,
}

impl Default for AimSettings {
    fn default() -> Self {
        Self {
            accuracy: 0.7,
            min_miss_distance: 1.0,
            max_miss_distance: 4.0,
            shoot_interval: 2.5,
            interval_jitter: 0.4,
            projectile_speed: 9.0,
            arc_height: 0.35,
            spin: 5.0,
            height_noise: 0.2,
        }
    }
}

impl AimSettings {
    /// Clamp every field into its valid range. Interval floors at 0.1 s,
    /// distances stay non-negative with min <= max, accuracy in [0, 1].
    pub fn sanitized(mut self) -> Self {
        self.accuracy = self.accuracy.clamp(0.0, 1.0);
        self.min_miss_distance = self.min_miss_distance.max(0.0);
        self.max_miss_distance = self.max_miss_distance.max(self.min_miss_distance);
        self.shoot_interval = self.shoot_interval.max(0.1);
        self.interval_jitter = self.interval_jitter.max(0.0);
        self.projectile_speed = self.projectile_speed.max(0.1);
        self.arc_height = self.arc_height.max(0.0);
        self.height_noise = self.height_noise.clamp(0.0, 1.0);
        self
    }

    /// Linear blend between two presets for difficulty scaling.
    pub fn lerp(a: &AimSettings, b: &AimSettings, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            accuracy: lerp(a.accuracy, b.accuracy, t),
            min_miss_distance: lerp(a.min_miss_distance, b.min_miss_distance, t),
            max_miss_distance: lerp(a.max_miss_distance, b.max_miss_distance, t),
            shoot_interval: lerp(a.shoot_interval, b.shoot_interval, t),
            interval_jitter: lerp(a.interval_jitter, b.interval_jitter, t),
            projectile_speed: lerp(a.projectile_speed, b.projectile_speed, t),
            arc_height: lerp(a.arc_height, b.arc_height, t),
            spin: lerp(a.spin, b.spin, t),
            height_noise: lerp(a.height_noise, b.height_noise, t),
        }
        .sanitized()
    }
}

/// One enemy's shooter: owns its aim settings, its RNG, and its cadence
/// noise lane. Lives beside the ECS (keyed by the enemy entity), not in it.
pub struct EnemyShooter {
    settings: AimSettings,
    /// Always solve a ballistic launch instead of curve flight.
    pub force_ballistic: bool,
    /// Signed y acceleration for spawned projectiles.
    pub gravity: f32,
    pub damage: f32,
    pub projectile_radius: f32,
    pub projectile_lifetime: f32,
    /// Launch point relative to the enemy's position.
    pub muzzle_offset: Vec2,
    cooldown: f32,
    cadence: Perlin,
    cadence_lane: f64,
    rng: StdRng,
}

impl EnemyShooter {
    pub fn new(settings: AimSettings, seed: u64) -> Self {
        Self {
            settings: settings.sanitized(),
            force_ballistic: false,
            gravity: -9.81,
            damage: 15.0,
            projectile_radius: 0.2,
            projectile_lifetime: 12.0,
            muzzle_offset: Vec2::new(0.0, 0.8),
            cooldown: 0.0,
            cadence: Perlin::new(seed as u32),
            cadence_lane: (seed % 251) as f64 + 0.5,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn settings(&self) -> &AimSettings {
        &self.settings
    }

    /// Replace the settings; the clamp pass runs unconditionally.
    pub fn apply_settings(&mut self, settings: AimSettings) {
        self.settings = settings.sanitized();
    }

    /// Seconds until the next shot, sampled at simulation time `at`.
    /// Coherent noise keeps consecutive delays close to each other.
    pub fn shot_delay(&self, at_seconds: f32) -> f32 {
        let n = self
            .cadence
            .get([f64::from(at_seconds) * CADENCE_FREQ, self.cadence_lane]) as f32;
        let n01 = (n + 1.0) * 0.5;
        (self.settings.shoot_interval * (1.0 + n01 * self.settings.interval_jitter)).max(0.1)
    }

    /// Tick the cadence timer.
    pub fn update(&mut self, dt: f32) {
        self.cooldown = (self.cooldown - dt).max(0.0);
    }

    /// Whether the cadence timer allows firing.
    pub fn ready(&self) -> bool {
        self.cooldown <= 0.0
    }

    /// Roll hit-or-miss. A hit returns None; a miss returns the offset
    /// magnitude, drawn from the severity-scaled band with half the min
    /// distance as its floor, so even near-perfect shooters miss by a
    /// visible margin.
    fn roll_miss_magnitude(&mut self) -> Option<f32> {
        let roll: f32 = self.rng.gen();
        if roll <= self.settings.accuracy {
            return None;
        }
        let severity = 1.0 - self.settings.accuracy;
        let min = self.settings.min_miss_distance;
        let max = self.settings.max_miss_distance;
        let lo = lerp(min * 0.5, min, severity);
        let hi = lerp(min, max, severity);
        Some(self.rng.gen_range(lo..=hi))
    }

    /// Roll hit-or-miss and produce the point to shoot at. A hit aims at
    /// the exact target; a miss offsets perpendicular to the firing line,
    /// plus a vertical wobble of up to a quarter of the miss magnitude.
    pub fn pick_aim_point(&mut self, muzzle: Vec2, target: Vec2) -> Vec2 {
        let Some(magnitude) = self.roll_miss_magnitude() else {
            return target;
        };
        let sign = if self.rng.gen::<bool>() { 1.0 } else { -1.0 };
        let vertical = self.rng.gen_range(-0.25..=0.25_f32) * magnitude;

        let dir = (target - muzzle).normalize_or_zero();
        let perp = Vec2::new(-dir.y, dir.x);
        target + perp * magnitude * sign + Vec2::Y * vertical
    }

    /// Decide the motion mode for a shot toward `target`: ballistic when
    /// forced, or when the straight firing line crosses a force field.
    pub fn wants_ballistic(&self, muzzle: Vec2, target: Vec2, statics: &StaticWorld) -> bool {
        self.force_ballistic
            || statics.segment_crosses_kind(muzzle, target, SurfaceKind::ForceField)
    }

    /// Fire one shot at `target` from `muzzle`. Spawns the projectile,
    /// resets the cadence timer from the noise lane, and returns the entity.
    pub fn fire(
        &mut self,
        world: &mut World,
        events: &mut EventQueue,
        statics: &StaticWorld,
        muzzle: Vec2,
        target: Vec2,
        now_seconds: f32,
    ) -> Option<Entity> {
        let aim = self.pick_aim_point(muzzle, target);
        let damage = Damage::new(self.damage, engine_core::Team::Enemy);

        let entity = if self.wants_ballistic(muzzle, target, statics) {
            let velocity = launch_velocity_for_arc(
                muzzle,
                aim,
                self.settings.projectile_speed,
                self.gravity,
            );
            spawn_projectile(
                world,
                events,
                muzzle,
                velocity,
                self.settings.spin,
                self.projectile_lifetime,
                Projectile::ballistic(self.gravity, damage, self.projectile_radius),
            )
        } else {
            let span = (aim.x - muzzle.x).abs();
            if span < 0.1 {
                log::debug!("enemy shot skipped: target directly overhead");
                return None;
            }
            let wobble = 1.0 + self.rng.gen_range(-1.0..=1.0_f32) * self.settings.height_noise;
            let arc = (self.settings.arc_height * span * wobble).max(0.5);
            spawn_projectile(
                world,
                events,
                muzzle,
                Vec2::ZERO,
                self.settings.spin,
                self.projectile_lifetime,
                Projectile::curve(
                    CurveParams::lob(muzzle, aim, self.settings.projectile_speed, arc),
                    self.gravity,
                    damage,
                    self.projectile_radius,
                ),
            )
        };
        self.cooldown = self.shot_delay(now_seconds);
        Some(entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projectile::MotionMode;
    use engine_core::Team;

    #[test]
    fn perfect_accuracy_never_misses() {
        let settings = AimSettings {
            accuracy: 1.0,
            ..AimSettings::default()
        };
        let mut shooter = EnemyShooter::new(settings, 7);
        let target = Vec2::new(12.0, 0.0);
        for _ in 0..50 {
            assert_eq!(shooter.pick_aim_point(Vec2::ZERO, target), target);
        }
    }

    #[test]
    fn zero_accuracy_misses_within_configured_band() {
        let settings = AimSettings {
            accuracy: 0.0,
            min_miss_distance: 1.0,
            max_miss_distance: 4.0,
            ..AimSettings::default()
        };
        let mut shooter = EnemyShooter::new(settings, 11);
        for _ in 0..200 {
            let magnitude = shooter.roll_miss_magnitude().expect("accuracy 0 always misses");
            assert!(
                (1.0..=4.0).contains(&magnitude),
                "miss magnitude {magnitude} outside [1, 4]"
            );
        }
        // And the produced aim point is genuinely displaced
        let aim = shooter.pick_aim_point(Vec2::ZERO, Vec2::new(10.0, 2.0));
        assert!(aim.distance(Vec2::new(10.0, 2.0)) >= 0.5);
    }

    #[test]
    fn partial_accuracy_miss_band_is_severity_scaled() {
        // accuracy 0.8, min 1, max 4: severity 0.2 gives a miss magnitude
        // in [lerp(0.5, 1, 0.2), lerp(1, 4, 0.2)] = [0.6, 1.6]
        let settings = AimSettings {
            accuracy: 0.8,
            min_miss_distance: 1.0,
            max_miss_distance: 4.0,
            ..AimSettings::default()
        };
        let mut shooter = EnemyShooter::new(settings, 13);
        let mut misses = 0;
        for _ in 0..400 {
            let Some(magnitude) = shooter.roll_miss_magnitude() else {
                continue; // rolled a hit
            };
            misses += 1;
            assert!(
                (0.6..=1.6).contains(&magnitude),
                "miss magnitude {magnitude} outside [0.6, 1.6]"
            );
        }
        // ~20% of 400 rolls; far enough from 0 and 400 to be stable
        assert!((20..=180).contains(&misses), "implausible miss count {misses}");
    }

    #[test]
    fn cadence_respects_floor_and_base_interval() {
        let settings = AimSettings {
            shoot_interval: 0.05, // sanitize floors this to 0.1
            interval_jitter: 0.5,
            ..AimSettings::default()
        };
        let shooter = EnemyShooter::new(settings, 3);
        assert!((shooter.settings().shoot_interval - 0.1).abs() < 1e-6);
        for i in 0..100 {
            let delay = shooter.shot_delay(i as f32 * 0.173);
            assert!(delay >= 0.1);
            assert!(delay <= 0.1 * 1.5 + 1e-5);
        }
    }

    #[test]
    fn cadence_noise_is_coherent_over_time() {
        let shooter = EnemyShooter::new(AimSettings::default(), 17);
        // Nearby samples stay close; the full range is still exercised
        let mut max_step = 0.0_f32;
        let mut prev = shooter.shot_delay(0.0);
        for i in 1..500 {
            let next = shooter.shot_delay(i as f32 * 0.05);
            max_step = max_step.max((next - prev).abs());
            prev = next;
        }
        let base = shooter.settings().shoot_interval;
        assert!(
            max_step < base * 0.2,
            "cadence jumped by {max_step} between adjacent samples"
        );
    }

    #[test]
    fn sanitize_clamps_every_field() {
        let s = AimSettings {
            accuracy: 1.7,
            min_miss_distance: -2.0,
            max_miss_distance: -5.0,
            shoot_interval: 0.0,
            interval_jitter: -1.0,
            projectile_speed: 0.0,
            arc_height: -0.5,
            spin: 3.0,
            height_noise: 9.0,
        }
        .sanitized();
        assert_eq!(s.accuracy, 1.0);
        assert_eq!(s.min_miss_distance, 0.0);
        assert_eq!(s.max_miss_distance, 0.0);
        assert_eq!(s.shoot_interval, 0.1);
        assert_eq!(s.interval_jitter, 0.0);
        assert!(s.projectile_speed > 0.0);
        assert_eq!(s.arc_height, 0.0);
        assert_eq!(s.height_noise, 1.0);
    }

    #[test]
    fn lerp_blends_presets_for_difficulty() {
        let easy = AimSettings {
            accuracy: 0.4,
            shoot_interval: 4.0,
            ..AimSettings::default()
        };
        let hard = AimSettings {
            accuracy: 0.9,
            shoot_interval: 1.0,
            ..AimSettings::default()
        };
        let mid = AimSettings::lerp(&easy, &hard, 0.5);
        assert!((mid.accuracy - 0.65).abs() < 1e-6);
        assert!((mid.shoot_interval - 2.5).abs() < 1e-6);
        // Out-of-range t clamps instead of extrapolating
        let wild = AimSettings::lerp(&easy, &hard, 7.0);
        assert!((wild.accuracy - hard.accuracy).abs() < 1e-6);
    }

    #[test]
    fn force_field_on_the_firing_line_selects_ballistic() {
        let mut statics = StaticWorld::new();
        statics.add_force_field(Vec2::new(5.0, 1.0), Vec2::new(1.0, 2.0));
        let mut shooter = EnemyShooter::new(
            AimSettings {
                accuracy: 1.0,
                ..AimSettings::default()
            },
            23,
        );
        let mut world = World::new();
        let mut events = EventQueue::new();

        let muzzle = Vec2::new(0.0, 1.0);
        let target = Vec2::new(10.0, 1.0);
        assert!(shooter.wants_ballistic(muzzle, target, &statics));
        let entity = shooter
            .fire(&mut world, &mut events, &statics, muzzle, target, 0.0)
            .unwrap();
        let proj = world.get::<&Projectile>(entity).unwrap();
        assert_eq!(proj.mode, MotionMode::Ballistic);
        assert_eq!(proj.damage.source, Team::Enemy);
    }

    #[test]
    fn clear_line_selects_curve_flight() {
        let statics = StaticWorld::new();
        let mut shooter = EnemyShooter::new(
            AimSettings {
                accuracy: 1.0,
                ..AimSettings::default()
            },
            29,
        );
        let mut world = World::new();
        let mut events = EventQueue::new();

        let entity = shooter
            .fire(
                &mut world,
                &mut events,
                &statics,
                Vec2::new(0.0, 1.0),
                Vec2::new(10.0, 1.0),
                0.0,
            )
            .unwrap();
        let proj = world.get::<&Projectile>(entity).unwrap();
        assert_eq!(proj.mode, MotionMode::CurveFlight);
    }

    #[test]
    fn firing_resets_the_cadence_timer() {
        let statics = StaticWorld::new();
        let mut shooter = EnemyShooter::new(AimSettings::default(), 31);
        let mut world = World::new();
        let mut events = EventQueue::new();
        assert!(shooter.ready());
        shooter
            .fire(
                &mut world,
                &mut events,
                &statics,
                Vec2::ZERO,
                Vec2::new(8.0, 0.0),
                1.0,
            )
            .unwrap();
        assert!(!shooter.ready());
        // Tick past the longest possible delay
        let max_delay = shooter.settings().shoot_interval
            * (1.0 + shooter.settings().interval_jitter);
        shooter.update(max_delay + 0.01);
        assert!(shooter.ready());
    }
}
