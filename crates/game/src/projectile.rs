//! Projectile trajectory engine.
//!
//! Each projectile runs one of two mutually exclusive motion modes, picked
//! at spawn: curve flight (deterministic, sampled-curve-governed path toward
//! a target point) or ballistic flight (semi-implicit Euler under gravity).
//! The only mode change ever allowed is the one-way bounce transition out of
//! curve flight; once bounced a projectile is ballistic for the rest of its
//! life.

use engine_core::{BodyCircle, Curve, Damage, Entity, Health, Lifetime, Team, Transform2, Vec2,
    Velocity2, World};
use physics::{reflect, StaticWorld, SurfaceKind};

use crate::events::{EventQueue, GameEvent};

/// Seconds a bounce pad stays inert for a projectile after reflecting it,
/// so one contact cannot re-trigger across consecutive physics steps.
const BOUNCE_COOLDOWN: f32 = 0.1;
/// Start and target closer than this horizontally cannot parameterize a
/// curve; such a projectile is discarded instead of dividing by zero.
const MIN_CURVE_SPAN: f32 = 0.1;

/// How a projectile moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionMode {
    /// Path fully determined by sampled curves of horizontal progress;
    /// physical forces are ignored.
    CurveFlight,
    /// Newtonian flight: gravity integrates into velocity, velocity into
    /// position. Spin stays cosmetic.
    Ballistic,
}

/// Parameterization of a curve-mode trajectory.
#[derive(Debug, Clone)]
pub struct CurveParams {
    pub start: Vec2,
    pub target: Vec2,
    /// Horizontal speed scale (world units per second at speed-curve = 1).
    pub max_speed: f32,
    /// Peak height of the arc above the start-to-target baseline.
    pub arc_height: f32,
    /// Trajectory silhouette over progress in [0, 1].
    pub height_curve: Curve,
    /// Additive correction term over progress (usually zero).
    pub correction_curve: Curve,
    /// Horizontal speed multiplier over progress.
    pub speed_curve: Curve,
    /// Distance to the target at which the projectile counts as arrived.
    pub arrive_radius: f32,
}

impl CurveParams {
    /// The standard lob: bell-shaped height, constant speed, no correction.
    pub fn lob(start: Vec2, target: Vec2, max_speed: f32, arc_height: f32) -> Self {
        Self {
            start,
            target,
            max_speed,
            arc_height,
            height_curve: Curve::bell(),
            correction_curve: Curve::constant(0.0),
            speed_curve: Curve::constant(1.0),
            arrive_radius: 0.25,
        }
    }
}

#[derive(Debug, Clone)]
struct CurveState {
    params: CurveParams,
    /// Normalized horizontal progress from start (0) to target (1).
    progress: f32,
}

/// Bounce-pad response tuning.
#[derive(Debug, Clone, Copy)]
pub struct BounceSettings {
    /// Outgoing speed as a fraction of incoming speed.
    pub restitution: f32,
    /// Floor on outgoing speed so a slow contact never produces a dead
    /// bounce that drops straight down.
    pub min_speed: f32,
}

impl Default for BounceSettings {
    fn default() -> Self {
        Self {
            restitution: 0.8,
            min_speed: 2.0,
        }
    }
}

/// Projectile component. Spawn via [`spawn_projectile`] so the spawned
/// entity always carries the full component set and the spawn event.
#[derive(Debug, Clone)]
pub struct Projectile {
    pub mode: MotionMode,
    /// Signed y acceleration applied in ballistic mode (negative is down).
    pub gravity: f32,
    pub damage: Damage,
    /// Collision radius.
    pub radius: f32,
    /// Destroy on contact with a damageable opponent.
    pub destroy_on_hit: bool,
    /// Destroy on contact with ground (walls always destroy).
    pub destroy_on_ground: bool,
    pub bounce: BounceSettings,
    curve: Option<CurveState>,
    has_bounced: bool,
    bounce_cooldown: f32,
    destroyed: bool,
    /// Entities already damaged by this projectile; an overlap lasting
    /// several ticks still damages once per collision event.
    hit_entities: Vec<Entity>,
}

impl Projectile {
    /// Ballistic projectile; pair with an initial velocity at spawn.
    pub fn ballistic(gravity: f32, damage: Damage, radius: f32) -> Self {
        Self {
            mode: MotionMode::Ballistic,
            gravity,
            damage,
            radius,
            destroy_on_hit: true,
            destroy_on_ground: true,
            bounce: BounceSettings::default(),
            curve: None,
            has_bounced: false,
            bounce_cooldown: 0.0,
            destroyed: false,
            hit_entities: Vec::new(),
        }
    }

    /// Curve-mode projectile. All curve parameters are required up front;
    /// there is no partially-initialized tickable state.
    pub fn curve(params: CurveParams, gravity: f32, damage: Damage, radius: f32) -> Self {
        Self {
            mode: MotionMode::CurveFlight,
            curve: Some(CurveState {
                params,
                progress: 0.0,
            }),
            ..Self::ballistic(gravity, damage, radius)
        }
    }

    /// Whether this projectile has taken the one-way bounce transition.
    pub fn has_bounced(&self) -> bool {
        self.has_bounced
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Flip the destroy guard. True only on the first call; racing destroy
    /// paths (ground hit + lifetime expiry in one tick) collapse to one.
    fn mark_destroyed(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        self.destroyed = true;
        true
    }
}

/// Spawn a projectile entity with its full component set and emit the
/// spawn event. Curve-mode projectiles ignore `velocity` (their velocity is
/// inferred from positional deltas each tick).
pub fn spawn_projectile(
    world: &mut World,
    events: &mut EventQueue,
    origin: Vec2,
    velocity: Vec2,
    spin: f32,
    lifetime_seconds: f32,
    projectile: Projectile,
) -> Entity {
    let team = projectile.damage.source;
    let entity = world.spawn((
        projectile,
        Transform2::from_position(origin),
        Velocity2::with_spin(velocity, spin),
        Lifetime::new(lifetime_seconds),
    ));
    events.push(GameEvent::ProjectileSpawned { entity, team });
    entity
}

/// Advance every projectile one tick: integrate motion, resolve contacts,
/// apply damage, and despawn anything destroyed. Exactly one
/// `ProjectileDestroyed` event is emitted per projectile.
pub fn update_projectiles(
    world: &mut World,
    statics: &StaticWorld,
    events: &mut EventQueue,
    dt: f32,
) {
    // Snapshot damageable bodies so the mutable projectile pass can
    // overlap-test them without aliasing the world borrow.
    let targets: Vec<(Entity, Vec2, f32, Team)> = world
        .query::<(&Transform2, &Health, &BodyCircle)>()
        .iter()
        .filter(|(_, (_, health, _))| !health.is_dead())
        .map(|(e, (t, health, body))| (e, t.position, body.radius, health.team))
        .collect();

    let mut impacts: Vec<(Entity, f32, Team)> = Vec::new();
    let mut despawns: Vec<Entity> = Vec::new();

    for (entity, (proj, transform, velocity, lifetime)) in world
        .query_mut::<(&mut Projectile, &mut Transform2, &mut Velocity2, &mut Lifetime)>()
    {
        if proj.destroyed {
            despawns.push(entity);
            continue;
        }
        proj.bounce_cooldown = (proj.bounce_cooldown - dt).max(0.0);

        // ── Integrate ───────────────────────────────────────────────────
        let prev = transform.position;
        match proj.mode {
            MotionMode::CurveFlight => {
                // A curve projectile without a usable parameterization
                // cannot tick; discard it instead of guessing at a path.
                match proj.curve.as_mut() {
                    Some(state)
                        if (state.params.target.x - state.params.start.x).abs()
                            >= MIN_CURVE_SPAN =>
                    {
                        step_curve(state, transform, dt);
                        // Curve flight has no integrated velocity; infer it
                        // from the positional delta so bounces and spin have
                        // something to use.
                        velocity.linear = (transform.position - prev) / dt;
                    }
                    state => {
                        if state.is_some() {
                            log::warn!("curve projectile with degenerate span; discarding");
                        } else {
                            log::warn!("curve-mode projectile without curve state; discarding");
                        }
                        if proj.mark_destroyed() {
                            events.push(GameEvent::ProjectileDestroyed {
                                entity,
                                team: proj.damage.source,
                                position: transform.position,
                            });
                            despawns.push(entity);
                        }
                        continue;
                    }
                }
            }
            MotionMode::Ballistic => {
                velocity.linear.y += proj.gravity * dt;
                transform.position += velocity.linear * dt;
            }
        }
        transform.rotation += velocity.angular * dt;

        let mut dead = false;

        // ── Opponent contact ────────────────────────────────────────────
        for &(target, pos, radius, team) in &targets {
            if proj.hit_entities.contains(&target) {
                continue;
            }
            if !team.accepts_damage_from(proj.damage.source) {
                continue; // friendly body; pass through without interacting
            }
            if transform.position.distance(pos) <= proj.radius + radius {
                proj.hit_entities.push(target);
                impacts.push((target, proj.damage.amount, proj.damage.source));
                if proj.destroy_on_hit {
                    dead = true;
                }
            }
        }

        // ── Target arrival (curve mode) ─────────────────────────────────
        if let Some(state) = proj.curve.as_ref() {
            if transform.position.distance(state.params.target) <= state.params.arrive_radius {
                dead = true;
            }
        }

        // ── Static geometry ─────────────────────────────────────────────
        if !dead {
            if let Some(hit) = statics.circle_contact(transform.position, proj.radius) {
                match hit.kind {
                    SurfaceKind::BouncePad => {
                        if proj.bounce_cooldown <= 0.0 {
                            let speed = velocity.linear.length();
                            let dir = reflect(velocity.linear, hit.contact.normal)
                                .normalize_or_zero();
                            let out_speed =
                                (speed * proj.bounce.restitution).max(proj.bounce.min_speed);
                            velocity.linear = dir * out_speed;
                            // Clear the penetration so next tick starts free
                            transform.position += hit.contact.normal * hit.contact.depth;
                            proj.bounce_cooldown = BOUNCE_COOLDOWN;
                            if proj.mode == MotionMode::CurveFlight {
                                // One-way transition: gravity owns the
                                // trajectory from here on.
                                proj.mode = MotionMode::Ballistic;
                                proj.curve = None;
                                proj.has_bounced = true;
                            }
                        }
                    }
                    SurfaceKind::Ground => {
                        if proj.destroy_on_ground {
                            dead = true;
                        } else {
                            transform.position += hit.contact.normal * hit.contact.depth;
                            velocity.linear = Vec2::ZERO;
                        }
                    }
                    SurfaceKind::Wall => dead = true,
                    SurfaceKind::ForceField => {} // sensors never contact
                }
            }
        }

        // ── Lifetime ────────────────────────────────────────────────────
        if lifetime.update(dt) {
            dead = true;
        }

        if dead && proj.mark_destroyed() {
            events.push(GameEvent::ProjectileDestroyed {
                entity,
                team: proj.damage.source,
                position: transform.position,
            });
            despawns.push(entity);
        }
    }

    // ── Apply damage after the projectile pass ──────────────────────────
    for (target, amount, source) in impacts {
        let outcome = world.get::<&mut Health>(target).ok().map(|mut health| {
            let result = health.take_damage(amount, source);
            (result, health.current, health.max, health.team)
        });
        if let Some((result, current, max, team)) = outcome {
            use engine_core::DamageResult::*;
            match result {
                Blocked => {}
                Damaged => {
                    events.push(GameEvent::HealthChanged {
                        entity: target,
                        current,
                        max,
                    });
                    events.push(GameEvent::Damaged {
                        entity: target,
                        amount,
                    });
                }
                Killed => {
                    events.push(GameEvent::HealthChanged {
                        entity: target,
                        current,
                        max,
                    });
                    events.push(GameEvent::Damaged {
                        entity: target,
                        amount,
                    });
                    events.push(GameEvent::Died {
                        entity: target,
                        team,
                    });
                }
            }
        }
    }

    for entity in despawns {
        world.despawn(entity).ok();
    }
}

/// Advance curve-mode motion one tick.
fn step_curve(state: &mut CurveState, transform: &mut Transform2, dt: f32) {
    let dx_total = state.params.target.x - state.params.start.x;
    let span = dx_total.abs();
    let rate = state.params.speed_curve.sample(state.progress).max(0.0) * state.params.max_speed;
    state.progress = (state.progress + rate * dt / span).min(1.0);

    let p = &state.params;
    let x = p.start.x + dx_total * state.progress;
    let base_y = p.start.y + (p.target.y - p.start.y) * state.progress;
    let y = base_y
        + p.height_curve.sample(state.progress) * p.arc_height
        + p.correction_curve.sample(state.progress);
    transform.position = Vec2::new(x, y);
}
