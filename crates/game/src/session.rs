//! Top-level game session: owns the world, the systems, and tick ordering.
//!
//! Fixed update order per tick: coordinator timed waits (which may trigger
//! the enemy shot) run first, then projectile integration, then the
//! coordinator reacts to the events the tick produced. A fire request
//! always finishes its coordinator bookkeeping before the projectile is
//! first integrated.

use engine_core::{Entity, Health, SimClock, Team, Transform2, Vec2, World};
use physics::StaticWorld;

use crate::config::GameConfig;
use crate::enemy_ai::{AimSettings, EnemyShooter};
use crate::events::{EventQueue, GameEvent};
use crate::projectile::update_projectiles;
use crate::shooter::Shooter;
use crate::stage::Stage;
use crate::turn::{SideStatus, TurnCoordinator, TurnPhase, TurnSignal};

/// Cap on undrained events; oldest are dropped past this.
const MAX_BUFFERED_EVENTS: usize = 1024;

/// A running match.
pub struct GameSession {
    pub world: World,
    pub statics: StaticWorld,
    events: EventQueue,
    coordinator: TurnCoordinator,
    shooter: Shooter,
    enemy_shooters: Vec<(Entity, EnemyShooter)>,
    clock: SimClock,
    player: Entity,
}

impl GameSession {
    pub fn new(stage: &Stage, config: &GameConfig) -> Self {
        Self::new_seeded(stage, config, 0x10b5_407)
    }

    /// Build a session with an explicit RNG seed (deterministic matches).
    pub fn new_seeded(stage: &Stage, config: &GameConfig, seed: u64) -> Self {
        let built = stage.build();
        let gravity = config.signed_gravity();

        let muzzle = stage.player_spawn + Vec2::new(0.0, 0.8);
        let shooter = Shooter {
            muzzle,
            team: Team::Player,
            min_speed: config.player.min_speed,
            max_speed: config.player.max_speed,
            max_charge_distance: config.player.max_charge_distance,
            gravity,
            damage: config.player.damage,
            projectile_radius: config.player.projectile_radius,
            spin: config.player.spin,
            projectile_lifetime: config.player.projectile_lifetime,
        };

        let settings = config.blended_enemy_settings();
        let enemy_shooters = built
            .enemies
            .iter()
            .enumerate()
            .map(|(i, &entity)| {
                let mut es = EnemyShooter::new(settings, seed.wrapping_add(i as u64));
                es.gravity = gravity;
                es.force_ballistic = config.enemy.force_ballistic;
                es.damage = config.enemy.damage;
                es.projectile_radius = config.enemy.projectile_radius;
                es.projectile_lifetime = config.enemy.projectile_lifetime;
                (entity, es)
            })
            .collect();

        Self {
            world: built.world,
            statics: built.statics,
            events: EventQueue::new(),
            coordinator: TurnCoordinator::new(config.turn),
            shooter,
            enemy_shooters,
            clock: SimClock::new(config.sim_hz),
            player: built.player,
        }
    }

    /// Begin the match (idempotent).
    pub fn start(&mut self) {
        self.coordinator.start_game(&mut self.events);
    }

    /// Advance the simulation one fixed tick.
    pub fn tick(&mut self) {
        let dt = self.clock.step();
        self.events.compact(MAX_BUFFERED_EVENTS);
        let mark = self.events.len();

        if let Some(TurnSignal::EnemyShouldFire) = self.coordinator.update(dt, &mut self.events) {
            self.enemy_fire();
        }
        for (_, shooter) in &mut self.enemy_shooters {
            shooter.update(dt);
        }

        update_projectiles(&mut self.world, &self.statics, &mut self.events, dt);

        let new_events = self.events.since(mark).to_vec();
        let status = self.side_status();
        self.coordinator
            .handle_events(&new_events, status, &mut self.events);
    }

    /// Fire a player shot toward `aim`. Rejected while aiming is turn-gated
    /// off; coordinator bookkeeping completes before the next tick moves
    /// the projectile.
    pub fn player_fire(&mut self, aim: Vec2) -> Option<Entity> {
        if !self.coordinator.player_can_fire() {
            log::debug!("fire request ignored: aiming not permitted");
            return None;
        }
        let entity = self.shooter.fire(&mut self.world, &mut self.events, aim)?;
        self.coordinator.on_player_fired(entity);
        Some(entity)
    }

    // ── Aim-preview query surface ───────────────────────────────────────

    /// Whether manual aiming is currently permitted (turn-gated).
    pub fn aiming_permitted(&self) -> bool {
        self.coordinator.player_can_fire()
    }

    /// Predicted launch velocity for a candidate aim point.
    pub fn predict_player_velocity(&self, aim: Vec2) -> Vec2 {
        self.shooter.predict_velocity(aim)
    }

    /// Forward-sampled preview of the resulting flight path.
    pub fn predict_player_path(&self, aim: Vec2) -> Vec<Vec2> {
        self.shooter.predict_path(aim, self.clock.fixed_dt(), 6.0)
    }

    /// Signed gravity applied to player shots.
    pub fn gravity(&self) -> f32 {
        self.shooter.gravity
    }

    /// The player's muzzle position in world space.
    pub fn muzzle_position(&self) -> Vec2 {
        self.shooter.muzzle
    }

    // ── State queries ───────────────────────────────────────────────────

    pub fn phase(&self) -> TurnPhase {
        self.coordinator.phase()
    }

    pub fn is_over(&self) -> bool {
        self.coordinator.is_ended()
    }

    pub fn tracked_projectile(&self) -> Option<Entity> {
        self.coordinator.tracked_projectile()
    }

    pub fn player(&self) -> Entity {
        self.player
    }

    pub fn elapsed_seconds(&self) -> f32 {
        self.clock.elapsed_seconds()
    }

    /// Pull everything the simulation reported since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    /// Push new aim settings to every enemy shooter (difficulty change).
    /// The clamp pass runs inside `apply_settings`.
    pub fn apply_enemy_settings(&mut self, settings: AimSettings) {
        for (_, shooter) in &mut self.enemy_shooters {
            shooter.apply_settings(settings);
        }
    }

    // ── Internals ───────────────────────────────────────────────────────

    /// Attempt the enemy shot the coordinator asked for. The first living
    /// enemy fires at the player; inability to fire forfeits the turn.
    fn enemy_fire(&mut self) {
        let target = self
            .world
            .get::<&Transform2>(self.player)
            .ok()
            .map(|t| t.position);
        let Some(target) = target else {
            self.coordinator.on_enemy_fire_failed(&mut self.events);
            return;
        };
        let now = self.clock.elapsed_seconds();

        for (entity, shooter) in &mut self.enemy_shooters {
            let alive = self
                .world
                .get::<&Health>(*entity)
                .map(|h| !h.is_dead())
                .unwrap_or(false);
            if !alive {
                continue;
            }
            let Some(pos) = self
                .world
                .get::<&Transform2>(*entity)
                .ok()
                .map(|t| t.position)
            else {
                continue;
            };
            let muzzle = pos + shooter.muzzle_offset;
            if let Some(projectile) = shooter.fire(
                &mut self.world,
                &mut self.events,
                &self.statics,
                muzzle,
                target,
                now,
            ) {
                self.coordinator.on_enemy_fired(projectile);
                return;
            }
        }
        self.coordinator.on_enemy_fire_failed(&mut self.events);
    }

    fn side_status(&self) -> SideStatus {
        let player_alive = self
            .world
            .get::<&Health>(self.player)
            .map(|h| !h.is_dead())
            .unwrap_or(false);
        let enemies_alive = self
            .world
            .query::<&Health>()
            .iter()
            .filter(|(_, h)| h.team == Team::Enemy && !h.is_dead())
            .count();
        SideStatus {
            player_alive,
            enemies_alive,
        }
    }
}
