//! Turn coordinator: sequences player and enemy shots around projectile
//! lifetimes.
//!
//! The coordinator owns at most one tracked projectile at a time and moves
//! through phases only in response to fire events, projectile-destroyed
//! events, or its own fixed transition delays. Timed waits are explicit
//! (kind, remaining) slots with cancel-and-replace semantics: starting a
//! wait overwrites whatever was pending, so duplicate routines can never
//! run against the same state.

use engine_core::{Entity, Team};
use serde::{Deserialize, Serialize};

use crate::events::{EventQueue, GameEvent};

/// Current phase of the turn loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    PlayerTurn,
    EnemyTurn,
    TurnTransition,
    GameOver,
    StageCleared,
}

/// Fixed delays for the turn loop.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TurnTuning {
    /// Seconds a side spends standing upright before it may fire.
    pub stand_up_seconds: f32,
    /// Pause between a projectile dying and the next turn starting.
    pub transition_seconds: f32,
    /// Seconds into the enemy turn before the enemy shoots.
    pub enemy_fire_delay: f32,
    /// If the enemy never manages to fire, hand control back to the player
    /// after this long instead of stalling the loop.
    pub enemy_turn_timeout: f32,
}

impl Default for TurnTuning {
    fn default() -> Self {
        Self {
            stand_up_seconds: 0.6,
            transition_seconds: 1.0,
            enemy_fire_delay: 0.8,
            enemy_turn_timeout: 4.0,
        }
    }
}

/// What the coordinator asks its caller to do after a timed wait elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnSignal {
    /// The enemy-side pre-fire delay finished: attempt the enemy shot now,
    /// then report back via `on_enemy_fired` / `on_enemy_fire_failed`.
    EnemyShouldFire,
}

/// Liveness snapshot the caller computes once per tick.
#[derive(Debug, Clone, Copy)]
pub struct SideStatus {
    pub player_alive: bool,
    pub enemies_alive: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WaitKind {
    /// Stand-upright routine; firing stays disabled until it completes.
    StandUp,
    /// Inter-turn pause, then enter `transition_next`.
    Transition,
    /// Enemy pre-fire delay.
    EnemyPrep,
    /// Watchdog for an enemy shot that never happened.
    EnemyTimeout,
}

/// The turn state machine.
#[derive(Debug)]
pub struct TurnCoordinator {
    phase: TurnPhase,
    started: bool,
    ended: bool,
    player_fire_enabled: bool,
    /// The single in-flight projectile being watched, with the side that
    /// fired it. Tracking a new one replaces the old; destroy events from
    /// anything else are ignored.
    tracked: Option<(Entity, Team)>,
    /// At most one pending timed wait; starting another replaces it.
    wait: Option<(WaitKind, f32)>,
    transition_next: TurnPhase,
    tuning: TurnTuning,
}

impl TurnCoordinator {
    pub fn new(tuning: TurnTuning) -> Self {
        Self {
            phase: TurnPhase::PlayerTurn,
            started: false,
            ended: false,
            player_fire_enabled: false,
            tracked: None,
            wait: None,
            transition_next: TurnPhase::PlayerTurn,
            tuning,
        }
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Whether manual aiming/firing is currently permitted: the player's
    /// turn, stand-up complete, and no shot already in flight.
    pub fn player_can_fire(&self) -> bool {
        self.started
            && !self.ended
            && self.phase == TurnPhase::PlayerTurn
            && self.player_fire_enabled
            && self.tracked.is_none()
    }

    /// The projectile currently being watched, if any.
    pub fn tracked_projectile(&self) -> Option<Entity> {
        self.tracked.map(|(entity, _)| entity)
    }

    /// Begin (or restart) the match. Idempotent while a game is running;
    /// a finished coordinator stays finished.
    pub fn start_game(&mut self, events: &mut EventQueue) {
        if self.started || self.ended {
            return;
        }
        self.started = true;
        events.push(GameEvent::GameStarted);
        self.enter_player_turn(events);
    }

    /// Record the player's shot. Must be called before the projectile is
    /// first ticked so bookkeeping (fire disable, tracking) precedes flight.
    pub fn on_player_fired(&mut self, projectile: Entity) {
        if !self.player_can_fire() {
            log::debug!("player fire recorded outside a fireable state; ignoring");
            return;
        }
        self.player_fire_enabled = false;
        self.track(projectile, Team::Player);
    }

    /// Record the enemy's shot; cancels the enemy watchdog.
    pub fn on_enemy_fired(&mut self, projectile: Entity) {
        if !self.started || self.ended || self.phase != TurnPhase::EnemyTurn {
            return;
        }
        self.wait = None;
        self.track(projectile, Team::Enemy);
    }

    /// The enemy tried to fire and could not (no shooter, no target). The
    /// turn is forfeited back to the player rather than deadlocking.
    pub fn on_enemy_fire_failed(&mut self, events: &mut EventQueue) {
        if !self.started || self.ended || self.phase != TurnPhase::EnemyTurn {
            return;
        }
        log::debug!("enemy turn skipped: unable to fire");
        self.begin_transition(TurnPhase::PlayerTurn, events);
    }

    /// Advance pending timed waits. Returns a signal when the caller has
    /// work to do this tick.
    pub fn update(&mut self, dt: f32, events: &mut EventQueue) -> Option<TurnSignal> {
        if !self.started || self.ended {
            return None;
        }
        let (kind, remaining) = self.wait.as_mut()?;
        *remaining -= dt;
        if *remaining > 0.0 {
            return None;
        }
        let kind = *kind;
        self.wait = None;
        match kind {
            WaitKind::StandUp => {
                if self.phase == TurnPhase::PlayerTurn {
                    self.player_fire_enabled = true;
                }
                None
            }
            WaitKind::EnemyPrep => {
                // Arm the watchdog before asking; a successful fire or an
                // explicit failure report replaces it.
                self.wait = Some((WaitKind::EnemyTimeout, self.tuning.enemy_turn_timeout));
                Some(TurnSignal::EnemyShouldFire)
            }
            WaitKind::EnemyTimeout => {
                log::warn!("enemy turn timed out without a shot; returning to player");
                self.begin_transition(TurnPhase::PlayerTurn, events);
                None
            }
            WaitKind::Transition => {
                match self.transition_next {
                    TurnPhase::PlayerTurn => self.enter_player_turn(events),
                    TurnPhase::EnemyTurn => self.enter_enemy_turn(events),
                    _ => {}
                }
                None
            }
        }
    }

    /// React to this tick's events and the liveness snapshot: untrack the
    /// watched projectile when it dies, and resolve end-of-game.
    pub fn handle_events(
        &mut self,
        new_events: &[GameEvent],
        status: SideStatus,
        events: &mut EventQueue,
    ) {
        if !self.started || self.ended {
            return;
        }
        for event in new_events {
            if let GameEvent::ProjectileDestroyed { entity, .. } = event {
                let Some((tracked, team)) = self.tracked else {
                    continue;
                };
                if tracked != *entity {
                    continue; // stale: a replaced projectile's late event
                }
                self.tracked = None;
                let next = match team {
                    Team::Player => TurnPhase::EnemyTurn,
                    _ => TurnPhase::PlayerTurn,
                };
                self.begin_transition(next, events);
            }
        }

        if !status.player_alive {
            self.finish(false, events);
        } else if status.enemies_alive == 0 {
            self.finish(true, events);
        }
    }

    fn track(&mut self, projectile: Entity, team: Team) {
        if let Some((old, _)) = self.tracked {
            // Replacing implicitly unsubscribes: old's destroy event will
            // no longer match.
            log::debug!("replacing tracked projectile {old:?}");
        }
        self.tracked = Some((projectile, team));
    }

    fn enter(&mut self, phase: TurnPhase, events: &mut EventQueue) {
        self.phase = phase;
        events.push(GameEvent::TurnChanged { phase });
    }

    fn enter_player_turn(&mut self, events: &mut EventQueue) {
        self.enter(TurnPhase::PlayerTurn, events);
        // Firing stays off until the stand-up routine finishes; a fire
        // request arriving earlier is ignored, not queued.
        self.player_fire_enabled = false;
        self.wait = Some((WaitKind::StandUp, self.tuning.stand_up_seconds));
    }

    fn enter_enemy_turn(&mut self, events: &mut EventQueue) {
        self.enter(TurnPhase::EnemyTurn, events);
        self.wait = Some((WaitKind::EnemyPrep, self.tuning.enemy_fire_delay));
    }

    fn begin_transition(&mut self, next: TurnPhase, events: &mut EventQueue) {
        self.transition_next = next;
        self.enter(TurnPhase::TurnTransition, events);
        self.wait = Some((WaitKind::Transition, self.tuning.transition_seconds));
    }

    fn finish(&mut self, victory: bool, events: &mut EventQueue) {
        if self.ended {
            return;
        }
        self.ended = true;
        self.wait = None;
        self.tracked = None;
        self.player_fire_enabled = false;
        if victory {
            self.enter(TurnPhase::StageCleared, events);
            events.push(GameEvent::StageCleared);
        } else {
            self.enter(TurnPhase::GameOver, events);
            events.push(GameEvent::PlayerDefeated);
        }
        events.push(GameEvent::GameEnded { victory });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::{Vec2, World};

    const DT: f32 = 1.0 / 60.0;

    fn alive() -> SideStatus {
        SideStatus {
            player_alive: true,
            enemies_alive: 1,
        }
    }

    fn dummy_entity(world: &mut World) -> Entity {
        world.spawn((Vec2::ZERO,))
    }

    fn run_seconds(coord: &mut TurnCoordinator, events: &mut EventQueue, seconds: f32) -> Vec<TurnSignal> {
        let mut signals = Vec::new();
        let ticks = (seconds / DT).ceil() as usize;
        for _ in 0..ticks {
            if let Some(s) = coord.update(DT, events) {
                signals.push(s);
            }
            coord.handle_events(&[], alive(), events);
        }
        signals
    }

    fn phases(events: &[GameEvent]) -> Vec<TurnPhase> {
        events
            .iter()
            .filter_map(|e| match e {
                GameEvent::TurnChanged { phase } => Some(*phase),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn firing_is_gated_until_stand_up_completes() {
        let mut coord = TurnCoordinator::new(TurnTuning::default());
        let mut events = EventQueue::new();
        coord.start_game(&mut events);
        assert_eq!(coord.phase(), TurnPhase::PlayerTurn);
        assert!(!coord.player_can_fire());

        run_seconds(&mut coord, &mut events, 0.7);
        assert!(coord.player_can_fire());
    }

    #[test]
    fn fire_before_stand_up_is_ignored_not_queued() {
        let mut world = World::new();
        let mut coord = TurnCoordinator::new(TurnTuning::default());
        let mut events = EventQueue::new();
        coord.start_game(&mut events);

        let early = dummy_entity(&mut world);
        coord.on_player_fired(early);
        assert_eq!(coord.tracked_projectile(), None);

        run_seconds(&mut coord, &mut events, 0.7);
        assert!(coord.player_can_fire());
    }

    #[test]
    fn full_turn_sequence_never_skips_transition() {
        let mut world = World::new();
        let mut coord = TurnCoordinator::new(TurnTuning::default());
        let mut events = EventQueue::new();
        coord.start_game(&mut events);
        run_seconds(&mut coord, &mut events, 0.7);

        let shot = dummy_entity(&mut world);
        coord.on_player_fired(shot);
        assert_eq!(coord.tracked_projectile(), Some(shot));
        assert!(!coord.player_can_fire());

        // Projectile dies; coordinator should pass through TurnTransition
        coord.handle_events(
            &[GameEvent::ProjectileDestroyed {
                entity: shot,
                team: Team::Player,
                position: Vec2::ZERO,
            }],
            alive(),
            &mut events,
        );
        assert_eq!(coord.phase(), TurnPhase::TurnTransition);
        assert_eq!(coord.tracked_projectile(), None);

        run_seconds(&mut coord, &mut events, 1.1);
        assert_eq!(coord.phase(), TurnPhase::EnemyTurn);

        let seen = phases(&events.drain());
        assert_eq!(
            seen,
            vec![
                TurnPhase::PlayerTurn,
                TurnPhase::TurnTransition,
                TurnPhase::EnemyTurn
            ]
        );
    }

    #[test]
    fn at_most_one_projectile_is_tracked() {
        let mut world = World::new();
        let mut coord = TurnCoordinator::new(TurnTuning::default());
        let mut events = EventQueue::new();
        coord.start_game(&mut events);
        run_seconds(&mut coord, &mut events, 0.7);

        let first = dummy_entity(&mut world);
        let second = dummy_entity(&mut world);
        coord.on_player_fired(first);
        // Force-track a replacement the way the enemy path would
        coord.tracked = Some((second, Team::Player));

        // The stale projectile's destroy event must not advance the turn
        coord.handle_events(
            &[GameEvent::ProjectileDestroyed {
                entity: first,
                team: Team::Player,
                position: Vec2::ZERO,
            }],
            alive(),
            &mut events,
        );
        assert_eq!(coord.phase(), TurnPhase::PlayerTurn);
        assert_eq!(coord.tracked_projectile(), Some(second));
    }

    #[test]
    fn enemy_turn_requests_fire_then_tracks() {
        let mut world = World::new();
        let mut coord = TurnCoordinator::new(TurnTuning::default());
        let mut events = EventQueue::new();
        coord.start_game(&mut events);
        run_seconds(&mut coord, &mut events, 0.7);

        let shot = dummy_entity(&mut world);
        coord.on_player_fired(shot);
        coord.handle_events(
            &[GameEvent::ProjectileDestroyed {
                entity: shot,
                team: Team::Player,
                position: Vec2::ZERO,
            }],
            alive(),
            &mut events,
        );
        // Transition, then the enemy pre-fire delay
        let signals = run_seconds(&mut coord, &mut events, 2.0);
        assert_eq!(signals, vec![TurnSignal::EnemyShouldFire]);

        let reply = dummy_entity(&mut world);
        coord.on_enemy_fired(reply);
        assert_eq!(coord.tracked_projectile(), Some(reply));

        coord.handle_events(
            &[GameEvent::ProjectileDestroyed {
                entity: reply,
                team: Team::Enemy,
                position: Vec2::ZERO,
            }],
            alive(),
            &mut events,
        );
        run_seconds(&mut coord, &mut events, 1.1);
        assert_eq!(coord.phase(), TurnPhase::PlayerTurn);
    }

    #[test]
    fn enemy_fire_failure_returns_control_to_player() {
        let mut coord = TurnCoordinator::new(TurnTuning::default());
        let mut events = EventQueue::new();
        coord.start_game(&mut events);
        // Drive into the enemy turn by hand
        coord.phase = TurnPhase::EnemyTurn;
        coord.wait = Some((WaitKind::EnemyPrep, 0.1));

        let signals = run_seconds(&mut coord, &mut events, 0.2);
        assert_eq!(signals, vec![TurnSignal::EnemyShouldFire]);
        coord.on_enemy_fire_failed(&mut events);
        assert_eq!(coord.phase(), TurnPhase::TurnTransition);

        run_seconds(&mut coord, &mut events, 1.1);
        assert_eq!(coord.phase(), TurnPhase::PlayerTurn);
    }

    #[test]
    fn silent_enemy_is_timed_out() {
        let mut coord = TurnCoordinator::new(TurnTuning::default());
        let mut events = EventQueue::new();
        coord.start_game(&mut events);
        coord.phase = TurnPhase::EnemyTurn;
        coord.wait = Some((WaitKind::EnemyPrep, 0.1));

        // Fire request issued but never answered; the watchdog fires
        let signals = run_seconds(&mut coord, &mut events, 6.0);
        assert_eq!(signals, vec![TurnSignal::EnemyShouldFire]);
        assert_eq!(coord.phase(), TurnPhase::PlayerTurn);
    }

    #[test]
    fn player_death_ends_the_game() {
        let mut coord = TurnCoordinator::new(TurnTuning::default());
        let mut events = EventQueue::new();
        coord.start_game(&mut events);
        coord.handle_events(
            &[],
            SideStatus {
                player_alive: false,
                enemies_alive: 2,
            },
            &mut events,
        );
        assert_eq!(coord.phase(), TurnPhase::GameOver);
        let drained = events.drain();
        assert!(drained.contains(&GameEvent::PlayerDefeated));
        assert!(drained.contains(&GameEvent::GameEnded { victory: false }));
        assert!(!drained.contains(&GameEvent::StageCleared));
    }

    #[test]
    fn clearing_all_enemies_wins_the_stage() {
        let mut coord = TurnCoordinator::new(TurnTuning::default());
        let mut events = EventQueue::new();
        coord.start_game(&mut events);
        coord.handle_events(
            &[],
            SideStatus {
                player_alive: true,
                enemies_alive: 0,
            },
            &mut events,
        );
        assert_eq!(coord.phase(), TurnPhase::StageCleared);
        let drained = events.drain();
        assert!(drained.contains(&GameEvent::StageCleared));
        assert!(drained.contains(&GameEvent::GameEnded { victory: true }));
    }

    #[test]
    fn end_states_are_terminal_and_idempotent() {
        let mut coord = TurnCoordinator::new(TurnTuning::default());
        let mut events = EventQueue::new();
        coord.start_game(&mut events);
        let dead = SideStatus {
            player_alive: false,
            enemies_alive: 1,
        };
        coord.handle_events(&[], dead, &mut events);
        let after_first = events.len();
        coord.handle_events(&[], dead, &mut events);
        assert_eq!(events.len(), after_first);

        // A finished coordinator refuses to restart
        coord.start_game(&mut events);
        assert_eq!(coord.phase(), TurnPhase::GameOver);
        assert!(coord.update(DT, &mut events).is_none());
    }

    #[test]
    fn methods_are_no_ops_before_start() {
        let mut world = World::new();
        let mut coord = TurnCoordinator::new(TurnTuning::default());
        let mut events = EventQueue::new();
        assert!(!coord.player_can_fire());
        coord.on_player_fired(dummy_entity(&mut world));
        assert_eq!(coord.tracked_projectile(), None);
        assert!(coord.update(DT, &mut events).is_none());
        assert!(events.is_empty());
    }

    #[test]
    fn start_game_is_idempotent_while_running() {
        let mut coord = TurnCoordinator::new(TurnTuning::default());
        let mut events = EventQueue::new();
        coord.start_game(&mut events);
        let after_first = events.len();
        coord.start_game(&mut events);
        assert_eq!(events.len(), after_first);
    }

    #[test]
    fn reentering_player_turn_replaces_the_stand_up_wait() {
        let mut coord = TurnCoordinator::new(TurnTuning::default());
        let mut events = EventQueue::new();
        coord.start_game(&mut events);
        run_seconds(&mut coord, &mut events, 0.3);
        // Re-enter mid-stand-up: the wait restarts from the top
        coord.enter_player_turn(&mut events);
        run_seconds(&mut coord, &mut events, 0.4);
        assert!(!coord.player_can_fire());
        run_seconds(&mut coord, &mut events, 0.3);
        assert!(coord.player_can_fire());
    }
}
