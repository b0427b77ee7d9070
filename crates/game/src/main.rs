//! Lobshot headless runner: plays a scripted artillery duel to completion
//! and logs every gameplay event. Rendering/audio frontends consume the
//! same session API; this binary exists to watch a match without them.

use anyhow::Result;
use engine_core::{Health, Team, Transform2, Vec2};
use game::{launch_velocity_for_arc, GameConfig, GameEvent, GameSession, Stage, TurnPhase};

/// Ticks before the runner gives up on a match (safety for bad configs).
const MAX_TICKS: u64 = 120_000;

fn main() -> Result<()> {
    env_logger::init();

    let config = GameConfig::load();
    let stage = Stage::duel();
    let mut session = GameSession::new(&stage, &config);
    session.start();

    let mut ticks: u64 = 0;
    while !session.is_over() && ticks < MAX_TICKS {
        if session.aiming_permitted() {
            if let Some(target) = first_living_enemy(&session) {
                let aim = solver_aim(&session, target, &config);
                session.player_fire(aim);
            }
        }
        session.tick();
        ticks += 1;

        for event in session.drain_events() {
            report(&session, event);
        }
    }

    match session.phase() {
        TurnPhase::StageCleared => log::info!("stage cleared in {:.1}s", session.elapsed_seconds()),
        TurnPhase::GameOver => log::info!("defeated after {:.1}s", session.elapsed_seconds()),
        other => log::warn!("match did not resolve (phase {other:?} after {ticks} ticks)"),
    }
    Ok(())
}

/// Position of the first enemy still standing.
fn first_living_enemy(session: &GameSession) -> Option<Vec2> {
    session
        .world
        .query::<(&Transform2, &Health)>()
        .iter()
        .find(|(_, (_, h))| h.team == Team::Enemy && !h.is_dead())
        .map(|(_, (t, _))| t.position)
}

/// Pick the aim point whose charged launch reproduces a solver arc onto the
/// target, so the scripted player shoots like a competent human.
fn solver_aim(session: &GameSession, target: Vec2, config: &GameConfig) -> Vec2 {
    let muzzle = session.muzzle_position();
    let want = launch_velocity_for_arc(muzzle, target, 18.0, session.gravity().abs());
    let speed = want
        .length()
        .clamp(config.player.min_speed, config.player.max_speed);
    let t = (speed - config.player.min_speed)
        / (config.player.max_speed - config.player.min_speed).max(f32::EPSILON);
    let charge = t.clamp(0.0, 1.0) * config.player.max_charge_distance;
    muzzle + want.normalize_or_zero() * charge
}

fn report(session: &GameSession, event: GameEvent) {
    let t = session.elapsed_seconds();
    match event {
        GameEvent::GameStarted => log::info!("[{t:6.2}] match started"),
        GameEvent::TurnChanged { phase } => log::info!("[{t:6.2}] turn: {phase:?}"),
        GameEvent::ProjectileSpawned { team, .. } => {
            log::info!("[{t:6.2}] {team:?} fires");
        }
        GameEvent::ProjectileDestroyed { position, .. } => {
            log::info!("[{t:6.2}] impact at ({:.1}, {:.1})", position.x, position.y);
        }
        GameEvent::Damaged { amount, .. } => log::info!("[{t:6.2}] hit for {amount:.0}"),
        GameEvent::HealthChanged { current, max, .. } => {
            log::debug!("[{t:6.2}] health {current:.0}/{max:.0}");
        }
        GameEvent::Died { team, .. } => log::info!("[{t:6.2}] {team:?} combatant down"),
        GameEvent::StageCleared => log::info!("[{t:6.2}] STAGE CLEARED"),
        GameEvent::PlayerDefeated => log::info!("[{t:6.2}] PLAYER DEFEATED"),
        GameEvent::GameEnded { victory } => {
            log::info!("[{t:6.2}] match over (victory: {victory})");
        }
    }
}
