//! Pull-based gameplay event queue.
//!
//! Systems push events during the tick; the turn coordinator reads the
//! events pushed that tick, and external collaborators (HUD, camera, audio)
//! drain the queue between ticks. There is no callback wiring to leak: the
//! single-owner rule for projectile tracking lives in the coordinator.

use engine_core::{Entity, Team, Vec2};

use crate::turn::TurnPhase;

/// Everything the simulation reports outward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    ProjectileSpawned {
        entity: Entity,
        team: Team,
    },
    /// Fired exactly once per projectile, whatever killed it.
    ProjectileDestroyed {
        entity: Entity,
        team: Team,
        position: Vec2,
    },
    HealthChanged {
        entity: Entity,
        current: f32,
        max: f32,
    },
    Damaged {
        entity: Entity,
        amount: f32,
    },
    Died {
        entity: Entity,
        team: Team,
    },
    TurnChanged {
        phase: TurnPhase,
    },
    GameStarted,
    GameEnded {
        victory: bool,
    },
    StageCleared,
    PlayerDefeated,
}

/// FIFO buffer of game events.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events pushed at or after `mark` (a previous `len()` reading).
    pub fn since(&self, mark: usize) -> &[GameEvent] {
        &self.events[mark.min(self.events.len())..]
    }

    /// Remove and return everything buffered.
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drop oldest events beyond `max` buffered. Called at tick start so a
    /// collaborator that never drains cannot grow the buffer unboundedly.
    pub fn compact(&mut self, max: usize) {
        if self.events.len() > max {
            let excess = self.events.len() - max;
            self.events.drain(..excess);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn since_returns_only_new_events() {
        let mut q = EventQueue::new();
        q.push(GameEvent::GameStarted);
        let mark = q.len();
        q.push(GameEvent::StageCleared);
        assert_eq!(q.since(mark), &[GameEvent::StageCleared]);
        assert_eq!(q.since(99), &[] as &[GameEvent]);
    }

    #[test]
    fn drain_empties_the_queue() {
        let mut q = EventQueue::new();
        q.push(GameEvent::GameStarted);
        q.push(GameEvent::PlayerDefeated);
        assert_eq!(q.drain().len(), 2);
        assert!(q.is_empty());
    }

    #[test]
    fn compact_drops_oldest_first() {
        let mut q = EventQueue::new();
        q.push(GameEvent::GameStarted);
        for _ in 0..5 {
            q.push(GameEvent::StageCleared);
        }
        q.compact(3);
        assert_eq!(q.len(), 3);
        assert!(q.since(0).iter().all(|e| *e == GameEvent::StageCleared));
    }
}
