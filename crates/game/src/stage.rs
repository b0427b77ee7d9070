//! Stage definitions: static geometry plus combatant spawns.

use engine_core::{BodyCircle, Entity, Health, Team, Transform2, Vec2, World};
use physics::StaticWorld;

/// One enemy emplacement.
#[derive(Debug, Clone, Copy)]
pub struct EnemySpawn {
    pub position: Vec2,
    pub health: f32,
}

/// Declarative stage layout. `build` turns it into a populated world.
#[derive(Debug, Clone)]
pub struct Stage {
    /// Ground strip height and horizontal extent (half-width around 0).
    pub ground_y: f32,
    pub extent: f32,
    /// Wall blocks as (center, half extents).
    pub walls: Vec<(Vec2, Vec2)>,
    pub bounce_pads: Vec<(Vec2, Vec2)>,
    pub force_fields: Vec<(Vec2, Vec2)>,
    pub player_spawn: Vec2,
    pub player_health: f32,
    pub player_radius: f32,
    pub enemies: Vec<EnemySpawn>,
    pub enemy_radius: f32,
}

/// A stage instantiated into ECS + static geometry.
pub struct BuiltStage {
    pub world: World,
    pub statics: StaticWorld,
    pub player: Entity,
    pub enemies: Vec<Entity>,
}

impl Stage {
    /// Classic duel: flat ground, one enemy across the field, a force field
    /// covering the enemy's flank so direct lobs get re-planned.
    pub fn duel() -> Self {
        Self {
            ground_y: 0.0,
            extent: 40.0,
            walls: vec![(Vec2::new(6.0, 1.2), Vec2::new(0.4, 1.2))],
            bounce_pads: Vec::new(),
            force_fields: vec![(Vec2::new(10.0, 1.5), Vec2::new(1.0, 1.5))],
            player_spawn: Vec2::new(-12.0, 0.6),
            player_health: 100.0,
            player_radius: 0.5,
            enemies: vec![EnemySpawn {
                position: Vec2::new(14.0, 0.6),
                health: 60.0,
            }],
            enemy_radius: 0.5,
        }
    }

    /// Instantiate the stage: register static geometry and spawn combatants.
    pub fn build(&self) -> BuiltStage {
        let mut world = World::new();
        let mut statics = StaticWorld::new();

        statics.add_ground(self.ground_y, -self.extent, self.extent);
        for &(center, half) in &self.walls {
            statics.add_wall(center, half);
        }
        for &(center, half) in &self.bounce_pads {
            statics.add_bounce_pad(center, half);
        }
        for &(center, half) in &self.force_fields {
            statics.add_force_field(center, half);
        }

        let player = world.spawn((
            Transform2::from_position(self.player_spawn),
            Health::new(self.player_health, Team::Player),
            BodyCircle::new(self.player_radius),
        ));

        let enemies = self
            .enemies
            .iter()
            .map(|spawn| {
                world.spawn((
                    Transform2::from_position(spawn.position),
                    Health::new(spawn.health, Team::Enemy),
                    BodyCircle::new(self.enemy_radius),
                ))
            })
            .collect();

        log::info!(
            "stage built: {} colliders, {} enemies",
            statics.len(),
            self.enemies.len()
        );

        BuiltStage {
            world,
            statics,
            player,
            enemies,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duel_stage_spawns_both_sides() {
        let built = Stage::duel().build();
        let player_health = built.world.get::<&Health>(built.player).unwrap();
        assert_eq!(player_health.team, Team::Player);
        assert_eq!(built.enemies.len(), 1);
        let enemy_health = built.world.get::<&Health>(built.enemies[0]).unwrap();
        assert_eq!(enemy_health.team, Team::Enemy);
        // Ground + wall + force field
        assert_eq!(built.statics.len(), 3);
    }
}
