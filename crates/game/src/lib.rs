//! Lobshot - 2D turn-based artillery combat core.
//!
//! Player and AI shooters lob projectiles along curve-driven or ballistic
//! paths; a turn coordinator sequences shots around projectile lifetimes.
//! Rendering, audio, and input are external collaborators consuming the
//! event queue; nothing in this crate draws or polls devices.

pub mod ballistics;
pub mod config;
pub mod enemy_ai;
pub mod events;
pub mod projectile;
pub mod session;
pub mod shooter;
pub mod stage;
pub mod turn;

pub use ballistics::*;
pub use config::{ConfigError, GameConfig};
pub use enemy_ai::{AimSettings, EnemyShooter};
pub use events::{EventQueue, GameEvent};
pub use projectile::{
    spawn_projectile, update_projectiles, BounceSettings, CurveParams, MotionMode, Projectile,
};
pub use session::GameSession;
pub use shooter::Shooter;
pub use stage::{BuiltStage, EnemySpawn, Stage};
pub use turn::{SideStatus, TurnCoordinator, TurnPhase, TurnSignal, TurnTuning};
