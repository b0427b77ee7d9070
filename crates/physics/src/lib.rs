//! Minimal 2D static-geometry physics for Lobshot.
//!
//! Only what projectile flight needs: a registry of static colliders
//! (ground, walls, bounce pads, force-field sensors), circle narrow-phase
//! contact tests, segment raycasts, and velocity reflection. Projectile
//! integration itself lives with the projectile; there is no general
//! dynamics engine here.

pub mod collision;
pub mod raycast;
pub mod world;

pub use collision::*;
pub use raycast::*;
pub use world::*;
