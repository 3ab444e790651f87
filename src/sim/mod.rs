//! Field simulation: entities, collisions and the wave/lives rules.
//!
//! Nothing in here touches the DOM, so the whole module runs under native
//! `cargo test`.

pub mod asteroid;
pub mod body;
pub mod bullet;
pub mod game;
pub mod ship;
pub mod vector;

pub use asteroid::{Asteroid, AsteroidSize};
pub use body::Body;
pub use bullet::Bullet;
pub use game::{Game, GameEvent, Phase};
pub use ship::{Controls, Ship};
pub use vector::Vec2;
