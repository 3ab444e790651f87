use super::body::Body;
use super::vector::Vec2;
use crate::config::{BULLET_LIFETIME, BULLET_RADIUS};

#[derive(Clone, Copy, Debug)]
pub struct Bullet {
    pub body: Body,
    pub remaining: f64,
}

impl Bullet {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self {
            body: Body::new(pos, vel, BULLET_RADIUS),
            remaining: BULLET_LIFETIME,
        }
    }

    pub fn update(&mut self, dt: f64, width: f64, height: f64) {
        self.body.integrate(dt);
        self.body.wrap(width, height);
        self.remaining -= dt;
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        self.remaining <= 0.0
    }
}
