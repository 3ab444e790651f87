use std::f64::consts::{FRAC_PI_2, PI};

use super::body::Body;
use super::bullet::Bullet;
use super::vector::{self, Vec2};
use crate::config::{
    BULLET_SPEED, SHIP_DAMPING, SHIP_FIRE_COOLDOWN, SHIP_INVULNERABLE, SHIP_MAX_SPEED,
    SHIP_RADIUS, SHIP_RESPAWN_DELAY, SHIP_THRUST, SHIP_TURN_RATE,
};

const FACING_UP: f64 = 3.0 * FRAC_PI_2;

/// Held controls sampled once per simulation step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    pub thrust: bool,
    pub fire: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LifeState {
    Alive,
    Respawning { remaining: f64 },
}

#[derive(Clone, Debug)]
pub struct Ship {
    pub body: Body,
    pub angle: f64,
    pub thrusting: bool,
    pub fire_cooldown: f64,
    pub invulnerable: f64,
    pub life: LifeState,
}

impl Ship {
    pub fn new(center: Vec2) -> Self {
        Self {
            body: Body::new(center, Vec2::zeros(), SHIP_RADIUS),
            angle: FACING_UP,
            thrusting: false,
            fire_cooldown: 0.0,
            invulnerable: SHIP_INVULNERABLE,
            life: LifeState::Alive,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.life == LifeState::Alive
    }

    #[inline]
    pub fn is_vulnerable(&self) -> bool {
        self.is_alive() && self.invulnerable <= 0.0
    }

    pub fn update(&mut self, dt: f64, controls: &Controls, width: f64, height: f64) {
        if let LifeState::Respawning { remaining } = &mut self.life {
            *remaining = (*remaining - dt).max(0.0);
            self.thrusting = false;
            return;
        }

        let turn = match (controls.left, controls.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        };
        self.angle = (self.angle + turn * SHIP_TURN_RATE * dt).rem_euclid(2.0 * PI);

        self.thrusting = controls.thrust;
        if self.thrusting {
            self.body.vel += vector::from_angle(self.angle, SHIP_THRUST * dt);
        }
        self.body.vel *= SHIP_DAMPING.powf(dt);
        self.body.vel = vector::clamp_length(self.body.vel, SHIP_MAX_SPEED);

        self.body.integrate(dt);
        self.body.wrap(width, height);

        self.fire_cooldown = (self.fire_cooldown - dt).max(0.0);
        self.invulnerable = (self.invulnerable - dt).max(0.0);
    }

    /// Spawns a bullet at the nose when the trigger is held and the gun is
    /// ready. The bullet cap is enforced by the caller.
    pub fn try_fire(&mut self, controls: &Controls) -> Option<Bullet> {
        if !self.is_alive() || !controls.fire || self.fire_cooldown > 0.0 {
            return None;
        }
        self.fire_cooldown = SHIP_FIRE_COOLDOWN;
        let vel = vector::from_angle(self.angle, BULLET_SPEED) + self.body.vel;
        Some(Bullet::new(self.nose(), vel))
    }

    pub fn destroy(&mut self) {
        self.life = LifeState::Respawning {
            remaining: SHIP_RESPAWN_DELAY,
        };
        self.body.vel = Vec2::zeros();
        self.thrusting = false;
    }

    /// True once the respawn delay has run out; the caller still decides
    /// whether the spawn point is clear.
    pub fn ready_to_respawn(&self) -> bool {
        matches!(self.life, LifeState::Respawning { remaining } if remaining <= 0.0)
    }

    pub fn respawn(&mut self, center: Vec2) {
        *self = Self::new(center);
    }

    #[inline]
    pub fn nose(&self) -> Vec2 {
        self.body.pos + vector::from_angle(self.angle, self.body.radius * 1.4)
    }

    /// Outline in world space: nose, left wing, tail notch, right wing.
    pub fn hull(&self) -> [Vec2; 4] {
        let r = self.body.radius;
        let p = self.body.pos;
        [
            self.nose(),
            p + vector::from_angle(self.angle + PI * 0.8, r * 1.1),
            p + vector::from_angle(self.angle + PI, r * 0.45),
            p + vector::from_angle(self.angle - PI * 0.8, r * 1.1),
        ]
    }

    pub fn flame(&self) -> [Vec2; 3] {
        let r = self.body.radius;
        let p = self.body.pos;
        [
            p + vector::from_angle(self.angle + PI * 0.88, r * 0.7),
            p + vector::from_angle(self.angle + PI, r * 1.5),
            p + vector::from_angle(self.angle - PI * 0.88, r * 0.7),
        ]
    }
}
