use std::f64::consts::TAU;

use rand::Rng;

use super::body::Body;
use super::vector::{self, Vec2};
use crate::config::{ASTEROID_OUTLINE_POINTS, ASTEROID_SPLIT_SPEEDUP, ASTEROID_SPLIT_SPREAD};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AsteroidSize {
    Large,
    Medium,
    Small,
}

impl AsteroidSize {
    pub fn radius(self) -> f64 {
        match self {
            AsteroidSize::Large => 40.0,
            AsteroidSize::Medium => 22.0,
            AsteroidSize::Small => 12.0,
        }
    }

    pub fn points(self) -> u32 {
        match self {
            AsteroidSize::Large => 20,
            AsteroidSize::Medium => 50,
            AsteroidSize::Small => 100,
        }
    }

    pub fn child(self) -> Option<AsteroidSize> {
        match self {
            AsteroidSize::Large => Some(AsteroidSize::Medium),
            AsteroidSize::Medium => Some(AsteroidSize::Small),
            AsteroidSize::Small => None,
        }
    }

    /// Spawn speed range in px/s before the wave speed scale is applied.
    fn speed_range(self) -> (f64, f64) {
        match self {
            AsteroidSize::Large => (30.0, 70.0),
            AsteroidSize::Medium => (50.0, 100.0),
            AsteroidSize::Small => (70.0, 140.0),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Asteroid {
    pub body: Body,
    pub size: AsteroidSize,
    pub angle: f64,
    pub spin: f64,
    /// Radial multipliers, one per outline vertex.
    pub outline: Vec<f64>,
}

impl Asteroid {
    pub fn random<R: Rng>(rng: &mut R, pos: Vec2, size: AsteroidSize, speed_scale: f64) -> Self {
        let heading = rng.gen_range(0.0..TAU);
        let (lo, hi) = size.speed_range();
        let speed = rng.gen_range(lo..hi) * speed_scale;
        Self::with_velocity(rng, pos, vector::from_angle(heading, speed), size)
    }

    fn with_velocity<R: Rng>(rng: &mut R, pos: Vec2, vel: Vec2, size: AsteroidSize) -> Self {
        let outline = (0..ASTEROID_OUTLINE_POINTS)
            .map(|_| rng.gen_range(0.75..1.15))
            .collect();
        Self {
            body: Body::new(pos, vel, size.radius()),
            size,
            angle: rng.gen_range(0.0..TAU),
            spin: rng.gen_range(-1.2..1.2),
            outline,
        }
    }

    pub fn update(&mut self, dt: f64, width: f64, height: f64) {
        self.body.integrate(dt);
        self.body.wrap(width, height);
        self.angle = (self.angle + self.spin * dt).rem_euclid(TAU);
    }

    /// Two fragments of the next size down, fanned out around the parent's
    /// heading. Small asteroids leave nothing behind.
    pub fn split<R: Rng>(&self, rng: &mut R, speed_scale: f64) -> Vec<Asteroid> {
        let Some(child) = self.size.child() else {
            return Vec::new();
        };

        let parent_speed = self.body.vel.norm();
        let heading = if parent_speed > 0.0 {
            self.body.vel.y.atan2(self.body.vel.x)
        } else {
            rng.gen_range(0.0..TAU)
        };
        let (lo, hi) = child.speed_range();
        let speed = (parent_speed * ASTEROID_SPLIT_SPEEDUP).max(lo * speed_scale);

        [-1.0, 1.0]
            .into_iter()
            .map(|side| {
                let jitter = rng.gen_range(0.0..0.25);
                let angle = heading + side * (ASTEROID_SPLIT_SPREAD + jitter);
                let speed = speed.min(hi * speed_scale);
                Self::with_velocity(rng, self.body.pos, vector::from_angle(angle, speed), child)
            })
            .collect()
    }

    /// Outline vertices in world space.
    pub fn polygon(&self) -> impl Iterator<Item = Vec2> + '_ {
        let step = TAU / self.outline.len() as f64;
        self.outline.iter().enumerate().map(move |(i, scale)| {
            self.body.pos + vector::from_angle(self.angle + step * i as f64, self.body.radius * scale)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn sizes_step_down_and_score_up() {
        assert_eq!(AsteroidSize::Large.child(), Some(AsteroidSize::Medium));
        assert_eq!(AsteroidSize::Medium.child(), Some(AsteroidSize::Small));
        assert_eq!(AsteroidSize::Small.child(), None);
        assert!(AsteroidSize::Large.radius() > AsteroidSize::Medium.radius());
        assert!(AsteroidSize::Small.points() > AsteroidSize::Large.points());
    }

    #[test]
    fn random_speed_is_in_range() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..50 {
            let a = Asteroid::random(&mut rng, Vec2::new(10.0, 10.0), AsteroidSize::Large, 1.0);
            let speed = a.body.vel.norm();
            assert!((30.0..70.0).contains(&speed), "speed {speed}");
            assert_eq!(a.outline.len(), ASTEROID_OUTLINE_POINTS);
            assert_eq!(a.body.radius, 40.0);
        }
    }

    #[test]
    fn split_yields_two_smaller_faster_fragments() {
        let mut rng = SmallRng::seed_from_u64(3);
        let parent = Asteroid::random(&mut rng, Vec2::new(200.0, 200.0), AsteroidSize::Large, 1.0);
        let children = parent.split(&mut rng, 1.0);
        assert_eq!(children.len(), 2);
        for child in &children {
            assert_eq!(child.size, AsteroidSize::Medium);
            assert_eq!(child.body.pos, parent.body.pos);
            assert!(child.body.vel.norm() >= parent.body.vel.norm());
        }
        assert_ne!(children[0].body.vel, children[1].body.vel);
    }

    #[test]
    fn small_asteroid_does_not_split() {
        let mut rng = SmallRng::seed_from_u64(1);
        let small = Asteroid::random(&mut rng, Vec2::zeros(), AsteroidSize::Small, 1.0);
        assert!(small.split(&mut rng, 1.0).is_empty());
    }

    #[test]
    fn polygon_stays_near_radius() {
        let mut rng = SmallRng::seed_from_u64(11);
        let a = Asteroid::random(&mut rng, Vec2::new(100.0, 100.0), AsteroidSize::Medium, 1.0);
        for p in a.polygon() {
            let r = (p - a.body.pos).norm();
            assert!(r >= 22.0 * 0.75 - 1e-9 && r <= 22.0 * 1.15 + 1e-9);
        }
    }
}
