use super::vector::{self, Vec2};

/// Position, velocity and collision radius shared by every moving object.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f64,
}

impl Body {
    pub fn new(pos: Vec2, vel: Vec2, radius: f64) -> Self {
        Self { pos, vel, radius }
    }

    #[inline]
    pub fn integrate(&mut self, dt: f64) {
        self.pos += self.vel * dt;
    }

    #[inline]
    pub fn wrap(&mut self, width: f64, height: f64) {
        self.pos = vector::wrap(self.pos, width, height);
    }

    /// Circle test measured across the wrap seam. Touching is not a hit.
    pub fn overlaps(&self, other: &Body, width: f64, height: f64) -> bool {
        let d = vector::wrapped_delta(self.pos, other.pos, width, height);
        let reach = self.radius + other.radius;
        d.norm_squared() < reach * reach
    }

    pub fn distance_to(&self, point: Vec2, width: f64, height: f64) -> f64 {
        vector::wrapped_delta(self.pos, point, width, height).norm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: f64, y: f64, radius: f64) -> Body {
        Body::new(Vec2::new(x, y), Vec2::zeros(), radius)
    }

    #[test]
    fn integrate_then_wrap() {
        let mut body = Body::new(Vec2::new(95.0, 10.0), Vec2::new(20.0, -40.0), 1.0);
        body.integrate(0.5);
        body.wrap(100.0, 100.0);
        assert_eq!(body.pos, Vec2::new(5.0, 90.0));
    }

    #[test]
    fn overlap_is_strict() {
        assert!(at(10.0, 10.0, 5.0).overlaps(&at(19.0, 10.0, 5.0), 100.0, 100.0));
        assert!(!at(10.0, 10.0, 5.0).overlaps(&at(20.0, 10.0, 5.0), 100.0, 100.0));
    }

    #[test]
    fn overlap_across_seam() {
        assert!(at(1.0, 50.0, 3.0).overlaps(&at(98.0, 50.0, 3.0), 100.0, 100.0));
        assert!(!at(1.0, 50.0, 3.0).overlaps(&at(90.0, 50.0, 3.0), 100.0, 100.0));
    }
}
