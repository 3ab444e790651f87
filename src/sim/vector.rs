use nalgebra::Vector2;

pub type Vec2 = Vector2<f64>;

/// Unit vector along `angle` scaled to `length`. Zero radians points right
/// and positive angles turn clockwise on screen, since canvas y grows down.
#[inline]
pub fn from_angle(angle: f64, length: f64) -> Vec2 {
    Vec2::new(angle.cos() * length, angle.sin() * length)
}

#[inline]
pub fn wrap(p: Vec2, width: f64, height: f64) -> Vec2 {
    Vec2::new(p.x.rem_euclid(width), p.y.rem_euclid(height))
}

#[inline]
fn wrap_axis(d: f64, extent: f64) -> f64 {
    let half = extent * 0.5;
    let d = (d + half).rem_euclid(extent) - half;
    if d == -half { half } else { d }
}

/// Shortest displacement from `from` to `to` on the wrapping field.
#[inline]
pub fn wrapped_delta(from: Vec2, to: Vec2, width: f64, height: f64) -> Vec2 {
    Vec2::new(
        wrap_axis(to.x - from.x, width),
        wrap_axis(to.y - from.y, height),
    )
}

#[inline]
pub fn clamp_length(v: Vec2, max: f64) -> Vec2 {
    let len = v.norm();
    if len > max && len > 0.0 {
        v * (max / len)
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    const EPS: f64 = 1e-9;

    #[test]
    fn from_angle_points_down_at_half_pi() {
        let v = from_angle(FRAC_PI_2, 2.0);
        assert!(v.x.abs() < EPS);
        assert!((v.y - 2.0).abs() < EPS);
    }

    #[test]
    fn wrap_handles_negative_and_large_offsets() {
        let p = wrap(Vec2::new(-10.0, 250.0), 100.0, 100.0);
        assert!((p.x - 90.0).abs() < EPS);
        assert!((p.y - 50.0).abs() < EPS);

        let edge = wrap(Vec2::new(100.0, 0.0), 100.0, 100.0);
        assert_eq!(edge.x, 0.0);
    }

    #[test]
    fn wrapped_delta_crosses_the_seam() {
        let d = wrapped_delta(Vec2::new(95.0, 50.0), Vec2::new(5.0, 50.0), 100.0, 100.0);
        assert!((d.x - 10.0).abs() < EPS);
        assert!(d.y.abs() < EPS);

        let back = wrapped_delta(Vec2::new(5.0, 2.0), Vec2::new(95.0, 98.0), 100.0, 100.0);
        assert!((back.x + 10.0).abs() < EPS);
        assert!((back.y + 4.0).abs() < EPS);
    }

    #[test]
    fn clamp_length_only_shrinks() {
        let long = clamp_length(Vec2::new(30.0, 40.0), 10.0);
        assert!((long.norm() - 10.0).abs() < EPS);
        assert!((long.x - 6.0).abs() < EPS);

        let short = clamp_length(Vec2::new(1.0, 1.0), 10.0);
        assert_eq!(short, Vec2::new(1.0, 1.0));
        assert_eq!(clamp_length(Vec2::zeros(), 10.0), Vec2::zeros());
    }
}
