use crate::sim::{Game, Vec2};

const FPS_SMOOTHING: f64 = 0.1;

/// Developer overlay: frame rate, entity counts and ship kinematics.
#[derive(Debug, Default)]
pub struct DebugOverlay {
    pub enabled: bool,
    fps: f64,
    phase: &'static str,
    asteroids: usize,
    bullets: usize,
    ship: Option<(Vec2, Vec2)>,
    elapsed: f64,
}

impl DebugOverlay {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ..Self::default()
        }
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Exponential moving average over real frame deltas.
    pub fn record_frame(&mut self, real_dt: f64) {
        if real_dt <= 0.0 {
            return;
        }
        let instant = 1.0 / real_dt;
        self.fps = if self.fps == 0.0 {
            instant
        } else {
            self.fps + (instant - self.fps) * FPS_SMOOTHING
        };
    }

    pub fn sync(&mut self, game: &Game) {
        self.phase = game.phase().name();
        self.asteroids = game.asteroids().len();
        self.bullets = game.bullets().len();
        self.ship = game.ship().map(|s| (s.body.pos, s.body.vel));
        self.elapsed = game.elapsed();
    }

    pub fn lines(&self) -> Vec<String> {
        let ship = match self.ship {
            Some((pos, vel)) => format!(
                "ship: ({:.0}, {:.0}) v=({:.0}, {:.0})",
                pos.x, pos.y, vel.x, vel.y
            ),
            None => "ship: (none)".to_string(),
        };
        vec![
            format!("fps: {:.1}", self.fps),
            format!("phase: {}", self.phase),
            format!("asteroids: {}", self.asteroids),
            format!("bullets: {}", self.bullets),
            ship,
            format!("clock: {:.2}s", self.elapsed),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    #[test]
    fn fps_converges_towards_frame_rate() {
        let mut overlay = DebugOverlay::new(true);
        overlay.record_frame(1.0 / 30.0);
        assert!((overlay.fps() - 30.0).abs() < 1e-6);
        for _ in 0..200 {
            overlay.record_frame(1.0 / 60.0);
        }
        assert!((overlay.fps() - 60.0).abs() < 0.01);
        overlay.record_frame(0.0);
        assert!((overlay.fps() - 60.0).abs() < 0.01);
    }

    #[test]
    fn lines_reflect_game() {
        let mut game = Game::new(GameConfig::default(), 6);
        let mut overlay = DebugOverlay::new(false);
        overlay.sync(&game);
        let lines = overlay.lines();
        assert!(lines.contains(&"phase: title".to_string()));
        assert!(lines.contains(&"ship: (none)".to_string()));

        game.start();
        overlay.sync(&game);
        assert!(overlay.lines().contains(&"ship: (512, 384) v=(0, 0)".to_string()));
    }
}
