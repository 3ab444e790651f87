use crate::sim::{Game, Phase};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GameOverScreen {
    pub visible: bool,
    pub final_score: u32,
    pub high_score: u32,
    pub wave_reached: u32,
    pub new_record: bool,
    shown_at: f64,
}

impl GameOverScreen {
    pub fn sync(&mut self, game: &Game, now: f64) {
        let over = game.phase() == Phase::GameOver;
        if over && !self.visible {
            self.shown_at = now;
        }
        self.visible = over;
        if over {
            self.final_score = game.score();
            self.high_score = game.high_score();
            self.wave_reached = game.wave();
        } else {
            self.new_record = false;
        }
    }

    /// Set from the `GameOver` event, which is the only place that knows
    /// whether the high score was just beaten.
    pub fn mark_record(&mut self, new_record: bool) {
        self.new_record = new_record;
    }

    /// The restart prompt blinks on a one second cycle.
    pub fn prompt_visible(&self, now: f64) -> bool {
        self.visible && (now - self.shown_at).rem_euclid(1.0) < 0.6
    }
}
