use crate::sim::Game;

/// Score panel mirrored from the simulation each frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Hud {
    pub score: u32,
    pub high_score: u32,
    pub lives: u32,
    pub wave: u32,
    pub ship_shielded: bool,
}

impl Hud {
    pub fn sync(&mut self, game: &Game) {
        self.score = game.score();
        self.high_score = game.high_score().max(game.score());
        self.lives = game.lives();
        self.wave = game.wave();
        self.ship_shielded = game.ship().is_some_and(|ship| !ship.is_vulnerable());
    }

    pub fn score_text(&self) -> String {
        format!("{:06}", self.score)
    }

    pub fn high_score_text(&self) -> String {
        format!("HI {:06}", self.high_score)
    }

    pub fn wave_text(&self) -> String {
        format!("WAVE {}", self.wave)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    #[test]
    fn mirrors_game_state() {
        let mut game = Game::new(GameConfig::default(), 4);
        game.start();
        let mut hud = Hud::default();
        hud.sync(&game);
        assert_eq!(hud.lives, 3);
        assert_eq!(hud.wave, 1);
        assert!(hud.ship_shielded);
        assert_eq!(hud.score_text(), "000000");
        assert_eq!(hud.wave_text(), "WAVE 1");
        assert_eq!(hud.high_score_text(), "HI 000000");
    }
}
