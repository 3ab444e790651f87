//! Presentation models that mirror the simulation for drawing.
//!
//! Each component copies what it needs out of [`Game`] in `sync`; the
//! renderer only ever reads from here and from the game's entity slices.

pub mod debug;
pub mod game_over;
pub mod hud;
pub mod messages;
pub mod minimap;

use crate::config::{GameConfig, MAX_MESSAGES, MESSAGE_TTL};
use crate::sim::{Game, GameEvent, Phase};

pub use debug::DebugOverlay;
pub use game_over::GameOverScreen;
pub use hud::Hud;
pub use messages::{Message, MessageQueue};
pub use minimap::{Blip, BlipKind, Minimap};

#[derive(Debug)]
pub struct UiManager {
    pub hud: Hud,
    pub minimap: Minimap,
    pub game_over: GameOverScreen,
    pub messages: MessageQueue,
    pub debug: DebugOverlay,
    pub paused: bool,
    pub title: bool,
    now: f64,
}

impl UiManager {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            hud: Hud::default(),
            minimap: Minimap::new(config.minimap),
            game_over: GameOverScreen::default(),
            messages: MessageQueue::new(MAX_MESSAGES),
            debug: DebugOverlay::new(config.debug),
            paused: false,
            title: true,
            now: 0.0,
        }
    }

    /// Clock used for the last sync; overlays animate against it.
    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn sync(&mut self, game: &Game) {
        self.now = game.elapsed();
        self.hud.sync(game);
        self.minimap.sync(game);
        self.game_over.sync(game, self.now);
        self.debug.sync(game);
        self.messages.prune(self.now);
        self.paused = game.phase() == Phase::Paused;
        self.title = game.phase() == Phase::Title;
    }

    pub fn handle_events(&mut self, events: &[GameEvent], now: f64) {
        for event in events {
            let text = match event {
                GameEvent::WaveStarted { wave } => {
                    if *wave == 1 {
                        self.messages.clear();
                    }
                    format!("WAVE {}", wave)
                }
                GameEvent::ExtraLife { .. } => "EXTRA LIFE".to_string(),
                GameEvent::ShipLost { lives_left } if *lives_left > 0 => {
                    format!("SHIP LOST - {} LEFT", lives_left)
                }
                GameEvent::GameOver { new_record, .. } => {
                    self.game_over.mark_record(*new_record);
                    if *new_record {
                        "NEW HIGH SCORE".to_string()
                    } else {
                        continue;
                    }
                }
                GameEvent::AsteroidDestroyed { .. }
                | GameEvent::ShipLost { .. }
                | GameEvent::Paused
                | GameEvent::Resumed => continue,
            };
            self.messages.push(text, now, MESSAGE_TTL);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(ui: &UiManager) -> Vec<String> {
        ui.messages
            .visible(ui.now())
            .map(|(m, _)| m.text.clone())
            .collect()
    }

    #[test]
    fn events_become_messages() {
        let config = GameConfig::default();
        let mut game = Game::new(config.clone(), 10);
        let mut ui = UiManager::new(&config);
        game.start();
        let events = game.drain_events();
        ui.handle_events(&events, game.elapsed());
        ui.sync(&game);
        assert_eq!(texts(&ui), ["WAVE 1"]);
        assert!(!ui.title);

        ui.handle_events(
            &[
                GameEvent::ShipLost { lives_left: 2 },
                GameEvent::ExtraLife { lives: 3 },
                GameEvent::Paused,
            ],
            game.elapsed(),
        );
        assert_eq!(
            texts(&ui),
            ["WAVE 1", "SHIP LOST - 2 LEFT", "EXTRA LIFE"]
        );
    }

    #[test]
    fn messages_expire_on_the_game_clock() {
        let config = GameConfig::default();
        let mut game = Game::new(config.clone(), 10);
        let mut ui = UiManager::new(&config);
        game.start();
        ui.handle_events(&game.drain_events(), game.elapsed());

        game.toggle_pause();
        for _ in 0..600 {
            game.update(1.0 / 60.0, &Default::default());
        }
        ui.sync(&game);
        assert!(ui.paused);
        assert_eq!(ui.messages.len(), 1);

        game.toggle_pause();
        for _ in 0..200 {
            game.update(1.0 / 60.0, &Default::default());
        }
        ui.sync(&game);
        assert!(ui.messages.is_empty());
    }

    #[test]
    fn game_over_records_flag() {
        let config = GameConfig::default();
        let mut ui = UiManager::new(&config);
        ui.handle_events(
            &[GameEvent::GameOver {
                score: 10,
                high_score: 10,
                new_record: true,
            }],
            0.0,
        );
        assert!(ui.game_over.new_record);
        assert_eq!(texts(&ui), ["NEW HIGH SCORE"]);
    }
}
