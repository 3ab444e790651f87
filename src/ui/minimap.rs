use crate::config::{MINIMAP_HEIGHT, MINIMAP_WIDTH};
use crate::sim::{Game, Vec2};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlipKind {
    Ship,
    Asteroid,
    Bullet,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Blip {
    pub pos: Vec2,
    pub radius: f64,
    pub kind: BlipKind,
}

/// Scaled-down view of the whole field, in panel-local pixels.
#[derive(Debug)]
pub struct Minimap {
    pub width: f64,
    pub height: f64,
    pub visible: bool,
    blips: Vec<Blip>,
}

impl Minimap {
    pub fn new(visible: bool) -> Self {
        Self {
            width: MINIMAP_WIDTH,
            height: MINIMAP_HEIGHT,
            visible,
            blips: Vec::new(),
        }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn blips(&self) -> &[Blip] {
        &self.blips
    }

    pub fn sync(&mut self, game: &Game) {
        self.blips.clear();
        if !self.visible {
            return;
        }

        let (world_w, world_h) = game.size();
        let sx = self.width / world_w;
        let sy = self.height / world_h;
        let scale = sx.min(sy);
        let blip = |pos: Vec2, radius: f64, kind: BlipKind| Blip {
            pos: Vec2::new(pos.x * sx, pos.y * sy),
            radius: (radius * scale).max(1.0),
            kind,
        };

        let mut blips = Vec::with_capacity(game.asteroids().len() + game.bullets().len() + 1);
        blips.extend(
            game.asteroids()
                .iter()
                .map(|a| blip(a.body.pos, a.body.radius, BlipKind::Asteroid)),
        );
        blips.extend(
            game.bullets()
                .iter()
                .map(|b| blip(b.body.pos, b.body.radius, BlipKind::Bullet)),
        );
        if let Some(ship) = game.ship() {
            blips.push(blip(ship.body.pos, ship.body.radius, BlipKind::Ship));
        }
        self.blips = blips;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    #[test]
    fn blips_are_scaled_into_panel() {
        let mut game = Game::new(GameConfig::default(), 21);
        game.start();
        let mut map = Minimap::new(true);
        map.sync(&game);

        assert_eq!(map.blips().len(), game.asteroids().len() + 1);
        for blip in map.blips() {
            assert!(blip.pos.x >= 0.0 && blip.pos.x < map.width);
            assert!(blip.pos.y >= 0.0 && blip.pos.y < map.height);
            assert!(blip.radius >= 1.0);
        }

        let ship = map
            .blips()
            .iter()
            .find(|b| b.kind == BlipKind::Ship)
            .expect("ship blip");
        assert!((ship.pos.x - MINIMAP_WIDTH * 0.5).abs() < 1e-9);
        assert!((ship.pos.y - MINIMAP_HEIGHT * 0.5).abs() < 1e-9);
    }

    #[test]
    fn hidden_map_has_no_blips() {
        let game = Game::new(GameConfig::default(), 21);
        let mut map = Minimap::new(true);
        map.toggle();
        map.sync(&game);
        assert!(map.blips().is_empty());
    }
}
