use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::asteroid::{Asteroid, AsteroidSize};
use super::bullet::Bullet;
use super::ship::{Controls, Ship};
use super::vector::{self, Vec2};
use crate::config::{
    ATTRACT_ASTEROIDS, EXTRA_LIFE_SCORE, GameConfig, MAX_BULLETS, MAX_LIVES, SAFE_SPAWN_DISTANCE,
    WAVE_BASE_ASTEROIDS, WAVE_DELAY, WAVE_MAX_ASTEROIDS, WAVE_MAX_SPEED_SCALE, WAVE_SPEEDUP,
    WORLD_HEIGHT, WORLD_WIDTH,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Title,
    Playing,
    Paused,
    GameOver,
}

impl Phase {
    pub fn name(self) -> &'static str {
        match self {
            Phase::Title => "title",
            Phase::Playing => "playing",
            Phase::Paused => "paused",
            Phase::GameOver => "game_over",
        }
    }
}

/// Things the UI reacts to. Drained once per frame.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    WaveStarted { wave: u32 },
    AsteroidDestroyed { size: AsteroidSize, points: u32, pos: Vec2 },
    ShipLost { lives_left: u32 },
    ExtraLife { lives: u32 },
    GameOver { score: u32, high_score: u32, new_record: bool },
    Paused,
    Resumed,
}

pub struct Game {
    config: GameConfig,
    rng: SmallRng,
    phase: Phase,
    width: f64,
    height: f64,
    ship: Ship,
    bullets: Vec<Bullet>,
    asteroids: Vec<Asteroid>,
    score: u32,
    high_score: u32,
    lives: u32,
    wave: u32,
    next_extra_life: u32,
    wave_timer: Option<f64>,
    elapsed: f64,
    events: Vec<GameEvent>,
}

impl Game {
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let mut game = Self {
            lives: config.starting_lives,
            wave: config.starting_wave,
            config,
            rng: SmallRng::seed_from_u64(seed),
            phase: Phase::Title,
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
            ship: Ship::new(Vec2::new(WORLD_WIDTH * 0.5, WORLD_HEIGHT * 0.5)),
            bullets: Vec::with_capacity(MAX_BULLETS),
            asteroids: Vec::new(),
            score: 0,
            high_score: 0,
            next_extra_life: EXTRA_LIFE_SCORE,
            wave_timer: None,
            elapsed: 0.0,
            events: Vec::new(),
        };
        game.spawn_attract_field();
        game
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn ship(&self) -> Option<&Ship> {
        match self.phase {
            Phase::Playing | Phase::Paused if self.ship.is_alive() => Some(&self.ship),
            _ => None,
        }
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn asteroids(&self) -> &[Asteroid] {
        &self.asteroids
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    /// Simulation clock in seconds. Stops while paused.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Begins a fresh run. Valid from any phase; the high score survives.
    pub fn start(&mut self) {
        self.phase = Phase::Playing;
        self.score = 0;
        self.lives = self.config.starting_lives;
        self.wave = self.config.starting_wave;
        self.next_extra_life = EXTRA_LIFE_SCORE;
        self.wave_timer = None;
        self.ship = Ship::new(self.center());
        self.bullets.clear();
        self.asteroids.clear();
        self.spawn_wave();
        log::info!("run started at wave {}", self.wave);
    }

    pub fn toggle_pause(&mut self) {
        match self.phase {
            Phase::Playing => {
                self.phase = Phase::Paused;
                self.events.push(GameEvent::Paused);
            }
            Phase::Paused => {
                self.phase = Phase::Playing;
                self.events.push(GameEvent::Resumed);
            }
            Phase::Title | Phase::GameOver => {}
        }
    }

    /// Pauses only if currently playing. Used when the page is hidden.
    pub fn pause(&mut self) {
        if self.phase == Phase::Playing {
            self.toggle_pause();
        }
    }

    /// Advances the field by `dt` seconds.
    pub fn update(&mut self, dt: f64, controls: &Controls) {
        if self.phase == Phase::Paused {
            return;
        }
        self.elapsed += dt;

        let playing = self.phase == Phase::Playing;
        if playing {
            self.ship.update(dt, controls, self.width, self.height);
            if self.bullets.len() < MAX_BULLETS {
                if let Some(bullet) = self.ship.try_fire(controls) {
                    self.bullets.push(bullet);
                }
            }
        }

        for bullet in &mut self.bullets {
            bullet.update(dt, self.width, self.height);
        }
        self.bullets.retain(|b| !b.is_expired());

        for asteroid in &mut self.asteroids {
            asteroid.update(dt, self.width, self.height);
        }

        if !playing {
            return;
        }

        self.resolve_bullet_hits();
        self.resolve_ship_hit();
        if self.phase != Phase::Playing {
            return;
        }
        self.award_extra_lives();
        self.try_respawn();
        self.advance_wave(dt);
    }

    fn speed_scale(&self) -> f64 {
        (1.0 + WAVE_SPEEDUP * self.wave.saturating_sub(1) as f64).min(WAVE_MAX_SPEED_SCALE)
    }

    fn resolve_bullet_hits(&mut self) {
        let mut hit_asteroids = vec![false; self.asteroids.len()];
        let mut spent_bullets = vec![false; self.bullets.len()];

        for (bi, bullet) in self.bullets.iter().enumerate() {
            for (ai, asteroid) in self.asteroids.iter().enumerate() {
                if hit_asteroids[ai] {
                    continue;
                }
                if bullet.body.overlaps(&asteroid.body, self.width, self.height) {
                    hit_asteroids[ai] = true;
                    spent_bullets[bi] = true;
                    break;
                }
            }
        }

        let mut spent = spent_bullets.into_iter();
        self.bullets.retain(|_| !spent.next().unwrap_or(false));
        self.destroy_asteroids(&hit_asteroids);
    }

    fn resolve_ship_hit(&mut self) {
        if !self.ship.is_vulnerable() {
            return;
        }
        let Some(index) = self
            .asteroids
            .iter()
            .position(|a| a.body.overlaps(&self.ship.body, self.width, self.height))
        else {
            return;
        };

        let mut hit = vec![false; self.asteroids.len()];
        hit[index] = true;
        self.destroy_asteroids(&hit);

        self.ship.destroy();
        self.lives = self.lives.saturating_sub(1);
        self.events.push(GameEvent::ShipLost {
            lives_left: self.lives,
        });

        if self.lives == 0 {
            let new_record = self.score > self.high_score;
            if new_record {
                self.high_score = self.score;
            }
            self.phase = Phase::GameOver;
            self.bullets.clear();
            self.wave_timer = None;
            self.events.push(GameEvent::GameOver {
                score: self.score,
                high_score: self.high_score,
                new_record,
            });
            log::info!(
                "game over: score {} wave {} (high {})",
                self.score,
                self.wave,
                self.high_score
            );
        }
    }

    /// Replaces every flagged asteroid with its fragments and scores it.
    fn destroy_asteroids(&mut self, hit: &[bool]) {
        let speed_scale = self.speed_scale();
        let mut survivors = Vec::with_capacity(self.asteroids.len() + 2);
        let mut fragments = Vec::new();

        for (asteroid, was_hit) in std::mem::take(&mut self.asteroids).into_iter().zip(hit) {
            if !was_hit {
                survivors.push(asteroid);
                continue;
            }
            let points = asteroid.size.points();
            self.score = self.score.saturating_add(points);
            self.events.push(GameEvent::AsteroidDestroyed {
                size: asteroid.size,
                points,
                pos: asteroid.body.pos,
            });
            fragments.extend(asteroid.split(&mut self.rng, speed_scale));
        }

        survivors.extend(fragments);
        self.asteroids = survivors;
    }

    fn award_extra_lives(&mut self) {
        while self.score >= self.next_extra_life {
            self.next_extra_life = self.next_extra_life.saturating_add(EXTRA_LIFE_SCORE);
            if self.lives < MAX_LIVES {
                self.lives += 1;
                self.events.push(GameEvent::ExtraLife { lives: self.lives });
            }
        }
    }

    fn try_respawn(&mut self) {
        if self.lives == 0 || !self.ship.ready_to_respawn() {
            return;
        }
        let center = self.center();
        let clear = self.asteroids.iter().all(|a| {
            let gap = a.body.distance_to(center, self.width, self.height) - a.body.radius;
            gap > SAFE_SPAWN_DISTANCE * 0.5
        });
        if clear {
            self.ship.respawn(center);
        }
    }

    fn advance_wave(&mut self, dt: f64) {
        if !self.asteroids.is_empty() {
            return;
        }
        let remaining = self.wave_timer.unwrap_or(WAVE_DELAY) - dt;
        if remaining > 0.0 {
            self.wave_timer = Some(remaining);
            return;
        }
        self.wave_timer = None;
        self.wave += 1;
        self.spawn_wave();
    }

    fn spawn_wave(&mut self) {
        let count = (WAVE_BASE_ASTEROIDS + self.wave).min(WAVE_MAX_ASTEROIDS);
        let avoid = self.ship.body.pos;
        let speed_scale = self.speed_scale();
        for _ in 0..count {
            let pos = self.random_point_away_from(avoid, SAFE_SPAWN_DISTANCE);
            let asteroid = Asteroid::random(&mut self.rng, pos, AsteroidSize::Large, speed_scale);
            self.asteroids.push(asteroid);
        }
        self.events.push(GameEvent::WaveStarted { wave: self.wave });
        log::debug!("wave {} spawned {} asteroids", self.wave, count);
    }

    fn spawn_attract_field(&mut self) {
        for _ in 0..ATTRACT_ASTEROIDS {
            let pos = Vec2::new(
                self.rng.gen_range(0.0..self.width),
                self.rng.gen_range(0.0..self.height),
            );
            let size = match self.rng.gen_range(0..3) {
                0 => AsteroidSize::Large,
                1 => AsteroidSize::Medium,
                _ => AsteroidSize::Small,
            };
            let asteroid = Asteroid::random(&mut self.rng, pos, size, 1.0);
            self.asteroids.push(asteroid);
        }
    }

    /// Rejection-samples a point at least `distance` from `avoid`; after a
    /// bounded number of tries it falls back to the point opposite `avoid`.
    fn random_point_away_from(&mut self, avoid: Vec2, distance: f64) -> Vec2 {
        for _ in 0..32 {
            let p = Vec2::new(
                self.rng.gen_range(0.0..self.width),
                self.rng.gen_range(0.0..self.height),
            );
            let d = vector::wrapped_delta(avoid, p, self.width, self.height);
            if d.norm() >= distance {
                return p;
            }
        }
        vector::wrap(
            avoid + Vec2::new(self.width * 0.5, self.height * 0.5),
            self.width,
            self.height,
        )
    }
}
