//! Fixed-tick game state: ship, bullets, asteroids, timer and score.
//!
//! Nothing here touches the terminal. The presentation layer pulls state
//! through the accessors after each tick.

use log::{debug, info};
use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{Asteroid, Bullet, Ship};
use crate::persistence::{HighScoreStore, save_high_score};

/// Outcome of a finished session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionSummary {
    pub hits: u32,
    pub high_score: u32,
    pub new_record: bool,
}

pub struct Simulation<R: Rng> {
    config: GameConfig,
    rng: R,
    play_width: f64,
    play_height: f64,
    ship: Ship,
    bullets: Vec<Bullet>,
    asteroids: Vec<Asteroid>,
    ticks: u32,
    hits: u32,
    high_score: u32,
    active: bool,
}

impl<R: Rng> Simulation<R> {
    pub fn new(config: GameConfig, rng: R, high_score: u32) -> Self {
        let ship = Ship::new(
            config.play_width,
            config.play_height,
            config.ship_width,
            config.ship_height,
            config.ship_margin,
        );
        Simulation {
            play_width: config.play_width,
            play_height: config.play_height,
            config,
            rng,
            ship,
            bullets: Vec::new(),
            asteroids: Vec::new(),
            ticks: 0,
            hits: 0,
            high_score,
            active: false,
        }
    }

    pub fn start(&mut self, play_width: f64, play_height: f64) {
        self.play_width = play_width;
        self.play_height = play_height;
        self.ticks = 0;
        self.hits = 0;
        self.bullets.clear();
        self.asteroids.clear();
        for _ in 0..self.config.max_asteroids {
            self.spawn_asteroid();
        }
        self.ship.fit_to(play_width, play_height, self.config.ship_margin);
        self.active = true;
        info!(
            "Session started: {}x{} play area, {} asteroids, {} ticks",
            play_width, play_height, self.asteroids.len(), self.config.game_duration
        );
    }

    pub fn move_ship(&mut self, delta: f64) {
        self.ship.shift(delta, self.play_width);
    }

    /// Adds a bullet at the ship's muzzle unless the cap is reached or no
    /// session is running. The ship itself may move between sessions.
    pub fn fire(&mut self) {
        if !self.active {
            return;
        }
        if self.bullets.len() < self.config.max_bullets {
            self.bullets.push(Bullet::new(self.ship.muzzle()));
        }
    }

    /// Advances one step. Returns `true` once the session has ended; further
    /// calls after that leave the state untouched.
    pub fn tick(&mut self) -> bool {
        if self.is_over() {
            return true;
        }
        self.ticks += 1;
        self.move_bullets();
        self.resolve_hits();
        self.is_over()
    }

    pub fn end_session(&mut self, store: &mut impl HighScoreStore) -> SessionSummary {
        let new_record = self.hits > self.high_score;
        if new_record {
            self.high_score = self.hits;
            save_high_score(store, self.high_score);
        }
        self.bullets.clear();
        self.asteroids.clear();
        self.active = false;
        info!(
            "Session ended after {} ticks: {} hits, high score {}{}",
            self.ticks,
            self.hits,
            self.high_score,
            if new_record { " (new record)" } else { "" }
        );
        SessionSummary { hits: self.hits, high_score: self.high_score, new_record }
    }

    pub fn is_over(&self) -> bool {
        !self.active || self.ticks >= self.config.game_duration
    }

    fn move_bullets(&mut self) {
        let speed = self.config.bullet_speed;
        for i in (0..self.bullets.len()).rev() {
            self.bullets[i].update(speed);
            if self.bullets[i].is_off_screen() {
                self.bullets.remove(i);
            }
        }
    }

    // Back-to-front over both lists so removal never skips an element. A
    // bullet scores at most once; the replacement asteroid goes to the end
    // and is only visible to bullets scanned after it.
    fn resolve_hits(&mut self) {
        let reach = self.config.hit_reach;
        for i in (0..self.bullets.len()).rev() {
            let bullet = self.bullets[i].position;
            let hit = (0..self.asteroids.len())
                .rev()
                .find(|&j| bullet.within_reach(self.asteroids[j].position, reach));
            if let Some(j) = hit {
                self.bullets.remove(i);
                let asteroid = self.asteroids.remove(j);
                self.spawn_asteroid();
                self.hits += 1;
                debug!(
                    "Hit at ({:.1}, {:.1}), total {}",
                    asteroid.position.x, asteroid.position.y, self.hits
                );
            }
        }
    }

    fn spawn_asteroid(&mut self) {
        let asteroid = Asteroid::spawn(&mut self.rng, self.play_width, self.play_height);
        self.asteroids.push(asteroid);
    }

    // --- Read-only state for the presentation layer ---

    pub fn ship(&self) -> &Ship {
        &self.ship
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn asteroids(&self) -> &[Asteroid] {
        &self.asteroids
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn hits(&self) -> u32 {
        self.hits
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn play_area(&self) -> (f64, f64) {
        (self.play_width, self.play_height)
    }

    /// Whole seconds left, as shown on the timer.
    pub fn remaining_seconds(&self) -> u32 {
        self.config.game_duration.saturating_sub(self.ticks) / self.config.ticks_per_second()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScoreError;
    use crate::types::Vector2D;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[derive(Default)]
    struct RecordingStore {
        saved: Vec<u32>,
    }

    impl HighScoreStore for RecordingStore {
        fn load(&self) -> Result<u32, ScoreError> {
            Ok(self.saved.last().copied().unwrap_or(0))
        }

        fn save(&mut self, score: u32) -> Result<(), ScoreError> {
            self.saved.push(score);
            Ok(())
        }
    }

    fn started_with(config: GameConfig) -> Simulation<StdRng> {
        let mut sim = Simulation::new(config, StdRng::seed_from_u64(0xA57E), 0);
        sim.start(800.0, 600.0);
        sim
    }

    fn started() -> Simulation<StdRng> {
        started_with(GameConfig::default())
    }

    /// Puts asteroids where no bullet in these tests can reach them.
    fn park_asteroids(sim: &mut Simulation<StdRng>) {
        for (k, asteroid) in sim.asteroids.iter_mut().enumerate() {
            asteroid.position = Vector2D::new(700.0 + k as f64, 5_000.0);
        }
    }

    #[test]
    fn start_populates_fresh_session() {
        let sim = started();
        assert_eq!(sim.asteroids().len(), 20);
        assert!(sim.bullets().is_empty());
        assert_eq!(sim.ticks(), 0);
        assert_eq!(sim.hits(), 0);
        assert!(!sim.is_over());
        for asteroid in sim.asteroids() {
            assert!((0.0..800.0).contains(&asteroid.position.x));
            assert!((0.0..300.0).contains(&asteroid.position.y));
        }
    }

    #[test]
    fn start_resets_previous_session() {
        let mut sim = started();
        sim.fire();
        sim.hits = 4;
        sim.ticks = 77;
        sim.start(800.0, 600.0);
        assert_eq!((sim.ticks(), sim.hits()), (0, 0));
        assert!(sim.bullets().is_empty());
        assert_eq!(sim.asteroids().len(), 20);
    }

    #[test]
    fn fire_saturates_at_bullet_cap() {
        let mut sim = started();
        for _ in 0..51 {
            sim.fire();
        }
        assert_eq!(sim.bullets().len(), 50);

        let before = sim.bullets().to_vec();
        sim.fire();
        assert_eq!(sim.bullets(), before.as_slice());
    }

    #[test]
    fn fire_is_ignored_outside_a_session() {
        let mut sim = Simulation::new(GameConfig::default(), StdRng::seed_from_u64(4), 0);
        sim.fire();
        assert!(sim.bullets().is_empty());

        sim.start(800.0, 600.0);
        sim.end_session(&mut RecordingStore::default());
        sim.fire();
        assert!(sim.bullets().is_empty());
        assert!(sim.tick());
    }

    #[test]
    fn bullets_start_at_ship_muzzle() {
        let mut sim = started();
        sim.move_ship(-1_000.0);
        sim.fire();
        assert_eq!(sim.bullets()[0].position, Vector2D::new(15.0, 560.0));
    }

    #[test]
    fn ship_stays_within_bounds() {
        let mut sim = started();
        let limit = 800.0 - sim.ship().width;
        for delta in [-10.0, 5.0, 1e9, -3.5, -1e9, 10.0, 770.0, 1.0, -0.25] {
            sim.move_ship(delta);
            let x = sim.ship().position.x;
            assert!((0.0..=limit).contains(&x), "x = {} after {}", x, delta);
        }
        sim.move_ship(1e9);
        assert_eq!(sim.ship().position.x, limit);
    }

    #[test]
    fn ship_position_persists_across_sessions() {
        let mut sim = started();
        let mut store = RecordingStore::default();
        sim.move_ship(-100.0);
        let x = sim.ship().position.x;
        sim.end_session(&mut store);
        sim.start(800.0, 600.0);
        assert_eq!(sim.ship().position.x, x);

        // A narrower play area pulls the ship back inside.
        sim.move_ship(1e9);
        sim.end_session(&mut store);
        sim.start(400.0, 300.0);
        assert_eq!(sim.ship().position.x, 370.0);
        assert_eq!(sim.ship().position.y, 260.0);
    }

    #[test]
    fn bullets_move_up_and_expire_at_top() {
        let mut sim = started();
        park_asteroids(&mut sim);
        sim.bullets.push(Bullet::new(Vector2D::new(50.0, 12.0)));
        sim.bullets.push(Bullet::new(Vector2D::new(60.0, 3.0)));
        sim.bullets.push(Bullet::new(Vector2D::new(70.0, 4.0)));
        sim.tick();
        let ys: Vec<f64> = sim.bullets().iter().map(|b| b.position.y).collect();
        assert_eq!(ys, vec![7.0]);
    }

    #[test]
    fn hit_removes_pair_and_replaces_asteroid() {
        // No bullet travel, so the placement is exactly what gets checked.
        let config = GameConfig { bullet_speed: 0.0, ..GameConfig::default() };
        let mut sim = started_with(config);
        park_asteroids(&mut sim);
        sim.bullets.push(Bullet::new(Vector2D::new(100.0, 100.0)));
        sim.asteroids[0].position = Vector2D::new(105.0, 105.0);

        assert!(!sim.tick());
        assert_eq!(sim.asteroids().len(), 20);
        assert!(sim.bullets().is_empty());
        assert_eq!(sim.hits(), 1);
        assert!(!sim.asteroids().iter().any(|a| a.position == Vector2D::new(105.0, 105.0)));
    }

    #[test]
    fn hit_is_checked_after_bullet_moves() {
        let mut sim = started();
        park_asteroids(&mut sim);
        sim.bullets.push(Bullet::new(Vector2D::new(100.0, 100.0)));
        // Bullet ends the move at y = 95.
        sim.asteroids[3].position = Vector2D::new(109.0, 86.0);
        sim.tick();
        assert_eq!(sim.hits(), 1);
        assert!(sim.bullets().is_empty());
    }

    #[test]
    fn near_miss_survives() {
        let config = GameConfig { bullet_speed: 0.0, ..GameConfig::default() };
        let mut sim = started_with(config);
        park_asteroids(&mut sim);
        sim.bullets.push(Bullet::new(Vector2D::new(100.0, 100.0)));
        sim.asteroids[0].position = Vector2D::new(110.0, 100.0);
        sim.asteroids[1].position = Vector2D::new(100.0, 90.0);
        sim.asteroids[2].position = Vector2D::new(90.0, 110.0);
        sim.tick();
        assert_eq!(sim.hits(), 0);
        assert_eq!(sim.bullets().len(), 1);
        assert_eq!(sim.asteroids().len(), 20);
    }

    #[test]
    fn bullet_scores_at_most_once() {
        let config = GameConfig { bullet_speed: 0.0, ..GameConfig::default() };
        let mut sim = started_with(config);
        park_asteroids(&mut sim);
        sim.bullets.push(Bullet::new(Vector2D::new(100.0, 100.0)));
        sim.asteroids[0].position = Vector2D::new(101.0, 101.0);
        sim.asteroids[19].position = Vector2D::new(102.0, 102.0);
        sim.tick();
        assert_eq!(sim.hits(), 1);
        assert_eq!(sim.asteroids().len(), 20);
        // Scanning runs back to front, so the last asteroid in the list goes first.
        assert!(sim.asteroids().iter().any(|a| a.position == Vector2D::new(101.0, 101.0)));
        assert!(!sim.asteroids().iter().any(|a| a.position == Vector2D::new(102.0, 102.0)));
    }

    #[test]
    fn several_bullets_hit_in_one_tick() {
        let config = GameConfig { bullet_speed: 0.0, ..GameConfig::default() };
        let mut sim = started_with(config);
        park_asteroids(&mut sim);
        sim.bullets.push(Bullet::new(Vector2D::new(100.0, 100.0)));
        sim.bullets.push(Bullet::new(Vector2D::new(300.0, 200.0)));
        sim.bullets.push(Bullet::new(Vector2D::new(500.0, 250.0)));
        sim.asteroids[4].position = Vector2D::new(95.0, 100.0);
        sim.asteroids[9].position = Vector2D::new(300.0, 195.0);
        sim.tick();
        assert_eq!(sim.hits(), 2);
        assert_eq!(sim.bullets().len(), 1);
        assert_eq!(sim.bullets()[0].position, Vector2D::new(500.0, 250.0));
        assert_eq!(sim.asteroids().len(), 20);
    }

    #[test]
    fn asteroid_population_is_constant_under_fire() {
        let config = GameConfig { hit_reach: 60.0, ..GameConfig::default() };
        let mut sim = started_with(config);
        for step in 0..600 {
            sim.move_ship(if step % 40 < 20 { 10.0 } else { -10.0 });
            sim.fire();
            sim.tick();
            assert_eq!(sim.asteroids().len(), 20);
            assert!(sim.bullets().len() <= 50);
        }
        assert!(sim.hits() > 0);
    }

    #[test]
    fn session_ends_exactly_at_duration() {
        let mut sim = started();
        for _ in 0..1498 {
            assert!(!sim.tick());
        }
        assert!(!sim.tick(), "tick 1499 must not end the session");
        assert!(sim.tick(), "tick 1500 must end the session");
        assert_eq!(sim.ticks(), 1500);
    }

    #[test]
    fn ticking_past_the_end_is_a_no_op() {
        let config = GameConfig { game_duration: 3, ..GameConfig::default() };
        let mut sim = started_with(config);
        sim.fire();
        for _ in 0..3 {
            sim.tick();
        }
        let bullets = sim.bullets().to_vec();
        for _ in 0..10 {
            assert!(sim.tick());
        }
        assert_eq!(sim.ticks(), 3);
        assert_eq!(sim.bullets(), bullets.as_slice());
    }

    #[test]
    fn tick_before_start_reports_ended() {
        let mut sim = Simulation::new(GameConfig::default(), StdRng::seed_from_u64(1), 0);
        assert!(sim.tick());
        assert_eq!(sim.ticks(), 0);
    }

    #[test]
    fn remaining_time_counts_down_in_seconds() {
        let mut sim = started();
        assert_eq!(sim.remaining_seconds(), 50);
        for _ in 0..31 {
            sim.tick();
        }
        assert_eq!(sim.remaining_seconds(), 48);
        while !sim.tick() {}
        assert_eq!(sim.remaining_seconds(), 0);
    }

    #[test]
    fn new_record_is_persisted_once() {
        let mut sim = Simulation::new(GameConfig::default(), StdRng::seed_from_u64(2), 5);
        sim.start(800.0, 600.0);
        sim.hits = 7;
        let mut store = RecordingStore::default();
        let summary = sim.end_session(&mut store);
        assert_eq!(summary, SessionSummary { hits: 7, high_score: 7, new_record: true });
        assert_eq!(sim.high_score(), 7);
        assert_eq!(store.saved, vec![7]);
        assert!(sim.bullets().is_empty());
        assert!(sim.asteroids().is_empty());
        assert!(sim.is_over());
    }

    #[test]
    fn lower_score_is_not_persisted() {
        let mut sim = Simulation::new(GameConfig::default(), StdRng::seed_from_u64(2), 5);
        sim.start(800.0, 600.0);
        sim.hits = 3;
        let mut store = RecordingStore::default();
        let summary = sim.end_session(&mut store);
        assert_eq!(summary, SessionSummary { hits: 3, high_score: 5, new_record: false });
        assert_eq!(sim.high_score(), 5);
        assert!(store.saved.is_empty());

        // Tying the record does not count either.
        sim.start(800.0, 600.0);
        sim.hits = 5;
        assert!(!sim.end_session(&mut store).new_record);
        assert!(store.saved.is_empty());
    }
}
