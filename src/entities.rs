use rand::Rng;

use crate::types::{Vector2D, clamp_coordinate};

// --- Ship ---
pub struct Ship {
    /// Top-left corner in play-area units.
    pub position: Vector2D,
    pub width: f64,
    pub height: f64,
}

impl Ship {
    pub fn new(play_width: f64, play_height: f64, width: f64, height: f64, margin: f64) -> Self {
        let x = clamp_coordinate((play_width - width) / 2.0, play_width - width);
        Ship {
            position: Vector2D::new(x, Ship::resting_y(play_height, height, margin)),
            width,
            height,
        }
    }

    fn resting_y(play_height: f64, height: f64, margin: f64) -> f64 {
        (play_height - height - margin).max(0.0)
    }

    /// Keeps the horizontal position, re-fits it to a (possibly new) play area.
    pub fn fit_to(&mut self, play_width: f64, play_height: f64, margin: f64) {
        self.position.x = clamp_coordinate(self.position.x, play_width - self.width);
        self.position.y = Ship::resting_y(play_height, self.height, margin);
    }

    pub fn shift(&mut self, delta: f64, play_width: f64) {
        self.position.x = clamp_coordinate(self.position.x + delta, play_width - self.width);
    }

    /// Where a freshly fired bullet starts.
    pub fn muzzle(&self) -> Vector2D {
        Vector2D::new(self.position.x + self.width / 2.0, self.position.y)
    }
}

// --- Bullet ---
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bullet {
    pub position: Vector2D,
}

impl Bullet {
    pub fn new(position: Vector2D) -> Self {
        Bullet { position }
    }

    pub fn update(&mut self, speed: f64) {
        self.position = self.position.add(Vector2D::new(0.0, -speed));
    }

    pub fn is_off_screen(&self) -> bool {
        self.position.y < 0.0
    }
}

// --- Asteroid ---
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Asteroid {
    pub position: Vector2D,
}

impl Asteroid {
    pub fn new(x: f64, y: f64) -> Self {
        Asteroid { position: Vector2D::new(x, y) }
    }

    /// Uniform spawn over `[0, width) x [0, height / 2)`.
    pub fn spawn(rng: &mut impl Rng, play_width: f64, play_height: f64) -> Self {
        Asteroid::new(sample_below(rng, play_width), sample_below(rng, play_height / 2.0))
    }
}

fn sample_below(rng: &mut impl Rng, max: f64) -> f64 {
    if max > 0.0 { rng.gen_range(0.0..max) } else { 0.0 }
}
