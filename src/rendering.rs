use std::io::{self, Write};
use log::info;
use crossterm::{
    cursor::MoveTo,
    execute,
};
use rand::Rng;

use crate::simulation::Simulation;
use crate::types::Vector2D;

pub const SHIP_CHAR: char = '^';
pub const BULLET_CHAR: char = '|';
pub const ASTEROID_CHAR: char = '*';

// --- ScreenBuffer for simulated rendering ---
pub struct ScreenBuffer {
    pub buffer: Vec<Vec<char>>,
    pub width: u16,
    pub height: u16,
    pub cursor_x: u16,
    pub cursor_y: u16,
}

impl ScreenBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        ScreenBuffer {
            buffer: vec![vec![' '; width as usize]; height as usize],
            width,
            height,
            cursor_x: 0,
            cursor_y: 0,
        }
    }

    pub fn move_to(&mut self, x: u16, y: u16) {
        self.cursor_x = x;
        self.cursor_y = y;
    }

    pub fn write_char(&mut self, c: char) {
        if self.cursor_y < self.height && self.cursor_x < self.width {
            self.buffer[self.cursor_y as usize][self.cursor_x as usize] = c;
        }
    }

    pub fn write_str(&mut self, s: &str) {
        for c in s.chars() {
            self.write_char(c);
            self.cursor_x = self.cursor_x.saturating_add(1);
        }
    }

    pub fn clear(&mut self) {
        self.buffer = vec![vec![' '; self.width as usize]; self.height as usize];
        self.cursor_x = 0;
        self.cursor_y = 0;
    }

    pub fn row(&self, y: u16) -> String {
        self.buffer[y as usize].iter().collect()
    }

    pub fn print_to_log(&self) {
        info!("--- Screen Buffer ---");
        for y in 0..self.height {
            info!("{}", self.row(y));
        }
        info!("---------------------");
    }
}

// --- OutputTarget enum to handle stdout or ScreenBuffer ---
pub enum OutputTarget {
    Stdout(io::Stdout),
    ScreenBuffer(ScreenBuffer),
}

impl OutputTarget {
    pub fn execute_move_to(&mut self, command: MoveTo) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => execute!(s, command),
            OutputTarget::ScreenBuffer(sb) => {
                sb.move_to(command.0, command.1);
                Ok(())
            },
        }
    }

    pub fn execute_other_command(&mut self, command: impl crossterm::Command) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => execute!(s, command),
            OutputTarget::ScreenBuffer(_) => Ok(()), // No terminal state in debug mode
        }
    }

    pub fn write_at(&mut self, x: u16, y: u16, text: &str) -> io::Result<()> {
        self.execute_move_to(MoveTo(x, y))?;
        write!(self, "{}", text)
    }

    /// Writes `text` horizontally centred on row `y`.
    pub fn write_centered(&mut self, width: u16, y: u16, text: &str) -> io::Result<()> {
        let x = (width / 2).saturating_sub(text.chars().count() as u16 / 2);
        self.write_at(x, y, text)
    }

    pub fn clear_screen(&mut self, width: u16, height: u16) -> io::Result<()> {
        if let OutputTarget::ScreenBuffer(sb) = self {
            sb.clear();
            return Ok(());
        }
        for y in 0..height {
            self.write_at(0, y, &" ".repeat(width as usize))?;
        }
        self.execute_move_to(MoveTo(0, 0))
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputTarget::Stdout(s) => s.write(buf),
            OutputTarget::ScreenBuffer(sb) => {
                let s = String::from_utf8_lossy(buf);
                sb.write_str(&s);
                Ok(buf.len())
            },
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => s.flush(),
            OutputTarget::ScreenBuffer(_) => Ok(()),
        }
    }
}

// --- Viewport: play-area units to terminal cells ---
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    play_width: f64,
    play_height: f64,
    columns: u16,
    rows: u16,
}

impl Viewport {
    /// Row 0 is left to the HUD; the play area fills the rows below it.
    pub const TOP: u16 = 1;

    pub fn new(play_width: f64, play_height: f64, columns: u16, rows: u16) -> Self {
        Viewport { play_width, play_height, columns, rows }
    }

    pub fn project(&self, position: Vector2D) -> Option<(u16, u16)> {
        let field_rows = self.rows.saturating_sub(Viewport::TOP);
        if position.x < 0.0 || position.y < 0.0 || field_rows == 0 || self.columns == 0 {
            return None;
        }
        let col = (position.x / self.play_width * self.columns as f64).floor();
        let row = (position.y / self.play_height * field_rows as f64).floor();
        let col = (col as u16).min(self.columns - 1);
        let row = (row as u16).min(field_rows - 1);
        Some((col, row + Viewport::TOP))
    }
}

// --- GameGrid for character rendering ---
pub struct GameGrid {
    pub grid: Vec<Vec<char>>,
    pub width: u16,
    pub height: u16,
}

impl GameGrid {
    pub fn new(width: u16, height: u16) -> Self {
        GameGrid {
            grid: vec![vec![' '; width as usize]; height as usize],
            width,
            height,
        }
    }

    pub fn set_char(&mut self, x: u16, y: u16, c: char) {
        if y < self.height && x < self.width {
            self.grid[y as usize][x as usize] = c;
        }
    }

    pub fn clear(&mut self) {
        self.grid = vec![vec![' '; self.width as usize]; self.height as usize];
    }

    pub fn render(&self, stdout: &mut OutputTarget) -> io::Result<()> {
        for y in 0..self.height {
            stdout.execute_move_to(MoveTo(0, y))?;
            write!(stdout, "{}", self.row(y))?;
        }
        Ok(())
    }

    /// Draws the current simulation state. Asteroids first so shots stay visible.
    pub fn draw_simulation<R: Rng>(&mut self, sim: &Simulation<R>) {
        let (play_width, play_height) = sim.play_area();
        let viewport = Viewport::new(play_width, play_height, self.width, self.height);

        for asteroid in sim.asteroids() {
            if let Some((x, y)) = viewport.project(asteroid.position) {
                self.set_char(x, y, ASTEROID_CHAR);
            }
        }
        for bullet in sim.bullets() {
            if let Some((x, y)) = viewport.project(bullet.position) {
                self.set_char(x, y, BULLET_CHAR);
            }
        }

        let ship = sim.ship();
        let left = viewport.project(ship.position);
        let right = viewport.project(Vector2D::new(ship.position.x + ship.width, ship.position.y));
        let nose = viewport.project(ship.muzzle());
        if let (Some((lx, y)), Some((rx, _)), Some((nx, _))) = (left, right, nose) {
            self.set_char(lx, y, '/');
            self.set_char(rx, y, '\u{005C}');
            self.set_char(nx, y, SHIP_CHAR);
        }
    }

    pub fn row(&self, y: u16) -> String {
        self.grid[y as usize].iter().collect()
    }
}
