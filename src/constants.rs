// --- Session Defaults ---
pub const MAX_ASTEROIDS: usize = 20;
pub const MAX_BULLETS: usize = 50;
pub const GAME_DURATION_TICKS: u32 = 1500; // 50 seconds at 30 ticks per second
pub const TICK_INTERVAL_MS: u64 = 33; // ~30 Hz

pub const BULLET_SPEED: f64 = 5.0; // Units per tick, upward
pub const HIT_REACH: f64 = 10.0; // Per-axis proximity for a hit

pub const PAD_MOVE_STEP: f64 = 5.0; // Held pad direction, applied every tick
pub const KEY_MOVE_STEP: f64 = 10.0; // One arrow key press

// --- Play Area (design units) ---
pub const PLAY_AREA_WIDTH: f64 = 800.0;
pub const PLAY_AREA_HEIGHT: f64 = 600.0;

pub const SHIP_WIDTH: f64 = 30.0;
pub const SHIP_HEIGHT: f64 = 20.0;
pub const SHIP_BOTTOM_MARGIN: f64 = 20.0;

// --- Presentation ---
pub const HIGH_SCORE_FILE: &str = "highscore.txt";
pub const LOG_FILE: &str = "shooty.log";
pub const DEBUG_COLUMNS: u16 = 80;
pub const DEBUG_ROWS: u16 = 24;
pub const DEBUG_MAX_FRAMES: u64 = 120;
