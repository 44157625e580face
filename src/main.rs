mod config;
mod constants;
mod entities;
mod error;
mod game;
mod input;
mod persistence;
mod rendering;
mod simulation;
mod terminal_io;
mod types;

use std::env;
use std::io::{self, Write};

use crossterm::{
    cursor::{Hide, Show},
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    terminal::{disable_raw_mode, enable_raw_mode, size, supports_keyboard_enhancement},
};
use log::{error, info, warn};

use crate::config::GameConfig;
use crate::constants::LOG_FILE;
use crate::error::AppError;
use crate::game::Game;
use crate::rendering::{OutputTarget, ScreenBuffer};
use crate::terminal_io::SimulatedInput;

fn main() -> Result<(), AppError> {
    let config = GameConfig::from_args(env::args().skip(1))?;

    simple_logging::log_to_file(LOG_FILE, config.log_level)?;
    info!("Starting shooty with {:?}", config);

    if let Some(debug) = config.debug.clone() {
        info!("Debug mode enabled at {}x{} for {} frames.", debug.columns, debug.rows, debug.max_frames);
        let target = OutputTarget::ScreenBuffer(ScreenBuffer::new(debug.columns, debug.rows));
        let script = SimulatedInput::demo(debug.max_frames);
        let mut game = Game::new(config, debug.columns, debug.rows, target, Some(script), false);
        game.run()?;
        info!("Debug run finished after {} frames, last session {:?}", game.frame_count(), game.last_summary());
        return Ok(());
    }

    info!("Attempting to enable raw mode.");
    enable_raw_mode().map_err(|e| { error!("Failed to enable raw mode: {}", e); e })?;
    let result = run_in_terminal(config);
    if let Err(e) = disable_raw_mode() {
        error!("Failed to disable raw mode on exit: {}", e);
    }
    info!("Terminal restored.");
    result
}

fn run_in_terminal(config: GameConfig) -> Result<(), AppError> {
    let (terminal_width, terminal_height) = size().map_err(|e| { error!("Failed to get terminal size: {}", e); e })?;
    info!("Terminal size: {}x{}", terminal_width, terminal_height);

    let mut stdout_target = OutputTarget::Stdout(io::stdout());

    // Held-key pad input needs key release events.
    let pad_enabled = supports_keyboard_enhancement().unwrap_or(false);
    if pad_enabled {
        stdout_target.execute_other_command(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))?;
        info!("Keyboard enhancement available, pad input enabled.");
    } else {
        warn!("Terminal does not report key releases, pad input disabled.");
    }

    stdout_target.clear_screen(terminal_width, terminal_height)?;
    stdout_target.execute_other_command(Hide).map_err(|e| { error!("Failed to hide cursor: {}", e); e })?;
    stdout_target.flush()?;

    let mut game = Game::new(config, terminal_width, terminal_height, stdout_target, None, pad_enabled);
    let result = game.run();

    let (width, height) = (game.terminal_width, game.terminal_height);
    let target = &mut game.stdout_target;
    if pad_enabled {
        target.execute_other_command(PopKeyboardEnhancementFlags)?;
    }
    target.clear_screen(width, height)?;
    target.execute_other_command(Show).map_err(|e| { error!("Failed to show cursor on exit: {}", e); e })?;
    target.flush()?;

    result.map_err(AppError::from)
}
