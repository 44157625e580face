//! Turns raw key events into core commands.
//!
//! Two sources feed the core. Arrow keys and Space act on every press, like
//! a keyboard. The `a`/`d`/`j` pad is sampled once per tick from held state
//! and fires only on the released-to-pressed edge.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};

use crate::config::GameConfig;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    Move(f64),
    Fire,
    Start,
    Quit,
}

/// Discrete key presses. Releases are ignored; auto-repeat counts as a press.
pub fn key_command(key: &KeyEvent, config: &GameConfig) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    match key.code {
        KeyCode::Left => Some(Command::Move(-config.key_step)),
        KeyCode::Right => Some(Command::Move(config.key_step)),
        KeyCode::Char(' ') => Some(Command::Fire),
        KeyCode::Enter => Some(Command::Start),
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
        _ => None,
    }
}

/// Buttons of the held-state pad.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PadState {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

impl PadState {
    /// Tracks press/release of pad keys. Returns `true` if the key belongs to the pad.
    pub fn apply(&mut self, key: &KeyEvent) -> bool {
        let held = key.kind != KeyEventKind::Release;
        match key.code {
            KeyCode::Char('a') => self.left = held,
            KeyCode::Char('d') => self.right = held,
            KeyCode::Char('j') => self.fire = held,
            _ => return false,
        }
        true
    }
}

/// Keeps the previous reading so fire triggers once per press.
#[derive(Debug, Default)]
pub struct PadSampler {
    previous: PadState,
}

impl PadSampler {
    pub fn sample(&mut self, reading: PadState, config: &GameConfig) -> Vec<Command> {
        let mut commands = Vec::new();
        if reading.left {
            commands.push(Command::Move(-config.pad_step));
        }
        if reading.right {
            commands.push(Command::Move(config.pad_step));
        }
        if reading.fire && !self.previous.fire {
            commands.push(Command::Fire);
        }
        self.previous = reading;
        commands
    }

    pub fn reset(&mut self) {
        self.previous = PadState::default();
    }
}

/// Routes one terminal event into per-tick commands and pad state.
pub struct InputRouter {
    pad_enabled: bool,
    pad: PadState,
    sampler: PadSampler,
}

impl InputRouter {
    /// The pad needs release events, so it is only enabled when the terminal reports them.
    pub fn new(pad_enabled: bool) -> Self {
        InputRouter {
            pad_enabled,
            pad: PadState::default(),
            sampler: PadSampler::default(),
        }
    }

    pub fn pad_enabled(&self) -> bool {
        self.pad_enabled
    }

    pub fn handle_event(&mut self, event: &Event, config: &GameConfig, commands: &mut Vec<Command>) {
        if let Event::Key(key) = event {
            if self.pad_enabled && self.pad.apply(key) {
                return;
            }
            if let Some(command) = key_command(key, config) {
                commands.push(command);
            }
        }
    }

    /// Once per tick, after all pending events are handled.
    pub fn sample_pad(&mut self, config: &GameConfig) -> Vec<Command> {
        if !self.pad_enabled {
            return Vec::new();
        }
        self.sampler.sample(self.pad, config)
    }

    pub fn reset(&mut self) {
        self.pad = PadState::default();
        self.sampler.reset();
    }
}
