use std::io::{self, Write};
use std::time::{Duration, Instant};
use crossterm::event::{self, Event};
use log::{error, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::GameConfig;
use crate::input::{Command, InputRouter};
use crate::persistence::{FileStore, load_high_score};
use crate::rendering::{GameGrid, OutputTarget};
use crate::simulation::{SessionSummary, Simulation};
use crate::terminal_io::SimulatedInput;

const TITLE_ART: [&str; 5] = [
    r" ____  _   _  ___   ___ _____ __   __",
    r"/ ___|| | | |/ _ \ / _ \_   _|\ \ / /",
    r"\___ \| |_| | | | | | | || |   \ V / ",
    r" ___) |  _  | |_| | |_| || |    | |  ",
    r"|____/|_| |_|\___/ \___/ |_|    |_|  ",
];

pub struct Game {
    pub terminal_width: u16,
    pub terminal_height: u16,
    pub stdout_target: OutputTarget,
    config: GameConfig,
    sim: Simulation<StdRng>,
    store: FileStore,
    input: InputRouter,
    simulated_input: Option<SimulatedInput>,
    max_frames: Option<u64>,
    frame_count: u64,
    next_tick: Instant,
    last_summary: Option<SessionSummary>,
}

impl Game {
    pub fn new(
        config: GameConfig,
        terminal_width: u16,
        terminal_height: u16,
        stdout_target: OutputTarget,
        simulated_input: Option<SimulatedInput>,
        pad_enabled: bool,
    ) -> Self {
        let store = FileStore::new(config.high_score_path.clone());
        let high_score = load_high_score(&store);
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let max_frames = config.debug.as_ref().map(|debug| debug.max_frames);
        Game {
            terminal_width,
            terminal_height,
            stdout_target,
            sim: Simulation::new(config.clone(), rng, high_score),
            config,
            store,
            input: InputRouter::new(pad_enabled),
            simulated_input,
            max_frames,
            frame_count: 0,
            next_tick: Instant::now(),
            last_summary: None,
        }
    }

    /// Alternates between the start screen and sessions until the player quits.
    pub fn run(&mut self) -> io::Result<()> {
        while self.show_start_screen()? {
            self.play_session()?;
        }
        info!("Leaving after {} frames.", self.frame_count);
        Ok(())
    }

    pub fn last_summary(&self) -> Option<SessionSummary> {
        self.last_summary
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    fn frames_exhausted(&self) -> bool {
        self.max_frames.is_some_and(|max| self.frame_count >= max)
    }

    // Returns true when a session should start.
    fn show_start_screen(&mut self) -> io::Result<bool> {
        info!("Showing start screen, high score {}.", self.sim.high_score());
        self.input.reset();
        self.next_tick = Instant::now();
        loop {
            if self.frames_exhausted() {
                return Ok(false);
            }
            self.render_start_screen()?;
            for event in self.next_events()? {
                self.track_resize(&event);
                let mut commands = Vec::new();
                self.input.handle_event(&event, &self.config, &mut commands);
                for command in commands {
                    match command {
                        Command::Start | Command::Fire => return Ok(true),
                        Command::Quit => return Ok(false),
                        Command::Move(_) => {}
                    }
                }
            }
        }
    }

    fn play_session(&mut self) -> io::Result<()> {
        self.stdout_target
            .clear_screen(self.terminal_width, self.terminal_height)
            .map_err(|e| { error!("Failed to clear screen for session: {}", e); e })?;
        self.sim.start(self.config.play_width, self.config.play_height);
        self.input.reset();

        let mut game_grid = GameGrid::new(self.terminal_width, self.terminal_height);
        let mut quit = false;
        while !quit && !self.frames_exhausted() {
            let mut commands = Vec::new();
            for event in self.next_events()? {
                if self.track_resize(&event) {
                    game_grid = GameGrid::new(self.terminal_width, self.terminal_height);
                }
                self.input.handle_event(&event, &self.config, &mut commands);
            }
            commands.extend(self.input.sample_pad(&self.config));

            for command in commands {
                match command {
                    Command::Move(delta) => self.sim.move_ship(delta),
                    Command::Fire => self.sim.fire(),
                    Command::Quit => quit = true,
                    Command::Start => {}
                }
            }

            let ended = self.sim.tick();

            game_grid.clear();
            game_grid.draw_simulation(&self.sim);
            self.render(&game_grid)?;

            if ended {
                break;
            }
        }

        if quit {
            info!("Session abandoned at tick {}.", self.sim.ticks());
        }
        let summary = self.sim.end_session(&mut self.store);
        if summary.new_record {
            info!("New high score {} recorded.", summary.high_score);
        }
        self.last_summary = Some(summary);
        Ok(())
    }

    // Scripted events in debug mode; otherwise everything that arrives before
    // the next tick deadline.
    fn next_events(&mut self) -> io::Result<Vec<Event>> {
        let frame = self.frame_count;
        self.frame_count += 1;

        if let Some(sim_input) = &mut self.simulated_input {
            return Ok(sim_input.take(frame));
        }

        let interval = Duration::from_millis(self.config.tick_interval_ms);
        self.next_tick += interval;
        let now = Instant::now();
        if self.next_tick < now {
            // Fell behind; resynchronize instead of bursting.
            self.next_tick = now + interval;
        }

        let mut events = Vec::new();
        loop {
            let remaining = self.next_tick.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            if event::poll(remaining).map_err(|e| { error!("Failed to poll event: {}", e); e })? {
                events.push(event::read().map_err(|e| { error!("Failed to read event: {}", e); e })?);
            }
        }
        Ok(events)
    }

    fn track_resize(&mut self, event: &Event) -> bool {
        if let Event::Resize(new_width, new_height) = *event {
            self.terminal_width = new_width;
            self.terminal_height = new_height;
            info!("Terminal resized to {}x{}", new_width, new_height);
            return true;
        }
        false
    }

    fn render(&mut self, game_grid: &GameGrid) -> io::Result<()> {
        if let OutputTarget::ScreenBuffer(ref mut sb) = self.stdout_target {
            sb.clear();
            for y in 0..game_grid.height.min(sb.height) {
                for x in 0..game_grid.width.min(sb.width) {
                    sb.buffer[y as usize][x as usize] = game_grid.grid[y as usize][x as usize];
                }
            }
        } else {
            game_grid
                .render(&mut self.stdout_target)
                .map_err(|e| { error!("Failed to render game grid: {}", e); e })?;
        }

        let hud = format!(
            "Hits: {}  Time: {}s  High Score: {}",
            self.sim.hits(),
            self.sim.remaining_seconds(),
            self.sim.high_score()
        );
        self.stdout_target
            .write_at(0, 0, &hud)
            .map_err(|e| { error!("Failed to write HUD: {}", e); e })?;
        self.stdout_target.flush()?;

        if let OutputTarget::ScreenBuffer(ref sb) = self.stdout_target {
            sb.print_to_log();
        }
        Ok(())
    }

    fn render_start_screen(&mut self) -> io::Result<()> {
        let width = self.terminal_width;
        let height = self.terminal_height;
        let target = &mut self.stdout_target;
        target.clear_screen(width, height)?;

        let title_start_y = (height / 2).saturating_sub(TITLE_ART.len() as u16 + 2);
        for (i, line) in TITLE_ART.iter().enumerate() {
            target.write_centered(width, title_start_y + i as u16, line)?;
        }

        let mut y = title_start_y + TITLE_ART.len() as u16 + 1;
        target.write_centered(width, y, &format!("High Score: {}", self.sim.high_score()))?;
        if let Some(summary) = self.last_summary {
            y += 1;
            let record = if summary.new_record { "  New record!" } else { "" };
            target.write_centered(width, y, &format!("Last Score: {}{}", summary.hits, record))?;
        }

        let mut controls = vec![
            "Enter / Space : Start",
            "Left / Right  : Move",
            "Space         : Fire",
        ];
        if self.input.pad_enabled() {
            controls.push("a / d / j     : Pad move and fire");
        }
        controls.push("q / Esc       : Quit");
        y += 2;
        for line in controls {
            target.write_centered(width, y, line)?;
            y += 1;
        }
        target.flush()
    }
}
