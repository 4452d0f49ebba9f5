//! App: terminal init, main loop, tick and key handling.

use crate::Args;
use crate::input::{Action, key_to_action};
use crate::theme::Theme;
use crate::ui::{self, FxState};
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};
use tentrixtui::{GameEvent, Session, SessionConfig};

pub struct App {
    theme: Theme,
    session: Session,
    tick_interval: Duration,
    frame_duration: Duration,
    last_tick: Instant,
    no_animation: bool,
    fx: FxState,
}

impl App {
    pub fn new(args: &Args, config: SessionConfig, theme: Theme) -> Result<Self> {
        let tick_interval = config.tick_interval;
        let session = Session::new(config)?;
        let frame_rate = if args.frame_rate > 0.0 { args.frame_rate } else { 30.0 };
        Ok(Self {
            theme,
            session,
            tick_interval,
            frame_duration: Duration::from_secs_f64(1.0 / frame_rate),
            last_tick: Instant::now(),
            no_animation: args.no_animation,
            fx: FxState::default(),
        })
    }

    fn reset_game(&mut self) {
        self.session.start();
        self.last_tick = Instant::now();
        self.fx = FxState::default();
    }

    /// Returns `false` when the app should exit.
    fn apply_action(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return false,
            Action::Pause => {
                if self.session.toggle_pause() && !self.session.is_paused() {
                    // Resume with a full interval before the next tick.
                    self.last_tick = Instant::now();
                }
            }
            Action::MoveLeft => {
                self.session.move_left();
            }
            Action::MoveRight => {
                self.session.move_right();
            }
            Action::SoftDrop => {
                self.session.soft_drop();
            }
            Action::HardDrop => {
                self.session.hard_drop();
            }
            Action::Restart => {
                if self.session.is_game_over() {
                    self.reset_game();
                }
            }
            Action::None => {}
        }
        true
    }

    /// Turn engine events into effects.
    fn absorb_events(&mut self) {
        for event in self.session.drain_events() {
            if self.no_animation {
                continue;
            }
            match event {
                GameEvent::GroupCleared { cells, .. } => self.fx.flash_cells(&cells),
                GameEvent::ComboTriggered { count, bonus } => self.fx.show_combo(count, bonus),
                GameEvent::PieceSpawned { .. }
                | GameEvent::BlockPlaced { .. }
                | GameEvent::PauseToggled { .. }
                | GameEvent::GameOver { .. } => {}
            }
        }
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let mut terminal =
            ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

        let result = self.run_loop(&mut terminal);

        // Restore
        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            let now = Instant::now();
            self.absorb_events();
            terminal.draw(|f| ui::draw(f, &self.session, &self.theme, &mut self.fx, now))?;

            let timeout = self.frame_duration.saturating_sub(now.elapsed());
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    if let Event::Key(key) = event::read()? {
                        // Release/repeat reports are ignored; the terminal's own
                        // auto-repeat arrives as further presses.
                        if key.kind != KeyEventKind::Press {
                            continue;
                        }
                        if !self.apply_action(key_to_action(key)) {
                            return Ok(());
                        }
                    }
                }
            }

            if !self.session.is_paused()
                && !self.session.is_game_over()
                && self.last_tick.elapsed() >= self.tick_interval
            {
                self.last_tick = Instant::now();
                self.session.tick();
            }
        }
    }
}
