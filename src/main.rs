//! Terminal puzzle runner (default binary).
//!
//! Uses crossterm for input and the framebuffer renderer from `tui_tiles::term`.
//! The level timer ticks on a small tokio runtime; everything else runs on the
//! main thread. Each level opens with the solved picture on show; the clock
//! starts when the preview ends.

mod cli;

use std::fs::File;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use tui_tiles::core::SimpleRng;
use tui_tiles::engine::{
    level_index, load_campaign, next_level, CompletionEvent, LevelSession, Preview, Progress,
    SessionEvent, SessionEvents, TimerController,
};
use tui_tiles::input::{
    handle_key_event, handle_mouse_event, should_quit, Command, InputEvent, KeyAction,
};
use tui_tiles::term::{FrameBuffer, Hud, Phase, PuzzleView, TerminalRenderer, Viewport};
use tui_tiles::types::{Campaign, InputMode, PREVIEW_MS, TICK_MS};

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;

    let campaign = match &cli.campaign {
        Some(path) => load_campaign(path)?,
        None => Campaign::default(),
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("tui-tiles-timer")
        .enable_time()
        .build()
        .context("failed to start timer runtime")?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &cli, &campaign, runtime.handle().clone());

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

/// Log to a file so the TUI is not disturbed.
fn init_logging(path: &Path) -> Result<()> {
    let log_file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow!("failed to install log subscriber: {err}"))
}

/// Level in progress plus its clock.
struct Game<'a> {
    campaign: &'a Campaign,
    index: usize,
    session: LevelSession,
    timer: TimerController,
    /// Seconds shown in the HUD, fed by the timer tick.
    clock: Arc<AtomicU64>,
    finished: Option<CompletionEvent>,
    progress: Progress,
    /// Set while the solved picture is on show.
    preview: Option<Preview>,
}

impl<'a> Game<'a> {
    fn new(campaign: &'a Campaign, cli: &Cli, handle: tokio::runtime::Handle) -> Self {
        let index = level_index(campaign, cli.level);
        let rng = cli.seed.map(SimpleRng::new).unwrap_or_else(SimpleRng::from_entropy);
        let mut session = LevelSession::new(campaign.levels[index].clone(), rng);
        session.set_mode(cli.mode);

        let mut game = Self {
            campaign,
            index,
            session,
            timer: TimerController::new(handle),
            clock: Arc::new(AtomicU64::new(0)),
            finished: None,
            progress: Progress::new(campaign),
            preview: None,
        };
        game.begin_preview();
        game
    }

    /// Show the solved picture; the clock waits until [`Game::start_play`].
    fn begin_preview(&mut self) {
        self.timer.stop();
        self.clock.store(0, Ordering::Relaxed);
        self.finished = None;
        let duration = Duration::from_millis(PREVIEW_MS);
        self.preview = Some(Preview::new(Instant::now(), duration));
        debug!(level = self.session.model().level().level, "preview started");
    }

    fn start_play(&mut self) {
        self.preview = None;
        self.clock.store(0, Ordering::Relaxed);
        let clock = Arc::clone(&self.clock);
        self.timer
            .restart(Some(Box::new(move |secs| clock.store(secs, Ordering::Relaxed))));
    }

    fn previewing(&self) -> bool {
        self.preview.is_some()
    }

    /// End the preview once its time is up.
    fn tick(&mut self, now: Instant) {
        if self.preview.is_some_and(|p| p.is_over(now)) {
            self.start_play();
        }
    }

    fn elapsed(&self) -> u64 {
        match self.finished {
            Some(done) => done.stats.time,
            None => self.clock.load(Ordering::Relaxed),
        }
    }

    fn campaign_complete(&self) -> bool {
        self.session.is_completed() && next_level(self.campaign, self.index).is_none()
    }

    fn command(&mut self, command: Command) {
        match command {
            Command::Restart => {
                self.session.restart();
                self.begin_preview();
            }
            Command::NextLevel => {
                if !self.session.is_completed() {
                    return;
                }
                let Some((index, level)) = next_level(self.campaign, self.index) else {
                    return;
                };
                self.index = index;
                self.session.load_level(level.clone());
                self.begin_preview();
            }
            Command::ToggleMode => {
                let mode = match self.session.mode() {
                    InputMode::Drag => InputMode::Select,
                    InputMode::Select => InputMode::Drag,
                };
                self.session.set_mode(mode);
            }
        }
    }

    fn input(&mut self, event: InputEvent, viewport: Viewport, view: &PuzzleView) {
        let layout = view.layout(self.session.model().grid_size(), viewport);
        let events = self.session.apply(event, layout);
        self.on_events(&events);
    }

    fn on_events(&mut self, events: &SessionEvents) {
        if !events.contains(&SessionEvent::Swapped { completed: true }) {
            return;
        }
        self.timer.stop();
        self.finished = self.session.completion(self.timer.elapsed());
        let Some(done) = self.finished else {
            return;
        };
        self.progress.record(done);
        info!(
            level = done.level,
            time = done.stats.time,
            moves = done.stats.moves,
            "level completed"
        );
        if self.campaign_complete() {
            info!(
                title = %self.campaign.title,
                solved = self.progress.completed(),
                levels = self.campaign.levels.len(),
                "campaign completed"
            );
        }
    }

    fn hud(&self) -> Hud<'_> {
        let phase = match self.preview {
            Some(preview) => Phase::Preview {
                remaining: preview.remaining_secs(Instant::now()),
            },
            None if self.campaign_complete() => Phase::CampaignComplete,
            None => Phase::Playing,
        };
        Hud {
            title: &self.campaign.title,
            level_count: self.campaign.levels.len(),
            elapsed: self.elapsed(),
            phase,
            progress: self.progress.records(),
        }
    }
}

fn run(
    term: &mut TerminalRenderer,
    cli: &Cli,
    campaign: &Campaign,
    handle: tokio::runtime::Handle,
) -> Result<()> {
    let mut game = Game::new(campaign, cli, handle);
    let view = PuzzleView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let frame = Duration::from_millis(TICK_MS as u64);

    loop {
        game.tick(Instant::now());
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let viewport = Viewport::new(w, h);
        view.render_into(&game.session, &game.hud(), viewport, &mut fb);
        term.draw_swap(&mut fb)?;

        if !event::poll(frame)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if should_quit(key) {
                    return Ok(());
                }
                // Any other key cuts the preview short.
                if game.previewing() {
                    game.start_play();
                    continue;
                }
                match handle_key_event(key) {
                    Some(KeyAction::Input(input)) => game.input(input, viewport, &view),
                    Some(KeyAction::Command(command)) => game.command(command),
                    None => {}
                }
            }
            Event::Mouse(_) if game.previewing() => {}
            Event::Mouse(mouse) => {
                if let Some(input) = handle_mouse_event(mouse) {
                    game.input(input, viewport, &view);
                }
            }
            // The pointer source is gone; a half-finished drag must not linger.
            Event::FocusLost => game.input(InputEvent::PointerCancel, viewport, &view),
            // The board moves with the terminal size, so a drag's cached
            // geometry is void.
            Event::Resize(_, _) => {
                game.input(InputEvent::PointerCancel, viewport, &view);
                term.invalidate();
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_logging_init_is_an_error() {
        let path = std::env::temp_dir().join(format!("tui-tiles-log-{}.log", std::process::id()));
        let _ = init_logging(&path);
        let err = init_logging(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(err.to_string().contains("log subscriber"));
    }
}
