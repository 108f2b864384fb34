use anyhow::{Context, Result};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{
        self, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
    },
};
use futures::StreamExt;
use log::{debug, info, trace, warn};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::time::{Instant, Interval, interval, interval_at};

use crate::game::{GameConfig, GameEngine, SnakeSession, TickTransition, Viewport};
use crate::input::InputHandler;
use crate::metrics::GameMetrics;
use crate::render::{Renderer, WindowLayout};

/// Pixel size assumed for a terminal cell when the terminal does not report
/// its pixel dimensions
const FALLBACK_COLUMN_PX: u32 = 10;
const FALLBACK_ROW_PX: u32 = 20;

/// Runs the Snake minigame in the terminal.
///
/// Bridges crossterm events and tokio timers to the host-independent
/// [`SnakeSession`].
pub struct PlayMode {
    session: SnakeSession,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    layout: WindowLayout,
    closed: Arc<AtomicBool>,
}

impl PlayMode {
    pub fn new(config: GameConfig, seed: Option<u64>, fullscreen: bool) -> Self {
        let closed = Arc::new(AtomicBool::new(false));
        let on_close = {
            let closed = Arc::clone(&closed);
            Box::new(move || closed.store(true, Ordering::SeqCst))
        };

        let engine = match seed {
            Some(seed) => GameEngine::with_seed(config, seed),
            None => GameEngine::new(config),
        };
        let mut session = SnakeSession::with_engine(engine, read_viewport(), on_close);
        if fullscreen {
            session.toggle_fullscreen();
        }

        Self {
            session,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            layout: WindowLayout::default(),
            closed,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut ticker: Option<Interval> = None;

        // Render at 30 FPS (33ms per frame)
        let mut render_timer = interval(Duration::from_millis(33));

        info!(
            "Snake mounted, viewport {}x{}, grid {}",
            self.session.viewport().width,
            self.session.viewport().height,
            self.session.geometry().grid_size
        );

        while !self.closed.load(Ordering::SeqCst) {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => warn!("Terminal event error: {}", err),
                        None => break,
                    }
                }

                // Game logic tick, only while the driver holds a timer
                _ = next_tick(&mut ticker) => {
                    self.update_game();
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    terminal.draw(|frame| {
                        self.layout = self.renderer.render(frame, self.session.state(), &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.session.close();
                }
            }

            if let Some(transition) = self.session.poll_timer() {
                apply_transition(&mut ticker, transition);
            }
        }

        if let Some(transition) = self.session.unmount() {
            apply_transition(&mut ticker, transition);
        }
        info!("Snake unmounted");

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => {
                // Only process key press events, not release
                if key.kind != KeyEventKind::Press {
                    return;
                }

                if InputHandler::is_interrupt(&key) {
                    self.session.close();
                    return;
                }

                let was_started = self.session.state().game_started;
                let was_over = self.session.state().game_over;

                let action = self
                    .input_handler
                    .handle_key_event(key, self.session.state());
                if !action.is_consumed() {
                    trace!("Key {:?} passed through", key.code);
                    return;
                }
                self.session.apply(action);

                let state = self.session.state();
                if (!was_started && state.game_started) || (was_over && !state.game_over) {
                    self.metrics.on_game_start();
                }
            }
            Event::Mouse(mouse) => {
                if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
                    return;
                }
                if let Some(control) = self.layout.hit_test(mouse.column, mouse.row) {
                    debug!("Chrome control {:?}", control);
                    self.session.handle_control(control);
                }
            }
            Event::Resize(_, _) => {
                self.session.resize(read_viewport());
            }
            _ => {}
        }
    }

    fn update_game(&mut self) {
        if let Some(result) = self.session.tick() {
            if result.terminated() {
                self.metrics.on_game_over(self.session.state().score);
            }
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )
        .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

/// Wait for the next tick, or forever when no timer is live
async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

fn apply_transition(ticker: &mut Option<Interval>, transition: TickTransition) {
    match transition {
        TickTransition::Start(period) => {
            // First move lands one full period after the start
            *ticker = Some(interval_at(Instant::now() + period, period));
        }
        TickTransition::Stop => {
            *ticker = None;
        }
    }
}

/// Viewport in pixels, estimated from the cell grid if the terminal does not
/// report pixel sizes
fn read_viewport() -> Viewport {
    match terminal::window_size() {
        Ok(size) if size.width > 0 && size.height > 0 => {
            Viewport::new(size.width as u32, size.height as u32)
        }
        Ok(size) => Viewport::new(
            size.columns as u32 * FALLBACK_COLUMN_PX,
            size.rows as u32 * FALLBACK_ROW_PX,
        ),
        Err(err) => {
            debug!("Terminal size unavailable: {}", err);
            let (columns, rows) = terminal::size().unwrap_or((80, 24));
            Viewport::new(
                columns as u32 * FALLBACK_COLUMN_PX,
                rows as u32 * FALLBACK_ROW_PX,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_timer_lifecycle() {
        let period = Duration::from_millis(150);
        let mut ticker = None;

        apply_transition(&mut ticker, TickTransition::Start(period));
        assert!(ticker.is_some());

        let before = Instant::now();
        next_tick(&mut ticker).await;
        assert!(Instant::now() - before >= period);

        apply_transition(&mut ticker, TickTransition::Stop);
        assert!(ticker.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_tick_without_timer() {
        let mut ticker = None;
        let waited = tokio::time::timeout(Duration::from_secs(5), next_tick(&mut ticker)).await;
        assert!(waited.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_driven_by_interval() {
        let mut session = SnakeSession::with_engine(
            GameEngine::with_seed(GameConfig::default(), 1),
            Viewport::new(800, 600),
            Box::new(|| {}),
        );
        let mut ticker = None;

        session.handle_key("p");
        if let Some(transition) = session.poll_timer() {
            apply_transition(&mut ticker, transition);
        }

        for _ in 0..3 {
            next_tick(&mut ticker).await;
            session.tick();
        }
        assert_eq!(session.state().snake.head().x, 18);

        if let Some(transition) = session.unmount() {
            apply_transition(&mut ticker, transition);
        }
        assert!(ticker.is_none());
    }
}
