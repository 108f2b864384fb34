use log::{debug, info};

use super::{
    config::GameConfig,
    engine::{GameEngine, StepResult},
    geometry::{GridGeometry, Viewport},
    state::GameState,
    ticker::{TickDriver, TickPhase, TickTransition},
};
use crate::input::{ChromeControl, InputHandler, KeyAction};

/// Callback run when the player leaves the game view
pub type CloseCallback = Box<dyn FnMut() + Send>;

/// The mounted Snake minigame.
///
/// Owns the game state and every way it can change: key presses, timer
/// ticks, viewport changes and the window chrome. Hosts feed it events and
/// apply the timer transitions returned by [`SnakeSession::poll_timer`].
pub struct SnakeSession {
    engine: GameEngine,
    state: GameState,
    viewport: Viewport,
    geometry: GridGeometry,
    ticker: TickDriver,
    input: InputHandler,
    on_close: CloseCallback,
}

impl SnakeSession {
    pub fn new(config: GameConfig, viewport: Viewport, on_close: CloseCallback) -> Self {
        Self::with_engine(GameEngine::new(config), viewport, on_close)
    }

    pub fn with_engine(engine: GameEngine, viewport: Viewport, on_close: CloseCallback) -> Self {
        let state = engine.initial_state();
        let geometry = GridGeometry::calculate(viewport, state.is_fullscreen, engine.config());
        let ticker = TickDriver::new(engine.config().tick_period());

        let mut session = Self {
            engine,
            state,
            viewport,
            geometry,
            ticker,
            input: InputHandler::new(),
            on_close,
        };
        session.state.regrid(session.geometry.grid_size);
        session
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn geometry(&self) -> GridGeometry {
        self.geometry
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn tick_phase(&self) -> TickPhase {
        self.ticker.phase()
    }

    /// Dispatch a key by name and apply its action
    pub fn handle_key(&mut self, key: &str) -> KeyAction {
        let action = self.input.resolve(key, &self.state);
        self.apply(action);
        action
    }

    /// Apply an already resolved key action
    pub fn apply(&mut self, action: KeyAction) {
        match action {
            KeyAction::Close => self.close(),
            KeyAction::Start => self.start(),
            KeyAction::Restart => self.reset(),
            KeyAction::Steer(direction) => {
                self.engine.set_direction(&mut self.state, direction);
            }
            KeyAction::None => {}
        }
    }

    /// One timer tick: moves the snake only while the driver is running
    pub fn tick(&mut self) -> Option<StepResult> {
        if !self.ticker.is_running() || !self.state.is_active() {
            return None;
        }
        Some(self.engine.step(&mut self.state))
    }

    /// Transition the host must apply to its timer after the last event
    pub fn poll_timer(&mut self) -> Option<TickTransition> {
        self.ticker.sync(self.state.game_started, self.state.game_over)
    }

    /// Final teardown. Returns `Stop` if a timer is still live.
    pub fn unmount(&mut self) -> Option<TickTransition> {
        self.ticker.unmount()
    }

    pub fn start(&mut self) {
        if !self.state.game_started {
            self.state.game_started = true;
            info!("Game started on a {0}x{0} grid", self.state.grid_size);
        }
    }

    pub fn reset(&mut self) {
        self.engine.reset(&mut self.state);
        info!("Game restarted");
    }

    pub fn close(&mut self) {
        debug!("Close requested");
        (self.on_close)();
    }

    /// New viewport size from the host: recompute the grid and clamp into it
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.recalculate();
    }

    pub fn toggle_fullscreen(&mut self) {
        self.state.is_fullscreen = !self.state.is_fullscreen;
        self.recalculate();
    }

    pub fn set_minimized(&mut self, minimized: bool) {
        self.state.is_minimized = minimized;
    }

    pub fn handle_control(&mut self, control: ChromeControl) {
        match control {
            ChromeControl::Close => self.close(),
            ChromeControl::Minimize => self.set_minimized(true),
            ChromeControl::Restore => self.set_minimized(false),
            ChromeControl::ToggleFullscreen => self.toggle_fullscreen(),
        }
    }

    fn recalculate(&mut self) {
        let geometry = GridGeometry::calculate(
            self.viewport,
            self.state.is_fullscreen,
            self.engine.config(),
        );
        if geometry != self.geometry {
            debug!(
                "Grid resized from {} to {} cells",
                self.geometry.grid_size, geometry.grid_size
            );
        }
        self.geometry = geometry;
        self.state.regrid(geometry.grid_size);
    }

    #[cfg(test)]
    fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, Position, Snake};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn session_with_counter() -> (SnakeSession, Arc<AtomicUsize>) {
        let closes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&closes);
        let session = SnakeSession::with_engine(
            GameEngine::with_seed(GameConfig::default(), 3),
            Viewport::new(1200, 900),
            Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );
        (session, closes)
    }

    fn session() -> SnakeSession {
        session_with_counter().0
    }

    #[test]
    fn test_mount_state() {
        let mut session = session();
        assert_eq!(session.geometry().grid_size, 30);
        assert_eq!(session.tick_phase(), TickPhase::Idle);
        assert_eq!(session.poll_timer(), None);
        assert_eq!(session.tick(), None);
        assert_eq!(session.state().snake.head(), Position::new(15, 15));
    }

    #[test]
    fn test_arrow_before_start_is_ignored() {
        let mut session = session();

        assert_eq!(session.handle_key("arrowup"), KeyAction::None);
        assert_eq!(session.state().snake.direction, Direction::Right);

        assert_eq!(session.handle_key("p"), KeyAction::Start);
        assert!(session.state().game_started);
        assert_eq!(
            session.poll_timer(),
            Some(TickTransition::Start(GameConfig::default().tick_period()))
        );
    }

    #[test]
    fn test_ticks_move_the_snake() {
        let mut session = session();
        session.handle_key("p");
        session.poll_timer();

        session.tick();
        assert_eq!(session.state().snake.head(), Position::new(16, 15));

        session.handle_key("ArrowDown");
        // Direction waits for the next tick
        assert_eq!(session.state().snake.head(), Position::new(16, 15));
        session.tick();
        assert_eq!(session.state().snake.head(), Position::new(16, 16));
    }

    #[test]
    fn test_reversal_is_ignored() {
        let mut session = session();
        session.handle_key("p");
        session.poll_timer();
        let before = session.state().clone();

        assert_eq!(
            session.handle_key("ArrowLeft"),
            KeyAction::Steer(Direction::Left)
        );
        assert_eq!(session.state(), &before);
    }

    #[test]
    fn test_game_over_and_restart() {
        let mut session = session();
        session.handle_key("p");
        session.poll_timer();
        session.state_mut().snake = Snake::new(Position::new(29, 3), Direction::Right);

        let result = session.tick().unwrap();
        assert!(result.terminated());
        assert!(session.state().game_over);
        assert_eq!(session.poll_timer(), Some(TickTransition::Stop));
        assert_eq!(session.tick(), None);

        // Escape still works after game over
        assert_eq!(session.handle_key("Escape"), KeyAction::Close);

        assert_eq!(session.handle_key("r"), KeyAction::Restart);
        assert!(!session.state().game_over);
        assert_eq!(session.state().snake.len(), 1);
        assert_eq!(session.state().score, 0);
        assert!(matches!(
            session.poll_timer(),
            Some(TickTransition::Start(_))
        ));
        assert!(session.tick().is_some());
    }

    #[test]
    fn test_close_invokes_callback() {
        let (mut session, closes) = session_with_counter();
        session.handle_key("escape");
        session.handle_control(ChromeControl::Close);
        assert_eq!(closes.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_fullscreen_grows_and_shrinks_grid() {
        let mut session = session();
        session.handle_control(ChromeControl::ToggleFullscreen);
        assert!(session.state().is_fullscreen);
        assert_eq!(session.geometry().grid_size, 35);
        assert_eq!(session.state().grid_size, 35);

        session.state_mut().snake = Snake::from_segments(
            vec![Position::new(34, 34), Position::new(33, 34)],
            Direction::Right,
        )
        .unwrap();
        session.handle_control(ChromeControl::ToggleFullscreen);
        assert_eq!(session.geometry().grid_size, 30);
        assert_eq!(
            session.state().snake.segments(),
            &[Position::new(29, 29), Position::new(29, 29)]
        );
        assert!(!session.state().game_over);
    }

    #[test]
    fn test_resize_clamps_snake() {
        let mut session = session();
        session.toggle_fullscreen();
        session.resize(Viewport::new(2200, 2200));
        assert_eq!(session.geometry().grid_size, 100);

        session.state_mut().snake = Snake::from_segments(
            vec![Position::new(80, 10), Position::new(79, 10)],
            Direction::Right,
        )
        .unwrap();
        session.resize(Viewport::new(1200, 900));

        assert_eq!(session.geometry().grid_size, 35);
        for segment in session.state().snake.segments() {
            assert!(session.state().is_in_bounds(*segment));
        }
        assert!(session.state().is_in_bounds(session.state().food));
    }

    #[test]
    fn test_minimize_keeps_ticking() {
        let mut session = session();
        session.handle_key("p");
        session.poll_timer();

        session.handle_control(ChromeControl::Minimize);
        assert!(session.state().is_minimized);
        assert!(session.tick().is_some());

        session.handle_control(ChromeControl::Restore);
        assert!(!session.state().is_minimized);
    }

    #[test]
    fn test_unmount_releases_timer() {
        let mut session = session();
        session.handle_key("p");
        session.poll_timer();

        assert_eq!(session.unmount(), Some(TickTransition::Stop));
        assert_eq!(session.poll_timer(), None);
        assert_eq!(session.tick(), None);
    }
}
