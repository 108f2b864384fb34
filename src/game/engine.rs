use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{
    config::GameConfig,
    direction::Direction,
    state::{CollisionType, GameState, Position, Snake},
};

/// Result of a single move
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Type of collision if one occurred
    pub collision: Option<CollisionType>,
}

impl StepResult {
    /// Whether this step ended the game
    pub fn terminated(&self) -> bool {
        self.collision.is_some()
    }
}

/// The game engine that handles all game rules
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with an OS-seeded food generator
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Create an engine whose food placement is reproducible
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// State at mount: fixed snake, direction and food
    pub fn initial_state(&self) -> GameState {
        GameState::new(
            Snake::new(self.config.initial_head, Direction::Right),
            self.config.initial_food,
            self.config.min_grid_size,
        )
    }

    /// Reset snake, direction, score and game-over flag, then place new food.
    ///
    /// The started/fullscreen/minimized flags and the grid size are kept.
    pub fn reset(&mut self, state: &mut GameState) {
        state.snake = Snake::new(self.config.initial_head, Direction::Right);
        state.score = 0;
        state.steps = 0;
        state.game_over = false;
        state.food = self.spawn_food(state.grid_size);
        debug!("Game reset, food at ({}, {})", state.food.x, state.food.y);
    }

    /// Request a new direction for the next move.
    ///
    /// Returns false and leaves the state alone if `direction` is the exact
    /// inverse of the current one.
    pub fn set_direction(&self, state: &mut GameState, direction: Direction) -> bool {
        if state.snake.direction.is_opposite(direction) {
            debug!(
                "Rejected reversal from {:?} to {:?}",
                state.snake.direction, direction
            );
            return false;
        }

        state.snake.direction = direction;
        true
    }

    /// Advance the snake one cell in its current direction
    pub fn step(&mut self, state: &mut GameState) -> StepResult {
        if state.game_over {
            return StepResult {
                ate_food: false,
                collision: None,
            };
        }

        let new_head = state.snake.head().moved_in_direction(state.snake.direction);

        if let Some(collision) = self.check_collision(state, new_head) {
            state.game_over = true;
            info!(
                "Game over ({:?}) with score {} after {} steps",
                collision, state.score, state.steps
            );

            return StepResult {
                ate_food: false,
                collision: Some(collision),
            };
        }

        let ate_food = new_head == state.food;
        state.snake.advance_to(new_head, ate_food);
        state.steps += 1;

        if ate_food {
            state.score += 1;
            state.food = self.spawn_food(state.grid_size);
            debug!(
                "Food eaten, score {}, next food at ({}, {})",
                state.score, state.food.x, state.food.y
            );
        }

        StepResult {
            ate_food,
            collision: None,
        }
    }

    /// Check if the new head position causes a collision
    fn check_collision(&self, state: &GameState, pos: Position) -> Option<CollisionType> {
        if !state.is_in_bounds(pos) {
            return Some(CollisionType::Wall);
        }

        if state.is_occupied_by_snake(pos) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    /// Pick a uniformly random cell. Cells under the snake are not excluded.
    fn spawn_food(&mut self, grid_size: usize) -> Position {
        let x = self.rng.random_range(0..grid_size) as i32;
        let y = self.rng.random_range(0..grid_size) as i32;
        Position::new(x, y)
    }
}
