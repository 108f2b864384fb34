use ratatui::layout::{Margin, Rect};

use crate::game::GameState;
use crate::input::ChromeControl;

/// Terminal columns per grid cell, so cells come out roughly square
pub const CELL_COLUMNS: u16 = 2;

const MINIMIZED_WIDTH: u16 = 24;
const MINIMIZED_HEIGHT: u16 = 3;

/// Where every piece of the game window lands on screen.
///
/// Computed before drawing and kept by the host for mouse hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowLayout {
    pub window: Rect,
    pub close: Rect,
    pub minimize: Rect,
    pub fullscreen: Rect,
    pub board: Rect,
    pub score: Rect,
    pub minimized_bar: Option<Rect>,
}

impl WindowLayout {
    pub fn compute(area: Rect, state: &GameState) -> Self {
        if state.is_minimized {
            let bar = Rect::new(
                area.right().saturating_sub(MINIMIZED_WIDTH + 2),
                area.bottom().saturating_sub(MINIMIZED_HEIGHT + 1),
                MINIMIZED_WIDTH,
                MINIMIZED_HEIGHT,
            )
            .intersection(area);

            return Self {
                minimized_bar: Some(bar),
                ..Default::default()
            };
        }

        let grid = u16::try_from(state.grid_size).unwrap_or(u16::MAX);
        let board_width = grid.saturating_mul(CELL_COLUMNS);

        // Border, title row, board, score row, border
        let window = if state.is_fullscreen {
            area
        } else {
            centered(
                area,
                board_width.saturating_add(2),
                grid.saturating_add(4),
            )
        };

        let inner = window.inner(Margin::new(1, 1));
        let dot = |offset: u16| Rect::new(inner.x + offset, inner.y, 1, 1).intersection(inner);

        let body = Rect::new(
            inner.x,
            inner.y.saturating_add(1),
            inner.width,
            inner.height.saturating_sub(2),
        );
        let board_width = board_width.min(body.width);
        let board = Rect::new(
            body.x + (body.width - board_width) / 2,
            body.y,
            board_width,
            grid.min(body.height),
        );
        let score = Rect::new(board.x, board.bottom(), board.width, 1).intersection(inner);

        Self {
            window,
            close: dot(1),
            minimize: dot(3),
            fullscreen: dot(5),
            board,
            score,
            minimized_bar: None,
        }
    }

    /// Which chrome control sits under a mouse click, if any
    pub fn hit_test(&self, column: u16, row: u16) -> Option<ChromeControl> {
        if let Some(bar) = self.minimized_bar {
            return contains(bar, column, row).then_some(ChromeControl::Restore);
        }

        [
            (self.close, ChromeControl::Close),
            (self.minimize, ChromeControl::Minimize),
            (self.fullscreen, ChromeControl::ToggleFullscreen),
        ]
        .into_iter()
        .find(|(rect, _)| contains(*rect, column, row))
        .map(|(_, control)| control)
    }
}

/// A `width` x `height` rect centered in `area`, shrunk to fit
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.right() && row >= rect.y && row < rect.bottom()
}
