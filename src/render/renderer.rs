use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use super::layout::{CELL_COLUMNS, WindowLayout, centered};
use crate::game::{GameState, Position};
use crate::metrics::GameMetrics;

const DOT: &str = "●";
const SNAKE_CELL: &str = "██";
const FOOD_CELL: &str = "▓▓";

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// Draw the whole game window and return where its controls landed
    pub fn render(
        &self,
        frame: &mut Frame,
        state: &GameState,
        metrics: &GameMetrics,
    ) -> WindowLayout {
        let layout = WindowLayout::compute(frame.area(), state);

        if let Some(bar) = layout.minimized_bar {
            frame.render_widget(self.render_minimized(), bar);
            return layout;
        }

        let window = Block::default()
            .borders(Borders::ALL)
            .border_type(if state.is_fullscreen {
                BorderType::Plain
            } else {
                BorderType::Rounded
            })
            .border_style(Style::default().fg(Color::Gray));
        frame.render_widget(Clear, layout.window);
        frame.render_widget(window, layout.window);

        let title_row = Rect::new(
            layout.close.x.saturating_sub(1),
            layout.close.y,
            layout.board.width.max(8),
            1,
        )
        .intersection(layout.window);
        frame.render_widget(self.render_title(), title_row);

        if state.game_started {
            frame.render_widget(self.render_grid(layout.board, state), layout.board);
        }

        if !state.game_started || state.game_over {
            let message = self.render_message(state);
            let area = centered(layout.board, 30, 4);
            frame.render_widget(Clear, area);
            frame.render_widget(message, area);
        }

        frame.render_widget(self.render_score(state, metrics), layout.score);

        layout
    }

    fn render_title(&self) -> Paragraph<'static> {
        Paragraph::new(Line::from(vec![
            Span::raw(" "),
            Span::styled(DOT, Style::default().fg(Color::Red)),
            Span::raw(" "),
            Span::styled(DOT, Style::default().fg(Color::Yellow)),
            Span::raw(" "),
            Span::styled(DOT, Style::default().fg(Color::Green)),
        ]))
    }

    fn render_minimized(&self) -> Paragraph<'static> {
        Paragraph::new(Line::from(vec![
            Span::styled(DOT, Style::default().fg(Color::Red)),
            Span::raw(" "),
            Span::styled(DOT, Style::default().fg(Color::Yellow)),
            Span::raw(" "),
            Span::styled(DOT, Style::default().fg(Color::Green)),
            Span::styled("  Snake Game", Style::default().fg(Color::Gray)),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Gray)),
        )
    }

    fn render_grid(&self, area: Rect, state: &GameState) -> Paragraph<'_> {
        let rows = area.height as usize;
        let columns = (area.width / CELL_COLUMNS) as usize;
        let mut lines = Vec::with_capacity(rows);

        for y in 0..rows.min(state.grid_size) {
            let mut spans = Vec::with_capacity(columns);

            for x in 0..columns.min(state.grid_size) {
                let pos = Position::new(x as i32, y as i32);

                // Food is drawn over the snake when they share a cell
                let cell = if pos == state.food {
                    Span::styled(
                        FOOD_CELL,
                        Style::default()
                            .fg(Color::White)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if state.is_occupied_by_snake(pos) {
                    Span::styled(SNAKE_CELL, Style::default().fg(Color::Magenta))
                } else {
                    Span::raw("  ")
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines)
    }

    fn render_message(&self, state: &GameState) -> Paragraph<'_> {
        let (headline, hint) = if state.game_over {
            ("GAME OVER", "Press R to restart")
        } else {
            ("Press P to play", "Use arrow keys to move")
        };

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                headline,
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(hint, Style::default().fg(Color::Gray))),
        ];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_score(&self, state: &GameState, metrics: &GameMetrics) -> Paragraph<'_> {
        let text = Line::from(vec![
            Span::styled(
                format!("Score:{}", state.score),
                Style::default().fg(Color::White),
            ),
            Span::styled(
                format!(
                    "   steps {}  best {}  games {}  {}",
                    state.steps,
                    metrics.high_score,
                    metrics.games_played,
                    metrics.format_time()
                ),
                Style::default().fg(Color::DarkGray),
            ),
        ]);

        Paragraph::new(text)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
