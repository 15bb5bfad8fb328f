use crossterm::event::{Event, KeyCode};
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout},
    style::{Color, Style},
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Paragraph},
};
use stackfall_engine::Board;

use super::activity::ActivityLog;
use crate::{
    tui::App,
    ui::widgets::{BoardDisplay, StatsDisplay, color, style},
};

#[derive(Debug)]
pub struct PlayApp {
    board: Board,
    activity: ActivityLog,
    is_exiting: bool,
}

impl PlayApp {
    pub fn new(board: Board) -> Self {
        Self {
            board,
            activity: ActivityLog::default(),
            is_exiting: false,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }
}

impl App for PlayApp {
    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, event: &Event) {
        let is_playing = !self.board.is_game_over();
        if let Some(event) = event.as_key_event() {
            match event.code {
                KeyCode::Left if is_playing => _ = self.board.move_left(),
                KeyCode::Right if is_playing => _ = self.board.move_right(),
                KeyCode::Up | KeyCode::Char('x') if is_playing => _ = self.board.rotate(),
                KeyCode::Down if is_playing => self.board.set_speed_up(true),
                KeyCode::Char('q') | KeyCode::Esc => self.is_exiting = true,
                _ => {}
            }
        }
    }

    fn update(&mut self) {
        let outcome = self.board.update(&mut self.activity);
        self.activity.record_outcome(outcome);
    }

    fn draw(&self, frame: &mut Frame) {
        let game_over = self.board.is_game_over();
        let border_style = if game_over { color::RED } else { color::WHITE };
        let panel = |title: &'static str| {
            Block::bordered()
                .title(Line::from(title).centered())
                .padding(Padding::horizontal(1))
                .border_style(border_style)
                .style(style::DEFAULT)
        };

        let board_display = BoardDisplay::new(&self.board).block(
            Block::bordered()
                .border_style(border_style)
                .style(style::DEFAULT),
        );
        let stats = StatsDisplay::new(&self.board).block(panel("STATS"));
        let activity =
            Paragraph::new(self.activity.entries().map(Line::from).collect::<Vec<_>>())
                .block(panel("LOG"));

        let help_text = if game_over {
            "Controls: Q (Quit)"
        } else {
            "Controls: ← → (Move) | ↑ X (Rotate) | ↓ (Soft Drop) | Q (Quit)"
        };
        let help_text = Text::from(help_text)
            .style(Style::default().fg(Color::DarkGray))
            .centered();

        let board_width = board_display.width();
        let [main_area, help_area] = Layout::vertical([
            Constraint::Length(board_display.height()),
            Constraint::Length(1),
        ])
        .areas(frame.area());
        let [left_column, board_area] = Layout::horizontal([
            Constraint::Length(stats.width()),
            Constraint::Length(board_width),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(main_area);
        let [stats_area, activity_area] =
            Layout::vertical([Constraint::Length(stats.height()), Constraint::Fill(1)])
                .areas(left_column);

        frame.render_widget(stats, stats_area);
        frame.render_widget(activity, activity_area);
        frame.render_widget(&board_display, board_area);
        frame.render_widget(help_text, help_area);

        if game_over {
            let style = Style::new().fg(color::WHITE).bg(color::RED);
            let area = board_area.centered(Constraint::Length(board_width), Constraint::Length(3));
            frame.render_widget(Clear, area);
            frame.render_widget(Block::new().style(style), area);
            frame.render_widget(
                Text::styled("GAME OVER", style).centered(),
                area.centered_vertically(Constraint::Length(1)),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEvent, KeyModifiers};
    use stackfall_engine::{BoardConfig, PieceSeed};

    use super::*;

    fn press(app: &mut PlayApp, code: KeyCode) {
        app.handle_event(&Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    fn new_app() -> PlayApp {
        let board = Board::with_seed(BoardConfig::default(), PieceSeed::from_u128(9)).unwrap();
        let mut app = PlayApp::new(board);
        app.update();
        app
    }

    fn left_edge(app: &PlayApp) -> f64 {
        app.board().active_piece().unwrap().left_edge()
    }

    #[test]
    fn test_arrow_keys_move_piece() {
        let mut app = new_app();
        let start = left_edge(&app);

        press(&mut app, KeyCode::Left);
        assert!((left_edge(&app) - (start - 10.0)).abs() < 1e-9);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        assert!((left_edge(&app) - (start + 10.0)).abs() < 1e-9);

        press(&mut app, KeyCode::Down);
        assert!(app.board().is_speed_up());
        assert!(!app.should_exit());
    }

    #[test]
    fn test_blocked_move_is_ignored() {
        let mut app = new_app();
        for _ in 0..20 {
            press(&mut app, KeyCode::Left);
        }
        let left = app.board().frame().left_x();
        assert!((left_edge(&app) - left).abs() < 1e-9);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = new_app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_exit());

        let mut app = new_app();
        press(&mut app, KeyCode::Esc);
        assert!(app.should_exit());
    }

    #[test]
    fn test_update_feeds_activity_log() {
        let mut app = new_app();
        let kind = app.board().active_piece().unwrap().kind();
        assert_eq!(
            app.activity.entries().collect::<Vec<_>>(),
            [format!("{kind} spawned")]
        );
    }
}
