use std::iter;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};
use stackfall_engine::{Board, MAX_SPEED};

use super::style;

const CONTENT_WIDTH: u16 = 18;

pub struct StatsDisplay<'a> {
    board: &'a Board,
    block: Option<BlockWidget<'a>>,
}

impl<'a> StatsDisplay<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self { board, block: None }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        let (horizontal, _) = super::block_margin(self.block.as_ref());
        CONTENT_WIDTH + horizontal
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn height(&self) -> u16 {
        let (_, vertical) = super::block_margin(self.block.as_ref());
        ROWS.len() as u16 + vertical
    }
}

#[derive(Clone, Copy)]
enum Row {
    Empty,
    LabelValue(&'static str, &'static dyn Fn(&Board) -> String),
}

const ROWS: &[Row] = &[
    Row::LabelValue("PIECES:", &|board| board.stats().locked_pieces().to_string()),
    Row::LabelValue("ROWS:", &|board| board.stats().cleared_rows().to_string()),
    Row::LabelValue("TICKS:", &|board| board.stats().ticks().to_string()),
    Row::Empty,
    Row::LabelValue("SPEED:", &|board| {
        if board.is_speed_up() {
            format!("{MAX_SPEED:.1}")
        } else {
            format!("{:.1}", board.speed())
        }
    }),
];

impl Widget for StatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let style = style::DEFAULT;
        let rows_areas =
            Layout::vertical((0..ROWS.len()).map(|_| Constraint::Length(1))).split(area);

        for (row, area) in iter::zip(ROWS.iter().copied(), rows_areas[..].iter().copied()) {
            match row {
                Row::Empty => {}
                Row::LabelValue(label, value) => {
                    let [label_area, value_area] = area.layout(&Layout::horizontal([
                        Constraint::Fill(1),
                        Constraint::Fill(1),
                    ]));
                    Line::styled(label, style)
                        .left_aligned()
                        .render(label_area, buf);
                    Line::styled(value(self.board), style)
                        .right_aligned()
                        .render(value_area, buf);
                }
            }
        }
    }
}
