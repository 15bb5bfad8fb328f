use std::iter;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Paragraph, Widget},
};
use stackfall_engine::{Board, LockedBlock, ShapeKind};

use super::style;

const CELL_WIDTH: u16 = 2;

/// Grid of a board with its active piece drawn over the locked blocks.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
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
        let cols = u16::try_from(self.board.frame().width()).unwrap_or(u16::MAX);
        let (horizontal, _) = super::block_margin(self.block.as_ref());
        cols.saturating_mul(CELL_WIDTH).saturating_add(horizontal)
    }

    pub fn height(&self) -> u16 {
        let rows = u16::try_from(self.board.frame().height()).unwrap_or(u16::MAX);
        let (_, vertical) = super::block_margin(self.block.as_ref());
        rows.saturating_add(vertical)
    }
}

/// Returns the kind shown in each cell, top row first.
///
/// The active piece is placed on its nearest row; cells of it outside the grid are
/// dropped.
fn visible_cells(board: &Board) -> Vec<Vec<Option<ShapeKind>>> {
    let mut cells: Vec<Vec<_>> = board
        .grid()
        .rows()
        .map(|row| row.iter().map(|cell| cell.map(LockedBlock::kind)).collect())
        .collect();

    if let Some(piece) = board.active_piece() {
        let frame = board.frame();
        let top = frame.settle_row(piece.top_edge());
        let left = frame.column(piece.left_edge());
        for (y, x) in piece.mask().filled_cells() {
            let col = left
                .checked_add_unsigned(x)
                .and_then(|col| frame.column_index(col));
            if let (Some(row), Some(col)) = (cells.get_mut(top + y), col) {
                row[col] = Some(piece.kind());
            }
        }
    }
    cells
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let frame = self.board.frame();
        let horizontal = Layout::horizontal(
            (0..frame.width()).map(|_| Constraint::Length(CELL_WIDTH)),
        )
        .flex(Flex::Center);
        let vertical = Layout::vertical((0..frame.height()).map(|_| Constraint::Length(1)));

        let cells = visible_cells(self.board);
        for (row_area, row) in iter::zip(vertical.split(area).iter(), &cells) {
            for (cell_area, cell) in iter::zip(horizontal.split(*row_area).iter(), row) {
                let (symbol, style) = match cell {
                    Some(kind) => ("", style::block(*kind)),
                    None => (".", style::EMPTY_DOT),
                };
                Paragraph::new(symbol)
                    .style(style)
                    .centered()
                    .render(*cell_area, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use stackfall_engine::{BoardConfig, PieceSeed};

    use super::*;

    #[test]
    fn test_visible_cells_include_active_piece() {
        let mut board = Board::with_seed(BoardConfig::default(), PieceSeed::from_u128(5)).unwrap();
        assert!(visible_cells(&board).iter().flatten().all(Option::is_none));

        board.update(&mut ());
        let cells = visible_cells(&board);
        let kind = board.active_piece().unwrap().kind();
        let shown: Vec<_> = cells
            .iter()
            .enumerate()
            .flat_map(|(row, cells)| {
                cells
                    .iter()
                    .filter_map(move |cell| cell.map(|kind| (row, kind)))
            })
            .collect();
        assert_eq!(shown.len(), 4);
        assert!(shown.iter().all(|&(row, k)| row < 2 && k == kind));
    }

    #[test]
    fn test_size_includes_border() {
        let board = Board::with_seed(BoardConfig::default(), PieceSeed::from_u128(5)).unwrap();
        let display = BoardDisplay::new(&board).block(BlockWidget::bordered());
        assert_eq!(display.width(), 22);
        assert_eq!(display.height(), 18);
    }
}
