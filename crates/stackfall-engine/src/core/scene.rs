use serde::Serialize;

use super::{geometry::Point, grid::LockedBlock, piece::Piece};

/// Receiver of the visual changes a board makes.
///
/// Every method has a no-op default, so a renderer only implements what it draws.
/// The board calls these synchronously while it mutates itself. On lock the order is one
/// [`block_added`](Self::block_added) per filled cell followed by a single
/// [`piece_removed`](Self::piece_removed); row clears then report the removed blocks and
/// every block that moved down.
pub trait Scene {
    /// A piece was spawned and is now falling.
    fn piece_added(&mut self, piece: &Piece) {
        let _ = piece;
    }

    /// The falling piece locked and is no longer drawn as a piece.
    fn piece_removed(&mut self, piece: &Piece) {
        let _ = piece;
    }

    /// A block was locked into `(row, col)`, centred at `center`.
    fn block_added(&mut self, block: LockedBlock, row: usize, col: usize, center: Point) {
        let _ = (block, row, col, center);
    }

    /// A block left the grid, either cleared or overwritten.
    fn block_removed(&mut self, block: LockedBlock) {
        let _ = block;
    }

    /// A block moved to `(row, col)`, centred at `center`, after a row below it cleared.
    fn block_moved(&mut self, block: LockedBlock, row: usize, col: usize, center: Point) {
        let _ = (block, row, col, center);
    }
}

/// Headless scene that ignores every change.
impl Scene for () {}

/// One change reported to a [`Scene`].
#[derive(Debug, Clone, PartialEq, Serialize, derive_more::IsVariant)]
pub enum SceneEvent {
    PieceAdded(Piece),
    PieceRemoved(Piece),
    BlockAdded {
        block: LockedBlock,
        row: usize,
        col: usize,
        center: Point,
    },
    BlockRemoved(LockedBlock),
    BlockMoved {
        block: LockedBlock,
        row: usize,
        col: usize,
        center: Point,
    },
}

/// Records every change in order.
impl Scene for Vec<SceneEvent> {
    fn piece_added(&mut self, piece: &Piece) {
        EventSink(|event| self.push(event)).piece_added(piece);
    }

    fn piece_removed(&mut self, piece: &Piece) {
        EventSink(|event| self.push(event)).piece_removed(piece);
    }

    fn block_added(&mut self, block: LockedBlock, row: usize, col: usize, center: Point) {
        EventSink(|event| self.push(event)).block_added(block, row, col, center);
    }

    fn block_removed(&mut self, block: LockedBlock) {
        EventSink(|event| self.push(event)).block_removed(block);
    }

    fn block_moved(&mut self, block: LockedBlock, row: usize, col: usize, center: Point) {
        EventSink(|event| self.push(event)).block_moved(block, row, col, center);
    }
}

/// Scene that hands every change to a closure as it happens.
///
/// ```
/// use stackfall_engine::{Board, BoardConfig, EventSink, PieceSeed, SceneEvent};
///
/// let mut board = Board::with_seed(BoardConfig::default(), PieceSeed::from_u128(0)).unwrap();
/// let mut added = 0;
/// board.update(&mut EventSink(|event: SceneEvent| {
///     added += usize::from(event.is_piece_added());
/// }));
/// assert_eq!(added, 1);
/// ```
#[derive(Debug)]
pub struct EventSink<F>(pub F);

impl<F> Scene for EventSink<F>
where
    F: FnMut(SceneEvent),
{
    fn piece_added(&mut self, piece: &Piece) {
        (self.0)(SceneEvent::PieceAdded(piece.clone()));
    }

    fn piece_removed(&mut self, piece: &Piece) {
        (self.0)(SceneEvent::PieceRemoved(piece.clone()));
    }

    fn block_added(&mut self, block: LockedBlock, row: usize, col: usize, center: Point) {
        (self.0)(SceneEvent::BlockAdded {
            block,
            row,
            col,
            center,
        });
    }

    fn block_removed(&mut self, block: LockedBlock) {
        (self.0)(SceneEvent::BlockRemoved(block));
    }

    fn block_moved(&mut self, block: LockedBlock, row: usize, col: usize, center: Point) {
        (self.0)(SceneEvent::BlockMoved {
            block,
            row,
            col,
            center,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BlockId, CellMask, ShapeKind};

    #[test]
    fn test_recorder_keeps_order() {
        let piece = Piece::new(ShapeKind::O, CellMask::from_rows(&["#"]).unwrap());
        let block = LockedBlock::new(BlockId::new(0), ShapeKind::O);

        let mut events = Vec::new();
        events.piece_added(&piece);
        events.block_added(block, 2, 1, Point::new(1.0, 2.0));
        events.piece_removed(&piece);
        events.block_moved(block, 3, 1, Point::new(1.0, -8.0));
        events.block_removed(block);

        assert!(events[0].is_piece_added());
        assert!(events[1].is_block_added());
        assert!(events[2].is_piece_removed());
        assert!(events[3].is_block_moved());
        assert_eq!(events[4], SceneEvent::BlockRemoved(block));
    }

    #[test]
    fn test_sink_sees_changes_as_they_happen() {
        let piece = Piece::new(ShapeKind::T, CellMask::from_rows(&["#"]).unwrap());
        let block = LockedBlock::new(BlockId::new(4), ShapeKind::T);

        let mut seen = Vec::new();
        let mut sink = EventSink(|event: SceneEvent| seen.push(event));
        sink.piece_added(&piece);
        sink.block_added(block, 0, 0, Point::new(0.0, 0.0));
        sink.block_removed(block);
        sink.piece_removed(&piece);

        assert_eq!(
            seen,
            [
                SceneEvent::PieceAdded(piece.clone()),
                SceneEvent::BlockAdded {
                    block,
                    row: 0,
                    col: 0,
                    center: Point::new(0.0, 0.0),
                },
                SceneEvent::BlockRemoved(block),
                SceneEvent::PieceRemoved(piece),
            ]
        );
    }

    #[test]
    fn test_unit_scene_ignores_changes() {
        let piece = Piece::new(ShapeKind::O, CellMask::from_rows(&["#"]).unwrap());
        Scene::piece_added(&mut (), &piece);
        Scene::piece_removed(&mut (), &piece);
    }
}
