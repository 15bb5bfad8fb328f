use std::collections::VecDeque;

use stackfall_engine::{LockedBlock, Piece, Scene, TickOutcome};

const CAPACITY: usize = 8;

/// Recent board activity, newest last.
#[derive(Debug, Default)]
pub struct ActivityLog {
    entries: VecDeque<String>,
    removed_blocks: usize,
}

impl ActivityLog {
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    fn push(&mut self, entry: String) {
        if self.entries.len() == CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Adds the row clears and the game over of a finished tick.
    pub fn record_outcome(&mut self, outcome: TickOutcome) {
        let cleared_rows = outcome.cleared_rows();
        if cleared_rows > 0 {
            let removed = self.removed_blocks;
            self.push(format!("cleared {cleared_rows} row(s), {removed} blocks"));
        }
        if outcome.is_topped_out() {
            self.push("topped out".to_owned());
        }
        self.removed_blocks = 0;
    }
}

impl Scene for ActivityLog {
    fn piece_added(&mut self, piece: &Piece) {
        self.push(format!("{} spawned", piece.kind()));
    }

    fn piece_removed(&mut self, piece: &Piece) {
        self.push(format!("{} locked", piece.kind()));
    }

    fn block_removed(&mut self, _block: LockedBlock) {
        self.removed_blocks += 1;
    }
}

#[cfg(test)]
mod tests {
    use stackfall_engine::{Board, BoardConfig, Grid, PieceSeed, Shape, ShapeKind};

    use super::*;

    #[test]
    fn test_log_follows_board() {
        let shapes = vec![Shape::from_rows(ShapeKind::O, &["#"]).unwrap()];
        let config = BoardConfig {
            width: 3,
            height: 4,
            ..BoardConfig::default()
        };
        let mut board = Board::with_provider(config, shapes, PieceSeed::from_u128(0)).unwrap();
        board.replace_grid(Grid::from_ascii(3, 4, "O.O")).unwrap();

        let mut log = ActivityLog::default();
        let outcome = loop {
            let outcome = board.update(&mut log);
            log.record_outcome(outcome);
            if !outcome.is_fell() {
                break outcome;
            }
        };
        assert_eq!(outcome, TickOutcome::Locked { cleared_rows: 1 });
        assert_eq!(
            log.entries().collect::<Vec<_>>(),
            ["O spawned", "O locked", "cleared 1 row(s), 3 blocks"]
        );
    }

    #[test]
    fn test_log_keeps_newest_entries() {
        let mut log = ActivityLog::default();
        for i in 0..20 {
            log.push(i.to_string());
        }
        let entries: Vec<_> = log.entries().collect();
        assert_eq!(entries.len(), CAPACITY);
        assert_eq!(entries.last(), Some(&"19"));
    }
}
