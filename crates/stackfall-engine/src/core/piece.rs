use serde::{Deserialize, Serialize};

use super::{
    geometry::{Point, cells_to_world},
    mask::CellMask,
    shape::ShapeKind,
};

/// A falling piece: a shape's mask placed at a continuous position.
///
/// The position is the centre of the mask's bounding box in world units. All edges and
/// extents are derived from it, the mask size and [`CELL_SIZE`](super::CELL_SIZE).
/// Movement and rotation return new pieces; the board decides which of them to keep.
///
/// # Example
///
/// ```
/// use stackfall_engine::{CellMask, Piece, Point, ShapeKind};
///
/// let mask = CellMask::from_rows(&["####"]).unwrap();
/// let piece = Piece::new(ShapeKind::I, mask).with_position(Point::new(0.0, 75.0));
///
/// assert_eq!(piece.top_edge(), 80.0);
/// assert_eq!(piece.left_edge(), -20.0);
///
/// let rotated = piece.rotated();
/// assert_eq!((rotated.width(), rotated.height()), (10.0, 40.0));
/// // The top-left corner stays where it was.
/// assert_eq!((rotated.left_edge(), rotated.top_edge()), (-20.0, 80.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    kind: ShapeKind,
    mask: CellMask,
    position: Point,
}

impl Piece {
    /// Creates a piece centred on the world origin.
    #[must_use]
    pub fn new(kind: ShapeKind, mask: CellMask) -> Self {
        Self {
            kind,
            mask,
            position: Point::ORIGIN,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    #[must_use]
    pub fn mask(&self) -> &CellMask {
        &self.mask
    }

    #[must_use]
    pub fn position(&self) -> Point {
        self.position
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        cells_to_world(self.mask.width())
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        cells_to_world(self.mask.height())
    }

    #[must_use]
    pub fn top_edge(&self) -> f64 {
        self.position.y + self.height() / 2.0
    }

    #[must_use]
    pub fn bottom_edge(&self) -> f64 {
        self.position.y - self.height() / 2.0
    }

    #[must_use]
    pub fn left_edge(&self) -> f64 {
        self.position.x - self.width() / 2.0
    }

    #[must_use]
    pub fn right_edge(&self) -> f64 {
        self.position.x + self.width() / 2.0
    }

    #[must_use]
    pub fn with_position(self, position: Point) -> Self {
        Self { position, ..self }
    }

    /// Moves the piece horizontally so its centre is at `x`.
    #[must_use]
    pub fn with_x(self, x: f64) -> Self {
        let y = self.position.y;
        self.with_position(Point::new(x, y))
    }

    /// Moves the piece vertically so its bottom edge is at `bottom_y`.
    #[must_use]
    pub fn with_bottom_at(self, bottom_y: f64) -> Self {
        let position = Point::new(self.position.x, bottom_y + self.height() / 2.0);
        self.with_position(position)
    }

    #[must_use]
    pub fn moved_by(self, dx: f64, dy: f64) -> Self {
        let position = self.position.translated(dx, dy);
        self.with_position(position)
    }

    /// Returns the piece with its mask turned 90° clockwise.
    ///
    /// The top-left corner of the bounding box is kept, so a piece that was aligned to
    /// the grid columns stays aligned and never grows past its left edge.
    #[must_use]
    pub fn rotated(&self) -> Self {
        let mask = self.mask.rotated_clockwise();
        let left = self.left_edge();
        let top = self.top_edge();
        let rotated = Self {
            kind: self.kind,
            mask,
            position: self.position,
        };
        let position = Point::new(left + rotated.width() / 2.0, top - rotated.height() / 2.0);
        rotated.with_position(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piece(rows: &[&str]) -> Piece {
        Piece::new(ShapeKind::T, CellMask::from_rows(rows).unwrap())
    }

    #[test]
    fn test_extents_follow_position_and_mask() {
        let piece = piece(&[".#.", "###"]).with_position(Point::new(5.0, 70.0));
        assert_eq!(piece.width(), 30.0);
        assert_eq!(piece.height(), 20.0);
        assert_eq!(piece.top_edge(), 80.0);
        assert_eq!(piece.bottom_edge(), 60.0);
        assert_eq!(piece.left_edge(), -10.0);
        assert_eq!(piece.right_edge(), 20.0);
    }

    #[test]
    fn test_with_bottom_at() {
        let piece = piece(&["##", "##"]).with_bottom_at(-80.0);
        assert_eq!(piece.bottom_edge(), -80.0);
        assert_eq!(piece.top_edge(), -60.0);
        assert_eq!(piece.position().y, -70.0);
    }

    #[test]
    fn test_moved_by() {
        let piece = piece(&["#"]).moved_by(-10.0, -2.5);
        assert_eq!(piece.position(), Point::new(-10.0, -2.5));
    }

    #[test]
    fn test_rotation_keeps_top_left_corner() {
        let piece = piece(&[".#.", "###"]).with_position(Point::new(5.0, 70.0));
        let rotated = piece.rotated();
        assert_eq!(rotated.mask().to_rows(), ["#.", "##", "#."]);
        assert_eq!(rotated.left_edge(), -10.0);
        assert_eq!(rotated.top_edge(), 80.0);
        assert_eq!(rotated.right_edge(), 10.0);
        assert_eq!(rotated.bottom_edge(), 50.0);
    }

    #[test]
    fn test_rotation_round_trip_restores_piece() {
        let piece = piece(&["#..", "###"]).with_position(Point::new(-5.0, 12.5));
        let full_turn = piece.rotated().rotated().rotated().rotated();
        assert_eq!(full_turn, piece);
    }
}
