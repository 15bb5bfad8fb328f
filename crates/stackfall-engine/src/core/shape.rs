use serde::{Deserialize, Serialize};

use crate::{MaskError, core::mask::CellMask, core::piece::Piece};

/// Identity of a shape.
///
/// Carried by pieces and by every block they leave in the grid, so a renderer can pick
/// a colour. The board logic never looks at it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, derive_more::Display,
)]
#[repr(u8)]
pub enum ShapeKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// S-piece.
    S = 2,
    /// Z-piece.
    Z = 3,
    /// J-piece.
    J = 4,
    /// L-piece.
    L = 5,
    /// T-piece.
    T = 6,
}

impl ShapeKind {
    /// Number of shape kinds (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        ShapeKind::I,
        ShapeKind::O,
        ShapeKind::S,
        ShapeKind::Z,
        ShapeKind::J,
        ShapeKind::L,
        ShapeKind::T,
    ];

    /// Returns the single character representation of this shape kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use stackfall_engine::ShapeKind;
    ///
    /// assert_eq!(ShapeKind::I.as_char(), 'I');
    /// assert_eq!(ShapeKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            ShapeKind::I => 'I',
            ShapeKind::O => 'O',
            ShapeKind::S => 'S',
            ShapeKind::Z => 'Z',
            ShapeKind::J => 'J',
            ShapeKind::L => 'L',
            ShapeKind::T => 'T',
        }
    }

    /// Parses a shape kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use stackfall_engine::ShapeKind;
    ///
    /// assert_eq!(ShapeKind::from_char('S'), Some(ShapeKind::S));
    /// assert_eq!(ShapeKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(ShapeKind::I),
            'O' => Some(ShapeKind::O),
            'S' => Some(ShapeKind::S),
            'Z' => Some(ShapeKind::Z),
            'J' => Some(ShapeKind::J),
            'L' => Some(ShapeKind::L),
            'T' => Some(ShapeKind::T),
            _ => None,
        }
    }
}

/// A spawnable shape: its identity and its mask in spawn orientation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Shape {
    kind: ShapeKind,
    mask: CellMask,
}

impl Shape {
    #[must_use]
    pub fn new(kind: ShapeKind, mask: CellMask) -> Self {
        Self { kind, mask }
    }

    /// Builds a shape from `#`/`.` rows, see [`CellMask::from_rows`].
    pub fn from_rows<S>(kind: ShapeKind, rows: &[S]) -> Result<Self, MaskError>
    where
        S: AsRef<str>,
    {
        Ok(Self::new(kind, CellMask::from_rows(rows)?))
    }

    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    #[must_use]
    pub fn mask(&self) -> &CellMask {
        &self.mask
    }

    /// Longest side of the mask, the extent the shape needs in every rotation.
    #[must_use]
    pub fn max_side(&self) -> usize {
        self.mask.max_side()
    }
}

/// Source of the pieces a board spawns.
///
/// The board draws one of [`available_shapes`](Self::available_shapes) uniformly at
/// random and asks [`create_piece`](Self::create_piece) for the piece, then positions it
/// at the top of the board itself.
pub trait PieceProvider {
    /// Shapes to draw from. Must not be empty.
    fn available_shapes(&self) -> &[Shape];

    /// Creates a piece of `shape`. The position is overwritten at spawn.
    ///
    /// The board never places a piece whose mask would not fit on it: construction and
    /// [`Board::spawn`](crate::Board::spawn) fail, and a drawn spawn falls back to a plain
    /// piece of the shape.
    fn create_piece(&self, shape: &Shape) -> Piece {
        Piece::new(shape.kind(), shape.mask().clone())
    }
}

impl PieceProvider for Vec<Shape> {
    fn available_shapes(&self) -> &[Shape] {
        self
    }
}

/// The seven standard tetrominoes with tight bounding masks.
///
/// ```text
/// I: ####   O: ##   S: .##   Z: ##.   J: #..   L: ..#   T: .#.
///               ##      ##.      .##      ###      ###      ###
/// ```
#[derive(Debug, Clone)]
pub struct TetrominoCatalog {
    shapes: Vec<Shape>,
}

impl Default for TetrominoCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl TetrominoCatalog {
    #[must_use]
    pub fn new() -> Self {
        let shapes = ShapeKind::ALL
            .into_iter()
            .map(|kind| {
                Shape::from_rows(kind, Self::rows(kind)).expect("tetromino masks are well-formed")
            })
            .collect();
        Self { shapes }
    }

    /// Returns the shape of `kind`.
    #[must_use]
    pub fn shape(&self, kind: ShapeKind) -> &Shape {
        &self.shapes[kind as usize]
    }

    fn rows(kind: ShapeKind) -> &'static [&'static str] {
        match kind {
            ShapeKind::I => &["####"],
            ShapeKind::O => &["##", "##"],
            ShapeKind::S => &[".##", "##."],
            ShapeKind::Z => &["##.", ".##"],
            ShapeKind::J => &["#..", "###"],
            ShapeKind::L => &["..#", "###"],
            ShapeKind::T => &[".#.", "###"],
        }
    }
}

impl PieceProvider for TetrominoCatalog {
    fn available_shapes(&self) -> &[Shape] {
        &self.shapes
    }
}
