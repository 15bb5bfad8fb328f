pub use self::{geometry::*, grid::*, mask::*, piece::*, scene::*, shape::*};

pub(crate) mod geometry;
pub(crate) mod grid;
pub(crate) mod mask;
pub(crate) mod piece;
pub(crate) mod scene;
pub(crate) mod shape;
