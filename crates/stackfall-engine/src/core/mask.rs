use std::fmt;

use arrayvec::ArrayVec;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::MaskError;

/// Largest number of rows or columns a [`CellMask`] can have.
pub const MAX_MASK_SIDE: usize = 8;

/// Rectangular occupancy mask of a piece, relative to its own bounding box.
///
/// Each row is stored as a bit set where bit `x` is column `x`. Row 0 is the top row.
/// A mask is always rectangular, at most [`MAX_MASK_SIDE`] on each side and has at
/// least one filled cell, so every mask that reaches a board can be locked in full.
///
/// # Example
///
/// ```
/// use stackfall_engine::CellMask;
///
/// let mask = CellMask::from_rows(&[".#.", "###"]).unwrap();
/// assert_eq!((mask.width(), mask.height()), (3, 2));
/// assert_eq!(mask.filled_count(), 4);
///
/// let rotated = mask.rotated_clockwise();
/// assert_eq!(rotated.to_rows(), ["#.", "##", "#."]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CellMask {
    width: usize,
    rows: ArrayVec<u8, MAX_MASK_SIDE>,
}

impl CellMask {
    /// Parses a mask from rows of `#` (filled) and `.` (empty), top row first.
    pub fn from_rows<S>(rows: &[S]) -> Result<Self, MaskError>
    where
        S: AsRef<str>,
    {
        let Some(first) = rows.first() else {
            return Err(MaskError::Empty);
        };
        let width = first.as_ref().chars().count();
        if width == 0 {
            return Err(MaskError::Empty);
        }
        if width > MAX_MASK_SIDE || rows.len() > MAX_MASK_SIDE {
            return Err(MaskError::TooLarge {
                width,
                height: rows.len(),
            });
        }

        let mut bit_rows = ArrayVec::new();
        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let len = line.chars().count();
            if len != width {
                return Err(MaskError::Ragged {
                    row,
                    len,
                    expected: width,
                });
            }
            let mut bits = 0u8;
            for (x, ch) in line.chars().enumerate() {
                match ch {
                    '#' => bits |= 1 << x,
                    '.' => {}
                    _ => return Err(MaskError::InvalidChar { row, ch }),
                }
            }
            bit_rows.push(bits);
        }

        if bit_rows.iter().all(|&bits| bits == 0) {
            return Err(MaskError::NoFilledCell);
        }

        Ok(Self {
            width,
            rows: bit_rows,
        })
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Returns the longer side, which bounds the mask in every rotation.
    #[must_use]
    pub fn max_side(&self) -> usize {
        self.width().max(self.height())
    }

    #[must_use]
    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        col < self.width() && self.rows.get(row).is_some_and(|bits| bits & (1 << col) != 0)
    }

    /// Returns the filled cells as `(row, col)` pairs in row-major order.
    pub fn filled_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows.iter().enumerate().flat_map(move |(y, &bits)| {
            (0..self.width()).filter_map(move |x| (bits & (1 << x) != 0).then_some((y, x)))
        })
    }

    #[must_use]
    pub fn filled_count(&self) -> usize {
        self.filled_cells().count()
    }

    /// Returns the mask turned 90° clockwise.
    ///
    /// A `w×h` mask becomes `h×w`; the top row becomes the rightmost column.
    #[must_use]
    pub fn rotated_clockwise(&self) -> Self {
        let old_height = self.height();
        let mut rows = ArrayVec::new();
        for y in 0..self.width() {
            let mut bits = 0u8;
            for x in 0..old_height {
                if self.is_filled(old_height - 1 - x, y) {
                    bits |= 1 << x;
                }
            }
            rows.push(bits);
        }
        Self {
            width: old_height,
            rows,
        }
    }

    /// Returns the mask as rows of `#` and `.`, top row first.
    #[must_use]
    pub fn to_rows(&self) -> Vec<String> {
        (0..self.height())
            .map(|y| {
                (0..self.width())
                    .map(|x| if self.is_filled(y, x) { '#' } else { '.' })
                    .collect()
            })
            .collect()
    }
}

impl fmt::Display for CellMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.to_rows().iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            f.write_str(row)?;
        }
        Ok(())
    }
}

impl Serialize for CellMask {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Format: ".#./###" (rows separated by '/')
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for CellMask {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let rows: Vec<&str> = s.split('/').collect();
        Self::from_rows(&rows)
            .map_err(|e| serde::de::Error::custom(format!("invalid mask '{s}': {e}")))
    }
}
