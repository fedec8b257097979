use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};

use crate::square::Square;

/// A set of squares on the 8×8 board, one bit per square.
/// Bit `row * 8 + col` is set when that square is a member.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Bitboard(u64);

impl Bitboard {
    /// All bits zero.
    #[inline]
    pub const fn empty() -> Self {
        Bitboard(0)
    }

    /// All 64 squares.
    #[inline]
    pub const fn full() -> Self {
        Bitboard(u64::MAX)
    }

    /// Construct from the raw mask.
    #[inline]
    pub const fn from_bits(bits: u64) -> Self {
        Bitboard(bits)
    }

    #[inline]
    pub const fn bits(&self) -> u64 {
        self.0
    }

    /// Single bit set at `square`.
    #[inline]
    pub fn single(square: Square) -> Self {
        Bitboard(1u64 << square.to_index())
    }

    /// Test whether `square` is a member.
    #[inline]
    pub fn contains(&self, square: Square) -> bool {
        (self.0 >> square.to_index()) & 1 != 0
    }

    #[inline]
    pub fn insert(&mut self, square: Square) {
        self.0 |= 1u64 << square.to_index();
    }

    #[inline]
    pub fn remove(&mut self, square: Square) {
        self.0 &= !(1u64 << square.to_index());
    }

    /// True if no bits are set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Population count — number of member squares.
    #[inline]
    pub fn count(&self) -> u32 {
        self.0.count_ones()
    }

    /// True if every member of `other` is also a member of `self`.
    #[inline]
    pub fn is_superset(&self, other: Bitboard) -> bool {
        other.0 & !self.0 == 0
    }

    /// Iterate over member squares in index order (a8, b8, ... h1).
    #[inline]
    pub fn squares(&self) -> SquareIterator {
        SquareIterator { bits: self.0 }
    }
}

impl BitAnd for Bitboard {
    type Output = Bitboard;
    #[inline]
    fn bitand(self, rhs: Bitboard) -> Bitboard {
        Bitboard(self.0 & rhs.0)
    }
}

impl BitAndAssign for Bitboard {
    #[inline]
    fn bitand_assign(&mut self, rhs: Bitboard) {
        self.0 &= rhs.0;
    }
}

impl BitOr for Bitboard {
    type Output = Bitboard;
    #[inline]
    fn bitor(self, rhs: Bitboard) -> Bitboard {
        Bitboard(self.0 | rhs.0)
    }
}

impl BitOrAssign for Bitboard {
    #[inline]
    fn bitor_assign(&mut self, rhs: Bitboard) {
        self.0 |= rhs.0;
    }
}

impl Not for Bitboard {
    type Output = Bitboard;
    #[inline]
    fn not(self) -> Bitboard {
        Bitboard(!self.0)
    }
}

impl FromIterator<Square> for Bitboard {
    fn from_iter<I: IntoIterator<Item = Square>>(iter: I) -> Self {
        let mut bb = Bitboard::empty();
        for square in iter {
            bb.insert(square);
        }
        bb
    }
}

impl Extend<Square> for Bitboard {
    fn extend<I: IntoIterator<Item = Square>>(&mut self, iter: I) {
        for square in iter {
            self.insert(square);
        }
    }
}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = SquareIterator;

    fn into_iter(self) -> SquareIterator {
        self.squares()
    }
}

/// Iterator over the member squares of a [`Bitboard`], lowest index first.
pub struct SquareIterator {
    bits: u64,
}

impl Iterator for SquareIterator {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Square> {
        if self.bits == 0 {
            return None;
        }
        let index = self.bits.trailing_zeros() as usize;
        // Clear the lowest set bit
        self.bits &= self.bits - 1;
        Some(Square::from_index(index))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.bits.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for SquareIterator {}

/// Renders the set as an 8×8 grid, row 0 on top: `x` for members, `.` otherwise.
impl fmt::Display for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..8u8 {
            for col in 0..8u8 {
                let c = if self.contains(Square::at(row, col)) {
                    'x'
                } else {
                    '.'
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_full() {
        assert!(Bitboard::empty().is_empty());
        assert_eq!(Bitboard::empty().count(), 0);
        assert_eq!(Bitboard::full().count(), 64);
        assert_eq!(!Bitboard::empty(), Bitboard::full());
    }

    #[test]
    fn test_insert_contains_remove() {
        let mut bb = Bitboard::empty();
        let sq = Square::at(3, 5);
        bb.insert(sq);
        assert!(bb.contains(sq));
        assert!(!bb.contains(Square::at(5, 3)));
        assert_eq!(bb.count(), 1);

        // Inserting twice keeps a single member
        bb.insert(sq);
        assert_eq!(bb.count(), 1);

        bb.remove(sq);
        assert!(bb.is_empty());
    }

    #[test]
    fn test_single_matches_index() {
        let bb = Bitboard::single(Square::at(7, 7));
        assert_eq!(bb.bits(), 1u64 << 63);
        let bb = Bitboard::single(Square::at(0, 0));
        assert_eq!(bb.bits(), 1);
    }

    #[test]
    fn test_squares_iterates_in_index_order() {
        let bb: Bitboard = [Square::at(6, 1), Square::at(0, 7), Square::at(2, 2)]
            .into_iter()
            .collect();
        let squares: Vec<Square> = bb.squares().collect();
        assert_eq!(
            squares,
            vec![Square::at(0, 7), Square::at(2, 2), Square::at(6, 1)]
        );
        assert_eq!(bb.squares().len(), 3);
    }

    #[test]
    fn test_set_operations() {
        let a: Bitboard = [Square::at(0, 0), Square::at(1, 1)].into_iter().collect();
        let b: Bitboard = [Square::at(1, 1), Square::at(2, 2)].into_iter().collect();

        assert_eq!((a & b).count(), 1);
        assert_eq!((a | b).count(), 3);
        assert!((a | b).is_superset(a));
        assert!(!a.is_superset(b));

        let mut c = a;
        c |= b;
        c &= !a;
        assert_eq!(c, Bitboard::single(Square::at(2, 2)));
    }

    #[test]
    fn test_display_grid() {
        let bb = Bitboard::single(Square::at(0, 1));
        let rendered = bb.to_string();
        let first_line = rendered.lines().next().unwrap_or_default();
        assert_eq!(first_line, ".x......");
        assert_eq!(rendered.lines().count(), 8);
    }
}
