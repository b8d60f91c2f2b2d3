/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use chessie::{PieceKind, Square};

/// Piece-Square tables from the [Simplified Evaluation Function](https://www.chessprogramming.org/Simplified_Evaluation_Function).
///
/// Written as seen from White's side of the board, with the 8th rank on top.
#[rustfmt::skip]
const PAWN: Psqt = Psqt::new([
     0,  0,   0,   0,   0,   0,  0,  0,
    50, 50,  50,  50,  50,  50, 50, 50,
    10, 10,  20,  30,  30,  20, 10, 10,
     5,  5,  10,  25,  25,  10,  5,  5,
     0,  0,   0,  20,  20,   0,  0,  0,
     5, -5, -10,   0,   0, -10, -5,  5,
     5, 10,  10, -20, -20,  10, 10,  5,
     0,  0,   0,   0,   0,   0,  0,  0,
]);

#[rustfmt::skip]
const KNIGHT: Psqt = Psqt::new([
    -50, -40, -30, -30, -30, -30, -40, -50,
    -40, -20,   0,   0,   0,   0, -20, -40,
    -30,   0,  10,  15,  15,  10,   0, -30,
    -30,   5,  15,  20,  20,  15,   5, -30,
    -30,   0,  15,  20,  20,  15,   0, -30,
    -30,   5,  10,  15,  15,  10,   5, -30,
    -40, -20,   0,   5,   5,   0, -20, -40,
    -50, -40, -30, -30, -30, -30, -40, -50,
]);

#[rustfmt::skip]
const BISHOP: Psqt = Psqt::new([
    -20, -10, -10, -10, -10, -10, -10, -20,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -10,   0,   5,  10,  10,   5,   0, -10,
    -10,   5,   5,  10,  10,   5,   5, -10,
    -10,   0,  10,  10,  10,  10,   0, -10,
    -10,  10,  10,  10,  10,  10,  10, -10,
    -10,   5,   0,   0,   0,   0,   5, -10,
    -20, -10, -10, -10, -10, -10, -10, -20,
]);

#[rustfmt::skip]
const ROOK: Psqt = Psqt::new([
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10, 10, 10, 10, 10,  5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     0,  0,  0,  5,  5,  0,  0,  0,
]);

#[rustfmt::skip]
const QUEEN: Psqt = Psqt::new([
    -20, -10, -10, -5, -5, -10, -10, -20,
    -10,   0,   0,  0,  0,   0,   0, -10,
    -10,   0,   5,  5,  5,   5,   0, -10,
     -5,   0,   5,  5,  5,   5,   0,  -5,
      0,   0,   5,  5,  5,   5,   0,  -5,
    -10,   5,   5,  5,  5,   5,   0, -10,
    -10,   0,   5,  0,  0,   0,   0, -10,
    -20, -10, -10, -5, -5, -10, -10, -20,
]);

#[rustfmt::skip]
const KING: Psqt = Psqt::new([
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -20, -30, -30, -40, -40, -30, -30, -20,
    -10, -20, -20, -20, -20, -20, -20, -10,
     20,  20,   0,   0,   0,   0,  20,  20,
     20,  30,  10,   0,   0,  10,  30,  20,
]);

/// Default tables for every [`PieceKind`], indexed by [`kind_index`].
pub const DEFAULT_TABLES: [Psqt; PIECE_KINDS] = [PAWN, KNIGHT, BISHOP, ROOK, QUEEN, KING];

/// Number of distinct piece kinds.
pub const PIECE_KINDS: usize = 6;

/// Maps a [`PieceKind`] to its slot in per-kind arrays (Pawn first, King last).
#[inline(always)]
pub const fn kind_index(kind: PieceKind) -> usize {
    match kind {
        PieceKind::Pawn => 0,
        PieceKind::Knight => 1,
        PieceKind::Bishop => 2,
        PieceKind::Rook => 3,
        PieceKind::Queen => 4,
        PieceKind::King => 5,
    }
}

/// A [Piece-Square Table](https://www.chessprogramming.org/Piece-Square_Tables) of positional bonuses.
///
/// Internally indexed by square, where `a1 == 0` and `h8 == 63`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Psqt([i32; Square::COUNT]);

impl Psqt {
    /// Creates a new [`Psqt`] from a table written with the 8th rank first.
    const fn new(psqt: [i32; Square::COUNT]) -> Self {
        let mut flipped = psqt;

        let mut i = 0;
        while i < psqt.len() {
            // Flip the rank so that index 0 is a1
            flipped[i] = psqt[i ^ 56];
            i += 1;
        }

        Self(flipped)
    }

    /// Creates a [`Psqt`] directly from square-indexed values (`a1 == 0`).
    #[inline(always)]
    pub const fn from_squares(values: [i32; Square::COUNT]) -> Self {
        Self(values)
    }

    /// Get the value of this PSQT at the provided square index.
    #[inline(always)]
    pub const fn get(&self, index: usize) -> i32 {
        self.0[index]
    }

    /// Returns this table as seen from the opposite side of the board.
    ///
    /// The entry for square `s` becomes this table's entry for square `63 - s`.
    #[inline(always)]
    pub const fn mirrored(&self) -> Self {
        let mut mirrored = self.0;

        let mut i = 0;
        while i < mirrored.len() {
            mirrored[i] = self.0[mirror_index(i)];
            i += 1;
        }

        Self(mirrored)
    }
}

/// Rotates a square index by 180 degrees: `a1 <-> h8`, `e2 <-> d7`.
#[inline(always)]
pub const fn mirror_index(index: usize) -> usize {
    Square::COUNT - 1 - index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_are_flipped_to_a1() {
        // a1, e2 and h8 as written in the knight / pawn tables
        assert_eq!(KNIGHT.get(0), -50);
        assert_eq!(PAWN.get(12), -20);
        assert_eq!(PAWN.get(52), 50);
        assert_eq!(KING.get(6), 30);
    }

    #[test]
    fn test_mirroring_uses_table_values() {
        for table in DEFAULT_TABLES {
            let mirrored = table.mirrored();
            for index in 0..Square::COUNT {
                assert_eq!(mirrored.get(index), table.get(mirror_index(index)));
            }

            assert_eq!(mirrored.mirrored(), table);
        }
    }

    #[test]
    fn test_mirror_of_square_indices() {
        let mut indices = [0; Square::COUNT];
        for (i, value) in indices.iter_mut().enumerate() {
            *value = i as i32;
        }

        let mirrored = Psqt::from_squares(indices).mirrored();
        assert_eq!(mirrored.get(0), 63);
        assert_eq!(mirrored.get(12), 51);
        assert_eq!(mirrored.get(63), 0);
    }

    #[test]
    fn test_kind_indices_match_default_tables() {
        assert_eq!(DEFAULT_TABLES[kind_index(PieceKind::Pawn)], PAWN);
        assert_eq!(DEFAULT_TABLES[kind_index(PieceKind::King)], KING);
    }
}
