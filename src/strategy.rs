/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use chessie::{Color, Piece, PieceKind, Square};

use crate::{kind_index, mirror_index, Psqt, DEFAULT_TABLES, PIECE_KINDS};

/// Material values of every piece kind, indexed by [`kind_index`].
///
/// The King is invaluable, but 0 is easier to work with in computations.
pub const DEFAULT_VALUES: [i32; PIECE_KINDS] = [100, 280, 320, 500, 900, 0];

/// Immutable configuration for the engine over the course of a game.
///
/// A [`Strategy`] is created once per game, for the color the engine is playing,
/// and holds everything that influences how positions are scored and how wide/deep the search is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strategy {
    /// Material value of each piece kind.
    values: [i32; PIECE_KINDS],

    /// Positional bonuses of each piece kind, oriented for [`Strategy::orientation`].
    tables: [Psqt; PIECE_KINDS],

    /// Number of candidate moves kept after trimming (breadth).
    lines: usize,

    /// Number of full-width plies searched below each root move before quiescence (depth).
    depth: usize,

    /// The color the engine plays, and therefore the side the tables are oriented for.
    orientation: Color,
}

impl Strategy {
    /// Default number of candidate lines kept at every node.
    pub const DEFAULT_LINES: usize = 5;

    /// Default search depth.
    pub const DEFAULT_DEPTH: usize = 5;

    /// Smallest breadth allowed; a search that considers no moves would never select one.
    pub const MIN_LINES: usize = 1;

    /// Largest breadth allowed. No chess position has more legal moves than this.
    pub const MAX_LINES: usize = 218;

    /// Largest depth allowed.
    pub const MAX_DEPTH: usize = 32;

    /// Constructs the default [`Strategy`] for an engine playing `color`.
    ///
    /// When playing Black, the positional tables are mirrored so that they are oriented from Black's side of the board.
    pub fn new(color: Color) -> Self {
        let tables = if color == Color::White {
            DEFAULT_TABLES
        } else {
            DEFAULT_TABLES.map(|table| table.mirrored())
        };

        Self {
            values: DEFAULT_VALUES,
            tables,
            lines: Self::DEFAULT_LINES,
            depth: Self::DEFAULT_DEPTH,
            orientation: color,
        }
    }

    /// Constructs a [`Strategy`] from custom material values and White-oriented tables.
    pub fn from_parts(
        values: [i32; PIECE_KINDS],
        tables: [Psqt; PIECE_KINDS],
        color: Color,
    ) -> Self {
        let tables = if color == Color::White {
            tables
        } else {
            tables.map(|table| table.mirrored())
        };

        Self {
            values,
            tables,
            orientation: color,
            ..Self::new(color)
        }
    }

    /// Sets the breadth (number of trimmed candidate moves), clamped to `[MIN_LINES, MAX_LINES]`.
    pub fn with_lines(mut self, lines: usize) -> Self {
        self.lines = lines.clamp(Self::MIN_LINES, Self::MAX_LINES);
        self
    }

    /// Sets the search depth, capped at [`Strategy::MAX_DEPTH`].
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth.min(Self::MAX_DEPTH);
        self
    }

    /// Number of candidate moves kept after trimming.
    #[inline(always)]
    pub const fn lines(&self) -> usize {
        self.lines
    }

    /// Number of full-width plies searched below each root move.
    #[inline(always)]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// The color this strategy was built for.
    ///
    /// Orientation only decides how the tables are stored. Every piece's own table is read from its own side
    /// of the board, so both orientations score any position the same.
    #[inline(always)]
    pub const fn orientation(&self) -> Color {
        self.orientation
    }

    /// Material value of the provided [`PieceKind`].
    #[inline(always)]
    pub const fn value_of(&self, kind: PieceKind) -> i32 {
        self.values[kind_index(kind)]
    }

    /// Positional bonus for `piece` standing on `square`.
    ///
    /// Pieces of the strategy's own color read the tables directly; opposing pieces read the mirrored square,
    /// so both colors are scored from their own side of the board.
    #[inline(always)]
    pub fn psqt_value(&self, piece: Piece, square: Square) -> i32 {
        let table = &self.tables[kind_index(piece.kind())];

        if piece.color() == self.orientation {
            table.get(square.index())
        } else {
            table.get(mirror_index(square.index()))
        }
    }
}

impl Default for Strategy {
    /// The default strategy plays White.
    #[inline(always)]
    fn default() -> Self {
        Self::new(Color::White)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientations_agree_on_every_square() {
        let white = Strategy::new(Color::White);
        let black = Strategy::new(Color::Black);

        for square in Square::iter() {
            for kind in PieceKind::all() {
                for color in [Color::White, Color::Black] {
                    let piece = Piece::new(color, kind);
                    assert_eq!(
                        white.psqt_value(piece, square),
                        black.psqt_value(piece, square),
                        "{piece:?} on {square}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_black_tables_are_mirrored_values() {
        let black = Strategy::new(Color::Black);

        // The knight table is -50 in the corners and 20 in the center; a mirrored table must keep that shape
        // instead of holding square indices.
        let knight = &black.tables[kind_index(PieceKind::Knight)];
        assert_eq!(knight.get(0), -50);
        assert_eq!(knight.get(63), -50);
        assert_eq!(knight.get(27), 20);
    }

    #[test]
    fn test_builders_clamp() {
        let strategy = Strategy::default().with_lines(0).with_depth(1_000);
        assert_eq!(strategy.lines(), Strategy::MIN_LINES);
        assert_eq!(strategy.depth(), Strategy::MAX_DEPTH);

        let strategy = Strategy::default().with_lines(3).with_depth(2);
        assert_eq!(strategy.lines(), 3);
        assert_eq!(strategy.depth(), 2);
    }

    #[test]
    fn test_custom_values() {
        let values = [1, 3, 3, 5, 9, 0];
        let strategy = Strategy::from_parts(values, DEFAULT_TABLES, Color::Black);

        assert_eq!(strategy.value_of(PieceKind::Queen), 9);
        assert_eq!(strategy.orientation(), Color::Black);
        assert_eq!(strategy.lines(), Strategy::DEFAULT_LINES);
    }
}
