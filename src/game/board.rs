//! Board Model
//!
//! Pure data representation of a chess position plus the metadata the
//! session document persists (side to move, castling rights, en-passant
//! target, move counters). Row 0 of the grid is black's back rank (rank 8),
//! row 7 is white's back rank (rank 1).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// COLOR AND PIECES
// =============================================================================

/// Player color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// White moves first.
    White,
    /// Black.
    Black,
}

impl Color {
    /// The opposing color.
    #[inline]
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row delta for a forward pawn step (white moves toward row 0).
    #[inline]
    pub fn pawn_direction(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// Grid row holding this color's unmoved pawns.
    #[inline]
    pub fn pawn_home_row(self) -> usize {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    /// Grid row a pawn of this color promotes on.
    #[inline]
    pub fn promotion_row(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

/// Kind of chess piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    /// Pawn.
    Pawn,
    /// Knight.
    Knight,
    /// Bishop.
    Bishop,
    /// Rook.
    Rook,
    /// Queen.
    Queen,
    /// King.
    King,
}

/// A colored piece occupying a square.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    /// Owning color.
    pub color: Color,
    /// Piece kind.
    pub kind: PieceKind,
}

impl Piece {
    /// Create a piece.
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }
}

// =============================================================================
// SQUARES
// =============================================================================

/// Error for a malformed or out-of-range square token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid square: {0:?}")]
pub struct InvalidSquare(pub String);

/// Grid coordinate, both components always in [0, 7].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Coord {
    /// Row index (0 = black's back rank).
    pub row: usize,
    /// Column index (0 = file a).
    pub col: usize,
}

/// A board square, stored as a validated grid coordinate.
///
/// Parses from the 2-character file+rank form (`"e2"`) and displays the
/// same way. Construction is only possible through validating paths, so a
/// `Square` always indexes the grid safely.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Square {
    row: u8,
    col: u8,
}

const FILES: &[u8; 8] = b"abcdefgh";

impl Square {
    /// Parse a file+rank token such as `"e2"`.
    pub fn parse(s: &str) -> Result<Square, InvalidSquare> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(InvalidSquare(s.to_string()));
        }
        let col = match bytes[0] {
            b @ b'a'..=b'h' => b - b'a',
            _ => return Err(InvalidSquare(s.to_string())),
        };
        let row = match bytes[1] {
            b @ b'1'..=b'8' => 8 - (b - b'0'),
            _ => return Err(InvalidSquare(s.to_string())),
        };
        Ok(Square { row, col })
    }

    /// Build from a grid coordinate, if in range.
    pub fn from_coord(row: usize, col: usize) -> Option<Square> {
        if row < 8 && col < 8 {
            Some(Square {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// The grid coordinate of this square.
    #[inline]
    pub fn coord(self) -> Coord {
        Coord {
            row: self.row as usize,
            col: self.col as usize,
        }
    }

    /// Row index (0 = black's back rank).
    #[inline]
    pub fn row(self) -> usize {
        self.row as usize
    }

    /// Column index (0 = file a).
    #[inline]
    pub fn col(self) -> usize {
        self.col as usize
    }

    /// File+rank name of this square (`"e2"`).
    pub fn name(self) -> String {
        format!("{}{}", FILES[self.col as usize] as char, 8 - self.row)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", FILES[self.col as usize] as char, 8 - self.row)
    }
}

impl FromStr for Square {
    type Err = InvalidSquare;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Square::parse(s)
    }
}

impl Serialize for Square {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name())
    }
}

impl<'de> Deserialize<'de> for Square {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Square::parse(&s).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// CASTLING RIGHTS
// =============================================================================

/// Castling availability flags, one per (color, side) pair.
///
/// Carried as position metadata only: the legality engine never consults
/// these, since castling is outside the enforced rule subset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastlingRights {
    /// White king-side.
    pub white_king: bool,
    /// White queen-side.
    pub white_queen: bool,
    /// Black king-side.
    pub black_king: bool,
    /// Black queen-side.
    pub black_queen: bool,
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self {
            white_king: true,
            white_queen: true,
            black_king: true,
            black_queen: true,
        }
    }
}

// =============================================================================
// BOARD
// =============================================================================

/// A chess position: the 8x8 grid plus persisted metadata.
///
/// `Clone` yields a deep snapshot (the grid is plain `Copy` data), so
/// speculative application never aliases the persisted board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Piece grid; row 0 is black's back rank.
    pub grid: [[Option<Piece>; 8]; 8],
    /// Side to move.
    pub turn: Color,
    /// Castling flags (metadata only).
    pub castling: CastlingRights,
    /// En-passant target square (metadata only, never set in scope).
    pub en_passant: Option<Square>,
    /// Half-move clock.
    pub halfmove: u32,
    /// Full-move number, starting at 1.
    pub fullmove: u32,
}

impl Board {
    /// The standard starting position, white to move.
    pub fn initial() -> Board {
        use PieceKind::*;
        let back = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];
        let mut grid: [[Option<Piece>; 8]; 8] = [[None; 8]; 8];
        for (col, kind) in back.into_iter().enumerate() {
            grid[0][col] = Some(Piece::new(Color::Black, kind));
            grid[7][col] = Some(Piece::new(Color::White, kind));
        }
        for col in 0..8 {
            grid[1][col] = Some(Piece::new(Color::Black, PieceKind::Pawn));
            grid[6][col] = Some(Piece::new(Color::White, PieceKind::Pawn));
        }
        Board {
            grid,
            turn: Color::White,
            castling: CastlingRights::default(),
            en_passant: None,
            halfmove: 0,
            fullmove: 1,
        }
    }

    /// Piece occupying a square, if any.
    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.grid[square.row()][square.col()]
    }

    /// Apply a validated move: relocate the piece, auto-promote a pawn that
    /// reaches its last rank to a queen, flip the side to move, and maintain
    /// the move counters. Returns the captured piece, if any.
    ///
    /// Legality is the caller's responsibility ([`crate::game::rules`]).
    pub fn apply_move(&mut self, from: Square, to: Square) -> Option<Piece> {
        let Some(mut piece) = self.grid[from.row()][from.col()].take() else {
            return None;
        };
        let captured = self.grid[to.row()][to.col()];
        let was_pawn = piece.kind == PieceKind::Pawn;

        // Unconditional queen promotion; promotion choice is out of scope.
        if was_pawn && to.row() == piece.color.promotion_row() {
            piece.kind = PieceKind::Queen;
        }
        self.grid[to.row()][to.col()] = Some(piece);

        if was_pawn || captured.is_some() {
            self.halfmove = 0;
        } else {
            self.halfmove += 1;
        }
        if self.turn == Color::Black {
            self.fullmove += 1;
        }
        self.en_passant = None;
        self.turn = self.turn.opposite();

        captured
    }

    /// Count pieces of a given color and kind. Used by invariant checks.
    pub fn count(&self, color: Color, kind: PieceKind) -> usize {
        self.grid
            .iter()
            .flatten()
            .filter(|p| **p == Some(Piece::new(color, kind)))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_squares() {
        let a1 = Square::parse("a1").unwrap();
        assert_eq!(a1.coord(), Coord { row: 7, col: 0 });

        let h8 = Square::parse("h8").unwrap();
        assert_eq!(h8.coord(), Coord { row: 0, col: 7 });

        let e2 = Square::parse("e2").unwrap();
        assert_eq!(e2.coord(), Coord { row: 6, col: 4 });
    }

    #[test]
    fn parse_rejects_malformed() {
        for bad in ["", "e", "e22", "i1", "a0", "a9", "4e", "E2", "  "] {
            assert!(Square::parse(bad).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn name_round_trips() {
        for row in 0..8 {
            for col in 0..8 {
                let sq = Square::from_coord(row, col).unwrap();
                assert_eq!(Square::parse(&sq.name()).unwrap(), sq);
            }
        }
    }

    #[test]
    fn from_coord_rejects_out_of_range() {
        assert!(Square::from_coord(8, 0).is_none());
        assert!(Square::from_coord(0, 8).is_none());
    }

    #[test]
    fn initial_position_is_standard() {
        let board = Board::initial();
        assert_eq!(board.turn, Color::White);
        assert_eq!(board.fullmove, 1);
        assert_eq!(board.count(Color::White, PieceKind::King), 1);
        assert_eq!(board.count(Color::Black, PieceKind::King), 1);
        assert_eq!(board.count(Color::White, PieceKind::Pawn), 8);
        assert_eq!(board.count(Color::Black, PieceKind::Pawn), 8);

        let e1 = Square::parse("e1").unwrap();
        assert_eq!(
            board.piece_at(e1),
            Some(Piece::new(Color::White, PieceKind::King))
        );
        let d8 = Square::parse("d8").unwrap();
        assert_eq!(
            board.piece_at(d8),
            Some(Piece::new(Color::Black, PieceKind::Queen))
        );
        let e4 = Square::parse("e4").unwrap();
        assert_eq!(board.piece_at(e4), None);
    }

    #[test]
    fn clone_is_deep_snapshot() {
        let board = Board::initial();
        let mut copy = board.clone();
        copy.apply_move(
            Square::parse("e2").unwrap(),
            Square::parse("e4").unwrap(),
        );
        // Original must be untouched by mutation of the copy.
        assert_eq!(
            board.piece_at(Square::parse("e2").unwrap()),
            Some(Piece::new(Color::White, PieceKind::Pawn))
        );
        assert_ne!(board, copy);
    }

    #[test]
    fn apply_move_relocates_and_flips_turn() {
        let mut board = Board::initial();
        let from = Square::parse("e2").unwrap();
        let to = Square::parse("e4").unwrap();
        let captured = board.apply_move(from, to);

        assert_eq!(captured, None);
        assert_eq!(board.piece_at(from), None);
        assert_eq!(
            board.piece_at(to),
            Some(Piece::new(Color::White, PieceKind::Pawn))
        );
        assert_eq!(board.turn, Color::Black);
        assert_eq!(board.halfmove, 0);
        assert_eq!(board.fullmove, 1);
    }

    #[test]
    fn fullmove_increments_after_black() {
        let mut board = Board::initial();
        board.apply_move(Square::parse("e2").unwrap(), Square::parse("e4").unwrap());
        assert_eq!(board.fullmove, 1);
        board.apply_move(Square::parse("e7").unwrap(), Square::parse("e5").unwrap());
        assert_eq!(board.fullmove, 2);
    }

    #[test]
    fn pawn_reaching_last_rank_becomes_queen() {
        let mut board = Board::initial();
        board.grid = [[None; 8]; 8];
        let a7 = Square::parse("a7").unwrap();
        let a8 = Square::parse("a8").unwrap();
        board.grid[a7.row()][a7.col()] = Some(Piece::new(Color::White, PieceKind::Pawn));

        board.apply_move(a7, a8);
        assert_eq!(
            board.piece_at(a8),
            Some(Piece::new(Color::White, PieceKind::Queen))
        );
    }

    #[test]
    fn black_pawn_promotes_on_row_seven() {
        let mut board = Board::initial();
        board.grid = [[None; 8]; 8];
        board.turn = Color::Black;
        let h2 = Square::parse("h2").unwrap();
        let h1 = Square::parse("h1").unwrap();
        board.grid[h2.row()][h2.col()] = Some(Piece::new(Color::Black, PieceKind::Pawn));

        board.apply_move(h2, h1);
        assert_eq!(
            board.piece_at(h1),
            Some(Piece::new(Color::Black, PieceKind::Queen))
        );
    }

    #[test]
    fn square_serde_uses_algebraic_form() {
        let sq = Square::parse("g5").unwrap();
        let json = serde_json::to_string(&sq).unwrap();
        assert_eq!(json, "\"g5\"");
        let back: Square = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sq);
    }
}
