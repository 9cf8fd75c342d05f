//! Move Legality Engine
//!
//! One shared, pure predicate over piece-movement geometry and occupancy,
//! reused by every boundary that needs to vet a move. Deliberately a
//! conservative subset: no check or pin evaluation, no castling, no
//! en-passant. Promotion is resolved by the state-advance step in
//! [`crate::game::board`], never here.

use crate::game::board::{Board, Color, PieceKind, Square};

/// Decide whether a single half-move is legal for `color`.
///
/// Rules, in order, any failure rejecting the move:
/// 1. `from` and `to` are distinct (both are valid by construction).
/// 2. A piece of `color` occupies `from`.
/// 3. The piece at `to`, if any, is not `color`'s own (no self-capture).
/// 4. Per-kind geometry with empty intervening squares where required.
pub fn is_legal(board: &Board, from: Square, to: Square, color: Color) -> bool {
    if from == to {
        return false;
    }
    let piece = match board.piece_at(from) {
        Some(p) => p,
        None => return false,
    };
    if piece.color != color {
        return false;
    }
    let target_occupied = match board.piece_at(to) {
        Some(t) if t.color == color => return false,
        Some(_) => true,
        None => false,
    };

    match piece.kind {
        PieceKind::Pawn => pawn_move(board, from, to, color, target_occupied),
        PieceKind::Knight => knight_move(from, to),
        PieceKind::Bishop => bishop_move(board, from, to),
        PieceKind::Rook => rook_move(board, from, to),
        // Queen geometry is the direct union of rook and bishop geometry.
        PieceKind::Queen => rook_move(board, from, to) || bishop_move(board, from, to),
        PieceKind::King => king_move(from, to),
    }
}

/// Signed (row, col) delta from `from` to `to`.
#[inline]
fn delta(from: Square, to: Square) -> (i8, i8) {
    (
        to.row() as i8 - from.row() as i8,
        to.col() as i8 - from.col() as i8,
    )
}

/// True when every strictly-intervening square along a straight or diagonal
/// line is empty. Caller guarantees the line is straight or diagonal.
fn path_clear(board: &Board, from: Square, to: Square) -> bool {
    let (dr, dc) = delta(from, to);
    let step_r = dr.signum();
    let step_c = dc.signum();
    let steps = dr.abs().max(dc.abs());

    for i in 1..steps {
        let row = (from.row() as i8 + step_r * i) as usize;
        let col = (from.col() as i8 + step_c * i) as usize;
        match Square::from_coord(row, col) {
            Some(square) if board.piece_at(square).is_none() => {}
            _ => return false,
        }
    }
    true
}

fn pawn_move(board: &Board, from: Square, to: Square, color: Color, target_occupied: bool) -> bool {
    let (dr, dc) = delta(from, to);
    let dir = color.pawn_direction();

    if dc == 0 && !target_occupied {
        // Single forward step.
        if dr == dir {
            return true;
        }
        // Double step from the home rank, both squares empty.
        if from.row() == color.pawn_home_row() && dr == 2 * dir {
            return Square::from_coord((from.row() as i8 + dir) as usize, from.col())
                .is_some_and(|mid| board.piece_at(mid).is_none());
        }
        return false;
    }

    // Diagonal single step, captures only.
    dc.abs() == 1 && dr == dir && target_occupied
}

fn knight_move(from: Square, to: Square) -> bool {
    let (dr, dc) = delta(from, to);
    matches!((dr.abs(), dc.abs()), (1, 2) | (2, 1))
}

fn bishop_move(board: &Board, from: Square, to: Square) -> bool {
    let (dr, dc) = delta(from, to);
    dr.abs() == dc.abs() && path_clear(board, from, to)
}

fn rook_move(board: &Board, from: Square, to: Square) -> bool {
    let (dr, dc) = delta(from, to);
    (dr == 0 || dc == 0) && path_clear(board, from, to)
}

fn king_move(from: Square, to: Square) -> bool {
    let (dr, dc) = delta(from, to);
    dr.abs() <= 1 && dc.abs() <= 1
}
