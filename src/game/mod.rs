//! Chess Logic Module
//!
//! Pure board representation and move legality. No I/O, no store access;
//! everything in this module is a deterministic function of its inputs.
//!
//! ## Module Structure
//!
//! - `board`: squares, pieces, the 8x8 grid, state advance
//! - `rules`: the legality predicate shared by every boundary

pub mod board;
pub mod rules;

// Re-export key types
pub use board::{Board, Color, Coord, Piece, PieceKind, Square};
pub use rules::is_legal;
