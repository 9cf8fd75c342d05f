//! # Chess Duel Server
//!
//! Session server core for two-player invite-code chess. One player creates
//! a session and receives a short join code, a second player joins with that
//! code, and both submit moves against a single shared session record.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    CHESS DUEL SERVER                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  game/           - Pure chess logic (no I/O)                 │
//! │  ├── board.rs    - Board model, squares, starting position   │
//! │  └── rules.rs    - Move legality (geometry + occupancy)      │
//! │                                                              │
//! │  session/        - Session state machine                     │
//! │  ├── state.rs    - Session, players, move history            │
//! │  ├── code.rs     - Join-code generation                      │
//! │  ├── lifecycle.rs- Create / join                             │
//! │  └── moves.rs    - Atomic move application, resignation      │
//! │                                                              │
//! │  store/          - Transactional document store contract     │
//! │  ├── mod.rs      - SessionStore trait, versioned documents   │
//! │  └── memory.rs   - In-memory reference implementation        │
//! │                                                              │
//! │  protocol.rs     - Transport-independent request/response    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency Contract
//!
//! All session state lives in the store. Every multi-step mutation (join,
//! move, resignation) is a read-modify-write against a versioned document,
//! committed conditionally on the version being unchanged since the read.
//! Conflicts are retried transparently up to [`TXN_MAX_RETRIES`] times; no
//! lock is ever held across a request, so there is no deadlock hazard.
//!
//! The rules engine is deliberately a conservative geometric subset: it does
//! not evaluate check, pins, castling legality, or en-passant. Resignation
//! is the only path to a finished session.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod game;
pub mod protocol;
pub mod session;
pub mod store;

// Re-export commonly used types
pub use game::board::{Board, Color, Coord, Piece, PieceKind, Square};
pub use game::rules::is_legal;
pub use session::code::{generate_code, normalize_code};
pub use session::error::SessionError;
pub use session::lifecycle::SessionService;
pub use session::state::{
    EndReason, GameResult, GameSession, GameStatus, MoveRecord, Player, PlayerId, SessionId,
};
pub use store::memory::MemoryStore;
pub use store::{SessionStore, StoreError, Versioned};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Length of a generated join code.
pub const CODE_LENGTH: usize = 5;

/// Attempts at generating a collision-free join code before giving up.
pub const CODE_MAX_ATTEMPTS: u32 = 5;

/// Longest join code accepted from callers before lookup.
pub const CODE_MAX_INPUT_LENGTH: usize = 8;

/// Bounded retries for optimistic-concurrency conflicts on one request.
pub const TXN_MAX_RETRIES: u32 = 5;
