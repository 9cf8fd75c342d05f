//! Join-Code Generation
//!
//! Short, human-shareable session codes. Candidates are random draws from
//! an uppercase alphanumeric alphabet, checked against the store's by-code
//! lookup and retried on collision. The check is not atomic with the later
//! session insert; two creators drawing the same code in the same instant
//! is an accepted, bounded-probability race.

use rand::Rng;

use crate::session::error::SessionError;
use crate::store::SessionStore;
use crate::{CODE_LENGTH, CODE_MAX_INPUT_LENGTH};

/// Candidate alphabet: uppercase letters and digits.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Draw one random candidate code of the configured length.
///
/// Randomness need not be cryptographic; collision probability only has to
/// be low enough that a handful of attempts succeeds in practice.
fn random_code() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LENGTH)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Generate a join code that no existing session currently uses.
///
/// Tries up to `max_attempts` candidates; each is checked against the
/// store's by-code lookup and accepted on no-match. Exhausting all attempts
/// fails with [`SessionError::CodeExhausted`], surfaced to the caller as a
/// server error and never retried beyond `max_attempts`.
pub async fn generate_code<S>(store: &S, max_attempts: u32) -> Result<String, SessionError>
where
    S: SessionStore + ?Sized,
{
    for _ in 0..max_attempts {
        let candidate = random_code();
        if store.find_by_code(&candidate).await?.is_none() {
            return Ok(candidate);
        }
    }
    Err(SessionError::CodeExhausted)
}

/// Normalize a caller-supplied join code: uppercase, strip everything that
/// is not ASCII alphanumeric, truncate to the accepted maximum length.
pub fn normalize_code(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .take(CODE_MAX_INPUT_LENGTH)
        .collect()
}
