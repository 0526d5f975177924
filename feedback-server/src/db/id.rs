//! Row identifier generation
//!
//! Identifiers are 4 bytes from the operating system's entropy source,
//! rendered as 8 uppercase hex characters (e.g. `A1B2C3D4`). Collisions are
//! not checked here; the primary key constraint is the backstop.

use rand::rngs::OsRng;
use rand::RngCore;

/// Number of random bytes behind each identifier.
const ID_BYTES: usize = 4;

/// The entropy source failed. Not retryable.
#[derive(Debug, thiserror::Error)]
#[error("entropy source unavailable: {0}")]
pub struct IdError(#[from] rand::Error);

/// Generate a new 8-character uppercase hex identifier.
pub fn new_id() -> Result<String, IdError> {
    let mut bytes = [0u8; ID_BYTES];
    OsRng.try_fill_bytes(&mut bytes)?;
    Ok(bytes.iter().map(|b| format!("{b:02X}")).collect())
}
