//! Magic-token and quote-number issuance.
//!
//! The magic token is the sole credential for unauthenticated customer
//! access to one quote, so it comes from the thread-local CSPRNG at 128
//! bits. It is generated before the INSERT and immutable once persisted;
//! no endpoint regenerates it.

use rand::Rng;

use crate::types::Timestamp;

/// Length of a magic token in bytes (128 bits before hex encoding).
const MAGIC_TOKEN_BYTES: usize = 16;

/// Alphabet for the human-readable quote-number suffix. Excludes `0/O` and
/// `1/I` so the number survives being read over the phone.
const QUOTE_NUMBER_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Length of the random quote-number suffix.
const QUOTE_NUMBER_SUFFIX_LEN: usize = 4;

/// Generate a magic token: 16 CSPRNG bytes, lowercase hex encoded.
///
/// 128 bits gives effectively zero collision probability at any plausible
/// quote volume; the `uq_quotes_magic_token` constraint is the backstop.
pub fn magic_token() -> String {
    let mut rng = rand::rng();
    let mut bytes = [0u8; MAGIC_TOKEN_BYTES];
    rng.fill(&mut bytes);
    let mut out = String::with_capacity(MAGIC_TOKEN_BYTES * 2);
    for byte in bytes {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

/// Generate a human-readable quote number, e.g. `Q-20250825-K7PF`.
///
/// Not a credential. Collisions within a day are possible in principle;
/// the unique constraint on `quote_number` catches them and the caller
/// retries with a fresh suffix.
pub fn quote_number(now: Timestamp) -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..QUOTE_NUMBER_SUFFIX_LEN)
        .map(|_| {
            let idx = rng.random_range(0..QUOTE_NUMBER_ALPHABET.len());
            QUOTE_NUMBER_ALPHABET[idx] as char
        })
        .collect();
    format!("Q-{}-{}", now.format("%Y%m%d"), suffix)
}
