//! Generation of opaque, unguessable identifiers.
//!
//! Session tokens, town ids, town update passwords and area labels minted by the
//! server all draw from the same 21-character URL-safe alphabet, giving well over
//! 128 bits of entropy per id.

use arcstr::ArcStr;
use rand::Rng;

const ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

const ID_LEN: usize = 21;

/// Generate a fresh opaque id using a thread-local cryptographically-seeded RNG.
pub fn generate_opaque_id() -> ArcStr {
    let mut rng = rand::thread_rng();
    let id: String = (0..ID_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..ALPHABET.len());
            ALPHABET[idx] as char
        })
        .collect();
    ArcStr::from(id)
}
