//! Configuration for the demo server, given from environment variables and lazily
//! initialized when needed.

use once_cell::race::{OnceBool, OnceBox};
use std::env;


/// Return true if newly created towns are publicly listed by default.
///
/// To change this, set `TOWN_DEFAULT_PUBLIC=0`.
pub fn default_public() -> bool {
    static ENV: OnceBool = OnceBool::new();
    ENV.get_or_init(|| {
        env::var_os("TOWN_DEFAULT_PUBLIC")
            .map(|s| s.as_encoded_bytes() != b"0")
            .unwrap_or(true)
    })
}

/// Soft display cap reported in town listings. The core does not enforce this as an
/// admission limit; it exists for client display only.
///
/// To change this, set `TOWN_DEFAULT_MAX_OCCUPANCY=<n>`.
pub fn default_max_occupancy() -> usize {
    static ENV: OnceBox<usize> = OnceBox::new();
    *ENV.get_or_init(|| {
        let value = env::var("TOWN_DEFAULT_MAX_OCCUPANCY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_MAX_OCCUPANCY);
        Box::new(value)
    })
}

/// Fallback soft occupancy cap when `TOWN_DEFAULT_MAX_OCCUPANCY` is unset or
/// unparsable.
pub const DEFAULT_MAX_OCCUPANCY: usize = 50;
