//! The media-token broker is the only external collaborator the core calls into
//! directly; everything else (transport, REST, persistence) is adapter-side.

/// Issues opaque media-session credentials for a `(town, player)` pair. The token's
/// content is meaningless to the core; it is only ever forwarded to the client.
///
/// Implementations are free to be a thin HTTP client to a real provider, or, as in
/// `town-server`'s demo binary, a stub.
pub trait TownTokenBroker: Send + Sync {
    fn get_token(&self, town_id: &str, player_id: &str) -> Result<String, BrokerError>;
}

/// Failure modes of a token broker call. This is the one core operation with real
/// external-I/O failure surface, so unlike the rest of the controller's API (which
/// reports validation/lookup misses as `bool`/`Option`) it gets a proper error type.
#[derive(Debug, thiserror::Error)]
pub enum BrokerError {
    #[error("token broker rejected the request: {0}")]
    Rejected(String),
    #[error("token broker timed out")]
    Timeout,
    #[error("token broker is unavailable: {0}")]
    Unavailable(String),
}
