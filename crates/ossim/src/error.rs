use thiserror::Error;

/// Top-level, fatal errors — the ones that reach `main` and cause a
/// non-zero exit. Everything recoverable (a single connection's I/O
/// trouble, an unrecognized frame) is handled in place and never becomes
/// one of these.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Transport(#[from] ossim_net::TransportError),
}
