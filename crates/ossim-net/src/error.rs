use thiserror::Error;

/// Fatal, whole-transport errors. Per-connection trouble (EAGAIN, a reset
/// peer, a short write) is reported instead via [`crate::TransportEvent`],
/// since it never needs to take the whole listener down.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("couldn't remove stale socket file at {path}: {source}")]
    RemoveStaleSocket { path: String, source: std::io::Error },

    #[error("couldn't bind unix socket at {path}: {source}")]
    Bind { path: String, source: std::io::Error },

    #[error("couldn't create mio poll instance: {0}")]
    Poll(#[source] std::io::Error),

    #[error("couldn't register listener with poll: {0}")]
    Register(#[source] std::io::Error),
}
