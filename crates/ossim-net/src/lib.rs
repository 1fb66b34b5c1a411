//! Non-blocking Unix-domain-socket transport for the scheduler, built on
//! `mio`.

mod error;
mod stream;
mod transport;

pub use error::TransportError;
pub use transport::{Transport, TransportEvent};
