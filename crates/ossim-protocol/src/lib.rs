//! The fixed-size wire frame shared between scheduler and clients.

mod error;
mod frame;

pub use error::ProtocolError;
pub use frame::{FRAME_SIZE, Frame, RequestKind};
