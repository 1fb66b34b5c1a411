use thiserror::Error;

/// Errors in interpreting bytes as a wire frame.
///
/// Framing (how many bytes were actually read/written) is the
/// transport's concern (`ossim-net`); this crate only reports what went
/// wrong turning an already-assembled `FRAME_SIZE`-byte buffer into a
/// [`crate::Frame`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("unrecognized request discriminant {0}")]
    UnknownRequest(u32),
}
