use crate::error::ProtocolError;

/// Size in bytes of one wire frame: `pid: i32`, `request: u32`,
/// `time_ms: u32`, each in native-endian byte order.
pub const FRAME_SIZE: usize = 12;

/// One entry of the request/response protocol exchanged over the socket.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum RequestKind {
    /// Client asks for a CPU burst of `time_ms`.
    Run = 0,
    /// Client asks to be parked for an I/O wait of `time_ms`.
    Block = 1,
    /// Scheduler acknowledges a `Run`/`Block`; `time_ms` carries
    /// `current_time_ms` at admission.
    Ack = 2,
    /// Scheduler reports burst/block completion; `time_ms` carries
    /// `current_time_ms` at completion.
    Done = 3,
}

impl RequestKind {
    const fn from_u32(v: u32) -> Option<Self> {
        match v {
            0 => Some(Self::Run),
            1 => Some(Self::Block),
            2 => Some(Self::Ack),
            3 => Some(Self::Done),
            _ => None,
        }
    }
}

/// A single fixed-size protocol frame.
///
/// All-or-nothing on the wire: a short read or write of fewer than
/// [`FRAME_SIZE`] bytes is a fatal protocol error for that connection
/// (enforced by `ossim-net`, not by this type).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame {
    pub pid: i32,
    pub request: RequestKind,
    pub time_ms: u32,
}

impl Frame {
    #[must_use]
    pub const fn run(pid: i32, time_ms: u32) -> Self {
        Self { pid, request: RequestKind::Run, time_ms }
    }

    #[must_use]
    pub const fn block(pid: i32, time_ms: u32) -> Self {
        Self { pid, request: RequestKind::Block, time_ms }
    }

    #[must_use]
    pub const fn ack(pid: i32, now_ms: u32) -> Self {
        Self { pid, request: RequestKind::Ack, time_ms: now_ms }
    }

    #[must_use]
    pub const fn done(pid: i32, now_ms: u32) -> Self {
        Self { pid, request: RequestKind::Done, time_ms: now_ms }
    }

    /// Encode into a fixed-size buffer. Never allocates.
    #[must_use]
    pub fn encode(&self) -> [u8; FRAME_SIZE] {
        let mut buf = [0u8; FRAME_SIZE];
        buf[0..4].copy_from_slice(&self.pid.to_ne_bytes());
        buf[4..8].copy_from_slice(&(self.request as u32).to_ne_bytes());
        buf[8..12].copy_from_slice(&self.time_ms.to_ne_bytes());
        buf
    }

    /// Decode a fully-assembled `FRAME_SIZE`-byte buffer.
    ///
    /// # Errors
    /// Returns [`ProtocolError::UnknownRequest`] if the request
    /// discriminant doesn't match any [`RequestKind`] variant.
    pub fn decode(buf: &[u8; FRAME_SIZE]) -> Result<Self, ProtocolError> {
        let pid = i32::from_ne_bytes(buf[0..4].try_into().expect("slice is 4 bytes"));
        let request_raw = u32::from_ne_bytes(buf[4..8].try_into().expect("slice is 4 bytes"));
        let time_ms = u32::from_ne_bytes(buf[8..12].try_into().expect("slice is 4 bytes"));
        let request =
            RequestKind::from_u32(request_raw).ok_or(ProtocolError::UnknownRequest(request_raw))?;
        Ok(Self { pid, request, time_ms })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_all_kinds() {
        for frame in [
            Frame::run(7, 3000),
            Frame::block(7, 200),
            Frame::ack(7, 10),
            Frame::done(7, 3010),
        ] {
            let encoded = frame.encode();
            assert_eq!(Frame::decode(&encoded).unwrap(), frame);
        }
    }

    #[test]
    fn unknown_request_is_rejected() {
        let mut buf = Frame::run(1, 1).encode();
        buf[4..8].copy_from_slice(&99u32.to_ne_bytes());
        assert_eq!(Frame::decode(&buf), Err(ProtocolError::UnknownRequest(99)));
    }

    #[test]
    fn frame_size_matches_field_layout() {
        assert_eq!(FRAME_SIZE, std::mem::size_of::<i32>() + std::mem::size_of::<u32>() * 2);
    }
}
