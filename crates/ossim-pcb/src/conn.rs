/// Opaque handle to a client connection.
///
/// Owned by the transport layer (`ossim-net`), which is the only crate
/// that knows how a `ConnId` maps onto an actual socket. Keeping the PCB
/// and queue model free of any `mio`/socket dependency lets policy code
/// stay a pure function over PCBs and queues.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnId(usize);

impl ConnId {
    #[must_use]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}
