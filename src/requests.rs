/// Ticket identifying one issued request for one purpose on one component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// Monotonic guard against stale writes. Rapid repeated actions may issue
/// overlapping identical requests; a response is applied only while its
/// ticket is the latest issued for that purpose, so a superseded request
/// resolves into a discard instead of clobbering newer view state.
#[derive(Debug, Default)]
pub struct FetchGuard {
    current: u64,
}

impl FetchGuard {
    pub fn begin(&mut self) -> FetchTicket {
        self.current += 1;
        FetchTicket(self.current)
    }

    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.0 == self.current
    }
}
