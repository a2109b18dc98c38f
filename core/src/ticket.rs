use serde::{Deserialize, Serialize};

/// Handle for one deferred action or in-flight request.
///
/// Only the most recently issued ticket of a [`TicketGate`] can be redeemed, and only once.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ticket(u32);

/// Issues tickets and decides whether a late callback may still apply its result.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TicketGate {
    epoch: u32,
    live: bool,
}

impl TicketGate {
    pub const fn new() -> Self {
        Self {
            epoch: 0,
            live: false,
        }
    }

    /// Issues a fresh ticket, superseding any outstanding one.
    pub fn issue(&mut self) -> Ticket {
        self.epoch = self.epoch.wrapping_add(1);
        self.live = true;
        Ticket(self.epoch)
    }

    /// Invalidates the outstanding ticket, if any.
    pub fn revoke(&mut self) {
        self.live = false;
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.live && ticket.0 == self.epoch
    }

    pub fn has_outstanding(&self) -> bool {
        self.live
    }

    /// Consumes `ticket`; `false` means the result is stale and must be discarded.
    pub fn redeem(&mut self, ticket: Ticket) -> bool {
        if self.is_current(ticket) {
            self.live = false;
            true
        } else {
            log::debug!("discarding stale ticket {:?} (epoch {})", ticket, self.epoch);
            false
        }
    }
}
