//! Request sequencing.
//!
//! Responses can complete out of order. Each submission takes a
//! [`RequestTicket`] from a [`RequestSequencer`]; a [`LatestResponse`] then
//! accepts a completion only if no newer ticket has been accepted, so shown
//! results follow the last request sent rather than the last response
//! received.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Position of a submission in issue order. Later tickets compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    /// The raw sequence number, starting at 1.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues strictly increasing tickets.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    issued: AtomicU64,
}

impl RequestSequencer {
    /// A sequencer that has issued nothing.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            issued: AtomicU64::new(0),
        }
    }

    /// Issue the next ticket.
    pub fn issue(&self) -> RequestTicket {
        RequestTicket(self.issued.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// The most recently issued ticket.
    #[must_use]
    pub fn latest(&self) -> Option<RequestTicket> {
        match self.issued.load(Ordering::Acquire) {
            0 => None,
            value => Some(RequestTicket(value)),
        }
    }

    /// Whether `ticket` is the most recently issued one.
    #[must_use]
    pub fn is_latest(&self, ticket: RequestTicket) -> bool {
        self.latest() == Some(ticket)
    }
}

/// Tracks the newest completion applied to the display.
#[derive(Debug, Default)]
pub struct LatestResponse {
    applied: AtomicU64,
}

impl LatestResponse {
    /// Nothing applied yet.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            applied: AtomicU64::new(0),
        }
    }

    /// Record a completion for `ticket`.
    ///
    /// Returns `false` when a newer (or the same) ticket was already
    /// accepted; the caller must then drop the response as stale.
    pub fn accept(&self, ticket: RequestTicket) -> bool {
        self.applied.fetch_max(ticket.0, Ordering::AcqRel) < ticket.0
    }

    /// The newest accepted ticket.
    #[must_use]
    pub fn applied(&self) -> Option<RequestTicket> {
        match self.applied.load(Ordering::Acquire) {
            0 => None,
            value => Some(RequestTicket(value)),
        }
    }
}
