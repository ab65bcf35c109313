//! Minimum spacing between calls of an external service.
//!
//! Every call must be preceded by acquiring a [`Ticket`]. Tickets are
//! issued at least `min_interval` apart, no matter how many threads
//! compete for them.

use parking_lot::Mutex;
use std::{
    thread,
    time::{Duration, Instant},
};

#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

/// Permission to perform a single call.
#[derive(Debug)]
#[must_use]
pub struct Ticket {
    issued_at: Instant,
}

impl Ticket {
    pub fn issued_at(&self) -> Instant {
        self.issued_at
    }
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_slot: Mutex::new(None),
        }
    }

    /// Blocks until the next slot is available.
    ///
    /// The lock is held while sleeping so that waiting
    /// callers are served one after another.
    pub fn acquire(&self) -> Ticket {
        let mut next_slot = self.next_slot.lock();
        if let Some(slot) = *next_slot {
            let now = Instant::now();
            if slot > now {
                let delay = slot - now;
                log::trace!("Waiting {} ms for the next call slot", delay.as_millis());
                thread::sleep(delay);
            }
        }
        Self::issue(&mut next_slot, self.min_interval)
    }

    fn issue(next_slot: &mut Option<Instant>, min_interval: Duration) -> Ticket {
        let issued_at = Instant::now();
        *next_slot = Some(issued_at + min_interval);
        Ticket { issued_at }
    }
}
