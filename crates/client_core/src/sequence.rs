/// Tags outgoing requests so a controller can tell whether a response still
/// belongs to the most recent request it issued.
#[derive(Debug, Default, Clone)]
pub struct RequestTracker {
    latest: u64,
    pending: bool,
}

/// What happened to a response once it came back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    Applied,
    /// A newer request was issued after this one; the response was dropped.
    Stale,
}

impl RequestTracker {
    pub fn issue(&mut self) -> u64 {
        self.latest += 1;
        self.pending = true;
        self.latest
    }

    /// Returns `true` when `seq` is the latest issued request, which also
    /// clears the pending flag.
    pub fn settle(&mut self, seq: u64) -> bool {
        if seq != self.latest {
            return false;
        }
        self.pending = false;
        true
    }

    /// Makes every request issued so far stale.
    pub fn invalidate(&mut self) {
        self.latest += 1;
        self.pending = false;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}
