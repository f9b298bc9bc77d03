//! Sequencing for overlapping suggestion fetches: only the response to the
//! most recent request is applied.

/// Identifies one suggestion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SuggestionTicket(u64);

#[derive(Debug, Clone, Default)]
pub struct SuggestionTracker {
    latest: u64,
}

impl SuggestionTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a request. Every earlier ticket becomes stale.
    pub fn begin(&mut self) -> SuggestionTicket {
        self.latest += 1;
        SuggestionTicket(self.latest)
    }

    /// Makes every outstanding ticket stale without issuing a new one.
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }

    #[must_use]
    pub fn is_current(&self, ticket: SuggestionTicket) -> bool {
        ticket.0 == self.latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_latest_ticket_is_current() {
        let mut tracker = SuggestionTracker::new();
        let first = tracker.begin();
        let second = tracker.begin();
        assert!(!tracker.is_current(first));
        assert!(tracker.is_current(second));
        assert!(first < second);
    }

    #[test]
    fn invalidate_stales_outstanding_ticket() {
        let mut tracker = SuggestionTracker::new();
        let ticket = tracker.begin();
        tracker.invalidate();
        assert!(!tracker.is_current(ticket));
    }
}
