use std::sync::atomic::{AtomicUsize, Ordering};

/// In-flight marker for a controller. Counts outstanding calls so that one
/// call finishing does not clear the flag while another is still running.
#[derive(Debug, Default)]
pub struct BusyFlag {
    in_flight: AtomicUsize,
}

impl BusyFlag {
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Marks one call in flight until the guard drops, whatever the outcome.
    pub fn enter(&self) -> BusyGuard<'_> {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        BusyGuard { flag: self }
    }
}

#[must_use = "the flag clears as soon as the guard is dropped"]
pub struct BusyGuard<'a> {
    flag: &'a BusyFlag,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}
