//! One-shot completion arbitration
//!
//! Native credential delegates finish through competing paths: a success
//! callback, a failure callback and an independent watchdog timer may each
//! try to complete the same operation. [`ResolveOnce`] is the
//! single-assignment slot those paths share. The first writer wins; every
//! later attempt is a no-op, so platform bridges never need a per-call-site
//! completion guard.

use once_cell::sync::OnceCell;

/// A thread-safe, write-once result slot
#[derive(Debug)]
pub struct ResolveOnce<T> {
    slot: OnceCell<T>,
}

impl<T> ResolveOnce<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slot: OnceCell::new(),
        }
    }

    /// Attempt to resolve with `value`.
    ///
    /// Returns `true` when this call won the slot; `false` when an earlier
    /// resolution already holds it, in which case `value` is dropped.
    pub fn resolve(&self, value: T) -> bool {
        self.slot.set(value).is_ok()
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.slot.get().is_some()
    }

    /// The winning value, if any resolution happened yet
    #[must_use]
    pub fn get(&self) -> Option<&T> {
        self.slot.get()
    }

    /// Consume the slot, yielding the winning value if any
    #[must_use]
    pub fn into_inner(self) -> Option<T> {
        self.slot.into_inner()
    }
}

impl<T> Default for ResolveOnce<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_first_resolution_wins() {
        let slot = ResolveOnce::new();
        assert!(!slot.is_resolved());
        assert_eq!(slot.get(), None);

        assert!(slot.resolve("callback"));
        assert!(!slot.resolve("timer"));

        assert!(slot.is_resolved());
        assert_eq!(slot.get(), Some(&"callback"));
        assert_eq!(slot.into_inner(), Some("callback"));
    }

    #[test]
    fn test_unresolved_into_inner_is_none() {
        let slot: ResolveOnce<u32> = ResolveOnce::new();
        assert_eq!(slot.into_inner(), None);
    }

    #[test]
    fn test_exactly_one_concurrent_writer_wins() {
        let slot = Arc::new(ResolveOnce::new());
        let handles: Vec<_> = (0..16)
            .map(|i: usize| {
                let slot = Arc::clone(&slot);
                thread::spawn(move || usize::from(slot.resolve(i)))
            })
            .collect();

        let wins: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(wins, 1);
        assert!(slot.get().is_some_and(|value| *value < 16));
    }
}
