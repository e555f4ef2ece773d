use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

use crate::collaborators::NonceReconciler;

/// Process-local reconciler: remembers the last sequence handed out per sender
/// and never hands the same one out twice.
#[derive(Debug, Default)]
pub struct InMemoryNonceReconciler {
    allocated: Mutex<HashMap<String, u64>>,
}

fn account_key(address: &str) -> String {
    address.to_lowercase()
}

impl InMemoryNonceReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last sequence handed out for `address`.
    pub fn last_allocated(&self, address: &str) -> Option<u64> {
        let allocated = self.allocated.lock().unwrap_or_else(|e| e.into_inner());
        allocated.get(&account_key(address)).copied()
    }

    /// Forget pending allocations once the ledger has caught up with them.
    pub fn confirm(&self, address: &str, sequence: u64) {
        let mut allocated = self.allocated.lock().unwrap_or_else(|e| e.into_inner());
        let key = account_key(address);
        if allocated.get(&key).is_some_and(|last| *last <= sequence) {
            allocated.remove(&key);
        }
    }
}

impl NonceReconciler for InMemoryNonceReconciler {
    fn adjust(&self, address: &str, fetched: u64) -> u64 {
        let mut allocated = self.allocated.lock().unwrap_or_else(|e| e.into_inner());
        let key = account_key(address);
        let next = match allocated.get(&key) {
            Some(last) if *last >= fetched => last + 1,
            _ => fetched,
        };
        allocated.insert(key, next);
        debug!(address, fetched, adjusted = next, "adjust sequence");
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_first_allocation_uses_fetched_value() {
        let reconciler = InMemoryNonceReconciler::new();
        assert_eq!(reconciler.adjust("rA", 5), 5);
        assert_eq!(reconciler.adjust("rA", 5), 6);
        assert_eq!(reconciler.adjust("rA", 5), 7);
        assert_eq!(reconciler.last_allocated("rA"), Some(7));
    }

    #[test]
    fn test_ledger_ahead_of_local_state_wins() {
        let reconciler = InMemoryNonceReconciler::new();
        reconciler.adjust("rA", 5);
        assert_eq!(reconciler.adjust("rA", 10), 10);
    }

    #[test]
    fn test_senders_are_independent() {
        let reconciler = InMemoryNonceReconciler::new();
        assert_eq!(reconciler.adjust("rA", 3), 3);
        assert_eq!(reconciler.adjust("rB", 3), 3);
    }

    #[test]
    fn test_confirm_releases_pending_allocations() {
        let reconciler = InMemoryNonceReconciler::new();
        reconciler.adjust("rA", 3);
        reconciler.adjust("rA", 3);
        reconciler.confirm("rA", 2);
        assert_eq!(reconciler.last_allocated("rA"), Some(4));
        reconciler.confirm("rA", 4);
        assert_eq!(reconciler.last_allocated("rA"), None);
    }

    #[test]
    fn test_concurrent_adjust_never_repeats() {
        let reconciler = Arc::new(InMemoryNonceReconciler::new());
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let reconciler = reconciler.clone();
                std::thread::spawn(move || (0..50).map(|_| reconciler.adjust("rA", 1)).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for sequence in handle.join().unwrap() {
                assert!(seen.insert(sequence), "sequence {} handed out twice", sequence);
            }
        }
        assert_eq!(seen.len(), 16 * 50);
    }
}
