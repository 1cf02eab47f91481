//! Per-user mutual exclusion for check-in runs.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

/// Registry of users with a run in flight.
#[derive(Clone, Default)]
pub struct RunGuards {
    active: Arc<Mutex<HashSet<String>>>,
}

impl RunGuards {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the run slot for `user_id`, or `None` if it is taken.
    pub fn try_acquire(&self, user_id: &str) -> Option<RunGuard> {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        if !active.insert(user_id.to_string()) {
            return None;
        }
        Some(RunGuard {
            user_id: user_id.to_string(),
            active: Arc::clone(&self.active),
        })
    }

    pub fn is_running(&self, user_id: &str) -> bool {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(user_id)
    }
}

/// Releases the user's slot when dropped.
pub struct RunGuard {
    user_id: String,
    active: Arc<Mutex<HashSet<String>>>,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_fails_until_release() {
        let guards = RunGuards::new();
        let first = guards.try_acquire("user-1");
        assert!(first.is_some());
        assert!(guards.try_acquire("user-1").is_none());
        assert!(guards.is_running("user-1"));

        drop(first);
        assert!(!guards.is_running("user-1"));
        assert!(guards.try_acquire("user-1").is_some());
    }

    #[test]
    fn users_do_not_block_each_other() {
        let guards = RunGuards::new();
        let _a = guards.try_acquire("user-1").unwrap();
        assert!(guards.try_acquire("user-2").is_some());
    }
}
