//! Outstanding client calls keyed by sequence number.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::action::ClientAction;
use crate::exception::{ApplicationException, ExceptionKind};

/// Client actions awaiting a reply.
///
/// Entries are removed before their completion runs, so callbacks may issue
/// new calls without deadlocking.
#[derive(Default)]
pub struct PendingCalls {
    calls: Mutex<HashMap<i32, Box<dyn ClientAction>>>,
}

impl PendingCalls {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `action` as waiting for the reply to `sequence_number`.
    ///
    /// A call already waiting on the same sequence number is displaced and
    /// fails with a `BadSequenceId` exception.
    pub fn insert(&self, sequence_number: i32, action: Box<dyn ClientAction>) {
        let previous = self.calls.lock().insert(sequence_number, action);
        if let Some(previous) = previous {
            tracing::warn!(
                sequence_number,
                action = previous.name(),
                "sequence number reused, failing earlier call"
            );
            let exception = ApplicationException::new(
                ExceptionKind::BadSequenceId,
                format!(
                    "{}: sequence number {sequence_number} reused",
                    previous.name()
                ),
            );
            previous.call_failed(exception);
        }
    }

    /// Removes and returns the call waiting for `sequence_number`.
    #[must_use]
    pub fn take(&self, sequence_number: i32) -> Option<Box<dyn ClientAction>> {
        self.calls.lock().remove(&sequence_number)
    }

    /// Removes every outstanding call, ordered by sequence number.
    #[must_use]
    pub fn drain(&self) -> Vec<(i32, Box<dyn ClientAction>)> {
        let mut calls: Vec<_> = self.calls.lock().drain().collect();
        calls.sort_unstable_by_key(|(sequence_number, _)| *sequence_number);
        calls
    }

    /// Number of outstanding calls.
    #[must_use]
    pub fn len(&self) -> usize {
        self.calls.lock().len()
    }

    /// Returns true if no call is outstanding.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calls.lock().is_empty()
    }
}

impl std::fmt::Debug for PendingCalls {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingCalls")
            .field("outstanding", &self.len())
            .finish()
    }
}
