// SPDX-FileCopyrightText: 2026 ECSCM Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error sinks owned by the calling component.
//!
//! Loaders never return their errors to the caller; they hand each one to an
//! [`ErrorSink`] and keep going. A panel typically owns a
//! [`CollectingErrorSink`] and renders its messages, while headless callers
//! use [`TracingErrorSink`].

use std::sync::Mutex;

use crate::error::EcscmError;

/// Receives errors that must be surfaced to the user but do not abort work.
pub trait ErrorSink: Send + Sync {
    fn report(&self, error: &EcscmError);
}

/// Logs every reported error at `error` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingErrorSink;

impl ErrorSink for TracingErrorSink {
    fn report(&self, error: &EcscmError) {
        tracing::error!(error = %error.chain(), "ecscm error");
    }
}

/// Keeps reported messages in order for later display.
#[derive(Debug, Default)]
pub struct CollectingErrorSink {
    messages: Mutex<Vec<String>>,
}

impl CollectingErrorSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the messages reported so far.
    pub fn messages(&self) -> Vec<String> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drops all collected messages (a panel does this before each submit).
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        // A panic while holding the lock cannot leave a Vec<String> half-written.
        self.messages.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ErrorSink for CollectingErrorSink {
    fn report(&self, error: &EcscmError) {
        let message = error.chain();
        tracing::debug!(error = %message, "collected error");
        self.lock().push(message);
    }
}
