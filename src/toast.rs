//! User-facing notifications ("toasts") queued by views and shown by the shell.

use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

/// Shared queue of pending toasts. Clones share the queue.
#[derive(Clone, Default)]
pub struct Toaster {
    pending: Arc<Mutex<Vec<Toast>>>,
}

impl Toaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(ToastKind::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(ToastKind::Error, message.into());
    }

    fn push(&self, kind: ToastKind, message: String) {
        self.pending.lock().unwrap().push(Toast { kind, message });
    }

    /// Removes and returns the pending toasts, oldest first.
    pub fn drain(&self) -> Vec<Toast> {
        std::mem::take(&mut *self.pending.lock().unwrap())
    }

    pub fn pending(&self) -> usize {
        self.pending.lock().unwrap().len()
    }
}
