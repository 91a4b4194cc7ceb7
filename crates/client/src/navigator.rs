//! Where navigation side effects land.

use std::sync::{Arc, Mutex, PoisonError};

use pdv_auth::{NavigationIntent, NavigationTarget};

/// Owner of the current location.
pub trait Navigator: Send {
    fn current_path(&self) -> String;
    /// Fire-and-forget; in-flight requests are not awaited.
    fn navigate(&mut self, target: NavigationTarget);
}

/// Perform a decided intent.
pub fn dispatch(navigator: &mut dyn Navigator, intent: NavigationIntent) {
    if let NavigationIntent::Navigate(target) = intent {
        tracing::debug!(%target, from = %navigator.current_path(), "navigating");
        navigator.navigate(target);
    }
}

#[derive(Debug, Default)]
struct Recorded {
    current: String,
    history: Vec<NavigationTarget>,
}

/// In-process navigator that tracks the current path and every navigation.
///
/// Clones share state, so a test (or a headless shell) can keep a handle
/// after giving one to the guard.
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    inner: Arc<Mutex<Recorded>>,
}

impl RecordingNavigator {
    pub fn at(path: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Recorded {
                current: path.into(),
                history: Vec::new(),
            })),
        }
    }

    pub fn history(&self) -> Vec<NavigationTarget> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).history.clone()
    }

    pub fn last(&self) -> Option<NavigationTarget> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).history.last().copied()
    }

    /// Move without recording, as if the user followed a link.
    pub fn visit(&self, path: impl Into<String>) {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).current = path.into();
    }
}

impl Navigator for RecordingNavigator {
    fn current_path(&self) -> String {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).current.clone()
    }

    fn navigate(&mut self, target: NavigationTarget) {
        let mut recorded = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        recorded.current = target.path().to_string();
        recorded.history.push(target);
    }
}
