use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation flag shared between a view and the requests it
/// starts. Loaders check it after every await and drop late responses.
#[derive(Clone, Debug, Default)]
pub struct MountGuard {
    unmounted: Arc<AtomicBool>,
}

impl MountGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unmount(&self) {
        self.unmounted.store(true, Ordering::SeqCst);
    }

    pub fn is_mounted(&self) -> bool {
        !self.unmounted.load(Ordering::SeqCst)
    }
}
