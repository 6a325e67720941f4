use gamedge_core::data::NetworkState;
use std::sync::atomic::{AtomicBool, Ordering};

/// Network state that tests can flip at runtime
#[derive(Debug)]
pub struct MockNetworkState {
    available: AtomicBool,
}

impl MockNetworkState {
    pub fn online() -> Self {
        Self {
            available: AtomicBool::new(true),
        }
    }

    pub fn offline() -> Self {
        Self {
            available: AtomicBool::new(false),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }
}

impl NetworkState for MockNetworkState {
    fn is_network_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }
}
