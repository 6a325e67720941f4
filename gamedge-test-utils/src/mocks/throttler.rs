use async_trait::async_trait;
use gamedge_core::Result;
use gamedge_core::throttling::{CacheKey, RefreshPolicy, Throttler};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Throttler with scripted answers that records every call
///
/// Keys without an explicit answer use the default, which starts as "allow".
#[derive(Clone)]
pub struct MockThrottler {
    state: Arc<Mutex<ThrottlerState>>,
}

struct ThrottlerState {
    default_allow: bool,
    answers: HashMap<CacheKey, bool>,
    checked: Vec<(CacheKey, RefreshPolicy)>,
    updated: Vec<CacheKey>,
}

impl Default for MockThrottler {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(ThrottlerState {
                default_allow: true,
                answers: HashMap::new(),
                checked: Vec::new(),
                updated: Vec::new(),
            })),
        }
    }
}

impl MockThrottler {
    pub fn allowing() -> Self {
        Self::default()
    }

    pub fn denying() -> Self {
        let throttler = Self::default();
        throttler.state.lock().unwrap().default_allow = false;
        throttler
    }

    pub fn set_can_refresh(&self, key: CacheKey, allow: bool) {
        self.state.lock().unwrap().answers.insert(key, allow);
    }

    /// Keys and policies passed to `can_refresh`, in call order
    pub fn checked(&self) -> Vec<(CacheKey, RefreshPolicy)> {
        self.state.lock().unwrap().checked.clone()
    }

    /// Keys passed to `update_last_refresh_time`, in call order
    pub fn updated_keys(&self) -> Vec<CacheKey> {
        self.state.lock().unwrap().updated.clone()
    }
}

#[async_trait]
impl Throttler for MockThrottler {
    async fn can_refresh(&self, key: &CacheKey, policy: RefreshPolicy) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        state.checked.push((key.clone(), policy));
        Ok(state.answers.get(key).copied().unwrap_or(state.default_allow))
    }

    async fn update_last_refresh_time(&self, key: &CacheKey) -> Result<()> {
        self.state.lock().unwrap().updated.push(key.clone());
        Ok(())
    }
}
