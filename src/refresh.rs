use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use crate::errors::api_error::ApiResult;

/// Monotonic version shared by every mutating operation. Listings are
/// computed against a version; when the counter moves past it the cached
/// rows are stale and the frontend re-fetches. Clones share the counter so
/// blocking tasks can bump it off the command thread.
#[derive(Default, Clone)]
pub struct RefreshCounter {
    version: Arc<AtomicU64>,
}

impl RefreshCounter {
    pub fn current(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    pub fn bump(&self) -> u64 {
        self.version.fetch_add(1, Ordering::AcqRel) + 1
    }
}

#[tauri::command]
pub fn refresh_version(state: tauri::State<RefreshCounter>) -> ApiResult<u64> {
    Ok(state.current())
}
