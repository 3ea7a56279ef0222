use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
};

use crate::errors::api_error::{ApiError, ApiResult};

/// Registry of cancellable background jobs, keyed by the frontend-supplied
/// task id. The guard deregisters on drop, so a finished job cannot be
/// cancelled into a later job reusing the id.
#[derive(Clone, Default)]
pub struct CancelState {
    inner: Arc<Mutex<HashMap<String, Arc<AtomicBool>>>>,
}

pub struct CancelGuard {
    id: String,
    flag: Arc<AtomicBool>,
    state: CancelState,
}

impl CancelState {
    pub fn register(&self, id: String) -> ApiResult<CancelGuard> {
        let flag = Arc::new(AtomicBool::new(false));
        let mut map = self.inner.lock().map_err(|_| {
            ApiError::new("state_lock_failed", "Failed to lock cancel registry")
        })?;
        map.insert(id.clone(), flag.clone());
        Ok(CancelGuard {
            id,
            flag,
            state: self.clone(),
        })
    }

    pub fn cancel(&self, id: &str) -> ApiResult<bool> {
        let map = self.inner.lock().map_err(|_| {
            ApiError::new("state_lock_failed", "Failed to lock cancel registry")
        })?;
        match map.get(id) {
            Some(flag) => {
                flag.store(true, Ordering::Relaxed);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn remove(&self, id: &str) {
        if let Ok(mut map) = self.inner.lock() {
            map.remove(id);
        }
    }
}

impl CancelGuard {
    pub fn token(&self) -> Arc<AtomicBool> {
        self.flag.clone()
    }
}

impl Drop for CancelGuard {
    fn drop(&mut self) {
        self.state.remove(&self.id);
    }
}

#[tauri::command]
pub fn cancel_task(state: tauri::State<CancelState>, id: String) -> ApiResult<()> {
    if state.cancel(&id)? {
        Ok(())
    } else {
        Err(ApiError::new(
            "task_not_found",
            "Task not found or already finished",
        ))
    }
}
