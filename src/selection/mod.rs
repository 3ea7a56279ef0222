use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use serde::Deserialize;

use crate::errors::api_error::{ApiError, ApiResult};

pub mod marquee;
#[cfg(test)]
mod tests;

pub use marquee::Rect;

/// One visible row of a view: the stable path identifier plus the bounding
/// box the frontend laid it out at (used only by marquee selection).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewItem {
    pub id: String,
    pub bounds: Option<Rect>,
}

#[derive(Debug, Clone, Copy)]
pub enum KeyDirection {
    Up,
    Down,
}

/// Selection state machine for a single tree or list view.
///
/// `anchor` is the fixed end of a shift range, `focus` the moving end. Both
/// index into the caller-supplied current ordering, which can change between
/// gestures after a re-sort or filter; every entry point clamps indices
/// against the list it is handed instead of trusting stored ones.
#[derive(Debug, Default)]
pub struct SelectionModel {
    selected: HashSet<String>,
    anchor: Option<usize>,
    focus: Option<usize>,
    marquee_origin: Option<(f64, f64)>,
}

impl SelectionModel {
    pub fn selected_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.selected.iter().cloned().collect();
        ids.sort();
        ids
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.anchor = None;
        self.focus = None;
        self.marquee_origin = None;
    }

    pub fn click(&mut self, items: &[String], index: usize) {
        let Some(index) = clamp_index(items, index) else {
            return;
        };
        self.selected.clear();
        self.selected.insert(items[index].clone());
        self.anchor = Some(index);
        self.focus = Some(index);
    }

    pub fn toggle_click(&mut self, items: &[String], index: usize) {
        let Some(index) = clamp_index(items, index) else {
            return;
        };
        let id = &items[index];
        if !self.selected.remove(id) {
            self.selected.insert(id.clone());
        }
        self.focus = Some(index);
        if self.anchor.is_none() {
            self.anchor = Some(index);
        }
    }

    pub fn shift_click(&mut self, items: &[String], index: usize) {
        let Some(index) = clamp_index(items, index) else {
            return;
        };
        let anchor = self
            .anchor
            .or(self.focus)
            .and_then(|i| clamp_index(items, i))
            .unwrap_or(index);
        self.apply_range(items, anchor, index);
        self.focus = Some(index);
        if self.anchor.is_none() {
            self.anchor = Some(anchor);
        }
    }

    pub fn key_move(&mut self, items: &[String], direction: KeyDirection, shift: bool) {
        if items.is_empty() {
            return;
        }
        let current = self
            .focus
            .and_then(|i| clamp_index(items, i))
            .unwrap_or(0);
        let next = match direction {
            KeyDirection::Up => current.saturating_sub(1),
            KeyDirection::Down => (current + 1).min(items.len() - 1),
        };

        if shift {
            let anchor = self
                .anchor
                .and_then(|i| clamp_index(items, i))
                .unwrap_or(current);
            self.anchor = Some(anchor);
            self.apply_range(items, anchor, next);
        } else {
            self.selected.clear();
            self.selected.insert(items[next].clone());
            self.anchor = Some(next);
        }
        self.focus = Some(next);
    }

    /// Right-click target handling: an unselected item becomes the sole
    /// selection; clicking inside the current selection keeps it for the
    /// context action.
    pub fn context_click(&mut self, items: &[String], index: usize) {
        let Some(index) = clamp_index(items, index) else {
            return;
        };
        if !self.selected.contains(&items[index]) {
            self.click(items, index);
        }
    }

    pub fn begin_marquee(&mut self, x: f64, y: f64) {
        self.selected.clear();
        self.anchor = None;
        self.focus = None;
        self.marquee_origin = Some((x, y));
    }

    /// Recompute the marquee selection from scratch for the current cursor
    /// position. Full recomputation every move avoids compounding stale
    /// state when items scroll or reflow mid-drag.
    pub fn update_marquee(&mut self, items: &[ViewItem], x: f64, y: f64) {
        let Some((ox, oy)) = self.marquee_origin else {
            return;
        };
        let rect = Rect::from_corners(ox, oy, x, y);
        self.selected.clear();
        for item in items {
            if let Some(bounds) = &item.bounds {
                if rect.intersects(bounds) {
                    self.selected.insert(item.id.clone());
                }
            }
        }
    }

    pub fn end_marquee(&mut self) {
        self.marquee_origin = None;
    }

    fn apply_range(&mut self, items: &[String], a: usize, b: usize) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        self.selected.clear();
        for id in &items[lo..=hi] {
            self.selected.insert(id.clone());
        }
    }
}

fn clamp_index(items: &[String], index: usize) -> Option<usize> {
    if items.is_empty() {
        None
    } else {
        Some(index.min(items.len() - 1))
    }
}

/// Per-view selection models, keyed by the frontend's view instance id.
#[derive(Default)]
pub struct SelectionRegistry {
    views: Mutex<HashMap<String, SelectionModel>>,
}

impl SelectionRegistry {
    fn with_view<T>(
        &self,
        view: &str,
        f: impl FnOnce(&mut SelectionModel) -> T,
    ) -> ApiResult<T> {
        let mut guard = self
            .views
            .lock()
            .map_err(|_| ApiError::new("state_lock_failed", "Failed to lock selection registry"))?;
        Ok(f(guard.entry(view.to_string()).or_default()))
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClickModifiers {
    pub ctrl: bool,
    pub shift: bool,
}

#[tauri::command]
pub fn selection_click(
    state: tauri::State<SelectionRegistry>,
    view: String,
    items: Vec<String>,
    index: usize,
    modifiers: ClickModifiers,
) -> ApiResult<Vec<String>> {
    state.with_view(&view, |model| {
        if modifiers.shift {
            model.shift_click(&items, index);
        } else if modifiers.ctrl {
            model.toggle_click(&items, index);
        } else {
            model.click(&items, index);
        }
        model.selected_ids()
    })
}

#[tauri::command]
pub fn selection_context_click(
    state: tauri::State<SelectionRegistry>,
    view: String,
    items: Vec<String>,
    index: usize,
) -> ApiResult<Vec<String>> {
    state.with_view(&view, |model| {
        model.context_click(&items, index);
        model.selected_ids()
    })
}

#[tauri::command]
pub fn selection_key(
    state: tauri::State<SelectionRegistry>,
    view: String,
    items: Vec<String>,
    up: bool,
    shift: bool,
) -> ApiResult<Vec<String>> {
    let direction = if up {
        KeyDirection::Up
    } else {
        KeyDirection::Down
    };
    state.with_view(&view, |model| {
        model.key_move(&items, direction, shift);
        model.selected_ids()
    })
}

#[tauri::command]
pub fn selection_marquee_begin(
    state: tauri::State<SelectionRegistry>,
    view: String,
    x: f64,
    y: f64,
) -> ApiResult<()> {
    state.with_view(&view, |model| model.begin_marquee(x, y))
}

#[tauri::command]
pub fn selection_marquee_update(
    state: tauri::State<SelectionRegistry>,
    view: String,
    items: Vec<ViewItem>,
    x: f64,
    y: f64,
) -> ApiResult<Vec<String>> {
    state.with_view(&view, |model| {
        model.update_marquee(&items, x, y);
        model.selected_ids()
    })
}

#[tauri::command]
pub fn selection_marquee_end(
    state: tauri::State<SelectionRegistry>,
    view: String,
) -> ApiResult<Vec<String>> {
    state.with_view(&view, |model| {
        model.end_marquee();
        model.selected_ids()
    })
}

#[tauri::command]
pub fn selection_clear(state: tauri::State<SelectionRegistry>, view: String) -> ApiResult<()> {
    state.with_view(&view, |model| model.clear())
}
