//! Aggregates Tauri command modules and re-exports them for the builder.

pub mod archive;
pub mod config;
pub mod fs;
pub mod listing;

pub use crate::clipboard::{clipboard_contents, set_clipboard_cmd};
pub use crate::index::{build_index, load_index, search_index};
pub use crate::refresh::refresh_version;
pub use crate::selection::{
    selection_clear, selection_click, selection_context_click, selection_key,
    selection_marquee_begin, selection_marquee_end, selection_marquee_update,
};
pub use crate::tasks::cancel_task;
pub use crate::transfer::{paste_clipboard_cmd, transfer_entries};
pub use crate::watcher::{unwatch_all, watch_path};
pub use archive::{compress_files, extract_zip, extract_zip_files, list_zip_contents};
pub use config::{load_config, update_config};
pub use fs::{create_folder, delete_entries, open_entry, rename_entry};
pub use listing::list_dir;
