use super::*;
use crate::transfer::TransferOp;
use std::path::PathBuf;

fn entry(op: TransferOp, paths: &[&str]) -> ClipboardEntry {
    ClipboardEntry {
        sources: paths.iter().map(PathBuf::from).collect(),
        operation: op,
    }
}

#[test]
fn set_rejects_empty_source_list() {
    let state = ClipboardState::default();
    assert!(state.set(entry(TransferOp::Copy, &[])).is_err());
    assert_eq!(state.get().unwrap(), None);
}

#[test]
fn copy_entry_survives_clear_if_move() {
    let state = ClipboardState::default();
    let copied = entry(TransferOp::Copy, &["/tmp/a.txt", "/tmp/b.txt"]);
    state.set(copied.clone()).unwrap();

    state.clear_if_move().unwrap();
    assert_eq!(state.get().unwrap(), Some(copied.clone()));

    // Repeated pastes of a Copy clipboard keep working.
    state.clear_if_move().unwrap();
    assert_eq!(state.get().unwrap(), Some(copied));
}

#[test]
fn move_entry_is_consumed_exactly_once() {
    let state = ClipboardState::default();
    state.set(entry(TransferOp::Move, &["/tmp/a.txt"])).unwrap();

    state.clear_if_move().unwrap();
    assert_eq!(state.get().unwrap(), None);

    // A second consume is a no-op, not an error.
    state.clear_if_move().unwrap();
    assert_eq!(state.get().unwrap(), None);
}

#[test]
fn failed_paste_leaves_clipboard_for_retry() {
    // The orchestrator only calls clear_if_move after a successful paste;
    // this mirrors the failure path where no clear happens at all.
    let state = ClipboardState::default();
    let cut = entry(TransferOp::Move, &["/tmp/a.txt"]);
    state.set(cut.clone()).unwrap();
    assert_eq!(state.get().unwrap(), Some(cut));
}

#[test]
fn wire_mode_round_trips_between_set_and_snapshot() {
    use std::time::{Duration, SystemTime};

    let ts = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0))
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("ferry-clip-wire-{}-{ts}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let file = dir.join("a.txt");
    std::fs::write(&file, b"a").unwrap();
    let raw = file.to_string_lossy().to_string();

    let state = ClipboardState::default();
    set_clipboard_impl(&state, vec![raw.clone()], "cut").unwrap();
    let snap = ClipboardSnapshot::from_entry(state.get().unwrap().unwrap());
    assert_eq!(snap.operation, "cut");

    // The reported mode is accepted back verbatim by the set command.
    set_clipboard_impl(&state, snap.sources, snap.operation).unwrap();
    assert_eq!(
        state.get().unwrap().unwrap().operation,
        TransferOp::Move
    );

    set_clipboard_impl(&state, vec![raw], "copy").unwrap();
    let snap = ClipboardSnapshot::from_entry(state.get().unwrap().unwrap());
    assert_eq!(snap.operation, "copy");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn replacing_entry_overwrites_previous_gesture() {
    let state = ClipboardState::default();
    state.set(entry(TransferOp::Move, &["/tmp/a"])).unwrap();
    let second = entry(TransferOp::Copy, &["/tmp/b"]);
    state.set(second.clone()).unwrap();
    assert_eq!(state.get().unwrap(), Some(second));
}
