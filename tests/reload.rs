use std::fs;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use te::reload::{ReloadWatcher, WatchState};

// ── helpers ─────────────────────────────────────────────────────────────────

const TIMEOUT: Duration = Duration::from_secs(5);
const SETTLE: Duration = Duration::from_millis(300);

/// Poll until a change is reported or the timeout runs out.
fn wait_for_change(watcher: &mut ReloadWatcher) -> bool {
    let deadline = Instant::now() + TIMEOUT;
    while Instant::now() < deadline {
        if watcher.poll() {
            return true;
        }
        thread::sleep(Duration::from_millis(20));
    }
    false
}

/// Let trailing events of the last write arrive, then drop them.
fn settle(watcher: &mut ReloadWatcher) {
    thread::sleep(SETTLE);
    watcher.poll();
}

/// Replace `path` the way editors save: write a sibling and rename it over.
fn replace(path: &Path, contents: &str) {
    let tmp = path.with_extension("lua.tmp");
    fs::write(&tmp, contents).unwrap();
    fs::rename(&tmp, path).unwrap();
}

fn watched_script() -> (tempfile::TempDir, std::path::PathBuf, ReloadWatcher) {
    let dir = tempfile::tempdir().unwrap();
    let entry = dir.path().join("main.lua");
    fs::write(&entry, "-- v1").unwrap();
    let watcher = ReloadWatcher::watch(&entry);
    assert_eq!(watcher.state(), WatchState::Watching);
    (dir, entry, watcher)
}

// ── real file system ────────────────────────────────────────────────────────

#[test]
fn an_edit_is_reported_once() {
    let (_dir, entry, mut watcher) = watched_script();

    fs::write(&entry, "-- v2").unwrap();
    assert!(wait_for_change(&mut watcher));
    settle(&mut watcher);
    assert!(!watcher.poll());
    assert_eq!(watcher.state(), WatchState::Watching);
}

#[test]
fn edits_after_an_atomic_replace_are_still_seen() {
    let (_dir, entry, mut watcher) = watched_script();

    replace(&entry, "-- replaced");
    assert!(wait_for_change(&mut watcher));
    settle(&mut watcher);

    fs::write(&entry, "-- edited after replace").unwrap();
    assert!(wait_for_change(&mut watcher));
    assert_eq!(watcher.state(), WatchState::Watching);
}

#[test]
fn a_deleted_script_is_picked_up_again_when_recreated() {
    let (_dir, entry, mut watcher) = watched_script();

    fs::remove_file(&entry).unwrap();
    assert!(wait_for_change(&mut watcher));
    settle(&mut watcher);

    fs::write(&entry, "-- recreated").unwrap();
    assert!(wait_for_change(&mut watcher));
    settle(&mut watcher);

    fs::write(&entry, "-- edited after recreate").unwrap();
    assert!(wait_for_change(&mut watcher));
}

#[test]
fn missing_file_disables_watching() {
    let dir = tempfile::tempdir().unwrap();
    let mut watcher = ReloadWatcher::watch(dir.path().join("main.lua"));
    assert_eq!(watcher.state(), WatchState::Inactive);
    assert!(!watcher.poll());
}
