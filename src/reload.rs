//! Entry-script change detection for hot reload.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};

use log::{debug, info, warn};
use notify::event::ModifyKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WatchState {
    /// No change source; `poll` always reports nothing.
    Inactive,
    Watching,
    /// A change was seen and has not been reported by `poll` yet.
    PendingReload,
}

/// How one raw event affects the watched file.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
struct Effect {
    content: bool,
    rewatch: bool,
}

fn classify(event: &Event) -> Effect {
    if event.need_rescan() {
        return Effect { content: false, rewatch: true };
    }
    match event.kind {
        EventKind::Access(_) => Effect::default(),
        EventKind::Modify(ModifyKind::Name(_)) | EventKind::Remove(_) => {
            Effect { content: true, rewatch: true }
        }
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Any => {
            Effect { content: true, rewatch: false }
        }
        // Watch invalidated without a content change.
        EventKind::Other => Effect { content: false, rewatch: true },
    }
}

/// Watches a single file and coalesces its events into at most one reload
/// per frame.
///
/// Editors that save by replacing the file invalidate the platform watch, so
/// removal and rename events re-register the watch on the same path.  When
/// the path cannot be watched yet (the new file is not in place), the watch
/// is retried on later polls and the file is reported changed once it is back.
pub struct ReloadWatcher {
    path: PathBuf,
    state: WatchState,
    watcher: Option<RecommendedWatcher>,
    events: Option<Receiver<notify::Result<Event>>>,
    rewatch_pending: bool,
}

impl ReloadWatcher {
    pub fn inactive() -> Self {
        Self {
            path: PathBuf::new(),
            state: WatchState::Inactive,
            watcher: None,
            events: None,
            rewatch_pending: false,
        }
    }

    /// Start watching `path`.  Failing to set up a watch only disables hot
    /// reload.
    pub fn watch(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (tx, rx) = mpsc::channel();

        let mut watcher = match notify::recommended_watcher(tx) {
            Ok(watcher) => watcher,
            Err(err) => {
                warn!("hot reload disabled: {err}");
                return Self::inactive();
            }
        };
        if let Err(err) = watcher.watch(&path, RecursiveMode::NonRecursive) {
            warn!("hot reload disabled, cannot watch {}: {err}", path.display());
            return Self::inactive();
        }

        info!("watching {} for changes", path.display());
        Self {
            path,
            state: WatchState::Watching,
            watcher: Some(watcher),
            events: Some(rx),
            rewatch_pending: false,
        }
    }

    /// Drive the watcher from an arbitrary event source instead of the
    /// platform watcher.  Re-registration requests are accepted and ignored.
    pub fn from_receiver(path: impl Into<PathBuf>, events: Receiver<notify::Result<Event>>) -> Self {
        Self {
            path: path.into(),
            state: WatchState::Watching,
            watcher: None,
            events: Some(events),
            rewatch_pending: false,
        }
    }

    pub fn state(&self) -> WatchState {
        self.state
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drain pending events without blocking.  Returns `true` at most once
    /// per batch of events that touched the file's content.
    pub fn poll(&mut self) -> bool {
        let Some(events) = &self.events else {
            return false;
        };

        let mut rewatch = self.rewatch_pending;
        let mut disconnected = false;
        loop {
            match events.try_recv() {
                Ok(Ok(event)) => {
                    let effect = classify(&event);
                    if effect.content {
                        self.state = WatchState::PendingReload;
                    }
                    rewatch |= effect.rewatch;
                }
                Ok(Err(err)) => warn!("file watch error on {}: {err}", self.path.display()),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    disconnected = true;
                    break;
                }
            }
        }

        if rewatch && !disconnected {
            self.rewatch();
        }

        let changed = self.state == WatchState::PendingReload;
        self.state = WatchState::Watching;

        if disconnected {
            warn!("file watcher for {} stopped, hot reload disabled", self.path.display());
            self.events = None;
            self.watcher = None;
            self.state = WatchState::Inactive;
        }
        changed
    }

    fn rewatch(&mut self) {
        let Some(watcher) = self.watcher.as_mut() else {
            self.rewatch_pending = false;
            return;
        };

        // The old registration is usually gone already.
        let _ = watcher.unwatch(&self.path);
        match watcher.watch(&self.path, RecursiveMode::NonRecursive) {
            Ok(()) => {
                debug!("re-registered watch on {}", self.path.display());
                if self.rewatch_pending {
                    // The file reappeared after a failed attempt; its creation
                    // happened while nothing was watching.
                    self.state = WatchState::PendingReload;
                }
                self.rewatch_pending = false;
            }
            Err(err) => {
                if !self.rewatch_pending {
                    debug!("cannot re-watch {} yet: {err}", self.path.display());
                }
                self.rewatch_pending = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use notify::event::{
        AccessKind, CreateKind, DataChange, Flag, MetadataKind, RemoveKind, RenameMode,
    };

    fn event(kind: EventKind) -> notify::Result<Event> {
        Ok(Event::new(kind).add_path(PathBuf::from("game/main.lua")))
    }

    fn watcher() -> (mpsc::Sender<notify::Result<Event>>, ReloadWatcher) {
        let (tx, rx) = mpsc::channel();
        (tx, ReloadWatcher::from_receiver("game/main.lua", rx))
    }

    #[test]
    fn classify_content_events() {
        let content = [
            EventKind::Create(CreateKind::File),
            EventKind::Modify(ModifyKind::Data(DataChange::Content)),
            EventKind::Modify(ModifyKind::Metadata(MetadataKind::WriteTime)),
            EventKind::Modify(ModifyKind::Any),
            EventKind::Any,
        ];
        for kind in content {
            let effect = classify(&Event::new(kind));
            assert!(effect.content, "{kind:?}");
            assert!(!effect.rewatch, "{kind:?}");
        }
    }

    #[test]
    fn classify_replacement_events() {
        for kind in [
            EventKind::Remove(RemoveKind::File),
            EventKind::Modify(ModifyKind::Name(RenameMode::From)),
        ] {
            assert_eq!(classify(&Event::new(kind)), Effect { content: true, rewatch: true });
        }
    }

    #[test]
    fn classify_ignored_and_invalidated() {
        let access = Event::new(EventKind::Access(AccessKind::Read));
        assert_eq!(classify(&access), Effect::default());

        let other = Event::new(EventKind::Other);
        assert_eq!(classify(&other), Effect { content: false, rewatch: true });

        let rescan = Event::new(EventKind::Modify(ModifyKind::Any)).set_flag(Flag::Rescan);
        assert_eq!(classify(&rescan), Effect { content: false, rewatch: true });
    }

    #[test]
    fn coalesces_a_burst_into_one_change() {
        let (tx, mut watcher) = watcher();
        tx.send(event(EventKind::Modify(ModifyKind::Data(DataChange::Content)))).unwrap();
        tx.send(event(EventKind::Modify(ModifyKind::Metadata(MetadataKind::Any)))).unwrap();
        tx.send(event(EventKind::Create(CreateKind::File))).unwrap();

        assert!(watcher.poll());
        assert!(!watcher.poll());
        assert_eq!(watcher.state(), WatchState::Watching);
    }

    #[test]
    fn invalidation_alone_is_not_a_change() {
        let (tx, mut watcher) = watcher();
        tx.send(event(EventKind::Other)).unwrap();
        assert!(!watcher.poll());

        tx.send(event(EventKind::Other)).unwrap();
        tx.send(event(EventKind::Modify(ModifyKind::Any))).unwrap();
        assert!(watcher.poll());
    }

    #[test]
    fn access_is_ignored() {
        let (tx, mut watcher) = watcher();
        tx.send(event(EventKind::Access(AccessKind::Any))).unwrap();
        assert!(!watcher.poll());
    }

    #[test]
    fn watch_errors_are_not_changes() {
        let (tx, mut watcher) = watcher();
        tx.send(Err(notify::Error::generic("boom"))).unwrap();
        assert!(!watcher.poll());
        assert_eq!(watcher.state(), WatchState::Watching);
    }

    #[test]
    fn disconnected_source_deactivates() {
        let (tx, mut watcher) = watcher();
        tx.send(event(EventKind::Modify(ModifyKind::Any))).unwrap();
        drop(tx);

        // The change queued before the disconnect is still reported.
        assert!(watcher.poll());
        assert_eq!(watcher.state(), WatchState::Inactive);
        assert!(!watcher.poll());
    }

    #[test]
    fn inactive_never_reports() {
        let mut watcher = ReloadWatcher::inactive();
        assert_eq!(watcher.state(), WatchState::Inactive);
        assert!(!watcher.poll());
    }
}
