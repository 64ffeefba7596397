use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher as NotifyWatcher};
use std::path::Path;
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatcherError {
    #[error("Failed to create watcher: {0}")]
    CreateError(#[from] notify::Error),
}

pub type WatcherResult<T> = Result<T, WatcherError>;

/// Watches the directories containing the session's files and reports raw
/// filesystem events. Debouncing is the caller's concern.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    receiver: Receiver<notify::Result<Event>>,
}

impl FileWatcher {
    pub fn new(paths: &[&Path]) -> WatcherResult<Self> {
        let (tx, rx) = channel();

        let mut watcher = RecommendedWatcher::new(
            move |res| {
                let _ = tx.send(res);
            },
            Config::default(),
        )?;

        for path in paths {
            // Watch the parent directory: editors replace files on save, and
            // a watch on the inode itself goes dead after the swap
            let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
            watcher.watch(dir.unwrap_or(Path::new(".")), RecursiveMode::NonRecursive)?;
        }

        Ok(Self {
            _watcher: watcher,
            receiver: rx,
        })
    }

    /// Block until the next event, `None` when the watcher is gone
    pub fn next_event(&self) -> Option<Event> {
        match self.receiver.recv() {
            Ok(Ok(event)) => Some(event),
            Ok(Err(_)) => None,
            Err(_) => None,
        }
    }

    /// Drain briefly so one save does not trigger several recomputations
    pub fn settle(&self) {
        while self.receiver.recv_timeout(Duration::from_millis(50)).is_ok() {}
    }
}
