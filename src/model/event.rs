use notify::event::{CreateKind, ModifyKind};
use notify::{Event, EventKind};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchEventKind {
    Created,
    Modified,
}

/// A filesystem change observed under the input root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEvent {
    pub path: PathBuf,
    pub kind: WatchEventKind,
    pub is_directory: bool,
}

impl WatchEvent {
    /// Splits a backend event into one [`WatchEvent`] per path.
    ///
    /// Only creations and modifications are kept. Directory status is probed
    /// on disk, since the polling backend reports it as `CreateKind::Any`.
    pub fn from_notify(event: &Event) -> Vec<WatchEvent> {
        let kind = match event.kind {
            EventKind::Create(_) => WatchEventKind::Created,
            EventKind::Modify(ModifyKind::Name(_)) => WatchEventKind::Created,
            EventKind::Modify(_) => WatchEventKind::Modified,
            _ => return Vec::new(),
        };
        let folder_hint = matches!(event.kind, EventKind::Create(CreateKind::Folder));

        event
            .paths
            .iter()
            .map(|path| WatchEvent {
                path: path.clone(),
                kind,
                is_directory: folder_hint || path.is_dir(),
            })
            .collect()
    }
}

impl fmt::Display for WatchEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WatchEventKind::Created => f.write_str("Created"),
            WatchEventKind::Modified => f.write_str("Modified"),
        }
    }
}
